// SPDX-License-Identifier: MPL-2.0
//! Button declarations for every screen mode.
//!
//! Coordinates are authored for an 800x480 panel and scaled linearly to the
//! configured display size.

use super::button::{Button, ButtonRegistry};
use super::icons::IconKey;
use crate::domain::capture::{FxMode, IsoMode, Resolution, SizeMode};
use crate::domain::screen::{Action, Rect, ScreenMode, SettingsPage};
use crate::domain::storage::{Direction, StorageTarget};

/// Panel size the coordinates below are written for.
pub const DESIGN_SIZE: Resolution = Resolution::new(800, 480);

/// Edge length of the busy spinner drawn inside the busy anchor.
pub const SPINNER_EDGE: u32 = 22;

const DONE: Rect = Rect::new(200, 408, 400, 52);
const PREV: Rect = Rect::new(20, 20, 80, 52);
const NEXT: Rect = Rect::new(700, 20, 80, 52);
const WORKING: Rect = Rect::new(322, 189, 157, 102);
const FULL: Rect = Rect::new(0, 0, 800, 480);
const ALERT: Rect = Rect::new(0, 408, 800, 72);

/// Maps design coordinates onto the actual display.
#[derive(Debug, Clone, Copy)]
struct Scale {
    sx: f32,
    sy: f32,
}

impl Scale {
    fn for_display(display: Resolution) -> Self {
        Self {
            sx: display.width as f32 / DESIGN_SIZE.width as f32,
            sy: display.height as f32 / DESIGN_SIZE.height as f32,
        }
    }

    fn rect(self, rect: Rect) -> Rect {
        Rect::new(
            (rect.x as f32 * self.sx).round() as i32,
            (rect.y as f32 * self.sy).round() as i32,
            ((rect.width as f32 * self.sx).round() as u32).max(1),
            ((rect.height as f32 * self.sy).round() as u32).max(1),
        )
    }
}

/// Where the alert banner is drawn.
#[must_use]
pub fn alert_rect(display: Resolution) -> Rect {
    Scale::for_display(display).rect(ALERT)
}

/// Spinner square inside a busy anchor.
#[must_use]
pub fn spinner_rect(anchor: Rect) -> Rect {
    let edge = SPINNER_EDGE.min(anchor.width).min(anchor.height);
    let (x, y) = anchor.centered(edge, edge);
    Rect::new(x, y, edge, edge)
}

/// Declares the buttons of every mode and their busy anchors.
#[must_use]
pub fn build(display: Resolution) -> ButtonRegistry {
    let scale = Scale::for_display(display);
    let mut registry = ButtonRegistry::new();

    for mode in ScreenMode::all() {
        let (buttons, anchor) = declare(mode);
        let buttons = buttons
            .into_iter()
            .map(|mut button| {
                button.rect = scale.rect(button.rect);
                button
            })
            .collect();
        registry.declare(mode, buttons);
        if let Some(slot) = anchor {
            registry.set_busy_anchor(mode, slot);
        }
    }
    registry
}

fn declare(mode: ScreenMode) -> (Vec<Button>, Option<usize>) {
    match mode {
        ScreenMode::Viewfinder => (
            vec![
                Button::new(Rect::new(20, 408, 156, 52))
                    .background(IconKey::Gear)
                    .action(Action::OpenSettings),
                Button::new(Rect::new(624, 408, 156, 52))
                    .background(IconKey::Play)
                    .action(Action::Review),
                // Anywhere else on the live image releases the shutter.
                Button::new(FULL).action(Action::Capture),
                // Drawn last so the spinner sits on the live image; never
                // reached by hit-testing.
                Button::new(WORKING),
            ],
            Some(3),
        ),
        ScreenMode::Playback => (
            vec![
                Button::new(DONE).background(IconKey::Done).action(Action::Done),
                Button::new(PREV)
                    .background(IconKey::Prev)
                    .action(Action::Navigate(Direction::Backward)),
                Button::new(NEXT)
                    .background(IconKey::Next)
                    .action(Action::Navigate(Direction::Forward)),
                Button::new(WORKING),
                Button::new(Rect::new(361, 20, 78, 52))
                    .background(IconKey::Trash)
                    .action(Action::Trash),
            ],
            Some(3),
        ),
        ScreenMode::DeleteConfirm => (
            vec![
                Button::new(Rect::new(0, 140, 800, 33)).background(IconKey::Delete),
                Button::new(Rect::new(270, 190, 120, 100))
                    .background(IconKey::YesNo)
                    .foreground(IconKey::Yes)
                    .action(Action::ConfirmDelete(true)),
                Button::new(Rect::new(410, 190, 120, 100))
                    .background(IconKey::YesNo)
                    .foreground(IconKey::No)
                    .action(Action::ConfirmDelete(false)),
            ],
            None,
        ),
        ScreenMode::NoImages => (
            vec![
                Button::new(FULL).action(Action::Done),
                Button::new(Rect::new(240, 275, 320, 52)).background(IconKey::Done),
                Button::new(Rect::new(240, 140, 320, 80)).background(IconKey::Empty),
            ],
            None,
        ),
        ScreenMode::Settings(page) => (settings_page(page), None),
    }
}

fn settings_page(page: SettingsPage) -> Vec<Button> {
    let title = match page {
        SettingsPage::Storage => IconKey::Storage,
        SettingsPage::Size => IconKey::Size,
        SettingsPage::Effect => IconKey::Fx,
        SettingsPage::Iso => IconKey::Iso,
        SettingsPage::Quit => IconKey::Quit,
    };
    let mut buttons = vec![
        Button::new(DONE).background(IconKey::Done).action(Action::Done),
        Button::new(PREV)
            .background(IconKey::Prev)
            .action(Action::SettingsPage(Direction::Backward)),
        Button::new(NEXT)
            .background(IconKey::Next)
            .action(Action::SettingsPage(Direction::Forward)),
        Button::new(Rect::new(240, 20, 320, 52)).background(title),
    ];

    match page {
        SettingsPage::Storage => buttons.extend(three_options(
            StorageTarget::ALL
                .iter()
                .map(|&t| (storage_icon(t), Action::SelectStorage(t))),
        )),
        SettingsPage::Size => buttons.extend(three_options(
            SizeMode::ALL
                .iter()
                .map(|&s| (size_icon(s), Action::SelectSize(s))),
        )),
        SettingsPage::Effect => buttons.extend(grid(
            FxMode::ALL
                .iter()
                .map(|&fx| (IconKey::Effect(fx), Action::SelectEffect(fx))),
        )),
        SettingsPage::Iso => buttons.extend(grid(
            IsoMode::ALL
                .iter()
                .map(|&iso| (IconKey::IsoValue(iso), Action::SelectIso(iso))),
        )),
        SettingsPage::Quit => buttons.push(
            Button::new(Rect::new(250, 150, 300, 150))
                .background(IconKey::QuitOk)
                .action(Action::Quit),
        ),
    }
    buttons
}

fn option(rect: Rect, icon: IconKey, action: Action) -> Button {
    Button::new(rect)
        .background(IconKey::RadioOff)
        .foreground(icon)
        .action(action)
}

fn three_options(items: impl Iterator<Item = (IconKey, Action)>) -> Vec<Button> {
    items
        .enumerate()
        .map(|(i, (icon, action))| option(Rect::new(20 + i as i32 * 260, 140, 240, 220), icon, action))
        .collect()
}

/// Four columns, two rows.
fn grid(items: impl Iterator<Item = (IconKey, Action)>) -> Vec<Button> {
    items
        .enumerate()
        .map(|(i, (icon, action))| {
            let (column, row) = ((i % 4) as i32, (i / 4) as i32);
            let rect = Rect::new(20 + column * 195, 90 + row * 145, 180, 130);
            option(rect, icon, action)
        })
        .collect()
}

fn storage_icon(target: StorageTarget) -> IconKey {
    match target {
        StorageTarget::Photos => IconKey::StoreFolder,
        StorageTarget::BootPartition => IconKey::StoreBoot,
        StorageTarget::SyncFolder => IconKey::StoreSync,
    }
}

fn size_icon(size: SizeMode) -> IconKey {
    match size {
        SizeMode::Large => IconKey::SizeLarge,
        SizeMode::Medium => IconKey::SizeMedium,
        SizeMode::Small => IconKey::SizeSmall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action_at(registry: &ButtonRegistry, mode: ScreenMode, x: i32, y: i32) -> Option<Action> {
        registry
            .hit_test(mode, x, y)
            .and_then(ButtonRegistry::activate)
    }

    #[test]
    fn every_mode_is_declared() {
        let registry = build(DESIGN_SIZE);
        for mode in ScreenMode::all() {
            assert!(!registry.buttons(mode).is_empty(), "{mode:?} has no buttons");
        }
    }

    #[test]
    fn viewfinder_buttons_win_over_shutter() {
        let registry = build(DESIGN_SIZE);
        let mode = ScreenMode::Viewfinder;
        assert_eq!(action_at(&registry, mode, 30, 420), Some(Action::OpenSettings));
        assert_eq!(action_at(&registry, mode, 700, 420), Some(Action::Review));
        assert_eq!(action_at(&registry, mode, 400, 100), Some(Action::Capture));
        // The centre of the live image, under the busy anchor, still shoots.
        assert_eq!(action_at(&registry, mode, 400, 240), Some(Action::Capture));
    }

    #[test]
    fn busy_anchors_point_at_working_slot() {
        let registry = build(DESIGN_SIZE);
        for mode in [ScreenMode::Viewfinder, ScreenMode::Playback] {
            let slot = registry.busy_anchor(mode).expect("anchor");
            assert_eq!(registry.button(mode, slot).unwrap().rect, WORKING);
        }
        assert_eq!(spinner_rect(WORKING), Rect::new(389, 229, 22, 22));
    }

    #[test]
    fn no_images_screen_is_one_big_done_button() {
        let registry = build(DESIGN_SIZE);
        for (x, y) in [(0, 0), (799, 479), (400, 300)] {
            assert_eq!(action_at(&registry, ScreenMode::NoImages, x, y), Some(Action::Done));
        }
    }

    #[test]
    fn settings_grid_offers_every_effect_and_iso() {
        let registry = build(DESIGN_SIZE);
        let effects: Vec<_> = registry
            .buttons(ScreenMode::Settings(SettingsPage::Effect))
            .iter()
            .filter_map(|b| match b.action {
                Some(Action::SelectEffect(fx)) => Some(fx),
                _ => None,
            })
            .collect();
        assert_eq!(effects, FxMode::ALL.to_vec());

        let iso_page = ScreenMode::Settings(SettingsPage::Iso);
        assert_eq!(
            action_at(&registry, iso_page, 20 + 3 * 195 + 10, 235 + 10),
            Some(Action::SelectIso(IsoMode::Iso800))
        );
    }

    #[test]
    fn layout_scales_to_display() {
        let registry = build(Resolution::new(400, 240));
        let done = registry.button(ScreenMode::Playback, 0).unwrap();
        assert_eq!(done.rect, Rect::new(100, 204, 200, 26));
    }
}
