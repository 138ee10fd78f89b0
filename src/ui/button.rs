// SPDX-License-Identifier: MPL-2.0
//! Touch buttons and the per-mode button registry.

use super::canvas::{Canvas, Color};
use super::icons::{IconKey, IconSet};
use crate::domain::screen::{Action, Rect, ScreenMode};
use std::collections::HashMap;

/// A rectangular touch target.
///
/// A button without an action is a label (or a placeholder slot such as the
/// busy anchor) and never reacts to touch.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pub fill: Option<Color>,
    pub background: Option<IconKey>,
    pub foreground: Option<IconKey>,
    pub action: Option<Action>,
}

impl Button {
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            fill: None,
            background: None,
            foreground: None,
            action: None,
        }
    }

    #[must_use]
    pub fn background(mut self, icon: IconKey) -> Self {
        self.background = Some(icon);
        self
    }

    #[must_use]
    pub fn foreground(mut self, icon: IconKey) -> Self {
        self.foreground = Some(icon);
        self
    }

    #[must_use]
    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Inclusive hit test.
    #[must_use]
    pub fn selected(&self, x: i32, y: i32) -> bool {
        self.rect.contains(x, y)
    }

    /// Fill, then background icon, then foreground icon, each centered.
    pub fn draw(&self, canvas: &mut Canvas, icons: &IconSet) {
        if let Some(color) = self.fill {
            canvas.fill_rect(self.rect, color);
        }
        for key in [self.background, self.foreground].into_iter().flatten() {
            if let Some(bitmap) = icons.get(key) {
                canvas.blit_centered(bitmap, self.rect);
            }
        }
    }
}

/// Button sets declared per screen mode.
#[derive(Debug, Clone, Default)]
pub struct ButtonRegistry {
    modes: HashMap<ScreenMode, Vec<Button>>,
    busy_anchors: HashMap<ScreenMode, usize>,
}

impl ButtonRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the buttons of `mode`, replacing any previous declaration.
    pub fn declare(&mut self, mode: ScreenMode, buttons: Vec<Button>) {
        self.modes.insert(mode, buttons);
    }

    /// Marks the button at `slot` as the place the busy indicator is shown.
    pub fn set_busy_anchor(&mut self, mode: ScreenMode, slot: usize) {
        self.busy_anchors.insert(mode, slot);
    }

    #[must_use]
    pub fn buttons(&self, mode: ScreenMode) -> &[Button] {
        self.modes.get(&mode).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn button(&self, mode: ScreenMode, slot: usize) -> Option<&Button> {
        self.buttons(mode).get(slot)
    }

    /// First button of `mode` whose rectangle contains the point.
    #[must_use]
    pub fn hit_test(&self, mode: ScreenMode, x: i32, y: i32) -> Option<&Button> {
        self.buttons(mode).iter().find(|b| b.selected(x, y))
    }

    /// The action of a touched button; labels yield `None`.
    #[must_use]
    pub fn activate(button: &Button) -> Option<Action> {
        button.action
    }

    /// Draws every button of `mode` in declaration order.
    pub fn draw(&self, mode: ScreenMode, canvas: &mut Canvas, icons: &IconSet) {
        for button in self.buttons(mode) {
            button.draw(canvas, icons);
        }
    }

    /// Overlays the radio-on marker on buttons whose action is currently in
    /// effect.
    pub fn draw_selection(
        &self,
        mode: ScreenMode,
        canvas: &mut Canvas,
        icons: &IconSet,
        is_selected: impl Fn(Action) -> bool,
    ) {
        let Some(marker) = icons.get(IconKey::RadioOn) else {
            return;
        };
        for button in self.buttons(mode) {
            if button.action.is_some_and(&is_selected) {
                canvas.blit_centered(marker, button.rect);
                // The option icon stays on top of the marker.
                if let Some(bitmap) = button.foreground.and_then(|key| icons.get(key)) {
                    canvas.blit_centered(bitmap, button.rect);
                }
            }
        }
    }

    /// Replaces the background icon of one button. Out-of-range slots are
    /// ignored.
    pub fn set_icon(&mut self, mode: ScreenMode, slot: usize, icon: Option<IconKey>) {
        if let Some(button) = self.modes.get_mut(&mode).and_then(|b| b.get_mut(slot)) {
            button.background = icon;
        }
    }

    #[must_use]
    pub fn busy_anchor(&self, mode: ScreenMode) -> Option<usize> {
        self.busy_anchors.get(&mode).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capture::Resolution;
    use crate::domain::storage::Direction;
    use tiny_skia::Pixmap;

    fn registry() -> ButtonRegistry {
        let mut registry = ButtonRegistry::new();
        registry.declare(
            ScreenMode::Playback,
            vec![
                Button::new(Rect::new(200, 408, 400, 52))
                    .background(IconKey::Done)
                    .action(Action::Done),
                Button::new(Rect::new(20, 20, 80, 52))
                    .background(IconKey::Prev)
                    .action(Action::Navigate(Direction::Backward)),
                Button::new(Rect::new(0, 0, 800, 480)),
            ],
        );
        registry.set_busy_anchor(ScreenMode::Playback, 2);
        registry
    }

    #[test]
    fn hit_test_edges_are_inclusive() {
        let registry = registry();
        let mode = ScreenMode::Playback;

        let hit = registry.hit_test(mode, 20, 20).expect("top-left corner");
        assert_eq!(hit.action, Some(Action::Navigate(Direction::Backward)));
        let hit = registry.hit_test(mode, 99, 71).expect("bottom-right corner");
        assert_eq!(hit.action, Some(Action::Navigate(Direction::Backward)));

        // Outside prev but inside the full-screen label.
        let hit = registry.hit_test(mode, 100, 71).expect("label");
        assert_eq!(ButtonRegistry::activate(hit), None);
    }

    #[test]
    fn hit_test_returns_first_match_in_declaration_order() {
        let registry = registry();
        let hit = registry.hit_test(ScreenMode::Playback, 400, 430).unwrap();
        assert_eq!(ButtonRegistry::activate(hit), Some(Action::Done));
    }

    #[test]
    fn undeclared_mode_has_no_buttons() {
        let registry = registry();
        assert!(registry.hit_test(ScreenMode::NoImages, 10, 10).is_none());
        assert!(registry.busy_anchor(ScreenMode::NoImages).is_none());
    }

    #[test]
    fn set_icon_swaps_only_background() {
        let mut registry = registry();
        registry.set_icon(ScreenMode::Playback, 2, Some(IconKey::Working));
        let anchor = registry.button(ScreenMode::Playback, 2).unwrap();
        assert_eq!(anchor.background, Some(IconKey::Working));

        registry.set_icon(ScreenMode::Playback, 2, None);
        assert_eq!(registry.button(ScreenMode::Playback, 2).unwrap().background, None);

        registry.set_icon(ScreenMode::Playback, 99, Some(IconKey::Working));
    }

    #[test]
    fn draw_paints_fill_then_icons() {
        let mut registry = ButtonRegistry::new();
        registry.declare(
            ScreenMode::NoImages,
            vec![Button::new(Rect::new(0, 0, 10, 10))
                .fill(Color::ALERT)
                .background(IconKey::Empty)],
        );
        let mut icons = IconSet::default();
        let mut dot = Pixmap::new(2, 2).unwrap();
        dot.fill(tiny_skia::Color::WHITE);
        icons.insert(IconKey::Empty, dot);

        let mut canvas = Canvas::new(Resolution::new(20, 20)).unwrap();
        registry.draw(ScreenMode::NoImages, &mut canvas, &icons);

        assert_eq!(canvas.pixel(0, 0), Some(Color::ALERT));
        assert_eq!(canvas.pixel(4, 4), Some(Color::WHITE));
        assert_eq!(canvas.pixel(15, 15), Some(Color::BLACK));
    }
}
