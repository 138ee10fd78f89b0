// SPDX-License-Identifier: MPL-2.0
//! Screen modes, touch geometry and button actions.

use super::capture::{FxMode, IsoMode, SizeMode};
use super::storage::{Direction, StorageTarget};

// =============================================================================
// Rect
// =============================================================================

/// Axis-aligned screen rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right-most pixel column that still belongs to the rectangle.
    #[must_use]
    pub fn right(self) -> i32 {
        self.x + self.width as i32 - 1
    }

    /// Bottom-most pixel row that still belongs to the rectangle.
    #[must_use]
    pub fn bottom(self) -> i32 {
        self.y + self.height as i32 - 1
    }

    /// Inclusive containment: points on any of the four edges are inside.
    #[must_use]
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Top-left position that centers an item of the given size inside the
    /// rectangle. The item may overflow; the offset is then negative.
    #[must_use]
    pub fn centered(self, width: u32, height: u32) -> (i32, i32) {
        (
            self.x + (self.width as i32 - width as i32) / 2,
            self.y + (self.height as i32 - height as i32) / 2,
        )
    }
}

// =============================================================================
// Screen modes
// =============================================================================

/// Settings pages, cycled with the prev/next arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SettingsPage {
    #[default]
    Storage,
    Size,
    Effect,
    Iso,
    Quit,
}

impl SettingsPage {
    pub const ALL: [SettingsPage; 5] = [
        SettingsPage::Storage,
        SettingsPage::Size,
        SettingsPage::Effect,
        SettingsPage::Iso,
        SettingsPage::Quit,
    ];

    /// Neighbouring page, wrapping around at both ends.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let len = Self::ALL.len() as i32;
        let position = Self::ALL.iter().position(|p| *p == self).unwrap_or(0) as i32;
        let next = (position + direction.signum()).rem_euclid(len);
        Self::ALL[next as usize]
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            SettingsPage::Storage => "storage",
            SettingsPage::Size => "size",
            SettingsPage::Effect => "effect",
            SettingsPage::Iso => "iso",
            SettingsPage::Quit => "quit",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.key() == key)
    }
}

/// The screen currently shown. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenMode {
    #[default]
    Viewfinder,
    Playback,
    DeleteConfirm,
    NoImages,
    Settings(SettingsPage),
}

/// What the render loop paints behind the buttons of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// Live frames from the capture device.
    LiveFrame,
    /// The last image loaded for review.
    LoadedImage,
    /// Plain black.
    Empty,
}

impl ScreenMode {
    /// Every mode, settings pages included.
    #[must_use]
    pub fn all() -> Vec<ScreenMode> {
        let mut modes = vec![
            ScreenMode::Viewfinder,
            ScreenMode::Playback,
            ScreenMode::DeleteConfirm,
            ScreenMode::NoImages,
        ];
        modes.extend(SettingsPage::ALL.into_iter().map(ScreenMode::Settings));
        modes
    }

    #[must_use]
    pub fn background(self) -> Background {
        match self {
            ScreenMode::Viewfinder | ScreenMode::Settings(_) => Background::LiveFrame,
            ScreenMode::Playback | ScreenMode::DeleteConfirm => Background::LoadedImage,
            ScreenMode::NoImages => Background::Empty,
        }
    }
}

// =============================================================================
// Actions
// =============================================================================

/// What activating a button asks the mode controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Capture,
    OpenSettings,
    Review,
    Navigate(Direction),
    Trash,
    ConfirmDelete(bool),
    Done,
    SettingsPage(Direction),
    SelectStorage(StorageTarget),
    SelectSize(SizeMode),
    SelectEffect(FxMode),
    SelectIso(IsoMode),
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive_on_all_edges() {
        let rect = Rect::new(20, 20, 80, 52);
        assert!(rect.contains(20, 20));
        assert!(rect.contains(99, 71));
        assert!(rect.contains(20, 71));
        assert!(rect.contains(99, 20));
        assert!(!rect.contains(100, 20));
        assert!(!rect.contains(20, 72));
        assert!(!rect.contains(19, 40));
        assert!(!rect.contains(40, 19));
    }

    #[test]
    fn centered_offsets_item() {
        let rect = Rect::new(200, 408, 400, 52);
        assert_eq!(rect.centered(100, 40), (350, 414));
        assert_eq!(rect.centered(400, 52), (200, 408));
    }

    #[test]
    fn settings_pages_cycle() {
        assert_eq!(
            SettingsPage::Quit.step(Direction::Forward),
            SettingsPage::Storage
        );
        assert_eq!(
            SettingsPage::Storage.step(Direction::Backward),
            SettingsPage::Quit
        );
        assert_eq!(SettingsPage::Size.step(Direction::Forward), SettingsPage::Effect);
    }

    #[test]
    fn all_modes_are_distinct() {
        let modes = ScreenMode::all();
        assert_eq!(modes.len(), 9);
        for (i, a) in modes.iter().enumerate() {
            for b in &modes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn backgrounds_follow_mode() {
        assert_eq!(ScreenMode::Viewfinder.background(), Background::LiveFrame);
        assert_eq!(
            ScreenMode::Settings(SettingsPage::Iso).background(),
            Background::LiveFrame
        );
        assert_eq!(ScreenMode::DeleteConfirm.background(), Background::LoadedImage);
        assert_eq!(ScreenMode::NoImages.background(), Background::Empty);
    }
}
