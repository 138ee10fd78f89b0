// SPDX-License-Identifier: MPL-2.0
//! Storage value objects.
//!
//! Photos are stored as `IMG_<index>.JPG` where `<index>` is a four digit,
//! zero padded number. [`ImageIndex`] guarantees the index stays in range,
//! so every filename built from it is well formed.

use std::fmt;

// =============================================================================
// ImageIndex
// =============================================================================

/// Image index bounds.
pub mod index_bounds {
    /// Lowest valid index.
    pub const MIN: u16 = 0;
    /// Highest valid index.
    pub const MAX: u16 = 9999;
    /// Number of distinct slots.
    pub const SLOTS: u32 = MAX as u32 + 1;
}

/// Slot number of a photo inside a storage target, guaranteed to be in
/// `0..=9999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageIndex(u16);

impl ImageIndex {
    /// Lowest index (`IMG_0000.JPG`).
    pub const FIRST: ImageIndex = ImageIndex(index_bounds::MIN);
    /// Highest index (`IMG_9999.JPG`).
    pub const LAST: ImageIndex = ImageIndex(index_bounds::MAX);

    /// Creates an index, returning `None` when the value is out of range.
    #[must_use]
    pub fn new(value: u16) -> Option<Self> {
        (value <= index_bounds::MAX).then_some(Self(value))
    }

    /// Returns the raw index value.
    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }

    /// Returns the index after this one, wrapping 9999 to 0.
    #[must_use]
    pub fn wrapping_next(self) -> Self {
        self.step(Direction::Forward)
    }

    /// Steps one slot in the given direction, wrapping at both ends.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Forward if self.0 >= index_bounds::MAX => Self::FIRST,
            Direction::Forward => Self(self.0 + 1),
            Direction::Backward if self.0 == index_bounds::MIN => Self::LAST,
            Direction::Backward => Self(self.0 - 1),
        }
    }

    /// Returns the file name for this index (`IMG_0042.JPG`).
    #[must_use]
    pub fn file_name(self) -> String {
        format!("IMG_{:04}.JPG", self.0)
    }

    /// Parses a file name following the `IMG_####.JPG` convention.
    ///
    /// The match is exact: upper-case prefix and extension, exactly four
    /// ASCII digits.
    #[must_use]
    pub fn parse_file_name(name: &str) -> Option<Self> {
        let digits = name.strip_prefix("IMG_")?.strip_suffix(".JPG")?;
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().and_then(Self::new)
    }
}

impl fmt::Display for ImageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

// =============================================================================
// Direction
// =============================================================================

/// Browsing direction through image slots or settings pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    /// Returns `-1` or `+1`.
    #[must_use]
    pub fn signum(self) -> i32 {
        match self {
            Direction::Backward => -1,
            Direction::Forward => 1,
        }
    }
}

// =============================================================================
// StorageTarget
// =============================================================================

/// One of the fixed directories eligible to hold captured photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageTarget {
    /// Local photos folder in the user's home.
    #[default]
    Photos,
    /// DCIM folder on the removable boot partition.
    BootPartition,
    /// Folder picked up by a sync client.
    SyncFolder,
}

impl StorageTarget {
    /// All targets, in the order they appear on the storage settings page.
    pub const ALL: [StorageTarget; 3] = [
        StorageTarget::Photos,
        StorageTarget::BootPartition,
        StorageTarget::SyncFolder,
    ];

    /// Stable key used in persisted state.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            StorageTarget::Photos => "photos",
            StorageTarget::BootPartition => "boot",
            StorageTarget::SyncFolder => "sync",
        }
    }

    /// Inverse of [`StorageTarget::key`].
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|target| target.key() == key)
    }
}

impl fmt::Display for StorageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_out_of_range() {
        assert!(ImageIndex::new(9999).is_some());
        assert!(ImageIndex::new(10_000).is_none());
    }

    #[test]
    fn file_name_is_zero_padded() {
        let index = ImageIndex::new(7).expect("valid index");
        assert_eq!(index.file_name(), "IMG_0007.JPG");
        assert_eq!(ImageIndex::LAST.file_name(), "IMG_9999.JPG");
    }

    #[test]
    fn parse_file_name_accepts_convention_only() {
        assert_eq!(
            ImageIndex::parse_file_name("IMG_0042.JPG"),
            ImageIndex::new(42)
        );
        assert_eq!(ImageIndex::parse_file_name("IMG_42.JPG"), None);
        assert_eq!(ImageIndex::parse_file_name("IMG_00042.JPG"), None);
        assert_eq!(ImageIndex::parse_file_name("img_0042.jpg"), None);
        assert_eq!(ImageIndex::parse_file_name("IMG_00a2.JPG"), None);
        assert_eq!(ImageIndex::parse_file_name("IMG_+042.JPG"), None);
        assert_eq!(ImageIndex::parse_file_name(".IMG_0042.JPG.part"), None);
    }

    #[test]
    fn step_wraps_at_both_ends() {
        assert_eq!(ImageIndex::LAST.step(Direction::Forward), ImageIndex::FIRST);
        assert_eq!(ImageIndex::FIRST.step(Direction::Backward), ImageIndex::LAST);
        let five = ImageIndex::new(5).expect("valid index");
        assert_eq!(five.step(Direction::Forward).value(), 6);
        assert_eq!(five.step(Direction::Backward).value(), 4);
    }

    #[test]
    fn storage_target_keys_round_trip() {
        for target in StorageTarget::ALL {
            assert_eq!(StorageTarget::from_key(target.key()), Some(target));
        }
        assert_eq!(StorageTarget::from_key("usb"), None);
    }
}
