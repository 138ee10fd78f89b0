// SPDX-License-Identifier: MPL-2.0
//! Photo storage: naming convention, index bookkeeping and file policy.
//!
//! Photos live in one of a fixed set of [`StorageTarget`] directories and are
//! named `IMG_####.JPG`. The [`ImageStore`] scans those directories, allocates
//! the next free slot, stages and commits captured files, and deletes photos.

mod image_store;
mod ownership;

pub use image_store::ImageStore;
pub use ownership::{Ownership, DIR_MODE, FILE_MODE};

use crate::domain::storage::StorageTarget;
use std::path::{Path, PathBuf};

/// Absolute directory of every storage target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub photos: PathBuf,
    pub boot_partition: PathBuf,
    pub sync_folder: PathBuf,
}

impl StoragePaths {
    /// Returns the directory configured for `target`.
    #[must_use]
    pub fn get(&self, target: StorageTarget) -> &Path {
        match target {
            StorageTarget::Photos => &self.photos,
            StorageTarget::BootPartition => &self.boot_partition,
            StorageTarget::SyncFolder => &self.sync_folder,
        }
    }

    /// Uses the same directory for every target (tests, single-folder setups).
    #[must_use]
    pub fn uniform(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            photos: path.clone(),
            boot_partition: path.clone(),
            sync_folder: path,
        }
    }
}
