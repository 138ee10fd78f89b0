// SPDX-License-Identifier: MPL-2.0
//! Index bookkeeping for `IMG_####.JPG` photos.
//!
//! The directory may change behind our back (files copied in over USB, a
//! sync client deleting photos), so every existence check hits the
//! filesystem; the only cached value is the save cursor, which moves past
//! every committed photo and never goes back.

use super::{Ownership, StoragePaths};
use crate::domain::storage::{index_bounds, Direction, ImageIndex, StorageTarget};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Scans, allocates, commits and deletes photos in the storage targets.
#[derive(Debug, Clone)]
pub struct ImageStore {
    paths: StoragePaths,
    ownership: Ownership,
    /// Target and next candidate save index. Advanced by every commit,
    /// invalidated by a target change.
    save_cursor: Option<(StorageTarget, ImageIndex)>,
}

impl ImageStore {
    #[must_use]
    pub fn new(paths: StoragePaths, ownership: Ownership) -> Self {
        Self {
            paths,
            ownership,
            save_cursor: None,
        }
    }

    /// Directory of a storage target.
    #[must_use]
    pub fn directory(&self, target: StorageTarget) -> &Path {
        self.paths.get(target)
    }

    /// Final path of a photo.
    #[must_use]
    pub fn image_path(&self, target: StorageTarget, index: ImageIndex) -> PathBuf {
        self.directory(target).join(index.file_name())
    }

    /// Temporary path a capture is written to before [`ImageStore::commit`].
    ///
    /// The hidden name never matches the `IMG_####.JPG` pattern, so a
    /// half-written file is never listed as a photo.
    #[must_use]
    pub fn staging_path(&self, target: StorageTarget, index: ImageIndex) -> PathBuf {
        self.directory(target)
            .join(format!(".{}.part", index.file_name()))
    }

    /// Whether the photo file for `index` currently exists.
    #[must_use]
    pub fn exists(&self, target: StorageTarget, index: ImageIndex) -> bool {
        self.image_path(target, index).is_file()
    }

    /// Lowest and highest photo index in the target directory.
    ///
    /// Returns `None` when no file matches the naming convention, and also
    /// when the directory is missing or unreadable.
    #[must_use]
    pub fn scan_range(&self, target: StorageTarget) -> Option<(ImageIndex, ImageIndex)> {
        let entries = fs::read_dir(self.directory(target)).ok()?;

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(ImageIndex::parse_file_name)
            })
            .fold(None, |range, index| match range {
                None => Some((index, index)),
                Some((min, max)) => Some((min.min(index), max.max(index))),
            })
    }

    /// Creates the target directory (with parents) and applies the directory
    /// ownership policy. A policy that cannot be applied is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the directory cannot be
    /// created.
    pub fn ensure_directory(&self, target: StorageTarget) -> Result<()> {
        let dir = self.directory(target);
        if dir.is_dir() {
            return Ok(());
        }

        fs::create_dir_all(dir).map_err(|e| Error::storage(dir, e))?;
        if let Err(err) = self.ownership.apply_to_dir(dir) {
            log::warn!("Could not apply directory policy to {}: {}", dir.display(), err);
        }
        log::info!("Created storage directory {}", dir.display());
        Ok(())
    }

    /// Returns the next free save index for `target`.
    ///
    /// The directory is scanned only on the first allocation for a target or
    /// after the target changed; otherwise probing restarts from the cached
    /// index. Probing always checks the filesystem, so an index whose file
    /// exists is never returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] when all 10000 slots are taken.
    pub fn allocate_next_index(&mut self, target: StorageTarget) -> Result<ImageIndex> {
        let mut candidate = match self.save_cursor {
            Some((cached_target, index)) if cached_target == target => index,
            _ => match self.scan_range(target) {
                Some((_, max)) => max.wrapping_next(),
                None => ImageIndex::new(1).unwrap_or(ImageIndex::FIRST),
            },
        };

        for _ in 0..index_bounds::SLOTS {
            if !self.exists(target, candidate) {
                self.save_cursor = Some((target, candidate));
                return Ok(candidate);
            }
            candidate = candidate.wrapping_next();
        }

        Err(Error::storage(
            self.directory(target),
            "every IMG_####.JPG slot is taken",
        ))
    }

    /// Moves a staged capture to its final name and applies the file policy.
    ///
    /// The final name is re-validated here rather than trusted from
    /// allocation time. On success the save cursor moves past `index`, so a
    /// number is not handed out again even if its photo is deleted later. On
    /// any failure the staged file is removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the staged file is missing or
    /// empty (disk full), if the slot got taken meanwhile, or if the rename
    /// fails.
    pub fn commit(
        &mut self,
        target: StorageTarget,
        index: ImageIndex,
        staged: &Path,
    ) -> Result<PathBuf> {
        let final_path = self.image_path(target, index);

        if let Err(err) = self.move_into_place(staged, &final_path) {
            self.discard(staged);
            return Err(err);
        }
        self.save_cursor = Some((target, index.wrapping_next()));

        if let Err(err) = self.ownership.apply_to_file(&final_path) {
            log::warn!(
                "Could not apply file policy to {}: {}",
                final_path.display(),
                err
            );
        }
        Ok(final_path)
    }

    fn move_into_place(&self, staged: &Path, final_path: &Path) -> Result<()> {
        let written = fs::metadata(staged)
            .map_err(|e| Error::storage(staged, e))?
            .len();
        if written == 0 {
            return Err(Error::storage(staged, "capture wrote an empty file"));
        }
        if final_path.exists() {
            return Err(Error::storage(final_path, "slot was taken by another writer"));
        }
        fs::rename(staged, final_path).map_err(|e| Error::storage(final_path, e))
    }

    /// Removes a staged file, ignoring a file that was never created.
    pub fn discard(&self, staged: &Path) {
        if let Err(err) = fs::remove_file(staged) {
            if err.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Could not remove {}: {}", staged.display(), err);
            }
        }
    }

    /// Deletes a photo. The caller re-derives the browsing position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the file cannot be removed.
    pub fn delete(&self, target: StorageTarget, index: ImageIndex) -> Result<()> {
        let path = self.image_path(target, index);
        fs::remove_file(&path).map_err(|e| Error::storage(&path, e))?;
        log::info!("Deleted {}", path.display());
        Ok(())
    }

    /// Finds the nearest existing photo from `from` in `direction`, wrapping
    /// between 0 and 9999.
    ///
    /// With no starting point the search starts just outside the range, so
    /// forward finds the lowest index and backward the highest. `from` itself
    /// is the last candidate. Returns `None` after one full lap without a
    /// match.
    #[must_use]
    pub fn find_adjacent(
        &self,
        target: StorageTarget,
        from: Option<ImageIndex>,
        direction: Direction,
    ) -> Option<ImageIndex> {
        let mut current = from.unwrap_or(match direction {
            Direction::Forward => ImageIndex::LAST,
            Direction::Backward => ImageIndex::FIRST,
        });

        for _ in 0..index_bounds::SLOTS {
            current = current.step(direction);
            if self.exists(target, current) {
                return Some(current);
            }
        }
        None
    }
}
