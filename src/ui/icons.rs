// SPDX-License-Identifier: MPL-2.0
//! UI bitmaps loaded from the icon directory.
//!
//! Every `*.png` or `*.svg` in the directory is registered under its file
//! stem, parsed into an [`IconKey`]. Unknown stems are skipped and a missing
//! icon just draws nothing, so a partial icon set still yields a usable UI.
//!
//! # Naming Convention
//!
//! Stems describe the picture, not the action (`trash`, not `delete_image`).
//! Parameterised icons use a prefix: `fx-<effect>`, `iso-<value>`.

use crate::domain::capture::{FxMode, IsoMode};
use resvg::usvg;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Identifies one UI bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKey {
    Done,
    Prev,
    Next,
    Trash,
    Delete,
    /// Background of the yes/no buttons.
    YesNo,
    Yes,
    No,
    Empty,
    Gear,
    Play,
    Working,
    /// Settings page titles.
    Storage,
    Size,
    Fx,
    Iso,
    Quit,
    QuitOk,
    RadioOn,
    RadioOff,
    StoreFolder,
    StoreBoot,
    StoreSync,
    SizeLarge,
    SizeMedium,
    SizeSmall,
    Effect(FxMode),
    IsoValue(IsoMode),
    Error,
}

impl IconKey {
    /// Parses a file stem (`"done"`, `"fx-sketch"`, `"iso-400"`).
    #[must_use]
    pub fn from_stem(stem: &str) -> Option<Self> {
        if let Some(name) = stem.strip_prefix("fx-") {
            return FxMode::from_key(name).map(IconKey::Effect);
        }
        if let Some(value) = stem.strip_prefix("iso-") {
            return IsoMode::from_key(value).map(IconKey::IsoValue);
        }
        let key = match stem {
            "done" => IconKey::Done,
            "prev" => IconKey::Prev,
            "next" => IconKey::Next,
            "trash" => IconKey::Trash,
            "delete" => IconKey::Delete,
            "yn" => IconKey::YesNo,
            "yes" => IconKey::Yes,
            "no" => IconKey::No,
            "empty" => IconKey::Empty,
            "gear" => IconKey::Gear,
            "play" => IconKey::Play,
            "working" => IconKey::Working,
            "storage" => IconKey::Storage,
            "size" => IconKey::Size,
            "fx" => IconKey::Fx,
            "iso" => IconKey::Iso,
            "quit" => IconKey::Quit,
            "quit-ok" => IconKey::QuitOk,
            "radio-on" => IconKey::RadioOn,
            "radio-off" => IconKey::RadioOff,
            "store-folder" => IconKey::StoreFolder,
            "store-boot" => IconKey::StoreBoot,
            "store-sync" => IconKey::StoreSync,
            "size-l" => IconKey::SizeLarge,
            "size-m" => IconKey::SizeMedium,
            "size-s" => IconKey::SizeSmall,
            "error" => IconKey::Error,
            _ => return None,
        };
        Some(key)
    }
}

/// Bitmaps indexed by [`IconKey`]. Cloning is cheap; bitmaps are shared.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    icons: HashMap<IconKey, Arc<Pixmap>>,
}

impl IconSet {
    /// Loads every recognised icon in `dir`.
    ///
    /// A missing directory yields an empty set. Unreadable files are logged
    /// and skipped.
    #[must_use]
    pub fn load(dir: &Path) -> Self {
        let mut set = Self::default();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Icon directory {} unavailable: {}", dir.display(), err);
                return set;
            }
        };

        for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(key) = IconKey::from_stem(stem) else {
                log::debug!("Ignoring unrecognised icon {}", path.display());
                continue;
            };
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase);
            let bitmap = match extension.as_deref() {
                Some("png") => Pixmap::load_png(&path).map_err(|e| e.to_string()),
                Some("svg") => rasterize_svg(&path),
                _ => continue,
            };
            match bitmap {
                // PNG wins over SVG when both exist.
                Ok(pixmap) if extension.as_deref() == Some("png") || !set.contains(key) => {
                    set.insert(key, pixmap);
                }
                Ok(_) => {}
                Err(err) => log::warn!("Could not load icon {}: {}", path.display(), err),
            }
        }

        log::info!("Loaded {} icons from {}", set.len(), dir.display());
        set
    }

    pub fn insert(&mut self, key: IconKey, pixmap: Pixmap) {
        self.icons.insert(key, Arc::new(pixmap));
    }

    /// Returns the bitmap for `key`; `None` (and a debug log) if it is absent.
    #[must_use]
    pub fn get(&self, key: IconKey) -> Option<&Pixmap> {
        let icon = self.icons.get(&key).map(Arc::as_ref);
        if icon.is_none() {
            log::debug!("Icon missing: {:?}", key);
        }
        icon
    }

    #[must_use]
    pub fn contains(&self, key: IconKey) -> bool {
        self.icons.contains_key(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Renders an SVG at its intrinsic size.
fn rasterize_svg(path: &Path) -> Result<Pixmap, String> {
    let data = fs::read(path).map_err(|e| e.to_string())?;
    let tree = usvg::Tree::from_data(&data, &usvg::Options::default()).map_err(|e| e.to_string())?;

    let size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(size.width(), size.height())
        .ok_or_else(|| "SVG has zero size".to_string())?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}
