// SPDX-License-Identifier: MPL-2.0
//! Session state persisted across restarts (CBOR).
//!
//! Only choices made on the settings pages are kept: storage target, photo
//! size, effect, ISO and the last settings page. They are written when the
//! user leaves the settings screens and restored at startup. User-editable
//! configuration lives in `settings.toml` instead.
//!
//! Values are stored as string keys so renaming an enum variant never breaks
//! an existing state file; unknown keys fall back to defaults.

use super::paths;
use crate::controller::Session;
use crate::domain::capture::{FxMode, IsoMode, SizeMode};
use crate::domain::screen::SettingsPage;
use crate::domain::storage::StorageTarget;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

/// State file name within the data directory.
const STATE_FILE: &str = "state.cbor";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionState {
    #[serde(default)]
    pub settings_page: Option<String>,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub iso: Option<String>,
}

impl SessionState {
    /// Snapshot of the persistent part of a session.
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            settings_page: Some(session.settings_page.key().to_string()),
            storage: Some(session.storage.key().to_string()),
            size: Some(session.capture.size.key().to_string()),
            effect: Some(session.capture.fx.key().to_string()),
            iso: Some(session.capture.iso.key().to_string()),
        }
    }

    /// Restores the stored choices into `session`, keeping the current value
    /// for anything missing or unrecognised.
    pub fn apply_to(&self, session: &mut Session) {
        fn restore<T>(key: &Option<String>, parse: fn(&str) -> Option<T>, slot: &mut T) {
            if let Some(key) = key {
                match parse(key) {
                    Some(value) => *slot = value,
                    None => log::warn!("Ignoring unknown persisted value '{}'", key),
                }
            }
        }

        restore(&self.settings_page, SettingsPage::from_key, &mut session.settings_page);
        restore(&self.storage, StorageTarget::from_key, &mut session.storage);
        restore(&self.size, SizeMode::from_key, &mut session.capture.size);
        restore(&self.effect, FxMode::from_key, &mut session.capture.fx);
        restore(&self.iso, IsoMode::from_key, &mut session.capture.iso);
    }

    /// Loads the state, returning defaults plus a warning when the file is
    /// unreadable or corrupt. A missing file is not an error.
    #[must_use]
    pub fn load_from(base_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let Some(path) = Self::state_file(base_dir) else {
            return (Self::default(), None);
        };
        if !path.exists() {
            return (Self::default(), None);
        }

        match fs::File::open(&path) {
            Ok(file) => match ciborium::from_reader(BufReader::new(file)) {
                Ok(state) => (state, None),
                Err(err) => (
                    Self::default(),
                    Some(format!("Corrupt state file {}: {}", path.display(), err)),
                ),
            },
            Err(err) => (
                Self::default(),
                Some(format!("Cannot read {}: {}", path.display(), err)),
            ),
        }
    }

    /// Writes the state, creating the data directory if needed. Returns a
    /// warning on failure.
    #[must_use]
    pub fn save_to(&self, base_dir: Option<PathBuf>) -> Option<String> {
        let Some(path) = Self::state_file(base_dir) else {
            return Some("No data directory for session state".to_string());
        };
        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                return Some(format!("Cannot create {}: {}", parent.display(), err));
            }
        }

        match fs::File::create(&path) {
            Ok(file) => ciborium::into_writer(self, BufWriter::new(file))
                .err()
                .map(|err| format!("Cannot write {}: {}", path.display(), err)),
            Err(err) => Some(format!("Cannot create {}: {}", path.display(), err)),
        }
    }

    fn state_file(base_dir: Option<PathBuf>) -> Option<PathBuf> {
        paths::data_dir_with_override(base_dir).map(|dir| dir.join(STATE_FILE))
    }
}
