// SPDX-License-Identifier: MPL-2.0
//! User-editable configuration stored in `settings.toml`.
//!
//! # Configuration Sections
//!
//! - `[storage]` - target directories and the owner of created files
//! - `[capture]` - dwell, spinner and alert timings
//! - `[display]` - panel size and framebuffer output
//! - `[input]` - touch device and its raw axis range
//! - `[system]` - icon directory and helper process
//!
//! Every section and field is optional; missing values take the defaults in
//! [`defaults`]. Out-of-range numbers are clamped when read through the
//! accessor methods, never rejected.
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. `--config-dir` or `TOUCHCAM_CONFIG_DIR`, see [`paths`]
//! 3. Falls back to the platform config directory
//!
//! # Examples
//!
//! ```no_run
//! use touchcam::app::config;
//!
//! let (config, warning) = config::load();
//! if let Some(warning) = warning {
//!     eprintln!("{warning}");
//! }
//! println!("photos go to {}", config.storage.photos.display());
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::capture::Timing;
use crate::domain::capture::Resolution;
use crate::error::{Error, Result};
use crate::storage::{Ownership, StoragePaths};
use crate::touch::AxisScale;
use crate::ui::PixelFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// Where photos are written and who owns them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub photos: PathBuf,
    pub boot_partition: PathBuf,
    pub sync_folder: PathBuf,

    /// Owner of created files. Falls back to `SUDO_UID`, then to the
    /// process identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_uid: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_gid: Option<u32>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            photos: PathBuf::from(DEFAULT_PHOTOS_DIR),
            boot_partition: PathBuf::from(DEFAULT_BOOT_DIR),
            sync_folder: PathBuf::from(DEFAULT_SYNC_DIR),
            owner_uid: None,
            owner_gid: None,
        }
    }
}

/// Capture and feedback timings, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CaptureConfig {
    pub dwell_ms: u64,
    pub spinner_interval_ms: u64,
    pub alert_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            dwell_ms: DEFAULT_DWELL_MS,
            spinner_interval_ms: DEFAULT_SPINNER_INTERVAL_MS,
            alert_ms: DEFAULT_ALERT_MS,
        }
    }
}

/// Panel geometry and output device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,

    /// Framebuffer device. Without one the UI is rendered headless.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framebuffer: Option<PathBuf>,

    pub pixel_format: PixelFormat,
    pub frame_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_DISPLAY_WIDTH,
            height: DEFAULT_DISPLAY_HEIGHT,
            framebuffer: None,
            pixel_format: PixelFormat::default(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

/// Touch input source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InputConfig {
    /// Evdev touchscreen. Without one, touches are read from stdin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub touch_device: Option<PathBuf>,

    /// Largest raw `ABS_X`/`ABS_Y` value the touch controller reports.
    /// Without both, raw values are taken as panel pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub touch_max_x: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub touch_max_y: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SystemConfig {
    pub icon_dir: PathBuf,

    /// Process stopped at startup and on quit. Empty or absent disables it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_process: Option<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            icon_dir: PathBuf::from(DEFAULT_ICON_DIR),
            helper_process: Some(DEFAULT_HELPER_PROCESS.to_string()),
        }
    }
}

// =============================================================================
// Main Config Struct
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub capture: CaptureConfig,
    pub display: DisplayConfig,
    pub input: InputConfig,
    pub system: SystemConfig,
}

impl Config {
    #[must_use]
    pub fn storage_paths(&self) -> StoragePaths {
        StoragePaths {
            photos: self.storage.photos.clone(),
            boot_partition: self.storage.boot_partition.clone(),
            sync_folder: self.storage.sync_folder.clone(),
        }
    }

    #[must_use]
    pub fn ownership(&self) -> Ownership {
        Ownership::resolve(self.storage.owner_uid, self.storage.owner_gid)
    }

    /// Capture timings, clamped to `1..=MAX_INTERVAL_MS`.
    #[must_use]
    pub fn timing(&self) -> Timing {
        Timing {
            dwell: interval(self.capture.dwell_ms),
            spinner_interval: interval(self.capture.spinner_interval_ms),
        }
    }

    #[must_use]
    pub fn alert_duration(&self) -> Duration {
        interval(self.capture.alert_ms)
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        interval(self.display.frame_interval_ms)
    }

    /// Mapping from the touch controller's axis range onto the panel.
    #[must_use]
    pub fn touch_scale(&self) -> Option<AxisScale> {
        let (max_x, max_y) = (self.input.touch_max_x?, self.input.touch_max_y?);
        AxisScale::new(max_x, max_y, self.resolution())
    }

    /// Panel size with each edge clamped to the supported range.
    #[must_use]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(
            self.display
                .width
                .clamp(MIN_DISPLAY_EDGE, MAX_DISPLAY_EDGE),
            self.display
                .height
                .clamp(MIN_DISPLAY_EDGE, MAX_DISPLAY_EDGE),
        )
    }

    /// Helper process name, `None` when disabled.
    #[must_use]
    pub fn helper_process(&self) -> Option<&str> {
        self.system
            .helper_process
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

fn interval(ms: u64) -> Duration {
    Duration::from_millis(ms.clamp(1, MAX_INTERVAL_MS))
}

// =============================================================================
// Load Functions
// =============================================================================

fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::config_dir_with_override(base_dir).map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration from the default location.
///
/// Returns defaults plus a warning message if the file exists but cannot be
/// parsed.
#[must_use]
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
#[must_use]
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    return (
                        Config::default(),
                        Some(format!("Ignoring {}: {}", path.display(), err)),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    match config_path_with_override(base_dir) {
        Some(path) => save_to_path(config, &path),
        None => Err(Error::Config("no configuration directory".to_string())),
    }
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
