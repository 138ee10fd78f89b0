// SPDX-License-Identifier: MPL-2.0
//! Config and data directory resolution.
//!
//! # Resolution Order
//!
//! 1. **Explicit override** passed to the `_with_override` functions (tests)
//! 2. **CLI arguments** `--config-dir` / `--data-dir`, see [`init_cli_overrides`]
//! 3. **Environment** `TOUCHCAM_CONFIG_DIR` / `TOUCHCAM_DATA_DIR` (non-empty)
//! 4. **Platform default** from the `dirs` crate, with the app name appended
//!    (`~/.config/touchcam`, `~/.local/share/touchcam` on Linux)

use std::path::PathBuf;
use std::sync::OnceLock;

/// Directory name under the platform config/data directories.
const APP_NAME: &str = "touchcam";

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "TOUCHCAM_DATA_DIR";

/// Environment variable overriding the config directory.
pub const ENV_CONFIG_DIR: &str = "TOUCHCAM_CONFIG_DIR";

static CLI_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();
static CLI_CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Records the directories given on the command line.
///
/// Meant to be called once at startup; later calls are ignored with a
/// warning.
pub fn init_cli_overrides(data_dir: Option<PathBuf>, config_dir: Option<PathBuf>) {
    for (lock, value, flag) in [
        (&CLI_DATA_DIR, data_dir, "--data-dir"),
        (&CLI_CONFIG_DIR, config_dir, "--config-dir"),
    ] {
        if let Some(path) = value {
            if lock.set(path).is_err() {
                log::warn!("{} override already set, ignoring", flag);
            }
        }
    }
}

/// Directory holding `state.cbor`.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    data_dir_with_override(None)
}

/// Directory holding `settings.toml`.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    config_dir_with_override(None)
}

#[must_use]
pub fn data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, &CLI_DATA_DIR, ENV_DATA_DIR, dirs::data_dir)
}

#[must_use]
pub fn config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, &CLI_CONFIG_DIR, ENV_CONFIG_DIR, dirs::config_dir)
}

fn resolve(
    override_path: Option<PathBuf>,
    cli: &OnceLock<PathBuf>,
    env_var: &str,
    platform: fn() -> Option<PathBuf>,
) -> Option<PathBuf> {
    override_path
        .or_else(|| cli.get().cloned())
        .or_else(|| {
            std::env::var_os(env_var)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        })
        .or_else(|| platform().map(|base| base.join(APP_NAME)))
}
