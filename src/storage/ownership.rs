// SPDX-License-Identifier: MPL-2.0
//! Ownership and permission policy for created directories and photos.
//!
//! The controller usually runs privileged (framebuffer, input devices), but
//! the photos belong to the regular user who started it. Directories get
//! `rwxr-xr-x`, files `rw-r--r--`, and both are handed to the configured
//! user/group, or to the invoking user when started through `sudo`.

use std::io;
use std::path::Path;

/// Mode of created storage directories (`rwxr-xr-x`).
pub const DIR_MODE: u32 = 0o755;

/// Mode of committed photos (`rw-r--r--`).
pub const FILE_MODE: u32 = 0o644;

/// Environment variables set by `sudo` with the invoking identity.
const SUDO_UID: &str = "SUDO_UID";
const SUDO_GID: &str = "SUDO_GID";

/// User and group that should own created artifacts.
///
/// `None` keeps the current process identity, which needs no `chown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ownership {
    uid: Option<u32>,
    gid: Option<u32>,
}

impl Ownership {
    #[must_use]
    pub fn new(uid: Option<u32>, gid: Option<u32>) -> Self {
        Self { uid, gid }
    }

    /// Keeps whatever identity the process runs as.
    #[must_use]
    pub fn process() -> Self {
        Self::default()
    }

    /// Resolves the owner: explicit overrides first, then the `sudo`
    /// environment, then the current process identity.
    #[must_use]
    pub fn resolve(uid_override: Option<u32>, gid_override: Option<u32>) -> Self {
        Self {
            uid: uid_override.or_else(|| env_id(SUDO_UID)),
            gid: gid_override.or_else(|| env_id(SUDO_GID)),
        }
    }

    #[must_use]
    pub fn uid(&self) -> Option<u32> {
        self.uid
    }

    #[must_use]
    pub fn gid(&self) -> Option<u32> {
        self.gid
    }

    /// Applies the directory mode and ownership.
    pub fn apply_to_dir(&self, path: &Path) -> io::Result<()> {
        set_mode(path, DIR_MODE)?;
        self.chown(path)
    }

    /// Applies the file mode and ownership.
    pub fn apply_to_file(&self, path: &Path) -> io::Result<()> {
        set_mode(path, FILE_MODE)?;
        self.chown(path)
    }

    #[cfg(unix)]
    fn chown(&self, path: &Path) -> io::Result<()> {
        if self.uid.is_none() && self.gid.is_none() {
            return Ok(());
        }
        std::os::unix::fs::chown(path, self.uid, self.gid)
    }

    #[cfg(not(unix))]
    fn chown(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

fn env_id(var: &str) -> Option<u32> {
    std::env::var(var).ok()?.trim().parse().ok()
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
