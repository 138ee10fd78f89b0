// SPDX-License-Identifier: MPL-2.0
//! Default values for every configuration setting.
//!
//! # Categories
//!
//! - **Storage**: target directories
//! - **Timing**: dwell, spinner, alert and frame intervals
//! - **Display**: panel size and framebuffer
//! - **System**: icon directory and helper process

// ==========================================================================
// Storage Defaults
// ==========================================================================

/// Local photos folder.
pub const DEFAULT_PHOTOS_DIR: &str = "/home/pi/Photos";

/// DCIM folder on the boot partition, visible when the card is mounted
/// elsewhere.
pub const DEFAULT_BOOT_DIR: &str = "/boot/DCIM/CANON999";

/// Folder watched by a sync client.
pub const DEFAULT_SYNC_DIR: &str = "/home/pi/Photos";

// ==========================================================================
// Timing Defaults
// ==========================================================================

/// How long a fresh capture stays on screen (milliseconds).
pub const DEFAULT_DWELL_MS: u64 = 2500;

/// Delay between busy spinner frames (milliseconds).
pub const DEFAULT_SPINNER_INTERVAL_MS: u64 = 150;

/// How long an alert banner stays up (milliseconds).
pub const DEFAULT_ALERT_MS: u64 = 3000;

/// Main loop frame interval (milliseconds).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 33;

/// Upper bound for every configurable interval (milliseconds).
pub const MAX_INTERVAL_MS: u64 = 60_000;

// ==========================================================================
// Display Defaults
// ==========================================================================

pub const DEFAULT_DISPLAY_WIDTH: u32 = 800;
pub const DEFAULT_DISPLAY_HEIGHT: u32 = 480;

/// Smallest panel edge the layout is usable on.
pub const MIN_DISPLAY_EDGE: u32 = 80;

/// Largest panel edge accepted.
pub const MAX_DISPLAY_EDGE: u32 = 4096;

// ==========================================================================
// System Defaults
// ==========================================================================

/// Directory of UI bitmaps, relative to the working directory.
pub const DEFAULT_ICON_DIR: &str = "icons";

/// Process killed at startup and on quit; it grabs removable media.
pub const DEFAULT_HELPER_PROCESS: &str = "gvfs";
