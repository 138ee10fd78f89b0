// SPDX-License-Identifier: MPL-2.0
//! Capture device port.
//!
//! The sensor is driven through [`CaptureDevice`]; the rest of the crate
//! never talks to hardware directly.

use crate::domain::capture::{CropRect, FxMode, IsoMode, Resolution};
use std::fmt;
use std::path::Path;

/// Camera operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// Failed to configure resolution, crop, effect or ISO.
    ConfigurationFailed,
    /// The sensor did not deliver a picture.
    CaptureFailed,
    /// Writing the encoded picture failed.
    WriteFailed(String),
    /// Requested resolution is not supported by the sensor.
    InvalidResolution(Resolution),
    /// Device gone or not opened.
    Disconnected,
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::ConfigurationFailed => write!(f, "Failed to configure camera"),
            CameraError::CaptureFailed => write!(f, "Failed to capture frame"),
            CameraError::WriteFailed(e) => write!(f, "Failed to write picture: {}", e),
            CameraError::InvalidResolution(r) => write!(f, "Unsupported resolution {}", r),
            CameraError::Disconnected => write!(f, "Camera disconnected"),
        }
    }
}

impl std::error::Error for CameraError {}

/// Result type for camera operations.
pub type CameraResult<T> = Result<T, CameraError>;

/// A still camera sensor.
///
/// Resolution and crop are stateful: they stay in effect until changed.
/// Raw frames are planar YUV 4:2:0 at the current resolution.
pub trait CaptureDevice: Send {
    fn resolution(&self) -> Resolution;

    fn set_resolution(&mut self, resolution: Resolution) -> CameraResult<()>;

    fn set_crop(&mut self, crop: CropRect) -> CameraResult<()>;

    fn set_effect(&mut self, fx: FxMode) -> CameraResult<()>;

    fn set_iso(&mut self, iso: IsoMode) -> CameraResult<()>;

    /// Encodes a still at the current resolution and writes it to `path`.
    fn capture_jpeg(&mut self, path: &Path) -> CameraResult<()>;

    /// Returns one raw YUV 4:2:0 frame at the current resolution.
    fn capture_raw_frame(&mut self) -> CameraResult<Vec<u8>>;
}

/// Switches a device to full capture resolution and crop for its lifetime.
///
/// Dropping the guard restores the viewfinder resolution and the full-sensor
/// crop on every exit path. Restore failures are logged; they cannot be
/// surfaced from `drop`.
pub struct FullResolution<'a, D: CaptureDevice + ?Sized> {
    device: &'a mut D,
    viewfinder: Resolution,
}

impl<'a, D: CaptureDevice + ?Sized> FullResolution<'a, D> {
    /// Applies `resolution` and `crop`, remembering `viewfinder` for restore.
    ///
    /// # Errors
    ///
    /// If the switch fails the viewfinder setup is restored immediately and
    /// the device error is returned.
    pub fn engage(
        device: &'a mut D,
        resolution: Resolution,
        crop: CropRect,
        viewfinder: Resolution,
    ) -> CameraResult<Self> {
        let mut guard = Self { device, viewfinder };
        guard.device.set_resolution(resolution)?;
        guard.device.set_crop(crop)?;
        Ok(guard)
    }

    pub fn device(&mut self) -> &mut D {
        self.device
    }
}

impl<D: CaptureDevice + ?Sized> Drop for FullResolution<'_, D> {
    fn drop(&mut self) {
        if let Err(err) = self.device.set_resolution(self.viewfinder) {
            log::warn!("Could not restore viewfinder resolution: {}", err);
        }
        if let Err(err) = self.device.set_crop(CropRect::FULL) {
            log::warn!("Could not restore full crop: {}", err);
        }
    }
}
