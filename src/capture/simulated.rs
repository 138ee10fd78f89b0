// SPDX-License-Identifier: MPL-2.0
//! Software camera used headless and in tests.
//!
//! Produces a moving test pattern: raw frames are planar YUV 4:2:0 with a
//! luma gradient, stills are JPEG-encoded RGB gradients.

use super::device::{CameraError, CameraResult, CaptureDevice};
use crate::domain::capture::{CropRect, FxMode, IsoMode, Resolution};
use image_rs::{ImageFormat, Rgb, RgbImage};
use std::path::Path;

/// Largest edge a simulated sensor accepts.
const MAX_EDGE: u32 = 4096;

#[derive(Debug, Clone)]
pub struct SimulatedCamera {
    resolution: Resolution,
    crop: CropRect,
    fx: FxMode,
    iso: IsoMode,
    /// Largest edge of encoded stills; `None` encodes at full resolution.
    output_limit: Option<u32>,
    fail_captures: bool,
    frame: u32,
    stills: u32,
}

impl SimulatedCamera {
    #[must_use]
    pub fn new(viewfinder: Resolution) -> Self {
        Self {
            resolution: viewfinder,
            crop: CropRect::FULL,
            fx: FxMode::None,
            iso: IsoMode::Auto,
            output_limit: None,
            fail_captures: false,
            frame: 0,
            stills: 0,
        }
    }

    /// Caps the encoded still size so tests do not encode 5 MP JPEGs.
    #[must_use]
    pub fn with_output_limit(mut self, max_edge: u32) -> Self {
        self.output_limit = Some(max_edge.max(1));
        self
    }

    /// Makes every following capture fail with [`CameraError::CaptureFailed`].
    pub fn fail_captures(&mut self, fail: bool) {
        self.fail_captures = fail;
    }

    #[must_use]
    pub fn crop(&self) -> CropRect {
        self.crop
    }

    #[must_use]
    pub fn effect(&self) -> FxMode {
        self.fx
    }

    #[must_use]
    pub fn iso(&self) -> IsoMode {
        self.iso
    }

    /// Number of stills written so far.
    #[must_use]
    pub fn stills_taken(&self) -> u32 {
        self.stills
    }

    fn output_size(&self) -> (u32, u32) {
        let Resolution { width, height } = self.resolution;
        match self.output_limit {
            Some(limit) if width.max(height) > limit => {
                let longest = u64::from(width.max(height));
                let scale = |edge: u32| {
                    let scaled = u64::from(edge) * u64::from(limit) / longest;
                    u32::try_from(scaled).unwrap_or(limit).max(1)
                };
                (scale(width), scale(height))
            }
            _ => (width, height),
        }
    }

    fn render_still(&self) -> RgbImage {
        let (width, height) = self.output_size();
        let shift = self.stills.wrapping_mul(37) as u8;
        let negative = self.fx == FxMode::Negative;

        RgbImage::from_fn(width, height, |x, y| {
            let r = ((x * 255) / width.max(1)) as u8;
            let g = ((y * 255) / height.max(1)) as u8;
            let b = shift;
            if negative {
                Rgb([255 - r, 255 - g, 255 - b])
            } else {
                Rgb([r, g, b])
            }
        })
    }
}

impl CaptureDevice for SimulatedCamera {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn set_resolution(&mut self, resolution: Resolution) -> CameraResult<()> {
        let valid = (1..=MAX_EDGE).contains(&resolution.width)
            && (1..=MAX_EDGE).contains(&resolution.height);
        if !valid {
            return Err(CameraError::InvalidResolution(resolution));
        }
        self.resolution = resolution;
        Ok(())
    }

    fn set_crop(&mut self, crop: CropRect) -> CameraResult<()> {
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if !(in_unit(crop.x)
            && in_unit(crop.y)
            && in_unit(crop.width)
            && in_unit(crop.height)
            && crop.x + crop.width <= 1.0 + f32::EPSILON
            && crop.y + crop.height <= 1.0 + f32::EPSILON)
        {
            return Err(CameraError::ConfigurationFailed);
        }
        self.crop = crop;
        Ok(())
    }

    fn set_effect(&mut self, fx: FxMode) -> CameraResult<()> {
        self.fx = fx;
        Ok(())
    }

    fn set_iso(&mut self, iso: IsoMode) -> CameraResult<()> {
        self.iso = iso;
        Ok(())
    }

    fn capture_jpeg(&mut self, path: &Path) -> CameraResult<()> {
        if self.fail_captures {
            return Err(CameraError::CaptureFailed);
        }
        // The staging name has no .jpg extension, so the format is explicit.
        self.render_still()
            .save_with_format(path, ImageFormat::Jpeg)
            .map_err(|e| CameraError::WriteFailed(e.to_string()))?;
        self.stills += 1;
        log::debug!(
            "Simulated still {} at {} (fx={}, iso={})",
            self.stills,
            self.resolution,
            self.fx.key(),
            self.iso.key()
        );
        Ok(())
    }

    fn capture_raw_frame(&mut self) -> CameraResult<Vec<u8>> {
        if self.fail_captures {
            return Err(CameraError::CaptureFailed);
        }
        let width = self.resolution.width as usize;
        let height = self.resolution.height as usize;
        let chroma = width.div_ceil(2) * height.div_ceil(2);
        let offset = self.frame as usize;
        self.frame = self.frame.wrapping_add(4);

        let mut frame = Vec::with_capacity(width * height + 2 * chroma);
        for y in 0..height {
            for x in 0..width {
                frame.push(((x + y + offset) % 256) as u8);
            }
        }
        frame.resize(width * height + 2 * chroma, 128);
        Ok(frame)
    }
}
