// SPDX-License-Identifier: MPL-2.0
//! Software draw surface and display outputs.
//!
//! Everything is drawn into a [`Canvas`] (an RGBA [`tiny_skia::Pixmap`]) and
//! pushed to a [`Display`] in one piece, so the device never shows a
//! half-drawn frame.

use crate::domain::capture::Resolution;
use crate::domain::screen::Rect;
use crate::error::{Error, Result};
use image_rs::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tiny_skia::{IntSize, Paint, Pixmap, PixmapPaint, Transform};

/// Opaque 8-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Alert banner fill.
    pub const ALERT: Color = Color::rgb(178, 34, 34);
    /// Inactive busy spinner segment.
    pub const SPINNER_DIM: Color = Color::rgb(80, 80, 80);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// RGBA draw surface the size of the display.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Creates a black canvas.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] for a zero-sized canvas.
    pub fn new(size: Resolution) -> Result<Self> {
        let mut pixmap = Pixmap::new(size.width, size.height)
            .ok_or_else(|| Error::Image(format!("invalid canvas size {}", size)))?;
        pixmap.fill(tiny_skia::Color::BLACK);
        Ok(Self { pixmap })
    }

    #[must_use]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.pixmap.width(), self.pixmap.height())
    }

    /// Premultiplied RGBA bytes, row-major. All drawn pixels are opaque, so
    /// this equals straight RGBA.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Color at a pixel, `None` outside the canvas.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgb(c.red(), c.green(), c.blue()))
    }

    pub fn clear(&mut self, color: Color) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255));
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(area) =
            tiny_skia::Rect::from_xywh(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32)
        else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, 255);
        paint.anti_alias = false;
        self.pixmap
            .fill_rect(area, &paint, Transform::identity(), None);
    }

    /// Draws a bitmap with its top-left corner at `(x, y)`.
    pub fn blit(&mut self, bitmap: &Pixmap, x: i32, y: i32) {
        self.pixmap.draw_pixmap(
            x,
            y,
            bitmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Draws a bitmap centered inside `rect`.
    pub fn blit_centered(&mut self, bitmap: &Pixmap, rect: Rect) {
        let (x, y) = rect.centered(bitmap.width(), bitmap.height());
        self.blit(bitmap, x, y);
    }

    /// Draws a photo centered on the canvas, letterboxing with black when it
    /// does not cover the whole surface.
    pub fn draw_image(&mut self, image: &RgbaImage) {
        let (width, height) = image.dimensions();
        if width < self.pixmap.width() || height < self.pixmap.height() {
            self.clear(Color::BLACK);
        }
        match pixmap_from_rgba(image.as_raw().clone(), width, height) {
            Some(bitmap) => {
                let full = Rect::new(0, 0, self.pixmap.width(), self.pixmap.height());
                self.blit_centered(&bitmap, full);
            }
            None => log::warn!("Skipping {}x{} image that cannot be drawn", width, height),
        }
    }
}

/// Wraps opaque RGBA bytes in a pixmap.
#[must_use]
pub fn pixmap_from_rgba(rgba: Vec<u8>, width: u32, height: u32) -> Option<Pixmap> {
    Pixmap::from_vec(rgba, IntSize::from_wh(width, height)?)
}

// =============================================================================
// Displays
// =============================================================================

/// Output the canvas is presented on.
pub trait Display: Send {
    /// Shows the whole canvas.
    fn present(&mut self, canvas: &Canvas) -> Result<()>;
}

/// Display that only counts presented frames.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDisplay {
    frames: Arc<AtomicUsize>,
}

impl HeadlessDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared counter of presented frames; stays valid after the display is
    /// moved into the screen.
    #[must_use]
    pub fn frame_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.frames)
    }
}

impl Display for HeadlessDisplay {
    fn present(&mut self, _canvas: &Canvas) -> Result<()> {
        self.frames.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Pixel layout of a Linux framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// 32 bits per pixel, blue first (the common `fbdev` layout).
    #[default]
    Bgra32,
    /// 16 bits per pixel, little endian 5-6-5.
    Rgb565,
}

impl PixelFormat {
    #[must_use]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra32 => 4,
            PixelFormat::Rgb565 => 2,
        }
    }

    /// Converts RGBA pixels to this layout.
    #[must_use]
    pub fn encode(self, rgba: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(rgba.len() / 4 * self.bytes_per_pixel());
        for px in rgba.chunks_exact(4) {
            let (r, g, b) = (px[0], px[1], px[2]);
            match self {
                PixelFormat::Bgra32 => out.extend_from_slice(&[b, g, r, 255]),
                PixelFormat::Rgb565 => {
                    let value = (u16::from(r >> 3) << 11)
                        | (u16::from(g >> 2) << 5)
                        | u16::from(b >> 3);
                    out.extend_from_slice(&value.to_le_bytes());
                }
            }
        }
        out
    }
}

/// Writes frames to a framebuffer device such as `/dev/fb1`.
#[derive(Debug)]
pub struct FramebufferDisplay {
    path: PathBuf,
    file: File,
    format: PixelFormat,
}

impl FramebufferDisplay {
    /// Opens the framebuffer for writing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the device cannot be opened.
    pub fn open(path: &Path, format: PixelFormat) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|e| Error::Io(format!("{}: {}", path.display(), e)))?;
        log::info!("Framebuffer {} opened ({:?})", path.display(), format);
        Ok(Self {
            path: path.to_path_buf(),
            file,
            format,
        })
    }
}

impl Display for FramebufferDisplay {
    fn present(&mut self, canvas: &Canvas) -> Result<()> {
        let frame = self.format.encode(canvas.data());
        self.file.seek(SeekFrom::Start(0))?;
        self.file
            .write_all(&frame)
            .map_err(|e| Error::Io(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }
}
