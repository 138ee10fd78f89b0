// SPDX-License-Identifier: MPL-2.0
//! Capture parameters.
//!
//! A [`CaptureSettings`] value is immutable for the duration of a capture.
//! It is edited through the settings pages and consumed by the capture
//! coordinator.

use std::fmt;

/// Pixel dimensions of a sensor mode or of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels.
    #[must_use]
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Normalized sensor crop window; every component is in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    /// The whole sensor.
    pub const FULL: CropRect = CropRect::new(0.0, 0.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

// =============================================================================
// SizeMode
// =============================================================================

/// Photo size; each size maps to a full sensor resolution and a crop window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizeMode {
    #[default]
    Large,
    Medium,
    Small,
}

impl SizeMode {
    pub const ALL: [SizeMode; 3] = [SizeMode::Large, SizeMode::Medium, SizeMode::Small];

    /// Resolution of the saved JPEG.
    #[must_use]
    pub fn full_resolution(self) -> Resolution {
        match self {
            SizeMode::Large => Resolution::new(2592, 1944),
            SizeMode::Medium => Resolution::new(1920, 1080),
            SizeMode::Small => Resolution::new(1440, 1080),
        }
    }

    /// Sensor crop used while capturing at this size.
    #[must_use]
    pub fn crop(self) -> CropRect {
        match self {
            SizeMode::Large => CropRect::FULL,
            SizeMode::Medium => CropRect::new(0.1296, 0.2222, 0.7408, 0.5556),
            SizeMode::Small => CropRect::new(0.2222, 0.2222, 0.5556, 0.5556),
        }
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            SizeMode::Large => "large",
            SizeMode::Medium => "medium",
            SizeMode::Small => "small",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.key() == key)
    }
}

// =============================================================================
// FxMode
// =============================================================================

/// Image effect applied by the sensor pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FxMode {
    #[default]
    None,
    Sketch,
    Negative,
    Posterise,
    Emboss,
    Cartoon,
    Solarize,
    Watercolor,
}

impl FxMode {
    pub const ALL: [FxMode; 8] = [
        FxMode::None,
        FxMode::Sketch,
        FxMode::Negative,
        FxMode::Posterise,
        FxMode::Emboss,
        FxMode::Cartoon,
        FxMode::Solarize,
        FxMode::Watercolor,
    ];

    /// Effect name as understood by the sensor pipeline; also the icon suffix.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            FxMode::None => "none",
            FxMode::Sketch => "sketch",
            FxMode::Negative => "negative",
            FxMode::Posterise => "posterise",
            FxMode::Emboss => "emboss",
            FxMode::Cartoon => "cartoon",
            FxMode::Solarize => "solarize",
            FxMode::Watercolor => "watercolor",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.key() == key)
    }
}

// =============================================================================
// IsoMode
// =============================================================================

/// Sensor sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IsoMode {
    #[default]
    Auto,
    Iso100,
    Iso200,
    Iso320,
    Iso400,
    Iso500,
    Iso640,
    Iso800,
}

impl IsoMode {
    pub const ALL: [IsoMode; 8] = [
        IsoMode::Auto,
        IsoMode::Iso100,
        IsoMode::Iso200,
        IsoMode::Iso320,
        IsoMode::Iso400,
        IsoMode::Iso500,
        IsoMode::Iso640,
        IsoMode::Iso800,
    ];

    /// Numeric ISO value; `0` means automatic.
    #[must_use]
    pub fn value(self) -> u32 {
        match self {
            IsoMode::Auto => 0,
            IsoMode::Iso100 => 100,
            IsoMode::Iso200 => 200,
            IsoMode::Iso320 => 320,
            IsoMode::Iso400 => 400,
            IsoMode::Iso500 => 500,
            IsoMode::Iso640 => 640,
            IsoMode::Iso800 => 800,
        }
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            IsoMode::Auto => "auto",
            IsoMode::Iso100 => "100",
            IsoMode::Iso200 => "200",
            IsoMode::Iso320 => "320",
            IsoMode::Iso400 => "400",
            IsoMode::Iso500 => "500",
            IsoMode::Iso640 => "640",
            IsoMode::Iso800 => "800",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.key() == key)
    }
}

/// Settings consumed by a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureSettings {
    pub size: SizeMode,
    pub fx: FxMode,
    pub iso: IsoMode,
}
