// SPDX-License-Identifier: MPL-2.0
use crate::capture::CameraError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    /// The storage directory cannot be created or written (permission
    /// denied, disk full, partial write, no free slot left).
    StorageUnavailable { path: PathBuf, reason: String },
    /// The capture device reported a failure while taking a photo.
    CaptureFailed(String),
    /// An image could not be decoded or encoded.
    Image(String),
    /// A raw frame buffer does not match the announced dimensions.
    InvalidFrame { expected: usize, actual: usize },
}

impl Error {
    /// Builds a [`Error::StorageUnavailable`] from any displayable cause.
    pub fn storage(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Error::StorageUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the short tag used in log lines and alert banners.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Config(_) => "config",
            Error::StorageUnavailable { .. } => "storage-unavailable",
            Error::CaptureFailed(_) => "capture-failed",
            Error::Image(_) => "image",
            Error::InvalidFrame { .. } => "invalid-frame",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::StorageUnavailable { path, reason } => {
                write!(f, "Storage unavailable at {}: {}", path.display(), reason)
            }
            Error::CaptureFailed(e) => write!(f, "Capture failed: {}", e),
            Error::Image(e) => write!(f, "Image Error: {}", e),
            Error::InvalidFrame { expected, actual } => write!(
                f,
                "Invalid frame: expected {} bytes, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<CameraError> for Error {
    fn from(err: CameraError) -> Self {
        Error::CaptureFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
