// SPDX-License-Identifier: MPL-2.0
//! Camera access and capture orchestration.

mod colorspace;
mod coordinator;
mod device;
mod simulated;

pub use colorspace::{yuv420_frame_len, yuv420_to_rgb};
pub use coordinator::{CaptureCoordinator, LoadedImage, Timing, DEFAULT_DWELL};
pub use device::{CameraError, CameraResult, CaptureDevice, FullResolution};
pub use simulated::SimulatedCamera;
