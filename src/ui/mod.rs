// SPDX-License-Identifier: MPL-2.0
//! Touch UI: drawing surface, icons, buttons and the per-mode layout.
//!
//! - [`canvas`] - RGBA draw surface and display outputs (headless, framebuffer)
//! - [`icons`] - Enum-keyed bitmaps loaded from the icon directory
//! - [`button`] - Buttons, hit-testing and the per-mode registry
//! - [`layout`] - Button declarations for every screen mode
//! - [`screen`] - Canvas, display and buttons behind one shared lock

pub mod button;
pub mod canvas;
pub mod icons;
pub mod layout;
pub mod screen;

pub use button::{Button, ButtonRegistry};
pub use canvas::{Canvas, Color, Display, FramebufferDisplay, HeadlessDisplay, PixelFormat};
pub use icons::{IconKey, IconSet};
pub use screen::{Backdrop, Screen, SharedScreen};
