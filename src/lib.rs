// SPDX-License-Identifier: MPL-2.0
//! `touchcam` drives a touchscreen still camera appliance: a live
//! viewfinder, capture to numbered JPEG files, playback with delete, and
//! settings pages, all on a small fixed-size panel with no other input.
//!
//! The crate is organised bottom-up:
//! - [`domain`]: plain value types (modes, indices, capture settings)
//! - [`storage`]: the `IMG_####.JPG` image store
//! - [`capture`]: camera device abstraction and the capture coordinator
//! - [`ui`]: software canvas, displays, icons and button layout
//! - [`busy`]: background spinner while long operations run
//! - [`controller`]: the screen-mode state machine
//! - [`touch`]: touch sources and the single-slot touch dispatcher
//! - [`app`]: configuration, persisted state and the main loop

pub mod app;
pub mod busy;
pub mod capture;
pub mod controller;
pub mod domain;
pub mod error;
pub mod storage;
pub mod touch;
pub mod ui;

pub use error::{Error, Result};
