// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core types of the camera appliance with ZERO external dependencies.
//!
//! This module contains pure value objects and the rules attached to them.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability.
//!
//! # Modules
//!
//! - [`capture`]: Capture parameters ([`SizeMode`](capture::SizeMode),
//!   [`FxMode`](capture::FxMode), [`IsoMode`](capture::IsoMode),
//!   [`CaptureSettings`](capture::CaptureSettings))
//! - [`storage`]: Storage bookkeeping ([`ImageIndex`](storage::ImageIndex),
//!   [`StorageTarget`](storage::StorageTarget), [`Direction`](storage::Direction))
//! - [`screen`]: Screen state ([`ScreenMode`](screen::ScreenMode),
//!   [`SettingsPage`](screen::SettingsPage), [`Action`](screen::Action), [`Rect`](screen::Rect))

pub mod capture;
pub mod screen;
pub mod storage;
