// SPDX-License-Identifier: MPL-2.0
//! Application root: wires the screen, camera, storage and touch input
//! together and runs the main loop.
//!
//! The loop is single threaded and cooperative. Each iteration checks for a
//! quit request, hands at most one pending touch to the [`ModeController`]
//! and renders a frame. Long operations (capture, loading a photo) block the
//! loop while a busy worker animates the spinner.

pub mod config;
pub mod paths;
pub mod persisted_state;

use crate::capture::{CaptureCoordinator, CaptureDevice, SimulatedCamera};
use crate::controller::{Flow, ModeController, Session};
use crate::error::Result;
use crate::storage::ImageStore;
use crate::touch::{
    EvdevTouchSource, StdinTouchSource, TouchDispatcher, TouchHandle, TouchSource, TouchThread,
};
use crate::ui::{layout, Display, FramebufferDisplay, HeadlessDisplay, IconSet, Screen, SharedScreen};
use config::Config;
use persisted_state::SessionState;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::thread;
use std::time::Duration;

/// Root application state, generic over the capture device.
///
/// The shipped binary drives a [`SimulatedCamera`]; a sensor backend plugs in
/// through [`App::from_parts`].
pub struct App<D: CaptureDevice> {
    controller: ModeController<D>,
    screen: SharedScreen,
    touches: TouchDispatcher,
    touch_handle: TouchHandle,
    source: Option<Box<dyn TouchSource>>,
    frame_interval: Duration,
    helper_process: Option<String>,
}

impl<D: CaptureDevice> fmt::Debug for App<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("mode", &self.controller.mode())
            .field("frame_interval", &self.frame_interval)
            .field("helper_process", &self.helper_process)
            .finish_non_exhaustive()
    }
}

impl App<SimulatedCamera> {
    /// Builds the application with the display and touch source named in
    /// `config` (a framebuffer or headless output, an evdev device or stdin)
    /// and the simulated camera.
    ///
    /// # Errors
    ///
    /// Fails if the framebuffer or touch device cannot be opened, or the
    /// camera rejects the viewfinder configuration.
    pub fn new(config: &Config, state: &SessionState) -> Result<Self> {
        let display: Box<dyn Display> = match &config.display.framebuffer {
            Some(path) => Box::new(FramebufferDisplay::open(path, config.display.pixel_format)?),
            None => {
                log::info!("No framebuffer configured, rendering headless");
                Box::new(HeadlessDisplay::new())
            }
        };
        let source: Box<dyn TouchSource> = match &config.input.touch_device {
            Some(path) => {
                Box::new(EvdevTouchSource::open(path)?.with_axis_scale(config.touch_scale()))
            }
            None => {
                log::info!("No touch device configured, reading 'x y' taps from stdin");
                Box::new(StdinTouchSource::stdin())
            }
        };
        let camera = SimulatedCamera::new(config.resolution());
        Self::from_parts(config, state, camera, display, source)
    }
}

impl<D: CaptureDevice> App<D> {
    /// Builds the application around an explicit camera, display and touch
    /// source.
    ///
    /// # Errors
    ///
    /// Fails if the screen cannot be created or the camera rejects the
    /// viewfinder configuration.
    pub fn from_parts(
        config: &Config,
        state: &SessionState,
        camera: D,
        display: Box<dyn Display>,
        source: Box<dyn TouchSource>,
    ) -> Result<Self> {
        let resolution = config.resolution();
        let icons = IconSet::load(&config.system.icon_dir);
        let screen = SharedScreen::new(Screen::new(
            resolution,
            display,
            layout::build(resolution),
            icons,
        )?);
        let store = ImageStore::new(config.storage_paths(), config.ownership());
        let coordinator = CaptureCoordinator::new(
            camera,
            store,
            screen.clone(),
            config.timing(),
        )?;

        let mut session = Session::default();
        state.apply_to(&mut session);
        let controller =
            ModeController::new(session, coordinator).with_alert_duration(config.alert_duration());

        let (touches, touch_handle) = TouchDispatcher::new();
        Ok(Self {
            controller,
            screen,
            touches,
            touch_handle,
            source: Some(source),
            frame_interval: config.frame_interval(),
            helper_process: config.helper_process().map(str::to_string),
        })
    }

    /// Saves session state under `dir` instead of the default data
    /// directory.
    #[must_use]
    pub fn with_state_dir(self, dir: PathBuf) -> Self {
        Self {
            controller: self.controller.with_state_dir(dir),
            ..self
        }
    }

    #[must_use]
    pub fn controller(&self) -> &ModeController<D> {
        &self.controller
    }

    #[must_use]
    pub fn screen(&self) -> &SharedScreen {
        &self.screen
    }

    /// Handle for injecting touches and quit requests from other threads.
    #[must_use]
    pub fn touch_handle(&self) -> TouchHandle {
        self.touch_handle.clone()
    }

    /// Runs until a quit request, then shuts input down.
    ///
    /// # Errors
    ///
    /// The loop itself never fails; errors are reported on screen.
    pub fn run(mut self) -> Result<()> {
        stop_helper(self.helper_process.as_deref());

        let mut touch_thread = self
            .source
            .take()
            .map(|source| TouchThread::spawn(source, self.touch_handle.clone()));

        log::info!("Main loop started in {:?}", self.controller.mode());
        while self.step() == Flow::Continue {
            thread::sleep(self.frame_interval);
        }

        log::info!("Shutting down");
        if let Some(touch_thread) = touch_thread.as_mut() {
            touch_thread.stop();
        }
        stop_helper(self.helper_process.as_deref());
        Ok(())
    }

    /// One main loop iteration: quit check, at most one touch, one frame.
    pub fn step(&mut self) -> Flow {
        if self.touches.quit_requested() {
            log::info!("Quit requested by input");
            return Flow::Quit;
        }

        if let Some(touch) = self.touches.poll() {
            let point = touch.point();
            let action = self.screen.lock().action_at(
                self.controller.mode(),
                i32::try_from(point.x).unwrap_or(i32::MAX),
                i32::try_from(point.y).unwrap_or(i32::MAX),
            );
            if let Some(action) = action {
                log::debug!("Touch ({}, {}) -> {:?}", point.x, point.y, action);
                if self.controller.apply(action) == Flow::Quit {
                    return Flow::Quit;
                }
            }
        }

        if let Err(err) = self.controller.render(&self.screen) {
            log::warn!("Frame not shown: {}", err);
        }
        Flow::Continue
    }
}

/// Stops the helper process that grabs removable media. Best effort: a
/// missing `pkill` or a process that is not running only gets logged.
fn stop_helper(name: Option<&str>) {
    let Some(name) = name else {
        return;
    };
    match Command::new("pkill").arg(name).status() {
        Ok(status) if status.success() => log::info!("Stopped helper process '{}'", name),
        Ok(_) => log::debug!("Helper process '{}' was not running", name),
        Err(err) => log::warn!("Cannot stop helper process '{}': {}", name, err),
    }
}
