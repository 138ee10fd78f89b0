// SPDX-License-Identifier: MPL-2.0
//! Screen-mode state machine.
//!
//! [`ModeController`] owns the [`Session`] and turns button actions into
//! mode changes and capture/storage work. Failures never leave the
//! controller: they are logged and shown as a timed alert banner while the
//! mode stays where it was.

use crate::app::persisted_state::SessionState;
use crate::capture::{CaptureCoordinator, CaptureDevice};
use crate::domain::capture::CaptureSettings;
use crate::domain::screen::{Action, Background, ScreenMode, SettingsPage};
use crate::domain::storage::{Direction, StorageTarget};
use crate::error::{Error, Result};
use crate::ui::{Backdrop, SharedScreen};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Default time an alert banner stays up.
pub const DEFAULT_ALERT_DURATION: Duration = Duration::from_secs(3);

/// A failure shown on screen until `until`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub until: Instant,
}

/// Everything the UI needs to know about the current session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub mode: ScreenMode,
    /// Page opened by the gear button; the last page the user left from.
    pub settings_page: SettingsPage,
    pub storage: StorageTarget,
    pub capture: CaptureSettings,
    pub alert: Option<Alert>,
}

/// Whether the main loop keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct ModeController<D: CaptureDevice> {
    session: Session,
    coordinator: CaptureCoordinator<D>,
    alert_duration: Duration,
    /// Where session state is saved on leaving settings; `None` uses the
    /// default data directory.
    state_dir: Option<PathBuf>,
}

impl<D: CaptureDevice> ModeController<D> {
    /// Starts in the viewfinder and pushes the session's effect and ISO to
    /// the device.
    pub fn new(session: Session, mut coordinator: CaptureCoordinator<D>) -> Self {
        if let Err(err) = coordinator.apply_settings(session.capture) {
            log::warn!("Could not apply capture settings: {}", err);
        }
        Self {
            session: Session {
                mode: ScreenMode::Viewfinder,
                alert: None,
                ..session
            },
            coordinator,
            alert_duration: DEFAULT_ALERT_DURATION,
            state_dir: None,
        }
    }

    #[must_use]
    pub fn with_alert_duration(mut self, duration: Duration) -> Self {
        self.alert_duration = duration;
        self
    }

    #[must_use]
    pub fn with_state_dir(mut self, dir: PathBuf) -> Self {
        self.state_dir = Some(dir);
        self
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn mode(&self) -> ScreenMode {
        self.session.mode
    }

    #[must_use]
    pub fn coordinator(&self) -> &CaptureCoordinator<D> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut CaptureCoordinator<D> {
        &mut self.coordinator
    }

    /// Applies one button action.
    pub fn apply(&mut self, action: Action) -> Flow {
        let mode = self.session.mode;
        let outcome = match (mode, action) {
            (ScreenMode::Viewfinder, Action::Capture) => self.capture(),
            (ScreenMode::Viewfinder, Action::OpenSettings) => {
                Ok(ScreenMode::Settings(self.session.settings_page))
            }
            (ScreenMode::Viewfinder, Action::Review) => self.review(),
            (ScreenMode::Playback, Action::Navigate(direction)) => self.navigate(direction),
            (ScreenMode::Playback, Action::Trash) => Ok(ScreenMode::DeleteConfirm),
            (ScreenMode::DeleteConfirm, Action::ConfirmDelete(true)) => self.delete_current(),
            (ScreenMode::DeleteConfirm, Action::ConfirmDelete(false)) => Ok(ScreenMode::Playback),
            (ScreenMode::Settings(page), Action::SettingsPage(direction)) => {
                Ok(ScreenMode::Settings(page.step(direction)))
            }
            (ScreenMode::Settings(_), Action::SelectStorage(target)) => {
                self.session.storage = target;
                Ok(mode)
            }
            (ScreenMode::Settings(_), Action::SelectSize(size)) => {
                self.session.capture.size = size;
                Ok(mode)
            }
            (ScreenMode::Settings(_), Action::SelectEffect(fx)) => {
                self.session.capture.fx = fx;
                self.apply_capture_settings().map(|()| mode)
            }
            (ScreenMode::Settings(_), Action::SelectIso(iso)) => {
                self.session.capture.iso = iso;
                self.apply_capture_settings().map(|()| mode)
            }
            (ScreenMode::Settings(page), Action::Done) => {
                self.session.settings_page = page;
                self.persist();
                Ok(ScreenMode::Viewfinder)
            }
            (ScreenMode::Playback | ScreenMode::NoImages, Action::Done) => {
                Ok(ScreenMode::Viewfinder)
            }
            (ScreenMode::Settings(SettingsPage::Quit), Action::Quit) => {
                log::info!("Quit requested from settings");
                return Flow::Quit;
            }
            (mode, action) => {
                log::debug!("Ignoring {:?} in {:?}", action, mode);
                Ok(mode)
            }
        };

        match outcome {
            Ok(next) => self.enter(next),
            Err(err) => self.raise(&action, err),
        }
        Flow::Continue
    }

    /// Whether a settings option is the one currently in effect.
    #[must_use]
    pub fn is_selected(&self, action: Action) -> bool {
        match action {
            Action::SelectStorage(target) => target == self.session.storage,
            Action::SelectSize(size) => size == self.session.capture.size,
            Action::SelectEffect(fx) => fx == self.session.capture.fx,
            Action::SelectIso(iso) => iso == self.session.capture.iso,
            _ => false,
        }
    }

    /// Whether the alert banner should be drawn at `now`; clears it once
    /// expired.
    pub fn alert_active(&mut self, now: Instant) -> bool {
        let active = self
            .session
            .alert
            .as_ref()
            .is_some_and(|alert| now < alert.until);
        if !active {
            self.session.alert = None;
        }
        active
    }

    /// Draws the current mode: background, buttons, selection and alert.
    pub fn render(&mut self, screen: &SharedScreen) -> Result<()> {
        let mode = self.session.mode;
        let alert = self.alert_active(Instant::now());

        let live = match mode.background() {
            Background::LiveFrame => match self.coordinator.viewfinder_frame() {
                Ok(frame) => Some(frame),
                Err(err) => {
                    log::debug!("Viewfinder frame dropped: {}", err);
                    None
                }
            },
            _ => None,
        };
        let backdrop = match mode.background() {
            Background::LiveFrame => Backdrop::Live(live),
            Background::LoadedImage => {
                Backdrop::Still(self.coordinator.loaded().map(|loaded| &loaded.image))
            }
            Background::Empty => Backdrop::Empty,
        };

        screen
            .lock()
            .render(mode, backdrop, alert, |action| self.is_selected(action))
    }

    fn enter(&mut self, next: ScreenMode) {
        if next != self.session.mode {
            log::debug!("Mode {:?} -> {:?}", self.session.mode, next);
            self.session.mode = next;
        }
    }

    fn raise(&mut self, action: &Action, err: Error) {
        log::error!("{:?} failed ({}): {}", action, err.kind(), err);
        self.session.alert = Some(Alert {
            message: err.to_string(),
            until: Instant::now() + self.alert_duration,
        });
    }

    fn capture(&mut self) -> Result<ScreenMode> {
        let (storage, capture) = (self.session.storage, self.session.capture);
        self.coordinator
            .take_picture(ScreenMode::Viewfinder, storage, capture)?;
        Ok(ScreenMode::Viewfinder)
    }

    /// The resident capture if it belongs to the active target, else the
    /// highest-numbered photo, else the empty screen.
    fn review(&mut self) -> Result<ScreenMode> {
        let storage = self.session.storage;
        if self.coordinator.loaded_for(storage).is_some() {
            return Ok(ScreenMode::Playback);
        }
        match self.coordinator.store().scan_range(storage) {
            Some((_, last)) => {
                self.coordinator
                    .show_image(ScreenMode::Viewfinder, storage, last)?;
                Ok(ScreenMode::Playback)
            }
            None => Ok(ScreenMode::NoImages),
        }
    }

    fn navigate(&mut self, direction: Direction) -> Result<ScreenMode> {
        let found =
            self.coordinator
                .show_adjacent(ScreenMode::Playback, self.session.storage, direction)?;
        Ok(if found.is_some() {
            ScreenMode::Playback
        } else {
            ScreenMode::NoImages
        })
    }

    fn delete_current(&mut self) -> Result<ScreenMode> {
        let storage = self.session.storage;
        let Some(index) = self.coordinator.position(storage) else {
            return Ok(ScreenMode::Playback);
        };
        // Leave the confirmation page even if the delete fails.
        self.session.mode = ScreenMode::Playback;
        self.coordinator.delete(storage, index)?;
        self.navigate(Direction::Backward)
    }

    fn apply_capture_settings(&mut self) -> Result<()> {
        self.coordinator.apply_settings(self.session.capture)
    }

    fn persist(&self) {
        let state = SessionState::from_session(&self.session);
        if let Some(warning) = state.save_to(self.state_dir.clone()) {
            log::warn!("{}", warning);
        }
    }
}
