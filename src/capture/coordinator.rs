// SPDX-License-Identifier: MPL-2.0
//! Takes photos and loads saved ones for review.
//!
//! Owns the capture device, the image store and the image currently loaded
//! for review. Every slow step runs under a [`BusyIndicator`].

use super::colorspace::yuv420_to_rgb;
use super::device::{CameraError, CaptureDevice, FullResolution};
use crate::busy::{BusyIndicator, DEFAULT_INTERVAL};
use crate::domain::capture::{CaptureSettings, Resolution, SizeMode};
use crate::domain::screen::ScreenMode;
use crate::domain::storage::{Direction, ImageIndex, StorageTarget};
use crate::error::{Error, Result};
use crate::storage::ImageStore;
use crate::ui::SharedScreen;
use image_rs::imageops::FilterType;
use image_rs::{DynamicImage, ImageReader, RgbImage, RgbaImage};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Default time a fresh capture stays on screen.
pub const DEFAULT_DWELL: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// How long a new photo is shown before returning to the viewfinder.
    pub dwell: Duration,
    /// Delay between busy spinner frames.
    pub spinner_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            dwell: DEFAULT_DWELL,
            spinner_interval: DEFAULT_INTERVAL,
        }
    }
}

/// A photo decoded and scaled to the viewfinder size.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub target: StorageTarget,
    pub index: ImageIndex,
    pub image: RgbaImage,
}

pub struct CaptureCoordinator<D: CaptureDevice> {
    device: D,
    store: ImageStore,
    screen: SharedScreen,
    timing: Timing,
    viewfinder: Resolution,
    loaded: Option<LoadedImage>,
    /// Browsing position; meaningful only for its own target.
    position: Option<(StorageTarget, ImageIndex)>,
}

impl<D: CaptureDevice> CaptureCoordinator<D> {
    /// Puts the device in viewfinder configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CaptureFailed`] if the device rejects the viewfinder
    /// resolution.
    pub fn new(
        mut device: D,
        store: ImageStore,
        screen: SharedScreen,
        timing: Timing,
    ) -> Result<Self> {
        let viewfinder = screen.lock().resolution();
        device.set_resolution(viewfinder)?;
        Ok(Self {
            device,
            store,
            screen,
            timing,
            viewfinder,
            loaded: None,
            position: None,
        })
    }

    #[must_use]
    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    #[must_use]
    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    #[must_use]
    pub fn loaded(&self) -> Option<&LoadedImage> {
        self.loaded.as_ref()
    }

    /// The loaded image, if it belongs to `target`.
    #[must_use]
    pub fn loaded_for(&self, target: StorageTarget) -> Option<&LoadedImage> {
        self.loaded.as_ref().filter(|l| l.target == target)
    }

    /// Browsing position within `target`.
    #[must_use]
    pub fn position(&self, target: StorageTarget) -> Option<ImageIndex> {
        self.position
            .filter(|(t, _)| *t == target)
            .map(|(_, index)| index)
    }

    /// Pushes effect and ISO to the device.
    pub fn apply_settings(&mut self, settings: CaptureSettings) -> Result<()> {
        self.device.set_effect(settings.fx)?;
        self.device.set_iso(settings.iso)?;
        Ok(())
    }

    /// Captures a photo into `target` and shows it for the dwell time.
    ///
    /// # Errors
    ///
    /// [`Error::StorageUnavailable`] when the directory cannot be used or is
    /// full, [`Error::CaptureFailed`] when the device fails. No partial file
    /// is left behind either way.
    pub fn take_picture(
        &mut self,
        mode: ScreenMode,
        target: StorageTarget,
        settings: CaptureSettings,
    ) -> Result<ImageIndex> {
        self.store.ensure_directory(target)?;
        let index = self.store.allocate_next_index(target)?;
        let staged = self.store.staging_path(target, index);

        let busy = BusyIndicator::start(&self.screen, mode, self.timing.spinner_interval);

        if let Err(err) = self.capture_to(&staged, settings.size) {
            self.store.discard(&staged);
            return Err(err);
        }
        let path = self.store.commit(target, index, &staged)?;
        self.loaded = None;
        self.position = Some((target, index));
        log::info!("Saved {} ({})", path.display(), settings.size.key());

        let image = load_scaled(&path, self.viewfinder)?;
        busy.finish();

        if let Err(err) = self.screen.lock().show_preview(&image) {
            log::warn!("Could not show preview: {}", err);
        }
        thread::sleep(self.timing.dwell);

        self.loaded = Some(LoadedImage {
            target,
            index,
            image,
        });
        Ok(index)
    }

    fn capture_to(&mut self, staged: &Path, size: SizeMode) -> Result<()> {
        let mut full = FullResolution::engage(
            &mut self.device,
            size.full_resolution(),
            size.crop(),
            self.viewfinder,
        )?;
        let written = full.device().capture_jpeg(staged);
        written.map_err(|err| match err {
            CameraError::WriteFailed(reason) => {
                Error::storage(staged.parent().unwrap_or(staged), reason)
            }
            other => other.into(),
        })
    }

    /// Moves to the nearest photo in `direction` and loads it.
    ///
    /// Returns `Ok(None)` and clears the loaded image when `target` holds no
    /// photo at all.
    pub fn show_adjacent(
        &mut self,
        mode: ScreenMode,
        target: StorageTarget,
        direction: Direction,
    ) -> Result<Option<ImageIndex>> {
        let busy = BusyIndicator::start(&self.screen, mode, self.timing.spinner_interval);

        let from = self.position(target);
        let Some(index) = self.store.find_adjacent(target, from, direction) else {
            self.loaded = None;
            self.position = None;
            busy.finish();
            return Ok(None);
        };
        self.load(target, index)?;
        busy.finish();
        Ok(Some(index))
    }

    /// Loads one specific photo.
    pub fn show_image(
        &mut self,
        mode: ScreenMode,
        target: StorageTarget,
        index: ImageIndex,
    ) -> Result<()> {
        let busy = BusyIndicator::start(&self.screen, mode, self.timing.spinner_interval);
        self.load(target, index)?;
        busy.finish();
        Ok(())
    }

    /// Deletes a photo and unloads it. The browsing position stays on the
    /// deleted slot so the caller can step away from it.
    pub fn delete(&mut self, target: StorageTarget, index: ImageIndex) -> Result<()> {
        self.store.delete(target, index)?;
        if self.loaded.as_ref().is_some_and(|l| l.target == target && l.index == index) {
            self.loaded = None;
        }
        Ok(())
    }

    fn load(&mut self, target: StorageTarget, index: ImageIndex) -> Result<()> {
        let path = self.store.image_path(target, index);
        let image = load_scaled(&path, self.viewfinder)?;
        self.loaded = Some(LoadedImage {
            target,
            index,
            image,
        });
        self.position = Some((target, index));
        log::debug!("Loaded {}", path.display());
        Ok(())
    }

    /// Grabs one raw frame and converts it for display.
    pub fn viewfinder_frame(&mut self) -> Result<RgbaImage> {
        let raw = self.device.capture_raw_frame()?;
        let Resolution { width, height } = self.device.resolution();
        let rgb = yuv420_to_rgb(&raw, width, height)?;
        let frame = RgbImage::from_raw(width, height, rgb).ok_or(Error::InvalidFrame {
            expected: Resolution::new(width, height).area() * 3,
            actual: 0,
        })?;
        Ok(DynamicImage::ImageRgb8(frame).to_rgba8())
    }
}

/// Decodes a photo and scales it to fit `bounds`, keeping its aspect ratio.
fn load_scaled(path: &Path, bounds: Resolution) -> Result<RgbaImage> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image
        .resize(bounds.width, bounds.height, FilterType::Triangle)
        .to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SimulatedCamera;
    use crate::domain::capture::{FxMode, IsoMode};
    use crate::storage::{Ownership, StoragePaths};
    use crate::ui::canvas::HeadlessDisplay;
    use crate::ui::layout::{self, DESIGN_SIZE};
    use crate::ui::{IconSet, Screen};
    use std::fs;
    use tempfile::tempdir;

    const T: StorageTarget = StorageTarget::Photos;

    fn coordinator(dir: &Path) -> CaptureCoordinator<SimulatedCamera> {
        let screen = Screen::new(
            DESIGN_SIZE,
            Box::new(HeadlessDisplay::new()),
            layout::build(DESIGN_SIZE),
            IconSet::default(),
        )
        .expect("screen");
        let camera = SimulatedCamera::new(DESIGN_SIZE).with_output_limit(160);
        let store = ImageStore::new(StoragePaths::uniform(dir), Ownership::process());
        let timing = Timing {
            dwell: Duration::ZERO,
            spinner_interval: Duration::from_millis(5),
        };
        CaptureCoordinator::new(camera, store, SharedScreen::new(screen), timing)
            .expect("coordinator")
    }

    fn index(value: u16) -> ImageIndex {
        ImageIndex::new(value).expect("valid index")
    }

    #[test]
    fn take_picture_saves_next_index_and_loads_preview() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let photos = temp_dir.path().join("Photos");
        let mut coordinator = coordinator(&photos);

        let first = coordinator
            .take_picture(ScreenMode::Viewfinder, T, CaptureSettings::default())
            .expect("capture");
        let second = coordinator
            .take_picture(ScreenMode::Viewfinder, T, CaptureSettings::default())
            .expect("capture");

        assert_eq!((first, second), (index(1), index(2)));
        assert!(photos.join("IMG_0002.JPG").is_file());
        let loaded = coordinator.loaded_for(T).expect("preview loaded");
        assert_eq!(loaded.index, second);
        // 160x120 still scaled into 800x480 keeps 4:3.
        assert_eq!(loaded.image.dimensions(), (640, 480));
        assert_eq!(coordinator.device().resolution(), DESIGN_SIZE);
    }

    #[test]
    fn failed_capture_leaves_no_file_and_restores_viewfinder() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut coordinator = coordinator(temp_dir.path());
        coordinator.device_mut().fail_captures(true);

        let result = coordinator.take_picture(ScreenMode::Viewfinder, T, CaptureSettings::default());

        assert!(matches!(result, Err(Error::CaptureFailed(_))));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
        assert_eq!(coordinator.device().resolution(), DESIGN_SIZE);
        assert!(coordinator.loaded().is_none());
    }

    #[test]
    fn failed_capture_keeps_the_photo_under_review() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut coordinator = coordinator(temp_dir.path());
        let first = coordinator
            .take_picture(ScreenMode::Viewfinder, T, CaptureSettings::default())
            .expect("capture");
        coordinator.device_mut().fail_captures(true);

        let result = coordinator.take_picture(ScreenMode::Viewfinder, T, CaptureSettings::default());

        assert!(result.is_err());
        assert_eq!(coordinator.loaded().map(|l| l.index), Some(first));
        assert_eq!(coordinator.position(T), Some(first));
    }

    #[test]
    fn unusable_directory_reports_storage_unavailable() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"file").unwrap();
        let mut coordinator = coordinator(&blocker.join("Photos"));

        let result = coordinator.take_picture(ScreenMode::Viewfinder, T, CaptureSettings::default());
        assert!(matches!(result, Err(Error::StorageUnavailable { .. })));
    }

    #[test]
    fn show_adjacent_skips_gaps() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut coordinator = coordinator(temp_dir.path());
        for _ in 0..5 {
            coordinator
                .take_picture(ScreenMode::Viewfinder, T, CaptureSettings::default())
                .unwrap();
        }
        for value in [1, 2, 4] {
            fs::remove_file(temp_dir.path().join(index(value).file_name())).unwrap();
        }

        coordinator.show_image(ScreenMode::Playback, T, index(5)).unwrap();
        let previous = coordinator
            .show_adjacent(ScreenMode::Playback, T, Direction::Backward)
            .unwrap();
        assert_eq!(previous, Some(index(3)));
        assert_eq!(coordinator.position(T), Some(index(3)));
        assert_eq!(coordinator.loaded().map(|l| l.index), Some(index(3)));
    }

    #[test]
    fn show_adjacent_on_empty_target_clears_loaded() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut coordinator = coordinator(temp_dir.path());
        coordinator
            .take_picture(ScreenMode::Viewfinder, T, CaptureSettings::default())
            .unwrap();
        coordinator.delete(T, index(1)).unwrap();

        let next = coordinator
            .show_adjacent(ScreenMode::Playback, T, Direction::Backward)
            .unwrap();
        assert_eq!(next, None);
        assert!(coordinator.loaded().is_none());
        assert_eq!(coordinator.position(T), None);
    }

    #[test]
    fn loaded_image_is_scoped_to_its_target() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut coordinator = coordinator(temp_dir.path());
        coordinator
            .take_picture(ScreenMode::Viewfinder, T, CaptureSettings::default())
            .unwrap();

        assert!(coordinator.loaded_for(T).is_some());
        assert!(coordinator.loaded_for(StorageTarget::BootPartition).is_none());
        assert_eq!(coordinator.position(StorageTarget::BootPartition), None);
    }

    #[test]
    fn viewfinder_frame_matches_display() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut coordinator = coordinator(temp_dir.path());
        let frame = coordinator.viewfinder_frame().expect("frame");
        assert_eq!(frame.dimensions(), (800, 480));
    }

    #[test]
    fn apply_settings_reaches_device() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut coordinator = coordinator(temp_dir.path());
        let settings = CaptureSettings {
            fx: FxMode::Emboss,
            iso: IsoMode::Iso400,
            ..CaptureSettings::default()
        };
        coordinator.apply_settings(settings).unwrap();
        assert_eq!(coordinator.device().effect(), FxMode::Emboss);
        assert_eq!(coordinator.device().iso(), IsoMode::Iso400);
    }
}
