// SPDX-License-Identifier: MPL-2.0
//! The screen: canvas, display, buttons and icons behind one lock.
//!
//! The main loop renders through [`SharedScreen`] and the busy worker draws
//! its animation through the same handle, so the two never interleave a
//! half-drawn frame.

use super::button::ButtonRegistry;
use super::canvas::{Canvas, Color, Display};
use super::icons::{IconKey, IconSet};
use super::layout;
use crate::busy::{BusyView, SPINNER_FRAMES};
use crate::domain::capture::Resolution;
use crate::domain::screen::{Action, Rect, ScreenMode};
use crate::error::Result;
use image_rs::RgbaImage;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What to paint behind the buttons.
#[derive(Debug)]
pub enum Backdrop<'a> {
    /// A fresh viewfinder frame, or `None` to keep showing the last good one.
    Live(Option<RgbaImage>),
    /// A loaded photo; `None` paints black.
    Still(Option<&'a RgbaImage>),
    Empty,
}

pub struct Screen {
    canvas: Canvas,
    display: Box<dyn Display>,
    buttons: ButtonRegistry,
    icons: IconSet,
    /// Mode of the last completed render; `None` forces a full repaint.
    drawn_mode: Option<ScreenMode>,
    last_frame: Option<RgbaImage>,
}

impl Screen {
    /// # Errors
    ///
    /// Returns an error for a zero-sized display.
    pub fn new(
        size: Resolution,
        display: Box<dyn Display>,
        buttons: ButtonRegistry,
        icons: IconSet,
    ) -> Result<Self> {
        Ok(Self {
            canvas: Canvas::new(size)?,
            display,
            buttons,
            icons,
            drawn_mode: None,
            last_frame: None,
        })
    }

    #[must_use]
    pub fn resolution(&self) -> Resolution {
        self.canvas.resolution()
    }

    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[must_use]
    pub fn buttons(&self) -> &ButtonRegistry {
        &self.buttons
    }

    /// Action of the button under a touch point in `mode`, if any.
    #[must_use]
    pub fn action_at(&self, mode: ScreenMode, x: i32, y: i32) -> Option<Action> {
        self.buttons
            .hit_test(mode, x, y)
            .and_then(ButtonRegistry::activate)
    }

    /// Drops the last good frame and makes the next render repaint
    /// everything.
    pub fn force_redraw(&mut self) {
        self.drawn_mode = None;
        self.last_frame = None;
    }

    /// Paints one complete frame and presents it.
    pub fn render(
        &mut self,
        mode: ScreenMode,
        backdrop: Backdrop<'_>,
        alert: bool,
        is_selected: impl Fn(Action) -> bool,
    ) -> Result<()> {
        if self.drawn_mode != Some(mode) {
            log::debug!("Screen mode {:?} -> {:?}", self.drawn_mode, mode);
            self.last_frame = None;
        }

        match backdrop {
            Backdrop::Live(frame) => {
                if frame.is_some() {
                    self.last_frame = frame;
                }
                match &self.last_frame {
                    Some(frame) => self.canvas.draw_image(frame),
                    None => self.canvas.clear(Color::BLACK),
                }
            }
            Backdrop::Still(Some(image)) => self.canvas.draw_image(image),
            Backdrop::Still(None) | Backdrop::Empty => self.canvas.clear(Color::BLACK),
        }

        self.buttons.draw(mode, &mut self.canvas, &self.icons);
        self.buttons
            .draw_selection(mode, &mut self.canvas, &self.icons, is_selected);
        if alert {
            self.draw_alert();
        }

        self.display.present(&self.canvas)?;
        self.drawn_mode = Some(mode);
        Ok(())
    }

    /// Shows a freshly captured photo full screen.
    pub fn show_preview(&mut self, image: &RgbaImage) -> Result<()> {
        self.canvas.draw_image(image);
        self.display.present(&self.canvas)?;
        self.force_redraw();
        Ok(())
    }

    fn draw_alert(&mut self) {
        let banner = layout::alert_rect(self.canvas.resolution());
        self.canvas.fill_rect(banner, Color::ALERT);
        if let Some(icon) = self.icons.get(IconKey::Error) {
            self.canvas.blit_centered(icon, banner);
        }
    }

    fn anchor_rect(&self, mode: ScreenMode, anchor: usize) -> Option<Rect> {
        self.buttons.button(mode, anchor).map(|b| b.rect)
    }

    fn draw_anchor(&mut self, mode: ScreenMode, anchor: usize) {
        if let Some(button) = self.buttons.button(mode, anchor) {
            button.draw(&mut self.canvas, &self.icons);
        }
    }

    fn draw_spinner(&mut self, anchor: Rect, frame: u8) {
        let area = layout::spinner_rect(anchor);
        self.canvas.fill_rect(area, Color::SPINNER_DIM);

        let segments = u32::from(SPINNER_FRAMES);
        let segment_width = (area.width / segments).max(1);
        let lit = Rect::new(
            area.x + (u32::from(frame % SPINNER_FRAMES) * segment_width) as i32,
            area.y,
            segment_width,
            area.height,
        );
        self.canvas.fill_rect(lit, Color::WHITE);
    }

    fn present_or_log(&mut self) {
        if let Err(err) = self.display.present(&self.canvas) {
            log::warn!("Could not present busy frame: {}", err);
        }
    }
}

/// Screen shared between the main loop and the busy worker.
#[derive(Clone)]
pub struct SharedScreen(Arc<Mutex<Screen>>);

impl SharedScreen {
    #[must_use]
    pub fn new(screen: Screen) -> Self {
        Self(Arc::new(Mutex::new(screen)))
    }

    /// Locks the screen. A panic on another thread cannot leave the screen
    /// in an unusable state, so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, Screen> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BusyView for SharedScreen {
    fn busy_anchor(&self, mode: ScreenMode) -> Option<usize> {
        self.lock().buttons.busy_anchor(mode)
    }

    fn show_working(&self, mode: ScreenMode, anchor: usize) {
        let mut screen = self.lock();
        screen.buttons.set_icon(mode, anchor, Some(IconKey::Working));
        screen.draw_anchor(mode, anchor);
        screen.present_or_log();
    }

    fn refresh(&self, mode: ScreenMode, anchor: usize, frame: u8) {
        let mut screen = self.lock();
        let Some(rect) = screen.anchor_rect(mode, anchor) else {
            return;
        };
        screen.draw_anchor(mode, anchor);
        screen.draw_spinner(rect, frame);
        screen.present_or_log();
    }

    fn hide_working(&self, mode: ScreenMode, anchor: usize) {
        let mut screen = self.lock();
        screen.buttons.set_icon(mode, anchor, None);
        screen.force_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::canvas::HeadlessDisplay;
    use crate::ui::layout::DESIGN_SIZE;
    use std::sync::atomic::Ordering;
    use tiny_skia::Pixmap;

    fn screen_with_counter() -> (Screen, Arc<std::sync::atomic::AtomicUsize>) {
        let display = HeadlessDisplay::new();
        let counter = display.frame_counter();
        let mut icons = IconSet::default();
        let mut radio = Pixmap::new(4, 4).unwrap();
        radio.fill(tiny_skia::Color::WHITE);
        icons.insert(IconKey::RadioOn, radio);
        let screen = Screen::new(
            DESIGN_SIZE,
            Box::new(display),
            layout::build(DESIGN_SIZE),
            icons,
        )
        .unwrap();
        (screen, counter)
    }

    #[test]
    fn render_presents_one_frame() {
        let (mut screen, counter) = screen_with_counter();
        screen
            .render(ScreenMode::NoImages, Backdrop::Empty, false, |_| false)
            .unwrap();
        assert_eq!(counter.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn live_backdrop_keeps_last_good_frame_until_mode_change() {
        let (mut screen, _) = screen_with_counter();
        let frame = RgbaImage::from_pixel(800, 480, image_rs::Rgba([0, 0, 255, 255]));
        let blue = Some(Color::rgb(0, 0, 255));

        screen
            .render(ScreenMode::Viewfinder, Backdrop::Live(Some(frame)), false, |_| false)
            .unwrap();
        screen
            .render(ScreenMode::Viewfinder, Backdrop::Live(None), false, |_| false)
            .unwrap();
        assert_eq!(screen.canvas().pixel(400, 100), blue);

        screen
            .render(ScreenMode::Playback, Backdrop::Still(None), false, |_| false)
            .unwrap();
        screen
            .render(ScreenMode::Viewfinder, Backdrop::Live(None), false, |_| false)
            .unwrap();
        assert_eq!(screen.canvas().pixel(400, 100), Some(Color::BLACK));
    }

    #[test]
    fn alert_banner_is_painted() {
        let (mut screen, _) = screen_with_counter();
        screen
            .render(ScreenMode::Viewfinder, Backdrop::Live(None), true, |_| false)
            .unwrap();
        let banner = layout::alert_rect(DESIGN_SIZE);
        assert_eq!(
            screen.canvas().pixel(banner.x as u32 + 1, banner.y as u32 + 1),
            Some(Color::ALERT)
        );
    }

    #[test]
    fn selection_marker_drawn_only_on_selected_option() {
        use crate::domain::capture::SizeMode;
        use crate::domain::screen::SettingsPage;

        let (mut screen, _) = screen_with_counter();
        screen
            .render(
                ScreenMode::Settings(SettingsPage::Size),
                Backdrop::Empty,
                false,
                |action| action == Action::SelectSize(SizeMode::Medium),
            )
            .unwrap();

        // Options are 240x220 at x = 20/280/540, y = 140; marker is centered.
        assert_eq!(screen.canvas().pixel(400, 250), Some(Color::WHITE));
        assert_eq!(screen.canvas().pixel(140, 250), Some(Color::BLACK));
    }

    #[test]
    fn busy_view_swaps_anchor_icon_and_forces_redraw() {
        let (screen, counter) = screen_with_counter();
        let shared = SharedScreen::new(screen);
        let mode = ScreenMode::Playback;
        let anchor = shared.busy_anchor(mode).expect("anchor");

        shared.show_working(mode, anchor);
        assert_eq!(
            shared.lock().buttons().button(mode, anchor).unwrap().background,
            Some(IconKey::Working)
        );
        shared.refresh(mode, anchor, 2);
        shared.hide_working(mode, anchor);

        let screen = shared.lock();
        assert_eq!(screen.buttons().button(mode, anchor).unwrap().background, None);
        assert!(screen.drawn_mode.is_none());
        assert_eq!(counter.load(Ordering::Relaxed), 2);
    }
}
