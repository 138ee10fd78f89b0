// SPDX-License-Identifier: MPL-2.0
//! Busy indicator shown while the main loop is blocked on slow work.
//!
//! A worker thread swaps the busy anchor's icon to "working" and animates a
//! spinner until the completion flag is raised. [`BusyIndicator`] raises the
//! flag and joins the worker when finished or dropped, so the icon is
//! restored on every exit path, error returns included.

use crate::domain::screen::ScreenMode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Number of spinner animation frames.
pub const SPINNER_FRAMES: u8 = 5;

/// Default delay between spinner frames.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(150);

/// Surface the busy worker draws on.
pub trait BusyView: Clone + Send + 'static {
    /// Slot of the button that hosts the indicator in `mode`.
    fn busy_anchor(&self, mode: ScreenMode) -> Option<usize>;

    /// Swaps the anchor icon to "working" and presents once.
    fn show_working(&self, mode: ScreenMode, anchor: usize);

    /// Draws animation frame `frame` (`0..SPINNER_FRAMES`).
    fn refresh(&self, mode: ScreenMode, anchor: usize, frame: u8);

    /// Clears the anchor icon and forces a full redraw.
    fn hide_working(&self, mode: ScreenMode, anchor: usize);
}

/// Handle on a running busy animation.
#[derive(Debug)]
pub struct BusyIndicator {
    done: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl BusyIndicator {
    /// Starts the animation on the busy anchor of `mode`.
    ///
    /// Modes without an anchor get an inert indicator.
    pub fn start<V: BusyView>(view: &V, mode: ScreenMode, interval: Duration) -> Self {
        let done = Arc::new(AtomicBool::new(false));
        let Some(anchor) = view.busy_anchor(mode) else {
            log::debug!("No busy anchor in {:?}", mode);
            return Self { done, worker: None };
        };

        let view = view.clone();
        let flag = Arc::clone(&done);
        let spawned = thread::Builder::new()
            .name("busy-indicator".into())
            .spawn(move || animate(&view, mode, anchor, interval, &flag));

        let worker = match spawned {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::warn!("Could not start busy indicator: {}", err);
                None
            }
        };
        Self { done, worker }
    }

    /// Stops the animation and waits until the icon is restored.
    pub fn finish(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.done.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            worker.thread().unpark();
            if worker.join().is_err() {
                log::warn!("Busy indicator thread panicked");
            }
        }
    }
}

impl Drop for BusyIndicator {
    fn drop(&mut self) {
        self.stop();
    }
}

fn animate<V: BusyView>(
    view: &V,
    mode: ScreenMode,
    anchor: usize,
    interval: Duration,
    done: &AtomicBool,
) {
    view.show_working(mode, anchor);

    let mut frame = 0u8;
    while !done.load(Ordering::Acquire) {
        // Unparked early by `stop`; spurious wakeups only cost a frame.
        thread::park_timeout(interval);
        if done.load(Ordering::Acquire) {
            break;
        }
        frame = (frame + 1) % SPINNER_FRAMES;
        view.refresh(mode, anchor, frame);
    }

    view.hide_working(mode, anchor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Show(usize),
        Refresh(u8),
        Hide(usize),
    }

    #[derive(Clone, Default)]
    struct RecordingView {
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl RecordingView {
        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }
    }

    impl BusyView for RecordingView {
        fn busy_anchor(&self, mode: ScreenMode) -> Option<usize> {
            (mode == ScreenMode::Viewfinder).then_some(2)
        }

        fn show_working(&self, _mode: ScreenMode, anchor: usize) {
            self.events.lock().unwrap().push(Event::Show(anchor));
        }

        fn refresh(&self, _mode: ScreenMode, _anchor: usize, frame: u8) {
            self.events.lock().unwrap().push(Event::Refresh(frame));
        }

        fn hide_working(&self, _mode: ScreenMode, anchor: usize) {
            self.events.lock().unwrap().push(Event::Hide(anchor));
        }
    }

    #[test]
    fn finish_restores_icon_once() {
        let view = RecordingView::default();
        let busy = BusyIndicator::start(&view, ScreenMode::Viewfinder, Duration::from_secs(60));
        busy.finish();

        assert_eq!(view.events(), vec![Event::Show(2), Event::Hide(2)]);
    }

    #[test]
    fn drop_restores_icon_on_early_return() {
        fn failing_work(view: &RecordingView) -> Result<(), &'static str> {
            let _busy = BusyIndicator::start(view, ScreenMode::Viewfinder, DEFAULT_INTERVAL);
            Err("disk full")
        }

        let view = RecordingView::default();
        assert!(failing_work(&view).is_err());

        let events = view.events();
        assert_eq!(events.first(), Some(&Event::Show(2)));
        assert_eq!(events.last(), Some(&Event::Hide(2)));
    }

    #[test]
    fn frames_advance_modulo_five() {
        let view = RecordingView::default();
        let busy = BusyIndicator::start(&view, ScreenMode::Viewfinder, Duration::from_millis(1));
        thread::sleep(Duration::from_millis(100));
        busy.finish();

        let frames: Vec<u8> = view
            .events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Refresh(frame) => Some(frame),
                _ => None,
            })
            .collect();
        assert!(frames.len() >= SPINNER_FRAMES as usize, "only {} frames", frames.len());
        assert!(frames.iter().all(|&f| f < SPINNER_FRAMES));
        assert_eq!(&frames[..5], &[1, 2, 3, 4, 0]);
    }

    #[test]
    fn mode_without_anchor_draws_nothing() {
        let view = RecordingView::default();
        BusyIndicator::start(&view, ScreenMode::NoImages, DEFAULT_INTERVAL).finish();
        assert!(view.events().is_empty());
    }
}
