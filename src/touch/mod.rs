// SPDX-License-Identifier: MPL-2.0
//! Touch input: raw events from a source thread, handed to the main loop one
//! logical touch at a time.
//!
//! The source thread calls [`TouchHandle::deliver`] for every event it reads.
//! Only presses carrying a valid point are queued, and at most one at a time:
//! while the main loop processes a touch (a capture can take seconds) every
//! new press is dropped instead of piling up behind it.

pub mod evdev;
pub mod stdin;

pub use evdev::{AxisScale, EvdevTouchSource};
pub use stdin::StdinTouchSource;

use crate::error::Result;
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Screen coordinates of a touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TouchPoint {
    pub x: u32,
    pub y: u32,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchKind {
    Press,
    Release,
    Move,
}

/// One event from a touch source. `point` is `None` when the driver could
/// not resolve a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    pub kind: TouchKind,
    pub point: Option<TouchPoint>,
}

impl TouchEvent {
    #[must_use]
    pub fn press(x: u32, y: u32) -> Self {
        Self {
            kind: TouchKind::Press,
            point: Some(TouchPoint::new(x, y)),
        }
    }

    #[must_use]
    pub fn new(kind: TouchKind, point: Option<TouchPoint>) -> Self {
        Self { kind, point }
    }
}

#[derive(Debug, Default)]
struct Flags {
    processing: AtomicBool,
    quit: AtomicBool,
}

/// Main-loop side of the touch handoff.
#[derive(Debug)]
pub struct TouchDispatcher {
    pending: Receiver<TouchPoint>,
    flags: Arc<Flags>,
}

/// Input-thread side of the touch handoff.
#[derive(Debug, Clone)]
pub struct TouchHandle {
    pending: Sender<TouchPoint>,
    flags: Arc<Flags>,
}

impl TouchDispatcher {
    #[must_use]
    pub fn new() -> (Self, TouchHandle) {
        let (tx, rx) = bounded(1);
        let flags = Arc::new(Flags::default());
        (
            Self {
                pending: rx,
                flags: Arc::clone(&flags),
            },
            TouchHandle { pending: tx, flags },
        )
    }

    /// Takes the queued touch, if any. The touch counts as processing until
    /// the returned guard is dropped.
    pub fn poll(&self) -> Option<PendingTouch<'_>> {
        let point = match self.pending.try_recv() {
            Ok(point) => point,
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => return None,
        };
        self.flags.processing.store(true, Ordering::SeqCst);
        Some(PendingTouch {
            point,
            dispatcher: self,
        })
    }

    pub fn request_quit(&self) {
        self.flags.quit.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.flags.quit.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.flags.processing.load(Ordering::SeqCst)
    }
}

/// A touch taken from the queue. Dropping it ends processing and discards
/// any press that slipped in meanwhile.
#[derive(Debug)]
pub struct PendingTouch<'a> {
    point: TouchPoint,
    dispatcher: &'a TouchDispatcher,
}

impl PendingTouch<'_> {
    #[must_use]
    pub fn point(&self) -> TouchPoint {
        self.point
    }
}

impl Drop for PendingTouch<'_> {
    fn drop(&mut self) {
        while let Ok(stale) = self.dispatcher.pending.try_recv() {
            log::debug!("Dropping touch at ({}, {}) queued while busy", stale.x, stale.y);
        }
        self.dispatcher
            .flags
            .processing
            .store(false, Ordering::SeqCst);
    }
}

impl TouchHandle {
    /// Queues a valid press. Returns `false` when the event was dropped.
    pub fn deliver(&self, event: TouchEvent) -> bool {
        let (TouchKind::Press, Some(point)) = (event.kind, event.point) else {
            return false;
        };
        if self.flags.processing.load(Ordering::SeqCst) {
            return false;
        }
        match self.pending.try_send(point) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }

    pub fn request_quit(&self) {
        self.flags.quit.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.flags.quit.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Sources
// =============================================================================

/// A blocking producer of touch events.
pub trait TouchSource: Send {
    /// Waits for the next event. `Ok(None)` means the input ended and the
    /// appliance should quit.
    fn next_event(&mut self) -> Result<Option<TouchEvent>>;
}

/// Background thread pumping a [`TouchSource`] into a [`TouchHandle`].
///
/// Sources block in `read`, so stopping only raises a flag; the thread exits
/// after its next event or is left behind when the process ends.
#[derive(Debug)]
pub struct TouchThread {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TouchThread {
    #[must_use]
    pub fn spawn(mut source: Box<dyn TouchSource>, touches: TouchHandle) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::SeqCst) {
                match source.next_event() {
                    Ok(Some(event)) => {
                        if stop_flag.load(Ordering::SeqCst) {
                            break;
                        }
                        touches.deliver(event);
                    }
                    Ok(None) => {
                        log::info!("Touch input ended, quitting");
                        touches.request_quit();
                        break;
                    }
                    Err(err) => {
                        log::error!("Touch input failed: {}", err);
                        touches.request_quit();
                        break;
                    }
                }
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Asks the thread to stop and joins it if it already finished.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        let Some(handle) = self.handle.take() else {
            return;
        };
        if handle.is_finished() {
            if handle.join().is_err() {
                log::warn!("Touch thread panicked");
            }
        } else {
            log::debug!("Touch thread still waiting for input, detaching");
        }
    }
}

impl Drop for TouchThread {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::VecDeque;
    use std::time::{Duration, Instant};

    #[test]
    fn only_valid_presses_are_queued() {
        let (dispatcher, handle) = TouchDispatcher::new();

        assert!(!handle.deliver(TouchEvent::new(TouchKind::Release, Some(TouchPoint::new(1, 1)))));
        assert!(!handle.deliver(TouchEvent::new(TouchKind::Move, Some(TouchPoint::new(1, 1)))));
        assert!(!handle.deliver(TouchEvent::new(TouchKind::Press, None)));
        assert!(dispatcher.poll().is_none());

        assert!(handle.deliver(TouchEvent::press(10, 20)));
        let touch = dispatcher.poll().expect("queued touch");
        assert_eq!(touch.point(), TouchPoint::new(10, 20));
    }

    #[test]
    fn second_press_is_dropped_while_one_is_pending() {
        let (dispatcher, handle) = TouchDispatcher::new();

        assert!(handle.deliver(TouchEvent::press(1, 1)));
        assert!(!handle.deliver(TouchEvent::press(2, 2)));

        let touch = dispatcher.poll().expect("queued touch");
        assert_eq!(touch.point(), TouchPoint::new(1, 1));
    }

    #[test]
    fn presses_are_dropped_while_processing() {
        let (dispatcher, handle) = TouchDispatcher::new();
        handle.deliver(TouchEvent::press(1, 1));

        let touch = dispatcher.poll().expect("queued touch");
        assert!(dispatcher.is_processing());
        assert!(!handle.deliver(TouchEvent::press(5, 5)));
        drop(touch);

        assert!(!dispatcher.is_processing());
        assert!(dispatcher.poll().is_none());
        assert!(handle.deliver(TouchEvent::press(6, 6)));
        assert_eq!(dispatcher.poll().map(|t| t.point()), Some(TouchPoint::new(6, 6)));
    }

    #[test]
    fn dropping_guard_drains_press_that_slipped_in() {
        let (dispatcher, handle) = TouchDispatcher::new();
        handle.deliver(TouchEvent::press(1, 1));
        let touch = dispatcher.poll().expect("queued touch");

        // A press racing with `poll` can land before the processing flag is
        // observed; simulate it by sending straight into the channel.
        handle.pending.try_send(TouchPoint::new(9, 9)).expect("slot free");
        drop(touch);

        assert!(dispatcher.poll().is_none());
    }

    #[test]
    fn delivery_after_main_loop_exit_is_dropped() {
        let (dispatcher, handle) = TouchDispatcher::new();
        drop(dispatcher);

        assert!(!handle.deliver(TouchEvent::press(1, 1)));
    }

    #[test]
    fn quit_requests_cross_threads() {
        let (dispatcher, handle) = TouchDispatcher::new();
        assert!(!dispatcher.quit_requested());

        let remote = handle.clone();
        thread::spawn(move || remote.request_quit())
            .join()
            .expect("thread");

        assert!(dispatcher.quit_requested());
        assert!(handle.quit_requested());
    }

    struct ScriptedSource {
        events: VecDeque<Result<Option<TouchEvent>>>,
    }

    impl TouchSource for ScriptedSource {
        fn next_event(&mut self) -> Result<Option<TouchEvent>> {
            self.events.pop_front().unwrap_or(Ok(None))
        }
    }

    fn wait_for_quit(dispatcher: &TouchDispatcher) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !dispatcher.quit_requested() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn thread_delivers_events_and_quits_at_end_of_input() {
        let (dispatcher, handle) = TouchDispatcher::new();
        let source = ScriptedSource {
            events: VecDeque::from(vec![Ok(Some(TouchEvent::press(3, 4)))]),
        };

        let mut touch_thread = TouchThread::spawn(Box::new(source), handle);
        wait_for_quit(&dispatcher);
        touch_thread.stop();

        assert!(dispatcher.quit_requested());
        assert_eq!(dispatcher.poll().map(|t| t.point()), Some(TouchPoint::new(3, 4)));
    }

    #[test]
    fn thread_quits_on_source_error() {
        let (dispatcher, handle) = TouchDispatcher::new();
        let source = ScriptedSource {
            events: VecDeque::from(vec![Err(Error::Io("device unplugged".to_string()))]),
        };

        let _touch_thread = TouchThread::spawn(Box::new(source), handle);
        wait_for_quit(&dispatcher);

        assert!(dispatcher.quit_requested());
        assert!(dispatcher.poll().is_none());
    }
}
