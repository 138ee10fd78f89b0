// SPDX-License-Identifier: MPL-2.0
//! Linux evdev touchscreen reader.
//!
//! Reads raw `struct input_event` records (64-bit layout: 16 bytes of
//! timestamp, then `u16 type`, `u16 code`, `i32 value`) and folds each
//! `SYN_REPORT` frame into at most one [`TouchEvent`].
//!
//! Axis values are taken as panel pixels unless an [`AxisScale`] maps the
//! controller's range onto the panel.

use super::{TouchEvent, TouchKind, TouchPoint, TouchSource};
use crate::domain::capture::Resolution;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Size of one `input_event` record on 64-bit Linux.
pub const EVENT_SIZE: usize = 24;

const EV_SYN: u16 = 0x00;
const EV_KEY: u16 = 0x01;
const EV_ABS: u16 = 0x03;

const SYN_REPORT: u16 = 0x00;
const BTN_TOUCH: u16 = 0x14a;
const ABS_X: u16 = 0x00;
const ABS_Y: u16 = 0x01;
const ABS_MT_POSITION_X: u16 = 0x35;
const ABS_MT_POSITION_Y: u16 = 0x36;

/// One decoded `input_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    #[must_use]
    pub fn parse(record: &[u8; EVENT_SIZE]) -> Self {
        Self {
            kind: u16::from_ne_bytes([record[16], record[17]]),
            code: u16::from_ne_bytes([record[18], record[19]]),
            value: i32::from_ne_bytes([record[20], record[21], record[22], record[23]]),
        }
    }
}

/// Maps raw `ABS_X`/`ABS_Y` values in `0..=max` onto panel pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisScale {
    max_x: u32,
    max_y: u32,
    panel: Resolution,
}

impl AxisScale {
    /// Returns `None` for a zero axis maximum.
    #[must_use]
    pub fn new(max_x: u32, max_y: u32, panel: Resolution) -> Option<Self> {
        (max_x > 0 && max_y > 0).then_some(Self {
            max_x,
            max_y,
            panel,
        })
    }

    #[must_use]
    pub fn map(self, x: u32, y: u32) -> TouchPoint {
        TouchPoint::new(
            scale_axis(x, self.max_x, self.panel.width),
            scale_axis(y, self.max_y, self.panel.height),
        )
    }
}

fn scale_axis(value: u32, max: u32, edge: u32) -> u32 {
    let scaled = u64::from(value.min(max)) * u64::from(edge.saturating_sub(1)) / u64::from(max);
    u32::try_from(scaled).unwrap_or(edge)
}

pub struct EvdevTouchSource<R> {
    reader: R,
    scale: Option<AxisScale>,
    x: Option<i32>,
    y: Option<i32>,
    touching: bool,
    pending: Option<TouchKind>,
}

impl EvdevTouchSource<BufReader<File>> {
    /// Opens an event device such as `/dev/input/event0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the device cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::Io(format!("{}: {}", path.display(), e)))?;
        log::info!("Reading touches from {}", path.display());
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: Read> EvdevTouchSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            scale: None,
            x: None,
            y: None,
            touching: false,
            pending: None,
        }
    }

    #[must_use]
    pub fn with_axis_scale(mut self, scale: Option<AxisScale>) -> Self {
        self.scale = scale;
        self
    }

    /// Feeds one raw event, returning the touch completed by a `SYN_REPORT`.
    pub fn process(&mut self, raw: RawEvent) -> Option<TouchEvent> {
        match (raw.kind, raw.code) {
            (EV_ABS, ABS_X | ABS_MT_POSITION_X) => {
                self.x = Some(raw.value);
                self.mark_moved();
            }
            (EV_ABS, ABS_Y | ABS_MT_POSITION_Y) => {
                self.y = Some(raw.value);
                self.mark_moved();
            }
            (EV_KEY, BTN_TOUCH) => {
                self.touching = raw.value != 0;
                self.pending = Some(if self.touching {
                    TouchKind::Press
                } else {
                    TouchKind::Release
                });
            }
            (EV_SYN, SYN_REPORT) => {
                let kind = self.pending.take()?;
                return Some(TouchEvent::new(kind, self.point()));
            }
            _ => {}
        }
        None
    }

    fn mark_moved(&mut self) {
        if self.touching && self.pending.is_none() {
            self.pending = Some(TouchKind::Move);
        }
    }

    fn point(&self) -> Option<TouchPoint> {
        let x = u32::try_from(self.x?).ok()?;
        let y = u32::try_from(self.y?).ok()?;
        Some(match self.scale {
            Some(scale) => scale.map(x, y),
            None => TouchPoint::new(x, y),
        })
    }
}

impl<R: Read + Send> TouchSource for EvdevTouchSource<R> {
    fn next_event(&mut self) -> Result<Option<TouchEvent>> {
        let mut record = [0u8; EVENT_SIZE];
        loop {
            match self.reader.read_exact(&mut record) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
                Err(err) => return Err(err.into()),
            }
            if let Some(event) = self.process(RawEvent::parse(&record)) {
                return Ok(Some(event));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(kind: u16, code: u16, value: i32) -> Vec<u8> {
        let mut bytes = vec![0u8; 16];
        bytes.extend_from_slice(&kind.to_ne_bytes());
        bytes.extend_from_slice(&code.to_ne_bytes());
        bytes.extend_from_slice(&value.to_ne_bytes());
        bytes
    }

    fn stream(events: &[(u16, u16, i32)]) -> EvdevTouchSource<Cursor<Vec<u8>>> {
        let bytes = events
            .iter()
            .flat_map(|&(kind, code, value)| record(kind, code, value))
            .collect();
        EvdevTouchSource::from_reader(Cursor::new(bytes))
    }

    #[test]
    fn tap_produces_press_then_release() {
        let mut source = stream(&[
            (EV_ABS, ABS_MT_POSITION_X, 120),
            (EV_ABS, ABS_MT_POSITION_Y, 300),
            (EV_KEY, BTN_TOUCH, 1),
            (EV_SYN, SYN_REPORT, 0),
            (EV_KEY, BTN_TOUCH, 0),
            (EV_SYN, SYN_REPORT, 0),
        ]);

        assert_eq!(
            source.next_event().unwrap(),
            Some(TouchEvent::press(120, 300))
        );
        assert_eq!(
            source.next_event().unwrap(),
            Some(TouchEvent::new(
                TouchKind::Release,
                Some(TouchPoint::new(120, 300))
            ))
        );
        assert_eq!(source.next_event().unwrap(), None);
    }

    #[test]
    fn motion_while_touching_is_a_move() {
        let mut source = stream(&[
            (EV_ABS, ABS_X, 10),
            (EV_ABS, ABS_Y, 10),
            (EV_KEY, BTN_TOUCH, 1),
            (EV_SYN, SYN_REPORT, 0),
            (EV_ABS, ABS_X, 15),
            (EV_SYN, SYN_REPORT, 0),
        ]);

        assert_eq!(source.next_event().unwrap().map(|e| e.kind), Some(TouchKind::Press));
        assert_eq!(
            source.next_event().unwrap(),
            Some(TouchEvent::new(TouchKind::Move, Some(TouchPoint::new(15, 10))))
        );
    }

    #[test]
    fn press_before_any_position_has_no_point() {
        let mut source = stream(&[(EV_KEY, BTN_TOUCH, 1), (EV_SYN, SYN_REPORT, 0)]);
        assert_eq!(
            source.next_event().unwrap(),
            Some(TouchEvent::new(TouchKind::Press, None))
        );
    }

    #[test]
    fn unrelated_events_and_empty_reports_are_skipped() {
        let mut source = stream(&[
            (EV_SYN, SYN_REPORT, 0),
            (0x04, 0x04, 7), // EV_MSC / MSC_SCAN
            (EV_ABS, ABS_X, 5),
            (EV_SYN, SYN_REPORT, 0),
        ]);
        assert_eq!(source.next_event().unwrap(), None);
    }

    #[test]
    fn negative_coordinates_are_invalid() {
        let mut source = EvdevTouchSource::from_reader(io::empty());
        source.process(RawEvent { kind: EV_ABS, code: ABS_X, value: -4 });
        source.process(RawEvent { kind: EV_ABS, code: ABS_Y, value: 9 });
        source.process(RawEvent { kind: EV_KEY, code: BTN_TOUCH, value: 1 });
        let event = source.process(RawEvent { kind: EV_SYN, code: SYN_REPORT, value: 0 });
        assert_eq!(event, Some(TouchEvent::new(TouchKind::Press, None)));
    }

    #[test]
    fn axis_scale_maps_controller_range_onto_panel() {
        let scale = AxisScale::new(4095, 4095, Resolution::new(800, 480));
        let mut source = stream(&[
            (EV_ABS, ABS_X, 4095),
            (EV_ABS, ABS_Y, 2048),
            (EV_KEY, BTN_TOUCH, 1),
            (EV_SYN, SYN_REPORT, 0),
        ])
        .with_axis_scale(scale);

        assert_eq!(source.next_event().unwrap(), Some(TouchEvent::press(799, 239)));
    }

    #[test]
    fn axis_scale_clamps_out_of_range_values() {
        let scale = AxisScale::new(1000, 600, Resolution::new(800, 480)).expect("scale");
        assert_eq!(scale.map(0, 0), TouchPoint::new(0, 0));
        assert_eq!(scale.map(5000, 700), TouchPoint::new(799, 479));
        assert!(AxisScale::new(0, 600, Resolution::new(800, 480)).is_none());
    }

    #[test]
    fn truncated_record_ends_input() {
        let mut bytes = record(EV_KEY, BTN_TOUCH, 1);
        bytes.truncate(10);
        let mut source = EvdevTouchSource::from_reader(Cursor::new(bytes));
        assert_eq!(source.next_event().unwrap(), None);
    }
}
