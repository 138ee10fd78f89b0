// SPDX-License-Identifier: MPL-2.0
//! Line-oriented touch input for bench setups without a touchscreen.
//!
//! Each line is `x y` (or `x,y`) and taps that point; `quit` or end of input
//! ends the session. Anything else is logged and skipped.

use super::{TouchEvent, TouchSource};
use crate::error::Result;
use std::io::{self, BufRead, BufReader, Stdin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Tap(u32, u32),
    Quit,
    Blank,
}

fn parse_line(line: &str) -> Option<Line> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Some(Line::Blank);
    }
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("q") {
        return Some(Line::Quit);
    }
    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Line::Tap(x, y))
}

pub struct StdinTouchSource<R> {
    reader: R,
}

impl StdinTouchSource<BufReader<Stdin>> {
    #[must_use]
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead> StdinTouchSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead + Send> TouchSource for StdinTouchSource<R> {
    fn next_event(&mut self) -> Result<Option<TouchEvent>> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match parse_line(&line) {
                Some(Line::Tap(x, y)) => return Ok(Some(TouchEvent::press(x, y))),
                Some(Line::Quit) => return Ok(None),
                Some(Line::Blank) => {}
                None => log::warn!("Ignoring touch input '{}', expected 'x y'", line.trim()),
            }
        }
    }
}
