use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::matrix::{MatrixPos, SwitchState};

/// Most stable transitions reported in one tick. Once reached, the remaining positions still have
/// their raw reading tracked but accept a stable change on a later tick.
pub const MAX_TRANSITIONS: usize = 32;

/// A debounced change of one switch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub pos: MatrixPos,
    pub from: bool,
    pub to: bool,
    pub at: Instant,
}
impl Transition {
    pub fn is_press(&self) -> bool {
        self.to
    }
}

/// Filter state of a single switch.
#[derive(Debug, Clone, Copy)]
pub struct SwitchSample {
    raw_state: bool,
    stable_state: bool,
    previous_stable_state: bool,
    last_change_time: Instant,
    /// The raw reading must hold until this instant before it becomes stable.
    bounce_deadline: Instant,
}
impl Default for SwitchSample {
    fn default() -> Self {
        Self {
            raw_state: false,
            stable_state: false,
            previous_stable_state: false,
            last_change_time: Instant::from_ticks(0),
            bounce_deadline: Instant::from_ticks(0),
        }
    }
}
impl SwitchSample {
    /// Feed one raw reading. Returns `(from, to)` when the stable state changes.
    pub fn sample(
        &mut self,
        raw_value: bool,
        now: Instant,
        bounce_time: Duration,
    ) -> Option<(bool, bool)> {
        if self.track(raw_value, now, bounce_time) {
            return None;
        }

        if raw_value != self.stable_state && now >= self.bounce_deadline {
            self.previous_stable_state = self.stable_state;
            self.stable_state = raw_value;
            self.last_change_time = now;
            return Some((self.previous_stable_state, self.stable_state));
        }
        None
    }

    /// Record a raw reading without accepting a stable change. True when the reading flipped.
    pub fn track(&mut self, raw_value: bool, now: Instant, bounce_time: Duration) -> bool {
        if raw_value == self.raw_state {
            return false;
        }
        // any flip restarts the bounce window
        self.raw_state = raw_value;
        self.bounce_deadline = now + bounce_time;
        true
    }

    pub fn is_pressed(&self) -> bool {
        self.stable_state
    }

    pub fn previous(&self) -> bool {
        self.previous_stable_state
    }

    pub fn last_change_time(&self) -> Instant {
        self.last_change_time
    }
}

pub struct Debouncer<const ROWS: usize, const COLS: usize> {
    switches: [[SwitchSample; COLS]; ROWS],
    /// Positions referenced by the layout. Others are never sampled.
    defined: [[bool; COLS]; ROWS],
    bounce_time: Duration,
}

impl<const ROWS: usize, const COLS: usize> Debouncer<ROWS, COLS> {
    pub fn new(bounce_time: Duration) -> Self {
        Self {
            switches: [[SwitchSample::default(); COLS]; ROWS],
            defined: [[false; COLS]; ROWS],
            bounce_time,
        }
    }

    pub fn define(&mut self, pos: MatrixPos) {
        if let Some(d) = self
            .defined
            .get_mut(pos.row())
            .and_then(|r| r.get_mut(pos.column()))
        {
            *d = true;
        }
    }

    pub fn is_defined(&self, pos: MatrixPos) -> bool {
        self.defined
            .get(pos.row())
            .and_then(|r| r.get(pos.column()))
            .copied()
            .unwrap_or(false)
    }

    /// Sample every defined switch in ascending row, column order and collect the stable
    /// transitions. Past [`MAX_TRANSITIONS`] a switch's stable change waits for the next tick.
    pub fn scan(
        &mut self,
        raw: &[[bool; COLS]; ROWS],
        now: Instant,
        transitions: &mut Vec<Transition, MAX_TRANSITIONS>,
    ) {
        for (row, ((switches, defined), raw)) in self
            .switches
            .iter_mut()
            .zip(self.defined.iter())
            .zip(raw.iter())
            .enumerate()
        {
            for (col, ((switch, _), raw_value)) in switches
                .iter_mut()
                .zip(defined.iter())
                .zip(raw.iter())
                .enumerate()
                .filter(|(_, ((_, d), _))| **d)
            {
                if transitions.is_full() {
                    switch.track(*raw_value, now, self.bounce_time);
                    continue;
                }
                if let Some((from, to)) = switch.sample(*raw_value, now, self.bounce_time) {
                    let _ = transitions.push(Transition {
                        pos: MatrixPos::new(row as u8, col as u8),
                        from,
                        to,
                        at: now,
                    });
                }
            }
        }
    }

    pub fn switch(&self, pos: MatrixPos) -> Option<&SwitchSample> {
        self.switches.get(pos.row())?.get(pos.column())
    }

    /// True when no defined switch is stable-pressed.
    pub fn all_released(&self) -> bool {
        self.switches
            .iter()
            .flatten()
            .zip(self.defined.iter().flatten())
            .all(|(s, d)| !*d || !s.stable_state)
    }

    pub fn set_bounce_time(&mut self, bounce_time: Duration) {
        self.bounce_time = bounce_time;
    }

    pub fn reset(&mut self) {
        for s in self.switches.iter_mut().flatten() {
            *s = SwitchSample::default();
        }
    }

    /// Write one line per row with `1` for pressed, `0` for released and `.` for undefined
    /// positions.
    #[cfg(feature = "debug-states")]
    pub fn dump(&self, w: &mut impl core::fmt::Write) -> core::fmt::Result {
        for (switches, defined) in self.switches.iter().zip(self.defined.iter()) {
            for (s, d) in switches.iter().zip(defined.iter()) {
                w.write_char(match (*d, s.stable_state) {
                    (false, _) => '.',
                    (true, true) => '1',
                    (true, false) => '0',
                })?;
            }
            w.write_char('\n')?;
        }
        Ok(())
    }
}

impl<const ROWS: usize, const COLS: usize> SwitchState for Debouncer<ROWS, COLS> {
    fn is_pressed(&self, pos: MatrixPos) -> bool {
        self.switch(pos).map(|s| s.stable_state).unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "debounce_test.rs"]
mod test;
