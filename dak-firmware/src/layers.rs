use dak_common::globals;
use embassy_time::{Duration, Instant};

use crate::matrix::{MatrixPos, SwitchState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layer {
    #[default]
    Normal,
    Fn,
}
impl Layer {
    pub fn index(self) -> usize {
        match self {
            Layer::Normal => 0,
            Layer::Fn => 1,
        }
    }
}

/// Which FN switch combination selects the FN layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FnActivation {
    #[default]
    Both,
    Either,
}

/// Binding that toggles FN-lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FnLockGesture {
    Disabled,
    /// Both FN switches become pressed together.
    PressBoth,
    /// Both FN switches held for the duration. Fires once per hold.
    HoldBoth(Duration),
    /// This switch is pressed while both FN switches are held.
    WithSwitch(MatrixPos),
}
impl FnLockGesture {
    pub const DEFAULT: Self =
        Self::HoldBoth(Duration::from_millis(globals::FN_LOCK_HOLD_TIME_DEFAULT_MS));
}
impl Default for FnLockGesture {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerState {
    pub fn_lock_on: bool,
    pub active_layer: Layer,
}

pub struct LayerSelector {
    fn_switches: [MatrixPos; 2],
    activation: FnActivation,
    gesture: FnLockGesture,
    state: LayerState,
    /// Set once every FN switch is up after the lock was set. Only then can an FN press clear it.
    lock_armed: bool,
    unlock_pending: bool,
    both_since: Option<Instant>,
    gesture_done: bool,
    prev_fn: [bool; 2],
    prev_combo: bool,
}

impl LayerSelector {
    pub fn new(
        fn_switches: [MatrixPos; 2],
        activation: FnActivation,
        gesture: FnLockGesture,
    ) -> Self {
        Self {
            fn_switches,
            activation,
            gesture,
            state: LayerState::default(),
            lock_armed: false,
            unlock_pending: false,
            both_since: None,
            gesture_done: false,
            prev_fn: [false; 2],
            prev_combo: false,
        }
    }

    pub fn state(&self) -> LayerState {
        self.state
    }

    pub fn fn_switches(&self) -> [MatrixPos; 2] {
        self.fn_switches
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.fn_switches, self.activation, self.gesture);
    }

    /// Recompute the layer from the stable FN switch states.
    pub fn update(&mut self, switches: &impl SwitchState, now: Instant) -> LayerState {
        let fn_down = self.fn_switches.map(|p| switches.is_pressed(p));
        let both = fn_down[0] && fn_down[1];
        let any = fn_down[0] || fn_down[1];
        let both_edge = both && !(self.prev_fn[0] && self.prev_fn[1]);

        if both_edge {
            self.both_since = Some(now);
            self.gesture_done = false;
        } else if !both {
            self.both_since = None;
        }

        let toggle = match self.gesture {
            FnLockGesture::Disabled => false,
            FnLockGesture::PressBoth => both_edge,
            FnLockGesture::HoldBoth(hold) => {
                !self.gesture_done && self.both_since.is_some_and(|t| t + hold <= now)
            }
            FnLockGesture::WithSwitch(pos) => {
                let combo = switches.is_pressed(pos);
                let edge = combo && !self.prev_combo;
                self.prev_combo = combo;
                both && edge
            }
        };

        if toggle {
            self.gesture_done = true;
            self.state.fn_lock_on = !self.state.fn_lock_on;
            self.lock_armed = false;
            self.unlock_pending = false;
            crate::debug!("FN lock {}", self.state.fn_lock_on);
        } else if self.state.fn_lock_on {
            if !self.lock_armed {
                self.lock_armed = !any;
            } else if any {
                self.unlock_pending = true;
            } else if self.unlock_pending {
                self.state.fn_lock_on = false;
                self.lock_armed = false;
                self.unlock_pending = false;
                crate::debug!("FN lock cleared");
            }
        }

        let held = match self.activation {
            FnActivation::Both => both,
            FnActivation::Either => any,
        };
        let layer = if self.state.fn_lock_on || held {
            Layer::Fn
        } else {
            Layer::Normal
        };
        if layer != self.state.active_layer {
            crate::debug!("layer {:?}", layer);
            self.state.active_layer = layer;
        }

        self.prev_fn = fn_down;
        self.state
    }
}

#[cfg(test)]
#[path = "layers_test.rs"]
mod test;
