use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};
use embedded_hal::digital::OutputPin;

/// Caps lock bit of the host's keyboard LED output report.
pub const CAPS_LOCK: u8 = 1 << 1;

/// Keyboard LEDs.
pub trait Indicator {
    fn set_fn_lock(&mut self, on: bool);

    fn set_caps_lock(&mut self, _on: bool) {}
}

impl Indicator for () {
    fn set_fn_lock(&mut self, _on: bool) {}
}

fn drive(pin: &mut impl OutputPin, on: bool) {
    let _ = if on { pin.set_high() } else { pin.set_low() };
}

/// An FN-lock LED on an output pin, lit while high.
pub struct LedPin<P: OutputPin>(pub P);
impl<P: OutputPin> Indicator for LedPin<P> {
    fn set_fn_lock(&mut self, on: bool) {
        drive(&mut self.0, on);
    }
}

/// Caps-lock and FN-lock LEDs, each lit while its pin is high.
pub struct LedPins<C: OutputPin, F: OutputPin> {
    pub caps_lock: C,
    pub fn_lock: F,
}
impl<C: OutputPin, F: OutputPin> Indicator for LedPins<C, F> {
    fn set_fn_lock(&mut self, on: bool) {
        drive(&mut self.fn_lock, on);
    }

    fn set_caps_lock(&mut self, on: bool) {
        drive(&mut self.caps_lock, on);
    }
}

/// LED state last reported by the host. The USB task signals each output report and the scan
/// loop picks up the latest one.
pub struct HostLeds<M: RawMutex>(Signal<M, u8>);
impl<M: RawMutex> Default for HostLeds<M> {
    fn default() -> Self {
        Self::new()
    }
}
impl<M: RawMutex> HostLeds<M> {
    pub const fn new() -> Self {
        Self(Signal::new())
    }

    pub fn signal(&self, leds: u8) {
        self.0.signal(leds);
    }

    pub fn take(&self) -> Option<u8> {
        self.0.try_take()
    }
}

#[cfg(test)]
#[path = "indicator_test.rs"]
mod test;
