use dak_common::keycodes::key_range::{MODIFIER_MAX, MODIFIER_MIN};
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};

use crate::warn;

/// An ordered change to the host-visible key state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    Basic(u8, bool),
    /// Modifier bits whose holder count crossed zero.
    Modifiers(u8, bool),
    /// Consumer control usage, `0` when released.
    Consumer(u16),
    /// System control usage, `0` when released.
    SysCtl(u16),
    Clear,
}
impl KeyEvent {
    pub fn basic(kc8: u8, is_down: bool) -> Self {
        Self::Basic(kc8, is_down)
    }

    pub fn consumer(usage: u16, is_down: bool) -> Self {
        Self::Consumer(if is_down { usage } else { 0 })
    }

    pub fn sys_ctl(usage: u16, is_down: bool) -> Self {
        Self::SysCtl(if is_down { usage } else { 0 })
    }
}

/// Receives the resolver's output in order.
pub trait HidEmitter {
    fn report(&mut self, event: KeyEvent);
}

impl<E: HidEmitter + ?Sized> HidEmitter for &mut E {
    fn report(&mut self, event: KeyEvent) {
        (**self).report(event)
    }
}

/// Queue of key events for the USB task.
pub struct ReportChannel<M: RawMutex, const N: usize>(Channel<M, KeyEvent, N>);
impl<M: RawMutex, const N: usize> Default for ReportChannel<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
impl<M: RawMutex, const N: usize> ReportChannel<M, N> {
    pub const fn new() -> Self {
        Self(Channel::new())
    }

    pub async fn receive(&self) -> KeyEvent {
        self.0.receive().await
    }

    pub fn try_receive(&self) -> Option<KeyEvent> {
        self.0.try_receive().ok()
    }
}

impl<M: RawMutex, const N: usize> HidEmitter for &ReportChannel<M, N> {
    /// On overflow the queued events are dropped and the host is told to release everything.
    fn report(&mut self, event: KeyEvent) {
        if self.0.try_send(event).is_err() {
            warn!("report channel full");
            self.0.clear();
            let _ = self.0.try_send(KeyEvent::Clear);
        }
    }
}

/// Boot protocol keyboard report plus the consumer and system control usages.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BootReport {
    keyboard: [u8; 8],
    consumer: u16,
    system: u16,
}

impl BootReport {
    /// Modifier byte, reserved byte, six key codes.
    pub fn keyboard_report(&self) -> [u8; 8] {
        self.keyboard
    }

    pub fn modifiers(&self) -> u8 {
        self.keyboard[0]
    }

    pub fn keys(&self) -> &[u8] {
        &self.keyboard[2..]
    }

    pub fn consumer_report(&self) -> [u8; 2] {
        self.consumer.to_le_bytes()
    }

    pub fn system_report(&self) -> [u8; 2] {
        self.system.to_le_bytes()
    }

    fn add_key(&mut self, key: u8) {
        if is_modifier_key(key) {
            self.keyboard[0] |= 1 << (key - MODIFIER_MIN as u8);
            return;
        }
        if self.keys().contains(&key) {
            return;
        }
        match self.keyboard[2..].iter_mut().find(|k| **k == 0) {
            Some(k) => *k = key,
            None => warn!("boot report full; dropped {}", key),
        }
    }

    fn remove_key(&mut self, key: u8) {
        if is_modifier_key(key) {
            self.keyboard[0] &= !(1 << (key - MODIFIER_MIN as u8));
            return;
        }
        for k in self.keyboard[2..].iter_mut().filter(|k| **k == key) {
            *k = 0;
        }
    }
}

fn is_modifier_key(key: u8) -> bool {
    (MODIFIER_MIN as u8..=MODIFIER_MAX as u8).contains(&key)
}

impl HidEmitter for BootReport {
    fn report(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Basic(key, is_down) => {
                if is_down {
                    self.add_key(key);
                } else {
                    self.remove_key(key);
                }
            }
            KeyEvent::Modifiers(modifiers, is_down) => {
                if is_down {
                    self.keyboard[0] |= modifiers;
                } else {
                    self.keyboard[0] &= !modifiers;
                }
            }
            KeyEvent::Consumer(usage) => self.consumer = usage,
            KeyEvent::SysCtl(usage) => self.system = usage,
            KeyEvent::Clear => *self = Self::default(),
        }
    }
}


#[cfg(test)]
#[path = "hid_test.rs"]
mod test;
