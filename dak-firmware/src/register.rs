use dak_common::globals::{KEY_SLOTS, MODIFIER_SLOTS};

use crate::catalog::{Action, KeyId};

/// Handle to an occupied register slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterSlot {
    Key(u8),
    Modifier(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotKind {
    Key,
    Modifier,
}

/// The key owning a slot and the action it asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Holder {
    pub key: KeyId,
    pub action: Action,
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Full;

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidRelease {
    Vacant(RegisterSlot),
    NotOwner { slot: RegisterSlot, owner: KeyId },
}

/// Currently asserted actions. A slot is occupied exactly while its action is asserted.
pub struct ActiveRegister<const N: usize = KEY_SLOTS, const M: usize = MODIFIER_SLOTS> {
    keys: [Option<Holder>; N],
    modifiers: [Option<Holder>; M],
}

impl<const N: usize, const M: usize> Default for ActiveRegister<N, M> {
    fn default() -> Self {
        Self {
            keys: [None; N],
            modifiers: [None; M],
        }
    }
}

impl<const N: usize, const M: usize> ActiveRegister<N, M> {
    /// Occupy the first free slot of `kind`.
    pub fn acquire(
        &mut self,
        kind: SlotKind,
        key: KeyId,
        action: Action,
    ) -> Result<RegisterSlot, Full> {
        let slots = match kind {
            SlotKind::Key => self.keys.as_mut_slice(),
            SlotKind::Modifier => self.modifiers.as_mut_slice(),
        };
        let i = slots.iter().position(Option::is_none).ok_or(Full)?;
        slots[i] = Some(Holder { key, action });
        Ok(match kind {
            SlotKind::Key => RegisterSlot::Key(i as u8),
            SlotKind::Modifier => RegisterSlot::Modifier(i as u8),
        })
    }

    /// Free `slot`, which must be held by `key`.
    pub fn release(&mut self, slot: RegisterSlot, key: KeyId) -> Result<Holder, InvalidRelease> {
        let entry = self
            .entry_mut(slot)
            .ok_or(InvalidRelease::Vacant(slot))?;
        let current = *entry;
        match current {
            None => Err(InvalidRelease::Vacant(slot)),
            Some(h) if h.key != key => Err(InvalidRelease::NotOwner {
                slot,
                owner: h.key,
            }),
            Some(h) => {
                *entry = None;
                Ok(h)
            }
        }
    }

    pub fn get(&self, slot: RegisterSlot) -> Option<&Holder> {
        match slot {
            RegisterSlot::Key(i) => self.keys.get(i as usize)?.as_ref(),
            RegisterSlot::Modifier(i) => self.modifiers.get(i as usize)?.as_ref(),
        }
    }

    fn entry_mut(&mut self, slot: RegisterSlot) -> Option<&mut Option<Holder>> {
        match slot {
            RegisterSlot::Key(i) => self.keys.get_mut(i as usize),
            RegisterSlot::Modifier(i) => self.modifiers.get_mut(i as usize),
        }
    }

    pub fn key_count(&self) -> usize {
        self.keys.iter().filter(|s| s.is_some()).count()
    }

    pub fn modifier_count(&self) -> usize {
        self.modifiers.iter().filter(|s| s.is_some()).count()
    }

    /// Occupied key slots in ascending order.
    pub fn key_slots(&self) -> impl Iterator<Item = (RegisterSlot, Holder)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|h| (RegisterSlot::Key(i as u8), h)))
    }

    /// Occupied modifier-lock slots in ascending order.
    pub fn modifier_slots(&self) -> impl Iterator<Item = (RegisterSlot, Holder)> + '_ {
        self.modifiers
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|h| (RegisterSlot::Modifier(i as u8), h)))
    }

    pub fn clear(&mut self) {
        self.keys = [None; N];
        self.modifiers = [None; M];
    }
}

#[cfg(test)]
#[path = "register_test.rs"]
mod test;
