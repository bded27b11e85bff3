use dak_common::keycodes::{self, key_range, CodeKind};

use crate::{
    layers::{FnActivation, FnLockGesture, Layer},
    matrix::MatrixPos,
};

/// Index of a key in the catalog and of its runtime state in the resolver.
pub type KeyId = usize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyBehavior {
    /// Each depth is an independent key.
    #[default]
    Additive,
    /// One of the two actions at a time; pressing both depths selects action-2.
    Toggle,
    /// Action-1 is deferred until the delay expires, the key is released or action-2 is reached.
    DoubleAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Depth {
    First = 0,
    Second = 1,
}
impl Depth {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn other(self) -> Self {
        match self {
            Depth::First => Depth::Second,
            Depth::Second => Depth::First,
        }
    }
}

/// A key code paired with the modifier bits asserted alongside it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Action {
    pub code: u16,
    pub modifiers: u8,
}
impl Action {
    pub const fn new(code: u16, modifiers: u8) -> Self {
        Self { code, modifiers }
    }

    /// Nothing is emitted for this action.
    pub fn is_none(&self) -> bool {
        self.code == key_range::NONE && self.modifiers == 0
    }

    /// Modifier bits only. These stay asserted until every switch is released.
    pub fn is_modifier_lock(&self) -> bool {
        self.code == key_range::NONE && self.modifiers != 0
    }

    pub fn kind(&self) -> CodeKind {
        keycodes::kind(self.code)
    }
}

/// Immutable description of one logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyDefinition {
    pub behavior_normal: KeyBehavior,
    pub behavior_fn: KeyBehavior,
    /// normal-1, normal-2, fn-1, fn-2
    pub codes: [u16; 4],
    pub modifiers: [u8; 4],
    pub first_switch: MatrixPos,
    /// Equal to `first_switch` when the key has a single depth.
    pub second_switch: MatrixPos,
}

impl KeyDefinition {
    pub const fn new(
        behavior_normal: KeyBehavior,
        behavior_fn: KeyBehavior,
        codes: [u16; 4],
        modifiers: [u8; 4],
        first_switch: MatrixPos,
        second_switch: MatrixPos,
    ) -> Self {
        Self {
            behavior_normal,
            behavior_fn,
            codes,
            modifiers,
            first_switch,
            second_switch,
        }
    }

    pub fn behavior(&self, layer: Layer) -> KeyBehavior {
        match layer {
            Layer::Normal => self.behavior_normal,
            Layer::Fn => self.behavior_fn,
        }
    }

    pub fn action(&self, layer: Layer, depth: Depth) -> Action {
        let i = layer.index() * 2 + depth.index();
        Action::new(self.codes[i], self.modifiers[i])
    }

    pub fn has_second_switch(&self) -> bool {
        self.first_switch != self.second_switch
    }

    /// Which depth `pos` drives. The first switch wins when both positions are equal.
    pub fn depth_of(&self, pos: MatrixPos) -> Option<Depth> {
        if pos == self.first_switch {
            Some(Depth::First)
        } else if pos == self.second_switch {
            Some(Depth::Second)
        } else {
            None
        }
    }

    /// False for a depth with no action in either layer. Such a switch does not drive this key.
    pub fn has_action(&self, depth: Depth) -> bool {
        !self.action(Layer::Normal, depth).is_none() || !self.action(Layer::Fn, depth).is_none()
    }

    pub fn switch(&self, depth: Depth) -> MatrixPos {
        match depth {
            Depth::First => self.first_switch,
            Depth::Second => self.second_switch,
        }
    }
}

/// Static layout data handed to the keyboard at startup.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig<'c> {
    pub keys: &'c [KeyDefinition],
    pub fn_switches: [MatrixPos; 2],
    pub fn_activation: FnActivation,
    pub fn_lock_gesture: FnLockGesture,
}
impl<'c> LayoutConfig<'c> {
    pub const fn new(keys: &'c [KeyDefinition], fn_switches: [MatrixPos; 2]) -> Self {
        Self {
            keys,
            fn_switches,
            fn_activation: FnActivation::Both,
            fn_lock_gesture: FnLockGesture::DEFAULT,
        }
    }

    pub const fn fn_activation(mut self, fn_activation: FnActivation) -> Self {
        self.fn_activation = fn_activation;
        self
    }

    pub const fn fn_lock_gesture(mut self, fn_lock_gesture: FnLockGesture) -> Self {
        self.fn_lock_gesture = fn_lock_gesture;
        self
    }
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    TooManyKeys,
    PositionOutOfRange { key: KeyId, pos: MatrixPos },
    FnSwitchOutOfRange,
}

/// Validated, read-only view of the key table.
#[derive(Debug, Clone, Copy)]
pub struct Catalog<'c> {
    keys: &'c [KeyDefinition],
}

impl<'c> Catalog<'c> {
    pub fn new<const ROWS: usize, const COLS: usize, const KEYS: usize>(
        config: &LayoutConfig<'c>,
    ) -> Result<Self, LoadError> {
        if config.keys.len() > KEYS {
            crate::error!("layout has {} keys; max is {}", config.keys.len(), KEYS);
            return Err(LoadError::TooManyKeys);
        }
        for (key, def) in config.keys.iter().enumerate() {
            for pos in [def.first_switch, def.second_switch] {
                if !pos.is_within::<ROWS, COLS>() {
                    crate::error!("key {} switch {:?} is outside the matrix", key, pos);
                    return Err(LoadError::PositionOutOfRange { key, pos });
                }
            }
        }
        let combo = match config.fn_lock_gesture {
            FnLockGesture::WithSwitch(pos) => Some(pos),
            _ => None,
        };
        if config
            .fn_switches
            .iter()
            .chain(combo.iter())
            .any(|p| !p.is_within::<ROWS, COLS>())
        {
            crate::error!("FN switch is outside the matrix");
            return Err(LoadError::FnSwitchOutOfRange);
        }

        Ok(Self { keys: config.keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, key: KeyId) -> Option<&'c KeyDefinition> {
        self.keys.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeyId, &'c KeyDefinition)> {
        self.keys.iter().enumerate()
    }

    /// Keys driven by `pos` in catalog order, with the depth it drives for each. A second depth
    /// without any action is skipped so a placeholder position never touches the key's state.
    pub fn keys_at(&self, pos: MatrixPos) -> impl Iterator<Item = (KeyId, Depth)> + 'c {
        self.keys.iter().enumerate().filter_map(move |(key, def)| {
            def.depth_of(pos)
                .filter(|&d| d == Depth::First || def.has_action(d))
                .map(|d| (key, d))
        })
    }

    /// Every position referenced by a key.
    pub fn positions(&self) -> impl Iterator<Item = MatrixPos> + 'c {
        self.keys
            .iter()
            .flat_map(|def| [def.first_switch, def.second_switch])
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod test;
