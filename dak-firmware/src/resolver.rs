use dak_common::keycodes::CodeKind;
use embassy_time::{Duration, Instant};

use crate::{
    catalog::{Action, Catalog, Depth, KeyBehavior, KeyDefinition, KeyId},
    debounce::Transition,
    hid::{HidEmitter, KeyEvent},
    layers::Layer,
    register::{ActiveRegister, RegisterSlot, SlotKind},
};

/// Mutable state of one logical key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyRuntimeState {
    /// Deadline of an unresolved double-action press.
    pub pending_commit: Option<Instant>,
    /// Slot held for each depth's action.
    pub emitted_slot: [Option<RegisterSlot>; 2],
    /// A modifier-lock emission is still asserted.
    pub locked: bool,
    /// Layer the current physical press started in.
    pub press_layer: Option<Layer>,
    /// The layer changed under this press. New presses are ignored until full release.
    pub disabled: bool,
    /// Double-action outcome for the current press.
    pub resolved: Option<Depth>,
    down: [bool; 2],
}
impl KeyRuntimeState {
    fn is_released(&self) -> bool {
        !self.down[0] && !self.down[1]
    }

    fn has_modifier_slot(&self) -> bool {
        self.emitted_slot
            .iter()
            .any(|s| matches!(s, Some(RegisterSlot::Modifier(_))))
    }
}

fn key_event(action: Action, is_down: bool) -> Option<KeyEvent> {
    match action.kind() {
        CodeKind::None => None,
        CodeKind::Basic(kc) => Some(KeyEvent::basic(kc, is_down)),
        CodeKind::Consumer(usage) => Some(KeyEvent::consumer(usage, is_down)),
        CodeKind::SysCtl(usage) => Some(KeyEvent::sys_ctl(usage, is_down)),
    }
}

/// Turns debounced transitions into asserted and retracted actions.
pub struct Resolver<const KEYS: usize> {
    states: [KeyRuntimeState; KEYS],
    register: ActiveRegister,
    modifier_count: [u8; 8],
    delay_time: Duration,
    dropped: usize,
}

impl<const KEYS: usize> Resolver<KEYS> {
    pub fn new(delay_time: Duration) -> Self {
        Self {
            states: [KeyRuntimeState::default(); KEYS],
            register: ActiveRegister::default(),
            modifier_count: [0; 8],
            delay_time,
            dropped: 0,
        }
    }

    pub fn state(&self, key: KeyId) -> Option<&KeyRuntimeState> {
        self.states.get(key)
    }

    pub fn register(&self) -> &ActiveRegister {
        &self.register
    }

    /// Emissions suppressed because the register was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn set_delay_time(&mut self, delay_time: Duration) {
        self.delay_time = delay_time;
    }

    pub fn has_locked(&self) -> bool {
        self.states.iter().any(|s| s.locked)
    }

    /// Next double-action deadline, if any key is unresolved.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.states.iter().filter_map(|s| s.pending_commit).min()
    }

    /// Forget every key and tell the host to release everything.
    pub fn reset(&mut self, emitter: &mut impl HidEmitter) {
        self.states = [KeyRuntimeState::default(); KEYS];
        self.register.clear();
        self.modifier_count = [0; 8];
        emitter.report(KeyEvent::Clear);
    }

    /// Pin every pressed key to the layer its press began in.
    pub fn layer_changed(&mut self) {
        for s in self.states.iter_mut().filter(|s| s.press_layer.is_some()) {
            s.disabled = true;
        }
    }

    /// Commit double-action keys whose delay has elapsed as held action-1.
    pub fn expire(&mut self, catalog: &Catalog, now: Instant, emitter: &mut impl HidEmitter) {
        for (key, def) in catalog.iter().take(KEYS) {
            let state = &mut self.states[key];
            let (Some(deadline), Some(layer)) = (state.pending_commit, state.press_layer) else {
                continue;
            };
            if deadline > now {
                continue;
            }
            state.pending_commit = None;
            state.resolved = Some(Depth::First);
            self.assert(key, Depth::First, def.action(layer, Depth::First), emitter);
        }
    }

    /// Dispatch one debounced transition to every key it drives.
    pub fn key_switch(
        &mut self,
        catalog: &Catalog,
        t: &Transition,
        active_layer: Layer,
        emitter: &mut impl HidEmitter,
    ) {
        for (key, depth) in catalog.keys_at(t.pos) {
            if let Some(def) = catalog.get(key) {
                self.key_depth(key, def, depth, t.is_press(), t.at, active_layer, emitter);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn key_depth(
        &mut self,
        key: KeyId,
        def: &KeyDefinition,
        depth: Depth,
        is_down: bool,
        now: Instant,
        active_layer: Layer,
        emitter: &mut impl HidEmitter,
    ) {
        let Some(state) = self.states.get_mut(key) else {
            return;
        };
        state.down[depth.index()] = is_down;

        let layer = if is_down {
            if state.disabled && !(depth == Depth::Second && state.pending_commit.is_some()) {
                crate::debug!("key {} disabled; press ignored", key);
                return;
            }
            *state.press_layer.get_or_insert(active_layer)
        } else {
            match state.press_layer {
                Some(layer) => layer,
                None => return,
            }
        };

        match def.behavior(layer) {
            KeyBehavior::Additive => {
                if is_down {
                    self.assert(key, depth, def.action(layer, depth), emitter);
                } else {
                    self.retract(key, depth, false, emitter);
                }
            }
            KeyBehavior::Toggle => {
                if is_down {
                    let other_down = def.has_second_switch()
                        && self.states[key].down[depth.other().index()];
                    let (drop, take) = if other_down {
                        (Depth::First, Depth::Second)
                    } else {
                        (Depth::Second, Depth::First)
                    };
                    self.retract(key, drop, true, emitter);
                    self.assert(key, take, def.action(layer, take), emitter);
                } else {
                    self.retract(key, Depth::First, false, emitter);
                    self.retract(key, Depth::Second, false, emitter);
                }
            }
            KeyBehavior::DoubleAction => {
                self.double_action(key, def, layer, depth, is_down, now, emitter)
            }
        }

        let state = &mut self.states[key];
        if !is_down && state.is_released() {
            state.press_layer = None;
            state.disabled = false;
            state.resolved = None;
            state.pending_commit = None;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn double_action(
        &mut self,
        key: KeyId,
        def: &KeyDefinition,
        layer: Layer,
        depth: Depth,
        is_down: bool,
        now: Instant,
        emitter: &mut impl HidEmitter,
    ) {
        let state = &mut self.states[key];
        match (depth, is_down) {
            (Depth::First, true) => {
                if state.pending_commit.is_none() && state.resolved.is_none() {
                    state.pending_commit = Some(now + self.delay_time);
                }
            }
            (Depth::Second, true) => match state.resolved {
                Some(Depth::First) => {}
                _ => {
                    state.pending_commit = None;
                    state.resolved = Some(Depth::Second);
                    self.assert(key, Depth::Second, def.action(layer, Depth::Second), emitter);
                }
            },
            (Depth::First, false) => {
                if state.pending_commit.take().is_some() {
                    // tap
                    self.assert(key, Depth::First, def.action(layer, Depth::First), emitter);
                    self.retract(key, Depth::First, false, emitter);
                } else if state.resolved == Some(Depth::First) {
                    self.retract(key, Depth::First, false, emitter);
                }
            }
            (Depth::Second, false) => self.retract(key, Depth::Second, false, emitter),
        }
    }

    fn assert(&mut self, key: KeyId, depth: Depth, action: Action, emitter: &mut impl HidEmitter) {
        if action.is_none() || self.states[key].emitted_slot[depth.index()].is_some() {
            return;
        }
        let lock = action.is_modifier_lock();
        let kind = if lock {
            SlotKind::Modifier
        } else {
            SlotKind::Key
        };
        let slot = match self.register.acquire(kind, key, action) {
            Ok(slot) => slot,
            Err(_) => {
                self.dropped += 1;
                crate::warn!("register full; key {} action {:?} dropped", key, action);
                return;
            }
        };
        let state = &mut self.states[key];
        state.emitted_slot[depth.index()] = Some(slot);
        state.locked |= lock;

        self.write_modifiers(action.modifiers, true, emitter);
        if let Some(event) = key_event(action, true) {
            emitter.report(event);
        }
    }

    /// Retract `depth`'s action. Modifier-lock slots are kept unless `forced`.
    fn retract(&mut self, key: KeyId, depth: Depth, forced: bool, emitter: &mut impl HidEmitter) {
        let state = &mut self.states[key];
        let Some(slot) = state.emitted_slot[depth.index()] else {
            return;
        };
        if !forced && matches!(slot, RegisterSlot::Modifier(_)) {
            return;
        }
        state.emitted_slot[depth.index()] = None;
        state.locked = state.has_modifier_slot();
        self.release_slot(key, slot, emitter);
    }

    fn release_slot(&mut self, key: KeyId, slot: RegisterSlot, emitter: &mut impl HidEmitter) {
        match self.register.release(slot, key) {
            Ok(holder) => {
                if let Some(event) = self.release_event(holder.action) {
                    emitter.report(event);
                }
                self.write_modifiers(holder.action.modifiers, false, emitter);
            }
            Err(err) => {
                crate::error!("invalid release by key {}: {:?}", key, err);
                debug_assert!(false, "invalid release");
            }
        }
    }

    /// Consumer and system control reports carry a single usage. Releasing one falls back to
    /// another held usage of the same page instead of clearing it.
    fn release_event(&self, action: Action) -> Option<KeyEvent> {
        let page = |a: &Action| match a.kind() {
            CodeKind::Consumer(_) => 1,
            CodeKind::SysCtl(_) => 2,
            _ => 0,
        };
        let released = page(&action);
        if released != 0 {
            if let Some((_, held)) = self
                .register
                .key_slots()
                .find(|(_, h)| page(&h.action) == released)
            {
                return key_event(held.action, true);
            }
        }
        key_event(action, false)
    }

    /// Retract every modifier-lock emission. Called once all switches read released.
    pub fn release_locked_modifiers(&mut self, emitter: &mut impl HidEmitter) {
        for key in 0..KEYS {
            if !self.states[key].locked {
                continue;
            }
            for depth in [Depth::First, Depth::Second] {
                self.retract(key, depth, true, emitter);
            }
        }
    }

    /// Reference count each modifier bit and report the bits that crossed zero.
    fn write_modifiers(&mut self, modifiers: u8, down: bool, emitter: &mut impl HidEmitter) {
        if modifiers == 0 {
            return;
        }
        let mut changed = 0;
        for (i, count) in self.modifier_count.iter_mut().enumerate() {
            if modifiers & (1 << i) == 0 {
                continue;
            }
            let before = *count > 0;
            *count = if down {
                count.saturating_add(1)
            } else {
                count.saturating_sub(1)
            };
            if before != (*count > 0) {
                changed |= 1 << i;
            }
        }
        if changed != 0 {
            emitter.report(KeyEvent::Modifiers(changed, down));
        }
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod test;
