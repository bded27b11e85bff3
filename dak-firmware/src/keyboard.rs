use core::cmp::max;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Instant, Timer};
use heapless::Vec;

use crate::{
    catalog::{Catalog, LayoutConfig, LoadError},
    clock::Clock,
    debounce::{Debouncer, Transition, MAX_TRANSITIONS},
    hid::HidEmitter,
    indicator::{HostLeds, Indicator, CAPS_LOCK},
    layers::{FnLockGesture, LayerSelector, LayerState},
    matrix::SwitchMatrix,
    resolver::Resolver,
    settings::Settings,
};

/// One keyboard: debouncer, layer selector and resolver driven by a single scan tick.
pub struct Keyboard<'c, const ROWS: usize, const COLS: usize, const KEYS: usize> {
    catalog: Catalog<'c>,
    settings: Settings,
    debouncer: Debouncer<ROWS, COLS>,
    layers: LayerSelector,
    resolver: Resolver<KEYS>,
    transitions: Vec<Transition, MAX_TRANSITIONS>,
    last_activity: Option<Instant>,
    sleeping: bool,
}

impl<'c, const ROWS: usize, const COLS: usize, const KEYS: usize> Keyboard<'c, ROWS, COLS, KEYS> {
    /// Validate the layout. A malformed layout is refused.
    pub fn new(config: &LayoutConfig<'c>, settings: Settings) -> Result<Self, LoadError> {
        let catalog = Catalog::new::<ROWS, COLS, KEYS>(config)?;

        let mut debouncer = Debouncer::new(settings.bounce_time);
        for pos in catalog.positions().chain(config.fn_switches) {
            debouncer.define(pos);
        }
        if let FnLockGesture::WithSwitch(pos) = config.fn_lock_gesture {
            debouncer.define(pos);
        }

        Ok(Self {
            catalog,
            settings,
            debouncer,
            layers: LayerSelector::new(
                config.fn_switches,
                config.fn_activation,
                config.fn_lock_gesture,
            ),
            resolver: Resolver::new(settings.delay_time),
            transitions: Vec::new(),
            last_activity: None,
            sleeping: false,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.debouncer.set_bounce_time(settings.bounce_time);
        self.resolver.set_delay_time(settings.delay_time);
        self.settings = settings;
    }

    pub fn layer_state(&self) -> LayerState {
        self.layers.state()
    }

    pub fn debouncer(&self) -> &Debouncer<ROWS, COLS> {
        &self.debouncer
    }

    pub fn resolver(&self) -> &Resolver<KEYS> {
        &self.resolver
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Time until the next scan.
    pub fn tick_delay(&self) -> Duration {
        if self.sleeping {
            self.settings.scan_period + self.settings.sleep_delay
        } else {
            self.settings.scan_period
        }
    }

    /// Process one matrix sample: debounce, select the layer, commit expired double-action keys,
    /// dispatch this tick's transitions and release modifier locks once every switch is up.
    pub fn tick(
        &mut self,
        raw: &[[bool; COLS]; ROWS],
        now: Instant,
        emitter: &mut impl HidEmitter,
    ) -> LayerState {
        self.transitions.clear();
        self.debouncer.scan(raw, now, &mut self.transitions);

        let before = self.layers.state();
        let state = self.layers.update(&self.debouncer, now);
        if state.active_layer != before.active_layer {
            self.resolver.layer_changed();
        }

        self.resolver.expire(&self.catalog, now, emitter);
        for t in self.transitions.iter() {
            self.resolver
                .key_switch(&self.catalog, t, state.active_layer, emitter);
        }

        if self.resolver.has_locked() && self.debouncer.all_released() {
            self.resolver.release_locked_modifiers(emitter);
        }

        self.update_sleep(now);
        state
    }

    fn update_sleep(&mut self, now: Instant) {
        let last = *self.last_activity.get_or_insert(now);
        if !self.transitions.is_empty() {
            self.last_activity = Some(now);
            if self.sleeping {
                self.sleeping = false;
                crate::info!("leaving sleep mode");
            }
        } else if !self.sleeping
            && self.settings.sleep_delay > Duration::from_ticks(0)
            && last + self.settings.sleep_after <= now
        {
            self.sleeping = true;
            crate::info!("entering sleep mode");
        }
    }

    /// Release everything and start over.
    pub fn reset(&mut self, emitter: &mut impl HidEmitter) {
        self.resolver.reset(emitter);
        self.layers.reset();
        self.sleeping = false;
        self.last_activity = None;
    }

    /// Debounce only and write the switch states each time one changes. No key events are sent.
    #[cfg(feature = "debug-states")]
    pub fn tick_debug(
        &mut self,
        raw: &[[bool; COLS]; ROWS],
        now: Instant,
        w: &mut impl core::fmt::Write,
    ) -> core::fmt::Result {
        self.transitions.clear();
        self.debouncer.scan(raw, now, &mut self.transitions);
        if self.transitions.is_empty() {
            return Ok(());
        }
        self.debouncer.dump(w)?;
        w.write_char('\n')
    }

    /// Scan forever, one tick per scan period. The caps-lock LED follows `host_leds`.
    pub async fn run<M: RawMutex>(
        &mut self,
        matrix: &mut impl SwitchMatrix<ROWS, COLS>,
        emitter: &mut impl HidEmitter,
        indicator: &mut impl Indicator,
        host_leds: &HostLeds<M>,
        clock: &impl Clock,
    ) -> ! {
        let mut raw = [[false; COLS]; ROWS];
        let mut fn_lock = self.layer_state().fn_lock_on;
        indicator.set_fn_lock(fn_lock);

        let mut next = clock.now();
        loop {
            matrix.scan(&mut raw);
            let now = clock.now();
            let state = self.tick(&raw, now, emitter);
            if state.fn_lock_on != fn_lock {
                fn_lock = state.fn_lock_on;
                indicator.set_fn_lock(fn_lock);
            }
            if let Some(leds) = host_leds.take() {
                indicator.set_caps_lock(leds & CAPS_LOCK != 0);
            }

            next = max(next + self.tick_delay(), now);
            Timer::at(next).await;
        }
    }
}

#[cfg(test)]
#[path = "keyboard_test.rs"]
mod test;
