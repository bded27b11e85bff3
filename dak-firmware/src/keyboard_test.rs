extern crate std;

use core::cell::RefCell;
use dak_common::keycodes::{key_range::NONE, modifiers::*, *};
use embassy_futures::{block_on, select::select, yield_now};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::MockDriver;
use std::vec::Vec;

use super::*;
use crate::{
    catalog::{KeyBehavior::*, KeyDefinition},
    clock::SystemClock,
    hid::KeyEvent,
    indicator::{HostLeds, CAPS_LOCK},
    layers::Layer,
    matrix::MatrixPos,
};

const fn sw(row: u8, col: u8) -> MatrixPos {
    MatrixPos::new(row, col)
}

const KEYS: [KeyDefinition; 3] = [
    KeyDefinition::new(
        DoubleAction,
        DoubleAction,
        [KEY_A, KEY_B, KEY_1, KEY_2],
        [0; 4],
        sw(0, 0),
        sw(1, 0),
    ),
    KeyDefinition::new(Additive, Additive, [NONE; 4], [SHIFT, 0, SHIFT, 0], sw(0, 1), sw(0, 1)),
    KeyDefinition::new(Additive, Additive, [KEY_C, NONE, KEY_D, NONE], [0; 4], sw(0, 2), sw(0, 2)),
];

const LAYOUT: LayoutConfig = LayoutConfig::new(&KEYS, [sw(3, 0), sw(3, 1)]);

fn ms(t: u64) -> Instant {
    Instant::from_millis(t)
}

fn down(code: u16) -> KeyEvent {
    KeyEvent::basic(code as u8, true)
}

fn up(code: u16) -> KeyEvent {
    KeyEvent::basic(code as u8, false)
}

macro_rules! setup {
    ($kb:ident, $e:ident, $set:ident, $run:ident, $b:block) => {
        setup!(LAYOUT, $kb, $e, $set, $run, $b)
    };
    ($layout:expr, $kb:ident, $e:ident, $set:ident, $run:ident, $b:block) => {{
        let mut $kb = Keyboard::<4, 3, 8>::new(&$layout, Settings::default()).unwrap();
        let mut $e = Vec::<KeyEvent>::new();
        let mut raw = [[false; 3]; 4];
        let mut now = 0u64;
        $kb.tick(&raw, ms(now), &mut $e);

        #[allow(unused_macros)]
        macro_rules! $set {
            ($r:expr, $c:expr, $v:expr) => {
                raw[$r][$c] = $v
            };
        }

        /// Tick every millisecond up to and including `$t`.
        #[allow(unused_macros)]
        macro_rules! $run {
            ($t:expr) => {{
                let mut state = $kb.layer_state();
                while now < $t {
                    now += 1;
                    state = $kb.tick(&raw, ms(now), &mut $e);
                }
                state
            }};
        }

        $b
    }};
}

#[test]
fn double_action_tap_through_debounce() {
    setup!(kb, e, set, run, {
        set!(0, 0, true);
        run!(6);
        assert_eq!(kb.resolver().next_deadline(), None);
        run!(7);
        assert_eq!(kb.resolver().next_deadline(), Some(ms(407)));

        set!(0, 0, false);
        run!(13);
        assert!(e.is_empty());
        run!(14);
        assert_eq!(e, [down(KEY_A), up(KEY_A)]);
    });
}

#[test]
fn double_action_hold_through_debounce() {
    setup!(kb, e, set, run, {
        set!(0, 0, true);
        run!(406);
        assert!(e.is_empty());
        run!(407);
        assert_eq!(e, [down(KEY_A)]);

        set!(0, 0, false);
        run!(414);
        assert_eq!(e, [down(KEY_A), up(KEY_A)]);
    });
}

#[test]
fn double_action_second_depth_through_debounce() {
    setup!(kb, e, set, run, {
        set!(0, 0, true);
        run!(50);
        set!(1, 0, true);
        run!(100);
        assert_eq!(e, [down(KEY_B)]);
        set!(1, 0, false);
        set!(0, 0, false);
        run!(500);
        assert_eq!(e, [down(KEY_B), up(KEY_B)]);
    });
}

#[test]
fn chatter_is_not_a_key_press() {
    setup!(kb, e, set, run, {
        set!(0, 2, true);
        run!(3);
        set!(0, 2, false);
        run!(4);
        set!(0, 2, true);
        run!(5);
        set!(0, 2, false);
        run!(100);
        assert!(e.is_empty());
    });
}

#[test]
fn fn_layer_while_both_held() {
    setup!(kb, e, set, run, {
        set!(3, 0, true);
        set!(3, 1, true);
        set!(0, 2, true);
        let state = run!(7);
        assert_eq!(state.active_layer, Layer::Fn);
        assert_eq!(e, [down(KEY_D)]);

        set!(0, 2, false);
        set!(3, 0, false);
        set!(3, 1, false);
        let state = run!(20);
        assert_eq!(state.active_layer, Layer::Normal);
        assert_eq!(e, [down(KEY_D), up(KEY_D)]);
    });
}

#[test]
fn held_key_keeps_its_layer() {
    setup!(kb, e, set, run, {
        set!(0, 2, true);
        run!(7);
        set!(3, 0, true);
        set!(3, 1, true);
        assert_eq!(run!(14).active_layer, Layer::Fn);

        set!(0, 2, false);
        run!(21);
        set!(0, 2, true);
        run!(28);
        assert_eq!(e, [down(KEY_C), up(KEY_C), down(KEY_D)]);
    });
}

#[test]
fn modifier_lock_until_keyboard_idle() {
    setup!(kb, e, set, run, {
        set!(0, 1, true);
        run!(7);
        set!(0, 2, true);
        run!(14);
        set!(0, 1, false);
        run!(21);
        assert_eq!(e, [KeyEvent::Modifiers(SHIFT, true), down(KEY_C)]);

        set!(0, 2, false);
        run!(28);
        assert_eq!(
            e,
            [
                KeyEvent::Modifiers(SHIFT, true),
                down(KEY_C),
                up(KEY_C),
                KeyEvent::Modifiers(SHIFT, false)
            ]
        );
        assert!(!kb.resolver().has_locked());
    });
}

#[test]
fn fn_lock_hold_gesture() {
    setup!(kb, e, set, run, {
        set!(3, 0, true);
        set!(3, 1, true);
        assert!(!run!(1006).fn_lock_on);
        assert!(run!(1007).fn_lock_on);

        set!(3, 0, false);
        set!(3, 1, false);
        let state = run!(1014);
        assert!(state.fn_lock_on);
        assert_eq!(state.active_layer, Layer::Fn);

        set!(0, 2, true);
        run!(1021);
        assert_eq!(e, [down(KEY_D)]);

        // FN tap clears the lock
        set!(3, 1, true);
        run!(1030);
        set!(3, 1, false);
        let state = run!(1040);
        assert!(!state.fn_lock_on);
        assert_eq!(state.active_layer, Layer::Normal);
    });
}

#[test]
fn either_fn_switch_activation() {
    setup!(
        LAYOUT.fn_activation(crate::layers::FnActivation::Either),
        kb,
        e,
        set,
        run,
        {
            set!(3, 1, true);
            set!(0, 2, true);
            run!(7);
            assert_eq!(e, [down(KEY_D)]);
        }
    );
}

#[test]
fn sleep_mode_after_idle() {
    setup!(kb, e, set, run, {
        kb.set_settings(Settings::default().sleep_after(Duration::from_millis(100)));
        run!(99);
        assert!(!kb.is_sleeping());
        assert_eq!(kb.tick_delay(), Duration::from_millis(1));
        run!(100);
        assert!(kb.is_sleeping());
        assert_eq!(kb.tick_delay(), Duration::from_millis(11));

        set!(0, 2, true);
        run!(106);
        assert!(kb.is_sleeping());
        run!(107);
        assert!(!kb.is_sleeping());
        assert_eq!(e, [down(KEY_C)]);
    });
}

#[test]
fn sleep_disabled_by_zero_delay() {
    setup!(kb, e, set, run, {
        kb.set_settings(Settings::default().sleep_delay(Duration::from_ticks(0)));
        run!(20_000);
        assert!(!kb.is_sleeping());
        assert!(e.is_empty());
    });
}

#[test]
fn reset_sends_clear() {
    setup!(kb, e, set, run, {
        set!(0, 2, true);
        run!(7);
        kb.reset(&mut e);
        assert_eq!(e, [down(KEY_C), KeyEvent::Clear]);

        set!(0, 2, false);
        run!(20);
        assert_eq!(e, [down(KEY_C), KeyEvent::Clear]);
    });
}

#[test]
fn malformed_layout_is_refused() {
    const BAD: [KeyDefinition; 1] = [KeyDefinition::new(
        Additive,
        Additive,
        [KEY_A; 4],
        [0; 4],
        sw(0, 0),
        sw(4, 0),
    )];
    let layout = LayoutConfig::new(&BAD, [sw(3, 0), sw(3, 1)]);
    assert_eq!(
        Keyboard::<4, 3, 8>::new(&layout, Settings::default()).err(),
        Some(LoadError::PositionOutOfRange {
            key: 0,
            pos: sw(4, 0)
        })
    );
}

#[cfg(feature = "debug-states")]
#[test]
fn debug_dump_on_change() {
    let mut kb = Keyboard::<4, 3, 8>::new(&LAYOUT, Settings::default()).unwrap();
    let mut raw = [[false; 3]; 4];
    let mut out = std::string::String::new();
    raw[0][2] = true;
    kb.tick_debug(&raw, ms(0), &mut out).unwrap();
    assert!(out.is_empty());
    kb.tick_debug(&raw, ms(6), &mut out).unwrap();
    assert_eq!(out, "001\n0..\n...\n00.\n\n");
}

struct SharedMatrix<'a>(&'a RefCell<[[bool; 3]; 4]>);
impl SwitchMatrix<4, 3> for SharedMatrix<'_> {
    fn scan(&mut self, raw: &mut [[bool; 3]; 4]) {
        *raw = *self.0.borrow();
    }
}

#[derive(Default)]
struct Leds {
    fn_lock: Vec<bool>,
    caps_lock: Vec<bool>,
}
impl Indicator for Leds {
    fn set_fn_lock(&mut self, on: bool) {
        self.fn_lock.push(on);
    }

    fn set_caps_lock(&mut self, on: bool) {
        self.caps_lock.push(on);
    }
}

#[test]
fn run_loop_scans_each_period() {
    let switches = RefCell::new([[false; 3]; 4]);
    let mut matrix = SharedMatrix(&switches);
    let mut kb = Keyboard::<4, 3, 8>::new(&LAYOUT, Settings::default()).unwrap();
    let mut e = Vec::<KeyEvent>::new();
    let mut leds = Leds::default();
    let host_leds = HostLeds::<NoopRawMutex>::new();

    block_on(async {
        let steps = async {
            for i in 0..40 {
                if i == 5 {
                    switches.borrow_mut()[0][2] = true;
                }
                if i == 20 {
                    host_leds.signal(CAPS_LOCK);
                }
                MockDriver::get().advance(Duration::from_millis(1));
                yield_now().await;
            }
        };
        select(kb.run(&mut matrix, &mut e, &mut leds, &host_leds, &SystemClock), steps).await;
    });

    assert_eq!(e, [down(KEY_C)]);
    assert_eq!(leds.fn_lock, [false]);
    assert_eq!(leds.caps_lock, [true]);
}
