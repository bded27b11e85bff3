//! DAK10 with the Finnish host keyboard layout.
//!
//! Every key has a normal and an FN layer; most letter keys are double-action with a symbol on
//! the deeper switch. Modifier-only actions lock until the whole keyboard is released.

use dak_common::keycodes::{key_range::NONE, modifiers::*, *};

use crate::{
    catalog::{KeyBehavior, KeyDefinition, LayoutConfig},
    matrix::MatrixPos,
};

pub const ROWS: usize = 11;
pub const COLS: usize = 14;
pub const KEY_COUNT: usize = 71;

const ADD: KeyBehavior = KeyBehavior::Additive;
const DBL: KeyBehavior = KeyBehavior::DoubleAction;
const TGL: KeyBehavior = KeyBehavior::Toggle;

/// Board positions are given column first, as printed on the PCB.
const fn b(col: u8, row: u8) -> MatrixPos {
    MatrixPos::new(row, col)
}

const fn k(
    normal: KeyBehavior,
    fn_layer: KeyBehavior,
    codes: [u16; 4],
    modifiers: [u8; 4],
    first: MatrixPos,
    second: MatrixPos,
) -> KeyDefinition {
    KeyDefinition::new(normal, fn_layer, codes, modifiers, first, second)
}

/// Left and right FN switches.
pub const FN_SWITCHES: [MatrixPos; 2] = [b(4, 8), b(10, 8)];

/// Joystick keys have no second depth; they share this unused position.
const JOY: MatrixPos = b(0, 0);

#[rustfmt::skip]
pub const KEYS: [KeyDefinition; KEY_COUNT] = [
    // row 1
    k(ADD, ADD, [KEY_ESC, KEY_SYSTEM_WAKE_UP, KEY_SYSTEM_SLEEP, NONE], [0, 0, 0, 0], b(0, 0), b(1, 1)),
    k(DBL, ADD, [KEY_TILDE, KEY_F1, NONE, NONE], [0, 0, 0, 0], b(1, 0), b(1, 1)),
    k(DBL, ADD, [KEY_5, KEY_F2, NONE, NONE], [SHIFT, 0, 0, 0], b(2, 0), b(2, 1)),
    k(DBL, ADD, [KEY_NON_US_BS, KEY_F3, NONE, NONE], [ALTGR, 0, 0, 0], b(3, 0), b(3, 1)),
    k(DBL, ADD, [KEY_6, KEY_F4, NONE, NONE], [SHIFT, 0, 0, 0], b(4, 0), b(4, 1)),
    k(DBL, ADD, [KEY_TILDE, KEY_F5, NONE, NONE], [SHIFT, 0, 0, 0], b(5, 0), b(5, 1)),
    k(DBL, ADD, [KEY_EQUAL, KEY_F6, NONE, NONE], [0, 0, 0, 0], b(6, 0), b(6, 1)),
    k(DBL, ADD, [KEY_EQUAL, KEY_F7, NONE, NONE], [SHIFT, 0, 0, 0], b(7, 0), b(7, 1)),
    k(DBL, ADD, [KEY_E, KEY_F8, NONE, NONE], [ALTGR, 0, 0, 0], b(8, 0), b(8, 1)),
    k(DBL, ADD, [KEY_RIGHT_BRACE, KEY_F9, NONE, NONE], [ALTGR, 0, 0, 0], b(9, 0), b(9, 1)),
    k(DBL, ADD, [KEY_RIGHT_BRACE, KEY_F10, NONE, NONE], [SHIFT, 0, 0, 0], b(10, 0), b(10, 1)),
    k(DBL, ADD, [KEY_RIGHT_BRACE, KEY_F11, NONE, NONE], [0, 0, 0, 0], b(11, 0), b(11, 1)),
    k(DBL, ADD, [KEY_3, KEY_F12, NONE, NONE], [ALTGR, 0, 0, 0], b(12, 0), b(12, 1)),
    k(ADD, ADD, [KEY_DELETE, NONE, KEY_SYSTEM_POWER_DOWN, NONE], [0, 0, 0, 0], b(13, 0), b(13, 1)),
    // row 2
    k(DBL, ADD, [KEY_TAB, KEY_TAB, NONE, NONE], [0, SHIFT, 0, 0], b(0, 2), b(0, 3)),
    k(DBL, ADD, [KEY_Q, KEY_2, KEY_TILDE, NONE], [0, ALTGR, 0, 0], b(1, 2), b(1, 3)),
    k(DBL, ADD, [KEY_W, KEY_MINUS, NONE, NONE], [0, SHIFT, 0, 0], b(2, 2), b(2, 3)),
    k(DBL, ADD, [KEY_E, KEY_PERIOD, KEY_EQUAL, NONE], [0, SHIFT, 0, 0], b(3, 2), b(3, 3)),
    k(DBL, ADD, [KEY_R, KEY_COMMA, KEY_EQUAL, NONE], [0, SHIFT, 0, 0], b(4, 2), b(4, 3)),
    k(DBL, ADD, [KEY_T, KEY_2, NONE, NONE], [0, SHIFT, 0, 0], b(5, 2), b(5, 3)),
    k(ADD, ADD, [KEY_PAGE_UP, NONE, NONE, NONE], [0, 0, 0, 0], b(6, 2), b(6, 3)),
    k(ADD, ADD, [KEY_HOME, NONE, NONE, NONE], [0, 0, 0, 0], b(7, 2), b(7, 3)),
    k(DBL, ADD, [KEY_Y, KEY_BACKSLASH, KEY_TILDE, NONE], [0, 0, SHIFT, 0], b(8, 2), b(8, 3)),
    k(DBL, ADD, [KEY_U, KEY_7, KEY_RIGHT_BRACE, NONE], [0, 0, 0, 0], b(9, 2), b(9, 3)),
    k(DBL, ADD, [KEY_I, KEY_8, KEY_4, NONE], [0, 0, SHIFT, 0], b(10, 2), b(10, 3)),
    k(DBL, ADD, [KEY_O, KEY_9, KEY_LEFT_BRACE, NONE], [0, 0, 0, 0], b(11, 2), b(11, 3)),
    k(DBL, ADD, [KEY_P, KEY_MINUS, KEY_3, NONE], [0, 0, ALTGR, 0], b(12, 2), b(12, 3)),
    k(DBL, ADD, [KEY_3, KEY_4, NONE, NONE], [SHIFT, ALTGR, 0, 0], b(13, 2), b(13, 3)),
    // row 3
    k(ADD, ADD, [KEY_CAPS_LOCK, NONE, NONE, NONE], [0, 0, 0, 0], b(0, 4), b(0, 5)),
    k(DBL, ADD, [KEY_A, KEY_8, NONE, NONE], [0, ALTGR, 0, 0], b(1, 4), b(1, 5)),
    k(DBL, TGL, [KEY_S, KEY_9, NONE, NONE], [0, ALTGR, 0, 0], b(2, 4), b(2, 5)),
    k(DBL, ADD, [KEY_D, KEY_8, NONE, NONE], [0, SHIFT, 0, 0], b(3, 4), b(3, 5)),
    k(DBL, DBL, [KEY_F, KEY_9, NONE, NONE], [0, SHIFT, 0, 0], b(4, 4), b(4, 5)),
    k(DBL, ADD, [KEY_G, KEY_7, NONE, NONE], [0, ALTGR, 0, 0], b(5, 4), b(5, 5)),
    k(ADD, ADD, [KEY_PAGE_DOWN, NONE, NONE, NONE], [0, 0, 0, 0], b(6, 4), b(6, 5)),
    k(ADD, ADD, [KEY_END, NONE, NONE, NONE], [0, 0, 0, 0], b(7, 4), b(7, 5)),
    k(DBL, ADD, [KEY_H, KEY_0, NONE, NONE], [0, ALTGR, 0, 0], b(8, 4), b(8, 5)),
    k(DBL, ADD, [KEY_J, KEY_4, KEY_NON_US_BS, NONE], [0, 0, ALTGR, 0], b(9, 4), b(9, 5)),
    k(DBL, ADD, [KEY_K, KEY_5, KEY_5, NONE], [0, 0, SHIFT, 0], b(10, 4), b(10, 5)),
    k(DBL, ADD, [KEY_L, KEY_6, KEY_RIGHT_BRACE, NONE], [0, 0, SHIFT, 0], b(11, 4), b(11, 5)),
    k(DBL, ADD, [KEY_SEMICOLON, KEY_0, NONE, NONE], [0, 0, 0, 0], b(12, 4), b(12, 5)),
    k(DBL, ADD, [KEY_QUOTE, KEY_1, NONE, NONE], [0, SHIFT, 0, 0], b(13, 4), b(13, 5)),
    // row 4
    k(TGL, ADD, [NONE, KEY_PRINTSCREEN, NONE, NONE], [SHIFT, 0, SHIFT, 0], b(0, 6), b(0, 7)),
    k(DBL, ADD, [KEY_Z, KEY_NON_US_BS, KEY_MEDIA_VOLUME_DEC, NONE], [0, 0, 0, 0], b(1, 6), b(1, 7)),
    k(DBL, ADD, [KEY_X, KEY_NON_US_BS, KEY_MEDIA_VOLUME_INC, NONE], [0, SHIFT, 0, 0], b(2, 6), b(2, 7)),
    k(DBL, ADD, [KEY_C, KEY_0, KEY_MEDIA_MUTE, NONE], [0, SHIFT, 0, 0], b(3, 6), b(3, 7)),
    k(DBL, ADD, [KEY_V, KEY_7, KEY_MEDIA_PAUSE, NONE], [0, SHIFT, 0, 0], b(4, 6), b(4, 7)),
    k(DBL, ADD, [KEY_B, KEY_MINUS, KEY_MEDIA_PLAY, NONE], [0, ALTGR, 0, 0], b(5, 6), b(5, 7)),
    k(DBL, ADD, [KEY_N, KEY_BACKSLASH, KEY_MEDIA_PREV_TRACK, NONE], [0, SHIFT, 0, 0], b(8, 6), b(8, 7)),
    k(DBL, ADD, [KEY_M, KEY_1, KEY_MEDIA_NEXT_TRACK, NONE], [0, 0, 0, 0], b(9, 6), b(9, 7)),
    k(DBL, ADD, [KEY_COMMA, KEY_2, NONE, NONE], [0, 0, 0, 0], b(10, 6), b(10, 7)),
    k(DBL, ADD, [KEY_PERIOD, KEY_3, NONE, NONE], [0, 0, 0, 0], b(11, 6), b(11, 7)),
    k(DBL, ADD, [KEY_SLASH, KEY_SLASH, NONE, NONE], [RIGHT_SHIFT, 0, 0, 0], b(12, 6), b(12, 7)),
    k(TGL, ADD, [NONE, KEY_INSERT, NONE, NONE], [CTRL, 0, 0, 0], b(13, 6), b(13, 7)),
    // row 5
    k(ADD, ADD, [NONE, NONE, NONE, NONE], [CTRL, SHIFT, 0, 0], b(0, 8), b(0, 9)),
    k(ADD, ADD, [NONE, KEY_TAB, NONE, NONE], [GUI, 0, 0, 0], b(1, 8), b(1, 9)),
    k(ADD, ADD, [NONE, KEY_TAB, NONE, NONE], [ALT, 0, 0, 0], b(2, 8), b(2, 9)),
    k(ADD, ADD, [NONE, NONE, KEY_PAGE_UP, NONE], [0, 0, CTRL, 0], b(4, 9), b(4, 9)),
    k(ADD, ADD, [KEY_SPACE, NONE, NONE, NONE], [0, 0, 0, 0], b(5, 8), b(5, 9)),
    k(ADD, ADD, [KEY_ENTER, NONE, NONE, NONE], [0, 0, 0, 0], b(6, 9), b(6, 8)),
    k(ADD, ADD, [KEY_BACKSPACE, NONE, NONE, NONE], [0, 0, 0, 0], b(7, 9), b(7, 8)),
    k(ADD, ADD, [NONE, NONE, NONE, NONE], [SHIFT, CTRL, SHIFT, CTRL], b(8, 8), b(8, 9)),
    k(ADD, ADD, [NONE, NONE, KEY_PAGE_DOWN, NONE], [0, 0, CTRL, 0], b(10, 9), b(10, 9)),
    k(ADD, ADD, [NONE, NONE, NONE, NONE], [RIGHT_ALT, 0, 0, 0], b(11, 8), b(11, 9)),
    k(ADD, ADD, [KEY_MENU, NONE, NONE, NONE], [0, 0, 0, 0], b(12, 8), b(12, 9)),
    k(ADD, ADD, [NONE, NONE, NONE, NONE], [RIGHT_CTRL, 0, 0, 0], b(13, 8), b(13, 9)),
    // joystick
    k(ADD, ADD, [KEY_DOWN, NONE, KEY_DOWN, NONE], [0, 0, GUI, 0], b(0, 10), JOY),
    k(ADD, ADD, [KEY_RIGHT, NONE, KEY_RIGHT, NONE], [0, 0, GUI, 0], b(1, 10), JOY),
    k(ADD, ADD, [KEY_DELETE, NONE, NONE, NONE], [0, 0, 0, 0], b(2, 10), JOY),
    k(ADD, ADD, [KEY_UP, NONE, KEY_UP, NONE], [0, 0, GUI, 0], b(4, 10), JOY),
    k(ADD, ADD, [KEY_LEFT, NONE, KEY_LEFT, NONE], [0, 0, GUI, 0], b(5, 10), JOY),
];

pub const LAYOUT: LayoutConfig<'static> = LayoutConfig::new(&KEYS, FN_SWITCHES);

#[cfg(test)]
#[path = "dak10_fi_test.rs"]
mod test;
