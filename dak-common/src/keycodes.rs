pub mod key_range {
    /// No action is emitted for a slot holding this code.
    pub const NONE: u16 = 0;

    pub const BASIC_MIN: u16 = 0x4;
    pub const BASIC_A: u16 = 0x4;
    pub const BASIC_1: u16 = 0x1e;
    pub const BASIC_0: u16 = 0x27;
    pub const BASIC_MAX: u16 = 0xfe;
    pub const MODIFIER_MIN: u16 = 0xe0;
    pub const MODIFIER_MAX: u16 = 0xe7;
    pub const CONSUMER_MIN: u16 = 0x100;
    pub const CONSUMER_MAX: u16 = 0x3a0;
    pub const SYS_CTL_MIN: u16 = 0x3a1;
    pub const SYS_CTL_MAX: u16 = 0x3d5;

    pub const SYS_CTL_BASE: u16 = 0x81;

    pub fn base_code(code: u16) -> u16 {
        code & 0xff00
    }
}

pub mod modifiers {
    pub const CTRL: u8 = 1;
    pub const SHIFT: u8 = 1 << 1;
    pub const ALT: u8 = 1 << 2;
    pub const GUI: u8 = 1 << 3;
    pub const RIGHT_CTRL: u8 = 1 << 4;
    pub const RIGHT_SHIFT: u8 = 1 << 5;
    pub const RIGHT_ALT: u8 = 1 << 6;
    pub const RIGHT_GUI: u8 = 1 << 7;
    pub const ALTGR: u8 = RIGHT_ALT;
}

use key_range::*;

/// What kind of HID usage a code maps to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CodeKind {
    None,
    /// Keyboard page usage, `0xe0..=0xe7` included.
    Basic(u8),
    Consumer(u16),
    SysCtl(u16),
}

pub fn kind(code: u16) -> CodeKind {
    match code {
        NONE => CodeKind::None,
        BASIC_MIN..=BASIC_MAX => CodeKind::Basic(code as u8),
        CONSUMER_MIN..=CONSUMER_MAX => CodeKind::Consumer(code - CONSUMER_MIN),
        SYS_CTL_MIN..=SYS_CTL_MAX => CodeKind::SysCtl(code - SYS_CTL_MIN + SYS_CTL_BASE),
        _ => CodeKind::None,
    }
}

pub const fn consumer(usage: u16) -> u16 {
    CONSUMER_MIN + usage
}

pub const fn sys_ctl(usage: u16) -> u16 {
    SYS_CTL_MIN + usage - SYS_CTL_BASE
}

pub const KEY_A: u16 = 0x04;
pub const KEY_B: u16 = 0x05;
pub const KEY_C: u16 = 0x06;
pub const KEY_D: u16 = 0x07;
pub const KEY_E: u16 = 0x08;
pub const KEY_F: u16 = 0x09;
pub const KEY_G: u16 = 0x0a;
pub const KEY_H: u16 = 0x0b;
pub const KEY_I: u16 = 0x0c;
pub const KEY_J: u16 = 0x0d;
pub const KEY_K: u16 = 0x0e;
pub const KEY_L: u16 = 0x0f;
pub const KEY_M: u16 = 0x10;
pub const KEY_N: u16 = 0x11;
pub const KEY_O: u16 = 0x12;
pub const KEY_P: u16 = 0x13;
pub const KEY_Q: u16 = 0x14;
pub const KEY_R: u16 = 0x15;
pub const KEY_S: u16 = 0x16;
pub const KEY_T: u16 = 0x17;
pub const KEY_U: u16 = 0x18;
pub const KEY_V: u16 = 0x19;
pub const KEY_W: u16 = 0x1a;
pub const KEY_X: u16 = 0x1b;
pub const KEY_Y: u16 = 0x1c;
pub const KEY_Z: u16 = 0x1d;

pub const KEY_1: u16 = 0x1e;
pub const KEY_2: u16 = 0x1f;
pub const KEY_3: u16 = 0x20;
pub const KEY_4: u16 = 0x21;
pub const KEY_5: u16 = 0x22;
pub const KEY_6: u16 = 0x23;
pub const KEY_7: u16 = 0x24;
pub const KEY_8: u16 = 0x25;
pub const KEY_9: u16 = 0x26;
pub const KEY_0: u16 = 0x27;

pub const KEY_ENTER: u16 = 0x28;
pub const KEY_ESC: u16 = 0x29;
pub const KEY_BACKSPACE: u16 = 0x2a;
pub const KEY_TAB: u16 = 0x2b;
pub const KEY_SPACE: u16 = 0x2c;
pub const KEY_MINUS: u16 = 0x2d;
pub const KEY_EQUAL: u16 = 0x2e;
pub const KEY_LEFT_BRACE: u16 = 0x2f;
pub const KEY_RIGHT_BRACE: u16 = 0x30;
pub const KEY_BACKSLASH: u16 = 0x31;
pub const KEY_SEMICOLON: u16 = 0x33;
pub const KEY_QUOTE: u16 = 0x34;
pub const KEY_TILDE: u16 = 0x35;
pub const KEY_COMMA: u16 = 0x36;
pub const KEY_PERIOD: u16 = 0x37;
pub const KEY_SLASH: u16 = 0x38;
pub const KEY_CAPS_LOCK: u16 = 0x39;

pub const KEY_F1: u16 = 0x3a;
pub const KEY_F2: u16 = 0x3b;
pub const KEY_F3: u16 = 0x3c;
pub const KEY_F4: u16 = 0x3d;
pub const KEY_F5: u16 = 0x3e;
pub const KEY_F6: u16 = 0x3f;
pub const KEY_F7: u16 = 0x40;
pub const KEY_F8: u16 = 0x41;
pub const KEY_F9: u16 = 0x42;
pub const KEY_F10: u16 = 0x43;
pub const KEY_F11: u16 = 0x44;
pub const KEY_F12: u16 = 0x45;

pub const KEY_PRINTSCREEN: u16 = 0x46;
pub const KEY_INSERT: u16 = 0x49;
pub const KEY_HOME: u16 = 0x4a;
pub const KEY_PAGE_UP: u16 = 0x4b;
pub const KEY_DELETE: u16 = 0x4c;
pub const KEY_END: u16 = 0x4d;
pub const KEY_PAGE_DOWN: u16 = 0x4e;
pub const KEY_RIGHT: u16 = 0x4f;
pub const KEY_LEFT: u16 = 0x50;
pub const KEY_DOWN: u16 = 0x51;
pub const KEY_UP: u16 = 0x52;
pub const KEY_NON_US_BS: u16 = 0x64;
pub const KEY_MENU: u16 = 0x65;

pub const KEY_LEFT_CTRL: u16 = 0xe0;
pub const KEY_LEFT_SHIFT: u16 = 0xe1;
pub const KEY_LEFT_ALT: u16 = 0xe2;
pub const KEY_LEFT_GUI: u16 = 0xe3;
pub const KEY_RIGHT_CTRL: u16 = 0xe4;
pub const KEY_RIGHT_SHIFT: u16 = 0xe5;
pub const KEY_RIGHT_ALT: u16 = 0xe6;
pub const KEY_RIGHT_GUI: u16 = 0xe7;

pub const KEY_MEDIA_PLAY: u16 = consumer(0xb0);
pub const KEY_MEDIA_PAUSE: u16 = consumer(0xb1);
pub const KEY_MEDIA_NEXT_TRACK: u16 = consumer(0xb5);
pub const KEY_MEDIA_PREV_TRACK: u16 = consumer(0xb6);
pub const KEY_MEDIA_PLAY_PAUSE: u16 = consumer(0xcd);
pub const KEY_MEDIA_MUTE: u16 = consumer(0xe2);
pub const KEY_MEDIA_VOLUME_INC: u16 = consumer(0xe9);
pub const KEY_MEDIA_VOLUME_DEC: u16 = consumer(0xea);

pub const KEY_SYSTEM_POWER_DOWN: u16 = sys_ctl(0x81);
pub const KEY_SYSTEM_SLEEP: u16 = sys_ctl(0x82);
pub const KEY_SYSTEM_WAKE_UP: u16 = sys_ctl(0x83);

#[cfg(test)]
#[path = "keycodes_test.rs"]
mod test;
