use super::*;

#[test]
fn code_kinds() {
    assert_eq!(kind(0), CodeKind::None);
    assert_eq!(kind(KEY_A), CodeKind::Basic(4));
    assert_eq!(kind(KEY_RIGHT_ALT), CodeKind::Basic(0xe6));
    assert_eq!(kind(KEY_MEDIA_MUTE), CodeKind::Consumer(0xe2));
    assert_eq!(kind(KEY_SYSTEM_POWER_DOWN), CodeKind::SysCtl(0x81));
    assert_eq!(kind(KEY_SYSTEM_WAKE_UP), CodeKind::SysCtl(0x83));
    assert_eq!(kind(0xffff), CodeKind::None);
}

#[test]
fn ranges() {
    assert_eq!(key_range::base_code(KEY_MEDIA_VOLUME_INC), 0x100);
    assert_eq!(KEY_SYSTEM_POWER_DOWN, key_range::SYS_CTL_MIN);
    assert!(KEY_SYSTEM_WAKE_UP <= key_range::SYS_CTL_MAX);
    assert_eq!(KEY_1, key_range::BASIC_1);
    assert_eq!(KEY_0, key_range::BASIC_0);
}
