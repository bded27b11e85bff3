use dak_common::keycodes::{key_range::NONE, modifiers::*, *};

use super::*;

fn a(code: u16) -> Action {
    Action::new(code, 0)
}

#[test]
fn acquire_first_free_slot() {
    let mut reg = ActiveRegister::<3, 2>::default();
    assert_eq!(reg.acquire(SlotKind::Key, 4, a(KEY_A)), Ok(RegisterSlot::Key(0)));
    assert_eq!(reg.acquire(SlotKind::Key, 5, a(KEY_B)), Ok(RegisterSlot::Key(1)));
    assert_eq!(reg.acquire(SlotKind::Key, 6, a(KEY_C)), Ok(RegisterSlot::Key(2)));
    assert_eq!(reg.key_count(), 3);

    assert_eq!(
        reg.release(RegisterSlot::Key(1), 5),
        Ok(Holder {
            key: 5,
            action: a(KEY_B)
        })
    );
    assert_eq!(reg.acquire(SlotKind::Key, 7, a(KEY_D)), Ok(RegisterSlot::Key(1)));
    assert_eq!(reg.get(RegisterSlot::Key(1)).map(|h| h.key), Some(7));
}

#[test]
fn full_keeps_existing_slots() {
    let mut reg: ActiveRegister = ActiveRegister::default();
    for i in 0..6 {
        reg.acquire(SlotKind::Key, i, a(KEY_A + i as u16)).unwrap();
    }
    assert_eq!(reg.acquire(SlotKind::Key, 6, a(KEY_G)), Err(Full));
    assert_eq!(reg.key_count(), 6);
    for i in 0..6u8 {
        assert_eq!(reg.get(RegisterSlot::Key(i)).map(|h| h.key), Some(i as usize));
    }

    // modifier slots are separate
    assert_eq!(
        reg.acquire(SlotKind::Modifier, 6, Action::new(NONE, SHIFT)),
        Ok(RegisterSlot::Modifier(0))
    );
}

#[test]
fn ten_modifier_slots() {
    let mut reg: ActiveRegister = ActiveRegister::default();
    for i in 0..10 {
        reg.acquire(SlotKind::Modifier, i, Action::new(NONE, CTRL))
            .unwrap();
    }
    assert_eq!(
        reg.acquire(SlotKind::Modifier, 10, Action::new(NONE, CTRL)),
        Err(Full)
    );
    assert_eq!(reg.modifier_slots().count(), 10);
    assert_eq!(
        reg.modifier_slots().next(),
        Some((
            RegisterSlot::Modifier(0),
            Holder {
                key: 0,
                action: Action::new(NONE, CTRL)
            }
        ))
    );
}

#[test]
fn invalid_release() {
    let mut reg = ActiveRegister::<2, 2>::default();
    let slot = reg.acquire(SlotKind::Key, 1, a(KEY_A)).unwrap();

    assert_eq!(
        reg.release(slot, 2),
        Err(InvalidRelease::NotOwner { slot, owner: 1 })
    );
    assert!(reg.get(slot).is_some());

    reg.release(slot, 1).unwrap();
    assert_eq!(reg.release(slot, 1), Err(InvalidRelease::Vacant(slot)));
    assert_eq!(
        reg.release(RegisterSlot::Modifier(9), 1),
        Err(InvalidRelease::Vacant(RegisterSlot::Modifier(9)))
    );
}

#[test]
fn clear() {
    let mut reg = ActiveRegister::<2, 2>::default();
    reg.acquire(SlotKind::Key, 1, a(KEY_A)).unwrap();
    reg.acquire(SlotKind::Modifier, 1, Action::new(NONE, ALT))
        .unwrap();
    reg.clear();
    assert_eq!(reg.key_count(), 0);
    assert_eq!(reg.modifier_count(), 0);
}
