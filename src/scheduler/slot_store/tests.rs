//! Slot allocation, release, and handle validation.
use super::*;
use crate::traits::timer_callback::Callback;

fn noop() {}

#[test]
/// Registrations fill the slots in order and start inactive.
fn test_register_uses_first_free_slot() {
    let mut store = SlotStore::<Callback, 4>::new();

    let a = store.register(Callback::new(noop), Some(5), false).unwrap();
    let b = store.register(Callback::empty(), Some(3), true).unwrap();

    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(store.len(), 2);

    let record = store.allocated(b).unwrap();
    assert_eq!(record.period, Some(3));
    assert!(record.repeating);
    assert!(!record.is_active());
    assert_eq!(record.previous, None);
    assert_eq!(record.next, None);
}

#[test]
/// A full store refuses new registrations without touching existing ones.
fn test_register_fails_when_full() {
    let mut store = SlotStore::<Callback, 2>::new();
    store.register(Callback::empty(), Some(1), false).unwrap();
    store.register(Callback::empty(), Some(2), false).unwrap();

    assert_eq!(
        store.register(Callback::empty(), Some(3), false),
        Err(TimerError::CapacityExhausted { capacity: 2 })
    );
    assert_eq!(store.len(), 2);
}

#[test]
/// A released slot is reused by the next registration.
fn test_release_frees_slot_for_reuse() {
    let mut store = SlotStore::<Callback, 3>::new();
    let _a = store.register(Callback::empty(), Some(1), false).unwrap();
    let b = store.register(Callback::empty(), Some(2), false).unwrap();
    let _c = store.register(Callback::empty(), Some(3), false).unwrap();

    store.release(b).unwrap();
    assert_eq!(store.len(), 2);
    assert!(!store.get(b.index()).is_allocated());
    assert_eq!(store.get(b.index()).period, None);

    let d = store.register(Callback::empty(), Some(9), true).unwrap();
    assert_eq!(d.index(), b.index());
    assert_eq!(store.allocated(d).unwrap().period, Some(9));
}

#[test]
/// Releasing twice or releasing an out-of-range handle is rejected.
fn test_release_invalid_handles() {
    let mut store = SlotStore::<Callback, 2>::new();
    let a = store.register(Callback::empty(), Some(1), false).unwrap();

    store.release(a).unwrap();
    assert_eq!(
        store.release(a),
        Err(TimerError::InvalidTimer { index: 0 })
    );
    assert_eq!(
        store.release(TimerId::from_index(7)),
        Err(TimerError::InvalidTimer { index: 7 })
    );
    assert_eq!(store.len(), 0);
}

#[test]
/// Clearing frees every slot and resets the counter.
fn test_clear_frees_everything() {
    let mut store = SlotStore::<Callback, 3>::new();
    for period in 1..=3 {
        store.register(Callback::new(noop), Some(period), false).unwrap();
    }

    store.clear();

    assert_eq!(store.len(), 0);
    for index in 0..3 {
        assert!(!store.get(index).is_allocated());
        assert!(!store.get(index).callback.is_valid());
    }
}
