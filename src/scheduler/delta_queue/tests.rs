//! Delta-queue ordering, re-basing on insert, and compensation on removal.
use super::*;
use crate::traits::timer_callback::Callback;

const CAP: usize = 6;

/// Store with `count` registered (inactive) one-shot timers.
fn store_with(count: usize) -> SlotStore<Callback, CAP> {
    let mut store = SlotStore::new();
    for _ in 0..count {
        store.register(Callback::empty(), Some(1), false).unwrap();
    }
    store
}

/// Slot indices head to tail, checking the backward links along the way.
fn order(queue: &DeltaQueue, store: &SlotStore<Callback, CAP>) -> Vec<usize> {
    let mut out = Vec::new();
    let mut previous = None;
    let mut cursor = queue.head;
    while let Some(index) = cursor {
        assert_eq!(store.get(index).previous, previous, "broken back link at {}", index);
        out.push(index);
        previous = Some(index);
        cursor = store.get(index).next;
    }
    assert_eq!(queue.tail, previous);
    out
}

fn deltas(queue: &DeltaQueue, store: &SlotStore<Callback, CAP>) -> Vec<Ticks> {
    order(queue, store)
        .into_iter()
        .map(|index| store.get(index).delta.unwrap())
        .collect()
}

#[test]
/// First insertion becomes both ends of the queue.
fn test_insert_into_empty_queue() {
    let mut store = store_with(1);
    let mut queue = DeltaQueue::new();

    queue.insert(&mut store, 0, 7);

    assert_eq!(queue.front(), Some(0));
    assert_eq!(queue.tail, Some(0));
    assert_eq!(deltas(&queue, &store), [7]);
}

#[test]
/// Insertions in arbitrary order end up sorted with relative deltas.
fn test_insert_keeps_relative_ordering() {
    let mut store = store_with(4);
    let mut queue = DeltaQueue::new();

    queue.insert(&mut store, 0, 10);
    queue.insert(&mut store, 1, 3);
    queue.insert(&mut store, 2, 15);
    queue.insert(&mut store, 3, 5);

    assert_eq!(order(&queue, &store), [1, 3, 0, 2]);
    assert_eq!(deltas(&queue, &store), [3, 2, 5, 5]);

    let absolute: Vec<_> = queue.iter(&store).collect();
    assert_eq!(absolute, [(1, 3), (3, 5), (0, 10), (2, 15)]);
}

#[test]
/// Equal remaining time: the newcomer goes in front of the existing node.
fn test_insert_tie_goes_before_existing() {
    let mut store = store_with(3);
    let mut queue = DeltaQueue::new();

    queue.insert(&mut store, 0, 4);
    queue.insert(&mut store, 1, 4);

    assert_eq!(order(&queue, &store), [1, 0]);
    assert_eq!(deltas(&queue, &store), [4, 0]);

    queue.insert(&mut store, 2, 4);
    assert_eq!(order(&queue, &store), [2, 1, 0]);
    assert_eq!(deltas(&queue, &store), [4, 0, 0]);
}

#[test]
/// Cancelling a middle node hands its delta to the successor.
fn test_remove_live_compensates_successor() {
    let mut store = store_with(3);
    let mut queue = DeltaQueue::new();
    queue.insert(&mut store, 0, 2);
    queue.insert(&mut store, 1, 5);
    queue.insert(&mut store, 2, 9);

    queue.remove(&mut store, 1, false);

    assert_eq!(order(&queue, &store), [0, 2]);
    assert_eq!(deltas(&queue, &store), [2, 7]);
    let record = store.get(1);
    assert!(!record.is_active());
    assert_eq!((record.previous, record.next), (None, None));
}

#[test]
/// Removing an expired head leaves the successor's delta untouched.
fn test_remove_expired_head_keeps_successor_delta() {
    let mut store = store_with(2);
    let mut queue = DeltaQueue::new();
    queue.insert(&mut store, 0, 2);
    queue.insert(&mut store, 1, 5);

    queue.remove(&mut store, 0, true);

    assert_eq!(queue.front(), Some(1));
    assert_eq!(deltas(&queue, &store), [3]);
}

#[test]
/// Removing the ends fixes head and tail; removing the last node empties the queue.
fn test_remove_ends_updates_head_and_tail() {
    let mut store = store_with(3);
    let mut queue = DeltaQueue::new();
    queue.insert(&mut store, 0, 1);
    queue.insert(&mut store, 1, 2);
    queue.insert(&mut store, 2, 3);

    queue.remove(&mut store, 2, false);
    assert_eq!(queue.tail, Some(1));

    queue.remove(&mut store, 0, false);
    assert_eq!(queue.front(), Some(1));
    assert_eq!(deltas(&queue, &store), [2]);

    queue.remove(&mut store, 1, false);
    assert!(queue.is_empty());
    assert_eq!(queue.tail, None);
}

#[test]
/// Removing a node that is not queued is a no-op.
fn test_remove_inactive_is_noop() {
    let mut store = store_with(2);
    let mut queue = DeltaQueue::new();
    queue.insert(&mut store, 0, 4);

    queue.remove(&mut store, 1, false);

    assert_eq!(order(&queue, &store), [0]);
    assert_eq!(deltas(&queue, &store), [4]);
}
