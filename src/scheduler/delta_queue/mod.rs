//! Active delta-queue: a doubly linked list threaded through the slot store.
//!
//! Nodes are ordered by increasing expiry, but each node only stores its
//! countdown *relative to its predecessor*. Summing deltas from the head up
//! to a node yields that node's true remaining ticks, so "what fires next,
//! and when" is answered by the head alone.
//!
//! ```text
//! absolute:  3      5      5      12
//! delta:    [3] -> [2] -> [0] -> [7]
//! ```
use crate::core::Ticks;
use crate::scheduler::slot_store::SlotStore;
use crate::traits::timer_callback::TimerCallback;

/// Queue ends. Links between nodes live in the records themselves.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DeltaQueue {
    head: Option<usize>,
    tail: Option<usize>,
}

impl DeltaQueue {
    pub(crate) const fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Slot index of the next timer to expire.
    #[inline]
    pub(crate) fn front(&self) -> Option<usize> {
        self.head
    }

    /// Forget both ends. The slots themselves are reset by the store.
    pub(crate) fn clear(&mut self) {
        self.head = None;
        self.tail = None;
    }

    //==================================================================================Insertion
    /// Link slot `index` so that it expires `delta` ticks from now.
    ///
    /// Walks from the head, consuming the deltas of the nodes it passes. A node
    /// with an equal remaining time is overtaken: the new node is spliced in
    /// front of it, and the overtaken node is re-based relative to the newcomer.
    pub(crate) fn insert<C: TimerCallback, const N: usize>(
        &mut self,
        slots: &mut SlotStore<C, N>,
        index: usize,
        mut delta: Ticks,
    ) {
        debug_assert!(!slots.get(index).is_active(), "timer {} already queued", index);

        let mut previous = None;
        let mut cursor = self.head;

        while let Some(test) = cursor {
            let record = slots.get_mut(test);
            let test_delta = record.delta.unwrap_or_default();

            if delta <= test_delta {
                record.delta = Some(test_delta - delta);
                record.previous = Some(index);
                break;
            }

            delta -= test_delta;
            previous = Some(test);
            cursor = record.next;
        }

        let node = slots.get_mut(index);
        node.delta = Some(delta);
        node.previous = previous;
        node.next = cursor;

        match previous {
            Some(before) => slots.get_mut(before).next = Some(index),
            None => self.head = Some(index),
        }
        if cursor.is_none() {
            self.tail = Some(index);
        }
    }

    //==================================================================================Removal
    /// Unlink slot `index` and mark it inactive.
    ///
    /// For a live cancellation (`has_expired == false`) the removed delta is
    /// handed over to the successor so its absolute expiry does not move.
    /// An expired node's delta was already consumed by `tick`.
    pub(crate) fn remove<C: TimerCallback, const N: usize>(
        &mut self,
        slots: &mut SlotStore<C, N>,
        index: usize,
        has_expired: bool,
    ) {
        let node = slots.get_mut(index);
        let Some(delta) = node.delta.take() else {
            return;
        };
        let previous = node.previous.take();
        let next = node.next.take();

        match previous {
            Some(before) => slots.get_mut(before).next = next,
            None => self.head = next,
        }

        match next {
            Some(after) => {
                let successor = slots.get_mut(after);
                successor.previous = previous;
                if !has_expired {
                    if let Some(successor_delta) = successor.delta.as_mut() {
                        *successor_delta = successor_delta.saturating_add(delta);
                    }
                }
            }
            None => self.tail = previous,
        }
    }

    //==================================================================================Traversal
    /// Walk the queue head to tail, yielding `(slot index, true remaining ticks)`.
    pub(crate) fn iter<'a, C: TimerCallback, const N: usize>(
        &self,
        slots: &'a SlotStore<C, N>,
    ) -> QueueIter<'a, C, N> {
        QueueIter {
            slots,
            cursor: self.head,
            elapsed: 0,
        }
    }
}

/// Iterator returned by [`DeltaQueue::iter`].
pub(crate) struct QueueIter<'a, C, const N: usize> {
    slots: &'a SlotStore<C, N>,
    cursor: Option<usize>,
    elapsed: Ticks,
}

impl<C: TimerCallback, const N: usize> Iterator for QueueIter<'_, C, N> {
    type Item = (usize, Ticks);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let record = self.slots.get(index);
        self.elapsed = self
            .elapsed
            .saturating_add(record.delta.unwrap_or_default());
        self.cursor = record.next;
        Some((index, self.elapsed))
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
