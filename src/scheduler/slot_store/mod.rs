//! Fixed-size timer slot store.
//!
//! Owns every timer record. Records are constructed in place on
//! registration and reset in place on release; nothing is ever allocated.
//! Queue links are plain slot indices, so the store stays the sole owner
//! and the delta-queue only records relationships.
use crate::core::{Ticks, TimerId};
use crate::error::TimerError;
use crate::traits::timer_callback::TimerCallback;

//==================================================================================Structs
/// One slot of the store: a registered timer or a free placeholder.
#[derive(Debug, Clone)]
pub(crate) struct TimerRecord<C> {
    /// Owner handle; `None` while the slot is free.
    pub(crate) id: Option<TimerId>,
    pub(crate) callback: C,
    /// Interval between firings, or one-shot delay. `None` = never configured.
    pub(crate) period: Option<Ticks>,
    /// Countdown relative to the predecessor in the queue. `None` = not queued.
    pub(crate) delta: Option<Ticks>,
    pub(crate) repeating: bool,
    pub(crate) previous: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl<C: Default> Default for TimerRecord<C> {
    fn default() -> Self {
        Self {
            id: None,
            callback: C::default(),
            period: None,
            delta: None,
            repeating: false,
            previous: None,
            next: None,
        }
    }
}

impl<C: Default> TimerRecord<C> {
    #[inline]
    pub(crate) fn is_allocated(&self) -> bool {
        self.id.is_some()
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.delta.is_some()
    }

    /// Drop the callback and return the slot to the free state.
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Bounded pool of `N` timer records.
#[derive(Debug)]
pub(crate) struct SlotStore<C, const N: usize> {
    slots: [TimerRecord<C>; N],
    registered: usize,
}

impl<C: TimerCallback, const N: usize> Default for SlotStore<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: TimerCallback, const N: usize> SlotStore<C, N> {
    /// Store with every slot free.
    pub(crate) fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| TimerRecord::default()),
            registered: 0,
        }
    }

    /// Construct a record in the first free slot. The timer starts inactive.
    pub(crate) fn register(
        &mut self,
        callback: C,
        period: Option<Ticks>,
        repeating: bool,
    ) -> Result<TimerId, TimerError> {
        if self.registered == N {
            return Err(TimerError::CapacityExhausted { capacity: N });
        }

        let index = self
            .slots
            .iter()
            .position(|slot| !slot.is_allocated())
            .ok_or(TimerError::CapacityExhausted { capacity: N })?;

        let id = TimerId::from_index(index);
        self.slots[index] = TimerRecord {
            id: Some(id),
            callback,
            period,
            delta: None,
            repeating,
            previous: None,
            next: None,
        };
        self.registered += 1;

        Ok(id)
    }

    /// Free the slot owned by `id`.
    ///
    /// The caller must unlink the record from the queue first.
    pub(crate) fn release(&mut self, id: TimerId) -> Result<(), TimerError> {
        let slot = self.allocated_mut(id)?;
        debug_assert!(!slot.is_active(), "releasing a queued timer");
        slot.reset();
        self.registered -= 1;
        Ok(())
    }

    /// Free every slot at once.
    pub(crate) fn clear(&mut self) {
        self.slots.iter_mut().for_each(TimerRecord::reset);
        self.registered = 0;
    }

    /// Record registered under `id`, if any.
    pub(crate) fn allocated(&self, id: TimerId) -> Result<&TimerRecord<C>, TimerError> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.id == Some(id))
            .ok_or(TimerError::InvalidTimer { index: id.index() })
    }

    pub(crate) fn allocated_mut(&mut self, id: TimerId) -> Result<&mut TimerRecord<C>, TimerError> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.id == Some(id))
            .ok_or(TimerError::InvalidTimer { index: id.index() })
    }

    /// Raw slot access for queue bookkeeping. `index < N` is a caller contract.
    #[inline]
    pub(crate) fn get(&self, index: usize) -> &TimerRecord<C> {
        debug_assert!(index < N, "slot index {} out of bounds", index);
        &self.slots[index]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> &mut TimerRecord<C> {
        debug_assert!(index < N, "slot index {} out of bounds", index);
        &mut self.slots[index]
    }

    /// Number of allocated slots.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.registered
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
