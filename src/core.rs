//! Shared vocabulary between the slot store, the delta-queue and the
//! scheduler: tick counts, timer handles, and the lifecycle states a slot
//! moves through.

/// Unit of the virtual clock advanced by
/// [`TimerScheduler::tick`](crate::scheduler::TimerScheduler::tick).
///
/// The scheduler never converts ticks into wall-clock time; the clock source
/// decides what one tick means (1 ms SysTick, 10 ms RTC prescaler…).
pub type Ticks = u32;

/// Capacity used when the scheduler is instantiated without an explicit `N`.
pub const DEFAULT_MAX_TIMERS: usize = 8;

/// Handle to a registered timer.
///
/// Wraps the index of the slot holding the timer record. The handle stays
/// stable for the whole registration; once the timer is unregistered, the
/// same index may be handed out again by a later registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerId(usize);

impl TimerId {
    /// Rebuild a handle from a raw slot index (interrupt tables, FFI…).
    ///
    /// No validation happens here: an index that is out of range or not
    /// registered is rejected by every scheduler operation with
    /// [`TimerError::InvalidTimer`](crate::error::TimerError::InvalidTimer).
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Slot index backing this handle.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Lifecycle of a timer slot as observed from the public API.
///
/// ```text
/// Unregistered ──register──▶ Inactive ──start──▶ Active
///      ▲                       │  ▲               │
///      └──────unregister───────┘  └──stop/fired───┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerState {
    /// Slot is free (or the handle is out of range).
    Unregistered,
    /// Registered but not linked into the delta-queue.
    Inactive,
    /// Linked into the delta-queue and eligible to fire.
    Active {
        /// Whether the timer re-arms itself after firing.
        repeating: bool,
    },
}
