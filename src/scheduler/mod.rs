//! Fixed-capacity software timer scheduler.
//!
//! The scheduler is driven from two contexts:
//!
//! * a **clock source** (SysTick handler, RTC interrupt, a task looping on a
//!   hardware timer…) calling [`TimerScheduler::tick`] with the number of
//!   elapsed ticks;
//! * **foreground** call sites registering, arming and cancelling timers.
//!
//! Every structural mutation runs inside the guard selected through the
//! [`RawMutex`] type parameter, so the clock source never observes a
//! half-updated queue. Pick [`CriticalSectionRawMutex`] when `tick` runs in an
//! interrupt handler, [`NoopRawMutex`] when everything happens in one context.
//!
//! [`CriticalSectionRawMutex`]: embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex
//! [`NoopRawMutex`]: embassy_sync::blocking_mutex::raw::NoopRawMutex
//!
//! ```rust,ignore
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use korri_timers::{Callback, TimerScheduler};
//!
//! static TIMERS: StaticCell<TimerScheduler<CriticalSectionRawMutex>> = StaticCell::new();
//!
//! let timers = TIMERS.init(TimerScheduler::new());
//! let blink = timers.register_timer(Callback::new(toggle_led), Some(500), true)?;
//! timers.start(blink)?;
//!
//! // In the 1 ms SysTick handler:
//! timers.tick(1);
//! ```

pub(crate) mod delta_queue;
pub(crate) mod slot_store;

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};

use crate::core::{Ticks, TimerId, TimerState, DEFAULT_MAX_TIMERS};
use crate::error::TimerError;
use crate::traits::timer_callback::{Callback, TimerCallback};
use delta_queue::DeltaQueue;
use slot_store::SlotStore;

//==================================================================================Guarded state
/// Everything the guard protects: the slot store and the queue threaded through it.
#[derive(Debug)]
struct SchedulerState<C, const N: usize> {
    slots: SlotStore<C, N>,
    queue: DeltaQueue,
}

impl<C: TimerCallback, const N: usize> SchedulerState<C, N> {
    fn new() -> Self {
        Self {
            slots: SlotStore::new(),
            queue: DeltaQueue::new(),
        }
    }

    fn unregister(&mut self, id: TimerId) -> Result<(), TimerError> {
        self.stop(id)?;
        self.slots.release(id)
    }

    fn arm(&mut self, id: TimerId, immediate: bool) -> Result<(), TimerError> {
        let record = self.slots.allocated(id)?;
        let period = match record.period {
            Some(0) if record.repeating => None,
            period => period,
        }
        .ok_or(TimerError::PeriodNotConfigured { index: id.index() })?;

        if record.is_active() {
            self.queue.remove(&mut self.slots, id.index(), false);
        }
        let delta = if immediate { 0 } else { period };
        self.queue.insert(&mut self.slots, id.index(), delta);
        Ok(())
    }

    fn stop(&mut self, id: TimerId) -> Result<(), TimerError> {
        if self.slots.allocated(id)?.is_active() {
            self.queue.remove(&mut self.slots, id.index(), false);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.queue.clear();
        self.slots.clear();
    }

    /// One step of the tick loop.
    ///
    /// If the head is due within `elapsed`, consume its delta, unlink it,
    /// re-arm it when repeating, and hand back a copy of its callback.
    /// Otherwise charge the leftover ticks to the head and return `None`.
    fn expire_front(&mut self, elapsed: &mut Ticks) -> Option<(TimerId, C)> {
        let front = self.queue.front()?;
        let record = self.slots.get_mut(front);
        let delta = record.delta.unwrap_or_default();

        if *elapsed < delta {
            record.delta = Some(delta - *elapsed);
            *elapsed = 0;
            return None;
        }

        *elapsed -= delta;
        self.queue.remove(&mut self.slots, front, true);

        let record = self.slots.get(front);
        let callback = record.callback.clone();
        if let (true, Some(period)) = (record.repeating, record.period) {
            self.queue.insert(&mut self.slots, front, period);
        }

        Some((TimerId::from_index(front), callback))
    }

    fn state(&self, id: TimerId) -> TimerState {
        match self.slots.allocated(id) {
            Err(_) => TimerState::Unregistered,
            Ok(record) if record.is_active() => TimerState::Active {
                repeating: record.repeating,
            },
            Ok(_) => TimerState::Inactive,
        }
    }

    fn remaining(&self, id: TimerId) -> Option<Ticks> {
        if !self.slots.allocated(id).ok()?.is_active() {
            return None;
        }
        self.queue
            .iter(&self.slots)
            .find(|(index, _)| *index == id.index())
            .map(|(_, remaining)| remaining)
    }
}

//==================================================================================Scheduler
/// Bounded timer scheduler holding up to `N` timers.
///
/// * `M` – guard strategy used for every structural mutation.
/// * `C` – callback type stored per timer; defaults to the function-pointer [`Callback`].
/// * `N` – number of slots, fixed at compile time.
pub struct TimerScheduler<M: RawMutex, C: TimerCallback = Callback, const N: usize = DEFAULT_MAX_TIMERS>
{
    state: Mutex<M, RefCell<SchedulerState<C, N>>>,
    enabled: AtomicBool,
    registered: AtomicUsize,
}

impl<M: RawMutex, C: TimerCallback, const N: usize> Default for TimerScheduler<M, C, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, C: TimerCallback, const N: usize> TimerScheduler<M, C, N> {
    /// Empty, enabled scheduler.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(SchedulerState::new())),
            enabled: AtomicBool::new(true),
            registered: AtomicUsize::new(0),
        }
    }

    /// Run `f` on the guarded state and publish the registration count.
    fn with_state<R>(&self, f: impl FnOnce(&mut SchedulerState<C, N>) -> R) -> R {
        self.state.lock(|cell| {
            let mut state = cell.borrow_mut();
            let result = f(&mut state);
            self.registered.store(state.slots.len(), Ordering::Relaxed);
            result
        })
    }

    fn read_state<R>(&self, f: impl FnOnce(&SchedulerState<C, N>) -> R) -> R {
        self.state.lock(|cell| f(&cell.borrow()))
    }

    //==================================================================================Registration
    /// Register a timer in the first free slot. The timer starts inactive.
    ///
    /// `period` is the interval between firings for a repeating timer, or the
    /// delay of a one-shot timer. `None` leaves it unconfigured; `start` then
    /// fails until [`set_period`](Self::set_period) provides one.
    pub fn register_timer(
        &self,
        callback: C,
        period: Option<Ticks>,
        repeating: bool,
    ) -> Result<TimerId, TimerError> {
        let result = self.with_state(|state| state.slots.register(callback, period, repeating));

        #[cfg(feature = "defmt")]
        match &result {
            Ok(id) => defmt::debug!(
                "Timer {} registered (period {}, repeating {})",
                id,
                period,
                repeating
            ),
            Err(err) => defmt::warn!("Timer registration refused: {}", err),
        }

        result
    }

    /// Cancel the timer if needed, then free its slot.
    pub fn unregister_timer(&self, id: TimerId) -> Result<(), TimerError> {
        self.with_state(|state| state.unregister(id))?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Timer {} unregistered", id);

        Ok(())
    }

    //==================================================================================Arming
    /// Arm the timer to fire after its period. Restarts it if already active.
    pub fn start(&self, id: TimerId) -> Result<(), TimerError> {
        self.arm(id, false)
    }

    /// Arm the timer to fire on the next [`tick`](Self::tick), even `tick(0)`.
    /// A repeating timer then continues at its normal period.
    pub fn start_immediate(&self, id: TimerId) -> Result<(), TimerError> {
        self.arm(id, true)
    }

    fn arm(&self, id: TimerId, immediate: bool) -> Result<(), TimerError> {
        let result = self.with_state(|state| state.arm(id, immediate));

        #[cfg(feature = "defmt")]
        if let Err(err) = &result {
            defmt::warn!("Timer start refused: {}", err);
        }

        result
    }

    /// Cancel the timer. Succeeds on an already inactive timer.
    pub fn stop(&self, id: TimerId) -> Result<(), TimerError> {
        self.with_state(|state| state.stop(id))
    }

    /// Stop the timer and change its period. Call [`start`](Self::start) to re-arm it.
    pub fn set_period(&self, id: TimerId, period: Ticks) -> Result<(), TimerError> {
        self.with_state(|state| {
            state.stop(id)?;
            state.slots.allocated_mut(id)?.period = Some(period);
            Ok(())
        })
    }

    /// Stop the timer and switch between one-shot and repeating.
    /// Call [`start`](Self::start) to re-arm it.
    pub fn set_mode(&self, id: TimerId, repeating: bool) -> Result<(), TimerError> {
        self.with_state(|state| {
            state.stop(id)?;
            state.slots.allocated_mut(id)?.repeating = repeating;
            Ok(())
        })
    }

    //==================================================================================Global control
    /// Coarse on/off switch. While disabled, `tick` is a no-op and time does not advance.
    pub fn enable(&self, state: bool) {
        self.enabled.store(state, Ordering::Relaxed);
    }

    /// Whether `tick` currently advances time.
    pub fn is_running(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Cancel and unregister every timer.
    pub fn clear(&self) {
        self.with_state(SchedulerState::clear);

        #[cfg(feature = "defmt")]
        defmt::debug!("All timers cleared");
    }

    //==================================================================================Clock
    /// Advance the clock by `elapsed` ticks and fire every timer that falls due,
    /// earliest first.
    ///
    /// Callbacks run synchronously in the caller's context, outside the guard:
    /// a callback may stop, restart or unregister timers of this scheduler,
    /// its own included. Must not be called concurrently with itself.
    ///
    /// Returns `false` only when the scheduler is disabled.
    pub fn tick(&self, elapsed: Ticks) -> bool {
        if !self.is_running() {
            return false;
        }

        let mut elapsed = elapsed;
        while let Some((_id, callback)) = self.with_state(|state| state.expire_front(&mut elapsed)) {
            #[cfg(feature = "defmt")]
            defmt::trace!("Timer {} expired", _id);

            if callback.is_valid() {
                callback.call();
            }
        }

        true
    }

    //==================================================================================Queries
    /// Number of registered timers. Lock-free, best-effort snapshot.
    pub fn registered_count(&self) -> usize {
        self.registered.load(Ordering::Relaxed)
    }

    /// Number of timers currently armed.
    pub fn active_count(&self) -> usize {
        self.read_state(|state| state.queue.iter(&state.slots).count())
    }

    /// Whether no timer is armed, e.g. to decide if the clock source may be
    /// suspended.
    pub fn is_idle(&self) -> bool {
        self.read_state(|state| state.queue.is_empty())
    }

    /// Number of slots.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Lifecycle state of `id`. Invalid handles report `Unregistered`.
    pub fn state(&self, id: TimerId) -> TimerState {
        self.read_state(|state| state.state(id))
    }

    /// Configured period of a registered timer.
    pub fn period(&self, id: TimerId) -> Option<Ticks> {
        self.read_state(|state| state.slots.allocated(id).ok()?.period)
    }

    /// Ticks left before an active timer fires.
    pub fn remaining(&self, id: TimerId) -> Option<Ticks> {
        self.read_state(|state| state.remaining(id))
    }

    /// Next timer to fire and the ticks left before it does.
    pub fn next_expiry(&self) -> Option<(TimerId, Ticks)> {
        self.read_state(|state| {
            let front = state.queue.front()?;
            let delta = state.slots.get(front).delta?;
            Some((TimerId::from_index(front), delta))
        })
    }
}
