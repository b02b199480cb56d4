//! `korri-timers` library: a fixed-capacity software timer scheduler for
//! `no_std` targets. Timers live in a bounded slot store and the active ones
//! are kept in a relative delta-queue, so a clock source only ever looks at
//! the head to know whether something is due.
#![cfg_attr(not(test), no_std)]
//==================================================================================
/// Tick counts, timer handles, and lifecycle states.
pub mod core;
/// Recoverable scheduler errors (capacity, invalid handles, misconfiguration).
pub mod error;
/// Slot store, delta-queue, and the guarded scheduler front-end.
pub mod scheduler;
/// Callback capability consumed by the scheduler.
pub mod traits;
//==================================================================================
pub use crate::core::{Ticks, TimerId, TimerState, DEFAULT_MAX_TIMERS};
pub use crate::error::TimerError;
pub use crate::scheduler::TimerScheduler;
pub use crate::traits::timer_callback::{Callback, TimerCallback};
