//! Abstraction traits consumed by the scheduler.
pub mod timer_callback;
