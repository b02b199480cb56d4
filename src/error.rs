//! Error definitions shared across library modules.
//! Every variant describes a call that was refused before any shared state
//! was touched: a failed operation never leaves a half-updated queue behind.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Recoverable failures reported by the timer scheduler.
pub enum TimerError {
    /// Every slot of the fixed-size store already holds a registration.
    #[error("All {capacity} timer slots are in use")]
    CapacityExhausted { capacity: usize },

    /// The handle is out of range or points to a free slot.
    #[error("Timer {index} is out of range or not registered")]
    InvalidTimer { index: usize },

    /// The timer has no period, or a zero period combined with repeat mode.
    #[error("Timer {index} has no usable period")]
    PeriodNotConfigured { index: usize },
}
