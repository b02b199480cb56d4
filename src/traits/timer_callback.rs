//! Zero-argument callback capability invoked when a timer expires.

/// Callback stored in a timer slot.
///
/// Implementations must be cheap to clone: the scheduler clones the callback
/// while holding its guard and invokes the copy once the guard is released.
/// `Default` must produce an empty (invalid) callback; it is what a free slot
/// holds.
pub trait TimerCallback: Clone + Default {
    /// Whether calling this callback does anything.
    fn is_valid(&self) -> bool;

    /// Run the callback. Expected to be short: it executes in the context
    /// that drives `tick` (often an interrupt handler).
    fn call(&self);
}

/// Plain function-pointer callback, usable from `static` contexts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Callback(Option<fn()>);

impl Callback {
    /// Wrap a function pointer.
    pub const fn new(func: fn()) -> Self {
        Self(Some(func))
    }

    /// Callback that does nothing when the timer fires.
    pub const fn empty() -> Self {
        Self(None)
    }
}

impl From<fn()> for Callback {
    fn from(func: fn()) -> Self {
        Self::new(func)
    }
}

impl TimerCallback for Callback {
    #[inline]
    fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    #[inline]
    fn call(&self) {
        if let Some(func) = self.0 {
            func();
        }
    }
}
