/// Test doubles shared by the integration tests.
use korri_timers::TimerCallback;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Callback counting its invocations; `Send` so it can cross task boundaries.
pub struct CountingCallback(Option<Arc<AtomicUsize>>);

impl TimerCallback for CountingCallback {
    fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    fn call(&self) {
        if let Some(count) = &self.0 {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[allow(dead_code)]
/// Build a counting callback together with the counter it bumps.
pub fn counter() -> (Arc<AtomicUsize>, CountingCallback) {
    let count = Arc::new(AtomicUsize::new(0));
    (count.clone(), CountingCallback(Some(count)))
}
