//! Quickstart: a std thread plays the role of a 1 ms SysTick interrupt while
//! the main thread registers and controls timers.
//!
//! Run with `cargo run --example quickstart`.
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use korri_timers::{Callback, TimerScheduler};
use static_cell::StaticCell;

static TIMERS: StaticCell<TimerScheduler<CriticalSectionRawMutex>> = StaticCell::new();
static DONE: AtomicBool = AtomicBool::new(false);

fn blink() {
    println!("[blink] toggling LED");
}

fn watchdog() {
    println!("[watchdog] one-shot deadline reached, shutting down");
    DONE.store(true, Ordering::SeqCst);
}

fn main() {
    let timers: &'static TimerScheduler<CriticalSectionRawMutex> = TIMERS.init(TimerScheduler::new());

    let led = timers
        .register_timer(Callback::new(blink), Some(100), true)
        .expect("slot available");
    let dog = timers
        .register_timer(Callback::new(watchdog), Some(550), false)
        .expect("slot available");

    timers.start(led).expect("period configured");
    timers.start(dog).expect("period configured");

    // Clock source: one tick per millisecond.
    let clock = thread::spawn(move || {
        while !DONE.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(1));
            timers.tick(1);
        }
    });

    thread::sleep(Duration::from_millis(250));
    println!("[main] speeding the LED up");
    timers.set_period(led, 40).expect("led is registered");
    timers.start(led).expect("period configured");

    clock.join().expect("clock thread panicked");
    println!(
        "[main] {} timers registered, {} still armed",
        timers.registered_count(),
        timers.active_count()
    );
}
