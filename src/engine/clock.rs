//! Frame Clock - Per-thread animation time
//!
//! The host drives time: each animation frame it calls
//! `pipeline::viewport::tick(now)`, which advances this clock before frame
//! listeners run. Components that act outside a frame (an observer firing on
//! a scroll event, a mode switch) read `now()` to timestamp what they start.
//!
//! Time never runs backwards: a tick earlier than the last one is ignored.

use std::cell::Cell;

thread_local! {
    static NOW: Cell<f64> = const { Cell::new(0.0) };
    static FRAME_COUNT: Cell<u64> = const { Cell::new(0) };
}

/// Current animation time in seconds.
pub fn now() -> f64 {
    NOW.with(|n| n.get())
}

/// Number of frames delivered so far.
pub fn frame_count() -> u64 {
    FRAME_COUNT.with(|c| c.get())
}

/// Advance the clock to `time`. Returns the effective frame time.
pub fn advance(time: f64) -> f64 {
    let effective = NOW.with(|n| {
        let current = n.get();
        let next = if time.is_finite() && time > current { time } else { current };
        n.set(next);
        next
    });
    FRAME_COUNT.with(|c| c.set(c.get() + 1));
    effective
}

/// Reset the clock (for testing).
pub fn reset_clock() {
    NOW.with(|n| n.set(0.0));
    FRAME_COUNT.with(|c| c.set(0));
}
