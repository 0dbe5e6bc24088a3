//! Motion Engine - Host event plumbing.
//!
//! - Listeners: scroll / resize / frame handler registry with cleanup functions
//! - Clock: per-thread frame time driven by the host
//!
//! Everything here is thread-local. The engine runs on one thread (the
//! browser main thread or whatever stands in for it) and nothing is `Send`.

pub mod clock;
pub mod listeners;

pub use clock::{frame_count, now, reset_clock};
pub use listeners::{
    dispatch_frame, dispatch_resize, dispatch_scroll, listener_count, on_frame, on_resize,
    on_scroll, reset_listeners, total_listener_count, Cleanup,
};
