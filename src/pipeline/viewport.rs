//! Viewport state signals and host entry points.
//!
//! These are the root signals of the engine. A host binding (browser glue,
//! test harness) feeds raw platform events in through three calls:
//!
//! - [`resize`] - viewport size changed
//! - [`scroll_to`] - document scroll position changed
//! - [`tick`] - an animation frame is due
//!
//! Each one updates the signals first, then dispatches to registered
//! listeners, so every listener observes the new state.

use std::cell::RefCell;

use spark_signals::signal;

use crate::engine::{clock, listeners};
use crate::types::{Rect, ViewportSize};

// =============================================================================
// Viewport Signals
// =============================================================================

thread_local! {
    static VIEWPORT_WIDTH: RefCell<spark_signals::Signal<f32>> = RefCell::new(signal(1280.0));
    static VIEWPORT_HEIGHT: RefCell<spark_signals::Signal<f32>> = RefCell::new(signal(800.0));
    static SCROLL_Y: RefCell<spark_signals::Signal<f32>> = RefCell::new(signal(0.0));
    static OBSERVATION_SUPPORTED: RefCell<spark_signals::Signal<bool>> = RefCell::new(signal(true));
}

/// Current viewport width.
pub fn viewport_width() -> f32 {
    VIEWPORT_WIDTH.with(|w| w.borrow().get())
}

/// Current viewport height.
pub fn viewport_height() -> f32 {
    VIEWPORT_HEIGHT.with(|h| h.borrow().get())
}

pub fn viewport_size() -> ViewportSize {
    ViewportSize::new(viewport_width(), viewport_height())
}

/// Current document scroll position.
pub fn scroll_y() -> f32 {
    SCROLL_Y.with(|s| s.borrow().get())
}

/// The visible part of the document, in document coordinates.
pub fn viewport_rect() -> Rect {
    Rect::new(0.0, scroll_y(), viewport_width(), viewport_height())
}

/// Set the viewport size without notifying listeners.
pub fn set_viewport_size(width: f32, height: f32) {
    VIEWPORT_WIDTH.with(|w| w.borrow().set(width));
    VIEWPORT_HEIGHT.with(|h| h.borrow().set(height));
}

/// Set the scroll position without notifying listeners.
pub fn set_scroll_y(y: f32) {
    SCROLL_Y.with(|s| s.borrow().set(y));
}

// =============================================================================
// Observation Support
// =============================================================================

/// Whether the host can evaluate element visibility.
pub fn observation_supported() -> bool {
    OBSERVATION_SUPPORTED.with(|o| o.borrow().get())
}

/// Declare whether the host can evaluate element visibility.
///
/// When unsupported, observers fail open and fire on the next tick.
pub fn set_observation_support(supported: bool) {
    OBSERVATION_SUPPORTED.with(|o| o.borrow().set(supported));
}

// =============================================================================
// Host Entry Points
// =============================================================================

/// Viewport resized. Updates signals, then notifies resize listeners.
pub fn resize(width: f32, height: f32) {
    set_viewport_size(width, height);
    tracing::trace!(width, height, "viewport resize");
    listeners::dispatch_resize(ViewportSize::new(width, height));
}

/// Document scrolled. Updates the signal, then notifies scroll listeners.
pub fn scroll_to(y: f32) {
    set_scroll_y(y);
    listeners::dispatch_scroll(y);
}

/// Animation frame due at `now` (seconds). Advances the clock, then notifies
/// frame listeners.
pub fn tick(now: f64) {
    let now = clock::advance(now);
    listeners::dispatch_frame(now);
}

/// Reset viewport state to defaults (for testing).
pub fn reset_viewport() {
    set_viewport_size(1280.0, 800.0);
    set_scroll_y(0.0);
    set_observation_support(true);
}

// =============================================================================
// Tests
// =============================================================================
