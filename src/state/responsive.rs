//! Responsive Mode Selector - Slider or stacked, never both
//!
//! One breakpoint decides the presentation: at or above it the section is a
//! pinned slider, below it a static stacked list.
//!
//! Resize events only mark the decision dirty; the mode is re-evaluated once
//! resizing has settled for `debounce` seconds. A transition is reported only
//! when the mode actually changes, so repeated resizes inside the same mode
//! are free.

use crate::config::ResponsiveConfig;
use crate::types::Mode;

/// Mode for a viewport width.
pub fn select_mode(width: f32, breakpoint: f32) -> Mode {
    if width >= breakpoint {
        Mode::Slider
    } else {
        Mode::Stacked
    }
}

/// A change of mode. `from` is `None` for the initial evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: Option<Mode>,
    pub to: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingResize {
    width: f32,
    since: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponsiveModeSelector {
    breakpoint: f32,
    debounce: f64,
    current: Option<Mode>,
    pending: Option<PendingResize>,
}

impl ResponsiveModeSelector {
    pub fn new(config: &ResponsiveConfig) -> Self {
        Self {
            breakpoint: config.breakpoint,
            debounce: config.debounce,
            current: None,
            pending: None,
        }
    }

    pub fn breakpoint(&self) -> f32 {
        self.breakpoint
    }

    pub fn current(&self) -> Option<Mode> {
        self.current
    }

    /// A resize is waiting for the debounce window.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Evaluate immediately. Returns a transition if the mode changed.
    pub fn evaluate(&mut self, width: f32) -> Option<ModeTransition> {
        self.pending = None;
        let to = select_mode(width, self.breakpoint);
        if self.current == Some(to) {
            return None;
        }
        let transition = ModeTransition { from: self.current, to };
        self.current = Some(to);
        tracing::debug!(from = ?transition.from, to = ?transition.to, width, "mode transition");
        Some(transition)
    }

    /// Record a resize. Restarts the debounce window.
    pub fn on_resize(&mut self, width: f32, now: f64) {
        self.pending = Some(PendingResize { width, since: now });
    }

    /// Re-evaluate once the debounce window has elapsed.
    pub fn on_frame(&mut self, now: f64) -> Option<ModeTransition> {
        let pending = self.pending?;
        if now - pending.since < self.debounce {
            return None;
        }
        self.evaluate(pending.width)
    }
}
