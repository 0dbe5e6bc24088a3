//! Narrative Controller - Pinned slider state machine
//!
//! Maps scroll progress through the pinned region onto a horizontal track of
//! `step_count` full-width panels.
//!
//! # States
//!
//! ```text
//!   Before ──(scroll reaches section top)──▶ Scrubbing ──(past end)──▶ After
//!     ▲                                         │  ▲                      │
//!     └───────────────(scroll back up)──────────┘  └──────────────────────┘
//! ```
//!
//! Before/After release the pin and freeze progress at 0/1. Crossing back in
//! resumes from exactly that value, so there is no jump at either boundary.
//!
//! # Derived reads
//!
//! Everything the presentation layer draws is a pure function of
//! `(phase, progress, step_count, viewport_width)`, see [`derive_frame`]:
//!
//! - `active_step = round(progress × (N-1))`, clamped to `[0, N-1]`
//! - `offset_x = -progress × (N-1) × viewport_width`
//! - `bar_fraction = active_step / (N-1)`
//! - `node_state(i)` = Past / Current / Future
//!
//! # Snapping
//!
//! When scroll input pauses for `snap.idle` seconds while scrubbing, progress
//! eases to the nearest step boundary. The target is the boundary of the
//! current active step, so a snap never changes the active step. While a
//! snap runs, `on_frame` returns the matching scroll position for the host to
//! apply; scroll events echoing that position do not interrupt the snap.

use crate::config::{NarrativeConfig, SnapConfig};
use crate::easing::Ease;
use crate::error::MotionError;
use crate::state::scroll_progress::{ScrollGeometry, ScrollProgressSource};
use crate::types::{NodeState, Rect, ScrubPhase, ViewportSize};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Scroll events within this many pixels of a programmatic write are echoes.
pub const SCROLL_ECHO_EPSILON: f32 = 1.0;

/// Progress distance below which a position counts as on a step boundary.
const SNAP_EPSILON: f32 = 1e-4;

/// Track smoothing settles onto progress below this distance.
const TRACK_EPSILON: f32 = 1e-4;

// =============================================================================
// PURE DERIVATIONS
// =============================================================================

fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) }
}

/// Active step for a progress value.
pub fn active_step_for(progress: f32, step_count: usize) -> usize {
    if step_count <= 1 {
        return 0;
    }
    let last = step_count - 1;
    let step = (clamp_progress(progress) * last as f32).round();
    (step.max(0.0) as usize).min(last)
}

/// Horizontal track offset in pixels (zero or negative).
pub fn offset_for(progress: f32, step_count: usize, viewport_width: f32) -> f32 {
    if step_count <= 1 {
        return 0.0;
    }
    -clamp_progress(progress) * (step_count - 1) as f32 * viewport_width
}

/// Progress bar fill for an active step.
pub fn bar_fraction_for(active_step: usize, step_count: usize) -> f32 {
    if step_count <= 1 {
        return 0.0;
    }
    (active_step.min(step_count - 1) as f32) / (step_count - 1) as f32
}

/// Nearest multiple of `1 / (N-1)`: the boundary of the active step.
pub fn nearest_snap_point(progress: f32, step_count: usize) -> f32 {
    if step_count <= 1 {
        return 0.0;
    }
    active_step_for(progress, step_count) as f32 / (step_count - 1) as f32
}

/// States of every timeline node.
pub fn node_states(active_step: usize, step_count: usize) -> Vec<NodeState> {
    (0..step_count)
        .map(|index| NodeState::of(index, active_step))
        .collect()
}

/// Snap duration: short hops take `min`, a half-step hop takes `max`.
pub fn snap_duration(from: f32, to: f32, step_count: usize, snap: &SnapConfig) -> f64 {
    if step_count <= 1 {
        return snap.min;
    }
    let steps = (to - from).abs() * (step_count - 1) as f32;
    let ratio = (steps / 0.5).clamp(0.0, 1.0) as f64;
    snap.min + (snap.max - snap.min) * ratio
}

/// Everything the presentation layer needs for one update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NarrativeFrame {
    pub phase: ScrubPhase,
    pub progress: f32,
    /// Progress the track is drawn at (trails `progress` under scrub lag)
    pub track_progress: f32,
    pub active_step: usize,
    pub offset_x: f32,
    pub bar_fraction: f32,
    pub pinned: bool,
    pub step_count: usize,
}

impl NarrativeFrame {
    /// The single static state shown when there is nothing to scrub.
    pub fn static_state(step_count: usize) -> Self {
        derive_frame(ScrubPhase::Before, 0.0, 0.0, step_count, 0.0)
    }

    pub fn node_state(&self, index: usize) -> NodeState {
        NodeState::of(index, self.active_step)
    }

    pub fn node_states(&self) -> Vec<NodeState> {
        node_states(self.active_step, self.step_count)
    }

    /// Same frame with the pin released.
    pub fn unpinned(mut self) -> Self {
        self.pinned = false;
        self
    }
}

/// Build a frame from the controller inputs.
pub fn derive_frame(
    phase: ScrubPhase,
    progress: f32,
    track_progress: f32,
    step_count: usize,
    viewport_width: f32,
) -> NarrativeFrame {
    let progress = clamp_progress(progress);
    let active_step = active_step_for(progress, step_count);
    NarrativeFrame {
        phase,
        progress,
        track_progress: clamp_progress(track_progress),
        active_step,
        offset_x: offset_for(track_progress, step_count, viewport_width),
        bar_fraction: bar_fraction_for(active_step, step_count),
        pinned: phase == ScrubPhase::Scrubbing && step_count > 1,
        step_count,
    }
}

// =============================================================================
// SNAP TWEEN
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct SnapTween {
    from: f32,
    to: f32,
    started_at: f64,
    duration: f64,
    ease: Ease,
}

impl SnapTween {
    fn value_at(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = ((now - self.started_at) / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * self.ease.apply(t as f32)
    }

    fn is_done(&self, now: f64) -> bool {
        self.duration <= 0.0 || now - self.started_at >= self.duration
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Live state of one pinned narrative slider.
#[derive(Debug, Clone)]
pub struct NarrativeController {
    step_count: usize,
    config: NarrativeConfig,
    source: ScrollProgressSource,
    viewport: ViewportSize,
    phase: ScrubPhase,
    progress: f32,
    track_progress: f32,
    last_scroll_y: f32,
    last_input_at: f64,
    last_frame_at: Option<f64>,
    snap: Option<SnapTween>,
    expected_scroll: Option<f32>,
    scroll_writes: bool,
}

impl NarrativeController {
    pub fn new(step_count: usize, config: NarrativeConfig) -> Self {
        if step_count <= 1 {
            let err = MotionError::DegenerateInput { step_count };
            tracing::debug!(error = %err, "narrative is static");
        }
        Self {
            step_count,
            config,
            source: ScrollProgressSource::new(step_count, config.scroll_distance),
            viewport: ViewportSize::default(),
            phase: ScrubPhase::Before,
            progress: 0.0,
            track_progress: 0.0,
            last_scroll_y: 0.0,
            last_input_at: 0.0,
            last_frame_at: None,
            snap: None,
            expected_scroll: None,
            scroll_writes: true,
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_scrubbable(&self) -> bool {
        self.source.is_scrubbable()
    }

    pub fn phase(&self) -> ScrubPhase {
        self.phase
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn geometry(&self) -> Option<ScrollGeometry> {
        self.source.geometry()
    }

    pub fn is_snapping(&self) -> bool {
        self.snap.is_some()
    }

    /// Whether returned scroll positions are applied to the page.
    pub fn scroll_writes(&self) -> bool {
        self.scroll_writes
    }

    /// Without scroll writes the controller never snaps, and a mid-scrub
    /// resize re-bases the region on the live scroll position instead of
    /// requesting an anchor.
    pub fn set_scroll_writes(&mut self, enabled: bool) {
        self.scroll_writes = enabled;
        if !enabled {
            self.snap = None;
            self.expected_scroll = None;
        }
    }

    pub fn frame(&self) -> NarrativeFrame {
        derive_frame(
            self.phase,
            self.progress,
            self.track_progress,
            self.step_count,
            self.viewport.width,
        )
    }

    pub fn active_step(&self) -> usize {
        active_step_for(self.progress, self.step_count)
    }

    pub fn bar_fraction(&self) -> f32 {
        bar_fraction_for(self.active_step(), self.step_count)
    }

    pub fn node_state(&self, index: usize) -> NodeState {
        NodeState::of(index, self.active_step())
    }

    pub fn offset_x(&self) -> f32 {
        self.frame().offset_x
    }

    pub fn is_pinned(&self) -> bool {
        self.frame().pinned
    }

    // -------------------------------------------------------------------------
    // Inputs
    // -------------------------------------------------------------------------

    /// Measure geometry and place the controller at `scroll_y`.
    pub fn start(&mut self, section: Rect, viewport: ViewportSize, scroll_y: f32, now: f64) {
        self.viewport = viewport;
        self.source.measure(section, viewport);
        self.last_scroll_y = scroll_y;
        self.last_input_at = now;
        self.apply_scroll(scroll_y);
        self.track_progress = self.progress;
    }

    /// Page scrolled to `scroll_y`.
    pub fn on_scroll(&mut self, scroll_y: f32, now: f64) {
        if let Some(expected) = self.expected_scroll {
            if (scroll_y - expected).abs() <= SCROLL_ECHO_EPSILON {
                self.last_scroll_y = scroll_y;
                return;
            }
        }
        self.expected_scroll = None;

        if self.snap.take().is_some() {
            tracing::trace!("snap interrupted by scroll input");
        }

        self.last_scroll_y = scroll_y;
        self.last_input_at = now;
        self.apply_scroll(scroll_y);
    }

    /// Viewport resized. Geometry is recomputed before anything else reads it.
    ///
    /// While scrubbing, progress is held. With scroll writes the matching
    /// scroll position in the new geometry is returned for the host to apply.
    /// Without them the region is re-based on the current scroll position.
    pub fn on_resize(&mut self, section: Option<Rect>, viewport: ViewportSize, now: f64) -> Option<f32> {
        self.viewport = viewport;
        self.last_input_at = now;
        if self.snap.take().is_some() {
            tracing::trace!("snap cancelled by resize");
        }

        let Some(section) = section else {
            tracing::debug!(error = %MotionError::MissingTarget, "resize without section geometry");
            self.source.invalidate();
            self.apply_scroll(self.last_scroll_y);
            return None;
        };

        let was_scrubbing = self.phase == ScrubPhase::Scrubbing;
        let held = self.progress;

        match self.source.measure(section, viewport) {
            Some(_) if was_scrubbing && !self.scroll_writes => {
                let rebased = self.source.rebase(self.last_scroll_y, held);
                self.progress = held;
                self.sync_track();
                tracing::debug!(
                    progress = held,
                    section_start = rebased.map(|g| g.section_start),
                    "region re-based mid-scrub"
                );
                None
            }
            Some(geometry) if was_scrubbing => {
                let anchor = geometry.position_for(held);
                self.last_scroll_y = anchor;
                self.expected_scroll = Some(anchor);
                self.progress = held;
                self.sync_track();
                tracing::debug!(progress = held, anchor, "geometry recomputed mid-scrub");
                Some(anchor)
            }
            _ => {
                self.apply_scroll(self.last_scroll_y);
                None
            }
        }
    }

    /// Animation frame at `now`. Returns a scroll position to apply while a
    /// snap is running.
    pub fn on_frame(&mut self, now: f64) -> Option<f32> {
        let dt = self
            .last_frame_at
            .map(|previous| (now - previous).max(0.0))
            .unwrap_or(0.0);
        self.last_frame_at = Some(now);

        let mut request = None;

        if let Some(tween) = self.snap {
            self.progress = clamp_progress(tween.value_at(now));
            if tween.is_done(now) {
                self.progress = tween.to;
                self.snap = None;
                tracing::debug!(progress = self.progress, step = self.active_step(), "snap settled");
            }
            if let Some(geometry) = self.source.geometry() {
                let y = geometry.position_for(self.progress);
                self.expected_scroll = Some(y);
                self.last_scroll_y = y;
                request = Some(y);
            }
        } else if self.should_snap(now) {
            let target = nearest_snap_point(self.progress, self.step_count);
            if (target - self.progress).abs() > SNAP_EPSILON {
                let duration = snap_duration(self.progress, target, self.step_count, &self.config.snap);
                tracing::debug!(from = self.progress, to = target, duration, "snap started");
                self.snap = Some(SnapTween {
                    from: self.progress,
                    to: target,
                    started_at: now,
                    duration,
                    ease: self.config.snap.ease,
                });
            }
        }

        self.advance_track(dt);
        request
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn should_snap(&self, now: f64) -> bool {
        self.config.snap.enabled
            && self.scroll_writes
            && self.phase == ScrubPhase::Scrubbing
            && self.source.geometry().is_some()
            && now - self.last_input_at >= self.config.snap.idle
    }

    fn apply_scroll(&mut self, scroll_y: f32) {
        let Some(geometry) = self.source.geometry() else {
            self.set_phase(ScrubPhase::Before);
            self.progress = 0.0;
            self.sync_track();
            return;
        };

        let phase = if scroll_y < geometry.section_start {
            ScrubPhase::Before
        } else if scroll_y > geometry.end() {
            ScrubPhase::After
        } else {
            ScrubPhase::Scrubbing
        };
        self.set_phase(phase);
        self.progress = geometry.progress_at(scroll_y);
        self.sync_track();
    }

    fn set_phase(&mut self, phase: ScrubPhase) {
        if phase == self.phase {
            return;
        }
        match phase {
            ScrubPhase::Scrubbing => tracing::debug!(from = ?self.phase, "pin engaged"),
            _ => tracing::debug!(to = ?phase, "pin released"),
        }
        self.phase = phase;
    }

    fn sync_track(&mut self) {
        if self.config.scrub_lag <= 0.0 {
            self.track_progress = self.progress;
        }
    }

    fn advance_track(&mut self, dt: f64) {
        let lag = self.config.scrub_lag;
        if lag <= 0.0 {
            self.track_progress = self.progress;
            return;
        }
        let alpha = (1.0 - (-dt / lag).exp()) as f32;
        self.track_progress += (self.progress - self.track_progress) * alpha;
        if (self.progress - self.track_progress).abs() < TRACK_EPSILON {
            self.track_progress = self.progress;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
