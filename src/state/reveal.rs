//! Reveal Scheduler - One-shot staggered entrance of sibling elements
//!
//! A [`RevealGroup`] holds a container's direct children. They start Hidden
//! (transparent, pushed down by `distance`). When scheduled, each item fades
//! and slides into place, item `i` starting `i × stagger` after the first.
//! Items overlap in time; nothing waits for the previous item to finish.
//!
//! A group goes Hidden → Revealing → Revealed exactly once. Scheduling an
//! already scheduled group does nothing.
//!
//! The group is plain state advanced by `advance(now)`. The frame-driven
//! binding lives in `pipeline::mount::mount_reveal`.

use crate::config::RevealConfig;
use crate::easing::Ease;
use crate::types::{ElementHandle, VisualState};

// =============================================================================
// OPTIONS
// =============================================================================

/// Choreography knobs. Times in seconds, distance in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    pub stagger: f64,
    pub distance: f32,
    pub duration: f64,
    pub ease: Ease,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self::from(&RevealConfig::default())
    }
}

impl From<&RevealConfig> for RevealOptions {
    fn from(config: &RevealConfig) -> Self {
        Self {
            stagger: config.stagger,
            distance: config.distance,
            duration: config.duration,
            ease: config.ease,
        }
    }
}

// =============================================================================
// ITEM VISUAL
// =============================================================================

/// What the presentation layer should draw for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemVisual {
    pub state: VisualState,
    pub opacity: f32,
    /// Vertical offset in pixels. `None` once the transform is cleared.
    pub translate_y: Option<f32>,
    /// Fully transparent items are also made non-visible (no hit testing).
    pub visible: bool,
}

impl ItemVisual {
    pub fn hidden(distance: f32) -> Self {
        Self {
            state: VisualState::Hidden,
            opacity: 0.0,
            translate_y: Some(distance),
            visible: false,
        }
    }

    pub fn revealed() -> Self {
        Self {
            state: VisualState::Revealed,
            opacity: 1.0,
            translate_y: None,
            visible: true,
        }
    }

    fn in_flight(eased: f32, distance: f32) -> Self {
        Self {
            state: VisualState::Revealing,
            opacity: eased,
            translate_y: Some(distance * (1.0 - eased)),
            visible: eased > 0.0,
        }
    }
}

// =============================================================================
// GROUP
// =============================================================================

/// A container's children and their reveal progress.
#[derive(Debug, Clone)]
pub struct RevealGroup {
    container: ElementHandle,
    items: Vec<ElementHandle>,
    visuals: Vec<ItemVisual>,
    options: RevealOptions,
    started_at: Option<f64>,
    state: VisualState,
}

impl RevealGroup {
    /// Create a group with every item Hidden.
    pub fn new(container: ElementHandle, items: Vec<ElementHandle>, options: RevealOptions) -> Self {
        let visuals = vec![ItemVisual::hidden(options.distance); items.len()];
        Self {
            container,
            items,
            visuals,
            options,
            started_at: None,
            state: VisualState::Hidden,
        }
    }

    pub fn container(&self) -> ElementHandle {
        self.container
    }

    pub fn items(&self) -> &[ElementHandle] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    /// Group state: Hidden until scheduled, Revealed once every item is.
    pub fn state(&self) -> VisualState {
        self.state
    }

    pub fn visual(&self, index: usize) -> Option<ItemVisual> {
        self.visuals.get(index).copied()
    }

    pub fn visuals(&self) -> &[ItemVisual] {
        &self.visuals
    }

    /// Start time of item `index`, once scheduled.
    pub fn item_start(&self, index: usize) -> Option<f64> {
        if index >= self.items.len() {
            return None;
        }
        self.started_at
            .map(|start| start + index as f64 * self.options.stagger)
    }

    /// Start the choreography at `now`.
    ///
    /// Returns `false` (and changes nothing) if the group was already
    /// scheduled.
    pub fn schedule(&mut self, now: f64) -> bool {
        if self.state != VisualState::Hidden {
            tracing::trace!(container = self.container.0, "reveal already scheduled");
            return false;
        }

        self.started_at = Some(now);
        if self.items.is_empty() {
            self.state = VisualState::Revealed;
        } else {
            self.state = VisualState::Revealing;
        }
        tracing::debug!(
            container = self.container.0,
            items = self.items.len(),
            stagger = self.options.stagger,
            "reveal scheduled"
        );
        true
    }

    /// Advance every item to time `now`. Returns the group state.
    pub fn advance(&mut self, now: f64) -> VisualState {
        if self.state != VisualState::Revealing {
            return self.state;
        }
        let Some(started_at) = self.started_at else {
            return self.state;
        };

        let options = self.options;
        let mut all_done = true;

        for (index, visual) in self.visuals.iter_mut().enumerate() {
            if visual.state == VisualState::Revealed {
                continue;
            }

            let start = started_at + index as f64 * options.stagger;
            let elapsed = now - start;
            if elapsed < 0.0 {
                all_done = false;
                continue;
            }

            let t = if options.duration <= 0.0 { 1.0 } else { elapsed / options.duration };
            if t >= 1.0 {
                *visual = ItemVisual::revealed();
            } else {
                *visual = ItemVisual::in_flight(options.ease.apply(t as f32), options.distance);
                all_done = false;
            }
        }

        if all_done {
            self.state = VisualState::Revealed;
            tracing::debug!(container = self.container.0, "reveal complete");
        }
        self.state
    }
}

// =============================================================================
// TESTS
// =============================================================================
