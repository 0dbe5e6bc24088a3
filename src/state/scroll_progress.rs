//! Scroll Progress Source - Scroll displacement to normalized progress
//!
//! The pinned region starts when the section's top reaches the viewport top
//! and lasts `scroll_distance` pixels of vertical scroll:
//!
//! ```text
//! progress = clamp((scroll_y - section_start) / scroll_distance, 0, 1)
//! scroll_distance = viewport_height × distance_multiplier
//! ```
//!
//! Geometry depends on layout, so it is recomputed on every resize rather
//! than cached across one. A single-step narrative has nothing to travel:
//! no geometry is ever produced and progress stays at 0.

use crate::types::{Rect, ViewportSize};

/// Pinned region in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollGeometry {
    pub section_start: f32,
    pub scroll_distance: f32,
}

impl ScrollGeometry {
    /// Scroll position where the pin releases.
    pub fn end(&self) -> f32 {
        self.section_start + self.scroll_distance
    }

    /// Progress at a scroll position, clamped to [0, 1].
    pub fn progress_at(&self, scroll_y: f32) -> f32 {
        if self.scroll_distance <= 0.0 {
            return 0.0;
        }
        let raw = (scroll_y - self.section_start) / self.scroll_distance;
        if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) }
    }

    /// Scroll position that yields `progress`.
    pub fn position_for(&self, progress: f32) -> f32 {
        self.section_start + progress.clamp(0.0, 1.0) * self.scroll_distance
    }
}

/// Converts page scroll into progress through the pinned region.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollProgressSource {
    step_count: usize,
    distance_multiplier: f32,
    geometry: Option<ScrollGeometry>,
}

impl ScrollProgressSource {
    pub fn new(step_count: usize, distance_multiplier: f32) -> Self {
        Self {
            step_count,
            distance_multiplier,
            geometry: None,
        }
    }

    /// More than one step: there is something to scrub through.
    pub fn is_scrubbable(&self) -> bool {
        self.step_count > 1
    }

    pub fn geometry(&self) -> Option<ScrollGeometry> {
        self.geometry
    }

    /// Drop the cached geometry.
    pub fn invalidate(&mut self) {
        self.geometry = None;
    }

    /// Recompute geometry from the section's document rect and the viewport.
    pub fn measure(&mut self, section: Rect, viewport: ViewportSize) -> Option<ScrollGeometry> {
        self.invalidate();
        if !self.is_scrubbable() {
            return None;
        }

        let scroll_distance = viewport.height * self.distance_multiplier;
        if !(scroll_distance.is_finite() && scroll_distance > 0.0) {
            tracing::debug!(viewport_height = viewport.height, "no scroll distance, scrubbing disabled");
            return None;
        }

        self.geometry = Some(ScrollGeometry {
            section_start: section.y,
            scroll_distance,
        });
        self.geometry
    }

    /// Shift the region so `scroll_y` maps to `progress`, keeping the
    /// measured distance.
    pub fn rebase(&mut self, scroll_y: f32, progress: f32) -> Option<ScrollGeometry> {
        let geometry = self.geometry.as_mut()?;
        geometry.section_start = scroll_y - progress.clamp(0.0, 1.0) * geometry.scroll_distance;
        Some(*geometry)
    }

    /// Progress at a scroll position. 0 when there is no geometry.
    pub fn progress(&self, scroll_y: f32) -> f32 {
        self.geometry
            .map(|geometry| geometry.progress_at(scroll_y))
            .unwrap_or(0.0)
    }
}
