//! Core types for spark-motion.
//!
//! Value types shared by the observer, reveal, and narrative systems, plus the
//! two host seams the engine talks through:
//!
//! - [`LayoutProbe`] - container geometry read from the host (the only
//!   rendered metric the engine ever reads back)
//! - [`ScrollHost`] - programmatic scroll writes (snap settle, resize anchor)

use bitflags::bitflags;

// =============================================================================
// Geometry
// =============================================================================

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Intersection with another rect, or `None` when they don't overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < x || bottom < y {
            return None;
        }

        Some(Rect::new(x, y, right - x, bottom - y))
    }

    /// Check if a point lies inside the rect (edges inclusive).
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }
}

// =============================================================================
// Modes & Phases
// =============================================================================

/// Presentation mode of the narrative section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Pinned horizontal slider, scrubbed by vertical scroll.
    Slider,
    /// Static stacked list of cards. No listeners besides resize.
    #[default]
    Stacked,
}

/// Position of the page scroll relative to the pinned region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrubPhase {
    /// Above the region. Progress frozen at 0.
    #[default]
    Before,
    /// Inside the region. Section pinned, scroll drives progress.
    Scrubbing,
    /// Past the region. Progress frozen at 1.
    After,
}

/// Timeline node state relative to the active step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Past,
    Current,
    Future,
}

impl NodeState {
    /// Classify node `index` against the active step.
    pub fn of(index: usize, active_step: usize) -> Self {
        if index < active_step {
            NodeState::Past
        } else if index == active_step {
            NodeState::Current
        } else {
            NodeState::Future
        }
    }

    /// Only the current node shows its title above the timeline.
    pub fn label_visible(&self) -> bool {
        *self == NodeState::Current
    }
}

/// Visual state of a reveal item (and of a whole group).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualState {
    #[default]
    Hidden,
    Revealing,
    Revealed,
}

// =============================================================================
// Descriptors
// =============================================================================

/// One narrative step. The payload is opaque to the engine; only the position
/// in the list and the list length matter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepDescriptor {
    /// Display label ("01", "02", ...)
    pub number: String,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl StepDescriptor {
    pub fn new(number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Opaque handle to a rendered element owned by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub usize);

// =============================================================================
// Listener kinds
// =============================================================================

bitflags! {
    /// Kinds of host event listeners an engine component can hold.
    ///
    /// Combine with bitwise OR: `ListenerKind::SCROLL | ListenerKind::RESIZE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ListenerKind: u8 {
        const SCROLL = 1 << 0;
        const RESIZE = 1 << 1;
        const FRAME = 1 << 2;
    }
}

// =============================================================================
// Host seams
// =============================================================================

/// Reads a container's bounding geometry from the host.
///
/// Returns `None` when the container is not attached (unmounted before the
/// engine got to it). The engine treats that as a silent no-op.
pub trait LayoutProbe {
    fn document_rect(&self) -> Option<Rect>;
}

/// Receives programmatic scroll writes.
pub trait ScrollHost {
    fn scroll_to(&self, y: f32);
}

/// Fixed geometry, handy for hosts that already know the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticProbe(pub Option<Rect>);

impl LayoutProbe for StaticProbe {
    fn document_rect(&self) -> Option<Rect> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        let i = a.intersect(&b).unwrap();
        assert_eq!(i, Rect::new(50.0, 50.0, 50.0, 50.0));
        assert_eq!(i.area(), 2500.0);

        let far = Rect::new(500.0, 500.0, 10.0, 10.0);
        assert!(a.intersect(&far).is_none());
    }

    #[test]
    fn test_rect_touching_edges_is_empty_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let i = a.intersect(&b).unwrap();
        assert_eq!(i.area(), 0.0);
    }

    #[test]
    fn test_node_state_of() {
        assert_eq!(NodeState::of(0, 2), NodeState::Past);
        assert_eq!(NodeState::of(2, 2), NodeState::Current);
        assert_eq!(NodeState::of(3, 2), NodeState::Future);
        assert!(NodeState::Current.label_visible());
        assert!(!NodeState::Past.label_visible());
    }

    #[test]
    fn test_step_descriptor_builder() {
        let step = StepDescriptor::new("01", "Discovery")
            .with_body("We listen.")
            .with_tags(["Audit", "Roadmap"]);
        assert_eq!(step.number, "01");
        assert_eq!(step.tags, vec!["Audit".to_string(), "Roadmap".to_string()]);
    }

    #[test]
    fn test_listener_kind_flags() {
        let mask = ListenerKind::SCROLL | ListenerKind::FRAME;
        assert!(mask.contains(ListenerKind::SCROLL));
        assert!(!mask.contains(ListenerKind::RESIZE));
        assert!(ListenerKind::default().is_empty());
    }
}
