//! State Module - Motion state machines
//!
//! Each system here is plain state advanced by explicit inputs (a scroll
//! position, a viewport size, a frame timestamp):
//!
//! - **Observer** - Viewport intersection, one-shot activation
//! - **Reveal** - Staggered entrance choreography for a group of siblings
//! - **ScrollProgress** - Scroll displacement to progress through a pinned region
//! - **Narrative** - Pinned slider state machine, snapping, derived reads
//! - **Responsive** - Slider / stacked mode selection with debounce
//! - **Session** - Binds a narrative controller to the host listeners

pub mod narrative;
pub mod observer;
pub mod responsive;
pub mod reveal;
pub mod scroll_progress;
pub mod session;

pub use narrative::{
    active_step_for, bar_fraction_for, derive_frame, nearest_snap_point, node_states, offset_for,
    snap_duration, NarrativeController, NarrativeFrame, SCROLL_ECHO_EPSILON,
};
pub use observer::{
    observe, sample_visibility, visible_fraction, ActivationToken, ObserveOptions, ObserverCore,
    ViewportObserver, VisibilitySample,
};
pub use responsive::{select_mode, ModeTransition, ResponsiveModeSelector};
pub use reveal::{ItemVisual, RevealGroup, RevealOptions};
pub use scroll_progress::{ScrollGeometry, ScrollProgressSource};
pub use session::SliderSession;
