//! # spark-motion
//!
//! Viewport-driven animation engine for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! spark-motion turns three host inputs (viewport size, scroll position,
//! animation frames) into two kinds of motion:
//!
//! - **Scroll reveals** - a container's children fade and rise into place,
//!   staggered, the first time the container enters the viewport.
//! - **Process narrative** - a section pinned while the page scrolls through
//!   it; scroll progress drives a horizontal slider of steps, a progress bar
//!   and a timeline of nodes, snapping to the nearest step when input pauses.
//!   Narrow viewports get a static stacked list instead.
//!
//! The state machines are plain structs advanced by explicit inputs; the
//! pipeline binds them to listeners and publishes their output as signals:
//! ```text
//! host events → listeners → NarrativeController / RevealGroup → frame signal → deriveds → presenter effect
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Geometry, modes, phases, step descriptors, host traits
//! - [`config`] - TOML-backed configuration with validation
//! - [`easing`] - Easing curves
//! - [`engine`] - Listener registry and frame clock
//! - [`state`] - Observer, reveal, scroll progress, narrative, responsive
//! - [`pipeline`] - Viewport signals, mount API, deriveds

pub mod config;
pub mod easing;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{MotionConfig, NarrativeConfig, ResponsiveConfig, RevealConfig, SnapConfig};
pub use easing::Ease;
pub use error::{MotionError, Result};

pub use engine::{
    dispatch_frame, dispatch_resize, dispatch_scroll, listener_count, on_frame, on_resize, on_scroll,
    reset_clock, reset_listeners, total_listener_count, Cleanup,
};

pub use pipeline::{
    create_active_step_derived, create_bar_fraction_derived, create_node_states_derived,
    mount_narrative, mount_reveal, resize, scroll_to, set_observation_support, tick,
    NarrativeHandle, RevealHandle,
};

pub use state::{
    // Observer
    observe, visible_fraction, ObserveOptions, ViewportObserver,
    // Reveal
    ItemVisual, RevealGroup, RevealOptions,
    // Scroll progress
    ScrollGeometry, ScrollProgressSource,
    // Narrative
    active_step_for, derive_frame, NarrativeController, NarrativeFrame, SliderSession,
    // Responsive
    select_mode, ModeTransition, ResponsiveModeSelector,
};
