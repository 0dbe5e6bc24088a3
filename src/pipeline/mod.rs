//! Reactive Pipeline
//!
//! Connects host events to the motion state machines and publishes their
//! output as signals.
//!
//! # Pipeline Architecture
//!
//! ```text
//! host events → viewport signals + listener dispatch → sessions → frame signal → deriveds → presenter effect
//! ```
//!
//! ## Data Flow
//!
//! 1. **viewport** - Root signals (size, scroll) and the host entry points
//! 2. **mount** - Sessions feed controller output into the frame signal
//! 3. **narrative_derived** - Node states, active step and bar fill as deriveds
//! 4. **presenter effect** - Installed through `NarrativeHandle::present`
//!
//! ## Key Design Principles
//!
//! - **Pure Deriveds**: everything drawn is a function of the published frame
//! - **Side Effects at the Edges**: only the host writes scroll; only the
//!   presenter draws

pub mod mount;
pub mod narrative_derived;
pub mod viewport;

// Re-exports
pub use mount::{mount_narrative, mount_reveal, NarrativeHandle, RevealHandle};
pub use narrative_derived::{create_active_step_derived, create_bar_fraction_derived, create_node_states_derived};
pub use viewport::{resize, scroll_to, scroll_y, set_observation_support, tick, viewport_height, viewport_width};
