//! Narrative Derived - Reactive reads over the published frame.
//!
//! The slider session publishes one `NarrativeFrame` per update. These
//! deriveds let the presentation layer depend on just the piece it draws
//! (the node row, the bar, the counter) instead of the whole frame.

use spark_signals::{derived, Derived, Signal};

use crate::state::NarrativeFrame;
use crate::types::NodeState;

/// Past / Current / Future for every timeline node.
pub fn create_node_states_derived(frame: Signal<NarrativeFrame>) -> Derived<Vec<NodeState>> {
    derived(move || frame.get().node_states())
}

/// Zero-based active step.
pub fn create_active_step_derived(frame: Signal<NarrativeFrame>) -> Derived<usize> {
    derived(move || frame.get().active_step)
}

/// Progress bar fill in [0, 1].
pub fn create_bar_fraction_derived(frame: Signal<NarrativeFrame>) -> Derived<f32> {
    derived(move || frame.get().bar_fraction)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScrubPhase;
    use spark_signals::signal;

    #[test]
    fn test_node_states_follow_frame() {
        use NodeState::*;

        let frame = signal(NarrativeFrame::static_state(4));
        let nodes: Derived<Vec<NodeState>> = create_node_states_derived(frame.clone());
        assert_eq!(nodes.get(), vec![Current, Future, Future, Future]);

        frame.set(crate::state::derive_frame(ScrubPhase::Scrubbing, 0.5, 0.5, 4, 1024.0));
        assert_eq!(nodes.get(), vec![Past, Past, Current, Future]);
    }

    #[test]
    fn test_step_and_bar() {
        let frame = signal(NarrativeFrame::static_state(5));
        let step: Derived<usize> = create_active_step_derived(frame.clone());
        let bar: Derived<f32> = create_bar_fraction_derived(frame.clone());
        assert_eq!(step.get(), 0);
        assert_eq!(bar.get(), 0.0);

        frame.set(crate::state::derive_frame(ScrubPhase::After, 1.0, 1.0, 5, 1024.0));
        assert_eq!(step.get(), 4);
        assert_eq!(bar.get(), 1.0);
    }
}
