//! Error types for spark-motion.
//!
//! Runtime conditions (`MissingTarget`, `DegenerateInput`,
//! `ObservationUnavailable`) are never returned to callers of the mount API.
//! They are logged and the engine degrades to a static presentation. Only
//! configuration loading surfaces errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MotionError {
    /// Container reference absent at setup time (normal teardown race).
    #[error("target container is not attached")]
    MissingTarget,

    /// Not enough steps to scrub between.
    #[error("degenerate narrative: {step_count} step(s), scrubbing disabled")]
    DegenerateInput { step_count: usize },

    /// Host cannot evaluate visibility.
    #[error("visibility observation unavailable, failing open")]
    ObservationUnavailable,

    #[error("invalid config value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config io error: {0}")]
    ConfigIo(#[from] std::io::Error),
}

impl MotionError {
    /// Whether the engine can keep going in a degraded presentation.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            MotionError::MissingTarget
                | MotionError::DegenerateInput { .. }
                | MotionError::ObservationUnavailable
        )
    }
}

pub type Result<T> = std::result::Result<T, MotionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degradable_classification() {
        assert!(MotionError::MissingTarget.is_degradable());
        assert!(MotionError::DegenerateInput { step_count: 1 }.is_degradable());
        assert!(MotionError::ObservationUnavailable.is_degradable());
        assert!(
            !MotionError::InvalidConfig {
                field: "breakpoint",
                reason: "zero".into()
            }
            .is_degradable()
        );
    }

    #[test]
    fn test_display() {
        let err = MotionError::DegenerateInput { step_count: 1 };
        assert_eq!(
            err.to_string(),
            "degenerate narrative: 1 step(s), scrubbing disabled"
        );
    }
}
