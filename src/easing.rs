//! Easing curves.
//!
//! Every curve maps [0, 1] onto [0, 1] with `apply(0) == 0` and
//! `apply(1) == 1`, and none of them overshoot. Inputs are clamped.

use serde::{Deserialize, Serialize};

/// Quadratic ease-in: slow start.
#[inline]
pub fn power2_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out: fast start, slow finish.
#[inline]
pub fn power2_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out: slow at both ends.
#[inline]
pub fn power2_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Named easing curve, as written in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    #[serde(rename = "linear")]
    Linear,
    #[serde(rename = "power2.in")]
    Power2In,
    #[default]
    #[serde(rename = "power2.out")]
    Power2Out,
    #[serde(rename = "power2.inOut")]
    Power2InOut,
}

impl Ease {
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Ease::Linear => linear(t),
            Ease::Power2In => power2_in(t),
            Ease::Power2Out => power2_out(t),
            Ease::Power2InOut => power2_in_out(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 4] = [Ease::Linear, Ease::Power2In, Ease::Power2Out, Ease::Power2InOut];

    #[test]
    fn test_endpoints() {
        for ease in ALL {
            assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
            assert_eq!(ease.apply(1.0), 1.0, "{ease:?}");
        }
    }

    #[test]
    fn test_clamps_out_of_range() {
        for ease in ALL {
            assert_eq!(ease.apply(-0.5), 0.0);
            assert_eq!(ease.apply(1.5), 1.0);
        }
    }

    #[test]
    fn test_monotonic_no_overshoot() {
        for ease in ALL {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = ease.apply(i as f32 / 100.0);
                assert!(v >= prev, "{ease:?} not monotonic at {i}");
                assert!((0.0..=1.0).contains(&v));
                prev = v;
            }
        }
    }

    #[test]
    fn test_in_out_midpoint() {
        assert!((power2_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!((power2_out(0.5) - 0.75).abs() < 1e-6);
    }
}
