//! TOML-based engine configuration.
//!
//! All tuning constants of the engine live here: reveal choreography, scroll
//! distance, snap window and easing, responsive breakpoint. Every field has a
//! default, so an empty file (or no file) yields the stock behavior.
//!
//! ```toml
//! [reveal]
//! stagger = 0.08
//! distance = 24.0
//!
//! [narrative]
//! scroll_distance = 3.0
//!
//! [narrative.snap]
//! min = 0.25
//! max = 0.5
//! ease = "power2.inOut"
//!
//! [responsive]
//! breakpoint = 768.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::easing::Ease;
use crate::error::{MotionError, Result};

// =============================================================================
// Sections
// =============================================================================

/// Staggered reveal knobs. Times in seconds, distances in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Delay between consecutive items
    #[serde(default = "default_stagger")]
    pub stagger: f64,
    /// Starting vertical offset of hidden items
    #[serde(default = "default_distance")]
    pub distance: f32,
    /// Per-item animation duration
    #[serde(default = "default_reveal_duration")]
    pub duration: f64,
    #[serde(default = "default_reveal_ease")]
    pub ease: Ease,
    /// Fraction of the container area that must be on screen
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Reveal anyway after this many seconds, visible or not
    #[serde(default)]
    pub fallback_timeout: Option<f64>,
}

/// Snap settle knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Scroll idle time before snapping starts
    #[serde(default = "default_snap_idle")]
    pub idle: f64,
    /// Shortest snap duration
    #[serde(default = "default_snap_min")]
    pub min: f64,
    /// Longest snap duration
    #[serde(default = "default_snap_max")]
    pub max: f64,
    #[serde(default = "default_snap_ease")]
    pub ease: Ease,
}

/// Pinned slider knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NarrativeConfig {
    /// Vertical scroll range of one full traversal, in viewport heights
    #[serde(default = "default_scroll_distance")]
    pub scroll_distance: f32,
    /// Track smoothing time constant in seconds (0 = locked to progress)
    #[serde(default)]
    pub scrub_lag: f64,
    #[serde(default)]
    pub snap: SnapConfig,
}

/// Slider/stacked switching knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveConfig {
    /// Minimum viewport width (px) for slider mode
    #[serde(default = "default_breakpoint")]
    pub breakpoint: f32,
    /// Resize settle time before re-evaluating the mode
    #[serde(default = "default_debounce")]
    pub debounce: f64,
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionConfig {
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub narrative: NarrativeConfig,
    #[serde(default)]
    pub responsive: ResponsiveConfig,
}

// =============================================================================
// Defaults
// =============================================================================

fn default_stagger() -> f64 {
    0.08
}
fn default_distance() -> f32 {
    24.0
}
fn default_reveal_duration() -> f64 {
    0.75
}
fn default_reveal_ease() -> Ease {
    Ease::Power2Out
}
fn default_threshold() -> f32 {
    0.08
}
fn default_true() -> bool {
    true
}
fn default_snap_idle() -> f64 {
    0.15
}
fn default_snap_min() -> f64 {
    0.25
}
fn default_snap_max() -> f64 {
    0.5
}
fn default_snap_ease() -> Ease {
    Ease::Power2InOut
}
fn default_scroll_distance() -> f32 {
    3.0
}
fn default_breakpoint() -> f32 {
    768.0
}
fn default_debounce() -> f64 {
    0.1
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            stagger: default_stagger(),
            distance: default_distance(),
            duration: default_reveal_duration(),
            ease: default_reveal_ease(),
            threshold: default_threshold(),
            fallback_timeout: None,
        }
    }
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            idle: default_snap_idle(),
            min: default_snap_min(),
            max: default_snap_max(),
            ease: default_snap_ease(),
        }
    }
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            scroll_distance: default_scroll_distance(),
            scrub_lag: 0.0,
            snap: SnapConfig::default(),
        }
    }
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            breakpoint: default_breakpoint(),
            debounce: default_debounce(),
        }
    }
}

// =============================================================================
// Loading & validation
// =============================================================================

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(MotionError::InvalidConfig {
            field,
            reason: format!("expected a finite value >= 0, got {value}"),
        });
    }
    Ok(())
}

impl MotionConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: MotionConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load a config file, falling back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(path = %path.as_ref().display(), %err, "using default motion config");
                Self::default()
            }
        }
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let r = &self.reveal;
        non_negative("reveal.stagger", r.stagger)?;
        non_negative("reveal.distance", r.distance as f64)?;
        non_negative("reveal.duration", r.duration)?;
        if !(r.threshold > 0.0 && r.threshold <= 1.0) {
            return Err(MotionError::InvalidConfig {
                field: "reveal.threshold",
                reason: format!("expected a fraction in (0, 1], got {}", r.threshold),
            });
        }
        if let Some(timeout) = r.fallback_timeout {
            non_negative("reveal.fallback_timeout", timeout)?;
        }

        let n = &self.narrative;
        if !(n.scroll_distance.is_finite() && n.scroll_distance > 0.0) {
            return Err(MotionError::InvalidConfig {
                field: "narrative.scroll_distance",
                reason: format!("expected a positive multiplier, got {}", n.scroll_distance),
            });
        }
        non_negative("narrative.scrub_lag", n.scrub_lag)?;
        non_negative("narrative.snap.idle", n.snap.idle)?;
        non_negative("narrative.snap.min", n.snap.min)?;
        non_negative("narrative.snap.max", n.snap.max)?;
        if n.snap.min > n.snap.max {
            return Err(MotionError::InvalidConfig {
                field: "narrative.snap",
                reason: format!("min ({}) exceeds max ({})", n.snap.min, n.snap.max),
            });
        }

        let s = &self.responsive;
        if !(s.breakpoint.is_finite() && s.breakpoint > 0.0) {
            return Err(MotionError::InvalidConfig {
                field: "responsive.breakpoint",
                reason: format!("expected a positive width, got {}", s.breakpoint),
            });
        }
        non_negative("responsive.debounce", s.debounce)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_behavior() {
        let cfg = MotionConfig::default();
        assert_eq!(cfg.reveal.stagger, 0.08);
        assert_eq!(cfg.reveal.distance, 24.0);
        assert_eq!(cfg.reveal.duration, 0.75);
        assert_eq!(cfg.reveal.threshold, 0.08);
        assert_eq!(cfg.narrative.scroll_distance, 3.0);
        assert_eq!(cfg.narrative.snap.min, 0.25);
        assert_eq!(cfg.narrative.snap.max, 0.5);
        assert_eq!(cfg.narrative.snap.ease, Ease::Power2InOut);
        assert_eq!(cfg.responsive.breakpoint, 768.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        let cfg = MotionConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, MotionConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let cfg = MotionConfig::from_toml_str(
            r#"
            [reveal]
            stagger = 0.12

            [narrative.snap]
            ease = "linear"
            max = 0.8

            [responsive]
            breakpoint = 1024.0
            "#,
        )
        .unwrap();

        assert_eq!(cfg.reveal.stagger, 0.12);
        assert_eq!(cfg.reveal.distance, 24.0);
        assert_eq!(cfg.narrative.snap.ease, Ease::Linear);
        assert_eq!(cfg.narrative.snap.max, 0.8);
        assert_eq!(cfg.narrative.snap.min, 0.25);
        assert_eq!(cfg.responsive.breakpoint, 1024.0);
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut cfg = MotionConfig::default();
        cfg.reveal.fallback_timeout = Some(2.0);
        cfg.narrative.scrub_lag = 1.2;
        let text = cfg.to_toml_string().unwrap();
        let parsed = MotionConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let err = MotionConfig::from_toml_str("[reveal]\nthreshold = 0.0").unwrap_err();
        assert!(matches!(
            err,
            MotionError::InvalidConfig { field: "reveal.threshold", .. }
        ));
    }

    #[test]
    fn test_rejects_inverted_snap_window() {
        let err =
            MotionConfig::from_toml_str("[narrative.snap]\nmin = 0.6\nmax = 0.3").unwrap_err();
        assert!(matches!(err, MotionError::InvalidConfig { field: "narrative.snap", .. }));
    }

    #[test]
    fn test_rejects_negative_stagger() {
        let err = MotionConfig::from_toml_str("[reveal]\nstagger = -1.0").unwrap_err();
        assert!(matches!(err, MotionError::InvalidConfig { field: "reveal.stagger", .. }));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = MotionConfig::from_toml_str("[reveal\nstagger = ").unwrap_err();
        assert!(matches!(err, MotionError::ConfigParse(_)));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let cfg = MotionConfig::load_or_default("/nonexistent/spark-motion.toml");
        assert_eq!(cfg, MotionConfig::default());
    }
}
