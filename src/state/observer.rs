//! Viewport Observer - One-shot visibility activation
//!
//! Watches a container and fires a callback the first time enough of it is
//! on screen. After that the observer is spent: it disconnects its listeners
//! and can never fire again.
//!
//! # Pattern
//!
//! - [`ObserverCore`] is the pure decision logic. It owns a single
//!   [`ActivationToken`]; firing hands the token out, so a second positive
//!   evaluation finds nothing to hand out.
//! - [`observe`] binds a core to the listener registry. Visibility is
//!   evaluated on scroll, resize and every frame tick, so content that is
//!   already on screen fires on the next tick without waiting for an edge.
//! - Listeners are disconnected *before* the callback runs.
//!
//! # Failure modes
//!
//! - Missing container: silent no-op, nothing registered.
//! - Observation unsupported by the host: fail open, fire on the next tick.
//! - Optional fallback timeout: fire once the deadline passes, visible or not.
//!
//! # Example
//!
//! ```ignore
//! use spark_motion::state::observer::{observe, ObserveOptions};
//!
//! let observer = observe(Some(layout), ObserveOptions::default(), || {
//!     println!("container is on screen");
//! });
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::RevealConfig;
use crate::engine::{clock, listeners, Cleanup};
use crate::error::MotionError;
use crate::pipeline::viewport;
use crate::types::{LayoutProbe, Rect};

// =============================================================================
// VISIBILITY
// =============================================================================

/// Visible fraction of `target`, or `None` when it does not meet `viewport`.
///
/// The overlap is measured against the smaller of the two areas, so a
/// container taller than the viewport reaches 1.0 once it fills the screen.
/// A zero-area target counts as fully visible when it sits inside the
/// viewport.
pub fn visible_fraction(target: &Rect, viewport: &Rect) -> Option<f32> {
    let area = target.area();
    if area <= 0.0 {
        return viewport.contains(target.x, target.y).then_some(1.0);
    }
    let overlap = target.intersect(viewport)?;
    if overlap.area() <= 0.0 {
        return None;
    }
    let reference = if viewport.area() > 0.0 { area.min(viewport.area()) } else { area };
    Some((overlap.area() / reference).clamp(0.0, 1.0))
}

/// One visibility reading for a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisibilitySample {
    /// Host cannot evaluate visibility.
    Unavailable,
    /// Container is not attached.
    Detached,
    /// Container is attached; `None` means entirely off screen.
    Visible(Option<f32>),
}

/// Sample a container against the current viewport.
pub fn sample_visibility(layout: &dyn LayoutProbe) -> VisibilitySample {
    if !viewport::observation_supported() {
        return VisibilitySample::Unavailable;
    }
    match layout.document_rect() {
        Some(rect) => VisibilitySample::Visible(visible_fraction(&rect, &viewport::viewport_rect())),
        None => VisibilitySample::Detached,
    }
}

// =============================================================================
// CORE
// =============================================================================

/// Single-use permission to fire an activation.
#[derive(Debug)]
pub struct ActivationToken {
    _private: (),
}

/// Pure fire-once decision logic.
#[derive(Debug)]
pub struct ObserverCore {
    threshold: f32,
    token: Option<ActivationToken>,
    deadline: Option<f64>,
}

impl ObserverCore {
    /// Create an armed core.
    ///
    /// # Arguments
    ///
    /// * `threshold` - Visible fraction required to fire (clamped to [0, 1])
    /// * `started_at` - Observation start time
    /// * `fallback_timeout` - Fire unconditionally this many seconds after start
    pub fn new(threshold: f32, started_at: f64, fallback_timeout: Option<f64>) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            token: Some(ActivationToken { _private: () }),
            deadline: fallback_timeout.map(|timeout| started_at + timeout),
        }
    }

    /// Still able to fire.
    pub fn is_armed(&self) -> bool {
        self.token.is_some()
    }

    /// Give up the token without firing.
    pub fn disarm(&mut self) {
        self.token = None;
    }

    /// Evaluate one reading. Returns the token exactly once, when the
    /// activation should fire.
    pub fn evaluate(&mut self, sample: VisibilitySample, now: f64) -> Option<ActivationToken> {
        self.token.as_ref()?;

        let fire = match sample {
            VisibilitySample::Unavailable => true,
            VisibilitySample::Detached => false,
            VisibilitySample::Visible(Some(fraction)) => fraction >= self.threshold,
            VisibilitySample::Visible(None) => false,
        };
        let timed_out = self.deadline.is_some_and(|deadline| now >= deadline);

        if fire || timed_out {
            if sample == VisibilitySample::Unavailable {
                tracing::debug!(error = %MotionError::ObservationUnavailable, "observer fired");
            } else if !fire {
                tracing::debug!("observer fallback timeout reached");
            }
            return self.token.take();
        }
        None
    }
}

// =============================================================================
// BINDING
// =============================================================================

/// Options for [`observe`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Visible fraction required to fire
    pub threshold: f32,
    /// Fire anyway after this many seconds
    pub fallback_timeout: Option<f64>,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            threshold: 0.08,
            fallback_timeout: None,
        }
    }
}

impl From<&RevealConfig> for ObserveOptions {
    fn from(config: &RevealConfig) -> Self {
        Self {
            threshold: config.threshold,
            fallback_timeout: config.fallback_timeout,
        }
    }
}

struct ObserverInner {
    core: ObserverCore,
    cleanups: Vec<Cleanup>,
    on_activate: Option<Box<dyn FnOnce()>>,
    fired: bool,
}

impl ObserverInner {
    fn disconnect(&mut self) -> Vec<Cleanup> {
        std::mem::take(&mut self.cleanups)
    }
}

/// Handle to a bound observer. Dropping it disconnects.
pub struct ViewportObserver {
    inner: Option<Rc<RefCell<ObserverInner>>>,
}

impl ViewportObserver {
    /// An observer that never fires and holds nothing.
    pub fn inert() -> Self {
        Self { inner: None }
    }

    /// Whether the activation has fired.
    pub fn has_fired(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.borrow().fired)
    }

    /// Whether the observer can still fire.
    pub fn is_armed(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.borrow().core.is_armed())
    }

    /// Stop observing. The activation will never fire afterwards.
    pub fn disconnect(&self) {
        let Some(inner) = self.inner.as_ref() else {
            return;
        };
        let cleanups = {
            let mut inner = inner.borrow_mut();
            inner.core.disarm();
            inner.on_activate = None;
            inner.disconnect()
        };
        for cleanup in cleanups {
            cleanup();
        }
    }
}

impl Drop for ViewportObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn evaluate(inner: &Rc<RefCell<ObserverInner>>, layout: &dyn LayoutProbe) {
    let sample = sample_visibility(layout);

    let activation = {
        let mut guard = inner.borrow_mut();
        match guard.core.evaluate(sample, clock::now()) {
            Some(token) => {
                guard.fired = true;
                Some((token, guard.disconnect(), guard.on_activate.take()))
            }
            None => None,
        }
    };

    if let Some((_token, cleanups, callback)) = activation {
        for cleanup in cleanups {
            cleanup();
        }
        if let Some(callback) = callback {
            callback();
        }
    }
}

/// Observe a container and fire `on_activate` at most once.
///
/// # Arguments
///
/// * `target` - Container geometry source; `None` is a silent no-op
/// * `options` - Threshold and optional fallback timeout
/// * `on_activate` - Runs once, after the observer has disconnected
pub fn observe<F>(
    target: Option<Rc<dyn LayoutProbe>>,
    options: ObserveOptions,
    on_activate: F,
) -> ViewportObserver
where
    F: FnOnce() + 'static,
{
    let Some(layout) = target else {
        tracing::debug!(error = %MotionError::MissingTarget, "observe skipped");
        return ViewportObserver::inert();
    };

    let inner = Rc::new(RefCell::new(ObserverInner {
        core: ObserverCore::new(options.threshold, clock::now(), options.fallback_timeout),
        cleanups: Vec::new(),
        on_activate: Some(Box::new(on_activate)),
        fired: false,
    }));

    let (i1, p1) = (inner.clone(), layout.clone());
    let scroll = listeners::on_scroll(move |_| evaluate(&i1, p1.as_ref()));
    let (i2, p2) = (inner.clone(), layout.clone());
    let resize = listeners::on_resize(move |_| evaluate(&i2, p2.as_ref()));
    let (i3, p3) = (inner.clone(), layout);
    let frame = listeners::on_frame(move |_| evaluate(&i3, p3.as_ref()));

    inner.borrow_mut().cleanups = vec![Box::new(scroll), Box::new(resize), Box::new(frame)];

    ViewportObserver { inner: Some(inner) }
}

// =============================================================================
// TESTS
// =============================================================================
