//! Mount API - Binds motion systems to a page section.
//!
//! Two entry points:
//!
//! - [`mount_narrative`] - the process narrative. Picks slider or stacked
//!   presentation from the viewport width, runs a [`SliderSession`] while in
//!   slider mode, and publishes the frame and mode as signals.
//! - [`mount_reveal`] - a staggered one-shot reveal of a container's children,
//!   triggered when the container scrolls into view.
//!
//! Both return a handle. Unmounting (or dropping) the handle detaches every
//! listener it installed, synchronously.
//!
//! # Example
//!
//! ```ignore
//! use spark_motion::pipeline::{mount_narrative, viewport};
//!
//! let handle = mount_narrative(Some(section), steps, &config, Some(host));
//! handle.present(|mode, frame| draw(mode, frame));
//!
//! // Host event loop
//! viewport::scroll_to(y);
//! viewport::tick(now);
//!
//! handle.unmount();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{effect, signal, Derived, Signal};

use crate::config::{MotionConfig, NarrativeConfig, RevealConfig};
use crate::engine::{clock, listeners, Cleanup};
use crate::error::MotionError;
use crate::state::{
    observe, ItemVisual, NarrativeFrame, ObserveOptions, ResponsiveModeSelector, RevealGroup,
    RevealOptions, SliderSession, ViewportObserver,
};
use crate::types::{ElementHandle, LayoutProbe, ListenerKind, Mode, NodeState, ScrollHost, StepDescriptor, VisualState};
use super::narrative_derived::create_node_states_derived;
use super::viewport;

// =============================================================================
// Narrative Handle
// =============================================================================

struct NarrativeInner {
    section: Option<Rc<dyn LayoutProbe>>,
    host: Option<Rc<dyn ScrollHost>>,
    config: NarrativeConfig,
    step_count: usize,
    selector: ResponsiveModeSelector,
    session: Option<SliderSession>,
    resize_cleanup: Option<Cleanup>,
    debounce_cleanup: Option<Cleanup>,
    mode: Signal<Mode>,
    frame: Signal<NarrativeFrame>,
}

/// Handle returned by [`mount_narrative`].
pub struct NarrativeHandle {
    inner: Rc<RefCell<NarrativeInner>>,
    steps: Rc<[StepDescriptor]>,
    mode: Signal<Mode>,
    frame: Signal<NarrativeFrame>,
    stop_effect: Option<Box<dyn FnOnce()>>,
}

impl NarrativeHandle {
    /// Current presentation mode.
    pub fn mode(&self) -> Mode {
        self.mode.get()
    }

    /// Latest published frame.
    pub fn frame(&self) -> NarrativeFrame {
        self.frame.get()
    }

    pub fn active_step(&self) -> usize {
        self.frame.get().active_step
    }

    pub fn bar_fraction(&self) -> f32 {
        self.frame.get().bar_fraction
    }

    pub fn offset_x(&self) -> f32 {
        self.frame.get().offset_x
    }

    pub fn is_pinned(&self) -> bool {
        self.frame.get().pinned
    }

    pub fn node_state(&self, index: usize) -> NodeState {
        self.frame.get().node_state(index)
    }

    /// Node states as a derived, for presenters that only draw the timeline.
    pub fn node_states_derived(&self) -> Derived<Vec<NodeState>> {
        create_node_states_derived(self.frame.clone())
    }

    pub fn mode_signal(&self) -> Signal<Mode> {
        self.mode.clone()
    }

    pub fn frame_signal(&self) -> Signal<NarrativeFrame> {
        self.frame.clone()
    }

    /// Step descriptors in narrative order.
    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    /// The full step list when the stacked presentation is active.
    pub fn stacked_steps(&self) -> Option<&[StepDescriptor]> {
        match self.mode() {
            Mode::Stacked => Some(&self.steps),
            Mode::Slider => None,
        }
    }

    /// Whether a slider session is currently running.
    pub fn has_session(&self) -> bool {
        self.inner.borrow().session.is_some()
    }

    /// Listeners currently held on behalf of this narrative.
    pub fn listener_mask(&self) -> ListenerKind {
        let inner = self.inner.borrow();
        let mut mask = inner
            .session
            .as_ref()
            .map(SliderSession::listener_mask)
            .unwrap_or_else(ListenerKind::empty);
        if inner.resize_cleanup.is_some() {
            mask |= ListenerKind::RESIZE;
        }
        if inner.debounce_cleanup.is_some() {
            mask |= ListenerKind::FRAME;
        }
        mask
    }

    /// Install the presenter. `render` runs now and again whenever the mode
    /// or the frame changes. Replaces any previous presenter.
    pub fn present<F>(&mut self, mut render: F)
    where
        F: FnMut(Mode, &NarrativeFrame) + 'static,
    {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
        let mode = self.mode.clone();
        let frame = self.frame.clone();
        let stop = effect(move || {
            let current_mode = mode.get();
            let current_frame = frame.get();
            render(current_mode, &current_frame);
        });
        self.stop_effect = Some(Box::new(stop));
    }

    /// Detach everything and stop the presenter.
    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }

        let (session, cleanups) = {
            let mut inner = self.inner.borrow_mut();
            let cleanups: Vec<Cleanup> = inner
                .resize_cleanup
                .take()
                .into_iter()
                .chain(inner.debounce_cleanup.take())
                .collect();
            (inner.session.take(), cleanups)
        };

        let had_session = session.is_some();
        if let Some(mut session) = session {
            session.teardown();
        }
        for cleanup in cleanups {
            cleanup();
        }
        if had_session {
            tracing::debug!("narrative unmounted");
        }
    }
}

impl Drop for NarrativeHandle {
    fn drop(&mut self) {
        self.release();
    }
}

// =============================================================================
// Mode switching
// =============================================================================

/// Tear down the current session, then set up `mode`.
fn apply_mode(inner: &Rc<RefCell<NarrativeInner>>, mode: Mode) {
    let previous = inner.borrow_mut().session.take();
    if let Some(mut session) = previous {
        session.teardown();
    }

    let (section, host, config, step_count, mode_signal, frame) = {
        let i = inner.borrow();
        (i.section.clone(), i.host.clone(), i.config, i.step_count, i.mode.clone(), i.frame.clone())
    };

    if mode == Mode::Slider {
        let started = match section {
            Some(section) => SliderSession::start(section, step_count, config, host, frame.clone()),
            None => Err(MotionError::MissingTarget),
        };
        match started {
            Ok(session) => inner.borrow_mut().session = Some(session),
            Err(err) => {
                tracing::debug!(error = %err, "slider unavailable, showing static state");
                frame.set(NarrativeFrame::static_state(step_count));
            }
        }
    } else {
        frame.set(NarrativeFrame::static_state(step_count));
    }

    mode_signal.set(mode);
}

fn on_viewport_resize(inner: &Rc<RefCell<NarrativeInner>>, width: f32) {
    let needs_driver = {
        let mut i = inner.borrow_mut();
        i.selector.on_resize(width, clock::now());
        i.debounce_cleanup.is_none()
    };
    if !needs_driver {
        return;
    }

    let driver = inner.clone();
    let cleanup = listeners::on_frame(move |now| settle_mode(&driver, now));
    inner.borrow_mut().debounce_cleanup = Some(Box::new(cleanup));
}

/// Frame listener that lives only while a resize is pending.
fn settle_mode(inner: &Rc<RefCell<NarrativeInner>>, now: f64) {
    let (transition, settled) = {
        let mut i = inner.borrow_mut();
        let transition = i.selector.on_frame(now);
        (transition, !i.selector.is_pending())
    };

    if settled {
        let cleanup = inner.borrow_mut().debounce_cleanup.take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }
    }
    if let Some(transition) = transition {
        apply_mode(inner, transition.to);
    }
}

// =============================================================================
// Mount Narrative
// =============================================================================

/// Mount the process narrative on `section`.
///
/// The mode is chosen synchronously from the current viewport width. A
/// missing section yields an inert handle in stacked mode; fewer than two
/// steps yield the single static state.
pub fn mount_narrative(
    section: Option<Rc<dyn LayoutProbe>>,
    steps: Vec<StepDescriptor>,
    config: &MotionConfig,
    host: Option<Rc<dyn ScrollHost>>,
) -> NarrativeHandle {
    let step_count = steps.len();
    let steps: Rc<[StepDescriptor]> = steps.into();
    let mode = signal(Mode::Stacked);
    let frame = signal(NarrativeFrame::static_state(step_count));

    let attached = section.is_some();
    let inner = Rc::new(RefCell::new(NarrativeInner {
        section,
        host,
        config: config.narrative,
        step_count,
        selector: ResponsiveModeSelector::new(&config.responsive),
        session: None,
        resize_cleanup: None,
        debounce_cleanup: None,
        mode: mode.clone(),
        frame: frame.clone(),
    }));

    if !attached {
        tracing::debug!(error = %MotionError::MissingTarget, "narrative not mounted");
        return NarrativeHandle { inner, steps, mode, frame, stop_effect: None };
    }

    let initial = inner.borrow_mut().selector.evaluate(viewport::viewport_width());
    if let Some(transition) = initial {
        apply_mode(&inner, transition.to);
    }

    let listener = inner.clone();
    let resize = listeners::on_resize(move |size| on_viewport_resize(&listener, size.width));
    inner.borrow_mut().resize_cleanup = Some(Box::new(resize));

    tracing::debug!(step_count, mode = ?mode.get(), "narrative mounted");

    NarrativeHandle { inner, steps, mode, frame, stop_effect: None }
}

// =============================================================================
// Reveal Handle
// =============================================================================

type DriverSlot = Rc<RefCell<Option<Cleanup>>>;

/// Handle returned by [`mount_reveal`].
pub struct RevealHandle {
    group: Rc<RefCell<RevealGroup>>,
    observer: ViewportObserver,
    driver: DriverSlot,
    state: Signal<VisualState>,
}

impl RevealHandle {
    pub fn state(&self) -> VisualState {
        self.state.get()
    }

    pub fn state_signal(&self) -> Signal<VisualState> {
        self.state.clone()
    }

    pub fn visual(&self, index: usize) -> Option<ItemVisual> {
        self.group.borrow().visual(index)
    }

    pub fn visuals(&self) -> Vec<ItemVisual> {
        self.group.borrow().visuals().to_vec()
    }

    /// Start time of item `index` once the reveal has been scheduled.
    pub fn item_start(&self, index: usize) -> Option<f64> {
        self.group.borrow().item_start(index)
    }

    pub fn container(&self) -> ElementHandle {
        self.group.borrow().container()
    }

    /// Whether the container has been seen.
    pub fn has_activated(&self) -> bool {
        self.observer.has_fired()
    }

    /// A frame driver is running.
    pub fn is_animating(&self) -> bool {
        self.driver.borrow().is_some()
    }

    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        self.observer.disconnect();
        let driver = self.driver.borrow_mut().take();
        if let Some(stop) = driver {
            stop();
        }
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.release();
    }
}

fn start_reveal(group: &Rc<RefCell<RevealGroup>>, driver: &DriverSlot, state: &Signal<VisualState>) {
    let now = clock::now();
    let scheduled = group.borrow_mut().schedule(now);
    if !scheduled {
        return;
    }

    let current = group.borrow_mut().advance(now);
    state.set(current);
    if current == VisualState::Revealed {
        return;
    }

    let (g, d, s) = (group.clone(), driver.clone(), state.clone());
    let cleanup = listeners::on_frame(move |now| {
        let current = g.borrow_mut().advance(now);
        s.set(current);
        if current == VisualState::Revealed {
            let stop = d.borrow_mut().take();
            if let Some(stop) = stop {
                stop();
            }
        }
    });
    *driver.borrow_mut() = Some(Box::new(cleanup));
}

// =============================================================================
// Mount Reveal
// =============================================================================

/// Reveal `items` once `container` scrolls into view.
///
/// Items stay Hidden until activation. A missing container yields an inert
/// handle whose items never animate.
pub fn mount_reveal(
    container: Option<Rc<dyn LayoutProbe>>,
    container_id: ElementHandle,
    items: Vec<ElementHandle>,
    config: &RevealConfig,
) -> RevealHandle {
    let group = Rc::new(RefCell::new(RevealGroup::new(container_id, items, RevealOptions::from(config))));
    let driver: DriverSlot = Rc::new(RefCell::new(None));
    let state = signal(VisualState::Hidden);

    let (g, d, s) = (group.clone(), driver.clone(), state.clone());
    let observer = observe(container, ObserveOptions::from(config), move || {
        tracing::debug!(container = container_id.0, "reveal activated");
        start_reveal(&g, &d, &s);
    });

    RevealHandle { group, observer, driver, state }
}

// =============================================================================
// Tests
// =============================================================================
