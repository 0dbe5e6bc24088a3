//! Slider Session - Binds a NarrativeController to host events
//!
//! The controller is pure state; the session is the thin adapter that feeds
//! it scroll, resize and frame events and publishes the resulting frame into
//! a signal for the presentation layer.
//!
//! A session owns exactly three listeners (scroll, resize, frame). Teardown
//! removes all of them synchronously and publishes an unpinned frame, so no
//! animation keeps running against a detached section. Dropping a session
//! tears it down.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::Signal;

use crate::config::NarrativeConfig;
use crate::engine::{clock, listeners, Cleanup};
use crate::error::MotionError;
use crate::pipeline::viewport;
use crate::state::narrative::{NarrativeController, NarrativeFrame};
use crate::types::{LayoutProbe, ListenerKind, ScrollHost};

pub struct SliderSession {
    controller: Rc<RefCell<NarrativeController>>,
    cleanups: Vec<Cleanup>,
    installed: ListenerKind,
    frame: Signal<NarrativeFrame>,
}

impl SliderSession {
    /// Measure the section, place the controller at the current scroll
    /// position and install listeners.
    ///
    /// # Errors
    ///
    /// * `DegenerateInput` - fewer than two steps, nothing to scrub
    /// * `MissingTarget` - section not attached
    pub fn start(
        section: Rc<dyn LayoutProbe>,
        step_count: usize,
        config: NarrativeConfig,
        host: Option<Rc<dyn ScrollHost>>,
        frame: Signal<NarrativeFrame>,
    ) -> Result<Self, MotionError> {
        if step_count <= 1 {
            return Err(MotionError::DegenerateInput { step_count });
        }
        let Some(rect) = section.document_rect() else {
            return Err(MotionError::MissingTarget);
        };

        let mut controller = NarrativeController::new(step_count, config);
        controller.set_scroll_writes(host.is_some());
        controller.start(rect, viewport::viewport_size(), viewport::scroll_y(), clock::now());
        let initial = controller.frame();
        let controller = Rc::new(RefCell::new(controller));

        // Borrows are released before publishing or writing scroll: both can
        // re-enter the scroll handler synchronously.
        let (c, f) = (controller.clone(), frame.clone());
        let scroll = listeners::on_scroll(move |y| {
            let next = {
                let mut c = c.borrow_mut();
                c.on_scroll(y, clock::now());
                c.frame()
            };
            f.set(next);
        });

        let (c, f, h) = (controller.clone(), frame.clone(), host.clone());
        let resize = listeners::on_resize(move |size| {
            let (next, anchor) = {
                let mut c = c.borrow_mut();
                let anchor = c.on_resize(section.document_rect(), size, clock::now());
                (c.frame(), anchor)
            };
            f.set(next);
            if let (Some(y), Some(host)) = (anchor, h.as_ref()) {
                host.scroll_to(y);
            }
        });

        let (c, f) = (controller.clone(), frame.clone());
        let tick = listeners::on_frame(move |now| {
            let (next, request) = {
                let mut c = c.borrow_mut();
                let request = c.on_frame(now);
                (c.frame(), request)
            };
            f.set(next);
            if let (Some(y), Some(host)) = (request, host.as_ref()) {
                host.scroll_to(y);
            }
        });

        frame.set(initial);
        tracing::debug!(step_count, phase = ?initial.phase, "slider session started");

        Ok(Self {
            controller,
            cleanups: vec![Box::new(scroll), Box::new(resize), Box::new(tick)],
            installed: ListenerKind::SCROLL | ListenerKind::RESIZE | ListenerKind::FRAME,
            frame,
        })
    }

    /// Listeners this session currently holds.
    pub fn listener_mask(&self) -> ListenerKind {
        self.installed
    }

    pub fn is_live(&self) -> bool {
        !self.installed.is_empty()
    }

    /// Current controller frame.
    pub fn current_frame(&self) -> NarrativeFrame {
        self.controller.borrow().frame()
    }

    /// Detach every listener and release the pin.
    pub fn teardown(&mut self) {
        if !self.is_live() {
            return;
        }
        for cleanup in self.cleanups.drain(..) {
            cleanup();
        }
        self.installed = ListenerKind::empty();

        let released = self.controller.borrow().frame().unpinned();
        self.frame.set(released);
        tracing::debug!("slider session torn down");
    }
}

impl Drop for SliderSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
