//! Listener Registry - Host event handlers for scroll, resize and frame ticks
//!
//! Every engine component that reacts to the host goes through this registry,
//! so "how many listeners are live" is a single query. That is how tests
//! assert mode exclusivity and teardown.
//!
//! # API
//!
//! - `on_scroll(fn)` - Subscribe to page scroll (document scroll Y)
//! - `on_resize(fn)` - Subscribe to viewport resize
//! - `on_frame(fn)` - Subscribe to animation frame ticks (time in seconds)
//! - `dispatch_scroll` / `dispatch_resize` / `dispatch_frame` - Deliver events
//! - `listener_count(kind)` - Count live listeners of the given kind(s)
//!
//! Each `on_*` returns a cleanup function that removes the handler.
//!
//! # Re-entrancy
//!
//! Dispatch snapshots the handler list before calling out, so a handler may
//! register or remove listeners (itself included). A handler removed during a
//! dispatch is not called for the remainder of that dispatch.

use std::cell::RefCell;
use std::rc::Rc;

use crate::types::{ListenerKind, ViewportSize};

// =============================================================================
// TYPES
// =============================================================================

/// Cleanup function returned by the `on_*` subscriptions.
pub type Cleanup = Box<dyn FnOnce()>;

#[derive(Clone)]
enum Listener {
    Scroll(Rc<dyn Fn(f32)>),
    Resize(Rc<dyn Fn(ViewportSize)>),
    Frame(Rc<dyn Fn(f64)>),
}

impl Listener {
    fn kind(&self) -> ListenerKind {
        match self {
            Listener::Scroll(_) => ListenerKind::SCROLL,
            Listener::Resize(_) => ListenerKind::RESIZE,
            Listener::Frame(_) => ListenerKind::FRAME,
        }
    }
}

struct ListenerRegistry {
    listeners: Vec<(usize, Listener)>,
    next_id: usize,
}

impl ListenerRegistry {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    fn insert(&mut self, listener: Listener) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn contains(&self, id: usize) -> bool {
        self.listeners.iter().any(|(listener_id, _)| *listener_id == id)
    }
}

thread_local! {
    static REGISTRY: RefCell<ListenerRegistry> = RefCell::new(ListenerRegistry::new());
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

fn subscribe(listener: Listener) -> impl FnOnce() {
    let id = REGISTRY.with(|reg| reg.borrow_mut().insert(listener));

    move || {
        // Dropped outside the borrow: a handler's captures may own handles
        // whose Drop removes more listeners.
        let removed = REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            let index = reg.listeners.iter().position(|(listener_id, _)| *listener_id == id)?;
            Some(reg.listeners.remove(index))
        });
        drop(removed);
    }
}

/// Subscribe to page scroll. Handler receives the document scroll Y.
/// Returns cleanup function.
pub fn on_scroll<F>(handler: F) -> impl FnOnce()
where
    F: Fn(f32) + 'static,
{
    subscribe(Listener::Scroll(Rc::new(handler)))
}

/// Subscribe to viewport resize.
/// Returns cleanup function.
pub fn on_resize<F>(handler: F) -> impl FnOnce()
where
    F: Fn(ViewportSize) + 'static,
{
    subscribe(Listener::Resize(Rc::new(handler)))
}

/// Subscribe to animation frame ticks. Handler receives the frame time in seconds.
/// Returns cleanup function.
pub fn on_frame<F>(handler: F) -> impl FnOnce()
where
    F: Fn(f64) + 'static,
{
    subscribe(Listener::Frame(Rc::new(handler)))
}

// =============================================================================
// DISPATCH
// =============================================================================

fn snapshot(kind: ListenerKind) -> Vec<(usize, Listener)> {
    REGISTRY.with(|reg| {
        reg.borrow()
            .listeners
            .iter()
            .filter(|(_, listener)| listener.kind() == kind)
            .cloned()
            .collect()
    })
}

fn is_live(id: usize) -> bool {
    REGISTRY.with(|reg| reg.borrow().contains(id))
}

/// Deliver a scroll event to all scroll listeners.
pub fn dispatch_scroll(scroll_y: f32) {
    for (id, listener) in snapshot(ListenerKind::SCROLL) {
        if let Listener::Scroll(handler) = listener {
            if is_live(id) {
                handler(scroll_y);
            }
        }
    }
}

/// Deliver a resize event to all resize listeners.
pub fn dispatch_resize(size: ViewportSize) {
    for (id, listener) in snapshot(ListenerKind::RESIZE) {
        if let Listener::Resize(handler) = listener {
            if is_live(id) {
                handler(size);
            }
        }
    }
}

/// Deliver a frame tick to all frame listeners.
pub fn dispatch_frame(now: f64) {
    for (id, listener) in snapshot(ListenerKind::FRAME) {
        if let Listener::Frame(handler) = listener {
            if is_live(id) {
                handler(now);
            }
        }
    }
}

// =============================================================================
// INTROSPECTION
// =============================================================================

/// Count live listeners whose kind is contained in `kinds`.
pub fn listener_count(kinds: ListenerKind) -> usize {
    REGISTRY.with(|reg| {
        reg.borrow()
            .listeners
            .iter()
            .filter(|(_, listener)| kinds.contains(listener.kind()))
            .count()
    })
}

/// Count all live listeners.
pub fn total_listener_count() -> usize {
    listener_count(ListenerKind::all())
}

/// Remove every listener (for testing).
pub fn reset_listeners() {
    let removed = REGISTRY.with(|reg| std::mem::take(&mut reg.borrow_mut().listeners));
    drop(removed);
}
