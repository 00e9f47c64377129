//! Floating panel geometry and the window event stream it tracks.
//!
//! The suggestion panel is drawn on a layer outside normal layout, so its
//! position has to be recomputed from the anchor's screen rectangle every
//! time anything scrolls or the window resizes. [`WindowEvents`] is the
//! process-wide source of those events; each consumer holds a
//! [`Subscription`] that unregisters its listener when dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::error::GeometryUnavailable;
use crate::traits::Anchor;

/// Screen rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Absolute position of the floating panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropdownGeometry {
    pub top: f64,
    pub left: f64,
    pub width: f64,
}

impl DropdownGeometry {
    /// Panel directly under `rect`, `gap` pixels down, same width.
    pub fn below(rect: &Rect, gap: f64) -> Self {
        Self {
            top: rect.bottom() + gap,
            left: rect.left,
            width: rect.width,
        }
    }

    pub fn from_anchor<A>(anchor: &A, gap: f64) -> Result<Self, GeometryUnavailable>
    where
        A: Anchor + ?Sized,
    {
        anchor
            .screen_rect()
            .map(|rect| Self::below(&rect, gap))
            .ok_or(GeometryUnavailable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Scroll,
    Resize,
}

/// What scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Window,
    /// Any scrollable element. Scroll events do not bubble, so only
    /// capture-phase listeners see these.
    Element,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Scroll(ScrollTarget),
    Resize,
}

impl WindowEvent {
    fn kind(&self) -> EventKind {
        match self {
            Self::Scroll(_) => EventKind::Scroll,
            Self::Resize => EventKind::Resize,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenOptions {
    pub capture: bool,
}

type Callback = Rc<RefCell<dyn FnMut(&WindowEvent)>>;

struct Entry {
    id: u64,
    kind: EventKind,
    options: ListenOptions,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }
}

/// Window-level scroll/resize broadcast.
///
/// Cloning yields another handle to the same stream.
#[derive(Clone, Default)]
pub struct WindowEvents {
    registry: Rc<RefCell<Registry>>,
}

impl WindowEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for every `(kind, options)` pair.
    ///
    /// The listener stays registered until the returned guard is dropped.
    pub fn subscribe<F>(&self, kinds: &[(EventKind, ListenOptions)], callback: F) -> Subscription
    where
        F: FnMut(&WindowEvent) + 'static,
    {
        let callback: Callback = Rc::new(RefCell::new(callback));
        let mut registry = self.registry.borrow_mut();
        let mut ids = Vec::with_capacity(kinds.len());
        for &(kind, options) in kinds {
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push(Entry {
                id,
                kind,
                options,
                callback: Rc::clone(&callback),
            });
            ids.push(id);
        }

        Subscription {
            registry: Rc::downgrade(&self.registry),
            ids,
        }
    }

    /// Delivers `event` to matching listeners and returns how many ran.
    ///
    /// Listeners may subscribe or unsubscribe while being dispatched; one
    /// removed during this dispatch is not called afterwards.
    pub fn dispatch(&self, event: WindowEvent) -> usize {
        let targets: Vec<(u64, Callback)> = self
            .registry
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.kind == event.kind())
            .filter(|entry| match event {
                WindowEvent::Scroll(ScrollTarget::Element) => entry.options.capture,
                _ => true,
            })
            .map(|entry| (entry.id, Rc::clone(&entry.callback)))
            .collect();

        let mut delivered = 0;
        for (id, callback) in targets {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            // A listener that re-enters dispatch is skipped rather than
            // borrowed twice.
            if let Ok(mut listener) = callback.try_borrow_mut() {
                (&mut *listener)(&event);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

/// Registration guard returned by [`WindowEvents::subscribe`].
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    ids: Vec<u64>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if let Ok(mut registry) = registry.try_borrow_mut() {
            registry.entries.retain(|entry| !self.ids.contains(&entry.id));
        }
    }
}
