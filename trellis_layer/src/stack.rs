// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dismissal layer stack.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use trellis_dom::{
    ElementRef, GlobalListener, Key, KeyboardEvent, ListenerId, PlatformRef, PointerEvent,
    WeakElement,
};
use trellis_reactive::Disposer;

use crate::hub::OutsideClickHub;

/// Identifies one layer within its stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

/// Why a layer is being dismissed, passed to the `on_dismiss` listener.
#[derive(Copy, Clone, Debug)]
pub enum DismissEvent<'a> {
    /// Escape was pressed while the layer was on top.
    Escape(&'a KeyboardEvent),
    /// A pointer went down outside the layer while it was on top.
    ClickOutside(&'a PointerEvent),
}

type EscapeHandler = Rc<dyn Fn(&mut KeyboardEvent)>;
type ClickHandler = Rc<dyn Fn(&PointerEvent)>;
type DismissHandler = Rc<dyn Fn(DismissEvent<'_>)>;

/// Callbacks a layer receives while it is the top layer.
///
/// `on_dismiss` runs after `on_escape` or `on_click_outside`, for either cause.
#[derive(Clone, Default)]
pub struct LayerListeners {
    escape: Option<EscapeHandler>,
    click_outside: Option<ClickHandler>,
    dismiss: Option<DismissHandler>,
    ignore: Vec<WeakElement>,
}

impl fmt::Debug for LayerListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerListeners")
            .field("on_escape", &self.escape.is_some())
            .field("on_click_outside", &self.click_outside.is_some())
            .field("on_dismiss", &self.dismiss.is_some())
            .field("ignore", &self.ignore.len())
            .finish()
    }
}

impl LayerListeners {
    /// No listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called on Escape.
    #[must_use]
    pub fn on_escape(mut self, f: impl Fn(&mut KeyboardEvent) + 'static) -> Self {
        self.escape = Some(Rc::new(f));
        self
    }

    /// Called on a `pointerdown` outside the layer element.
    #[must_use]
    pub fn on_click_outside(mut self, f: impl Fn(&PointerEvent) + 'static) -> Self {
        self.click_outside = Some(Rc::new(f));
        self
    }

    /// Called after either of the above.
    #[must_use]
    pub fn on_dismiss(mut self, f: impl Fn(DismissEvent<'_>) + 'static) -> Self {
        self.dismiss = Some(Rc::new(f));
        self
    }

    /// Presses on `element` (or inside it) are not outside clicks.
    ///
    /// Menus ignore their trigger so a click on it toggles instead of
    /// dismissing and reopening.
    #[must_use]
    pub fn ignore(mut self, element: &ElementRef) -> Self {
        self.ignore.push(element.downgrade());
        self
    }

    fn escape(&self, event: &mut KeyboardEvent) {
        if let Some(f) = &self.escape {
            f(event);
        }
        if let Some(f) = &self.dismiss {
            f(DismissEvent::Escape(event));
        }
    }

    fn click_outside(&self, event: &PointerEvent) {
        if let Some(f) = &self.click_outside {
            f(event);
        }
        if let Some(f) = &self.dismiss {
            f(DismissEvent::ClickOutside(event));
        }
    }
}

struct Entry {
    id: LayerId,
    parent: Option<LayerId>,
    element: WeakElement,
    listeners: LayerListeners,
}

struct StackInner {
    platform: PlatformRef,
    clicks: OutsideClickHub,
    entries: RefCell<Vec<Entry>>,
    next_id: Cell<u64>,
    engaged: Cell<bool>,
    key_listener: Cell<Option<ListenerId>>,
}

impl StackInner {
    fn top(&self) -> Option<LayerId> {
        self.entries.borrow().last().map(|e| e.id)
    }

    fn engage(self: &Rc<Self>) {
        if self.engaged.replace(true) {
            return;
        }
        self.platform.set_background_pointer_events(false);
        self.platform.set_scroll_locked(true);
        let weak: Weak<Self> = Rc::downgrade(self);
        let listener = self
            .platform
            .add_global_listener(GlobalListener::KeyDown(Rc::new(
                move |event: &mut KeyboardEvent| {
                    if let Some(inner) = weak.upgrade() {
                        inner.on_key_down(event);
                    }
                },
            )));
        self.key_listener.set(Some(listener));
        tracing::debug!(target: "trellis_layer::stack", "background suppressed");
    }

    fn release(&self) {
        if !self.engaged.replace(false) {
            return;
        }
        if let Some(listener) = self.key_listener.take() {
            self.platform.remove_global_listener(listener);
        }
        self.platform.set_background_pointer_events(true);
        self.platform.set_scroll_locked(false);
        tracing::debug!(target: "trellis_layer::stack", "background restored");
    }

    fn on_key_down(&self, event: &mut KeyboardEvent) {
        // An Escape already consumed by content inside a layer closes nothing more.
        if event.key != Key::Escape || event.is_propagation_stopped() {
            return;
        }
        // The top layer is fixed before any listener runs.
        let top = self.entries.borrow().last().map(|e| (e.id, e.listeners.clone()));
        if let Some((id, listeners)) = top {
            tracing::trace!(target: "trellis_layer::stack", ?id, "escape to top layer");
            listeners.escape(event);
        }
    }

    fn on_pointer_down(&self, id: LayerId, event: &PointerEvent) {
        let listeners = {
            let entries = self.entries.borrow();
            let Some(top) = entries.last().filter(|top| top.id == id) else {
                return;
            };
            let Some(element) = top.element.upgrade() else {
                return;
            };
            let ignored = top
                .listeners
                .ignore
                .iter()
                .filter_map(WeakElement::upgrade)
                .any(|el| event.passes_through(&el));
            if ignored || event.passes_through(&element) {
                return;
            }
            top.listeners.clone()
        };
        tracing::trace!(target: "trellis_layer::stack", ?id, "outside click on top layer");
        listeners.click_outside(event);
    }

    /// Remove `id` and every layer nested under it.
    fn remove(&self, id: LayerId) {
        let (removed, empty) = {
            let mut entries = self.entries.borrow_mut();
            let mut doomed: Vec<LayerId> = Vec::new();
            for entry in entries.iter() {
                if entry.id == id || entry.parent.is_some_and(|p| doomed.contains(&p)) {
                    doomed.push(entry.id);
                }
            }
            let (removed, kept): (Vec<Entry>, Vec<Entry>) = core::mem::take(&mut *entries)
                .into_iter()
                .partition(|e| doomed.contains(&e.id));
            *entries = kept;
            (removed, entries.is_empty())
        };
        // Listeners may own other layers; drop them with no borrow held.
        if removed.is_empty() {
            return;
        }
        tracing::trace!(target: "trellis_layer::stack", ?id, removed = removed.len(), "layer removed");
        drop(removed);
        if empty {
            self.release();
        }
    }
}

/// The process-wide stack of open overlay layers.
///
/// - A layer is in the stack from [`push`](Self::push) until its [`Layer`]
///   handle is disposed or dropped. Removal may happen in any order.
/// - Escape and outside clicks reach only the top layer, so nested overlays
///   close innermost first without coordinating with each other.
/// - While the stack is non-empty, background pointer events are disabled
///   and page scroll is locked. Both engage on the 0 → 1 transition and are
///   released exactly once on the 1 → 0 transition.
/// - Disposing a layer also removes the layers pushed as its children. A
///   child removed this way is not told; disposing its handle later does
///   nothing and [`Layer::is_top`] reports `false`.
///
/// Cloning yields another handle to the same stack.
#[derive(Clone)]
pub struct LayerStack {
    inner: Rc<StackInner>,
}

impl fmt::Debug for LayerStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerStack")
            .field("len", &self.len())
            .field("top", &self.top())
            .field("suppressed", &self.is_suppressed())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "std")]
std::thread_local! {
    static GLOBAL: RefCell<Option<LayerStack>> = const { RefCell::new(None) };
}

impl LayerStack {
    /// An empty stack with its own outside-click hub.
    pub fn new(platform: PlatformRef) -> Self {
        let hub = OutsideClickHub::new(platform.clone());
        Self::with_hub(platform, hub)
    }

    /// An empty stack sharing `hub` with other outside-click consumers.
    pub fn with_hub(platform: PlatformRef, hub: OutsideClickHub) -> Self {
        Self {
            inner: Rc::new(StackInner {
                platform,
                clicks: hub,
                entries: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                engaged: Cell::new(false),
                key_listener: Cell::new(None),
            }),
        }
    }

    /// The calling thread's shared stack, created over `platform` on first use.
    ///
    /// Later calls return the same stack and ignore `platform`.
    #[cfg(feature = "std")]
    pub fn global(platform: &PlatformRef) -> Self {
        GLOBAL.with(|global| {
            global
                .borrow_mut()
                .get_or_insert_with(|| Self::new(platform.clone()))
                .clone()
        })
    }

    /// Reset and forget the calling thread's shared stack.
    #[cfg(feature = "std")]
    pub fn reset_global() {
        let stack = GLOBAL.with(|global| global.borrow_mut().take());
        if let Some(stack) = stack {
            stack.reset();
        }
    }

    /// The outside-click hub layers subscribe through.
    #[must_use]
    pub fn hub(&self) -> &OutsideClickHub {
        &self.inner.clicks
    }

    /// Push a layer for `element`; it becomes the top layer.
    pub fn push(&self, element: &ElementRef, listeners: LayerListeners) -> Layer {
        self.push_entry(None, element, listeners)
    }

    /// Push a layer nested under `parent`, removed along with it.
    pub fn push_child(&self, parent: &Layer, element: &ElementRef, listeners: LayerListeners) -> Layer {
        self.push_entry(Some(parent.id), element, listeners)
    }

    fn push_entry(&self, parent: Option<LayerId>, element: &ElementRef, listeners: LayerListeners) -> Layer {
        let id = LayerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        let depth = {
            let mut entries = self.inner.entries.borrow_mut();
            entries.push(Entry {
                id,
                parent,
                element: element.downgrade(),
                listeners,
            });
            entries.len()
        };
        tracing::trace!(target: "trellis_layer::stack", ?id, ?parent, depth, "layer pushed");
        if depth == 1 {
            self.inner.engage();
        }

        let weak = Rc::downgrade(&self.inner);
        let clicks = self.inner.clicks.subscribe(move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.on_pointer_down(id, event);
            }
        });
        Layer {
            id,
            stack: Rc::downgrade(&self.inner),
            clicks,
        }
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    /// Returns `true` if no layer is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    /// The most recently pushed layer still in the stack.
    #[must_use]
    pub fn top(&self) -> Option<LayerId> {
        self.inner.top()
    }

    /// Layer ids, bottom to top.
    #[must_use]
    pub fn ids(&self) -> Vec<LayerId> {
        self.inner.entries.borrow().iter().map(|e| e.id).collect()
    }

    /// Returns `true` while background interaction is suppressed.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.inner.engaged.get()
    }

    /// Drop every layer without notifying anyone and release suppression.
    ///
    /// Outstanding [`Layer`] handles become inert.
    pub fn reset(&self) {
        let cleared = core::mem::take(&mut *self.inner.entries.borrow_mut());
        tracing::debug!(target: "trellis_layer::stack", cleared = cleared.len(), "stack reset");
        drop(cleared);
        self.inner.release();
    }
}

/// One open layer. Dropping or disposing it removes it from the stack.
#[must_use = "dropping a Layer removes it from the stack"]
pub struct Layer {
    id: LayerId,
    stack: Weak<StackInner>,
    clicks: Disposer,
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("mounted", &self.is_mounted())
            .field("top", &self.is_top())
            .finish()
    }
}

impl Layer {
    /// This layer's id.
    #[must_use]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Returns `true` if this is the top layer.
    #[must_use]
    pub fn is_top(&self) -> bool {
        self.stack
            .upgrade()
            .is_some_and(|inner| inner.top() == Some(self.id))
    }

    /// Returns `true` while this layer is in the stack.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.stack
            .upgrade()
            .is_some_and(|inner| inner.entries.borrow().iter().any(|e| e.id == self.id))
    }

    /// Remove this layer (and its children). Repeated calls do nothing.
    pub fn dispose(&self) {
        self.clicks.dispose();
        if let Some(inner) = self.stack.upgrade() {
            inner.remove(self.id);
        }
    }

    /// Convert into a plain [`Disposer`] for a [`Scope`](trellis_reactive::Scope).
    pub fn into_disposer(self) -> Disposer {
        Disposer::new(move || self.dispose())
    }
}

impl Drop for Layer {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_dom::mock::MockDocument;

    #[test]
    fn suppression_toggles_only_on_empty_transitions() {
        let doc = MockDocument::new();
        let stack = LayerStack::new(Rc::new(doc.clone()));
        let el = doc.create_element("div");
        doc.append(None, &el);

        let a = stack.push(&el.handle(), LayerListeners::new());
        let b = stack.push(&el.handle(), LayerListeners::new());
        assert_eq!(doc.suppress_count(), 1, "1 -> 2 does not engage again");
        assert!(!doc.pointer_events_enabled() && doc.scroll_locked());

        b.dispose();
        assert_eq!(doc.restore_count(), 0, "2 -> 1 does not release");
        a.dispose();
        a.dispose();
        assert_eq!(doc.restore_count(), 1);
        assert!(doc.pointer_events_enabled() && !doc.scroll_locked());
        assert_eq!(doc.key_listener_count(), 0);
    }

    #[test]
    fn reset_clears_and_makes_handles_inert() {
        let doc = MockDocument::new();
        let stack = LayerStack::new(Rc::new(doc.clone()));
        let el = doc.create_element("div");
        doc.append(None, &el);

        let layer = stack.push(&el.handle(), LayerListeners::new());
        stack.reset();
        assert!(stack.is_empty() && !stack.is_suppressed());
        assert!(!layer.is_mounted());

        let _fresh = stack.push(&el.handle(), LayerListeners::new());
        drop(layer);
        assert_eq!(stack.len(), 1, "an inert handle cannot remove a newer layer");
    }
}
