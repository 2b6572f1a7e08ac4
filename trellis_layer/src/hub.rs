// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared window `pointerdown` listener behind outside-click detection.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;
use trellis_dom::{
    ElementRef, GlobalListener, ListenerId, PlatformRef, PointerEvent, PointerListener, WeakElement,
};
use trellis_reactive::{Disposer, Signal};

struct HubInner {
    platform: PlatformRef,
    subscribers: RefCell<SmallVec<[(u64, PointerListener); 4]>>,
    next_id: Cell<u64>,
    listener: Cell<Option<ListenerId>>,
}

impl HubInner {
    fn dispatch(&self, event: &PointerEvent) {
        let snapshot: SmallVec<[(u64, PointerListener); 4]> = self.subscribers.borrow().clone();
        for (id, callback) in snapshot {
            // A subscriber removed by an earlier one in this dispatch is skipped.
            if self.subscribers.borrow().iter().any(|(s, _)| *s == id) {
                callback(event);
            }
        }
    }

    fn remove(&self, id: u64) {
        let empty = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|(s, _)| *s != id);
            subscribers.is_empty()
        };
        if empty && let Some(listener) = self.listener.take() {
            self.platform.remove_global_listener(listener);
            tracing::debug!(target: "trellis_layer::hub", ?listener, "removed shared pointerdown listener");
        }
    }
}

/// One window `pointerdown` listener (capture phase, passive) multiplexed
/// across every outside-click consumer.
///
/// The platform listener is installed when the first subscriber arrives and
/// removed when the last one leaves, so overlapping consumers never install
/// it twice or leak it. Subscribers run in subscription order.
#[derive(Clone)]
pub struct OutsideClickHub {
    inner: Rc<HubInner>,
}

impl fmt::Debug for OutsideClickHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutsideClickHub")
            .field("subscribers", &self.subscriber_count())
            .field("installed", &self.is_installed())
            .finish_non_exhaustive()
    }
}

impl OutsideClickHub {
    /// A hub with no subscribers and nothing installed.
    pub fn new(platform: PlatformRef) -> Self {
        Self {
            inner: Rc::new(HubInner {
                platform,
                subscribers: RefCell::new(SmallVec::new()),
                next_id: Cell::new(0),
                listener: Cell::new(None),
            }),
        }
    }

    /// Receive every window `pointerdown` until the disposer runs.
    pub fn subscribe(&self, callback: impl Fn(&PointerEvent) + 'static) -> Disposer {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));

        if self.inner.listener.get().is_none() {
            let weak: Weak<HubInner> = Rc::downgrade(&self.inner);
            let listener = self
                .inner
                .platform
                .add_global_listener(GlobalListener::PointerDown(Rc::new(move |event: &PointerEvent| {
                    if let Some(inner) = weak.upgrade() {
                        inner.dispatch(event);
                    }
                })));
            self.inner.listener.set(Some(listener));
            tracing::debug!(target: "trellis_layer::hub", ?listener, "installed shared pointerdown listener");
        }

        let weak = Rc::downgrade(&self.inner);
        Disposer::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove(id);
            }
        })
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Returns `true` while the platform listener is installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.inner.listener.get().is_some()
    }
}

/// Options for [`click_outside`].
#[derive(Clone, Debug, Default)]
pub struct ClickOutsideOptions {
    /// Elements whose clicks never count as outside.
    pub ignore: Vec<WeakElement>,
    /// Keeps the subscription only while `true`. `None` means always active.
    pub active: Option<Signal<bool>>,
}

impl ClickOutsideOptions {
    /// Add `element` to the ignore list.
    #[must_use]
    pub fn with_ignore(mut self, element: &ElementRef) -> Self {
        self.ignore.push(element.downgrade());
        self
    }

    /// Subscribe only while `active` holds `true`.
    #[must_use]
    pub fn with_active(mut self, active: Signal<bool>) -> Self {
        self.active = Some(active);
        self
    }
}

/// Call `listener` for every `pointerdown` outside `target`.
///
/// Presses on `target` or its descendants never count. The ignore list is
/// consulted only for events with `detail == 0`; any other event reuses the
/// verdict of the last such event (initially "outside"). The subscription
/// follows `options.active` when given. The returned disposer tears down
/// both the subscription and the `active` watcher.
pub fn click_outside(
    hub: &OutsideClickHub,
    target: &ElementRef,
    listener: impl Fn(&PointerEvent) + 'static,
    options: ClickOutsideOptions,
) -> Disposer {
    let target = target.downgrade();
    let ignore = options.ignore;
    let is_outside = Cell::new(true);
    let handler: PointerListener = Rc::new(move |event: &PointerEvent| {
        let Some(target) = target.upgrade() else {
            return;
        };
        if event.passes_through(&target) {
            return;
        }
        if event.detail == 0 {
            let ignored = ignore
                .iter()
                .filter_map(WeakElement::upgrade)
                .any(|el| event.passes_through(&el));
            is_outside.set(!ignored);
        }
        if is_outside.get() {
            listener(event);
        }
    });

    let registration: Rc<RefCell<Option<Disposer>>> = Rc::new(RefCell::new(None));
    let register = {
        let hub = hub.clone();
        let handler = handler.clone();
        let registration = registration.clone();
        move |active: bool| {
            let mut slot = registration.borrow_mut();
            match (active, slot.is_some()) {
                (true, false) => {
                    let handler = handler.clone();
                    *slot = Some(hub.subscribe(move |event| handler(event)));
                }
                (false, true) => {
                    if let Some(disposer) = slot.take() {
                        drop(slot);
                        disposer.dispose();
                    }
                }
                _ => {}
            }
        }
    };

    let watcher = match &options.active {
        Some(active) => {
            register(active.get());
            active.subscribe(move |active, _| register(*active))
        }
        None => {
            register(true);
            Disposer::noop()
        }
    };

    Disposer::new(move || {
        watcher.dispose();
        if let Some(disposer) = registration.borrow_mut().take() {
            disposer.dispose();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_dom::mock::MockDocument;

    #[test]
    fn listener_is_shared_and_torn_down_with_the_last_subscriber() {
        let doc = MockDocument::new();
        let hub = OutsideClickHub::new(Rc::new(doc.clone()));

        let a = hub.subscribe(|_| {});
        let b = hub.subscribe(|_| {});
        assert_eq!(doc.pointer_listener_count(), 1, "installed once");

        a.dispose();
        assert_eq!(doc.pointer_listener_count(), 1);
        b.dispose();
        b.dispose();
        assert_eq!(doc.pointer_listener_count(), 0);
        assert!(!hub.is_installed());

        let _c = hub.subscribe(|_| {});
        assert_eq!(doc.pointer_listener_count(), 1, "reinstalled on demand");
    }

    #[test]
    fn subscriber_removed_mid_dispatch_is_skipped() {
        let doc = MockDocument::new();
        let hub = OutsideClickHub::new(Rc::new(doc.clone()));
        let body = doc.create_element("body");
        doc.append(None, &body);

        let second: Rc<RefCell<Option<Disposer>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(Cell::new(0));
        let slot = second.clone();
        let _first = hub.subscribe(move |_| {
            if let Some(d) = slot.borrow_mut().take() {
                d.dispose();
            }
        });
        let counter = hits.clone();
        *second.borrow_mut() = Some(hub.subscribe(move |_| counter.set(counter.get() + 1)));

        doc.pointer_down(&body, 1);
        assert_eq!(hits.get(), 0);
    }
}
