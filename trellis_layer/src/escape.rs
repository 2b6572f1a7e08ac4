// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broadcast of the Escape key to every subscriber.

use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;
use trellis_dom::{GlobalListener, Key, KeyListener, KeyboardEvent, ListenerId, PlatformRef};
use trellis_reactive::Disposer;

struct EscapeInner {
    platform: PlatformRef,
    handlers: RefCell<SmallVec<[(u64, KeyListener); 4]>>,
    next_id: Cell<u64>,
    listener: Cell<Option<ListenerId>>,
}

impl EscapeInner {
    fn dispatch(&self, event: &mut KeyboardEvent) {
        if event.key != Key::Escape {
            return;
        }
        let snapshot: SmallVec<[(u64, KeyListener); 4]> = self.handlers.borrow().clone();
        for (id, handler) in snapshot {
            if self.handlers.borrow().iter().any(|(h, _)| *h == id) {
                handler(event);
            }
        }
    }
}

/// Document `keydown` listener that forwards Escape to every handler.
///
/// Unlike the [`LayerStack`](crate::LayerStack), which routes Escape to the
/// top layer only, every subscribed handler runs, in subscription order. The
/// platform listener lives exactly as long as there is a handler.
#[derive(Clone)]
pub struct EscapeKeyHub {
    inner: Rc<EscapeInner>,
}

impl fmt::Debug for EscapeKeyHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EscapeKeyHub")
            .field("handlers", &self.handler_count())
            .field("installed", &self.inner.listener.get().is_some())
            .finish_non_exhaustive()
    }
}

impl EscapeKeyHub {
    /// A hub with no handlers.
    pub fn new(platform: PlatformRef) -> Self {
        Self {
            inner: Rc::new(EscapeInner {
                platform,
                handlers: RefCell::new(SmallVec::new()),
                next_id: Cell::new(0),
                listener: Cell::new(None),
            }),
        }
    }

    /// Run `handler` on every Escape press until the disposer runs.
    pub fn subscribe(&self, handler: impl Fn(&mut KeyboardEvent) + 'static) -> Disposer {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.handlers.borrow_mut().push((id, Rc::new(handler)));

        if self.inner.listener.get().is_none() {
            let weak: Weak<EscapeInner> = Rc::downgrade(&self.inner);
            let listener = self
                .inner
                .platform
                .add_global_listener(GlobalListener::KeyDown(Rc::new(
                    move |event: &mut KeyboardEvent| {
                        if let Some(inner) = weak.upgrade() {
                            inner.dispatch(event);
                        }
                    },
                )));
            self.inner.listener.set(Some(listener));
            tracing::debug!(target: "trellis_layer::escape", ?listener, "installed escape listener");
        }

        let weak = Rc::downgrade(&self.inner);
        Disposer::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let empty = {
                let mut handlers = inner.handlers.borrow_mut();
                handlers.retain(|(h, _)| *h != id);
                handlers.is_empty()
            };
            if empty && let Some(listener) = inner.listener.take() {
                inner.platform.remove_global_listener(listener);
                tracing::debug!(target: "trellis_layer::escape", ?listener, "removed escape listener");
            }
        })
    }

    /// Number of live handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use trellis_dom::mock::MockDocument;

    #[test]
    fn every_handler_sees_escape_and_nothing_else() {
        let doc = MockDocument::new();
        let hub = EscapeKeyHub::new(Rc::new(doc.clone()));
        let log = Rc::new(RefCell::new(Vec::new()));

        let (a, b) = (log.clone(), log.clone());
        let first = hub.subscribe(move |_| a.borrow_mut().push("first"));
        let _second = hub.subscribe(move |ev| {
            ev.prevent_default();
            b.borrow_mut().push("second");
        });
        assert_eq!(doc.key_listener_count(), 1);

        doc.key_down(KeyboardEvent::new(Key::Enter));
        let ev = doc.key_down(KeyboardEvent::new(Key::Escape));
        assert_eq!(*log.borrow(), ["first", "second"]);
        assert!(ev.is_default_prevented());

        first.dispose();
        doc.key_down(KeyboardEvent::new(Key::Escape));
        assert_eq!(*log.borrow(), ["first", "second", "second"]);
    }

    #[test]
    fn listener_follows_handler_count() {
        let doc = MockDocument::new();
        let hub = EscapeKeyHub::new(Rc::new(doc.clone()));
        let handler = hub.subscribe(|_| {});
        drop(handler);
        assert_eq!(hub.handler_count(), 0);
        assert_eq!(doc.key_listener_count(), 0);
    }
}
