// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observable cells.

use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

use crate::scope::Disposer;

type Subscriber<T> = Rc<dyn Fn(&T, &T)>;

struct SignalInner<T> {
    value: RefCell<T>,
    subscribers: RefCell<SmallVec<[(u64, Subscriber<T>); 2]>>,
    next_id: Cell<u64>,
}

/// A shared observable cell.
///
/// Cloning a `Signal` yields another handle to the same cell. Subscribers
/// receive `(new, old)` synchronously from inside [`set`](Self::set), with no
/// borrow held, so they may freely read this signal or write others.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Default + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &*self.inner.value.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    /// Create a cell holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                value: RefCell::new(value),
                subscribers: RefCell::new(SmallVec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` must not write to this signal.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Register `callback`, called with `(new, old)` after every change.
    pub fn subscribe(&self, callback: impl Fn(&T, &T) + 'static) -> Disposer {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));

        let weak: Weak<SignalInner<T>> = Rc::downgrade(&self.inner);
        Disposer::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
            }
        })
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Returns `true` if both handles point at the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    fn notify(&self, old: &T) {
        let current = self.get();
        let subscribers: SmallVec<[Subscriber<T>; 4]> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, s)| s.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(&current, old);
        }
    }
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    /// Store `value`, notifying subscribers if it differs from the current one.
    ///
    /// Returns `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        let old = {
            let mut slot = self.inner.value.borrow_mut();
            if *slot == value {
                return false;
            }
            core::mem::replace(&mut *slot, value)
        };
        self.notify(&old);
        true
    }

    /// Replace the value with `f(current)`. Returns `true` if it changed.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> bool {
        let next = f(&self.inner.value.borrow());
        self.set(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn set_notifies_only_on_change() {
        let signal = Signal::new(1_i32);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let sub = signal.subscribe(move |new, old| log.borrow_mut().push((*new, *old)));

        assert!(signal.set(2));
        assert!(!signal.set(2));
        assert!(signal.update(|v| v * 10));
        assert_eq!(*seen.borrow(), [(2, 1), (20, 2)]);

        sub.dispose();
        signal.set(3);
        assert_eq!(seen.borrow().len(), 2, "disposed subscriber must not run");
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn subscribers_may_write_other_signals_and_read_this_one() {
        let source = Signal::new(0_u8);
        let mirror = Signal::new(0_u8);

        let reader = source.clone();
        let target = mirror.clone();
        source
            .subscribe(move |new, _| {
                assert_eq!(reader.get(), *new, "value is committed before notification");
                target.set(*new);
            })
            .forget();

        source.set(7);
        assert_eq!(mirror.get(), 7);
    }

    #[test]
    fn subscriber_may_unsubscribe_during_notification() {
        let signal = Signal::new(0_u8);
        let slot: Rc<RefCell<Option<Disposer>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(Cell::new(0));

        let inner_slot = slot.clone();
        let counter = hits.clone();
        let sub = signal.subscribe(move |_, _| {
            counter.set(counter.get() + 1);
            if let Some(d) = inner_slot.borrow_mut().take() {
                d.dispose();
            }
        });
        *slot.borrow_mut() = Some(sub);

        signal.set(1);
        signal.set(2);
        assert_eq!(hits.get(), 1);
    }
}
