// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived values with explicit invalidation.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::scope::Disposer;
use crate::signal::Signal;

struct MemoInner<T> {
    compute: Box<dyn Fn() -> T>,
    cached: RefCell<Option<T>>,
    sources: RefCell<Vec<Disposer>>,
}

/// A derived value, recomputed on the first read after an invalidation.
///
/// There is no implicit dependency tracking: a memo goes stale only when
/// [`invalidate`](Self::invalidate) is called or a source registered with
/// [`track`](Self::track) changes.
///
/// ```rust
/// use trellis_reactive::{Memo, Signal};
///
/// let items = Signal::new(vec![1, 2, 3]);
/// let source = items.clone();
/// let total = Memo::new(move || source.with(|v| v.iter().sum::<i32>()));
/// total.track(&items);
///
/// assert_eq!(total.get(), 6);
/// items.update(|v| [v.as_slice(), &[4]].concat());
/// assert_eq!(total.get(), 10);
/// ```
pub struct Memo<T> {
    inner: Rc<MemoInner<T>>,
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("fresh", &self.inner.cached.borrow().is_some())
            .field("sources", &self.inner.sources.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> Memo<T> {
    /// Create a memo over `compute`. Nothing is computed until the first read.
    pub fn new(compute: impl Fn() -> T + 'static) -> Self {
        Self {
            inner: Rc::new(MemoInner {
                compute: Box::new(compute),
                cached: RefCell::new(None),
                sources: RefCell::new(Vec::new()),
            }),
        }
    }

    /// The current value, recomputing it if stale.
    #[must_use]
    pub fn get(&self) -> T {
        if let Some(value) = self.inner.cached.borrow().as_ref() {
            return value.clone();
        }
        let value = (self.inner.compute)();
        *self.inner.cached.borrow_mut() = Some(value.clone());
        value
    }

    /// Mark the memo stale.
    pub fn invalidate(&self) {
        self.inner.cached.borrow_mut().take();
    }

    /// Returns `true` if the next read will recompute.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.inner.cached.borrow().is_none()
    }

    /// Invalidate whenever `source` changes. The subscription lives as long as the memo.
    pub fn track<S: 'static>(&self, source: &Signal<S>) -> &Self {
        let weak = Rc::downgrade(&self.inner);
        let disposer = source.subscribe(move |_, _| {
            if let Some(inner) = weak.upgrade() {
                inner.cached.borrow_mut().take();
            }
        });
        self.inner.sources.borrow_mut().push(disposer);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn recomputes_only_after_invalidation() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let memo = Memo::new(move || {
            counter.set(counter.get() + 1);
            counter.get()
        });

        assert!(memo.is_stale());
        assert_eq!(memo.get(), 1);
        assert_eq!(memo.get(), 1);
        memo.invalidate();
        assert_eq!(memo.get(), 2);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn tracked_sources_invalidate() {
        let a = Signal::new(2_i32);
        let b = Signal::new(3_i32);
        let (sa, sb) = (a.clone(), b.clone());
        let product = Memo::new(move || sa.get() * sb.get());
        product.track(&a).track(&b);

        assert_eq!(product.get(), 6);
        b.set(5);
        assert!(product.is_stale());
        assert_eq!(product.get(), 10);
    }
}
