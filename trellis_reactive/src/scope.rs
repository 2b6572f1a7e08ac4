// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Disposers and disposal scopes.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

/// A one-shot cleanup action.
///
/// [`dispose`](Self::dispose) runs the action at most once; later calls are
/// no-ops. Dropping a disposer disposes it, so a registration lives exactly
/// as long as its disposer unless [`forget`](Self::forget) is used.
#[must_use = "dropping a Disposer runs it immediately"]
pub struct Disposer {
    action: Cell<Option<Box<dyn FnOnce()>>>,
}

impl Disposer {
    /// Wrap a cleanup action.
    pub fn new(action: impl FnOnce() + 'static) -> Self {
        Self {
            action: Cell::new(Some(Box::new(action))),
        }
    }

    /// A disposer with nothing to clean up.
    pub fn noop() -> Self {
        Self {
            action: Cell::new(None),
        }
    }

    /// Run the cleanup action if it has not run yet.
    pub fn dispose(&self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }

    /// Returns `true` once the action ran (or there was none).
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        let action = self.action.take();
        let disposed = action.is_none();
        self.action.set(action);
        disposed
    }

    /// Detach without running the action; the registration stays alive for
    /// as long as its owner does.
    pub fn forget(self) {
        drop(self.action.take());
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// A collection of disposers owned by one widget instance.
///
/// [`dispose`](Self::dispose) runs every collected disposer once, in
/// registration order. Disposers added after the scope was disposed run
/// immediately, so nothing registered into a torn-down widget can leak.
#[derive(Default)]
pub struct Scope {
    disposers: RefCell<Vec<Disposer>>,
    disposed: Cell<bool>,
}

impl Scope {
    /// Create an empty, live scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `disposer`.
    pub fn add(&self, disposer: Disposer) {
        if self.disposed.get() {
            disposer.dispose();
            return;
        }
        self.disposers.borrow_mut().push(disposer);
    }

    /// Register a cleanup closure.
    pub fn on_dispose(&self, action: impl FnOnce() + 'static) {
        self.add(Disposer::new(action));
    }

    /// Run all collected disposers. Idempotent.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        // Disposers may register more cleanup while running; those run immediately.
        let disposers = core::mem::take(&mut *self.disposers.borrow_mut());
        for disposer in &disposers {
            disposer.dispose();
        }
    }

    /// Returns `true` once [`dispose`](Self::dispose) ran.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Number of disposers still pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.disposers.borrow().len()
    }

    /// Returns `true` if no disposers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.disposers.borrow().is_empty()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("pending", &self.len())
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;

    #[test]
    fn disposer_runs_once() {
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let disposer = Disposer::new(move || counter.set(counter.get() + 1));

        assert!(!disposer.is_disposed());
        disposer.dispose();
        disposer.dispose();
        drop(disposer);
        assert_eq!(runs.get(), 1, "double dispose and drop must not rerun the action");
    }

    #[test]
    fn forget_skips_the_action() {
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        Disposer::new(move || counter.set(counter.get() + 1)).forget();
        assert_eq!(runs.get(), 0);
    }

    #[test]
    fn scope_disposes_in_order_and_late_additions_run_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let scope = Scope::new();
        for i in 0..3 {
            let log = log.clone();
            scope.on_dispose(move || log.borrow_mut().push(i));
        }
        assert_eq!(scope.len(), 3);

        scope.dispose();
        scope.dispose();
        assert_eq!(*log.borrow(), [0, 1, 2]);
        assert!(scope.is_empty());

        let late = log.clone();
        scope.on_dispose(move || late.borrow_mut().push(99));
        assert_eq!(*log.borrow(), [0, 1, 2, 99]);
    }
}
