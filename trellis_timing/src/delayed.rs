// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounced open/close for hover-driven disclosure.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;
use core::time::Duration;

use trellis_reactive::Disposer;

use crate::scheduler::{SchedulerRef, TimerId};

/// Default delays for [`DelayedOpen`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DelayedOpenOptions {
    /// Delay used by `open(None)`.
    pub open_delay: Duration,
    /// Delay used by `close(None)`.
    pub close_delay: Duration,
}

impl DelayedOpenOptions {
    /// The same delay in both directions.
    #[must_use]
    pub fn symmetric(delay: Duration) -> Self {
        Self {
            open_delay: delay,
            close_delay: delay,
        }
    }
}

struct Inner {
    scheduler: SchedulerRef,
    on_open: Rc<dyn Fn()>,
    on_close: Rc<dyn Fn()>,
    options: DelayedOpenOptions,
    pending: Cell<Option<TimerId>>,
}

impl Inner {
    fn cancel(&self) {
        if let Some(id) = self.pending.take()
            && self.scheduler.cancel(id)
        {
            tracing::trace!(target: "trellis_timing", ?id, "cancelled pending transition");
        }
    }

    fn run(self: &Rc<Self>, delay: Duration, action: Rc<dyn Fn()>, label: &'static str) {
        self.cancel();
        if delay.is_zero() {
            action();
            return;
        }
        let weak = Rc::downgrade(self);
        let slot: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
        let own_id = slot.clone();
        let id = self.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    if inner.pending.get() == own_id.get() {
                        inner.pending.set(None);
                    }
                    action();
                }
            }),
        );
        slot.set(Some(id));
        self.pending.set(Some(id));
        tracing::trace!(target: "trellis_timing", ?id, ?delay, transition = label, "scheduled");
    }
}

/// Coordinates hover-driven open/close with at most one pending transition.
///
/// Every [`open`](Self::open) or [`close`](Self::close) cancels whatever is
/// pending, in either direction, before acting. A zero delay acts
/// synchronously with no timer. Dropping the coordinator (or disposing its
/// [`disposer`](Self::disposer)) cancels the pending timer, so a delayed
/// callback never reaches a torn-down widget.
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
/// use trellis_timing::{DelayedOpen, DelayedOpenOptions, ManualScheduler};
///
/// let clock = ManualScheduler::new();
/// let open = Rc::new(Cell::new(false));
/// let (on_open, on_close) = (open.clone(), open.clone());
/// let hover = DelayedOpen::new(
///     Rc::new(clock.clone()),
///     move || on_open.set(true),
///     move || on_close.set(false),
///     DelayedOpenOptions::symmetric(Duration::from_millis(100)),
/// );
///
/// hover.open(None);
/// clock.advance(Duration::from_millis(50));
/// hover.close(None); // pointer left before the submenu opened
/// clock.advance(Duration::from_millis(200));
/// assert!(!open.get());
///
/// hover.open(Some(Duration::ZERO));
/// assert!(open.get(), "zero delay acts synchronously");
/// ```
pub struct DelayedOpen {
    inner: Rc<Inner>,
}

impl fmt::Debug for DelayedOpen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayedOpen")
            .field("options", &self.inner.options)
            .field("pending", &self.inner.pending.get())
            .finish_non_exhaustive()
    }
}

impl DelayedOpen {
    /// Coordinate `on_open`/`on_close` over `scheduler`.
    pub fn new(
        scheduler: SchedulerRef,
        on_open: impl Fn() + 'static,
        on_close: impl Fn() + 'static,
        options: DelayedOpenOptions,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                scheduler,
                on_open: Rc::new(on_open),
                on_close: Rc::new(on_close),
                options,
                pending: Cell::new(None),
            }),
        }
    }

    /// Open after `delay`, or the default open delay when `None`.
    pub fn open(&self, delay: Option<Duration>) {
        let delay = delay.unwrap_or(self.inner.options.open_delay);
        self.inner.run(delay, self.inner.on_open.clone(), "open");
    }

    /// Close after `delay`, or the default close delay when `None`.
    pub fn close(&self, delay: Option<Duration>) {
        let delay = delay.unwrap_or(self.inner.options.close_delay);
        self.inner.run(delay, self.inner.on_close.clone(), "close");
    }

    /// Cancel the pending transition, if any.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Returns `true` while a transition is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.pending.get().is_some()
    }

    /// A disposer that cancels the pending transition, for a widget's teardown scope.
    pub fn disposer(&self) -> Disposer {
        let weak = Rc::downgrade(&self.inner);
        Disposer::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.cancel();
            }
        })
    }
}

impl Drop for DelayedOpen {
    fn drop(&mut self) {
        self.inner.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    fn recorder(clock: &ManualScheduler, options: DelayedOpenOptions) -> (DelayedOpen, Rc<RefCell<Vec<&'static str>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (open_log, close_log) = (log.clone(), log.clone());
        let delayed = DelayedOpen::new(
            Rc::new(clock.clone()),
            move || open_log.borrow_mut().push("open"),
            move || close_log.borrow_mut().push("close"),
            options,
        );
        (delayed, log)
    }

    #[test]
    fn at_most_one_transition_is_pending() {
        let clock = ManualScheduler::new();
        let (delayed, log) = recorder(&clock, DelayedOpenOptions::symmetric(Duration::from_millis(100)));

        delayed.open(None);
        delayed.open(None);
        delayed.close(None);
        assert_eq!(clock.pending(), 1);
        assert!(delayed.is_pending());

        clock.advance(Duration::from_millis(100));
        assert_eq!(*log.borrow(), ["close"]);
        assert!(!delayed.is_pending());
    }

    #[test]
    fn zero_delay_cancels_pending_and_runs_now() {
        let clock = ManualScheduler::new();
        let (delayed, log) = recorder(&clock, DelayedOpenOptions {
            open_delay: Duration::from_millis(100),
            close_delay: Duration::ZERO,
        });

        delayed.open(None);
        delayed.close(None);
        assert_eq!(*log.borrow(), ["close"]);
        assert_eq!(clock.pending(), 0);
        clock.advance(Duration::from_secs(1));
        assert_eq!(*log.borrow(), ["close"], "the cancelled open never fires");
    }

    #[test]
    fn teardown_cancels_pending_timers() {
        let clock = ManualScheduler::new();
        let (delayed, log) = recorder(&clock, DelayedOpenOptions::symmetric(Duration::from_millis(10)));
        delayed.open(None);
        let disposer = delayed.disposer();
        disposer.dispose();
        disposer.dispose();
        assert_eq!(clock.pending(), 0);

        delayed.close(None);
        drop(delayed);
        clock.advance(Duration::from_millis(50));
        assert!(log.borrow().is_empty());
    }
}
