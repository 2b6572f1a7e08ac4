// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The timer seam and a manually advanced implementation of it.

use alloc::boxed::Box;
use alloc::collections::BinaryHeap;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::cmp::Reverse;
use core::fmt;
use core::time::Duration;

use slotmap::{Key, KeyData, SlotMap};

/// Identifies a scheduled timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// A one-shot timer callback.
pub type TimerCallback = Box<dyn FnOnce()>;

/// One-shot timers, as provided by the host's event loop (`setTimeout` on the web).
///
/// Callbacks run on the same thread, between event dispatches, never nested
/// inside [`schedule`](Self::schedule).
pub trait Scheduler {
    /// Run `callback` once after `delay`.
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel a pending timer. Returns `true` if it was still pending.
    fn cancel(&self, id: TimerId) -> bool;
}

/// Shared handle to a scheduler.
pub type SchedulerRef = Rc<dyn Scheduler>;

slotmap::new_key_type! {
    struct TimerKey;
}

struct Timer {
    due: Duration,
    callback: Option<TimerCallback>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    seq: u64,
    timers: SlotMap<TimerKey, Timer>,
    queue: BinaryHeap<Reverse<(Duration, u64, u64)>>,
}

/// A virtual clock for tests and headless hosts.
///
/// Time moves only through [`advance`](Self::advance). Timers fire in due
/// order, ties in scheduling order, and a callback may schedule or cancel
/// other timers; new timers that fall due within the same advance also fire.
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
/// use trellis_timing::{ManualScheduler, Scheduler};
///
/// let clock = ManualScheduler::new();
/// let fired = Rc::new(Cell::new(false));
/// let flag = fired.clone();
/// clock.schedule(Duration::from_millis(100), Box::new(move || flag.set(true)));
///
/// clock.advance(Duration::from_millis(99));
/// assert!(!fired.get());
/// clock.advance(Duration::from_millis(1));
/// assert!(fired.get());
/// assert_eq!(clock.pending(), 0);
/// ```
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.timers.len())
            .finish()
    }
}

impl ManualScheduler {
    /// A clock at time zero with nothing scheduled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Number of timers still pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Move the clock forward by `by`, firing every timer that falls due.
    ///
    /// Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut fired = 0;
        while let Some(callback) = self.pop_due(target) {
            callback();
            fired += 1;
        }
        self.state.borrow_mut().now = target;
        fired
    }

    fn pop_due(&self, target: Duration) -> Option<TimerCallback> {
        let mut state = self.state.borrow_mut();
        loop {
            let Reverse((due, _, raw)) = *state.queue.peek()?;
            if due > target {
                return None;
            }
            state.queue.pop();
            let key = TimerKey::from(KeyData::from_ffi(raw));
            // Cancelled timers leave stale queue entries behind.
            if let Some(mut timer) = state.timers.remove(key) {
                state.now = timer.due;
                if let Some(callback) = timer.callback.take() {
                    return Some(callback);
                }
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let mut state = self.state.borrow_mut();
        let due = state.now + delay;
        let key = state.timers.insert(Timer {
            due,
            callback: Some(callback),
        });
        let raw = key.data().as_ffi();
        state.seq += 1;
        let seq = state.seq;
        state.queue.push(Reverse((due, seq, raw)));
        TimerId(raw)
    }

    fn cancel(&self, id: TimerId) -> bool {
        let key = TimerKey::from(KeyData::from_ffi(id.0));
        self.state.borrow_mut().timers.remove(key).is_some()
    }
}
