// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Reactive: explicit observation and scoped cleanup.
//!
//! Widget cores share state through small, explicit primitives rather than
//! implicit dependency tracking:
//!
//! - [`Signal`]: an observable cell with `get`, `set`, and
//!   `subscribe(callback) -> Disposer`. Notification is synchronous: by the
//!   time `set` returns, every subscriber has run.
//! - [`Memo`]: a derived value recomputed on read after an explicit
//!   invalidation (either [`Memo::invalidate`] or a [`Memo::track`]ed source).
//! - [`Disposer`] and [`Scope`]: the scoped-resource pattern. Every
//!   registration hands back a disposer; disposal is idempotent and also runs
//!   on drop. A [`Scope`] runs its disposers exactly once when the owning
//!   widget is torn down.
//! - [`require`]: capability lookup that reports structural misuse as a
//!   [`ContextError`].
//! - [`ControllableState`]: decides once, at construction, whether a value is
//!   owned locally or mirrors a caller-supplied value plus change handler.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use trellis_reactive::{Scope, Signal};
//!
//! let count = Signal::new(0_u32);
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let scope = Scope::new();
//! let log = seen.clone();
//! scope.add(count.subscribe(move |new, old| log.borrow_mut().push((*old, *new))));
//!
//! count.set(1);
//! count.set(1); // unchanged: no notification
//! count.update(|v| v + 1);
//! assert_eq!(*seen.borrow(), vec![(0, 1), (1, 2)]);
//!
//! scope.dispose();
//! count.set(5);
//! assert_eq!(seen.borrow().len(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod context;
mod controllable;
mod memo;
mod scope;
mod signal;

pub use context::{ContextError, require};
pub use controllable::{ControllableState, PropKeys, StateOptions, kebab_case};
pub use memo::Memo;
pub use scope::{Disposer, Scope};
pub use signal::Signal;
