// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Timing: timers for widget cores.
//!
//! Widget cores never block and never spawn threads; the only suspension
//! points are one-shot timers owned by the host's event loop. This crate names
//! that seam and builds the one timing policy the cores need on top of it:
//!
//! - [`Scheduler`]: schedule/cancel one-shot callbacks. Hosts implement it
//!   over `setTimeout`, a winit event loop, or anything similar.
//! - [`ManualScheduler`]: a deterministic virtual clock for tests and
//!   headless runs.
//! - [`DelayedOpen`]: debounced open/close for hover-driven disclosure such
//!   as submenus, with at most one pending transition at a time.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//! use trellis_timing::{DelayedOpen, DelayedOpenOptions, ManualScheduler};
//!
//! let clock = ManualScheduler::new();
//! let open = Rc::new(Cell::new(false));
//! let (a, b) = (open.clone(), open.clone());
//! let submenu = DelayedOpen::new(
//!     Rc::new(clock.clone()),
//!     move || a.set(true),
//!     move || b.set(false),
//!     DelayedOpenOptions::symmetric(Duration::from_millis(100)),
//! );
//!
//! submenu.open(None);
//! assert!(!open.get());
//! clock.advance(Duration::from_millis(100));
//! assert!(open.get());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod delayed;
mod scheduler;

pub use delayed::{DelayedOpen, DelayedOpenOptions};
pub use scheduler::{ManualScheduler, Scheduler, SchedulerRef, TimerCallback, TimerId};
