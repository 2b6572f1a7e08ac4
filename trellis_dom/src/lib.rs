// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis DOM: the host seam shared by every Trellis widget core.
//!
//! Widget cores never create or own rendered nodes. They hold handles to
//! elements the host rendered, read a few standard event fields, and call a
//! handful of imperative APIs. This crate names exactly that surface:
//!
//! - [`Element`]: focus, attributes, classes, disabled/connected state, and
//!   [`DocumentPosition`] for document ordering.
//! - [`ElementRef`] / [`WeakElement`]: identity-compared shared and
//!   non-owning handles.
//! - [`KeyboardEvent`], [`PointerEvent`], [`FocusEvent`]: the event fields
//!   the cores read, plus default-prevention and propagation flags.
//! - [`Platform`]: process-wide hooks (active element, global listeners,
//!   background pointer/scroll suppression).
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_dom::{Key, KeyboardEvent, Modifiers};
//!
//! let mut ev = KeyboardEvent::new(Key::from_dom("ArrowDown"));
//! assert_eq!(ev.key, Key::ArrowDown);
//! assert!(ev.modifiers.is_empty());
//!
//! ev.prevent_default();
//! ev.stop_propagation();
//! assert!(ev.is_default_prevented());
//! assert!(ev.is_propagation_stopped());
//! # let _ = Modifiers::SHIFT;
//! ```
//!
//! ## Features
//!
//! - `mock`: enables [`mock`], an in-memory document that implements
//!   [`Platform`] and records every side effect for assertions.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod element;
mod event;
mod key;
mod platform;

#[cfg(feature = "mock")]
pub mod mock;

pub use element::{DocumentPosition, Element, ElementRef, WeakElement};
pub use event::{FocusEvent, KeyboardEvent, PointerEvent};
pub use key::{Key, Modifiers};
pub use platform::{GlobalListener, KeyListener, ListenerId, Platform, PlatformRef, PointerListener};
