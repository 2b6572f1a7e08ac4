// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Layer: dismissal coordination for stacked overlays.
//!
//! Menus, dropdown panels, and dialogs open on top of each other. This crate
//! keeps them from fighting over the same input:
//!
//! - [`LayerStack`]: the process-wide stack of open layers. Escape and
//!   outside clicks reach only the top layer; background pointer events and
//!   page scroll are suppressed while any layer is open.
//! - [`OutsideClickHub`] and [`click_outside`]: one shared window
//!   `pointerdown` listener multiplexed across every outside-click consumer,
//!   installed on the first subscriber and removed after the last.
//! - [`EscapeKeyHub`]: Escape broadcast to every subscriber.
//! - [`FocusTrap`]: Tab containment with focus restore on deactivation.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use trellis_dom::mock::MockDocument;
//! use trellis_dom::{Key, KeyboardEvent};
//! use trellis_layer::{LayerListeners, LayerStack};
//!
//! let doc = MockDocument::new();
//! let stack = LayerStack::new(Rc::new(doc.clone()));
//! let (menu, submenu) = (doc.create_element("div"), doc.create_element("div"));
//! doc.append(None, &menu);
//! doc.append(None, &submenu);
//!
//! let closed = Rc::new(Cell::new(""));
//! let (a, b) = (closed.clone(), closed.clone());
//! let _menu = stack.push(&menu.handle(), LayerListeners::new().on_dismiss(move |_| a.set("menu")));
//! let _sub = stack.push(&submenu.handle(), LayerListeners::new().on_dismiss(move |_| b.set("submenu")));
//! assert!(!doc.pointer_events_enabled());
//!
//! doc.key_down(KeyboardEvent::new(Key::Escape));
//! assert_eq!(closed.get(), "submenu", "only the top layer hears Escape");
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables [`LayerStack::global`], a per-thread shared
//!   stack with [`LayerStack::reset_global`] for test isolation.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod escape;
mod focus_trap;
mod hub;
mod stack;

pub use escape::EscapeKeyHub;
pub use focus_trap::{FocusTrap, FocusTrapOptions};
pub use hub::{ClickOutsideOptions, OutsideClickHub, click_outside};
pub use stack::{DismissEvent, Layer, LayerId, LayerListeners, LayerStack};
