// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Navigation: keyboard movement through a group of items.
//!
//! Three policies share one vocabulary of [`Intent`]s:
//!
//! - [`resolve_intent`] maps a key press to `Next`/`Prev`/`First`/`Last` for
//!   an [`Orientation`], and [`step`] applies an intent to an index with or
//!   without wrapping.
//! - [`RovingFocus`] moves **real** input focus among a
//!   [`Collection`](trellis_collection::Collection)'s enabled items (tab
//!   lists, toolbars, chip groups).
//! - [`HighlightTracker`] moves a **virtual** highlight while focus stays on
//!   a popup (menus, listboxes).
//! - [`ListNavigation`] is the modifier-aware vertical variant used by
//!   accordions.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::rc::Rc;
//! use trellis_collection::{Collection, ItemData};
//! use trellis_dom::mock::MockDocument;
//! use trellis_dom::{Key, KeyboardEvent};
//! use trellis_navigation::{Orientation, RovingFocus, RovingFocusOptions};
//!
//! let doc = MockDocument::new();
//! let tabs = Collection::new();
//! let mut buttons = Vec::new();
//! let mut registrations = Vec::new();
//! for name in ["a", "b", "c", "d"] {
//!     let button = doc.create_element("button");
//!     doc.append(None, &button);
//!     registrations.push(tabs.register(ItemData::new(name, &button.handle())));
//!     buttons.push(button);
//! }
//!
//! let roving = RovingFocus::new(
//!     Rc::new(doc.clone()),
//!     tabs,
//!     RovingFocusOptions { orientation: Orientation::Horizontal, ..Default::default() },
//! );
//! let mut end = KeyboardEvent::new(Key::End).with_target(buttons[0].handle());
//! roving.on_key_down(&mut end);
//! assert!(buttons[3].is_focused());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod highlight;
mod intent;
mod list;
mod roving;

pub use highlight::{HighlightOptions, HighlightTracker};
pub use intent::{
    Intent, Orientation, WrapMode, consume_navigation_key, is_navigation_key, resolve_intent, step,
};
pub use list::ListNavigation;
pub use roving::{EntryFocus, RovingFocus, RovingFocusOptions, focus_first};
