// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Selection: selection and expansion state for widget roots.
//!
//! Accordions (which items are expanded), chip groups, and selectable lists
//! (which values are selected) all hold the same kind of state: either one
//! optional value or an ordered sequence of values. This crate models that
//! as the tagged [`SelectionValue`] and applies the transition rules through
//! one pure function, [`transition`], rather than per-mode strategy types.
//!
//! - [`SelectionEngine`]: the root-owned engine with a fixed
//!   deselect-on-reselect policy, backed by a
//!   [`ControllableState`](trellis_reactive::ControllableState) so the value
//!   can be caller-controlled.
//! - [`SelectionScope`]: a lighter holder whose callers decide per gesture
//!   whether reselecting deselects.
//!
//! Switching multiplicity is a deliberate reset point: the current value is
//! discarded and replaced with the new shape's empty value.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_selection::{SelectionEngine, SelectionOptions, SelectionValue};
//!
//! // A single-select accordion whose items collapse when clicked again.
//! let expanded = SelectionEngine::<&str>::uncontrolled(SelectionOptions {
//!     multiple: false,
//!     deselect_on_reselect: true,
//! });
//!
//! expanded.select("a");
//! assert!(expanded.is_selected(&"a"));
//! expanded.select("b");
//! assert_eq!(expanded.selected(), SelectionValue::Single(Some("b")));
//! expanded.select("b");
//! assert!(expanded.selected().is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod engine;
mod scope;
mod value;

pub use engine::{SelectionEngine, SelectionOptions};
pub use scope::SelectionScope;
pub use value::{SelectionMode, SelectionValue, transition};
