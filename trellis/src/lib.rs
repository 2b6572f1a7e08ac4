// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis: headless widget cores.
//!
//! Each widget here is behavior only. It owns state, reacts to the DOM
//! events a host forwards to it, and writes ARIA attributes and state classes
//! onto elements the host binds. Rendering, styling, and positioning stay
//! with the host.
//!
//! - [`Accordion`] / [`AccordionItem`]: disclosure items with single or
//!   multiple expansion and arrow-key navigation between triggers.
//! - [`ChipGroup`] / [`Chip`]: toggle chips over a shared selection.
//! - [`ListSelection`] / [`ListItem`]: a selectable list with a value registry.
//! - [`Menu`] / [`MenuItem`]: menus and hover-opened submenus with a virtual
//!   highlight and stacked dismissal.
//! - [`DropdownAria`]: the trigger/popup ARIA contract on its own.
//! - [`single_child`]: the check for wrappers that render through one child.
//!
//! Parts that need an ancestor take it as `Option<&Ancestor>` and fail with
//! [`ContextError`](trellis_reactive::ContextError) when it is missing.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::rc::Rc;
//! use trellis::{Accordion, AccordionItem, AccordionItemOptions, AccordionOptions};
//! use trellis_collection::IdRegistry;
//! use trellis_dom::Element;
//! use trellis_dom::mock::MockDocument;
//!
//! let doc = MockDocument::new();
//! let accordion = Accordion::new(Rc::new(doc.clone()), IdRegistry::new(), AccordionOptions::default());
//! let item = AccordionItem::new(Some(&accordion), AccordionItemOptions::default()).unwrap();
//!
//! let trigger = doc.create_element("button");
//! doc.append(None, &trigger);
//! item.bind_trigger(&trigger.handle());
//! assert_eq!(trigger.attribute("aria-expanded").as_deref(), Some("false"));
//!
//! item.on_trigger_click();
//! assert_eq!(trigger.attribute("aria-expanded").as_deref(), Some("true"));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables [`MenuEnv::global`] on the per-thread shared
//!   layer stack.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod accordion;
mod attrs;
mod chip;
mod dropdown;
mod error;
mod listbox;
mod menu;
mod single_child;

pub use accordion::{Accordion, AccordionItem, AccordionItemOptions, AccordionOptions};
pub use chip::{Chip, ChipGroup, ChipGroupOptions};
pub use dropdown::{DropdownAria, DropdownAriaOptions, PopupRole};
pub use error::{Error, StructureError};
pub use listbox::{ListItem, ListSelection, ListSelectionOptions};
pub use menu::{Menu, MenuEnv, MenuItem, MenuItemOptions, MenuOptions};
pub use single_child::{ChildNode, single_child};
