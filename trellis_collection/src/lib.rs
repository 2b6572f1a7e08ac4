// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Collection: identity and item registries for widget cores.
//!
//! A widget root (a menu, a tab list, an accordion) creates a [`Collection`]
//! and hands it down to its items. Each item registers itself when it mounts
//! and keeps the returned [`Registration`] until it unmounts; the root never
//! needs to know its items' identities ahead of time.
//!
//! - [`IdRegistry`] issues unique [`ItemId`]s (`trellis-0`, `trellis-1`, ...)
//!   for the `id`/`aria-*` wiring between widget parts.
//! - [`Collection::items`] returns the currently registered, connected items
//!   in **document order**, recomputed on every read.
//! - [`use_collection`] reports [`CollectionError::OutsideScope`] when an item
//!   is composed outside any collection.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_collection::{Collection, IdRegistry, ItemData};
//! use trellis_dom::mock::MockDocument;
//!
//! let doc = MockDocument::new();
//! let button = doc.create_element("button");
//! doc.append(None, &button);
//!
//! let ids = IdRegistry::new();
//! let collection = Collection::new();
//!
//! let lease = ids.allocate();
//! let registration = collection.register(ItemData::new(lease.id().clone(), &button.handle()));
//! assert_eq!(collection.items().len(), 1);
//!
//! // Unmount.
//! registration.dispose();
//! lease.release();
//! assert!(collection.items().is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod collection;
mod id;

pub use collection::{Collection, CollectionError, Item, ItemData, Registration, use_collection};
pub use id::{IdLease, IdRegistry, ItemId};
