// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unique identifiers for widget parts.

use alloc::collections::BTreeSet;
use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::cell::RefCell;
use core::fmt;

use trellis_reactive::Disposer;

/// A stable identifier, unique within the [`IdRegistry`] that issued it.
///
/// The string form is what ends up in `id`, `aria-controls`, and
/// `aria-labelledby` attributes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug)]
struct RegistryState {
    prefix: String,
    next: u64,
    live: BTreeSet<u64>,
}

/// Allocates identifiers of the form `<prefix>-<n>` and tracks which are live.
///
/// Numbers are never reused within one registry, even after release, so a
/// stale `aria-controls` can never point at a newer element.
///
/// ```rust
/// use trellis_collection::IdRegistry;
///
/// let ids = IdRegistry::new();
/// let a = ids.allocate();
/// let b = ids.allocate();
/// assert_eq!(a.id().as_str(), "trellis-0");
/// assert_eq!(b.id().as_str(), "trellis-1");
/// assert_eq!(ids.live_count(), 2);
///
/// drop(a);
/// assert_eq!(ids.live_count(), 1);
/// assert_eq!(ids.allocate().id().as_str(), "trellis-2");
/// ```
#[derive(Clone, Debug)]
pub struct IdRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl Default for IdRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IdRegistry {
    /// A registry using the `trellis` prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix("trellis")
    }

    /// A registry using a custom prefix.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            state: Rc::new(RefCell::new(RegistryState {
                prefix: String::from(prefix),
                next: 0,
                live: BTreeSet::new(),
            })),
        }
    }

    /// Allocate a fresh identifier. It is released when the lease is dropped or disposed.
    pub fn allocate(&self) -> IdLease {
        let (n, id) = {
            let mut state = self.state.borrow_mut();
            let n = state.next;
            state.next += 1;
            state.live.insert(n);
            (n, ItemId(format!("{}-{n}", state.prefix)))
        };
        tracing::trace!(target: "trellis_collection::id", id = %id, "allocated id");

        let weak: Weak<RefCell<RegistryState>> = Rc::downgrade(&self.state);
        IdLease {
            id,
            release: Disposer::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.borrow_mut().live.remove(&n);
                }
            }),
        }
    }

    /// Returns `true` if `id` was issued here and has not been released.
    #[must_use]
    pub fn is_live(&self, id: &ItemId) -> bool {
        let state = self.state.borrow();
        id.0
            .strip_prefix(state.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|n| n.parse::<u64>().ok())
            .is_some_and(|n| state.live.contains(&n))
    }

    /// Number of identifiers currently live.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.state.borrow().live.len()
    }
}

/// A live identifier. Releasing is idempotent and also happens on drop.
#[derive(Debug)]
pub struct IdLease {
    id: ItemId,
    release: Disposer,
}

impl IdLease {
    /// The identifier.
    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Release the identifier back to its registry.
    pub fn release(&self) {
        self.release.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_ids_are_not_live_and_not_reused() {
        let ids = IdRegistry::with_prefix("menu");
        let first = ids.allocate();
        let id = first.id().clone();
        assert!(ids.is_live(&id));

        first.release();
        first.release();
        assert!(!ids.is_live(&id));
        assert_eq!(ids.live_count(), 0);

        let second = ids.allocate();
        assert_ne!(second.id(), &id, "numbers are never handed out twice");
        assert_eq!(second.id().as_str(), "menu-1");
    }

    #[test]
    fn foreign_ids_are_never_live() {
        let ids = IdRegistry::new();
        let _lease = ids.allocate();
        assert!(!ids.is_live(&ItemId::from("other-0")));
        assert!(!ids.is_live(&ItemId::from("trellis-x")));
    }
}
