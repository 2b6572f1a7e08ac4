// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-scope registries of interactive items.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use trellis_dom::{DocumentPosition, ElementRef, WeakElement};
use trellis_reactive::{Disposer, Signal};

use crate::id::ItemId;

/// Structural misuse of a collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// An item asked for its collection while no collection scope was active.
    #[error("[trellis] <{component}> needs to be contained by a collection")]
    OutsideScope {
        /// The item part that was misplaced.
        component: &'static str,
    },
}

/// Registration data supplied by an item.
#[derive(Clone)]
pub struct ItemData {
    /// Identifier, unique within the collection.
    pub id: ItemId,
    /// Non-owning handle to the rendered element.
    pub element: WeakElement,
    /// Extra disabled predicate, evaluated on every read.
    pub disabled: Option<Rc<dyn Fn() -> bool>>,
}

impl ItemData {
    /// Item data for `element`; disabled state comes from the element alone.
    pub fn new(id: impl Into<ItemId>, element: &ElementRef) -> Self {
        Self {
            id: id.into(),
            element: element.downgrade(),
            disabled: None,
        }
    }

    /// Add a disabled predicate, combined with the element's own disabled state.
    #[must_use]
    pub fn with_disabled(mut self, disabled: impl Fn() -> bool + 'static) -> Self {
        self.disabled = Some(Rc::new(disabled));
        self
    }
}

impl fmt::Debug for ItemData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemData")
            .field("id", &self.id)
            .field("element", &self.element)
            .field("disabled", &self.disabled.as_ref().map(|d| d()))
            .finish()
    }
}

/// A live item as read from a [`Collection`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    /// Identifier.
    pub id: ItemId,
    /// The rendered element.
    pub element: ElementRef,
    /// Disabled at the time of the read.
    pub disabled: bool,
}

struct Entry {
    key: u64,
    data: ItemData,
}

#[derive(Default)]
struct CollectionInner {
    entries: RefCell<Vec<Entry>>,
    next_key: Cell<u64>,
    container: RefCell<Option<WeakElement>>,
    revision: Signal<u64>,
}

/// An ordered set of registered items, shared by a widget root and its items.
///
/// Order is document order, derived on every read from the live elements'
/// [`DocumentPosition`]s rather than from registration time. Entries whose
/// element was dropped are pruned on read; detached elements are skipped.
///
/// ```rust
/// use trellis_collection::{Collection, ItemData};
/// use trellis_dom::mock::MockDocument;
///
/// let doc = MockDocument::new();
/// let list = doc.create_element("ul");
/// doc.append(None, &list);
/// let (a, b) = (doc.create_element("li"), doc.create_element("li"));
/// doc.append(Some(&list), &a);
/// doc.append(Some(&list), &b);
///
/// let collection = Collection::new();
/// // Register out of document order.
/// let _rb = collection.register(ItemData::new("b", &b.handle()));
/// let _ra = collection.register(ItemData::new("a", &a.handle()));
///
/// let ids: Vec<_> = collection.items().into_iter().map(|i| i.id).collect();
/// assert_eq!(ids, ["a".into(), "b".into()]);
/// ```
#[derive(Clone, Default)]
pub struct Collection {
    inner: Rc<CollectionInner>,
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("registered", &self.inner.entries.borrow().len())
            .field("revision", &self.inner.revision.get())
            .finish_non_exhaustive()
    }
}

impl Collection {
    /// Create an empty collection with no container element.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the element that hosts the items, typically the element that
    /// receives group focus and keyboard input.
    pub fn set_container(&self, container: Option<&ElementRef>) {
        *self.inner.container.borrow_mut() = container.map(ElementRef::downgrade);
    }

    /// The container element, if set and still alive.
    #[must_use]
    pub fn container(&self) -> Option<ElementRef> {
        self.inner
            .container
            .borrow()
            .as_ref()
            .and_then(WeakElement::upgrade)
    }

    /// Register an item. An existing entry with the same id is replaced.
    pub fn register(&self, data: ItemData) -> Registration {
        let key = self.inner.next_key.get();
        self.inner.next_key.set(key + 1);
        tracing::trace!(target: "trellis_collection", id = %data.id, "register item");
        {
            let mut entries = self.inner.entries.borrow_mut();
            entries.retain(|e| e.data.id != data.id);
            entries.push(Entry { key, data });
        }
        self.bump();

        let weak: Weak<CollectionInner> = Rc::downgrade(&self.inner);
        Registration(Disposer::new(move || {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.remove_key(key);
            }
        }))
    }

    /// Remove the entry registered under `id`. Returns `true` if one was removed.
    pub fn unregister(&self, id: &ItemId) -> bool {
        let removed = {
            let mut entries = self.inner.entries.borrow_mut();
            let before = entries.len();
            entries.retain(|e| &e.data.id != id);
            entries.len() != before
        };
        if removed {
            tracing::trace!(target: "trellis_collection", id = %id, "unregister item");
            self.bump();
        }
        removed
    }

    fn remove_key(&self, key: u64) {
        let removed = {
            let mut entries = self.inner.entries.borrow_mut();
            let before = entries.len();
            entries.retain(|e| e.key != key);
            entries.len() != before
        };
        if removed {
            tracing::trace!(target: "trellis_collection", key, "registration disposed");
            self.bump();
        }
    }

    fn bump(&self) {
        self.inner.revision.update(|r| r.wrapping_add(1));
    }

    /// Bumps on every registration change. Subscribe to refresh derived state.
    #[must_use]
    pub fn revision(&self) -> &Signal<u64> {
        &self.inner.revision
    }

    /// Live, connected items in document order.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        let mut upgraded = Vec::new();
        let mut pruned = false;
        // Element and predicate calls run after the borrow is released, so
        // they may read this collection.
        self.inner.entries.borrow_mut().retain(|entry| {
            let Some(element) = entry.data.element.upgrade() else {
                pruned = true;
                return false;
            };
            upgraded.push((entry.data.id.clone(), element, entry.data.disabled.clone()));
            true
        });
        if pruned {
            self.bump();
        }

        let mut live: Vec<(DocumentPosition, Item)> = upgraded
            .into_iter()
            .filter(|(_, element, _)| element.is_connected())
            .map(|(id, element, predicate)| {
                let disabled = element.is_disabled() || predicate.is_some_and(|d| d());
                (
                    element.document_position(),
                    Item {
                        id,
                        element,
                        disabled,
                    },
                )
            })
            .collect();
        live.sort_by(|(a, _), (b, _)| a.cmp(b));
        live.into_iter().map(|(_, item)| item).collect()
    }

    /// Live elements in document order.
    #[must_use]
    pub fn elements(&self) -> Vec<ElementRef> {
        self.items().into_iter().map(|i| i.element).collect()
    }

    /// Live, non-disabled elements in document order.
    #[must_use]
    pub fn enabled_elements(&self) -> Vec<ElementRef> {
        self.items()
            .into_iter()
            .filter(|i| !i.disabled)
            .map(|i| i.element)
            .collect()
    }

    /// Position of `element` among [`enabled_elements`](Self::enabled_elements).
    #[must_use]
    pub fn enabled_index_of(&self, element: &ElementRef) -> Option<usize> {
        self.enabled_elements().iter().position(|e| e == element)
    }

    /// Returns `true` if an entry is registered under `id`.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.inner.entries.borrow().iter().any(|e| &e.data.id == id)
    }

    /// Number of registered entries, including detached ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }
}

/// Keeps an item registered. Disposal (or drop) unregisters it; repeated disposal is a no-op.
///
/// Disposing a registration that was replaced by a newer one with the same id
/// leaves the newer entry alone.
#[derive(Debug)]
#[must_use = "dropping a Registration unregisters the item"]
pub struct Registration(Disposer);

impl Registration {
    /// Unregister now.
    pub fn dispose(&self) {
        self.0.dispose();
    }

    /// Returns `true` once unregistered through this handle.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.0.is_disposed()
    }

    /// Convert into a plain [`Disposer`] for a [`Scope`](trellis_reactive::Scope).
    pub fn into_disposer(self) -> Disposer {
        self.0
    }
}

/// Register `item` into the ambient collection, failing when there is none.
///
/// Widget items call this with the collection handed down by their root; a
/// missing collection means the item was composed outside its root.
pub fn use_collection(
    collection: Option<&Collection>,
    component: &'static str,
    item: ItemData,
) -> Result<Registration, CollectionError> {
    let collection = collection.ok_or(CollectionError::OutsideScope { component })?;
    Ok(collection.register(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use trellis_dom::mock::MockDocument;

    #[test]
    fn re_registering_an_id_replaces_without_duplicates() {
        let doc = MockDocument::new();
        let (a, b) = (doc.create_element("li"), doc.create_element("li"));
        doc.append(None, &a);
        doc.append(None, &b);

        let collection = Collection::new();
        let first = collection.register(ItemData::new("x", &a.handle()));
        let second = collection.register(ItemData::new("x", &b.handle()));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.elements(), [b.handle()]);

        first.dispose();
        assert_eq!(collection.len(), 1, "stale registration must not remove its replacement");
        second.dispose();
        second.dispose();
        assert!(collection.is_empty());
    }

    #[test]
    fn dropped_elements_are_pruned_and_detached_ones_skipped() {
        let doc = MockDocument::new();
        let kept = doc.create_element("li");
        doc.append(None, &kept);
        let detached = doc.create_element("li");
        doc.append(None, &detached);

        let collection = Collection::new();
        let _k = collection.register(ItemData::new("kept", &kept.handle()));
        let _d = collection.register(ItemData::new("detached", &detached.handle()));
        {
            let gone = doc.create_element("li");
            doc.append(None, &gone);
            collection.register(ItemData::new("gone", &gone.handle())).into_disposer().forget();
            doc.remove(&gone);
        }
        doc.remove(&detached);

        assert_eq!(collection.len(), 3);
        assert_eq!(collection.elements(), [kept.handle()]);
        assert_eq!(collection.len(), 2, "the dropped element's entry is pruned");

        doc.append(None, &detached);
        assert_eq!(collection.elements().len(), 2, "reattached elements come back");
    }

    #[test]
    fn disabled_combines_element_and_predicate() {
        let doc = MockDocument::new();
        let (a, b, c) = (
            doc.create_element("li"),
            doc.create_element("li"),
            doc.create_element("li"),
        );
        for el in [&a, &b, &c] {
            doc.append(None, el);
        }
        b.set_disabled(true);
        let flag = Rc::new(Cell::new(true));

        let collection = Collection::new();
        let _a = collection.register(ItemData::new("a", &a.handle()));
        let _b = collection.register(ItemData::new("b", &b.handle()));
        let reader = flag.clone();
        let _c = collection.register(ItemData::new("c", &c.handle()).with_disabled(move || reader.get()));

        assert_eq!(collection.enabled_elements(), [a.handle()]);
        flag.set(false);
        assert_eq!(collection.enabled_elements(), [a.handle(), c.handle()]);
        assert_eq!(collection.enabled_index_of(&c.handle()), Some(1));
    }

    #[test]
    fn use_collection_outside_scope_is_an_error() {
        let doc = MockDocument::new();
        let el = doc.create_element("li");
        let err = use_collection(None, "MenuItem", ItemData::new("a", &el.handle())).unwrap_err();
        assert_eq!(err, CollectionError::OutsideScope { component: "MenuItem" });
        assert!(err.to_string().contains("<MenuItem>"));
    }
}
