// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element handles and document ordering.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::Deref;

use smallvec::SmallVec;

/// The imperative surface of a rendered element that widget cores touch.
///
/// Hosts implement this over their own node type (a web-sys element, a
/// retained-mode widget, a test double). Every method takes `&self`: elements
/// are shared handles and hosts are expected to use interior mutability.
pub trait Element {
    /// Move input focus to this element.
    ///
    /// Hosts may refuse (for example when the element is disabled or not
    /// focusable); callers detect refusal through [`Platform::active_element`](crate::Platform::active_element).
    fn focus(&self);

    /// Read an attribute.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Write an attribute.
    fn set_attribute(&self, name: &str, value: &str);

    /// Remove an attribute if present.
    fn remove_attribute(&self, name: &str);

    /// Add a class to the element's class list.
    fn add_class(&self, class: &str);

    /// Remove a class from the element's class list.
    fn remove_class(&self, class: &str);

    /// Returns `true` if the element's class list contains `class`.
    fn has_class(&self, class: &str) -> bool;

    /// Returns `true` if the element is disabled for interaction.
    fn is_disabled(&self) -> bool;

    /// Returns `true` while the element is attached to a live document.
    fn is_connected(&self) -> bool;

    /// Position of the element in document order.
    fn document_position(&self) -> DocumentPosition;
}

/// Root-to-node path of child indices.
///
/// Lexicographic ordering of two positions is document order: an ancestor
/// sorts before its descendants, and earlier siblings sort before later ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentPosition(SmallVec<[u32; 8]>);

impl DocumentPosition {
    /// Build a position from a root-to-node index path.
    pub fn from_path(path: impl IntoIterator<Item = u32>) -> Self {
        Self(path.into_iter().collect())
    }

    /// The root-to-node index path.
    #[must_use]
    pub fn path(&self) -> &[u32] {
        &self.0
    }

    /// Nesting depth (zero for a document root).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if `other` is this node or one of its descendants.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }
}

/// A shared handle to a host element.
///
/// Equality and hashing use pointer identity, matching how DOM code compares
/// element references.
#[derive(Clone)]
pub struct ElementRef(Rc<dyn Element>);

impl ElementRef {
    /// Wrap a host element.
    pub fn new<E: Element + 'static>(element: Rc<E>) -> Self {
        Self(element)
    }

    /// Wrap an already type-erased host element.
    pub fn from_rc(element: Rc<dyn Element>) -> Self {
        Self(element)
    }

    /// Create a non-owning handle.
    #[must_use]
    pub fn downgrade(&self) -> WeakElement {
        WeakElement(Rc::downgrade(&self.0))
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast::<()>()
    }
}

impl Deref for ElementRef {
    type Target = dyn Element;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for ElementRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ElementRef {}

impl Hash for ElementRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementRef({:p})", self.addr())
    }
}

/// A non-owning handle to a host element.
///
/// Registries store these so they never extend an element's lifetime; an
/// entry whose element is gone simply stops upgrading.
#[derive(Clone)]
pub struct WeakElement(Weak<dyn Element>);

impl WeakElement {
    /// Upgrade to a shared handle if the element is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<ElementRef> {
        self.0.upgrade().map(ElementRef)
    }

    /// Returns `true` if this handle points at `element`.
    #[must_use]
    pub fn is(&self, element: &ElementRef) -> bool {
        core::ptr::addr_eq(self.0.as_ptr(), Rc::as_ptr(&element.0))
    }
}

impl fmt::Debug for WeakElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeakElement({:p})", self.0.as_ptr().cast::<()>())
    }
}

impl From<&ElementRef> for WeakElement {
    fn from(element: &ElementRef) -> Self {
        element.downgrade()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_position_orders_ancestors_first() {
        let parent = DocumentPosition::from_path([0, 2]);
        let child = DocumentPosition::from_path([0, 2, 0]);
        let later_sibling = DocumentPosition::from_path([0, 3]);

        assert!(parent < child, "ancestor sorts before descendant");
        assert!(child < later_sibling, "descendant sorts before parent's next sibling");
        assert_eq!(child.depth(), 3);
        assert_eq!(child.path(), &[0, 2, 0]);
    }

    #[test]
    fn containment_follows_path_prefixes() {
        let parent = DocumentPosition::from_path([1]);
        let child = DocumentPosition::from_path([1, 4]);
        let cousin = DocumentPosition::from_path([2, 4]);

        assert!(parent.contains(&parent), "a node contains itself");
        assert!(parent.contains(&child));
        assert!(!child.contains(&parent));
        assert!(!parent.contains(&cousin));
    }
}
