// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory document for tests and headless demos.
//!
//! [`MockDocument`] implements [`Platform`] and owns a tree of
//! [`MockElement`]s. It records every side effect a widget core can cause
//! (focus calls, attribute writes, global listeners, suppression toggles) so
//! tests can assert on them directly.
//!
//! ```rust
//! use trellis_dom::mock::MockDocument;
//! use trellis_dom::Platform;
//!
//! let doc = MockDocument::new();
//! let list = doc.create_element("ul");
//! doc.append(None, &list);
//! let item = doc.create_element("li");
//! doc.append(Some(&list), &item);
//!
//! item.handle().focus();
//! assert_eq!(doc.active_element(), Some(item.handle()));
//! assert_eq!(item.focus_calls(), 1);
//! ```

use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::element::{DocumentPosition, Element, ElementRef, WeakElement};
use crate::event::{KeyboardEvent, PointerEvent};
use crate::platform::{GlobalListener, ListenerId, Platform};

#[derive(Default)]
struct DocState {
    roots: Vec<Rc<MockElement>>,
    active: Option<WeakElement>,
    listeners: Vec<(ListenerId, GlobalListener)>,
    next_listener: u64,
    pointer_events_enabled: bool,
    scroll_locked: bool,
    suppress_count: usize,
    restore_count: usize,
}

/// An in-memory document implementing [`Platform`].
///
/// Cloning yields another handle to the same document.
#[derive(Clone)]
pub struct MockDocument {
    state: Rc<RefCell<DocState>>,
}

impl core::fmt::Debug for MockDocument {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MockDocument")
            .field("roots", &state.roots.len())
            .field("listeners", &state.listeners.len())
            .field("pointer_events_enabled", &state.pointer_events_enabled)
            .field("scroll_locked", &state.scroll_locked)
            .finish_non_exhaustive()
    }
}

impl Default for MockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDocument {
    /// Create an empty document with pointer events enabled and scroll unlocked.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(DocState {
                pointer_events_enabled: true,
                ..DocState::default()
            })),
        }
    }

    /// Create a detached, focusable element.
    #[must_use]
    pub fn create_element(&self, tag: &str) -> Rc<MockElement> {
        let doc = Rc::downgrade(&self.state);
        Rc::new_cyclic(|me| MockElement {
            me: me.clone(),
            tag: tag.to_string(),
            doc,
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
            attributes: RefCell::new(BTreeMap::new()),
            classes: RefCell::new(Vec::new()),
            disabled: Cell::new(false),
            focusable: Cell::new(true),
            attached: Cell::new(false),
            focus_calls: Cell::new(0),
        })
    }

    /// Append `child` to `parent`, or to the document root when `parent` is `None`.
    ///
    /// A child that already has a parent is moved.
    pub fn append(&self, parent: Option<&Rc<MockElement>>, child: &Rc<MockElement>) {
        self.remove(child);
        match parent {
            Some(parent) => {
                *child.parent.borrow_mut() = Some(Rc::downgrade(parent));
                parent.children.borrow_mut().push(child.clone());
                child.set_attached(parent.attached.get());
            }
            None => {
                self.state.borrow_mut().roots.push(child.clone());
                child.set_attached(true);
            }
        }
    }

    /// Insert `child` into `parent` (or the root) at `index`.
    pub fn insert(&self, parent: Option<&Rc<MockElement>>, index: usize, child: &Rc<MockElement>) {
        self.remove(child);
        match parent {
            Some(parent) => {
                *child.parent.borrow_mut() = Some(Rc::downgrade(parent));
                let mut children = parent.children.borrow_mut();
                let index = index.min(children.len());
                children.insert(index, child.clone());
                drop(children);
                child.set_attached(parent.attached.get());
            }
            None => {
                let mut state = self.state.borrow_mut();
                let index = index.min(state.roots.len());
                state.roots.insert(index, child.clone());
                drop(state);
                child.set_attached(true);
            }
        }
    }

    /// Detach `child` from wherever it is attached. Detached elements are not connected.
    pub fn remove(&self, child: &Rc<MockElement>) {
        let parent = child.parent.borrow_mut().take();
        if let Some(parent) = parent.and_then(|p| p.upgrade()) {
            parent
                .children
                .borrow_mut()
                .retain(|c| !Rc::ptr_eq(c, child));
        } else {
            self.state
                .borrow_mut()
                .roots
                .retain(|c| !Rc::ptr_eq(c, child));
        }
        child.set_attached(false);
    }

    /// Clear focus.
    pub fn blur(&self) {
        self.state.borrow_mut().active = None;
    }

    /// Dispatch a window `pointerdown` at `target`, building the composed path from its ancestors.
    pub fn pointer_down(&self, target: &Rc<MockElement>, detail: u32) -> PointerEvent {
        let mut path = Vec::new();
        let mut node = Some(target.clone());
        while let Some(current) = node {
            path.push(current.handle());
            node = current.parent();
        }
        let event = PointerEvent {
            target: Some(target.handle()),
            path,
            detail,
        };
        for listener in self.listeners() {
            if let GlobalListener::PointerDown(callback) = listener {
                callback(&event);
            }
        }
        event
    }

    /// Dispatch a document `keydown`.
    pub fn key_down(&self, mut event: KeyboardEvent) -> KeyboardEvent {
        for listener in self.listeners() {
            if let GlobalListener::KeyDown(callback) = listener {
                callback(&mut event);
            }
        }
        event
    }

    /// Number of installed global `pointerdown` listeners.
    #[must_use]
    pub fn pointer_listener_count(&self) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|(_, l)| matches!(l, GlobalListener::PointerDown(_)))
            .count()
    }

    /// Number of installed global `keydown` listeners.
    #[must_use]
    pub fn key_listener_count(&self) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|(_, l)| matches!(l, GlobalListener::KeyDown(_)))
            .count()
    }

    /// Whether body pointer events are currently enabled.
    #[must_use]
    pub fn pointer_events_enabled(&self) -> bool {
        self.state.borrow().pointer_events_enabled
    }

    /// Whether page scroll is currently locked.
    #[must_use]
    pub fn scroll_locked(&self) -> bool {
        self.state.borrow().scroll_locked
    }

    /// How many times background suppression was engaged.
    #[must_use]
    pub fn suppress_count(&self) -> usize {
        self.state.borrow().suppress_count
    }

    /// How many times background suppression was released.
    #[must_use]
    pub fn restore_count(&self) -> usize {
        self.state.borrow().restore_count
    }

    fn listeners(&self) -> Vec<GlobalListener> {
        self.state
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| l.clone())
            .collect()
    }
}

impl Platform for MockDocument {
    fn active_element(&self) -> Option<ElementRef> {
        self.state.borrow().active.as_ref().and_then(WeakElement::upgrade)
    }

    fn add_global_listener(&self, listener: GlobalListener) -> ListenerId {
        let mut state = self.state.borrow_mut();
        state.next_listener += 1;
        let id = ListenerId(state.next_listener);
        state.listeners.push((id, listener));
        id
    }

    fn remove_global_listener(&self, id: ListenerId) {
        self.state.borrow_mut().listeners.retain(|(l, _)| *l != id);
    }

    fn set_background_pointer_events(&self, enabled: bool) {
        let mut state = self.state.borrow_mut();
        if enabled {
            state.restore_count += 1;
        } else {
            state.suppress_count += 1;
        }
        state.pointer_events_enabled = enabled;
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.state.borrow_mut().scroll_locked = locked;
    }
}

/// An element owned by a [`MockDocument`].
pub struct MockElement {
    me: Weak<MockElement>,
    tag: String,
    doc: Weak<RefCell<DocState>>,
    parent: RefCell<Option<Weak<MockElement>>>,
    children: RefCell<Vec<Rc<MockElement>>>,
    attributes: RefCell<BTreeMap<String, String>>,
    classes: RefCell<Vec<String>>,
    disabled: Cell<bool>,
    focusable: Cell<bool>,
    attached: Cell<bool>,
    focus_calls: Cell<usize>,
}

impl core::fmt::Debug for MockElement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MockElement")
            .field("tag", &self.tag)
            .field("attributes", &self.attributes.borrow())
            .field("classes", &self.classes.borrow())
            .field("disabled", &self.disabled.get())
            .finish_non_exhaustive()
    }
}

impl MockElement {
    /// A type-erased handle to this element.
    ///
    /// # Panics
    ///
    /// Never in practice: a `MockElement` only exists inside the `Rc` it was created in.
    #[must_use]
    pub fn handle(&self) -> ElementRef {
        ElementRef::new(self.me.upgrade().expect("mock element is alive while borrowed"))
    }

    /// The tag name given at creation.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Set the disabled flag. Disabled elements refuse focus.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// Set whether the element accepts focus at all.
    pub fn set_focusable(&self, focusable: bool) {
        self.focusable.set(focusable);
    }

    /// How many times [`Element::focus`] was called on this element.
    #[must_use]
    pub fn focus_calls(&self) -> usize {
        self.focus_calls.get()
    }

    /// The current parent, if attached below another element.
    #[must_use]
    pub fn parent(&self) -> Option<Rc<Self>> {
        self.parent.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Returns `true` if this element currently holds focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.doc
            .upgrade()
            .and_then(|doc| doc.borrow().active.clone())
            .is_some_and(|active| active.is(&self.handle()))
    }

    fn set_attached(&self, attached: bool) {
        self.attached.set(attached);
        for child in self.children.borrow().iter() {
            child.set_attached(attached);
        }
    }

    fn index_in_parent(&self) -> u32 {
        let position = match self.parent() {
            Some(parent) => parent
                .children
                .borrow()
                .iter()
                .position(|c| core::ptr::eq(Rc::as_ptr(c), self)),
            None => self.doc.upgrade().and_then(|doc| {
                doc.borrow()
                    .roots
                    .iter()
                    .position(|c| core::ptr::eq(Rc::as_ptr(c), self))
            }),
        };
        u32::try_from(position.unwrap_or(usize::MAX)).unwrap_or(u32::MAX)
    }
}

impl Element for MockElement {
    fn focus(&self) {
        self.focus_calls.set(self.focus_calls.get() + 1);
        if self.disabled.get() || !self.focusable.get() || !self.attached.get() {
            return;
        }
        if let Some(doc) = self.doc.upgrade() {
            doc.borrow_mut().active = Some(self.handle().downgrade());
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.attributes.borrow_mut().remove(name);
    }

    fn add_class(&self, class: &str) {
        let mut classes = self.classes.borrow_mut();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().iter().any(|c| c == class)
    }

    fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    fn is_connected(&self) -> bool {
        self.attached.get()
    }

    fn document_position(&self) -> DocumentPosition {
        let mut path = Vec::new();
        path.push(self.index_in_parent());
        let mut node = self.parent();
        while let Some(current) = node {
            path.push(current.index_in_parent());
            node = current.parent();
        }
        path.reverse();
        DocumentPosition::from_path(path)
    }
}
