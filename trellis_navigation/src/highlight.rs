// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual highlight: a visual cursor that moves while real focus stays put.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::cell::RefCell;
use core::fmt;

use trellis_collection::Collection;
use trellis_dom::{ElementRef, KeyboardEvent};
use trellis_reactive::{Disposer, Signal};

use crate::intent::{Intent, Orientation, WrapMode, resolve_intent, step};

/// Options for [`HighlightTracker`].
#[derive(Clone, Debug)]
pub struct HighlightOptions {
    /// Which arrow keys move the highlight.
    pub orientation: Orientation,
    /// Whether `Next`/`Prev` wrap past the ends.
    pub wrap: WrapMode,
    /// Class applied to the highlighted element.
    pub class: String,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            wrap: WrapMode::Loop,
            class: String::from("--highlighted"),
        }
    }
}

struct HighlightInner {
    index: Signal<Option<usize>>,
    items: Collection,
    options: HighlightOptions,
    marked: RefCell<Option<ElementRef>>,
    _sync: Disposer,
    _membership: Disposer,
}

impl HighlightInner {
    fn refresh(&self) {
        let index = self.index.get();
        let len = self.items.enabled_elements().len();
        if index.is_some_and(|i| i >= len) {
            self.index.set(None);
        } else {
            self.sync_marker(index);
        }
    }

    fn sync_marker(&self, index: Option<usize>) {
        let target = index.and_then(|i| self.items.enabled_elements().get(i).cloned());
        let mut marked = self.marked.borrow_mut();
        if *marked == target {
            return;
        }
        if let Some(previous) = marked.take() {
            previous.remove_class(&self.options.class);
        }
        if let Some(next) = &target {
            next.add_class(&self.options.class);
        }
        *marked = target;
    }
}

/// Tracks which item of a popup is highlighted while input focus stays on
/// the popup (or its trigger).
///
/// The index lives in a [`Signal`] and always refers to the collection's
/// *enabled* items. The highlight class is moved synchronously inside every
/// index change, so the index and the marker are never observably out of
/// sync. The index is `None` whenever nothing is highlighted and never points
/// past the end of the collection: registration changes that shrink the
/// enabled items below the index clear it.
#[derive(Clone)]
pub struct HighlightTracker {
    inner: Rc<HighlightInner>,
}

impl fmt::Debug for HighlightTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlightTracker")
            .field("index", &self.inner.index.get())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

impl HighlightTracker {
    /// Track a highlight over `items`, starting with nothing highlighted.
    pub fn new(items: Collection, options: HighlightOptions) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<HighlightInner>| {
            let index = Signal::new(None);
            let marker = weak.clone();
            let sync = index.subscribe(move |index, _| {
                if let Some(inner) = marker.upgrade() {
                    inner.sync_marker(*index);
                }
            });
            let weak = weak.clone();
            let membership = items.revision().subscribe(move |_, _| {
                if let Some(inner) = weak.upgrade() {
                    inner.refresh();
                }
            });
            HighlightInner {
                index,
                items,
                options,
                marked: RefCell::new(None),
                _sync: sync,
                _membership: membership,
            }
        });
        Self { inner }
    }

    /// The highlighted index among the enabled items.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.inner.index.get()
    }

    /// The signal holding the index, for observers such as `aria-activedescendant`.
    #[must_use]
    pub fn signal(&self) -> &Signal<Option<usize>> {
        &self.inner.index
    }

    /// The items being highlighted.
    #[must_use]
    pub fn items(&self) -> &Collection {
        &self.inner.items
    }

    /// Highlight `index`; anything out of range clears the highlight.
    pub fn set(&self, index: Option<usize>) {
        let len = self.inner.items.enabled_elements().len();
        self.inner.index.set(index.filter(|&i| i < len));
    }

    /// Highlight `element`, or clear when it is not an enabled item.
    pub fn highlight_element(&self, element: &ElementRef) {
        self.inner
            .index
            .set(self.inner.items.enabled_index_of(element));
    }

    /// The highlighted element.
    #[must_use]
    pub fn highlighted_element(&self) -> Option<ElementRef> {
        let index = self.index()?;
        self.inner.items.enabled_elements().get(index).cloned()
    }

    /// Clear the highlight.
    pub fn reset(&self) {
        self.inner.index.set(None);
    }

    /// Highlight the first item unless something is already highlighted.
    ///
    /// An empty collection stays unhighlighted.
    pub fn highlight_first_if_none(&self) {
        if self.index().is_none() {
            self.set(Some(0));
        }
    }

    /// Move the highlight by `intent`.
    pub fn apply(&self, intent: Intent) {
        let len = self.inner.items.enabled_elements().len();
        let next = step(len, self.index(), intent, self.inner.options.wrap);
        self.inner.index.set(next);
    }

    /// Handle a `keydown` on the popup.
    ///
    /// Only keys with an intent in the configured orientation are consumed,
    /// leaving the cross-axis arrows to the caller (menus use them to open and
    /// close submenus).
    pub fn on_key_down(&self, event: &mut KeyboardEvent) -> Option<Intent> {
        let intent = resolve_intent(&event.key, self.inner.options.orientation)?;
        event.consume();
        self.apply(intent);
        Some(intent)
    }

    /// Follow `open`: highlight the first item when it opens (if nothing is
    /// highlighted yet) and clear the highlight when it closes.
    pub fn bind_open(&self, open: &Signal<bool>) -> Disposer {
        let tracker = self.clone();
        open.subscribe(move |open, _| {
            if *open {
                tracker.highlight_first_if_none();
            } else {
                tracker.reset();
            }
        })
    }

    /// Re-apply the marker after the collection changed under a steady index.
    ///
    /// Registration changes refresh automatically; call this after an item's
    /// disabled state changes.
    pub fn refresh(&self) {
        self.inner.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use trellis_collection::{ItemData, Registration};
    use trellis_dom::Key;
    use trellis_dom::mock::{MockDocument, MockElement};

    fn popup(n: usize) -> (MockDocument, Collection, Vec<Rc<MockElement>>, Vec<Registration>) {
        let doc = MockDocument::new();
        let content = doc.create_element("div");
        doc.append(None, &content);
        let collection = Collection::new();
        let mut items = Vec::new();
        let mut registrations = Vec::new();
        for i in 0..n {
            let el = doc.create_element("button");
            doc.append(Some(&content), &el);
            registrations.push(collection.register(ItemData::new(alloc::format!("{i}"), &el.handle())));
            items.push(el);
        }
        (doc, collection, items, registrations)
    }

    fn marked(items: &[Rc<MockElement>]) -> Vec<usize> {
        use trellis_dom::Element;
        items
            .iter()
            .enumerate()
            .filter(|(_, el)| el.has_class("--highlighted"))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn marker_moves_with_the_index() {
        let (_doc, collection, items, _r) = popup(3);
        let tracker = HighlightTracker::new(collection, HighlightOptions::default());

        tracker.set(Some(1));
        assert_eq!(marked(&items), [1]);
        tracker.apply(Intent::Next);
        assert_eq!(marked(&items), [2]);
        tracker.apply(Intent::Next);
        assert_eq!((tracker.index(), marked(&items)), (Some(0), alloc::vec![0]));
        tracker.reset();
        assert!(marked(&items).is_empty());
    }

    #[test]
    fn out_of_range_clears() {
        let (_doc, collection, items, _r) = popup(2);
        let tracker = HighlightTracker::new(collection, HighlightOptions::default());
        tracker.set(Some(1));
        tracker.set(Some(5));
        assert_eq!(tracker.index(), None);
        assert!(marked(&items).is_empty());
    }

    #[test]
    fn cross_axis_keys_pass_through() {
        let (_doc, collection, _items, _r) = popup(2);
        let tracker = HighlightTracker::new(collection, HighlightOptions::default());

        let mut right = KeyboardEvent::new(Key::ArrowRight);
        assert_eq!(tracker.on_key_down(&mut right), None);
        assert!(!right.is_default_prevented());

        let mut end = KeyboardEvent::new(Key::End);
        assert_eq!(tracker.on_key_down(&mut end), Some(Intent::Last));
        assert!(end.is_propagation_stopped());
        assert_eq!(tracker.index(), Some(1));
    }

    #[test]
    fn open_and_close_drive_the_index() {
        let (_doc, collection, items, registrations) = popup(2);
        let open = Signal::new(false);
        let tracker = HighlightTracker::new(collection, HighlightOptions::default());
        let _binding = tracker.bind_open(&open);

        open.set(true);
        assert_eq!(tracker.index(), Some(0));
        tracker.apply(Intent::Last);
        open.set(false);
        assert_eq!(tracker.index(), None);
        assert!(marked(&items).is_empty());

        for r in &registrations {
            r.dispose();
        }
        open.set(true);
        assert_eq!(tracker.index(), None, "an empty popup opens with nothing highlighted");
    }
}
