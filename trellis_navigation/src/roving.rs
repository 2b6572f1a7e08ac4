// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Roving focus: arrow keys move real input focus among a group's items.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use trellis_collection::Collection;
use trellis_dom::{ElementRef, FocusEvent, KeyboardEvent, Platform, PlatformRef};

use crate::intent::{Intent, Orientation, WrapMode, consume_navigation_key};

/// Custom entry-focus policy: receives the group focus event and a
/// `focus_first` function over candidate elements.
pub type EntryFocus = Rc<dyn Fn(&FocusEvent, &dyn Fn(&[ElementRef]) -> bool)>;

/// Options for [`RovingFocus`].
#[derive(Clone, Default)]
pub struct RovingFocusOptions {
    /// Which arrow keys move focus.
    pub orientation: Orientation,
    /// Whether `Next`/`Prev` wrap past the ends.
    pub wrap: WrapMode,
    /// Replaces the default "focus the first enabled item" on group focus.
    pub entry_focus: Option<EntryFocus>,
}

impl fmt::Debug for RovingFocusOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RovingFocusOptions")
            .field("orientation", &self.orientation)
            .field("wrap", &self.wrap)
            .field("entry_focus", &self.entry_focus.is_some())
            .finish()
    }
}

/// Focus the first candidate that accepts focus.
///
/// Stops without calling `focus()` when a candidate already holds focus.
/// Candidates that refuse focus (the active element does not change) are
/// skipped. Returns `true` if focus ended on a candidate.
pub fn focus_first(platform: &dyn Platform, candidates: &[ElementRef]) -> bool {
    for candidate in candidates {
        let previous = platform.active_element();
        if previous.as_ref() == Some(candidate) {
            return true;
        }
        candidate.focus();
        if platform.active_element() != previous {
            return true;
        }
    }
    false
}

/// Moves real input focus among a [`Collection`]'s enabled items.
///
/// Hosts forward the group container's `keydown` and `focus` events to
/// [`on_key_down`](Self::on_key_down) and [`on_focus`](Self::on_focus).
pub struct RovingFocus {
    platform: PlatformRef,
    items: Collection,
    options: RovingFocusOptions,
}

impl fmt::Debug for RovingFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RovingFocus")
            .field("items", &self.items)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl RovingFocus {
    /// Rove over `items`.
    pub fn new(platform: PlatformRef, items: Collection, options: RovingFocusOptions) -> Self {
        Self {
            platform,
            items,
            options,
        }
    }

    /// The items being roved over.
    #[must_use]
    pub fn items(&self) -> &Collection {
        &self.items
    }

    /// Handle a `keydown` on the group.
    ///
    /// The six navigation keys are always consumed; other keys are ignored.
    /// The event target is taken as the item currently holding focus.
    pub fn on_key_down(&self, event: &mut KeyboardEvent) -> Option<Intent> {
        let intent = consume_navigation_key(event, self.options.orientation)?;
        let from = event.target.clone().or_else(|| self.platform.active_element());
        self.move_focus(intent, from.as_ref());
        Some(intent)
    }

    /// Handle `focus` on the group element itself.
    ///
    /// Focus landing on anything other than the collection's container (when
    /// one is set) is ignored.
    pub fn on_focus(&self, event: &FocusEvent) {
        if let Some(container) = self.items.container()
            && event.target.as_ref() != Some(&container)
        {
            return;
        }
        let platform = self.platform.clone();
        let focus = move |candidates: &[ElementRef]| focus_first(&*platform, candidates);
        match &self.options.entry_focus {
            Some(policy) => policy(event, &focus),
            None => {
                focus(&self.items.enabled_elements());
            }
        }
    }

    /// Move focus by `intent`, starting from `from`.
    ///
    /// When `from` is not one of the enabled items, the current index is
    /// treated as `-1`. Returns `true` if focus ended on an item.
    pub fn move_focus(&self, intent: Intent, from: Option<&ElementRef>) -> bool {
        let mut items = self.items.enabled_elements();
        if items.is_empty() {
            return false;
        }
        if matches!(intent, Intent::Prev | Intent::Last) {
            items.reverse();
        }
        let candidates: Vec<ElementRef> = match intent {
            Intent::First | Intent::Last => items,
            Intent::Next | Intent::Prev => {
                let start = from
                    .and_then(|from| items.iter().position(|e| e == from))
                    .map_or(0, |i| i + 1);
                match self.options.wrap {
                    WrapMode::Loop => {
                        let start = start % items.len();
                        items.rotate_left(start);
                        items
                    }
                    WrapMode::Never => items.split_off(start.min(items.len())),
                }
            }
        };
        let moved = focus_first(&*self.platform, &candidates);
        tracing::trace!(target: "trellis_navigation::roving", ?intent, moved, "roving focus");
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_collection::ItemData;
    use trellis_dom::mock::{MockDocument, MockElement};
    use trellis_dom::Key;

    fn group(n: usize) -> (MockDocument, Collection, Vec<Rc<MockElement>>, Vec<trellis_collection::Registration>) {
        let doc = MockDocument::new();
        let list = doc.create_element("div");
        doc.append(None, &list);
        let collection = Collection::new();
        collection.set_container(Some(&list.handle()));
        let mut elements = Vec::new();
        let mut registrations = Vec::new();
        for i in 0..n {
            let el = doc.create_element("button");
            doc.append(Some(&list), &el);
            registrations.push(collection.register(ItemData::new(alloc::format!("item-{i}"), &el.handle())));
            elements.push(el);
        }
        (doc, collection, elements, registrations)
    }

    #[test]
    fn already_focused_target_gets_no_redundant_focus_call() {
        let (doc, collection, items, _r) = group(2);
        items[0].handle().focus();
        let roving = RovingFocus::new(Rc::new(doc.clone()), collection, RovingFocusOptions::default());

        assert!(roving.move_focus(Intent::First, None));
        assert_eq!(items[0].focus_calls(), 1, "focus was not called again");
    }

    #[test]
    fn refused_focus_falls_through_to_the_next_candidate() {
        let (doc, collection, items, _r) = group(3);
        items[1].set_focusable(false);
        let roving = RovingFocus::new(Rc::new(doc.clone()), collection, RovingFocusOptions::default());

        roving.move_focus(Intent::Next, Some(&items[0].handle()));
        assert!(items[2].is_focused());
        assert_eq!(items[1].focus_calls(), 1);
    }

    #[test]
    fn never_wrap_stops_at_the_ends() {
        let (doc, collection, items, _r) = group(3);
        let roving = RovingFocus::new(
            Rc::new(doc.clone()),
            collection,
            RovingFocusOptions {
                wrap: WrapMode::Never,
                ..RovingFocusOptions::default()
            },
        );
        items[2].handle().focus();
        let mut down = KeyboardEvent::new(Key::ArrowDown).with_target(items[2].handle());
        assert_eq!(roving.on_key_down(&mut down), Some(Intent::Next));
        assert!(items[2].is_focused());
        assert_eq!(items[0].focus_calls(), 0);
    }

    #[test]
    fn custom_entry_focus_replaces_the_default() {
        let (doc, collection, items, _r) = group(3);
        let container = collection.container().unwrap();
        let last = items[2].handle();
        let roving = RovingFocus::new(
            Rc::new(doc.clone()),
            collection,
            RovingFocusOptions {
                entry_focus: Some(Rc::new(move |_: &FocusEvent, focus: &dyn Fn(&[ElementRef]) -> bool| {
                    focus(core::slice::from_ref(&last));
                })),
                ..RovingFocusOptions::default()
            },
        );

        roving.on_focus(&FocusEvent {
            target: Some(items[0].handle()),
            related_target: None,
        });
        assert_eq!(doc.active_element(), None, "focus on an item is not group entry");

        roving.on_focus(&FocusEvent {
            target: Some(container),
            related_target: None,
        });
        assert!(items[2].is_focused());
    }
}
