// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `trellis_navigation` crate.
//!
//! These drive roving focus and the highlight tracker through a mock
//! document the way a tab list or a menu would.

use std::rc::Rc;

use trellis_collection::{Collection, ItemData, Registration};
use trellis_dom::mock::{MockDocument, MockElement};
use trellis_dom::{FocusEvent, Key, KeyboardEvent, Platform};
use trellis_navigation::{
    HighlightOptions, HighlightTracker, Intent, Orientation, RovingFocus, RovingFocusOptions,
    WrapMode,
};

struct Group {
    doc: MockDocument,
    container: Rc<MockElement>,
    items: Vec<Rc<MockElement>>,
    collection: Collection,
    _registrations: Vec<Registration>,
}

fn group(n: usize) -> Group {
    let doc = MockDocument::new();
    let container = doc.create_element("div");
    doc.append(None, &container);
    let collection = Collection::new();
    collection.set_container(Some(&container.handle()));
    let mut items = Vec::new();
    let mut registrations = Vec::new();
    for i in 0..n {
        let el = doc.create_element("button");
        doc.append(Some(&container), &el);
        registrations.push(collection.register(ItemData::new(format!("tab-{i}"), &el.handle())));
        items.push(el);
    }
    Group {
        doc,
        container,
        items,
        collection,
        _registrations: registrations,
    }
}

fn horizontal(g: &Group) -> RovingFocus {
    RovingFocus::new(
        Rc::new(g.doc.clone()),
        g.collection.clone(),
        RovingFocusOptions {
            orientation: Orientation::Horizontal,
            wrap: WrapMode::Loop,
            entry_focus: None,
        },
    )
}

fn press(roving: &RovingFocus, key: Key, from: &Rc<MockElement>) -> KeyboardEvent {
    let mut event = KeyboardEvent::new(key).with_target(from.handle());
    roving.on_key_down(&mut event);
    event
}

#[test]
fn end_and_looping_arrow_in_a_horizontal_tab_list() {
    let g = group(4);
    let roving = horizontal(&g);

    let end = press(&roving, Key::End, &g.items[0]);
    assert!(g.items[3].is_focused(), "End focuses the last tab");
    assert!(end.is_default_prevented() && end.is_propagation_stopped());

    press(&roving, Key::ArrowRight, &g.items[3]);
    assert!(g.items[0].is_focused(), "ArrowRight from the last tab wraps to the first");

    let cross = press(&roving, Key::ArrowDown, &g.items[0]);
    assert!(g.items[0].is_focused(), "cross-axis arrows do not move focus");
    assert!(cross.is_default_prevented(), "but they are still consumed");
}

#[test]
fn repeated_next_cycles_over_enabled_items_only() {
    let g = group(5);
    g.items[1].set_disabled(true);
    g.items[3].set_disabled(true);
    let roving = horizontal(&g);
    g.items[0].handle().focus();

    let mut visited = Vec::new();
    for _ in 0..3 {
        let from = g.doc.active_element();
        roving.move_focus(Intent::Next, from.as_ref());
        let at = g
            .items
            .iter()
            .position(|el| el.is_focused())
            .expect("focus stays inside the group");
        visited.push(at);
    }
    assert_eq!(visited, [2, 4, 0], "three steps over three enabled items return to the start");
    assert_eq!(g.items[1].focus_calls(), 0, "disabled items are never tried");
}

#[test]
fn entering_the_group_focuses_the_first_enabled_item() {
    let g = group(3);
    g.items[0].set_disabled(true);
    let roving = horizontal(&g);

    roving.on_focus(&FocusEvent {
        target: Some(g.container.handle()),
        related_target: None,
    });
    assert!(g.items[1].is_focused());
}

#[test]
fn focus_outside_the_group_counts_as_before_the_first_item() {
    let g = group(3);
    let outside = g.doc.create_element("input");
    g.doc.append(None, &outside);
    outside.handle().focus();
    let roving = horizontal(&g);

    roving.move_focus(Intent::Next, Some(&outside.handle()));
    assert!(g.items[0].is_focused(), "Next from outside lands on the first item");

    outside.handle().focus();
    roving.move_focus(Intent::Prev, Some(&outside.handle()));
    assert!(g.items[2].is_focused(), "Prev from outside lands on the last item");
}

#[test]
fn highlight_skips_disabled_items_and_follows_pointer() {
    let g = group(4);
    g.items[2].set_disabled(true);
    let tracker = HighlightTracker::new(g.collection.clone(), HighlightOptions::default());

    tracker.set(Some(0));
    let mut down = KeyboardEvent::new(Key::ArrowDown);
    tracker.on_key_down(&mut down);
    tracker.on_key_down(&mut down);
    assert_eq!(
        tracker.highlighted_element(),
        Some(g.items[3].handle()),
        "two steps from the first item skip the disabled third"
    );

    tracker.highlight_element(&g.items[1].handle());
    assert_eq!(tracker.index(), Some(1));
    tracker.highlight_element(&g.items[2].handle());
    assert_eq!(tracker.index(), None, "a disabled item cannot be highlighted");
}

#[test]
fn highlight_does_not_move_focus() {
    let g = group(3);
    g.container.handle().focus();
    let tracker = HighlightTracker::new(g.collection.clone(), HighlightOptions::default());

    tracker.apply(Intent::Last);
    assert!(g.container.is_focused());
    assert!(g.items.iter().all(|el| el.focus_calls() == 0));
}

#[test]
fn highlight_clears_when_its_items_unregister() {
    use trellis_dom::Element;

    let mut g = group(3);
    let tracker = HighlightTracker::new(g.collection.clone(), HighlightOptions::default());
    tracker.set(Some(2));
    assert!(g.items[2].has_class("--highlighted"));

    g._registrations.clear();
    assert_eq!(tracker.index(), None, "an empty collection has nothing highlighted");
    assert!(
        g.items.iter().all(|el| !el.has_class("--highlighted")),
        "no marker is left behind"
    );
}

#[test]
fn highlight_marker_follows_the_index_when_items_are_inserted() {
    use trellis_dom::Element;

    let mut g = group(2);
    let tracker = HighlightTracker::new(g.collection.clone(), HighlightOptions::default());
    tracker.set(Some(1));

    let first = g.doc.create_element("button");
    g.doc.insert(Some(&g.container), 0, &first);
    g._registrations.push(g.collection.register(ItemData::new("tab-new", &first.handle())));

    assert_eq!(tracker.highlighted_element(), Some(g.items[0].handle()));
    assert!(g.items[0].has_class("--highlighted"));
    assert!(!g.items[1].has_class("--highlighted"), "the marker moved with the index");
}
