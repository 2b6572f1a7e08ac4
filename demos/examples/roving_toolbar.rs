// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Roving toolbar with chips.
//!
//! A horizontal toolbar of filter chips. Arrow keys move real focus and skip
//! the disabled chip; clicking toggles chips in a multi-select group.
//!
//! Run:
//! - `cargo run -p trellis_demos --example roving_toolbar`

use std::rc::Rc;

use trellis::{Chip, ChipGroup, ChipGroupOptions};
use trellis_collection::{Collection, ItemData};
use trellis_demos::{describe, init_tracing};
use trellis_dom::mock::MockDocument;
use trellis_dom::{Key, KeyboardEvent};
use trellis_navigation::{Orientation, RovingFocus, RovingFocusOptions};

fn main() {
    init_tracing();
    let doc = MockDocument::new();
    let toolbar = doc.create_element("div");
    doc.append(None, &toolbar);

    let collection = Collection::new();
    collection.set_container(Some(&toolbar.handle()));
    let group = ChipGroup::new(ChipGroupOptions {
        multiple: true,
        ..Default::default()
    });

    let labels = ["open", "closed", "archived", "draft"];
    let mut chips = Vec::new();
    let mut registrations = Vec::new();
    for label in labels {
        let el = doc.create_element("button");
        doc.append(Some(&toolbar), &el);
        let chip = Chip::new(Some(&group), label).expect("chips live inside a group");
        chip.bind(&el.handle());
        registrations.push(collection.register(ItemData::new(label, &el.handle())));
        chips.push((chip, el));
    }
    chips[2].1.set_disabled(true);

    let roving = RovingFocus::new(
        Rc::new(doc.clone()),
        collection,
        RovingFocusOptions {
            orientation: Orientation::Horizontal,
            ..Default::default()
        },
    );

    chips[0].1.handle().focus();
    for _ in 0..4 {
        let mut right = KeyboardEvent::new(Key::ArrowRight);
        roving.on_key_down(&mut right);
        let now = chips.iter().find(|(_, el)| el.is_focused()).map(|(chip, _)| chip.value());
        println!("ArrowRight -> {now:?}");
    }

    chips[0].0.on_click();
    chips[3].0.on_click();
    chips[0].0.on_click();
    println!("selected: {:?}", group.selected().as_slice());
    for (chip, el) in &chips {
        println!("  {:>8}: {}", chip.value(), describe(el, &["aria-pressed"]));
    }
}
