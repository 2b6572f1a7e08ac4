// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accordion basics.
//!
//! Two items in a single-expand accordion: click the first open, switch to
//! the second, click it closed, then flip to multi-expand.
//!
//! Run:
//! - `cargo run -p trellis_demos --example accordion_basics`

use std::rc::Rc;

use trellis::{Accordion, AccordionItem, AccordionItemOptions, AccordionOptions};
use trellis_collection::IdRegistry;
use trellis_demos::{describe, init_tracing};
use trellis_dom::mock::{MockDocument, MockElement};
use trellis_dom::{Key, KeyboardEvent};

const TRIGGER_ATTRS: &[&str] = &["id", "aria-expanded", "aria-controls"];

fn main() {
    init_tracing();
    let doc = MockDocument::new();
    let accordion = Accordion::new(Rc::new(doc.clone()), IdRegistry::new(), AccordionOptions::default());

    let mut items: Vec<(AccordionItem, Rc<MockElement>)> = Vec::new();
    for _ in 0..2 {
        let item = AccordionItem::new(Some(&accordion), AccordionItemOptions::default())
            .expect("the item is inside an accordion");
        let trigger = doc.create_element("button");
        let content = doc.create_element("section");
        doc.append(None, &trigger);
        doc.append(None, &content);
        item.bind_trigger(&trigger.handle());
        item.bind_content(&content.handle());
        items.push((item, trigger));
    }

    let print = |label: &str| {
        println!("{label}");
        for (_, trigger) in &items {
            println!("  {}", describe(trigger, TRIGGER_ATTRS));
        }
    };

    print("initial:");
    items[0].0.on_trigger_click();
    print("after clicking the first trigger:");
    items[1].0.on_trigger_click();
    print("after clicking the second trigger:");
    items[1].0.on_trigger_click();
    print("after clicking the second trigger again:");

    // Keyboard: ArrowDown moves between triggers, looping at the end.
    items[1].1.handle().focus();
    let mut down = KeyboardEvent::new(Key::ArrowDown);
    accordion.on_key_down(&mut down);
    println!("ArrowDown from the last trigger focuses the first: {}", items[0].1.is_focused());

    accordion.set_multiple(true);
    items[0].0.on_trigger_click();
    items[1].0.on_trigger_click();
    print("multi-expand with both clicked:");
    println!("expanded keys: {:?}", accordion.expanded().as_slice());
}
