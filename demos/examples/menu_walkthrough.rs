// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu walkthrough.
//!
//! A File menu with a hover-opened "Recent" submenu. Shows keyboard opening,
//! virtual highlight with `aria-activedescendant`, hover delays on a manual
//! clock, and innermost-first dismissal through the layer stack.
//!
//! Run:
//! - `cargo run -p trellis_demos --example menu_walkthrough`
//! - `RUST_LOG=trace cargo run -p trellis_demos --example menu_walkthrough`

use std::rc::Rc;
use std::time::Duration;

use trellis::{Menu, MenuEnv, MenuItem, MenuItemOptions, MenuOptions};
use trellis_demos::{describe, init_tracing};
use trellis_dom::mock::{MockDocument, MockElement};
use trellis_dom::{Key, KeyboardEvent};
use trellis_timing::ManualScheduler;

fn item(doc: &MockDocument, menu: &Menu, content: &Rc<MockElement>, label: &'static str) -> MenuItem {
    let el = doc.create_element("button");
    doc.append(Some(content), &el);
    MenuItem::new(Some(menu), &el.handle(), MenuItemOptions::default(), move || {
        println!("  activated {label:?}");
    })
    .expect("items are built inside their menu")
}

fn main() {
    init_tracing();
    let doc = MockDocument::new();
    let clock = ManualScheduler::new();
    let env = MenuEnv::new(Rc::new(doc.clone()), Rc::new(clock.clone()));

    let file = Menu::new(env.clone(), MenuOptions::default());
    let trigger = doc.create_element("button");
    let content = doc.create_element("div");
    doc.append(None, &trigger);
    doc.append(None, &content);
    file.bind_trigger(&trigger.handle());
    file.bind_content(&content.handle());
    let _new = item(&doc, &file, &content, "New");
    let _save = item(&doc, &file, &content, "Save");

    let recent = file.submenu(MenuOptions::default());
    let recent_trigger = doc.create_element("button");
    let recent_content = doc.create_element("div");
    doc.append(Some(&content), &recent_trigger);
    doc.append(Some(&content), &recent_content);
    recent.bind_trigger(&recent_trigger.handle());
    recent.bind_content(&recent_content.handle());
    let _a = item(&doc, &recent, &recent_content, "notes.txt");
    let _b = item(&doc, &recent, &recent_content, "todo.md");

    println!("trigger: {}", describe(&trigger, &["aria-haspopup", "aria-expanded", "aria-controls"]));

    let mut enter = KeyboardEvent::new(Key::Enter);
    file.on_trigger_key_down(&mut enter);
    clock.advance(Duration::ZERO);
    file.on_content_focus();
    println!("opened with Enter; content focused: {}", content.is_focused());
    println!("content: {}", describe(&content, &["role", "aria-activedescendant"]));

    for key in [Key::ArrowDown, Key::End, Key::Home] {
        let name = key.as_str().to_owned();
        let mut event = KeyboardEvent::new(key);
        file.on_content_key_down(&mut event);
        println!("{name}: highlight {:?}", file.highlight().index());
    }
    let mut right = KeyboardEvent::new(Key::ArrowRight);
    file.on_content_key_down(&mut right);

    println!("hovering the Recent trigger");
    recent.on_trigger_pointer_enter();
    clock.advance(Duration::from_millis(60));
    println!("  after 60 ms open: {}", recent.is_open());
    clock.advance(Duration::from_millis(40));
    println!("  after 100 ms open: {}", recent.is_open());
    println!("  layers open: {}", env.layers.len());

    doc.key_down(KeyboardEvent::new(Key::Escape));
    println!("Escape: recent open {}, file open {}", recent.is_open(), file.is_open());
    doc.key_down(KeyboardEvent::new(Key::Escape));
    println!("Escape: file open {}, trigger focused {}", file.is_open(), trigger.is_focused());
    println!("background restored: {}", doc.pointer_events_enabled());
}
