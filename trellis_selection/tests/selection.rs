// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `trellis_selection` crate.
//!
//! These exercise the transition rules of `SelectionEngine` across both
//! shapes, including the reset that accompanies every multiplicity flip.

use std::cell::RefCell;
use std::rc::Rc;

use trellis_selection::{SelectionEngine, SelectionMode, SelectionOptions, SelectionValue};

fn engine(multiple: bool, deselect_on_reselect: bool) -> SelectionEngine<u32> {
    SelectionEngine::uncontrolled(SelectionOptions {
        multiple,
        deselect_on_reselect,
    })
}

#[test]
fn reselect_in_single_mode_follows_the_policy() {
    for start in [1_u32, 7, 42] {
        let clearing = engine(false, true);
        clearing.select(start);
        clearing.select(start);
        assert!(clearing.selected().is_empty(), "deselect-on-reselect clears {start}");

        let sticky = engine(false, false);
        sticky.select(start);
        let before = sticky.selected();
        sticky.select(start);
        assert_eq!(sticky.selected(), before, "without the policy {start} stays selected");
    }
}

#[test]
fn double_select_in_multi_mode_restores_the_set() {
    let engine = engine(true, false);
    for v in [3, 1, 4] {
        engine.select(v);
    }
    let original = engine.selected();

    for v in [1, 5, 9] {
        engine.select(v);
        engine.select(v);
        let mut now = engine.selected().as_slice().to_vec();
        let mut then = original.as_slice().to_vec();
        now.sort_unstable();
        then.sort_unstable();
        assert_eq!(now, then, "selecting {v} twice is the identity on the set");
    }
}

#[test]
fn multi_mode_ignores_the_reselect_policy() {
    let engine = engine(true, false);
    engine.select(1);
    engine.select(1);
    assert!(engine.selected().is_empty(), "multi select always toggles");
}

#[test]
fn flipping_multiplicity_yields_the_empty_shape() {
    for multiple in [false, true] {
        let engine = engine(multiple, true);
        engine.select(2);
        engine.select(3);
        assert!(!engine.selected().is_empty());

        engine.set_multiple(!multiple);
        assert_eq!(
            engine.selected(),
            SelectionValue::empty(SelectionMode::from_multiple(!multiple))
        );
    }
}

#[test]
fn subscribers_see_each_change_once() {
    let engine = engine(false, true);
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let _sub = engine.subscribe(move |new, old| sink.borrow_mut().push((old.clone(), new.clone())));

    engine.select(1);
    engine.select(2);
    engine.select(2);

    assert_eq!(
        *log.borrow(),
        vec![
            (SelectionValue::Single(None), SelectionValue::Single(Some(1))),
            (SelectionValue::Single(Some(1)), SelectionValue::Single(Some(2))),
            (SelectionValue::Single(Some(2)), SelectionValue::Single(None)),
        ]
    );
    assert_eq!(engine.revision(), 3);
}

#[test]
fn chip_group_scenario() {
    let chips = SelectionEngine::<&str>::uncontrolled(SelectionOptions {
        multiple: true,
        ..SelectionOptions::default()
    });
    chips.select("x");
    chips.select("y");
    assert_eq!(chips.selected(), SelectionValue::Multi(vec!["x", "y"]));
    chips.select("x");
    assert_eq!(chips.selected(), SelectionValue::Multi(vec!["y"]));
}
