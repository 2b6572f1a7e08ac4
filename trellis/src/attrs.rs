// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small attribute and class writers shared by the widget bindings.

use trellis_dom::{Element, ElementRef, WeakElement};

/// Write `"true"` or `"false"`.
pub(crate) fn set_bool(element: &dyn Element, name: &str, value: bool) {
    element.set_attribute(name, if value { "true" } else { "false" });
}

/// Add or remove a valueless attribute such as `disabled` or `hidden`.
pub(crate) fn set_flag(element: &dyn Element, name: &str, present: bool) {
    if present {
        element.set_attribute(name, "");
    } else {
        element.remove_attribute(name);
    }
}

pub(crate) fn set_class(element: &dyn Element, class: &str, on: bool) {
    if on {
        element.add_class(class);
    } else {
        element.remove_class(class);
    }
}

/// Run `f` on the element behind `slot`, if one is bound and still alive.
pub(crate) fn with_bound(slot: &core::cell::RefCell<Option<WeakElement>>, f: impl FnOnce(&ElementRef)) {
    let element = slot.borrow().as_ref().and_then(WeakElement::upgrade);
    if let Some(element) = element {
        f(&element);
    }
}

/// Apply `signal`'s value to `element` now and after every change.
///
/// The element is held weakly; once it is gone the binding does nothing.
pub(crate) fn follow<T: Clone + 'static>(
    signal: &trellis_reactive::Signal<T>,
    element: &ElementRef,
    apply: impl Fn(&ElementRef, &T) + 'static,
) -> trellis_reactive::Disposer {
    signal.with(|value| apply(element, value));
    let weak = element.downgrade();
    signal.subscribe(move |value, _| {
        if let Some(element) = weak.upgrade() {
            apply(&element, value);
        }
    })
}
