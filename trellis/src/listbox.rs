// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! List selection: a selectable list whose items register their values.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashMap;
use trellis_dom::ElementRef;
use trellis_reactive::{ContextError, ControllableState, Disposer, Scope, Signal, require};
use trellis_selection::{SelectionEngine, SelectionMode, SelectionOptions, SelectionValue};

use crate::attrs::{follow, set_bool, set_class};

/// Options for [`ListSelection`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ListSelectionOptions {
    /// Several values may be selected at once.
    pub multiple: bool,
    /// In single mode, selecting the selected value clears it.
    pub deselect_on_reselect: bool,
}

/// The list root: a selection plus the set of values its items registered.
///
/// Registration is counted, so two items sharing a value keep it registered
/// until both are gone. Selecting a value nobody registered is allowed; the
/// registry is informational.
#[derive(Clone)]
pub struct ListSelection {
    engine: SelectionEngine<String>,
    values: Rc<RefCell<HashMap<String, usize>>>,
}

impl fmt::Debug for ListSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSelection")
            .field("selected", &self.engine.selected())
            .field("registered", &self.values.borrow().len())
            .finish()
    }
}

impl ListSelection {
    /// A list that owns its selection.
    pub fn new(options: ListSelectionOptions) -> Self {
        let empty = SelectionValue::empty(SelectionMode::from_multiple(options.multiple));
        Self::with_state(ControllableState::uncontrolled(empty), options)
    }

    /// A list over a caller-chosen state bridge.
    pub fn with_state(state: ControllableState<SelectionValue<String>>, options: ListSelectionOptions) -> Self {
        Self {
            engine: SelectionEngine::new(
                state,
                SelectionOptions {
                    multiple: options.multiple,
                    deselect_on_reselect: options.deselect_on_reselect,
                },
            ),
            values: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Register `value`; the returned disposer unregisters it.
    pub fn register(&self, value: &str) -> Disposer {
        *self.values.borrow_mut().entry(String::from(value)).or_insert(0) += 1;
        tracing::trace!(target: "trellis::listbox", value, "registered list value");

        let values = Rc::downgrade(&self.values);
        let value = String::from(value);
        Disposer::new(move || {
            let Some(values) = values.upgrade() else {
                return;
            };
            let mut values = values.borrow_mut();
            if let Some(count) = values.get_mut(&value) {
                *count -= 1;
                if *count == 0 {
                    values.remove(&value);
                }
            }
        })
    }

    /// Returns `true` while some item holds `value`.
    #[must_use]
    pub fn is_registered(&self, value: &str) -> bool {
        self.values.borrow().contains_key(value)
    }

    /// Registered values, in no particular order.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        self.values.borrow().keys().cloned().collect()
    }

    /// Select `value` under the list's rules.
    pub fn on_select(&self, value: &str) {
        self.engine.select(String::from(value));
    }

    /// The selection.
    #[must_use]
    pub fn selected(&self) -> SelectionValue<String> {
        self.engine.selected()
    }

    /// Switch multi-select on or off, clearing the selection on a flip.
    pub fn set_multiple(&self, multiple: bool) {
        self.engine.set_multiple(multiple);
    }

    /// Follow a `multiple` prop.
    pub fn bind_multiple(&self, multiple: &Signal<bool>) -> Disposer {
        self.engine.bind_multiple(multiple)
    }

    /// The selection engine.
    #[must_use]
    pub fn engine(&self) -> &SelectionEngine<String> {
        &self.engine
    }
}

/// One selectable row of a [`ListSelection`].
///
/// The value stays registered for the item's lifetime.
pub struct ListItem {
    list: ListSelection,
    value: String,
    selected: Signal<bool>,
    scope: Scope,
}

impl fmt::Debug for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListItem")
            .field("value", &self.value)
            .field("selected", &self.selected.get())
            .finish_non_exhaustive()
    }
}

impl ListItem {
    /// An item for `value` inside `list`.
    pub fn new(list: Option<&ListSelection>, value: &str) -> Result<Self, ContextError> {
        let list = require(list, "ListItem", "List")?.clone();
        let value = String::from(value);
        let selected = Signal::new(list.engine.is_selected(&value));
        let scope = Scope::new();
        scope.add(list.register(&value));
        {
            let selected = selected.clone();
            let value = value.clone();
            scope.add(list.engine.subscribe(move |current, _| {
                selected.set(current.contains(&value));
            }));
        }
        Ok(Self {
            list,
            value,
            selected,
            scope,
        })
    }

    /// The item's value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns `true` while selected.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    /// Handle a click.
    pub fn on_click(&self) {
        self.list.on_select(&self.value);
    }

    /// Keep `aria-selected` and the `--selected` class in sync on `element`.
    pub fn bind(&self, element: &ElementRef) {
        element.set_attribute("role", "option");
        self.scope.add(follow(&self.selected, element, |el, selected| {
            set_bool(&**el, "aria-selected", *selected);
            set_class(&**el, "--selected", *selected);
        }));
    }
}
