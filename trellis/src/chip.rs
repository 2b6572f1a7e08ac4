// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chip group: toggle buttons sharing one selection.

use alloc::string::String;
use core::fmt;

use trellis_dom::ElementRef;
use trellis_reactive::{ContextError, ControllableState, Disposer, Scope, Signal, require};
use trellis_selection::{SelectionEngine, SelectionMode, SelectionOptions, SelectionValue};

use crate::attrs::{follow, set_bool, set_class};

/// Options for [`ChipGroup`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChipGroupOptions {
    /// Several chips may be pressed at once.
    pub multiple: bool,
    /// In single mode, clicking the pressed chip releases it.
    pub deselect_on_reselect: bool,
}

/// A group of chips backed by a [`SelectionEngine`] over chip values.
///
/// ```rust
/// use trellis::{ChipGroup, ChipGroupOptions};
/// use trellis_selection::SelectionValue;
///
/// let group = ChipGroup::new(ChipGroupOptions { multiple: true, ..Default::default() });
/// group.select("x");
/// group.select("y");
/// group.select("x");
/// assert_eq!(group.selected(), SelectionValue::Multi(vec!["y".into()]));
/// ```
#[derive(Clone, Debug)]
pub struct ChipGroup {
    engine: SelectionEngine<String>,
}

impl ChipGroup {
    /// A group that owns its selection.
    pub fn new(options: ChipGroupOptions) -> Self {
        let empty = SelectionValue::empty(SelectionMode::from_multiple(options.multiple));
        Self::with_state(ControllableState::uncontrolled(empty), options)
    }

    /// A group over a caller-chosen state bridge.
    pub fn with_state(state: ControllableState<SelectionValue<String>>, options: ChipGroupOptions) -> Self {
        Self {
            engine: SelectionEngine::new(
                state,
                SelectionOptions {
                    multiple: options.multiple,
                    deselect_on_reselect: options.deselect_on_reselect,
                },
            ),
        }
    }

    /// Press or release the chip with `value`.
    pub fn select(&self, value: &str) {
        self.engine.select(String::from(value));
    }

    /// Pressed chip values.
    #[must_use]
    pub fn selected(&self) -> SelectionValue<String> {
        self.engine.selected()
    }

    /// Returns `true` if the chip with `value` is pressed.
    #[must_use]
    pub fn is_selected(&self, value: &str) -> bool {
        self.engine.state().signal().with(|v| v.iter().any(|s| s == value))
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

/// One chip in a [`ChipGroup`].
pub struct Chip {
    group: ChipGroup,
    value: String,
    pressed: Signal<bool>,
    scope: Scope,
}

impl fmt::Debug for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chip")
            .field("value", &self.value)
            .field("pressed", &self.pressed.get())
            .finish_non_exhaustive()
    }
}

impl Chip {
    /// A chip for `value` inside `group`.
    pub fn new(group: Option<&ChipGroup>, value: &str) -> Result<Self, ContextError> {
        let group = require(group, "Chip", "ChipGroup")?.clone();
        let value = String::from(value);
        let pressed = Signal::new(group.engine.is_selected(&value));
        let scope = Scope::new();
        {
            let pressed = pressed.clone();
            let value = value.clone();
            scope.add(group.engine.subscribe(move |selected, _| {
                pressed.set(selected.contains(&value));
            }));
        }
        Ok(Self {
            group,
            value,
            pressed,
            scope,
        })
    }

    /// The chip's value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns `true` while pressed.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.pressed.get()
    }

    /// Handle a click.
    pub fn on_click(&self) {
        self.group.select(&self.value);
    }

    /// Keep `aria-pressed` and the `--selected` class in sync on `element`.
    pub fn bind(&self, element: &ElementRef) {
        self.scope.add(follow(&self.pressed, element, |el, pressed| {
            set_bool(&**el, "aria-pressed", *pressed);
            set_class(&**el, "--selected", *pressed);
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_dom::Element;
    use trellis_dom::mock::MockDocument;

    #[test]
    fn chips_need_a_group() {
        assert_eq!(
            Chip::new(None, "x").unwrap_err(),
            ContextError::Missing {
                component: "Chip",
                ancestor: "ChipGroup"
            }
        );
    }

    #[test]
    fn single_mode_keeps_a_pressed_chip_without_deselect() {
        let group = ChipGroup::new(ChipGroupOptions::default());
        let chip = Chip::new(Some(&group), "a").unwrap();
        chip.on_click();
        chip.on_click();
        assert!(chip.is_selected(), "reselect is a no-op without deselect_on_reselect");

        group.engine().set_deselect_on_reselect(true);
        chip.on_click();
        assert!(!chip.is_selected());
    }

    #[test]
    fn binding_reflects_pressed_state() {
        let doc = MockDocument::new();
        let el = doc.create_element("button");
        let group = ChipGroup::new(ChipGroupOptions::default());
        let a = Chip::new(Some(&group), "a").unwrap();
        let b = Chip::new(Some(&group), "b").unwrap();
        a.bind(&el.handle());
        assert_eq!(el.attribute("aria-pressed").as_deref(), Some("false"));

        a.on_click();
        assert_eq!(el.attribute("aria-pressed").as_deref(), Some("true"));
        assert!(el.has_class("--selected"));

        b.on_click();
        assert_eq!(el.attribute("aria-pressed").as_deref(), Some("false"));
        assert!(!el.has_class("--selected"));
    }
}
