// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mode-switchable selection with caller-decided deselection.

use trellis_reactive::Signal;

use crate::value::{SelectionMode, SelectionValue, transition};

/// A selection whose deselection rule is decided per call.
///
/// Unlike [`SelectionEngine`](crate::SelectionEngine), which fixes its
/// deselection policy up front, a scope lets each gesture decide: a plain
/// click might select without ever deselecting, while a modifier click
/// passes `should_deselect = true`.
///
/// ```rust
/// use trellis_selection::{SelectionMode, SelectionScope};
///
/// let scope = SelectionScope::new(SelectionMode::Multi);
/// scope.select('a', false);
/// scope.select('b', false);
/// scope.select('a', false);
/// assert_eq!(scope.selected().as_slice(), &['a', 'b']);
/// scope.select('a', true);
/// assert_eq!(scope.selected().as_slice(), &['b']);
/// ```
#[derive(Clone, Debug)]
pub struct SelectionScope<V> {
    selected: Signal<SelectionValue<V>>,
    mode: Signal<SelectionMode>,
}

impl<V: Clone + PartialEq + 'static> SelectionScope<V> {
    /// An empty scope in `mode`.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            selected: Signal::new(SelectionValue::empty(mode)),
            mode: Signal::new(mode),
        }
    }

    /// A scope over an existing signal, for example one seeded with default selections.
    ///
    /// The mode is taken from the signal's current shape.
    pub fn with_selected(selected: Signal<SelectionValue<V>>) -> Self {
        let mode = selected.with(SelectionValue::mode);
        Self {
            selected,
            mode: Signal::new(mode),
        }
    }

    /// Select `value`; an already selected value is removed only when `should_deselect` is set.
    pub fn select(&self, value: V, should_deselect: bool) {
        let next = self
            .selected
            .with(|current| transition(current, value, should_deselect));
        if let Some(next) = next {
            self.selected.set(next);
        }
    }

    /// The current value.
    #[must_use]
    pub fn selected(&self) -> SelectionValue<V> {
        self.selected.get()
    }

    /// The signal holding the value.
    #[must_use]
    pub fn signal(&self) -> &Signal<SelectionValue<V>> {
        &self.selected
    }

    /// The active mode.
    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.mode.get()
    }

    /// Switch modes. A change of mode resets the value to the new shape's empty value.
    pub fn set_mode(&self, mode: SelectionMode) {
        if self.mode.set(mode) {
            self.selected.set(SelectionValue::empty(mode));
        }
    }

    /// Clear to the empty value of the current mode.
    pub fn reset_selected(&self) {
        self.selected.set(SelectionValue::empty(self.mode.get()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn single_scope_replaces_and_deselects_on_request() {
        let scope = SelectionScope::new(SelectionMode::Single);
        scope.select(1, false);
        scope.select(2, false);
        assert_eq!(scope.selected(), SelectionValue::Single(Some(2)));
        scope.select(2, false);
        assert_eq!(scope.selected(), SelectionValue::Single(Some(2)));
        scope.select(2, true);
        assert!(scope.selected().is_empty());
    }

    #[test]
    fn mode_switch_resets_and_seeded_scopes_keep_their_shape() {
        let seeded = Signal::new(SelectionValue::Multi(vec![1, 2]));
        let scope = SelectionScope::with_selected(seeded.clone());
        assert_eq!(scope.mode(), SelectionMode::Multi);

        scope.set_mode(SelectionMode::Multi);
        assert_eq!(seeded.get().len(), 2, "same mode keeps the value");
        scope.set_mode(SelectionMode::Single);
        assert_eq!(seeded.get(), SelectionValue::Single(None));

        scope.select(9, false);
        scope.reset_selected();
        assert!(scope.selected().is_empty());
    }
}
