// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The selection engine behind accordions, chip groups, and selectable lists.

use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;

use trellis_reactive::{ControllableState, Disposer, Signal};

use crate::value::{SelectionMode, SelectionValue, transition};

/// Options for [`SelectionEngine`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionOptions {
    /// Start in multi-select mode.
    pub multiple: bool,
    /// In single-select mode, selecting the current value clears it.
    pub deselect_on_reselect: bool,
}

struct EngineInner<V> {
    state: ControllableState<SelectionValue<V>>,
    mode: Cell<SelectionMode>,
    deselect_on_reselect: Cell<bool>,
    revision: Cell<u64>,
}

/// Owns a widget root's selection (or expansion) value and applies the
/// single/multi transition rules to it.
///
/// The value lives in a [`ControllableState`], so the engine works unchanged
/// whether the caller controls the value or the widget owns it. Leaf items
/// never write the value directly; they call [`select`](Self::select).
///
/// Cloning yields another handle to the same engine.
///
/// ```rust
/// use trellis_selection::{SelectionEngine, SelectionOptions, SelectionValue};
///
/// let chips = SelectionEngine::<&str>::uncontrolled(SelectionOptions {
///     multiple: true,
///     ..SelectionOptions::default()
/// });
/// chips.select("x");
/// chips.select("y");
/// assert_eq!(chips.selected(), SelectionValue::Multi(vec!["x", "y"]));
/// chips.select("x");
/// assert_eq!(chips.selected().as_slice(), &["y"]);
///
/// // Flipping multiplicity always resets to the new shape's empty value.
/// chips.set_multiple(false);
/// assert_eq!(chips.selected(), SelectionValue::Single(None));
/// ```
pub struct SelectionEngine<V> {
    inner: Rc<EngineInner<V>>,
}

impl<V> Clone for SelectionEngine<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V> fmt::Debug for SelectionEngine<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("state", &self.inner.state)
            .field("mode", &self.inner.mode.get())
            .field("deselect_on_reselect", &self.inner.deselect_on_reselect.get())
            .field("revision", &self.inner.revision.get())
            .finish()
    }
}

impl<V: Clone + PartialEq + 'static> SelectionEngine<V> {
    /// Build an engine over `state`.
    pub fn new(state: ControllableState<SelectionValue<V>>, options: SelectionOptions) -> Self {
        Self {
            inner: Rc::new(EngineInner {
                state,
                mode: Cell::new(SelectionMode::from_multiple(options.multiple)),
                deselect_on_reselect: Cell::new(options.deselect_on_reselect),
                revision: Cell::new(0),
            }),
        }
    }

    /// Build an engine that owns its value, starting empty.
    pub fn uncontrolled(options: SelectionOptions) -> Self {
        let empty = SelectionValue::empty(SelectionMode::from_multiple(options.multiple));
        Self::new(ControllableState::uncontrolled(empty), options)
    }

    /// Select `value` under the current rules.
    ///
    /// Multi-select toggles membership. Single-select replaces a different
    /// value; reselecting the current one clears it only when
    /// deselect-on-reselect is enabled.
    pub fn select(&self, value: V) {
        let current = self.inner.state.get();
        let deselect = match current {
            SelectionValue::Multi(_) => true,
            SelectionValue::Single(_) => self.inner.deselect_on_reselect.get(),
        };
        if let Some(next) = transition(&current, value, deselect) {
            self.commit(next);
        }
    }

    /// Returns `true` if `value` is currently selected.
    #[must_use]
    pub fn is_selected(&self, value: &V) -> bool {
        self.inner.state.signal().with(|v| v.contains(value))
    }

    /// The current value.
    #[must_use]
    pub fn selected(&self) -> SelectionValue<V> {
        self.inner.state.get()
    }

    /// Clear to the empty value of the current mode.
    pub fn reset(&self) {
        let empty = SelectionValue::empty(self.inner.mode.get());
        if self.inner.state.get() != empty {
            self.commit(empty);
        }
    }

    /// Switch between single and multi select.
    ///
    /// Any actual flip discards the current value and resets to the new
    /// shape's empty value; the two shapes are not comparable.
    pub fn set_multiple(&self, multiple: bool) {
        let mode = SelectionMode::from_multiple(multiple);
        if self.inner.mode.replace(mode) == mode {
            return;
        }
        tracing::debug!(target: "trellis_selection", ?mode, "selection mode switched; value reset");
        let empty = SelectionValue::empty(mode);
        if self.inner.state.get() != empty {
            self.commit(empty);
        }
    }

    /// Follow `multiple`, calling [`set_multiple`](Self::set_multiple) on every change.
    pub fn bind_multiple(&self, multiple: &Signal<bool>) -> Disposer {
        let engine = self.clone();
        multiple.subscribe(move |multiple, _| engine.set_multiple(*multiple))
    }

    /// The active mode.
    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.inner.mode.get()
    }

    /// Change the deselect-on-reselect policy.
    pub fn set_deselect_on_reselect(&self, deselect: bool) {
        self.inner.deselect_on_reselect.set(deselect);
    }

    /// Bumped once per actual change requested through this engine.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    /// Observe the effective value.
    pub fn subscribe(&self, callback: impl Fn(&SelectionValue<V>, &SelectionValue<V>) + 'static) -> Disposer {
        self.inner.state.subscribe(callback)
    }

    /// The underlying state bridge.
    #[must_use]
    pub fn state(&self) -> &ControllableState<SelectionValue<V>> {
        &self.inner.state
    }

    fn commit(&self, next: SelectionValue<V>) {
        self.inner.revision.set(self.inner.revision.get() + 1);
        tracing::trace!(
            target: "trellis_selection",
            revision = self.inner.revision.get(),
            len = next.len(),
            "selection changed"
        );
        self.inner.state.set(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use trellis_reactive::{PropKeys, StateOptions};

    #[test]
    fn revision_bumps_only_on_change() {
        let engine = SelectionEngine::<u8>::uncontrolled(SelectionOptions::default());
        engine.select(1);
        engine.select(1);
        engine.reset();
        engine.reset();
        assert_eq!(engine.revision(), 2);
    }

    #[test]
    fn controlled_engine_emits_and_reads_external_value() {
        let external = Signal::new(SelectionValue::Single(Some(1_u8)));
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = emitted.clone();
        let props = PropKeys::new().with("modelValue").with("update:modelValue");
        let state = ControllableState::new(
            &props,
            external.clone(),
            move |v| sink.borrow_mut().push(v),
            StateOptions::new(SelectionValue::default()),
        );
        let engine = SelectionEngine::new(state, SelectionOptions {
            multiple: false,
            deselect_on_reselect: true,
        });

        assert!(engine.is_selected(&1));
        engine.select(1);
        assert_eq!(*emitted.borrow(), vec![SelectionValue::Single(None)]);
        assert!(engine.is_selected(&1), "nothing changes until the caller applies the update");

        external.set(SelectionValue::Single(Some(2)));
        engine.select(3);
        assert_eq!(emitted.borrow().last(), Some(&SelectionValue::Single(Some(3))));
    }

    #[test]
    fn bound_multiplicity_resets_on_every_flip() {
        let multiple = Signal::new(false);
        let engine = SelectionEngine::<u8>::uncontrolled(SelectionOptions::default());
        let _binding = engine.bind_multiple(&multiple);

        engine.select(4);
        multiple.set(true);
        assert_eq!(engine.selected(), SelectionValue::Multi(Vec::new()));
        engine.select(4);
        engine.select(5);
        multiple.set(false);
        assert_eq!(engine.selected(), SelectionValue::Single(None));
        engine.set_multiple(false);
        assert_eq!(engine.mode(), SelectionMode::Single);
    }
}
