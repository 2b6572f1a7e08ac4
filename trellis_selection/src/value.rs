// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection values and the transition rules shared by every selection owner.

use alloc::vec::Vec;

/// Which shape a selection holds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// At most one value.
    #[default]
    Single,
    /// An ordered sequence of values.
    Multi,
}

impl SelectionMode {
    /// `Multi` when `multiple` is set.
    #[must_use]
    pub fn from_multiple(multiple: bool) -> Self {
        if multiple { Self::Multi } else { Self::Single }
    }
}

/// A selection: a single optional value or an ordered sequence, never both.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SelectionValue<V> {
    /// Single-select state; `None` is empty.
    Single(Option<V>),
    /// Multi-select state, in selection order.
    Multi(Vec<V>),
}

impl<V> Default for SelectionValue<V> {
    fn default() -> Self {
        Self::Single(None)
    }
}

impl<V> SelectionValue<V> {
    /// The empty value for `mode`.
    #[must_use]
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Self::Single(None),
            SelectionMode::Multi => Self::Multi(Vec::new()),
        }
    }

    /// The shape of this value.
    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::Single(_) => SelectionMode::Single,
            Self::Multi(_) => SelectionMode::Multi,
        }
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(v) => v.is_none(),
            Self::Multi(v) => v.is_empty(),
        }
    }

    /// Number of selected values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(v) => usize::from(v.is_some()),
            Self::Multi(v) => v.len(),
        }
    }

    /// Selected values in order.
    #[must_use]
    pub fn as_slice(&self) -> &[V] {
        match self {
            Self::Single(v) => v.as_slice(),
            Self::Multi(v) => v,
        }
    }

    /// Iterate over selected values.
    pub fn iter(&self) -> core::slice::Iter<'_, V> {
        self.as_slice().iter()
    }
}

impl<V: PartialEq> SelectionValue<V> {
    /// Returns `true` if `value` is selected.
    #[must_use]
    pub fn contains(&self, value: &V) -> bool {
        self.as_slice().contains(value)
    }
}

/// Apply a selection of `value` to `current`.
///
/// - `Single`: a different value replaces the current one; the current value
///   is cleared only when `deselect` is set, otherwise it is left alone.
/// - `Multi`: a new value is appended; a present value is removed only when
///   `deselect` is set.
///
/// The shape of `current` decides the rule. The result is `None` when nothing
/// changes.
///
/// ```rust
/// use trellis_selection::{SelectionValue, transition};
///
/// let none = SelectionValue::<u8>::Single(None);
/// let one = transition(&none, 1, false).unwrap();
/// assert_eq!(one, SelectionValue::Single(Some(1)));
/// assert_eq!(transition(&one, 1, false), None);
/// assert_eq!(transition(&one, 1, true), Some(none));
/// ```
#[must_use]
pub fn transition<V: Clone + PartialEq>(
    current: &SelectionValue<V>,
    value: V,
    deselect: bool,
) -> Option<SelectionValue<V>> {
    match current {
        SelectionValue::Single(selected) => match selected {
            Some(selected) if *selected == value => {
                deselect.then_some(SelectionValue::Single(None))
            }
            _ => Some(SelectionValue::Single(Some(value))),
        },
        SelectionValue::Multi(selected) => {
            if selected.contains(&value) {
                deselect.then(|| {
                    SelectionValue::Multi(selected.iter().filter(|v| **v != value).cloned().collect())
                })
            } else {
                let mut next = selected.clone();
                next.push(value);
                Some(SelectionValue::Multi(next))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn multi_appends_and_toggles() {
        let empty = SelectionValue::<char>::empty(SelectionMode::Multi);
        let x = transition(&empty, 'x', true).unwrap();
        let xy = transition(&x, 'y', true).unwrap();
        assert_eq!(xy, SelectionValue::Multi(vec!['x', 'y']));

        let y = transition(&xy, 'x', true).unwrap();
        assert_eq!(y.as_slice(), &['y']);
        assert_eq!(transition(&xy, 'x', false), None, "present values stay without deselect");
    }

    #[test]
    fn shape_queries() {
        let single = SelectionValue::Single(Some(3));
        assert_eq!(single.mode(), SelectionMode::Single);
        assert_eq!(single.len(), 1);
        assert!(single.contains(&3));
        assert!(!single.contains(&4));

        let multi = SelectionValue::<i32>::empty(SelectionMode::from_multiple(true));
        assert_eq!(multi.mode(), SelectionMode::Multi);
        assert!(multi.is_empty());
        assert_eq!(SelectionValue::<i32>::default(), SelectionValue::Single(None));
    }
}
