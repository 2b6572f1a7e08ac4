// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controlled/uncontrolled state.
//!
//! A logical property `name` is **controlled** when the caller supplied both a
//! value under `name` (or its kebab-case alias) and a change handler under
//! `update:<name>` (or `update:<kebab-name>`). Controlled reads come from the
//! caller's signal and writes are emitted through the caller's handler; the
//! bridge keeps no copy of its own. Otherwise the bridge owns a local signal
//! seeded with the default value.
//!
//! The mode is fixed at construction.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::fmt;

use hashbrown::HashSet;

use crate::scope::Disposer;
use crate::signal::Signal;

/// Convert a camelCase property name to its kebab-case alias (`modelValue` → `model-value`).
#[must_use]
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// The set of property names a caller supplied to a widget.
#[derive(Clone, Debug, Default)]
pub struct PropKeys {
    keys: HashSet<String>,
}

impl PropKeys {
    /// No properties supplied.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `key` was supplied.
    #[must_use]
    pub fn with(mut self, key: &str) -> Self {
        self.keys.insert(key.to_string());
        self
    }

    /// Returns `true` if `key` was supplied.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Returns `true` if `name` is controlled under the naming convention.
    #[must_use]
    pub fn is_controlled(&self, name: &str) -> bool {
        let kebab = kebab_case(name);
        let has_value = self.contains(name) || self.contains(&kebab);
        let has_handler =
            self.contains(&format!("update:{name}")) || self.contains(&format!("update:{kebab}"));
        has_value && has_handler
    }
}

impl<'a> FromIterator<&'a str> for PropKeys {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(ToString::to_string).collect(),
        }
    }
}

/// Options for [`ControllableState::new`].
#[derive(Clone, Debug)]
pub struct StateOptions<T> {
    /// Logical property name. Defaults to `"modelValue"`.
    pub name: String,
    /// Seed for locally owned state.
    pub default_value: T,
}

impl<T> StateOptions<T> {
    /// Options for the default `modelValue` property.
    pub fn new(default_value: T) -> Self {
        Self {
            name: String::from("modelValue"),
            default_value,
        }
    }

    /// Use a different logical property name.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

/// A value that is either owned locally or driven by the caller.
pub enum ControllableState<T> {
    /// Reads mirror the caller's signal; writes go to the caller's handler.
    Controlled {
        /// The caller's value.
        value: Signal<T>,
        /// The caller's `update:<name>` handler.
        emit: Rc<dyn Fn(T)>,
    },
    /// Locally owned state.
    Uncontrolled(Signal<T>),
}

impl<T> fmt::Debug for ControllableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Controlled { .. } => f.write_str("ControllableState::Controlled"),
            Self::Uncontrolled(_) => f.write_str("ControllableState::Uncontrolled"),
        }
    }
}

impl<T> Clone for ControllableState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Controlled { value, emit } => Self::Controlled {
                value: value.clone(),
                emit: emit.clone(),
            },
            Self::Uncontrolled(local) => Self::Uncontrolled(local.clone()),
        }
    }
}

impl<T: Clone + PartialEq + 'static> ControllableState<T> {
    /// Decide the mode from `props` and build the bridge.
    ///
    /// `prop` and `emit` are only retained in controlled mode.
    pub fn new(
        props: &PropKeys,
        prop: Signal<T>,
        emit: impl Fn(T) + 'static,
        options: StateOptions<T>,
    ) -> Self {
        if props.is_controlled(&options.name) {
            tracing::trace!(target: "trellis_reactive", name = %options.name, "controlled state");
            Self::controlled(prop, emit)
        } else {
            Self::uncontrolled(options.default_value)
        }
    }

    /// Always controlled.
    pub fn controlled(value: Signal<T>, emit: impl Fn(T) + 'static) -> Self {
        Self::Controlled {
            value,
            emit: Rc::new(emit),
        }
    }

    /// Always locally owned, seeded with `default_value`.
    pub fn uncontrolled(default_value: T) -> Self {
        Self::Uncontrolled(Signal::new(default_value))
    }

    /// Returns `true` in controlled mode.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        matches!(self, Self::Controlled { .. })
    }

    /// The current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.signal().get()
    }

    /// Write a value: locally, or by emitting to the caller.
    pub fn set(&self, value: T) {
        match self {
            Self::Controlled { emit, .. } => emit(value),
            Self::Uncontrolled(local) => {
                local.set(value);
            }
        }
    }

    /// Write `f(current)`.
    pub fn set_with(&self, f: impl FnOnce(&T) -> T) {
        let next = self.signal().with(f);
        self.set(next);
    }

    /// Observe the effective value.
    pub fn subscribe(&self, callback: impl Fn(&T, &T) + 'static) -> Disposer {
        self.signal().subscribe(callback)
    }

    /// The signal reads come from.
    #[must_use]
    pub fn signal(&self) -> &Signal<T> {
        match self {
            Self::Controlled { value, .. } => value,
            Self::Uncontrolled(local) => local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[test]
    fn kebab_aliases() {
        assert_eq!(kebab_case("modelValue"), "model-value");
        assert_eq!(kebab_case("expanded"), "expanded");
        assert_eq!(kebab_case("activeItemId"), "active-item-id");
    }

    #[test]
    fn controlled_requires_value_and_handler() {
        let value_only: PropKeys = ["modelValue"].into_iter().collect();
        assert!(!value_only.is_controlled("modelValue"));

        let handler_only: PropKeys = ["update:modelValue"].into_iter().collect();
        assert!(!handler_only.is_controlled("modelValue"));

        let both = PropKeys::new().with("model-value").with("update:modelValue");
        assert!(both.is_controlled("modelValue"), "aliases may be mixed");

        let kebab_handler = PropKeys::new().with("expanded").with("update:expanded");
        assert!(kebab_handler.is_controlled("expanded"));
    }

    #[test]
    fn controlled_writes_emit_without_local_state() {
        let external = Signal::new(1_u32);
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = emitted.clone();
        let props = PropKeys::new().with("modelValue").with("update:modelValue");

        let state = ControllableState::new(
            &props,
            external.clone(),
            move |v| sink.borrow_mut().push(v),
            StateOptions::new(0),
        );

        assert!(state.is_controlled());
        assert_eq!(state.get(), 1);
        state.set(5);
        state.set_with(|v| v + 10);
        assert_eq!(*emitted.borrow(), [5, 11]);
        assert_eq!(state.get(), 1, "the caller has not applied the update yet");

        external.set(5);
        assert_eq!(state.get(), 5);
    }

    #[test]
    fn uncontrolled_owns_state_seeded_from_default() {
        let external = Signal::new(100_u32);
        let state = ControllableState::new(
            &PropKeys::new(),
            external.clone(),
            |_| panic!("uncontrolled state never emits"),
            StateOptions::new(3),
        );

        assert!(!state.is_controlled());
        assert_eq!(state.get(), 3);
        state.set(4);
        assert_eq!(state.get(), 4);
        assert_eq!(external.get(), 100);
    }
}
