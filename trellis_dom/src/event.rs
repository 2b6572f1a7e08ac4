// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events as seen by widget cores.

use alloc::vec::Vec;

use crate::element::ElementRef;
use crate::key::{Key, Modifiers};

/// A `keydown`/`keyup` event.
///
/// Handlers that recognize a key call both [`prevent_default`](Self::prevent_default)
/// and [`stop_propagation`](Self::stop_propagation); the host reads the flags back
/// after dispatch.
#[derive(Clone, Debug)]
pub struct KeyboardEvent {
    /// The logical key.
    pub key: Key,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// The element the event was dispatched to.
    pub target: Option<ElementRef>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl KeyboardEvent {
    /// Create an event for `key` with no modifiers and no target.
    #[must_use]
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            target: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Set the dispatch target.
    #[must_use]
    pub fn with_target(mut self, target: ElementRef) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the held modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Suppress the host's default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop the event from reaching ancestors.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Returns `true` once [`prevent_default`](Self::prevent_default) was called.
    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Returns `true` once [`stop_propagation`](Self::stop_propagation) was called.
    #[must_use]
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Mark the event as consumed: both default-prevented and propagation-stopped.
    pub fn consume(&mut self) {
        self.prevent_default();
        self.stop_propagation();
    }
}

/// A `pointerdown` or `click` event.
#[derive(Clone, Debug, Default)]
pub struct PointerEvent {
    /// The element the event was dispatched to.
    pub target: Option<ElementRef>,
    /// The composed path, target first, then ancestors outward.
    pub path: Vec<ElementRef>,
    /// DOM `detail`: the click count, or `0` for keyboard-synthesized clicks.
    pub detail: u32,
}

impl PointerEvent {
    /// The composed propagation path.
    #[must_use]
    pub fn composed_path(&self) -> &[ElementRef] {
        &self.path
    }

    /// Returns `true` if `element` is the target or lies on the composed path.
    #[must_use]
    pub fn passes_through(&self, element: &ElementRef) -> bool {
        self.target.as_ref() == Some(element) || self.path.contains(element)
    }
}

/// A `focus`/`focusin` event.
#[derive(Clone, Debug, Default)]
pub struct FocusEvent {
    /// The element receiving focus.
    pub target: Option<ElementRef>,
    /// The element losing focus, if known.
    pub related_target: Option<ElementRef>,
}
