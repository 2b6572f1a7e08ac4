// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arrow-key navigation over a plain vertical list of focusable children.

use trellis_dom::{ElementRef, Key, KeyboardEvent, Platform};

use crate::intent::{Intent, Orientation, WrapMode, resolve_intent, step};

/// Vertical list navigation bound to a container's `keydown`.
///
/// A smaller sibling of [`RovingFocus`](crate::RovingFocus) for lists whose
/// container is not itself focusable (accordion headers, for example):
///
/// - Only ArrowUp, ArrowDown, Home, and End are handled.
/// - Presses with any modifier held are ignored.
/// - Nothing moves while focus is outside the list.
/// - Wrapping happens only with [`WrapMode::Loop`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ListNavigation {
    /// Wrap past the ends.
    pub wrap: WrapMode,
}

impl ListNavigation {
    /// Navigation with the given wrap behavior.
    #[must_use]
    pub fn new(wrap: WrapMode) -> Self {
        Self { wrap }
    }

    /// Handle a `keydown` on the list container.
    ///
    /// `children` are the focusable items in document order. Returns the
    /// intent applied, if focus moved or stayed on purpose.
    pub fn on_key_down(
        &self,
        event: &mut KeyboardEvent,
        children: &[ElementRef],
        platform: &dyn Platform,
    ) -> Option<Intent> {
        if !matches!(event.key, Key::ArrowUp | Key::ArrowDown | Key::Home | Key::End) {
            return None;
        }
        if !event.modifiers.is_empty() || children.is_empty() {
            return None;
        }
        event.prevent_default();

        let active = platform.active_element()?;
        let index = children.iter().position(|c| *c == active)?;
        let intent = resolve_intent(&event.key, Orientation::Vertical)?;
        let next = step(children.len(), Some(index), intent, self.wrap)?;
        if next != index {
            children[next].focus();
        }
        Some(intent)
    }
}
