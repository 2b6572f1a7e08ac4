// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard intent resolution and index stepping.

use trellis_dom::{Key, KeyboardEvent};

/// Layout axis of a group of items.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Items stack top to bottom; ArrowUp/ArrowDown move.
    #[default]
    Vertical,
    /// Items run left to right; ArrowLeft/ArrowRight move.
    Horizontal,
}

/// An abstract navigation direction, decoupled from concrete key bindings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// The following item.
    Next,
    /// The preceding item.
    Prev,
    /// The first item.
    First,
    /// The last item.
    Last,
}

/// What happens when navigation runs past either end.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Stop at the ends.
    Never,
    /// Wrap around to the other end.
    #[default]
    Loop,
}

/// Returns `true` for the six keys navigation handlers own: the four arrows, Home, and End.
///
/// Handlers consume these even when the orientation gives them no intent, so
/// an ancestor widget never reacts to the same press.
#[must_use]
pub fn is_navigation_key(key: &Key) -> bool {
    matches!(
        key,
        Key::ArrowDown | Key::ArrowUp | Key::ArrowLeft | Key::ArrowRight | Key::Home | Key::End
    )
}

/// Map a key press to an intent for `orientation`.
///
/// | key        | vertical | horizontal |
/// |------------|----------|------------|
/// | ArrowDown  | Next     | -          |
/// | ArrowUp    | Prev     | -          |
/// | ArrowRight | -        | Next       |
/// | ArrowLeft  | -        | Prev       |
/// | Home       | First    | First      |
/// | End        | Last     | Last       |
///
/// ```rust
/// use trellis_dom::Key;
/// use trellis_navigation::{Intent, Orientation, resolve_intent};
///
/// assert_eq!(resolve_intent(&Key::ArrowRight, Orientation::Horizontal), Some(Intent::Next));
/// assert_eq!(resolve_intent(&Key::ArrowRight, Orientation::Vertical), None);
/// assert_eq!(resolve_intent(&Key::End, Orientation::Vertical), Some(Intent::Last));
/// ```
#[must_use]
pub fn resolve_intent(key: &Key, orientation: Orientation) -> Option<Intent> {
    use Orientation::{Horizontal, Vertical};
    match (key, orientation) {
        (Key::ArrowDown, Vertical) | (Key::ArrowRight, Horizontal) => Some(Intent::Next),
        (Key::ArrowUp, Vertical) | (Key::ArrowLeft, Horizontal) => Some(Intent::Prev),
        (Key::Home, _) => Some(Intent::First),
        (Key::End, _) => Some(Intent::Last),
        _ => None,
    }
}

/// Consume `event` if it is a navigation key and resolve its intent.
///
/// Non-navigation keys are left untouched: not default-prevented and not
/// propagation-stopped.
pub fn consume_navigation_key(event: &mut KeyboardEvent, orientation: Orientation) -> Option<Intent> {
    if !is_navigation_key(&event.key) {
        return None;
    }
    event.consume();
    resolve_intent(&event.key, orientation)
}

/// Step from `current` within `0..len`.
///
/// A `current` of `None` (or out of range) behaves like index `-1`: `Next`
/// lands on `0` and `Prev` lands on the last index. Returns `None` only for an
/// empty range.
///
/// ```rust
/// use trellis_navigation::{Intent, WrapMode, step};
///
/// assert_eq!(step(4, Some(3), Intent::Next, WrapMode::Loop), Some(0));
/// assert_eq!(step(4, Some(3), Intent::Next, WrapMode::Never), Some(3));
/// assert_eq!(step(4, None, Intent::Prev, WrapMode::Never), Some(3));
/// assert_eq!(step(0, None, Intent::First, WrapMode::Loop), None);
/// ```
#[must_use]
pub fn step(len: usize, current: Option<usize>, intent: Intent, wrap: WrapMode) -> Option<usize> {
    let last = len.checked_sub(1)?;
    let current = current.filter(|&i| i < len);
    let next = match (intent, current) {
        (Intent::First, _) | (Intent::Next, None) => 0,
        (Intent::Last, _) | (Intent::Prev, None) => last,
        (Intent::Next, Some(i)) if i < last => i + 1,
        (Intent::Next, Some(i)) => match wrap {
            WrapMode::Loop => 0,
            WrapMode::Never => i,
        },
        (Intent::Prev, Some(0)) => match wrap {
            WrapMode::Loop => last,
            WrapMode::Never => 0,
        },
        (Intent::Prev, Some(i)) => i - 1,
    };
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_dom::Modifiers;

    #[test]
    fn full_mapping_table() {
        let cases = [
            (Key::ArrowDown, Some(Intent::Next), None),
            (Key::ArrowUp, Some(Intent::Prev), None),
            (Key::ArrowRight, None, Some(Intent::Next)),
            (Key::ArrowLeft, None, Some(Intent::Prev)),
            (Key::Home, Some(Intent::First), Some(Intent::First)),
            (Key::End, Some(Intent::Last), Some(Intent::Last)),
            (Key::Enter, None, None),
            (Key::from_dom("a"), None, None),
        ];
        for (key, vertical, horizontal) in cases {
            assert_eq!(resolve_intent(&key, Orientation::Vertical), vertical, "{key:?} vertical");
            assert_eq!(resolve_intent(&key, Orientation::Horizontal), horizontal, "{key:?} horizontal");
        }
    }

    #[test]
    fn recognized_keys_are_consumed_even_without_an_intent() {
        let mut cross_axis = KeyboardEvent::new(Key::ArrowDown);
        assert_eq!(consume_navigation_key(&mut cross_axis, Orientation::Horizontal), None);
        assert!(cross_axis.is_default_prevented());
        assert!(cross_axis.is_propagation_stopped());

        let mut other = KeyboardEvent::new(Key::Tab).with_modifiers(Modifiers::SHIFT);
        assert_eq!(consume_navigation_key(&mut other, Orientation::Vertical), None);
        assert!(!other.is_default_prevented());
        assert!(!other.is_propagation_stopped());
    }

    #[test]
    fn stepping_wraps_only_in_loop_mode() {
        assert_eq!(step(3, Some(0), Intent::Prev, WrapMode::Loop), Some(2));
        assert_eq!(step(3, Some(0), Intent::Prev, WrapMode::Never), Some(0));
        assert_eq!(step(3, Some(1), Intent::Next, WrapMode::Never), Some(2));
        assert_eq!(step(3, Some(7), Intent::Next, WrapMode::Loop), Some(0), "out of range acts like -1");
        assert_eq!(step(1, Some(0), Intent::Next, WrapMode::Loop), Some(0));
    }
}
