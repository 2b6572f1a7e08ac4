// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard keys and modifier state.

use alloc::string::{String, ToString};

bitflags::bitflags! {
    /// Modifier keys held during a keyboard event.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 1 << 0;
        /// Control.
        const CTRL = 1 << 1;
        /// Alt / Option.
        const ALT = 1 << 2;
        /// Meta / Command / Windows.
        const META = 1 << 3;
    }
}

/// A logical key, named after the DOM `KeyboardEvent.key` values the cores react to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// `ArrowDown`.
    ArrowDown,
    /// `ArrowUp`.
    ArrowUp,
    /// `ArrowLeft`.
    ArrowLeft,
    /// `ArrowRight`.
    ArrowRight,
    /// `Home`.
    Home,
    /// `End`.
    End,
    /// `Escape`.
    Escape,
    /// `Enter`.
    Enter,
    /// The space bar (`" "`).
    Space,
    /// `Tab`.
    Tab,
    /// Any other key, carrying its DOM name.
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` string.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowDown" => Self::ArrowDown,
            "ArrowUp" => Self::ArrowUp,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Tab" => Self::Tab,
            other => Self::Other(other.to_string()),
        }
    }

    /// The DOM name of this key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ArrowDown => "ArrowDown",
            Self::ArrowUp => "ArrowUp",
            Self::ArrowLeft => "ArrowLeft",
            Self::ArrowRight => "ArrowRight",
            Self::Home => "Home",
            Self::End => "End",
            Self::Escape => "Escape",
            Self::Enter => "Enter",
            Self::Space => " ",
            Self::Tab => "Tab",
            Self::Other(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_names_round_trip_for_named_keys() {
        for name in ["ArrowDown", "ArrowUp", "ArrowLeft", "ArrowRight", "Home", "End", "Escape", "Enter", " ", "Tab"] {
            assert_eq!(Key::from_dom(name).as_str(), name, "{name:?} should map back to itself");
        }
    }

    #[test]
    fn legacy_aliases_collapse() {
        assert_eq!(Key::from_dom("Esc"), Key::Escape);
        assert_eq!(Key::from_dom("Spacebar"), Key::Space);
        assert_eq!(Key::from_dom("a"), Key::Other("a".into()));
    }
}
