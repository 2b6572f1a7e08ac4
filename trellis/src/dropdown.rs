// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! ARIA wiring shared by every trigger-plus-popup widget.

use alloc::string::String;
use core::fmt;

use trellis_dom::ElementRef;
use trellis_reactive::{Scope, Signal};

use crate::attrs::{follow, set_bool};

/// What the popup contains, written to `aria-haspopup` and the popup's `role`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PopupRole {
    /// A menu of commands.
    #[default]
    Menu,
    /// A list of options to pick from.
    Listbox,
}

impl PopupRole {
    /// The ARIA token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Listbox => "listbox",
        }
    }
}

/// Options for [`DropdownAria`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DropdownAriaOptions {
    /// Popup role.
    pub role: PopupRole,
    /// Id given to the trigger.
    pub trigger_id: String,
    /// Id given to the popup.
    pub content_id: String,
}

/// Keeps a trigger and its popup labelled for assistive technology.
///
/// Trigger: `id`, `aria-controls`, `aria-haspopup`, and `aria-expanded`
/// following `expanded`. Popup: `id`, `role`, `aria-labelledby`, and
/// `aria-activedescendant` following `active`. The attribute is removed
/// while nothing is active.
///
/// Bindings last until the `DropdownAria` is dropped.
pub struct DropdownAria {
    options: DropdownAriaOptions,
    expanded: Signal<bool>,
    active: Signal<Option<String>>,
    scope: Scope,
}

impl fmt::Debug for DropdownAria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropdownAria")
            .field("options", &self.options)
            .field("expanded", &self.expanded.get())
            .field("active", &self.active.get())
            .finish_non_exhaustive()
    }
}

impl DropdownAria {
    /// Wire `expanded` and `active` (the highlighted item's id) to the parts
    /// bound later.
    pub fn new(options: DropdownAriaOptions, expanded: &Signal<bool>, active: &Signal<Option<String>>) -> Self {
        Self {
            options,
            expanded: expanded.clone(),
            active: active.clone(),
            scope: Scope::new(),
        }
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &DropdownAriaOptions {
        &self.options
    }

    /// Label the trigger.
    pub fn bind_trigger(&self, element: &ElementRef) {
        element.set_attribute("id", &self.options.trigger_id);
        element.set_attribute("aria-controls", &self.options.content_id);
        element.set_attribute("aria-haspopup", self.options.role.as_str());
        self.scope.add(follow(&self.expanded, element, |el, expanded| {
            set_bool(&**el, "aria-expanded", *expanded);
        }));
    }

    /// Label the popup.
    pub fn bind_content(&self, element: &ElementRef) {
        element.set_attribute("id", &self.options.content_id);
        element.set_attribute("role", self.options.role.as_str());
        element.set_attribute("aria-labelledby", &self.options.trigger_id);
        self.scope.add(follow(&self.active, element, |el, active| match active {
            Some(id) => el.set_attribute("aria-activedescendant", id),
            None => el.remove_attribute("aria-activedescendant"),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_dom::Element;
    use trellis_dom::mock::MockDocument;

    #[test]
    fn attributes_follow_state() {
        let doc = MockDocument::new();
        let (trigger, content) = (doc.create_element("button"), doc.create_element("ul"));
        let expanded = Signal::new(false);
        let active = Signal::new(None);
        let aria = DropdownAria::new(
            DropdownAriaOptions {
                role: PopupRole::Listbox,
                trigger_id: "t".into(),
                content_id: "c".into(),
            },
            &expanded,
            &active,
        );
        aria.bind_trigger(&trigger.handle());
        aria.bind_content(&content.handle());

        assert_eq!(trigger.attribute("aria-haspopup").as_deref(), Some("listbox"));
        assert_eq!(trigger.attribute("aria-controls").as_deref(), Some("c"));
        assert_eq!(trigger.attribute("aria-expanded").as_deref(), Some("false"));
        assert_eq!(content.attribute("aria-labelledby").as_deref(), Some("t"));
        assert_eq!(content.attribute("aria-activedescendant"), None);

        expanded.set(true);
        active.set(Some("c-1".into()));
        assert_eq!(trigger.attribute("aria-expanded").as_deref(), Some("true"));
        assert_eq!(content.attribute("aria-activedescendant").as_deref(), Some("c-1"));

        drop(aria);
        expanded.set(false);
        assert_eq!(
            trigger.attribute("aria-expanded").as_deref(),
            Some("true"),
            "bindings end with the DropdownAria"
        );
    }
}
