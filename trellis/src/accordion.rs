// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accordion: a vertical stack of disclosure items.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::cell::Cell;
use core::fmt;

use trellis_collection::{Collection, IdLease, IdRegistry, ItemData, ItemId};
use trellis_dom::{ElementRef, KeyboardEvent, PlatformRef};
use trellis_navigation::{Intent, ListNavigation, WrapMode};
use trellis_reactive::{ContextError, ControllableState, Disposer, Scope, Signal, require};
use trellis_selection::{SelectionEngine, SelectionMode, SelectionOptions, SelectionValue};

use crate::attrs::{follow, set_bool, set_class, set_flag};

/// Options for [`Accordion`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AccordionOptions {
    /// Allow several items to be expanded at once.
    pub multiple: bool,
}

struct AccordionInner {
    platform: PlatformRef,
    ids: IdRegistry,
    expanded: SelectionEngine<String>,
    triggers: Collection,
    navigation: ListNavigation,
    next_item: Cell<usize>,
}

/// The accordion root.
///
/// Expansion is a selection over item keys with deselect-on-reselect
/// enabled, so clicking an expanded item's trigger collapses it. ArrowUp,
/// ArrowDown, Home, and End on the root move focus among enabled triggers,
/// looping at the ends.
#[derive(Clone)]
pub struct Accordion {
    inner: Rc<AccordionInner>,
}

impl fmt::Debug for Accordion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accordion")
            .field("expanded", &self.inner.expanded.selected())
            .field("triggers", &self.inner.triggers)
            .finish_non_exhaustive()
    }
}

impl Accordion {
    /// An accordion that owns its expansion state.
    pub fn new(platform: PlatformRef, ids: IdRegistry, options: AccordionOptions) -> Self {
        let mode = SelectionMode::from_multiple(options.multiple);
        Self::with_state(
            platform,
            ids,
            ControllableState::uncontrolled(SelectionValue::empty(mode)),
            options,
        )
    }

    /// An accordion over a caller-chosen state bridge.
    pub fn with_state(
        platform: PlatformRef,
        ids: IdRegistry,
        state: ControllableState<SelectionValue<String>>,
        options: AccordionOptions,
    ) -> Self {
        let expanded = SelectionEngine::new(
            state,
            SelectionOptions {
                multiple: options.multiple,
                deselect_on_reselect: true,
            },
        );
        Self {
            inner: Rc::new(AccordionInner {
                platform,
                ids,
                expanded,
                triggers: Collection::new(),
                navigation: ListNavigation::new(WrapMode::Loop),
                next_item: Cell::new(0),
            }),
        }
    }

    /// Keys of the expanded items.
    #[must_use]
    pub fn expanded(&self) -> SelectionValue<String> {
        self.inner.expanded.selected()
    }

    /// The expansion engine.
    #[must_use]
    pub fn engine(&self) -> &SelectionEngine<String> {
        &self.inner.expanded
    }

    /// Returns `true` in multi-expand mode.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.inner.expanded.mode() == SelectionMode::Multi
    }

    /// Switch multi-expand on or off. A flip collapses everything.
    pub fn set_multiple(&self, multiple: bool) {
        self.inner.expanded.set_multiple(multiple);
    }

    /// Follow a `multiple` prop.
    pub fn bind_multiple(&self, multiple: &Signal<bool>) -> Disposer {
        self.inner.expanded.bind_multiple(multiple)
    }

    /// Toggle the item with `key`.
    pub fn toggle(&self, key: &str) {
        self.inner.expanded.select(key.to_string());
    }

    /// Registered item triggers.
    #[must_use]
    pub fn triggers(&self) -> &Collection {
        &self.inner.triggers
    }

    /// Handle a `keydown` on the accordion root.
    pub fn on_key_down(&self, event: &mut KeyboardEvent) -> Option<Intent> {
        let triggers = self.inner.triggers.enabled_elements();
        self.inner
            .navigation
            .on_key_down(event, &triggers, &*self.inner.platform)
    }

    fn next_key(&self) -> String {
        let n = self.inner.next_item.get();
        self.inner.next_item.set(n + 1);
        format!("accordion-item:{n}")
    }
}

/// Options for [`AccordionItem`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AccordionItemOptions {
    /// Always expanded; the trigger cannot collapse it.
    pub always_expanded: bool,
    /// Expand when created.
    pub initially_expanded: bool,
    /// The trigger neither toggles nor takes part in keyboard navigation.
    pub disabled: bool,
}

/// One accordion item: a trigger and the region it discloses.
///
/// Bind the rendered parts with [`bind_root`](Self::bind_root),
/// [`bind_trigger`](Self::bind_trigger), and
/// [`bind_content`](Self::bind_content). Bindings keep `aria-expanded`,
/// `aria-controls`, `aria-labelledby`, `role`, `disabled`, `hidden`, and the
/// `--expanded` class in sync until the item is dropped. Dropping an
/// expanded item also removes its key from the accordion's value.
pub struct AccordionItem {
    accordion: Accordion,
    key: String,
    trigger_id: IdLease,
    content_id: IdLease,
    always_expanded: bool,
    expanded: Signal<bool>,
    disabled: Signal<bool>,
    scope: Scope,
}

impl fmt::Debug for AccordionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccordionItem")
            .field("key", &self.key)
            .field("expanded", &self.expanded.get())
            .field("disabled", &self.disabled.get())
            .finish_non_exhaustive()
    }
}

impl AccordionItem {
    /// Create an item inside `accordion`.
    ///
    /// Fails with [`ContextError::Missing`] when there is no accordion.
    pub fn new(accordion: Option<&Accordion>, options: AccordionItemOptions) -> Result<Self, ContextError> {
        let accordion = require(accordion, "AccordionItem", "Accordion")?.clone();
        let key = accordion.next_key();
        let always = options.always_expanded;
        let engine = accordion.engine().clone();

        let expanded = Signal::new(always || engine.is_selected(&key));
        let scope = Scope::new();
        {
            let expanded = expanded.clone();
            let key = key.clone();
            scope.add(engine.subscribe(move |value, _| {
                expanded.set(always || value.contains(&key));
            }));
        }
        if options.initially_expanded && !engine.is_selected(&key) {
            engine.select(key.clone());
        }
        {
            let key = key.clone();
            scope.on_dispose(move || {
                // Reselecting clears: the engine always deselects on reselect.
                if engine.is_selected(&key) {
                    engine.select(key);
                }
            });
        }

        Ok(Self {
            trigger_id: accordion.inner.ids.allocate(),
            content_id: accordion.inner.ids.allocate(),
            accordion,
            key,
            always_expanded: always,
            expanded,
            disabled: Signal::new(options.disabled),
            scope,
        })
    }

    /// The key this item is expanded under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Id of the trigger button.
    #[must_use]
    pub fn trigger_id(&self) -> &ItemId {
        self.trigger_id.id()
    }

    /// Id of the content region.
    #[must_use]
    pub fn content_id(&self) -> &ItemId {
        self.content_id.id()
    }

    /// Returns `true` while expanded.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded.get()
    }

    /// Expansion as an observable value.
    #[must_use]
    pub fn expanded(&self) -> &Signal<bool> {
        &self.expanded
    }

    /// Returns `true` while disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    /// Enable or disable the trigger.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// Toggle expansion, unless disabled or always expanded.
    pub fn toggle(&self) {
        if self.disabled.get() || self.always_expanded {
            return;
        }
        self.accordion.toggle(&self.key);
    }

    /// Handle a click on the trigger.
    pub fn on_trigger_click(&self) {
        self.toggle();
    }

    /// Bind the item's outer element: carries `--expanded` while expanded.
    pub fn bind_root(&self, element: &ElementRef) {
        self.scope.add(follow(&self.expanded, element, |el, expanded| {
            set_class(&**el, "--expanded", *expanded);
        }));
    }

    /// Bind the trigger button and register it for keyboard navigation.
    pub fn bind_trigger(&self, element: &ElementRef) {
        element.set_attribute("id", self.trigger_id().as_str());
        element.set_attribute("aria-controls", self.content_id().as_str());
        self.scope.add(follow(&self.expanded, element, |el, expanded| {
            set_bool(&**el, "aria-expanded", *expanded);
        }));
        self.scope.add(follow(&self.disabled, element, |el, disabled| {
            set_flag(&**el, "disabled", *disabled);
        }));

        let disabled = self.disabled.clone();
        let registration = self.accordion.triggers().register(
            ItemData::new(self.trigger_id().clone(), element).with_disabled(move || disabled.get()),
        );
        self.scope.add(registration.into_disposer());
    }

    /// Bind the content region.
    pub fn bind_content(&self, element: &ElementRef) {
        element.set_attribute("id", self.content_id().as_str());
        element.set_attribute("aria-labelledby", self.trigger_id().as_str());
        element.set_attribute("role", "region");
        self.scope.add(follow(&self.expanded, element, |el, expanded| {
            set_flag(&**el, "hidden", !*expanded);
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_dom::mock::MockDocument;

    fn accordion(multiple: bool) -> (MockDocument, Accordion) {
        let doc = MockDocument::new();
        let accordion = Accordion::new(
            Rc::new(doc.clone()),
            IdRegistry::new(),
            AccordionOptions { multiple },
        );
        (doc, accordion)
    }

    #[test]
    fn items_need_an_accordion() {
        let err = AccordionItem::new(None, AccordionItemOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ContextError::Missing {
                component: "AccordionItem",
                ancestor: "Accordion"
            }
        );
    }

    #[test]
    fn always_expanded_and_disabled_items_ignore_toggles() {
        let (_doc, accordion) = accordion(true);
        let pinned = AccordionItem::new(
            Some(&accordion),
            AccordionItemOptions {
                always_expanded: true,
                ..Default::default()
            },
        )
        .unwrap();
        let disabled = AccordionItem::new(
            Some(&accordion),
            AccordionItemOptions {
                disabled: true,
                ..Default::default()
            },
        )
        .unwrap();

        pinned.toggle();
        disabled.toggle();
        assert!(pinned.is_expanded());
        assert!(!disabled.is_expanded());
        assert!(accordion.expanded().is_empty());
    }

    #[test]
    fn multiple_keeps_several_open_and_flipping_collapses_all() {
        let (_doc, accordion) = accordion(true);
        let a = AccordionItem::new(Some(&accordion), AccordionItemOptions::default()).unwrap();
        let b = AccordionItem::new(
            Some(&accordion),
            AccordionItemOptions {
                initially_expanded: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(b.is_expanded());

        a.toggle();
        assert!(a.is_expanded() && b.is_expanded());

        accordion.set_multiple(false);
        assert!(!a.is_expanded() && !b.is_expanded());
        assert_eq!(accordion.expanded(), SelectionValue::Single(None));
    }

    #[test]
    fn content_region_is_labelled_by_its_trigger() {
        let (doc, accordion) = accordion(false);
        let item = AccordionItem::new(Some(&accordion), AccordionItemOptions::default()).unwrap();
        let content = doc.create_element("div");
        doc.append(None, &content);
        item.bind_content(&content.handle());

        use trellis_dom::Element;
        assert_eq!(content.attribute("aria-labelledby").as_deref(), Some(item.trigger_id().as_str()));
        assert_eq!(content.attribute("role").as_deref(), Some("region"));
        assert_eq!(content.attribute("hidden").as_deref(), Some(""));
        item.toggle();
        assert_eq!(content.attribute("hidden"), None);
    }
}
