// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menus and submenus.
//!
//! A [`Menu`] owns a trigger, a popup content element, and the items inside
//! it. Input focus moves to the content while the menu is open; items are
//! never focused themselves. Instead a [`HighlightTracker`] moves a visual
//! cursor over them and `aria-activedescendant` follows it.
//!
//! Submenus are built with [`Menu::submenu`]. A submenu's trigger is an item
//! of its parent, it opens on hover through a [`DelayedOpen`], and its
//! dismissal layer is nested under the parent's, so Escape and outside clicks
//! close the innermost open menu first.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::time::Duration;

use hashbrown::HashMap;
use trellis_collection::{Collection, IdLease, IdRegistry, ItemData, ItemId};
use trellis_dom::{ElementRef, Key, KeyboardEvent, PlatformRef, WeakElement};
use trellis_layer::{Layer, LayerId, LayerListeners, LayerStack};
use trellis_navigation::{HighlightOptions, HighlightTracker};
use trellis_reactive::{ContextError, Scope, Signal, require};
use trellis_timing::{DelayedOpen, DelayedOpenOptions, SchedulerRef};

use crate::attrs::{follow, set_flag, with_bound};
use crate::dropdown::{DropdownAria, DropdownAriaOptions, PopupRole};

/// Host services a menu tree shares.
#[derive(Clone)]
pub struct MenuEnv {
    /// Where open menus register their dismissal layers.
    pub layers: LayerStack,
    /// Timers for deferred focus and hover delays.
    pub scheduler: SchedulerRef,
    /// Source of trigger, content, and item ids.
    pub ids: IdRegistry,
}

impl fmt::Debug for MenuEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuEnv")
            .field("layers", &self.layers)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl MenuEnv {
    /// An environment with its own layer stack over `platform` and its own
    /// id registry.
    pub fn new(platform: PlatformRef, scheduler: SchedulerRef) -> Self {
        Self {
            layers: LayerStack::new(platform),
            scheduler,
            ids: IdRegistry::new(),
        }
    }

    /// An environment on the calling thread's shared layer stack, so menus
    /// and other overlays built elsewhere stack with these.
    #[cfg(feature = "std")]
    pub fn global(platform: &PlatformRef, scheduler: SchedulerRef) -> Self {
        Self {
            layers: LayerStack::global(platform),
            scheduler,
            ids: IdRegistry::new(),
        }
    }
}

/// Options for [`Menu`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MenuOptions {
    /// Hover time before a submenu opens.
    pub hover_open_delay: Duration,
    /// Time after the pointer leaves before a submenu closes.
    pub hover_close_delay: Duration,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            hover_open_delay: Duration::from_millis(100),
            hover_close_delay: Duration::from_millis(100),
        }
    }
}

type Action = Rc<dyn Fn()>;

struct MenuInner {
    env: MenuEnv,
    parent: Option<Menu>,
    children: RefCell<Vec<Weak<MenuInner>>>,
    trigger_id: IdLease,
    content_id: IdLease,
    open: Signal<bool>,
    items: Collection,
    highlight: HighlightTracker,
    active: Signal<Option<String>>,
    aria: DropdownAria,
    trigger: RefCell<Option<WeakElement>>,
    content: RefCell<Option<WeakElement>>,
    layer: RefCell<Option<Layer>>,
    hover: Option<DelayedOpen>,
    actions: RefCell<HashMap<ItemId, Action>>,
    own_item: RefCell<Option<MenuItem>>,
    scope: Scope,
}

impl MenuInner {
    fn upgrade(slot: &RefCell<Option<WeakElement>>) -> Option<ElementRef> {
        slot.borrow().as_ref().and_then(WeakElement::upgrade)
    }

    fn opened(self: &Rc<Self>) {
        tracing::debug!(target: "trellis::menu", id = %self.content_id.id(), "menu opened");
        self.sync_layer();
    }

    fn closed(self: &Rc<Self>) {
        tracing::debug!(target: "trellis::menu", id = %self.content_id.id(), "menu closed");
        let children: Vec<Rc<Self>> = {
            let mut children = self.children.borrow_mut();
            children.retain(|c| c.strong_count() > 0);
            children.iter().filter_map(Weak::upgrade).collect()
        };
        for child in children {
            child.open.set(false);
        }
        self.highlight.reset();
        let layer = self.layer.borrow_mut().take();
        drop(layer);
        if self.parent.is_none() {
            with_bound(&self.trigger, |trigger| trigger.focus());
        }
    }

    /// Push a dismissal layer once the menu is open and its content is bound.
    fn sync_layer(self: &Rc<Self>) {
        if !self.open.get() || self.layer.borrow().is_some() {
            return;
        }
        let Some(content) = Self::upgrade(&self.content) else {
            return;
        };
        let (on_escape, on_outside) = (Rc::downgrade(self), Rc::downgrade(self));
        let mut listeners = LayerListeners::new()
            .on_escape(move |_| {
                if let Some(inner) = on_escape.upgrade() {
                    inner.open.set(false);
                    inner.focus_parent_content();
                }
            })
            .on_click_outside(move |_| {
                if let Some(inner) = on_outside.upgrade() {
                    inner.open.set(false);
                }
            });
        if let Some(trigger) = Self::upgrade(&self.trigger) {
            listeners = listeners.ignore(&trigger);
        }

        let layers = &self.env.layers;
        let layer = match &self.parent {
            Some(parent) => match &*parent.inner.layer.borrow() {
                Some(parent_layer) => layers.push_child(parent_layer, &content, listeners),
                None => layers.push(&content, listeners),
            },
            None => layers.push(&content, listeners),
        };
        *self.layer.borrow_mut() = Some(layer);
    }

    fn focus_parent_content(&self) {
        if let Some(parent) = &self.parent {
            with_bound(&parent.inner.content, |content| content.focus());
        }
    }

    /// Focus the content on the next turn of the event loop, after the host
    /// has rendered it.
    fn focus_content_soon(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        self.env.scheduler.schedule(
            Duration::ZERO,
            Box::new(move || {
                if let Some(inner) = weak.upgrade()
                    && inner.open.get()
                {
                    with_bound(&inner.content, |content| content.focus());
                }
            }),
        );
    }

    fn sync_active(&self) {
        let active = self.highlight.highlighted_element().and_then(|element| {
            self.items
                .items()
                .into_iter()
                .find(|item| item.element == element)
                .map(|item| item.id.to_string())
        });
        self.active.set(active);
    }

    fn activate(&self, id: &ItemId) {
        let action = self.actions.borrow().get(id).cloned();
        if let Some(action) = action {
            action();
        }
    }

    fn activate_highlighted(&self) {
        let Some(element) = self.highlight.highlighted_element() else {
            return;
        };
        let id = self
            .items
            .items()
            .into_iter()
            .find(|item| item.element == element)
            .map(|item| item.id);
        if let Some(id) = id {
            self.activate(&id);
        }
    }

    fn root(self: &Rc<Self>) -> Rc<Self> {
        let mut menu = self.clone();
        while let Some(parent) = menu.parent.as_ref().map(|p| p.inner.clone()) {
            menu = parent;
        }
        menu
    }
}

/// A menu or submenu.
///
/// Hosts forward DOM events to the `on_*` handlers and call the `bind_*`
/// methods once the parts are rendered. Cloning yields another handle to the
/// same menu.
///
/// - Clicking the trigger toggles the menu. Opening focuses the content on
///   the next scheduler turn.
/// - On a root trigger, ArrowUp, ArrowDown, Space, and Enter open the menu.
/// - In the content, ArrowUp, ArrowDown, Home, and End move the highlight.
///   ArrowRight activates the highlighted item (opening a submenu whose
///   trigger is highlighted). ArrowLeft closes a submenu and returns focus to
///   its parent's content. Escape closes the menu.
/// - Closing resets the highlight and closes open submenus. A root menu then
///   returns focus to its trigger.
#[derive(Clone)]
pub struct Menu {
    inner: Rc<MenuInner>,
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("content_id", self.inner.content_id.id())
            .field("open", &self.inner.open.get())
            .field("submenu", &self.is_submenu())
            .field("highlighted", &self.inner.highlight.index())
            .finish_non_exhaustive()
    }
}

impl Menu {
    /// A root menu.
    pub fn new(env: MenuEnv, options: MenuOptions) -> Self {
        Self::build(env, None, options)
    }

    /// A submenu opened from an item of this menu.
    pub fn submenu(&self, options: MenuOptions) -> Self {
        let child = Self::build(self.inner.env.clone(), Some(self.clone()), options);
        self.inner
            .children
            .borrow_mut()
            .push(Rc::downgrade(&child.inner));
        child
    }

    fn build(env: MenuEnv, parent: Option<Self>, options: MenuOptions) -> Self {
        let open = Signal::new(false);
        let active = Signal::new(None);
        let items = Collection::new();
        let trigger_id = env.ids.allocate();
        let content_id = env.ids.allocate();
        let aria = DropdownAria::new(
            DropdownAriaOptions {
                role: PopupRole::Menu,
                trigger_id: trigger_id.id().to_string(),
                content_id: content_id.id().to_string(),
            },
            &open,
            &active,
        );
        let hover = parent.as_ref().map(|_| {
            let (show, hide) = (open.clone(), open.clone());
            DelayedOpen::new(
                env.scheduler.clone(),
                move || {
                    show.set(true);
                },
                move || {
                    hide.set(false);
                },
                DelayedOpenOptions {
                    open_delay: options.hover_open_delay,
                    close_delay: options.hover_close_delay,
                },
            )
        });

        let inner = Rc::new(MenuInner {
            highlight: HighlightTracker::new(items.clone(), HighlightOptions::default()),
            env,
            parent,
            children: RefCell::new(Vec::new()),
            trigger_id,
            content_id,
            open,
            items,
            active,
            aria,
            trigger: RefCell::new(None),
            content: RefCell::new(None),
            layer: RefCell::new(None),
            hover,
            actions: RefCell::new(HashMap::new()),
            own_item: RefCell::new(None),
            scope: Scope::new(),
        });

        let weak = Rc::downgrade(&inner);
        inner.scope.add(inner.open.subscribe(move |open, _| {
            if let Some(inner) = weak.upgrade() {
                if *open {
                    inner.opened();
                } else {
                    inner.closed();
                }
            }
        }));
        let weak = Rc::downgrade(&inner);
        inner.scope.add(inner.highlight.signal().subscribe(move |_, _| {
            if let Some(inner) = weak.upgrade() {
                inner.sync_active();
            }
        }));
        let weak = Rc::downgrade(&inner);
        inner.scope.add(inner.items.revision().subscribe(move |_, _| {
            if let Some(inner) = weak.upgrade() {
                inner.sync_active();
            }
        }));
        if let Some(hover) = &inner.hover {
            inner.scope.add(hover.disposer());
        }
        Self { inner }
    }

    /// Returns `true` for a menu built with [`submenu`](Self::submenu).
    #[must_use]
    pub fn is_submenu(&self) -> bool {
        self.inner.parent.is_some()
    }

    /// The menu this submenu opens from.
    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.inner.parent.as_ref()
    }

    /// Id written to the trigger.
    #[must_use]
    pub fn trigger_id(&self) -> &ItemId {
        self.inner.trigger_id.id()
    }

    /// Id written to the content.
    #[must_use]
    pub fn content_id(&self) -> &ItemId {
        self.inner.content_id.id()
    }

    /// Returns `true` while open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }

    /// Open state as an observable value.
    #[must_use]
    pub fn open_signal(&self) -> &Signal<bool> {
        &self.inner.open
    }

    /// Open or close.
    pub fn set_open(&self, open: bool) {
        self.inner.open.set(open);
    }

    /// Close this menu and every menu it was opened from.
    pub fn close_all(&self) {
        self.inner.root().open.set(false);
    }

    /// The registered items.
    #[must_use]
    pub fn items(&self) -> &Collection {
        &self.inner.items
    }

    /// The highlight over the items.
    #[must_use]
    pub fn highlight(&self) -> &HighlightTracker {
        &self.inner.highlight
    }

    /// Id of the highlighted item, as written to `aria-activedescendant`.
    #[must_use]
    pub fn active_descendant(&self) -> Option<String> {
        self.inner.active.get()
    }

    /// The dismissal layer, while open with content bound.
    #[must_use]
    pub fn layer_id(&self) -> Option<LayerId> {
        self.inner.layer.borrow().as_ref().map(Layer::id)
    }

    /// Bind the trigger element.
    ///
    /// A submenu's trigger also becomes an item of the parent menu, so it can
    /// be highlighted and activated with ArrowRight.
    pub fn bind_trigger(&self, element: &ElementRef) {
        *self.inner.trigger.borrow_mut() = Some(element.downgrade());
        self.inner.aria.bind_trigger(element);
        if let Some(parent) = &self.inner.parent {
            let weak = Rc::downgrade(&self.inner);
            let item = MenuItem::register(
                parent,
                element,
                self.trigger_id().clone(),
                None,
                MenuItemOptions::default(),
                Rc::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        Menu { inner }.on_trigger_click();
                    }
                }),
            );
            let previous = self.inner.own_item.borrow_mut().replace(item);
            drop(previous);
        }
    }

    /// Bind the content element once rendered.
    pub fn bind_content(&self, element: &ElementRef) {
        *self.inner.content.borrow_mut() = Some(element.downgrade());
        element.set_attribute("tabindex", "-1");
        self.inner.aria.bind_content(element);
        self.inner.items.set_container(Some(element));
        self.inner.sync_layer();
    }

    /// Handle a click on the trigger.
    pub fn on_trigger_click(&self) {
        let open = !self.inner.open.get();
        self.inner.open.set(open);
        if open {
            self.inner.focus_content_soon();
        }
    }

    /// Handle `keydown` on the trigger.
    pub fn on_trigger_key_down(&self, event: &mut KeyboardEvent) {
        if self.is_submenu() {
            return;
        }
        if matches!(event.key, Key::ArrowUp | Key::ArrowDown | Key::Space | Key::Enter) {
            event.prevent_default();
            self.inner.open.set(true);
            self.inner.focus_content_soon();
        }
    }

    /// Handle `keyup` on the trigger: Space must not click it a second time.
    pub fn on_trigger_key_up(&self, event: &mut KeyboardEvent) {
        if event.key == Key::Space {
            event.prevent_default();
        }
    }

    /// Pointer entered a submenu trigger.
    pub fn on_trigger_pointer_enter(&self) {
        if let Some(hover) = &self.inner.hover {
            hover.open(None);
        }
    }

    /// Pointer left a submenu trigger.
    pub fn on_trigger_pointer_leave(&self) {
        if let Some(hover) = &self.inner.hover {
            hover.close(None);
        }
    }

    /// Handle `keydown` on the content.
    pub fn on_content_key_down(&self, event: &mut KeyboardEvent) {
        if self.inner.highlight.on_key_down(event).is_some() {
            return;
        }
        match event.key {
            Key::ArrowRight => {
                event.consume();
                self.inner.activate_highlighted();
            }
            Key::ArrowLeft => {
                event.consume();
                if self.is_submenu() {
                    self.inner.open.set(false);
                    self.inner.focus_parent_content();
                }
            }
            Key::Escape => {
                event.consume();
                self.inner.open.set(false);
                self.inner.focus_parent_content();
            }
            _ => {}
        }
    }

    /// Handle `focus` on the content.
    ///
    /// Opening highlights the first item. Focus coming back from a closed
    /// submenu keeps the highlight on that submenu's trigger.
    pub fn on_content_focus(&self) {
        self.inner.highlight.highlight_first_if_none();
    }

    /// Pointer entered the content. A submenu stays open and highlights its
    /// own trigger in the parent.
    pub fn on_content_pointer_enter(&self) {
        let Some(parent) = &self.inner.parent else {
            return;
        };
        if let Some(hover) = &self.inner.hover {
            hover.open(None);
        }
        with_bound(&self.inner.trigger, |trigger| {
            parent.inner.highlight.highlight_element(trigger);
        });
    }

    /// Pointer left the content.
    pub fn on_content_pointer_leave(&self) {
        if let Some(hover) = &self.inner.hover {
            hover.close(None);
        }
    }
}

/// Options for [`MenuItem`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuItemOptions {
    /// Skipped by the highlight and not activatable.
    pub disabled: bool,
    /// Close the whole menu tree after activation.
    pub close_on_click: bool,
}

/// One command in a menu's content.
///
/// The element gets `role="menuitem"`, `tabindex="-1"`, and a stable `id`
/// for `aria-activedescendant`. It stays registered until the item is
/// dropped.
pub struct MenuItem {
    menu: Menu,
    id: ItemId,
    element: WeakElement,
    disabled: Signal<bool>,
    _lease: Option<IdLease>,
    scope: Scope,
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("id", &self.id)
            .field("disabled", &self.disabled.get())
            .finish_non_exhaustive()
    }
}

impl MenuItem {
    /// An item of `menu` rendered as `element`, running `on_activate` when
    /// clicked or activated from the keyboard.
    pub fn new(
        menu: Option<&Menu>,
        element: &ElementRef,
        options: MenuItemOptions,
        on_activate: impl Fn() + 'static,
    ) -> Result<Self, ContextError> {
        let menu = require(menu, "MenuItem", "MenuContent")?;
        let lease = menu.inner.env.ids.allocate();
        let id = lease.id().clone();
        Ok(Self::register(menu, element, id, Some(lease), options, Rc::new(on_activate)))
    }

    fn register(
        menu: &Menu,
        element: &ElementRef,
        id: ItemId,
        lease: Option<IdLease>,
        options: MenuItemOptions,
        on_activate: Action,
    ) -> Self {
        element.set_attribute("id", id.as_str());
        element.set_attribute("role", "menuitem");
        element.set_attribute("tabindex", "-1");

        let scope = Scope::new();
        let disabled = Signal::new(options.disabled);
        scope.add(follow(&disabled, element, |el, disabled| {
            set_flag(&**el, "disabled", *disabled);
        }));

        let action: Action = {
            let disabled = disabled.clone();
            let menu = Rc::downgrade(&menu.inner);
            let close = options.close_on_click;
            Rc::new(move || {
                if disabled.get() {
                    return;
                }
                on_activate();
                if close && let Some(inner) = menu.upgrade() {
                    inner.root().open.set(false);
                }
            })
        };
        menu.inner.actions.borrow_mut().insert(id.clone(), action);
        {
            let actions = Rc::downgrade(&menu.inner);
            let id = id.clone();
            scope.on_dispose(move || {
                if let Some(inner) = actions.upgrade() {
                    inner.actions.borrow_mut().remove(&id);
                }
            });
        }

        let predicate = disabled.clone();
        let registration = menu
            .inner
            .items
            .register(ItemData::new(id.clone(), element).with_disabled(move || predicate.get()));
        scope.add(registration.into_disposer());

        Self {
            menu: menu.clone(),
            id,
            element: element.downgrade(),
            disabled,
            _lease: lease,
            scope,
        }
    }

    /// The item's id.
    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Returns `true` while disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    /// Enable or disable the item. The highlight stays on the element it
    /// was on, or clears if that element is now disabled.
    pub fn set_disabled(&self, disabled: bool) {
        let highlight = &self.menu.inner.highlight;
        let previous = highlight.highlighted_element();
        if !self.disabled.set(disabled) {
            return;
        }
        match previous {
            Some(element) => highlight.highlight_element(&element),
            None => highlight.refresh(),
        }
        self.menu.inner.sync_active();
    }

    /// Returns `true` while the highlight is on this item.
    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.menu
            .inner
            .highlight
            .highlighted_element()
            .is_some_and(|el| self.element.is(&el))
    }

    /// Handle a click.
    pub fn on_click(&self) {
        self.menu.inner.activate(&self.id);
    }

    /// Pointer entered: move the highlight here.
    pub fn on_pointer_enter(&self) {
        if let Some(element) = self.element.upgrade() {
            self.menu.inner.highlight.highlight_element(&element);
        }
    }

    /// Pointer left: clear the highlight.
    pub fn on_pointer_leave(&self) {
        self.menu.inner.highlight.reset();
    }
}
