// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keeps keyboard focus inside an open overlay.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

use trellis_collection::Collection;
use trellis_dom::{ElementRef, FocusEvent, Key, KeyboardEvent, Modifiers, PlatformRef, WeakElement};
use trellis_navigation::focus_first;
use trellis_reactive::{Disposer, Signal};

/// Options for [`FocusTrap`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FocusTrapOptions {
    /// Move focus into the container on activation.
    pub focus_on_activate: bool,
    /// Give focus back to whatever held it before activation.
    pub return_focus_on_deactivate: bool,
}

impl Default for FocusTrapOptions {
    fn default() -> Self {
        Self {
            focus_on_activate: true,
            return_focus_on_deactivate: true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TrapState {
    Inactive,
    Active,
    Paused,
}

struct TrapInner {
    platform: PlatformRef,
    container: WeakElement,
    tabbables: Collection,
    options: FocusTrapOptions,
    state: Cell<TrapState>,
    return_to: RefCell<Option<WeakElement>>,
}

impl TrapInner {
    fn contains(&self, element: &ElementRef) -> bool {
        let Some(container) = self.container.upgrade() else {
            return false;
        };
        element.is_connected()
            && container
                .document_position()
                .contains(&element.document_position())
    }

    fn focus_inside(&self) {
        let tabbables = self.tabbables.enabled_elements();
        if !focus_first(&*self.platform, &tabbables)
            && let Some(container) = self.container.upgrade()
        {
            container.focus();
        }
    }
}

/// Focus containment for a modal overlay.
///
/// While active, Tab and Shift+Tab cycle through the `tabbables` collection
/// and focus that lands outside the container is pulled back in. Pausing
/// suspends containment without forgetting the element to return focus to;
/// this is how a nested trap takes over from its parent.
///
/// Dropping an active trap deactivates it.
#[derive(Clone)]
pub struct FocusTrap {
    inner: Rc<TrapInner>,
}

impl fmt::Debug for FocusTrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTrap")
            .field("state", &self.inner.state.get())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

impl FocusTrap {
    /// An inactive trap over `container`, cycling through `tabbables`.
    pub fn new(
        platform: PlatformRef,
        container: &ElementRef,
        tabbables: Collection,
        options: FocusTrapOptions,
    ) -> Self {
        Self {
            inner: Rc::new(TrapInner {
                platform,
                container: container.downgrade(),
                tabbables,
                options,
                state: Cell::new(TrapState::Inactive),
                return_to: RefCell::new(None),
            }),
        }
    }

    /// Start trapping. Does nothing if already active or paused.
    pub fn activate(&self) {
        let inner = &self.inner;
        if inner.state.get() != TrapState::Inactive {
            return;
        }
        *inner.return_to.borrow_mut() = inner.platform.active_element().map(|e| e.downgrade());
        inner.state.set(TrapState::Active);
        tracing::trace!(target: "trellis_layer::focus_trap", "activated");
        if inner.options.focus_on_activate {
            inner.focus_inside();
        }
    }

    /// Stop trapping and, if configured, restore the previously focused element.
    pub fn deactivate(&self) {
        let inner = &self.inner;
        if inner.state.replace(TrapState::Inactive) == TrapState::Inactive {
            return;
        }
        tracing::trace!(target: "trellis_layer::focus_trap", "deactivated");
        let previous = inner.return_to.borrow_mut().take();
        if inner.options.return_focus_on_deactivate
            && let Some(previous) = previous.and_then(|p| p.upgrade())
            && previous.is_connected()
        {
            previous.focus();
        }
    }

    /// Suspend containment while staying active.
    pub fn pause(&self) {
        if self.inner.state.get() == TrapState::Active {
            self.inner.state.set(TrapState::Paused);
        }
    }

    /// Resume containment after [`pause`](Self::pause).
    pub fn resume(&self) {
        if self.inner.state.get() == TrapState::Paused {
            self.inner.state.set(TrapState::Active);
            if self
                .inner
                .platform
                .active_element()
                .is_none_or(|active| !self.inner.contains(&active))
            {
                self.inner.focus_inside();
            }
        }
    }

    /// Returns `true` while activated, paused or not.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.state.get() != TrapState::Inactive
    }

    /// Returns `true` while paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.inner.state.get() == TrapState::Paused
    }

    /// Handle a document `focusin`.
    ///
    /// Returns `true` if focus was pulled back into the container.
    pub fn on_focus_in(&self, event: &FocusEvent) -> bool {
        let inner = &self.inner;
        if inner.state.get() != TrapState::Active {
            return false;
        }
        let Some(target) = &event.target else {
            return false;
        };
        if inner.contains(target) {
            return false;
        }
        match &event.related_target {
            Some(from) if inner.contains(from) => from.focus(),
            _ => inner.focus_inside(),
        }
        true
    }

    /// Handle a `keydown` inside the container: Tab wraps at the ends.
    pub fn on_key_down(&self, event: &mut KeyboardEvent) {
        let inner = &self.inner;
        if inner.state.get() != TrapState::Active || event.key != Key::Tab {
            return;
        }
        let tabbables = inner.tabbables.enabled_elements();
        let (Some(first), Some(last)) = (tabbables.first(), tabbables.last()) else {
            event.prevent_default();
            if let Some(container) = inner.container.upgrade() {
                container.focus();
            }
            return;
        };
        let active = inner.platform.active_element();
        let backwards = event.modifiers.contains(Modifiers::SHIFT);
        let wrap_to = match (backwards, active.as_ref()) {
            (_, None) => Some(first),
            (_, Some(active)) if !tabbables.contains(active) => {
                Some(if backwards { last } else { first })
            }
            (true, Some(active)) if active == first => Some(last),
            (false, Some(active)) if active == last => Some(first),
            _ => None,
        };
        if let Some(target) = wrap_to {
            event.prevent_default();
            target.focus();
        }
    }

    /// Activate while `active` holds `true` and deactivate when it turns `false`.
    pub fn bind_active(&self, active: &Signal<bool>) -> Disposer {
        if active.get() {
            self.activate();
        }
        let trap = Rc::downgrade(&self.inner);
        active.subscribe(move |active, _| {
            if let Some(inner) = trap.upgrade() {
                let trap = Self { inner };
                if *active {
                    trap.activate();
                } else {
                    trap.deactivate();
                }
            }
        })
    }
}

impl Drop for FocusTrap {
    fn drop(&mut self) {
        if Rc::strong_count(&self.inner) == 1 {
            self.deactivate();
        }
    }
}
