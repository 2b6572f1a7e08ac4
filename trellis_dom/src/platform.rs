// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Process-wide platform hooks.

use alloc::rc::Rc;

use crate::element::ElementRef;
use crate::event::{KeyboardEvent, PointerEvent};

/// Callback for a global `pointerdown` listener.
pub type PointerListener = Rc<dyn Fn(&PointerEvent)>;

/// Callback for a global `keydown` listener.
pub type KeyListener = Rc<dyn Fn(&mut KeyboardEvent)>;

/// A listener installed on the window/document rather than on one element.
#[derive(Clone)]
pub enum GlobalListener {
    /// Window `pointerdown`, capture phase, passive.
    PointerDown(PointerListener),
    /// Document `keydown`, bubble phase.
    KeyDown(KeyListener),
}

impl core::fmt::Debug for GlobalListener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PointerDown(_) => f.write_str("GlobalListener::PointerDown(..)"),
            Self::KeyDown(_) => f.write_str("GlobalListener::KeyDown(..)"),
        }
    }
}

/// Identifier returned by [`Platform::add_global_listener`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Hooks into the surrounding document that only process-wide components use.
///
/// Element-scoped events are not routed through here: hosts call the widget
/// cores' `on_*` handlers from their own event wiring.
pub trait Platform {
    /// The element currently holding input focus.
    fn active_element(&self) -> Option<ElementRef>;

    /// Install a global listener.
    fn add_global_listener(&self, listener: GlobalListener) -> ListenerId;

    /// Remove a global listener. Unknown ids are ignored.
    fn remove_global_listener(&self, id: ListenerId);

    /// Enable or disable pointer events on the document body.
    fn set_background_pointer_events(&self, enabled: bool);

    /// Lock or unlock page scroll.
    fn set_scroll_locked(&self, locked: bool);
}

/// Shared handle to the host platform.
pub type PlatformRef = Rc<dyn Platform>;
