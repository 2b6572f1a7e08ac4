// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability lookup for composed widgets.

/// Structural-misuse error: a widget part was built without the ancestor it needs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// A required capability from an ancestor was not supplied.
    #[error("[trellis] <{component}> must be used within <{ancestor}>")]
    Missing {
        /// The part that was misplaced.
        component: &'static str,
        /// The ancestor that provides the capability.
        ancestor: &'static str,
    },
}

/// Unwrap a capability passed down from an ancestor, or report which ancestor is missing.
///
/// ```rust
/// use trellis_reactive::{ContextError, require};
///
/// struct MenuContext;
/// let missing: Option<&MenuContext> = None;
/// assert_eq!(
///     require(missing, "MenuItem", "MenuContent").err(),
///     Some(ContextError::Missing { component: "MenuItem", ancestor: "MenuContent" }),
/// );
/// ```
pub fn require<'a, T: ?Sized>(
    capability: Option<&'a T>,
    component: &'static str,
    ancestor: &'static str,
) -> Result<&'a T, ContextError> {
    capability.ok_or(ContextError::Missing {
        component,
        ancestor,
    })
}
