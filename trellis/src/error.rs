// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural-misuse errors.

use trellis_collection::CollectionError;
use trellis_reactive::ContextError;

/// A widget was composed with the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    /// A wrapper that renders through its child got zero or several children.
    #[error("[trellis] <{component}> expects exactly one child element, found {found}")]
    SingleChild {
        /// The wrapper.
        component: &'static str,
        /// Number of significant children supplied.
        found: usize,
    },
}

/// Every structural misuse a widget core reports.
///
/// These are composition mistakes by the integrating developer. Soft edge
/// cases (empty collections, unknown values, nothing focused) never produce
/// an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A part was built without the ancestor that provides its context.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// An item was registered outside any collection.
    #[error(transparent)]
    Collection(#[from] CollectionError),
    /// A wrapper got the wrong number of children.
    #[error(transparent)]
    Structure(#[from] StructureError),
}
