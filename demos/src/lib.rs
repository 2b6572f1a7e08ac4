// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared setup for the Trellis demos.
//!
//! Every demo drives widget cores against an in-memory mock document and
//! prints the attributes a screen reader would see.

use trellis_dom::Element;
use trellis_dom::mock::MockElement;
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, defaulting to the
/// widget and layer logs.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trellis=debug,trellis_layer=debug,trellis_timing=trace"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .without_time()
        .init();
    tracing::debug!(target: "trellis_demos", "tracing initialized");
}

/// `tag[name=value ...]` for the listed attributes that are present.
pub fn describe(element: &MockElement, attributes: &[&str]) -> String {
    let present: Vec<String> = attributes
        .iter()
        .filter_map(|name| element.attribute(name).map(|value| format!("{name}={value:?}")))
        .collect();
    format!("<{} {}>", element.tag(), present.join(" "))
}
