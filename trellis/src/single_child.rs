// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The "exactly one child element" check for wrappers that render through their child.

use alloc::string::String;

use trellis_dom::ElementRef;

use crate::error::StructureError;

/// One rendered child node, as a host sees it.
#[derive(Clone, Debug)]
pub enum ChildNode {
    /// An element.
    Element(ElementRef),
    /// A text node.
    Text(String),
    /// A comment or other placeholder node that renders nothing.
    Comment,
}

impl ChildNode {
    fn is_significant(&self) -> bool {
        match self {
            Self::Element(_) => true,
            Self::Text(text) => !text.trim().is_empty(),
            Self::Comment => false,
        }
    }
}

/// Return the single child element of `component`.
///
/// Comments and whitespace-only text are ignored. Anything else must be
/// exactly one element, or a [`StructureError::SingleChild`] is returned.
///
/// ```rust
/// use trellis::{ChildNode, StructureError, single_child};
///
/// let empty: [ChildNode; 1] = [ChildNode::Text("  ".into())];
/// assert_eq!(
///     single_child(&empty, "MenuTrigger").unwrap_err(),
///     StructureError::SingleChild { component: "MenuTrigger", found: 0 },
/// );
/// ```
pub fn single_child<'a>(
    children: &'a [ChildNode],
    component: &'static str,
) -> Result<&'a ElementRef, StructureError> {
    let mut significant = children.iter().filter(|c| c.is_significant());
    match (significant.next(), significant.next()) {
        (Some(ChildNode::Element(element)), None) => Ok(element),
        (None, _) => Err(StructureError::SingleChild {
            component,
            found: 0,
        }),
        (Some(_), rest) => Err(StructureError::SingleChild {
            component,
            found: 1 + usize::from(rest.is_some()) + significant.count(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use trellis_dom::mock::MockDocument;

    #[test]
    fn one_element_among_noise_is_accepted() {
        let doc = MockDocument::new();
        let button = doc.create_element("button");
        let children = vec![
            ChildNode::Comment,
            ChildNode::Text("\n  ".into()),
            ChildNode::Element(button.handle()),
        ];
        assert_eq!(single_child(&children, "Trigger"), Ok(&button.handle()));
    }

    #[test]
    fn text_and_extra_elements_are_rejected() {
        let doc = MockDocument::new();
        let (a, b) = (doc.create_element("a"), doc.create_element("b"));
        let two = vec![ChildNode::Element(a.handle()), ChildNode::Element(b.handle())];
        assert_eq!(
            single_child(&two, "Trigger"),
            Err(StructureError::SingleChild { component: "Trigger", found: 2 })
        );

        let text = vec![ChildNode::Text("label".into())];
        assert_eq!(
            single_child(&text, "Trigger"),
            Err(StructureError::SingleChild { component: "Trigger", found: 1 })
        );
    }
}
