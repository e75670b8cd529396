// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Understory Element Tree.
//!
//! ## Feature
//!
//! Enable with `element_tree_adapter`.
//!
//! ## Notes
//!
//! [`Tree`] implements every host lookup the recognizer needs, so it can be passed directly to
//! [`Recognizer::handle`](crate::recognizer::Recognizer::handle) and
//! [`attach`](crate::recognizer::attach). Stale ids read as detached elements with no attributes.

use alloc::vec::Vec;

use kurbo::Point;
use understory_element_tree::{NodeId, QueryFilter, Tree};

use crate::recognizer::Recognizer;
use crate::selector::Selector;
use crate::types::{ElementLookup, ElementResolver, ParentLookup};

impl ParentLookup<NodeId> for Tree {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
    }
}

impl ElementLookup<NodeId> for Tree {
    fn tag_name(&self, node: &NodeId) -> Option<&str> {
        self.element(*node).map(|e| e.tag.as_str())
    }

    fn id_of(&self, node: &NodeId) -> Option<&str> {
        self.element(*node).and_then(|e| e.id.as_deref())
    }

    fn class_name(&self, node: &NodeId) -> Option<&str> {
        self.element(*node).map(|e| e.class.as_str())
    }
}

impl ElementResolver<NodeId> for Tree {
    fn resolve(&self, selector: &Selector) -> Vec<NodeId> {
        self.document_order()
            .into_iter()
            .filter(|n| selector.matches(self, n))
            .collect()
    }
}

/// The element a contact at `pt` lands on: the deepest visible, pickable element under it.
pub fn contact_target(tree: &Tree, pt: Point) -> Option<NodeId> {
    let filter = QueryFilter {
        visible_only: true,
        pickable_only: true,
    };
    tree.hit_test_point(pt, filter).map(|hit| hit.node)
}

/// Returns `true` if raw input on `target` belongs to `recognizer`'s element.
///
/// Hosts use this to route one raw sample to every recognizer whose element contains the target.
pub fn routes_to(tree: &Tree, recognizer: &Recognizer<NodeId>, target: NodeId) -> bool {
    tree.is_ancestor_or_self(recognizer.element(), target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SharedConfig;
    use kurbo::Rect;
    use understory_element_tree::{Element, NodeFlags};

    fn list() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let ul = tree.insert(
            None,
            Element::new("UL")
                .with_id("list")
                .with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)),
        );
        let li = tree.insert(
            Some(ul),
            Element::new("li")
                .with_class("item first")
                .with_bounds(Rect::new(0.0, 0.0, 100.0, 50.0)),
        );
        let span = tree.insert(
            Some(li),
            Element::new("span").with_bounds(Rect::new(10.0, 10.0, 40.0, 40.0)),
        );
        (tree, ul, li, span)
    }

    #[test]
    fn lookups_read_attributes() {
        let (tree, ul, li, span) = list();
        assert_eq!(tree.parent_of(&span), Some(li));
        assert_eq!(tree.parent_of(&ul), None);
        assert_eq!(tree.tag_name(&ul), Some("UL"));
        assert_eq!(tree.id_of(&ul), Some("list"));
        assert_eq!(tree.id_of(&li), None);
        assert_eq!(tree.class_name(&li), Some("item first"));
    }

    #[test]
    fn stale_ids_have_no_attributes() {
        let (mut tree, _, li, span) = list();
        tree.remove(li);
        assert_eq!(tree.parent_of(&span), None);
        assert_eq!(tree.tag_name(&span), None);
        assert!(!Selector::parse("span").unwrap().matches(&tree, &span));
    }

    #[test]
    fn resolve_in_document_order() {
        let (tree, ul, li, _) = list();
        assert_eq!(tree.resolve(&Selector::parse("ul").unwrap()), [ul]);
        assert_eq!(tree.resolve(&Selector::parse(".first").unwrap()), [li]);
        assert!(tree.resolve(&Selector::parse("#nope").unwrap()).is_empty());
    }

    #[test]
    fn contact_target_skips_unpickable() {
        let (mut tree, _, li, span) = list();
        assert_eq!(contact_target(&tree, Point::new(20.0, 20.0)), Some(span));
        tree.set_flags(span, NodeFlags::VISIBLE);
        assert_eq!(contact_target(&tree, Point::new(20.0, 20.0)), Some(li));
        assert_eq!(contact_target(&tree, Point::new(500.0, 0.0)), None);
    }

    #[test]
    fn routing_follows_ancestry() {
        let (tree, ul, li, span) = list();
        let r = Recognizer::new(li, SharedConfig::default());
        assert!(routes_to(&tree, &r, span));
        assert!(routes_to(&tree, &r, li));
        assert!(!routes_to(&tree, &r, ul));
    }
}
