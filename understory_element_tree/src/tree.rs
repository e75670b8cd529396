// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, queries.

use alloc::vec::Vec;
use kurbo::Point;

use crate::types::{Element, NodeFlags, NodeId};

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level element tree.
pub struct Tree {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

/// Results of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched element.
    pub node: NodeId,
    /// Path from root to element (inclusive).
    pub path: Vec<NodeId>,
}

/// Filters applied during hit testing.
///
/// Used by [`Tree::hit_test_point`].
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryFilter {
    /// If true, only consider elements marked [`NodeFlags::VISIBLE`].
    pub visible_only: bool,
    /// If true, only consider elements marked [`NodeFlags::PICKABLE`].
    pub pickable_only: bool,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

impl Node {
    fn new(generation: u32, element: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a new element as the last child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts the element as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, element: Element) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, element));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, element)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove an element (and its subtree) from the tree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns true if `id` refers to a live element.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Attributes of a live element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node_opt(id).map(|n| &n.element)
    }

    /// Replace the raw class attribute of an element.
    pub fn set_class(&mut self, id: NodeId, class: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.class.clear();
            n.element.class.push_str(class);
        }
    }

    /// Update element flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.flags = flags;
        }
    }

    /// Parent of a live element, or `None` for roots and stale ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a live element in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Root elements in slot order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, n)| match n {
            Some(n) if n.parent.is_none() => {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "NodeId uses 32-bit indices by design."
                )]
                Some(NodeId::new(i as u32, n.generation))
            }
            _ => None,
        })
    }

    /// Pre-order walk of `id` and its descendants.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut stack = alloc::vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.node(cur).children.iter().rev().copied());
        }
        out
    }

    /// All live elements in document order: roots in slot order, each followed by its subtree.
    pub fn document_order(&self) -> Vec<NodeId> {
        let roots: Vec<NodeId> = self.roots().collect();
        roots
            .into_iter()
            .flat_map(|r| self.descendants(r))
            .collect()
    }

    /// Returns true if `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    /// Hit test a world-space point. Returns the deepest, topmost element.
    ///
    /// Later siblings are drawn over earlier ones, and children over their parent.
    /// Children are considered even when they extend past their parent's bounds.
    pub fn hit_test_point(&self, pt: Point, filter: QueryFilter) -> Option<Hit> {
        let mut best: Option<NodeId> = None;
        for id in self.document_order() {
            let el = &self.node(id).element;
            if filter.visible_only && !el.flags.contains(NodeFlags::VISIBLE) {
                continue;
            }
            if filter.pickable_only && !el.flags.contains(NodeFlags::PICKABLE) {
                continue;
            }
            if el.bounds.contains(pt) {
                best = Some(id);
            }
        }
        best.map(|node| Hit {
            node,
            path: self.path_to_root(node),
        })
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn path_to_root(&self, mut id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        loop {
            out.push(id);
            match self.node(id).parent {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::Rect;

    fn pick_all() -> QueryFilter {
        QueryFilter {
            visible_only: true,
            pickable_only: true,
        }
    }

    #[test]
    fn insert_links_parent_and_children() {
        let mut tree = Tree::new();
        let root = tree.insert(None, Element::new("ul"));
        let a = tree.insert(Some(root), Element::new("li"));
        let b = tree.insert(Some(root), Element::new("li"));
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn document_order_is_preorder() {
        let mut tree = Tree::new();
        let root = tree.insert(None, Element::new("div"));
        let a = tree.insert(Some(root), Element::new("p"));
        let a1 = tree.insert(Some(a), Element::new("span"));
        let b = tree.insert(Some(root), Element::new("p"));
        assert_eq!(tree.document_order(), vec![root, a, a1, b]);
        assert_eq!(tree.descendants(a), vec![a, a1]);
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut tree = Tree::new();
        let root = tree.insert(None, Element::new("div"));
        let a = tree.insert(Some(root), Element::new("span"));
        assert!(tree.is_alive(a));

        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert!(tree.children(root).is_empty());

        let b = tree.insert(Some(root), Element::new("span"));
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn remove_drops_subtree() {
        let mut tree = Tree::new();
        let root = tree.insert(None, Element::new("div"));
        let a = tree.insert(Some(root), Element::new("div"));
        let a1 = tree.insert(Some(a), Element::new("div"));
        tree.remove(a);
        assert!(!tree.is_alive(a1));
        assert!(tree.element(a1).is_none());
        assert_eq!(tree.parent(a1), None);
    }

    #[test]
    fn hit_test_prefers_deepest_then_last_sibling() {
        let mut tree = Tree::new();
        let root = tree.insert(
            None,
            Element::new("div").with_bounds(Rect::new(0.0, 0.0, 200.0, 200.0)),
        );
        let a = tree.insert(
            Some(root),
            Element::new("div").with_bounds(Rect::new(10.0, 10.0, 100.0, 100.0)),
        );
        let b = tree.insert(
            Some(root),
            Element::new("div").with_bounds(Rect::new(50.0, 50.0, 150.0, 150.0)),
        );

        let hit = tree.hit_test_point(Point::new(60.0, 60.0), pick_all()).unwrap();
        assert_eq!(hit.node, b, "later sibling is on top");
        assert_eq!(hit.path, vec![root, b]);

        let hit = tree.hit_test_point(Point::new(20.0, 20.0), pick_all()).unwrap();
        assert_eq!(hit.node, a);

        let hit = tree.hit_test_point(Point::new(180.0, 180.0), pick_all()).unwrap();
        assert_eq!(hit.node, root);

        assert!(tree.hit_test_point(Point::new(500.0, 0.0), pick_all()).is_none());
    }

    #[test]
    fn hit_test_respects_pickable_filter() {
        let mut tree = Tree::new();
        let root = tree.insert(
            None,
            Element::new("div").with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)),
        );
        let overlay = tree.insert(
            Some(root),
            Element::new("div").with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)),
        );
        tree.set_flags(overlay, NodeFlags::VISIBLE);

        let hit = tree.hit_test_point(Point::new(5.0, 5.0), pick_all()).unwrap();
        assert_eq!(hit.node, root);

        let hit = tree
            .hit_test_point(Point::new(5.0, 5.0), QueryFilter::default())
            .unwrap();
        assert_eq!(hit.node, overlay);
    }

    #[test]
    fn set_class_replaces_attribute() {
        let mut tree = Tree::new();
        let n = tree.insert(None, Element::new("li").with_class("item  active"));
        tree.set_class(n, "other");
        assert_eq!(tree.element(n).unwrap().class, "other");

        tree.remove(n);
        tree.set_class(n, "stale");
        assert!(tree.element(n).is_none());
    }
}
