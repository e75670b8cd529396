// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_element_tree --heading-base-level=0

//! Understory Element Tree: a small, Kurbo-native tree of interactive elements.
//!
//! - Represents a hierarchy of elements with a tag name, an optional id, and a class attribute.
//! - Tracks parent/child links with generational [`NodeId`] handles.
//! - Hit-tests a world-space point to find the element under a contact.
//!
//! It is the host-side model the gesture crate walks when it simulates bubbling, and what
//! selectors like `.item`, `#list` or `li` are resolved against.
//!
//! ## Not a layout engine
//!
//! This crate does not perform layout. Upstream code is expected to compute world-space bounds and write
//! them onto each [`Element`]. Bounds of a child are not clipped to its parent.
//!
//! ## API overview
//!
//! - [`Tree`]: container managing elements and their links.
//! - [`Element`]: per-element attributes (tag, id, class, bounds, flags).
//! - [`NodeFlags`]: visibility and picking controls.
//! - [`NodeId`]: generational handle of an element.
//! - [`QueryFilter`]: restricts hit results (visible/pickable).
//!
//! ### Minimal usage
//!
//! ```
//! use understory_element_tree::{Element, QueryFilter, Tree};
//! use kurbo::{Point, Rect};
//!
//! let mut tree = Tree::new();
//! let list = tree.insert(
//!     None,
//!     Element::new("ul").with_id("list").with_bounds(Rect::new(0.0, 0.0, 200.0, 200.0)),
//! );
//! let item = tree.insert(
//!     Some(list),
//!     Element::new("li").with_class("item").with_bounds(Rect::new(0.0, 0.0, 200.0, 40.0)),
//! );
//!
//! let filter = QueryFilter { visible_only: true, pickable_only: true };
//! let hit = tree.hit_test_point(Point::new(20.0, 20.0), filter).unwrap();
//! assert_eq!(hit.node, item);
//! assert_eq!(hit.path, vec![list, item]);
//! assert_eq!(tree.parent(item), Some(list));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::{Hit, QueryFilter, Tree};
pub use types::{Element, NodeFlags, NodeId};
