// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegated bubbling dispatch.
//!
//! Synthesized gestures never use the host's native propagation. Instead [`dispatch`] replays a
//! bubble walk from the event's concrete target up to the bound root:
//!
//! - At every level below the root, the carried handler list is partitioned. Handlers whose
//!   selector matches the level run there, in insertion order, and are dropped from the list.
//!   The rest are carried to the parent.
//! - At the root, every carried handler without a selector, or whose selector matches the root,
//!   runs in insertion order.
//!
//! A handler returning [`Outcome::Stop`] ends the dispatch. Below the root this aborts the whole
//! walk, including the root pass. At the root it only skips the remaining root handlers, since
//! there is nowhere further to bubble.
//!
//! If the walk runs out of ancestors before reaching the root, the topmost level reached is
//! treated as the terminal level with nothing matching there: only the carried handlers without
//! a selector run, with the same stop rule as the root pass.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use kurbo::Point;
//! use understory_gesture::dispatch::dispatch;
//! use understory_gesture::registry::Binding;
//! use understory_gesture::selector::Selector;
//! use understory_gesture::types::{ElementLookup, GestureEvent, GestureKind, Outcome, ParentLookup};
//!
//! // 1 (ul) → 2 (li.item) → 3 (span)
//! struct Doc;
//! impl ParentLookup<u32> for Doc {
//!     fn parent_of(&self, n: &u32) -> Option<u32> { (*n > 1).then(|| n - 1) }
//! }
//! impl ElementLookup<u32> for Doc {
//!     fn tag_name(&self, n: &u32) -> Option<&str> { Some(["", "ul", "li", "span"][*n as usize]) }
//!     fn id_of(&self, _: &u32) -> Option<&str> { None }
//!     fn class_name(&self, n: &u32) -> Option<&str> { (*n == 2).then_some("item") }
//! }
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = |name: &'static str| {
//!     let seen = seen.clone();
//!     Rc::new(move |_: &GestureEvent<u32>, level: &u32| {
//!         seen.borrow_mut().push((name, *level));
//!         Outcome::Continue
//!     })
//! };
//! let handlers = vec![
//!     Binding::new(GestureKind::Tap, None, log("root")),
//!     Binding::new(GestureKind::Tap, Some(Selector::parse(".item").unwrap()), log("item")),
//! ];
//! let event = GestureEvent { kind: GestureKind::Tap, target: 3, page: Point::ZERO, swipe: None };
//!
//! assert_eq!(dispatch(&Doc, 1, &event, &handlers), Outcome::Continue);
//! assert_eq!(*seen.borrow(), vec![("item", 2), ("root", 1)]);
//! ```

use alloc::vec::Vec;

use crate::registry::Binding;
use crate::selector::Selector;
use crate::types::{ElementLookup, GestureEvent, Outcome, ParentLookup};

/// Deliver `event` to every matching binding in `handlers` by walking from `event.target`
/// up to `root` (inclusive).
///
/// Returns [`Outcome::Stop`] if any invoked handler stopped, otherwise [`Outcome::Continue`].
/// `handlers` is read as a snapshot; callers that own a live registry should pass a copy if
/// handlers might mutate it.
pub fn dispatch<K, T>(
    tree: &T,
    root: K,
    event: &GestureEvent<K>,
    handlers: &[Binding<K>],
) -> Outcome
where
    K: Copy + Eq,
    T: ParentLookup<K> + ElementLookup<K> + ?Sized,
{
    if handlers.is_empty() {
        return Outcome::Continue;
    }

    let mut carried: Vec<&Binding<K>> = handlers.iter().collect();
    let mut node = event.target;

    loop {
        if node == root {
            return terminal_pass(&carried, event, &node, |s| s.matches(tree, &node));
        }

        let mut next = Vec::with_capacity(carried.len());
        for b in carried {
            match &b.selector {
                Some(s) if s.matches(tree, &node) => {
                    if b.invoke(event, &node) == Outcome::Stop {
                        log::trace!("{}: stopped below root, walk aborted", event.kind);
                        return Outcome::Stop;
                    }
                }
                _ => next.push(b),
            }
        }
        carried = next;
        match tree.parent_of(&node) {
            Some(parent) => node = parent,
            None => {
                log::trace!("{}: walk left the tree below the bound root", event.kind);
                return terminal_pass(&carried, event, &node, |_| false);
            }
        }
    }
}

/// Run the carried bindings that have no selector or whose selector passes `matches`, in order.
///
/// A stop skips the rest of the pass.
fn terminal_pass<K>(
    carried: &[&Binding<K>],
    event: &GestureEvent<K>,
    level: &K,
    matches: impl Fn(&Selector) -> bool,
) -> Outcome {
    for b in carried {
        if b.selector.as_ref().is_none_or(&matches) && b.invoke(event, level) == Outcome::Stop {
            log::trace!("{}: stopped at terminal level", event.kind);
            return Outcome::Stop;
        }
    }
    Outcome::Continue
}
