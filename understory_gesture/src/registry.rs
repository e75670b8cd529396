// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered handler bindings per gesture kind.
//!
//! ## Removal
//!
//! [`EventRegistry::remove`] with a selector removes only the bindings registered with exactly
//! that selector text. Without a selector it clears the whole list for the kind, delegated
//! bindings included, not just the direct ones.
//!
//! ## Sharing
//!
//! A recognizer keeps its bindings in a [`SharedRegistry`]. Handlers may capture a clone of it
//! and bind or unbind while a gesture is being delivered: dispatch walks a snapshot taken before
//! the first handler runs, so changes apply from the next dispatch on.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::selector::Selector;
use crate::types::{GestureEvent, GestureKind, Outcome};

/// A gesture handler.
///
/// Receives the event and the element it matched at (the bound root for direct bindings, the
/// delegated ancestor otherwise). The event's `target` is always the original concrete target.
pub type Handler<K> = Rc<dyn Fn(&GestureEvent<K>, &K) -> Outcome>;

/// One registered handler.
#[derive(Clone)]
pub struct Binding<K> {
    /// Gesture kind this binding listens for.
    pub kind: GestureKind,
    /// Delegation selector; `None` binds to the root element itself.
    pub selector: Option<Selector>,
    handler: Handler<K>,
}

impl<K> core::fmt::Debug for Binding<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Binding")
            .field("kind", &self.kind)
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

impl<K> Binding<K> {
    /// Create a binding.
    pub fn new(kind: GestureKind, selector: Option<Selector>, handler: Handler<K>) -> Self {
        Self {
            kind,
            selector,
            handler,
        }
    }

    /// Run the handler against `level`.
    pub fn invoke(&self, event: &GestureEvent<K>, level: &K) -> Outcome {
        (self.handler)(event, level)
    }
}

/// Per-recognizer store of handler bindings, in insertion order per kind.
pub struct EventRegistry<K> {
    lists: [Vec<Binding<K>>; GestureKind::COUNT],
}

impl<K> Default for EventRegistry<K> {
    fn default() -> Self {
        Self {
            lists: core::array::from_fn(|_| Vec::new()),
        }
    }
}

impl<K> core::fmt::Debug for EventRegistry<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut m = f.debug_map();
        for kind in GestureKind::ALL {
            let n = self.lists[kind.index()].len();
            if n > 0 {
                m.entry(&kind.name(), &n);
            }
        }
        m.finish()
    }
}

impl<K> EventRegistry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a binding for `kind`.
    pub fn add(&mut self, kind: GestureKind, selector: Option<Selector>, handler: Handler<K>) {
        log::debug!("bind {kind} selector={selector:?}");
        self.lists[kind.index()].push(Binding::new(kind, selector, handler));
    }

    /// Remove bindings for `kind`.
    ///
    /// With `Some(selector)`, only bindings whose selector text equals it exactly are removed.
    /// With `None`, every binding for `kind` is removed, delegated or not.
    pub fn remove(&mut self, kind: GestureKind, selector: Option<&str>) {
        let list = &mut self.lists[kind.index()];
        let before = list.len();
        match selector {
            Some(text) => list.retain(|b| {
                !b.selector
                    .as_ref()
                    .is_some_and(|s| selector_text_eq(s, text))
            }),
            None => list.clear(),
        }
        log::debug!("unbind {kind}: removed {}", before - list.len());
    }

    /// The live ordered list for `kind` (possibly empty).
    pub fn handlers(&self, kind: GestureKind) -> &[Binding<K>] {
        &self.lists[kind.index()]
    }

    /// Returns `true` if at least one binding exists for `kind`.
    pub fn has_handlers(&self, kind: GestureKind) -> bool {
        !self.lists[kind.index()].is_empty()
    }
}

/// Shared handle to an [`EventRegistry`].
///
/// Clones refer to the same bindings. No borrow is held while handlers run, so handlers may use
/// a clone to call [`on`](Self::on) or [`off`](Self::off) mid-dispatch.
///
/// A handler that captures a clone of its own registry keeps it alive until the handler is
/// removed.
pub struct SharedRegistry<K>(Rc<RefCell<EventRegistry<K>>>);

impl<K> Clone for SharedRegistry<K> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<K> Default for SharedRegistry<K> {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(EventRegistry::new())))
    }
}

impl<K> core::fmt::Debug for SharedRegistry<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0.try_borrow() {
            Ok(r) => core::fmt::Debug::fmt(&*r, f),
            Err(_) => f.write_str("SharedRegistry(<borrowed>)"),
        }
    }
}

impl<K> SharedRegistry<K> {
    /// Create an empty shared registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for each whitespace-separated type name in `types`.
    ///
    /// Empty type lists, unknown type names and unparsable selectors are ignored.
    pub fn on<F>(&self, types: &str, selector: Option<&str>, handler: F)
    where
        F: Fn(&GestureEvent<K>, &K) -> Outcome + 'static,
    {
        let selector = match selector.map(Selector::parse).transpose() {
            Ok(s) => s,
            Err(err) => {
                log::debug!("ignoring registration for `{types}`: {err}");
                return;
            }
        };
        let handler: Handler<K> = Rc::new(handler);
        let mut registry = self.0.borrow_mut();
        for name in types.split_whitespace() {
            match GestureKind::from_name(name) {
                Some(kind) => registry.add(kind, selector.clone(), handler.clone()),
                None => log::debug!("ignoring unknown gesture type `{name}`"),
            }
        }
    }

    /// Remove handlers for the type named `kind`, see [`EventRegistry::remove`].
    ///
    /// Unknown names are ignored.
    pub fn off(&self, kind: &str, selector: Option<&str>) {
        if let Some(kind) = GestureKind::from_name(kind) {
            self.0.borrow_mut().remove(kind, selector);
        }
    }

    /// Returns `true` if at least one binding exists for `kind`.
    pub fn has_handlers(&self, kind: GestureKind) -> bool {
        self.0.borrow().has_handlers(kind)
    }

    /// Number of bindings for `kind`.
    pub fn handler_count(&self, kind: GestureKind) -> usize {
        self.0.borrow().handlers(kind).len()
    }
}

impl<K: Clone> SharedRegistry<K> {
    /// Copy out the ordered bindings for `kind`.
    pub fn snapshot(&self, kind: GestureKind) -> Vec<Binding<K>> {
        self.0.borrow().handlers(kind).to_vec()
    }
}

/// Compare a parsed selector against raw selector text without allocating.
fn selector_text_eq(sel: &Selector, text: &str) -> bool {
    match sel {
        Selector::Class(name) => text.strip_prefix('.') == Some(name.as_str()),
        Selector::Id(name) => text.strip_prefix('#') == Some(name.as_str()),
        Selector::Tag(name) => text == name,
    }
}
