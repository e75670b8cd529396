// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: tap, double tap, long press and swipe recognition with delegated dispatch.
//!
//! ## Overview
//!
//! A [`Recognizer`](crate::recognizer::Recognizer) is bound to one element of a host tree. It turns a
//! stream of raw contact samples (start, move, end, cancel) into gestures:
//! `tap`, `doubletap`, `longtap`, `swipestart`, `swiping`, `swipeend`, `swipeleft`, `swiperight`,
//! `swipeup` and `swipedown`.
//!
//! Recognized gestures are not delivered through the host's native propagation. Instead the
//! [`dispatch`](crate::dispatch) engine replays a bubble walk from the concrete target up to the bound
//! element, so handlers can be delegated to descendants with a single-token
//! [`Selector`](crate::selector::Selector) such as `.item`, `#list` or `li`.
//!
//! ## Workflow
//!
//! 1) Create one [`SharedConfig`](crate::config::SharedConfig) and pass it to every recognizer.
//! 2) Bind recognizers to elements, either directly with
//!    [`Recognizer::new`](crate::recognizer::Recognizer::new) or by selector with
//!    [`attach`](crate::recognizer::attach).
//! 3) Register handlers with [`Recognizer::on`](crate::recognizer::Recognizer::on). A handler returns
//!    [`Outcome::Stop`](crate::types::Outcome::Stop) to halt the walk and flag the raw event.
//! 4) Forward each raw sample with [`Recognizer::handle`](crate::recognizer::Recognizer::handle) and
//!    call [`Recognizer::poll`](crate::recognizer::Recognizer::poll) when
//!    [`next_deadline`](crate::recognizer::Recognizer::next_deadline) comes due.
//!
//! The host tree is read through [`ParentLookup`](crate::types::ParentLookup),
//! [`ElementLookup`](crate::types::ElementLookup) and
//! [`ElementResolver`](crate::types::ElementResolver). With the `element_tree_adapter` feature,
//! `understory_element_tree::Tree` implements all three.
//!
//! ## Minimal usage
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use kurbo::{Point, Rect};
//! use understory_element_tree::{Element, Tree};
//! use understory_gesture::adapters::element_tree::contact_target;
//! use understory_gesture::config::SharedConfig;
//! use understory_gesture::input::ContactPhase;
//! use understory_gesture::recognizer::Recognizer;
//! use understory_gesture::types::{GestureEvent, Outcome, RawEvent};
//!
//! let mut tree = Tree::new();
//! let list = tree.insert(None, Element::new("ul").with_bounds(Rect::new(0.0, 0.0, 200.0, 200.0)));
//! let item = tree.insert(
//!     Some(list),
//!     Element::new("li").with_class("item").with_bounds(Rect::new(0.0, 0.0, 200.0, 40.0)),
//! );
//!
//! let taps = Rc::new(Cell::new(0));
//! let mut recognizer = Recognizer::new(list, SharedConfig::default());
//! let counter = taps.clone();
//! recognizer.on("tap", Some(".item"), move |ev: &GestureEvent<_>, level: &_| {
//!     assert_eq!((ev.target, *level), (item, item));
//!     counter.set(counter.get() + 1);
//!     Outcome::Continue
//! });
//!
//! let at = Point::new(20.0, 20.0);
//! let target = contact_target(&tree, at).unwrap();
//! recognizer.handle(&tree, &mut RawEvent::new(ContactPhase::Start, target, at, 0));
//! recognizer.handle(&tree, &mut RawEvent::new(ContactPhase::End, target, at, 40));
//! assert_eq!(taps.get(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod config;
pub mod dispatch;
pub mod input;
pub mod recognizer;
pub mod registry;
pub mod selector;
mod timer;
pub mod types;
