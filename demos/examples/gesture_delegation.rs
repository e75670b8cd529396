// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegated handlers and stop signals.
//!
//! A list recognizer delegates `tap` to `.item` and `.delete` descendants. Tapping the delete
//! icon runs the `.delete` handler first, which stops the walk: neither the `.item` handler nor
//! the root handler sees that tap. A stop at the root only skips the remaining root handlers.
//!
//! Run:
//! - `cargo run -p understory_demos --example gesture_delegation`

use kurbo::{Point, Rect};
use understory_element_tree::{Element, NodeId, Tree};
use understory_gesture::adapters::element_tree::contact_target;
use understory_gesture::config::SharedConfig;
use understory_gesture::input::ContactPhase;
use understory_gesture::recognizer::Recognizer;
use understory_gesture::types::{GestureEvent, Outcome, RawEvent};

fn main() {
    env_logger::init();

    let mut tree = Tree::new();
    let list = tree.insert(
        None,
        Element::new("ul")
            .with_id("list")
            .with_bounds(Rect::new(0.0, 0.0, 300.0, 120.0)),
    );
    let mut rows = Vec::new();
    for i in 0..3 {
        let top = f64::from(i) * 40.0;
        let row = tree.insert(
            Some(list),
            Element::new("li")
                .with_class("item")
                .with_bounds(Rect::new(0.0, top, 300.0, top + 40.0)),
        );
        tree.insert(
            Some(row),
            Element::new("span")
                .with_class("delete icon")
                .with_bounds(Rect::new(260.0, top + 5.0, 290.0, top + 35.0)),
        );
        rows.push(row);
    }

    let mut recognizer = Recognizer::new(list, SharedConfig::default());
    let row_index = move |node: &NodeId| rows.iter().position(|r| r == node);
    recognizer
        .on("tap", None, |_: &GestureEvent<NodeId>, _: &NodeId| {
            println!("  root: tap reached the list");
            Outcome::Continue
        })
        .on("tap", Some(".delete"), |_: &GestureEvent<NodeId>, _: &NodeId| {
            println!("  .delete: removing row, stopping the walk");
            Outcome::Stop
        })
        .on(
            "tap",
            Some(".item"),
            move |_: &GestureEvent<NodeId>, level: &NodeId| {
                println!("  .item: selected row {:?}", row_index(level));
                Outcome::Continue
            },
        );

    for (label, pos) in [
        ("tap row 1 text", Point::new(40.0, 60.0)),
        ("tap row 1 delete icon", Point::new(275.0, 60.0)),
    ] {
        println!("{label}:");
        let flags = tap(&mut recognizer, &tree, pos);
        println!("  default prevented: {flags}");
    }

    println!("root handler that stops, followed by another root handler:");
    recognizer
        .off("tap", None)
        .on("tap", None, |_: &GestureEvent<NodeId>, _: &NodeId| {
            println!("  first root handler: stop");
            Outcome::Stop
        })
        .on("tap", None, |_: &GestureEvent<NodeId>, _: &NodeId| {
            println!("  second root handler: never printed");
            Outcome::Continue
        });
    tap(&mut recognizer, &tree, Point::new(40.0, 20.0));
}

/// Deliver a quick contact at `pos` and report whether the release was default-prevented.
fn tap(recognizer: &mut Recognizer<NodeId>, tree: &Tree, pos: Point) -> bool {
    let Some(target) = contact_target(tree, pos) else {
        return false;
    };
    let mut down = RawEvent::new(ContactPhase::Start, target, pos, 0);
    recognizer.handle(tree, &mut down);
    let mut up = RawEvent::new(ContactPhase::End, target, pos, 30);
    recognizer.handle(tree, &mut up);
    up.default_prevented()
}
