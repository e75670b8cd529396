// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted contacts replayed through a recognizer.
//!
//! This example attaches a recognizer by selector, registers handlers for every gesture type,
//! and replays four contacts: a tap, a double tap, a long press and a fast swipe. Delayed
//! actions are driven with `poll` at the recognizer's next deadline, the way a host timer would.
//!
//! Run:
//! - `cargo run -p understory_demos --example gesture_basics`
//! - `RUST_LOG=trace cargo run -p understory_demos --example gesture_basics` to see timer traces.

use kurbo::{Point, Rect};
use understory_element_tree::{Element, NodeId, Tree};
use understory_gesture::adapters::element_tree::contact_target;
use understory_gesture::config::SharedConfig;
use understory_gesture::input::{ContactPhase, InputCapability};
use understory_gesture::recognizer::{Recognizer, attach};
use understory_gesture::types::{GestureEvent, Outcome, RawEvent};

fn main() {
    env_logger::init();

    let mut tree = Tree::new();
    let pad = tree.insert(
        None,
        Element::new("div")
            .with_id("pad")
            .with_bounds(Rect::new(0.0, 0.0, 400.0, 300.0)),
    );
    tree.insert(
        Some(pad),
        Element::new("button")
            .with_class("ok primary")
            .with_bounds(Rect::new(20.0, 20.0, 120.0, 60.0)),
    );

    let config = SharedConfig::default();
    let Some(mut recognizer) = attach(&tree, "#pad", &config).into_vec().pop() else {
        println!("nothing matched #pad");
        return;
    };

    let names = tree_names(&tree);
    recognizer.on(
        "tap doubletap longtap swipestart swipeend swipeleft swiperight swipeup swipedown",
        None,
        move |ev: &GestureEvent<NodeId>, _: &NodeId| {
            print!(
                "  {:<10} on {:<8} at ({:>5.1}, {:>5.1})",
                ev.kind.name(),
                names(ev.target),
                ev.page_x(),
                ev.page_y()
            );
            if let (Some(dx), Some(dy)) = (ev.move_x(), ev.move_y()) {
                print!("  moved ({dx:+.1}, {dy:+.1})");
            }
            println!();
            Outcome::Continue
        },
    );

    let cap = InputCapability::detect(false);
    println!("binding raw events: {:?}", cap.raw_names());

    let script: &[(&str, &[(&str, f64, f64, u64)])] = &[
        (
            "tap",
            &[("mousedown", 50.0, 40.0, 0), ("mouseup", 52.0, 41.0, 60)],
        ),
        (
            "double tap",
            &[
                ("mousedown", 50.0, 40.0, 1000),
                ("mouseup", 50.0, 40.0, 1050),
                ("mousedown", 51.0, 40.0, 1150),
                ("mouseup", 51.0, 41.0, 1200),
            ],
        ),
        (
            "long press",
            &[
                ("mousedown", 200.0, 200.0, 3000),
                ("mouseup", 200.0, 200.0, 3900),
            ],
        ),
        (
            "swipe",
            &[
                ("mousedown", 300.0, 150.0, 5000),
                ("mousemove", 260.0, 152.0, 5050),
                ("mousemove", 180.0, 155.0, 5120),
                ("mouseup", 180.0, 155.0, 5150),
            ],
        ),
    ];

    for (label, samples) in script {
        println!("{label}:");
        for &(name, x, y, t) in *samples {
            let Some(phase) = cap.phase_for(name) else {
                continue;
            };
            advance(&mut recognizer, &tree, t);
            let pos = Point::new(x, y);
            let target = contact_target(&tree, pos).unwrap_or(pad);
            recognizer.handle(&tree, &mut RawEvent::new(phase, target, pos, t));
        }
        advance(&mut recognizer, &tree, u64::MAX);
    }

    // Tunables are shared: every recognizer built from `config` sees the change.
    config.configure([("swipeMinDistance", 200.0)]);
    println!("short swipe with swipeMinDistance = 200:");
    for (phase, x, t) in [
        (ContactPhase::Start, 300.0, 9000),
        (ContactPhase::Move, 200.0, 9050),
        (ContactPhase::End, 200.0, 9060),
    ] {
        let pos = Point::new(x, 150.0);
        recognizer.handle(&tree, &mut RawEvent::new(phase, pad, pos, t));
    }
}

/// Fire every delayed action due up to `now`, as a host timer would.
fn advance(recognizer: &mut Recognizer<NodeId>, tree: &Tree, now: u64) {
    while let Some(deadline) = recognizer.next_deadline().filter(|d| *d <= now) {
        recognizer.poll(tree, deadline);
    }
}

/// Label elements by id, falling back to tag name.
fn tree_names(tree: &Tree) -> impl Fn(NodeId) -> String + 'static {
    let labels: Vec<(NodeId, String)> = tree
        .document_order()
        .into_iter()
        .filter_map(|n| {
            let el = tree.element(n)?;
            Some((n, el.id.clone().unwrap_or_else(|| el.tag.clone())))
        })
        .collect();
    move |node| {
        labels
            .iter()
            .find(|(n, _)| *n == node)
            .map_or_else(|| "?".to_string(), |(_, l)| l.clone())
    }
}
