// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests for `understory_gesture` against `understory_element_tree`.
//!
//! Each test builds a small document, binds a recognizer, replays raw contacts at explicit
//! timestamps and checks the gestures handlers observed.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_element_tree::{Element, NodeId, Tree};
use understory_gesture::adapters::element_tree::{contact_target, routes_to};
use understory_gesture::config::SharedConfig;
use understory_gesture::input::{ContactPhase, InputCapability};
use understory_gesture::recognizer::{Attached, Recognizer, attach};
use understory_gesture::types::{GestureEvent, GestureKind, Outcome, RawEvent};

/// `div#app > ul.list > li.item > div.row > span.label`, each filling the 200x200 page.
struct Doc {
    tree: Tree,
    app: NodeId,
    list: NodeId,
    item: NodeId,
    label: NodeId,
}

fn doc() -> Doc {
    let page = Rect::new(0.0, 0.0, 200.0, 200.0);
    let mut tree = Tree::new();
    let app = tree.insert(None, Element::new("div").with_id("app").with_bounds(page));
    let list = tree.insert(
        Some(app),
        Element::new("ul").with_class("list").with_bounds(page),
    );
    let item = tree.insert(
        Some(list),
        Element::new("li").with_class("item").with_bounds(page),
    );
    let row = tree.insert(
        Some(item),
        Element::new("div").with_class("row").with_bounds(page),
    );
    let label = tree.insert(
        Some(row),
        Element::new("span").with_class("label").with_bounds(page),
    );
    Doc {
        tree,
        app,
        list,
        item,
        label,
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Fired {
    kind: GestureKind,
    target: NodeId,
    level: NodeId,
    page: Point,
}

type Log = Rc<RefCell<Vec<Fired>>>;

fn record(r: &mut Recognizer<NodeId>, types: &str, selector: Option<&str>) -> Log {
    let log = Log::default();
    let sink = log.clone();
    r.on(
        types,
        selector,
        move |ev: &GestureEvent<NodeId>, level: &NodeId| {
            sink.borrow_mut().push(Fired {
                kind: ev.kind,
                target: ev.target,
                level: *level,
                page: ev.page,
            });
            Outcome::Continue
        },
    );
    log
}

fn kinds(log: &Log) -> Vec<GestureKind> {
    log.borrow().iter().map(|f| f.kind).collect()
}

/// Hit test the page and feed one raw sample.
fn contact(
    r: &mut Recognizer<NodeId>,
    tree: &Tree,
    phase: ContactPhase,
    x: f64,
    y: f64,
    t: u64,
) {
    let pos = Point::new(x, y);
    let target = contact_target(tree, pos).expect("the page covers every sample");
    r.handle(tree, &mut RawEvent::new(phase, target, pos, t));
}

const SWIPES: &str = "swipestart swiping swipeend swipeleft swiperight swipeup swipedown";

#[test]
fn only_tap_registered_fires_tap_immediately() {
    let d = doc();
    let mut r = Recognizer::new(d.app, SharedConfig::default());
    let log = record(&mut r, "tap", None);
    let swipes = record(&mut r, "swipeleft swiperight swipeup swipedown", None);

    contact(&mut r, &d.tree, ContactPhase::Start, 10.0, 10.0, 0);
    contact(&mut r, &d.tree, ContactPhase::End, 12.0, 11.0, 50);

    assert_eq!(
        *log.borrow(),
        vec![Fired {
            kind: GestureKind::Tap,
            target: d.label,
            level: d.app,
            page: Point::new(12.0, 11.0),
        }]
    );
    assert!(swipes.borrow().is_empty());
    assert_eq!(r.next_deadline(), None);
}

#[test]
fn two_quick_taps_become_one_double_tap() {
    let d = doc();
    let config = SharedConfig::default();
    config.configure([("doubleTapDelay", 200.0)]);
    let mut r = Recognizer::new(d.app, config);
    let log = record(&mut r, "tap doubletap", None);

    contact(&mut r, &d.tree, ContactPhase::Start, 50.0, 50.0, 1_000);
    contact(&mut r, &d.tree, ContactPhase::End, 51.0, 50.0, 1_040);
    assert!(log.borrow().is_empty(), "first release only arms the deferred tap");

    contact(&mut r, &d.tree, ContactPhase::Start, 52.0, 49.0, 1_120);
    contact(&mut r, &d.tree, ContactPhase::End, 52.0, 50.0, 1_190);
    r.poll(&d.tree, 10_000);

    assert_eq!(kinds(&log), vec![GestureKind::DoubleTap]);
}

#[test]
fn taps_outside_the_window_stay_single() {
    let d = doc();
    let mut r = Recognizer::new(d.app, SharedConfig::default());
    let log = record(&mut r, "tap doubletap", None);

    contact(&mut r, &d.tree, ContactPhase::Start, 50.0, 50.0, 1_000);
    contact(&mut r, &d.tree, ContactPhase::End, 50.0, 50.0, 1_040);
    r.poll(&d.tree, 1_240);
    contact(&mut r, &d.tree, ContactPhase::Start, 50.0, 50.0, 1_500);
    contact(&mut r, &d.tree, ContactPhase::End, 50.0, 50.0, 1_540);
    r.poll(&d.tree, 1_740);

    assert_eq!(kinds(&log), vec![GestureKind::Tap, GestureKind::Tap]);
}

#[test]
fn held_contact_becomes_long_tap() {
    let d = doc();
    let mut r = Recognizer::new(d.app, SharedConfig::default());
    let log = record(
        &mut r,
        "tap doubletap longtap swipeleft swiperight swipeup swipedown swipeend",
        None,
    );

    contact(&mut r, &d.tree, ContactPhase::Start, 80.0, 80.0, 0);
    assert_eq!(r.next_deadline(), Some(700));
    r.poll(&d.tree, 700);
    contact(&mut r, &d.tree, ContactPhase::End, 80.0, 80.0, 800);
    r.poll(&d.tree, 10_000);

    assert_eq!(kinds(&log), vec![GestureKind::LongTap]);
    assert_eq!(log.borrow()[0].page, Point::new(80.0, 80.0));
}

#[test]
fn fast_drag_swipes_right_once() {
    let d = doc();
    let config = SharedConfig::default();
    config.configure([("swipeMinDistance", 20.0), ("swipeTime", 200.0)]);
    let mut r = Recognizer::new(d.app, config);
    let log = record(&mut r, SWIPES, None);
    let taps = record(&mut r, "tap doubletap longtap", None);

    contact(&mut r, &d.tree, ContactPhase::Start, 0.0, 0.0, 0);
    contact(&mut r, &d.tree, ContactPhase::Move, 100.0, 0.0, 150);
    contact(&mut r, &d.tree, ContactPhase::Move, 120.0, 0.0, 160);
    contact(&mut r, &d.tree, ContactPhase::End, 120.0, 0.0, 170);
    r.poll(&d.tree, 10_000);

    assert_eq!(
        kinds(&log),
        vec![
            GestureKind::SwipeStart,
            GestureKind::Swiping,
            GestureKind::SwipeRight,
            GestureKind::Swiping,
            GestureKind::SwipeEnd,
        ]
    );
    assert!(taps.borrow().is_empty());
}

#[test]
fn swipe_directions() {
    let cases = [
        ((60.0, 60.0), GestureKind::SwipeRight),
        ((-60.0, 60.0), GestureKind::SwipeLeft),
        ((10.0, -40.0), GestureKind::SwipeUp),
        ((-10.0, 40.0), GestureKind::SwipeDown),
    ];
    for ((dx, dy), expected) in cases {
        let d = doc();
        let mut r = Recognizer::new(d.app, SharedConfig::default());
        let log = record(&mut r, "swipeleft swiperight swipeup swipedown", None);
        contact(&mut r, &d.tree, ContactPhase::Start, 100.0, 100.0, 0);
        contact(&mut r, &d.tree, ContactPhase::Move, 100.0 + dx, 100.0 + dy, 30);
        assert_eq!(kinds(&log), vec![expected], "displacement ({dx}, {dy})");
    }
}

#[test]
fn delegated_handler_fires_once_with_concrete_target() {
    let d = doc();
    let mut r = Recognizer::new(d.app, SharedConfig::default());
    let log = record(&mut r, "tap", Some(".item"));

    contact(&mut r, &d.tree, ContactPhase::Start, 10.0, 10.0, 0);
    contact(&mut r, &d.tree, ContactPhase::End, 10.0, 10.0, 20);

    assert_eq!(log.borrow().len(), 1);
    let fired = log.borrow()[0].clone();
    assert_eq!(fired.target, d.label, "handlers see the original descendant");
    assert_eq!(fired.level, d.item);
}

#[test]
fn delegated_stop_aborts_root_pass() {
    let d = doc();
    let mut r = Recognizer::new(d.app, SharedConfig::default());
    let root = record(&mut r, "tap", None);
    r.on("tap", Some("li"), |_: &GestureEvent<NodeId>, _: &NodeId| {
        Outcome::Stop
    });
    let above = record(&mut r, "tap", Some(".list"));

    let pos = Point::new(10.0, 10.0);
    let mut down = RawEvent::new(ContactPhase::Start, d.label, pos, 0);
    r.handle(&d.tree, &mut down);
    let mut up = RawEvent::new(ContactPhase::End, d.label, pos, 20);
    r.handle(&d.tree, &mut up);

    assert!(root.borrow().is_empty());
    assert!(above.borrow().is_empty());
    assert!(up.default_prevented() && up.propagation_stopped());
    assert!(!down.default_prevented());
}

#[test]
fn root_stop_only_truncates_root_handlers() {
    let d = doc();
    let mut r = Recognizer::new(d.app, SharedConfig::default());
    let delegated = record(&mut r, "tap", Some(".list"));
    r.on("tap", None, |_: &GestureEvent<NodeId>, _: &NodeId| {
        Outcome::Stop
    });
    let after = record(&mut r, "tap", None);

    contact(&mut r, &d.tree, ContactPhase::Start, 10.0, 10.0, 0);
    contact(&mut r, &d.tree, ContactPhase::End, 10.0, 10.0, 20);

    assert_eq!(delegated.borrow().len(), 1);
    assert_eq!(delegated.borrow()[0].level, d.list);
    assert!(after.borrow().is_empty());
}

#[test]
fn off_without_selector_removes_delegated_bindings() {
    let d = doc();
    let mut r = Recognizer::new(d.app, SharedConfig::default());
    let direct = record(&mut r, "tap", None);
    let delegated = record(&mut r, "tap", Some(".item"));
    let kept = record(&mut r, "tap", Some(".row"));

    r.off("tap", Some(".item"));
    contact(&mut r, &d.tree, ContactPhase::Start, 10.0, 10.0, 0);
    contact(&mut r, &d.tree, ContactPhase::End, 10.0, 10.0, 20);
    assert_eq!(direct.borrow().len(), 1);
    assert!(delegated.borrow().is_empty());
    assert_eq!(kept.borrow().len(), 1);

    r.off("tap", None);
    contact(&mut r, &d.tree, ContactPhase::Start, 10.0, 10.0, 100);
    contact(&mut r, &d.tree, ContactPhase::End, 10.0, 10.0, 120);
    assert_eq!(direct.borrow().len(), 1);
    assert_eq!(kept.borrow().len(), 1);
}

#[test]
fn config_is_shared_between_recognizers() {
    let d = doc();
    let config = SharedConfig::default();
    let attached = attach(&d.tree, "div", &config);
    assert!(matches!(attached, Attached::Many(ref v) if v.len() == 2));

    let mut recognizers = attached.into_vec();
    let logs: Vec<Log> = recognizers
        .iter_mut()
        .map(|r| record(r, "longtap", None))
        .collect();

    config.configure([("longTapDelay", 300.0)]);
    for r in &mut recognizers {
        contact(r, &d.tree, ContactPhase::Start, 10.0, 10.0, 0);
        assert_eq!(r.next_deadline(), Some(300));
        r.poll(&d.tree, 300);
    }
    assert!(logs.iter().all(|l| kinds(l) == vec![GestureKind::LongTap]));
}

#[test]
fn raw_samples_route_to_enclosing_recognizers() {
    let d = doc();
    let config = SharedConfig::default();
    let Attached::One(mut outer) = attach(&d.tree, "#app", &config) else {
        panic!("#app resolves to one element");
    };
    let Attached::One(mut inner) = attach(&d.tree, "li", &config) else {
        panic!("li resolves to one element");
    };
    assert!(matches!(attach(&d.tree, "table", &config), Attached::Empty));

    let outer_log = record(&mut outer, "tap", None);
    let inner_log = record(&mut inner, "tap", None);

    let cap = InputCapability::detect(true);
    let pos = Point::new(5.0, 5.0);
    let target = contact_target(&d.tree, pos).expect("page hit");
    for (name, t) in [("touchstart", 0), ("touchend", 30)] {
        let phase = cap.phase_for(name).expect("touch names");
        for r in [&mut outer, &mut inner] {
            if routes_to(&d.tree, r, target) {
                r.handle(&d.tree, &mut RawEvent::new(phase, target, pos, t));
            }
        }
    }

    assert_eq!(outer_log.borrow()[0].level, d.app);
    assert_eq!(inner_log.borrow()[0].level, d.item);
}

#[test]
fn target_in_another_tree_reaches_direct_handlers_only() {
    let mut d = doc();
    let aside = d.tree.insert(
        None,
        Element::new("section").with_bounds(Rect::new(300.0, 0.0, 400.0, 100.0)),
    );
    let mut r = Recognizer::new(d.app, SharedConfig::default());
    let direct = record(&mut r, "tap", None);
    let delegated = record(&mut r, "tap", Some(".item"));
    let at_top = record(&mut r, "tap", Some("section"));

    let mut raw = RawEvent::new(ContactPhase::End, aside, Point::new(310.0, 10.0), 0);
    assert_eq!(r.trigger(&d.tree, GestureKind::Tap, &mut raw), Outcome::Continue);

    assert_eq!(direct.borrow().len(), 1);
    assert_eq!(direct.borrow()[0].level, aside);
    assert!(delegated.borrow().is_empty());
    assert_eq!(at_top.borrow().len(), 1, "visited levels are still partitioned");
}

#[test]
fn class_change_moves_delegation() {
    let mut d = doc();
    let mut r = Recognizer::new(d.app, SharedConfig::default());
    let log = record(&mut r, "tap", Some(".selected"));

    contact(&mut r, &d.tree, ContactPhase::Start, 10.0, 10.0, 0);
    contact(&mut r, &d.tree, ContactPhase::End, 10.0, 10.0, 20);
    assert!(log.borrow().is_empty());

    d.tree.set_class(d.item, "item selected");
    contact(&mut r, &d.tree, ContactPhase::Start, 10.0, 10.0, 100);
    contact(&mut r, &d.tree, ContactPhase::End, 10.0, 10.0, 120);
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(log.borrow()[0].level, d.item);
}
