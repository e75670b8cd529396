// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element gesture recognition.
//!
//! ## Overview
//!
//! A [`Recognizer`] is bound to one root element. The host feeds it raw contact samples with
//! [`Recognizer::handle`] and advances its delayed actions with [`Recognizer::poll`]. Recognized
//! gestures are delivered through [`dispatch`](crate::dispatch) to the handlers registered with
//! [`Recognizer::on`].
//!
//! ## Session lifecycle
//!
//! - Start: emits `swipestart` and arms the long-press action.
//! - Move: emits `swiping`. Drifting past `tapMaxDistance` on either axis cancels both delayed
//!   actions. Exceeding `swipeMinDistance` within `swipeTime` of the start emits one directional
//!   swipe per session.
//! - End: emits `swipeend`. A release within `tapMaxDistance` of the start becomes a tap, a
//!   deferred tap, or a double tap depending on whether `doubletap` has handlers and when the
//!   previous tap candidate was released.
//! - Cancel: drops both delayed actions and ends the session without emitting anything.
//!
//! Moves and ends outside an active session are ignored.
//!
//! ## Time
//!
//! The recognizer never reads a clock. Every [`RawEvent`] carries a millisecond timestamp, and
//! [`Recognizer::poll`] fires the delayed actions that are due at the time it is given. Actions
//! that fell due strictly before a raw sample are fired before that sample is handled.
//!
//! ## Deferred taps across sessions
//!
//! Starting a new contact does not cancel a deferred tap left by the previous one. It still fires
//! at its deadline unless a move past `tapMaxDistance`, a swipe, a long press, or a double tap
//! clears it first. When it fires it only emits `tap`; the newer session is left untouched.

use alloc::vec::Vec;
use kurbo::Point;

use crate::config::SharedConfig;
use crate::dispatch::dispatch;
use crate::input::ContactPhase;
use crate::registry::SharedRegistry;
use crate::selector::Selector;
use crate::timer::TimerSlot;
use crate::types::{
    ElementLookup, ElementResolver, EventFlags, GestureEvent, GestureKind, Outcome, ParentLookup,
    RawEvent, SwipeDirection,
};

/// Where a delayed gesture is reported.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Origin<K> {
    target: K,
    position: Point,
}

/// Bookkeeping for the current (or most recent) contact.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureSession {
    id: u64,
    start: Point,
    last: Point,
    start_ms: u64,
    swipe_fired: bool,
    active: bool,
}

impl GestureSession {
    const IDLE: Self = Self {
        id: 0,
        start: Point::ZERO,
        last: Point::ZERO,
        start_ms: 0,
        swipe_fired: false,
        active: false,
    };

    /// Where the contact went down.
    pub fn start(&self) -> Point {
        self.start
    }

    /// The most recent move position, or the origin before any move.
    pub fn last(&self) -> Point {
        self.last
    }

    /// Timestamp of the start sample.
    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    /// Whether a directional swipe was emitted for this contact.
    pub fn swipe_fired(&self) -> bool {
        self.swipe_fired
    }

    /// Whether the contact is still live.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Gesture state machine bound to one element.
pub struct Recognizer<K> {
    element: K,
    config: SharedConfig,
    registry: SharedRegistry<K>,
    session: GestureSession,
    next_session: u64,
    last_tap_ms: Option<u64>,
    long_press: TimerSlot<Origin<K>>,
    deferred_tap: TimerSlot<Origin<K>>,
}

impl<K: core::fmt::Debug> core::fmt::Debug for Recognizer<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Recognizer")
            .field("element", &self.element)
            .field("registry", &self.registry)
            .field("session", &self.session)
            .field("last_tap_ms", &self.last_tap_ms)
            .field("long_press", &self.long_press.deadline())
            .field("deferred_tap", &self.deferred_tap.deadline())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq> Recognizer<K> {
    /// Bind a recognizer to `element`, reading thresholds through `config`.
    pub fn new(element: K, config: SharedConfig) -> Self {
        Self {
            element,
            config,
            registry: SharedRegistry::new(),
            session: GestureSession::IDLE,
            next_session: 0,
            last_tap_ms: None,
            long_press: TimerSlot::default(),
            deferred_tap: TimerSlot::default(),
        }
    }

    /// The bound root element.
    pub fn element(&self) -> K {
        self.element
    }

    /// The handler registry.
    ///
    /// Handlers that need to bind or unbind while running capture a clone of this handle.
    pub fn registry(&self) -> &SharedRegistry<K> {
        &self.registry
    }

    /// The shared configuration this recognizer reads.
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// The current or most recent contact session.
    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    /// Whether a contact is in progress.
    pub fn is_active(&self) -> bool {
        self.session.active
    }

    /// Earliest pending delayed action, if any.
    ///
    /// Hosts schedule their next [`poll`](Self::poll) for this time.
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.long_press.deadline(), self.deferred_tap.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Register `handler` for each whitespace-separated type name in `types`.
    ///
    /// With a `selector`, the handler is delegated: it runs at the nearest ancestor of the target
    /// (up to and including the bound element) that matches. Without one it runs at the bound
    /// element. Empty type lists, unknown type names and unparsable selectors are ignored.
    pub fn on<F>(&mut self, types: &str, selector: Option<&str>, handler: F) -> &mut Self
    where
        F: Fn(&GestureEvent<K>, &K) -> Outcome + 'static,
    {
        self.registry.on(types, selector, handler);
        self
    }

    /// Remove handlers for the type named `kind`.
    ///
    /// See [`EventRegistry::remove`](crate::registry::EventRegistry::remove) for the selector
    /// semantics. Unknown names are ignored.
    pub fn off(&mut self, kind: &str, selector: Option<&str>) -> &mut Self {
        self.registry.off(kind, selector);
        self
    }

    /// Deliver `kind` built from `raw` to the registered handlers.
    ///
    /// A stop from any handler sets both [`EventFlags`] on `raw`.
    pub fn trigger<T>(&self, tree: &T, kind: GestureKind, raw: &mut RawEvent<K>) -> Outcome
    where
        T: ParentLookup<K> + ElementLookup<K> + ?Sized,
    {
        if !self.registry.has_handlers(kind) {
            return Outcome::Continue;
        }
        log::trace!("emit {kind}");
        let event = GestureEvent::from_raw(kind, raw);
        // Handlers may bind or unbind through a registry clone; walk a copy.
        let handlers = self.registry.snapshot(kind);
        let outcome = dispatch(tree, self.element, &event, &handlers);
        if outcome == Outcome::Stop {
            raw.flags |= EventFlags::DEFAULT_PREVENTED | EventFlags::PROPAGATION_STOPPED;
        }
        outcome
    }

    /// [`trigger`](Self::trigger) by type name; unknown names are ignored.
    pub fn trigger_named<T>(&self, tree: &T, kind: &str, raw: &mut RawEvent<K>) -> Outcome
    where
        T: ParentLookup<K> + ElementLookup<K> + ?Sized,
    {
        match GestureKind::from_name(kind) {
            Some(kind) => self.trigger(tree, kind, raw),
            None => Outcome::Continue,
        }
    }

    /// Feed one raw contact sample.
    pub fn handle<T>(&mut self, tree: &T, raw: &mut RawEvent<K>)
    where
        T: ParentLookup<K> + ElementLookup<K> + ?Sized,
    {
        self.fire_due(tree, raw.time_ms, false);
        match raw.phase {
            ContactPhase::Start => self.on_start(tree, raw),
            ContactPhase::Move => self.on_move(tree, raw),
            ContactPhase::End => self.on_end(tree, raw),
            ContactPhase::Cancel => self.on_cancel(),
        }
    }

    /// Fire every delayed action due at `now_ms`.
    pub fn poll<T>(&mut self, tree: &T, now_ms: u64)
    where
        T: ParentLookup<K> + ElementLookup<K> + ?Sized,
    {
        self.fire_due(tree, now_ms, true);
    }

    fn on_start<T>(&mut self, tree: &T, raw: &mut RawEvent<K>)
    where
        T: ParentLookup<K> + ElementLookup<K> + ?Sized,
    {
        self.next_session += 1;
        self.session = GestureSession {
            id: self.next_session,
            start: raw.position,
            last: Point::ZERO,
            start_ms: raw.time_ms,
            swipe_fired: false,
            active: true,
        };
        self.trigger(tree, GestureKind::SwipeStart, raw);

        let delay = self.config.thresholds().long_tap_delay;
        self.long_press.arm(
            raw.time_ms,
            delay,
            self.session.id,
            Origin {
                target: raw.target,
                position: raw.position,
            },
        );
    }

    fn on_move<T>(&mut self, tree: &T, raw: &mut RawEvent<K>)
    where
        T: ParentLookup<K> + ElementLookup<K> + ?Sized,
    {
        if !self.session.active {
            return;
        }
        raw.start = Some(self.session.start);
        self.trigger(tree, GestureKind::Swiping, raw);

        self.session.last = raw.position;
        let moved = raw.position - self.session.start;
        let (dx, dy) = (moved.x.abs(), moved.y.abs());
        let t = self.config.thresholds();

        if dx > t.tap_max_distance || dy > t.tap_max_distance {
            self.clear_timers();
        }

        let elapsed = raw.time_ms.saturating_sub(self.session.start_ms);
        if !self.session.swipe_fired
            && elapsed <= t.swipe_time
            && (dx > t.swipe_min_distance || dy > t.swipe_min_distance)
        {
            let direction = SwipeDirection::from_displacement(moved);
            self.clear_timers();
            self.session.swipe_fired = true;
            self.trigger(tree, direction.kind(), raw);
        }
    }

    fn on_end<T>(&mut self, tree: &T, raw: &mut RawEvent<K>)
    where
        T: ParentLookup<K> + ElementLookup<K> + ?Sized,
    {
        if !self.session.active {
            return;
        }
        self.long_press.clear();
        self.trigger(tree, GestureKind::SwipeEnd, raw);

        let moved = raw.position - self.session.start;
        let t = self.config.thresholds();
        if moved.x.abs() <= t.tap_max_distance && moved.y.abs() <= t.tap_max_distance {
            let now = raw.time_ms;
            let outside_window = self
                .last_tap_ms
                .is_none_or(|last| now.saturating_sub(last) > t.double_tap_delay);

            if !self.registry.has_handlers(GestureKind::DoubleTap) {
                self.clear_timers();
                self.trigger(tree, GestureKind::Tap, raw);
            } else if outside_window {
                self.deferred_tap.arm(
                    now,
                    t.double_tap_delay,
                    self.session.id,
                    Origin {
                        target: raw.target,
                        position: raw.position,
                    },
                );
            } else {
                self.clear_timers();
                self.trigger(tree, GestureKind::DoubleTap, raw);
            }
            self.last_tap_ms = Some(now);
        }
        self.session.active = false;
    }

    fn on_cancel(&mut self) {
        self.clear_timers();
        self.session.active = false;
    }

    fn clear_timers(&mut self) {
        self.long_press.clear();
        self.deferred_tap.clear();
    }

    fn fire_due<T>(&mut self, tree: &T, now_ms: u64, inclusive: bool)
    where
        T: ParentLookup<K> + ElementLookup<K> + ?Sized,
    {
        loop {
            let long_first = match (self.long_press.deadline(), self.deferred_tap.deadline()) {
                (Some(a), Some(b)) => a <= b,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => return,
            };
            if long_first {
                let Some(p) = self.long_press.take_due(now_ms, inclusive) else {
                    return;
                };
                if !(self.session.active && self.session.id == p.session) {
                    log::trace!("long press for stale session {} dropped", p.session);
                    continue;
                }
                log::trace!("long press fired at {}", p.deadline_ms);
                self.session.active = false;
                self.clear_timers();
                let mut raw = RawEvent::new(
                    ContactPhase::Start,
                    p.payload.target,
                    p.payload.position,
                    p.deadline_ms,
                );
                self.trigger(tree, GestureKind::LongTap, &mut raw);
            } else {
                let Some(p) = self.deferred_tap.take_due(now_ms, inclusive) else {
                    return;
                };
                log::trace!(
                    "deferred tap from session {} fired at {}",
                    p.session,
                    p.deadline_ms
                );
                let mut raw = RawEvent::new(
                    ContactPhase::End,
                    p.payload.target,
                    p.payload.position,
                    p.deadline_ms,
                );
                self.trigger(tree, GestureKind::Tap, &mut raw);
            }
        }
    }
}

/// Recognizers created for the elements a selector resolved to.
#[derive(Debug)]
pub enum Attached<R> {
    /// The selector matched nothing.
    Empty,
    /// Exactly one element matched.
    One(R),
    /// Several elements matched, in document order.
    Many(Vec<R>),
}

impl<R> Attached<R> {
    /// Flatten into a list.
    pub fn into_vec(self) -> Vec<R> {
        match self {
            Self::Empty => Vec::new(),
            Self::One(r) => alloc::vec![r],
            Self::Many(v) => v,
        }
    }

    /// Number of recognizers.
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One(_) => 1,
            Self::Many(v) => v.len(),
        }
    }

    /// Returns `true` if nothing matched.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Create a recognizer for every element `selector` resolves to.
///
/// An unparsable selector resolves to nothing.
pub fn attach<K, R>(resolver: &R, selector: &str, config: &SharedConfig) -> Attached<Recognizer<K>>
where
    K: Copy + Eq,
    R: ElementResolver<K> + ?Sized,
{
    let Ok(selector) = Selector::parse(selector) else {
        log::debug!("attach: invalid selector `{selector}`");
        return Attached::Empty;
    };
    let mut found: Vec<_> = resolver
        .resolve(&selector)
        .into_iter()
        .map(|el| Recognizer::new(el, config.clone()))
        .collect();
    match found.len() {
        0 => Attached::Empty,
        1 => Attached::One(found.remove(0)),
        _ => Attached::Many(found),
    }
}
