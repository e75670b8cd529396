// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: gesture kinds, outcomes, raw and synthesized events, and host lookups.
//!
//! ## Overview
//!
//! These types describe what flows into the [recognizer](crate::recognizer) (a [`RawEvent`])
//! and what handlers receive once a gesture has been recognized (a [`GestureEvent`]).
//! The lookup traits are the narrow seams through which the crate reads the host's element tree.

use alloc::vec::Vec;
use kurbo::{Point, Vec2};

use crate::input::ContactPhase;
use crate::selector::Selector;

/// A synthesized gesture type.
///
/// The wire names (see [`GestureKind::name`]) are the exact strings accepted by
/// [`Recognizer::on`](crate::recognizer::Recognizer::on) and
/// [`Recognizer::off`](crate::recognizer::Recognizer::off).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum GestureKind {
    /// A single short contact released near its start point.
    Tap,
    /// Two taps released within the double-tap window.
    DoubleTap,
    /// A contact held still for the long-tap delay.
    LongTap,
    /// A contact started.
    SwipeStart,
    /// A contact moved.
    Swiping,
    /// A contact was released.
    SwipeEnd,
    /// A fast horizontal movement towards negative x.
    SwipeLeft,
    /// A fast horizontal movement towards positive x.
    SwipeRight,
    /// A fast vertical movement towards negative y.
    SwipeUp,
    /// A fast vertical movement towards positive y.
    SwipeDown,
}

impl GestureKind {
    /// Number of gesture kinds.
    pub const COUNT: usize = 10;

    /// Every gesture kind, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Tap,
        Self::DoubleTap,
        Self::LongTap,
        Self::SwipeStart,
        Self::Swiping,
        Self::SwipeEnd,
        Self::SwipeLeft,
        Self::SwipeRight,
        Self::SwipeUp,
        Self::SwipeDown,
    ];

    /// The event type name handlers register with.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tap => "tap",
            Self::DoubleTap => "doubletap",
            Self::LongTap => "longtap",
            Self::SwipeStart => "swipestart",
            Self::Swiping => "swiping",
            Self::SwipeEnd => "swipeend",
            Self::SwipeLeft => "swipeleft",
            Self::SwipeRight => "swiperight",
            Self::SwipeUp => "swipeup",
            Self::SwipeDown => "swipedown",
        }
    }

    /// Look up a kind by its exact event type name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Returns `true` for the `swipe*` family (and `swiping`), which may carry [`SwipeFields`].
    pub const fn is_swipe_family(self) -> bool {
        !matches!(self, Self::Tap | Self::DoubleTap | Self::LongTap)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl core::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of a recognized swipe.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SwipeDirection {
    /// Towards negative x.
    Left,
    /// Towards positive x.
    Right,
    /// Towards negative y.
    Up,
    /// Towards positive y.
    Down,
}

impl SwipeDirection {
    /// Classify a displacement from the contact's start point.
    ///
    /// The horizontal axis wins when both axes moved the same distance.
    pub fn from_displacement(d: Vec2) -> Self {
        if d.x.abs() >= d.y.abs() {
            if d.x < 0.0 { Self::Left } else { Self::Right }
        } else if d.y < 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }

    /// The gesture emitted for this direction.
    pub const fn kind(self) -> GestureKind {
        match self {
            Self::Left => GestureKind::SwipeLeft,
            Self::Right => GestureKind::SwipeRight,
            Self::Up => GestureKind::SwipeUp,
            Self::Down => GestureKind::SwipeDown,
        }
    }
}

/// Handler outcome controlling propagation.
///
/// Returned by every gesture handler; see [`dispatch`](crate::dispatch) for how a stop
/// is honored at delegated and root levels.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Outcome {
    /// Keep invoking handlers.
    #[default]
    Continue,
    /// Halt propagation, prevent the default action, and stop native propagation of the raw event.
    Stop,
}

bitflags::bitflags! {
    /// Flags a dispatch leaves on the underlying [`RawEvent`].
    ///
    /// Hosts read these after handing a raw event to a recognizer to decide whether to run the
    /// default action and whether to keep delivering the raw event to outer recognizers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventFlags: u8 {
        /// A handler asked to suppress the default action.
        const DEFAULT_PREVENTED   = 0b0000_0001;
        /// A handler asked to stop native propagation.
        const PROPAGATION_STOPPED = 0b0000_0010;
    }
}

/// A raw contact sample as delivered by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct RawEvent<K> {
    /// Which raw primitive produced this sample.
    pub phase: ContactPhase,
    /// The concrete element the host delivered the sample to.
    pub target: K,
    /// Page position of the contact.
    pub position: Point,
    /// Host timestamp in milliseconds.
    pub time_ms: u64,
    /// Start position of the current contact, recorded by the recognizer on moves.
    pub start: Option<Point>,
    /// Flags set by handlers during dispatch.
    pub flags: EventFlags,
}

impl<K> RawEvent<K> {
    /// Create a raw event with no recorded start position and no flags.
    pub fn new(phase: ContactPhase, target: K, position: Point, time_ms: u64) -> Self {
        Self {
            phase,
            target,
            position,
            time_ms,
            start: None,
            flags: EventFlags::empty(),
        }
    }

    /// Returns `true` once a handler has stopped propagation of this event.
    pub fn propagation_stopped(&self) -> bool {
        self.flags.contains(EventFlags::PROPAGATION_STOPPED)
    }

    /// Returns `true` once a handler has prevented the default action of this event.
    pub fn default_prevented(&self) -> bool {
        self.flags.contains(EventFlags::DEFAULT_PREVENTED)
    }
}

/// Start position and movement carried by `swipe*` events.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SwipeFields {
    /// Where the contact started.
    pub start: Point,
    /// `page - start`.
    pub movement: Vec2,
}

/// The payload delivered to handlers.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureEvent<K> {
    /// The gesture type.
    pub kind: GestureKind,
    /// The original concrete target, not the delegation level the handler matched at.
    pub target: K,
    /// Page position of the sample that produced the gesture.
    pub page: Point,
    /// Present only for the swipe family and only when a start position was recorded.
    pub swipe: Option<SwipeFields>,
}

impl<K: Copy> GestureEvent<K> {
    /// Build the payload for `kind` from a raw sample.
    pub fn from_raw(kind: GestureKind, raw: &RawEvent<K>) -> Self {
        let swipe = raw
            .start
            .filter(|_| kind.is_swipe_family())
            .map(|start| SwipeFields {
                start,
                movement: raw.position - start,
            });
        Self {
            kind,
            target: raw.target,
            page: raw.position,
            swipe,
        }
    }
}

impl<K> GestureEvent<K> {
    /// Page x coordinate.
    pub fn page_x(&self) -> f64 {
        self.page.x
    }

    /// Page y coordinate.
    pub fn page_y(&self) -> f64 {
        self.page.y
    }

    /// Start x coordinate, for swipe events with a known start.
    pub fn start_x(&self) -> Option<f64> {
        self.swipe.map(|s| s.start.x)
    }

    /// Start y coordinate, for swipe events with a known start.
    pub fn start_y(&self) -> Option<f64> {
        self.swipe.map(|s| s.start.y)
    }

    /// Horizontal movement since the start, for swipe events with a known start.
    pub fn move_x(&self) -> Option<f64> {
        self.swipe.map(|s| s.movement.x)
    }

    /// Vertical movement since the start, for swipe events with a known start.
    pub fn move_y(&self) -> Option<f64> {
        self.swipe.map(|s| s.movement.y)
    }
}

/// Look up the parent of a node to walk towards the bound root.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// Read the attributes selectors match against.
pub trait ElementLookup<K> {
    /// Tag name as authored; matching is ASCII case-insensitive.
    fn tag_name(&self, node: &K) -> Option<&str>;
    /// Identifier, if any.
    fn id_of(&self, node: &K) -> Option<&str>;
    /// Raw class attribute (whitespace-separated tokens), if any.
    fn class_name(&self, node: &K) -> Option<&str>;
}

/// Resolve a selector to the matching elements, in document order.
pub trait ElementResolver<K> {
    /// Every element matching `selector`.
    fn resolve(&self, selector: &Selector) -> Vec<K>;
}
