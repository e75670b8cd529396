// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input primitives and the host event names they bind to.
//!
//! Whether the host exposes touch or only pointer/mouse input changes which native event names
//! a binding layer listens for. It never changes how contacts are recognized.
//!
//! ```
//! use understory_gesture::input::{ContactPhase, InputCapability};
//!
//! let cap = InputCapability::detect(false);
//! assert_eq!(cap.raw_names().start, "mousedown");
//! assert_eq!(cap.phase_for("mouseup"), Some(ContactPhase::End));
//! assert_eq!(cap.phase_for("touchend"), None);
//! ```

/// One of the four raw primitives a contact session is built from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ContactPhase {
    /// A contact went down.
    Start,
    /// A contact moved.
    Move,
    /// A contact was released.
    End,
    /// The host aborted the contact.
    Cancel,
}

/// What kind of raw input the host exposes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InputCapability {
    /// Native touch events are available.
    Touch,
    /// Only pointer/mouse events are available; touch is emulated with them.
    Pointer,
}

/// Native event names for the four raw primitives.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RawEventNames {
    /// Contact start.
    pub start: &'static str,
    /// Contact move.
    pub move_: &'static str,
    /// Contact end.
    pub end: &'static str,
    /// Contact cancel.
    pub cancel: &'static str,
}

impl InputCapability {
    /// Pick a capability from the host's touch probe.
    pub fn detect(has_touch: bool) -> Self {
        if has_touch { Self::Touch } else { Self::Pointer }
    }

    /// Native event names to bind for this capability.
    ///
    /// Cancel is always `touchcancel`; pointer-only hosts simply never deliver it.
    pub const fn raw_names(self) -> RawEventNames {
        match self {
            Self::Touch => RawEventNames {
                start: "touchstart",
                move_: "touchmove",
                end: "touchend",
                cancel: "touchcancel",
            },
            Self::Pointer => RawEventNames {
                start: "mousedown",
                move_: "mousemove",
                end: "mouseup",
                cancel: "touchcancel",
            },
        }
    }

    /// Map a native event name back to its phase.
    pub fn phase_for(self, name: &str) -> Option<ContactPhase> {
        let names = self.raw_names();
        [
            (names.start, ContactPhase::Start),
            (names.move_, ContactPhase::Move),
            (names.end, ContactPhase::End),
            (names.cancel, ContactPhase::Cancel),
        ]
        .into_iter()
        .find_map(|(n, phase)| (n == name).then_some(phase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_names() {
        let cap = InputCapability::detect(true);
        assert_eq!(cap, InputCapability::Touch);
        assert_eq!(cap.phase_for("touchstart"), Some(ContactPhase::Start));
        assert_eq!(cap.phase_for("touchmove"), Some(ContactPhase::Move));
        assert_eq!(cap.phase_for("touchend"), Some(ContactPhase::End));
        assert_eq!(cap.phase_for("touchcancel"), Some(ContactPhase::Cancel));
        assert_eq!(cap.phase_for("mousedown"), None);
    }

    #[test]
    fn pointer_keeps_touchcancel() {
        let cap = InputCapability::detect(false);
        assert_eq!(cap.phase_for("mousemove"), Some(ContactPhase::Move));
        assert_eq!(cap.phase_for("touchcancel"), Some(ContactPhase::Cancel));
    }
}
