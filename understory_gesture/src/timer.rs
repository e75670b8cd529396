// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cancellable delayed actions driven by host timestamps.

/// A scheduled action that has not fired or been cleared yet.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Pending<P> {
    pub(crate) deadline_ms: u64,
    /// Session that armed the action; checked for liveness when it fires.
    pub(crate) session: u64,
    pub(crate) payload: P,
}

/// Holds at most one pending action. Arming again replaces it.
#[derive(Clone, Debug)]
pub(crate) struct TimerSlot<P> {
    pending: Option<Pending<P>>,
}

impl<P> Default for TimerSlot<P> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<P> TimerSlot<P> {
    pub(crate) fn arm(&mut self, now_ms: u64, delay_ms: u64, session: u64, payload: P) {
        self.pending = Some(Pending {
            deadline_ms: now_ms.saturating_add(delay_ms),
            session,
            payload,
        });
    }

    pub(crate) fn clear(&mut self) {
        self.pending = None;
    }

    pub(crate) fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.deadline_ms)
    }

    /// Remove and return the action if it is due at `now_ms`.
    ///
    /// With `inclusive`, a deadline equal to `now_ms` counts as due.
    pub(crate) fn take_due(&mut self, now_ms: u64, inclusive: bool) -> Option<Pending<P>> {
        let due = self.deadline().is_some_and(|d| {
            if inclusive { d <= now_ms } else { d < now_ms }
        });
        if due { self.pending.take() } else { None }
    }
}
