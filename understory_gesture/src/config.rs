// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognition tunables and the shared handle recognizers read them through.
//!
//! ## Overview
//!
//! [`GestureConfig`] holds five named thresholds. A [`SharedConfig`] wraps one value so that
//! every recognizer built from it sees the same numbers; updates through
//! [`SharedConfig::configure`] take effect at the next decision any recognizer makes,
//! including decisions inside a contact that is already in progress.
//!
//! ```
//! use understory_gesture::config::SharedConfig;
//!
//! let config = SharedConfig::default();
//! assert_eq!(config.thresholds().long_tap_delay, 700);
//!
//! config.configure([("longTapDelay", 500.0), ("vibrate", 1.0)]);
//! assert_eq!(config.thresholds().long_tap_delay, 500);
//! assert_eq!(config.get("vibrate"), Some(1.0));
//! ```

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::cell::RefCell;

/// Recognition thresholds.
///
/// Distances are in page units, delays and windows in milliseconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct GestureConfig {
    /// How far a contact may drift on either axis and still count as a tap.
    pub tap_max_distance: f64,
    /// Window in which a second tap upgrades the first to a double tap.
    pub double_tap_delay: u64,
    /// How long a still contact must be held to become a long tap.
    pub long_tap_delay: u64,
    /// Distance on either axis a contact must exceed to become a directional swipe.
    pub swipe_min_distance: f64,
    /// How soon after the start a swipe must exceed `swipe_min_distance`.
    pub swipe_time: u64,
    /// Unrecognized keys, kept for forward compatibility. They have no runtime effect.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub extra: BTreeMap<String, f64>,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_max_distance: 10.0,
            double_tap_delay: 200,
            long_tap_delay: 700,
            swipe_min_distance: 20.0,
            swipe_time: 200,
            extra: BTreeMap::new(),
        }
    }
}

/// A copyable view of the five recognized thresholds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Thresholds {
    /// See [`GestureConfig::tap_max_distance`].
    pub tap_max_distance: f64,
    /// See [`GestureConfig::double_tap_delay`].
    pub double_tap_delay: u64,
    /// See [`GestureConfig::long_tap_delay`].
    pub long_tap_delay: u64,
    /// See [`GestureConfig::swipe_min_distance`].
    pub swipe_min_distance: f64,
    /// See [`GestureConfig::swipe_time`].
    pub swipe_time: u64,
}

impl GestureConfig {
    /// Merge named values over the current ones.
    ///
    /// Names are the camelCase keys `tapMaxDistance`, `doubleTapDelay`, `longTapDelay`,
    /// `swipeMinDistance` and `swipeTime`. Delays saturate into `0..=u64::MAX` milliseconds.
    /// Any other name is stored in [`GestureConfig::extra`].
    pub fn merge<I, S>(&mut self, options: I)
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        for (name, value) in options {
            let name = name.as_ref();
            match name {
                "tapMaxDistance" => self.tap_max_distance = value,
                "doubleTapDelay" => self.double_tap_delay = millis(value),
                "longTapDelay" => self.long_tap_delay = millis(value),
                "swipeMinDistance" => self.swipe_min_distance = value,
                "swipeTime" => self.swipe_time = millis(value),
                _ => {
                    self.extra.insert(name.to_string(), value);
                }
            }
        }
    }

    /// Read a value by name, recognized or not.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "tapMaxDistance" => Some(self.tap_max_distance),
            "doubleTapDelay" => Some(self.double_tap_delay as f64),
            "longTapDelay" => Some(self.long_tap_delay as f64),
            "swipeMinDistance" => Some(self.swipe_min_distance),
            "swipeTime" => Some(self.swipe_time as f64),
            _ => self.extra.get(name).copied(),
        }
    }

    /// Copy out the recognized thresholds.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            tap_max_distance: self.tap_max_distance,
            double_tap_delay: self.double_tap_delay,
            long_tap_delay: self.long_tap_delay,
            swipe_min_distance: self.swipe_min_distance,
            swipe_time: self.swipe_time,
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "float to int casts saturate; negative and NaN inputs become 0"
)]
fn millis(value: f64) -> u64 {
    value as u64
}

/// Shared, mutable configuration handle.
///
/// Cloning the handle shares the underlying value. Construct one per process (or per test) and
/// pass it to every recognizer; there is no hidden global.
#[derive(Clone, Debug, Default)]
pub struct SharedConfig(Rc<RefCell<GestureConfig>>);

impl SharedConfig {
    /// Wrap an initial configuration.
    pub fn new(config: GestureConfig) -> Self {
        Self(Rc::new(RefCell::new(config)))
    }

    /// Merge named values into the shared configuration, see [`GestureConfig::merge`].
    pub fn configure<I, S>(&self, options: I)
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        self.0.borrow_mut().merge(options);
        log::debug!("gesture config updated: {:?}", self.0.borrow().thresholds());
    }

    /// Replace the whole configuration.
    pub fn replace(&self, config: GestureConfig) {
        *self.0.borrow_mut() = config;
    }

    /// Current thresholds.
    pub fn thresholds(&self) -> Thresholds {
        self.0.borrow().thresholds()
    }

    /// Read a value by name, see [`GestureConfig::get`].
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.borrow().get(name)
    }

    /// Clone out the full configuration.
    pub fn snapshot(&self) -> GestureConfig {
        self.0.borrow().clone()
    }
}
