// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Enabled via feature flags so the recognizer itself stays independent of any element tree.

#[cfg(feature = "element_tree_adapter")]
pub mod element_tree;
