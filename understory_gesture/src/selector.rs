// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-token delegation selectors.
//!
//! A selector is parsed once, when a handler is registered, into one of three forms:
//!
//! - `.name` matches elements whose class attribute contains the token `name`.
//! - `#name` matches the element whose id is `name`.
//! - anything else matches elements by tag name, ignoring ASCII case.
//!
//! There are no combinators, compound selectors, or attribute selectors.
//!
//! ```
//! use understory_gesture::selector::{Selector, SelectorError};
//!
//! let sel: Selector = ".item".parse().unwrap();
//! assert_eq!(sel, Selector::Class("item".into()));
//! assert_eq!(sel.to_string(), ".item");
//! assert_eq!(Selector::parse("ul li"), Err(SelectorError::Compound));
//! ```

use alloc::string::{String, ToString};

use crate::types::ElementLookup;

/// A parsed delegation selector.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Selector {
    /// `.name`: class token membership.
    Class(String),
    /// `#name`: identifier equality.
    Id(String),
    /// `name`: tag name equality, ASCII case-insensitive.
    Tag(String),
}

/// Why a selector string was rejected.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SelectorError {
    /// The selector string was empty.
    #[error("empty selector")]
    Empty,
    /// A `.` or `#` prefix was not followed by a name.
    #[error("selector prefix `{0}` has no name")]
    MissingName(char),
    /// The selector contained whitespace, i.e. a combinator.
    #[error("compound selectors are not supported")]
    Compound,
}

impl Selector {
    /// Parse a single-token selector.
    pub fn parse(s: &str) -> Result<Self, SelectorError> {
        if s.is_empty() {
            return Err(SelectorError::Empty);
        }
        if s.chars().any(char::is_whitespace) {
            return Err(SelectorError::Compound);
        }
        let named = |prefix: char, ctor: fn(String) -> Self| {
            let name = &s[1..];
            if name.is_empty() {
                Err(SelectorError::MissingName(prefix))
            } else {
                Ok(ctor(name.to_string()))
            }
        };
        match s.as_bytes()[0] {
            b'.' => named('.', Self::Class),
            b'#' => named('#', Self::Id),
            _ => Ok(Self::Tag(s.to_string())),
        }
    }

    /// Decide whether `node` belongs to this selector.
    pub fn matches<K, T>(&self, tree: &T, node: &K) -> bool
    where
        T: ElementLookup<K> + ?Sized,
    {
        match self {
            Self::Class(token) => tree
                .class_name(node)
                .is_some_and(|class| class.split_ascii_whitespace().any(|c| c == token)),
            Self::Id(id) => tree.id_of(node) == Some(id.as_str()),
            Self::Tag(tag) => tree
                .tag_name(node)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag)),
        }
    }
}

impl core::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::fmt::Display for Selector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(name) => write!(f, "#{name}"),
            Self::Tag(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node {
        tag: &'static str,
        id: Option<&'static str>,
        class: Option<&'static str>,
    }

    struct Doc;

    impl ElementLookup<Node> for Doc {
        fn tag_name(&self, node: &Node) -> Option<&str> {
            Some(node.tag)
        }
        fn id_of(&self, node: &Node) -> Option<&str> {
            node.id
        }
        fn class_name(&self, node: &Node) -> Option<&str> {
            node.class
        }
    }

    const LI: Node = Node {
        tag: "LI",
        id: Some("first"),
        class: Some("item\tactive  big"),
    };

    #[test]
    fn parse_forms() {
        assert_eq!(Selector::parse(".item"), Ok(Selector::Class("item".into())));
        assert_eq!(Selector::parse("#first"), Ok(Selector::Id("first".into())));
        assert_eq!(Selector::parse("li"), Ok(Selector::Tag("li".into())));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("."), Err(SelectorError::MissingName('.')));
        assert_eq!(Selector::parse("#"), Err(SelectorError::MissingName('#')));
        assert_eq!(Selector::parse(".a .b"), Err(SelectorError::Compound));
    }

    #[test]
    fn display_reproduces_source() {
        for s in [".item", "#first", "LI"] {
            assert_eq!(Selector::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn class_is_a_token_match() {
        assert!(Selector::parse(".item").unwrap().matches(&Doc, &LI));
        assert!(Selector::parse(".active").unwrap().matches(&Doc, &LI));
        assert!(Selector::parse(".big").unwrap().matches(&Doc, &LI));
        assert!(!Selector::parse(".ite").unwrap().matches(&Doc, &LI));
        assert!(Selector::parse(".item\tactive").is_err());
    }

    #[test]
    fn class_absent_never_matches() {
        let bare = Node {
            tag: "div",
            id: None,
            class: None,
        };
        assert!(!Selector::parse(".item").unwrap().matches(&Doc, &bare));
        assert!(!Selector::parse("#first").unwrap().matches(&Doc, &bare));
    }

    #[test]
    fn id_is_exact() {
        assert!(Selector::parse("#first").unwrap().matches(&Doc, &LI));
        assert!(!Selector::parse("#First").unwrap().matches(&Doc, &LI));
    }

    #[test]
    fn tag_ignores_case() {
        assert!(Selector::parse("li").unwrap().matches(&Doc, &LI));
        assert!(Selector::parse("Li").unwrap().matches(&Doc, &LI));
        assert!(!Selector::parse("ul").unwrap().matches(&Doc, &LI));
    }
}
