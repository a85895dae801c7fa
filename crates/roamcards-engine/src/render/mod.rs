//! # Rendering
//!
//! Every node kind renders itself from its fields through a fixed template
//! (see [`crate::markup::kinds`]). This module holds what those templates share:
//! the options, the lookup used to resolve block references, escaping, and the
//! emphasis pass applied over a sequence's concatenated HTML.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OptionValueError;
use crate::markup::Content;

pub mod emphasis;
pub mod escape;

/// Nesting limit for resolving block references inside block references.
pub const MAX_REF_DEPTH: usize = 8;

/// Where the cloze markers go when a cloze wraps nothing but a page reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagerefCloze {
    /// `{{c1::[[page]]}}`
    #[default]
    Outside,
    /// `[[{{c1::page}}]]`
    Inside,
    /// `[[namespace/{{c1::base}}]]`
    BaseOnly,
}

impl FromStr for PagerefCloze {
    type Err = OptionValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "outside" => Ok(Self::Outside),
            "inside" => Ok(Self::Inside),
            "base_only" | "base-only" => Ok(Self::BaseOnly),
            other => Err(OptionValueError {
                option: "pageref-cloze",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PagerefCloze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Outside => "outside",
            Self::Inside => "inside",
            Self::BaseOnly => "base_only",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit Anki cloze markers (`{{cN::...}}`). Off renders the cloze brackets as text.
    pub proc_cloze: bool,
    pub pageref_cloze: PagerefCloze,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            proc_cloze: true,
            pageref_cloze: PagerefCloze::Outside,
        }
    }
}

impl RenderOptions {
    /// Cloze brackets kept as plain text, for the faces of basic cards.
    pub fn inert() -> Self {
        Self {
            proc_cloze: false,
            ..Self::default()
        }
    }
}

/// Resolves block uids to their content during rendering.
pub trait BlockLookup {
    fn block_content(&self, uid: &str) -> Option<&Content>;

    /// Uids of the block's direct children, in order.
    fn block_children(&self, uid: &str) -> Vec<&str>;
}

/// Options plus the optional lookup, threaded through every `to_html` call.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub options: RenderOptions,
    lookup: Option<&'a dyn BlockLookup>,
    depth: usize,
}

impl Default for RenderContext<'_> {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl<'a> RenderContext<'a> {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            lookup: None,
            depth: 0,
        }
    }

    pub fn with_lookup(mut self, lookup: &'a dyn BlockLookup) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Context for rendering content pulled in through a block reference.
    pub fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }

    /// Content for `uid`, or `None` without a lookup, for unknown uids, or
    /// once the reference chain is [`MAX_REF_DEPTH`] deep.
    pub fn resolve(&self, uid: &str) -> Option<&'a Content> {
        if self.depth >= MAX_REF_DEPTH {
            log::debug!("block reference (({uid})) nested too deep, not expanding");
            return None;
        }
        self.lookup?.block_content(uid)
    }

    pub fn children_of(&self, uid: &str) -> Vec<&'a str> {
        self.lookup
            .map(|lookup| lookup.block_children(uid))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fixed(HashMap<String, Content>);

    impl BlockLookup for Fixed {
        fn block_content(&self, uid: &str) -> Option<&Content> {
            self.0.get(uid)
        }

        fn block_children(&self, _uid: &str) -> Vec<&str> {
            Vec::new()
        }
    }

    #[test]
    fn pageref_cloze_parses_known_values() {
        assert_eq!("inside".parse::<PagerefCloze>(), Ok(PagerefCloze::Inside));
        assert_eq!("base_only".parse::<PagerefCloze>(), Ok(PagerefCloze::BaseOnly));
        let err = "sideways".parse::<PagerefCloze>().unwrap_err();
        assert_eq!(err.to_string(), "invalid value 'sideways' for option 'pageref-cloze'");
    }

    #[test]
    fn resolve_stops_at_depth_limit() {
        let lookup = Fixed(HashMap::from([("uid".to_string(), Content::text("x"))]));
        let mut ctx = RenderContext::default().with_lookup(&lookup);
        assert!(ctx.resolve("uid").is_some());
        for _ in 0..MAX_REF_DEPTH {
            ctx = ctx.nested();
        }
        assert!(ctx.resolve("uid").is_none());
    }

    #[test]
    fn resolve_without_lookup_is_none() {
        assert!(RenderContext::default().resolve("uid").is_none());
    }
}
