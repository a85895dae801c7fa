//! # Markup model
//!
//! A block's text parses into a [`Content`]: an ordered run of [`MarkupNode`]s
//! where adjacent plain text is always merged. Structured kinds live in
//! [`kinds`], each owning its delimiters and its HTML template.

use std::fmt;
use std::str::FromStr;

use crate::error::MarkupError;
use crate::parsing;
use crate::render::{RenderContext, emphasis};

pub mod kinds;
mod node;
mod source;

pub use node::{Markup, MarkupNode, NodeKind};
pub use source::SourceText;

use kinds::PageReference;

/// Ordered sequence of nodes parsed from one piece of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Content {
    nodes: Vec<MarkupNode>,
}

impl Content {
    /// Wraps `nodes`, merging adjacent plain text and dropping empty text.
    pub fn new(nodes: Vec<MarkupNode>) -> Self {
        let mut merged: Vec<MarkupNode> = Vec::with_capacity(nodes.len());
        for node in nodes {
            match (merged.last_mut(), node) {
                (_, MarkupNode::PlainText(t)) if t.is_empty() => {}
                (Some(MarkupNode::PlainText(prev)), MarkupNode::PlainText(t)) => prev.push_str(&t),
                (_, node) => merged.push(node),
            }
        }
        Self { nodes: merged }
    }

    /// Runs the full pipeline over `text`.
    pub fn parse(text: &str) -> Self {
        parsing::parse(text)
    }

    /// Parses `s` as exactly one node of kind `T`, e.g. `Content::parse_as::<Cloze>("{c1:x}")`.
    pub fn parse_as<T>(s: &str) -> Result<T, MarkupError>
    where
        T: FromStr<Err = MarkupError>,
    {
        s.parse()
    }

    /// A single plain-text node, unparsed.
    pub fn text(s: impl Into<String>) -> Self {
        Self::new(vec![MarkupNode::text(s)])
    }

    pub fn nodes(&self) -> &[MarkupNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<MarkupNode> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<&MarkupNode> {
        self.nodes.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MarkupNode> {
        self.nodes.iter()
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<MarkupNode> {
        &mut self.nodes
    }

    pub fn to_source_text(&self) -> String {
        self.nodes.iter().map(MarkupNode::to_source_text).collect()
    }

    /// Concatenated node HTML with the emphasis pass applied once over the result.
    pub fn to_html(&self, ctx: &RenderContext<'_>) -> String {
        let html: String = self.nodes.iter().map(|n| n.to_html(ctx)).collect();
        emphasis::apply(&html)
    }

    /// Tags of every node, in order of first appearance.
    pub fn tags(&self) -> Vec<String> {
        let mut tags = Vec::new();
        for tag in self.nodes.iter().flat_map(MarkupNode::tags) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }

    /// Top-level nodes, plus every nested node when `recursive`.
    pub fn child_nodes(&self, recursive: bool) -> Vec<&MarkupNode> {
        let mut out = Vec::new();
        for node in &self.nodes {
            out.push(node);
            if recursive {
                for inner in node.child_contents() {
                    out.extend(inner.child_nodes(true));
                }
            }
        }
        out
    }

    pub fn contains_kind(&self, kind: NodeKind, recursive: bool) -> bool {
        self.child_nodes(recursive).iter().any(|n| n.kind() == kind)
    }

    /// The page reference when it is the only node.
    pub fn single_page_ref(&self) -> Option<&PageReference> {
        match self.nodes.as_slice() {
            [MarkupNode::PageReference(page)] => Some(page),
            _ => None,
        }
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source_text())
    }
}

impl FromIterator<MarkupNode> for Content {
    fn from_iter<I: IntoIterator<Item = MarkupNode>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Content {
    type Item = &'a MarkupNode;
    type IntoIter = std::slice::Iter<'a, MarkupNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
