//! # Parsing pipeline
//!
//! Text becomes a [`Content`] by running one pass per [`NodeKind`] in
//! [`PARSE_ORDER`]. Each pass only scans the plain-text nodes left by earlier
//! passes and carves its own matches out of them, so an earlier kind always
//! shadows a later one: `[[a]]` inside backticks stays code.
//!
//! Cloze is the one pass that does not work span by span; see [`cloze`].

use crate::markup::kinds::*;
use crate::markup::{Content, MarkupNode, NodeKind};

pub mod cloze;
pub mod cursor;

/// Recognition order for the full pipeline.
pub const PARSE_ORDER: [NodeKind; 15] = [
    NodeKind::BlockQuote,
    NodeKind::CodeBlock,
    NodeKind::CodeInline,
    NodeKind::Cloze,
    NodeKind::Image,
    NodeKind::Alias,
    NodeKind::Checkbox,
    NodeKind::Embed,
    NodeKind::View,
    NodeKind::Button,
    NodeKind::PageTag,
    NodeKind::PageReference,
    NodeKind::BlockReference,
    NodeKind::Attribute,
    NodeKind::Url,
];

/// A match inside one plain-text span.
pub(crate) struct Found {
    pub start: usize,
    pub end: usize,
    pub node: MarkupNode,
}

impl Found {
    pub fn new(start: usize, end: usize, node: impl Into<MarkupNode>) -> Self {
        Self {
            start,
            end,
            node: node.into(),
        }
    }
}

/// Full pipeline.
pub fn parse(text: &str) -> Content {
    parse_with(text, &PARSE_ORDER)
}

/// Only the given kinds, in the given order.
pub fn parse_with(text: &str, kinds: &[NodeKind]) -> Content {
    run(Content::text(text), kinds)
}

/// Applies `kinds` to an already partly parsed sequence.
pub fn run(content: Content, kinds: &[NodeKind]) -> Content {
    kinds.iter().fold(content, |content, kind| match kind {
        NodeKind::Cloze => cloze::carve(content),
        _ => carve(content, *kind),
    })
}

/// Every kind after `kind` in [`PARSE_ORDER`].
pub fn kinds_after(kind: NodeKind) -> &'static [NodeKind] {
    match PARSE_ORDER.iter().position(|k| *k == kind) {
        Some(i) => &PARSE_ORDER[i + 1..],
        None => &[],
    }
}

fn carve(content: Content, kind: NodeKind) -> Content {
    let mut out = Vec::with_capacity(content.len());
    for (idx, node) in content.into_nodes().into_iter().enumerate() {
        let MarkupNode::PlainText(text) = node else {
            out.push(node);
            continue;
        };
        let mut last = 0;
        for found in find(kind, &text, idx == 0) {
            out.push(MarkupNode::text(&text[last..found.start]));
            out.push(found.node);
            last = found.end;
        }
        out.push(MarkupNode::text(&text[last..]));
    }
    Content::new(out)
}

/// Non-overlapping matches of `kind` in `text`, left to right.
///
/// `at_start` is true when `text` opens the sequence; only then can a
/// block quote or attribute match.
fn find(kind: NodeKind, text: &str, at_start: bool) -> Vec<Found> {
    match kind {
        NodeKind::BlockQuote if at_start => BlockQuote::find(text).into_iter().collect(),
        NodeKind::Attribute if at_start => Attribute::find(text).into_iter().collect(),
        NodeKind::BlockQuote | NodeKind::Attribute => Vec::new(),
        NodeKind::CodeBlock => CodeBlock::find(text),
        NodeKind::CodeInline => CodeInline::find(text),
        NodeKind::Image => Image::find(text),
        NodeKind::Alias => Alias::find(text),
        NodeKind::Checkbox => Checkbox::find(text),
        NodeKind::Embed => Embed::find(text),
        NodeKind::View => View::find(text),
        NodeKind::Button => Button::find(text),
        NodeKind::PageTag => PageTag::find(text),
        NodeKind::PageReference => PageReference::find(text),
        NodeKind::BlockReference => BlockReference::find(text),
        NodeKind::Url => Url::find(text),
        NodeKind::PlainText | NodeKind::Cloze => Vec::new(),
    }
}

#[cfg(test)]
mod tests;
