use std::fmt;

use crate::error::MarkupError;
use crate::markup::Content;
use crate::markup::kinds::*;
use crate::parsing::{self, PARSE_ORDER};
use crate::render::{RenderContext, escape};

/// Closed set of node kinds, in no particular order. See [`PARSE_ORDER`] for
/// the order the pipeline recognizes them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    PlainText,
    BlockQuote,
    CodeBlock,
    CodeInline,
    Cloze,
    Image,
    Alias,
    Checkbox,
    Embed,
    View,
    Button,
    PageTag,
    PageReference,
    BlockReference,
    Attribute,
    Url,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::PlainText => "PlainText",
            NodeKind::BlockQuote => "BlockQuote",
            NodeKind::CodeBlock => "CodeBlock",
            NodeKind::CodeInline => "CodeInline",
            NodeKind::Cloze => "Cloze",
            NodeKind::Image => "Image",
            NodeKind::Alias => "Alias",
            NodeKind::Checkbox => "Checkbox",
            NodeKind::Embed => "Embed",
            NodeKind::View => "View",
            NodeKind::Button => "Button",
            NodeKind::PageTag => "PageTag",
            NodeKind::PageReference => "PageReference",
            NodeKind::BlockReference => "BlockReference",
            NodeKind::Attribute => "Attribute",
            NodeKind::Url => "Url",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Behaviour shared by every structured node kind.
pub trait Markup {
    /// Roam markup for the node: the captured text when parsed, canonical otherwise.
    fn to_source_text(&self) -> String;

    fn to_html(&self, ctx: &RenderContext<'_>) -> String;

    fn tags(&self) -> Vec<String> {
        Vec::new()
    }

    /// Nested sequences held by this node (titles, cloze bodies, quoted text).
    fn child_contents(&self) -> Vec<&Content> {
        Vec::new()
    }
}

/// One element of a parsed block.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    PlainText(String),
    BlockQuote(BlockQuote),
    CodeBlock(CodeBlock),
    CodeInline(CodeInline),
    Cloze(Cloze),
    Image(Image),
    Alias(Alias),
    Checkbox(Checkbox),
    Embed(Embed),
    View(View),
    Button(Button),
    PageTag(PageTag),
    PageReference(PageReference),
    BlockReference(BlockReference),
    Attribute(Attribute),
    Url(Url),
}

/// Runs `$body` with `$n` bound to the structured node, or `$text` for plain text.
macro_rules! on_node {
    ($node:expr, $t:ident => $text:expr, $n:ident => $body:expr) => {
        match $node {
            MarkupNode::PlainText($t) => $text,
            MarkupNode::BlockQuote($n) => $body,
            MarkupNode::CodeBlock($n) => $body,
            MarkupNode::CodeInline($n) => $body,
            MarkupNode::Cloze($n) => $body,
            MarkupNode::Image($n) => $body,
            MarkupNode::Alias($n) => $body,
            MarkupNode::Checkbox($n) => $body,
            MarkupNode::Embed($n) => $body,
            MarkupNode::View($n) => $body,
            MarkupNode::Button($n) => $body,
            MarkupNode::PageTag($n) => $body,
            MarkupNode::PageReference($n) => $body,
            MarkupNode::BlockReference($n) => $body,
            MarkupNode::Attribute($n) => $body,
            MarkupNode::Url($n) => $body,
        }
    };
}

impl MarkupNode {
    pub fn text(s: impl Into<String>) -> Self {
        MarkupNode::PlainText(s.into())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            MarkupNode::PlainText(_) => NodeKind::PlainText,
            MarkupNode::BlockQuote(_) => NodeKind::BlockQuote,
            MarkupNode::CodeBlock(_) => NodeKind::CodeBlock,
            MarkupNode::CodeInline(_) => NodeKind::CodeInline,
            MarkupNode::Cloze(_) => NodeKind::Cloze,
            MarkupNode::Image(_) => NodeKind::Image,
            MarkupNode::Alias(_) => NodeKind::Alias,
            MarkupNode::Checkbox(_) => NodeKind::Checkbox,
            MarkupNode::Embed(_) => NodeKind::Embed,
            MarkupNode::View(_) => NodeKind::View,
            MarkupNode::Button(_) => NodeKind::Button,
            MarkupNode::PageTag(_) => NodeKind::PageTag,
            MarkupNode::PageReference(_) => NodeKind::PageReference,
            MarkupNode::BlockReference(_) => NodeKind::BlockReference,
            MarkupNode::Attribute(_) => NodeKind::Attribute,
            MarkupNode::Url(_) => NodeKind::Url,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MarkupNode::PlainText(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_source_text(&self) -> String {
        on_node!(self, t => t.clone(), n => n.to_source_text())
    }

    pub fn to_html(&self, ctx: &RenderContext<'_>) -> String {
        on_node!(self, t => escape::text(t), n => n.to_html(ctx))
    }

    pub fn tags(&self) -> Vec<String> {
        on_node!(self, _t => Vec::new(), n => n.tags())
    }

    pub fn child_contents(&self) -> Vec<&Content> {
        on_node!(self, _t => Vec::new(), n => n.child_contents())
    }

    /// Nodes nested inside this one; every level when `recursive`.
    pub fn child_nodes(&self, recursive: bool) -> Vec<&MarkupNode> {
        self.child_contents()
            .into_iter()
            .flat_map(|c| c.child_nodes(recursive))
            .collect()
    }

    /// Parses `s` as exactly one node of `kind`.
    ///
    /// Runs the pipeline up to and including `kind`, so earlier kinds get their
    /// chance to claim the text first, the same as inside a full block.
    pub fn parse_as(kind: NodeKind, s: &str) -> Result<Self, MarkupError> {
        let syntax_error = || MarkupError::Syntax {
            kind,
            input: s.to_string(),
        };
        if kind == NodeKind::PlainText {
            return Ok(MarkupNode::text(s));
        }
        let upto = PARSE_ORDER
            .iter()
            .position(|k| *k == kind)
            .ok_or_else(syntax_error)?;
        let mut nodes = parsing::parse_with(s, &PARSE_ORDER[..=upto]).into_nodes();
        match (nodes.pop(), nodes.is_empty()) {
            (Some(node), true) if node.kind() == kind => Ok(node),
            _ => Err(syntax_error()),
        }
    }
}

impl fmt::Display for MarkupNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source_text())
    }
}

macro_rules! node_conversions {
    ($($ty:ident),* $(,)?) => {$(
        impl From<$ty> for MarkupNode {
            fn from(node: $ty) -> Self {
                MarkupNode::$ty(node)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = MarkupError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match MarkupNode::parse_as(NodeKind::$ty, s)? {
                    MarkupNode::$ty(node) => Ok(node),
                    _ => Err(MarkupError::Syntax {
                        kind: NodeKind::$ty,
                        input: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_source_text())
            }
        }
    )*};
}

node_conversions!(
    BlockQuote,
    CodeBlock,
    CodeInline,
    Cloze,
    Image,
    Alias,
    Checkbox,
    Embed,
    View,
    Button,
    PageTag,
    PageReference,
    BlockReference,
    Attribute,
    Url,
);
