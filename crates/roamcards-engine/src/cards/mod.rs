//! # Card faces
//!
//! The front of a card is the block itself under a nested list of its
//! ancestors; the back is its descendants. How many ancestors show, whether the
//! page title shows, and how deep the back goes are all [`CardOptions`].

use std::fmt;
use std::str::FromStr;

use crate::error::OptionValueError;
use crate::markup::Markup;
use crate::markup::kinds::PageReference;
use crate::render::{RenderContext, RenderOptions};
use crate::tree::{BlockId, Graph, Parent, TagQuery};

const ELLIPSIS: &str = r#"<span class="ellipsis">...</span>"#;

/// How many ancestor blocks to show above the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentCount {
    All,
    Count(usize),
}

impl Default for ParentCount {
    fn default() -> Self {
        ParentCount::Count(0)
    }
}

impl FromStr for ParentCount {
    type Err = OptionValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(ParentCount::All);
        }
        s.parse().map(ParentCount::Count).map_err(|_| OptionValueError {
            option: "num-parents",
            value: s.to_string(),
        })
    }
}

impl fmt::Display for ParentCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentCount::All => f.write_str("all"),
            ParentCount::Count(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardOptions {
    pub num_parents: ParentCount,
    pub include_page: bool,
    /// Levels of descendants on the back; `None` for all of them.
    pub max_depth: Option<usize>,
    /// Ancestors above the nearest block carrying this tag never show.
    pub root_tag: Option<String>,
    pub tags_from_attr: bool,
    /// Used for the question and the back. Ancestors always render inert.
    pub render: RenderOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub front: String,
    pub back: String,
}

pub struct CardAssembler<'g> {
    graph: &'g Graph,
    options: CardOptions,
}

impl<'g> CardAssembler<'g> {
    pub fn new(graph: &'g Graph, options: CardOptions) -> Self {
        Self { graph, options }
    }

    pub fn options(&self) -> &CardOptions {
        &self.options
    }

    fn ctx(&self, render: RenderOptions) -> RenderContext<'g> {
        RenderContext::new(render).with_lookup(self.graph)
    }

    pub fn card(&self, id: BlockId) -> Card {
        Card {
            front: self.front_html(id),
            back: self.back_html(id),
        }
    }

    fn parent_html(&self, parent: Parent) -> String {
        let ctx = self.ctx(RenderOptions {
            proc_cloze: false,
            ..self.options.render
        });
        match parent {
            Parent::Block(block) => self.graph.block(block).content().to_html(&ctx),
            Parent::Page(page) => PageReference::new(self.graph.page(page).title()).to_html(&ctx),
        }
    }

    fn parent_tags(&self, parent: Parent) -> Vec<String> {
        match parent {
            Parent::Block(block) => self
                .graph
                .tags(block, TagQuery::own().from_attr(self.options.tags_from_attr)),
            Parent::Page(page) => self.graph.page_tags(page, self.options.tags_from_attr),
        }
    }

    pub fn front_html(&self, id: BlockId) -> String {
        let chain = self.graph.ancestors(id);
        let to_root = match &self.options.root_tag {
            Some(tag) => chain
                .iter()
                .position(|p| self.parent_tags(*p).contains(tag))
                .map_or(chain.len(), |i| i + 1),
            None => chain.len(),
        };
        let shown = match self.options.num_parents {
            ParentCount::All => to_root,
            ParentCount::Count(n) => n.min(to_root),
        };
        let mut selected: Vec<String> = chain[..shown].iter().map(|p| self.parent_html(*p)).collect();

        if self.options.include_page {
            if let Some(page @ Parent::Page(_)) = chain.last() {
                if selected.len() + 1 == chain.len() {
                    selected.push(self.parent_html(*page));
                } else if selected.len() < chain.len() {
                    selected.push(ELLIPSIS.to_string());
                    selected.push(self.parent_html(*page));
                }
            }
        }

        let question = self
            .graph
            .block(id)
            .content()
            .to_html(&self.ctx(self.options.render));
        if selected.is_empty() {
            return format!(r#"<div class="front-side">{question}</div>"#);
        }
        let top_class = if selected.len() == chain.len() { "page-title" } else { "block" };
        selected.reverse();
        selected.push(question);
        format!(
            r#"<div class="front-side">{}</div>"#,
            listify_front(&selected, top_class, 0)
        )
    }

    pub fn back_html(&self, id: BlockId) -> String {
        let block = self.graph.block(id);
        let ctx = self.ctx(self.options.render);
        match self.graph.num_descendants(id) {
            0 => r#"<div class="back-side"></div>"#.to_string(),
            1 => {
                let child = self.graph.block(block.children()[0]);
                format!(r#"<div class="back-side">{}</div>"#, child.content().to_html(&ctx))
            }
            _ => format!(
                r#"<div class="back-side list">{}</div>"#,
                self.listify_back(block.children(), 0, &ctx)
            ),
        }
    }

    fn listify_back(&self, ids: &[BlockId], level: usize, ctx: &RenderContext<'_>) -> String {
        if ids.is_empty() || self.options.max_depth.is_some_and(|max| level >= max) {
            return String::new();
        }
        let items: String = ids
            .iter()
            .map(|id| {
                let block = self.graph.block(*id);
                format!(
                    "<li>{}</li>{}",
                    block.content().to_html(ctx),
                    self.listify_back(block.children(), level + 1, ctx)
                )
            })
            .collect();
        format!("<ul>{items}</ul>")
    }
}

/// Each entry nested one list deeper than the one before; only the last is the question.
fn listify_front(htmls: &[String], class: &str, depth: usize) -> String {
    match htmls {
        [] => String::new(),
        [question] => format!(r#"<ul><li class="block">{question}</li></ul>"#),
        [first, rest @ ..] => {
            let mut class = format!("{class} parent parent-{}", rest.len());
            if depth == 0 {
                class.push_str(" parent-top");
            }
            format!(
                r#"<ul><li class="{class}">{first}</li>{}</ul>"#,
                listify_front(rest, "block", depth + 1)
            )
        }
    }
}
