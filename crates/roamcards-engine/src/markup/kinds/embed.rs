use std::sync::OnceLock;

use regex::Regex;

use crate::markup::{Content, Markup, SourceText};
use crate::parsing::Found;
use crate::render::{RenderContext, escape};

use super::{BlockReference, ViewName};

fn embed_regex() -> &'static Regex {
    static EMBED_RE: OnceLock<Regex> = OnceLock::new();
    EMBED_RE.get_or_init(|| {
        Regex::new(r"\{\{(\[\[embed\]\]|embed):\s*(\(\([\w-]+\)\))\s*\}\}").expect("Invalid embed regex")
    })
}

/// `{{embed: ((uid))}}`, the referenced block rendered in place with its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Embed {
    name: ViewName,
    block: BlockReference,
    source: SourceText,
}

impl Embed {
    pub fn new(block: BlockReference) -> Self {
        Self {
            name: ViewName::Plain("embed".to_string()),
            block,
            source: SourceText::none(),
        }
    }

    pub fn name(&self) -> &ViewName {
        &self.name
    }

    pub fn block(&self) -> &BlockReference {
        &self.block
    }

    pub(crate) fn find(text: &str) -> Vec<Found> {
        embed_regex()
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let reference = caps.get(2)?.as_str();
                let (_, block) = BlockReference::parse_at(reference, 0)?;
                let embed = Embed {
                    name: ViewName::from_source(caps.get(1)?.as_str()),
                    block,
                    source: SourceText::captured(whole.as_str()),
                };
                Some(Found::new(whole.start(), whole.end(), embed))
            })
            .collect()
    }

    /// `<ul>` of the block's children, each followed by its own children.
    fn children_html(ctx: &RenderContext<'_>, uid: &str) -> String {
        let children = ctx.children_of(uid);
        if children.is_empty() {
            return String::new();
        }
        let items: String = children
            .into_iter()
            .filter_map(|child| {
                let content = ctx.resolve(child)?;
                Some(format!(
                    "<li>{}{}</li>",
                    content.to_html(ctx),
                    Self::children_html(&ctx.nested(), child)
                ))
            })
            .collect();
        format!("<ul>{items}</ul>")
    }
}

impl Markup for Embed {
    fn to_source_text(&self) -> String {
        self.source.or_else(|| {
            format!(
                "{{{{{}:{}}}}}",
                self.name.to_source_text(),
                self.block.to_source_text()
            )
        })
    }

    fn to_html(&self, ctx: &RenderContext<'_>) -> String {
        let uid = self.block.uid();
        match ctx.resolve(uid) {
            Some(content) => {
                let nested = ctx.nested();
                format!(
                    r#"<div class="rm-embed-container">{}{}</div>"#,
                    content.to_html(&nested),
                    Self::children_html(&nested, uid)
                )
            }
            None => escape::text(&self.to_source_text()),
        }
    }

    fn tags(&self) -> Vec<String> {
        self.name.tags()
    }

    fn child_contents(&self) -> Vec<&Content> {
        self.name.title_content().into_iter().collect()
    }
}
