use crate::markup::{Content, Markup, NodeKind, SourceText};
use crate::parsing::{Found, kinds_after, parse_with};
use crate::render::RenderContext;

/// A whole block quoted with `>` or `[[>]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockQuote {
    content: Content,
    prefix: SourceText,
}

impl BlockQuote {
    pub const PREFIXES: [&'static str; 2] = [">", "[[>]]"];

    pub fn new(content: Content) -> Self {
        Self {
            content,
            prefix: SourceText::none(),
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Matches only at the start of `text` and always runs to its end.
    pub(crate) fn find(text: &str) -> Option<Found> {
        let marker = Self::PREFIXES.iter().find(|p| text.starts_with(**p))?;
        let body = text[marker.len()..].trim_start_matches([' ', '\t']);
        let body_start = text.len() - body.len();
        let quote = BlockQuote {
            content: parse_with(&text[body_start..], kinds_after(NodeKind::BlockQuote)),
            prefix: SourceText::captured(&text[..body_start]),
        };
        Some(Found::new(0, text.len(), quote))
    }
}

impl Markup for BlockQuote {
    fn to_source_text(&self) -> String {
        let prefix = self.prefix.or_else(|| "> ".to_string());
        format!("{prefix}{}", self.content.to_source_text())
    }

    fn to_html(&self, ctx: &RenderContext<'_>) -> String {
        format!(r#"<blockquote class="rm-bq">{}</blockquote>"#, self.content.to_html(ctx))
    }

    fn tags(&self) -> Vec<String> {
        self.content.tags()
    }

    fn child_contents(&self) -> Vec<&Content> {
        vec![&self.content]
    }
}
