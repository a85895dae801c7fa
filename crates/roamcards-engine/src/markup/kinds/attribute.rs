use crate::markup::{Markup, SourceText};
use crate::parsing::Found;
use crate::render::{RenderContext, escape};

/// `key::` opening a block. Only the key is the attribute; the value stays text.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    title: String,
    source: SourceText,
}

impl Attribute {
    pub const SEPARATOR: &'static str = "::";

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: SourceText::none(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Matches only at the start of `text`; callers pass the sequence's first span.
    pub(crate) fn find(text: &str) -> Option<Found> {
        let key_len = text.find(':')?;
        if key_len == 0 || !text[key_len..].starts_with(Self::SEPARATOR) {
            return None;
        }
        let end = key_len + Self::SEPARATOR.len();
        let attribute = Attribute {
            title: text[..key_len].to_string(),
            source: SourceText::captured(&text[..end]),
        };
        Some(Found::new(0, end, attribute))
    }
}

impl Markup for Attribute {
    fn to_source_text(&self) -> String {
        self.source.or_else(|| format!("{}::", self.title))
    }

    fn to_html(&self, _ctx: &RenderContext<'_>) -> String {
        format!("<span><strong>{}:</strong></span>", escape::attr(&self.title))
    }

    fn tags(&self) -> Vec<String> {
        vec![self.title.clone()]
    }
}
