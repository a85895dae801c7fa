use std::sync::OnceLock;

use regex::Regex;

use crate::markup::{Markup, SourceText};
use crate::parsing::Found;
use crate::render::{RenderContext, escape};

fn image_regex() -> &'static Regex {
    static IMAGE_RE: OnceLock<Regex> = OnceLock::new();
    IMAGE_RE.get_or_init(|| Regex::new(r"!\[([^\[\]]*)\]\(([^)\n]+)\)").expect("Invalid image regex"))
}

/// `![alt](src)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    src: String,
    alt: String,
    source: SourceText,
}

impl Image {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            source: SourceText::none(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn alt(&self) -> &str {
        &self.alt
    }

    pub(crate) fn find(text: &str) -> Vec<Found> {
        image_regex()
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let image = Image {
                    alt: caps.get(1)?.as_str().to_string(),
                    src: caps.get(2)?.as_str().to_string(),
                    source: SourceText::captured(whole.as_str()),
                };
                Some(Found::new(whole.start(), whole.end(), image))
            })
            .collect()
    }
}

impl Markup for Image {
    fn to_source_text(&self) -> String {
        self.source.or_else(|| format!("![{}]({})", self.alt, self.src))
    }

    fn to_html(&self, _ctx: &RenderContext<'_>) -> String {
        format!(
            r#"<img src="{}" alt="{}" draggable="false" class="rm-inline-img">"#,
            escape::attr(&self.src),
            escape::attr(&self.alt)
        )
    }
}
