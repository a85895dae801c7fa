use crate::markup::{Content, Markup, SourceText};
use crate::parsing::Found;
use crate::parsing::cursor::Cursor;
use crate::render::{RenderContext, escape};

use super::PageReference;

/// The name of a `{{name: ...}}` component, written bare or as a page reference.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewName {
    Plain(String),
    Page(PageReference),
}

impl ViewName {
    /// Reads a name as written between `{{` and `:`.
    pub(crate) fn from_source(name: &str) -> Self {
        if name.starts_with("[[") && PageReference::balanced_end(name, 0) == Some(name.len()) {
            ViewName::Page(PageReference::from_source(name))
        } else {
            ViewName::Plain(name.to_string())
        }
    }

    /// The bare name, whichever way it was written.
    pub fn title(&self) -> String {
        match self {
            ViewName::Plain(name) => name.clone(),
            ViewName::Page(page) => page.title(),
        }
    }

    pub fn to_source_text(&self) -> String {
        match self {
            ViewName::Plain(name) => name.clone(),
            ViewName::Page(page) => page.to_source_text(),
        }
    }

    pub fn tags(&self) -> Vec<String> {
        match self {
            ViewName::Plain(_) => Vec::new(),
            ViewName::Page(page) => page.tags(),
        }
    }

    pub(crate) fn title_content(&self) -> Option<&Content> {
        match self {
            ViewName::Plain(_) => None,
            ViewName::Page(page) => Some(page.title_content()),
        }
    }
}

impl From<&str> for ViewName {
    fn from(name: &str) -> Self {
        ViewName::Plain(name.to_string())
    }
}

/// A Roam component such as `{{query: {and: [[a]] [[b]]}}}` or `{{[[youtube]]: url}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    name: ViewName,
    text: String,
    source: SourceText,
}

impl View {
    pub const OPEN: &'static [u8; 2] = b"{{";
    pub const CLOSE: &'static [u8; 2] = b"}}";
    pub const NAMES: &'static [&'static str] =
        &["query", "mentions", "youtube", "video", "pdf", "iframe", "embed"];

    pub fn new(name: impl Into<ViewName>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            source: SourceText::none(),
        }
    }

    pub fn name(&self) -> &ViewName {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// End of the brace-balanced `{{...}}` at `start`, on one line.
    fn balanced_end(s: &str, start: usize) -> Option<usize> {
        let mut cur = Cursor::at(s, start);
        let mut depth = 0usize;
        while let Some(b) = cur.bump() {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(cur.pos());
                    }
                }
                b'\n' => return None,
                _ => {}
            }
        }
        None
    }

    fn try_parse(s: &str, start: usize) -> Option<(usize, View)> {
        let mut cur = Cursor::at(s, start);
        if !cur.starts_with(Self::OPEN) {
            return None;
        }
        cur.bump_n(Self::OPEN.len());
        let name_start = cur.pos();
        if !cur.seek(":") {
            return None;
        }
        let raw_name = cur.since(name_start);
        let name = ViewName::from_source(raw_name);
        if !Self::NAMES.contains(&name.title().as_str()) {
            return None;
        }
        let end = Self::balanced_end(s, start)?;
        let text_start = cur.pos() + 1;
        if text_start > end - Self::CLOSE.len() {
            return None;
        }
        let view = View {
            name,
            text: s[text_start..end - Self::CLOSE.len()].to_string(),
            source: SourceText::captured(&s[start..end]),
        };
        Some((end, view))
    }

    pub(crate) fn find(text: &str) -> Vec<Found> {
        let mut out = vec![];
        let mut cur = Cursor::new(text);
        while cur.seek("{{") {
            let start = cur.pos();
            match Self::try_parse(text, start) {
                Some((end, view)) => {
                    out.push(Found::new(start, end, view));
                    cur.i = end;
                }
                None => cur.bump_n(1),
            }
        }
        out
    }
}

impl Markup for View {
    fn to_source_text(&self) -> String {
        self.source
            .or_else(|| format!("{{{{{}:{}}}}}", self.name.to_source_text(), self.text))
    }

    fn to_html(&self, _ctx: &RenderContext<'_>) -> String {
        format!(
            r#"<span class="rm-view" data-view="{}">{}</span>"#,
            escape::attr(&self.name.title()),
            escape::text(self.text.trim())
        )
    }

    fn tags(&self) -> Vec<String> {
        self.name.tags()
    }

    fn child_contents(&self) -> Vec<&Content> {
        self.name.title_content().into_iter().collect()
    }
}
