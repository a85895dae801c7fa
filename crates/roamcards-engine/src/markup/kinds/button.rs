use crate::markup::{Content, Markup, SourceText};
use crate::parsing::Found;
use crate::parsing::cursor::Cursor;
use crate::render::{RenderContext, escape};

/// `{{name}}` or `{{name:text}}`, any double-brace component not recognized as
/// something more specific.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    name: String,
    text: Option<String>,
    source: SourceText,
}

impl Button {
    pub const OPEN: &'static [u8; 2] = b"{{";
    pub const CLOSE: &'static [u8; 2] = b"}}";
    pub const TEXT_SEP: char = ':';

    pub fn new(name: impl Into<String>, text: Option<&str>) -> Self {
        Self {
            name: name.into(),
            text: text.map(str::to_string),
            source: SourceText::none(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn try_parse(s: &str, start: usize) -> Option<(usize, Button)> {
        let mut cur = Cursor::at(s, start);
        if !cur.starts_with(Self::OPEN) {
            return None;
        }
        cur.bump_n(Self::OPEN.len());
        let inner_start = cur.pos();
        while !cur.starts_with(Self::CLOSE) {
            if cur.eof() || cur.starts_with(Self::OPEN) || cur.peek() == Some(b'\n') {
                return None;
            }
            cur.bump();
        }
        let inner = cur.since(inner_start);
        if inner.is_empty() {
            return None;
        }
        cur.bump_n(Self::CLOSE.len());
        let (name, text) = match inner.split_once(Self::TEXT_SEP) {
            Some((name, text)) => (name, Some(text.to_string())),
            None => (inner, None),
        };
        let button = Button {
            name: name.to_string(),
            text,
            source: SourceText::captured(cur.since(start)),
        };
        Some((cur.pos(), button))
    }

    pub(crate) fn find(text: &str) -> Vec<Found> {
        let mut out = vec![];
        let mut cur = Cursor::new(text);
        while cur.seek("{{") {
            let start = cur.pos();
            match Self::try_parse(text, start) {
                Some((end, button)) => {
                    out.push(Found::new(start, end, button));
                    cur.i = end;
                }
                None => cur.bump_n(1),
            }
        }
        out
    }
}

impl Markup for Button {
    fn to_source_text(&self) -> String {
        self.source.or_else(|| match &self.text {
            Some(text) => format!("{{{{{}:{}}}}}", self.name, text),
            None => format!("{{{{{}}}}}", self.name),
        })
    }

    fn to_html(&self, _ctx: &RenderContext<'_>) -> String {
        format!(
            r#"<button class="bp3-button bp3-small dont-focus-block">{}</button>"#,
            escape::text(&self.name)
        )
    }

    /// Tags written inside the button text.
    fn tags(&self) -> Vec<String> {
        self.text
            .as_deref()
            .map(|text| Content::parse(text).tags())
            .unwrap_or_default()
    }
}
