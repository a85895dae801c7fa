use crate::markup::{Content, Markup, NodeKind, SourceText};
use crate::parsing::cursor::Cursor;
use crate::parsing::{Found, parse_with};
use crate::render::{RenderContext, escape};

/// `[[title]]`. Titles may nest further references: `[[a [[b]]]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageReference {
    title: Content,
    uid: Option<String>,
    source: SourceText,
}

impl PageReference {
    pub const OPEN: &'static [u8; 2] = b"[[";
    pub const CLOSE: &'static [u8; 2] = b"]]";
    pub const NAMESPACE_SEP: char = '/';

    /// Reference to `title`, with nested references in it recognized.
    pub fn new(title: &str) -> Self {
        Self::from_title(parse_title(title))
    }

    pub fn from_title(title: Content) -> Self {
        Self {
            title,
            uid: None,
            source: SourceText::none(),
        }
    }

    /// Attaches the page uid emitted as `data-link-uid`.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn title(&self) -> String {
        self.title.to_source_text()
    }

    pub fn title_content(&self) -> &Content {
        &self.title
    }

    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    /// Everything before the last `/`, if there is one.
    pub fn namespace(&self) -> Option<String> {
        let title = self.title();
        title
            .rsplit_once(Self::NAMESPACE_SEP)
            .map(|(namespace, _)| namespace.to_string())
    }

    /// Everything after the last `/`, or the whole title.
    pub fn basename(&self) -> String {
        let title = self.title();
        match title.rsplit_once(Self::NAMESPACE_SEP) {
            Some((_, base)) => base.to_string(),
            None => title,
        }
    }

    /// Page reference markup with `display_html` in place of the escaped title.
    pub fn html_with_display(&self, display_html: &str) -> String {
        let uid = self
            .uid
            .as_deref()
            .map(|uid| format!(r#" data-link-uid="{}""#, escape::attr(uid)))
            .unwrap_or_default();
        format!(
            concat!(
                r#"<span data-link-title="{title}"{uid}>"#,
                r#"<span class="rm-page-ref-brackets">[[</span>"#,
                r#"<span class="rm-page-ref rm-page-ref-link-color">{display}</span>"#,
                r#"<span class="rm-page-ref-brackets">]]</span></span>"#
            ),
            title = escape::attr(&self.title()),
            uid = uid,
            display = display_html,
        )
    }

    /// End of the balanced `[[...]]` opening at `start`, just past its closing brackets.
    pub(crate) fn balanced_end(s: &str, start: usize) -> Option<usize> {
        let mut cur = Cursor::at(s, start);
        if !cur.starts_with(Self::OPEN) {
            return None;
        }
        let mut depth = 0usize;
        while !cur.eof() {
            if cur.starts_with(Self::OPEN) {
                depth += 1;
                cur.bump_n(Self::OPEN.len());
            } else if cur.starts_with(Self::CLOSE) {
                depth -= 1;
                cur.bump_n(Self::CLOSE.len());
                if depth == 0 {
                    return Some(cur.pos());
                }
            } else {
                cur.bump();
            }
        }
        None
    }

    /// Builds a reference from a balanced `[[...]]` slice.
    pub(crate) fn from_source(source: &str) -> Self {
        let inner = &source[Self::OPEN.len()..source.len() - Self::CLOSE.len()];
        Self {
            title: parse_title(inner),
            uid: None,
            source: SourceText::captured(source),
        }
    }

    pub(crate) fn find(text: &str) -> Vec<Found> {
        let mut out = vec![];
        let mut cur = Cursor::new(text);
        while !cur.eof() {
            if cur.starts_with(Self::OPEN) {
                let start = cur.pos();
                if let Some(end) = Self::balanced_end(text, start) {
                    out.push(Found::new(start, end, Self::from_source(&text[start..end])));
                    cur.i = end;
                    continue;
                }
            }
            cur.bump();
        }
        out
    }
}

/// Titles only ever contain further page references.
fn parse_title(title: &str) -> Content {
    parse_with(title, &[NodeKind::PageReference])
}

impl Markup for PageReference {
    fn to_source_text(&self) -> String {
        self.source.or_else(|| format!("[[{}]]", self.title()))
    }

    fn to_html(&self, _ctx: &RenderContext<'_>) -> String {
        self.html_with_display(&escape::text(&self.title()))
    }

    fn tags(&self) -> Vec<String> {
        if self.title.is_empty() {
            return Vec::new();
        }
        let mut tags = vec![self.title()];
        tags.extend(self.title.tags());
        tags
    }

    fn child_contents(&self) -> Vec<&Content> {
        vec![&self.title]
    }
}
