use crate::markup::{Content, Markup, NodeKind, SourceText};
use crate::parsing::cursor::Cursor;
use crate::parsing::{Found, parse_with};
use crate::render::{RenderContext, escape};

use super::PageReference;

/// `#tag` or `#[[multi word tag]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTag {
    title: Content,
    source: SourceText,
}

impl PageTag {
    pub const PREFIX: u8 = b'#';
    /// Chars allowed to sit right before the `#` besides whitespace.
    const OPENERS: &'static [char] = &['(', '[', '{', ',', ';', '"', '\''];

    pub fn new(title: &str) -> Self {
        Self {
            title: parse_with(title, &[NodeKind::PageReference]),
            source: SourceText::none(),
        }
    }

    pub fn title(&self) -> String {
        self.title.to_source_text()
    }

    fn is_tag_char(c: char) -> bool {
        c.is_alphanumeric() || matches!(c, '_' | '-' | '@' | '.')
    }

    /// True when `title` can be written as `#title` without brackets.
    fn is_simple(title: &str) -> bool {
        !title.is_empty() && !title.ends_with('.') && title.chars().all(Self::is_tag_char)
    }

    fn try_parse(cur: &mut Cursor<'_>) -> Option<(usize, PageTag)> {
        if cur.peek() != Some(Self::PREFIX) {
            return None;
        }
        if cur
            .prev_char()
            .is_some_and(|c| !c.is_whitespace() && !Self::OPENERS.contains(&c))
        {
            return None;
        }
        let s = cur.s;
        let start = cur.pos();
        let saved = cur.clone();
        cur.bump();

        let title = if cur.starts_with(PageReference::OPEN) {
            match PageReference::balanced_end(s, cur.pos()) {
                Some(end) => {
                    let inner =
                        &s[cur.pos() + PageReference::OPEN.len()..end - PageReference::CLOSE.len()];
                    cur.i = end;
                    inner
                }
                None => {
                    *cur = saved;
                    return None;
                }
            }
        } else {
            let body_start = cur.pos();
            let body = cur.rest();
            let len: usize = body
                .chars()
                .take_while(|c| Self::is_tag_char(*c))
                .map(char::len_utf8)
                .sum();
            let trimmed = body[..len].trim_end_matches('.');
            if trimmed.is_empty() {
                *cur = saved;
                return None;
            }
            cur.i = body_start + trimmed.len();
            trimmed
        };

        let tag = PageTag {
            title: parse_with(title, &[NodeKind::PageReference]),
            source: SourceText::captured(cur.since(start)),
        };
        Some((start, tag))
    }

    pub(crate) fn find(text: &str) -> Vec<Found> {
        let mut out = vec![];
        let mut cur = Cursor::new(text);
        while !cur.eof() {
            if let Some((start, tag)) = Self::try_parse(&mut cur) {
                out.push(Found::new(start, cur.pos(), tag));
                continue;
            }
            cur.bump_char();
        }
        out
    }
}

impl Markup for PageTag {
    fn to_source_text(&self) -> String {
        self.source.or_else(|| {
            let title = self.title();
            if Self::is_simple(&title) {
                format!("#{title}")
            } else {
                format!("#[[{title}]]")
            }
        })
    }

    fn to_html(&self, _ctx: &RenderContext<'_>) -> String {
        let title = self.title();
        format!(
            r#"<span data-tag="{}" class="rm-page-ref rm-page-ref-tag">#{}</span>"#,
            escape::attr(&title),
            escape::text(&title)
        )
    }

    fn tags(&self) -> Vec<String> {
        let mut tags = vec![self.title()];
        tags.extend(self.title.tags());
        tags
    }

    fn child_contents(&self) -> Vec<&Content> {
        vec![&self.title]
    }
}
