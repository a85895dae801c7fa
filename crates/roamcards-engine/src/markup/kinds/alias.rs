use crate::markup::{Content, Markup, SourceText};
use crate::parsing::Found;
use crate::parsing::cursor::Cursor;
use crate::render::{RenderContext, escape};

use super::{BlockReference, PageReference, Url};

/// Where an alias points.
#[derive(Debug, Clone, PartialEq)]
pub enum AliasDestination {
    Page(PageReference),
    Block(BlockReference),
    Url(Url),
}

impl AliasDestination {
    pub fn to_source_text(&self) -> String {
        match self {
            AliasDestination::Page(page) => page.to_source_text(),
            AliasDestination::Block(block) => block.to_source_text(),
            AliasDestination::Url(url) => url.to_source_text(),
        }
    }
}

/// `[text](destination)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    text: String,
    destination: AliasDestination,
    source: SourceText,
}

impl Alias {
    pub const TEXT_OPEN: u8 = b'[';
    pub const TEXT_CLOSE: u8 = b']';
    pub const DEST_OPEN: u8 = b'(';
    pub const DEST_CLOSE: u8 = b')';

    pub fn new(text: impl Into<String>, destination: AliasDestination) -> Self {
        Self {
            text: text.into(),
            destination,
            source: SourceText::none(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn destination(&self) -> &AliasDestination {
        &self.destination
    }

    /// Parses the destination starting right after `(`, returning where it ends.
    fn parse_destination(s: &str, start: usize) -> Option<(usize, AliasDestination)> {
        let mut cur = Cursor::at(s, start);
        if cur.starts_with(PageReference::OPEN) {
            let end = PageReference::balanced_end(s, start)?;
            let page = &s[start..end];
            if page.contains('\n') {
                return None;
            }
            return Some((end, AliasDestination::Page(PageReference::from_source(page))));
        }
        if cur.starts_with(BlockReference::OPEN) {
            let (end, block) = BlockReference::parse_at(s, start)?;
            return Some((end, AliasDestination::Block(block)));
        }
        let len = cur.eat_while(|b| !matches!(b, b'(' | b')' | b'[' | b']'));
        if len == 0 {
            return None;
        }
        Some((cur.pos(), AliasDestination::Url(Url::new(cur.since(start)))))
    }

    fn try_parse(cur: &mut Cursor<'_>) -> Option<Alias> {
        if cur.peek() != Some(Self::TEXT_OPEN) {
            return None;
        }
        let s = cur.s;
        let start = cur.pos();
        let mut scan = cur.clone();
        scan.bump();
        let text_start = scan.pos();
        if scan.eat_while(|b| b != Self::TEXT_OPEN && b != Self::TEXT_CLOSE) == 0
            || scan.peek() != Some(Self::TEXT_CLOSE)
        {
            return None;
        }
        let text = scan.since(text_start);
        scan.bump();
        if scan.bump() != Some(Self::DEST_OPEN) {
            return None;
        }
        let (dest_end, destination) = Self::parse_destination(s, scan.pos())?;
        scan.i = dest_end;
        if scan.bump() != Some(Self::DEST_CLOSE) {
            return None;
        }
        let alias = Alias {
            text: text.to_string(),
            destination,
            source: SourceText::captured(scan.since(start)),
        };
        *cur = scan;
        Some(alias)
    }

    pub(crate) fn find(text: &str) -> Vec<Found> {
        let mut out = vec![];
        let mut cur = Cursor::new(text);
        while !cur.eof() {
            let start = cur.pos();
            if let Some(alias) = Self::try_parse(&mut cur) {
                out.push(Found::new(start, cur.pos(), alias));
                continue;
            }
            cur.bump();
        }
        out
    }
}

impl Markup for Alias {
    fn to_source_text(&self) -> String {
        self.source
            .or_else(|| format!("[{}]({})", self.text, self.destination.to_source_text()))
    }

    fn to_html(&self, ctx: &RenderContext<'_>) -> String {
        let text = escape::text(&self.text);
        match &self.destination {
            AliasDestination::Page(page) => format!(
                r#"<a title="page: {}" class="rm-alias rm-alias-page">{text}</a>"#,
                escape::attr(&page.title())
            ),
            AliasDestination::Block(block) => format!(
                r#"<a title="block: {}" class="rm-alias rm-alias-block">{text}</a>"#,
                escape::attr(&block.expand(ctx))
            ),
            AliasDestination::Url(url) => {
                let target = escape::attr(url.text());
                format!(r#"<a title="url: {target}" class="rm-alias rm-alias-external" href="{target}">{text}</a>"#)
            }
        }
    }

    fn tags(&self) -> Vec<String> {
        match &self.destination {
            AliasDestination::Page(page) => page.tags(),
            _ => Vec::new(),
        }
    }

    fn child_contents(&self) -> Vec<&Content> {
        match &self.destination {
            AliasDestination::Page(page) => vec![page.title_content()],
            _ => Vec::new(),
        }
    }
}
