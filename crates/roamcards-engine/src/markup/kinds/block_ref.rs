use crate::markup::{Markup, SourceText};
use crate::parsing::Found;
use crate::parsing::cursor::Cursor;
use crate::render::{RenderContext, escape};

/// `((uid))`, a reference to another block by its 9-character uid.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockReference {
    uid: String,
    source: SourceText,
}

impl BlockReference {
    pub const OPEN: &'static [u8; 2] = b"((";
    pub const CLOSE: &'static [u8; 2] = b"))";
    pub const UID_LEN: usize = 9;

    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            source: SourceText::none(),
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    fn is_uid_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
    }

    /// Parses `((uid))` at `start`, returning the end offset.
    pub(crate) fn parse_at(s: &str, start: usize) -> Option<(usize, BlockReference)> {
        let mut cur = Cursor::at(s, start);
        if !cur.starts_with(Self::OPEN) {
            return None;
        }
        cur.bump_n(Self::OPEN.len());
        let uid_start = cur.pos();
        if cur.eat_while(Self::is_uid_byte) != Self::UID_LEN || !cur.starts_with(Self::CLOSE) {
            return None;
        }
        let uid = cur.since(uid_start).to_string();
        cur.bump_n(Self::CLOSE.len());
        let node = BlockReference {
            uid,
            source: SourceText::captured(cur.since(start)),
        };
        Some((cur.pos(), node))
    }

    pub(crate) fn find(text: &str) -> Vec<Found> {
        let mut out = vec![];
        let mut cur = Cursor::new(text);
        while !cur.eof() {
            if let Some((end, node)) = Self::parse_at(text, cur.pos()) {
                out.push(Found::new(cur.pos(), end, node));
                cur.i = end;
                continue;
            }
            cur.bump();
        }
        out
    }

    /// Source text of the referenced block when it resolves, else this reference's own text.
    pub fn expand(&self, ctx: &RenderContext<'_>) -> String {
        match ctx.resolve(&self.uid) {
            Some(content) => content.to_source_text(),
            None => self.to_source_text(),
        }
    }
}

impl Markup for BlockReference {
    fn to_source_text(&self) -> String {
        self.source.or_else(|| format!("(({}))", self.uid))
    }

    fn to_html(&self, ctx: &RenderContext<'_>) -> String {
        match ctx.resolve(&self.uid) {
            Some(content) => format!(
                r#"<div class="rm-block-ref"><span>{}</span></div>"#,
                content.to_html(&ctx.nested())
            ),
            None => {
                log::debug!("unresolved block reference (({}))", self.uid);
                escape::text(&self.to_source_text())
            }
        }
    }
}
