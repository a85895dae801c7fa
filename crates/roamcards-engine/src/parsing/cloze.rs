//! # Cloze pass
//!
//! A cloze can span nodes carved out by earlier passes: in ``{c1:see `code`}``
//! the opener and closer sit in different text spans once the inline code is
//! out. So this pass works on the whole sequence:
//!
//! 1. **Tokenize** every text span into bracket markers and text.
//! 2. **Pair** markers left to right. A second opener orphans the first, a
//!    closer with nothing open is orphaned, and code blocks and block quotes
//!    reset the search.
//! 3. **Build** a cloze from each pair; orphaned markers go back to text, so
//!    `[[{c1:]]` alone can still become a page reference later on.
//! 4. **Number** the clozes without an id.

use crate::markup::kinds::{Cloze, ClozeSyntax, HintStyle, PageReference, assign_cloze_ids};
use crate::markup::{Content, MarkupNode, NodeKind};

use super::cursor::Cursor;
use super::{kinds_after, run};

struct Opener {
    source: String,
    id: Option<u32>,
    letter_c: bool,
    separator: Option<char>,
    wrapped: bool,
}

struct Closer {
    source: String,
    hint: Option<String>,
    wrapped: bool,
}

/// `[[::hint]]` standing on its own just before a closer.
struct WrappedHint {
    source: String,
    text: String,
}

enum Piece {
    Node(MarkupNode),
    Open(Opener),
    Close(Closer),
    Hint(WrappedHint),
}

impl Piece {
    fn source(&self) -> String {
        match self {
            Piece::Node(node) => node.to_source_text(),
            Piece::Open(open) => open.source.clone(),
            Piece::Close(close) => close.source.clone(),
            Piece::Hint(hint) => hint.source.clone(),
        }
    }

    /// Back to a node; markers that paired with nothing become text again.
    fn into_node(self) -> MarkupNode {
        match self {
            Piece::Node(node) => node,
            Piece::Open(Opener { source, .. })
            | Piece::Close(Closer { source, .. })
            | Piece::Hint(WrappedHint { source, .. }) => MarkupNode::PlainText(source),
        }
    }
}

pub(crate) fn carve(content: Content) -> Content {
    let mut pieces = Vec::new();
    for node in content.into_nodes() {
        match node {
            MarkupNode::PlainText(text) => tokenize(&text, &mut pieces),
            other => pieces.push(Piece::Node(other)),
        }
    }

    let mut pairs = pair(&pieces).into_iter().peekable();
    let mut out = Vec::with_capacity(pieces.len());
    let mut iter = pieces.into_iter().enumerate();
    while let Some((idx, piece)) = iter.next() {
        let Some(&(_, close)) = pairs.peek().filter(|(open, _)| *open == idx) else {
            out.push(piece.into_node());
            continue;
        };
        pairs.next();
        let body: Vec<Piece> = iter.by_ref().take(close - idx - 1).map(|(_, p)| p).collect();
        match (piece, iter.next()) {
            (Piece::Open(opener), Some((_, Piece::Close(closer)))) => {
                out.push(build(opener, body, closer));
            }
            (piece, rest) => {
                out.push(piece.into_node());
                out.extend(body.into_iter().map(Piece::into_node));
                out.extend(rest.map(|(_, p)| p.into_node()));
            }
        }
    }

    let mut content = Content::new(out);
    assign_cloze_ids(content.nodes_mut().iter_mut().filter_map(|node| match node {
        MarkupNode::Cloze(cloze) => Some(cloze),
        _ => None,
    }));
    content
}

/// Indices of matched opener/closer pieces.
fn pair(pieces: &[Piece]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    let mut open: Option<usize> = None;
    for (idx, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::Open(opener) => {
                if open.is_some() {
                    log::trace!("cloze opener orphaned by '{}'", opener.source);
                }
                open = Some(idx);
            }
            Piece::Close(_) => {
                if let Some(start) = open.take() {
                    pairs.push((start, idx));
                }
            }
            Piece::Node(MarkupNode::CodeBlock(_) | MarkupNode::BlockQuote(_)) => open = None,
            Piece::Node(_) | Piece::Hint(_) => {}
        }
    }
    pairs
}

fn build(opener: Opener, mut body: Vec<Piece>, closer: Closer) -> MarkupNode {
    let source: String = std::iter::once(opener.source.clone())
        .chain(body.iter().map(Piece::source))
        .chain(std::iter::once(closer.source.clone()))
        .collect();

    let mut hint_style = HintStyle::Inline;
    let mut hint = closer.hint.filter(|h| !h.is_empty());
    if hint.is_some() {
        hint_style = HintStyle::InCloser;
    } else if let Some(Piece::Hint(wrapped)) = body.last() {
        hint = Some(wrapped.text.clone());
        hint_style = HintStyle::Wrapped;
        body.pop();
    }

    let mut nodes = Content::new(body.into_iter().map(Piece::into_node).collect()).into_nodes();
    if hint.is_none() {
        if let Some(MarkupNode::PlainText(last)) = nodes.last_mut() {
            if let Some((before, after)) = last.split_once(Cloze::HINT_SEP) {
                if !after.is_empty() {
                    hint = Some(after.to_string());
                    *last = before.to_string();
                }
            }
        }
    }
    let inner = run(Content::new(nodes), kinds_after(NodeKind::Cloze));

    let syntax = ClozeSyntax {
        letter_c: opener.letter_c,
        separator: opener.separator,
        explicit_id: opener.id.is_some(),
        left_wrapped: opener.wrapped,
        right_wrapped: closer.wrapped,
        hint_style,
    };
    Cloze::from_parts(inner, opener.id, hint, syntax, source).into()
}

fn tokenize(text: &str, out: &mut Vec<Piece>) {
    let mut cur = Cursor::new(text);
    let mut text_start = 0;
    while !cur.eof() {
        let start = cur.pos();
        if let Some(token) = scan_marker(&mut cur) {
            if start > text_start {
                out.push(Piece::Node(MarkupNode::text(&text[text_start..start])));
            }
            out.push(token);
            text_start = cur.pos();
            continue;
        }
        cur.bump();
    }
    if text_start < text.len() {
        out.push(Piece::Node(MarkupNode::text(&text[text_start..])));
    }
}

fn scan_marker(cur: &mut Cursor<'_>) -> Option<Piece> {
    if cur.starts_with(b"[[{") {
        return wrapped_opener(cur);
    }
    if cur.starts_with(Cloze::WRAPPED_RIGHT.as_bytes()) {
        let start = cur.pos();
        cur.bump_n(Cloze::WRAPPED_RIGHT.len());
        return Some(Piece::Close(Closer {
            source: cur.since(start).to_string(),
            hint: None,
            wrapped: true,
        }));
    }
    if cur.starts_with(Cloze::WRAPPED_HINT_OPEN.as_bytes()) {
        return wrapped_hint(cur);
    }
    match cur.peek() {
        Some(Cloze::LEFT) if lone_brace(cur) => Some(plain_opener(cur)),
        Some(Cloze::RIGHT) if lone_brace(cur) => {
            let start = cur.pos();
            cur.bump();
            Some(Piece::Close(Closer {
                source: cur.since(start).to_string(),
                hint: None,
                wrapped: false,
            }))
        }
        _ => None,
    }
}

/// A brace not part of a `{{` or `}}` run.
fn lone_brace(cur: &Cursor<'_>) -> bool {
    let brace = cur.peek();
    cur.prev() != brace && cur.peek_at(1) != brace
}

/// Reads `c?\d*` and an optional separator.
fn scan_id(cur: &mut Cursor<'_>) -> (Option<u32>, bool, Option<char>) {
    let letter_c = cur.peek() == Some(b'c');
    if letter_c {
        cur.bump();
    }
    let digits_start = cur.pos();
    cur.eat_while(|b| b.is_ascii_digit());
    let id = cur.since(digits_start).parse::<u32>().ok();
    let separator = match cur.peek() {
        Some(b) if Cloze::ID_SEPARATORS.contains(&b) => {
            cur.bump();
            Some(char::from(b))
        }
        _ => None,
    };
    (id, letter_c, separator)
}

/// `{`, optionally followed by a full `c?\d+[:|]` id prefix. Id 0 is read as no id.
fn plain_opener(cur: &mut Cursor<'_>) -> Piece {
    let start = cur.pos();
    cur.bump();
    let after_brace = cur.clone();
    let (id, letter_c, separator) = match scan_id(cur) {
        (Some(id), letter_c, Some(sep)) => (Some(id), letter_c, Some(sep)),
        _ => {
            *cur = after_brace;
            (None, false, None)
        }
    };
    Piece::Open(Opener {
        source: cur.since(start).to_string(),
        id: id.filter(|&id| id > 0),
        letter_c,
        separator,
        wrapped: false,
    })
}

/// `[[{c1:]]` and its looser forms: `[[{]]`, `[[{5]]`, `[[{c2|]]`.
fn wrapped_opener(cur: &mut Cursor<'_>) -> Option<Piece> {
    let saved = cur.clone();
    let start = cur.pos();
    cur.bump_n(b"[[{".len());
    let (id, letter_c, separator) = scan_id(cur);
    if !cur.starts_with(PageReference::CLOSE) {
        *cur = saved;
        return None;
    }
    cur.bump_n(PageReference::CLOSE.len());
    Some(Piece::Open(Opener {
        source: cur.since(start).to_string(),
        id: id.filter(|&id| id > 0),
        letter_c,
        separator,
        wrapped: true,
    }))
}

/// `[[::hint]]`, or `[[::hint}]]` which also closes the cloze.
fn wrapped_hint(cur: &mut Cursor<'_>) -> Option<Piece> {
    let saved = cur.clone();
    let start = cur.pos();
    cur.bump_n(Cloze::WRAPPED_HINT_OPEN.len());
    let body_start = cur.pos();
    if !cur.seek("]]") {
        *cur = saved;
        return None;
    }
    let body = cur.since(body_start);
    if body.contains(['[', '\n']) {
        *cur = saved;
        return None;
    }
    cur.bump_n(PageReference::CLOSE.len());
    let source = cur.since(start).to_string();
    Some(match body.strip_suffix('}') {
        Some(hint) => Piece::Close(Closer {
            source,
            hint: Some(hint.to_string()),
            wrapped: true,
        }),
        None => Piece::Hint(WrappedHint {
            source,
            text: body.to_string(),
        }),
    })
}
