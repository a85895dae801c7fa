use std::collections::HashSet;

use crate::markup::{Content, Markup, SourceText};
use crate::render::{PagerefCloze, RenderContext, escape};

use super::PageReference;

/// How a hint was attached to a cloze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HintStyle {
    /// `{text::hint}`
    #[default]
    Inline,
    /// `{text[[::hint]]}`
    Wrapped,
    /// `{text[[::hint}]]`
    InCloser,
}

/// Surface spelling of a cloze's brackets. Kept for printing back; ignored by equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClozeSyntax {
    /// `c` written before the id, as in `{c1:`.
    pub letter_c: bool,
    /// `:` or `|` after the id. A wrapped opener may omit it: `[[{c1]]`.
    pub separator: Option<char>,
    /// The id was written rather than assigned.
    pub explicit_id: bool,
    /// Opener written as a page reference: `[[{c1:]]`.
    pub left_wrapped: bool,
    /// Closer written as a page reference: `[[}]]`.
    pub right_wrapped: bool,
    pub hint_style: HintStyle,
}

impl Default for ClozeSyntax {
    fn default() -> Self {
        Self {
            letter_c: true,
            separator: Some(':'),
            explicit_id: false,
            left_wrapped: false,
            right_wrapped: false,
            hint_style: HintStyle::Inline,
        }
    }
}

/// A deletion: text hidden on the card front, optionally numbered and hinted.
#[derive(Debug, Clone)]
pub struct Cloze {
    inner: Content,
    id: Option<u32>,
    hint: Option<String>,
    syntax: ClozeSyntax,
    source: SourceText,
}

impl PartialEq for Cloze {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner && self.id == other.id && self.hint == other.hint
    }
}

impl Cloze {
    pub const LEFT: u8 = b'{';
    pub const RIGHT: u8 = b'}';
    pub const ID_SEPARATORS: [u8; 2] = [b':', b'|'];
    pub const HINT_SEP: &'static str = "::";
    pub const WRAPPED_RIGHT: &'static str = "[[}]]";
    pub const WRAPPED_HINT_OPEN: &'static str = "[[::";

    pub fn new(inner: Content) -> Self {
        Self {
            inner,
            id: None,
            hint: None,
            syntax: ClozeSyntax::default(),
            source: SourceText::none(),
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self.syntax.explicit_id = true;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub(crate) fn from_parts(
        inner: Content,
        id: Option<u32>,
        hint: Option<String>,
        syntax: ClozeSyntax,
        source: String,
    ) -> Self {
        Self {
            inner,
            id,
            hint,
            syntax,
            source: SourceText::captured(source),
        }
    }

    pub fn inner(&self) -> &Content {
        &self.inner
    }

    pub fn id(&self) -> Option<u32> {
        self.id
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn syntax(&self) -> ClozeSyntax {
        self.syntax
    }

    /// The card number the cloze belongs to; 1 when no id was ever given.
    pub fn number(&self) -> u32 {
        self.id.unwrap_or(1)
    }

    fn left_core(&self) -> String {
        let mut core = String::from("{");
        if let (true, Some(id)) = (self.syntax.explicit_id, self.id) {
            if self.syntax.letter_c {
                core.push('c');
            }
            core.push_str(&id.to_string());
            if let Some(sep) = self.syntax.separator {
                core.push(sep);
            }
        }
        core
    }

    fn right_core(&self) -> String {
        match (&self.hint, self.syntax.hint_style) {
            (Some(hint), HintStyle::InCloser) => format!("::{hint}}}"),
            _ => "}".to_string(),
        }
    }

    fn right_wrapped(&self) -> bool {
        self.syntax.right_wrapped || (self.hint.is_some() && self.syntax.hint_style == HintStyle::InCloser)
    }

    /// `{{cN::html}}`, the marker Anki's cloze note type reads.
    fn anki_marker(id: u32, inner_html: &str, hint: Option<&str>) -> String {
        let hint = hint
            .map(|h| format!("{}{}", Self::HINT_SEP, escape::text(h)))
            .unwrap_or_default();
        format!("{{{{c{id}::{inner_html}{hint}}}}}")
    }

    /// Brackets rendered as text, or as page references where they were wrapped.
    fn inert_html(&self, ctx: &RenderContext<'_>) -> String {
        let bracket = |core: String, wrapped: bool| {
            if wrapped {
                PageReference::new(&core).to_html(ctx)
            } else {
                escape::text(&core)
            }
        };
        let mut html = bracket(self.left_core(), self.syntax.left_wrapped);
        html.push_str(&self.inner.to_html(ctx));
        if let Some(hint) = &self.hint {
            match self.syntax.hint_style {
                HintStyle::Inline => html.push_str(&escape::text(&format!("::{hint}"))),
                HintStyle::Wrapped => html.push_str(&bracket(format!("::{hint}"), true)),
                HintStyle::InCloser => {}
            }
        }
        html.push_str(&bracket(self.right_core(), self.right_wrapped()));
        html
    }

    fn page_html(&self, page: &PageReference, mode: PagerefCloze, ctx: &RenderContext<'_>) -> String {
        let id = self.number();
        match (mode, page.namespace()) {
            (PagerefCloze::Outside, _) => Self::anki_marker(id, &page.to_html(ctx), None),
            (PagerefCloze::BaseOnly, Some(namespace)) => {
                let base = Self::anki_marker(id, &escape::text(&page.basename()), None);
                page.html_with_display(&format!("{}{}{base}", escape::text(&namespace), PageReference::NAMESPACE_SEP))
            }
            (PagerefCloze::Inside | PagerefCloze::BaseOnly, _) => {
                page.html_with_display(&Self::anki_marker(id, &escape::text(&page.title()), None))
            }
        }
    }
}

impl Markup for Cloze {
    fn to_source_text(&self) -> String {
        self.source.or_else(|| {
            let mut out = self.left_core();
            if self.syntax.left_wrapped {
                out = format!("[[{out}]]");
            }
            out.push_str(&self.inner.to_source_text());
            if let Some(hint) = &self.hint {
                match self.syntax.hint_style {
                    HintStyle::Inline => out.push_str(&format!("::{hint}")),
                    HintStyle::Wrapped => out.push_str(&format!("[[::{hint}]]")),
                    HintStyle::InCloser => {}
                }
            }
            let right = self.right_core();
            if self.right_wrapped() {
                out.push_str(&format!("[[{right}]]"));
            } else {
                out.push_str(&right);
            }
            out
        })
    }

    fn to_html(&self, ctx: &RenderContext<'_>) -> String {
        if !ctx.options.proc_cloze {
            return self.inert_html(ctx);
        }
        if let (None, Some(page)) = (&self.hint, self.inner.single_page_ref()) {
            return self.page_html(page, ctx.options.pageref_cloze, ctx);
        }
        Self::anki_marker(self.number(), &self.inner.to_html(ctx), self.hint.as_deref())
    }

    fn tags(&self) -> Vec<String> {
        self.inner.tags()
    }

    fn child_contents(&self) -> Vec<&Content> {
        vec![&self.inner]
    }
}

/// Gives every cloze without an id the smallest positive id not yet taken, left to right.
pub fn assign_cloze_ids<'a>(clozes: impl IntoIterator<Item = &'a mut Cloze>) {
    let mut clozes: Vec<&mut Cloze> = clozes.into_iter().collect();
    let mut taken: HashSet<u32> = clozes.iter().filter_map(|c| c.id).collect();
    let mut next = 1;
    for cloze in clozes.iter_mut().filter(|c| c.id.is_none()) {
        while taken.contains(&next) {
            next += 1;
        }
        cloze.id = Some(next);
        taken.insert(next);
    }
}
