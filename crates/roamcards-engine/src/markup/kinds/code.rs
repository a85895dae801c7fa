use crate::markup::{Markup, SourceText};
use crate::parsing::Found;
use crate::parsing::cursor::Cursor;
use crate::render::{RenderContext, escape};

/// Languages Roam offers for code blocks. Anything else on the opening line is code.
const LANGUAGES: &[&str] = &[
    "bash", "c", "clojure", "common lisp", "cpp", "csharp", "css", "dart", "diff", "elixir",
    "go", "haskell", "html", "java", "javascript", "json", "julia", "kotlin", "latex", "lua",
    "markdown", "objective-c", "perl", "php", "plain text", "python", "r", "ruby", "rust",
    "scala", "shell", "sql", "swift", "typescript", "xml", "yaml",
];

/// ```` ```lang\ncode``` ````. Suppresses all other parsing inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    code: String,
    language: Option<String>,
    source: SourceText,
}

impl CodeBlock {
    pub const FENCE: &'static [u8; 3] = b"```";

    pub fn new(code: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            code: code.into(),
            language: language.map(str::to_string),
            source: SourceText::none(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Splits the fenced body into language and code. The language line only
    /// counts when it names a known language and is followed by a newline.
    fn split_language(body: &str) -> (Option<&str>, &str) {
        match body.split_once('\n') {
            Some((first, rest)) if LANGUAGES.contains(&first) => (Some(first), rest),
            _ => (None, body),
        }
    }

    pub(crate) fn find(text: &str) -> Vec<Found> {
        let mut out = vec![];
        let mut cur = Cursor::new(text);
        while cur.seek("```") {
            let start = cur.pos();
            cur.bump_n(Self::FENCE.len());
            let body_start = cur.pos();
            if !cur.seek("```") {
                break;
            }
            let (language, code) = Self::split_language(cur.since(body_start));
            cur.bump_n(Self::FENCE.len());
            let block = CodeBlock {
                code: code.to_string(),
                language: language.map(str::to_string),
                source: SourceText::captured(cur.since(start)),
            };
            out.push(Found::new(start, cur.pos(), block));
        }
        out
    }
}

impl Markup for CodeBlock {
    fn to_source_text(&self) -> String {
        self.source.or_else(|| match &self.language {
            Some(language) => format!("```{language}\n{}```", self.code),
            None => format!("```{}```", self.code),
        })
    }

    fn to_html(&self, _ctx: &RenderContext<'_>) -> String {
        format!("<pre><code>{}</code></pre>", escape::code(&self.code))
    }
}

/// `` `code` ``.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeInline {
    code: String,
}

impl CodeInline {
    pub const TICK: u8 = b'`';

    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub(crate) fn find(text: &str) -> Vec<Found> {
        let mut out = vec![];
        let mut cur = Cursor::new(text);
        while cur.seek("`") {
            let start = cur.pos();
            cur.bump();
            let inner_start = cur.pos();
            if !cur.seek("`") {
                break;
            }
            if cur.pos() == inner_start {
                // "``" opens nothing; retry from the second tick
                continue;
            }
            let code = cur.since(inner_start).to_string();
            cur.bump();
            out.push(Found::new(start, cur.pos(), CodeInline { code }));
        }
        out
    }
}

impl Markup for CodeInline {
    fn to_source_text(&self) -> String {
        format!("`{}`", self.code)
    }

    fn to_html(&self, _ctx: &RenderContext<'_>) -> String {
        format!("<code>{}</code>", escape::code(&self.code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{Content, MarkupNode, NodeKind};
    use crate::parsing::parse_with;
    use pretty_assertions::assert_eq;

    #[test]
    fn code_block_with_language() {
        let block: CodeBlock = "```javascript\nx = () => return `derp`\n```".parse().unwrap();
        assert_eq!(block.language(), Some("javascript"));
        assert_eq!(block.code(), "x = () => return `derp`\n");
    }

    #[test]
    fn code_block_without_language_keeps_leading_newline() {
        let block: CodeBlock = "```\ndef foo():\n    return 1\n```".parse().unwrap();
        assert_eq!(block.language(), None);
        assert_eq!(block.code(), "\ndef foo():\n    return 1\n");
    }

    #[test]
    fn unknown_first_line_is_code() {
        let block: CodeBlock = "```not a language\nx```".parse().unwrap();
        assert_eq!(block.language(), None);
        assert_eq!(block.code(), "not a language\nx");
    }

    #[test]
    fn code_block_html() {
        let block: CodeBlock = "```clojure\n(def x 1)```".parse().unwrap();
        assert_eq!(block.to_html(&RenderContext::default()), "<pre><code>(def x 1)</code></pre>");
    }

    #[test]
    fn code_block_shields_markup() {
        let html = Content::parse("```**not bold** [[not a ref]]```").to_html(&RenderContext::default());
        assert_eq!(html, "<pre><code>&#42;&#42;not bold&#42;&#42; [[not a ref]]</code></pre>");
    }

    #[test]
    fn unclosed_fence_is_text() {
        let content = parse_with("```open", &[NodeKind::CodeBlock]);
        assert_eq!(content.nodes(), &[MarkupNode::text("```open")]);
    }

    #[test]
    fn inline_code() {
        let content = parse_with("a `b` c `d", &[NodeKind::CodeInline]);
        assert_eq!(
            content.nodes(),
            &[
                MarkupNode::text("a "),
                CodeInline::new("b").into(),
                MarkupNode::text(" c `d"),
            ]
        );
    }

    #[test]
    fn inline_code_hides_references() {
        let content = Content::parse("`[[page]]`");
        assert_eq!(content.nodes(), &[CodeInline::new("[[page]]").into()]);
        assert!(content.tags().is_empty());
    }

    #[test]
    fn inline_code_html() {
        let inline = CodeInline::new("a < b");
        assert_eq!(inline.to_html(&RenderContext::default()), "<code>a &lt; b</code>");
    }
}
