//! Inline emphasis over already-rendered HTML.

use std::sync::OnceLock;

use regex::Regex;

struct Rule {
    pattern: &'static str,
    replacement: &'static str,
}

const RULES: [Rule; 4] = [
    Rule {
        pattern: r"`([^`]+)`",
        replacement: "<code>${1}</code>",
    },
    Rule {
        pattern: r"\*\*(.+?)\*\*",
        replacement: "<b>${1}</b>",
    },
    Rule {
        pattern: r"__(.+?)__",
        replacement: "<em>${1}</em>",
    },
    Rule {
        pattern: r"\^\^(.+?)\^\^",
        replacement: r#"<span class="roam-highlight">${1}</span>"#,
    },
];

fn compiled() -> &'static [Regex] {
    static COMPILED: OnceLock<Vec<Regex>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|rule| Regex::new(rule.pattern).expect("Invalid emphasis regex"))
            .collect()
    })
}

/// Code, bold, italic and highlight, applied in that order.
pub fn apply(html: &str) -> String {
    let mut out = html.to_string();
    for (rule, re) in RULES.iter().zip(compiled()) {
        out = re.replace_all(&out, rule.replacement).into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("**bold** text", "<b>bold</b> text")]
    #[case("__it__", "<em>it</em>")]
    #[case("^^hi^^ there", r#"<span class="roam-highlight">hi</span> there"#)]
    #[case("a `b` c", "a <code>b</code> c")]
    #[case("**unclosed", "**unclosed")]
    #[case("**a** and **b**", "<b>a</b> and <b>b</b>")]
    fn emphasis(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(apply(input), expected);
    }

    #[test]
    fn shielded_delimiters_untouched() {
        assert_eq!(apply("&#42;&#42;x&#42;&#42;"), "&#42;&#42;x&#42;&#42;");
    }
}
