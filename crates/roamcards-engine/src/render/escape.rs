//! HTML escaping for node templates.
//!
//! Attribute values and code bodies also entity-encode the emphasis delimiters
//! (doubled `*`, `_`, `^` and every backtick) so the emphasis pass leaves them alone.

/// Text content: `&`, `<` and `>` escaped.
pub fn text(s: &str) -> String {
    html_escape::encode_text(s).into_owned()
}

/// A double-quoted attribute value.
pub fn attr(s: &str) -> String {
    shield(&html_escape::encode_double_quoted_attribute(s))
}

/// The body of a `<code>` element.
pub fn code(s: &str) -> String {
    shield(&html_escape::encode_text(s))
}

fn shield(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (i, &c) in chars.iter().enumerate() {
        let doubled = i.checked_sub(1).is_some_and(|p| chars[p] == c)
            || chars.get(i + 1) == Some(&c);
        match c {
            '`' => out.push_str("&#96;"),
            '*' if doubled => out.push_str("&#42;"),
            '_' if doubled => out.push_str("&#95;"),
            '^' if doubled => out.push_str("&#94;"),
            _ => out.push(c),
        }
    }
    out
}
