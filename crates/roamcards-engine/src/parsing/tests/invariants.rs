//! Properties that hold for any input.

use rstest::rstest;

use crate::markup::{Content, MarkupNode};
use crate::parsing::parse;

const SAMPLES: &[&str] = &[
    "",
    "plain text only",
    "{{[[TODO]]}} something [this]([[This]]) [[Saturday]] about ((ZtmwW4k32)) #Important",
    "{c1:Paris::city} and {London} and [[{c3:]]Rome[[}]]",
    "[[{]]text[[::hint in page ref]][[}]]",
    "> quoted {cloze} with `code`",
    "```python\nprint('**x**')\n``` after",
    "attribute:::: text #tag",
    "unbalanced [[page and {brace and ((short)) and `tick",
    "nested [[a [[b [[c]]]]]] #[[d [[e]]]]",
    "{{embed: ((hh2wTNsMz))}} {{[[query]]: {and: [[x]]}}} {{button:text}}",
    "![img](https://a.b/c.png) [alias](((ZtmwW4k32))) www.example.com.",
    "ünïcödé #täg [[pägé]] {clözé}",
];

fn assert_no_adjacent_text(content: &Content) {
    for pair in content.nodes().windows(2) {
        assert!(
            !matches!(pair, [MarkupNode::PlainText(_), MarkupNode::PlainText(_)]),
            "adjacent plain text in {content:?}"
        );
    }
    for node in content.nodes() {
        assert_ne!(node.as_text(), Some(""), "empty text node in {content:?}");
        for inner in node.child_contents() {
            assert_no_adjacent_text(inner);
        }
    }
}

#[rstest]
fn source_text_round_trips(#[values(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12)] idx: usize) {
    let text = SAMPLES[idx];
    assert_eq!(parse(text).to_source_text(), text);
}

#[rstest]
fn text_is_normalized(#[values(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12)] idx: usize) {
    assert_no_adjacent_text(&parse(SAMPLES[idx]));
}

#[rstest]
fn reparse_is_stable(#[values(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12)] idx: usize) {
    let once = parse(SAMPLES[idx]);
    let twice = parse(&once.to_source_text());
    assert_eq!(once, twice);
}
