//! Pipeline tests: whole blocks through every pass.

mod invariants;

use pretty_assertions::assert_eq;

use crate::markup::kinds::*;
use crate::markup::{Content, MarkupNode, NodeKind};
use crate::parsing::{PARSE_ORDER, kinds_after, parse, parse_with};

/// One line naming each node's kind, for inline snapshots.
fn kinds(content: &Content) -> String {
    content
        .iter()
        .map(|n| n.kind().name())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[test]
fn mixed_block() {
    let content = parse(
        "{{[[TODO]]}} something [this]([[This]]) [[Saturday]] about ((ZtmwW4k32)) #Important",
    );
    assert_eq!(
        content.nodes(),
        &[
            Checkbox::new(false).into(),
            MarkupNode::text(" something "),
            Alias::new("this", AliasDestination::Page(PageReference::new("This"))).into(),
            MarkupNode::text(" "),
            PageReference::new("Saturday").into(),
            MarkupNode::text(" about "),
            BlockReference::new("ZtmwW4k32").into(),
            MarkupNode::text(" "),
            PageTag::new("Important").into(),
        ]
    );
    let mut tags = content.tags();
    tags.sort();
    assert_eq!(tags, vec!["Important", "Saturday", "TODO", "This"]);
}

#[test]
fn code_block_swallows_everything() {
    let content = parse("```clojure\nwww.google.com\n[[page]]\n((E-j9hXq0m))```");
    assert_eq!(
        content.nodes(),
        &[CodeBlock::new("www.google.com\n[[page]]\n((E-j9hXq0m))", Some("clojure")).into()]
    );
    assert!(content.tags().is_empty());
}

#[test]
fn refs_and_tags() {
    let content = parse("Some block refs: ((5xB8JO-xg)) #temp #[[anki_note]]");
    assert_eq!(
        content.nodes(),
        &[
            MarkupNode::text("Some block refs: "),
            BlockReference::new("5xB8JO-xg").into(),
            MarkupNode::text(" "),
            PageTag::new("temp").into(),
            MarkupNode::text(" "),
            PageTag::new("anki_note").into(),
        ]
    );
}

#[test]
fn tags_of_sentence() {
    let mut tags = parse("Something with [[page refs]] and #some #[[tags]]").tags();
    tags.sort();
    assert_eq!(tags, vec!["page refs", "some", "tags"]);
}

#[test]
fn cloze_page_and_url_in_one_block() {
    let content = parse("{c1:Paris} is the capital of [[France]] see https://en.wikipedia.org/wiki/Paris");
    insta::assert_snapshot!(kinds(&content), @"Cloze | PlainText | PageReference | PlainText | Url");
}

#[test]
fn attribute_with_value() {
    let content = parse("source:: [[Book]] p. 12");
    insta::assert_snapshot!(kinds(&content), @"Attribute | PlainText | PageReference | PlainText");
}

#[test]
fn embed_view_button_precedence() {
    let content = parse("{{embed: ((hh2wTNsMz))}} {{query: {and: [[a]]}}} {{word-count}}");
    insta::assert_snapshot!(kinds(&content), @"Embed | PlainText | View | PlainText | Button");
}

#[test]
fn image_is_not_an_alias() {
    let content = parse("![alt](https://x.org/a.png) and [alias](https://x.org)");
    insta::assert_snapshot!(kinds(&content), @"Image | PlainText | Alias");
}

#[test]
fn page_ref_titles_only_parse_references() {
    let content = parse_with("#tag inside", &[NodeKind::PageReference]);
    assert_eq!(content.nodes(), &[MarkupNode::text("#tag inside")]);
}

#[test]
fn block_quote_parses_the_rest() {
    let content = parse("> {c1:quoted} [[page]]");
    let [MarkupNode::BlockQuote(quote)] = content.nodes() else {
        panic!("expected a single quote, got {content:?}");
    };
    insta::assert_snapshot!(kinds(quote.content()), @"Cloze | PlainText | PageReference");
}

#[test]
fn kinds_after_slices_parse_order() {
    assert_eq!(kinds_after(NodeKind::BlockQuote).len(), PARSE_ORDER.len() - 1);
    assert_eq!(kinds_after(NodeKind::Url), &[] as &[NodeKind]);
    assert_eq!(kinds_after(NodeKind::Cloze)[0], NodeKind::Image);
}

#[test]
fn empty_text_is_empty_content() {
    assert!(parse("").is_empty());
}
