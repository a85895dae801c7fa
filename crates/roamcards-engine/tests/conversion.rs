use std::path::PathBuf;

use pretty_assertions::assert_eq;
use roamcards_engine::markup::Markup;
use roamcards_engine::{
    Alias, AliasDestination, AnkifyOptions, BlockReference, CardAssembler, CardOptions, Checkbox, Cloze, Content,
    Graph, MarkupNode, Note, PageReference, PageTag, PagerefCloze, RenderContext, RenderOptions, ankify_graph,
    load_export,
};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_graph() -> Graph {
    Graph::from_pages(load_export(&fixtures()).unwrap())
}

fn note<'a>(notes: &'a [Note], uid: &str) -> &'a Note {
    notes
        .iter()
        .find(|n| n.fields.get("uid").map(String::as_str) == Some(uid))
        .unwrap_or_else(|| panic!("no note for {uid}"))
}

#[test]
fn export_directory_to_notes() {
    let graph = fixture_graph();

    let report = ankify_graph(&graph, AnkifyOptions::default());

    assert!(report.failed.is_empty(), "{:?}", report.failed);
    let uids: Vec<&str> = report.notes.iter().map(|n| n.fields["uid"].as_str()).collect();
    assert_eq!(uids, vec!["cloze0001", "basic0001", "ser000001"]);
}

#[test]
fn basic_note_fields() {
    let report = ankify_graph(&fixture_graph(), AnkifyOptions::default());
    let basic = note(&report.notes, "basic0001");

    assert_eq!(basic.model_name, "Roam Basic");
    assert_eq!(basic.deck_name, "Default");
    assert_eq!(
        basic.fields["Front"],
        concat!(
            r#"<div class="front-side">What is hola? "#,
            r#"<span data-tag="ankify" class="rm-page-ref rm-page-ref-tag">#ankify</span></div>"#
        )
    );
    assert_eq!(basic.fields["Back"], r#"<div class="back-side">hello</div>"#);
    assert_eq!(basic.fields["Extra"], "");
    assert_eq!(basic.tags, vec!["ankify".to_string(), "Spanish".to_string()]);
}

#[test]
fn cloze_note_wraps_page_reference() {
    let report = ankify_graph(&fixture_graph(), AnkifyOptions::default());
    let cloze = note(&report.notes, "cloze0001");

    assert_eq!(cloze.model_name, "Roam Cloze");
    let text = &cloze.fields["Text"];
    assert!(
        text.starts_with(r#"<div class="front-side">The capital of Spain is {{c1::<span data-link-title="Madrid">"#),
        "{text}"
    );
    assert!(text.contains("</span>}} <span data-tag=\"ankify\""), "{text}");
    assert!(!cloze.fields.contains_key("Back"));
}

#[test]
fn inherited_override_shows_all_parents() {
    let report = ankify_graph(&fixture_graph(), AnkifyOptions::default());
    let ser = note(&report.notes, "ser000001");

    let front = &ser.fields["Front"];
    assert!(front.contains(r#"<li class="page-title parent parent-2 parent-top">"#), "{front}");
    assert!(front.contains(r#"<li class="block parent parent-1">Verbs "#), "{front}");
    assert!(front.contains(r#"<li class="block">ser means? "#), "{front}");
    assert_eq!(
        ser.fields["Back"],
        r#"<div class="back-side list"><ul><li>to be</li><li>permanent</li></ul></div>"#
    );
    assert!(ser.tags.contains(&"ankify:_num-parents=all".to_string()));
}

#[test]
fn mixed_block_parses_into_nodes() {
    let content = Content::parse(
        "{{[[TODO]]}} something [this]([[This]]) [[Saturday]] about ((abc123456)) #Important",
    );
    let expected = Content::new(vec![
        Checkbox::new(false).into(),
        MarkupNode::text(" something "),
        Alias::new("this", AliasDestination::Page(PageReference::new("This"))).into(),
        MarkupNode::text(" "),
        PageReference::new("Saturday").into(),
        MarkupNode::text(" about "),
        BlockReference::new("abc123456").into(),
        MarkupNode::text(" "),
        PageTag::new("Important").into(),
    ]);
    assert_eq!(content, expected);

    let mut tags = content.tags();
    tags.sort();
    assert_eq!(tags, vec!["Important", "Saturday", "TODO", "This"]);
}

#[test]
fn wrapped_and_plain_clozes_are_equal() {
    let plain: Cloze = "{c1:text}".parse().unwrap();
    let wrapped: Cloze = "[[{c1:]]text[[}]]".parse().unwrap();
    assert_eq!(plain, wrapped);
    assert_eq!(plain.id(), Some(1));
    assert_eq!(plain.inner(), &Content::text("text"));
}

#[test]
fn base_only_cloze_keeps_namespace_visible() {
    let cloze = Cloze::new(Content::new(vec![PageReference::new("namespace/base").into()])).with_id(1);
    let ctx = RenderContext::new(RenderOptions {
        proc_cloze: true,
        pageref_cloze: PagerefCloze::BaseOnly,
    });
    let html = cloze.to_html(&ctx);
    assert!(html.contains(r#"data-link-title="namespace/base""#), "{html}");
    assert!(html.contains(">namespace/{{c1::base}}</span>"), "{html}");
}

#[test]
fn back_side_depth_limit() {
    let graph = fixture_graph();
    let id = graph.block_by_uid("basic0001").unwrap();
    let options = CardOptions {
        max_depth: Some(1),
        ..CardOptions::default()
    };
    let card = CardAssembler::new(&graph, options).card(id);
    assert_eq!(card.back, r#"<div class="back-side">hello</div>"#);

    let verbs = graph.block_by_uid("verbs0001").unwrap();
    let back = CardAssembler::new(&graph, CardOptions {
        max_depth: Some(1),
        ..CardOptions::default()
    })
    .back_html(verbs);
    assert_eq!(back, r#"<div class="back-side list"><ul><li>ser means? <span data-tag="ankify" class="rm-page-ref rm-page-ref-tag">#ankify</span></li></ul></div>"#);
}

#[test]
fn cloze_ids_fill_gaps_left_to_right() {
    let content = Content::parse("{a} {c6:b} {c1:c} {d} {c3:e}");
    let ids: Vec<Option<u32>> = content
        .iter()
        .filter_map(|node| match node {
            MarkupNode::Cloze(cloze) => Some(cloze.id()),
            _ => None,
        })
        .collect();
    assert_eq!(ids, vec![Some(2), Some(6), Some(1), Some(4), Some(3)]);
}
