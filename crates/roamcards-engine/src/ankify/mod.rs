//! # Note assembly
//!
//! Picks the blocks tagged for conversion and turns each into a [`Note`]: note
//! type, deck, fields rendered by the card assembler, tags and suspend flag.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::cards::CardAssembler;
use crate::error::AnkifyError;
use crate::markup::NodeKind;
use crate::tree::{BlockId, Graph, TagQuery};

mod options;

pub use options::{AnkifyOptions, BlockOptions, DEFAULT_BASIC, DEFAULT_CLOZE, UID_FIELD, option_value};

/// One flashcard note, shaped the way Anki's note API expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub deck_name: String,
    pub model_name: String,
    pub fields: BTreeMap<String, String>,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend: Option<bool>,
}

/// Notes built from a graph plus the uid and error of each block that failed.
#[derive(Debug, Default)]
pub struct AnkifyReport {
    pub notes: Vec<Note>,
    pub failed: Vec<(String, AnkifyError)>,
}

/// Whether a note type renders as a cloze card.
pub fn is_cloze_type(note_type: &str) -> bool {
    note_type.contains("cloze") || note_type.contains("Cloze")
}

/// Anki tags can't hold whitespace.
fn note_tag(tag: &str) -> String {
    tag.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Drops ASCII control characters except whitespace.
fn strip_non_printable(html: &str) -> String {
    html.chars()
        .filter(|c| !c.is_ascii_control() || matches!(c, '\t' | '\n' | '\r' | '\x0b' | '\x0c'))
        .collect()
}

pub struct BlockAnkifier<'g> {
    graph: &'g Graph,
    options: AnkifyOptions,
}

impl<'g> BlockAnkifier<'g> {
    pub fn new(graph: &'g Graph, options: AnkifyOptions) -> Self {
        Self { graph, options }
    }

    pub fn options(&self) -> &AnkifyOptions {
        &self.options
    }

    fn query(&self) -> TagQuery {
        TagQuery::default().from_attr(self.options.tags_from_attr)
    }

    /// Tagged with the ankify tag itself, and nothing up the tree says not to.
    pub fn is_block_to_ankify(&self, id: BlockId) -> bool {
        let own = self.graph.tags(id, TagQuery::own().from_attr(self.options.tags_from_attr));
        if !own.contains(&self.options.tag_ankify) {
            return false;
        }
        match &self.options.tag_dont_ankify {
            Some(dont) => !self.graph.tags(id, self.query()).contains(dont),
            None => true,
        }
    }

    pub fn ankify(&self, id: BlockId) -> Result<Note, AnkifyError> {
        let block = self.graph.block(id);
        if self.graph.page_of(id).is_none() {
            return Err(AnkifyError::Detached {
                uid: block.uid().to_string(),
            });
        }
        let tags = self.graph.tags(id, self.query().deduped());
        let mut resolved = self.options.for_block(block.uid(), &tags);

        let model_name = match resolved.note.take() {
            Some(note) => note,
            None if block.content().contains_kind(NodeKind::Cloze, true) => self.options.note_cloze.clone(),
            None => self.options.note_basic.clone(),
        };
        let field_names = self
            .options
            .field_names
            .get(&model_name)
            .ok_or_else(|| AnkifyError::UnknownNoteType {
                note_type: model_name.clone(),
            })?;

        let cloze = is_cloze_type(&model_name);
        resolved.cards.render.proc_cloze = cloze;
        let assembler = CardAssembler::new(self.graph, resolved.cards);
        let htmls = if cloze {
            vec![assembler.front_html(id)]
        } else {
            let card = assembler.card(id);
            vec![card.front, card.back]
        };

        let mut fields: BTreeMap<String, String> = field_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let html = htmls.get(i).map(|h| strip_non_printable(h)).unwrap_or_default();
                (name.clone(), html)
            })
            .collect();
        if field_names.iter().any(|f| f == UID_FIELD) {
            fields.insert(UID_FIELD.to_string(), block.uid().to_string());
        }
        debug!("Ankified block {} as '{model_name}'", block.uid());

        Ok(Note {
            deck_name: resolved.deck,
            model_name,
            fields,
            tags: tags.iter().map(|t| note_tag(t)).collect(),
            suspend: resolved.suspend,
        })
    }
}

/// Converts every selected block of the graph. A failing block is logged and
/// recorded; the rest still convert.
pub fn ankify_graph(graph: &Graph, options: AnkifyOptions) -> AnkifyReport {
    let ankifier = BlockAnkifier::new(graph, options);
    let selected = graph.query_many(|id| ankifier.is_block_to_ankify(id));
    info!(
        "Found {} blocks with {} tag",
        selected.len(),
        ankifier.options().tag_ankify
    );

    let mut report = AnkifyReport::default();
    for id in selected {
        match ankifier.ankify(id) {
            Ok(note) => report.notes.push(note),
            Err(err) => {
                let uid = graph.block(id).uid().to_string();
                warn!("Failed ankifying block {uid}: {err}");
                report.failed.push((uid, err));
            }
        }
    }
    info!(
        "Results: {} notes built, {} failed",
        report.notes.len(),
        report.failed.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{BlockRecord, PageRecord};
    use pretty_assertions::assert_eq;

    fn graph(blocks: Vec<BlockRecord>) -> Graph {
        Graph::from_pages(vec![PageRecord::new("page", blocks)])
    }

    fn my_basic() -> AnkifyOptions {
        AnkifyOptions {
            deck: "my deck".into(),
            note_basic: "my basic".into(),
            field_names: [("my basic".to_string(), vec!["Front".to_string(), "Back".to_string()])]
                .into_iter()
                .collect(),
            ..AnkifyOptions::default()
        }
    }

    #[test]
    fn basic_note() {
        let graph = graph(vec![
            BlockRecord::new("question1", "question")
                .with_children(vec![BlockRecord::new("answer001", "answer")]),
        ]);
        let id = graph.block_by_uid("question1").unwrap();
        let note = BlockAnkifier::new(&graph, my_basic()).ankify(id).unwrap();
        let expected = Note {
            deck_name: "my deck".into(),
            model_name: "my basic".into(),
            fields: [
                ("Front".to_string(), r#"<div class="front-side">question</div>"#.to_string()),
                ("Back".to_string(), r#"<div class="back-side">answer</div>"#.to_string()),
            ]
            .into_iter()
            .collect(),
            tags: vec!["page".into()],
            suspend: None,
        };
        assert_eq!(note, expected);
    }

    #[test]
    fn cloze_block_picks_cloze_note_type() {
        let graph = graph(vec![BlockRecord::new("question1", "{Paris} is the capital #ankify")]);
        let id = graph.block_by_uid("question1").unwrap();
        let note = BlockAnkifier::new(&graph, AnkifyOptions::default())
            .ankify(id)
            .unwrap();
        assert_eq!(note.model_name, "Roam Cloze");
        assert_eq!(
            note.fields["Text"],
            concat!(
                r#"<div class="front-side">{{c1::Paris}} is the capital "#,
                r#"<span data-tag="ankify" class="rm-page-ref rm-page-ref-tag">#ankify</span></div>"#
            )
        );
        assert_eq!(note.fields["Extra"], "");
        assert_eq!(note.fields["uid"], "question1");
        assert_eq!(note.tags, vec!["ankify".to_string(), "page".to_string()]);
    }

    #[test]
    fn note_option_overrides_inference() {
        let graph = graph(vec![BlockRecord::new(
            "question1",
            "{Paris} #ankify #[[ankify: note=Roam Basic]] #[[ankify: suspend=True]]",
        )]);
        let id = graph.block_by_uid("question1").unwrap();
        let note = BlockAnkifier::new(&graph, AnkifyOptions::default())
            .ankify(id)
            .unwrap();
        assert_eq!(note.model_name, "Roam Basic");
        assert_eq!(note.suspend, Some(true));
        assert!(note.fields["Front"].contains("{Paris}"), "{}", note.fields["Front"]);
        assert!(note.tags.contains(&"ankify:_note=Roam_Basic".to_string()));
    }

    #[test]
    fn unknown_note_type_fails() {
        let graph = graph(vec![BlockRecord::new("question1", "q #[[ankify: note=Mystery]]")]);
        let id = graph.block_by_uid("question1").unwrap();
        let err = BlockAnkifier::new(&graph, AnkifyOptions::default())
            .ankify(id)
            .unwrap_err();
        assert_eq!(
            err,
            AnkifyError::UnknownNoteType {
                note_type: "Mystery".into()
            }
        );
    }

    #[test]
    fn selection_respects_dont_ankify() {
        let graph = graph(vec![
            BlockRecord::new("selected1", "q1 #ankify"),
            BlockRecord::new("skipped01", "parent #dont-ankify")
                .with_children(vec![BlockRecord::new("skipped02", "q2 #ankify")]),
            BlockRecord::new("untagged1", "q3")
                .with_children(vec![BlockRecord::new("inherit01", "child of q3")]),
        ]);
        let ankifier = BlockAnkifier::new(&graph, AnkifyOptions::default());
        let selected: Vec<&str> = graph
            .query_many(|id| ankifier.is_block_to_ankify(id))
            .into_iter()
            .map(|id| graph.block(id).uid())
            .collect();
        assert_eq!(selected, vec!["selected1"]);
    }

    #[test]
    fn failures_do_not_stop_the_rest() {
        let graph = graph(vec![
            BlockRecord::new("good00001", "q1 #ankify"),
            BlockRecord::new("bad000001", "q2 #ankify #[[ankify: note=Mystery]]"),
        ]);
        let report = ankify_graph(&graph, AnkifyOptions::default());
        assert_eq!(report.notes.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "bad000001");
    }

    #[test]
    fn unparseable_override_keeps_the_note() {
        let graph = graph(vec![
            BlockRecord::new("question1", "q #ankify #[[ankify:max-depth=deep]]").with_children(vec![
                BlockRecord::new("answer001", "a").with_children(vec![BlockRecord::new("detail001", "d")]),
            ]),
        ]);
        let report = ankify_graph(&graph, AnkifyOptions::default());
        assert!(report.failed.is_empty(), "{:?}", report.failed);
        assert_eq!(report.notes.len(), 1);
        assert_eq!(
            report.notes[0].fields["Back"],
            r#"<div class="back-side list"><ul><li>a</li><ul><li>d</li></ul></ul></div>"#
        );
    }

    #[test]
    fn note_serializes_with_anki_field_names() {
        let note = Note {
            deck_name: "d".into(),
            model_name: "m".into(),
            fields: BTreeMap::new(),
            tags: vec![],
            suspend: None,
        };
        assert_eq!(
            serde_json::to_string(&note).unwrap(),
            r#"{"deckName":"d","modelName":"m","fields":{},"tags":[]}"#
        );
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(strip_non_printable("a\u{7}b\tc\u{7f}"), "ab\tc");
    }
}
