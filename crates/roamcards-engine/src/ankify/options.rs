//! Conversion defaults and the per-block overrides written as tags.
//!
//! A block overrides a default with a tag such as `#[[ankify: deck=Spanish]]`.
//! The prefix may itself be a page reference (`[[ankify]]:`) and the value may
//! be quoted. The first matching tag wins, searching the block's own tags
//! before its ancestors'. A value that doesn't parse is logged and the default
//! applies.

use std::collections::BTreeMap;

use log::warn;

use crate::cards::{CardOptions, ParentCount};
use crate::error::OptionValueError;
use crate::render::{PagerefCloze, RenderOptions};

pub const DEFAULT_BASIC: &str = "Roam Basic";
pub const DEFAULT_CLOZE: &str = "Roam Cloze";

/// Field receiving the block uid, when the note type has one.
pub const UID_FIELD: &str = "uid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnkifyOptions {
    pub deck: String,
    pub note_basic: String,
    pub note_cloze: String,
    pub pageref_cloze: PagerefCloze,
    pub tag_ankify: String,
    pub tag_dont_ankify: Option<String>,
    pub tag_ankify_root: Option<String>,
    pub num_parents: ParentCount,
    pub include_page: bool,
    pub max_depth: Option<usize>,
    pub tags_from_attr: bool,
    /// Prefixes that mark a tag as an option override.
    pub option_keys: Vec<String>,
    /// Field names of each known note type, in order.
    pub field_names: BTreeMap<String, Vec<String>>,
}

impl Default for AnkifyOptions {
    fn default() -> Self {
        let field_names = [
            (DEFAULT_BASIC, vec!["Front", "Back", "Extra", UID_FIELD]),
            (DEFAULT_CLOZE, vec!["Text", "Extra", UID_FIELD]),
        ]
        .into_iter()
        .map(|(note, fields)| (note.to_string(), fields.into_iter().map(String::from).collect()))
        .collect();
        Self {
            deck: "Default".to_string(),
            note_basic: DEFAULT_BASIC.to_string(),
            note_cloze: DEFAULT_CLOZE.to_string(),
            pageref_cloze: PagerefCloze::Outside,
            tag_ankify: "ankify".to_string(),
            tag_dont_ankify: Some("dont-ankify".to_string()),
            tag_ankify_root: Some("ankify-root".to_string()),
            num_parents: ParentCount::Count(0),
            include_page: false,
            max_depth: None,
            tags_from_attr: false,
            option_keys: vec!["ankify".to_string(), "ankify_roam".to_string()],
            field_names,
        }
    }
}

/// The value of `option` if `tag` is an override for it.
///
/// Accepts `{key}:{option}={value}` and `[[{key}]]:{option}={value}`, with any
/// whitespace after the colon and at most one space either side of `=`.
pub fn option_value<'t>(tag: &'t str, keys: &[String], option: &str) -> Option<&'t str> {
    let rest = tag.strip_prefix("[[").unwrap_or(tag);
    keys.iter()
        .filter_map(|key| rest.strip_prefix(key.as_str()))
        .find_map(|rest| value_after_key(rest, option))
}

fn value_after_key<'t>(rest: &'t str, option: &str) -> Option<&'t str> {
    let rest = rest.strip_prefix("]]").unwrap_or(rest);
    let rest = rest.strip_prefix(':')?.trim_start();
    let rest = rest.strip_prefix(option)?;
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    let rest = rest.strip_prefix('=')?;
    let value = rest.strip_prefix(' ').unwrap_or(rest);
    Some(unquote(value))
}

fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn parse_bool(option: &'static str, value: &str) -> Result<bool, OptionValueError> {
    match value {
        "True" | "true" => Ok(true),
        "False" | "false" => Ok(false),
        other => Err(OptionValueError {
            option,
            value: other.to_string(),
        }),
    }
}

fn parse_depth(value: &str) -> Result<Option<usize>, OptionValueError> {
    if value == "None" {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| OptionValueError {
        option: "max-depth",
        value: value.to_string(),
    })
}

/// Options in effect for one block, after its overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOptions {
    pub note: Option<String>,
    pub deck: String,
    pub suspend: Option<bool>,
    pub cards: CardOptions,
}

impl AnkifyOptions {
    fn lookup<'t>(&self, tags: &'t [String], option: &str) -> Option<&'t str> {
        tags.iter()
            .find_map(|tag| option_value(tag, &self.option_keys, option))
    }

    fn parsed<T>(
        &self,
        uid: &str,
        tags: &[String],
        option: &str,
        parse: impl FnOnce(&str) -> Result<T, OptionValueError>,
    ) -> Option<T> {
        let value = self.lookup(tags, option)?;
        match parse(value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!("Block {uid}: ignoring {err}");
                None
            }
        }
    }

    /// Applies the overrides found in `tags` of block `uid` on top of these defaults.
    pub fn for_block(&self, uid: &str, tags: &[String]) -> BlockOptions {
        let pageref_cloze = self
            .parsed(uid, tags, "pageref-cloze", |v| v.parse())
            .unwrap_or(self.pageref_cloze);
        let num_parents = self
            .parsed(uid, tags, "num-parents", |v| v.parse())
            .unwrap_or(self.num_parents);
        let include_page = self
            .parsed(uid, tags, "include-page", |v| parse_bool("include-page", v))
            .unwrap_or(self.include_page);
        let max_depth = self
            .parsed(uid, tags, "max-depth", parse_depth)
            .unwrap_or(self.max_depth);
        let suspend = self.parsed(uid, tags, "suspend", |v| parse_bool("suspend", v));

        BlockOptions {
            note: self.lookup(tags, "note").map(str::to_string),
            deck: self
                .lookup(tags, "deck")
                .filter(|d| !d.is_empty())
                .map_or_else(|| self.deck.clone(), str::to_string),
            suspend,
            cards: CardOptions {
                num_parents,
                include_page,
                max_depth,
                root_tag: self.tag_ankify_root.clone(),
                tags_from_attr: self.tags_from_attr,
                render: RenderOptions {
                    proc_cloze: false,
                    pageref_cloze,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn keys() -> Vec<String> {
        AnkifyOptions::default().option_keys
    }

    #[rstest]
    #[case("[[ankify_roam]]:note='Roam Basic'", Some("Roam Basic"))]
    #[case("ankify: note=Roam Basic", Some("Roam Basic"))]
    #[case("ankify:note = \"Roam Basic\"", Some("Roam Basic"))]
    #[case("[[ankify]]:  note=x", Some("x"))]
    #[case("ankify: deck=Roam Basic", None)]
    #[case("other: note=Roam Basic", None)]
    #[case("ankify note=Roam Basic", None)]
    fn reads_note_option(#[case] tag: &str, #[case] expected: Option<&str>) {
        assert_eq!(option_value(tag, &keys(), "note"), expected);
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let options = AnkifyOptions::default();
        let block = options.for_block("question1", &tags(&["ankify", "page"]));
        assert_eq!(block.deck, "Default");
        assert_eq!(block.note, None);
        assert_eq!(block.suspend, None);
        assert_eq!(block.cards.num_parents, ParentCount::Count(0));
        assert_eq!(block.cards.root_tag.as_deref(), Some("ankify-root"));
    }

    #[test]
    fn nearest_override_wins() {
        let options = AnkifyOptions::default();
        let block = options.for_block(
            "question1",
            &tags(&[
                "ankify: num-parents=all",
                "ankify: deck=Spanish",
                "ankify: num-parents=2",
                "ankify: max-depth=None",
                "ankify: suspend=True",
                "ankify: pageref-cloze=base_only",
            ]),
        );
        assert_eq!(block.deck, "Spanish");
        assert_eq!(block.suspend, Some(true));
        assert_eq!(block.cards.num_parents, ParentCount::All);
        assert_eq!(block.cards.max_depth, None);
        assert_eq!(block.cards.render.pageref_cloze, PagerefCloze::BaseOnly);
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let options = AnkifyOptions {
            num_parents: ParentCount::Count(2),
            include_page: true,
            max_depth: Some(3),
            ..AnkifyOptions::default()
        };
        let block = options.for_block(
            "question1",
            &tags(&[
                "ankify: max-depth=deep",
                "ankify: include-page=maybe",
                "ankify: num-parents=x",
                "ankify: pageref-cloze=around",
                "ankify: suspend=yes",
            ]),
        );
        assert_eq!(block.cards.max_depth, Some(3));
        assert!(block.cards.include_page);
        assert_eq!(block.cards.num_parents, ParentCount::Count(2));
        assert_eq!(block.cards.render.pageref_cloze, PagerefCloze::Outside);
        assert_eq!(block.suspend, None);
    }
}
