use crate::markup::NodeKind;

/// Building a node from a string that is not exactly one node of that kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("invalid {kind} syntax: '{input}'")]
    Syntax { kind: NodeKind, input: String },
}

/// An option value (CLI flag, config key or per-block override) that can't be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value '{value}' for option '{option}'")]
pub struct OptionValueError {
    pub option: &'static str,
    pub value: String,
}

/// Failure to turn one block into a note. Siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnkifyError {
    #[error("no field names known for note type '{note_type}'")]
    UnknownNoteType { note_type: String },
    #[error("block {uid} is not attached to a page")]
    Detached { uid: String },
}
