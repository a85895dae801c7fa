//! Raw page and block records as they appear in a Roam JSON export.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PageRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_email: Option<String>,
}

impl PageRecord {
    pub fn new(title: impl Into<String>, children: Vec<BlockRecord>) -> Self {
        Self {
            title: title.into(),
            children,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BlockRecord {
    /// The block's raw markup.
    pub string: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_email: Option<String>,
}

impl BlockRecord {
    pub fn new(uid: impl Into<String>, string: impl Into<String>) -> Self {
        Self {
            string: string.into(),
            uid: uid.into(),
            ..Self::default()
        }
    }

    pub fn with_children(mut self, children: Vec<BlockRecord>) -> Self {
        self.children = children;
        self
    }
}
