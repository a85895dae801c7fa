//! # roamcards engine
//!
//! Converts Roam outline markup into a typed content model and flashcard HTML.
//!
//! ## Layers
//!
//! - **`markup`**: `MarkupNode` (closed set of node kinds) and `Content`
//! - **`parsing`**: kind-by-kind carving pipeline plus the cloze sub-parser
//! - **`render`**: render options, block lookup seam, escaping, emphasis pass
//! - **`tree`**: pages and blocks with parent links and tag inheritance
//! - **`cards`**: front/back HTML for a block based on its position
//! - **`ankify`**: block selection, per-block options and note records
//! - **`io`**: loading Roam JSON exports
//!
//! The library never configures logging; it only emits `log` records.

pub mod ankify;
pub mod cards;
pub mod error;
pub mod io;
pub mod markup;
pub mod parsing;
pub mod render;
pub mod tree;

pub use ankify::{AnkifyOptions, AnkifyReport, BlockAnkifier, Note, ankify_graph};
pub use cards::{Card, CardAssembler, CardOptions, ParentCount};
pub use error::{AnkifyError, MarkupError, OptionValueError};
pub use io::{LoadError, load_export, parse_export};
pub use markup::{Content, MarkupNode, NodeKind, kinds::*};
pub use render::{BlockLookup, PagerefCloze, RenderContext, RenderOptions};
pub use tree::{Block, BlockId, BlockRecord, Graph, Page, PageId, PageRecord, Parent, TagQuery};
