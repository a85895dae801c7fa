//! # Node kinds
//!
//! Each kind owns its delimiters, its scanner and its HTML template. The
//! parser never hardcodes `[[` or `{{`; it asks the kind.
//!
//! | Kind | Syntax |
//! |------|--------|
//! | `BlockQuote` | `> text` or `[[>]] text` at block start |
//! | `CodeBlock` | ```` ```lang\ncode``` ```` |
//! | `CodeInline` | `` `code` `` |
//! | `Cloze` | `{c1:text}`, `{text}`, `[[{c1:]]text[[}]]`, with optional `::hint` |
//! | `Image` | `![alt](src)` |
//! | `Alias` | `[text]([[page]])`, `[text](((uid)))`, `[text](url)` |
//! | `Checkbox` | `{{[[TODO]]}}`, `{{[[DONE]]}}` |
//! | `Embed` | `{{embed: ((uid))}}` |
//! | `View` | `{{query: ...}}`, `{{[[youtube]]: ...}}` |
//! | `Button` | `{{name}}`, `{{name:text}}` |
//! | `PageTag` | `#tag`, `#[[tag]]` |
//! | `PageReference` | `[[title]]` |
//! | `BlockReference` | `((uid))` |
//! | `Attribute` | `key::` at block start |
//! | `Url` | `https://...`, `www....` |

mod alias;
mod attribute;
mod block_quote;
mod block_ref;
mod button;
mod checkbox;
mod cloze;
mod code;
mod embed;
mod image;
mod page_ref;
mod page_tag;
mod url;
mod view;

pub use alias::{Alias, AliasDestination};
pub use attribute::Attribute;
pub use block_quote::BlockQuote;
pub use block_ref::BlockReference;
pub use button::Button;
pub use checkbox::Checkbox;
pub use cloze::{Cloze, ClozeSyntax, HintStyle, assign_cloze_ids};
pub use code::{CodeBlock, CodeInline};
pub use embed::Embed;
pub use image::Image;
pub use page_ref::PageReference;
pub use page_tag::PageTag;
pub use url::Url;
pub use view::{View, ViewName};
