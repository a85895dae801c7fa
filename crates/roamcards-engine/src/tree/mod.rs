//! # Outline tree
//!
//! Pages own ordered blocks; blocks own ordered child blocks. Everything lives
//! in two arenas on [`Graph`] and links by index, so a block can walk up to its
//! page without the tree holding references into itself.
//!
//! Built in two phases: every block is parsed first, then parent links are set
//! in one pass over the finished arenas.

use std::collections::HashMap;

use crate::markup::{Content, MarkupNode};
use crate::render::BlockLookup;

mod records;

pub use records::{BlockRecord, PageRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    Page(PageId),
    Block(BlockId),
}

#[derive(Debug, Clone)]
pub struct Page {
    title: String,
    children: Vec<BlockId>,
    pub edit_time: Option<i64>,
    pub edit_email: Option<String>,
}

impl Page {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn children(&self) -> &[BlockId] {
        &self.children
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    uid: String,
    content: Content,
    children: Vec<BlockId>,
    parent: Option<Parent>,
    pub create_time: Option<i64>,
    pub create_email: Option<String>,
    pub edit_time: Option<i64>,
    pub edit_email: Option<String>,
}

impl Block {
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn children(&self) -> &[BlockId] {
        &self.children
    }

    pub fn parent(&self) -> Option<Parent> {
        self.parent
    }

    /// True when the block opens with `key::`.
    pub fn is_attribute(&self, key: &str) -> bool {
        matches!(self.content.first(), Some(MarkupNode::Attribute(attr)) if attr.title() == key)
    }
}

/// Which tags [`Graph::tags`] collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagQuery {
    /// Add the tags of every ancestor, page included.
    pub inherit: bool,
    /// Add tags written in `tags::` child blocks.
    pub from_attr: bool,
    pub drop_duplicates: bool,
}

impl Default for TagQuery {
    fn default() -> Self {
        Self {
            inherit: true,
            from_attr: false,
            drop_duplicates: false,
        }
    }
}

impl TagQuery {
    /// The block's own tags only.
    pub fn own() -> Self {
        Self {
            inherit: false,
            ..Self::default()
        }
    }

    pub fn from_attr(mut self, from_attr: bool) -> Self {
        self.from_attr = from_attr;
        self
    }

    pub fn deduped(mut self) -> Self {
        self.drop_duplicates = true;
        self
    }
}

/// Child blocks holding this attribute contribute their tags to the parent.
const TAGS_ATTRIBUTE: &str = "tags";

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pages: Vec<Page>,
    blocks: Vec<Block>,
    by_uid: HashMap<String, BlockId>,
}

impl Graph {
    pub fn from_pages(records: Vec<PageRecord>) -> Self {
        let mut graph = Graph::default();
        for record in records {
            let children = record.children.iter().map(|b| graph.materialize(b)).collect();
            graph.pages.push(Page {
                title: record.title,
                children,
                edit_time: record.edit_time,
                edit_email: record.edit_email,
            });
        }
        graph.link_parents();
        log::debug!(
            "built graph with {} pages and {} blocks",
            graph.pages.len(),
            graph.blocks.len()
        );
        graph
    }

    fn materialize(&mut self, record: &BlockRecord) -> BlockId {
        let children = record.children.iter().map(|c| self.materialize(c)).collect();
        let id = BlockId(self.blocks.len());
        self.blocks.push(Block {
            uid: record.uid.clone(),
            content: Content::parse(&record.string),
            children,
            parent: None,
            create_time: record.create_time,
            create_email: record.create_email.clone(),
            edit_time: record.edit_time,
            edit_email: record.edit_email.clone(),
        });
        if !record.uid.is_empty() {
            if self.by_uid.contains_key(&record.uid) {
                log::warn!("duplicate block uid {}, keeping the first one", record.uid);
            } else {
                self.by_uid.insert(record.uid.clone(), id);
            }
        }
        id
    }

    fn link_parents(&mut self) {
        for (idx, page) in self.pages.iter().enumerate() {
            for child in &page.children {
                self.blocks[child.0].parent = Some(Parent::Page(PageId(idx)));
            }
        }
        for idx in 0..self.blocks.len() {
            let children = self.blocks[idx].children.clone();
            for child in children {
                self.blocks[child.0].parent = Some(Parent::Block(BlockId(idx)));
            }
        }
    }

    pub fn pages(&self) -> impl Iterator<Item = (PageId, &Page)> {
        self.pages.iter().enumerate().map(|(i, p)| (PageId(i), p))
    }

    pub fn page(&self, id: PageId) -> &Page {
        &self.pages[id.0]
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    pub fn page_by_title(&self, title: &str) -> Option<PageId> {
        self.pages.iter().position(|p| p.title == title).map(PageId)
    }

    pub fn block_by_uid(&self, uid: &str) -> Option<BlockId> {
        self.by_uid.get(uid).copied()
    }

    /// Parents from the nearest block up to the page.
    pub fn ancestors(&self, id: BlockId) -> Vec<Parent> {
        let mut chain = Vec::new();
        let mut current = self.block(id).parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = match parent {
                Parent::Block(block) => self.block(block).parent,
                Parent::Page(_) => None,
            };
        }
        chain
    }

    pub fn page_of(&self, id: BlockId) -> Option<PageId> {
        self.ancestors(id).into_iter().find_map(|p| match p {
            Parent::Page(page) => Some(page),
            Parent::Block(_) => None,
        })
    }

    pub fn num_descendants(&self, id: BlockId) -> usize {
        self.block(id)
            .children
            .iter()
            .map(|c| 1 + self.num_descendants(*c))
            .sum()
    }

    pub fn page_num_descendants(&self, id: PageId) -> usize {
        self.page(id)
            .children
            .iter()
            .map(|c| 1 + self.num_descendants(*c))
            .sum()
    }

    /// Every block in document order: pages in order, each block before its children.
    pub fn walk(&self) -> Vec<BlockId> {
        fn visit(graph: &Graph, ids: &[BlockId], out: &mut Vec<BlockId>) {
            for id in ids {
                out.push(*id);
                visit(graph, &graph.block(*id).children, out);
            }
        }
        let mut out = Vec::with_capacity(self.blocks.len());
        for page in &self.pages {
            visit(self, &page.children, &mut out);
        }
        out
    }

    /// Blocks matching `pred`, in document order.
    pub fn query_many(&self, mut pred: impl FnMut(BlockId) -> bool) -> Vec<BlockId> {
        self.walk().into_iter().filter(|id| pred(*id)).collect()
    }

    /// Tags of a block, then (with `inherit`) of each ancestor nearest first.
    pub fn tags(&self, id: BlockId, query: TagQuery) -> Vec<String> {
        let mut tags = self.own_tags(id, query.from_attr);
        if query.inherit {
            for parent in self.ancestors(id) {
                match parent {
                    Parent::Block(block) => tags.extend(self.own_tags(block, query.from_attr)),
                    Parent::Page(page) => tags.extend(self.page_tags(page, query.from_attr)),
                }
            }
        }
        if query.drop_duplicates {
            let mut seen = Vec::with_capacity(tags.len());
            tags.retain(|t| {
                let fresh = !seen.contains(t);
                if fresh {
                    seen.push(t.clone());
                }
                fresh
            });
        }
        tags
    }

    /// A page's title, plus `tags::` children when `from_attr`.
    pub fn page_tags(&self, id: PageId, from_attr: bool) -> Vec<String> {
        let page = self.page(id);
        let mut tags = vec![page.title.clone()];
        if from_attr {
            tags.extend(self.attribute_tags(&page.children));
        }
        tags
    }

    fn own_tags(&self, id: BlockId, from_attr: bool) -> Vec<String> {
        let block = self.block(id);
        let mut tags = block.content.tags();
        if from_attr {
            tags.extend(self.attribute_tags(&block.children));
        }
        tags
    }

    fn attribute_tags(&self, children: &[BlockId]) -> Vec<String> {
        children
            .iter()
            .map(|c| self.block(*c))
            .filter(|b| b.is_attribute(TAGS_ATTRIBUTE))
            .flat_map(|b| b.content.tags())
            .filter(|t| t != TAGS_ATTRIBUTE)
            .collect()
    }
}

impl BlockLookup for Graph {
    fn block_content(&self, uid: &str) -> Option<&Content> {
        self.block_by_uid(uid).map(|id| &self.block(id).content)
    }

    fn block_children(&self, uid: &str) -> Vec<&str> {
        self.block_by_uid(uid)
            .map(|id| {
                self.block(id)
                    .children
                    .iter()
                    .map(|c| self.block(*c).uid.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}
