//! Block Tree & Query: the nested structure a parsed file resolves into,
//! plus lookups over it.

use crate::statement::{Statement, VariantTag};

pub const INDENT_SIZE: usize = 4;
pub const INDENT_CHAR: char = ' ';

/// One entry in a [`Block`]'s body: either a leaf statement or a nested
/// block.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Statement(Statement),
    Block(Block),
}

/// A sequence of items opened by a `BLOCK_START` statement and closed by
/// its matching terminator, both included as the first and last leaf
/// statements once flattened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub items: Vec<Item>,
}

impl Block {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn append(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items.extend(items);
    }

    /// The statement that opens this block: its first item if a statement,
    /// or the head of its first nested block.
    pub fn head(&self) -> Option<&Statement> {
        match self.items.first()? {
            Item::Statement(s) => Some(s),
            Item::Block(b) => b.head(),
        }
    }

    /// Flatten this block (and all nested blocks) into source order.
    pub fn flatten(&self) -> Vec<&Statement> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Statement>) {
        for item in &self.items {
            match item {
                Item::Statement(s) => out.push(s),
                Item::Block(b) => b.flatten_into(out),
            }
        }
    }

    /// Find every block whose head matches `tag` and `predicate`, and every
    /// bare statement (outside of any block) matching the same, searching
    /// recursively.
    pub fn find<F>(&self, tag: VariantTag, predicate: &F) -> Vec<&Item>
    where
        F: Fn(&Statement) -> bool,
    {
        let mut result = Vec::new();
        self.find_into(tag, predicate, &mut result);
        result
    }

    fn find_into<'a, F>(&'a self, tag: VariantTag, predicate: &F, out: &mut Vec<&'a Item>)
    where
        F: Fn(&Statement) -> bool,
    {
        for item in &self.items {
            match item {
                Item::Block(b) => {
                    if let Some(head) = b.head() {
                        if head.tag() == tag && predicate(head) {
                            out.push(item);
                            continue;
                        }
                    }
                    b.find_into(tag, predicate, out);
                }
                Item::Statement(s) => {
                    if s.tag() == tag && predicate(s) {
                        out.push(item);
                    }
                }
            }
        }
    }
}
