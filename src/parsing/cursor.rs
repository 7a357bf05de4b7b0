//! Read-only traversal handle over a [`Tree`].
//!
//! A cursor never mutates the tree; "moving" produces a new cursor value
//! bound to a different node. Running out of siblings or children is a normal
//! terminal condition, reported as `None`.

use crate::parsing::tree::{Node, NodeId, Tree};
use std::fmt;

#[derive(Clone, Copy)]
pub struct Cursor<'t> {
    tree: &'t Tree,
    /// `None` when positioned at the root node itself.
    parent: Option<NodeId>,
    index: usize,
}

impl<'t> Cursor<'t> {
    pub(crate) fn root(tree: &'t Tree) -> Self {
        Self {
            tree,
            parent: None,
            index: 0,
        }
    }

    fn node_id(&self) -> NodeId {
        match self.parent {
            None => self.tree.root_id(),
            Some(parent) => self.tree.node(parent).children()[self.index],
        }
    }

    /// The node the cursor is positioned on.
    pub fn node(&self) -> &'t Node {
        self.tree.node(self.node_id())
    }

    /// The next sibling, if any remains at this level.
    pub fn right(self) -> Option<Self> {
        let parent = self.parent?;
        let siblings = self.tree.node(parent).children().len();
        (self.index + 1 < siblings).then(|| Self {
            index: self.index + 1,
            ..self
        })
    }

    /// The first child, if the current node has children.
    pub fn down(self) -> Option<Self> {
        let id = self.node_id();
        (!self.tree.node(id).children().is_empty()).then(|| Self {
            tree: self.tree,
            parent: Some(id),
            index: 0,
        })
    }
}

/// Position equality: same tree, same level, same index. This is what the
/// repetition combinator's no-progress guard compares.
impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree)
            && self.parent == other.parent
            && self.index == other.index
    }
}

// Keep the output compact instead of dumping the whole tree arena.
impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("parent", &self.parent)
            .field("index", &self.index)
            .field("node", self.node().token())
            .finish()
    }
}
