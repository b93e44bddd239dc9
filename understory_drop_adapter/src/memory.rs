// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory document tree.
//!
//! [`MemoryTree`] implements [`TreeIndex`], [`TypeRegistry`] and [`DocumentMutator`] over a
//! map of nodes carrying a user-defined kind. It backs tests and demos, and suits small hosts
//! that keep their document as a plain tree.
//!
//! ```rust
//! use understory_drop_adapter::document::{DocumentMutator, InsertPosition, TreeIndex};
//! use understory_drop_adapter::memory::MemoryTree;
//!
//! #[derive(Clone, Debug)]
//! enum Kind { Page, Section, Text }
//!
//! let mut doc = MemoryTree::new(Kind::Page, |k| !matches!(k, Kind::Text));
//! let root = doc.root();
//! let section = doc.add(root, Kind::Section).unwrap();
//! let text = doc.add(root, Kind::Text).unwrap();
//!
//! doc.reparent(text, InsertPosition { parent: section, index: 0 }).unwrap();
//! assert_eq!(doc.children_of(section), &[text]);
//! assert!(doc.add(text, Kind::Text).is_err());
//! ```

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::document::{DocumentMutator, InsertPosition, MutationError, TreeIndex, TypeRegistry};

/// Identifier of a [`MemoryTree`] node. Ids are never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

#[derive(Clone, Debug)]
struct Node<K> {
    kind: K,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A document tree held in memory.
#[derive(Clone, Debug)]
pub struct MemoryTree<K> {
    nodes: HashMap<NodeId, Node<K>>,
    root: NodeId,
    next: u32,
    accepts: fn(&K) -> bool,
}

impl<K> MemoryTree<K> {
    /// Create a tree with a root of kind `root`.
    ///
    /// `accepts` decides which kinds may hold children.
    pub fn new(root: K, accepts: fn(&K) -> bool) -> Self {
        let id = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            id,
            Node {
                kind: root,
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            nodes,
            root: id,
            next: 1,
            accepts,
        }
    }

    /// Append a node of `kind` under `parent`.
    pub fn add(&mut self, parent: NodeId, kind: K) -> Result<NodeId, MutationError> {
        let len = self.container(parent)?.children.len();
        self.insert(
            kind,
            InsertPosition {
                parent,
                index: len,
            },
        )
    }

    /// Remove `id` and its subtree; returns `false` for the root or an unknown node.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) else {
            return false;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|&c| c != id);
        }
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children);
            }
        }
        true
    }

    /// Kind of `id`.
    pub fn kind(&self, id: NodeId) -> Option<&K> {
        self.nodes.get(&id).map(|n| &n.kind)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; the root cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `id` is `ancestor` or below it.
    pub fn is_within(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent_of(c);
        }
        false
    }

    fn container(&self, parent: NodeId) -> Result<&Node<K>, MutationError> {
        let node = self
            .nodes
            .get(&parent)
            .ok_or(MutationError::ParentNotFound)?;
        if !(self.accepts)(&node.kind) {
            return Err(MutationError::NotAContainer);
        }
        Ok(node)
    }

    fn checked_index(&self, at: InsertPosition<NodeId>) -> Result<usize, MutationError> {
        let len = self.container(at.parent)?.children.len();
        if at.index > len {
            return Err(MutationError::IndexOutOfBounds {
                index: at.index,
                len,
            });
        }
        Ok(at.index)
    }
}

impl<K> TreeIndex for MemoryTree<K> {
    type Id = NodeId;

    fn root(&self) -> NodeId {
        self.root
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id)?.parent
    }

    fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(&id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }
}

impl<K> TypeRegistry<NodeId> for MemoryTree<K> {
    fn accepts_children(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| (self.accepts)(&n.kind))
    }
}

impl<K> DocumentMutator<NodeId> for MemoryTree<K> {
    type NodeType = K;

    fn reparent(&mut self, node: NodeId, to: InsertPosition<NodeId>) -> Result<(), MutationError> {
        let old_parent = self
            .nodes
            .get(&node)
            .ok_or(MutationError::NodeNotFound)?
            .parent;
        let mut index = self.checked_index(to)?;
        // The root is an ancestor of every parent, so it lands here too.
        if self.is_within(node, to.parent) {
            return Err(MutationError::WouldCycle);
        }
        let Some(old_parent) = old_parent else {
            return Err(MutationError::WouldCycle);
        };

        if let Some(p) = self.nodes.get_mut(&old_parent)
            && let Some(pos) = p.children.iter().position(|&c| c == node)
        {
            p.children.remove(pos);
            if old_parent == to.parent && pos < index {
                index -= 1;
            }
        }
        if let Some(p) = self.nodes.get_mut(&to.parent) {
            p.children.insert(index, node);
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.parent = Some(to.parent);
        }
        Ok(())
    }

    fn insert(&mut self, ty: K, at: InsertPosition<NodeId>) -> Result<NodeId, MutationError> {
        let index = self.checked_index(at)?;
        let next = self
            .next
            .checked_add(1)
            .ok_or(MutationError::IdsExhausted)?;
        let id = NodeId(self.next);
        self.next = next;
        self.nodes.insert(
            id,
            Node {
                kind: ty,
                parent: Some(at.parent),
                children: Vec::new(),
            },
        );
        if let Some(p) = self.nodes.get_mut(&at.parent) {
            p.children.insert(index, id);
        }
        Ok(id)
    }
}
