// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Id-path addresses of tree nodes.

use smallvec::SmallVec;

use crate::document::TreeIndex;

/// Address of a node: its id followed by its ancestors' ids, ending with the root.
///
/// Collaborative edits can move or delete nodes between pointer events, so adapter decisions
/// carry the whole path instead of a bare id and re-check it with [`ItemSelector::resolve`]
/// before acting.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemSelector<Id> {
    path: SmallVec<[Id; 8]>,
}

impl<Id: Copy + Eq> ItemSelector<Id> {
    /// Selector of `id` as currently placed in `tree`, or `None` if `tree` does not contain it.
    pub fn from_tree<T>(tree: &T, id: Id) -> Option<Self>
    where
        T: TreeIndex<Id = Id> + ?Sized,
    {
        if !tree.contains(id) {
            return None;
        }
        let mut path = SmallVec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            path.push(c);
            current = tree.parent_of(c);
        }
        Some(Self { path })
    }

    /// The addressed node.
    pub fn id(&self) -> Id {
        self.path[0]
    }

    /// Its parent, or `None` for the root.
    pub fn parent(&self) -> Option<Id> {
        self.path.get(1).copied()
    }

    /// Number of ancestors; zero for the root.
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    /// Ids from the node up to the root.
    pub fn path(&self) -> &[Id] {
        &self.path
    }

    /// Returns `true` if `id` is the node or one of its ancestors.
    pub fn contains(&self, id: Id) -> bool {
        self.path.contains(&id)
    }

    /// The ancestor `levels` steps up; `ancestor_at(0)` is the node itself.
    pub fn ancestor_at(&self, levels: usize) -> Option<Self> {
        (levels < self.path.len()).then(|| Self {
            path: self.path[levels..].iter().copied().collect(),
        })
    }

    /// The node's id if every link of the path still holds in `tree`.
    pub fn resolve<T>(&self, tree: &T) -> Option<Id>
    where
        T: TreeIndex<Id = Id> + ?Sized,
    {
        let root = *self.path.last()?;
        if root != tree.root() {
            return None;
        }
        for pair in self.path.windows(2) {
            if !tree.contains(pair[0]) || tree.parent_of(pair[0]) != Some(pair[1]) {
                return None;
            }
        }
        Some(self.id())
    }
}
