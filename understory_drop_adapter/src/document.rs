// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document collaborators: the tree index, type and element registries, and the mutator.
//!
//! None of these are owned by the adapter. Hosts implement them over their own document and
//! view state and lend them for the duration of one event through [`DocumentView`].

use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

/// Read access to the document tree.
pub trait TreeIndex {
    /// Stable node identifier.
    type Id: Copy + Eq + Hash + Debug;

    /// The tree root. It is always a valid drop parent and is never dragged.
    fn root(&self) -> Self::Id;

    /// Parent of `id`, or `None` for the root or an unknown node.
    fn parent_of(&self, id: Self::Id) -> Option<Self::Id>;

    /// Ordered children of `id`; empty for leaves and unknown nodes.
    fn children_of(&self, id: Self::Id) -> &[Self::Id];

    /// Returns `true` if `id` is currently in the tree.
    fn contains(&self, id: Self::Id) -> bool;
}

/// Which nodes may hold children.
pub trait TypeRegistry<Id> {
    /// Returns `true` if `id`'s type accepts children.
    fn accepts_children(&self, id: Id) -> bool;
}

/// Mapping between nodes and their rendered elements in one view.
pub trait ElementRegistry<Id> {
    /// The view's element handle.
    type Element: Copy + Eq + Hash + Debug;

    /// Currently rendered element of `id`; `None` when it is not rendered (virtualized,
    /// collapsed away, off-screen).
    fn element_of(&self, id: Id) -> Option<Self::Element>;

    /// Node that `element` renders, if any.
    fn id_of(&self, element: Self::Element) -> Option<Id>;
}

/// Where a node lands: `index` among `parent`'s current children.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InsertPosition<Id> {
    /// New parent.
    pub parent: Id,
    /// Insertion index in `0..=child_count`, counted in the parent's current children.
    pub index: usize,
}

/// Why the document refused a mutation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// The node to move does not exist anymore.
    #[error("node not found")]
    NodeNotFound,
    /// The target parent does not exist anymore.
    #[error("target parent not found")]
    ParentNotFound,
    /// The target parent's type does not accept children.
    #[error("target parent does not accept children")]
    NotAContainer,
    /// The target parent is the node itself or one of its descendants.
    #[error("a node cannot be moved into its own subtree")]
    WouldCycle,
    /// The document has no identifiers left for a new node.
    #[error("node ids exhausted")]
    IdsExhausted,
    /// The index is past the end of the target's children.
    #[error("index {index} is out of bounds for {len} children")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Child count of the target parent.
        len: usize,
    },
}

/// The document mutation API a drop commits through.
pub trait DocumentMutator<Id> {
    /// Type of newly inserted nodes.
    type NodeType;

    /// Move `node` (with its subtree) to `to`.
    ///
    /// When `node` already is a child of `to.parent`, `to.index` counts it at its old position.
    fn reparent(&mut self, node: Id, to: InsertPosition<Id>) -> Result<(), MutationError>;

    /// Create a node of type `ty` at `at` and return its id.
    fn insert(&mut self, ty: Self::NodeType, at: InsertPosition<Id>) -> Result<Id, MutationError>;
}

/// Borrowed collaborators for one event.
pub struct DocumentView<'a, Tr: ?Sized, Ty: ?Sized, El: ?Sized> {
    /// Tree index.
    pub tree: &'a Tr,
    /// Type registry.
    pub types: &'a Ty,
    /// Element registry of the view being dragged in.
    pub elements: &'a El,
}

impl<'a, Tr: ?Sized, Ty: ?Sized, El: ?Sized> DocumentView<'a, Tr, Ty, El> {
    /// Bundle the collaborators.
    pub fn new(tree: &'a Tr, types: &'a Ty, elements: &'a El) -> Self {
        Self {
            tree,
            types,
            elements,
        }
    }
}

impl<Tr: ?Sized, Ty: ?Sized, El: ?Sized> Clone for DocumentView<'_, Tr, Ty, El> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Tr: ?Sized, Ty: ?Sized, El: ?Sized> Copy for DocumentView<'_, Tr, Ty, El> {}

impl<Tr: ?Sized, Ty: ?Sized, El: ?Sized> Debug for DocumentView<'_, Tr, Ty, El> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DocumentView").finish_non_exhaustive()
    }
}

/// A two-way node/element map for views that register elements as they render.
#[derive(Clone, Debug)]
pub struct ElementMap<Id, E> {
    by_id: HashMap<Id, E>,
    by_element: HashMap<E, Id>,
}

impl<Id, E> Default for ElementMap<Id, E> {
    fn default() -> Self {
        Self {
            by_id: HashMap::new(),
            by_element: HashMap::new(),
        }
    }
}

impl<Id, E> ElementMap<Id, E>
where
    Id: Copy + Eq + Hash,
    E: Copy + Eq + Hash,
{
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `element` renders `id`, replacing earlier bindings of either.
    pub fn bind(&mut self, id: Id, element: E) {
        self.unbind(id);
        if let Some(old) = self.by_element.insert(element, id) {
            self.by_id.remove(&old);
        }
        self.by_id.insert(id, element);
    }

    /// Forget `id`'s element, e.g. when it is virtualized away.
    pub fn unbind(&mut self, id: Id) {
        if let Some(element) = self.by_id.remove(&id) {
            self.by_element.remove(&element);
        }
    }

    /// Number of bound nodes.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl<Id, E> ElementRegistry<Id> for ElementMap<Id, E>
where
    Id: Copy + Eq + Hash,
    E: Copy + Eq + Hash + Debug,
{
    type Element = E;

    fn element_of(&self, id: Id) -> Option<E> {
        self.by_id.get(&id).copied()
    }

    fn id_of(&self, element: E) -> Option<Id> {
        self.by_element.get(&element).copied()
    }
}
