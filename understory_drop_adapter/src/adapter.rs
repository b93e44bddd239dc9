// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree semantics for drop target resolution.
//!
//! [`TreeAdapter`] is the domain half of a drag: it maps elements to [`ItemSelector`]s,
//! redirects raw hit-test candidates to valid container parents, translates resolved targets
//! into [`DropTargetChange`]s, and commits the drop through a [`DocumentMutator`].
//!
//! ## Redirect rules
//!
//! For a candidate that is not the root:
//!
//! 1. Take the candidate's ancestor path. When the pointer is near the candidate's edge, drop
//!    the candidate itself so the drop goes *between* it and its siblings.
//! 2. Remove the dragged node and everything below it from the path.
//! 3. Walk outward to the first node whose type accepts children; the root if there is none.
//! 4. Use that node's rendered element, or the root's when it is not rendered.
//!
//! The result is always a fixed point: feeding it back in returns the same element.
//!
//! ## Outline nesting
//!
//! Outline views read the horizontal drag shift. Each positive step moves the insertion into
//! the container right before it, at its end. Each negative step, while inserting past the
//! last child, moves the insertion out to just after the current parent.

use core::fmt::Debug;
use core::hash::Hash;

use understory_drop_geometry::Placement;
use understory_drop_geometry::indicator::{IndicatorStyle, Overlay, render_placement};
use understory_drop_target::{Candidate, DropTarget, SwapCandidate};

use crate::document::{
    DocumentMutator, DocumentView, ElementRegistry, InsertPosition, MutationError, TreeIndex,
    TypeRegistry,
};
use crate::selector::ItemSelector;

/// The kind of view a drag happens in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewKind {
    /// Freeform canvas; the drag shift is ignored.
    Canvas,
    /// Compact outline; the drag shift re-nests the insertion.
    Outline,
}

/// What is being dragged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragItem<Id, T> {
    /// A node already in the document; dropping reparents it.
    Existing(Id),
    /// A new node of the given type, e.g. from a palette; dropping inserts it.
    New(T),
}

impl<Id: Copy, T> DragItem<Id, T> {
    /// The dragged node, if it exists in the document.
    pub fn existing(&self) -> Option<Id> {
        match self {
            Self::Existing(id) => Some(*id),
            Self::New(_) => None,
        }
    }
}

/// Where a drop would land, in document terms.
#[derive(Clone, Debug, PartialEq)]
pub struct DropTargetChange<Id> {
    /// The parent the item would be inserted into.
    pub parent: ItemSelector<Id>,
    /// Insertion index among the parent's current children.
    pub index: usize,
    /// Indicator geometry, as resolved before any outline nesting.
    pub placement: Placement,
    /// Depth of `parent`; zero for the root. Outline indicators indent by it.
    pub depth: usize,
}

impl<Id> DropTargetChange<Id> {
    /// The indicator to paint for this change, indented by its depth.
    pub fn overlay(&self, style: &IndicatorStyle) -> Overlay {
        render_placement(self.placement, self.depth, style)
    }
}

/// Why a drop did not touch the document.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The drag was canceled.
    Canceled,
    /// The drag ended without a drop target.
    NoTarget,
    /// The target is the dragged node or inside it.
    TargetIsDragged,
    /// The dragged node or the target moved or was deleted concurrently.
    Stale,
}

/// Result of [`TreeAdapter::commit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome<Id> {
    /// An existing node was reparented.
    Moved {
        /// The dragged node.
        node: Id,
        /// Where it went.
        to: InsertPosition<Id>,
    },
    /// A new node was inserted.
    Inserted {
        /// The created node.
        node: Id,
        /// Where it went.
        at: InsertPosition<Id>,
    },
    /// Nothing was attempted.
    Skipped(SkipReason),
    /// The document refused the mutation.
    Rejected(MutationError),
}

impl<Id> CommitOutcome<Id> {
    /// Returns `true` if the document changed.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Moved { .. } | Self::Inserted { .. })
    }
}

#[derive(Clone, Debug)]
struct Resolved<Id> {
    parent: ItemSelector<Id>,
    index: usize,
    placement: Placement,
}

/// Binds one drag to the document tree.
///
/// `Id` is the document's node id and `T` the type of newly inserted nodes.
#[derive(Clone, Debug)]
pub struct TreeAdapter<Id, T> {
    kind: ViewKind,
    item: DragItem<Id, T>,
    resolved: Option<Resolved<Id>>,
    shift: i32,
    change: Option<DropTargetChange<Id>>,
}

impl<Id, T> TreeAdapter<Id, T>
where
    Id: Copy + Eq + Hash + Debug,
{
    /// Adapter for a drag of `item` in a view of `kind`.
    pub fn new(kind: ViewKind, item: DragItem<Id, T>) -> Self {
        Self {
            kind,
            item,
            resolved: None,
            shift: 0,
            change: None,
        }
    }

    /// Adapter for a canvas view.
    pub fn canvas(item: DragItem<Id, T>) -> Self {
        Self::new(ViewKind::Canvas, item)
    }

    /// Adapter for an outline view.
    pub fn outline(item: DragItem<Id, T>) -> Self {
        Self::new(ViewKind::Outline, item)
    }

    /// The view kind.
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// The dragged item.
    pub fn item(&self) -> &DragItem<Id, T> {
        &self.item
    }

    /// Last reported horizontal shift.
    pub fn shift(&self) -> i32 {
        self.shift
    }

    /// The current drop target change, if any.
    pub fn change(&self) -> Option<&DropTargetChange<Id>> {
        self.change.as_ref()
    }

    /// Selector of the node `element` renders, or `None` if it renders none.
    pub fn element_to_data<Tr, Ty, El>(
        &self,
        view: DocumentView<'_, Tr, Ty, El>,
        element: El::Element,
    ) -> Option<ItemSelector<Id>>
    where
        Tr: TreeIndex<Id = Id> + ?Sized,
        Ty: ?Sized,
        El: ElementRegistry<Id> + ?Sized,
    {
        let id = view.elements.id_of(element)?;
        ItemSelector::from_tree(view.tree, id)
    }

    /// Redirect a candidate to the nearest valid container outside the dragged subtree.
    pub fn swap_drop_target<Tr, Ty, El>(
        &self,
        view: DocumentView<'_, Tr, Ty, El>,
        candidate: Option<SwapCandidate<ItemSelector<Id>, El::Element>>,
    ) -> Option<Candidate<ItemSelector<Id>, El::Element>>
    where
        Tr: TreeIndex<Id = Id> + ?Sized,
        Ty: TypeRegistry<Id> + ?Sized,
        El: ElementRegistry<Id> + ?Sized,
    {
        let SwapCandidate {
            candidate,
            near_edge,
        } = candidate?;
        let root = view.tree.root();
        if candidate.data.id() == root {
            return Some(candidate);
        }

        let mut path = candidate.data.path();
        if near_edge {
            path = &path[1..];
        }
        if let Some(dragged) = self.item.existing()
            && let Some(k) = path.iter().position(|&id| id == dragged)
        {
            path = &path[k + 1..];
        }
        let target = path
            .iter()
            .copied()
            .find(|&id| id == root || view.types.accepts_children(id))
            .unwrap_or(root);

        let (target, element) = match view.elements.element_of(target) {
            Some(element) => (target, element),
            None => (root, view.elements.element_of(root)?),
        };
        if target == candidate.data.id() {
            return Some(candidate);
        }
        tracing::trace!(from = ?candidate.data.id(), to = ?target, "drop target redirected");
        Some(Candidate {
            data: ItemSelector::from_tree(view.tree, target)?,
            element,
        })
    }

    /// Record a resolved target. Returns `true` if [`TreeAdapter::change`] changed.
    pub fn on_drop_target_change<Tr, Ty, El, E>(
        &mut self,
        view: DocumentView<'_, Tr, Ty, El>,
        target: Option<&DropTarget<ItemSelector<Id>, E>>,
    ) -> bool
    where
        Tr: TreeIndex<Id = Id> + ?Sized,
        Ty: TypeRegistry<Id> + ?Sized,
        El: ?Sized,
    {
        self.resolved = target.map(|t| Resolved {
            parent: t.data.clone(),
            index: t.index_within_children,
            placement: t.placement,
        });
        self.refresh(view.tree, view.types)
    }

    /// Record a new horizontal shift. Returns `true` if [`TreeAdapter::change`] changed,
    /// which only happens in outline views.
    pub fn on_shift_change<Tr, Ty, El>(
        &mut self,
        view: DocumentView<'_, Tr, Ty, El>,
        shift: i32,
    ) -> bool
    where
        Tr: TreeIndex<Id = Id> + ?Sized,
        Ty: TypeRegistry<Id> + ?Sized,
        El: ?Sized,
    {
        self.shift = shift;
        self.kind == ViewKind::Outline && self.refresh(view.tree, view.types)
    }

    fn refresh<Tr, Ty>(&mut self, tree: &Tr, types: &Ty) -> bool
    where
        Tr: TreeIndex<Id = Id> + ?Sized,
        Ty: TypeRegistry<Id> + ?Sized,
    {
        let next = self
            .resolved
            .as_ref()
            .map(|r| self.translate(tree, types, r));
        if next == self.change {
            return false;
        }
        self.change = next;
        true
    }

    fn translate<Tr, Ty>(&self, tree: &Tr, types: &Ty, r: &Resolved<Id>) -> DropTargetChange<Id>
    where
        Tr: TreeIndex<Id = Id> + ?Sized,
        Ty: TypeRegistry<Id> + ?Sized,
    {
        let raw = r.parent.id();
        let (parent, index) = match self.kind {
            ViewKind::Outline if self.shift != 0 && tree.contains(raw) => {
                self.nest(tree, types, raw, r.index)
            }
            _ => (raw, r.index),
        };
        let parent = if parent == raw {
            r.parent.clone()
        } else {
            match ItemSelector::from_tree(tree, parent) {
                Some(selector) => selector,
                None => r.parent.clone(),
            }
        };
        DropTargetChange {
            depth: parent.depth(),
            parent,
            index,
            placement: r.placement,
        }
    }

    /// Apply the outline shift to an insertion point.
    fn nest<Tr, Ty>(&self, tree: &Tr, types: &Ty, mut parent: Id, mut index: usize) -> (Id, usize)
    where
        Tr: TreeIndex<Id = Id> + ?Sized,
        Ty: TypeRegistry<Id> + ?Sized,
    {
        let dragged = self.item.existing();
        if self.shift > 0 {
            for _ in 0..self.shift {
                let children = tree.children_of(parent);
                let before = &children[..index.min(children.len())];
                let Some(previous) = before.iter().rev().copied().find(|&c| Some(c) != dragged)
                else {
                    break;
                };
                if !types.accepts_children(previous) {
                    break;
                }
                parent = previous;
                index = tree.children_of(previous).len();
            }
        } else {
            for _ in 0..self.shift.unsigned_abs() {
                if parent == tree.root() {
                    break;
                }
                // Only the dragged node itself may follow the insertion point.
                let at_end = tree
                    .children_of(parent)
                    .get(index..)
                    .is_none_or(|rest| rest.iter().all(|&c| Some(c) == dragged));
                if !at_end {
                    break;
                }
                let Some(grandparent) = tree.parent_of(parent) else {
                    break;
                };
                let Some(position) = tree
                    .children_of(grandparent)
                    .iter()
                    .position(|&c| c == parent)
                else {
                    break;
                };
                parent = grandparent;
                index = position + 1;
            }
        }
        (parent, index)
    }

    /// Validate the drop against the live tree.
    ///
    /// Fails when the drag was canceled, when there is no target, when the target is the
    /// dragged node or inside it, or when either moved or disappeared since it was resolved.
    pub fn prepare<Tr>(&self, tree: &Tr, is_canceled: bool) -> Result<PendingCommit<Id, T>, SkipReason>
    where
        Tr: TreeIndex<Id = Id> + ?Sized,
        T: Clone,
    {
        if is_canceled {
            return Err(SkipReason::Canceled);
        }
        let change = self.change.as_ref().ok_or(SkipReason::NoTarget)?;
        let Some(parent) = change.parent.resolve(tree) else {
            tracing::debug!(parent = ?change.parent.id(), "drop target no longer in place");
            return Err(SkipReason::Stale);
        };
        if let DragItem::Existing(node) = self.item {
            if change.parent.contains(node) {
                return Err(SkipReason::TargetIsDragged);
            }
            if !tree.contains(node) {
                tracing::debug!(?node, "dragged node no longer exists");
                return Err(SkipReason::Stale);
            }
        }
        Ok(PendingCommit {
            item: self.item.clone(),
            at: InsertPosition {
                parent,
                index: change.index,
            },
        })
    }

    /// Validate and apply the drop in one step.
    ///
    /// Use [`TreeAdapter::prepare`] and [`PendingCommit::apply`] when the tree index and the
    /// mutator are the same object.
    pub fn commit<Tr, M>(&self, tree: &Tr, mutator: &mut M, is_canceled: bool) -> CommitOutcome<Id>
    where
        Tr: TreeIndex<Id = Id> + ?Sized,
        M: DocumentMutator<Id, NodeType = T> + ?Sized,
        T: Clone,
    {
        match self.prepare(tree, is_canceled) {
            Ok(pending) => pending.apply(mutator),
            Err(reason) => CommitOutcome::Skipped(reason),
        }
    }
}

/// A validated drop, see [`TreeAdapter::prepare`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingCommit<Id, T> {
    item: DragItem<Id, T>,
    at: InsertPosition<Id>,
}

impl<Id: Copy + Debug, T> PendingCommit<Id, T> {
    /// Where the item will land.
    pub fn position(&self) -> InsertPosition<Id> {
        self.at
    }

    /// Send the mutation. Errors are reported as [`CommitOutcome::Rejected`].
    pub fn apply<M>(self, mutator: &mut M) -> CommitOutcome<Id>
    where
        M: DocumentMutator<Id, NodeType = T> + ?Sized,
    {
        let at = self.at;
        let result = match self.item {
            DragItem::Existing(node) => mutator
                .reparent(node, at)
                .map(|()| CommitOutcome::Moved { node, to: at }),
            DragItem::New(ty) => mutator
                .insert(ty, at)
                .map(|node| CommitOutcome::Inserted { node, at }),
        };
        match result {
            Ok(outcome) => {
                tracing::debug!(parent = ?at.parent, index = at.index, "drop committed");
                outcome
            }
            Err(error) => {
                tracing::debug!(%error, parent = ?at.parent, index = at.index, "drop rejected");
                CommitOutcome::Rejected(error)
            }
        }
    }
}
