// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the tree adapter over random documents.
//!
//! 1. Redirected targets are containers outside the dragged subtree, and fixed points.
//! 2. Committing any target never detaches or cycles the tree.
//! 3. Outline nesting keeps targets valid for every shift.

use kurbo::Rect;
use proptest::prelude::*;
use understory_drop_adapter::adapter::{CommitOutcome, DragItem, SkipReason, TreeAdapter};
use understory_drop_adapter::document::{
    DocumentView, ElementMap, ElementRegistry, TreeIndex, TypeRegistry,
};
use understory_drop_adapter::memory::{MemoryTree, NodeId};
use understory_drop_adapter::selector::ItemSelector;
use understory_drop_geometry::Placement;
use understory_drop_target::{Candidate, DropTarget, SwapCandidate};

// ── Helpers ─────────────────────────────────────────────────────────────

/// Each entry adds a node under an existing container; `true` makes it a container.
fn shapes() -> impl Strategy<Value = Vec<(usize, bool)>> {
    proptest::collection::vec((0usize..64, any::<bool>()), 1..24)
}

struct Doc {
    tree: MemoryTree<bool>,
    elements: ElementMap<NodeId, u32>,
    ids: Vec<NodeId>,
}

impl Doc {
    fn build(shape: &[(usize, bool)]) -> Self {
        let mut tree = MemoryTree::new(true, |&k| k);
        let mut ids = vec![tree.root()];
        let mut containers = vec![tree.root()];
        for &(pick, container) in shape {
            let parent = containers[pick % containers.len()];
            let id = tree.add(parent, container).unwrap();
            ids.push(id);
            if container {
                containers.push(id);
            }
        }
        let mut elements = ElementMap::new();
        for (i, &id) in ids.iter().enumerate() {
            elements.bind(id, u32::try_from(i).unwrap());
        }
        Self {
            tree,
            elements,
            ids,
        }
    }

    fn view(&self) -> DocumentView<'_, MemoryTree<bool>, MemoryTree<bool>, ElementMap<NodeId, u32>> {
        DocumentView::new(&self.tree, &self.tree, &self.elements)
    }

    fn pick(&self, n: usize) -> NodeId {
        self.ids[n % self.ids.len()]
    }

    /// Any node but the root.
    fn pick_draggable(&self, n: usize) -> NodeId {
        self.ids[1 + n % (self.ids.len() - 1)]
    }

    fn candidate(&self, id: NodeId, near_edge: bool) -> SwapCandidate<ItemSelector<NodeId>, u32> {
        SwapCandidate {
            candidate: Candidate {
                data: ItemSelector::from_tree(&self.tree, id).unwrap(),
                element: self.elements.element_of(id).unwrap(),
            },
            near_edge,
        }
    }

    fn target(&self, parent: NodeId, index: usize) -> DropTarget<ItemSelector<NodeId>, u32> {
        DropTarget {
            data: ItemSelector::from_tree(&self.tree, parent).unwrap(),
            element: self.elements.element_of(parent).unwrap(),
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            index_within_children: index,
            placement: Placement::InsideParent { rect: Rect::ZERO },
        }
    }
}

/// Every node reaches the root within `len` steps.
fn is_a_tree(tree: &MemoryTree<bool>, ids: &[NodeId]) -> bool {
    ids.iter().all(|&id| {
        let mut current = id;
        for _ in 0..=ids.len() {
            if current == tree.root() {
                return true;
            }
            match tree.parent_of(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    })
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn redirects_avoid_the_dragged_subtree(
        shape in shapes(),
        dragged in any::<usize>(),
        hit in any::<usize>(),
        near_edge in any::<bool>(),
    ) {
        let doc = Doc::build(&shape);
        let dragged = doc.pick_draggable(dragged);
        let hit = doc.pick(hit);
        let adapter = TreeAdapter::<NodeId, bool>::canvas(DragItem::Existing(dragged));

        let swapped = adapter
            .swap_drop_target(doc.view(), Some(doc.candidate(hit, near_edge)))
            .unwrap();
        let target = swapped.data.id();
        prop_assert!(!doc.tree.is_within(dragged, target));
        prop_assert!(target == doc.tree.root() || doc.tree.accepts_children(target));
        prop_assert_eq!(doc.elements.element_of(target), Some(swapped.element));

        let again = adapter.swap_drop_target(
            doc.view(),
            Some(SwapCandidate { candidate: swapped.clone(), near_edge: false }),
        );
        prop_assert_eq!(again, Some(swapped));
    }

    #[test]
    fn commits_keep_the_tree_whole(
        shape in shapes(),
        dragged in any::<usize>(),
        parent in any::<usize>(),
        index in 0usize..8,
    ) {
        let doc = Doc::build(&shape);
        let dragged = doc.pick_draggable(dragged);
        let parent = doc.pick(parent);
        let mut adapter = TreeAdapter::<NodeId, bool>::canvas(DragItem::Existing(dragged));
        adapter.on_drop_target_change(doc.view(), Some(&doc.target(parent, index)));

        let mut tree = doc.tree.clone();
        let outcome = adapter.commit(&doc.tree, &mut tree, false);
        if doc.tree.is_within(dragged, parent) {
            prop_assert_eq!(&outcome, &CommitOutcome::Skipped(SkipReason::TargetIsDragged));
        }
        if outcome.is_mutation() {
            prop_assert_eq!(tree.parent_of(dragged), Some(parent));
        } else {
            prop_assert_eq!(tree.children_of(parent), doc.tree.children_of(parent));
        }
        prop_assert_eq!(tree.len(), doc.tree.len());
        prop_assert!(is_a_tree(&tree, &doc.ids));
    }

    #[test]
    fn outline_nesting_keeps_targets_valid(
        shape in shapes(),
        dragged in any::<usize>(),
        hit in any::<usize>(),
        index in any::<usize>(),
        shift in -3i32..=3,
    ) {
        let doc = Doc::build(&shape);
        let dragged = doc.pick_draggable(dragged);
        let mut adapter = TreeAdapter::<NodeId, bool>::outline(DragItem::Existing(dragged));

        let parent = adapter
            .swap_drop_target(doc.view(), Some(doc.candidate(doc.pick(hit), false)))
            .unwrap()
            .data
            .id();
        let index = index % (doc.tree.children_of(parent).len() + 1);
        adapter.on_shift_change(doc.view(), shift);
        adapter.on_drop_target_change(doc.view(), Some(&doc.target(parent, index)));

        let change = adapter.change().unwrap();
        let nested = change.parent.id();
        prop_assert!(!doc.tree.is_within(dragged, nested));
        prop_assert!(nested == doc.tree.root() || doc.tree.accepts_children(nested));
        prop_assert!(change.index <= doc.tree.children_of(nested).len());
        prop_assert_eq!(change.depth, change.parent.depth());
        prop_assert_eq!(change.parent.resolve(&doc.tree), Some(nested));
    }
}
