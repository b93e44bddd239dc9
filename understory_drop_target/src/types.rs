// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidates, resolved drop targets, and the delegate contract.

use kurbo::Rect;
use understory_drop_geometry::Placement;

/// A provisional target before redirection.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate<D, E> {
    /// Domain data the delegate attached to `element`.
    pub data: D,
    /// The element this candidate stands for.
    pub element: E,
}

/// A candidate handed to [`DropTargetDelegate::swap_drop_target`].
#[derive(Clone, Debug, PartialEq)]
pub struct SwapCandidate<D, E> {
    /// The candidate to accept or redirect.
    pub candidate: Candidate<D, E>,
    /// Whether the pointer is within the edge threshold of the candidate's rect.
    ///
    /// Only the raw hit-test candidate carries this; redirected candidates re-enter the
    /// protocol with `false`.
    pub near_edge: bool,
}

/// A finalized candidate: where to insert and what to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct DropTarget<D, E> {
    /// Domain data for the parent being dropped into.
    pub data: D,
    /// Element of the parent being dropped into.
    pub element: E,
    /// Bounds of `element` at resolution time.
    pub rect: Rect,
    /// Insertion index among the parent's children, in `0..=child_count`.
    pub index_within_children: usize,
    /// Indicator geometry.
    pub placement: Placement,
}

impl<D: Clone, E: Copy> DropTarget<D, E> {
    /// The candidate this target was resolved from.
    pub fn candidate(&self) -> Candidate<D, E> {
        Candidate {
            data: self.data.clone(),
            element: self.element,
        }
    }
}

/// Domain hooks the resolver calls while resolving.
///
/// The delegate is passed to each resolver call rather than owned by it, so one can be built
/// per event from borrowed document state.
pub trait DropTargetDelegate<E> {
    /// Domain data attached to drop target elements.
    type Data;

    /// Domain data for `element` if it can be a drop target, `None` otherwise.
    ///
    /// The resolver climbs from the hit element toward the bound root and stops at the first
    /// element this accepts.
    fn is_drop_target(&mut self, element: E) -> Option<Self::Data>;

    /// Accept `candidate` by returning it unchanged, or redirect to another candidate.
    ///
    /// The resolver keeps calling this with each redirected result until the returned element
    /// equals the one passed in. `None` in or out means "no target".
    /// The default accepts everything.
    fn swap_drop_target(
        &mut self,
        candidate: Option<SwapCandidate<Self::Data, E>>,
    ) -> Option<Candidate<Self::Data, E>> {
        candidate.map(|c| c.candidate)
    }

    /// The active drop target changed; `None` means there is no target anymore.
    fn on_drop_target_change(&mut self, target: Option<&DropTarget<Self::Data, E>>);
}
