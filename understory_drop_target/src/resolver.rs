// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stateful per-drag resolver.
//!
//! ## Overview
//!
//! [`DropTargetResolver`] turns a pointer position into at most one [`DropTarget`].
//! Each move runs these steps:
//!
//! 1. Hit test with [`ElementHost::element_at`] and climb toward the bound root until the
//!    delegate accepts an element as a drop target.
//! 2. Flag whether the pointer is within [`ResolverConfig::edge_distance_threshold`] of that
//!    element's edges.
//! 3. Run the swap protocol through [`DropTargetDelegate::swap_drop_target`] until the
//!    returned element equals the one passed in. This is skipped when neither the hit
//!    candidate nor the near-edge flag changed since the last move.
//! 4. Pick the closest child of the target, infer the children orientation, and derive the
//!    insertion index and [`Placement`].
//! 5. Notify [`DropTargetDelegate::on_drop_target_change`] only when something changed.
//!
//! ## Failure policy
//!
//! Nothing panics. No element under the pointer, an unmounted or zero-area target, and a
//! swap protocol that does not settle within [`ResolverConfig::max_swap_iterations`] rounds
//! all resolve to "no target", clearing any previous one.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Rect};
use smallvec::SmallVec;
use understory_drop_geometry::{
    Orientation, Placement, Side, closest_rect_index, index_adjustment, infer_orientation,
    is_near_edge, placement_between, placement_inside, placement_next_to, rects_equal,
};

use crate::cache::ChildrenRectCache;
use crate::host::{ElementHost, LayoutProbe, NoProbe};
use crate::types::{Candidate, DropTarget, DropTargetDelegate, SwapCandidate};

/// Resolver configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolverConfig {
    /// Distance from a candidate's edge within which the pointer counts as "near the edge".
    pub edge_distance_threshold: f64,
    /// Rounds of the swap protocol before giving up on a target.
    pub max_swap_iterations: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            edge_distance_threshold: 3.0,
            max_swap_iterations: 32,
        }
    }
}

impl ResolverConfig {
    /// Default configuration with a custom edge threshold.
    pub fn with_edge_distance_threshold(edge_distance_threshold: f64) -> Self {
        Self {
            edge_distance_threshold,
            ..Self::default()
        }
    }
}

/// Resolves pointer positions into drop targets for one drag at a time.
///
/// `E` is the host's element handle, `D` the delegate's data, and `P` the [`LayoutProbe`]
/// consulted when a parent has a single rendered child.
///
/// The resolver owns the session state (last pointer, current target, children-rect cache);
/// the host and delegate are borrowed per call.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use understory_drop_target::scene::{ElementId, Scene, SceneElement};
/// use understory_drop_target::{
///     DropTarget, DropTargetDelegate, DropTargetResolver, ResolverConfig,
/// };
///
/// struct Containers(Vec<ElementId>, usize);
///
/// impl DropTargetDelegate<ElementId> for Containers {
///     type Data = ();
///     fn is_drop_target(&mut self, element: ElementId) -> Option<()> {
///         self.0.contains(&element).then_some(())
///     }
///     fn on_drop_target_change(&mut self, _target: Option<&DropTarget<(), ElementId>>) {
///         self.1 += 1;
///     }
/// }
///
/// let mut scene = Scene::new();
/// let list = scene.insert(None, SceneElement::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
/// scene.insert(Some(list), SceneElement::new(Rect::new(0.0, 0.0, 100.0, 20.0)));
/// scene.insert(Some(list), SceneElement::new(Rect::new(0.0, 20.0, 100.0, 40.0)));
///
/// let mut delegate = Containers(vec![list], 0);
/// let mut resolver = DropTargetResolver::<ElementId, ()>::new(ResolverConfig::default());
/// resolver.bind_root(Some(list));
///
/// resolver.handle_move(&scene, &mut delegate, Point::new(50.0, 35.0));
/// resolver.handle_move(&scene, &mut delegate, Point::new(50.0, 35.0));
/// let target = resolver.drop_target().unwrap();
/// assert_eq!(target.element, list);
/// assert_eq!(target.index_within_children, 2);
/// assert_eq!(delegate.1, 1);
/// ```
#[derive(Debug)]
pub struct DropTargetResolver<E, D, P = NoProbe> {
    config: ResolverConfig,
    probe: P,
    root: Option<E>,
    pointer: Option<Point>,
    drop_target: Option<DropTarget<D, E>>,
    cache: ChildrenRectCache<E>,
    /// Hit candidate element and near-edge flag the last swap ran for.
    last_candidate: Option<(Option<E>, bool)>,
    last_swapped: Option<Candidate<D, E>>,
}

impl<E, D, P> DropTargetResolver<E, D, P>
where
    E: Copy + Eq + Hash + Debug,
    P: Default,
{
    /// Create a resolver with a default-constructed probe.
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_probe(config, P::default())
    }
}

impl<E, D, P> DropTargetResolver<E, D, P>
where
    E: Copy + Eq + Hash + Debug,
{
    /// Create a resolver with an explicit layout probe.
    pub fn with_probe(config: ResolverConfig, probe: P) -> Self {
        Self {
            config,
            probe,
            root: None,
            pointer: None,
            drop_target: None,
            cache: ChildrenRectCache::new(),
            last_candidate: None,
            last_swapped: None,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Scope resolution to `root` and its descendants; `None` disables resolution.
    ///
    /// Rebinding drops cached geometry; the next move resolves from scratch.
    pub fn bind_root(&mut self, root: Option<E>) {
        if self.root != root {
            self.root = root;
            self.forget_geometry();
        }
    }

    /// The bound root, if any.
    pub fn root(&self) -> Option<E> {
        self.root
    }

    /// Last pointer position seen in this session.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// The active drop target, if any.
    pub fn drop_target(&self) -> Option<&DropTarget<D, E>> {
        self.drop_target.as_ref()
    }

    /// Number of parents whose children rects are cached.
    pub fn cached_parents(&self) -> usize {
        self.cache.len()
    }

    /// Drop all cached children rects, e.g. after a subtree was expanded mid-drag.
    ///
    /// The next move or scroll re-measures and re-runs the swap protocol.
    pub fn invalidate(&mut self) {
        self.forget_geometry();
    }

    /// Drop the cached children rects of one parent.
    pub fn invalidate_element(&mut self, element: E) {
        self.cache.remove(element);
        self.last_candidate = None;
    }

    fn forget_geometry(&mut self) {
        self.cache.clear();
        self.last_candidate = None;
        self.last_swapped = None;
    }

    /// End the session: forget all state and return the final target.
    ///
    /// If a target was active, the delegate is told it is gone.
    pub fn handle_end<Dl>(&mut self, delegate: &mut Dl) -> Option<DropTarget<D, E>>
    where
        Dl: DropTargetDelegate<E, Data = D> + ?Sized,
    {
        let target = self.drop_target.take();
        self.pointer = None;
        self.forget_geometry();
        if target.is_some() {
            delegate.on_drop_target_change(None);
        }
        target
    }
}

impl<E, D, P> DropTargetResolver<E, D, P>
where
    E: Copy + Eq + Hash + Debug,
    D: Clone,
{
    /// Resolve the target under `point`.
    pub fn handle_move<H, Dl>(&mut self, host: &H, delegate: &mut Dl, point: Point)
    where
        H: ElementHost<Element = E> + ?Sized,
        Dl: DropTargetDelegate<E, Data = D> + ?Sized,
        P: LayoutProbe<H>,
    {
        self.pointer = Some(point);
        self.resolve(host, delegate, point, false);
    }

    /// Content moved under a stationary pointer; resolve again at the last position.
    ///
    /// Does nothing before the first move of a session.
    pub fn handle_scroll<H, Dl>(&mut self, host: &H, delegate: &mut Dl)
    where
        H: ElementHost<Element = E> + ?Sized,
        Dl: DropTargetDelegate<E, Data = D> + ?Sized,
        P: LayoutProbe<H>,
    {
        if let Some(point) = self.pointer {
            self.resolve(host, delegate, point, true);
        }
    }

    fn resolve<H, Dl>(&mut self, host: &H, delegate: &mut Dl, point: Point, force: bool)
    where
        H: ElementHost<Element = E> + ?Sized,
        Dl: DropTargetDelegate<E, Data = D> + ?Sized,
        P: LayoutProbe<H>,
    {
        let candidate = self.find_candidate(host, delegate, point);
        let near_edge = candidate
            .as_ref()
            .and_then(|c| host.bounding_rect(c.element))
            .is_some_and(|rect| is_near_edge(point, self.config.edge_distance_threshold, rect));

        let key = (candidate.as_ref().map(|c| c.element), near_edge);
        let swapped = if !force && self.last_candidate == Some(key) {
            self.last_swapped.clone()
        } else {
            let swapped = self.swap(
                delegate,
                candidate.map(|candidate| SwapCandidate {
                    candidate,
                    near_edge,
                }),
            );
            self.last_candidate = Some(key);
            self.last_swapped = swapped.clone();
            swapped
        };

        let next = swapped.and_then(|c| self.measure(host, c, point));
        self.update(delegate, next);
    }

    fn find_candidate<H, Dl>(
        &self,
        host: &H,
        delegate: &mut Dl,
        point: Point,
    ) -> Option<Candidate<D, E>>
    where
        H: ElementHost<Element = E> + ?Sized,
        Dl: DropTargetDelegate<E, Data = D> + ?Sized,
    {
        let root = self.root?;
        let hit = host.element_at(point)?;
        if !host.is_within(root, hit) {
            return None;
        }
        let mut current = hit;
        loop {
            if let Some(data) = delegate.is_drop_target(current) {
                return Some(Candidate {
                    data,
                    element: current,
                });
            }
            if current == root {
                return None;
            }
            current = host.parent_of(current)?;
        }
    }

    fn swap<Dl>(
        &self,
        delegate: &mut Dl,
        mut input: Option<SwapCandidate<D, E>>,
    ) -> Option<Candidate<D, E>>
    where
        Dl: DropTargetDelegate<E, Data = D> + ?Sized,
    {
        for _ in 0..self.config.max_swap_iterations.max(1) {
            let before = input.as_ref().map(|c| c.candidate.element);
            let output = delegate.swap_drop_target(input);
            if output.as_ref().map(|c| c.element) == before {
                return output;
            }
            input = output.map(|candidate| SwapCandidate {
                candidate,
                near_edge: false,
            });
        }
        tracing::warn!(
            max_swap_iterations = self.config.max_swap_iterations,
            "drop target redirection did not settle; resolving to no target"
        );
        None
    }

    fn measure<H>(
        &mut self,
        host: &H,
        candidate: Candidate<D, E>,
        point: Point,
    ) -> Option<DropTarget<D, E>>
    where
        H: ElementHost<Element = E> + ?Sized,
        P: LayoutProbe<H>,
    {
        let Some(rect) = host.bounding_rect(candidate.element) else {
            tracing::debug!(element = ?candidate.element, "drop target is not mounted");
            return None;
        };
        if rect.is_zero_area() {
            tracing::debug!(element = ?candidate.element, "drop target has no area");
            return None;
        }

        let children = self.cache.children_rects(host, candidate.element, rect);
        let (index, placement) = if children.is_empty() {
            (0, placement_inside(rect))
        } else {
            let rects: SmallVec<[Rect; 8]> = children.iter().map(|&(_, r)| r).collect();
            let closest = closest_rect_index(&rects, point)?;
            let orientation = infer_orientation(
                closest.checked_sub(1).map(|i| rects[i]),
                rects[closest],
                rects.get(closest + 1).copied(),
            )
            .or_else(|| self.probe.probe(host, candidate.element, children[closest].0))
            .unwrap_or(Orientation::Vertical);

            let adjustment = index_adjustment(point, rects[closest], orientation);
            let position = closest + adjustment;
            let index = match children.get(position) {
                Some(&(i, _)) => i,
                None => children.last().map_or(0, |&(i, _)| i + 1),
            };

            let previous = position.checked_sub(1).map(|i| rects[i]);
            let next = rects.get(position).copied();
            let placement = previous
                .zip(next)
                .and_then(|(a, b)| placement_between(a, b))
                .unwrap_or_else(|| {
                    let side = if adjustment == 1 {
                        Side::After
                    } else {
                        Side::Before
                    };
                    placement_next_to(rects[closest], side, orientation)
                });
            let child_count = host.children_of(candidate.element).len();
            (index.min(child_count), placement)
        };

        Some(DropTarget {
            data: candidate.data,
            element: candidate.element,
            rect,
            index_within_children: index,
            placement,
        })
    }

    fn update<Dl>(&mut self, delegate: &mut Dl, next: Option<DropTarget<D, E>>)
    where
        Dl: DropTargetDelegate<E, Data = D> + ?Sized,
    {
        let changed = match (&self.drop_target, &next) {
            (None, None) => false,
            (Some(a), Some(b)) => {
                a.element != b.element
                    || a.index_within_children != b.index_within_children
                    || !rects_equal(a.rect, b.rect)
                    || !placements_equal(a.placement, b.placement)
            }
            _ => true,
        };
        if !changed {
            return;
        }
        match &next {
            Some(t) => tracing::trace!(
                element = ?t.element,
                index = t.index_within_children,
                "drop target changed"
            ),
            None => tracing::trace!("drop target cleared"),
        }
        self.drop_target = next;
        delegate.on_drop_target_change(self.drop_target.as_ref());
    }
}

fn placements_equal(a: Placement, b: Placement) -> bool {
    match (a, b) {
        (Placement::InsideParent { rect: a }, Placement::InsideParent { rect: b }) => {
            rects_equal(a, b)
        }
        (a, b) => a == b,
    }
}
