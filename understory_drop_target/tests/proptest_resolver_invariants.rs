// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the drop target resolver.
//!
//! Scenes are a column of rows, each holding a few leaves laid out as a row. Delegates accept
//! an arbitrary subset of elements and redirect through an arbitrary table, cycles included.
//!
//! 1. The swap protocol terminates, and a settled target is a fixed point of the redirects.
//! 2. Insertion indices stay within `0..=child_count`.
//! 3. Repeating a move, or scrolling an unchanged scene, does not notify.
//! 4. Ending a session hands back the active target.
//! 5. An accepted element without children is dropped into, at index 0.
//! 6. Without redirects, the target is the first accepting ancestor of the hit element.

use kurbo::{Point, Rect};
use proptest::prelude::*;
use understory_drop_geometry::Placement;
use understory_drop_target::scene::{ElementId, Scene, SceneElement};
use understory_drop_target::{
    Candidate, DropTarget, DropTargetDelegate, DropTargetResolver, ElementHost, ResolverConfig,
    SwapCandidate,
};

// ── Helpers ─────────────────────────────────────────────────────────────

const MAX_ELEMENTS: usize = 40;

fn layouts() -> impl Strategy<Value = Vec<(f64, u32)>> {
    proptest::collection::vec((8.0f64..40.0, 0u32..4), 1..8)
}

fn pointers() -> impl Strategy<Value = (f64, f64)> {
    (-10.0f64..310.0, -10.0f64..410.0)
}

/// Root column of rows; returns every element, root first.
fn build(layout: &[(f64, u32)]) -> (Scene, Vec<ElementId>) {
    let mut scene = Scene::new();
    let root = scene.insert(None, SceneElement::new(Rect::new(0.0, 0.0, 300.0, 400.0)));
    let mut all = vec![root];
    let mut top = 0.0;
    for &(height, leaves) in layout {
        let row = scene.insert(
            Some(root),
            SceneElement::new(Rect::new(0.0, top, 300.0, top + height)),
        );
        all.push(row);
        for i in 0..leaves {
            let x = f64::from(i) * 60.0;
            all.push(scene.insert(
                Some(row),
                SceneElement::new(Rect::new(x, 0.0, x + 50.0, height)),
            ));
        }
        top += height + 4.0;
    }
    (scene, all)
}

struct Policy {
    all: Vec<ElementId>,
    accepts: Vec<bool>,
    redirects: Vec<Option<usize>>,
    swaps: usize,
    notifications: usize,
}

impl Policy {
    fn new(all: Vec<ElementId>, accepts: Vec<bool>, redirects: Vec<Option<usize>>) -> Self {
        Self {
            all,
            accepts,
            redirects,
            swaps: 0,
            notifications: 0,
        }
    }

    fn redirect_of(&self, element: ElementId) -> ElementId {
        let i = self.index_of(element);
        self.redirects[i].map_or(element, |j| self.all[j % self.all.len()])
    }

    fn index_of(&self, element: ElementId) -> usize {
        self.all
            .iter()
            .position(|&e| e == element)
            .expect("element belongs to the scene")
    }

    fn accepts(&self, element: ElementId) -> bool {
        let i = self.index_of(element);
        i == 0 || self.accepts[i]
    }
}

impl DropTargetDelegate<ElementId> for Policy {
    type Data = ();

    fn is_drop_target(&mut self, element: ElementId) -> Option<()> {
        // The root always accepts so most pointers produce a candidate.
        (self.all.contains(&element) && self.accepts(element)).then_some(())
    }

    fn swap_drop_target(
        &mut self,
        candidate: Option<SwapCandidate<(), ElementId>>,
    ) -> Option<Candidate<(), ElementId>> {
        self.swaps += 1;
        let element = self.redirect_of(candidate?.candidate.element);
        Some(Candidate { data: (), element })
    }

    fn on_drop_target_change(&mut self, _target: Option<&DropTarget<(), ElementId>>) {
        self.notifications += 1;
    }
}

fn resolver(root: ElementId) -> DropTargetResolver<ElementId, ()> {
    let mut r = DropTargetResolver::new(ResolverConfig::default());
    r.bind_root(Some(root));
    r
}

fn policies() -> impl Strategy<Value = (Vec<bool>, Vec<Option<usize>>)> {
    (
        proptest::collection::vec(any::<bool>(), MAX_ELEMENTS),
        proptest::collection::vec(proptest::option::of(0usize..64), MAX_ELEMENTS),
    )
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Swap termination
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn swap_terminates_at_a_fixed_point(
        layout in layouts(),
        (accepts, redirects) in policies(),
        moves in proptest::collection::vec(pointers(), 1..6),
    ) {
        let (scene, all) = build(&layout);
        let mut policy = Policy::new(all.clone(), accepts, redirects);
        let mut r = resolver(all[0]);
        let cap = r.config().max_swap_iterations;

        for (x, y) in moves {
            policy.swaps = 0;
            r.handle_move(&scene, &mut policy, Point::new(x, y));
            prop_assert!(policy.swaps <= cap, "{} swap rounds", policy.swaps);
            if let Some(target) = r.drop_target() {
                prop_assert_eq!(policy.redirect_of(target.element), target.element);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Index bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn index_within_child_count(
        layout in layouts(),
        (accepts, redirects) in policies(),
        (x, y) in pointers(),
    ) {
        let (scene, all) = build(&layout);
        let mut policy = Policy::new(all.clone(), accepts, redirects);
        let mut r = resolver(all[0]);

        r.handle_move(&scene, &mut policy, Point::new(x, y));
        if let Some(target) = r.drop_target() {
            let count = scene.children_of(target.element).len();
            prop_assert!(
                target.index_within_children <= count,
                "index {} with {} children",
                target.index_within_children,
                count
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. No duplicate notifications
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn repeated_input_is_silent(
        layout in layouts(),
        (accepts, redirects) in policies(),
        (x, y) in pointers(),
    ) {
        let (scene, all) = build(&layout);
        let mut policy = Policy::new(all.clone(), accepts, redirects);
        let mut r = resolver(all[0]);
        let point = Point::new(x, y);

        r.handle_move(&scene, &mut policy, point);
        let after_first = policy.notifications;
        prop_assert!(after_first <= 1);

        r.handle_move(&scene, &mut policy, point);
        r.handle_scroll(&scene, &mut policy);
        prop_assert_eq!(policy.notifications, after_first);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. End of session
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn end_returns_active_target(
        layout in layouts(),
        (accepts, redirects) in policies(),
        moves in proptest::collection::vec(pointers(), 1..6),
    ) {
        let (scene, all) = build(&layout);
        let mut policy = Policy::new(all.clone(), accepts, redirects);
        let mut r = resolver(all[0]);

        for (x, y) in moves {
            r.handle_move(&scene, &mut policy, Point::new(x, y));
        }
        let active = r.drop_target().cloned();
        let before = policy.notifications;
        let ended = r.handle_end(&mut policy);

        prop_assert_eq!(ended.clone(), active);
        prop_assert_eq!(policy.notifications, before + usize::from(ended.is_some()));
        prop_assert!(r.drop_target().is_none());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Childless targets
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn childless_target_is_dropped_into(
        layout in layouts(),
        accepts in proptest::collection::vec(any::<bool>(), MAX_ELEMENTS),
        pick in any::<usize>(),
    ) {
        let (scene, all) = build(&layout);
        let childless: Vec<_> = all
            .iter()
            .copied()
            .skip(1)
            .filter(|&e| scene.children_of(e).is_empty())
            .collect();
        prop_assume!(!childless.is_empty());
        let target = childless[pick % childless.len()];
        let rect = scene.bounding_rect(target).unwrap();
        prop_assume!(scene.element_at(rect.center()) == Some(target));

        let mut policy = Policy::new(all.clone(), accepts, vec![None; MAX_ELEMENTS]);
        let i = policy.index_of(target);
        policy.accepts[i] = true;
        let mut r = resolver(all[0]);

        r.handle_move(&scene, &mut policy, rect.center());
        let resolved = r.drop_target().unwrap();
        prop_assert_eq!(resolved.element, target);
        prop_assert_eq!(resolved.index_within_children, 0);
        prop_assert_eq!(resolved.placement, Placement::InsideParent { rect });
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Climbing without redirects
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn identity_redirects_pick_the_first_accepting_ancestor(
        layout in layouts(),
        accepts in proptest::collection::vec(any::<bool>(), MAX_ELEMENTS),
        (x, y) in pointers(),
    ) {
        let (scene, all) = build(&layout);
        let mut policy = Policy::new(all.clone(), accepts, vec![None; MAX_ELEMENTS]);
        let mut r = resolver(all[0]);
        let point = Point::new(x, y);

        let mut expected = scene.element_at(point);
        while let Some(e) = expected
            && !policy.accepts(e)
        {
            expected = scene.parent_of(e);
        }

        r.handle_move(&scene, &mut policy, point);
        prop_assert_eq!(r.drop_target().map(|t| t.element), expected);
    }
}
