// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host capabilities the resolver reads from: element geometry and layout probing.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Rect, Vec2};
use understory_drop_geometry::Orientation;

/// A positioned, renderable element tree owned by the host view.
///
/// The resolver never stores the tree; it only asks these questions during a drag.
/// All rects are in one shared coordinate space (viewport or world space).
pub trait ElementHost {
    /// Opaque handle to an element.
    type Element: Copy + Eq + Hash + Debug;

    /// Deepest element under `point`, if any.
    fn element_at(&self, point: Point) -> Option<Self::Element>;

    /// Parent of `element`, or `None` for a root or an unknown element.
    fn parent_of(&self, element: Self::Element) -> Option<Self::Element>;

    /// Children of `element` in document order.
    fn children_of(&self, element: Self::Element) -> &[Self::Element];

    /// Current bounding rect of `element`, or `None` when it is no longer mounted.
    ///
    /// Elements that are mounted but not rendered (collapsed, hidden) report a zero-area rect.
    fn bounding_rect(&self, element: Self::Element) -> Option<Rect>;

    /// How far `element` has scrolled its own content.
    ///
    /// Children move by the negation of this offset. Hosts without scroll containers can keep
    /// the default.
    fn scroll_offset(&self, _element: Self::Element) -> Vec2 {
        Vec2::ZERO
    }

    /// Returns `true` if `element` is `ancestor` or one of its descendants.
    fn is_within(&self, ancestor: Self::Element, element: Self::Element) -> bool {
        let mut current = Some(element);
        while let Some(e) = current {
            if e == ancestor {
                return true;
            }
            current = self.parent_of(e);
        }
        false
    }
}

/// Fallback for deciding a parent's children orientation when the neighboring rects cannot.
///
/// A browser host measures a transient zero-content marker inserted at `index` among
/// `parent`'s children and reads the collapsed axis with
/// [`orientation_from_marker`](understory_drop_geometry::orientation_from_marker).
/// Hosts that know their layout declare it instead.
pub trait LayoutProbe<H: ElementHost + ?Sized> {
    /// Orientation of `parent`'s children around `index`, or `None` if unknown.
    fn probe(&self, host: &H, parent: H::Element, index: usize) -> Option<Orientation>;
}

/// A probe that never answers; the resolver then assumes a column.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoProbe;

impl<H: ElementHost + ?Sized> LayoutProbe<H> for NoProbe {
    fn probe(&self, _host: &H, _parent: H::Element, _index: usize) -> Option<Orientation> {
        None
    }
}

/// A probe that answers the same orientation for every parent.
///
/// Suits hosts with a uniform layout, such as an outline view where every list is a column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeclaredOrientation(pub Orientation);

impl<H: ElementHost + ?Sized> LayoutProbe<H> for DeclaredOrientation {
    fn probe(&self, _host: &H, _parent: H::Element, _index: usize) -> Option<Orientation> {
        Some(self.0)
    }
}
