// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion placements: where the drop indicator goes.

use kurbo::Rect;

use crate::Orientation;

/// Geometric description of the insertion indicator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Placement {
    /// A line segment starting at `(x, y)`.
    ///
    /// `orientation` is the direction the segment runs, which is the cross axis of the
    /// children layout: children in a row get a vertical line.
    Line {
        /// Start x.
        x: f64,
        /// Start y.
        y: f64,
        /// Length along `orientation`.
        length: f64,
        /// Direction the segment runs.
        orientation: Orientation,
    },
    /// The parent has no children to place between; outline the parent itself.
    InsideParent {
        /// Parent bounds.
        rect: Rect,
    },
}

/// Which edge of a child a [`placement_next_to`] line hugs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// Leading edge (left in a row, top in a column).
    Before,
    /// Trailing edge (right in a row, bottom in a column).
    After,
}

/// A line centered in the gap between two consecutive siblings.
///
/// `b` must follow `a` on the same row (`b` starts at or after `a` ends horizontally, and
/// their vertical extents overlap) or in the same column. Otherwise, for instance when the
/// pair straddles a wrapped line, this returns `None`.
pub fn placement_between(a: Rect, b: Rect) -> Option<Placement> {
    let (a, b) = (a.abs(), b.abs());
    let x_overlap = a.x1.min(b.x1) - a.x0.max(b.x0) > 0.0;
    let y_overlap = a.y1.min(b.y1) - a.y0.max(b.y0) > 0.0;
    if b.x0 >= a.x1 && y_overlap {
        let y = a.y0.min(b.y0);
        return Some(Placement::Line {
            x: (a.x1 + b.x0) * 0.5,
            y,
            length: a.y1.max(b.y1) - y,
            orientation: Orientation::Vertical,
        });
    }
    if b.y0 >= a.y1 && x_overlap {
        let x = a.x0.min(b.x0);
        return Some(Placement::Line {
            x,
            y: (a.y1 + b.y0) * 0.5,
            length: a.x1.max(b.x1) - x,
            orientation: Orientation::Horizontal,
        });
    }
    None
}

/// A line on one edge of `rect`, for children laid out along `orientation`.
///
/// Used when only one neighbor of the insertion point exists (first or last index), or when
/// [`placement_between`] rejected a pair.
pub fn placement_next_to(rect: Rect, side: Side, orientation: Orientation) -> Placement {
    let rect = rect.abs();
    match orientation {
        Orientation::Horizontal => Placement::Line {
            x: match side {
                Side::Before => rect.x0,
                Side::After => rect.x1,
            },
            y: rect.y0,
            length: rect.height(),
            orientation: Orientation::Vertical,
        },
        Orientation::Vertical => Placement::Line {
            x: rect.x0,
            y: match side {
                Side::Before => rect.y0,
                Side::After => rect.y1,
            },
            length: rect.width(),
            orientation: Orientation::Horizontal,
        },
    }
}

/// Outline the parent itself; used when it has no children to place between.
pub fn placement_inside(rect: Rect) -> Placement {
    Placement::InsideParent { rect }
}
