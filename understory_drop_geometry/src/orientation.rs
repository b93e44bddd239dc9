// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Local row/column inference and the before/after split.

use kurbo::{Point, Rect};

/// Axis along which a parent's children are laid out, or along which a line runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Left to right (a row).
    Horizontal,
    /// Top to bottom (a column).
    Vertical,
}

impl Orientation {
    /// The other axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Infer how the children around `current` are laid out.
///
/// Each available neighbor is classified against `current`:
/// - overlapping vertical extents with disjoint horizontal extents is a row,
/// - overlapping horizontal extents with disjoint vertical extents is a column,
/// - anything else (diagonal or fully overlapping) goes by the larger center delta,
///   with ties counted as a column.
///
/// A single row-like neighbor wins, so the last item of a wrapped row still reads as a row
/// even though its next sibling sits on the following line.
///
/// Returns `None` when neither neighbor exists; callers fall back to a layout probe.
pub fn infer_orientation(
    previous: Option<Rect>,
    current: Rect,
    next: Option<Rect>,
) -> Option<Orientation> {
    let mut result = None;
    for neighbor in [previous, next].into_iter().flatten() {
        match classify(neighbor, current) {
            Orientation::Horizontal => return Some(Orientation::Horizontal),
            Orientation::Vertical => result = Some(Orientation::Vertical),
        }
    }
    result
}

fn classify(a: Rect, b: Rect) -> Orientation {
    let (a, b) = (a.abs(), b.abs());
    let x_overlap = a.x1.min(b.x1) - a.x0.max(b.x0) > 0.0;
    let y_overlap = a.y1.min(b.y1) - a.y0.max(b.y0) > 0.0;
    match (x_overlap, y_overlap) {
        (false, true) => Orientation::Horizontal,
        (true, false) => Orientation::Vertical,
        _ => {
            let d = a.center() - b.center();
            if d.x.abs() > d.y.abs() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            }
        }
    }
}

/// Read the orientation off a layout-probe marker.
///
/// A zero-content marker inserted among a parent's children collapses along the flow axis:
/// in a row it has no width, in a column it has no height. A marker collapsed on both axes
/// reads as a row.
pub fn orientation_from_marker(marker: Rect) -> Orientation {
    if marker.width().abs() <= marker.height().abs() {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    }
}

/// Whether `point` falls before (`0`) or after (`1`) the middle of `closest` along `orientation`.
///
/// The split is at the center; a point exactly on it counts as "before".
pub fn index_adjustment(point: Point, closest: Rect, orientation: Orientation) -> usize {
    let center = closest.center();
    let after = match orientation {
        Orientation::Horizontal => point.x > center.x,
        Orientation::Vertical => point.y > center.y,
    };
    usize::from(after)
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Rect = Rect::new(0.0, 0.0, 50.0, 20.0);
    const Y: Rect = Rect::new(50.0, 0.0, 100.0, 20.0);

    #[test]
    fn touching_siblings_in_a_row() {
        assert_eq!(infer_orientation(Some(X), Y, None), Some(Orientation::Horizontal));
        assert_eq!(infer_orientation(None, X, Some(Y)), Some(Orientation::Horizontal));
    }

    #[test]
    fn stacked_siblings_in_a_column() {
        let a = Rect::new(0.0, 0.0, 100.0, 20.0);
        let b = Rect::new(0.0, 20.0, 100.0, 40.0);
        let c = Rect::new(0.0, 40.0, 100.0, 60.0);
        assert_eq!(infer_orientation(Some(a), b, Some(c)), Some(Orientation::Vertical));
    }

    #[test]
    fn wrapped_row_stays_a_row() {
        // `b` ends the first line, `c` starts the second one.
        let a = Rect::new(0.0, 0.0, 40.0, 20.0);
        let b = Rect::new(40.0, 0.0, 80.0, 20.0);
        let c = Rect::new(0.0, 20.0, 40.0, 40.0);
        assert_eq!(infer_orientation(Some(a), b, Some(c)), Some(Orientation::Horizontal));
        assert_eq!(infer_orientation(None, b, Some(c)), Some(Orientation::Horizontal));
    }

    #[test]
    fn overlapping_siblings_use_center_delta() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(10.0, 40.0, 110.0, 140.0);
        assert_eq!(infer_orientation(Some(a), b, None), Some(Orientation::Vertical));
        let c = Rect::new(40.0, 10.0, 140.0, 110.0);
        assert_eq!(infer_orientation(Some(a), c, None), Some(Orientation::Horizontal));
    }

    #[test]
    fn lone_child_needs_a_probe() {
        assert_eq!(infer_orientation(None, X, None), None);
    }

    #[test]
    fn marker_collapse() {
        assert_eq!(
            orientation_from_marker(Rect::new(10.0, 0.0, 10.0, 20.0)),
            Orientation::Horizontal
        );
        assert_eq!(
            orientation_from_marker(Rect::new(0.0, 30.0, 200.0, 30.0)),
            Orientation::Vertical
        );
        assert_eq!(orientation_from_marker(Rect::ZERO), Orientation::Horizontal);
    }

    #[test]
    fn adjustment_halves() {
        let h = Orientation::Horizontal;
        assert_eq!(index_adjustment(Point::new(20.0, 10.0), X, h), 0);
        assert_eq!(index_adjustment(Point::new(25.0, 10.0), X, h), 0, "center is before");
        assert_eq!(index_adjustment(Point::new(26.0, 10.0), X, h), 1);
        assert_eq!(index_adjustment(Point::new(90.0, 10.0), Y, h), 1);

        let v = Orientation::Vertical;
        assert_eq!(index_adjustment(Point::new(90.0, 5.0), X, v), 0);
        assert_eq!(index_adjustment(Point::new(0.0, 15.0), X, v), 1);
    }

    #[test]
    fn cross_axis() {
        assert_eq!(Orientation::Horizontal.cross(), Orientation::Vertical);
        assert_eq!(Orientation::Vertical.cross(), Orientation::Horizontal);
    }
}
