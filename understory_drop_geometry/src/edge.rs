// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rect comparisons and nearest-rect search.

use kurbo::{Point, Rect};

/// Exact equality on all four edges.
///
/// Used to suppress change notifications; no epsilon is applied.
pub fn rects_equal(a: Rect, b: Rect) -> bool {
    a.x0 == b.x0 && a.y0 == b.y0 && a.x1 == b.x1 && a.y1 == b.y1
}

/// Returns `true` when `point` is inside `rect` and within `threshold` of any of its edges.
///
/// Edges are inclusive on both counts: a point exactly `threshold` away from an edge is near it,
/// and a point on the boundary is inside. Points outside the rect are never near its edges.
pub fn is_near_edge(point: Point, threshold: f64, rect: Rect) -> bool {
    let rect = rect.abs();
    if !(point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1) {
        return false;
    }
    point.x - rect.x0 <= threshold
        || rect.x1 - point.x <= threshold
        || point.y - rect.y0 <= threshold
        || rect.y1 - point.y <= threshold
}

/// Index of the rect nearest to `point`, or `None` for an empty slice.
///
/// The metric is, in order:
/// 1. squared Euclidean distance from `point` to the rect (zero anywhere inside it),
/// 2. squared Euclidean distance from `point` to the rect's center,
/// 3. the lower index.
///
/// The first key makes a pointer inside a wide child pick that child even when a narrow
/// neighbor's center is closer; the second settles overlaps and points outside all rects.
pub fn closest_rect_index(rects: &[Rect], point: Point) -> Option<usize> {
    let mut best: Option<(usize, f64, f64)> = None;
    for (i, rect) in rects.iter().enumerate() {
        let outside = distance_squared_to_rect(*rect, point);
        let center = rect.center().distance_squared(point);
        let better = match best {
            None => true,
            Some((_, best_outside, best_center)) => {
                outside < best_outside || (outside == best_outside && center < best_center)
            }
        };
        if better {
            best = Some((i, outside, center));
        }
    }
    best.map(|(i, _, _)| i)
}

fn distance_squared_to_rect(rect: Rect, point: Point) -> f64 {
    let rect = rect.abs();
    let dx = (rect.x0 - point.x).max(0.0).max(point.x - rect.x1);
    let dy = (rect.y0 - point.y).max(0.0).max(point.y - rect.y1);
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_exact() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rects_equal(a, Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!rects_equal(a, Rect::new(0.0, 0.0, 10.0, 10.000_001)));
        assert!(!rects_equal(a, Rect::new(1.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn near_each_edge() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(is_near_edge(Point::new(2.0, 25.0), 3.0, r), "left");
        assert!(is_near_edge(Point::new(98.0, 25.0), 3.0, r), "right");
        assert!(is_near_edge(Point::new(50.0, 1.0), 3.0, r), "top");
        assert!(is_near_edge(Point::new(50.0, 47.0), 3.0, r), "bottom");
        assert!(!is_near_edge(Point::new(50.0, 25.0), 3.0, r), "center");
    }

    #[test]
    fn threshold_is_inclusive_and_outside_is_never_near() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(is_near_edge(Point::new(3.0, 25.0), 3.0, r));
        assert!(!is_near_edge(Point::new(3.5, 25.0), 3.0, r));
        assert!(!is_near_edge(Point::new(-1.0, 25.0), 3.0, r));
        assert!(!is_near_edge(Point::new(50.0, 51.0), 3.0, r));
    }

    #[test]
    fn closest_prefers_containing_rect() {
        // The pointer is inside the wide rect but closer to the narrow rect's center.
        let rects = [Rect::new(0.0, 0.0, 200.0, 10.0), Rect::new(200.0, 0.0, 210.0, 10.0)];
        assert_eq!(closest_rect_index(&rects, Point::new(195.0, 5.0)), Some(0));
    }

    #[test]
    fn closest_outside_all_rects() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, 20.0, 10.0, 30.0),
            Rect::new(0.0, 40.0, 10.0, 50.0),
        ];
        assert_eq!(closest_rect_index(&rects, Point::new(50.0, 33.0)), Some(1));
        assert_eq!(closest_rect_index(&rects, Point::new(5.0, 100.0)), Some(2));
    }

    #[test]
    fn closest_ties_go_to_lower_index() {
        let rects = [Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(20.0, 0.0, 30.0, 10.0)];
        // Equidistant from both edges and both centers.
        assert_eq!(closest_rect_index(&rects, Point::new(15.0, 5.0)), Some(0));
        // Identical rects.
        let same = [Rect::new(0.0, 0.0, 10.0, 10.0); 3];
        assert_eq!(closest_rect_index(&same, Point::new(5.0, 5.0)), Some(0));
    }

    #[test]
    fn closest_of_nothing() {
        assert_eq!(closest_rect_index(&[], Point::ZERO), None);
    }
}
