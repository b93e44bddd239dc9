// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement indicator rendering.
//!
//! [`render_placement`] is a pure function from a [`Placement`] to an [`Overlay`] a renderer
//! can paint directly. It holds no state; call it again on every drop target change.
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_drop_geometry::indicator::{IndicatorStyle, Overlay, render_placement};
//! use understory_drop_geometry::{Orientation, Placement};
//!
//! // An outline row at depth 2, with 10px of indentation per level.
//! let placement = Placement::Line {
//!     x: 0.0,
//!     y: 40.0,
//!     length: 200.0,
//!     orientation: Orientation::Horizontal,
//! };
//! let overlay = render_placement(placement, 2, &IndicatorStyle::outline(10.0));
//! assert_eq!(overlay, Overlay::Line { rect: Rect::new(20.0, 39.0, 200.0, 41.0) });
//! ```

use kurbo::Rect;

use crate::{Orientation, Placement};

/// Visual parameters of the indicator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IndicatorStyle {
    /// Thickness of an insertion line.
    pub line_thickness: f64,
    /// Horizontal offset applied per nesting level to horizontal lines.
    pub indent: f64,
    /// Stroke width of an [`Overlay::Outline`].
    pub outline_width: f64,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            line_thickness: 2.0,
            indent: 0.0,
            outline_width: 1.0,
        }
    }
}

impl IndicatorStyle {
    /// Style for nested outline views: deeper rows get lines indented by `indent` per level.
    pub fn outline(indent: f64) -> Self {
        Self {
            indent,
            ..Self::default()
        }
    }
}

/// What to paint for a [`Placement`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Overlay {
    /// A filled bar covering the insertion line.
    Line {
        /// Bar bounds, centered on the line.
        rect: Rect,
    },
    /// A stroked outline around the parent.
    Outline {
        /// Outlined bounds.
        rect: Rect,
        /// Stroke width.
        width: f64,
    },
}

/// Turn a placement into an overlay.
///
/// `depth` is the nesting level of the insertion point; it only affects horizontal lines,
/// which move right by `depth * style.indent` and shorten by the same amount (down to zero).
pub fn render_placement(placement: Placement, depth: usize, style: &IndicatorStyle) -> Overlay {
    let half = style.line_thickness * 0.5;
    match placement {
        Placement::Line {
            x,
            y,
            length,
            orientation: Orientation::Horizontal,
        } => {
            let offset = depth as f64 * style.indent;
            let start = x + offset;
            let length = (length - offset).max(0.0);
            Overlay::Line {
                rect: Rect::new(start, y - half, start + length, y + half),
            }
        }
        Placement::Line {
            x,
            y,
            length,
            orientation: Orientation::Vertical,
        } => Overlay::Line {
            rect: Rect::new(x - half, y, x + half, y + length),
        },
        Placement::InsideParent { rect } => Overlay::Outline {
            rect,
            width: style.outline_width,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_line_ignores_depth() {
        let placement = Placement::Line {
            x: 50.0,
            y: 0.0,
            length: 20.0,
            orientation: Orientation::Vertical,
        };
        let style = IndicatorStyle::outline(12.0);
        let expected = Overlay::Line {
            rect: Rect::new(49.0, 0.0, 51.0, 20.0),
        };
        assert_eq!(render_placement(placement, 0, &style), expected);
        assert_eq!(render_placement(placement, 3, &style), expected);
    }

    #[test]
    fn horizontal_line_indents_with_depth() {
        let placement = Placement::Line {
            x: 0.0,
            y: 10.0,
            length: 100.0,
            orientation: Orientation::Horizontal,
        };
        let style = IndicatorStyle::outline(16.0);
        assert_eq!(
            render_placement(placement, 0, &style),
            Overlay::Line {
                rect: Rect::new(0.0, 9.0, 100.0, 11.0)
            }
        );
        assert_eq!(
            render_placement(placement, 2, &style),
            Overlay::Line {
                rect: Rect::new(32.0, 9.0, 100.0, 11.0)
            }
        );
    }

    #[test]
    fn deep_indent_never_inverts() {
        let placement = Placement::Line {
            x: 0.0,
            y: 0.0,
            length: 30.0,
            orientation: Orientation::Horizontal,
        };
        let Overlay::Line { rect } = render_placement(placement, 10, &IndicatorStyle::outline(8.0))
        else {
            panic!("expected a line");
        };
        assert_eq!(rect.width(), 0.0);
        assert_eq!(rect.x0, 80.0);
    }

    #[test]
    fn inside_parent_is_an_outline() {
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        assert_eq!(
            render_placement(Placement::InsideParent { rect }, 5, &IndicatorStyle::default()),
            Overlay::Outline { rect, width: 1.0 }
        );
    }
}
