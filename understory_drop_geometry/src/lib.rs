// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drop_geometry --heading-base-level=0

//! Understory Drop Geometry: pure geometry for drag-and-drop target resolution.
//!
//! Everything in this crate is a pure function over [`kurbo::Rect`] and [`kurbo::Point`].
//! It is the leaf layer under `understory_drop_target`, which owns the stateful
//! per-drag resolution, and it knows nothing about trees, elements, or hosts.
//!
//! - [`rects_equal`] and [`is_near_edge`]: change suppression and "between" detection.
//! - [`closest_rect_index`] and [`index_adjustment`]: map a pointer to an insertion index
//!   among a parent's children.
//! - [`infer_orientation`] and [`orientation_from_marker`]: decide whether a parent lays out
//!   its children as a row or a column, from neighboring rects or from a layout probe.
//! - [`placement_between`], [`placement_next_to`], and [`placement_inside`]: build the
//!   [`Placement`] an indicator draws, tried in that order.
//! - [`indicator::render_placement`]: turn a [`Placement`] into an [`indicator::Overlay`].
//!
//! ## Example
//!
//! A row of two 50px-wide children. A pointer in the second half of the second child inserts
//! after it, and the insertion line sits on its trailing edge.
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_drop_geometry::{
//!     Orientation, Placement, Side, closest_rect_index, index_adjustment, infer_orientation,
//!     placement_next_to,
//! };
//!
//! let rects = [Rect::new(0.0, 0.0, 50.0, 20.0), Rect::new(50.0, 0.0, 100.0, 20.0)];
//! let pointer = Point::new(90.0, 10.0);
//!
//! let closest = closest_rect_index(&rects, pointer).unwrap();
//! assert_eq!(closest, 1);
//!
//! let orientation = infer_orientation(Some(rects[0]), rects[1], None).unwrap();
//! assert_eq!(orientation, Orientation::Horizontal);
//!
//! let index = closest + index_adjustment(pointer, rects[closest], orientation);
//! assert_eq!(index, 2);
//!
//! let placement = placement_next_to(rects[1], Side::After, orientation);
//! assert_eq!(
//!     placement,
//!     Placement::Line { x: 100.0, y: 0.0, length: 20.0, orientation: Orientation::Vertical }
//! );
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod edge;
pub mod indicator;
mod orientation;
mod placement;

pub use edge::{closest_rect_index, is_near_edge, rects_equal};
pub use orientation::{Orientation, index_adjustment, infer_orientation, orientation_from_marker};
pub use placement::{Placement, Side, placement_between, placement_inside, placement_next_to};
