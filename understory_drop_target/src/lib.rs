// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drop_target --heading-base-level=0

//! Understory Drop Target: resolve a pointer position into at most one drop target.
//!
//! ## Overview
//!
//! During a drag, the host feeds pointer moves and scroll notifications to a
//! [`DropTargetResolver`]. The resolver hit tests the host's element tree, asks a
//! [`DropTargetDelegate`] which elements can accept drops and whether to redirect to another
//! one, then measures the chosen parent's children to compute an insertion index and the
//! [`Placement`](understory_drop_geometry::Placement) of an insertion indicator.
//!
//! ## Seams
//!
//! - [`ElementHost`]: element tree, hit testing, bounding rects and scroll offsets.
//!   [`scene::Scene`] is a small retained implementation.
//! - [`LayoutProbe`]: answers the children orientation when a parent has a single rendered
//!   child, where neighbor rects cannot tell. [`NoProbe`] falls back to a column.
//! - [`DropTargetDelegate`]: domain policy. Which elements accept drops, how to redirect a
//!   candidate (the swap protocol), and what to do when the target changes.
//!
//! ## Sessions
//!
//! A session spans one drag. It caches children rects per parent, relative to the parent's
//! content origin, so scrolling never invalidates them. Structural changes mid-drag (a
//! folder expanding on hover) need [`DropTargetResolver::invalidate`].
//! [`DropTargetResolver::handle_end`] returns the final target and resets the session.
//!
//! Delegates are only notified when the target element, its index, its rect, or the
//! indicator geometry changed; repeated moves over the same spot are silent.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cache;
mod host;
mod resolver;
pub mod scene;
mod types;

pub use host::{DeclaredOrientation, ElementHost, LayoutProbe, NoProbe};
pub use resolver::{DropTargetResolver, ResolverConfig};
pub use types::{Candidate, DropTarget, DropTargetDelegate, SwapCandidate};
