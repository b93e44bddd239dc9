// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-session cache of children rects.

use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::{Rect, Vec2};
use smallvec::SmallVec;

use crate::host::ElementHost;

/// `(child index, rect)` pairs for the rendered children of one parent.
pub(crate) type ChildRects = SmallVec<[(usize, Rect); 8]>;

/// Children rects keyed by parent, stored relative to the parent's content origin.
///
/// The content origin is the parent's top-left corner minus its own scroll offset, so an entry
/// stays valid when an outer container scrolls the parent, and when the parent scrolls its own
/// content. Structural changes (children added, removed, expanded or collapsed) need an
/// explicit [`ChildrenRectCache::remove`] or [`ChildrenRectCache::clear`].
///
/// Children with a zero-area rect are not rendered and are left out, but keep their index.
#[derive(Clone, Debug)]
pub(crate) struct ChildrenRectCache<E> {
    entries: HashMap<E, ChildRects>,
}

impl<E: Copy + Eq + Hash> ChildrenRectCache<E> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Absolute rects of `parent`'s rendered children, measuring them on first use.
    pub(crate) fn children_rects<H>(&mut self, host: &H, parent: E, parent_rect: Rect) -> ChildRects
    where
        H: ElementHost<Element = E> + ?Sized,
    {
        let origin = content_origin(host, parent, parent_rect);
        let relative = self.entries.entry(parent).or_insert_with(|| {
            host.children_of(parent)
                .iter()
                .enumerate()
                .filter_map(|(i, &child)| {
                    let rect = host.bounding_rect(child)?;
                    (!rect.is_zero_area()).then_some((i, rect - origin))
                })
                .collect()
        });
        relative.iter().map(|&(i, rect)| (i, rect + origin)).collect()
    }

    pub(crate) fn remove(&mut self, parent: E) {
        self.entries.remove(&parent);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

fn content_origin<H: ElementHost + ?Sized>(host: &H, parent: H::Element, parent_rect: Rect) -> Vec2 {
    parent_rect.origin().to_vec2() - host.scroll_offset(parent)
}
