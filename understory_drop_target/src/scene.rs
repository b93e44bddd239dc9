// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small retained element tree implementing [`ElementHost`].
//!
//! [`Scene`] is what tests, demos, and simple hosts resolve against. Each element has a rect
//! relative to its parent's content origin, an optional scroll offset for its own content,
//! an optional declared child layout, and visibility/picking flags.
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_drop_target::ElementHost;
//! use understory_drop_target::scene::{Scene, SceneElement};
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(None, SceneElement::new(Rect::new(0.0, 0.0, 200.0, 200.0)));
//! let child = scene.insert(Some(root), SceneElement::new(Rect::new(10.0, 10.0, 50.0, 50.0)));
//!
//! assert_eq!(scene.element_at(Point::new(20.0, 20.0)), Some(child));
//! assert_eq!(scene.element_at(Point::new(150.0, 150.0)), Some(root));
//! assert_eq!(scene.bounding_rect(child), Some(Rect::new(10.0, 10.0, 50.0, 50.0)));
//! ```

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};
use understory_drop_geometry::Orientation;

use crate::host::{ElementHost, LayoutProbe};

/// Generational handle of a [`Scene`] element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(u32, u32);

impl ElementId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Element flags controlling rendering and hit testing.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is rendered. Hidden elements and their subtrees report zero-area rects.
        const VISIBLE  = 0b0000_0001;
        /// Element can be returned from hit tests. Its children still can when this is unset.
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Local data of a scene element.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneElement {
    /// Bounds relative to the parent's content origin (or the world origin for roots).
    pub rect: Rect,
    /// Scroll offset of this element's content.
    pub scroll: Vec2,
    /// Declared layout of the children, answered by [`SceneProbe`].
    pub layout: Option<Orientation>,
    /// Rendering and picking flags.
    pub flags: ElementFlags,
}

impl SceneElement {
    /// A visible, pickable element at `rect` with no declared layout.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            scroll: Vec2::ZERO,
            layout: None,
            flags: ElementFlags::default(),
        }
    }

    /// Declare the children layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Orientation) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Replace the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags = flags;
        self
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    element: SceneElement,
}

/// Retained element tree.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    slots: Vec<Option<Slot>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    roots: Vec<ElementId>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element under `parent`, or as a new root when `parent` is `None`.
    ///
    /// A stale `parent` inserts a root.
    pub fn insert(&mut self, parent: Option<ElementId>, element: SceneElement) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.slots.push(None);
            self.generations.push(1);
            (self.slots.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId uses 32-bit indices by design."
        )]
        let id = ElementId(idx as u32, generation);
        let parent = parent.filter(|&p| self.is_alive(p));
        self.slots[idx] = Some(Slot {
            generation,
            parent,
            children: Vec::new(),
            element,
        });
        match parent {
            Some(p) => self.slot_mut(p).children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Remove an element and its subtree.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        match self.slot(id).parent {
            Some(p) => self.slot_mut(p).children.retain(|&c| c != id),
            None => self.roots.retain(|&r| r != id),
        }
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, id: ElementId) {
        let children = core::mem::take(&mut self.slot_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.slots[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns `true` if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.slots
            .get(id.idx())
            .and_then(Option::as_ref)
            .is_some_and(|s| s.generation == id.1)
    }

    /// Local data of a live element.
    pub fn element(&self, id: ElementId) -> Option<&SceneElement> {
        self.live(id).map(|s| &s.element)
    }

    /// Mutable local data of a live element.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut SceneElement> {
        if !self.is_alive(id) {
            return None;
        }
        Some(&mut self.slot_mut(id).element)
    }

    /// Scroll an element's content by `delta`.
    pub fn scroll_by(&mut self, id: ElementId, delta: Vec2) {
        if let Some(e) = self.element_mut(id) {
            e.scroll += delta;
        }
    }

    /// Root elements in insertion order.
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    fn live(&self, id: ElementId) -> Option<&Slot> {
        self.slots
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|s| s.generation == id.1)
    }

    fn slot(&self, id: ElementId) -> &Slot {
        self.slots[id.idx()].as_ref().expect("dangling ElementId")
    }

    fn slot_mut(&mut self, id: ElementId) -> &mut Slot {
        self.slots[id.idx()].as_mut().expect("dangling ElementId")
    }

    /// World-space origin of `id`'s content box and whether the whole chain is visible.
    fn content_origin(&self, id: ElementId) -> (Vec2, bool) {
        let slot = self.slot(id);
        let (parent_origin, parent_visible) = match slot.parent {
            Some(p) => self.content_origin(p),
            None => (Vec2::ZERO, true),
        };
        let origin = parent_origin + slot.element.rect.origin().to_vec2() - slot.element.scroll;
        let visible = parent_visible && slot.element.flags.contains(ElementFlags::VISIBLE);
        (origin, visible)
    }

    fn hit(&self, id: ElementId, parent_origin: Vec2, point: Point) -> Option<ElementId> {
        let slot = self.live(id)?;
        if !slot.element.flags.contains(ElementFlags::VISIBLE) {
            return None;
        }
        let world = slot.element.rect + parent_origin;
        if !world.contains(point) {
            return None;
        }
        let origin = world.origin().to_vec2() - slot.element.scroll;
        // Later siblings paint on top.
        for &child in slot.children.iter().rev() {
            if let Some(hit) = self.hit(child, origin, point) {
                return Some(hit);
            }
        }
        slot.element
            .flags
            .contains(ElementFlags::PICKABLE)
            .then_some(id)
    }
}

impl ElementHost for Scene {
    type Element = ElementId;

    fn element_at(&self, point: Point) -> Option<ElementId> {
        self.roots
            .iter()
            .rev()
            .find_map(|&root| self.hit(root, Vec2::ZERO, point))
    }

    fn parent_of(&self, element: ElementId) -> Option<ElementId> {
        self.live(element)?.parent
    }

    fn children_of(&self, element: ElementId) -> &[ElementId] {
        match self.live(element) {
            Some(slot) => &slot.children,
            None => &[],
        }
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        let slot = self.live(element)?;
        let (parent_origin, parent_visible) = match slot.parent {
            Some(p) => self.content_origin(p),
            None => (Vec2::ZERO, true),
        };
        let rect = slot.element.rect + parent_origin;
        if parent_visible && slot.element.flags.contains(ElementFlags::VISIBLE) {
            Some(rect)
        } else {
            Some(Rect::from_origin_size(rect.origin(), Size::ZERO))
        }
    }

    fn scroll_offset(&self, element: ElementId) -> Vec2 {
        self.live(element).map_or(Vec2::ZERO, |s| s.element.scroll)
    }
}

/// Answers the layout declared on [`SceneElement::layout`].
#[derive(Copy, Clone, Debug, Default)]
pub struct SceneProbe;

impl LayoutProbe<Scene> for SceneProbe {
    fn probe(&self, host: &Scene, parent: ElementId, _index: usize) -> Option<Orientation> {
        host.element(parent)?.layout
    }
}
