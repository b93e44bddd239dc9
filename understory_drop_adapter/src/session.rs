// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One view's drag-and-drop wiring.
//!
//! [`DragDropSession`] owns the pointer state machine, the drop target resolver, the
//! auto-scroll controller and, while a drag runs, the [`TreeAdapter`]. Hosts feed it pointer
//! events (or relayed drag events from another surface) together with borrowed document
//! collaborators, and receive [`DragDropEvent`]s.
//!
//! Ending a drag runs in a fixed order: auto-scroll is disabled, the drop is committed unless
//! canceled, the indicator is cleared with `DropTargetChange(None)`, then `DragEnd` is emitted.

use core::fmt::Debug;
use core::hash::Hash;
use core::marker::PhantomData;

use kurbo::Point;
use understory_drag_state::autoscroll::{AutoScroll, AutoScrollConfig, ScrollViewport};
use understory_drag_state::drag::{
    DragConfig, DragHandler, DragPhase, DragSource, DragState, PointerId, PointerUp,
};
use understory_drop_target::{
    Candidate, DropTarget, DropTargetDelegate, DropTargetResolver, ElementHost, LayoutProbe,
    NoProbe, ResolverConfig, SwapCandidate,
};

use crate::adapter::{CommitOutcome, DragItem, DropTargetChange, SkipReason, TreeAdapter, ViewKind};
use crate::document::{DocumentMutator, DocumentView, ElementRegistry, TreeIndex, TypeRegistry};
use crate::events::{DragDropEvent, DragDropListener};
use crate::selector::ItemSelector;

/// Tuning for every part of a session.
#[derive(Copy, Clone, Debug, Default)]
pub struct SessionConfig {
    /// Drop target resolution.
    pub resolver: ResolverConfig,
    /// Drag recognition and shift.
    pub drag: DragConfig,
    /// Edge scrolling.
    pub autoscroll: AutoScrollConfig,
}

/// Drag-and-drop for one view of a document.
///
/// `Id` is the document node id, `T` the type of nodes inserted from a palette, `E` the
/// view's element handle and `P` its [`LayoutProbe`].
#[derive(Debug)]
pub struct DragDropSession<Id, T, E, P = NoProbe> {
    kind: ViewKind,
    drag: DragState<E, DragItem<Id, T>>,
    resolver: DropTargetResolver<E, ItemSelector<Id>, P>,
    autoscroll: AutoScroll,
    adapter: Option<TreeAdapter<Id, T>>,
}

impl<Id, T, E, P> DragDropSession<Id, T, E, P>
where
    Id: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
    P: Default,
{
    /// Create a session with default tuning.
    pub fn new(kind: ViewKind) -> Self {
        Self::with_config(kind, SessionConfig::default(), P::default())
    }
}

impl<Id, T, E, P> DragDropSession<Id, T, E, P>
where
    Id: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    /// Create a session with custom tuning and layout probe.
    pub fn with_config(kind: ViewKind, config: SessionConfig, probe: P) -> Self {
        Self {
            kind,
            drag: DragState::with_config(config.drag),
            resolver: DropTargetResolver::with_probe(config.resolver, probe),
            autoscroll: AutoScroll::with_config(config.autoscroll),
            adapter: None,
        }
    }

    /// The view kind.
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Scope drags and drops to `root`'s subtree; `None` disables both.
    pub fn bind_root(&mut self, root: Option<E>) {
        self.drag.bind_root(root);
        self.resolver.bind_root(root);
    }

    /// Returns `true` between drag start and drag end.
    pub fn is_active(&self) -> bool {
        self.adapter.is_some()
    }

    /// Pointer gesture phase. Relayed drags stay [`DragPhase::Idle`].
    pub fn phase(&self) -> DragPhase {
        self.drag.phase()
    }

    /// The dragged item, while active.
    pub fn item(&self) -> Option<&DragItem<Id, T>> {
        self.adapter.as_ref().map(TreeAdapter::item)
    }

    /// Where the item would land right now.
    pub fn change(&self) -> Option<&DropTargetChange<Id>> {
        self.adapter.as_ref().and_then(TreeAdapter::change)
    }

    /// The resolver's current target.
    pub fn drop_target(&self) -> Option<&DropTarget<ItemSelector<Id>, E>> {
        self.resolver.drop_target()
    }

    /// The auto-scroll controller.
    pub fn autoscroll(&self) -> &AutoScroll {
        &self.autoscroll
    }

    /// Drop cached children rects after the view's structure changed mid-drag.
    pub fn invalidate(&mut self) {
        self.resolver.invalidate();
    }

    /// Record a press on a drag handle.
    ///
    /// Elements rendering a document node other than the root drag that node. Returns `true`
    /// if the press is now pending. Ignored while a drag is active.
    pub fn pointer_down<H, Tr, Ty, El>(
        &mut self,
        pointer_id: Option<PointerId>,
        host: &H,
        view: DocumentView<'_, Tr, Ty, El>,
        element: E,
        position: Point,
    ) -> bool
    where
        H: ElementHost<Element = E> + ?Sized,
        Tr: TreeIndex<Id = Id> + ?Sized,
        Ty: ?Sized,
        El: ElementRegistry<Id, Element = E> + ?Sized,
    {
        let mut source = HandleSource {
            view,
            _item: PhantomData,
        };
        self.pointer_down_with(pointer_id, &mut source, host, element, position)
    }

    /// Record a press with a custom payload source, e.g. a palette producing
    /// [`DragItem::New`].
    pub fn pointer_down_with<S, H>(
        &mut self,
        pointer_id: Option<PointerId>,
        source: &mut S,
        host: &H,
        element: E,
        position: Point,
    ) -> bool
    where
        S: DragSource<E, Data = DragItem<Id, T>> + ?Sized,
        H: ElementHost<Element = E> + ?Sized,
    {
        if self.adapter.is_some() {
            return false;
        }
        self.drag
            .on_pointer_down(pointer_id, source, host, element, position)
    }

    /// Process a pointer move.
    ///
    /// Returns `true` when the host should start its auto-scroll frame loop and call
    /// [`DragDropSession::tick`] every frame.
    pub fn pointer_move<H, Tr, Ty, El, L>(
        &mut self,
        pointer_id: Option<PointerId>,
        position: Point,
        host: &H,
        view: DocumentView<'_, Tr, Ty, El>,
        listener: &mut L,
    ) -> bool
    where
        H: ElementHost<Element = E> + ?Sized,
        Tr: TreeIndex<Id = Id> + ?Sized,
        Ty: TypeRegistry<Id> + ?Sized,
        El: ElementRegistry<Id, Element = E> + ?Sized,
        L: DragDropListener<Id> + ?Sized,
        P: LayoutProbe<H>,
    {
        let mut relay = Relay {
            kind: self.kind,
            resolver: &mut self.resolver,
            autoscroll: &mut self.autoscroll,
            adapter: &mut self.adapter,
            host,
            view,
            listener,
            start_loop: false,
        };
        self.drag.on_pointer_move(pointer_id, position, &mut relay);
        relay.start_loop
    }

    /// Process a pointer release, committing a finished drag to `doc`.
    ///
    /// Returns the commit outcome when a drag ended, `None` for clicks and other pointers.
    pub fn pointer_up<D, L>(
        &mut self,
        pointer_id: Option<PointerId>,
        doc: &mut D,
        listener: &mut L,
    ) -> Option<CommitOutcome<Id>>
    where
        D: TreeIndex<Id = Id> + DocumentMutator<Id, NodeType = T> + ?Sized,
        L: DragDropListener<Id> + ?Sized,
        T: Clone,
    {
        match self.drag.on_pointer_up(pointer_id, &mut Ended) {
            PointerUp::Dropped => self.finish(false, listener, |adapter| commit(adapter, doc, false)),
            PointerUp::Click | PointerUp::Ignored => None,
        }
    }

    /// Abort the drag, e.g. on Escape. The document is never touched.
    ///
    /// Returns `true` if a drag was active.
    pub fn cancel<L>(&mut self, listener: &mut L) -> bool
    where
        L: DragDropListener<Id> + ?Sized,
    {
        self.drag.cancel(&mut Ended);
        self.finish(true, listener, |_| {
            CommitOutcome::Skipped(SkipReason::Canceled)
        })
        .is_some()
    }

    /// A drag relayed from another surface started.
    ///
    /// Returns `false` if a drag is already active or a press is pending.
    pub fn start<L>(&mut self, item: DragItem<Id, T>, listener: &mut L) -> bool
    where
        L: DragDropListener<Id> + ?Sized,
    {
        if self.adapter.is_some() || self.drag.phase() != DragPhase::Idle {
            return false;
        }
        begin(
            self.kind,
            &mut self.adapter,
            &mut self.autoscroll,
            item,
            listener,
        );
        true
    }

    /// A relayed drag moved to `position`, in this view's coordinates.
    ///
    /// Returns `true` when the host should start its auto-scroll frame loop.
    pub fn move_to<H, Tr, Ty, El, L>(
        &mut self,
        position: Point,
        host: &H,
        view: DocumentView<'_, Tr, Ty, El>,
        listener: &mut L,
    ) -> bool
    where
        H: ElementHost<Element = E> + ?Sized,
        Tr: TreeIndex<Id = Id> + ?Sized,
        Ty: TypeRegistry<Id> + ?Sized,
        El: ElementRegistry<Id, Element = E> + ?Sized,
        L: DragDropListener<Id> + ?Sized,
        P: LayoutProbe<H>,
    {
        let mut relay = Relay {
            kind: self.kind,
            resolver: &mut self.resolver,
            autoscroll: &mut self.autoscroll,
            adapter: &mut self.adapter,
            host,
            view,
            listener,
            start_loop: false,
        };
        relay.on_move(position);
        relay.start_loop
    }

    /// A relayed drag's horizontal shift changed.
    pub fn set_shift<Tr, Ty, El, L>(
        &mut self,
        shift: i32,
        view: DocumentView<'_, Tr, Ty, El>,
        listener: &mut L,
    ) where
        Tr: TreeIndex<Id = Id> + ?Sized,
        Ty: TypeRegistry<Id> + ?Sized,
        El: ?Sized,
        L: DragDropListener<Id> + ?Sized,
    {
        apply_shift(self.adapter.as_mut(), view, shift, listener);
    }

    /// A relayed drag ended; commits to `doc` unless `is_canceled`.
    pub fn end<D, L>(
        &mut self,
        is_canceled: bool,
        doc: &mut D,
        listener: &mut L,
    ) -> Option<CommitOutcome<Id>>
    where
        D: TreeIndex<Id = Id> + DocumentMutator<Id, NodeType = T> + ?Sized,
        L: DragDropListener<Id> + ?Sized,
        T: Clone,
    {
        self.finish(is_canceled, listener, |adapter| {
            commit(adapter, doc, is_canceled)
        })
    }

    /// Content scrolled under a stationary pointer; re-resolve the target.
    pub fn scroll<H, Tr, Ty, El, L>(
        &mut self,
        host: &H,
        view: DocumentView<'_, Tr, Ty, El>,
        listener: &mut L,
    ) where
        H: ElementHost<Element = E> + ?Sized,
        Tr: TreeIndex<Id = Id> + ?Sized,
        Ty: TypeRegistry<Id> + ?Sized,
        El: ElementRegistry<Id, Element = E> + ?Sized,
        L: DragDropListener<Id> + ?Sized,
        P: LayoutProbe<H>,
    {
        let Some(adapter) = self.adapter.as_mut() else {
            return;
        };
        let mut delegate = AdapterDelegate {
            adapter,
            view,
            listener,
        };
        self.resolver.handle_scroll(host, &mut delegate);
    }

    /// Run one auto-scroll frame; returns whether to schedule another.
    ///
    /// When this scrolled, follow up with [`DragDropSession::scroll`] so the target tracks
    /// the moving content.
    pub fn tick<V>(&mut self, viewport: &mut V, now_ms: u64) -> bool
    where
        V: ScrollViewport + ?Sized,
    {
        self.autoscroll.tick(viewport, now_ms)
    }

    fn finish<L>(
        &mut self,
        is_canceled: bool,
        listener: &mut L,
        commit: impl FnOnce(&TreeAdapter<Id, T>) -> CommitOutcome<Id>,
    ) -> Option<CommitOutcome<Id>>
    where
        L: DragDropListener<Id> + ?Sized,
    {
        self.autoscroll.set_enabled(false);
        // A relayed end can finish a pointer-driven drag; release the gesture with it.
        self.drag.cancel(&mut Ended);
        let adapter = self.adapter.take();
        let outcome = adapter.as_ref().map(commit);
        self.resolver.handle_end(&mut Cleared {
            listener: &mut *listener,
            _id: PhantomData,
        });
        if adapter.is_some() {
            tracing::debug!(is_canceled, ?outcome, "drag session finished");
            listener.on_event(DragDropEvent::DragEnd { is_canceled });
        }
        outcome
    }
}

fn commit<Id, T, D>(adapter: &TreeAdapter<Id, T>, doc: &mut D, is_canceled: bool) -> CommitOutcome<Id>
where
    Id: Copy + Eq + Hash + Debug,
    D: TreeIndex<Id = Id> + DocumentMutator<Id, NodeType = T> + ?Sized,
    T: Clone,
{
    match adapter.prepare(&*doc, is_canceled) {
        Ok(pending) => pending.apply(doc),
        Err(reason) => CommitOutcome::Skipped(reason),
    }
}

fn begin<Id, T, L>(
    kind: ViewKind,
    slot: &mut Option<TreeAdapter<Id, T>>,
    autoscroll: &mut AutoScroll,
    item: DragItem<Id, T>,
    listener: &mut L,
) where
    Id: Copy + Eq + Hash + Debug,
    L: DragDropListener<Id> + ?Sized,
{
    let node = item.existing();
    tracing::debug!(?node, ?kind, "drag session started");
    *slot = Some(TreeAdapter::new(kind, item));
    autoscroll.set_enabled(true);
    listener.on_event(DragDropEvent::DragStart { node });
}

fn apply_shift<Id, T, Tr, Ty, El, L>(
    adapter: Option<&mut TreeAdapter<Id, T>>,
    view: DocumentView<'_, Tr, Ty, El>,
    shift: i32,
    listener: &mut L,
) where
    Id: Copy + Eq + Hash + Debug,
    Tr: TreeIndex<Id = Id> + ?Sized,
    Ty: TypeRegistry<Id> + ?Sized,
    El: ?Sized,
    L: DragDropListener<Id> + ?Sized,
{
    if let Some(adapter) = adapter
        && adapter.on_shift_change(view, shift)
    {
        listener.on_event(DragDropEvent::DropTargetChange(adapter.change().cloned()));
    }
}

/// Payloads for presses on rendered nodes.
struct HandleSource<'v, T, Tr: ?Sized, Ty: ?Sized, El: ?Sized> {
    view: DocumentView<'v, Tr, Ty, El>,
    _item: PhantomData<fn() -> T>,
}

impl<Id, T, Tr, Ty, El> DragSource<El::Element> for HandleSource<'_, T, Tr, Ty, El>
where
    Id: Copy + Eq + Hash + Debug,
    Tr: TreeIndex<Id = Id> + ?Sized,
    Ty: ?Sized,
    El: ElementRegistry<Id> + ?Sized,
{
    type Data = DragItem<Id, T>;

    fn element_to_data(&mut self, element: El::Element) -> Option<DragItem<Id, T>> {
        let id = self.view.elements.id_of(element)?;
        let tree = self.view.tree;
        (id != tree.root() && tree.contains(id)).then_some(DragItem::Existing(id))
    }
}

/// Bridges resolver callbacks to the adapter and the listener.
struct AdapterDelegate<'a, 'v, Id, T, Tr: ?Sized, Ty: ?Sized, El: ?Sized, L: ?Sized> {
    adapter: &'a mut TreeAdapter<Id, T>,
    view: DocumentView<'v, Tr, Ty, El>,
    listener: &'a mut L,
}

impl<Id, T, Tr, Ty, El, L> DropTargetDelegate<El::Element>
    for AdapterDelegate<'_, '_, Id, T, Tr, Ty, El, L>
where
    Id: Copy + Eq + Hash + Debug,
    Tr: TreeIndex<Id = Id> + ?Sized,
    Ty: TypeRegistry<Id> + ?Sized,
    El: ElementRegistry<Id> + ?Sized,
    L: DragDropListener<Id> + ?Sized,
{
    type Data = ItemSelector<Id>;

    fn is_drop_target(&mut self, element: El::Element) -> Option<ItemSelector<Id>> {
        self.adapter.element_to_data(self.view, element)
    }

    fn swap_drop_target(
        &mut self,
        candidate: Option<SwapCandidate<ItemSelector<Id>, El::Element>>,
    ) -> Option<Candidate<ItemSelector<Id>, El::Element>> {
        self.adapter.swap_drop_target(self.view, candidate)
    }

    fn on_drop_target_change(&mut self, target: Option<&DropTarget<ItemSelector<Id>, El::Element>>) {
        if self.adapter.on_drop_target_change(self.view, target) {
            self.listener
                .on_event(DragDropEvent::DropTargetChange(self.adapter.change().cloned()));
        }
    }
}

/// Emits the cleared indicator when the resolver ends its session.
struct Cleared<'a, Id, L: ?Sized> {
    listener: &'a mut L,
    _id: PhantomData<fn() -> Id>,
}

impl<Id, E, L> DropTargetDelegate<E> for Cleared<'_, Id, L>
where
    L: DragDropListener<Id> + ?Sized,
{
    type Data = ItemSelector<Id>;

    fn is_drop_target(&mut self, _element: E) -> Option<ItemSelector<Id>> {
        None
    }

    fn on_drop_target_change(&mut self, target: Option<&DropTarget<ItemSelector<Id>, E>>) {
        if target.is_none() {
            self.listener.on_event(DragDropEvent::DropTargetChange(None));
        }
    }
}

/// Only records that the gesture ended; the session finishes the drag itself.
struct Ended;

impl<D> DragHandler<D> for Ended {
    fn on_start(&mut self, _data: D) {}

    fn on_move(&mut self, _point: Point) {}

    fn on_end(&mut self, _is_canceled: bool) {}
}

/// Drag lifecycle while the pointer moves.
struct Relay<'a, 'v, Id, T, E, P, H: ?Sized, Tr: ?Sized, Ty: ?Sized, El: ?Sized, L: ?Sized> {
    kind: ViewKind,
    resolver: &'a mut DropTargetResolver<E, ItemSelector<Id>, P>,
    autoscroll: &'a mut AutoScroll,
    adapter: &'a mut Option<TreeAdapter<Id, T>>,
    host: &'a H,
    view: DocumentView<'v, Tr, Ty, El>,
    listener: &'a mut L,
    start_loop: bool,
}

impl<Id, T, E, P, H, Tr, Ty, El, L> DragHandler<DragItem<Id, T>>
    for Relay<'_, '_, Id, T, E, P, H, Tr, Ty, El, L>
where
    Id: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
    H: ElementHost<Element = E> + ?Sized,
    Tr: TreeIndex<Id = Id> + ?Sized,
    Ty: TypeRegistry<Id> + ?Sized,
    El: ElementRegistry<Id, Element = E> + ?Sized,
    L: DragDropListener<Id> + ?Sized,
    P: LayoutProbe<H>,
{
    fn on_start(&mut self, item: DragItem<Id, T>) {
        begin(self.kind, self.adapter, self.autoscroll, item, self.listener);
    }

    fn on_move(&mut self, point: Point) {
        let Some(adapter) = self.adapter.as_mut() else {
            return;
        };
        let mut delegate = AdapterDelegate {
            adapter,
            view: self.view,
            listener: &mut *self.listener,
        };
        self.resolver.handle_move(self.host, &mut delegate, point);
        self.start_loop |= self.autoscroll.handle_move(point);
    }

    fn on_shift_change(&mut self, shift: i32) {
        apply_shift(self.adapter.as_mut(), self.view, shift, self.listener);
    }

    fn on_end(&mut self, _is_canceled: bool) {}
}
