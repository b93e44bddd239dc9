// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event stream a drag produces.
//!
//! Views other than the one being dragged in (a breadcrumb panel, a mirrored outline in
//! another frame, the indicator layer) subscribe through [`DragDropListener`]. How events
//! cross a frame boundary is up to the host.

use alloc::vec::Vec;

use crate::adapter::DropTargetChange;

/// One step of a drag.
#[derive(Clone, Debug, PartialEq)]
pub enum DragDropEvent<Id> {
    /// A drag began. `node` is the dragged node, or `None` for a new item from a palette.
    DragStart {
        /// The dragged node.
        node: Option<Id>,
    },
    /// The drop target changed; `None` clears the indicator.
    DropTargetChange(Option<DropTargetChange<Id>>),
    /// The drag ended, after any commit.
    DragEnd {
        /// `true` when the drag was canceled and nothing was committed.
        is_canceled: bool,
    },
}

/// Receives [`DragDropEvent`]s.
pub trait DragDropListener<Id> {
    /// Handle one event.
    fn on_event(&mut self, event: DragDropEvent<Id>);
}

impl<Id> DragDropListener<Id> for Vec<DragDropEvent<Id>> {
    fn on_event(&mut self, event: DragDropEvent<Id>) {
        self.push(event);
    }
}

impl<Id, L: DragDropListener<Id> + ?Sized> DragDropListener<Id> for &mut L {
    fn on_event(&mut self, event: DragDropEvent<Id>) {
        (**self).on_event(event);
    }
}

/// Adapts a closure into a [`DragDropListener`].
#[derive(Clone, Debug)]
pub struct ListenerFn<F>(pub F);

impl<Id, F: FnMut(DragDropEvent<Id>)> DragDropListener<Id> for ListenerFn<F> {
    fn on_event(&mut self, event: DragDropEvent<Id>) {
        (self.0)(event);
    }
}

/// Ignores every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoListener;

impl<Id> DragDropListener<Id> for NoListener {
    fn on_event(&mut self, _event: DragDropEvent<Id>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_receive_events_in_order() {
        let mut log = Vec::new();
        log.on_event(DragDropEvent::DragStart { node: Some(1_u32) });
        (&mut log).on_event(DragDropEvent::DropTargetChange(None));
        assert_eq!(
            log,
            [
                DragDropEvent::DragStart { node: Some(1) },
                DragDropEvent::DropTargetChange(None),
            ]
        );

        let mut ends = 0;
        let mut listener = ListenerFn(|e: DragDropEvent<u32>| {
            if matches!(e, DragDropEvent::DragEnd { .. }) {
                ends += 1;
            }
        });
        listener.on_event(DragDropEvent::DragEnd { is_canceled: true });
        listener.on_event(DragDropEvent::DragStart { node: None });
        drop(listener);
        assert_eq!(ends, 1);
    }
}
