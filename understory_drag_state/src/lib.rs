// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drag_state --heading-base-level=0

//! Understory Drag State: pointer-level state machines for drag-and-drop.
//!
//! - [`drag`]: recognize a drag from press, move and release events on draggable handles,
//!   report its lifecycle to a [`drag::DragHandler`], and derive the horizontal shift used to
//!   re-nest rows in outline views.
//! - [`autoscroll`]: scroll a viewport while the pointer hovers near its edges during a drag.
//!
//! Neither module resolves drop targets; that is `understory_drop_target`'s job. A host usually
//! forwards [`drag::DragHandler::on_move`] to both the resolver and
//! [`autoscroll::AutoScroll::handle_move`], and disables auto-scroll in `on_end`.
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(test)]
extern crate alloc;

pub mod autoscroll;
pub mod drag;
