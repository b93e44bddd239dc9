// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drop_adapter --heading-base-level=0

//! Understory Drop Adapter: drag-and-drop over a document tree.
//!
//! `understory_drop_target` resolves pointers into drop targets without knowing what the
//! elements stand for. This crate supplies the document side:
//!
//! - [`document`]: the collaborator traits a host implements over its document
//!   ([`TreeIndex`](document::TreeIndex), [`TypeRegistry`](document::TypeRegistry),
//!   [`ElementRegistry`](document::ElementRegistry),
//!   [`DocumentMutator`](document::DocumentMutator)).
//! - [`selector`]: [`ItemSelector`](selector::ItemSelector), a node address that survives
//!   concurrent edits well enough to notice them.
//! - [`adapter`]: [`TreeAdapter`](adapter::TreeAdapter), which keeps drops out of the dragged
//!   subtree, redirects them to containers, re-nests outline drops by the drag shift, and
//!   commits the result.
//! - [`events`]: the [`DragDropEvent`](events::DragDropEvent) stream other views subscribe to.
//! - [`session`]: [`DragDropSession`](session::DragDropSession), the wiring of drag state,
//!   resolver, auto-scroll and adapter for one view.
//! - [`memory`]: an in-memory document for tests, demos and small hosts.
//!
//! ## Example
//!
//! A folder holding one leaf; a new leaf from a palette is dropped below it.
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_drop_adapter::adapter::{CommitOutcome, DragItem, ViewKind};
//! use understory_drop_adapter::document::{DocumentView, ElementMap, TreeIndex};
//! use understory_drop_adapter::memory::MemoryTree;
//! use understory_drop_adapter::session::DragDropSession;
//! use understory_drop_target::scene::{ElementId, Scene, SceneElement};
//!
//! #[derive(Clone, Debug)]
//! enum Kind { Page, Folder, Leaf }
//!
//! let mut doc = MemoryTree::new(Kind::Page, |k| !matches!(k, Kind::Leaf));
//! let folder = doc.add(doc.root(), Kind::Folder).unwrap();
//! let leaf = doc.add(folder, Kind::Leaf).unwrap();
//!
//! let mut scene = Scene::new();
//! let page_el = scene.insert(None, SceneElement::new(Rect::new(0.0, 0.0, 200.0, 200.0)));
//! let folder_el = scene.insert(Some(page_el), SceneElement::new(Rect::new(0.0, 0.0, 200.0, 100.0)));
//! let leaf_el = scene.insert(Some(folder_el), SceneElement::new(Rect::new(0.0, 0.0, 200.0, 20.0)));
//!
//! let mut elements = ElementMap::new();
//! elements.bind(doc.root(), page_el);
//! elements.bind(folder, folder_el);
//! elements.bind(leaf, leaf_el);
//!
//! let mut session = DragDropSession::<_, Kind, ElementId>::new(ViewKind::Canvas);
//! session.bind_root(Some(page_el));
//! let mut events = Vec::new();
//!
//! session.start(DragItem::New(Kind::Leaf), &mut events);
//! let view = DocumentView::new(&doc, &doc, &elements);
//! session.move_to(Point::new(100.0, 15.0), &scene, view, &mut events);
//!
//! let change = session.change().unwrap();
//! assert_eq!((change.parent.id(), change.index), (folder, 1));
//!
//! let outcome = session.end(false, &mut doc, &mut events);
//! assert!(matches!(outcome, Some(CommitOutcome::Inserted { .. })));
//! assert_eq!(doc.children_of(folder).len(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapter;
pub mod document;
pub mod events;
pub mod memory;
pub mod selector;
pub mod session;
