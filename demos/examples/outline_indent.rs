// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outline drag-and-drop: re-nest a row by dragging sideways.
//!
//! A navigator-style outline of 24px rows. The last row is dragged up; moving the pointer
//! left outdents the drop out of a folder, moving it right indents it into the folder above.
//! Each change prints its parent, index, depth and the indented indicator.
//!
//! Run:
//! - `cargo run -p understory_drop_demos --example outline_indent`
//! - `RUST_LOG=debug cargo run -p understory_drop_demos --example outline_indent`

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_drop_adapter::adapter::ViewKind;
use understory_drop_adapter::document::{DocumentView, ElementMap, ElementRegistry, TreeIndex};
use understory_drop_adapter::events::{DragDropEvent, ListenerFn};
use understory_drop_adapter::memory::{MemoryTree, NodeId};
use understory_drop_adapter::session::{DragDropSession, SessionConfig};
use understory_drop_geometry::Orientation;
use understory_drop_geometry::indicator::IndicatorStyle;
use understory_drop_target::DeclaredOrientation;
use understory_drop_target::scene::{ElementId, Scene, SceneElement};

const ROW: f64 = 24.0;
const WIDTH: f64 = 240.0;

#[derive(Clone, Debug)]
enum Kind {
    Root,
    Folder(&'static str),
    Page(&'static str),
}

fn name(doc: &MemoryTree<Kind>, id: NodeId) -> &'static str {
    match doc.kind(id) {
        Some(Kind::Root) => "root",
        Some(Kind::Folder(name) | Kind::Page(name)) => *name,
        None => "?",
    }
}

fn row(index: u32) -> Rect {
    let top = ROW * f64::from(index);
    Rect::new(0.0, top, WIDTH, top + ROW)
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut doc = MemoryTree::new(Kind::Root, |k| !matches!(k, Kind::Page(_)));
    let mut scene = Scene::new();
    let mut elements = ElementMap::new();
    let root_el = scene.insert(None, SceneElement::new(Rect::new(0.0, 0.0, WIDTH, 20.0 * ROW)));
    let root = doc.root();
    elements.bind(root, root_el);

    let mut add = |parent: NodeId, kind: Kind, rect: Rect| {
        let id = doc.add(parent, kind).expect("parent is a container");
        let parent_el = elements.element_of(parent).expect("parent is rendered");
        elements.bind(id, scene.insert(Some(parent_el), SceneElement::new(rect)));
        id
    };

    // root
    // ├── inbox/      (rows 0..3, its title row included)
    // │   ├── draft
    // │   └── todo
    // ├── notes/      (row 3, empty)
    // └── ideas       (row 4)
    let inbox = add(root, Kind::Folder("inbox"), row(0).union(row(2)));
    add(inbox, Kind::Page("draft"), row(1));
    add(inbox, Kind::Page("todo"), row(2));
    add(root, Kind::Folder("notes"), row(3));
    let ideas = add(root, Kind::Page("ideas"), row(4));

    let config = SessionConfig::default();
    let mut session = DragDropSession::<NodeId, Kind, ElementId, DeclaredOrientation>::with_config(
        ViewKind::Outline,
        config,
        DeclaredOrientation(Orientation::Vertical),
    );
    session.bind_root(Some(root_el));
    let style = IndicatorStyle::outline(16.0);

    let ideas_el = elements.element_of(ideas).expect("row is rendered");
    let view = DocumentView::new(&doc, &doc, &elements);
    session.pointer_down(None, &scene, view, ideas_el, Point::new(100.0, 108.0));

    let steps = [
        ("below todo", Point::new(100.0, 66.0)),
        ("drag left", Point::new(80.0, 66.0)),
        ("between notes and ideas", Point::new(100.0, 94.0)),
        ("drag right", Point::new(120.0, 94.0)),
    ];
    for (label, point) in steps {
        println!("-- {label}");
        let view = DocumentView::new(&doc, &doc, &elements);
        let mut listener = ListenerFn(|event: DragDropEvent<NodeId>| match event {
            DragDropEvent::DragStart { node } => {
                println!("drag start: {}", node.map_or("new item", |id| name(&doc, id)));
            }
            DragDropEvent::DropTargetChange(Some(change)) => println!(
                "target: {} at {} (depth {}) -> {:?}",
                name(&doc, change.parent.id()),
                change.index,
                change.depth,
                change.overlay(&style),
            ),
            DragDropEvent::DropTargetChange(None) => println!("target: none"),
            DragDropEvent::DragEnd { .. } => {}
        });
        session.pointer_move(None, point, &scene, view, &mut listener);
    }

    let mut events = Vec::new();
    let outcome = session.pointer_up(None, &mut doc, &mut events);
    tracing::info!(?outcome, "drop committed");
    println!("events after release: {events:?}");

    let notes: Vec<_> = doc
        .children_of(doc.children_of(root)[1])
        .iter()
        .map(|&id| name(&doc, id))
        .collect();
    println!("notes: {notes:?}");
}
