// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas drag-and-drop: move a card from one column into another.
//!
//! Two columns of cards are rendered into a `Scene`. A simulated pointer presses the first
//! card of the left column, drags it over the right column, and releases below the card
//! there. Every event is printed together with the indicator it would paint.
//!
//! Run:
//! - `cargo run -p understory_drop_demos --example canvas_reorder`
//! - `RUST_LOG=understory_drop_target=trace cargo run -p understory_drop_demos --example canvas_reorder`

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_drop_adapter::adapter::ViewKind;
use understory_drop_adapter::document::{DocumentView, ElementMap, ElementRegistry, TreeIndex};
use understory_drop_adapter::events::DragDropEvent;
use understory_drop_adapter::memory::{MemoryTree, NodeId};
use understory_drop_adapter::session::DragDropSession;
use understory_drop_geometry::indicator::IndicatorStyle;
use understory_drop_target::scene::{ElementId, Scene, SceneElement};

#[derive(Clone, Debug)]
enum Kind {
    Page,
    Column(&'static str),
    Card(&'static str),
}

fn accepts(kind: &Kind) -> bool {
    !matches!(kind, Kind::Card(_))
}

struct Board {
    doc: MemoryTree<Kind>,
    scene: Scene,
    elements: ElementMap<NodeId, ElementId>,
}

impl Board {
    fn add(&mut self, parent: NodeId, kind: Kind, rect: Rect) -> NodeId {
        let id = self.doc.add(parent, kind).expect("parent is a container");
        let parent_el = self.elements.element_of(parent).expect("parent is rendered");
        let el = self.scene.insert(Some(parent_el), SceneElement::new(rect));
        self.elements.bind(id, el);
        id
    }

    fn label(&self, id: NodeId) -> String {
        match self.doc.kind(id) {
            Some(Kind::Page) => "page".into(),
            Some(Kind::Column(name) | Kind::Card(name)) => (*name).into(),
            None => format!("{id:?}"),
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let doc = MemoryTree::new(Kind::Page, accepts);
    let mut scene = Scene::new();
    let page_el = scene.insert(None, SceneElement::new(Rect::new(0.0, 0.0, 600.0, 400.0)));
    let mut elements = ElementMap::new();
    elements.bind(doc.root(), page_el);
    let mut board = Board {
        doc,
        scene,
        elements,
    };

    let page = board.doc.root();
    let todo = board.add(page, Kind::Column("todo"), Rect::new(20.0, 20.0, 280.0, 380.0));
    let done = board.add(page, Kind::Column("done"), Rect::new(320.0, 20.0, 580.0, 380.0));
    let mut cards = Vec::new();
    for (i, name) in (0_u32..).zip(["write", "review", "ship"]) {
        let top = 10.0 + 60.0 * f64::from(i);
        cards.push(board.add(todo, Kind::Card(name), Rect::new(10.0, top, 250.0, top + 50.0)));
    }
    board.add(done, Kind::Card("plan"), Rect::new(10.0, 10.0, 250.0, 60.0));

    let mut session = DragDropSession::<NodeId, Kind, ElementId>::new(ViewKind::Canvas);
    session.bind_root(Some(page_el));
    let style = IndicatorStyle::default();

    let write = cards[0];
    let write_el = board.elements.element_of(write).expect("card is rendered");
    let view = DocumentView::new(&board.doc, &board.doc, &board.elements);
    session.pointer_down(None, &board.scene, view, write_el, Point::new(150.0, 50.0));

    // Across the gap and down into the right column, below its only card.
    let path = [
        Point::new(160.0, 55.0),
        Point::new(300.0, 60.0),
        Point::new(450.0, 50.0),
        Point::new(450.0, 75.0),
        Point::new(450.0, 120.0),
    ];
    for point in path {
        let view = DocumentView::new(&board.doc, &board.doc, &board.elements);
        let mut events = Vec::new();
        session.pointer_move(None, point, &board.scene, view, &mut events);
        for event in &events {
            describe(&board, event, &style);
        }
    }

    let mut events = Vec::new();
    let outcome = session.pointer_up(None, &mut board.doc, &mut events);
    for event in &events {
        describe(&board, event, &style);
    }
    tracing::info!(?outcome, "drop committed");

    for column in [todo, done] {
        let names: Vec<_> = board
            .doc
            .children_of(column)
            .iter()
            .map(|&id| board.label(id))
            .collect();
        println!("{}: {names:?}", board.label(column));
    }
}

fn describe(board: &Board, event: &DragDropEvent<NodeId>, style: &IndicatorStyle) {
    match event {
        DragDropEvent::DragStart { node } => {
            let name = node.map_or_else(|| "new item".into(), |id| board.label(id));
            println!("drag start: {name}");
        }
        DragDropEvent::DropTargetChange(Some(change)) => println!(
            "target: {} at {} -> {:?}",
            board.label(change.parent.id()),
            change.index,
            change.overlay(style),
        ),
        DragDropEvent::DropTargetChange(None) => println!("target: none"),
        DragDropEvent::DragEnd { is_canceled } => println!("drag end (canceled: {is_canceled})"),
    }
}
