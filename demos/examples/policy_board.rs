// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kanban board gated by drag policies.
//!
//! Two vertical columns accept cards through a `PolicyZone`. Cards prefer the top and
//! bottom edges, the "done" column is full and refuses drops at validation time, and a
//! file dragged in from outside is rejected during resolution.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_drop_demos --example policy_board`

use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_drop::data::DataMap;
use understory_drop::engine::DropEngine;
use understory_drop::hierarchy::ParentTable;
use understory_drop::types::{DragPayload, DropStrategy, Input};
use understory_drop_policy::context::{
    ChildOrdering, DestContext, DestinationCaps, Orientation, PolicyContext, ProposedPlacement,
};
use understory_drop_policy::edge::{Edges, extract_closest_edge};
use understory_drop_policy::error::{DropRejection, PolicyError};
use understory_drop_policy::gate::{PolicyZone, closest_edge_data};
use understory_drop_policy::meta::DragMeta;
use understory_drop_policy::policy::{
    DestinationPolicy, PolicyResolver, SourcePolicy, check_drop,
};

const BOARD: u32 = 1;
const TODO: u32 = 10;
const DONE: u32 = 20;

struct CardPolicy;

impl SourcePolicy for CardPolicy {
    fn can_drop(&self, ctx: &PolicyContext<'_>) -> Result<bool, PolicyError> {
        Ok(ctx.dest_caps.has_cap("cards"))
    }

    fn allowed_edges(&self, _ctx: &PolicyContext<'_>) -> Result<Option<Edges>, PolicyError> {
        Ok(Some(Edges::VERTICAL))
    }
}

struct ColumnPolicy {
    max_cards: usize,
}

impl DestinationPolicy for ColumnPolicy {
    fn can_accept(&self, ctx: &PolicyContext<'_>) -> Result<bool, PolicyError> {
        Ok(ctx.drag_meta.has_level(ctx.dest_caps.level + 1))
    }

    fn validate_drop(
        &self,
        ctx: &PolicyContext<'_>,
        _placement: &ProposedPlacement,
    ) -> Result<(), DropRejection> {
        if ctx.children.len() >= self.max_cards {
            return Err(DropRejection::new(
                "column-full",
                format!("`{}` already holds {} cards", ctx.dest_id, ctx.children.len()),
            ));
        }
        Ok(())
    }
}

struct Board {
    card: CardPolicy,
    column: ColumnPolicy,
}

impl PolicyResolver for Board {
    fn source_policy(&self, tag: &str) -> Option<&dyn SourcePolicy> {
        (tag == "Card").then_some(&self.card as &dyn SourcePolicy)
    }

    fn destination_policy(&self, kind: &str) -> Option<&dyn DestinationPolicy> {
        (kind == "Column").then_some(&self.column as &dyn DestinationPolicy)
    }
}

fn column(node: u32) -> Result<DestContext, PolicyError> {
    let (id, cards): (&str, &[&str]) = match node {
        TODO => ("todo", &["write", "review"]),
        DONE => ("done", &["ship", "test", "plan"]),
        _ => return Err(PolicyError::Context(format!("{node} is not a column"))),
    };
    let caps = DestinationCaps {
        level: 1,
        caps: vec!["cards".into()],
        orientation: Orientation::Vertical,
    };
    Ok(DestContext::new(id, caps).with_children(ChildOrdering {
        ids: cards.iter().map(|c| c.to_string()).collect(),
        tag_names: cards.iter().map(|_| "Card".to_string()).collect(),
    }))
}

fn bounds(node: u32) -> Option<Rect> {
    match node {
        TODO => Some(Rect::new(0.0, 0.0, 200.0, 400.0)),
        DONE => Some(Rect::new(220.0, 0.0, 420.0, 400.0)),
        _ => None,
    }
}

fn card(id: &str) -> DragPayload {
    DragPayload::new("element")
        .with_data(
            DataMap::new()
                .with("id", id)
                .with("tagName", "Card")
                .with("level", 2_i64),
        )
        .with_strategy(DropStrategy::BubbleToFirst)
}

fn main() {
    env_logger::init();

    let mut tree = ParentTable::new().with_chain(&[BOARD, TODO]);
    tree.set_parent(DONE, BOARD);

    let policies: Rc<dyn PolicyResolver> = Rc::new(Board {
        card: CardPolicy,
        column: ColumnPolicy { max_cards: 3 },
    });
    let mut engine = DropEngine::new();
    for node in [TODO, DONE] {
        let zone = PolicyZone::new(
            "Column",
            column,
            closest_edge_data(bounds),
            policies.clone(),
        )
        .with_debug_log(true);
        engine.register(node, zone);
    }

    for (target, point) in [
        (TODO, Point::new(100.0, 390.0)),
        (DONE, Point::new(320.0, 5.0)),
    ] {
        let payload = card("draft");
        let meta = DragMeta::from_payload(&payload);
        engine.begin_drag(&tree, payload, Some(target), Input::at(point));

        let Some(record) = engine.current_targets().first().cloned() else {
            println!("no target under {point:?}");
            continue;
        };
        let edge = extract_closest_edge(&record.data);
        let report = engine
            .drop_drag(&tree, Some(target), Input::at(point))
            .unwrap_or_default();
        assert!(report.is_clean());

        let Ok(dest) = column(record.node) else {
            continue;
        };
        let ctx = PolicyContext::new(&meta, &dest);
        match check_drop(policies.as_ref(), "Column", &ctx, edge) {
            Ok(placement) => println!(
                "== Drop on {} ==\n  edge {:?}, anchor {:?}, index {}",
                dest.dest_id,
                placement.edge,
                placement.anchor_id,
                placement.insertion_index(&dest.children)
            ),
            Err(rejection) => println!("== Drop on {} ==\n  {rejection}", dest.dest_id),
        }
    }

    // Files are not cards: the column gate rejects them and nothing is targeted.
    let file = DragPayload::new("file");
    let input = Input::at(Point::new(100.0, 100.0));
    let stack = engine.resolve(&tree, &file, Some(TODO), &input, &[]);
    println!("== File over todo ==\n  {} target(s)", stack.len());
    assert!(stack.is_empty());
}
