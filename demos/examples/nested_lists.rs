// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested lists with sticky zones.
//!
//! A board holds a list, the list holds a card. The pointer moves from the card onto a
//! gap between items, where nothing is registered, and then off the board entirely.
//! The sticky list and board stay drop targets after the pointer leaves them. The
//! strategies are then compared on a card that rejects the drag.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_drop_demos --example nested_lists`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;
use understory_drop::data::DataMap;
use understory_drop::engine::DropEngine;
use understory_drop::hierarchy::ParentTable;
use understory_drop::types::{DragPayload, DropStrategy, Input, ResolvedRecord};
use understory_drop::zone::{ZoneCallback, ZoneDescriptor};

const BOARD: u32 = 1;
const LIST: u32 = 2;
const CARD: u32 = 3;
const GAP: u32 = 4;
const LABEL: u32 = 5;

type Log = Rc<RefCell<Vec<String>>>;

fn logged(name: &'static str, log: &Log) -> ZoneDescriptor<u32> {
    let mut zone = ZoneDescriptor::new().with_data(move |_| DataMap::new().with("name", name));
    for callback in [
        ZoneCallback::DragEnter,
        ZoneCallback::DragLeave,
        ZoneCallback::Drop,
    ] {
        let log = log.clone();
        zone = zone.on(callback, move |args| {
            log.borrow_mut().push(format!(
                "{name}: {callback} (sticky: {})",
                args.self_record.active_due_to_stickiness
            ));
            Ok(())
        });
    }
    zone
}

fn names(records: &[ResolvedRecord<u32>]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|r| r.data.get_str("name"))
        .collect()
}

fn main() {
    env_logger::init();

    // BOARD -> LIST -> {CARD -> LABEL, GAP}
    let mut tree = ParentTable::new().with_chain(&[BOARD, LIST, CARD, LABEL]);
    tree.set_parent(GAP, LIST);
    tree.set_structural(LABEL, false);

    let log: Log = Rc::default();
    let mut engine = DropEngine::new();
    engine.register(BOARD, logged("board", &log).with_sticky(|_| true));
    engine.register(LIST, logged("list", &log).with_sticky(|_| true));
    engine.register(CARD, logged("card", &log));

    let payload = DragPayload::new("card").with_strategy(DropStrategy::Nested);
    engine.begin_drag(&tree, payload, Some(LABEL), Input::at(Point::new(10.0, 10.0)));
    println!("== Start ==\n  {:?}", names(engine.current_targets()));
    assert_eq!(names(engine.current_targets()), ["card", "list", "board"]);

    // Into the gap: the card is left, the list is still hit directly.
    engine.update_drag(&tree, Some(GAP), Input::at(Point::new(10.0, 40.0)));
    println!("== Gap ==\n  {:?}", names(engine.current_targets()));
    assert_eq!(names(engine.current_targets()), ["list", "board"]);

    // Off the board: nothing is hit, both sticky zones are carried forward.
    engine.update_drag(&tree, None, Input::at(Point::new(-50.0, 40.0)));
    let carried: Vec<bool> = engine
        .current_targets()
        .iter()
        .map(|r| r.active_due_to_stickiness)
        .collect();
    println!("== Outside ==\n  {:?} sticky: {carried:?}", names(engine.current_targets()));
    assert_eq!(carried, [true, true]);

    let report = engine
        .drop_drag(&tree, None, Input::at(Point::new(-50.0, 40.0)))
        .unwrap_or_default();
    assert!(report.is_clean());

    println!("== Callbacks ==");
    for line in log.borrow().iter() {
        println!("  {line}");
    }

    // Strategies over a card that rejects everything.
    let mut engine = DropEngine::new();
    engine.register(BOARD, logged("board", &log));
    engine.register(LIST, logged("list", &log));
    engine.register(CARD, logged("card", &log).with_can_accept(|_| false));

    println!("== Strategies ==");
    for strategy in [
        DropStrategy::TopmostOnly,
        DropStrategy::BubbleToFirst,
        DropStrategy::Nested,
    ] {
        let payload = DragPayload::new("card").with_strategy(strategy);
        let input = Input::at(Point::new(10.0, 10.0));
        let stack = engine.resolve(&tree, &payload, Some(LABEL), &input, &[]);
        println!("  {:<14} {:?}", strategy.name(), names(&stack));
    }
}
