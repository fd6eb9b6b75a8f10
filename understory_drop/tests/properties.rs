// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for resolution and stickiness over random zone chains.
//!
//! The hierarchy is a single chain `0 ⊂ 1 ⊂ … ⊂ n-1`; every node is either not a zone, an
//! accepting zone, or a rejecting zone, and zones may be sticky.

use proptest::prelude::*;
use understory_drop::engine::DropEngine;
use understory_drop::hierarchy::ParentTable;
use understory_drop::types::{DragPayload, DropStrategy, Input, ResolvedStack};
use understory_drop::zone::ZoneDescriptor;

#[derive(Copy, Clone, Debug)]
enum Kind {
    Plain,
    Accepts { sticky: bool },
    Rejects,
}

fn kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::Plain),
        any::<bool>().prop_map(|sticky| Kind::Accepts { sticky }),
        Just(Kind::Rejects),
    ]
}

fn chain() -> impl Strategy<Value = (Vec<Kind>, usize, usize)> {
    proptest::collection::vec(kind(), 1..12).prop_flat_map(|kinds| {
        let n = kinds.len();
        (Just(kinds), 0..n, 0..n)
    })
}

fn build(kinds: &[Kind]) -> (ParentTable<u32>, DropEngine<u32>) {
    let ids: Vec<u32> = (0..kinds.len() as u32).collect();
    let tree = ParentTable::new().with_chain(&ids);
    let mut engine = DropEngine::new();
    for (id, kind) in ids.iter().zip(kinds) {
        match *kind {
            Kind::Plain => {}
            Kind::Accepts { sticky } => {
                engine.register(*id, ZoneDescriptor::new().with_sticky(move |_| sticky));
            }
            Kind::Rejects => {
                engine.register(*id, ZoneDescriptor::new().with_can_accept(|_| false));
            }
        }
    }
    (tree, engine)
}

fn nodes(stack: &ResolvedStack<u32>) -> Vec<u32> {
    stack.nodes().copied().collect()
}

fn resolve(
    engine: &DropEngine<u32>,
    tree: &ParentTable<u32>,
    strategy: DropStrategy,
    target: usize,
    previous: &ResolvedStack<u32>,
) -> ResolvedStack<u32> {
    let payload = DragPayload::new("item").with_strategy(strategy);
    engine.resolve(
        tree,
        &payload,
        Some(target as u32),
        &Input::default(),
        previous,
    )
}

proptest! {
    #[test]
    fn topmost_only_is_nearest_zone_or_nothing((kinds, target, _) in chain()) {
        let (tree, engine) = build(&kinds);
        let got = resolve(&engine, &tree, DropStrategy::TopmostOnly, target, &ResolvedStack::new());

        let nearest = kinds[target..]
            .iter()
            .position(|k| !matches!(k, Kind::Plain))
            .map(|offset| target + offset);
        let expected: Vec<u32> = match nearest.map(|i| (i, kinds[i])) {
            Some((i, Kind::Accepts { .. })) => vec![i as u32],
            _ => Vec::new(),
        };
        prop_assert_eq!(nodes(&got), expected);
    }

    #[test]
    fn bubble_reaches_first_accepting_ancestor((kinds, target, _) in chain()) {
        let (tree, engine) = build(&kinds);
        let got = resolve(&engine, &tree, DropStrategy::BubbleToFirst, target, &ResolvedStack::new());

        let expected: Vec<u32> = kinds[target..]
            .iter()
            .position(|k| matches!(k, Kind::Accepts { .. }))
            .map(|offset| (target + offset) as u32)
            .into_iter()
            .collect();
        prop_assert_eq!(nodes(&got), expected);
    }

    #[test]
    fn nested_is_in_ancestor_order((kinds, target, _) in chain()) {
        let (tree, engine) = build(&kinds);
        let got = nodes(&resolve(&engine, &tree, DropStrategy::Nested, target, &ResolvedStack::new()));

        prop_assert!(got.windows(2).all(|w| w[0] < w[1]));
        for n in &got {
            prop_assert!(matches!(kinds[*n as usize], Kind::Accepts { .. }), "node {} is not Accepts", n);
        }
        let accepting = kinds[target..]
            .iter()
            .filter(|k| matches!(k, Kind::Accepts { .. }))
            .count();
        prop_assert_eq!(got.len(), accepting);
    }

    #[test]
    fn resolve_is_idempotent((kinds, target, from) in chain(), strategy in 0_u8..3) {
        let strategy = [DropStrategy::TopmostOnly, DropStrategy::BubbleToFirst, DropStrategy::Nested]
            [usize::from(strategy)];
        let (tree, engine) = build(&kinds);
        let previous = resolve(&engine, &tree, strategy, from, &ResolvedStack::new());
        let a = resolve(&engine, &tree, strategy, target, &previous);
        let b = resolve(&engine, &tree, strategy, target, &previous);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn stickiness_stays_within_bounds((kinds, target, from) in chain()) {
        let (tree, engine) = build(&kinds);
        let previous = resolve(&engine, &tree, DropStrategy::Nested, from, &ResolvedStack::new());
        let raw = resolve(&engine, &tree, DropStrategy::Nested, target, &ResolvedStack::new());
        let got = resolve(&engine, &tree, DropStrategy::Nested, target, &previous);

        prop_assert!(got.len() <= previous.len().max(raw.len()));
        prop_assert!(got.len() >= raw.len());
        // Fresh records are kept as-is at the outer end.
        let tail = &got[got.len() - raw.len()..];
        prop_assert_eq!(tail, raw.records());
        for record in &got[..got.len() - raw.len()] {
            prop_assert!(record.active_due_to_stickiness);
        }
    }
}
