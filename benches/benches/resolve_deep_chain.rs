// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_drop::engine::DropEngine;
use understory_drop::hierarchy::ParentTable;
use understory_drop::registry::ZoneRegistry;
use understory_drop::resolve::resolve_actual;
use understory_drop::sticky::reconcile;
use understory_drop::types::{DragPayload, DropEffect, DropStrategy, Input};
use understory_drop::zone::ZoneDescriptor;

const DEPTHS: [u32; 3] = [16, 64, 256];

/// A chain `0 -> 1 -> ... -> depth-1`, with a zone on every `stride`-th node.
///
/// Every third zone rejects, every zone is sticky.
fn gen_chain(depth: u32, stride: u32) -> (ParentTable<u32>, ZoneRegistry<u32>) {
    let nodes: Vec<u32> = (0..depth).collect();
    let tree = ParentTable::new().with_chain(&nodes);
    let mut registry = ZoneRegistry::new();
    for (i, node) in nodes.iter().copied().step_by(stride as usize).enumerate() {
        let accepts = i % 3 != 2;
        registry.register(
            node,
            Box::new(
                ZoneDescriptor::new()
                    .with_can_accept(move |_| accepts)
                    .with_sticky(|_| true),
            ),
        );
    }
    (tree, registry)
}

fn bench_resolve(c: &mut Criterion) {
    let input = Input::at(Point::new(10.0, 10.0));
    for strategy in [
        DropStrategy::TopmostOnly,
        DropStrategy::BubbleToFirst,
        DropStrategy::Nested,
    ] {
        let mut group = c.benchmark_group(format!("resolve_{}", strategy.name()));
        let payload = DragPayload::new("item").with_strategy(strategy);
        for depth in DEPTHS {
            let (tree, registry) = gen_chain(depth, 4);
            group.throughput(Throughput::Elements(u64::from(depth)));
            group.bench_function(format!("depth{depth}"), |b| {
                b.iter(|| {
                    let stack = resolve_actual(
                        &registry,
                        &tree,
                        &payload,
                        Some(depth - 1),
                        &input,
                        DropEffect::Move,
                    );
                    black_box(stack.len());
                });
            });
        }
        group.finish();
    }
}

fn bench_reconcile(c: &mut Criterion) {
    let input = Input::at(Point::new(10.0, 10.0));
    let payload = DragPayload::new("item").with_strategy(DropStrategy::Nested);
    let mut group = c.benchmark_group("reconcile_empty_frame");
    for depth in DEPTHS {
        let (tree, registry) = gen_chain(depth, 4);
        let previous = resolve_actual(
            &registry,
            &tree,
            &payload,
            Some(depth - 1),
            &input,
            DropEffect::Move,
        );
        group.throughput(Throughput::Elements(previous.len() as u64));
        group.bench_function(format!("depth{depth}"), |b| {
            b.iter_batched(
                || {
                    resolve_actual(&registry, &tree, &payload, None, &input, DropEffect::Move)
                },
                |actual| {
                    let stack = reconcile(&registry, &payload, &input, &previous, actual, false);
                    black_box(stack.len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_frames");
    for depth in DEPTHS {
        let nodes: Vec<u32> = (0..depth).collect();
        let tree = ParentTable::new().with_chain(&nodes);
        group.throughput(Throughput::Elements(100));
        group.bench_function(format!("depth{depth}"), |b| {
            b.iter_batched(
                || {
                    let mut engine = DropEngine::new();
                    for node in nodes.iter().copied().step_by(4) {
                        engine.register(node, ZoneDescriptor::new().with_sticky(|_| true));
                    }
                    engine
                },
                |mut engine| {
                    let payload = DragPayload::new("item").with_strategy(DropStrategy::Nested);
                    engine.begin_drag(&tree, payload, Some(depth - 1), Input::default());
                    // Alternate between the leaf, the middle of the chain, and nothing.
                    for frame in 0..100_u32 {
                        let target = match frame % 3 {
                            0 => Some(depth - 1),
                            1 => Some(depth / 2),
                            _ => None,
                        };
                        let x = f64::from(frame);
                        black_box(engine.update_drag(&tree, target, Input::at(Point::new(x, x))));
                    }
                    black_box(engine.drop_drag(&tree, None, Input::default()));
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_reconcile, bench_session);
criterion_main!(benches);
