// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stickiness reconciler: carry previously resolved zones into a frame that lost them.
//!
//! ## Rules
//!
//! - A raw stack at least as long as the previous one is returned unchanged.
//! - Otherwise both stacks are walked outermost first, position by position. A fresh record
//!   always wins. Where the raw stack has no record, the previous record is carried forward
//!   only if its parent position still holds the same zone, it is still registered, it still
//!   accepts, and it is sticky. The first failure ends the walk.
//! - Carried records keep their previous data and effect and are flagged
//!   [`active_due_to_stickiness`](crate::types::ResolvedRecord::active_due_to_stickiness).
//!
//! The result is never longer than `max(previous, raw)` and never shorter than `raw`.

use alloc::vec::Vec;
use core::hash::Hash;

use crate::registry::ZoneRegistry;
use crate::types::{DragPayload, Feedback, Input, ResolvedRecord, ResolvedStack};
use crate::zone::catch_panic;

/// Reconcile the raw stack of this frame against the previous frame's stack.
///
/// With `release_when_empty`, an empty raw stack is returned as is.
pub fn reconcile<K>(
    registry: &ZoneRegistry<K>,
    payload: &DragPayload,
    input: &Input,
    previous: &[ResolvedRecord<K>],
    actual: ResolvedStack<K>,
    release_when_empty: bool,
) -> ResolvedStack<K>
where
    K: Copy + Eq + Hash + core::fmt::Debug,
{
    if actual.len() >= previous.len() {
        return actual;
    }
    if actual.is_empty() && release_when_empty {
        return actual;
    }

    // Both sides outermost first.
    let mut fresh = actual.into_records().into_iter().rev();
    let last: Vec<&ResolvedRecord<K>> = previous.iter().rev().collect();
    let mut out: Vec<ResolvedRecord<K>> = Vec::with_capacity(previous.len());

    for (index, prev) in last.iter().enumerate() {
        if let Some(record) = fresh.next() {
            out.push(record);
            continue;
        }

        let built_parent = index.checked_sub(1).and_then(|i| out.get(i)).map(|r| r.node);
        let prev_parent = index.checked_sub(1).and_then(|i| last.get(i)).map(|r| r.node);
        if built_parent != prev_parent {
            break;
        }

        let Some(zone) = registry.lookup(&prev.node) else {
            break;
        };
        let feedback = Feedback {
            input,
            payload,
            node: prev.node,
        };
        let carried = catch_panic(|| zone.can_accept(&feedback) && zone.is_sticky(&feedback))
            .unwrap_or_else(|| {
                log::warn!("reconcile: predicate panicked for {:?}, not carried", prev.node);
                false
            });
        if !carried {
            break;
        }

        out.push(ResolvedRecord {
            active_due_to_stickiness: true,
            ..(*prev).clone()
        });
    }

    out.reverse();
    ResolvedStack::from_records(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataMap;
    use crate::types::DropEffect;
    use crate::zone::{DropZone, ZoneDescriptor};
    use alloc::boxed::Box;
    use alloc::vec;

    fn record(node: u32, tag: i64) -> ResolvedRecord<u32> {
        ResolvedRecord {
            node,
            data: DataMap::new().with("tag", tag),
            effect: DropEffect::Copy,
            active_due_to_stickiness: false,
        }
    }

    fn sticky() -> Box<dyn DropZone<u32>> {
        // Fresh data would say -1; carried records must keep their old data.
        Box::new(
            ZoneDescriptor::new()
                .with_sticky(|_| true)
                .with_data(|_| DataMap::new().with("tag", -1_i64)),
        )
    }

    fn run(
        reg: &ZoneRegistry<u32>,
        previous: &[ResolvedRecord<u32>],
        actual: Vec<ResolvedRecord<u32>>,
    ) -> ResolvedStack<u32> {
        reconcile(
            reg,
            &DragPayload::new("card"),
            &Input::default(),
            previous,
            ResolvedStack::from(actual),
            false,
        )
    }

    fn summary(stack: &ResolvedStack<u32>) -> Vec<(u32, bool)> {
        stack
            .iter()
            .map(|r| (r.node, r.active_due_to_stickiness))
            .collect()
    }

    #[test]
    fn longer_or_equal_raw_is_unchanged() {
        let reg = ZoneRegistry::new();
        let previous = vec![record(1, 1)];
        let got = run(&reg, &previous, vec![record(2, 2)]);
        assert_eq!(summary(&got), vec![(2, false)]);
    }

    #[test]
    fn unregistered_inner_zone_leaves_sticky_outer() {
        let mut reg = ZoneRegistry::new();
        let h1 = reg.register(1, sticky());
        reg.register(2, sticky());
        reg.unregister(h1);

        let previous = vec![record(1, 10), record(2, 20)];
        let got = run(&reg, &previous, vec![]);
        assert_eq!(summary(&got), vec![(2, true)]);
        assert_eq!(got[0].data.get_int("tag"), Some(20));
        assert_eq!(got[0].effect, DropEffect::Copy);
    }

    #[test]
    fn changed_lineage_carries_nothing() {
        let mut reg = ZoneRegistry::new();
        reg.register(1, sticky());
        reg.register(2, sticky());

        // The outer position now holds an unrelated zone.
        let previous = vec![record(1, 10), record(2, 20)];
        let got = run(&reg, &previous, vec![record(4, 40)]);
        assert_eq!(summary(&got), vec![(4, false)]);
    }

    #[test]
    fn non_sticky_outer_stops_the_walk() {
        let mut reg = ZoneRegistry::new();
        reg.register(1, sticky());
        reg.register(2, Box::new(ZoneDescriptor::new()));

        let previous = vec![record(1, 10), record(2, 20)];
        assert!(run(&reg, &previous, vec![]).is_empty());
    }

    #[test]
    fn rejecting_zone_is_not_carried() {
        let mut reg = ZoneRegistry::new();
        reg.register(
            1,
            Box::new(
                ZoneDescriptor::new()
                    .with_sticky(|_| true)
                    .with_can_accept(|_| false),
            ),
        );
        let previous = vec![record(1, 10)];
        assert!(run(&reg, &previous, vec![]).is_empty());
    }

    #[cfg(feature = "std")]
    #[test]
    fn panicking_stickiness_stops_the_walk() {
        let mut reg = ZoneRegistry::new();
        reg.register(1, sticky());
        reg.register(
            2,
            Box::new(ZoneDescriptor::new().with_sticky(|_| panic!("sticky exploded"))),
        );

        let previous = vec![record(1, 10), record(2, 20)];
        assert!(run(&reg, &previous, vec![]).is_empty());
        // The fresh outer record still wins; only the carried inner one is checked.
        let got = run(&reg, &previous, vec![record(2, 21)]);
        assert_eq!(summary(&got), vec![(1, true), (2, false)]);
    }

    #[test]
    fn inner_zone_carried_under_fresh_parent() {
        let mut reg = ZoneRegistry::new();
        reg.register(1, sticky());
        reg.register(2, sticky());

        // Hit testing still reaches the outer zone but not the inner one.
        let previous = vec![record(1, 10), record(2, 20)];
        let got = run(&reg, &previous, vec![record(2, 21)]);
        assert_eq!(summary(&got), vec![(1, true), (2, false)]);
        assert_eq!(got[0].data.get_int("tag"), Some(10));
        assert_eq!(got[1].data.get_int("tag"), Some(21));
    }

    #[test]
    fn release_when_empty_option() {
        let mut reg = ZoneRegistry::new();
        reg.register(1, sticky());
        let previous = vec![record(1, 10)];
        let got = reconcile(
            &reg,
            &DragPayload::new("card"),
            &Input::default(),
            &previous,
            ResolvedStack::new(),
            true,
        );
        assert!(got.is_empty());
        assert_eq!(summary(&run(&reg, &previous, vec![])), vec![(1, true)]);
    }
}
