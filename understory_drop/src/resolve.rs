// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit-test resolver: climb from the node under the pointer and collect accepting zones.
//!
//! ## Algorithm
//!
//! 1) Read the [`DropStrategy`] from the payload.
//! 2) Normalize the target to its nearest structural ancestor (inclusive). No such node
//!    means no zones.
//! 3) Walk the ancestors, innermost first:
//!    - a node without a registry entry is climbed past, unless the host marks it as a zone
//!      (registry desync), in which case [`DropStrategy::TopmostOnly`] stops;
//!    - a rejecting zone stops the walk under [`DropStrategy::TopmostOnly`] and is skipped
//!      otherwise;
//!    - an accepting zone produces a record. The walk ends there unless the strategy is
//!      [`DropStrategy::Nested`].
//!
//! With the `std` feature a panicking predicate counts as a rejection, a panicking data
//! producer ends the walk, and a panicking effect producer yields the default effect.
//!
//! The walk only ever moves strictly outward, so sibling branches are never visited and the
//! output is in ancestor order, innermost first.

use core::hash::Hash;

use crate::hierarchy::{Ancestors, Hierarchy, structural_start};
use crate::registry::ZoneRegistry;
use crate::types::{DragPayload, DropEffect, Feedback, Input, ResolvedRecord, ResolvedStack};
use crate::zone::catch_panic;

/// Resolve the zones under `target` for this frame, without stickiness.
pub fn resolve_actual<K, H>(
    registry: &ZoneRegistry<K>,
    hierarchy: &H,
    payload: &DragPayload,
    target: Option<K>,
    input: &Input,
    default_effect: DropEffect,
) -> ResolvedStack<K>
where
    K: Copy + Eq + Hash + core::fmt::Debug,
    H: Hierarchy<K> + ?Sized,
{
    let strategy = payload.resolved_strategy();
    let mut out = ResolvedStack::new();

    for node in Ancestors::new(hierarchy, structural_start(hierarchy, target)) {
        let Some(zone) = registry.lookup(&node) else {
            if hierarchy.marks_zone(&node) {
                log::debug!("resolve: {node:?} is marked as a zone but has no registration");
                if !strategy.climbs_past_rejection() {
                    break;
                }
            }
            continue;
        };

        let feedback = Feedback {
            input,
            payload,
            node,
        };
        let accepts = catch_panic(|| zone.can_accept(&feedback)).unwrap_or_else(|| {
            log::warn!("resolve: can_accept panicked for {node:?}, treating it as a rejection");
            false
        });
        if !accepts {
            if strategy.climbs_past_rejection() {
                continue;
            }
            break;
        }

        let Some(data) = catch_panic(|| zone.data(&feedback)) else {
            log::warn!("resolve: data panicked for {node:?}, stopping");
            break;
        };
        let effect = catch_panic(|| zone.effect(&feedback)).unwrap_or_else(|| {
            log::warn!("resolve: effect panicked for {node:?}, using the default");
            None
        });
        out.push(ResolvedRecord {
            node,
            data,
            effect: effect.unwrap_or(default_effect),
            active_due_to_stickiness: false,
        });
        if !strategy.collects_ancestors() {
            break;
        }
    }

    out
}
