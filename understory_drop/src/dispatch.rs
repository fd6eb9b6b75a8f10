// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event dispatcher: deliver drag events to the zones of the previous and current stacks.
//!
//! ## Ordering
//!
//! For [`DragEvent::DropTargetChange`]:
//! 1) every zone of the previous stack, in stack order, receives a change callback, followed
//!    by a leave callback if it is no longer a target. Both carry the zone's previous record;
//! 2) every zone of the current stack that was not visited in step 1 receives a change
//!    callback followed by an enter callback.
//!
//! Every other event is forwarded to the zones of the current stack in stack order.
//!
//! ## Failure isolation
//!
//! A zone that is no longer registered is skipped. A callback error (or, with the `std`
//! feature, a panic) is logged and collected in the [`DispatchReport`]; the remaining zones
//! are still notified.
//!
//! ```
//! use understory_drop::dispatch::{DragEvent, EventPayload, dispatch};
//! use understory_drop::registry::ZoneRegistry;
//! use understory_drop::types::{
//!     DragLocation, DragLocationHistory, DragPayload, Input, ResolvedStack,
//! };
//!
//! let mut registry: ZoneRegistry<u32> = ZoneRegistry::new();
//! let source = DragPayload::new("card");
//! let location = DragLocationHistory::starting_at(DragLocation {
//!     input: Input::default(),
//!     drop_targets: ResolvedStack::new(),
//! });
//! let report = dispatch(
//!     &mut registry,
//!     DragEvent::Drag,
//!     &EventPayload { source: &source, location: &location },
//! );
//! assert!(report.invocations.is_empty());
//! assert!(report.is_clean());
//! ```

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;

use crate::error::ZoneError;
use crate::registry::ZoneRegistry;
use crate::types::{DragLocationHistory, DragPayload, ResolvedRecord};
use crate::zone::{ZoneCallback, ZoneEventArgs, catch_panic, invoke};

/// Drag lifecycle events understood by [`dispatch`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DragEvent {
    /// A drag preview is about to be generated.
    GenerateDragPreview,
    /// The drag started.
    DragStart,
    /// The pointer moved.
    Drag,
    /// The resolved zones changed between `location.previous` and `location.current`.
    DropTargetChange,
    /// The drag finished (dropped or cancelled).
    Drop,
}

impl DragEvent {
    /// The zone callback that carries this event.
    pub const fn callback(self) -> ZoneCallback {
        match self {
            Self::GenerateDragPreview => ZoneCallback::GenerateDragPreview,
            Self::DragStart => ZoneCallback::DragStart,
            Self::Drag => ZoneCallback::Drag,
            Self::DropTargetChange => ZoneCallback::DropTargetChange,
            Self::Drop => ZoneCallback::Drop,
        }
    }
}

/// Shared payload of one dispatch: the drag and its location history.
#[derive(Clone, Copy, Debug)]
pub struct EventPayload<'a, K> {
    /// The drag.
    pub source: &'a DragPayload,
    /// Initial, previous, and current locations.
    pub location: &'a DragLocationHistory<K>,
}

/// A callback that failed during dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct CallbackFailure<K> {
    /// The zone whose callback failed.
    pub node: K,
    /// The failing callback.
    pub callback: ZoneCallback,
    /// What went wrong.
    pub error: ZoneError,
}

/// What a dispatch did.
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchReport<K> {
    /// Callbacks invoked, in order (including ones that failed).
    pub invocations: Vec<(K, ZoneCallback)>,
    /// Callbacks that returned an error or panicked.
    pub failures: Vec<CallbackFailure<K>>,
}

impl<K> Default for DispatchReport<K> {
    fn default() -> Self {
        Self {
            invocations: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<K> DispatchReport<K> {
    /// Returns true if no callback failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Append another report.
    pub fn extend(&mut self, other: Self) {
        self.invocations.extend(other.invocations);
        self.failures.extend(other.failures);
    }
}

/// Deliver `event` to the affected zones.
pub fn dispatch<K>(
    registry: &mut ZoneRegistry<K>,
    event: DragEvent,
    payload: &EventPayload<'_, K>,
) -> DispatchReport<K>
where
    K: Copy + Eq + Hash + core::fmt::Debug,
{
    let mut report = DispatchReport::default();
    let current = &payload.location.current.drop_targets;

    if event != DragEvent::DropTargetChange {
        for record in current {
            deliver(registry, event.callback(), record, payload, &mut report);
        }
        return report;
    }

    let previous = &payload.location.previous.drop_targets;
    let mut visited: HashSet<K> = HashSet::with_capacity(previous.len());
    for record in previous {
        visited.insert(record.node);
        // Zones of the previous stack see their previous record; the fresh one is in
        // `location.current`.
        deliver(registry, ZoneCallback::DropTargetChange, record, payload, &mut report);
        if !current.contains(&record.node) {
            deliver(registry, ZoneCallback::DragLeave, record, payload, &mut report);
        }
    }
    for record in current {
        if visited.contains(&record.node) {
            continue;
        }
        deliver(registry, ZoneCallback::DropTargetChange, record, payload, &mut report);
        deliver(registry, ZoneCallback::DragEnter, record, payload, &mut report);
    }
    report
}

fn deliver<K>(
    registry: &mut ZoneRegistry<K>,
    callback: ZoneCallback,
    record: &ResolvedRecord<K>,
    payload: &EventPayload<'_, K>,
    report: &mut DispatchReport<K>,
) where
    K: Copy + Eq + Hash + core::fmt::Debug,
{
    let Some(zone) = registry.lookup_mut(&record.node) else {
        log::trace!("dispatch: {callback} skipped, {:?} is no longer registered", record.node);
        return;
    };
    let args = ZoneEventArgs {
        source: payload.source,
        location: payload.location,
        self_record: record,
    };
    report.invocations.push((record.node, callback));
    if let Err(error) = isolated(|| invoke(zone, callback, &args), callback) {
        log::warn!("dispatch: {callback} failed for {:?}: {error}", record.node);
        report.failures.push(CallbackFailure {
            node: record.node,
            callback,
            error,
        });
    }
}

fn isolated(
    f: impl FnOnce() -> Result<(), ZoneError>,
    callback: ZoneCallback,
) -> Result<(), ZoneError> {
    catch_panic(f).unwrap_or(Err(ZoneError::Panicked { callback }))
}
