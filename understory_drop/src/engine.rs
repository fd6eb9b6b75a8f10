// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop engine: owns the registry and drives a drag session frame by frame.
//!
//! ## Frame pipeline
//!
//! Each pointer update runs, in order:
//! 1) [`resolve_actual`](crate::resolve::resolve_actual) from the node under the pointer;
//! 2) [`reconcile`](crate::sticky::reconcile) against the previous frame's stack;
//! 3) [`dispatch`](crate::dispatch::dispatch) of `DropTargetChange` when the stack changed,
//!    then `Drag`.
//!
//! The engine holds at most one drag at a time. The stack produced by frame N is the
//! previous stack of frame N+1.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::hash::Hash;

use crate::dispatch::{DispatchReport, DragEvent, EventPayload, dispatch};
use crate::hierarchy::Hierarchy;
use crate::registry::{ZoneHandle, ZoneRegistry};
use crate::resolve::resolve_actual;
use crate::sticky::reconcile;
use crate::types::{
    DragLocation, DragLocationHistory, DragPayload, DropEffect, Input, ResolvedRecord,
    ResolvedStack,
};
use crate::zone::DropZone;

/// Engine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    /// Effect used when a zone does not produce one.
    pub default_effect: DropEffect,
    /// When true, a frame with nothing under the pointer drops all targets instead of
    /// carrying sticky zones forward.
    pub release_stickiness_when_empty: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            default_effect: DropEffect::Move,
            release_stickiness_when_empty: false,
        }
    }
}

/// Result of [`DropEngine::update_drag`].
#[derive(Clone, Debug, PartialEq)]
pub struct DragFrame<K> {
    /// True if the drop targets changed this frame.
    pub changed: bool,
    /// Callbacks invoked while processing the frame.
    pub report: DispatchReport<K>,
}

#[derive(Debug)]
struct Session<K> {
    payload: DragPayload,
    location: DragLocationHistory<K>,
}

/// Registry plus the state of the drag in progress.
pub struct DropEngine<K> {
    registry: ZoneRegistry<K>,
    options: EngineOptions,
    session: Option<Session<K>>,
}

impl<K: core::fmt::Debug> core::fmt::Debug for DropEngine<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DropEngine")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .field("dragging", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

impl<K> Default for DropEngine<K> {
    fn default() -> Self {
        Self {
            registry: ZoneRegistry::default(),
            options: EngineOptions::default(),
            session: None,
        }
    }
}

impl<K> DropEngine<K>
where
    K: Copy + Eq + Hash + core::fmt::Debug,
{
    /// Create an engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given options.
    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The engine's options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Register a zone for `node`. See [`ZoneRegistry::register`].
    pub fn register(&mut self, node: K, zone: impl DropZone<K> + 'static) -> ZoneHandle {
        self.registry.register(node, Box::new(zone))
    }

    /// Remove a registration. Idempotent.
    pub fn unregister(&mut self, handle: ZoneHandle) -> bool {
        self.registry.unregister(handle)
    }

    /// The zone registry.
    pub fn registry(&self) -> &ZoneRegistry<K> {
        &self.registry
    }

    /// Mutable access to the zone registry.
    pub fn registry_mut(&mut self) -> &mut ZoneRegistry<K> {
        &mut self.registry
    }

    /// Resolve the zones under `target` and reconcile against `previous`.
    ///
    /// Pure with respect to the engine; the caller keeps the result and passes it back as
    /// `previous` on the next call.
    pub fn resolve<H: Hierarchy<K> + ?Sized>(
        &self,
        hierarchy: &H,
        payload: &DragPayload,
        target: Option<K>,
        input: &Input,
        previous: &[ResolvedRecord<K>],
    ) -> ResolvedStack<K> {
        let actual = resolve_actual(
            &self.registry,
            hierarchy,
            payload,
            target,
            input,
            self.options.default_effect,
        );
        reconcile(
            &self.registry,
            payload,
            input,
            previous,
            actual,
            self.options.release_stickiness_when_empty,
        )
    }

    /// Deliver `event` against the stacks in `payload.location`.
    pub fn dispatch(
        &mut self,
        event: DragEvent,
        payload: &EventPayload<'_, K>,
    ) -> DispatchReport<K> {
        dispatch(&mut self.registry, event, payload)
    }

    /// Start a drag. An active drag is cancelled first.
    ///
    /// Dispatches `GenerateDragPreview` and then `DragStart` to the initial targets.
    pub fn begin_drag<H: Hierarchy<K> + ?Sized>(
        &mut self,
        hierarchy: &H,
        payload: DragPayload,
        target: Option<K>,
        input: Input,
    ) -> DispatchReport<K> {
        let mut report = self.cancel_drag().unwrap_or_default();

        let drop_targets = self.resolve(hierarchy, &payload, target, &input, &[]);
        log::trace!(
            "begin_drag: {} with {} initial target(s)",
            payload.type_tag,
            drop_targets.len()
        );
        let session = Session {
            location: DragLocationHistory::starting_at(DragLocation {
                input,
                drop_targets,
            }),
            payload,
        };
        for event in [DragEvent::GenerateDragPreview, DragEvent::DragStart] {
            report.extend(self.dispatch_session(event, &session));
        }
        self.session = Some(session);
        report
    }

    /// Process a pointer update. Returns `None` when no drag is active.
    pub fn update_drag<H: Hierarchy<K> + ?Sized>(
        &mut self,
        hierarchy: &H,
        target: Option<K>,
        input: Input,
    ) -> Option<DragFrame<K>> {
        let mut session = self.session.take()?;
        let drop_targets = self.resolve(
            hierarchy,
            &session.payload,
            target,
            &input,
            &session.location.current.drop_targets,
        );
        let changed = !drop_targets.same_targets(&session.location.current.drop_targets);
        let next = DragLocation {
            input,
            drop_targets,
        };

        let mut report = DispatchReport::default();
        if changed {
            log::trace!(
                "update_drag: targets {:?} -> {:?}",
                session.location.current.drop_targets.nodes().collect::<Vec<_>>(),
                next.drop_targets.nodes().collect::<Vec<_>>()
            );
            session.location.previous = core::mem::replace(&mut session.location.current, next);
            report.extend(self.dispatch_session(DragEvent::DropTargetChange, &session));
        } else {
            session.location.current = next;
        }
        report.extend(self.dispatch_session(DragEvent::Drag, &session));

        self.session = Some(session);
        Some(DragFrame { changed, report })
    }

    /// Finish the drag with a final update at `input`, then dispatch `Drop`.
    ///
    /// Returns `None` when no drag is active.
    pub fn drop_drag<H: Hierarchy<K> + ?Sized>(
        &mut self,
        hierarchy: &H,
        target: Option<K>,
        input: Input,
    ) -> Option<DispatchReport<K>> {
        let mut report = self.update_drag(hierarchy, target, input)?.report;
        let session = self.session.take()?;
        report.extend(self.dispatch_session(DragEvent::Drop, &session));
        Some(report)
    }

    /// Abort the drag: clear all targets, then dispatch `Drop` to nobody.
    ///
    /// Returns `None` when no drag is active.
    pub fn cancel_drag(&mut self) -> Option<DispatchReport<K>> {
        let mut session = self.session.take()?;
        let mut report = DispatchReport::default();
        if !session.location.current.drop_targets.is_empty() {
            let cleared = DragLocation {
                input: session.location.current.input,
                drop_targets: ResolvedStack::new(),
            };
            session.location.previous = core::mem::replace(&mut session.location.current, cleared);
            report.extend(self.dispatch_session(DragEvent::DropTargetChange, &session));
        }
        report.extend(self.dispatch_session(DragEvent::Drop, &session));
        Some(report)
    }

    /// Targets of the drag in progress, innermost first (empty when idle).
    pub fn current_targets(&self) -> &[ResolvedRecord<K>] {
        self.session
            .as_ref()
            .map(|s| s.location.current.drop_targets.records())
            .unwrap_or_default()
    }

    /// Location history of the drag in progress.
    pub fn location(&self) -> Option<&DragLocationHistory<K>> {
        self.session.as_ref().map(|s| &s.location)
    }

    /// Payload of the drag in progress.
    pub fn payload(&self) -> Option<&DragPayload> {
        self.session.as_ref().map(|s| &s.payload)
    }

    /// Returns true while a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    fn dispatch_session(&mut self, event: DragEvent, session: &Session<K>) -> DispatchReport<K> {
        dispatch(
            &mut self.registry,
            event,
            &EventPayload {
                source: &session.payload,
                location: &session.location,
            },
        )
    }
}
