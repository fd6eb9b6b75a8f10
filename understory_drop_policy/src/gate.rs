// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Policy gate: a [`DropZone`] whose acceptance and data come from policies.
//!
//! ## Acceptance
//!
//! Each evaluation builds a fresh [`DestContext`] through the host closure, derives
//! [`DragMeta`] from the payload, and asks the source policy (by tag) and the destination
//! policy (by kind). Both must accept; a missing policy accepts. The allowed edges are
//! computed at the same time and cached for the data step.
//!
//! ## Data
//!
//! The cached edges (or, if nothing was cached yet, the destination's candidates) are
//! handed to the host's edge-data closure. The returned map carries the allowed edges in a
//! reserved slot; see [`extract_allowed_edges`](crate::edge::extract_allowed_edges).
//!
//! Every failure is logged. Acceptance degrades to rejection and data to an empty edge set.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::Cell;

use kurbo::Rect;
use understory_drop::data::DataMap;
use understory_drop::error::ZoneError;
use understory_drop::types::{DragPayload, DropEffect, Feedback, Input};
use understory_drop::zone::{DropZone, ZoneEventArgs};

use crate::context::{DestContext, PolicyContext};
use crate::edge::{Edges, attach_allowed_edges, attach_closest_edge};
use crate::error::PolicyError;
use crate::meta::DragMeta;
use crate::policy::{PolicyResolver, evaluate};

/// Arguments handed to an edge-data closure.
#[derive(Clone, Copy, Debug)]
pub struct EdgeDataArgs<'a, K> {
    /// The gated zone.
    pub node: K,
    /// Current pointer input.
    pub input: &'a Input,
    /// Edges the drop may use.
    pub allowed_edges: Edges,
    /// The drag.
    pub source: &'a DragPayload,
}

type DestBuilder<K> = Box<dyn Fn(K) -> Result<DestContext, PolicyError>>;
type EdgeDataFn<K> = Box<dyn Fn(&EdgeDataArgs<'_, K>) -> Result<DataMap, PolicyError>>;

/// A zone gated by source and destination policies.
pub struct PolicyZone<K> {
    kind: String,
    build_dest: DestBuilder<K>,
    edge_data: EdgeDataFn<K>,
    policies: Rc<dyn PolicyResolver>,
    inner: Option<Box<dyn DropZone<K>>>,
    allowed: Cell<Option<Edges>>,
    debug_log: bool,
}

impl<K> core::fmt::Debug for PolicyZone<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PolicyZone")
            .field("kind", &self.kind)
            .field("inner", &self.inner.is_some())
            .field("allowed", &self.allowed.get())
            .field("debug_log", &self.debug_log)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + core::fmt::Debug> PolicyZone<K> {
    /// Gate a zone of destination kind `kind`.
    ///
    /// `build_dest` snapshots the destination for a node; `edge_data` turns the allowed
    /// edges into the zone's data (see [`closest_edge_data`]).
    pub fn new(
        kind: impl Into<String>,
        build_dest: impl Fn(K) -> Result<DestContext, PolicyError> + 'static,
        edge_data: impl Fn(&EdgeDataArgs<'_, K>) -> Result<DataMap, PolicyError> + 'static,
        policies: Rc<dyn PolicyResolver>,
    ) -> Self {
        Self {
            kind: kind.into(),
            build_dest: Box::new(build_dest),
            edge_data: Box::new(edge_data),
            policies,
            inner: None,
            allowed: Cell::new(None),
            debug_log: false,
        }
    }

    /// Forward stickiness, effect, and event callbacks to `inner`.
    #[must_use]
    pub fn with_inner(mut self, inner: impl DropZone<K> + 'static) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }

    /// Log every acceptance decision at debug level.
    #[must_use]
    pub fn with_debug_log(mut self, enabled: bool) -> Self {
        self.debug_log = enabled;
        self
    }

    /// Destination kind of this gate.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Edges cached by the last evaluation, if any.
    pub fn allowed_edges(&self) -> Option<Edges> {
        self.allowed.get()
    }

    fn current_edges(&self, node: K) -> Edges {
        if let Some(edges) = self.allowed.get() {
            return edges;
        }
        let edges = match (self.build_dest)(node) {
            Ok(dest) => dest.candidates(),
            Err(err) => {
                log::error!("policy gate `{}`: {err}", self.kind);
                Edges::empty()
            }
        };
        self.allowed.set(Some(edges));
        edges
    }
}

impl<K: Copy + core::fmt::Debug> DropZone<K> for PolicyZone<K> {
    fn can_accept(&self, feedback: &Feedback<'_, K>) -> bool {
        let dest = match (self.build_dest)(feedback.node) {
            Ok(dest) => dest,
            Err(err) => {
                log::error!("policy gate `{}`: {err}", self.kind);
                return false;
            }
        };
        let meta = DragMeta::from_payload(feedback.payload);
        let ctx = PolicyContext::new(&meta, &dest);
        let decision = evaluate(self.policies.as_ref(), &self.kind, &ctx, dest.candidates());
        self.allowed.set(Some(decision.edges));

        if self.debug_log {
            log::debug!(
                "policy gate `{}` on {:?}: source `{}` {} / destination {} -> {} (candidates {:?}, edges {:?})",
                self.kind,
                feedback.node,
                meta.tag_name,
                decision.source_ok,
                decision.destination_ok,
                decision.accepted(),
                decision.candidates,
                decision.edges,
            );
        }
        decision.accepted()
    }

    fn is_sticky(&self, feedback: &Feedback<'_, K>) -> bool {
        self.inner.as_ref().is_some_and(|z| z.is_sticky(feedback))
    }

    fn data(&self, feedback: &Feedback<'_, K>) -> DataMap {
        let edges = self.current_edges(feedback.node);
        let args = EdgeDataArgs {
            node: feedback.node,
            input: feedback.input,
            allowed_edges: edges,
            source: feedback.payload,
        };
        match (self.edge_data)(&args) {
            Ok(mut data) => {
                attach_allowed_edges(&mut data, edges);
                data
            }
            Err(err) => {
                log::error!("policy gate `{}`: {err}", self.kind);
                let mut data = DataMap::new();
                attach_allowed_edges(&mut data, Edges::empty());
                data
            }
        }
    }

    fn effect(&self, feedback: &Feedback<'_, K>) -> Option<DropEffect> {
        self.inner.as_ref().and_then(|z| z.effect(feedback))
    }

    fn on_generate_drag_preview(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.inner
            .as_mut()
            .map_or(Ok(()), |z| z.on_generate_drag_preview(args))
    }

    fn on_drag_start(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.inner.as_mut().map_or(Ok(()), |z| z.on_drag_start(args))
    }

    fn on_drag(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.inner.as_mut().map_or(Ok(()), |z| z.on_drag(args))
    }

    fn on_drop_target_change(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.inner
            .as_mut()
            .map_or(Ok(()), |z| z.on_drop_target_change(args))
    }

    fn on_drag_enter(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.inner.as_mut().map_or(Ok(()), |z| z.on_drag_enter(args))
    }

    fn on_drag_leave(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.inner.as_mut().map_or(Ok(()), |z| z.on_drag_leave(args))
    }

    fn on_drop(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.inner.as_mut().map_or(Ok(()), |z| z.on_drop(args))
    }
}

/// Edge-data closure that records the allowed edge closest to the pointer.
///
/// `rect_of` returns the zone's bounds in the same space as [`Input::client`].
pub fn closest_edge_data<K: Copy>(
    rect_of: impl Fn(K) -> Option<Rect>,
) -> impl Fn(&EdgeDataArgs<'_, K>) -> Result<DataMap, PolicyError> {
    move |args| {
        let rect = rect_of(args.node)
            .ok_or_else(|| PolicyError::EdgeData(String::from("zone has no bounds")))?;
        let mut data = DataMap::new();
        attach_closest_edge(&mut data, &rect, args.input.client, args.allowed_edges);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DestinationCaps, Orientation};
    use crate::edge::{Edge, extract_allowed_edges, extract_closest_edge};
    use crate::policy::tests::{Dst, Policies, Src};
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use kurbo::Point;
    use understory_drop::engine::DropEngine;
    use understory_drop::hierarchy::ParentTable;
    use understory_drop::zone::{ZoneCallback, ZoneDescriptor};

    fn list(candidates: Option<Edges>) -> impl Fn(u32) -> Result<DestContext, PolicyError> {
        move |node| {
            let mut dest = DestContext::new(
                alloc::format!("list-{node}"),
                DestinationCaps {
                    level: 1,
                    caps: Vec::new(),
                    orientation: Orientation::Vertical,
                },
            );
            dest.edge_candidates = candidates;
            Ok(dest)
        }
    }

    fn bounds(_: u32) -> Option<Rect> {
        Some(Rect::new(0.0, 0.0, 100.0, 40.0))
    }

    fn card() -> DragPayload {
        DragPayload::new("element").with_data(DataMap::new().with("tagName", "Card"))
    }

    fn feedback<'a>(input: &'a Input, payload: &'a DragPayload) -> Feedback<'a, u32> {
        Feedback {
            input,
            payload,
            node: 1,
        }
    }

    #[test]
    fn disjoint_source_edges_fall_back_to_candidates() {
        let policies: Rc<dyn PolicyResolver> =
            Rc::new(Policies::default().source("Card", Src::accepting(Some(Edges::HORIZONTAL))));
        let gate = PolicyZone::new("List", list(None), closest_edge_data(bounds), policies);

        let input = Input::at(Point::new(50.0, 35.0));
        let payload = card();
        let fb = feedback(&input, &payload);
        assert!(gate.can_accept(&fb));
        let data = gate.data(&fb);
        assert_eq!(extract_allowed_edges(&data), Edges::VERTICAL);
        assert_eq!(extract_closest_edge(&data), Some(Edge::Bottom));
    }

    #[test]
    fn explicit_no_edge_yields_no_edge() {
        let policies: Rc<dyn PolicyResolver> =
            Rc::new(Policies::default().source("Card", Src::accepting(Some(Edges::all()))));
        let gate = PolicyZone::new(
            "List",
            list(Some(Edges::empty())),
            closest_edge_data(bounds),
            policies,
        );

        let input = Input::at(Point::new(50.0, 35.0));
        let payload = card();
        let fb = feedback(&input, &payload);
        assert!(gate.can_accept(&fb));
        let data = gate.data(&fb);
        assert!(extract_allowed_edges(&data).is_empty());
        assert_eq!(extract_closest_edge(&data), None);
    }

    #[test]
    fn data_without_prior_evaluation_uses_candidates() {
        let gate = PolicyZone::new(
            "List",
            list(None),
            closest_edge_data(bounds),
            Rc::new(Policies::default()),
        );
        assert_eq!(gate.allowed_edges(), None);
        let input = Input::at(Point::new(1.0, 1.0));
        let payload = card();
        let data = gate.data(&feedback(&input, &payload));
        assert_eq!(extract_allowed_edges(&data), Edges::VERTICAL);
        assert_eq!(gate.allowed_edges(), Some(Edges::VERTICAL));
    }

    #[test]
    fn failures_reject_or_empty_edges() {
        let failing_dest = |_: u32| -> Result<DestContext, PolicyError> {
            Err(PolicyError::Context("detached".into()))
        };
        let gate = PolicyZone::new(
            "List",
            failing_dest,
            closest_edge_data(bounds),
            Rc::new(Policies::default()),
        );
        let input = Input::default();
        let payload = card();
        let fb = feedback(&input, &payload);
        assert!(!gate.can_accept(&fb));
        assert!(extract_allowed_edges(&gate.data(&fb)).is_empty());

        let gate = PolicyZone::new(
            "List",
            list(None),
            closest_edge_data(|_: u32| None),
            Rc::new(Policies::default()),
        );
        assert!(gate.can_accept(&fb));
        assert!(extract_allowed_edges(&gate.data(&fb)).is_empty());
    }

    #[test]
    fn destination_refusal_blocks_resolution() {
        let policies: Rc<dyn PolicyResolver> = Rc::new(Policies::default().destination(
            "Board",
            Dst {
                accept: Ok(false),
                max_children: None,
            },
        ));
        let tree = ParentTable::new().with_chain(&[1_u32, 2]);
        let mut engine = DropEngine::new();
        engine.register(
            1,
            PolicyZone::new("Board", list(None), closest_edge_data(bounds), policies.clone()),
        );
        engine.register(
            2,
            PolicyZone::new("List", list(None), closest_edge_data(bounds), policies),
        );

        let payload = card().with_strategy(understory_drop::types::DropStrategy::BubbleToFirst);
        let stack = engine.resolve(&tree, &payload, Some(1), &Input::default(), &[]);
        assert_eq!(stack.nodes().copied().collect::<Vec<_>>(), [2]);
    }

    #[test]
    fn inner_zone_receives_callbacks() {
        let seen: Rc<RefCell<Vec<ZoneCallback>>> = Rc::default();
        let log = seen.clone();
        let inner = ZoneDescriptor::new()
            .with_sticky(|_| true)
            .on(ZoneCallback::DragEnter, move |_| {
                log.borrow_mut().push(ZoneCallback::DragEnter);
                Ok(())
            });
        let gate = PolicyZone::new(
            "List",
            list(None),
            closest_edge_data(bounds),
            Rc::new(Policies::default()),
        )
        .with_inner(inner)
        .with_debug_log(true);

        let tree = ParentTable::new().with_chain(&[1_u32]);
        let mut engine = DropEngine::new();
        engine.register(1, gate);
        engine.begin_drag(&tree, card(), None, Input::default());
        let frame = engine
            .update_drag(&tree, Some(1), Input::at(Point::new(50.0, 2.0)))
            .unwrap();
        assert!(frame.report.is_clean());
        assert_eq!(*seen.borrow(), [ZoneCallback::DragEnter]);

        let record = &engine.current_targets()[0];
        assert_eq!(extract_closest_edge(&record.data), Some(Edge::Top));

        // Sticky through the inner zone once the pointer leaves.
        engine.update_drag(&tree, None, Input::default()).unwrap();
        assert!(engine.current_targets()[0].active_due_to_stickiness);
    }
}
