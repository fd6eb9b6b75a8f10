// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drop_policy --heading-base-level=0

//! Understory Drop Policy: let drag sources and destinations veto drops and pick insertion edges.
//!
//! ## Overview
//!
//! [`PolicyZone`](crate::gate::PolicyZone) is a drop zone for `understory_drop` whose
//! acceptance and data come from pluggable policies:
//!
//! - a [`SourcePolicy`](crate::policy::SourcePolicy) per dragged item tag;
//! - a [`DestinationPolicy`](crate::policy::DestinationPolicy) per destination kind;
//! - both looked up through a host-implemented
//!   [`PolicyResolver`](crate::policy::PolicyResolver).
//!
//! The gate is invisible to resolution, reconciliation, and dispatch: it is just another
//! zone.
//!
//! ## Edges
//!
//! Destinations declare edge candidates ([`DestContext::edge_candidates`]): explicit, or
//! inferred from the container's orientation. Sources may prefer some edges. The gate
//! intersects the two, falls back to the candidates when the intersection is empty, and
//! never produces an edge for a destination that declared none.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use understory_drop::engine::DropEngine;
//! use understory_drop::hierarchy::ParentTable;
//! use understory_drop::types::{DragPayload, Input};
//! use understory_drop_policy::context::{DestContext, DestinationCaps, Orientation, PolicyContext};
//! use understory_drop_policy::edge::{Edge, extract_closest_edge};
//! use understory_drop_policy::error::PolicyError;
//! use understory_drop_policy::gate::{PolicyZone, closest_edge_data};
//! use understory_drop_policy::policy::{DestinationPolicy, PolicyResolver, SourcePolicy};
//! use kurbo::{Point, Rect};
//!
//! // Lists only take cards.
//! struct CardsOnly;
//! impl DestinationPolicy for CardsOnly {
//!     fn can_accept(&self, ctx: &PolicyContext<'_>) -> Result<bool, PolicyError> {
//!         Ok(ctx.drag_meta.tag_name == "Card")
//!     }
//! }
//!
//! struct Policies(CardsOnly);
//! impl PolicyResolver for Policies {
//!     fn source_policy(&self, _tag: &str) -> Option<&dyn SourcePolicy> { None }
//!     fn destination_policy(&self, kind: &str) -> Option<&dyn DestinationPolicy> {
//!         (kind == "List").then_some(&self.0 as &dyn DestinationPolicy)
//!     }
//! }
//!
//! let policies: Rc<dyn PolicyResolver> = Rc::new(Policies(CardsOnly));
//! let list = PolicyZone::new(
//!     "List",
//!     |_node: u32| {
//!         Ok(DestContext::new(
//!             "list",
//!             DestinationCaps { level: 1, caps: vec![], orientation: Orientation::Vertical },
//!         ))
//!     },
//!     closest_edge_data(|_node: u32| Some(Rect::new(0.0, 0.0, 200.0, 100.0))),
//!     policies,
//! );
//!
//! let tree = ParentTable::new().with_chain(&[1_u32]);
//! let mut engine = DropEngine::new();
//! engine.register(1, list);
//!
//! let input = Input::at(Point::new(20.0, 90.0));
//! let card = DragPayload::new("Card");
//! let stack = engine.resolve(&tree, &card, Some(1), &input, &[]);
//! assert_eq!(extract_closest_edge(&stack[0].data), Some(Edge::Bottom));
//!
//! let file = DragPayload::new("File");
//! assert!(engine.resolve(&tree, &file, Some(1), &input, &[]).is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.
//!
//! [`DestContext::edge_candidates`]: crate::context::DestContext::edge_candidates

#![no_std]

extern crate alloc;

pub mod context;
pub mod edge;
pub mod error;
pub mod gate;
pub mod meta;
pub mod policy;
