// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drop --heading-base-level=0

//! Understory Drop: deterministic drop-target resolution for UI drag and drop.
//!
//! ## Overview
//!
//! Hosts register drop zones over their node hierarchy. On every drag update the engine
//! works out which zones the drag is over, keeps zones that opt into stickiness from
//! flickering away, and turns the difference between two frames into ordered
//! enter/leave/change notifications.
//!
//! This crate does not perform geometric hit testing. Feed it the topmost node under the
//! pointer (from a box tree, a platform hit test, or similar) and a [`Hierarchy`] to climb.
//!
//! ## Pipeline
//!
//! 1) Registry: [`ZoneRegistry`] maps node keys to zones through generational handles.
//! 2) Resolve: [`resolve_actual`] climbs from the target, innermost first, according to the
//!    payload's [`DropStrategy`]:
//!    - [`TopmostOnly`]: the innermost zone decides; a rejection ends resolution.
//!    - [`BubbleToFirst`]: rejecting zones are skipped until an ancestor accepts.
//!    - [`Nested`]: every accepting ancestor is collected.
//! 3) Reconcile: [`reconcile`] re-admits sticky zones from the previous frame when the new
//!    stack shrank, reusing their previous data.
//! 4) Dispatch: [`dispatch`] delivers change, leave and enter callbacks, or forwards other
//!    events to the current targets. Callback failures are isolated per zone.
//!
//! [`DropEngine`] bundles the registry with a drag session and runs the pipeline for each
//! frame.
//!
//! ## Example
//!
//! ```
//! use understory_drop::engine::DropEngine;
//! use understory_drop::hierarchy::ParentTable;
//! use understory_drop::types::{DragPayload, DropStrategy, Input};
//! use understory_drop::zone::{ZoneCallback, ZoneDescriptor};
//!
//! // 1 (a card) sits in 2 (a list) inside 3 (the board).
//! let tree = ParentTable::new().with_chain(&[1_u32, 2, 3]);
//!
//! let mut engine = DropEngine::new();
//! engine.register(1, ZoneDescriptor::new().with_can_accept(|fb| fb.payload.type_tag == "file"));
//! engine.register(2, ZoneDescriptor::new().with_sticky(|_| true));
//!
//! let payload = DragPayload::new("card").with_strategy(DropStrategy::BubbleToFirst);
//! let report = engine.begin_drag(&tree, payload, Some(1), Input::default());
//! assert_eq!(report.invocations[1], (2, ZoneCallback::DragStart));
//!
//! // The pointer leaves everything; the sticky list stays active.
//! let frame = engine.update_drag(&tree, None, Input::default()).unwrap();
//! assert!(frame.changed);
//! assert!(engine.current_targets()[0].active_due_to_stickiness);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. The default `std` feature additionally
//! isolates panicking zone callbacks.
//!
//! [`Hierarchy`]: crate::hierarchy::Hierarchy
//! [`ZoneRegistry`]: crate::registry::ZoneRegistry
//! [`resolve_actual`]: crate::resolve::resolve_actual
//! [`DropStrategy`]: crate::types::DropStrategy
//! [`TopmostOnly`]: crate::types::DropStrategy::TopmostOnly
//! [`BubbleToFirst`]: crate::types::DropStrategy::BubbleToFirst
//! [`Nested`]: crate::types::DropStrategy::Nested
//! [`reconcile`]: crate::sticky::reconcile
//! [`dispatch`]: crate::dispatch::dispatch
//! [`DropEngine`]: crate::engine::DropEngine

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod data;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod registry;
pub mod resolve;
pub mod sticky;
pub mod types;
pub mod zone;
