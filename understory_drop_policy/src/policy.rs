// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Policy capabilities and the host-injected resolver.
//!
//! ## Overview
//!
//! - A [`SourcePolicy`] speaks for a kind of dragged item: may it go to this destination,
//!   which edges does it prefer, may it start dragging at all.
//! - A [`DestinationPolicy`] speaks for a kind of destination: does it accept this item, and
//!   is a concrete drop valid.
//! - A [`PolicyResolver`] is implemented by the host and maps tags and destination kinds to
//!   policies. This crate never keeps its own table.
//!
//! A missing policy accepts.

use alloc::string::ToString;

use understory_drop::types::Input;

use crate::context::{PolicyContext, ProposedPlacement};
use crate::edge::{Edge, Edges};
use crate::error::{DropRejection, PolicyError};
use crate::meta::DragMeta;

/// Arguments for [`SourcePolicy::can_start`].
#[derive(Clone, Copy, Debug)]
pub struct CanStartArgs<'a> {
    /// The item about to be dragged.
    pub drag_meta: &'a DragMeta,
    /// Pointer input that started the drag.
    pub input: &'a Input,
}

/// Policy of a dragged item kind.
pub trait SourcePolicy {
    /// Whether the item may be dropped into the destination in `ctx`.
    fn can_drop(&self, ctx: &PolicyContext<'_>) -> Result<bool, PolicyError>;

    /// Edges the item prefers; `None` expresses no preference.
    fn allowed_edges(&self, _ctx: &PolicyContext<'_>) -> Result<Option<Edges>, PolicyError> {
        Ok(None)
    }

    /// Whether a drag of this item may start.
    fn can_start(&self, _args: &CanStartArgs<'_>) -> bool {
        true
    }
}

/// Policy of a destination kind.
pub trait DestinationPolicy {
    /// Whether the destination accepts the item in `ctx`.
    fn can_accept(&self, ctx: &PolicyContext<'_>) -> Result<bool, PolicyError>;

    /// Final validation when the item is dropped.
    fn validate_drop(
        &self,
        _ctx: &PolicyContext<'_>,
        _placement: &ProposedPlacement,
    ) -> Result<(), DropRejection> {
        Ok(())
    }
}

/// Host-implemented lookup of policies.
pub trait PolicyResolver {
    /// Policy for dragged items tagged `tag`.
    fn source_policy(&self, tag: &str) -> Option<&dyn SourcePolicy>;

    /// Policy for destinations of kind `kind`.
    fn destination_policy(&self, kind: &str) -> Option<&dyn DestinationPolicy>;
}

/// Outcome of evaluating both sides for one destination.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Decision {
    /// Source side verdict (true when no source policy exists).
    pub source_ok: bool,
    /// Destination side verdict (true when no destination policy exists).
    pub destination_ok: bool,
    /// Edge candidates of the destination.
    pub candidates: Edges,
    /// Edges the drop may use.
    pub edges: Edges,
}

impl Decision {
    /// True when both sides accept.
    pub fn accepted(&self) -> bool {
        self.source_ok && self.destination_ok
    }
}

/// Combine destination candidates with the source's preference.
///
/// - No candidates: no edge, whatever the source says.
/// - No preference: all candidates.
/// - Otherwise the intersection, or all candidates when it is empty.
pub fn resolve_edges(candidates: Edges, preferred: Option<Edges>) -> Edges {
    if candidates.is_empty() {
        return Edges::empty();
    }
    match preferred {
        Some(preferred) if preferred.intersects(candidates) => preferred & candidates,
        _ => candidates,
    }
}

/// Evaluate the policies of both sides for `ctx`.
///
/// Policy errors are logged and count as rejection; a failing edge preference falls back
/// to the destination candidates.
pub fn evaluate(
    resolver: &dyn PolicyResolver,
    kind: &str,
    ctx: &PolicyContext<'_>,
    candidates: Edges,
) -> Decision {
    let tag = ctx.drag_meta.tag_name.as_str();
    let source = resolver.source_policy(tag);
    let destination = resolver.destination_policy(kind);

    let source_ok = source.is_none_or(|p| {
        p.can_drop(ctx).unwrap_or_else(|err| {
            log::error!("policy: source `{tag}` can_drop failed: {err}");
            false
        })
    });
    let destination_ok = destination.is_none_or(|p| {
        p.can_accept(ctx).unwrap_or_else(|err| {
            log::error!("policy: destination `{kind}` can_accept failed: {err}");
            false
        })
    });
    let preferred = match source.map(|p| p.allowed_edges(ctx)) {
        Some(Ok(preferred)) => preferred,
        Some(Err(err)) => {
            log::error!("policy: source `{tag}` allowed_edges failed: {err}");
            None
        }
        None => None,
    };

    Decision {
        source_ok,
        destination_ok,
        candidates,
        edges: resolve_edges(candidates, preferred),
    }
}

/// Gate a drag start: the local override first, then the source policy.
pub fn can_start_drag(
    resolver: &dyn PolicyResolver,
    args: &CanStartArgs<'_>,
    local_override: Option<&dyn Fn(&CanStartArgs<'_>) -> bool>,
) -> bool {
    if local_override.is_some_and(|f| !f(args)) {
        return false;
    }
    resolver
        .source_policy(&args.drag_meta.tag_name)
        .is_none_or(|p| p.can_start(args))
}

/// Re-check both sides at drop time and propose where the item lands.
pub fn check_drop(
    resolver: &dyn PolicyResolver,
    kind: &str,
    ctx: &PolicyContext<'_>,
    edge: Option<Edge>,
) -> Result<ProposedPlacement, DropRejection> {
    let tag = ctx.drag_meta.tag_name.as_str();
    let source = resolver.source_policy(tag);
    let destination = resolver.destination_policy(kind);

    if let Some(policy) = source {
        match policy.can_drop(ctx) {
            Ok(true) => {}
            Ok(false) => {
                return Err(DropRejection::new(
                    "source-refused",
                    alloc::format!("`{tag}` cannot be dropped into `{}`", ctx.dest_id),
                ));
            }
            Err(err) => return Err(DropRejection::new("policy-error", err.to_string())),
        }
    }
    if let Some(policy) = destination {
        match policy.can_accept(ctx) {
            Ok(true) => {}
            Ok(false) => {
                return Err(DropRejection::new(
                    "destination-refused",
                    alloc::format!("`{kind}` does not accept `{tag}`"),
                ));
            }
            Err(err) => return Err(DropRejection::new("policy-error", err.to_string())),
        }
    }

    let placement = ProposedPlacement::propose(ctx, edge);
    if let Some(policy) = destination {
        policy.validate_drop(ctx, &placement)?;
    }
    Ok(placement)
}
