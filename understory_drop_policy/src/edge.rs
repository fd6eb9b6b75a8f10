// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion edges and the closest-edge helper.
//!
//! Edges are stored in a zone's [`DataMap`] under reserved keys, so caller data can never
//! overwrite them:
//!
//! - [`attach_closest_edge`] / [`extract_closest_edge`] for the edge nearest the pointer;
//! - [`attach_allowed_edges`] / [`extract_allowed_edges`] for the edges a gate permits.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};
use understory_drop::data::{DataMap, DataValue, ReservedKey};

/// A single insertion side.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Edge {
    /// Above the anchor.
    Top,
    /// After the anchor on the horizontal axis.
    Right,
    /// Below the anchor.
    Bottom,
    /// Before the anchor on the horizontal axis.
    Left,
}

impl Edge {
    /// All edges, in tie-break order.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Wire name (`"top"`, `"right"`, `"bottom"`, `"left"`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    /// Parse a wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }

    /// The matching single-bit [`Edges`] value.
    pub const fn flag(self) -> Edges {
        match self {
            Self::Top => Edges::TOP,
            Self::Right => Edges::RIGHT,
            Self::Bottom => Edges::BOTTOM,
            Self::Left => Edges::LEFT,
        }
    }

    /// Returns true for edges that insert before the anchor.
    pub const fn is_leading(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }

    fn distance(self, rect: &Rect, point: Point) -> f64 {
        let d = match self {
            Self::Top => point.y - rect.y0,
            Self::Right => rect.x1 - point.x,
            Self::Bottom => rect.y1 - point.y,
            Self::Left => point.x - rect.x0,
        };
        d.abs()
    }
}

impl core::fmt::Display for Edge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// A set of insertion edges.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Edges: u8 {
        /// See [`Edge::Top`].
        const TOP    = 0b0001;
        /// See [`Edge::Right`].
        const RIGHT  = 0b0010;
        /// See [`Edge::Bottom`].
        const BOTTOM = 0b0100;
        /// See [`Edge::Left`].
        const LEFT   = 0b1000;
        /// Top and bottom, for vertical containers.
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
        /// Left and right, for horizontal containers.
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl Edges {
    /// The edges in the set, in [`Edge::ALL`] order.
    pub fn edges(self) -> impl Iterator<Item = Edge> {
        Edge::ALL.into_iter().filter(move |e| self.contains(e.flag()))
    }
}

impl From<Edge> for Edges {
    fn from(edge: Edge) -> Self {
        edge.flag()
    }
}

impl FromIterator<Edge> for Edges {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |acc, e| acc | e.flag())
    }
}

/// Reserved slot holding the edge closest to the pointer.
pub const CLOSEST_EDGE_KEY: ReservedKey = ReservedKey::new("understory_drop_policy::closest_edge");

/// Reserved slot holding the edges a gate allows.
pub const ALLOWED_EDGES_KEY: ReservedKey =
    ReservedKey::new("understory_drop_policy::allowed_edges");

/// The allowed edge of `rect` nearest to `point`.
///
/// Ties go to the first edge in [`Edge::ALL`] order. Returns `None` if `allowed` is empty.
pub fn closest_edge(rect: &Rect, point: Point, allowed: Edges) -> Option<Edge> {
    let mut best: Option<(Edge, f64)> = None;
    for edge in allowed.edges() {
        let d = edge.distance(rect, point);
        if best.is_none_or(|(_, b)| d < b) {
            best = Some((edge, d));
        }
    }
    best.map(|(edge, _)| edge)
}

/// Store the allowed edge closest to `point` in `data` (or null when none is allowed).
pub fn attach_closest_edge(data: &mut DataMap, rect: &Rect, point: Point, allowed: Edges) {
    let edge = closest_edge(rect, point, allowed);
    data.insert_reserved(CLOSEST_EDGE_KEY, edge.map(Edge::name));
}

/// Read the edge stored by [`attach_closest_edge`].
pub fn extract_closest_edge(data: &DataMap) -> Option<Edge> {
    data.get_reserved(CLOSEST_EDGE_KEY)
        .and_then(DataValue::as_str)
        .and_then(Edge::from_name)
}

/// Store `edges` in the allowed-edges slot of `data`.
pub fn attach_allowed_edges(data: &mut DataMap, edges: Edges) {
    let names: Vec<&str> = edges.edges().map(Edge::name).collect();
    data.insert_reserved(ALLOWED_EDGES_KEY, names);
}

/// Read the edges stored by [`attach_allowed_edges`]. Missing means none.
pub fn extract_allowed_edges(data: &DataMap) -> Edges {
    data.get_reserved(ALLOWED_EDGES_KEY)
        .and_then(DataValue::as_list)
        .map(|items| {
            items
                .iter()
                .filter_map(DataValue::as_str)
                .filter_map(Edge::from_name)
                .collect()
        })
        .unwrap_or_default()
}
