// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: pointer input, drag payloads, strategies, and resolved records.
//!
//! ## Overview
//!
//! These types describe the inputs and outputs of a resolution step.
//! They are referenced by [`resolve`](crate::resolve), [`sticky`](crate::sticky), and
//! [`dispatch`](crate::dispatch), and handed to zone callbacks.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Deref;

use kurbo::Point;

use crate::data::{DataMap, DataValue};

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer update.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Alt / Option.
        const ALT   = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Meta / Command.
        const META  = 0b0000_0100;
        /// Shift.
        const SHIFT = 0b0000_1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

/// Pointer state for one drag update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Input {
    /// Position relative to the viewport.
    pub client: Point,
    /// Position relative to the document (includes scroll).
    pub page: Point,
    /// Pressed button, using DOM numbering (0 = primary).
    pub button: u8,
    /// Held modifier keys.
    pub modifiers: Modifiers,
}

impl Input {
    /// Input at a viewport position, with the page position equal to it.
    pub fn at(client: Point) -> Self {
        Self {
            client,
            page: client,
            ..Self::default()
        }
    }
}

/// Drop effect advertised by a zone.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum DropEffect {
    /// The dragged item would be copied.
    Copy,
    /// The dragged item would be linked.
    Link,
    /// The dragged item would be moved.
    #[default]
    Move,
}

/// How a rejecting zone affects the ancestor climb.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum DropStrategy {
    /// Only the innermost enclosing zone matters; a rejection ends resolution.
    #[default]
    TopmostOnly,
    /// A rejecting zone is skipped and the climb continues to the first accepting ancestor.
    BubbleToFirst,
    /// Every accepting ancestor is collected; rejecting zones are skipped.
    Nested,
}

impl DropStrategy {
    /// Parse the wire name (`"topmostOnly"`, `"bubbleToFirst"`, `"nested"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "topmostOnly" => Some(Self::TopmostOnly),
            "bubbleToFirst" => Some(Self::BubbleToFirst),
            "nested" => Some(Self::Nested),
            _ => None,
        }
    }

    /// The wire name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::TopmostOnly => "topmostOnly",
            Self::BubbleToFirst => "bubbleToFirst",
            Self::Nested => "nested",
        }
    }

    /// Whether a rejecting zone lets the climb continue to its ancestors.
    pub const fn climbs_past_rejection(self) -> bool {
        !matches!(self, Self::TopmostOnly)
    }

    /// Whether the climb continues after an accepting zone.
    pub const fn collects_ancestors(self) -> bool {
        matches!(self, Self::Nested)
    }
}

/// Conventional description of the node a drag started from.
///
/// Policy layers fall back to these fields when the payload data lacks them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceNode {
    /// Host identifier of the dragged node.
    pub id: String,
    /// Tag or kind of the dragged node.
    pub tag_name: String,
    /// Free-form attributes of the dragged node.
    pub attributes: DataMap,
}

/// The data carried by an in-progress drag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragPayload {
    /// Type tag of the drag (e.g. `"element"` or an application item kind).
    pub type_tag: String,
    /// Arbitrary drag data.
    pub data: DataMap,
    /// Explicit strategy; when absent, `data["dropStrategy"]` is consulted.
    pub strategy: Option<DropStrategy>,
    /// The node the drag started from, if known.
    pub source_node: Option<SourceNode>,
}

impl DragPayload {
    /// Key in [`DragPayload::data`] that may carry a strategy name (or a list of names).
    pub const STRATEGY_KEY: &'static str = "dropStrategy";

    /// Create a payload with the given type tag and no data.
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            ..Self::default()
        }
    }

    /// Builder-style data setter.
    #[must_use]
    pub fn with_data(mut self, data: DataMap) -> Self {
        self.data = data;
        self
    }

    /// Builder-style strategy setter.
    #[must_use]
    pub fn with_strategy(mut self, strategy: DropStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Builder-style source node setter.
    #[must_use]
    pub fn with_source_node(mut self, node: SourceNode) -> Self {
        self.source_node = Some(node);
        self
    }

    /// The strategy in effect for this drag.
    ///
    /// Explicit field first, then the data key as a name or a list of names (first
    /// recognized wins), then [`DropStrategy::TopmostOnly`].
    pub fn resolved_strategy(&self) -> DropStrategy {
        if let Some(s) = self.strategy {
            return s;
        }
        match self.data.get(Self::STRATEGY_KEY) {
            Some(DataValue::Str(name)) => DropStrategy::from_name(name).unwrap_or_default(),
            Some(DataValue::List(items)) => items
                .iter()
                .filter_map(DataValue::as_str)
                .find_map(DropStrategy::from_name)
                .unwrap_or_default(),
            _ => DropStrategy::TopmostOnly,
        }
    }
}

/// Arguments handed to zone predicates and producers.
///
/// Built fresh for every evaluation; never stored.
#[derive(Clone, Copy, Debug)]
pub struct Feedback<'a, K> {
    /// Current pointer input.
    pub input: &'a Input,
    /// The drag being resolved.
    pub payload: &'a DragPayload,
    /// The zone being evaluated.
    pub node: K,
}

/// Resolution output for one zone.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRecord<K> {
    /// The zone's node.
    pub node: K,
    /// Data produced by the zone (borrowed from the previous frame when sticky).
    pub data: DataMap,
    /// Drop effect of the zone.
    pub effect: DropEffect,
    /// True when the zone is only active because it was carried forward by stickiness.
    pub active_due_to_stickiness: bool,
}

/// Resolved zones, innermost first.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStack<K> {
    records: Vec<ResolvedRecord<K>>,
}

impl<K> Default for ResolvedStack<K> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<K> ResolvedStack<K> {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap records that are already innermost first.
    pub fn from_records(records: Vec<ResolvedRecord<K>>) -> Self {
        Self { records }
    }

    /// The records, innermost first.
    pub fn records(&self) -> &[ResolvedRecord<K>] {
        &self.records
    }

    /// Unwrap into the records, innermost first.
    pub fn into_records(self) -> Vec<ResolvedRecord<K>> {
        self.records
    }

    /// The innermost record.
    pub fn innermost(&self) -> Option<&ResolvedRecord<K>> {
        self.records.first()
    }

    pub(crate) fn push(&mut self, record: ResolvedRecord<K>) {
        self.records.push(record);
    }
}

impl<K: PartialEq> ResolvedStack<K> {
    /// Returns true if `node` is in the stack.
    pub fn contains(&self, node: &K) -> bool {
        self.records.iter().any(|r| r.node == *node)
    }

    /// Iterate the nodes, innermost first.
    pub fn nodes(&self) -> impl Iterator<Item = &K> + '_ {
        self.records.iter().map(|r| &r.node)
    }

    /// Returns true if both stacks name the same zones in the same order with the same
    /// stickiness. Data and effects are not compared.
    pub fn same_targets(&self, other: &Self) -> bool {
        self.records.len() == other.records.len()
            && self.records.iter().zip(&other.records).all(|(a, b)| {
                a.node == b.node && a.active_due_to_stickiness == b.active_due_to_stickiness
            })
    }
}

impl<K> Deref for ResolvedStack<K> {
    type Target = [ResolvedRecord<K>];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl<K> From<Vec<ResolvedRecord<K>>> for ResolvedStack<K> {
    fn from(records: Vec<ResolvedRecord<K>>) -> Self {
        Self { records }
    }
}

impl<'a, K> IntoIterator for &'a ResolvedStack<K> {
    type Item = &'a ResolvedRecord<K>;
    type IntoIter = core::slice::Iter<'a, ResolvedRecord<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Pointer input together with the zones it resolved to.
#[derive(Clone, Debug, PartialEq)]
pub struct DragLocation<K> {
    /// Pointer input of the update.
    pub input: Input,
    /// Resolved zones, innermost first.
    pub drop_targets: ResolvedStack<K>,
}

/// Locations of a drag: where it started, the previous frame, and the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DragLocationHistory<K> {
    /// Location when the drag started.
    pub initial: DragLocation<K>,
    /// Location before the latest change of drop targets.
    pub previous: DragLocation<K>,
    /// Latest location.
    pub current: DragLocation<K>,
}

impl<K: Clone> DragLocationHistory<K> {
    /// A history where all three locations equal `location`.
    pub fn starting_at(location: DragLocation<K>) -> Self {
        Self {
            initial: location.clone(),
            previous: location.clone(),
            current: location,
        }
    }
}
