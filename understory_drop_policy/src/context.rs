// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Destination snapshots, the read-only policy context, and placement proposals.

use alloc::string::String;
use alloc::vec::Vec;

use crate::edge::{Edge, Edges};
use crate::meta::DragMeta;

/// Main axis of a destination container.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Orientation {
    /// Children flow left to right.
    #[default]
    Horizontal,
    /// Children flow top to bottom.
    Vertical,
}

impl Orientation {
    /// Edge candidates inferred for this axis.
    pub const fn edges(self) -> Edges {
        match self {
            Self::Horizontal => Edges::HORIZONTAL,
            Self::Vertical => Edges::VERTICAL,
        }
    }

    /// The edge that inserts before an anchor on this axis.
    pub const fn leading_edge(self) -> Edge {
        match self {
            Self::Horizontal => Edge::Left,
            Self::Vertical => Edge::Top,
        }
    }

    /// The edge that inserts after an anchor on this axis.
    pub const fn trailing_edge(self) -> Edge {
        match self {
            Self::Horizontal => Edge::Right,
            Self::Vertical => Edge::Bottom,
        }
    }
}

/// Declared capabilities of a destination.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DestinationCaps {
    /// Logical level of the destination.
    pub level: i64,
    /// Free-form capability flags, in declaration order.
    pub caps: Vec<String>,
    /// Main axis.
    pub orientation: Orientation,
}

impl DestinationCaps {
    /// Returns true if `cap` is declared.
    pub fn has_cap(&self, cap: &str) -> bool {
        self.caps.iter().any(|c| c == cap)
    }
}

/// Current children of a destination, in paint order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChildOrdering {
    /// Child ids.
    pub ids: Vec<String>,
    /// Tag of each child (same length and order as `ids`).
    pub tag_names: Vec<String>,
}

impl ChildOrdering {
    /// Number of children.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if there are no children.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Index of the child with `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|c| c == id)
    }

    /// Returns true if some child has tag `tag`.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tag_names.iter().any(|t| t == tag)
    }
}

/// Destination snapshot built by the host for each evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DestContext {
    /// Id of the destination container.
    pub dest_id: String,
    /// Declared capabilities.
    pub caps: DestinationCaps,
    /// Current children.
    pub children: ChildOrdering,
    /// Insertion index relative to `children`, if known.
    pub target_index: Option<usize>,
    /// Edge candidates: `None` infers from the orientation, `Some(Edges::empty())` means
    /// the destination never produces an edge.
    pub edge_candidates: Option<Edges>,
}

impl DestContext {
    /// A destination with no children and inferred edge candidates.
    pub fn new(dest_id: impl Into<String>, caps: DestinationCaps) -> Self {
        Self {
            dest_id: dest_id.into(),
            caps,
            ..Self::default()
        }
    }

    /// Builder-style children setter.
    #[must_use]
    pub fn with_children(mut self, children: ChildOrdering) -> Self {
        self.children = children;
        self
    }

    /// Builder-style target index setter.
    #[must_use]
    pub fn with_target_index(mut self, index: usize) -> Self {
        self.target_index = Some(index);
        self
    }

    /// Builder-style explicit edge candidates.
    #[must_use]
    pub fn with_edge_candidates(mut self, edges: Edges) -> Self {
        self.edge_candidates = Some(edges);
        self
    }

    /// Effective candidates: explicit ones, or the orientation's pair.
    pub fn candidates(&self) -> Edges {
        self.edge_candidates
            .unwrap_or_else(|| self.caps.orientation.edges())
    }
}

/// Read-only snapshot handed to policies.
#[derive(Clone, Copy, Debug)]
pub struct PolicyContext<'a> {
    /// The dragged item.
    pub drag_meta: &'a DragMeta,
    /// Id of the destination container.
    pub dest_id: &'a str,
    /// Destination capabilities.
    pub dest_caps: &'a DestinationCaps,
    /// Destination children.
    pub children: &'a ChildOrdering,
    /// Precomputed insertion index, if any.
    pub target_index: Option<usize>,
}

impl<'a> PolicyContext<'a> {
    /// Context for `drag_meta` over `dest`.
    pub fn new(drag_meta: &'a DragMeta, dest: &'a DestContext) -> Self {
        Self {
            drag_meta,
            dest_id: &dest.dest_id,
            dest_caps: &dest.caps,
            children: &dest.children,
            target_index: dest.target_index,
        }
    }
}

/// Where a drop would land.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposedPlacement {
    /// The destination container.
    pub parent_id: String,
    /// Child the item is placed next to; `None` for an empty container.
    pub anchor_id: Option<String>,
    /// Side of the anchor.
    pub edge: Edge,
}

impl ProposedPlacement {
    /// Propose a placement for `ctx`, using `edge` when one was resolved.
    ///
    /// - Empty container: no anchor, the axis' leading edge.
    /// - `requires_first_index`: before the first child.
    /// - Otherwise the anchor is the child at `target_index` (clamped), or the last child
    ///   when no index is known. Without an explicit edge the item goes before an indexed
    ///   anchor and after the last child.
    pub fn propose(ctx: &PolicyContext<'_>, edge: Option<Edge>) -> Self {
        let orientation = ctx.dest_caps.orientation;
        let ids = &ctx.children.ids;
        let parent_id = String::from(ctx.dest_id);

        let Some(last) = ids.len().checked_sub(1) else {
            return Self {
                parent_id,
                anchor_id: None,
                edge: edge.unwrap_or(orientation.leading_edge()),
            };
        };

        if ctx.drag_meta.requires_first_index {
            return Self {
                parent_id,
                anchor_id: Some(ids[0].clone()),
                edge: orientation.leading_edge(),
            };
        }

        let (index, default_edge) = match ctx.target_index {
            Some(i) if i <= last => (i, orientation.leading_edge()),
            _ => (last, orientation.trailing_edge()),
        };
        Self {
            parent_id,
            anchor_id: Some(ids[index].clone()),
            edge: edge.unwrap_or(default_edge),
        }
    }

    /// Index among `children` at which the item would be inserted.
    pub fn insertion_index(&self, children: &ChildOrdering) -> usize {
        self.anchor_id
            .as_deref()
            .and_then(|a| children.position(a))
            .map_or(0, |i| if self.edge.is_leading() { i } else { i + 1 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn children(ids: &[&str]) -> ChildOrdering {
        ChildOrdering {
            ids: ids.iter().map(|s| String::from(*s)).collect(),
            tag_names: ids.iter().map(|_| String::from("Card")).collect(),
        }
    }

    fn vertical(id: &str) -> DestContext {
        DestContext::new(
            id,
            DestinationCaps {
                level: 1,
                caps: vec!["List".into()],
                orientation: Orientation::Vertical,
            },
        )
    }

    #[test]
    fn candidates_tri_state() {
        let dest = vertical("list");
        assert_eq!(dest.candidates(), Edges::VERTICAL);
        let dest = vertical("list").with_edge_candidates(Edges::LEFT);
        assert_eq!(dest.candidates(), Edges::LEFT);
        let dest = vertical("list").with_edge_candidates(Edges::empty());
        assert!(dest.candidates().is_empty());
        assert_eq!(DestContext::default().candidates(), Edges::HORIZONTAL);
    }

    #[test]
    fn empty_container_has_no_anchor() {
        let meta = DragMeta::default();
        let dest = vertical("list");
        let p = ProposedPlacement::propose(&PolicyContext::new(&meta, &dest), None);
        assert_eq!(p.anchor_id, None);
        assert_eq!(p.edge, Edge::Top);
        assert_eq!(p.parent_id, "list");
        assert_eq!(p.insertion_index(&dest.children), 0);
    }

    #[test]
    fn anchor_follows_target_index() {
        let meta = DragMeta::default();
        let dest = vertical("list")
            .with_children(children(&["a", "b", "c"]))
            .with_target_index(1);
        let p = ProposedPlacement::propose(&PolicyContext::new(&meta, &dest), None);
        assert_eq!(p.anchor_id.as_deref(), Some("b"));
        assert_eq!(p.edge, Edge::Top);
        assert_eq!(p.insertion_index(&dest.children), 1);

        let p = ProposedPlacement::propose(&PolicyContext::new(&meta, &dest), Some(Edge::Bottom));
        assert_eq!(p.insertion_index(&dest.children), 2);
    }

    #[test]
    fn out_of_range_or_missing_index_appends() {
        let meta = DragMeta::default();
        let dest = vertical("list")
            .with_children(children(&["a", "b"]))
            .with_target_index(9);
        let p = ProposedPlacement::propose(&PolicyContext::new(&meta, &dest), None);
        assert_eq!(p.anchor_id.as_deref(), Some("b"));
        assert_eq!(p.edge, Edge::Bottom);
        assert_eq!(p.insertion_index(&dest.children), 2);
    }

    #[test]
    fn requires_first_index_pins_to_front() {
        let meta = DragMeta {
            requires_first_index: true,
            ..DragMeta::default()
        };
        let dest = vertical("list")
            .with_children(children(&["a", "b"]))
            .with_target_index(1);
        let p = ProposedPlacement::propose(&PolicyContext::new(&meta, &dest), Some(Edge::Bottom));
        assert_eq!(p.anchor_id.as_deref(), Some("a"));
        assert_eq!(p.insertion_index(&dest.children), 0);
    }
}
