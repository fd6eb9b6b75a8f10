// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host hierarchy access: parent lookup, structural nodes, and ancestor iteration.
//!
//! The resolver never walks the host tree directly. It asks a [`Hierarchy`] for parents,
//! skips non-structural nodes (for example text runs under the pointer), and climbs with
//! [`Ancestors`].

use core::hash::Hash;

use hashbrown::{HashMap, HashSet};

/// Read access to the host's tree.
pub trait Hierarchy<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;

    /// Returns false for nodes that cannot host a zone (e.g. text nodes).
    ///
    /// Hit-test targets are normalized to their nearest structural ancestor.
    fn is_structural(&self, _node: &K) -> bool {
        true
    }

    /// Returns true if the host itself marks `node` as a drop zone.
    ///
    /// Lets the resolver notice a marked node with no registry entry (a desync between the
    /// host structure and the registry).
    fn marks_zone(&self, _node: &K) -> bool {
        false
    }
}

impl<K, H: Hierarchy<K> + ?Sized> Hierarchy<K> for &H {
    fn parent_of(&self, node: &K) -> Option<K> {
        (**self).parent_of(node)
    }

    fn is_structural(&self, node: &K) -> bool {
        (**self).is_structural(node)
    }

    fn marks_zone(&self, node: &K) -> bool {
        (**self).marks_zone(node)
    }
}

/// Iterator over a node and its ancestors, innermost first.
///
/// The hierarchy must be acyclic.
pub struct Ancestors<'h, K, H: ?Sized> {
    hierarchy: &'h H,
    next: Option<K>,
}

impl<K: core::fmt::Debug, H: ?Sized> core::fmt::Debug for Ancestors<'_, K, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ancestors")
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}

impl<'h, K, H: Hierarchy<K> + ?Sized> Ancestors<'h, K, H> {
    /// Start at `start` (inclusive). `None` yields nothing.
    pub fn new(hierarchy: &'h H, start: Option<K>) -> Self {
        Self {
            hierarchy,
            next: start,
        }
    }
}

impl<K, H: Hierarchy<K> + ?Sized> Iterator for Ancestors<'_, K, H> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let current = self.next.take()?;
        self.next = self.hierarchy.parent_of(&current);
        Some(current)
    }
}

/// Walk up from `target` to the nearest structural node (inclusive).
pub fn structural_start<K, H: Hierarchy<K> + ?Sized>(
    hierarchy: &H,
    target: Option<K>,
) -> Option<K> {
    Ancestors::new(hierarchy, target).find(|n| hierarchy.is_structural(n))
}

/// A [`Hierarchy`] backed by a child → parent table.
///
/// Nodes without an entry are roots. Useful for tests, demos, and hosts that mirror
/// their tree into a flat table.
#[derive(Clone, Debug)]
pub struct ParentTable<K> {
    parents: HashMap<K, K>,
    non_structural: HashSet<K>,
    marked: HashSet<K>,
}

impl<K> Default for ParentTable<K> {
    fn default() -> Self {
        Self {
            parents: HashMap::new(),
            non_structural: HashSet::new(),
            marked: HashSet::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> ParentTable<K> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parent of `child`, returning the previous parent.
    pub fn set_parent(&mut self, child: K, parent: K) -> Option<K> {
        self.parents.insert(child, parent)
    }

    /// Builder-style chain: `nodes[0]` is the innermost, each following node the parent
    /// of the one before.
    #[must_use]
    pub fn with_chain(mut self, nodes: &[K]) -> Self {
        for pair in nodes.windows(2) {
            self.set_parent(pair[0], pair[1]);
        }
        self
    }

    /// Detach `node` from its parent, making it a root.
    pub fn detach(&mut self, node: &K) -> Option<K> {
        self.parents.remove(node)
    }

    /// Mark `node` as non-structural (or structural again).
    pub fn set_structural(&mut self, node: K, structural: bool) {
        if structural {
            self.non_structural.remove(&node);
        } else {
            self.non_structural.insert(node);
        }
    }

    /// Set or clear the host-side zone marker of `node`.
    pub fn set_marked(&mut self, node: K, marked: bool) {
        if marked {
            self.marked.insert(node);
        } else {
            self.marked.remove(&node);
        }
    }
}

impl<K: Copy + Eq + Hash> Hierarchy<K> for ParentTable<K> {
    fn parent_of(&self, node: &K) -> Option<K> {
        self.parents.get(node).copied()
    }

    fn is_structural(&self, node: &K) -> bool {
        !self.non_structural.contains(node)
    }

    fn marks_zone(&self, node: &K) -> bool {
        self.marked.contains(node)
    }
}
