// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zone registry: an arena of zones addressed by generational handles.
//!
//! ## Semantics
//!
//! - [`ZoneRegistry::register`] stores a zone for a node and returns a [`ZoneHandle`].
//! - Registering the same node again replaces the entry (last registration wins). The old
//!   slot is freed, so the old handle becomes stale and unregistering it is a no-op.
//! - [`ZoneRegistry::unregister`] is idempotent.
//! - Registration order carries no meaning; result order comes from the hierarchy.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::zone::DropZone;

/// Handle returned by registration.
///
/// A slot index plus a generation. The generation increments when a slot is reused, so a
/// stale handle never refers to a newer registration.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ZoneHandle(u32, u32);

impl ZoneHandle {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

struct Slot<K> {
    generation: u32,
    node: K,
    zone: Box<dyn DropZone<K>>,
}

/// Registry of zones keyed by node.
pub struct ZoneRegistry<K> {
    slots: Vec<Option<Slot<K>>>,
    generations: Vec<u32>, // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    by_node: HashMap<K, ZoneHandle>,
}

impl<K> core::fmt::Debug for ZoneRegistry<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.slots.len();
        let alive = self.slots.iter().filter(|s| s.is_some()).count();
        f.debug_struct("ZoneRegistry")
            .field("slots_total", &total)
            .field("slots_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<K> Default for ZoneRegistry<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            by_node: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> ZoneRegistry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `zone` for `node`, replacing any previous registration of that node.
    pub fn register(&mut self, node: K, zone: Box<dyn DropZone<K>>) -> ZoneHandle {
        if let Some(old) = self.by_node.get(&node).copied() {
            self.free(old);
        }
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(Slot {
                generation,
                node,
                zone,
            });
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ZoneHandle uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(Slot {
                generation,
                node,
                zone,
            }));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ZoneHandle uses 32-bit indices by design."
            )]
            ((self.slots.len() - 1) as u32, generation)
        };
        let handle = ZoneHandle::new(idx, generation);
        self.by_node.insert(node, handle);
        handle
    }

    /// Remove the registration behind `handle`.
    ///
    /// Returns false if the handle is stale (already unregistered or replaced).
    pub fn unregister(&mut self, handle: ZoneHandle) -> bool {
        if !self.is_alive(handle) {
            log::trace!("unregister: stale zone handle {handle:?}");
            return false;
        }
        let Some(slot) = self.free(handle) else {
            return false;
        };
        // Only drop the node mapping if it still points at this registration.
        if self.by_node.get(&slot.node) == Some(&handle) {
            self.by_node.remove(&slot.node);
        }
        true
    }

    /// Returns true if `handle` refers to a live registration.
    pub fn is_alive(&self, handle: ZoneHandle) -> bool {
        self.slots
            .get(handle.idx())
            .and_then(|s| s.as_ref())
            .is_some_and(|s| s.generation == handle.1)
    }

    /// The current handle for `node`.
    pub fn handle_of(&self, node: &K) -> Option<ZoneHandle> {
        self.by_node.get(node).copied()
    }

    /// Returns true if `node` has a zone.
    pub fn contains(&self, node: &K) -> bool {
        self.by_node.contains_key(node)
    }

    /// The zone registered for `node`.
    pub fn lookup(&self, node: &K) -> Option<&dyn DropZone<K>> {
        let handle = self.handle_of(node)?;
        let slot = self.slots.get(handle.idx())?.as_ref()?;
        Some(slot.zone.as_ref())
    }

    /// Mutable access to the zone registered for `node`.
    pub fn lookup_mut(&mut self, node: &K) -> Option<&mut dyn DropZone<K>> {
        let handle = self.handle_of(node)?;
        let slot = self.slots.get_mut(handle.idx())?.as_mut()?;
        let zone: &mut dyn DropZone<K> = slot.zone.as_mut();
        Some(zone)
    }

    /// Number of registered zones.
    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    /// Returns true if no zones are registered.
    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }

    fn free(&mut self, handle: ZoneHandle) -> Option<Slot<K>> {
        let slot = self.slots.get_mut(handle.idx())?;
        if slot.as_ref().is_none_or(|s| s.generation != handle.1) {
            return None;
        }
        self.free_list.push(handle.idx());
        slot.take()
    }
}
