//! Shared map storage for concurrent callers.
//!
//! Each named grid lives in a [`MapStore`]. Callers never compute under the
//! lock:
//!
//! ```text
//! checkout() ──► owned copy ──► queries / cache writes ──► commit()
//!    (read lock, clone)            (no lock held)         (write lock, merge)
//! ```
//!
//! Only [`MapStore::publish`] starts a new generation. Within a generation,
//! cache cells only go from invalid to valid, so commits from concurrent
//! checkouts are merged instead of dropped. A checkout taken before a
//! publish is stale and its commit is rejected.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use log::debug;
use parking_lot::RwLock;

use crate::grid::GridMap;

/// Atomic wrapper for f32 values.
/// Uses AtomicU32 with bit reinterpretation.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(val: f32) -> Self {
        Self(AtomicU32::new(val.to_bits()))
    }

    pub fn load(&self, order: Ordering) -> f32 {
        f32::from_bits(self.0.load(order))
    }

    pub fn store(&self, val: f32, order: Ordering) {
        self.0.store(val.to_bits(), order);
    }
}

#[derive(Debug)]
struct Slot {
    map: Arc<GridMap>,
    /// Bumped by every publish
    generation: u64,
    /// Bumped by every publish and commit
    revision: u64,
}

/// One shared grid with snapshot-copy-swap access.
#[derive(Debug)]
pub struct MapStore {
    name: &'static str,
    slot: RwLock<Slot>,
}

/// Owned working copy of a stored map.
///
/// Derefs to [`GridMap`]; hand it back with [`MapStore::commit`] to publish
/// the edits, or drop it to discard them.
#[derive(Clone, Debug)]
pub struct Checkout {
    map: GridMap,
    generation: u64,
    revision: u64,
}

impl Checkout {
    /// Generation of the store when the copy was taken.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn into_inner(self) -> GridMap {
        self.map
    }
}

impl Deref for Checkout {
    type Target = GridMap;

    fn deref(&self) -> &GridMap {
        &self.map
    }
}

impl DerefMut for Checkout {
    fn deref_mut(&mut self) -> &mut GridMap {
        &mut self.map
    }
}

impl MapStore {
    pub fn new(name: &'static str) -> Self {
        Self::with_map(name, GridMap::default())
    }

    pub fn with_map(name: &'static str, map: GridMap) -> Self {
        Self {
            name,
            slot: RwLock::new(Slot {
                map: Arc::new(map),
                generation: 0,
                revision: 0,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of publishes so far.
    pub fn generation(&self) -> u64 {
        self.slot.read().generation
    }

    /// Number of publishes and accepted commits so far.
    pub fn revision(&self) -> u64 {
        self.slot.read().revision
    }

    /// Shared read-only view of the current map.
    pub fn snapshot(&self) -> Arc<GridMap> {
        Arc::clone(&self.slot.read().map)
    }

    /// Copy the current map for lock-free work.
    pub fn checkout(&self) -> Checkout {
        let slot = self.slot.read();
        Checkout {
            map: GridMap::clone(&slot.map),
            generation: slot.generation,
            revision: slot.revision,
        }
    }

    /// Commit the cache cells filled in a checked-out copy.
    ///
    /// Returns `false` (and drops the copy) when a new map was published
    /// after the checkout.
    pub fn commit(&self, checkout: Checkout) -> bool {
        self.commit_layers(checkout, &[])
    }

    /// Commit a checked-out copy whose `replaced` layers were rewritten.
    ///
    /// Replaced layers overwrite the stored ones; every other layer only
    /// fills cells that are still invalid in the store. Returns `false` when
    /// a new map was published after the checkout.
    pub fn commit_layers(&self, checkout: Checkout, replaced: &[&str]) -> bool {
        let mut slot = self.slot.write();
        if slot.generation != checkout.generation {
            debug!(
                "[{}] Dropping stale commit (generation {} < {})",
                self.name, checkout.generation, slot.generation
            );
            return false;
        }
        if slot.revision == checkout.revision {
            slot.map = Arc::new(checkout.map);
        } else {
            merge_into(Arc::make_mut(&mut slot.map), &checkout.map, replaced);
        }
        slot.revision += 1;
        true
    }

    /// Replace the map unconditionally, returning the new generation.
    pub fn publish(&self, map: GridMap) -> u64 {
        let mut slot = self.slot.write();
        slot.map = Arc::new(map);
        slot.generation += 1;
        slot.revision += 1;
        slot.generation
    }
}

/// Merge the layers of `source` into `target` of the same generation.
fn merge_into(target: &mut GridMap, source: &GridMap, replaced: &[&str]) {
    for name in source.layer_names() {
        let Some(values) = source.layer(name) else {
            continue;
        };
        let overwrite = replaced.contains(&name) || !target.has_layer(name);
        target.ensure_layer(name);
        let Some(stored) = target.layer_mut(name) else {
            continue;
        };
        for (stored, &value) in stored.iter_mut().zip(values) {
            if overwrite || (stored.is_nan() && !value.is_nan()) {
                *stored = value;
            }
        }
    }
}
