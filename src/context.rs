//! Mutable state threaded through one region run.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{GenerationError, Result};
use crate::locations::GridPosition;

/// Hands out even location ids. Each id reserves itself and its odd successor,
/// and ids only ever grow.
#[derive(Clone, Debug)]
pub struct LocationIdAllocator {
    used: BTreeSet<u16>,
    next: u32,
}

impl LocationIdAllocator {
    pub fn new(first: u16) -> Self {
        Self {
            used: BTreeSet::new(),
            next: first as u32 + (first as u32 & 1),
        }
    }

    /// Start after ids that already exist elsewhere in the world.
    pub fn with_existing(first: u16, existing: impl IntoIterator<Item = u16>) -> Self {
        let mut allocator = Self::new(first);
        allocator.used.extend(existing);
        allocator
    }

    pub fn is_used(&self, id: u16) -> bool {
        self.used.contains(&id)
    }

    pub fn allocate(&mut self) -> Result<u16> {
        let mut id = self.next;
        while id + 1 <= u16::MAX as u32 {
            let (even, odd) = (id as u16, (id + 1) as u16);
            if !self.used.contains(&even) && !self.used.contains(&odd) {
                self.used.insert(even);
                self.used.insert(odd);
                self.next = id + 2;
                return Ok(even);
            }
            id += 2;
        }
        Err(GenerationError::IdSpaceExhausted)
    }
}

/// RNG stream, id allocator and per-region name/position sets for one run.
#[derive(Clone, Debug)]
pub struct GenerationContext {
    pub rng: ChaCha8Rng,
    pub ids: LocationIdAllocator,
    /// Names already taken in the region.
    pub names: BTreeSet<String>,
    /// Positions already taken in the region.
    pub positions: BTreeSet<GridPosition>,
}

impl GenerationContext {
    pub fn new(seed: u64, first_location_id: u16) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed), LocationIdAllocator::new(first_location_id))
    }

    pub fn from_rng(rng: ChaCha8Rng, ids: LocationIdAllocator) -> Self {
        Self {
            rng,
            ids,
            names: BTreeSet::new(),
            positions: BTreeSet::new(),
        }
    }

    /// Move to the next region: keep the allocator, take a fresh stream and
    /// empty per-region sets.
    pub fn next_region(self, rng: ChaCha8Rng) -> Self {
        Self::from_rng(rng, self.ids)
    }
}
