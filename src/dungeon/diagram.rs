//! Dungeon interior diagrams
//!
//! A diagram is a connected polyomino of blocks grown by random walk inside a
//! 5×5 frame, plus border cells completing its outline.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::DungeonConfig;
use crate::error::{GenerationError, Result};
use crate::locations::LocationType;

/// Blocks live in `-FRAME..=FRAME` on both axes.
pub const FRAME: i32 = 2;

/// Side of the working grid scanned for border cells.
const BORDER_GRID: i32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalCell {
    pub x: i32,
    pub z: i32,
}

impl LocalCell {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    fn neighbors(&self) -> [LocalCell; 4] {
        [
            LocalCell::new(self.x, self.z - 1),
            LocalCell::new(self.x + 1, self.z),
            LocalCell::new(self.x, self.z + 1),
            LocalCell::new(self.x - 1, self.z),
        ]
    }

    fn in_frame(&self) -> bool {
        (-FRAME..=FRAME).contains(&self.x) && (-FRAME..=FRAME).contains(&self.z)
    }

    pub fn distance_squared(&self, other: &LocalCell) -> i32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonDiagram {
    /// Interior cells in growth order.
    pub cells: Vec<LocalCell>,
    /// Border cells in scan order.
    pub borders: Vec<LocalCell>,
}

/// Number of interior blocks for a dungeon-bearing location type.
pub fn block_count<R: Rng + ?Sized>(location_type: LocationType, rng: &mut R) -> usize {
    match location_type {
        LocationType::DungeonRuin | LocationType::Coven => match rng.gen_range(1..=100) {
            1..=10 => 1,
            11..=40 => 2,
            41..=70 => 3,
            _ => 4,
        },
        LocationType::DungeonKeep => {
            let roll: usize = rng.gen_range(1..=100);
            (roll - 1) / 25 + 5
        }
        LocationType::DungeonLabyrinth => match rng.gen_range(1..=100) {
            1..=15 => 9,
            16..=30 => 10,
            31..=45 => 11,
            46..=60 => 12,
            61..=72 => 13,
            73..=84 => 14,
            85..=94 => 15,
            _ => 16,
        },
        _ => 1,
    }
}

/// Grow a diagram of exactly `count` blocks and complete its border.
pub fn generate_diagram<R: Rng + ?Sized>(
    count: usize,
    config: &DungeonConfig,
    rng: &mut R,
) -> Result<DungeonDiagram> {
    if count == 0 {
        return Ok(DungeonDiagram { cells: Vec::new(), borders: Vec::new() });
    }

    let first = LocalCell::new(rng.gen_range(-1..=1), rng.gen_range(-1..=1));
    let mut cells = vec![first];
    let mut occupied: BTreeSet<LocalCell> = BTreeSet::from([first]);

    let mut attempts = 0;
    while cells.len() < count {
        if attempts >= config.max_growth_attempts || !has_free_neighbor(&cells, &occupied) {
            return Err(GenerationError::DiagramDeadlock { planned: count, placed: cells.len() });
        }
        attempts += 1;

        let base = cells[rng.gen_range(0..cells.len())];
        let free: Vec<LocalCell> = base
            .neighbors()
            .into_iter()
            .filter(|c| c.in_frame() && !occupied.contains(c))
            .collect();
        if free.is_empty() {
            continue;
        }
        let next = free[rng.gen_range(0..free.len())];
        occupied.insert(next);
        cells.push(next);
    }

    let borders = border_cells(&occupied);
    Ok(DungeonDiagram { cells, borders })
}

fn has_free_neighbor(cells: &[LocalCell], occupied: &BTreeSet<LocalCell>) -> bool {
    cells
        .iter()
        .flat_map(|c| c.neighbors())
        .any(|n| n.in_frame() && !occupied.contains(&n))
}

/// Empty cells of the working grid 4-adjacent to an occupied cell.
///
/// The grid maps to local `-2..=3`, so a diagram touching `-2` gets no border
/// on that side. The four grid corners never hold a border.
fn border_cells(occupied: &BTreeSet<LocalCell>) -> Vec<LocalCell> {
    let last = BORDER_GRID - 1;
    let mut borders = Vec::new();
    for gz in 0..BORDER_GRID {
        for gx in 0..BORDER_GRID {
            if (gx == 0 || gx == last) && (gz == 0 || gz == last) {
                continue;
            }
            let cell = LocalCell::new(gx - FRAME, gz - FRAME);
            if occupied.contains(&cell) {
                continue;
            }
            if cell.neighbors().iter().any(|n| occupied.contains(n)) {
                borders.push(cell);
            }
        }
    }
    borders
}
