//! Exterior block selection
//!
//! Fills a settlement grid with RMB block names: wall ring, palace, filler
//! cells, then weighted random prefixes subject to per-town limits on rare
//! and uncommon blocks.

use std::collections::BTreeMap;

use rand::Rng;

use super::normalize::normalize_town_blocks;
use super::walls::calculate_wall_positions;
use super::SettlementSize;
use crate::catalog::{count_variants, BlockCatalog, RmbName};
use crate::config::SettlementConfig;
use crate::error::Result;
use crate::locations::{Building, ExteriorLayout, LocationType};
use crate::region::Climate;

/// Guild halls that appear at most once (twice in large cities).
const RARE_PREFIXES: &[&str] = &["MAGE", "FIGH", "THIE", "DARK", "KNIG"];
const UNCOMMON_PREFIXES: &[&str] = &["BANK", "GRVE", "MARK", "TEMP"];

const CITY_PREFIXES: &[&str] = &[
    "ALCH", "ARMR", "BANK", "BOOK", "CLOT", "DARK", "FIGH", "FURN", "GEMS", "GENR", "GRVE", "KNIG",
    "LIBR", "MAGE", "MARK", "PAWN", "RESI", "RESI", "RESI", "RESI", "TEMP", "THIE", "TVRN", "TVRN",
    "WEAP",
];
const HAMLET_PREFIXES: &[&str] = &[
    "ALCH", "ARMR", "BANK", "BOOK", "CLOT", "DARK", "FIGH", "GENR", "GRVE", "KNIG", "MAGE", "MARK",
    "PAWN", "RESI", "RESI", "RESI", "RESI", "TEMP", "THIE", "TVRN", "WEAP",
];
const VILLAGE_PREFIXES: &[&str] = &[
    "ALCH", "ARMR", "BOOK", "CLOT", "GENR", "PAWN", "RESI", "RESI", "RESI", "RESI", "TVRN", "WEAP",
];

const FALLBACK_PREFIX: &str = "RESI";

/// Everything needed to lay out a town's exterior.
#[derive(Clone, Debug)]
pub struct ExteriorRequest {
    pub location_type: LocationType,
    pub size: SettlementSize,
    pub climate: Climate,
    pub capital: bool,
    pub walled: bool,
    pub port: bool,
}

/// Climate letter of a settlement's block set, rolled once per settlement.
pub fn climate_letter<R: Rng + ?Sized>(climate: Climate, rng: &mut R) -> char {
    if climate.is_arid() {
        if rng.gen_bool(0.5) {
            'B'
        } else {
            'G'
        }
    } else {
        'A'
    }
}

pub fn size_letter(location_type: LocationType) -> char {
    match location_type {
        LocationType::City => 'L',
        LocationType::Hamlet => 'M',
        LocationType::Village => 'S',
        _ => 'A',
    }
}

fn prefixes_for(location_type: LocationType) -> &'static [&'static str] {
    match location_type {
        LocationType::City => CITY_PREFIXES,
        LocationType::Hamlet => HAMLET_PREFIXES,
        _ => VILLAGE_PREFIXES,
    }
}

/// Prefix of the single exterior block of a non-town location.
pub fn single_block_prefix(location_type: LocationType) -> &'static str {
    match location_type {
        LocationType::Farm => "FARM",
        LocationType::WealthyHome => "MANR",
        LocationType::PoorHome => "RESI",
        LocationType::Tavern => "TVRN",
        LocationType::Temple => "TEMP",
        LocationType::Cult => "SHRI",
        LocationType::Graveyard => "GRVE",
        LocationType::DungeonKeep => "CAST",
        _ => "DUNG",
    }
}

/// Whether another block with `prefix` may go into this settlement.
pub fn check_block_compatibility(
    prefix: &str,
    location_type: LocationType,
    area: u32,
    placed: &BTreeMap<&str, u32>,
) -> bool {
    let used = placed.get(prefix).copied().unwrap_or(0);
    let limit = if RARE_PREFIXES.contains(&prefix) {
        match location_type {
            LocationType::City if area >= 25 => 2,
            LocationType::City | LocationType::Hamlet => 1,
            _ => 0,
        }
    } else if UNCOMMON_PREFIXES.contains(&prefix) {
        match location_type {
            LocationType::City => 2,
            LocationType::Hamlet => 1,
            _ => 0,
        }
    } else {
        return true;
    };
    used < limit
}

/// Random free cell index, restricted to the wall interior when `inner`.
fn random_free_cell<R: Rng + ?Sized>(
    grid: &[Option<String>],
    width: u8,
    height: u8,
    inner: bool,
    rng: &mut R,
) -> Option<usize> {
    let free: Vec<usize> = (0..grid.len())
        .filter(|&i| grid[i].is_none())
        .filter(|&i| {
            if !inner {
                return true;
            }
            let (x, y) = (i % width as usize, i / width as usize);
            x > 0 && y > 0 && x + 1 < width as usize && y + 1 < height as usize
        })
        .collect();
    if free.is_empty() {
        None
    } else {
        Some(free[rng.gen_range(0..free.len())])
    }
}

fn pick_variant<R: Rng + ?Sized>(
    catalog: &dyn BlockCatalog,
    prefix: &str,
    climate: char,
    size: char,
    max_variant: u32,
    rng: &mut R,
) -> u32 {
    match count_variants(catalog, prefix, climate, size, max_variant) {
        0 => 1,
        n => rng.gen_range(1..=n),
    }
}

/// Reserve palace and filler cells.
pub fn determine_special_blocks<R: Rng + ?Sized>(
    grid: &mut [Option<String>],
    request: &ExteriorRequest,
    has_wall: bool,
    palace: bool,
    climate: char,
    catalog: &dyn BlockCatalog,
    config: &SettlementConfig,
    rng: &mut R,
) -> bool {
    let (width, height) = (request.size.width, request.size.height);
    let mut palace_placed = false;
    if palace {
        if let Some(cell) = random_free_cell(grid, width, height, has_wall, rng) {
            let variant = pick_variant(catalog, "PALA", climate, 'A', config.max_variant, rng);
            grid[cell] = Some(RmbName::new("PALA", climate, 'A', variant).to_string());
            palace_placed = true;
        }
    }

    for _ in 0..request.size.shape.filler_cells() {
        let Some(cell) = random_free_cell(grid, width, height, false, rng) else {
            break;
        };
        let variant = pick_variant(catalog, "FILL", climate, 'A', config.max_variant, rng);
        grid[cell] = Some(RmbName::new("FILL", climate, 'A', variant).to_string());
    }
    palace_placed
}

/// Convert a block template into placed buildings.
fn buildings_for<R: Rng + ?Sized>(
    name: &str,
    catalog: &dyn BlockCatalog,
    rng: &mut R,
) -> Result<Vec<Building>> {
    let template = catalog.load(name)?;
    Ok(template
        .buildings
        .into_iter()
        .map(|b| Building {
            name_seed: rng.gen(),
            faction_id: b.faction_id,
            sector: b.sector,
            building_type: b.building_type,
            quality: rng.gen_range(1..=20),
        })
        .collect())
}

/// Lay out a city, hamlet or village exterior.
pub fn build_town_exterior<R: Rng + ?Sized>(
    request: &ExteriorRequest,
    catalog: &dyn BlockCatalog,
    config: &SettlementConfig,
    rng: &mut R,
) -> Result<ExteriorLayout> {
    let size = request.size;
    let (width, height) = (size.width, size.height);
    let cells = width as usize * height as usize;
    let climate = climate_letter(request.climate, rng);
    let size_code = size_letter(request.location_type);
    let mut grid: Vec<Option<String>> = vec![None; cells];

    let wall = if request.walled {
        calculate_wall_positions(width, height, rng)
    } else {
        Vec::new()
    };
    for piece in &wall {
        let index = piece.y as usize * width as usize + piece.x as usize;
        grid[index] = Some(piece.kind.block_name());
    }
    let has_wall = !wall.is_empty();

    let palace = request.location_type == LocationType::City
        && (request.capital || {
            let bonus = if has_wall { config.walled_palace_bonus } else { 0 };
            let odds = size.area() * config.palace_area_factor + bonus;
            rng.gen_range(1..=100) <= odds
        });
    let palace = determine_special_blocks(
        &mut grid, request, has_wall, palace, climate, catalog, config, rng,
    );

    let prefixes = prefixes_for(request.location_type);
    let mut placed: BTreeMap<&str, u32> = BTreeMap::new();
    let mut blocks = Vec::with_capacity(cells);
    for cell in grid {
        if let Some(name) = cell {
            blocks.push(name);
            continue;
        }
        let mut prefix = FALLBACK_PREFIX;
        for _ in 0..config.selection_attempts {
            let candidate = prefixes[rng.gen_range(0..prefixes.len())];
            if check_block_compatibility(candidate, request.location_type, size.area(), &placed) {
                prefix = candidate;
                break;
            }
        }
        *placed.entry(prefix).or_insert(0) += 1;
        let variant = pick_variant(catalog, prefix, climate, size_code, config.max_variant, rng);
        blocks.push(RmbName::new(prefix, climate, size_code, variant).to_string());
    }

    normalize_town_blocks(&mut blocks, catalog, config.max_variant, rng)?;
    let buildings = blocks
        .iter()
        .map(|name| buildings_for(name, catalog, rng))
        .collect::<Result<Vec<_>>>()?;

    Ok(ExteriorLayout {
        width,
        height,
        shape: size.shape,
        blocks,
        buildings,
        port: request.port,
        walled: has_wall,
        palace,
    })
}

/// Single exterior block for dwellings, shrines, taverns, graveyards and
/// dungeon entrances.
pub fn build_single_exterior<R: Rng + ?Sized>(
    location_type: LocationType,
    climate: Climate,
    catalog: &dyn BlockCatalog,
    config: &SettlementConfig,
    rng: &mut R,
) -> Result<ExteriorLayout> {
    let letter = climate_letter(climate, rng);
    let prefix = single_block_prefix(location_type);
    let variant = pick_variant(catalog, prefix, letter, 'A', config.max_variant, rng);
    let mut blocks = vec![RmbName::new(prefix, letter, 'A', variant).to_string()];
    normalize_town_blocks(&mut blocks, catalog, config.max_variant, rng)?;
    let buildings = vec![buildings_for(&blocks[0], catalog, rng)?];

    Ok(ExteriorLayout {
        width: 1,
        height: 1,
        shape: super::TownShape::Regular,
        blocks,
        buildings,
        port: false,
        walled: false,
        palace: false,
    })
}
