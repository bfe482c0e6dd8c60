//! Location record assembly and the per-region output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::LocationIdAllocator;
use crate::error::{GenerationError, Result};
use crate::locations::{
    DungeonLayout, DungeonType, ExteriorLayout, GridPosition, LocationRecord, LocationType,
};
use crate::placement::Shortfall;
use crate::region::RegionMap;

/// Map columns; map ids are `y * MAP_COLUMNS + x`.
pub const MAP_COLUMNS: usize = 1000;
/// Map rows; latitude counts up from the bottom row.
pub const MAP_ROWS: usize = 500;
/// World units per map pixel.
const PIXEL_UNITS: i32 = 128;
/// World units per exterior block.
const BLOCK_UNITS: i32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCoordinates {
    pub map_id: u64,
    pub latitude: i32,
    pub longitude: i32,
}

/// Reject maps whose pixels would not get unique map ids and positive
/// latitudes.
pub fn check_map_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 || width > MAP_COLUMNS || height > MAP_ROWS {
        return Err(GenerationError::config(format!(
            "map is {}x{}, must be between 1x1 and {}x{}",
            width, height, MAP_COLUMNS, MAP_ROWS
        )));
    }
    Ok(())
}

/// Map id and world coordinates of a location centred in its pixel.
pub fn derive_coordinates(position: GridPosition, footprint: (u8, u8)) -> MapCoordinates {
    let (width, height) = (footprint.0 as i32, footprint.1 as i32);
    let row_from_bottom = MAP_ROWS as i32 - 1 - position.y;
    MapCoordinates {
        map_id: position.y as u64 * MAP_COLUMNS as u64 + position.x as u64,
        longitude: position.x * PIXEL_UNITS + (PIXEL_UNITS - width * BLOCK_UNITS) / 2,
        latitude: row_from_bottom * PIXEL_UNITS + (PIXEL_UNITS - height * BLOCK_UNITS) / 2,
    }
}

/// Generated pieces of a location, ready for assembly.
#[derive(Clone, Debug)]
pub struct LocationParts {
    pub location_type: LocationType,
    pub dungeon_type: DungeonType,
    pub position: GridPosition,
    pub name: String,
    pub exterior: Option<ExteriorLayout>,
    pub dungeon: Option<DungeonLayout>,
    pub capital: bool,
    pub region_index: i32,
}

/// Stamp ids, coordinates and map lookups onto a location.
pub fn assemble<M: RegionMap + ?Sized>(
    parts: LocationParts,
    ids: &mut LocationIdAllocator,
    map: &M,
) -> Result<LocationRecord> {
    let footprint = parts
        .exterior
        .as_ref()
        .map(|e| (e.width, e.height))
        .unwrap_or((1, 1));
    let coords = derive_coordinates(parts.position, footprint);
    let location_id = ids.allocate()?;

    Ok(LocationRecord {
        location_type: parts.location_type,
        dungeon_type: parts.dungeon_type,
        position: parts.position,
        map_id: coords.map_id,
        latitude: coords.latitude,
        longitude: coords.longitude,
        location_id,
        name: parts.name,
        exterior: parts.exterior,
        dungeon: parts.dungeon,
        climate: map.climate_at(parts.position.x, parts.position.y),
        politics: map.region_index_at(parts.position.x, parts.position.y),
        region_index: parts.region_index,
        capital: parts.capital,
        index: 0,
    })
}

/// Sort a region's records by map id and renumber them.
pub fn finalize_region(records: &mut [LocationRecord]) {
    records.sort_by_key(|r| r.map_id);
    for (index, record) in records.iter_mut().enumerate() {
        record.index = index;
    }
}

/// A location dropped under the skip-and-report policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLocation {
    pub location_type: LocationType,
    pub position: GridPosition,
    pub reason: String,
}

/// What was asked for and what came out of one region run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub planned: BTreeMap<LocationType, u32>,
    pub placed: BTreeMap<LocationType, u32>,
    pub shortfalls: Vec<Shortfall>,
    pub skipped: Vec<SkippedLocation>,
}

impl GenerationReport {
    pub fn generated(&self) -> u32 {
        self.placed.values().sum::<u32>().saturating_sub(self.skipped.len() as u32)
    }
}

/// Final output for one region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionLayout {
    pub region_index: i32,
    pub region_name: String,
    pub records: Vec<LocationRecord>,
    /// Location name to location id.
    pub names: BTreeMap<String, u16>,
    /// Location id to record index.
    pub ids: BTreeMap<u16, usize>,
    pub report: GenerationReport,
}

impl RegionLayout {
    /// Finalize records and build the lookup tables.
    pub fn new(
        region_index: i32,
        region_name: String,
        mut records: Vec<LocationRecord>,
        report: GenerationReport,
    ) -> Self {
        finalize_region(&mut records);
        let names = records.iter().map(|r| (r.name.clone(), r.location_id)).collect();
        let ids = records.iter().map(|r| (r.location_id, r.index)).collect();
        Self {
            region_index,
            region_name,
            records,
            names,
            ids,
            report,
        }
    }

    pub fn by_name(&self, name: &str) -> Option<&LocationRecord> {
        let id = self.names.get(name)?;
        self.records.get(*self.ids.get(id)?)
    }
}
