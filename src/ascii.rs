//! ASCII rendering of generated regions
//!
//! Renders the region map with a glyph per location on top of a terrain
//! background, plus a legend and a plain-text world file.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};

use crate::assembly::RegionLayout;
use crate::locations::{GridPosition, LocationType};
use crate::region::{Climate, RegionMap};

/// Get ASCII character for a location type
pub fn location_char(location_type: LocationType) -> char {
    match location_type {
        // Settlements
        LocationType::City => '@',
        LocationType::Hamlet => 'H',
        LocationType::Village => 'v',

        // Dwellings
        LocationType::Farm => 'f',
        LocationType::WealthyHome => 'M',
        LocationType::PoorHome => 'h',

        // Religion and inns
        LocationType::Tavern => 'T',
        LocationType::Temple => '+',
        LocationType::Cult => 's',
        LocationType::Coven => 'c',

        // Dungeons
        LocationType::Graveyard => 'g',
        LocationType::DungeonRuin => 'r',
        LocationType::DungeonKeep => 'K',
        LocationType::DungeonLabyrinth => 'L',

        LocationType::YourShips | LocationType::None => '?',
    }
}

/// Get background character for terrain
pub fn terrain_char(climate: Climate, water: bool) -> char {
    if water {
        return '~';
    }
    match climate {
        Climate::Ocean => '~',
        Climate::Desert | Climate::Desert2 => ':',
        Climate::Mountain => '^',
        Climate::MountainWoods => 'n',
        Climate::Rainforest | Climate::Subtropical => ';',
        Climate::Swamp => '%',
        Climate::Woodlands => '.',
        Climate::HauntedWoodlands => ',',
    }
}

/// Render the map with location glyphs. `min_terrain_height` separates
/// water from land.
pub fn render_locations<M: RegionMap + ?Sized>(
    map: &M,
    layouts: &[RegionLayout],
    min_terrain_height: u8,
) -> String {
    let (width, height) = map.dimensions();
    let glyphs: BTreeMap<GridPosition, char> = layouts
        .iter()
        .flat_map(|layout| layout.records.iter())
        .map(|record| (record.position, location_char(record.location_type)))
        .collect();

    let mut result = String::with_capacity((width + 1) * height);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let ch = match glyphs.get(&GridPosition::new(x, y)) {
                Some(&glyph) => glyph,
                None => {
                    let water = map.terrain_height(x, y) < min_terrain_height;
                    terrain_char(map.climate_at(x, y), water)
                }
            };
            result.push(ch);
        }
        result.push('\n');
    }
    result
}

/// Generate legend for location characters
pub fn location_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== LOCATION LEGEND ===\n");
    for &location_type in LocationType::all() {
        if location_type.is_sentinel() {
            continue;
        }
        let glyph = location_char(location_type);
        legend.push_str(&format!("  {} {}\n", glyph, location_type.display_name()));
    }
    legend.push_str("TERRAIN:\n");
    legend.push_str("  ~ Water   : Desert   ^ Mountain   n Mountain Woods\n");
    legend.push_str("  ; Tropic  % Swamp    . Woodlands  , Haunted Woodlands\n");
    legend
}

/// Per-type location counts across all regions.
pub fn location_stats(layouts: &[RegionLayout]) -> BTreeMap<LocationType, usize> {
    let mut stats = BTreeMap::new();
    for record in layouts.iter().flat_map(|l| l.records.iter()) {
        *stats.entry(record.location_type).or_insert(0) += 1;
    }
    stats
}

/// Export the map, legend and per-region listings to a text file
pub fn export_world_file<M: RegionMap + ?Sized>(
    map: &M,
    layouts: &[RegionLayout],
    min_terrain_height: u8,
    seed: u64,
    path: &str,
) -> io::Result<()> {
    let mut file = File::create(path)?;
    let (width, height) = map.dimensions();

    // Header
    writeln!(file, "=== LOCATION GENERATOR WORLD FILE ===")?;
    writeln!(file, "Seed: {}", seed)?;
    writeln!(file, "Size: {}x{}", width, height)?;
    writeln!(file, "Regions: {}", layouts.len())?;
    writeln!(file)?;

    writeln!(file, "=== MAP ===")?;
    write!(file, "{}", render_locations(map, layouts, min_terrain_height))?;
    writeln!(file)?;
    write!(file, "{}", location_legend())?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    for (location_type, count) in location_stats(layouts) {
        writeln!(file, "  {:<14} {:>5}", location_type.display_name(), count)?;
    }
    writeln!(file)?;

    for layout in layouts {
        writeln!(file, "=== REGION {}: {} ===", layout.region_index, layout.region_name)?;
        for record in &layout.records {
            writeln!(
                file,
                "  {:>5} {:<14} {:<32} {}",
                record.location_id,
                record.location_type.display_name(),
                record.name,
                record.position
            )?;
        }
        for skipped in &layout.report.skipped {
            writeln!(
                file,
                "  skipped {:?} at {}: {}",
                skipped.location_type, skipped.position, skipped.reason
            )?;
        }
        writeln!(file)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::GenerationReport;
    use crate::locations::{DungeonType, LocationRecord};
    use crate::region::RasterRegionMap;
    use crate::tilemap::Tilemap;

    fn record(location_type: LocationType, x: i32, y: i32) -> LocationRecord {
        LocationRecord {
            location_type,
            dungeon_type: DungeonType::NoDungeon,
            position: GridPosition::new(x, y),
            map_id: y as u64 * 1000 + x as u64,
            latitude: 0,
            longitude: 0,
            location_id: 2,
            name: format!("{:?}", location_type),
            exterior: None,
            dungeon: None,
            climate: Climate::Woodlands,
            politics: 0,
            region_index: 0,
            capital: false,
            index: 0,
        }
    }

    #[test]
    fn test_render_places_glyphs() {
        let mut heights = Tilemap::new_with(4, 3, 10u8);
        heights.set(0, 0, 0);
        let climates = Tilemap::new_with(4, 3, Climate::Woodlands);
        let map = RasterRegionMap::new(heights, climates, Tilemap::new_with(4, 3, 0));
        let layout = RegionLayout::new(
            0,
            "Tulune".to_string(),
            vec![record(LocationType::City, 1, 1), record(LocationType::DungeonKeep, 3, 2)],
            GenerationReport::default(),
        );
        let text = render_locations(&map, &[layout], 3);
        assert_eq!(text, "~...\n.@..\n...K\n");
    }

    #[test]
    fn test_glyphs_are_distinct() {
        let mut seen = BTreeMap::new();
        for ty in LocationType::placeable() {
            if let Some(other) = seen.insert(location_char(ty), ty) {
                panic!("{:?} and {:?} share a glyph", ty, other);
            }
        }
        assert!(location_legend().contains("Labyrinth"));
    }
}
