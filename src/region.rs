//! Region descriptors and the map rasters they are surveyed from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::locations::GridPosition;
use crate::tilemap::Tilemap;

/// Terrain climate of a map pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Climate {
    #[default]
    Ocean,
    Desert,
    Desert2,
    Mountain,
    Rainforest,
    Swamp,
    Subtropical,
    MountainWoods,
    Woodlands,
    HauntedWoodlands,
}

impl Climate {
    pub fn all() -> &'static [Climate] {
        &[
            Climate::Ocean,
            Climate::Desert,
            Climate::Desert2,
            Climate::Mountain,
            Climate::Rainforest,
            Climate::Swamp,
            Climate::Subtropical,
            Climate::MountainWoods,
            Climate::Woodlands,
            Climate::HauntedWoodlands,
        ]
    }

    /// Hot climates whose exterior blocks come in the B/G desert sets.
    pub fn is_arid(&self) -> bool {
        matches!(self, Climate::Desert | Climate::Desert2 | Climate::Subtropical)
    }
}

/// Government type of a region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Government {
    #[default]
    Kingdom,
    Duchy,
    Barony,
    County,
    Realm,
    Province,
}

impl Government {
    pub fn all() -> &'static [Government] {
        &[
            Government::Kingdom,
            Government::Duchy,
            Government::Barony,
            Government::County,
            Government::Realm,
            Government::Province,
        ]
    }
}

/// The Divines worshipped across the regions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Deity {
    #[default]
    Akatosh,
    Arkay,
    Dibella,
    Julianos,
    Kynareth,
    Mara,
    Stendarr,
    Zenithar,
}

impl Deity {
    pub fn all() -> &'static [Deity] {
        &[
            Deity::Akatosh,
            Deity::Arkay,
            Deity::Dibella,
            Deity::Julianos,
            Deity::Kynareth,
            Deity::Mara,
            Deity::Stendarr,
            Deity::Zenithar,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Deity::Akatosh => "Akatosh",
            Deity::Arkay => "Arkay",
            Deity::Dibella => "Dibella",
            Deity::Julianos => "Julianos",
            Deity::Kynareth => "Kynareth",
            Deity::Mara => "Mara",
            Deity::Stendarr => "Stendarr",
            Deity::Zenithar => "Zenithar",
        }
    }
}

/// Naming culture used by the name grammar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Regionalism {
    #[default]
    HighRockVanilla,
    HighRockModern,
    Hammerfell,
    Skyrim,
    Reachmen,
    Morrowind,
}

impl Regionalism {
    pub fn all() -> &'static [Regionalism] {
        &[
            Regionalism::HighRockVanilla,
            Regionalism::HighRockModern,
            Regionalism::Hammerfell,
            Regionalism::Skyrim,
            Regionalism::Reachmen,
            Regionalism::Morrowind,
        ]
    }

    pub fn is_high_rock(&self) -> bool {
        matches!(self, Regionalism::HighRockVanilla | Regionalism::HighRockModern)
    }
}

/// Read-only raster lookups the generator consumes.
pub trait RegionMap {
    fn dimensions(&self) -> (usize, usize);
    fn terrain_height(&self, x: i32, y: i32) -> u8;
    fn climate_at(&self, x: i32, y: i32) -> Climate;
    fn region_index_at(&self, x: i32, y: i32) -> i32;
}

/// `RegionMap` backed by in-memory rasters.
#[derive(Clone, Debug)]
pub struct RasterRegionMap {
    pub heights: Tilemap<u8>,
    pub climates: Tilemap<Climate>,
    /// Region index per pixel, -1 for pixels outside every region.
    pub regions: Tilemap<i32>,
}

impl RasterRegionMap {
    pub fn new(heights: Tilemap<u8>, climates: Tilemap<Climate>, regions: Tilemap<i32>) -> Self {
        debug_assert_eq!((heights.width, heights.height), (climates.width, climates.height));
        debug_assert_eq!((heights.width, heights.height), (regions.width, regions.height));
        Self { heights, climates, regions }
    }
}

impl RegionMap for RasterRegionMap {
    fn dimensions(&self) -> (usize, usize) {
        (self.heights.width, self.heights.height)
    }

    fn terrain_height(&self, x: i32, y: i32) -> u8 {
        self.heights.get_signed(x, y).copied().unwrap_or(0)
    }

    fn climate_at(&self, x: i32, y: i32) -> Climate {
        self.climates.get_signed(x, y).copied().unwrap_or(Climate::Ocean)
    }

    fn region_index_at(&self, x: i32, y: i32) -> i32 {
        self.regions.get_signed(x, y).copied().unwrap_or(-1)
    }
}

/// Everything the generator needs to know about a region up front.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionDescriptor {
    pub index: i32,
    pub name: String,
    pub government: Government,
    /// Surface pixels per climate.
    pub climate_pixels: BTreeMap<Climate, u32>,
    pub surface_pixels: u32,
    pub deity: Deity,
    pub major_regionalisms: Vec<Regionalism>,
    pub minor_regionalisms: Vec<Regionalism>,
}

/// Political and cultural facts about a region that the rasters do not carry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionTraits {
    pub name: String,
    pub government: Government,
    pub deity: Deity,
    pub major_regionalisms: Vec<Regionalism>,
    pub minor_regionalisms: Vec<Regionalism>,
}

impl RegionDescriptor {
    /// Survey a region on the map: climate histogram plus the surface array
    /// (every pixel belonging to the region, row-major).
    pub fn survey<M: RegionMap + ?Sized>(
        map: &M,
        index: i32,
        traits: RegionTraits,
    ) -> (RegionDescriptor, Vec<GridPosition>) {
        let (width, height) = map.dimensions();
        let mut climate_pixels = BTreeMap::new();
        let mut surface = Vec::new();

        for y in 0..height as i32 {
            for x in 0..width as i32 {
                if map.region_index_at(x, y) != index {
                    continue;
                }
                surface.push(GridPosition::new(x, y));
                *climate_pixels.entry(map.climate_at(x, y)).or_insert(0u32) += 1;
            }
        }

        let descriptor = RegionDescriptor {
            index,
            name: traits.name,
            government: traits.government,
            climate_pixels,
            surface_pixels: surface.len() as u32,
            deity: traits.deity,
            major_regionalisms: traits.major_regionalisms,
            minor_regionalisms: traits.minor_regionalisms,
        };
        (descriptor, surface)
    }

    /// Share of the surface covered by a climate (0.0 for an empty region).
    pub fn climate_share(&self, climate: Climate) -> f64 {
        if self.surface_pixels == 0 {
            return 0.0;
        }
        let pixels = self.climate_pixels.get(&climate).copied().unwrap_or(0);
        pixels as f64 / self.surface_pixels as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_region_map() -> RasterRegionMap {
        let mut heights = Tilemap::new_with(4, 2, 10u8);
        heights.set(0, 0, 0);
        let mut climates = Tilemap::new_with(4, 2, Climate::Woodlands);
        climates.set(1, 0, Climate::Desert);
        let mut regions = Tilemap::new_with(4, 2, 0i32);
        regions.set(3, 0, 1);
        regions.set(3, 1, 1);
        RasterRegionMap::new(heights, climates, regions)
    }

    #[test]
    fn test_survey_counts_region_pixels() {
        let map = two_region_map();
        let (region, surface) = RegionDescriptor::survey(&map, 0, RegionTraits::default());
        assert_eq!(region.surface_pixels, 6);
        assert_eq!(surface.len(), 6);
        assert_eq!(region.climate_pixels.get(&Climate::Desert), Some(&1));
        assert_eq!(region.climate_pixels.get(&Climate::Woodlands), Some(&5));
        assert!((region.climate_share(Climate::Desert) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_raster_map_out_of_bounds() {
        let map = two_region_map();
        assert_eq!(map.terrain_height(-1, 0), 0);
        assert_eq!(map.climate_at(10, 10), Climate::Ocean);
        assert_eq!(map.region_index_at(0, 5), -1);
    }

    #[test]
    fn test_arid_climates() {
        assert!(Climate::Desert.is_arid());
        assert!(Climate::Subtropical.is_arid());
        assert!(!Climate::Woodlands.is_arid());
    }
}
