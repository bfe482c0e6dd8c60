//! Synthetic demo world
//!
//! Builds a region map for the CLI and tests when no real rasters are
//! supplied: Perlin fBm heights with an island falloff, climate from
//! latitude, elevation and a moisture field, and a Voronoi split of the land
//! into regions with random political traits.

use noise::{NoiseFn, Perlin, Seedable};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::locations::GridPosition;
use crate::pipeline::RegionRequest;
use crate::placement::CapitalRequest;
use crate::region::{Climate, Deity, Government, RasterRegionMap, RegionTraits, Regionalism};
use crate::seeds::WorldSeeds;
use crate::tilemap::Tilemap;

#[rustfmt::skip]
const REGION_NAMES: &[&str] = &[
    "Daggerfall", "Wayrest", "Sentinel", "Glenpoint", "Betony", "Alcaire", "Anticlere", "Kambria",
    "Tulune", "Ykalon", "Urvaius", "Menevia", "Gavaudon", "Shalgora", "Lainlyn", "Dwynnen",
    "Ilessan Hills", "Phrygias", "Satakalaam", "Bergama", "Abibon-Gora", "Kozanset", "Mournoth",
    "Myrkwasa",
];

/// Parameters for the synthetic world
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticParams {
    pub width: usize,
    pub height: usize,
    pub regions: usize,
    /// Base frequency for noise (lower = larger features)
    pub frequency: f64,
    pub octaves: u32,
    /// Noise level below which a pixel is water (0.0-1.0)
    pub sea_level: f64,
    /// Give every region a capital city named after it.
    pub capitals: bool,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            width: 160,
            height: 100,
            regions: 8,
            frequency: 0.03,
            octaves: 4,
            sea_level: 0.35,
            capitals: true,
        }
    }
}

/// A generated map plus the region requests that go with it.
pub struct SyntheticWorld {
    pub map: RasterRegionMap,
    pub regions: Vec<RegionRequest>,
}

fn fbm(noise: &Perlin, x: f64, y: f64, frequency: f64, octaves: u32) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut norm = 0.0;
    let mut freq = frequency;
    for _ in 0..octaves.max(1) {
        total += noise.get([x * freq, y * freq]) * amplitude;
        norm += amplitude;
        amplitude *= 0.5;
        freq *= 2.0;
    }
    // Perlin output is roughly -1..1; map to 0..1
    ((total / norm) * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// Terrain heights. Water is 0, land is 3..=255.
pub fn generate_heights(params: &SyntheticParams, seed: u64) -> Tilemap<u8> {
    let noise = Perlin::new(1).set_seed(seed as u32);
    let (w, h) = (params.width, params.height);
    let mut heights = Tilemap::new_with(w, h, 0u8);

    for y in 0..h {
        for x in 0..w {
            // Island falloff: 1 at the centre, 0 at the edges
            let dx = (x as f64 / w.max(1) as f64) * 2.0 - 1.0;
            let dy = (y as f64 / h.max(1) as f64) * 2.0 - 1.0;
            let falloff = (1.0 - (dx * dx + dy * dy).sqrt() * 0.8).clamp(0.0, 1.0);
            let detail = fbm(&noise, x as f64, y as f64, params.frequency, params.octaves);
            let value = detail * 0.5 + falloff * 0.5;
            if value >= params.sea_level {
                let span = (1.0 - params.sea_level).max(f64::EPSILON);
                let t = ((value - params.sea_level) / span).clamp(0.0, 1.0);
                heights.set(x, y, 3 + (t * 252.0) as u8);
            }
        }
    }
    heights
}

/// Climate from latitude (north at the top), elevation and moisture.
pub fn classify_climate(height: u8, latitude: f64, moisture: f64) -> Climate {
    if height == 0 {
        return Climate::Ocean;
    }
    if height > 200 {
        return Climate::Mountain;
    }
    if height > 160 {
        return Climate::MountainWoods;
    }
    if latitude > 0.7 {
        // Southern band
        match moisture {
            m if m < 0.35 => Climate::Desert,
            m if m < 0.5 => Climate::Desert2,
            m if m < 0.7 => Climate::Subtropical,
            _ => Climate::Rainforest,
        }
    } else if latitude < 0.3 && moisture > 0.6 {
        Climate::HauntedWoodlands
    } else if moisture > 0.72 {
        Climate::Swamp
    } else {
        Climate::Woodlands
    }
}

pub fn generate_climates(
    heights: &Tilemap<u8>,
    params: &SyntheticParams,
    seed: u64,
) -> Tilemap<Climate> {
    let noise = Perlin::new(1).set_seed(seed.wrapping_add(1) as u32);
    let mut climates = Tilemap::new_with(heights.width, heights.height, Climate::Ocean);
    for y in 0..heights.height {
        let latitude = y as f64 / heights.height.max(1) as f64;
        for x in 0..heights.width {
            let moisture = fbm(&noise, x as f64, y as f64, params.frequency * 1.5, 3);
            climates.set(x, y, classify_climate(*heights.get(x, y), latitude, moisture));
        }
    }
    climates
}

/// Voronoi split of the land into `count` regions. Water pixels get -1.
pub fn split_regions<R: Rng + ?Sized>(
    heights: &Tilemap<u8>,
    count: usize,
    rng: &mut R,
) -> Tilemap<i32> {
    let mut regions = Tilemap::new_with(heights.width, heights.height, -1i32);
    let land: Vec<GridPosition> = (0..heights.height)
        .flat_map(|y| (0..heights.width).map(move |x| (x, y)))
        .filter(|&(x, y)| *heights.get(x, y) > 0)
        .map(|(x, y)| GridPosition::new(x as i32, y as i32))
        .collect();
    let centers: Vec<GridPosition> =
        land.choose_multiple(rng, count.min(land.len())).copied().collect();
    if centers.is_empty() {
        return regions;
    }

    for p in &land {
        let nearest = centers
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| {
                let (dx, dy) = (c.x - p.x, c.y - p.y);
                dx * dx + dy * dy
            })
            .map(|(i, _)| i as i32)
            .unwrap_or(-1);
        regions.set(p.x as usize, p.y as usize, nearest);
    }
    regions
}

/// Random political and cultural traits.
pub fn random_traits<R: Rng + ?Sized>(index: usize, rng: &mut R) -> RegionTraits {
    let name = match REGION_NAMES.get(index) {
        Some(name) => name.to_string(),
        None => {
            let base = REGION_NAMES[index % REGION_NAMES.len()];
            format!("{} {}", base, index / REGION_NAMES.len() + 1)
        }
    };
    let cultures = Regionalism::all();
    let major = cultures[rng.gen_range(0..cultures.len())];
    let minor_count = rng.gen_range(0..=2);
    let minors: Vec<Regionalism> = cultures
        .iter()
        .copied()
        .filter(|c| *c != major)
        .collect::<Vec<_>>()
        .choose_multiple(rng, minor_count)
        .copied()
        .collect();

    RegionTraits {
        name,
        government: Government::all()[rng.gen_range(0..Government::all().len())],
        deity: Deity::all()[rng.gen_range(0..Deity::all().len())],
        major_regionalisms: vec![major],
        minor_regionalisms: minors,
    }
}

/// Build a whole demo world from the seeds.
pub fn generate_world(params: &SyntheticParams, seeds: &WorldSeeds) -> SyntheticWorld {
    let heights = generate_heights(params, seeds.terrain);
    let climates = generate_climates(&heights, params, seeds.terrain);
    let mut terrain_rng = ChaCha8Rng::seed_from_u64(seeds.terrain);
    let region_map = split_regions(&heights, params.regions, &mut terrain_rng);

    let region_count = (0..region_map.height)
        .flat_map(|y| (0..region_map.width).map(move |x| (x, y)))
        .map(|(x, y)| *region_map.get(x, y) + 1)
        .max()
        .unwrap_or(0) as usize;

    let mut traits_rng = ChaCha8Rng::seed_from_u64(seeds.regions);
    let regions = (0..region_count)
        .map(|index| {
            let traits = random_traits(index, &mut traits_rng);
            let capital = params.capitals.then(|| CapitalRequest {
                name: traits.name.clone(),
                walled: true,
                ..CapitalRequest::default()
            });
            RegionRequest { traits, capital }
        })
        .collect();

    SyntheticWorld {
        map: RasterRegionMap::new(heights, climates, region_map),
        regions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionMap;

    fn small() -> SyntheticParams {
        SyntheticParams {
            width: 48,
            height: 32,
            regions: 3,
            ..SyntheticParams::default()
        }
    }

    #[test]
    fn test_world_is_deterministic() {
        let seeds = WorldSeeds::from_master(42);
        let a = generate_world(&small(), &seeds);
        let b = generate_world(&small(), &seeds);
        assert_eq!(a.regions.len(), b.regions.len());
        for y in 0..32 {
            for x in 0..48 {
                assert_eq!(a.map.terrain_height(x, y), b.map.terrain_height(x, y));
                assert_eq!(a.map.region_index_at(x, y), b.map.region_index_at(x, y));
            }
        }
    }

    #[test]
    fn test_water_has_no_region() {
        let world = generate_world(&small(), &WorldSeeds::from_master(7));
        let (w, h) = world.map.dimensions();
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                let water = world.map.terrain_height(x, y) == 0;
                assert_eq!(water, world.map.region_index_at(x, y) == -1);
                assert_eq!(water, world.map.climate_at(x, y) == Climate::Ocean);
            }
        }
        // Corners fall off into the sea
        assert_eq!(world.map.terrain_height(0, 0), 0);
    }

    #[test]
    fn test_climate_bands() {
        assert_eq!(classify_climate(0, 0.5, 0.5), Climate::Ocean);
        assert_eq!(classify_climate(230, 0.5, 0.5), Climate::Mountain);
        assert_eq!(classify_climate(50, 0.9, 0.1), Climate::Desert);
        assert_eq!(classify_climate(50, 0.1, 0.9), Climate::HauntedWoodlands);
        assert_eq!(classify_climate(50, 0.5, 0.5), Climate::Woodlands);
    }

    #[test]
    fn test_traits_have_distinct_cultures() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for i in 0..40 {
            let traits = random_traits(i, &mut rng);
            assert_eq!(traits.major_regionalisms.len(), 1);
            assert!(!traits.minor_regionalisms.contains(&traits.major_regionalisms[0]));
            assert!(!traits.name.is_empty());
        }
        assert_eq!(random_traits(24, &mut rng).name, "Daggerfall 2");
    }
}
