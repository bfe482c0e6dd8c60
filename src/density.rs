//! Density planning: how many locations of each type a region receives.
//!
//! Densities are expressed as locations per 100 surface pixels. A region's
//! coefficient for a type blends the per-climate densities by the share of
//! the surface each climate covers, scaled by the government modifier.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::locations::LocationType;
use crate::region::{Climate, Government, RegionDescriptor};

/// Round to the nearest integer with exact halves going up.
/// Negative inputs clamp to zero.
pub fn round_half_up(value: f64) -> u32 {
    if value <= 0.0 {
        return 0;
    }
    let whole = value.floor();
    let frac = value - whole;
    if frac >= 0.5 {
        whole as u32 + 1
    } else {
        whole as u32
    }
}

/// Number of locations for a density over a surface.
pub fn calculate_integer(surface: u32, density: f64) -> u32 {
    round_half_up(density * surface as f64 / 100.0)
}

/// Per-climate location densities.
#[derive(Clone, Copy, Debug)]
struct DensityRow {
    city: f64,
    hamlet: f64,
    village: f64,
    farm: f64,
    wealthy: f64,
    poor: f64,
    tavern: f64,
    temple: f64,
    cult: f64,
    coven: f64,
    graveyard: f64,
    ruin: f64,
    keep: f64,
    labyrinth: f64,
}

impl DensityRow {
    const EMPTY: DensityRow = DensityRow {
        city: 0.0,
        hamlet: 0.0,
        village: 0.0,
        farm: 0.0,
        wealthy: 0.0,
        poor: 0.0,
        tavern: 0.0,
        temple: 0.0,
        cult: 0.0,
        coven: 0.0,
        graveyard: 0.0,
        ruin: 0.0,
        keep: 0.0,
        labyrinth: 0.0,
    };

    fn get(&self, location_type: LocationType) -> f64 {
        match location_type {
            LocationType::City => self.city,
            LocationType::Hamlet => self.hamlet,
            LocationType::Village => self.village,
            LocationType::Farm => self.farm,
            LocationType::WealthyHome => self.wealthy,
            LocationType::PoorHome => self.poor,
            LocationType::Tavern => self.tavern,
            LocationType::Temple => self.temple,
            LocationType::Cult => self.cult,
            LocationType::Coven => self.coven,
            LocationType::Graveyard => self.graveyard,
            LocationType::DungeonRuin => self.ruin,
            LocationType::DungeonKeep => self.keep,
            LocationType::DungeonLabyrinth => self.labyrinth,
            LocationType::YourShips | LocationType::None => 0.0,
        }
    }
}

#[rustfmt::skip]
fn density_row(climate: Climate) -> DensityRow {
    match climate {
        Climate::Ocean => DensityRow::EMPTY,
        Climate::Desert => DensityRow {
            city: 0.03, hamlet: 0.06, village: 0.10, farm: 0.10, wealthy: 0.08,
            poor: 0.30, tavern: 0.25, temple: 0.10, cult: 0.12, coven: 0.04,
            graveyard: 0.12, ruin: 0.45, keep: 0.10, labyrinth: 0.05,
        },
        Climate::Desert2 => DensityRow {
            city: 0.02, hamlet: 0.05, village: 0.08, farm: 0.05, wealthy: 0.05,
            poor: 0.25, tavern: 0.20, temple: 0.08, cult: 0.12, coven: 0.04,
            graveyard: 0.10, ruin: 0.50, keep: 0.08, labyrinth: 0.06,
        },
        Climate::Mountain => DensityRow {
            city: 0.02, hamlet: 0.06, village: 0.15, farm: 0.20, wealthy: 0.05,
            poor: 0.35, tavern: 0.15, temple: 0.08, cult: 0.10, coven: 0.05,
            graveyard: 0.10, ruin: 0.40, keep: 0.15, labyrinth: 0.06,
        },
        Climate::Rainforest => DensityRow {
            city: 0.03, hamlet: 0.08, village: 0.25, farm: 0.40, wealthy: 0.15,
            poor: 0.40, tavern: 0.20, temple: 0.10, cult: 0.10, coven: 0.05,
            graveyard: 0.15, ruin: 0.35, keep: 0.08, labyrinth: 0.04,
        },
        Climate::Swamp => DensityRow {
            city: 0.02, hamlet: 0.05, village: 0.15, farm: 0.15, wealthy: 0.05,
            poor: 0.45, tavern: 0.15, temple: 0.05, cult: 0.15, coven: 0.10,
            graveyard: 0.15, ruin: 0.40, keep: 0.06, labyrinth: 0.05,
        },
        Climate::Subtropical => DensityRow {
            city: 0.05, hamlet: 0.10, village: 0.30, farm: 0.80, wealthy: 0.25,
            poor: 0.40, tavern: 0.30, temple: 0.12, cult: 0.08, coven: 0.03,
            graveyard: 0.18, ruin: 0.30, keep: 0.10, labyrinth: 0.04,
        },
        Climate::MountainWoods => DensityRow {
            city: 0.03, hamlet: 0.08, village: 0.25, farm: 0.50, wealthy: 0.15,
            poor: 0.40, tavern: 0.20, temple: 0.10, cult: 0.08, coven: 0.04,
            graveyard: 0.15, ruin: 0.35, keep: 0.12, labyrinth: 0.05,
        },
        Climate::Woodlands => DensityRow {
            city: 0.05, hamlet: 0.15, village: 0.40, farm: 1.00, wealthy: 0.30,
            poor: 0.50, tavern: 0.30, temple: 0.15, cult: 0.10, coven: 0.03,
            graveyard: 0.20, ruin: 0.30, keep: 0.10, labyrinth: 0.04,
        },
        Climate::HauntedWoodlands => DensityRow {
            city: 0.03, hamlet: 0.08, village: 0.20, farm: 0.40, wealthy: 0.10,
            poor: 0.40, tavern: 0.20, temple: 0.10, cult: 0.20, coven: 0.12,
            graveyard: 0.30, ruin: 0.45, keep: 0.10, labyrinth: 0.06,
        },
    }
}

/// Locations per 100 surface pixels for a type in a climate.
pub fn climate_density(climate: Climate, location_type: LocationType) -> f64 {
    density_row(climate).get(location_type)
}

/// Government scaling of a type's density.
pub fn government_modifier(government: Government, location_type: LocationType) -> f64 {
    use LocationType as L;
    match (government, location_type) {
        (_, L::YourShips | L::None) => 0.0,
        (Government::Kingdom, L::City | L::Hamlet) => 1.2,
        (Government::Kingdom, L::WealthyHome) => 1.1,
        (Government::Kingdom, L::DungeonRuin | L::DungeonLabyrinth) => 0.8,
        (Government::Duchy, L::Hamlet | L::Village) => 1.1,
        (Government::Duchy, L::WealthyHome) => 1.2,
        (Government::Barony, L::City) => 0.8,
        (Government::Barony, L::DungeonKeep) => 1.3,
        (Government::Barony, L::Farm | L::PoorHome) => 1.1,
        (Government::County, L::Village | L::Farm) => 1.2,
        (Government::County, L::City) => 0.9,
        (Government::Realm, L::Temple | L::Graveyard) => 1.2,
        (Government::Realm, L::Cult | L::Coven) => 0.8,
        (Government::Province, L::City | L::WealthyHome) => 0.7,
        (Government::Province, L::Cult | L::Coven | L::DungeonRuin) => 1.3,
        (Government::Province, L::DungeonLabyrinth) => 1.2,
        _ => 1.0,
    }
}

/// Density coefficient of a type for a region, without jitter.
pub fn density_coefficient(region: &RegionDescriptor, location_type: LocationType) -> f64 {
    if location_type.is_sentinel() {
        return 0.0;
    }
    let modifier = government_modifier(region.government, location_type);
    Climate::all()
        .iter()
        .map(|&climate| {
            climate_density(climate, location_type) * modifier * region.climate_share(climate)
        })
        .sum()
}

/// Target count per location type for one region.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DensityPlan {
    pub counts: BTreeMap<LocationType, u32>,
}

impl DensityPlan {
    pub fn count(&self, location_type: LocationType) -> u32 {
        self.counts.get(&location_type).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn set(&mut self, location_type: LocationType, count: u32) {
        self.counts.insert(location_type, count);
    }
}

/// Convert densities into per-type counts. `jitter` is the half-width of a
/// uniform multiplicative jitter; zero draws nothing from the RNG.
pub fn plan_density<R: Rng + ?Sized>(
    region: &RegionDescriptor,
    jitter: f64,
    rng: &mut R,
) -> DensityPlan {
    let mut plan = DensityPlan::default();
    for &location_type in LocationType::all() {
        if location_type.is_sentinel() {
            plan.set(location_type, 0);
            continue;
        }
        let mut coefficient = density_coefficient(region, location_type);
        if jitter > 0.0 {
            coefficient *= 1.0 + rng.gen_range(-jitter..=jitter);
        }
        plan.set(location_type, calculate_integer(region.surface_pixels, coefficient));
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{Deity, Regionalism};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn region(government: Government, pixels: &[(Climate, u32)]) -> RegionDescriptor {
        RegionDescriptor {
            index: 0,
            name: "Test".to_string(),
            government,
            climate_pixels: pixels.iter().copied().collect(),
            surface_pixels: pixels.iter().map(|(_, n)| n).sum(),
            deity: Deity::Arkay,
            major_regionalisms: vec![Regionalism::HighRockVanilla],
            minor_regionalisms: vec![],
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(0.5), 1);
        assert_eq!(round_half_up(0.49), 0);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.0), 2);
        assert_eq!(round_half_up(-3.0), 0);
    }

    #[test]
    fn test_calculate_integer() {
        assert_eq!(calculate_integer(100, 0.5), 1);
        assert_eq!(calculate_integer(10, 0.74), 0);
        assert_eq!(calculate_integer(100, 0.76), 1);
        assert_eq!(calculate_integer(100, 50.0), 50);
        assert_eq!(calculate_integer(10, 7.4), 1);
    }

    #[test]
    fn test_sentinels_always_zero() {
        let r = region(Government::Kingdom, &[(Climate::Woodlands, 5000)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let plan = plan_density(&r, 0.1, &mut rng);
        assert_eq!(plan.count(LocationType::YourShips), 0);
        assert_eq!(plan.count(LocationType::None), 0);
    }

    #[test]
    fn test_zero_jitter_matches_formula() {
        let r = region(
            Government::Duchy,
            &[(Climate::Woodlands, 3000), (Climate::Mountain, 1200), (Climate::Desert, 800)],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let plan = plan_density(&r, 0.0, &mut rng);
        for ty in LocationType::placeable() {
            let raw = density_coefficient(&r, ty) * r.surface_pixels as f64 / 100.0;
            let expected = round_half_up(raw);
            assert_eq!(plan.count(ty), expected, "count mismatch for {:?}", ty);
        }
    }

    #[test]
    fn test_coefficient_blends_climates() {
        let pure = region(Government::Duchy, &[(Climate::Woodlands, 1000)]);
        let mixed = region(Government::Duchy, &[(Climate::Woodlands, 500), (Climate::Ocean, 500)]);
        let farm_pure = density_coefficient(&pure, LocationType::Farm);
        let farm_mixed = density_coefficient(&mixed, LocationType::Farm);
        assert!((farm_pure - 1.0).abs() < 1e-12);
        assert!((farm_mixed - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_jitter_stays_within_band() {
        let r = region(Government::Duchy, &[(Climate::Woodlands, 100_000)]);
        let exact = density_coefficient(&r, LocationType::Farm) * 1000.0;
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let count = plan_density(&r, 0.1, &mut rng).count(LocationType::Farm) as f64;
            assert!(count >= exact * 0.9 - 1.0 && count <= exact * 1.1 + 1.0,
                "jittered count {} outside band around {}", count, exact);
        }
    }

    #[test]
    fn test_empty_region_plans_nothing() {
        let r = region(Government::Kingdom, &[]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(plan_density(&r, 0.1, &mut rng).total(), 0);
    }
}
