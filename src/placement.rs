//! Location placement on the region surface
//!
//! Rejection-samples surface pixels for every planned location. A sample is
//! rejected when the pixel is consumed, underwater, already occupied, or
//! within the conflict tolerance of a placed location of a conflicting type.
//! Accepted pixels are consumed by overwriting their surface slot with the
//! unassigned sentinel.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{FailurePolicy, PlacementConfig};
use crate::context::GenerationContext;
use crate::density::DensityPlan;
use crate::error::{GenerationError, Result};
use crate::locations::{GridPosition, LocationType};
use crate::region::RegionMap;

/// Fixed capital requested for a region.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalRequest {
    pub name: String,
    pub position: Option<GridPosition>,
    pub width: Option<u8>,
    pub height: Option<u8>,
    pub walled: bool,
    pub port: bool,
}

/// A location slot with its accepted position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedLocation {
    pub location_type: LocationType,
    pub position: GridPosition,
    pub capital: bool,
}

/// A type whose density target could not be met.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub location_type: LocationType,
    pub requested: u32,
    pub placed: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementOutcome {
    /// Placed locations in placement order (capital first).
    pub placed: Vec<PlannedLocation>,
    pub shortfalls: Vec<Shortfall>,
}

/// Types a location of `location_type` may not sit next to.
#[rustfmt::skip]
pub fn conflict_list(location_type: LocationType) -> &'static [LocationType] {
    use LocationType as L;
    match location_type {
        L::City => &[L::City, L::Hamlet, L::Coven],
        L::Hamlet => &[
            L::City, L::Hamlet, L::Village, L::DungeonLabyrinth, L::DungeonKeep, L::Coven,
        ],
        L::Village => &[
            L::City, L::Hamlet, L::Village, L::DungeonLabyrinth, L::Temple, L::Tavern,
            L::DungeonKeep, L::WealthyHome, L::Coven,
        ],
        L::Farm => &[L::City, L::Hamlet, L::Village],
        L::WealthyHome => &[L::City, L::Hamlet, L::Village, L::WealthyHome],
        L::PoorHome => &[L::City, L::Hamlet],
        L::Tavern => &[L::City, L::Hamlet, L::Village, L::Tavern],
        L::Temple => &[L::City, L::Hamlet, L::Village, L::Temple, L::Cult, L::Coven],
        L::Cult => &[L::Temple, L::Cult, L::Coven],
        L::Coven => &[L::City, L::Hamlet, L::Village, L::Temple, L::Cult, L::Coven],
        L::Graveyard => &[L::City, L::Graveyard],
        L::DungeonRuin => &[L::City, L::Hamlet],
        L::DungeonKeep => &[L::City, L::Hamlet, L::Village, L::DungeonKeep, L::DungeonLabyrinth],
        L::DungeonLabyrinth => &[
            L::City, L::Hamlet, L::Village, L::DungeonKeep, L::DungeonLabyrinth,
        ],
        L::YourShips | L::None => &[],
    }
}

/// Whether two types conflict in either direction of the table.
pub fn types_conflict(a: LocationType, b: LocationType) -> bool {
    conflict_list(a).contains(&b) || conflict_list(b).contains(&a)
}

/// Check a candidate against the placed locations.
///
/// The legacy scan walks the target's conflict list per placed location and
/// stops at the first entry that is not the placed location's type, so only
/// a prefix of the list is ever consulted.
pub fn check_position(
    candidate: GridPosition,
    target: LocationType,
    placed: &[PlannedLocation],
    config: &PlacementConfig,
) -> bool {
    for other in placed {
        if other.position == candidate {
            return false;
        }
        let close = candidate.distance(&other.position) < config.conflict_tolerance;
        if !close {
            continue;
        }
        if config.legacy_conflict_scan {
            for &conflicting in conflict_list(target) {
                if other.location_type == conflicting {
                    return false;
                } else {
                    break;
                }
            }
        } else if types_conflict(target, other.location_type) {
            return false;
        }
    }
    true
}

/// Assigns grid positions to planned locations.
pub struct PlacementEngine<'a, M: RegionMap + ?Sized> {
    map: &'a M,
    config: &'a PlacementConfig,
    policy: FailurePolicy,
}

impl<'a, M: RegionMap + ?Sized> PlacementEngine<'a, M> {
    pub fn new(map: &'a M, config: &'a PlacementConfig, policy: FailurePolicy) -> Self {
        Self { map, config, policy }
    }

    /// Place every planned location. `surface` is consumed in place.
    pub fn place(
        &self,
        plan: &DensityPlan,
        surface: &mut [GridPosition],
        capital: Option<&CapitalRequest>,
        ctx: &mut GenerationContext,
    ) -> Result<PlacementOutcome> {
        let mut outcome = PlacementOutcome::default();
        let mut free = surface.iter().filter(|p| p.is_assigned()).count();

        let mut order: Vec<LocationType> = LocationType::placeable().collect();
        order.shuffle(&mut ctx.rng);

        let mut city_slots_used = 0u32;
        if let Some(request) = capital {
            match self.place_capital(request, surface, &mut free, ctx) {
                Some(position) => {
                    outcome.placed.push(PlannedLocation {
                        location_type: LocationType::City,
                        position,
                        capital: true,
                    });
                    city_slots_used = 1;
                }
                None => {
                    let err = GenerationError::CapacityExceeded {
                        location_type: LocationType::City,
                        requested: 1,
                        placed: 0,
                    };
                    self.handle_shortfall(err, &mut outcome)?;
                }
            }
        }

        for location_type in order {
            let requested = plan.count(location_type);
            let slots = if location_type == LocationType::City {
                requested.saturating_sub(city_slots_used)
            } else {
                requested
            };

            let mut placed = 0u32;
            for _ in 0..slots {
                match self.place_one(location_type, surface, &mut free, &outcome.placed, ctx) {
                    Some(position) => {
                        outcome.placed.push(PlannedLocation {
                            location_type,
                            position,
                            capital: false,
                        });
                        placed += 1;
                    }
                    None => break,
                }
            }

            if placed < slots {
                let err = GenerationError::CapacityExceeded {
                    location_type,
                    requested: slots,
                    placed,
                };
                self.handle_shortfall(err, &mut outcome)?;
            } else if slots > 0 {
                debug!("placed {} x {:?}", placed, location_type);
            }
        }

        Ok(outcome)
    }

    fn handle_shortfall(&self, err: GenerationError, outcome: &mut PlacementOutcome) -> Result<()> {
        if self.policy == FailurePolicy::Abort {
            return Err(err);
        }
        warn!("{}", err);
        if let GenerationError::CapacityExceeded { location_type, requested, placed } = err {
            outcome.shortfalls.push(Shortfall { location_type, requested, placed });
        }
        Ok(())
    }

    fn place_capital(
        &self,
        request: &CapitalRequest,
        surface: &mut [GridPosition],
        free: &mut usize,
        ctx: &mut GenerationContext,
    ) -> Option<GridPosition> {
        if let Some(wanted) = request.position {
            let slot = surface.iter().position(|p| *p == wanted);
            match slot {
                Some(idx) if self.is_dry(wanted) => {
                    surface[idx] = GridPosition::UNASSIGNED;
                    *free -= 1;
                    ctx.positions.insert(wanted);
                    return Some(wanted);
                }
                _ => warn!(
                    "capital {} cannot sit at {}, choosing a random position",
                    request.name, wanted
                ),
            }
        }
        self.place_one(LocationType::City, surface, free, &[], ctx)
    }

    fn place_one(
        &self,
        location_type: LocationType,
        surface: &mut [GridPosition],
        free: &mut usize,
        placed: &[PlannedLocation],
        ctx: &mut GenerationContext,
    ) -> Option<GridPosition> {
        if surface.is_empty() {
            return None;
        }
        for _ in 0..self.config.max_attempts_per_slot {
            if *free == 0 {
                return None;
            }
            let idx = ctx.rng.gen_range(0..surface.len());
            let candidate = surface[idx];
            if !candidate.is_assigned() || !self.is_dry(candidate) {
                continue;
            }
            if ctx.positions.contains(&candidate) {
                continue;
            }
            if !check_position(candidate, location_type, placed, self.config) {
                continue;
            }
            surface[idx] = GridPosition::UNASSIGNED;
            *free -= 1;
            ctx.positions.insert(candidate);
            return Some(candidate);
        }
        None
    }

    fn is_dry(&self, position: GridPosition) -> bool {
        self.map.terrain_height(position.x, position.y) >= self.config.min_terrain_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{Climate, RasterRegionMap};
    use crate::tilemap::Tilemap;

    fn flat_map(width: usize, height: usize) -> RasterRegionMap {
        RasterRegionMap::new(
            Tilemap::new_with(width, height, 20u8),
            Tilemap::new_with(width, height, Climate::Woodlands),
            Tilemap::new_with(width, height, 0i32),
        )
    }

    fn full_surface(width: i32, height: i32) -> Vec<GridPosition> {
        (0..height)
            .flat_map(|y| (0..width).map(move |x| GridPosition::new(x, y)))
            .collect()
    }

    fn plan(entries: &[(LocationType, u32)]) -> DensityPlan {
        let mut plan = DensityPlan::default();
        for &(ty, n) in entries {
            plan.set(ty, n);
        }
        plan
    }

    #[test]
    fn test_conflict_table_rows() {
        use LocationType as L;
        #[rustfmt::skip]
        let rows: [(L, &[L]); 16] = [
            (L::City, &[L::City, L::Hamlet, L::Coven]),
            (L::Hamlet, &[
                L::City, L::Hamlet, L::Village, L::DungeonLabyrinth, L::DungeonKeep, L::Coven,
            ]),
            (L::Village, &[
                L::City, L::Hamlet, L::Village, L::DungeonLabyrinth, L::Temple, L::Tavern,
                L::DungeonKeep, L::WealthyHome, L::Coven,
            ]),
            (L::Farm, &[L::City, L::Hamlet, L::Village]),
            (L::WealthyHome, &[L::City, L::Hamlet, L::Village, L::WealthyHome]),
            (L::PoorHome, &[L::City, L::Hamlet]),
            (L::Tavern, &[L::City, L::Hamlet, L::Village, L::Tavern]),
            (L::Temple, &[L::City, L::Hamlet, L::Village, L::Temple, L::Cult, L::Coven]),
            (L::Cult, &[L::Temple, L::Cult, L::Coven]),
            (L::Coven, &[L::City, L::Hamlet, L::Village, L::Temple, L::Cult, L::Coven]),
            (L::Graveyard, &[L::City, L::Graveyard]),
            (L::DungeonRuin, &[L::City, L::Hamlet]),
            (L::DungeonKeep, &[
                L::City, L::Hamlet, L::Village, L::DungeonKeep, L::DungeonLabyrinth,
            ]),
            (L::DungeonLabyrinth, &[
                L::City, L::Hamlet, L::Village, L::DungeonKeep, L::DungeonLabyrinth,
            ]),
            (L::YourShips, &[]),
            (L::None, &[]),
        ];
        for (location_type, expected) in rows {
            assert_eq!(conflict_list(location_type), expected, "row {:?}", location_type);
        }
        for location_type in L::all() {
            assert!(rows.iter().any(|(t, _)| t == location_type), "no row for {:?}", location_type);
        }

        assert!(types_conflict(LocationType::Coven, LocationType::City));
        assert!(types_conflict(LocationType::City, LocationType::Temple));
        assert!(!types_conflict(LocationType::Farm, LocationType::Tavern));
    }

    #[test]
    fn test_conflicting_pairs_keep_distance() {
        let map = flat_map(24, 24);
        let config = PlacementConfig::default();
        let engine = PlacementEngine::new(&map, &config, FailurePolicy::SkipAndReport);
        let mut surface = full_surface(24, 24);
        let mut ctx = GenerationContext::new(11, 2);
        let plan = plan(&[
            (LocationType::City, 3),
            (LocationType::Hamlet, 5),
            (LocationType::Village, 10),
            (LocationType::Coven, 4),
            (LocationType::Temple, 6),
            (LocationType::Farm, 30),
        ]);
        let outcome = engine.place(&plan, &mut surface, None, &mut ctx).unwrap();
        assert_eq!(outcome.placed.len(), 58);
        for (i, a) in outcome.placed.iter().enumerate() {
            for b in &outcome.placed[i + 1..] {
                assert_ne!(a.position, b.position);
                if types_conflict(a.location_type, b.location_type) {
                    assert!(
                        a.position.distance(&b.position) >= 1.5,
                        "{:?} at {} too close to {:?} at {}",
                        a.location_type, a.position, b.location_type, b.position
                    );
                }
            }
        }
    }

    #[test]
    fn test_underwater_pixels_rejected() {
        let mut map = flat_map(8, 8);
        for y in 0..8 {
            for x in 0..4 {
                map.heights.set(x, y, 2);
            }
        }
        let config = PlacementConfig::default();
        let engine = PlacementEngine::new(&map, &config, FailurePolicy::SkipAndReport);
        let mut surface = full_surface(8, 8);
        let mut ctx = GenerationContext::new(5, 2);
        let outcome = engine
            .place(&plan(&[(LocationType::Farm, 20)]), &mut surface, None, &mut ctx)
            .unwrap();
        assert_eq!(outcome.placed.len(), 20);
        assert!(outcome.placed.iter().all(|p| p.position.x >= 4));
    }

    #[test]
    fn test_capacity_exceeded_is_reported() {
        let map = flat_map(3, 3);
        let config = PlacementConfig { max_attempts_per_slot: 500, ..PlacementConfig::default() };
        let engine = PlacementEngine::new(&map, &config, FailurePolicy::SkipAndReport);
        let mut surface = full_surface(3, 3);
        let mut ctx = GenerationContext::new(5, 2);
        let outcome = engine
            .place(&plan(&[(LocationType::Farm, 12)]), &mut surface, None, &mut ctx)
            .unwrap();
        assert_eq!(outcome.placed.len(), 9);
        assert_eq!(
            outcome.shortfalls,
            vec![Shortfall { location_type: LocationType::Farm, requested: 12, placed: 9 }]
        );
        assert!(surface.iter().all(|p| !p.is_assigned()));
    }

    #[test]
    fn test_capacity_exceeded_aborts_under_abort_policy() {
        let map = flat_map(2, 2);
        let config = PlacementConfig::default();
        let engine = PlacementEngine::new(&map, &config, FailurePolicy::Abort);
        let mut surface = full_surface(2, 2);
        let mut ctx = GenerationContext::new(5, 2);
        let result = engine.place(&plan(&[(LocationType::Farm, 5)]), &mut surface, None, &mut ctx);
        assert!(matches!(
            result,
            Err(GenerationError::CapacityExceeded {
                location_type: LocationType::Farm,
                requested: 5,
                placed: 4
            })
        ));
    }

    #[test]
    fn test_capital_uses_requested_position_and_city_slot() {
        let map = flat_map(16, 16);
        let config = PlacementConfig::default();
        let engine = PlacementEngine::new(&map, &config, FailurePolicy::SkipAndReport);
        let mut surface = full_surface(16, 16);
        let mut ctx = GenerationContext::new(9, 2);
        let request = CapitalRequest {
            name: "Daggerfall".to_string(),
            position: Some(GridPosition::new(7, 7)),
            ..CapitalRequest::default()
        };
        let outcome = engine
            .place(&plan(&[(LocationType::City, 2)]), &mut surface, Some(&request), &mut ctx)
            .unwrap();
        let cities: Vec<_> = outcome
            .placed
            .iter()
            .filter(|p| p.location_type == LocationType::City)
            .collect();
        assert_eq!(cities.len(), 2);
        assert!(cities[0].capital);
        assert_eq!(cities[0].position, GridPosition::new(7, 7));
        assert!(!cities[1].capital);
    }

    #[test]
    fn test_capital_on_water_moves() {
        let mut map = flat_map(10, 10);
        map.heights.set(2, 2, 0);
        let config = PlacementConfig::default();
        let engine = PlacementEngine::new(&map, &config, FailurePolicy::SkipAndReport);
        let mut surface = full_surface(10, 10);
        let mut ctx = GenerationContext::new(9, 2);
        let request = CapitalRequest {
            name: "Sentinel".to_string(),
            position: Some(GridPosition::new(2, 2)),
            ..CapitalRequest::default()
        };
        let empty = DensityPlan::default();
        let outcome = engine.place(&empty, &mut surface, Some(&request), &mut ctx).unwrap();
        assert_eq!(outcome.placed.len(), 1);
        assert_ne!(outcome.placed[0].position, GridPosition::new(2, 2));
    }

    #[test]
    fn test_legacy_scan_only_consults_list_prefix() {
        let config = PlacementConfig { legacy_conflict_scan: true, ..PlacementConfig::default() };
        let placed = [PlannedLocation {
            location_type: LocationType::Hamlet,
            position: GridPosition::new(0, 0),
            capital: false,
        }];
        // City's list starts with City, so a neighbouring Hamlet slips through.
        assert!(check_position(GridPosition::new(1, 0), LocationType::City, &placed, &config));
        let full = PlacementConfig::default();
        assert!(!check_position(GridPosition::new(1, 0), LocationType::City, &placed, &full));
    }

    #[test]
    fn test_placement_is_deterministic() {
        let map = flat_map(20, 20);
        let config = PlacementConfig::default();
        let engine = PlacementEngine::new(&map, &config, FailurePolicy::SkipAndReport);
        let plan = plan(&[
            (LocationType::Village, 6),
            (LocationType::Farm, 12),
            (LocationType::Graveyard, 3),
        ]);
        let run = || {
            let mut surface = full_surface(20, 20);
            let mut ctx = GenerationContext::new(77, 2);
            engine.place(&plan, &mut surface, None, &mut ctx).unwrap()
        };
        assert_eq!(run(), run());
    }
}
