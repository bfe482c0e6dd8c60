//! Region generation pipeline
//!
//! Drives one region from descriptor to finished records:
//! density plan → placement → per location (name → exterior → dungeon →
//! assembly) → final sort. A location's name and id are only committed once
//! every step for it has succeeded.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::assembly::{
    assemble, check_map_dimensions, GenerationReport, LocationParts, RegionLayout, SkippedLocation,
};
use crate::catalog::BlockCatalog;
use crate::config::{FailurePolicy, GenerationConfig};
use crate::context::{GenerationContext, LocationIdAllocator};
use crate::data::LocationData;
use crate::density::plan_density;
use crate::dungeon::{generate_dungeon, theme_for_name};
use crate::error::Result;
use crate::locations::{DungeonType, GridPosition, LocationRecord};
use crate::naming::{NameBank, NameSynthesizer};
use crate::placement::{CapitalRequest, PlacementEngine, PlannedLocation};
use crate::region::{RegionDescriptor, RegionMap, RegionTraits};
use crate::seeds::WorldSeeds;
use crate::settlement::{
    build_single_exterior, build_town_exterior, settlement_flags, shape_settlement, ExteriorRequest,
};

/// One region to generate: its traits and optional fixed capital.
#[derive(Clone, Debug, Default)]
pub struct RegionRequest {
    pub traits: RegionTraits,
    pub capital: Option<CapitalRequest>,
}

pub struct RegionGenerator<'a, M: RegionMap + ?Sized> {
    map: &'a M,
    catalog: &'a dyn BlockCatalog,
    bank: &'a dyn NameBank,
    data: &'a LocationData,
    config: &'a GenerationConfig,
}

impl<'a, M: RegionMap + ?Sized> RegionGenerator<'a, M> {
    pub fn new(
        map: &'a M,
        catalog: &'a dyn BlockCatalog,
        bank: &'a dyn NameBank,
        data: &'a LocationData,
        config: &'a GenerationConfig,
    ) -> Self {
        Self {
            map,
            catalog,
            bank,
            data,
            config,
        }
    }

    /// Generate every region on the map in index order. Location ids are
    /// unique across the whole run.
    pub fn generate_world(
        &self,
        regions: &[RegionRequest],
        seeds: &WorldSeeds,
    ) -> Result<Vec<RegionLayout>> {
        let (width, height) = self.map.dimensions();
        check_map_dimensions(width, height)?;

        let ids = LocationIdAllocator::new(self.config.first_location_id);
        let mut ctx = GenerationContext::from_rng(seeds.region_rng(0), ids);
        let mut layouts = Vec::with_capacity(regions.len());

        for (index, request) in regions.iter().enumerate() {
            let index = index as i32;
            let traits = request.traits.clone();
            let (region, mut surface) = RegionDescriptor::survey(self.map, index, traits);
            ctx = ctx.next_region(seeds.region_rng(index));
            let layout = self.generate(&region, &mut surface, request.capital.as_ref(), &mut ctx)?;
            layouts.push(layout);
        }

        Ok(layouts)
    }

    /// Generate one region. `surface` is consumed by placement.
    pub fn generate(
        &self,
        region: &RegionDescriptor,
        surface: &mut [GridPosition],
        capital: Option<&CapitalRequest>,
        ctx: &mut GenerationContext,
    ) -> Result<RegionLayout> {
        let (width, height) = self.map.dimensions();
        check_map_dimensions(width, height)?;

        let policy = self.config.failure_policy;
        let plan = plan_density(region, self.config.density_jitter, &mut ctx.rng);
        let engine = PlacementEngine::new(self.map, &self.config.placement, policy);
        let outcome = engine.place(&plan, surface, capital, ctx)?;

        let mut report = GenerationReport {
            planned: plan.counts.clone(),
            shortfalls: outcome.shortfalls.clone(),
            ..GenerationReport::default()
        };
        for placed in &outcome.placed {
            *report.placed.entry(placed.location_type).or_insert(0) += 1;
        }

        let mut records = Vec::with_capacity(outcome.placed.len());
        for planned in &outcome.placed {
            let capital_request = if planned.capital { capital } else { None };
            match self.generate_location(region, planned, capital_request, ctx) {
                Ok(record) => {
                    debug!(
                        "{} {:?} at {} id {}",
                        record.name, record.location_type, record.position, record.location_id
                    );
                    ctx.names.insert(record.name.clone());
                    records.push(record);
                }
                Err(e) if e.is_location_local() && policy == FailurePolicy::SkipAndReport => {
                    warn!("skipping {:?} at {}: {}", planned.location_type, planned.position, e);
                    report.skipped.push(SkippedLocation {
                        location_type: planned.location_type,
                        position: planned.position,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "region {} ({}): {} locations, {} skipped, {} short",
            region.index,
            region.name,
            records.len(),
            report.skipped.len(),
            report.shortfalls.len()
        );
        Ok(RegionLayout::new(region.index, region.name.clone(), records, report))
    }

    fn generate_location(
        &self,
        region: &RegionDescriptor,
        planned: &PlannedLocation,
        capital: Option<&CapitalRequest>,
        ctx: &mut GenerationContext,
    ) -> Result<LocationRecord> {
        let location_type = planned.location_type;
        let position = planned.position;
        let climate = self.map.climate_at(position.x, position.y);

        let dungeon_type = if location_type.has_dungeon() {
            let candidates = DungeonType::candidates_for(location_type);
            candidates[ctx.rng.gen_range(0..candidates.len())]
        } else {
            DungeonType::NoDungeon
        };

        let (name, name_theme) = match capital {
            Some(request) => (request.name.clone(), None),
            None => {
                let synth = NameSynthesizer::new(
                    &self.data.grammars,
                    &self.data.epithets,
                    self.bank,
                    &self.config.naming,
                );
                let generated =
                    synth.generate(location_type, dungeon_type, region, &ctx.names, &mut ctx.rng)?;
                (generated.text, generated.theme)
            }
        };

        let settlement = &self.config.settlement;
        let exterior = if location_type.is_town() {
            let size = shape_settlement(location_type, capital, &mut ctx.rng);
            let coastal = self.is_coastal(position);
            let (walled, port) =
                settlement_flags(location_type, capital, coastal, settlement, &mut ctx.rng);
            let request = ExteriorRequest {
                location_type,
                size,
                climate,
                capital: planned.capital,
                walled,
                port,
            };
            build_town_exterior(&request, self.catalog, settlement, &mut ctx.rng)?
        } else {
            build_single_exterior(location_type, climate, self.catalog, settlement, &mut ctx.rng)?
        };

        let dungeon = if location_type.has_dungeon() {
            let theme = name_theme.unwrap_or_else(|| theme_for_name(&name, dungeon_type));
            Some(generate_dungeon(
                location_type,
                dungeon_type,
                theme,
                self.catalog,
                &self.config.dungeon,
                &mut ctx.rng,
            )?)
        } else {
            None
        };

        let parts = LocationParts {
            location_type,
            dungeon_type,
            position,
            name,
            exterior: Some(exterior),
            dungeon,
            capital: planned.capital,
            region_index: region.index,
        };
        assemble(parts, &mut ctx.ids, self.map)
    }

    /// A pixel with a water neighbour.
    fn is_coastal(&self, position: GridPosition) -> bool {
        position
            .cardinal_neighbors()
            .iter()
            .any(|n| self.map.terrain_height(n.x, n.y) < self.config.placement.min_terrain_height)
    }
}
