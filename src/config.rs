//! Configuration for location generation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

/// What to do when a single location cannot be generated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Drop the location, log it and keep going.
    #[default]
    SkipAndReport,
    /// Stop the region run with the error.
    Abort,
}

/// Top-level generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Half-width of the uniform density jitter (0.10 = ±10%). Zero disables it.
    pub density_jitter: f64,
    /// First location id handed out by the allocator (rounded up to even).
    pub first_location_id: u16,
    pub failure_policy: FailurePolicy,
    pub placement: PlacementConfig,
    pub naming: NamingConfig,
    pub settlement: SettlementConfig,
    pub dungeon: DungeonConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            density_jitter: 0.10,
            first_location_id: 2,
            failure_policy: FailurePolicy::SkipAndReport,
            placement: PlacementConfig::default(),
            naming: NamingConfig::default(),
            settlement: SettlementConfig::default(),
            dungeon: DungeonConfig::default(),
        }
    }
}

/// Placement engine parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Random surface samples allowed per location slot.
    pub max_attempts_per_slot: u32,
    /// Minimum distance between conflicting location types.
    pub conflict_tolerance: f64,
    /// Pixels below this terrain height are water.
    pub min_terrain_height: u8,
    /// Reproduce the early-break conflict scan instead of the full one.
    pub legacy_conflict_scan: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_slot: 20_000,
            conflict_tolerance: 1.5,
            min_terrain_height: 3,
            legacy_conflict_scan: false,
        }
    }
}

/// Name synthesizer parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Whole-name regenerations before giving up on uniqueness.
    pub max_attempts: u32,
    /// Re-rolls of a single grammar pass that produced a reserved name.
    pub grammar_attempts: u32,
    pub major_weight: u32,
    pub minor_weight: u32,
    /// Percent chance a temple is dedicated to the region's own deity.
    pub region_deity_chance: u32,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 500,
            grammar_attempts: 16,
            major_weight: 90,
            minor_weight: 10,
            region_deity_chance: 90,
        }
    }
}

/// Settlement shaping and exterior block selection parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Percent chance a non-capital city is walled.
    pub city_walled_chance: u32,
    /// Percent chance a coastal city or hamlet is a port.
    pub port_chance: u32,
    /// Palace percent per block of city area.
    pub palace_area_factor: u32,
    /// Extra palace percent for walled cities.
    pub walled_palace_bonus: u32,
    /// Highest numbered variant probed in the catalog.
    pub max_variant: u32,
    /// Prefix draws per cell before falling back to a residence.
    pub selection_attempts: u32,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            city_walled_chance: 50,
            port_chance: 30,
            palace_area_factor: 3,
            walled_palace_bonus: 10,
            max_variant: 99,
            selection_attempts: 64,
        }
    }
}

/// Dungeon diagram and block assignment parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Block draws allowed while growing a diagram.
    pub max_growth_attempts: u32,
    /// Diagrams at least this large may get a third theme.
    pub large_dungeon_blocks: usize,
    /// 1-in-N chance of the third theme.
    pub third_theme_odds: u32,
    /// Percent chance a wet-themed block is flooded.
    pub flooded_chance: u32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            max_growth_attempts: 512,
            large_dungeon_blocks: 10,
            third_theme_odds: 3,
            flooded_chance: 15,
        }
    }
}

impl GenerationConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: GenerationConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values that would make a retry loop unable to terminate sensibly.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.density_jitter) {
            return Err(GenerationError::config("density_jitter must be in [0, 1)"));
        }
        if self.placement.max_attempts_per_slot == 0 {
            return Err(GenerationError::config("placement.max_attempts_per_slot must be positive"));
        }
        if self.naming.max_attempts == 0 || self.naming.grammar_attempts == 0 {
            return Err(GenerationError::config("naming attempt limits must be positive"));
        }
        if self.naming.major_weight == 0 && self.naming.minor_weight == 0 {
            return Err(GenerationError::config("naming weights cannot both be zero"));
        }
        if self.settlement.max_variant == 0 || self.settlement.max_variant > 99 {
            return Err(GenerationError::config("settlement.max_variant must be in 1..=99"));
        }
        if self.dungeon.max_growth_attempts == 0 || self.dungeon.third_theme_odds == 0 {
            return Err(GenerationError::config("dungeon limits must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GenerationConfig::default();
        assert!((config.density_jitter - 0.10).abs() < f64::EPSILON);
        assert_eq!(config.placement.min_terrain_height, 3);
        assert!((config.placement.conflict_tolerance - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.naming.major_weight, 90);
        assert_eq!(config.naming.minor_weight, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GenerationConfig::from_toml_str(
            "density_jitter = 0.0\nfailure_policy = \"Abort\"\n\n[dungeon]\nthird_theme_odds = 5\n",
        )
        .unwrap();
        assert_eq!(config.density_jitter, 0.0);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.dungeon.third_theme_odds, 5);
        assert_eq!(config.dungeon.large_dungeon_blocks, 10);
        assert_eq!(config.placement, PlacementConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(GenerationConfig::from_toml_str("density_jitter = 1.5").is_err());
        assert!(GenerationConfig::from_toml_str("[placement]\nmax_attempts_per_slot = 0").is_err());
        assert!(GenerationConfig::from_toml_str("not toml at all = = =").is_err());
    }
}
