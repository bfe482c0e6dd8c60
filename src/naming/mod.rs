//! Procedural location names
//!
//! Each location type routes to its own template family. Town names come
//! from per-culture grammars; dwellings, dungeons and shrines combine name
//! bank entries with epithet tables. Every candidate is checked against the
//! region's taken names and regenerated until unique.

pub mod bank;
pub mod dungeons;
pub mod dwellings;
pub mod grammar;
pub mod religion;

pub use bank::{Gender, GenderedNames, NameBank, TableNameBank};
pub use grammar::NameGrammar;

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::NamingConfig;
use crate::dungeon::{theme_for_name, DungeonTheme};
use crate::error::{GenerationError, Result};
use crate::locations::{DungeonType, LocationType};
use crate::region::{RegionDescriptor, Regionalism};

/// Epithet, title and phrase lists used by the non-town templates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpithetTables {
    pub dwellings: BTreeMap<LocationType, Vec<String>>,
    pub dungeons: BTreeMap<DungeonType, Vec<String>>,
    pub titles: GenderedNames,
    /// Epithets for "The {epithet} of {family}" cemeteries.
    pub cemetery: Vec<String>,
    /// Generic stronghold names used for ruins.
    pub strongholds: Vec<String>,
    pub temple_adjectives: Vec<String>,
    pub temple_nouns: Vec<String>,
    pub shrines: Vec<String>,
    pub tavern_adjectives: Vec<String>,
    pub tavern_nouns: Vec<String>,
}

/// A generated name, with the dungeon theme its keywords imply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedName {
    pub text: String,
    pub theme: Option<DungeonTheme>,
}

/// Pick the naming culture for one location.
///
/// Draws `pick` in `1..=majors × major_weight + minors × minor_weight`; the
/// low band indexes the major cultures, the rest the minor ones. A region
/// without declared cultures names everything in the High Rock style.
pub fn choose_culture<R: Rng>(
    region: &RegionDescriptor,
    config: &NamingConfig,
    rng: &mut R,
) -> Regionalism {
    let majors = &region.major_regionalisms;
    let minors = &region.minor_regionalisms;
    let major_band = majors.len() as u32 * config.major_weight;
    let total = major_band + minors.len() as u32 * config.minor_weight;
    if total == 0 {
        return Regionalism::HighRockVanilla;
    }

    let pick = rng.gen_range(1..=total);
    if pick <= major_band {
        majors[((pick - 1) / config.major_weight) as usize]
    } else {
        minors[((pick - major_band - 1) / config.minor_weight) as usize]
    }
}

pub struct NameSynthesizer<'a> {
    grammars: &'a BTreeMap<Regionalism, NameGrammar>,
    epithets: &'a EpithetTables,
    bank: &'a dyn NameBank,
    config: &'a NamingConfig,
}

impl<'a> NameSynthesizer<'a> {
    pub fn new(
        grammars: &'a BTreeMap<Regionalism, NameGrammar>,
        epithets: &'a EpithetTables,
        bank: &'a dyn NameBank,
        config: &'a NamingConfig,
    ) -> Self {
        Self {
            grammars,
            epithets,
            bank,
            config,
        }
    }

    /// Grammar of a culture. High Rock Modern shares the vanilla tables
    /// unless it has its own.
    fn grammar(&self, culture: Regionalism) -> Option<&'a NameGrammar> {
        self.grammars.get(&culture).or_else(|| {
            if culture.is_high_rock() {
                self.grammars.get(&Regionalism::HighRockVanilla)
            } else {
                None
            }
        })
    }

    /// One candidate, not yet checked for uniqueness.
    fn candidate<R: Rng>(
        &self,
        location_type: LocationType,
        dungeon_type: DungeonType,
        region: &RegionDescriptor,
        rng: &mut R,
    ) -> Option<String> {
        let culture = choose_culture(region, self.config, rng);
        let name = match location_type {
            LocationType::City | LocationType::Hamlet | LocationType::Village => {
                self.grammar(culture)?.town_name(culture, self.config.grammar_attempts, rng)?
            }
            LocationType::Farm | LocationType::WealthyHome | LocationType::PoorHome => {
                dwellings::dwelling_name(location_type, culture, self.bank, self.epithets, rng)
            }
            LocationType::Tavern => religion::tavern_name(self.epithets, rng),
            LocationType::Temple => {
                let chance = self.config.region_deity_chance;
                religion::temple_name(region.deity, chance, self.epithets, rng)
            }
            LocationType::Cult => religion::cult_name(self.epithets, rng),
            LocationType::Coven
            | LocationType::Graveyard
            | LocationType::DungeonRuin
            | LocationType::DungeonKeep
            | LocationType::DungeonLabyrinth => {
                dungeons::dungeon_name(dungeon_type, culture, self.bank, self.epithets, rng)
            }
            LocationType::YourShips | LocationType::None => return None,
        };
        let name = name.trim().to_string();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Generate a name absent from `taken`.
    pub fn generate<R: Rng>(
        &self,
        location_type: LocationType,
        dungeon_type: DungeonType,
        region: &RegionDescriptor,
        taken: &BTreeSet<String>,
        rng: &mut R,
    ) -> Result<GeneratedName> {
        for _ in 0..self.config.max_attempts {
            let Some(text) = self.candidate(location_type, dungeon_type, region, rng) else {
                continue;
            };
            if taken.contains(&text) {
                continue;
            }
            let theme = location_type
                .has_dungeon()
                .then(|| theme_for_name(&text, dungeon_type));
            return Ok(GeneratedName { text, theme });
        }
        Err(GenerationError::NameExhausted {
            location_type,
            attempts: self.config.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Government;
    use crate::test_support::fixture_data;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn region(majors: Vec<Regionalism>, minors: Vec<Regionalism>) -> RegionDescriptor {
        RegionDescriptor {
            index: 0,
            name: "Glenpoint".to_string(),
            government: Government::Kingdom,
            climate_pixels: BTreeMap::new(),
            surface_pixels: 0,
            deity: crate::region::Deity::Arkay,
            major_regionalisms: majors,
            minor_regionalisms: minors,
        }
    }

    #[test]
    fn test_culture_bands() {
        let config = NamingConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let r = region(vec![Regionalism::Skyrim], vec![Regionalism::Reachmen]);
        let mut counts = BTreeMap::new();
        for _ in 0..10_000 {
            *counts.entry(choose_culture(&r, &config, &mut rng)).or_insert(0u32) += 1;
        }
        let skyrim = counts[&Regionalism::Skyrim];
        assert!((8_700..=9_300).contains(&skyrim), "skyrim picked {} times", skyrim);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_no_cultures_defaults_to_high_rock() {
        let config = NamingConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let r = region(Vec::new(), Vec::new());
        assert_eq!(choose_culture(&r, &config, &mut rng), Regionalism::HighRockVanilla);
    }

    #[test]
    fn test_names_unique_against_taken_set() {
        let data = fixture_data();
        let config = NamingConfig::default();
        let synth = NameSynthesizer::new(&data.grammars, &data.epithets, &data.bank, &config);
        let r = region(vec![Regionalism::HighRockVanilla], Vec::new());
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut taken = BTreeSet::new();
        for _ in 0..100 {
            let name = synth
                .generate(LocationType::Hamlet, DungeonType::NoDungeon, &r, &taken, &mut rng)
                .unwrap();
            assert!(name.theme.is_none());
            assert_ne!(name.text, "Daggerfall");
            assert_ne!(name.text, "Wayrest");
            assert!(taken.insert(name.text));
        }
    }

    #[test]
    fn test_dungeon_names_carry_theme() {
        let data = fixture_data();
        let config = NamingConfig::default();
        let synth = NameSynthesizer::new(&data.grammars, &data.epithets, &data.bank, &config);
        let r = region(vec![Regionalism::Hammerfell], Vec::new());
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let name = synth
            .generate(LocationType::DungeonKeep, DungeonType::Crypt, &r, &BTreeSet::new(), &mut rng)
            .unwrap();
        assert_eq!(name.theme, Some(theme_for_name(&name.text, DungeonType::Crypt)));
    }

    #[test]
    fn test_exhausted_names() {
        let data = fixture_data();
        let config = NamingConfig { max_attempts: 20, ..NamingConfig::default() };
        let synth = NameSynthesizer::new(&data.grammars, &data.epithets, &data.bank, &config);
        let r = region(Vec::new(), Vec::new());
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let taken: BTreeSet<String> = data.epithets.shrines.iter().cloned().collect();
        let (ty, dungeon) = (LocationType::Cult, DungeonType::NoDungeon);
        let result = synth.generate(ty, dungeon, &r, &taken, &mut rng);
        assert!(matches!(
            result,
            Err(GenerationError::NameExhausted { location_type: LocationType::Cult, attempts: 20 })
        ));
    }
}
