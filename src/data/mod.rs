//! Data-driven name tables.
//!
//! Loads town grammars, the personal name bank and epithet tables from JSON.
//! Defaults are embedded in the binary via `include_str!`; a data directory
//! can override any of the files.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::Result;
use crate::naming::{EpithetTables, NameGrammar, TableNameBank};
use crate::region::Regionalism;

// Embedded default data files
const DEFAULT_GRAMMARS_JSON: &str = include_str!("../../data/defaults/name_grammars.json");
const DEFAULT_NAME_BANK_JSON: &str = include_str!("../../data/defaults/name_bank.json");
const DEFAULT_EPITHETS_JSON: &str = include_str!("../../data/defaults/epithets.json");

/// Read-only naming tables, loaded once per run.
#[derive(Clone, Debug)]
pub struct LocationData {
    /// Town grammars keyed by culture.
    pub grammars: BTreeMap<Regionalism, NameGrammar>,
    pub bank: TableNameBank,
    pub epithets: EpithetTables,
}

impl LocationData {
    /// Load from the embedded defaults.
    pub fn defaults() -> Result<Self> {
        Ok(Self {
            grammars: serde_json::from_str(DEFAULT_GRAMMARS_JSON)?,
            bank: serde_json::from_str(DEFAULT_NAME_BANK_JSON)?,
            epithets: serde_json::from_str(DEFAULT_EPITHETS_JSON)?,
        })
    }

    /// Load from a directory, merging with embedded defaults.
    ///
    /// Files present in the directory replace the corresponding default
    /// table. Missing files fall back to defaults; unreadable ones are logged
    /// and skipped.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut data = Self::defaults()?;

        if let Some(grammars) = read_override(dir, "name_grammars.json") {
            data.grammars = grammars;
        }
        if let Some(bank) = read_override(dir, "name_bank.json") {
            data.bank = bank;
        }
        if let Some(epithets) = read_override(dir, "epithets.json") {
            data.epithets = epithets;
        }

        Ok(data)
    }
}

fn read_override<T: DeserializeOwned>(dir: &Path, file: &str) -> Option<T> {
    let path = dir.join(file);
    if !path.exists() {
        return None;
    }
    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(value) => {
            info!("loaded {} from {}", file, dir.display());
            Some(value)
        }
        Err(e) => {
            warn!("failed to parse {}: {}, using defaults", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::{DungeonType, LocationType};

    #[test]
    fn test_defaults_load() {
        let data = LocationData::defaults().unwrap();
        assert!(data.grammars.contains_key(&Regionalism::HighRockVanilla));
        assert!(data.grammars.contains_key(&Regionalism::Hammerfell));
        assert!(!data.bank.monsters.female.is_empty());
        assert_eq!(data.epithets.dwellings.len(), 3);
        for ty in LocationType::placeable().filter(|t| t.is_dwelling()) {
            assert!(data.epithets.dwellings.contains_key(&ty), "{:?} has no epithets", ty);
        }
        for ty in DungeonType::all() {
            let named_elsewhere = matches!(
                ty,
                DungeonType::Cemetery | DungeonType::RuinedCastle | DungeonType::NoDungeon
            );
            assert!(
                named_elsewhere || data.epithets.dungeons.contains_key(ty),
                "{:?} has no epithets",
                ty
            );
        }
    }

    #[test]
    fn test_high_rock_grammar_can_spell_reserved_names() {
        let data = LocationData::defaults().unwrap();
        let grammar = &data.grammars[&Regionalism::HighRockVanilla];
        assert!(grammar.prefixes.iter().any(|p| p == "Dagger"));
        assert!(grammar.suffix1.iter().any(|s| s == "fall"));
    }

    #[test]
    fn test_directory_override_and_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("epithets.json"),
            r#"{"tavern_adjectives": ["Soggy"], "tavern_nouns": ["Boot"]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("name_bank.json"), "{ not json").unwrap();

        let data = LocationData::load_from(dir.path()).unwrap();
        assert_eq!(data.epithets.tavern_adjectives, vec!["Soggy".to_string()]);
        assert!(data.epithets.shrines.is_empty());
        assert_eq!(data.bank, LocationData::defaults().unwrap().bank);
    }
}
