//! Block template catalog
//!
//! Exterior (RMB) and interior (RDB) block templates are looked up by name.
//! The generator only needs to know whether a name exists and which
//! buildings an exterior block holds.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dungeon::DungeonTheme;
use crate::error::{GenerationError, Result};

/// Kind of building inside an exterior block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuildingType {
    House,
    Manor,
    Farmhouse,
    Alchemist,
    Armorer,
    Bank,
    Bookseller,
    ClothingStore,
    FurnitureStore,
    GemStore,
    GeneralStore,
    Library,
    GuildHall,
    PawnShop,
    WeaponSmith,
    Temple,
    Shrine,
    Tavern,
    Palace,
    Special,
}

/// One building slot of a block template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingTemplate {
    pub faction_id: u16,
    pub sector: u16,
    pub building_type: BuildingType,
}

/// A named block template.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTemplate {
    #[serde(default)]
    pub buildings: Vec<BuildingTemplate>,
}

/// Lookup of block templates by name.
pub trait BlockCatalog {
    fn exists(&self, name: &str) -> bool;
    fn load(&self, name: &str) -> Result<BlockTemplate>;
}

/// Parsed exterior block name: `{PREFIX}{climate}{size}{NN}.RMB`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RmbName {
    pub prefix: String,
    pub climate: char,
    pub size: char,
    pub variant: u32,
}

impl RmbName {
    pub fn new(prefix: &str, climate: char, size: char, variant: u32) -> Self {
        Self {
            prefix: prefix.to_string(),
            climate,
            size,
            variant,
        }
    }

    /// Parse a name like `TEMPAL03.RMB`.
    pub fn parse(name: &str) -> Option<RmbName> {
        let stem = name.strip_suffix(".RMB")?;
        if stem.len() != 8 || !stem.is_ascii() {
            return None;
        }
        let prefix = &stem[0..4];
        let mut letters = stem[4..6].chars();
        let climate = letters.next()?;
        let size = letters.next()?;
        let variant = stem[6..8].parse().ok()?;
        Some(RmbName::new(prefix, climate, size, variant))
    }

    /// The name without its variant, e.g. `TEMPAL`.
    pub fn stem(&self) -> String {
        format!("{}{}{}", self.prefix, self.climate, self.size)
    }

    pub fn with_variant(&self, variant: u32) -> RmbName {
        RmbName { variant, ..self.clone() }
    }
}

impl fmt::Display for RmbName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}.RMB", self.stem(), self.variant)
    }
}

/// Number of contiguous variants `01..` present for a prefix/climate/size.
pub fn count_variants(
    catalog: &dyn BlockCatalog,
    prefix: &str,
    climate: char,
    size: char,
    max_variant: u32,
) -> u32 {
    let base = RmbName::new(prefix, climate, size, 1);
    let mut count = 0;
    while count < max_variant && catalog.exists(&base.with_variant(count + 1).to_string()) {
        count += 1;
    }
    count
}

/// Interior block name: `{letter}{NNNNNNN}.RDB`.
pub fn rdb_name(letter: char, number: u32) -> String {
    format!("{}{:07}.RDB", letter, number)
}

/// On-disk catalog manifest: template name to template.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogManifest {
    pub templates: BTreeMap<String, BlockTemplate>,
}

/// In-memory catalog.
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    templates: BTreeMap<String, BlockTemplate>,
}

/// Town block prefixes known to the stock catalog.
const TOWN_PREFIXES: &[&str] = &[
    "ALCH", "ARMR", "BANK", "BOOK", "CLOT", "DARK", "FIGH", "FURN", "GEMS", "GENR", "GRVE", "KNIG",
    "LIBR", "MAGE", "MARK", "PAWN", "RESI", "TEMP", "THIE", "TVRN", "WEAP",
];

/// Single-block exterior prefixes (size letter A only).
const SINGLE_PREFIXES: &[&str] =
    &["FARM", "MANR", "RESI", "TVRN", "TEMP", "SHRI", "GRVE", "CAST", "DUNG"];

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, template: BlockTemplate) {
        self.templates.insert(name.into(), template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|k| k.as_str())
    }

    /// Parse a JSON manifest.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let manifest: CatalogManifest = serde_json::from_str(text)?;
        Ok(Self {
            templates: manifest.templates,
        })
    }

    /// Load a JSON manifest from disk.
    pub fn from_manifest(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_manifest(&self) -> CatalogManifest {
        CatalogManifest {
            templates: self.templates.clone(),
        }
    }

    /// Stock catalog with every block family the generator can ask for.
    ///
    /// Some town combinations are deliberately absent (large banks, libraries,
    /// guild halls, gem stores and markets; medium and large bookshops; large
    /// graveyards; desert-green graveyards, dark brotherhoods, thieves' guilds
    /// and temples) so that name normalization has something to map.
    pub fn standard() -> Self {
        let mut catalog = Self::new();

        for &prefix in TOWN_PREFIXES {
            for climate in ['A', 'B', 'G'] {
                for size in ['L', 'M', 'S'] {
                    if !stock_combination_exists(prefix, climate, size) {
                        continue;
                    }
                    for variant in 1..=stock_variant_count(prefix, climate, size) {
                        let name = RmbName::new(prefix, climate, size, variant);
                        catalog.insert(name.to_string(), stock_template(prefix, variant));
                    }
                }
            }
        }

        for &prefix in SINGLE_PREFIXES {
            for climate in ['A', 'B', 'G'] {
                for variant in 1..=stock_variant_count(prefix, climate, 'A') {
                    let name = RmbName::new(prefix, climate, 'A', variant);
                    catalog.insert(name.to_string(), stock_template(prefix, variant));
                }
            }
        }

        for variant in 1..=12 {
            let name = RmbName::new("WALL", 'A', 'A', variant);
            catalog.insert(name.to_string(), BlockTemplate::default());
        }
        for climate in ['A', 'B', 'G'] {
            for variant in 1..=3 {
                let name = RmbName::new("PALA", climate, 'A', variant);
                catalog.insert(name.to_string(), stock_template("PALA", variant));
            }
            for variant in 1..=4 {
                let name = RmbName::new("FILL", climate, 'A', variant);
                catalog.insert(name.to_string(), BlockTemplate::default());
            }
        }

        for theme in DungeonTheme::all() {
            let pool = theme.pool();
            for number in pool.first..pool.first + pool.count {
                catalog.insert(rdb_name(pool.letter, number), BlockTemplate::default());
            }
        }

        catalog
    }
}

impl BlockCatalog for MemoryCatalog {
    fn exists(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    fn load(&self, name: &str) -> Result<BlockTemplate> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| GenerationError::catalog_miss(name))
    }
}

fn stock_combination_exists(prefix: &str, climate: char, size: char) -> bool {
    match (prefix, climate, size) {
        ("BANK" | "LIBR" | "MAGE" | "GEMS" | "MARK", _, 'L') => false,
        ("BOOK", _, 'M' | 'L') => false,
        ("GRVE", _, 'L') | ("GRVE", 'G', _) => false,
        ("DARK" | "THIE" | "TEMP", 'G', _) => false,
        _ => true,
    }
}

/// 1..=4 variants, stable per combination.
fn stock_variant_count(prefix: &str, climate: char, size: char) -> u32 {
    let letters: u32 = prefix.bytes().map(u32::from).sum();
    let sum = letters + climate as u32 * 3 + size as u32 * 7;
    1 + sum % 4
}

fn stock_template(prefix: &str, variant: u32) -> BlockTemplate {
    let main = match prefix {
        "ALCH" => BuildingType::Alchemist,
        "ARMR" => BuildingType::Armorer,
        "BANK" => BuildingType::Bank,
        "BOOK" => BuildingType::Bookseller,
        "CLOT" => BuildingType::ClothingStore,
        "FURN" => BuildingType::FurnitureStore,
        "GEMS" => BuildingType::GemStore,
        "GENR" | "MARK" => BuildingType::GeneralStore,
        "LIBR" => BuildingType::Library,
        "DARK" | "FIGH" | "KNIG" | "MAGE" | "THIE" => BuildingType::GuildHall,
        "PAWN" => BuildingType::PawnShop,
        "WEAP" => BuildingType::WeaponSmith,
        "TEMP" => BuildingType::Temple,
        "SHRI" | "GRVE" => BuildingType::Shrine,
        "TVRN" => BuildingType::Tavern,
        "PALA" | "CAST" => BuildingType::Palace,
        "MANR" => BuildingType::Manor,
        "FARM" => BuildingType::Farmhouse,
        "DUNG" => BuildingType::Special,
        _ => BuildingType::House,
    };
    let faction_id = match main {
        BuildingType::Temple | BuildingType::Shrine => 82,
        BuildingType::GuildHall => 40,
        BuildingType::Palace => 201,
        _ => 0,
    };

    let mut buildings = vec![BuildingTemplate {
        faction_id,
        sector: 0,
        building_type: main,
    }];
    for i in 0..(variant % 3) + 1 {
        buildings.push(BuildingTemplate {
            faction_id: 0,
            sector: (i + 1) as u16,
            building_type: BuildingType::House,
        });
    }
    BlockTemplate { buildings }
}
