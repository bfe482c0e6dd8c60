//! Location type tags, grid positions and the assembled location records.

use serde::{Deserialize, Serialize};

use crate::dungeon::DungeonTheme;
use crate::region::Climate;
use crate::settlement::TownShape;

/// Kind of location placed on the region map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LocationType {
    City,
    Hamlet,
    Village,
    Farm,
    WealthyHome,
    PoorHome,
    /// Player ship anchorage; never generated.
    YourShips,
    Tavern,
    Temple,
    Cult,
    Coven,
    Graveyard,
    DungeonRuin,
    DungeonKeep,
    DungeonLabyrinth,
    /// Sentinel for "no location"; never generated.
    None,
}

impl LocationType {
    pub fn all() -> &'static [LocationType] {
        &[
            LocationType::City,
            LocationType::Hamlet,
            LocationType::Village,
            LocationType::Farm,
            LocationType::WealthyHome,
            LocationType::PoorHome,
            LocationType::YourShips,
            LocationType::Tavern,
            LocationType::Temple,
            LocationType::Cult,
            LocationType::Coven,
            LocationType::Graveyard,
            LocationType::DungeonRuin,
            LocationType::DungeonKeep,
            LocationType::DungeonLabyrinth,
            LocationType::None,
        ]
    }

    /// Types the density planner and placement engine work with.
    pub fn placeable() -> impl Iterator<Item = LocationType> {
        Self::all().iter().copied().filter(|t| !t.is_sentinel())
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, LocationType::YourShips | LocationType::None)
    }

    /// Multi-block settlements with a shaped exterior grid.
    pub fn is_town(&self) -> bool {
        matches!(self, LocationType::City | LocationType::Hamlet | LocationType::Village)
    }

    pub fn is_dwelling(&self) -> bool {
        matches!(
            self,
            LocationType::Farm | LocationType::WealthyHome | LocationType::PoorHome
        )
    }

    /// Locations that carry an interior dungeon layout.
    pub fn has_dungeon(&self) -> bool {
        matches!(
            self,
            LocationType::Coven
                | LocationType::Graveyard
                | LocationType::DungeonRuin
                | LocationType::DungeonKeep
                | LocationType::DungeonLabyrinth
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LocationType::City => "City",
            LocationType::Hamlet => "Hamlet",
            LocationType::Village => "Village",
            LocationType::Farm => "Farm",
            LocationType::WealthyHome => "Wealthy Home",
            LocationType::PoorHome => "Poor Home",
            LocationType::YourShips => "Your Ships",
            LocationType::Tavern => "Tavern",
            LocationType::Temple => "Temple",
            LocationType::Cult => "Cult",
            LocationType::Coven => "Coven",
            LocationType::Graveyard => "Graveyard",
            LocationType::DungeonRuin => "Dungeon Ruin",
            LocationType::DungeonKeep => "Dungeon Keep",
            LocationType::DungeonLabyrinth => "Labyrinth",
            LocationType::None => "None",
        }
    }
}

/// Dungeon sub-type, driving name routing and the type theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DungeonType {
    Crypt,
    OrcStronghold,
    HumanStronghold,
    Prison,
    DesecratedTemple,
    Mine,
    NaturalCave,
    Coven,
    VampireHaunt,
    Laboratory,
    HarpyNest,
    RuinedCastle,
    SpiderNest,
    GiantStronghold,
    DragonsDen,
    BarbarianStronghold,
    VolcanicCaves,
    ScorpionNest,
    Cemetery,
    NoDungeon,
}

impl DungeonType {
    pub fn all() -> &'static [DungeonType] {
        &[
            DungeonType::Crypt,
            DungeonType::OrcStronghold,
            DungeonType::HumanStronghold,
            DungeonType::Prison,
            DungeonType::DesecratedTemple,
            DungeonType::Mine,
            DungeonType::NaturalCave,
            DungeonType::Coven,
            DungeonType::VampireHaunt,
            DungeonType::Laboratory,
            DungeonType::HarpyNest,
            DungeonType::RuinedCastle,
            DungeonType::SpiderNest,
            DungeonType::GiantStronghold,
            DungeonType::DragonsDen,
            DungeonType::BarbarianStronghold,
            DungeonType::VolcanicCaves,
            DungeonType::ScorpionNest,
            DungeonType::Cemetery,
            DungeonType::NoDungeon,
        ]
    }

    /// Dungeon sub-types a location type draws from when it carries a dungeon.
    pub fn candidates_for(location_type: LocationType) -> &'static [DungeonType] {
        match location_type {
            LocationType::Coven => &[DungeonType::Coven],
            LocationType::Graveyard => &[DungeonType::Cemetery],
            LocationType::DungeonRuin => &[
                DungeonType::Crypt,
                DungeonType::NaturalCave,
                DungeonType::Mine,
                DungeonType::HarpyNest,
                DungeonType::SpiderNest,
                DungeonType::ScorpionNest,
                DungeonType::RuinedCastle,
                DungeonType::DesecratedTemple,
            ],
            LocationType::DungeonKeep => &[
                DungeonType::HumanStronghold,
                DungeonType::OrcStronghold,
                DungeonType::GiantStronghold,
                DungeonType::BarbarianStronghold,
                DungeonType::RuinedCastle,
                DungeonType::VampireHaunt,
                DungeonType::Laboratory,
                DungeonType::Prison,
            ],
            LocationType::DungeonLabyrinth => &[
                DungeonType::Crypt,
                DungeonType::OrcStronghold,
                DungeonType::HumanStronghold,
                DungeonType::Prison,
                DungeonType::DesecratedTemple,
                DungeonType::Mine,
                DungeonType::NaturalCave,
                DungeonType::VampireHaunt,
                DungeonType::Laboratory,
                DungeonType::GiantStronghold,
                DungeonType::DragonsDen,
                DungeonType::BarbarianStronghold,
                DungeonType::VolcanicCaves,
            ],
            _ => &[DungeonType::NoDungeon],
        }
    }
}

/// Integer pixel on the world map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    /// Marks a surface slot that has been consumed, or a location not yet placed.
    pub const UNASSIGNED: GridPosition = GridPosition { x: -1, y: -1 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_assigned(&self) -> bool {
        *self != Self::UNASSIGNED
    }

    pub fn distance(&self, other: &GridPosition) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// The four cardinal neighbours (N, E, S, W).
    pub fn cardinal_neighbors(&self) -> [GridPosition; 4] {
        [
            GridPosition::new(self.x, self.y - 1),
            GridPosition::new(self.x + 1, self.y),
            GridPosition::new(self.x, self.y + 1),
            GridPosition::new(self.x - 1, self.y),
        ]
    }
}

impl std::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One building inside an exterior block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub name_seed: u16,
    pub faction_id: u16,
    pub sector: u16,
    pub building_type: crate::catalog::BuildingType,
    pub quality: u8,
}

/// Exterior block grid of a location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExteriorLayout {
    pub width: u8,
    pub height: u8,
    pub shape: TownShape,
    /// RMB template names, row-major (`y * width + x`).
    pub blocks: Vec<String>,
    /// Buildings of each block, parallel to `blocks`.
    pub buildings: Vec<Vec<Building>>,
    pub port: bool,
    pub walled: bool,
    pub palace: bool,
}

impl ExteriorLayout {
    pub fn block_at(&self, x: u8, y: u8) -> Option<&str> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.blocks
            .get(y as usize * self.width as usize + x as usize)
            .map(|s| s.as_str())
    }
}

/// One interior block of a dungeon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonBlock {
    pub x: i32,
    pub z: i32,
    pub name: String,
    pub theme: DungeonTheme,
    pub is_start: bool,
    pub border: bool,
    pub water_level: i16,
    pub castle_block: bool,
}

/// Interior block graph of a dungeon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DungeonLayout {
    pub dungeon_type: DungeonType,
    pub name_theme: DungeonTheme,
    pub type_theme: DungeonTheme,
    pub blocks: Vec<DungeonBlock>,
}

impl DungeonLayout {
    /// Blocks that belong to the diagram proper (not border fill).
    pub fn interior_blocks(&self) -> impl Iterator<Item = &DungeonBlock> {
        self.blocks.iter().filter(|b| !b.border)
    }

    pub fn start_block(&self) -> Option<&DungeonBlock> {
        self.blocks.iter().find(|b| b.is_start)
    }
}

/// A fully assembled location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub location_type: LocationType,
    pub dungeon_type: DungeonType,
    pub position: GridPosition,
    pub map_id: u64,
    pub latitude: i32,
    pub longitude: i32,
    pub location_id: u16,
    pub name: String,
    pub exterior: Option<ExteriorLayout>,
    pub dungeon: Option<DungeonLayout>,
    pub climate: Climate,
    pub politics: i32,
    pub region_index: i32,
    pub capital: bool,
    /// Sequential index within the region after the final map-id sort.
    pub index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeable_excludes_sentinels() {
        let placeable: Vec<LocationType> = LocationType::placeable().collect();
        assert_eq!(placeable.len(), LocationType::all().len() - 2);
        assert!(!placeable.contains(&LocationType::YourShips));
        assert!(!placeable.contains(&LocationType::None));
    }

    #[test]
    fn test_grid_position_sentinel_and_distance() {
        assert!(!GridPosition::UNASSIGNED.is_assigned());
        assert!(GridPosition::new(0, 0).is_assigned());
        let a = GridPosition::new(1, 1);
        let b = GridPosition::new(2, 2);
        assert!((a.distance(&b) - 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_dungeon_candidates_cover_dungeon_types() {
        for ty in LocationType::placeable().filter(|t| t.has_dungeon()) {
            let candidates = DungeonType::candidates_for(ty);
            assert!(!candidates.is_empty(), "{:?} has no dungeon types", ty);
            assert!(!candidates.contains(&DungeonType::NoDungeon));
        }
        assert_eq!(DungeonType::candidates_for(LocationType::Farm), &[DungeonType::NoDungeon]);
    }
}
