//! Dungeon block themes and the interior block pools they draw from.

use serde::{Deserialize, Serialize};

use crate::locations::DungeonType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DungeonTheme {
    Castle,
    Tower,
    HarpyNest,
    Nest,
    Den,
    Cave,
    Mine,
    Haunt,
    Laboratory,
    Coven,
    Temple,
    Crypt,
    Prison,
    Ruins,
    RuinedHome,
    Cemetery,
    /// Filler around the edge of a diagram.
    Border,
}

/// Contiguous range of RDB block numbers under one letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemePool {
    pub letter: char,
    pub first: u32,
    pub count: u32,
}

impl DungeonTheme {
    pub fn all() -> &'static [DungeonTheme] {
        &[
            DungeonTheme::Castle,
            DungeonTheme::Tower,
            DungeonTheme::HarpyNest,
            DungeonTheme::Nest,
            DungeonTheme::Den,
            DungeonTheme::Cave,
            DungeonTheme::Mine,
            DungeonTheme::Haunt,
            DungeonTheme::Laboratory,
            DungeonTheme::Coven,
            DungeonTheme::Temple,
            DungeonTheme::Crypt,
            DungeonTheme::Prison,
            DungeonTheme::Ruins,
            DungeonTheme::RuinedHome,
            DungeonTheme::Cemetery,
            DungeonTheme::Border,
        ]
    }

    pub fn pool(&self) -> ThemePool {
        let (letter, first, count) = match self {
            DungeonTheme::Castle => ('N', 0, 10),
            DungeonTheme::Tower => ('N', 10, 5),
            DungeonTheme::HarpyNest => ('N', 15, 3),
            DungeonTheme::Nest => ('N', 18, 4),
            DungeonTheme::Den => ('N', 22, 4),
            DungeonTheme::Cave => ('N', 26, 8),
            DungeonTheme::Mine => ('N', 34, 5),
            DungeonTheme::Haunt => ('N', 39, 5),
            DungeonTheme::Laboratory => ('N', 44, 4),
            DungeonTheme::Coven => ('N', 48, 4),
            DungeonTheme::Temple => ('N', 52, 6),
            DungeonTheme::Crypt => ('N', 58, 8),
            DungeonTheme::Prison => ('N', 66, 5),
            DungeonTheme::Ruins => ('N', 71, 6),
            DungeonTheme::RuinedHome => ('N', 77, 3),
            DungeonTheme::Cemetery => ('S', 0, 3),
            DungeonTheme::Border => ('B', 0, 10),
        };
        ThemePool { letter, first, count }
    }

    /// Themes whose blocks may be flooded.
    pub fn is_wet(&self) -> bool {
        matches!(
            self,
            DungeonTheme::Cave
                | DungeonTheme::Den
                | DungeonTheme::Mine
                | DungeonTheme::Nest
                | DungeonTheme::Crypt
                | DungeonTheme::Prison
        )
    }

    /// Themes an independent third theme may be drawn from.
    pub fn third_theme_candidates(exclude: &[DungeonTheme]) -> Vec<DungeonTheme> {
        Self::all()
            .iter()
            .copied()
            .filter(|t| !matches!(t, DungeonTheme::Cemetery | DungeonTheme::Border))
            .filter(|t| !exclude.contains(t))
            .collect()
    }
}

#[rustfmt::skip]
const DWELLING_KEYWORDS: &[&str] = &[
    "Farm", "Grange", "Homestead", "Estate", "Cottage", "Hovel", "Shack", "Hut", "Villa", "Court",
    "Hall", "Acres",
];

/// Theme implied by a dungeon's generated name.
pub fn theme_for_name(name: &str, dungeon_type: DungeonType) -> DungeonTheme {
    let has = |words: &[&str]| words.iter().any(|w| name.contains(w));

    if has(&["Castle", "Citadel", "Hold", "Guard", "Fortress", "Stronghold"]) {
        DungeonTheme::Castle
    } else if has(&["Tower"]) {
        DungeonTheme::Tower
    } else if has(&["Nest", "Web"]) {
        if dungeon_type == DungeonType::HarpyNest {
            DungeonTheme::HarpyNest
        } else {
            DungeonTheme::Nest
        }
    } else if has(&["Den", "Lair"]) {
        DungeonTheme::Den
    } else if has(&["Cave", "Grotto", "Hole"]) {
        DungeonTheme::Cave
    } else if has(&["Mine", "Pit", "Shaft", "Delve"]) {
        DungeonTheme::Mine
    } else if has(&["Haunt", "House", "Manor"]) {
        DungeonTheme::Haunt
    } else if has(&["Assembly", "Council", "Conclave", "Laboratory"]) {
        DungeonTheme::Laboratory
    } else if has(&["Coven", "Cult", "Sisterhood", "Brotherhood", "Circle"]) {
        DungeonTheme::Coven
    } else if has(&["Temple", "Monastery", "Shrine", "Abbey", "Cloister"]) {
        DungeonTheme::Temple
    } else if has(&["Crypt", "Tomb", "Catacomb", "Sepulcher", "Mausoleum", "Barrow"]) {
        DungeonTheme::Crypt
    } else if has(&["Prison", "Gaol", "Jail", "Dungeon", "Cells"]) {
        DungeonTheme::Prison
    } else if name.starts_with("Ruins of ") {
        if has(DWELLING_KEYWORDS) {
            DungeonTheme::RuinedHome
        } else {
            DungeonTheme::Ruins
        }
    } else if has(&["Cemetery", "Graves", "Graveyard", "Burial"]) {
        DungeonTheme::Cemetery
    } else {
        DungeonTheme::Castle
    }
}

/// Theme implied by the dungeon type alone.
pub fn theme_for_type(dungeon_type: DungeonType) -> DungeonTheme {
    match dungeon_type {
        DungeonType::Crypt => DungeonTheme::Crypt,
        DungeonType::OrcStronghold
        | DungeonType::HumanStronghold
        | DungeonType::GiantStronghold
        | DungeonType::BarbarianStronghold
        | DungeonType::NoDungeon => DungeonTheme::Castle,
        DungeonType::Prison => DungeonTheme::Prison,
        DungeonType::DesecratedTemple => DungeonTheme::Temple,
        DungeonType::Mine => DungeonTheme::Mine,
        DungeonType::NaturalCave => DungeonTheme::Cave,
        DungeonType::Coven => DungeonTheme::Coven,
        DungeonType::VampireHaunt => DungeonTheme::Haunt,
        DungeonType::Laboratory => DungeonTheme::Laboratory,
        DungeonType::HarpyNest => DungeonTheme::HarpyNest,
        DungeonType::RuinedCastle => DungeonTheme::Ruins,
        DungeonType::SpiderNest | DungeonType::ScorpionNest => DungeonTheme::Nest,
        DungeonType::DragonsDen | DungeonType::VolcanicCaves => DungeonTheme::Den,
        DungeonType::Cemetery => DungeonTheme::Cemetery,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_order() {
        use DungeonType::{Cemetery, Crypt, DragonsDen};
        assert_eq!(theme_for_name("Castle Tower", Crypt), DungeonTheme::Castle);
        assert_eq!(theme_for_name("The Tower of Vanech", Crypt), DungeonTheme::Tower);
        assert_eq!(theme_for_name("Gorm's Lair", DragonsDen), DungeonTheme::Den);
        assert_eq!(theme_for_name("The Barrow of Lord Ulf", Crypt), DungeonTheme::Crypt);
        assert_eq!(theme_for_name("Ashford Graves", Cemetery), DungeonTheme::Cemetery);
        assert_eq!(theme_for_name("Mhuk's Rest", Crypt), DungeonTheme::Castle);
    }

    #[test]
    fn test_nest_depends_on_type() {
        let harpy = theme_for_name("The Nest of Sela", DungeonType::HarpyNest);
        assert_eq!(harpy, DungeonTheme::HarpyNest);
        assert_eq!(theme_for_name("The Nest of Sela", DungeonType::SpiderNest), DungeonTheme::Nest);
    }

    #[test]
    fn test_ruins_split_on_dwelling_keywords() {
        let home = theme_for_name("Ruins of Ashford Grange", DungeonType::RuinedCastle);
        assert_eq!(home, DungeonTheme::RuinedHome);
        let keep = theme_for_name("Ruins of the Blackmoor", DungeonType::RuinedCastle);
        assert_eq!(keep, DungeonTheme::Ruins);
    }

    #[test]
    fn test_pools_do_not_overlap() {
        let mut seen = std::collections::BTreeSet::new();
        for theme in DungeonTheme::all() {
            let pool = theme.pool();
            assert!(pool.count > 0);
            for n in pool.first..pool.first + pool.count {
                let fresh = seen.insert((pool.letter, n));
                assert!(fresh, "{:?} overlaps at {}{}", theme, pool.letter, n);
            }
        }
    }

    #[test]
    fn test_third_theme_candidates_exclude_special() {
        let used = [DungeonTheme::Castle, DungeonTheme::Crypt];
        let candidates = DungeonTheme::third_theme_candidates(&used);
        assert!(!candidates.contains(&DungeonTheme::Castle));
        assert!(!candidates.contains(&DungeonTheme::Crypt));
        assert!(!candidates.contains(&DungeonTheme::Cemetery));
        assert!(!candidates.contains(&DungeonTheme::Border));
        assert_eq!(candidates.len(), DungeonTheme::all().len() - 4);
    }
}
