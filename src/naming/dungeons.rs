//! Dungeon, cemetery and ruin names.

use rand::Rng;

use super::bank::{Gender, NameBank};
use super::dwellings::dwelling_name;
use super::grammar::pick;
use super::EpithetTables;
use crate::locations::{DungeonType, LocationType};
use crate::region::Regionalism;

fn titled<R: Rng>(epithets: &EpithetTables, gender: Gender, rng: &mut R) -> String {
    let titles = match gender {
        Gender::Male => &epithets.titles.male,
        Gender::Female => &epithets.titles.female,
    };
    pick(titles, rng).to_string()
}

/// Owner-and-epithet dungeon name. Untitled names only use the first two
/// templates.
fn owned_name<R: Rng>(
    owner: &str,
    gender: Gender,
    epithet: &str,
    allow_titles: bool,
    epithets: &EpithetTables,
    rng: &mut R,
) -> String {
    let templates = if allow_titles { 4 } else { 2 };
    match rng.gen_range(0..templates) {
        0 => format!("{}'s {}", owner, epithet),
        1 => format!("The {} of {}", epithet, owner),
        2 => format!("{} {}'s {}", titled(epithets, gender, rng), owner, epithet),
        _ => format!("The {} of {} {}", epithet, titled(epithets, gender, rng), owner),
    }
}

/// The template follows the drawn epithet word.
fn cemetery_name<R: Rng>(
    culture: Regionalism,
    bank: &dyn NameBank,
    epithets: &EpithetTables,
    rng: &mut R,
) -> String {
    let epithet = pick(&epithets.cemetery, rng);
    let family = bank.surname(culture, rng);
    match epithet {
        "Graves" => format!("{} Graves", family),
        "Crypts" | "Tombs" => format!("The {} {}", family, epithet),
        _ => format!("The {} of {}", epithet, family),
    }
}

fn ruin_name<R: Rng>(
    culture: Regionalism,
    bank: &dyn NameBank,
    epithets: &EpithetTables,
    rng: &mut R,
) -> String {
    let inner = if rng.gen_bool(0.5) {
        let homes = [LocationType::Farm, LocationType::WealthyHome, LocationType::PoorHome];
        let home = homes[rng.gen_range(0..homes.len())];
        dwelling_name(home, culture, bank, epithets, rng)
    } else {
        pick(&epithets.strongholds, rng).to_string()
    };
    match inner.strip_prefix("The ") {
        Some(rest) => format!("Ruins of the {}", rest),
        None => format!("Ruins of {}", inner),
    }
}

pub fn dungeon_name<R: Rng>(
    dungeon_type: DungeonType,
    culture: Regionalism,
    bank: &dyn NameBank,
    epithets: &EpithetTables,
    rng: &mut R,
) -> String {
    match dungeon_type {
        DungeonType::Cemetery => return cemetery_name(culture, bank, epithets, rng),
        DungeonType::RuinedCastle | DungeonType::NoDungeon => {
            return ruin_name(culture, bank, epithets, rng)
        }
        _ => {}
    }

    let list = epithets.dungeons.get(&dungeon_type).map(Vec::as_slice).unwrap_or(&[]);
    let epithet = pick(list, rng).to_string();
    match dungeon_type {
        DungeonType::SpiderNest
        | DungeonType::ScorpionNest
        | DungeonType::VolcanicCaves
        | DungeonType::DragonsDen => {
            let gender = Gender::random(rng);
            let monster = bank.monster_name(gender, rng);
            owned_name(&monster, gender, &epithet, false, epithets, rng)
        }
        DungeonType::Coven => {
            let owner = bank.first_name(culture, Gender::Female, rng);
            owned_name(&owner, Gender::Female, &epithet, true, epithets, rng)
        }
        _ => {
            let gender = Gender::random(rng);
            let owner = bank.first_name(culture, gender, rng);
            owned_name(&owner, gender, &epithet, true, epithets, rng)
        }
    }
}
