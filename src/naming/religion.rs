//! Temple, shrine and tavern names.

use rand::Rng;

use super::grammar::pick;
use super::EpithetTables;
use crate::region::Deity;

/// "{Adjective} {Noun} of {Deity}". The region's own deity is used
/// `region_deity_chance` percent of the time, another Divine otherwise.
pub fn temple_name<R: Rng>(
    region_deity: Deity,
    region_deity_chance: u32,
    epithets: &EpithetTables,
    rng: &mut R,
) -> String {
    let adjective = pick(&epithets.temple_adjectives, rng).to_string();
    let noun = pick(&epithets.temple_nouns, rng).to_string();
    let deity = if rng.gen_range(1..=100) <= region_deity_chance {
        region_deity
    } else {
        let others: Vec<Deity> =
            Deity::all().iter().copied().filter(|d| *d != region_deity).collect();
        others[rng.gen_range(0..others.len())]
    };
    format!("{} {} of {}", adjective, noun, deity.name())
}

pub fn cult_name<R: Rng>(epithets: &EpithetTables, rng: &mut R) -> String {
    pick(&epithets.shrines, rng).to_string()
}

pub fn tavern_name<R: Rng>(epithets: &EpithetTables, rng: &mut R) -> String {
    let adjective = pick(&epithets.tavern_adjectives, rng).to_string();
    format!("The {} {}", adjective, pick(&epithets.tavern_nouns, rng))
}
