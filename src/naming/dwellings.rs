//! Farm, manor and cottage names.

use rand::Rng;

use super::bank::{Gender, NameBank};
use super::grammar::pick;
use super::EpithetTables;
use crate::locations::LocationType;
use crate::region::Regionalism;

/// Family name used in dwelling names. Hammerfell houses go by a given name.
fn family_name<R: Rng>(bank: &dyn NameBank, culture: Regionalism, rng: &mut R) -> String {
    if culture == Regionalism::Hammerfell {
        let gender = Gender::random(rng);
        bank.first_name(culture, gender, rng)
    } else {
        bank.surname(culture, rng)
    }
}

pub fn dwelling_name<R: Rng>(
    location_type: LocationType,
    culture: Regionalism,
    bank: &dyn NameBank,
    epithets: &EpithetTables,
    rng: &mut R,
) -> String {
    let list = epithets.dwellings.get(&location_type).map(Vec::as_slice).unwrap_or(&[]);
    let epithet = pick(list, rng).to_string();
    match rng.gen_range(0..4) {
        0 => format!("The {} {}", family_name(bank, culture, rng), epithet),
        1 => format!("{} {}", family_name(bank, culture, rng), epithet),
        2 => {
            let gender = Gender::random(rng);
            format!("Old {}'s {}", bank.first_name(culture, gender, rng), epithet)
        }
        _ => format!("The Old {} {}", family_name(bank, culture, rng), epithet),
    }
}
