//! Settlement dimensions and outline refinement.

use rand::Rng;

use super::{SettlementSize, TownShape};
use crate::locations::LocationType;
use crate::placement::CapitalRequest;

fn city_dimension(roll: u32) -> u8 {
    match roll {
        0..=80 => 4,
        81..=95 => 5,
        _ => 6,
    }
}

fn hamlet_dimension(roll: u32) -> u8 {
    match roll {
        0..=60 => 2,
        61..=90 => 3,
        _ => 4,
    }
}

fn village_dimension(roll: u32) -> u8 {
    match roll {
        0..=60 => 1,
        61..=90 => 2,
        _ => 3,
    }
}

fn chance<R: Rng + ?Sized>(rng: &mut R, percent: u32) -> bool {
    rng.gen_range(1..=100) <= percent
}

/// Grid size and outline for a location. Non-towns occupy a single block.
pub fn shape_settlement<R: Rng + ?Sized>(
    location_type: LocationType,
    capital: Option<&CapitalRequest>,
    rng: &mut R,
) -> SettlementSize {
    if let Some(CapitalRequest { width: Some(w), height: Some(h), .. }) = capital {
        return SettlementSize::new((*w).max(1), (*h).max(1), TownShape::Regular);
    }

    let dimension: fn(u32) -> u8 = match location_type {
        LocationType::City => city_dimension,
        LocationType::Hamlet => hamlet_dimension,
        LocationType::Village => village_dimension,
        _ => return SettlementSize::new(1, 1, TownShape::Regular),
    };
    let width = dimension(rng.gen_range(1..=100));
    let height = dimension(rng.gen_range(1..=100));

    match location_type {
        LocationType::Hamlet => refine_hamlet_size(width, height, rng),
        LocationType::Village => refine_village_size(width, height, rng),
        _ => SettlementSize::new(width, height, TownShape::Regular),
    }
}

pub fn refine_hamlet_size<R: Rng + ?Sized>(width: u8, height: u8, rng: &mut R) -> SettlementSize {
    let (mut w, mut h) = (width, height);
    let shape = match w as u32 * h as u32 {
        4 => {
            if rng.gen_bool(0.5) {
                w += 1;
            } else {
                h += 1;
            }
            TownShape::FiveOnSix
        }
        6 if chance(rng, 50) => TownShape::FourOnSix,
        8 if chance(rng, 50) => TownShape::SixOnEight,
        9 => {
            if chance(rng, 60) {
                TownShape::EightOnNine
            } else {
                TownShape::MantaShape
            }
        }
        12 if chance(rng, 60) => TownShape::NineOnTwelve,
        16 if chance(rng, 70) => TownShape::TwelveOnSixteen,
        _ => TownShape::Regular,
    };
    SettlementSize::new(w, h, shape)
}

pub fn refine_village_size<R: Rng + ?Sized>(width: u8, height: u8, rng: &mut R) -> SettlementSize {
    let (mut w, mut h) = (width, height);
    let shape = match w as u32 * h as u32 {
        3 => {
            if w == 1 {
                w = 2;
            } else {
                h = 2;
            }
            if chance(rng, 70) {
                TownShape::FourOnSix
            } else {
                TownShape::Regular
            }
        }
        4 if chance(rng, 60) => TownShape::LShape,
        6 => {
            if chance(rng, 50) {
                TownShape::FourOnSix
            } else {
                TownShape::FiveOnSix
            }
        }
        9 => {
            if chance(rng, 50) {
                TownShape::MantaShape
            } else {
                TownShape::EightOnNine
            }
        }
        _ => TownShape::Regular,
    };
    SettlementSize::new(w, h, shape)
}
