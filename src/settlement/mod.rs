//! Settlement exteriors
//!
//! Towns get a width × height grid of exterior blocks. The grid is shaped
//! first (`shape`), walls and special blocks are laid down next (`walls`,
//! `blocks`), and finally every name is normalized against the catalog
//! (`normalize`). Dwellings, shrines and dungeon entrances get a single block
//! through the same naming path.

pub mod blocks;
pub mod normalize;
pub mod shape;
pub mod walls;

pub use blocks::{
    build_single_exterior, build_town_exterior, check_block_compatibility, ExteriorRequest,
};
pub use normalize::{normalize_block, normalize_town_blocks};
pub use shape::{refine_hamlet_size, refine_village_size, shape_settlement};
pub use walls::{calculate_wall_positions, WallKind, WallPiece};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SettlementConfig;
use crate::locations::LocationType;
use crate::placement::CapitalRequest;

/// Outline of a settlement inside its bounding grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TownShape {
    #[default]
    Regular,
    LShape,
    FourOnSix,
    FiveOnSix,
    SixOnEight,
    MantaShape,
    EightOnNine,
    NineOnTwelve,
    TwelveOnSixteen,
}

impl TownShape {
    /// Grid cells left to filler blocks.
    pub fn filler_cells(&self) -> usize {
        match self {
            TownShape::Regular => 0,
            TownShape::LShape => 1,
            TownShape::FourOnSix => 2,
            TownShape::FiveOnSix => 1,
            TownShape::SixOnEight => 2,
            TownShape::MantaShape => 3,
            TownShape::EightOnNine => 1,
            TownShape::NineOnTwelve => 3,
            TownShape::TwelveOnSixteen => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSize {
    pub width: u8,
    pub height: u8,
    pub shape: TownShape,
}

impl SettlementSize {
    pub fn new(width: u8, height: u8, shape: TownShape) -> Self {
        Self { width, height, shape }
    }

    pub fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }
}

/// Walled and port flags of a settlement.
pub fn settlement_flags<R: Rng + ?Sized>(
    location_type: LocationType,
    capital: Option<&CapitalRequest>,
    coastal: bool,
    config: &SettlementConfig,
    rng: &mut R,
) -> (bool, bool) {
    if let Some(request) = capital {
        return (request.walled, request.port);
    }
    let walled = location_type == LocationType::City
        && rng.gen_range(1..=100) <= config.city_walled_chance;
    let port = matches!(location_type, LocationType::City | LocationType::Hamlet)
        && coastal
        && rng.gen_range(1..=100) <= config.port_chance;
    (walled, port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_filler_counts_fit_shapes() {
        assert_eq!(TownShape::Regular.filler_cells(), 0);
        assert_eq!(TownShape::MantaShape.filler_cells(), 3);
        assert_eq!(TownShape::TwelveOnSixteen.filler_cells(), 4);
    }

    #[test]
    fn test_capital_flags_come_from_request() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let request = CapitalRequest { walled: true, port: true, ..CapitalRequest::default() };
        let config = SettlementConfig::default();
        let flags = settlement_flags(LocationType::City, Some(&request), false, &config, &mut rng);
        assert_eq!(flags, (true, true));
    }

    #[test]
    fn test_only_coastal_towns_are_ports() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = SettlementConfig {
            port_chance: 100,
            city_walled_chance: 0,
            ..SettlementConfig::default()
        };
        let mut flags = |ty, coastal| settlement_flags(ty, None, coastal, &config, &mut rng);
        assert_eq!(flags(LocationType::Hamlet, true), (false, true));
        assert_eq!(flags(LocationType::Hamlet, false), (false, false));
        assert_eq!(flags(LocationType::Village, true), (false, false));
    }
}
