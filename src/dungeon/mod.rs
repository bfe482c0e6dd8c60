//! Dungeon interiors: diagram growth, themes and block assignment.

pub mod assign;
pub mod diagram;
pub mod themes;

pub use assign::{assign_blocks, pick_block, DRY_WATER_LEVEL};
pub use diagram::{block_count, generate_diagram, DungeonDiagram, LocalCell};
pub use themes::{theme_for_name, theme_for_type, DungeonTheme, ThemePool};

use rand::Rng;

use crate::catalog::BlockCatalog;
use crate::config::DungeonConfig;
use crate::error::Result;
use crate::locations::{DungeonLayout, DungeonType, LocationType};

/// Build the full interior of a dungeon-bearing location.
pub fn generate_dungeon<R: Rng + ?Sized>(
    location_type: LocationType,
    dungeon_type: DungeonType,
    name_theme: DungeonTheme,
    catalog: &dyn BlockCatalog,
    config: &DungeonConfig,
    rng: &mut R,
) -> Result<DungeonLayout> {
    let count = block_count(location_type, rng);
    let diagram = generate_diagram(count, config, rng)?;
    assign_blocks(&diagram, dungeon_type, name_theme, catalog, config, rng)
}
