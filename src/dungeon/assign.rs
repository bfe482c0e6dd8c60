//! Theme and RDB block assignment for dungeon diagrams.

use rand::Rng;

use super::diagram::{DungeonDiagram, LocalCell};
use super::themes::{theme_for_type, DungeonTheme};
use crate::catalog::{rdb_name, BlockCatalog};
use crate::config::DungeonConfig;
use crate::error::{GenerationError, Result};
use crate::locations::{DungeonBlock, DungeonLayout, DungeonType};

/// Water level of a dry block.
pub const DRY_WATER_LEVEL: i16 = 10_000;

/// Pick an existing block name from a theme's pool.
pub fn pick_block<R: Rng + ?Sized>(
    theme: DungeonTheme,
    catalog: &dyn BlockCatalog,
    rng: &mut R,
) -> Result<String> {
    let pool = theme.pool();
    let first_pick = rdb_name(pool.letter, pool.first + rng.gen_range(0..pool.count));
    if catalog.exists(&first_pick) {
        return Ok(first_pick);
    }

    let present: Vec<String> = (pool.first..pool.first + pool.count)
        .map(|n| rdb_name(pool.letter, n))
        .filter(|name| catalog.exists(name))
        .collect();
    if present.is_empty() {
        return Err(GenerationError::catalog_miss(first_pick));
    }
    Ok(present[rng.gen_range(0..present.len())].clone())
}

/// Assign themes and block names to every cell of a diagram.
pub fn assign_blocks<R: Rng + ?Sized>(
    diagram: &DungeonDiagram,
    dungeon_type: DungeonType,
    name_theme: DungeonTheme,
    catalog: &dyn BlockCatalog,
    config: &DungeonConfig,
    rng: &mut R,
) -> Result<DungeonLayout> {
    let type_theme = theme_for_type(dungeon_type);
    let cells = &diagram.cells;

    let mut themes = vec![name_theme; cells.len()];
    let start = if cells.is_empty() { 0 } else { rng.gen_range(0..cells.len()) };

    let non_start = cells.len().saturating_sub(1);
    let mut seen_type = false;
    let mut tail_forced = None;
    let mut visited = 0;
    for (i, theme) in themes.iter_mut().enumerate() {
        if i == start {
            continue;
        }
        visited += 1;
        let roll = rng.gen_range(1..=10);
        // The last two cells take the type theme when none has appeared before them.
        if non_start - visited < 2 && tail_forced.is_none() {
            tail_forced = Some(!seen_type);
        }
        if roll >= 9 || tail_forced == Some(true) {
            *theme = type_theme;
            seen_type = true;
        }
    }

    if cells.len() >= config.large_dungeon_blocks {
        if let Some(far) = farthest_from(cells, start) {
            if rng.gen_range(0..config.third_theme_odds) == 0 {
                let candidates = DungeonTheme::third_theme_candidates(&[name_theme, type_theme]);
                if !candidates.is_empty() {
                    themes[far] = candidates[rng.gen_range(0..candidates.len())];
                }
                // The overwrite may have taken the only type-themed cell.
                let keeps_type = themes
                    .iter()
                    .enumerate()
                    .any(|(i, t)| i != start && *t == type_theme);
                if !keeps_type {
                    if let Some(last) = (0..cells.len()).rev().find(|&i| i != start && i != far) {
                        themes[last] = type_theme;
                    }
                }
            }
        }
    }

    let mut blocks = Vec::with_capacity(cells.len() + diagram.borders.len());
    for (i, (cell, theme)) in cells.iter().zip(themes).enumerate() {
        let name = pick_block(theme, catalog, rng)?;
        let water_level = if theme.is_wet() && rng.gen_range(1..=100) <= config.flooded_chance {
            -256 * rng.gen_range(1..=3i16)
        } else {
            DRY_WATER_LEVEL
        };
        blocks.push(DungeonBlock {
            x: cell.x,
            z: cell.z,
            name,
            theme,
            is_start: i == start,
            border: false,
            water_level,
            castle_block: theme == DungeonTheme::Castle,
        });
    }

    for cell in &diagram.borders {
        blocks.push(DungeonBlock {
            x: cell.x,
            z: cell.z,
            name: pick_block(DungeonTheme::Border, catalog, rng)?,
            theme: DungeonTheme::Border,
            is_start: false,
            border: true,
            water_level: DRY_WATER_LEVEL,
            castle_block: false,
        });
    }

    Ok(DungeonLayout {
        dungeon_type,
        name_theme,
        type_theme,
        blocks,
    })
}

/// Index of the cell farthest from the start, first one on ties.
fn farthest_from(cells: &[LocalCell], start: usize) -> Option<usize> {
    let origin = cells.get(start)?;
    let mut best: Option<(usize, i32)> = None;
    for (i, cell) in cells.iter().enumerate() {
        if i == start {
            continue;
        }
        let d = cell.distance_squared(origin);
        if best.map_or(true, |(_, bd)| d > bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BlockTemplate, MemoryCatalog};
    use crate::dungeon::diagram::generate_diagram;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_one_start_and_type_theme_present() {
        let catalog = MemoryCatalog::standard();
        let config = DungeonConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for count in [2, 3, 5, 9] {
            for _ in 0..20 {
                let diagram = generate_diagram(count, &config, &mut rng).unwrap();
                let layout = assign_blocks(
                    &diagram,
                    DungeonType::Crypt,
                    DungeonTheme::Castle,
                    &catalog,
                    &config,
                    &mut rng,
                )
                .unwrap();
                assert_eq!(layout.blocks.iter().filter(|b| b.is_start).count(), 1);
                let start = layout.start_block().unwrap();
                assert_eq!(start.theme, DungeonTheme::Castle);
                assert!(start.castle_block);
                assert!(layout.interior_blocks().any(|b| b.theme == DungeonTheme::Crypt));
                assert_eq!(layout.interior_blocks().count(), count);
                assert!(layout
                    .blocks
                    .iter()
                    .filter(|b| b.border)
                    .all(|b| b.theme == DungeonTheme::Border && b.name.starts_with('B')));
            }
        }
    }

    #[test]
    fn test_single_block_uses_name_theme() {
        let catalog = MemoryCatalog::standard();
        let config = DungeonConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let diagram = generate_diagram(1, &config, &mut rng).unwrap();
        let (ty, theme) = (DungeonType::Cemetery, DungeonTheme::Cemetery);
        let layout = assign_blocks(&diagram, ty, theme, &catalog, &config, &mut rng).unwrap();
        let start = layout.start_block().unwrap();
        assert_eq!(start.theme, DungeonTheme::Cemetery);
        assert!(start.name.starts_with('S') && start.name.ends_with(".RDB"));
        assert_eq!(layout.blocks.iter().filter(|b| b.border).count(), 4);
    }

    #[test]
    fn test_large_dungeon_third_theme() {
        let catalog = MemoryCatalog::standard();
        let config = DungeonConfig { third_theme_odds: 1, ..DungeonConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let diagram = generate_diagram(12, &config, &mut rng).unwrap();
        let (ty, theme) = (DungeonType::Prison, DungeonTheme::Tower);
        let layout = assign_blocks(&diagram, ty, theme, &catalog, &config, &mut rng).unwrap();
        let others: Vec<_> = layout
            .interior_blocks()
            .filter(|b| b.theme != DungeonTheme::Tower && b.theme != DungeonTheme::Prison)
            .collect();
        assert_eq!(others.len(), 1);
        assert!(!matches!(others[0].theme, DungeonTheme::Cemetery | DungeonTheme::Border));
        assert!(!others[0].is_start);
    }

    #[test]
    fn test_third_theme_keeps_a_type_themed_cell() {
        let catalog = MemoryCatalog::standard();
        let config = DungeonConfig {
            max_growth_attempts: 100_000,
            third_theme_odds: 1,
            ..DungeonConfig::default()
        };
        for seed in 0..2000 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let diagram = generate_diagram(12, &config, &mut rng).unwrap();
            let (ty, theme) = (DungeonType::Prison, DungeonTheme::Tower);
            let layout = assign_blocks(&diagram, ty, theme, &catalog, &config, &mut rng).unwrap();
            assert!(
                layout.interior_blocks().any(|b| !b.is_start && b.theme == DungeonTheme::Prison),
                "seed {} lost the type theme",
                seed
            );
        }
    }

    #[test]
    fn test_water_levels() {
        let catalog = MemoryCatalog::standard();
        let config = DungeonConfig { flooded_chance: 100, ..DungeonConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let diagram = generate_diagram(6, &config, &mut rng).unwrap();
        let (ty, theme) = (DungeonType::NaturalCave, DungeonTheme::Cave);
        let layout = assign_blocks(&diagram, ty, theme, &catalog, &config, &mut rng).unwrap();
        for block in layout.interior_blocks() {
            if block.theme.is_wet() {
                assert!([-256, -512, -768].contains(&block.water_level));
            } else {
                assert_eq!(block.water_level, DRY_WATER_LEVEL);
            }
        }
    }

    #[test]
    fn test_missing_pick_falls_back_to_present_member() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert(rdb_name('N', 61), BlockTemplate::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..10 {
            let name = pick_block(DungeonTheme::Crypt, &catalog, &mut rng).unwrap();
            assert_eq!(name, "N0000061.RDB");
        }
        assert!(matches!(
            pick_block(DungeonTheme::Tower, &catalog, &mut rng),
            Err(GenerationError::CatalogMiss { .. })
        ));
    }

    #[test]
    fn test_farthest_cell() {
        let cells = [
            LocalCell::new(0, 0),
            LocalCell::new(1, 0),
            LocalCell::new(2, 0),
            LocalCell::new(2, 1),
        ];
        assert_eq!(farthest_from(&cells, 0), Some(3));
        assert_eq!(farthest_from(&cells[..1], 0), None);
    }
}
