//! Exterior block name normalization
//!
//! Selection produces names that may not exist in the catalog (large banks,
//! desert-green temples and so on). Normalization maps each one to a
//! combination that does exist.

use rand::Rng;

use crate::catalog::{count_variants, BlockCatalog, RmbName};
use crate::error::{GenerationError, Result};

const SIZE_FALLBACK: [char; 4] = ['L', 'M', 'S', 'A'];

/// Apply the fixed prefix/size/climate substitutions.
pub fn substitute(name: &RmbName) -> RmbName {
    let mut out = name.clone();
    match (name.prefix.as_str(), name.size) {
        ("BANK" | "LIBR" | "MAGE" | "GEMS" | "MARK", 'L') => out.size = 'M',
        ("BOOK", 'M' | 'L') => out.size = 'S',
        ("GRVE", 'L') => out.size = 'M',
        _ => {}
    }
    match (name.prefix.as_str(), name.climate) {
        ("GRVE", 'G') => out.climate = 'A',
        ("DARK" | "THIE" | "TEMP", 'G') => out.climate = 'B',
        _ => {}
    }
    out
}

/// Resolve one block name to an existing catalog entry.
pub fn normalize_block<R: Rng + ?Sized>(
    name: &str,
    catalog: &dyn BlockCatalog,
    max_variant: u32,
    rng: &mut R,
) -> Result<String> {
    let Some(parsed) = RmbName::parse(name) else {
        return if catalog.exists(name) {
            Ok(name.to_string())
        } else {
            Err(GenerationError::catalog_miss(name))
        };
    };

    let wanted = substitute(&parsed);
    if catalog.exists(&wanted.to_string()) {
        return Ok(wanted.to_string());
    }

    let start = SIZE_FALLBACK.iter().position(|&s| s == wanted.size).unwrap_or(0);
    let mut climates = vec![wanted.climate];
    if wanted.climate != 'A' {
        climates.push('A');
    }
    for climate in climates {
        for &size in &SIZE_FALLBACK[start..] {
            let variants = count_variants(catalog, &wanted.prefix, climate, size, max_variant);
            if variants == 0 {
                continue;
            }
            let variant = if wanted.variant >= 1 && wanted.variant <= variants {
                wanted.variant
            } else {
                rng.gen_range(1..=variants)
            };
            return Ok(RmbName::new(&wanted.prefix, climate, size, variant).to_string());
        }
    }
    Err(GenerationError::catalog_miss(name))
}

/// Normalize every block of a town grid in place.
pub fn normalize_town_blocks<R: Rng + ?Sized>(
    blocks: &mut [String],
    catalog: &dyn BlockCatalog,
    max_variant: u32,
    rng: &mut R,
) -> Result<()> {
    for block in blocks.iter_mut() {
        *block = normalize_block(block, catalog, max_variant, rng)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BlockTemplate, MemoryCatalog};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn catalog_with(names: &[&str]) -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new();
        for name in names {
            catalog.insert(*name, BlockTemplate::default());
        }
        catalog
    }

    #[test]
    fn test_substitution_table() {
        let sub = |s: &str| substitute(&RmbName::parse(s).unwrap()).to_string();
        assert_eq!(sub("BANKAL02.RMB"), "BANKAM02.RMB");
        assert_eq!(sub("BOOKBM01.RMB"), "BOOKBS01.RMB");
        assert_eq!(sub("GRVEGL01.RMB"), "GRVEAM01.RMB");
        assert_eq!(sub("TEMPGS03.RMB"), "TEMPBS03.RMB");
        assert_eq!(sub("RESIGL01.RMB"), "RESIGL01.RMB");
    }

    #[test]
    fn test_existing_name_is_unchanged() {
        let catalog = catalog_with(&["RESIAL01.RMB"]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let name = normalize_block("RESIAL01.RMB", &catalog, 99, &mut rng).unwrap();
        assert_eq!(name, "RESIAL01.RMB");
    }

    #[test]
    fn test_falls_back_through_sizes_then_climate() {
        let catalog = catalog_with(&["ARMRBS01.RMB", "ARMRAL01.RMB", "ARMRAL02.RMB"]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let smaller = normalize_block("ARMRBL01.RMB", &catalog, 99, &mut rng).unwrap();
        assert_eq!(smaller, "ARMRBS01.RMB");
        let picked = normalize_block("ARMRGL03.RMB", &catalog, 99, &mut rng).unwrap();
        assert!(picked == "ARMRAL01.RMB" || picked == "ARMRAL02.RMB", "got {}", picked);
    }

    #[test]
    fn test_unresolvable_is_catalog_miss() {
        let catalog = catalog_with(&["RESIAA01.RMB"]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(matches!(
            normalize_block("WEAPAL01.RMB", &catalog, 99, &mut rng),
            Err(GenerationError::CatalogMiss { .. })
        ));
    }

    #[test]
    fn test_standard_catalog_resolves_whole_grid() {
        let catalog = MemoryCatalog::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut blocks = vec![
            "BANKGL01.RMB".to_string(),
            "BOOKAL01.RMB".to_string(),
            "GRVEGL01.RMB".to_string(),
            "TEMPGM01.RMB".to_string(),
            "WALLAA05.RMB".to_string(),
        ];
        normalize_town_blocks(&mut blocks, &catalog, 99, &mut rng).unwrap();
        for block in &blocks {
            assert!(catalog.exists(block), "{} missing", block);
        }
        assert!(blocks[1].starts_with("BOOKAS"));
        assert!(blocks[2].starts_with("GRVEAM"));
        assert!(blocks[3].starts_with("TEMPBM"));
    }
}
