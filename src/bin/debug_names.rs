//! Debug script to print sample names per culture and location type

use std::collections::BTreeSet;

use location_generator::config::NamingConfig;
use location_generator::data::LocationData;
use location_generator::locations::{DungeonType, LocationType};
use location_generator::naming::NameSynthesizer;
use location_generator::region::{Deity, Government, RegionDescriptor, Regionalism};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn main() {
    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(12345u64);
    let samples = 6;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let data = LocationData::defaults().expect("embedded name tables");
    let config = NamingConfig::default();
    let synth = NameSynthesizer::new(&data.grammars, &data.epithets, &data.bank, &config);

    for &culture in Regionalism::all() {
        let region = RegionDescriptor {
            index: 0,
            name: format!("{:?}", culture),
            government: Government::Kingdom,
            climate_pixels: Default::default(),
            surface_pixels: 0,
            deity: Deity::all()[rng.gen_range(0..Deity::all().len())],
            major_regionalisms: vec![culture],
            minor_regionalisms: Vec::new(),
        };
        println!("=== {:?} ===", culture);

        let mut taken = BTreeSet::new();
        for location_type in LocationType::placeable() {
            let candidates = DungeonType::candidates_for(location_type);
            let mut names = Vec::new();
            for _ in 0..samples {
                let dungeon_type = candidates[rng.gen_range(0..candidates.len())];
                match synth.generate(location_type, dungeon_type, &region, &taken, &mut rng) {
                    Ok(name) => {
                        taken.insert(name.text.clone());
                        match name.theme {
                            Some(theme) => names.push(format!("{} [{:?}]", name.text, theme)),
                            None => names.push(name.text),
                        }
                    }
                    Err(e) => names.push(format!("<{}>", e)),
                }
            }
            println!("{:<14} {}", location_type.display_name(), names.join(", "));
        }
        println!();
    }
}
