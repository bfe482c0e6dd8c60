//! Debug script to generate a small synthetic world and dump one region

use location_generator::ascii::{location_legend, location_stats, render_locations};
use location_generator::catalog::MemoryCatalog;
use location_generator::config::GenerationConfig;
use location_generator::data::LocationData;
use location_generator::seeds::WorldSeeds;
use location_generator::synthetic::{generate_world, SyntheticParams};
use location_generator::RegionGenerator;

fn main() {
    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(12345u64);
    let seeds = WorldSeeds::from_master(seed);
    let params = SyntheticParams {
        width: 96,
        height: 64,
        regions: 4,
        ..SyntheticParams::default()
    };

    let world = generate_world(&params, &seeds);
    let catalog = MemoryCatalog::standard();
    let data = LocationData::defaults().expect("embedded name tables");
    let config = GenerationConfig::default();
    let generator = RegionGenerator::new(&world.map, &catalog, &data.bank, &data, &config);
    let layouts = generator.generate_world(&world.regions, &seeds).expect("generation failed");

    print!("{}", render_locations(&world.map, &layouts, config.placement.min_terrain_height));
    print!("{}", location_legend());
    println!();

    for (location_type, count) in location_stats(&layouts) {
        println!("{:<14} {:>4}", location_type.display_name(), count);
    }
    println!();

    let Some(layout) = layouts.first() else {
        println!("no regions");
        return;
    };
    println!("=== {} ===", layout.region_name);
    for record in &layout.records {
        println!(
            "{:>5} {:<14} {:<32} {}",
            record.location_id,
            record.location_type.display_name(),
            record.name,
            record.position
        );
        if let Some(exterior) = &record.exterior {
            if exterior.width > 1 || exterior.height > 1 {
                for y in 0..exterior.height {
                    let row: Vec<&str> =
                        (0..exterior.width).filter_map(|x| exterior.block_at(x, y)).collect();
                    println!("        {}", row.join(" "));
                }
            }
        }
        if let Some(dungeon) = &record.dungeon {
            let blocks: Vec<String> = dungeon
                .blocks
                .iter()
                .map(|b| {
                    let marker = if b.is_start { "*" } else { "" };
                    format!("{}@({},{}){}", b.name, b.x, b.z, marker)
                })
                .collect();
            println!("        {}", blocks.join(" "));
        }
    }
    println!("report: {:?}", layout.report);
}
