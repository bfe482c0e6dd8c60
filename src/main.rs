use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use location_generator::ascii;
use location_generator::assembly::check_map_dimensions;
use location_generator::catalog::MemoryCatalog;
use location_generator::config::GenerationConfig;
use location_generator::data::LocationData;
use location_generator::export::{self, JsonDirectorySink, LocationSink};
use location_generator::seeds::WorldSeeds;
use location_generator::synthetic::{self, SyntheticParams};
use location_generator::{RegionGenerator, Result};

#[derive(Parser, Debug)]
#[command(name = "location_generator")]
#[command(about = "Populate the regions of a world map with towns, homes, temples and dungeons")]
struct Args {
    /// Width of the synthetic map in pixels
    #[arg(short = 'W', long, default_value = "160")]
    width: usize,

    /// Height of the synthetic map in pixels
    #[arg(short = 'H', long, default_value = "100")]
    height: usize,

    /// Number of regions on the synthetic map
    #[arg(short, long, default_value = "8")]
    regions: usize,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Seed for the location streams only; the terrain keeps the main seed
    #[arg(long)]
    location_seed: Option<u64>,

    /// Generation settings (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory with name table overrides
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Block catalog manifest (JSON). The stock catalog is used otherwise.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Write the active block catalog as a JSON manifest
    #[arg(long)]
    dump_catalog: Option<PathBuf>,

    /// Skip the capital city of each region
    #[arg(long)]
    no_capitals: bool,

    /// Write one JSON file per region into this directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export a PNG preview of the placements
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Pixels per map pixel in the preview
    #[arg(long, default_value = "4")]
    preview_scale: u32,

    /// Export the ASCII map and listings to a text file
    #[arg(long)]
    export_ascii: Option<String>,

    /// Print the ASCII map to stdout
    #[arg(long)]
    ascii: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut seeds = WorldSeeds::from_master(seed);
    if let Some(location_seed) = args.location_seed {
        seeds = seeds.with_locations(location_seed);
    }
    println!("Generating locations with seed: {}", seed);
    println!("Map size: {}x{}", args.width, args.height);
    check_map_dimensions(args.width, args.height)?;

    let config = match &args.config {
        Some(path) => GenerationConfig::load(path)?,
        None => GenerationConfig::default(),
    };
    config.validate()?;

    let data = match &args.data_dir {
        Some(dir) => LocationData::load_from(dir)?,
        None => LocationData::defaults()?,
    };
    let catalog = match &args.catalog {
        Some(path) => MemoryCatalog::from_manifest(path)?,
        None => MemoryCatalog::standard(),
    };
    println!("Block catalog: {} templates", catalog.len());
    if let Some(path) = &args.dump_catalog {
        std::fs::write(path, serde_json::to_string_pretty(&catalog.to_manifest())?)?;
        println!("Wrote block catalog to {}", path.display());
    }

    let params = SyntheticParams {
        width: args.width,
        height: args.height,
        regions: args.regions,
        capitals: !args.no_capitals,
        ..SyntheticParams::default()
    };
    let world = synthetic::generate_world(&params, &seeds);
    println!("Created {} regions", world.regions.len());

    let generator = RegionGenerator::new(&world.map, &catalog, &data.bank, &data, &config);
    let layouts = generator.generate_world(&world.regions, &seeds)?;

    let min_height = config.placement.min_terrain_height;
    for layout in &layouts {
        let report = &layout.report;
        println!(
            "  {:<16} {:>4} locations ({} skipped, {} short)",
            layout.region_name,
            layout.records.len(),
            report.skipped.len(),
            report.shortfalls.len()
        );
    }

    if let Some(dir) = &args.output {
        let mut sink = JsonDirectorySink::new(dir)?;
        for layout in &layouts {
            sink.write_region(layout)?;
        }
        sink.finish()?;
        println!("Wrote regions to {}", dir.display());
    }

    if let Some(path) = &args.preview {
        export::export_preview(&world.map, &layouts, min_height, args.preview_scale, path)?;
        println!("Exported preview to {}", path.display());
    }

    if let Some(path) = &args.export_ascii {
        ascii::export_world_file(&world.map, &layouts, min_height, seed, path)?;
        println!("Exported ASCII world to {}", path);
    }

    if args.ascii {
        print!("{}", ascii::render_locations(&world.map, &layouts, min_height));
        print!("{}", ascii::location_legend());
    }

    Ok(())
}
