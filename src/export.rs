//! Output of generated regions: JSON files and a PNG preview.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assembly::RegionLayout;
use crate::error::Result;
use crate::locations::LocationType;
use crate::region::{Climate, RegionMap};

/// Destination for finished regions.
pub trait LocationSink {
    fn write_region(&mut self, layout: &RegionLayout) -> Result<()>;

    /// Called once after the last region.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// One line of `index.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionIndexEntry {
    pub region_index: i32,
    pub region_name: String,
    pub file: String,
    pub locations: usize,
    pub skipped: usize,
}

/// Writes `region_NNN.json` per region and an `index.json` summary.
pub struct JsonDirectorySink {
    dir: PathBuf,
    entries: Vec<RegionIndexEntry>,
}

impl JsonDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            entries: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl LocationSink for JsonDirectorySink {
    fn write_region(&mut self, layout: &RegionLayout) -> Result<()> {
        let file = format!("region_{:03}.json", layout.region_index);
        let text = serde_json::to_string_pretty(layout)?;
        fs::write(self.dir.join(&file), text)?;
        self.entries.push(RegionIndexEntry {
            region_index: layout.region_index,
            region_name: layout.region_name.clone(),
            file,
            locations: layout.records.len(),
            skipped: layout.report.skipped.len(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(self.dir.join("index.json"), text)?;
        info!("wrote {} regions to {}", self.entries.len(), self.dir.display());
        Ok(())
    }
}

fn climate_color(climate: Climate) -> [u8; 3] {
    match climate {
        Climate::Ocean => [30, 60, 140],
        Climate::Desert => [220, 200, 140],
        Climate::Desert2 => [200, 170, 110],
        Climate::Mountain => [140, 130, 120],
        Climate::Rainforest => [30, 120, 60],
        Climate::Swamp => [80, 100, 70],
        Climate::Subtropical => [110, 160, 70],
        Climate::MountainWoods => [90, 120, 90],
        Climate::Woodlands => [70, 140, 70],
        Climate::HauntedWoodlands => [90, 80, 100],
    }
}

fn location_color(location_type: LocationType) -> [u8; 3] {
    match location_type {
        LocationType::City => [255, 255, 255],
        LocationType::Hamlet | LocationType::Village => [240, 220, 80],
        LocationType::Farm | LocationType::WealthyHome | LocationType::PoorHome => [230, 150, 60],
        LocationType::Tavern => [200, 120, 40],
        LocationType::Temple | LocationType::Cult => [120, 200, 255],
        LocationType::Coven => [200, 60, 200],
        LocationType::Graveyard => [160, 160, 160],
        LocationType::DungeonRuin | LocationType::DungeonKeep | LocationType::DungeonLabyrinth => {
            [220, 40, 40]
        }
        LocationType::YourShips | LocationType::None => [0, 0, 0],
    }
}

/// Render climates with one pixel per location, `scale` pixels per map pixel.
pub fn render_preview<M: RegionMap + ?Sized>(
    map: &M,
    layouts: &[RegionLayout],
    min_terrain_height: u8,
    scale: u32,
) -> RgbImage {
    let (width, height) = map.dimensions();
    let scale = scale.max(1);
    let mut img: RgbImage = ImageBuffer::new(width as u32 * scale, height as u32 * scale);

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let color = if map.terrain_height(x, y) < min_terrain_height {
                climate_color(Climate::Ocean)
            } else {
                climate_color(map.climate_at(x, y))
            };
            fill_cell(&mut img, x as u32, y as u32, scale, color);
        }
    }

    for record in layouts.iter().flat_map(|l| l.records.iter()) {
        let color = location_color(record.location_type);
        fill_cell(&mut img, record.position.x as u32, record.position.y as u32, scale, color);
    }

    img
}

fn fill_cell(img: &mut RgbImage, x: u32, y: u32, scale: u32, color: [u8; 3]) {
    for dy in 0..scale {
        for dx in 0..scale {
            img.put_pixel(x * scale + dx, y * scale + dy, Rgb(color));
        }
    }
}

/// Export the preview as a PNG.
pub fn export_preview<M: RegionMap + ?Sized>(
    map: &M,
    layouts: &[RegionLayout],
    min_terrain_height: u8,
    scale: u32,
    path: &Path,
) -> Result<()> {
    render_preview(map, layouts, min_terrain_height, scale).save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::GenerationReport;
    use crate::region::RasterRegionMap;
    use crate::tilemap::Tilemap;

    fn layout(index: i32) -> RegionLayout {
        let name = format!("Region {}", index);
        RegionLayout::new(index, name, Vec::new(), GenerationReport::default())
    }

    #[test]
    fn test_json_sink_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonDirectorySink::new(dir.path().join("out")).unwrap();
        sink.write_region(&layout(0)).unwrap();
        sink.write_region(&layout(12)).unwrap();
        sink.finish().unwrap();

        let text = fs::read_to_string(sink.dir().join("region_012.json")).unwrap();
        let back: RegionLayout = serde_json::from_str(&text).unwrap();
        assert_eq!(back, layout(12));

        let text = fs::read_to_string(sink.dir().join("index.json")).unwrap();
        let index: Vec<RegionIndexEntry> = serde_json::from_str(&text).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index[0].file, "region_000.json");
    }

    #[test]
    fn test_preview_size_and_water() {
        let map = RasterRegionMap::new(
            Tilemap::new_with(5, 4, 0u8),
            Tilemap::new_with(5, 4, Climate::Woodlands),
            Tilemap::new_with(5, 4, 0),
        );
        let img = render_preview(&map, &[], 3, 2);
        assert_eq!(img.dimensions(), (10, 8));
        assert_eq!(img.get_pixel(9, 7).0, climate_color(Climate::Ocean));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        export_preview(&map, &[], 3, 1, &path).unwrap();
        assert!(path.exists());
    }
}
