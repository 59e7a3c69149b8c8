use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};
use log::warn;
use serde::{Deserialize, Serialize};

use super::rect::TileRect;
use super::registry::{NamedTile, TileRegistry};
use crate::AtlasError;

/// JSON shape for tile metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MetadataFormat {
    /// `{"elements": [{"name": .., "x": .., ..}, ..]}`.
    #[default]
    Elements,
    /// `{"<name>": {"x": .., ..}, ..}`.
    Flat,
}

#[derive(Serialize, Deserialize)]
struct ElementsDoc {
    elements: Vec<NamedTile>,
}

/// Outcome of a batch tile export. A failing tile is reported and skipped
/// rather than aborting the rest of the batch.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<ExportFailure>,
}

#[derive(Debug)]
pub struct ExportFailure {
    pub name: String,
    pub error: AtlasError,
}

impl ExportReport {
    pub fn all_failed(&self) -> bool {
        self.written.is_empty() && !self.failures.is_empty()
    }
}

/// Crop one tile out of the atlas. Regions spilling past the right or bottom
/// edge are clipped with a warning; regions starting outside are an error.
pub fn crop_tile(image: &DynamicImage, tile: &NamedTile) -> Result<DynamicImage, AtlasError> {
    let (width, height) = image.dimensions();
    let rect = tile.rect.clamped_to(width, height).ok_or_else(|| AtlasError::OutOfBounds {
        name: tile.name.clone(),
        width,
        height,
    })?;
    if rect != tile.rect {
        warn!(
            "tile {:?} spills past the {}x{} atlas, clipping {}x{} to {}x{}",
            tile.name, width, height, tile.rect.width, tile.rect.height, rect.width, rect.height
        );
    }

    Ok(image.crop_imm(rect.x, rect.y, rect.width, rect.height))
}

impl TileRegistry {
    /// Render the registry as pretty-printed metadata JSON.
    pub fn metadata_json(&self, format: MetadataFormat) -> Result<String, AtlasError> {
        if self.is_empty() {
            return Err(AtlasError::EmptyRegistry);
        }

        let json = match format {
            MetadataFormat::Elements => {
                serde_json::to_string_pretty(&ElementsDoc { elements: self.tiles().to_vec() })?
            },
            MetadataFormat::Flat => {
                let mut map = serde_json::Map::new();
                for tile in self.tiles() {
                    map.insert(tile.name.clone(), serde_json::to_value(tile.rect)?);
                }
                serde_json::to_string_pretty(&map)?
            },
        };
        Ok(json)
    }

    pub fn write_metadata(&self, path: &Path, format: MetadataFormat) -> Result<(), AtlasError> {
        let json = self.metadata_json(format)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Parse metadata JSON in either shape, keeping document order.
    pub fn from_metadata_json(json: &str) -> Result<TileRegistry, AtlasError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let mut registry = TileRegistry::new();
        if value.get("elements").is_some() {
            let doc: ElementsDoc = serde_json::from_value(value)?;
            for tile in doc.elements {
                registry.define(tile.name, tile.rect)?;
            }
        } else {
            let map: serde_json::Map<String, serde_json::Value> = serde_json::from_value(value)?;
            for (name, rect) in map {
                let rect: TileRect = serde_json::from_value(rect)?;
                registry.define(name, rect)?;
            }
        }
        Ok(registry)
    }

    pub fn read_metadata(path: &Path) -> Result<TileRegistry, AtlasError> {
        let json = fs::read_to_string(path)?;
        TileRegistry::from_metadata_json(&json)
    }

    /// Crop every tile and write `{name}.png` files into `dir`, creating it
    /// if needed.
    pub fn save_images(&self, image: &DynamicImage, dir: &Path) -> Result<ExportReport, AtlasError> {
        if self.is_empty() {
            return Err(AtlasError::EmptyRegistry);
        }
        fs::create_dir_all(dir)?;

        let mut report = ExportReport::default();
        for tile in self.tiles() {
            let path = dir.join(format!("{}.png", tile.name));
            let outcome = crop_tile(image, tile).and_then(|cropped| {
                cropped.save(&path)?;
                Ok(())
            });
            match outcome {
                Ok(()) => report.written.push(path),
                Err(error) => {
                    warn!("skipping tile {:?}: {}", tile.name, error);
                    report.failures.push(ExportFailure { name: tile.name.clone(), error });
                },
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    fn registry_of(tiles: &[(&str, TileRect)]) -> TileRegistry {
        let mut registry = TileRegistry::new();
        for (name, rect) in tiles {
            registry.define(*name, *rect).unwrap();
        }
        registry
    }

    fn checker_atlas(width: u32, height: u32) -> DynamicImage {
        let mut atlas = RgbaImage::new(width, height);
        for (x, y, pixel) in atlas.enumerate_pixels_mut() {
            *pixel = if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            };
        }
        DynamicImage::ImageRgba8(atlas)
    }

    #[test]
    fn elements_json_round_trips() {
        let registry = registry_of(&[
            ("stone", TileRect::new(0, 0, 16, 16)),
            ("dirt", TileRect::new(16, 0, 16, 16)),
        ]);
        let json = registry.metadata_json(MetadataFormat::Elements).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["elements"][0]["name"], "stone");
        assert_eq!(value["elements"][1]["x"], 16);

        let reloaded = TileRegistry::from_metadata_json(&json).unwrap();
        assert_eq!(reloaded.tiles(), registry.tiles());
    }

    #[test]
    fn flat_json_round_trips_in_order() {
        let registry = registry_of(&[
            ("zebra", TileRect::new(0, 0, 8, 8)),
            ("apple", TileRect::new(8, 0, 8, 8)),
            ("mango", TileRect::new(16, 0, 8, 8)),
        ]);
        let json = registry.metadata_json(MetadataFormat::Flat).unwrap();
        let reloaded = TileRegistry::from_metadata_json(&json).unwrap();

        let names: Vec<&str> = reloaded.tiles().iter().map(|tile| tile.name.as_str()).collect();
        assert_eq!(names, ["zebra", "apple", "mango"]);
        assert_eq!(reloaded.tiles(), registry.tiles());
    }

    #[test]
    fn shape_is_detected_from_the_document() {
        let elements = r#"{"elements": [{"name": "a", "x": 0, "y": 0, "width": 4, "height": 4}]}"#;
        let flat = r#"{"a": {"x": 0, "y": 0, "width": 4, "height": 4}}"#;

        let from_elements = TileRegistry::from_metadata_json(elements).unwrap();
        let from_flat = TileRegistry::from_metadata_json(flat).unwrap();
        assert_eq!(from_elements.tiles(), from_flat.tiles());
    }

    #[test]
    fn malformed_metadata_is_an_error() {
        assert!(matches!(
            TileRegistry::from_metadata_json("[1, 2, 3]"),
            Err(AtlasError::Metadata(_))
        ));
        assert!(TileRegistry::from_metadata_json("not json").is_err());
    }

    #[test]
    fn empty_registry_has_no_metadata() {
        let registry = TileRegistry::new();
        assert!(matches!(
            registry.metadata_json(MetadataFormat::Elements),
            Err(AtlasError::EmptyRegistry)
        ));
    }

    #[test]
    fn cropping_respects_the_rectangle() {
        let atlas = checker_atlas(32, 32);
        let tile = NamedTile { name: String::from("corner"), rect: TileRect::new(8, 8, 8, 4) };
        let cropped = crop_tile(&atlas, &tile).unwrap();
        assert_eq!(cropped.dimensions(), (8, 4));
        assert_eq!(cropped.to_rgba8().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn overhanging_tiles_are_clipped() {
        let atlas = checker_atlas(32, 32);
        let tile = NamedTile { name: String::from("edge"), rect: TileRect::new(24, 28, 16, 16) };
        let cropped = crop_tile(&atlas, &tile).unwrap();
        assert_eq!(cropped.dimensions(), (8, 4));
    }

    #[test]
    fn tiles_outside_the_atlas_are_errors() {
        let atlas = checker_atlas(32, 32);
        let tile = NamedTile { name: String::from("gone"), rect: TileRect::new(32, 0, 8, 8) };
        assert!(matches!(
            crop_tile(&atlas, &tile),
            Err(AtlasError::OutOfBounds { name, width: 32, height: 32 }) if name == "gone"
        ));
    }

    #[test]
    fn batch_export_continues_past_failures() {
        let atlas = checker_atlas(32, 32);
        let registry = registry_of(&[
            ("good", TileRect::new(0, 0, 16, 16)),
            ("gone", TileRect::new(100, 100, 8, 8)),
            ("also_good", TileRect::new(16, 16, 8, 8)),
        ]);

        let dir = tempfile::tempdir().unwrap();
        let report = registry.save_images(&atlas, dir.path()).unwrap();
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "gone");
        assert!(!report.all_failed());

        let good = image::open(dir.path().join("good.png")).unwrap();
        assert_eq!(good.dimensions(), (16, 16));
        assert!(!dir.path().join("gone.png").exists());
    }

    #[test]
    fn metadata_file_round_trips() {
        let registry = registry_of(&[("stone", TileRect::new(0, 0, 16, 16))]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.json");

        registry.write_metadata(&path, MetadataFormat::Elements).unwrap();
        let reloaded = TileRegistry::read_metadata(&path).unwrap();
        assert_eq!(reloaded.tiles(), registry.tiles());
    }
}
