use thiserror::Error;

mod font;
mod grid;
mod render;
mod tiles;

pub use font::{
    charmap::{CharMap, GlyphPos},
    scan::{scan_sheet, SheetScan, DEFAULT_CELL_SIZE},
    slot::{GlyphSlot, SlotIdentity, OCCUPANCY_THRESHOLD},
};
pub use grid::{Cell, GridGeometry};
pub use render::{colormap, isometric};
pub use tiles::{
    export::{crop_tile, ExportFailure, ExportReport, MetadataFormat},
    rect::TileRect,
    registry::{NamedTile, TileRegistry},
};

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to decode image data: {0}")]
    Image(#[from] image::ImageError),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed metadata: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("image dimensions and cell size must be nonzero")]
    InvalidGrid,
    #[error("selection has zero area")]
    EmptySelection,
    #[error("tile {name:?} must have nonzero width and height")]
    ZeroSizeTile { name: String },
    #[error("tile name must not be empty")]
    EmptyName,
    #[error("no tiles defined")]
    EmptyRegistry,
    #[error("tile {name:?} lies outside the {width}x{height} atlas")]
    OutOfBounds { name: String, width: u32, height: u32 },
}
