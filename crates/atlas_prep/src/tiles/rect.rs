use serde::{Deserialize, Serialize};

use crate::grid;
use crate::AtlasError;

/// Axis-aligned crop region within an atlas, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> TileRect {
        TileRect { x, y, width, height }
    }

    /// Span two corner points, in either order. A shared row or column means
    /// the selection has no area.
    pub fn from_points(first: (u32, u32), second: (u32, u32)) -> Result<TileRect, AtlasError> {
        let width = first.0.abs_diff(second.0);
        let height = first.1.abs_diff(second.1);
        if width == 0 || height == 0 {
            return Err(AtlasError::EmptySelection);
        }

        Ok(TileRect { x: first.0.min(second.0), y: first.1.min(second.1), width, height })
    }

    /// The fixed-grid cell containing a pixel, as a cell-sized tile.
    pub fn at_cell(pixel: (u32, u32), cell_size: u32) -> Result<TileRect, AtlasError> {
        if cell_size == 0 {
            return Err(AtlasError::EmptySelection);
        }

        let (x, y) = grid::cell_origin(pixel.0, pixel.1, cell_size);
        Ok(TileRect { x, y, width: cell_size, height: cell_size })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Clip to a bitmap of the given dimensions. None when the origin is
    /// already outside or nothing remains.
    pub fn clamped_to(&self, width: u32, height: u32) -> Option<TileRect> {
        if self.x >= width || self.y >= height {
            return None;
        }

        let clipped = TileRect {
            x: self.x,
            y: self.y,
            width: self.width.min(width - self.x),
            height: self.height.min(height - self.y),
        };
        if clipped.is_empty() {
            return None;
        }
        Some(clipped)
    }
}
