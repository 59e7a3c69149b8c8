use image::DynamicImage;
use log::debug;

use super::charmap::CharMap;
use super::slot::GlyphSlot;
use crate::grid::GridGeometry;
use crate::AtlasError;

/// Default glyph cell edge for `ascii.png`-style font sheets.
pub const DEFAULT_CELL_SIZE: u32 = 8;

/// Every cell of a font sheet, in raster order.
#[derive(Clone, Debug)]
pub struct SheetScan {
    pub geometry: GridGeometry,
    pub slots: Vec<GlyphSlot>,
}

/// Walk a font sheet cell by cell, recording per-cell coverage.
///
/// The sheet is converted to RGBA and split into `cell_size` squares; each
/// cell records its opaque-pixel count, 0/1 coverage rows and advance width.
pub fn scan_sheet(image: &DynamicImage, cell_size: u32) -> Result<SheetScan, AtlasError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let geometry = GridGeometry::derive(width, height, cell_size).ok_or(AtlasError::InvalidGrid)?;

    let mut slots = Vec::with_capacity(geometry.cell_count());
    for cell in geometry.cells() {
        let mut opaque_pixels = 0;
        let mut rightmost = None;
        let mut coverage = Vec::with_capacity(cell.height as usize);

        for dy in 0..cell.height {
            let mut row = String::with_capacity(cell.width as usize);
            for dx in 0..cell.width {
                if rgba.get_pixel(cell.x + dx, cell.y + dy).0[3] > 0 {
                    opaque_pixels += 1;
                    rightmost = Some(rightmost.map_or(dx, |seen: u32| seen.max(dx)));
                    row.push('1');
                } else {
                    row.push('0');
                }
            }
            coverage.push(row);
        }

        slots.push(GlyphSlot {
            index: cell.index,
            x: cell.x,
            y: cell.y,
            opaque_pixels,
            advance: rightmost.map_or(1, |column| column + 1),
            coverage,
        });
    }

    debug!(
        "scanned {}x{} sheet into {} cells of {}px",
        width,
        height,
        slots.len(),
        cell_size
    );
    Ok(SheetScan { geometry, slots })
}

impl SheetScan {
    /// Identity to cell-origin map over the occupied, identifiable slots.
    pub fn charmap(&self) -> CharMap {
        CharMap::from_slots(&self.slots)
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.occupied()).count()
    }

    /// Human-readable per-slot report, optionally with coverage rows.
    pub fn report_lines(&self, with_bitmask: bool) -> Vec<String> {
        let mut lines = Vec::new();
        for slot in &self.slots {
            lines.push(slot.summary());
            if with_bitmask {
                lines.extend(slot.coverage.iter().cloned());
            }
        }
        lines
    }
}
