/// Geometry of a fixed-size cell grid laid over a bitmap.
///
/// Cells are addressed by 0-based raster index (row-major, left to right then
/// top to bottom). When the bitmap dimensions are not exact multiples of the
/// cell size, the rightmost column and bottom row hold partial cells clipped
/// to the bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridGeometry {
    pub columns: u32,
    pub rows: u32,
    pub cell_size: u32,
    source_width: u32,
    source_height: u32,
}

/// One cell of a [`GridGeometry`], clipped to the source bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub index: usize,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl GridGeometry {
    pub fn derive(source_width: u32, source_height: u32, cell_size: u32) -> Option<GridGeometry> {
        if source_width == 0 || source_height == 0 || cell_size == 0 {
            return None;
        }

        Some(GridGeometry {
            columns: (source_width + cell_size - 1) / cell_size,
            rows: (source_height + cell_size - 1) / cell_size,
            cell_size,
            source_width,
            source_height,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        if index >= self.cell_count() {
            return None;
        }

        let column = (index % self.columns as usize) as u32;
        let row = (index / self.columns as usize) as u32;
        let x = column * self.cell_size;
        let y = row * self.cell_size;

        Some(Cell {
            index,
            x,
            y,
            width: self.cell_size.min(self.source_width - x),
            height: self.cell_size.min(self.source_height - y),
        })
    }

    /// Iterate every cell in raster order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.cell_count()).filter_map(move |index| self.cell(index))
    }

    /// Raster index of the cell containing a pixel, or None outside the bitmap.
    pub fn index_at(&self, px: u32, py: u32) -> Option<usize> {
        if px >= self.source_width || py >= self.source_height {
            return None;
        }

        let column = px / self.cell_size;
        let row = py / self.cell_size;
        Some(row as usize * self.columns as usize + column as usize)
    }
}

/// Top-left corner of the fixed-grid cell containing a pixel.
///
/// `cell_size` must be nonzero.
pub fn cell_origin(px: u32, py: u32, cell_size: u32) -> (u32, u32) {
    (px / cell_size * cell_size, py / cell_size * cell_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_rejects_degenerate_input() {
        assert!(GridGeometry::derive(0, 32, 8).is_none());
        assert!(GridGeometry::derive(32, 0, 8).is_none());
        assert!(GridGeometry::derive(32, 32, 0).is_none());
    }

    #[test]
    fn even_division_covers_every_cell_once() {
        let geometry = GridGeometry::derive(128, 32, 8).unwrap();
        assert_eq!(geometry.columns, 16);
        assert_eq!(geometry.rows, 4);
        assert_eq!(geometry.cell_count(), 64);

        let cells: Vec<Cell> = geometry.cells().collect();
        assert_eq!(cells.len(), 64);
        for (expected, cell) in cells.iter().enumerate() {
            assert_eq!(cell.index, expected);
            assert_eq!(cell.width, 8);
            assert_eq!(cell.height, 8);
        }

        // Raster order: x advances first, then y.
        assert_eq!((cells[0].x, cells[0].y), (0, 0));
        assert_eq!((cells[1].x, cells[1].y), (8, 0));
        assert_eq!((cells[16].x, cells[16].y), (0, 8));
        assert_eq!((cells[33].x, cells[33].y), (8, 16));
    }

    #[test]
    fn trailing_cells_are_clipped() {
        let geometry = GridGeometry::derive(12, 10, 8).unwrap();
        assert_eq!(geometry.columns, 2);
        assert_eq!(geometry.rows, 2);

        let last = geometry.cell(3).unwrap();
        assert_eq!((last.x, last.y), (8, 8));
        assert_eq!((last.width, last.height), (4, 2));
    }

    #[test]
    fn index_at_matches_cell_origins() {
        let geometry = GridGeometry::derive(128, 32, 8).unwrap();
        assert_eq!(geometry.index_at(0, 0), Some(0));
        assert_eq!(geometry.index_at(7, 7), Some(0));
        assert_eq!(geometry.index_at(8, 0), Some(1));
        assert_eq!(geometry.index_at(8, 16), Some(33));
        assert_eq!(geometry.index_at(128, 0), None);
    }

    #[test]
    fn cell_origin_floors_to_the_grid() {
        assert_eq!(cell_origin(0, 0, 64), (0, 0));
        assert_eq!(cell_origin(63, 63, 64), (0, 0));
        assert_eq!(cell_origin(64, 130, 64), (64, 128));
    }
}
