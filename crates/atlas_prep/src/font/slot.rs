use std::fmt;

/// Opaque pixels a cell must exceed to count as occupied. At or below this
/// the coverage is treated as stray anti-aliasing noise.
pub const OCCUPANCY_THRESHOLD: usize = 2;

/// Identity assigned to an occupied glyph slot from its raster index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotIdentity {
    /// Printable ASCII, indices 32 through 126.
    Printable(char),
    /// Control or extended slot below 256, tagged by index.
    Tag(u8),
}

impl SlotIdentity {
    /// Identity for a raster index, or None for indices 256 and above.
    pub fn from_index(index: usize) -> Option<SlotIdentity> {
        if (32..127).contains(&index) {
            Some(SlotIdentity::Printable(index as u8 as char))
        } else if index < 256 {
            Some(SlotIdentity::Tag(index as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for SlotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotIdentity::Printable(ch) => write!(f, "{ch}"),
            SlotIdentity::Tag(index) => write!(f, "0x{index:02x}"),
        }
    }
}

/// One fixed-size cell of a scanned font sheet.
#[derive(Clone, Debug)]
pub struct GlyphSlot {
    /// 0-based raster index within the sheet.
    pub index: usize,
    /// Top-left pixel of the cell.
    pub x: u32,
    pub y: u32,
    /// Count of pixels in the cell with alpha above zero.
    pub opaque_pixels: usize,
    /// Advance width in pixels: rightmost opaque column plus one, never below 1.
    pub advance: u32,
    /// Per-row coverage strings, '1' where alpha is above zero.
    pub coverage: Vec<String>,
}

impl GlyphSlot {
    pub fn occupied(&self) -> bool {
        self.opaque_pixels > OCCUPANCY_THRESHOLD
    }

    pub fn identity(&self) -> Option<SlotIdentity> {
        SlotIdentity::from_index(self.index)
    }

    /// Flat row-major 0/1 coverage string.
    pub fn bitmask(&self) -> String {
        self.coverage.concat()
    }

    /// One-line description for scan reports.
    pub fn summary(&self) -> String {
        let label = match self.identity() {
            Some(identity) => format!("'{identity}'"),
            None => String::from("--"),
        };
        let state = if self.occupied() { "occupied" } else { "empty" };
        format!(
            "[{:3}] {:6} at ({:3},{:3}) - {} ({} px, advance {})",
            self.index, label, self.x, self.y, state, self.opaque_pixels, self.advance
        )
    }
}
