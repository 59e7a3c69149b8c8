use std::io;

use serde::ser::{Serialize, Serializer};

use super::slot::{GlyphSlot, SlotIdentity};
use crate::AtlasError;

/// Cell origin of one identified glyph within the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GlyphPos {
    pub x: u32,
    pub y: u32,
}

/// Mapping from glyph identity to cell origin, in raster scan order.
///
/// Serializes as a flat JSON object keyed by the rendered identity, printable
/// characters as themselves and control slots as `0x..` tags.
#[derive(Clone, Debug, Default)]
pub struct CharMap {
    entries: Vec<(SlotIdentity, GlyphPos)>,
}

impl CharMap {
    pub(crate) fn from_slots(slots: &[GlyphSlot]) -> CharMap {
        let entries = slots
            .iter()
            .filter(|slot| slot.occupied())
            .filter_map(|slot| {
                slot.identity().map(|identity| (identity, GlyphPos { x: slot.x, y: slot.y }))
            })
            .collect();
        CharMap { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(SlotIdentity, GlyphPos)] {
        &self.entries
    }

    pub fn position(&self, identity: SlotIdentity) -> Option<GlyphPos> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == identity)
            .map(|(_, position)| *position)
    }

    /// Write the map as pretty-printed JSON.
    pub fn write_json<W: io::Write>(&self, writer: W) -> Result<(), AtlasError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn to_json_string(&self) -> Result<String, AtlasError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for CharMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer
            .collect_map(self.entries.iter().map(|(identity, position)| (identity.to_string(), position)))
    }
}
