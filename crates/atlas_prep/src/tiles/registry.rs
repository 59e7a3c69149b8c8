use serde::{Deserialize, Serialize};

use super::rect::TileRect;
use crate::AtlasError;

/// A named crop region, the unit the registry stores and exports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTile {
    pub name: String,
    #[serde(flatten)]
    pub rect: TileRect,
}

/// Named tiles for one cutting session, in definition order.
///
/// Names are unique; redefining a name replaces the rectangle without moving
/// the entry. Zero-size rectangles are never admitted.
#[derive(Clone, Debug, Default)]
pub struct TileRegistry {
    tiles: Vec<NamedTile>,
}

impl TileRegistry {
    pub fn new() -> TileRegistry {
        TileRegistry::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[NamedTile] {
        &self.tiles
    }

    pub fn get(&self, name: &str) -> Option<&NamedTile> {
        self.tiles.iter().find(|tile| tile.name == name)
    }

    /// Add a tile, replacing an existing entry with the same name in place.
    pub fn define(&mut self, name: impl Into<String>, rect: TileRect) -> Result<(), AtlasError> {
        let name = name.into();
        if rect.is_empty() {
            return Err(AtlasError::ZeroSizeTile { name });
        }

        match self.tiles.iter_mut().find(|tile| tile.name == name) {
            Some(existing) => existing.rect = rect,
            None => self.tiles.push(NamedTile { name, rect }),
        }
        Ok(())
    }

    /// Define from two corner points. An empty name falls back to
    /// `element_{n}` where `n` is the registry size at the time of the call.
    /// Returns the name the tile was stored under.
    pub fn define_from_points(
        &mut self,
        first: (u32, u32),
        second: (u32, u32),
        name: &str,
    ) -> Result<String, AtlasError> {
        let rect = TileRect::from_points(first, second)?;
        let name = if name.is_empty() {
            format!("element_{}", self.tiles.len())
        } else {
            name.to_owned()
        };
        self.define(name.clone(), rect)?;
        Ok(name)
    }

    /// Define the grid cell containing a pixel as a cell-sized tile.
    pub fn define_at_cell(
        &mut self,
        pixel: (u32, u32),
        cell_size: u32,
        name: &str,
    ) -> Result<String, AtlasError> {
        if name.is_empty() {
            return Err(AtlasError::EmptyName);
        }

        let rect = TileRect::at_cell(pixel, cell_size)?;
        self.define(name, rect)?;
        Ok(name.to_owned())
    }

    /// Remove by list position, returning the removed tile. Out-of-range
    /// positions are a no-op.
    pub fn remove(&mut self, index: usize) -> Option<NamedTile> {
        if index < self.tiles.len() {
            Some(self.tiles.remove(index))
        } else {
            None
        }
    }
}
