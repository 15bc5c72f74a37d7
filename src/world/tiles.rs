//! Tile grid: coordinates, tile states and the grid resource.
use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::farming::crops::{CropKind, CropStage, CropState};

use super::errors::WorldError;

/// Integer grid coordinate. `(0, 0)` is the bottom-left tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn neighbors4(self) -> [TilePos; 4] {
        [
            TilePos::new(self.x + 1, self.y),
            TilePos::new(self.x - 1, self.y),
            TilePos::new(self.x, self.y + 1),
            TilePos::new(self.x, self.y - 1),
        ]
    }

    pub fn manhattan(self, other: TilePos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn chebyshev(self, other: TilePos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn offset(self, dx: i32, dy: i32) -> TilePos {
        TilePos::new(self.x + dx, self.y + dy)
    }

    /// Centre of the tile in world units.
    pub fn to_world(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }

    /// Nearest tile to a world-space point.
    pub fn from_world(position: Vec2, tile_size: f32) -> Self {
        let size = tile_size.max(f32::EPSILON);
        Self::new(
            (position.x / size).round() as i32,
            (position.y / size).round() as i32,
        )
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// What occupies a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "tile", rename_all = "snake_case")]
pub enum Tile {
    #[default]
    Grass,
    Path,
    Water,
    Building,
    Tilled,
    Crop(CropState),
}

impl Tile {
    pub fn is_walkable(&self) -> bool {
        !matches!(self, Self::Water | Self::Building)
    }

    pub fn crop(&self) -> Option<&CropState> {
        match self {
            Self::Crop(state) => Some(state),
            _ => None,
        }
    }

    pub fn is_ripe_crop(&self) -> bool {
        self.crop().is_some_and(CropState::is_ripe)
    }

    pub fn label(&self) -> String {
        match self {
            Self::Grass => "grass".to_string(),
            Self::Path => "path".to_string(),
            Self::Water => "water".to_string(),
            Self::Building => "building".to_string(),
            Self::Tilled => "tilled soil".to_string(),
            Self::Crop(state) => format!("{} {}", state.stage.label(), state.kind.label()),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Grass => Color::srgb(0.36, 0.62, 0.30),
            Self::Path => Color::srgb(0.72, 0.63, 0.45),
            Self::Water => Color::srgb(0.22, 0.45, 0.78),
            Self::Building => Color::srgb(0.52, 0.34, 0.26),
            Self::Tilled => Color::srgb(0.45, 0.30, 0.18),
            Self::Crop(state) => match (state.stage, state.kind) {
                (CropStage::Seed, _) => Color::srgb(0.40, 0.30, 0.16),
                (CropStage::Sprout, _) => Color::srgb(0.50, 0.72, 0.35),
                (CropStage::Growing, _) => Color::srgb(0.25, 0.55, 0.20),
                (CropStage::Ripe, CropKind::Wheat) => Color::srgb(0.90, 0.78, 0.35),
                (CropStage::Ripe, CropKind::Carrot) => Color::srgb(0.93, 0.52, 0.18),
            },
        }
    }
}

/// The world map, stored row-major with change tracking for rendering.
#[derive(Resource, Debug, Clone)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    changed: Vec<TilePos>,
}

impl TileGrid {
    pub fn new(width: i32, height: i32, fill: Tile) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            tiles: vec![fill; (width * height) as usize],
            changed: Vec::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: TilePos) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    fn pos_of(&self, index: usize) -> TilePos {
        let index = index as i32;
        TilePos::new(index % self.width, index / self.width)
    }

    pub fn get(&self, pos: TilePos) -> Option<&Tile> {
        self.index(pos).map(|index| &self.tiles[index])
    }

    pub fn set(&mut self, pos: TilePos, tile: Tile) -> Result<(), WorldError> {
        let index = self.index(pos).ok_or(WorldError::OutOfBounds { pos })?;
        if self.tiles[index] != tile {
            self.tiles[index] = tile;
            self.changed.push(pos);
        }
        Ok(())
    }

    pub fn is_walkable(&self, pos: TilePos) -> bool {
        self.get(pos).is_some_and(Tile::is_walkable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TilePos, &Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| (self.pos_of(index), tile))
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Closest tile (manhattan distance) matching `predicate`.
    pub fn find_nearest(
        &self,
        from: TilePos,
        mut predicate: impl FnMut(TilePos, &Tile) -> bool,
    ) -> Option<TilePos> {
        self.iter()
            .filter(|(pos, tile)| predicate(*pos, tile))
            .min_by_key(|(pos, _)| pos.manhattan(from))
            .map(|(pos, _)| pos)
    }

    /// Runs `grow` on every crop tile, tracking the ones whose appearance changed.
    pub fn update_crops(&mut self, mut grow: impl FnMut(&mut CropState) -> bool) -> usize {
        let mut updated = 0;
        for index in 0..self.tiles.len() {
            if let Tile::Crop(state) = &mut self.tiles[index] {
                if grow(state) {
                    updated += 1;
                    let pos = self.pos_of(index);
                    self.changed.push(pos);
                }
            }
        }
        updated
    }

    /// Drains the tiles modified since the last call.
    pub fn take_changed(&mut self) -> Vec<TilePos> {
        std::mem::take(&mut self.changed)
    }

    pub fn mark_all_changed(&mut self) {
        self.changed = (0..self.tiles.len()).map(|index| self.pos_of(index)).collect();
    }

    /// Replaces every tile at once (used when loading a snapshot).
    pub fn replace_tiles(
        &mut self,
        width: i32,
        height: i32,
        tiles: Vec<Tile>,
    ) -> Result<(), WorldError> {
        if width != self.width
            || height != self.height
            || tiles.len() != (self.width * self.height) as usize
        {
            return Err(WorldError::SizeMismatch {
                expected: (self.width, self.height),
                found: (width, height),
            });
        }
        self.tiles = tiles;
        self.mark_all_changed();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_tracks_changes_and_rejects_out_of_bounds() {
        let mut grid = TileGrid::new(4, 3, Tile::Grass);
        assert_eq!(grid.tiles().len(), 12);

        grid.set(TilePos::new(1, 2), Tile::Water).unwrap();
        grid.set(TilePos::new(0, 0), Tile::Grass).unwrap();
        assert_eq!(grid.get(TilePos::new(1, 2)), Some(&Tile::Water));
        assert_eq!(grid.take_changed(), vec![TilePos::new(1, 2)]);
        assert!(grid.take_changed().is_empty());

        let err = grid.set(TilePos::new(4, 0), Tile::Path).unwrap_err();
        assert_eq!(
            err,
            WorldError::OutOfBounds {
                pos: TilePos::new(4, 0)
            }
        );
        assert!(grid.get(TilePos::new(-1, 0)).is_none());
    }

    #[test]
    fn walkability_follows_tile_kind() {
        let mut grid = TileGrid::new(3, 3, Tile::Grass);
        grid.set(TilePos::new(1, 1), Tile::Building).unwrap();
        grid.set(TilePos::new(2, 2), Tile::Crop(CropState::planted(CropKind::Wheat)))
            .unwrap();

        assert!(!grid.is_walkable(TilePos::new(1, 1)));
        assert!(grid.is_walkable(TilePos::new(2, 2)));
        assert!(!grid.is_walkable(TilePos::new(3, 3)));
    }

    #[test]
    fn finds_nearest_matching_tile() {
        let mut grid = TileGrid::new(10, 10, Tile::Grass);
        grid.set(TilePos::new(9, 9), Tile::Tilled).unwrap();
        grid.set(TilePos::new(2, 1), Tile::Tilled).unwrap();

        let nearest = grid.find_nearest(TilePos::new(0, 0), |_, tile| *tile == Tile::Tilled);
        assert_eq!(nearest, Some(TilePos::new(2, 1)));
        assert!(grid
            .find_nearest(TilePos::new(0, 0), |_, tile| *tile == Tile::Water)
            .is_none());
    }

    #[test]
    fn update_crops_marks_changed_tiles() {
        let mut grid = TileGrid::new(3, 1, Tile::Grass);
        grid.set(TilePos::new(2, 0), Tile::Crop(CropState::planted(CropKind::Carrot)))
            .unwrap();
        grid.take_changed();

        assert_eq!(grid.update_crops(|crop| crop.advance(1)), 1);
        assert_eq!(grid.take_changed(), vec![TilePos::new(2, 0)]);
        assert_eq!(
            grid.get(TilePos::new(2, 0)).and_then(Tile::crop).map(|c| c.stage),
            Some(CropStage::Sprout)
        );
    }

    #[test]
    fn replace_tiles_requires_matching_size() {
        let mut grid = TileGrid::new(2, 2, Tile::Grass);
        assert!(grid.replace_tiles(3, 2, vec![Tile::Path; 6]).is_err());
        grid.replace_tiles(2, 2, vec![Tile::Path; 4]).unwrap();
        assert!(grid.iter().all(|(_, tile)| *tile == Tile::Path));
        assert_eq!(grid.take_changed().len(), 4);
    }

    #[test]
    fn world_conversion_snaps_to_nearest_tile() {
        let pos = TilePos::new(3, -2);
        assert_eq!(pos.to_world(24.0), Vec2::new(72.0, -48.0));
        assert_eq!(TilePos::from_world(Vec2::new(80.0, -40.0), 24.0), pos);
        assert_eq!(pos.chebyshev(TilePos::new(5, 5)), 7);
    }
}
