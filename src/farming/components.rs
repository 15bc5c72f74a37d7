//! Components tying characters to the land they farm.
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::world::tiles::TilePos;

/// Rectangle of tiles a character considers their own field.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmPlot {
    pub origin: TilePos,
    pub width: i32,
    pub height: i32,
}

impl FarmPlot {
    pub fn new(origin: TilePos, width: i32, height: i32) -> Self {
        Self {
            origin,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x >= self.origin.x
            && pos.y >= self.origin.y
            && pos.x < self.origin.x + self.width
            && pos.y < self.origin.y + self.height
    }

    pub fn tiles(&self) -> impl Iterator<Item = TilePos> + '_ {
        (0..self.height).flat_map(move |dy| {
            (0..self.width).map(move |dx| self.origin.offset(dx, dy))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_covers_its_rectangle() {
        let plot = FarmPlot::new(TilePos::new(2, 3), 3, 2);
        let tiles: Vec<_> = plot.tiles().collect();
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles[0], TilePos::new(2, 3));
        assert_eq!(tiles[5], TilePos::new(4, 4));
        assert!(plot.contains(TilePos::new(4, 4)));
        assert!(!plot.contains(TilePos::new(5, 4)));
    }
}
