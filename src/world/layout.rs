//! Deterministic village map generation.
use bevy::prelude::warn;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::farming::components::FarmPlot;

use super::{
    config::WorldSettings,
    tiles::{Tile, TileGrid, TilePos},
};

const POND_RADIUS_X: f32 = 3.2;
const POND_RADIUS_Y: f32 = 2.2;
const HOUSE_HALF_WIDTH: i32 = 1;
const HOUSE_HEIGHT: i32 = 2;

/// A household: the door tile a character lives at and the field they tend.
#[derive(Debug, Clone, Copy)]
pub struct VillageLot {
    pub home: TilePos,
    pub plot: Option<FarmPlot>,
}

/// Builds the village: grass, a crossroads of paths, a pond, houses and fields.
pub fn generate_village(
    settings: &WorldSettings,
    lots: &[VillageLot],
    reserved: &[TilePos],
) -> TileGrid {
    let mut grid = TileGrid::new(settings.width, settings.height, Tile::Grass);
    let mut rng = StdRng::seed_from_u64(settings.seed);

    let mid_x = settings.width / 2;
    let mid_y = settings.height / 2;
    for x in 0..settings.width {
        let _ = grid.set(TilePos::new(x, mid_y), Tile::Path);
    }
    for y in 0..settings.height {
        let _ = grid.set(TilePos::new(mid_x, y), Tile::Path);
    }

    let plots: Vec<FarmPlot> = lots.iter().filter_map(|lot| lot.plot).collect();
    let near_protected = |pos: TilePos| {
        plots
            .iter()
            .any(|plot| plot.contains(pos) || plot.tiles().any(|tile| tile.chebyshev(pos) <= 1))
            || lots.iter().any(|lot| lot.home.chebyshev(pos) <= HOUSE_HEIGHT + 1)
            || reserved.iter().any(|tile| tile.chebyshev(pos) <= 1)
    };

    let pond_center = TilePos::new(
        rng.gen_range(4..(mid_x - 3).max(5)),
        rng.gen_range(3..(mid_y - 3).max(4)),
    );
    for (pos, tile) in pond_tiles(pond_center) {
        if grid.get(pos) == Some(&Tile::Grass) && !near_protected(pos) {
            let _ = grid.set(pos, tile);
        }
    }

    for lot in lots {
        for dx in -HOUSE_HALF_WIDTH..=HOUSE_HALF_WIDTH {
            for dy in 1..=HOUSE_HEIGHT {
                let pos = lot.home.offset(dx, dy);
                if plots.iter().any(|plot| plot.contains(pos)) {
                    continue;
                }
                let _ = grid.set(pos, Tile::Building);
            }
        }
    }

    for plot in &plots {
        for pos in plot.tiles() {
            let _ = grid.set(pos, Tile::Tilled);
        }
    }

    for pos in lots.iter().map(|lot| lot.home).chain(reserved.iter().copied()) {
        if !grid.is_walkable(pos) {
            if let Err(err) = grid.set(pos, Tile::Path) {
                warn!("Home or start tile cannot be cleared: {}", err);
            }
        }
    }

    grid.take_changed();
    grid
}

fn pond_tiles(center: TilePos) -> Vec<(TilePos, Tile)> {
    let reach_x = POND_RADIUS_X.ceil() as i32;
    let reach_y = POND_RADIUS_Y.ceil() as i32;
    let mut tiles = Vec::new();
    for dy in -reach_y..=reach_y {
        for dx in -reach_x..=reach_x {
            let nx = dx as f32 / POND_RADIUS_X;
            let ny = dy as f32 / POND_RADIUS_Y;
            if nx * nx + ny * ny <= 1.0 {
                tiles.push((center.offset(dx, dy), Tile::Water));
            }
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::path::find_path;

    fn lots() -> Vec<VillageLot> {
        vec![
            VillageLot {
                home: TilePos::new(10, 20),
                plot: Some(FarmPlot::new(TilePos::new(6, 16), 5, 3)),
            },
            VillageLot {
                home: TilePos::new(30, 20),
                plot: Some(FarmPlot::new(TilePos::new(26, 16), 5, 3)),
            },
        ]
    }

    #[test]
    fn layout_is_deterministic_for_a_seed() {
        let settings = WorldSettings::default();
        let first = generate_village(&settings, &lots(), &[TilePos::new(20, 14)]);
        let second = generate_village(&settings, &lots(), &[TilePos::new(20, 14)]);
        assert_eq!(first.tiles(), second.tiles());
        assert!(first.iter().any(|(_, tile)| *tile == Tile::Water));
        assert!(first.iter().any(|(_, tile)| *tile == Tile::Building));
    }

    #[test]
    fn plots_are_tilled_and_homes_reachable() {
        let settings = WorldSettings::default();
        let lots = lots();
        let start = TilePos::new(20, 14);
        let grid = generate_village(&settings, &lots, &[start]);

        for lot in &lots {
            let plot = lot.plot.unwrap();
            assert!(plot
                .tiles()
                .all(|pos| grid.get(pos) == Some(&Tile::Tilled)));
            assert!(grid.is_walkable(lot.home));
            assert!(find_path(&grid, start, lot.home).is_some());
            assert!(find_path(&grid, lot.home, plot.origin).is_some());
        }
        assert!(grid.is_walkable(start));
    }

    #[test]
    fn off_map_homes_do_not_stop_generation() {
        let settings = WorldSettings::default();
        let mut lots = lots();
        lots.push(VillageLot {
            home: TilePos::new(settings.width + 5, -3),
            plot: None,
        });
        let start = TilePos::new(20, 14);
        let grid = generate_village(&settings, &lots, &[start]);

        assert!(!grid.in_bounds(lots[2].home));
        assert!(grid.is_walkable(lots[0].home));
        assert!(grid.is_walkable(start));
    }
}
