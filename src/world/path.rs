//! Breadth-first pathfinding over walkable tiles.
use std::collections::{HashMap, VecDeque};

use super::tiles::{TileGrid, TilePos};

/// Shortest 4-neighbour path from `from` to `to`.
///
/// The returned steps exclude `from` and end at `to`. An empty path means the
/// caller is already there; `None` means the goal is blocked or unreachable.
pub fn find_path(grid: &TileGrid, from: TilePos, to: TilePos) -> Option<Vec<TilePos>> {
    if from == to {
        return Some(Vec::new());
    }
    if !grid.is_walkable(to) {
        return None;
    }

    let mut came_from: HashMap<TilePos, TilePos> = HashMap::new();
    let mut frontier = VecDeque::from([from]);
    came_from.insert(from, from);

    while let Some(current) = frontier.pop_front() {
        if current == to {
            break;
        }
        for next in current.neighbors4() {
            if came_from.contains_key(&next) || !grid.is_walkable(next) {
                continue;
            }
            came_from.insert(next, current);
            frontier.push_back(next);
        }
    }

    if !came_from.contains_key(&to) {
        return None;
    }

    let mut path = Vec::new();
    let mut cursor = to;
    while cursor != from {
        path.push(cursor);
        cursor = *came_from.get(&cursor)?;
    }
    path.reverse();
    Some(path)
}
