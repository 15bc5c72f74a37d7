//! Components and resources used by the world module.
use std::collections::HashMap;

use bevy::prelude::*;

use super::tiles::TilePos;

/// Logical tile a character occupies. Rendering eases the Transform toward it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Deref, DerefMut)]
pub struct GridPosition(pub TilePos);

/// Sprite entity drawing one map tile.
#[derive(Component, Debug, Clone, Copy)]
pub struct TileSprite {
    pub pos: TilePos,
}

/// Lookup from tile position to its sprite entity.
#[derive(Resource, Debug, Default)]
pub struct TileSpriteIndex {
    pub by_pos: HashMap<TilePos, Entity>,
}

/// Marker component for the 2D camera that follows the player.
#[derive(Component, Default)]
pub struct MainCamera;
