//! Systems for the world module.
use bevy::prelude::*;

use crate::{npc::config::CharacterRoster, player::components::Player};

use super::{
    components::{GridPosition, MainCamera, TileSprite, TileSpriteIndex},
    config::WorldSettings,
    layout::{generate_village, VillageLot},
    tiles::TileGrid,
};

const TILE_Z: f32 = 0.0;
const CHARACTER_Z: f32 = 10.0;
const MOVE_SMOOTHING: f32 = 14.0;
const CAMERA_SMOOTHING: f32 = 6.0;

/// Generates the village map from the roster's homes and fields.
pub fn generate_world(
    mut commands: Commands,
    settings: Res<WorldSettings>,
    mut roster: ResMut<CharacterRoster>,
) {
    roster.clamp_to_map(settings.width, settings.height);
    let mut lots: Vec<VillageLot> = roster
        .npcs
        .iter()
        .map(|npc| VillageLot {
            home: npc.home,
            plot: npc.plot,
        })
        .collect();
    lots.push(VillageLot {
        home: roster.player.home,
        plot: roster.player.plot,
    });

    let grid = generate_village(&settings, &lots, &[roster.player.start]);
    info!(
        "Village generated: {}x{} tiles (seed {})",
        grid.width(),
        grid.height(),
        settings.seed
    );
    commands.insert_resource(grid);
}

/// Spawns the camera and one sprite per tile.
pub fn spawn_world_sprites(
    mut commands: Commands,
    grid: Res<TileGrid>,
    settings: Res<WorldSettings>,
    mut index: ResMut<TileSpriteIndex>,
) {
    let center = Vec2::new(grid.width() as f32, grid.height() as f32) * settings.tile_size * 0.5;
    commands.spawn((
        Camera2d,
        Transform::from_translation(center.extend(100.0)),
        MainCamera,
    ));

    let size = Vec2::splat(settings.tile_size);
    for (pos, tile) in grid.iter() {
        let entity = commands
            .spawn((
                Sprite::from_color(tile.color(), size),
                Transform::from_translation(pos.to_world(settings.tile_size).extend(TILE_Z)),
                TileSprite { pos },
            ))
            .id();
        index.by_pos.insert(pos, entity);
    }
}

/// Re-colours sprites for tiles that changed since the last frame.
pub fn refresh_tile_sprites(
    mut grid: ResMut<TileGrid>,
    index: Res<TileSpriteIndex>,
    mut sprites: Query<&mut Sprite, With<TileSprite>>,
) {
    for pos in grid.take_changed() {
        let Some(tile) = grid.get(pos).copied() else {
            continue;
        };
        let Some(entity) = index.by_pos.get(&pos) else {
            continue;
        };
        if let Ok(mut sprite) = sprites.get_mut(*entity) {
            sprite.color = tile.color();
        }
    }
}

/// Eases each character's Transform toward its logical grid position.
pub fn ease_grid_transforms(
    time: Res<Time>,
    settings: Res<WorldSettings>,
    mut query: Query<(&GridPosition, &mut Transform)>,
) {
    let blend = 1.0 - (-MOVE_SMOOTHING * time.delta_secs()).exp();
    for (position, mut transform) in query.iter_mut() {
        let target = position.to_world(settings.tile_size).extend(CHARACTER_Z);
        transform.translation = transform.translation.lerp(target, blend);
    }
}

/// Keeps the camera centred on the player.
pub fn follow_player_with_camera(
    time: Res<Time>,
    player: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut camera: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(player_transform) = player.single() else {
        return;
    };
    let Ok(mut camera_transform) = camera.single_mut() else {
        return;
    };

    let blend = 1.0 - (-CAMERA_SMOOTHING * time.delta_secs()).exp();
    let target = player_transform.translation.truncate();
    let current = camera_transform.translation.truncate();
    let next = current.lerp(target, blend);
    camera_transform.translation.x = next.x;
    camera_transform.translation.y = next.y;
}

/// Z used when placing character sprites.
pub fn character_translation(position: GridPosition, tile_size: f32) -> Vec3 {
    position.to_world(tile_size).extend(CHARACTER_Z)
}
