//! WorldPlugin coordinates map generation, tile rendering, the day clock and the camera.
use bevy::prelude::*;

use crate::{core::SimulationSet, npc::systems::spawn_npcs, player::systems::spawn_player};

use super::{
    components::TileSpriteIndex,
    config::WorldSettings,
    systems::{
        ease_grid_transforms, follow_player_with_camera, generate_world, refresh_tile_sprites,
        spawn_world_sprites,
    },
    time::{advance_world_clock, apply_sky_color, WorldClock, WorldTimeSettings},
};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        let world_settings = WorldSettings::load_or_default();
        let time_settings = WorldTimeSettings::load_or_default();
        info!(
            "World configured: {}x{} tiles of {:.0}px, day length {} ticks",
            world_settings.width,
            world_settings.height,
            world_settings.tile_size,
            time_settings.ticks_per_day
        );

        app.insert_resource(world_settings)
            .insert_resource(WorldClock::new(&time_settings))
            .insert_resource(time_settings)
            .init_resource::<TileSpriteIndex>()
            .add_systems(
                Startup,
                (
                    generate_world,
                    spawn_world_sprites,
                    spawn_player,
                    spawn_npcs,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                advance_world_clock.in_set(SimulationSet::Time),
            )
            .add_systems(
                Update,
                (
                    refresh_tile_sprites,
                    apply_sky_color,
                    ease_grid_transforms,
                    follow_player_with_camera.after(ease_grid_transforms),
                ),
            );
    }
}
