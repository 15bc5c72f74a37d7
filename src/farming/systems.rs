//! Crop growth and farm action resolution.
use bevy::prelude::*;

use crate::{inventory::Inventory, npc::components::Identity, world::tiles::TileGrid};

use super::{
    actions::perform,
    config::FarmingConfig,
    errors::FarmingError,
    events::{FarmActionEvent, FarmActionRequest},
};

/// Advances every planted tile by one tick.
pub fn grow_crops(mut grid: ResMut<TileGrid>, config: Res<FarmingConfig>) {
    let ripened = grid.update_crops(|crop| {
        let ticks = config.crop(crop.kind).ticks_per_stage;
        crop.advance(ticks) && crop.is_ripe()
    });
    if ripened > 0 {
        debug!("{} crop tile(s) ripened", ripened);
    }
}

/// Applies queued farm actions against the grid and the actor's inventory.
pub fn apply_farm_actions(
    mut requests: MessageReader<FarmActionRequest>,
    mut grid: ResMut<TileGrid>,
    config: Res<FarmingConfig>,
    mut actors: Query<(&Identity, &mut Inventory)>,
    mut results: MessageWriter<FarmActionEvent>,
) {
    for request in requests.read() {
        let Ok((identity, mut inventory)) = actors.get_mut(request.actor) else {
            warn!("Farm action from unknown actor {:?}", request.actor);
            continue;
        };

        let result = perform(
            &mut grid,
            request.pos,
            request.action,
            &config,
            &mut inventory,
        );

        match &result {
            Ok(outcome) => debug!(
                "{} {} at {}",
                identity.display_name, outcome, request.pos
            ),
            Err(FarmingError::OutOfBounds { pos }) => {
                warn!("{} tried to farm outside the map at {}", identity.display_name, pos)
            }
            Err(err) => debug!("{} could not farm: {}", identity.display_name, err),
        }

        results.write(FarmActionEvent {
            actor: request.actor,
            character: identity.id,
            action: request.action,
            pos: request.pos,
            result,
        });
    }
}
