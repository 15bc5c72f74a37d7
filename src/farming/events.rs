//! Messages exchanged between farm workers and the farming systems.
use bevy::prelude::*;

use crate::{npc::components::CharacterId, world::tiles::TilePos};

use super::{
    actions::{FarmAction, FarmOutcome},
    errors::FarmingError,
};

/// Asks for `action` to be done on `pos` using the actor's inventory.
#[derive(Message, Debug, Clone, Copy)]
pub struct FarmActionRequest {
    pub actor: Entity,
    pub action: FarmAction,
    pub pos: TilePos,
}

/// Result of a processed `FarmActionRequest`.
#[derive(Message, Debug, Clone)]
pub struct FarmActionEvent {
    pub actor: Entity,
    pub character: CharacterId,
    pub action: FarmAction,
    pub pos: TilePos,
    pub result: Result<FarmOutcome, FarmingError>,
}
