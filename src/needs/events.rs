//! Hunger related messages.
use bevy::prelude::*;

use crate::{inventory::ItemKind, npc::components::CharacterId};

use super::components::HungerLevel;

/// Fired when a character crosses a hunger threshold.
#[derive(Message, Debug, Clone, Copy)]
pub struct HungerLevelChanged {
    pub actor: Entity,
    pub character: CharacterId,
    pub from: HungerLevel,
    pub to: HungerLevel,
}

/// Asks the actor to eat the most nourishing food they carry.
#[derive(Message, Debug, Clone, Copy)]
pub struct EatRequest {
    pub actor: Entity,
}

/// Outcome of an `EatRequest`; `item` is `None` when there was nothing to eat.
#[derive(Message, Debug, Clone, Copy)]
pub struct MealEaten {
    pub actor: Entity,
    pub character: CharacterId,
    pub item: Option<ItemKind>,
}
