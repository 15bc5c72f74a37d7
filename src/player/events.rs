//! Messages produced by the player's chat box.
use bevy::prelude::*;

/// A line submitted from the chat box, before it is routed to a listener.
#[derive(Message, Debug, Clone)]
pub struct ChatSubmitted {
    pub text: String,
}

/// The player said something, possibly to a specific villager.
#[derive(Message, Debug, Clone)]
pub struct PlayerSpoke {
    pub player: Entity,
    pub text: String,
    pub addressed: Option<Entity>,
}
