//! Messages emitted by the dialogue queue runner.
use bevy::prelude::Message;

use crate::npc::components::CharacterId;

use super::{errors::DialogueError, types::DialogueResponse};

/// Fired when a dialogue request succeeds.
#[derive(Message, Debug, Clone)]
pub struct DialogueResponseEvent {
    pub response: DialogueResponse,
}

/// Fired when a dialogue request fails for good.
#[derive(Message, Debug, Clone)]
pub struct DialogueRequestFailedEvent {
    pub speaker: CharacterId,
    pub error: DialogueError,
}
