//! Character identity plus NPC-specific components and resources.
use std::{collections::VecDeque, fmt};

use bevy::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::world::tiles::TilePos;

use super::behaviour::NpcIntent;

/// Unique identifier for any character. The player is always id 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(u64);

impl CharacterId {
    pub const PLAYER: CharacterId = CharacterId(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn player() -> Self {
        Self::PLAYER
    }

    pub fn is_player(self) -> bool {
        self == Self::PLAYER
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_player() {
            write!(f, "Player")
        } else {
            write!(f, "NPC-{:04}", self.0)
        }
    }
}

/// Name and personality shared by the player and NPCs.
#[derive(Component, Debug, Clone)]
pub struct Identity {
    pub id: CharacterId,
    pub display_name: String,
    pub persona: String,
}

impl Identity {
    pub fn new(id: CharacterId, display_name: impl Into<String>, persona: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            persona: persona.into(),
        }
    }
}

/// Marker for computer-controlled villagers.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Npc;

/// Door tile of the house a character lives in.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Home(pub TilePos);

/// Decision and movement state for an NPC.
#[derive(Component, Debug, Clone, Default)]
pub struct NpcBrain {
    pub intent: NpcIntent,
    pub path: VecDeque<TilePos>,
    pub move_cooldown: u32,
    pub decide_cooldown: u32,
    pub chatter_cooldown: u32,
}

impl NpcBrain {
    pub fn with_chatter_cooldown(chatter_cooldown: u32) -> Self {
        Self {
            chatter_cooldown,
            ..Default::default()
        }
    }

    /// Switches intent and forgets any planned route.
    pub fn set_intent(&mut self, intent: NpcIntent) {
        self.intent = intent;
        self.path.clear();
    }
}

/// Present while a character is talking; keeps NPCs standing still.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InConversation {
    pub partner: CharacterId,
    pub remaining_ticks: u32,
}

/// Resource that issues monotonically increasing NPC ids.
#[derive(Resource)]
pub struct CharacterIdGenerator {
    next: u64,
}

impl Default for CharacterIdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl CharacterIdGenerator {
    pub fn next_id(&mut self) -> CharacterId {
        let id = self.next;
        self.next += 1;
        CharacterId::new(id)
    }
}

/// Seeded randomness for NPC decisions so a roster seed replays the same village.
#[derive(Resource, Deref, DerefMut)]
pub struct NpcRng(pub StdRng);

impl NpcRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_and_never_collide_with_player() {
        let mut generator = CharacterIdGenerator::default();
        let first = generator.next_id();
        let second = generator.next_id();

        assert!(!first.is_player());
        assert_eq!(first.to_string(), "NPC-0001");
        assert_eq!(second.value(), 2);
        assert_eq!(CharacterId::player().to_string(), "Player");
    }

    #[test]
    fn changing_intent_clears_path() {
        let mut brain = NpcBrain::with_chatter_cooldown(5);
        brain.path.push_back(TilePos::new(1, 1));
        brain.set_intent(NpcIntent::Eat);
        assert!(brain.path.is_empty());
        assert_eq!(brain.chatter_cooldown, 5);
    }
}
