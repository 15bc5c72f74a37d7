//! NPC plugin wiring the roster, decision making, movement and chatter.
use bevy::prelude::*;

use crate::{core::SimulationSet, dialogue::DialogueSet};

use super::{
    components::{CharacterIdGenerator, NpcRng},
    config::CharacterRoster,
    social::{reply_to_npc_openers, start_npc_chatter},
    systems::{act_on_arrival, count_down_conversations, decide_intents, move_npcs},
};

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        let roster = CharacterRoster::load_or_default();
        info!(
            "Roster loaded: {} villager(s), chat range {}, chatter every {} ticks",
            roster.npcs.len(),
            roster.chat_range,
            roster.chatter_cooldown_ticks
        );

        app.insert_resource(NpcRng::seeded(roster.seed))
            .insert_resource(roster)
            .init_resource::<CharacterIdGenerator>()
            .add_systems(
                FixedUpdate,
                (
                    (count_down_conversations, start_npc_chatter, decide_intents)
                        .chain()
                        .in_set(SimulationSet::Intent),
                    (move_npcs, act_on_arrival)
                        .chain()
                        .in_set(SimulationSet::Movement),
                ),
            )
            .add_systems(Update, reply_to_npc_openers.in_set(DialogueSet::React));
    }
}
