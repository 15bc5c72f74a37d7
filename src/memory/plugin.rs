//! Memory plugin: records conversations, farm work and meals.
use bevy::prelude::*;

use crate::core::SimulationSet;

use super::{
    config::MemoryConfig,
    systems::{
        record_dialogue_memories, record_farm_memories, record_meal_memories,
        record_player_speech,
    },
};

pub struct MemoryPlugin;

impl Plugin for MemoryPlugin {
    fn build(&self, app: &mut App) {
        let config = MemoryConfig::load_or_default();
        info!(
            "Memory configured: {} short-term entries, {} long-term summaries",
            config.short_term_capacity, config.long_term_capacity
        );

        app.insert_resource(config)
            .add_systems(
                FixedUpdate,
                (record_farm_memories, record_meal_memories).in_set(SimulationSet::Memory),
            )
            .add_systems(Update, (record_player_speech, record_dialogue_memories));
    }
}
