//! Builds dialogue context from a character's components.
use crate::{
    inventory::Inventory,
    memory::{config::MemoryConfig, Memory},
    needs::HungerLevel,
    npc::components::Identity,
    world::time::WorldClock,
};

use super::types::DialogueContext;

/// Borrowed view of the components describing a speaker.
pub struct SpeakerState<'a> {
    pub identity: &'a Identity,
    pub hunger: HungerLevel,
    pub inventory: &'a Inventory,
    pub activity: String,
    pub memory: &'a Memory,
}

pub fn state_summary(speaker: &SpeakerState<'_>, clock: &WorldClock) -> String {
    format!(
        "It is {}. You feel {}. You carry {}. You are {}.",
        clock.stamp(),
        speaker.hunger.label(),
        speaker.inventory.summary(),
        speaker.activity
    )
}

pub fn build_context(
    speaker: &SpeakerState<'_>,
    target_name: Option<&str>,
    clock: &WorldClock,
    config: &MemoryConfig,
) -> DialogueContext {
    let long_term: Vec<String> = speaker
        .memory
        .long_term()
        .map(|memory| memory.summary.clone())
        .collect();
    let skip = long_term.len().saturating_sub(config.prompt_long_term);

    DialogueContext {
        speaker_name: speaker.identity.display_name.clone(),
        target_name: target_name.map(str::to_string),
        persona: speaker.identity.persona.clone(),
        hunger: speaker.hunger,
        state_summary: state_summary(speaker, clock),
        long_term: long_term.into_iter().skip(skip).collect(),
        recent: speaker
            .memory
            .recent(config.prompt_recent)
            .map(|entry| entry.prompt_line())
            .collect(),
    }
}
