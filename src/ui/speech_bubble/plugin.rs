// src/ui/speech_bubble/plugin.rs
//
// Plugin registration for speech bubble systems.

use bevy::prelude::*;

use crate::dialogue::DialogueSet;

use super::components::SpeechBubbleSettings;
use super::systems::{
    age_speech, attach_speech_labels, show_dialogue_failures, show_dialogue_responses,
    sync_speech_labels,
};

/// Draws each character's current line as a `Text2d` child above its sprite.
///
/// # System Ordering
///
/// 1. `show_dialogue_responses` / `show_dialogue_failures` react to the dialogue pipeline
/// 2. `attach_speech_labels` adds labels to new speakers
/// 3. `age_speech` then `sync_speech_labels` copy line and fade into the label
pub struct SpeechBubblePlugin;

impl Plugin for SpeechBubblePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpeechBubbleSettings>().add_systems(
            Update,
            (
                (show_dialogue_responses, show_dialogue_failures).in_set(DialogueSet::React),
                attach_speech_labels,
                age_speech,
                sync_speech_labels
                    .after(attach_speech_labels)
                    .after(age_speech)
                    .after(DialogueSet::React),
            ),
        );

        info!("SpeechBubblePlugin registered");
    }
}
