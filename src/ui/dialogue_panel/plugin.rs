// src/ui/dialogue_panel/plugin.rs
//
// DialoguePanelPlugin shows the latest exchange in the bottom-right corner.

use bevy::prelude::*;

use crate::dialogue::DialogueSet;

use super::components::{DialoguePanelSettings, DialoguePanelState};
use super::systems::{fade_dialogue_panel, refresh_dialogue_panel, spawn_dialogue_panel};

pub struct DialoguePanelPlugin;

impl Plugin for DialoguePanelPlugin {
    fn build(&self, app: &mut App) {
        info!("DialoguePanelPlugin registered");

        app.init_resource::<DialoguePanelSettings>()
            .init_resource::<DialoguePanelState>()
            .add_systems(Startup, spawn_dialogue_panel)
            .add_systems(
                Update,
                (
                    refresh_dialogue_panel.after(DialogueSet::React),
                    fade_dialogue_panel.after(refresh_dialogue_panel),
                ),
            );
    }
}
