// src/ui/mod.rs
//
// UI module: speech above characters plus screen-space HUD, chat box and dialogue panel.

pub mod chat_box;
pub mod dialogue_panel;
pub mod hud;
pub mod speech_bubble;

use bevy::prelude::*;

use chat_box::{spawn_chat_box, update_chat_box};
use dialogue_panel::DialoguePanelPlugin;
use hud::{spawn_hud, update_hud};
use speech_bubble::SpeechBubblePlugin;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        info!("UiPlugin registered");

        app.add_plugins((SpeechBubblePlugin, DialoguePanelPlugin))
            .add_systems(Startup, (spawn_hud, spawn_chat_box))
            .add_systems(Update, (update_hud, update_chat_box));
    }
}
