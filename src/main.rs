use std::path::Path;

use bevy::prelude::*;

mod core;
mod dialogue;
mod farming;
mod inventory;
mod memory;
mod needs;
mod npc;
mod player;
mod state;
mod ui;
mod world;

use crate::{
    core::CorePlugin, dialogue::DialoguePlugin, farming::FarmingPlugin, memory::MemoryPlugin,
    needs::NeedsPlugin, npc::NpcPlugin, player::PlayerPlugin, state::StatePlugin, ui::UiPlugin,
    world::WorldPlugin,
};

fn main() {
    load_secrets_env();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Townsfolk".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            CorePlugin::default(),
            WorldPlugin,
            FarmingPlugin,
            NeedsPlugin,
            NpcPlugin,
            MemoryPlugin,
            DialoguePlugin,
            PlayerPlugin,
            UiPlugin, // After DialoguePlugin to receive DialogueResponseEvent
            StatePlugin,
        ))
        .run();
}

fn load_secrets_env() {
    const SECRETS_FILE: &str = "secrets.env";

    let path = Path::new(SECRETS_FILE);
    if !path.exists() {
        return;
    }

    if let Err(err) = dotenvy::from_filename(path) {
        eprintln!("Failed to load {}: {}", SECRETS_FILE, err);
    }
}
