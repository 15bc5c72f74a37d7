//! StatePlugin binds quick save and quick load to the keyboard.
use bevy::prelude::*;

use crate::core::hotkeys_enabled;

use super::systems::{load_snapshot_on_key, save_snapshot_on_key, SnapshotSettings};

pub struct StatePlugin;

impl Plugin for StatePlugin {
    fn build(&self, app: &mut App) {
        let settings = SnapshotSettings::default();
        info!("StatePlugin registered; F5 saves and F9 loads {}", settings.path.display());

        app.insert_resource(settings).add_systems(
            Update,
            (save_snapshot_on_key, load_snapshot_on_key)
                .chain()
                .run_if(hotkeys_enabled),
        );
    }
}
