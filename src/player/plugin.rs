//! Player plugin wiring keyboard movement, farm work and the chat box.
use bevy::prelude::*;

use crate::{
    core::{hotkeys_enabled, SimulationSet},
    dialogue::DialogueSet,
};

use super::{
    components::{ChatBox, PlayerNotice},
    events::{ChatSubmitted, PlayerSpoke},
    systems::{
        deliver_chat_lines, handle_work_keys, move_player, show_action_notices,
        tick_player_notice, type_in_chat_box,
    },
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ChatBox>()
            .init_resource::<PlayerNotice>()
            .add_message::<ChatSubmitted>()
            .add_message::<PlayerSpoke>()
            .add_systems(FixedUpdate, move_player.in_set(SimulationSet::Movement))
            .add_systems(
                Update,
                (
                    type_in_chat_box,
                    handle_work_keys
                        .after(type_in_chat_box)
                        .run_if(hotkeys_enabled),
                    deliver_chat_lines
                        .after(type_in_chat_box)
                        .in_set(DialogueSet::Request),
                    show_action_notices,
                    tick_player_notice.after(show_action_notices),
                ),
            );
    }
}
