// src/ui/hud.rs
//
// Top-left status readout: clock, speed, hunger, inventory, dialogue provider and notices.

use bevy::prelude::*;

use crate::core::plugin::SimulationClock;
use crate::dialogue::status::DialogueBrokerStatus;
use crate::inventory::Inventory;
use crate::needs::{config::NeedsConfig, Hunger, HungerLevel};
use crate::player::components::{Player, PlayerNotice};
use crate::world::time::WorldClock;

const HUD_FONT_SIZE: f32 = 15.0;
const HUD_BACKGROUND: Color = Color::srgba(0.05, 0.05, 0.08, 0.75);
const CONTROLS: &str =
    "WASD/arrows move | F work | Q eat | Enter talk | P pause | [ ] speed | F5 save | F9 load";

#[derive(Component, Debug)]
pub struct HudText;

/// Everything the HUD shows, gathered from the world.
pub struct HudView<'a> {
    pub clock: &'a WorldClock,
    pub paused: bool,
    pub time_scale: f32,
    pub hunger: Option<(HungerLevel, f32)>,
    pub inventory: Option<&'a Inventory>,
    pub broker: &'a DialogueBrokerStatus,
    pub notice: Option<&'a str>,
}

impl HudView<'_> {
    pub fn render(&self) -> String {
        let speed = if self.paused {
            "paused".to_string()
        } else {
            format!("x{}", self.time_scale)
        };
        let mut lines = vec![format!(
            "Day {}  {}  ({})",
            self.clock.day_count(),
            self.clock.clock_label(),
            speed
        )];

        if let Some((level, value)) = self.hunger {
            lines.push(format!("Hunger: {} ({:.0})", level.label(), value));
        }
        if let Some(inventory) = self.inventory {
            lines.push(format!("Carrying: {}", inventory.summary()));
        }
        lines.push(format!("Voices: {}", self.broker));
        if let Some(notice) = self.notice {
            lines.push(notice.to_string());
        }
        lines.push(CONTROLS.to_string());

        lines.join("\n")
    }
}

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                left: Val::Px(12.0),
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(HUD_BACKGROUND),
            Name::new("HUD"),
        ))
        .with_child((
            Text::new(""),
            TextFont {
                font_size: HUD_FONT_SIZE,
                ..default()
            },
            TextColor(Color::WHITE),
            HudText,
        ));
}

#[allow(clippy::too_many_arguments)]
pub fn update_hud(
    clock: Res<WorldClock>,
    virtual_time: Res<Time<Virtual>>,
    sim_clock: Res<SimulationClock>,
    needs: Res<NeedsConfig>,
    broker: Res<DialogueBrokerStatus>,
    notice: Res<PlayerNotice>,
    player: Query<(&Hunger, &Inventory), With<Player>>,
    mut texts: Query<&mut Text, With<HudText>>,
) {
    let player = player.single().ok();
    let view = HudView {
        clock: &clock,
        paused: virtual_time.is_paused(),
        time_scale: sim_clock.time_scale(),
        hunger: player.map(|(hunger, _)| (hunger.level(&needs), hunger.value())),
        inventory: player.map(|(_, inventory)| inventory),
        broker: &broker,
        notice: notice.text(),
    };
    let rendered = view.render();

    for mut text in &mut texts {
        if text.0 != rendered {
            text.0 = rendered.clone();
        }
    }
}
