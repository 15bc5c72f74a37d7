// src/ui/dialogue_panel/systems.rs
//
// Systems for spawning the dialogue panel and showing the latest exchange.

use bevy::prelude::*;

use crate::dialogue::telemetry::DialogueTelemetry;
use crate::npc::components::{CharacterId, Identity};

use super::components::{
    DialoguePanel, DialoguePanelBody, DialoguePanelHeader, DialoguePanelSettings,
    DialoguePanelState,
};

// Visual constants
const BACKGROUND_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 0.9);
const BORDER_COLOR: Color = Color::srgb(0.3, 0.3, 0.3);
const TEXT_COLOR: Color = Color::WHITE;
const NAME_COLOR: Color = Color::srgb(1.0, 0.9, 0.4); // Yellow/gold

/// "Speaker → Target", or just the speaker when nobody was addressed.
pub fn exchange_title(speaker: &str, target: Option<&str>) -> String {
    match target {
        Some(target) => format!("{} → {}", speaker, target),
        None => speaker.to_string(),
    }
}

/// Spawns the (initially hidden) panel in the bottom-right corner.
pub fn spawn_dialogue_panel(mut commands: Commands, settings: Res<DialoguePanelSettings>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(settings.bottom_offset),
                right: Val::Px(settings.right_offset),
                width: Val::Px(settings.panel_width),
                padding: UiRect::all(Val::Px(settings.padding)),
                border: UiRect::all(Val::Px(settings.border_width)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                display: Display::None,
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            BorderColor::from(BORDER_COLOR),
            DialoguePanel,
            Name::new("Dialogue Panel"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: settings.name_font_size,
                    ..default()
                },
                TextColor(NAME_COLOR),
                DialoguePanelHeader,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: settings.text_font_size,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                Node {
                    max_width: Val::Px(settings.panel_width - settings.padding * 2.0),
                    ..default()
                },
                DialoguePanelBody,
            ));
        });
}

/// Loads the newest recorded line into the panel.
#[allow(clippy::type_complexity)]
pub fn refresh_dialogue_panel(
    telemetry: Res<DialogueTelemetry>,
    identities: Query<&Identity>,
    mut state: ResMut<DialoguePanelState>,
    mut panels: Query<&mut Node, With<DialoguePanel>>,
    mut headers: Query<&mut Text, (With<DialoguePanelHeader>, Without<DialoguePanelBody>)>,
    mut bodies: Query<&mut Text, (With<DialoguePanelBody>, Without<DialoguePanelHeader>)>,
) {
    let Some(response) = telemetry.latest_response() else {
        return;
    };
    if state.shown == Some(response.request_id) {
        return;
    }

    let name_of = |id: CharacterId| {
        identities
            .iter()
            .find(|identity| identity.id == id)
            .map(|identity| identity.display_name.clone())
            .unwrap_or_else(|| id.to_string())
    };
    let speaker = name_of(response.speaker);
    let target = response.target.map(name_of);

    info!(
        "Dialogue panel: {} \"{}\"",
        exchange_title(&speaker, target.as_deref()),
        response.content
    );

    for mut text in &mut headers {
        text.0 = exchange_title(&speaker, target.as_deref());
    }
    for mut text in &mut bodies {
        text.0 = response.content.clone();
    }
    for mut node in &mut panels {
        node.display = Display::Flex;
    }

    state.shown = Some(response.request_id);
    state.age_secs = 0.0;
}

/// Fades the panel out once its line has been up long enough.
#[allow(clippy::type_complexity)]
pub fn fade_dialogue_panel(
    time: Res<Time>,
    settings: Res<DialoguePanelSettings>,
    mut state: ResMut<DialoguePanelState>,
    mut panels: Query<(&mut Node, &mut BackgroundColor), With<DialoguePanel>>,
    mut headers: Query<&mut TextColor, (With<DialoguePanelHeader>, Without<DialoguePanelBody>)>,
    mut bodies: Query<&mut TextColor, (With<DialoguePanelBody>, Without<DialoguePanelHeader>)>,
) {
    if state.shown.is_none() {
        return;
    }
    state.age_secs += time.delta_secs();
    let alpha = state.fade_alpha(&settings);

    for (mut node, mut background) in &mut panels {
        if alpha <= 0.0 {
            node.display = Display::None;
        }
        background.0 = BACKGROUND_COLOR.with_alpha(alpha * 0.9);
    }
    for mut color in &mut headers {
        color.0 = NAME_COLOR.with_alpha(alpha);
    }
    for mut color in &mut bodies {
        color.0 = TEXT_COLOR.with_alpha(alpha);
    }
}
