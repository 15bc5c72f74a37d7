// src/ui/speech_bubble/systems.rs
//
// Systems that attach, update and fade the labels above speaking characters.

use bevy::{prelude::*, text::TextBounds};

use crate::dialogue::events::{DialogueRequestFailedEvent, DialogueResponseEvent};
use crate::npc::components::Identity;
use crate::world::config::WorldSettings;

use super::components::{Speech, SpeechBubbleSettings, SpeechLabel};

const TEXT_COLOR: Color = Color::srgb(0.05, 0.05, 0.05);
const LABEL_Z: f32 = 1.0;
const FAILED_LINE: &str = "...";

/// Gives every newly speaking character a `Text2d` child to draw its line.
pub fn attach_speech_labels(
    mut commands: Commands,
    settings: Res<SpeechBubbleSettings>,
    world: Res<WorldSettings>,
    speakers: Query<Entity, Added<Speech>>,
) {
    for entity in &speakers {
        commands.entity(entity).with_child((
            SpeechLabel,
            Text2d::new(""),
            TextFont {
                font_size: settings.font_size,
                ..default()
            },
            TextColor(TEXT_COLOR),
            TextBounds::new_horizontal(settings.max_width),
            Transform::from_xyz(0.0, world.tile_size * settings.vertical_offset_tiles, LABEL_Z),
        ));
    }
}

/// Ages every line; expired lines are cleared.
pub fn age_speech(
    time: Res<Time>,
    settings: Res<SpeechBubbleSettings>,
    mut speakers: Query<&mut Speech>,
) {
    let delta = time.delta_secs();
    for mut speech in &mut speakers {
        if speech.text().is_some() {
            speech.advance(delta, settings.lifetime_seconds);
        }
    }
}

/// Copies each character's line and fade into its label.
pub fn sync_speech_labels(
    settings: Res<SpeechBubbleSettings>,
    speakers: Query<(&Speech, &Children)>,
    mut labels: Query<(&mut Text2d, &mut TextColor), With<SpeechLabel>>,
) {
    for (speech, children) in &speakers {
        let line = speech.text().unwrap_or_default();
        let alpha = speech.fade_alpha(settings.lifetime_seconds, settings.fade_seconds);

        let mut iter = labels.iter_many_mut(children.iter());
        while let Some((mut text, mut color)) = iter.fetch_next() {
            if text.0 != line {
                text.0 = line.to_string();
            }
            color.0 = TEXT_COLOR.with_alpha(alpha);
        }
    }
}

/// Puts generated dialogue in the speaker's mouth.
pub fn show_dialogue_responses(
    mut responses: MessageReader<DialogueResponseEvent>,
    mut speakers: Query<(&Identity, &mut Speech)>,
) {
    for event in responses.read() {
        let response = &event.response;
        let Some((identity, mut speech)) = speakers
            .iter_mut()
            .find(|(identity, _)| identity.id == response.speaker)
        else {
            warn!("No speaker {} for dialogue line", response.speaker);
            continue;
        };
        debug!("{} says \"{}\"", identity.display_name, response.content);
        speech.say(response.content.clone());
    }
}

/// Speakers whose request failed trail off instead of staying silent.
pub fn show_dialogue_failures(
    mut failures: MessageReader<DialogueRequestFailedEvent>,
    mut speakers: Query<(&Identity, &mut Speech)>,
) {
    for event in failures.read() {
        if let Some((_, mut speech)) = speakers
            .iter_mut()
            .find(|(identity, _)| identity.id == event.speaker)
        {
            speech.say(FAILED_LINE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dialogue::{
            broker::DialogueProviderKind,
            errors::{DialogueError, DialogueErrorKind},
            types::{
                DialogueContext, DialogueRequest, DialogueRequestId, DialogueResponse,
                DialogueTopicHint,
            },
        },
        npc::components::CharacterId,
    };

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<SpeechBubbleSettings>()
            .insert_resource(WorldSettings::default())
            .add_message::<DialogueResponseEvent>()
            .add_message::<DialogueRequestFailedEvent>()
            .add_systems(
                Update,
                (
                    (show_dialogue_responses, show_dialogue_failures),
                    attach_speech_labels,
                    sync_speech_labels,
                )
                    .chain(),
            );
        app
    }

    fn label_text(app: &mut App, speaker: Entity) -> String {
        let children: Vec<Entity> = app
            .world()
            .get::<Children>(speaker)
            .map(|children| children.to_vec())
            .unwrap_or_default();
        let mut labels = app.world_mut().query_filtered::<&Text2d, With<SpeechLabel>>();
        children
            .into_iter()
            .filter_map(|child| labels.get(app.world(), child).ok())
            .map(|text| text.0.clone())
            .collect()
    }

    #[test]
    fn responses_show_above_the_speaker() {
        let mut app = app();
        let bob = app
            .world_mut()
            .spawn((
                Identity::new(CharacterId::new(1), "Bob", "a farmer"),
                Speech::saying("Hi im bob"),
            ))
            .id();

        app.update();
        assert_eq!(label_text(&mut app, bob), "Hi im bob");

        let request = DialogueRequest::new(
            CharacterId::new(1),
            Some(CharacterId::player()),
            "hello",
            DialogueTopicHint::Reply,
            DialogueContext::default(),
        );
        app.world_mut().write_message(DialogueResponseEvent {
            response: DialogueResponse::new(
                DialogueRequestId::new(1),
                DialogueProviderKind::Local,
                &request,
                "Morning to you!",
            ),
        });
        app.update();
        assert_eq!(label_text(&mut app, bob), "Morning to you!");
    }

    #[test]
    fn failures_trail_off() {
        let mut app = app();
        let bill = app
            .world_mut()
            .spawn((
                Identity::new(CharacterId::new(2), "Bill", "a grower"),
                Speech::default(),
            ))
            .id();

        app.world_mut().write_message(DialogueRequestFailedEvent {
            speaker: CharacterId::new(2),
            error: DialogueError::new(
                DialogueRequestId::new(4),
                DialogueProviderKind::OpenAi,
                DialogueErrorKind::ProviderFailure {
                    message: "boom".to_string(),
                },
            ),
        });
        app.update();

        assert_eq!(
            app.world().get::<Speech>(bill).unwrap().text(),
            Some(FAILED_LINE)
        );
    }
}
