//! Systems turning gameplay messages into character memories.
use std::collections::HashMap;

use bevy::prelude::*;

use crate::{
    dialogue::events::DialogueResponseEvent,
    farming::events::FarmActionEvent,
    needs::events::MealEaten,
    npc::components::{CharacterId, Identity},
    player::events::PlayerSpoke,
    world::time::WorldClock,
};

use super::{
    components::{Memory, MemoryEntry, MemoryKind},
    config::MemoryConfig,
};

const UNKNOWN_NAME: &str = "someone";
const NO_AUDIENCE: &str = "everyone nearby";

fn entry(clock: &WorldClock, kind: MemoryKind, text: impl Into<String>) -> MemoryEntry {
    MemoryEntry::new(clock.day_count(), clock.clock_label(), kind, text)
}

/// Speakers remember what they said; targets remember what they heard.
pub fn record_dialogue_memories(
    mut responses: MessageReader<DialogueResponseEvent>,
    clock: Res<WorldClock>,
    config: Res<MemoryConfig>,
    mut characters: Query<(&Identity, &mut Memory)>,
) {
    if responses.is_empty() {
        return;
    }
    let names: HashMap<CharacterId, String> = characters
        .iter()
        .map(|(identity, _)| (identity.id, identity.display_name.clone()))
        .collect();
    let name_of = |id: CharacterId| {
        names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string())
    };

    for event in responses.read() {
        let response = &event.response;
        let speaker_name = name_of(response.speaker);
        let target_name = response
            .target
            .map(name_of)
            .unwrap_or_else(|| NO_AUDIENCE.to_string());

        for (identity, mut memory) in &mut characters {
            if identity.id == response.speaker {
                memory.remember(
                    entry(
                        &clock,
                        MemoryKind::Said {
                            to: target_name.clone(),
                        },
                        response.content.clone(),
                    ),
                    &config,
                );
            } else if Some(identity.id) == response.target {
                memory.remember(
                    entry(
                        &clock,
                        MemoryKind::Heard {
                            from: speaker_name.clone(),
                        },
                        response.content.clone(),
                    ),
                    &config,
                );
            }
        }
    }
}

/// The addressed NPC remembers what the player said, and the player remembers saying it.
pub fn record_player_speech(
    mut spoken: MessageReader<PlayerSpoke>,
    clock: Res<WorldClock>,
    config: Res<MemoryConfig>,
    mut characters: Query<(&Identity, &mut Memory)>,
) {
    for event in spoken.read() {
        let player_name = characters
            .get(event.player)
            .map(|(identity, _)| identity.display_name.clone())
            .unwrap_or_else(|_| UNKNOWN_NAME.to_string());
        let listener_name = event.addressed.and_then(|listener| {
            characters
                .get(listener)
                .ok()
                .map(|(identity, _)| identity.display_name.clone())
        });

        if let Ok((_, mut memory)) = characters.get_mut(event.player) {
            let to = listener_name
                .clone()
                .unwrap_or_else(|| NO_AUDIENCE.to_string());
            memory.remember(entry(&clock, MemoryKind::Said { to }, event.text.clone()), &config);
        }

        if let Some(listener) = event.addressed {
            if let Ok((_, mut memory)) = characters.get_mut(listener) {
                memory.remember(
                    entry(
                        &clock,
                        MemoryKind::Heard {
                            from: player_name.clone(),
                        },
                        event.text.clone(),
                    ),
                    &config,
                );
            }
        }
    }
}

pub fn record_farm_memories(
    mut results: MessageReader<FarmActionEvent>,
    clock: Res<WorldClock>,
    config: Res<MemoryConfig>,
    mut memories: Query<&mut Memory>,
) {
    for event in results.read() {
        let Ok(outcome) = &event.result else {
            continue;
        };
        if let Ok(mut memory) = memories.get_mut(event.actor) {
            memory.remember(
                entry(
                    &clock,
                    MemoryKind::Observed,
                    format!("I {} at {}", outcome, event.pos),
                ),
                &config,
            );
        }
    }
}

pub fn record_meal_memories(
    mut meals: MessageReader<MealEaten>,
    clock: Res<WorldClock>,
    config: Res<MemoryConfig>,
    mut memories: Query<&mut Memory>,
) {
    for meal in meals.read() {
        let text = match meal.item {
            Some(item) => format!("I ate some {}", item.label()),
            None => "I was hungry but had nothing to eat".to_string(),
        };
        if let Ok(mut memory) = memories.get_mut(meal.actor) {
            memory.remember(entry(&clock, MemoryKind::Observed, text), &config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dialogue::{
            broker::DialogueProviderKind,
            types::{
                DialogueContext, DialogueRequest, DialogueRequestId, DialogueResponse,
                DialogueTopicHint,
            },
        },
        inventory::ItemKind,
    };

    fn app() -> App {
        let mut app = App::new();
        app.insert_resource(WorldClock::default())
            .insert_resource(MemoryConfig::default())
            .add_message::<DialogueResponseEvent>()
            .add_message::<PlayerSpoke>()
            .add_message::<MealEaten>()
            .add_systems(
                Update,
                (
                    record_dialogue_memories,
                    record_player_speech,
                    record_meal_memories,
                )
                    .chain(),
            );
        app
    }

    fn texts(app: &App, entity: Entity) -> Vec<String> {
        app.world()
            .get::<Memory>(entity)
            .unwrap()
            .recent(10)
            .map(MemoryEntry::describe)
            .collect()
    }

    #[test]
    fn dialogue_is_remembered_by_both_sides() {
        let mut app = app();
        let bob = app
            .world_mut()
            .spawn((Identity::new(CharacterId::new(1), "Bob", "farmer"), Memory::default()))
            .id();
        let bill = app
            .world_mut()
            .spawn((Identity::new(CharacterId::new(2), "Bill", "farmer"), Memory::default()))
            .id();

        let request = DialogueRequest::new(
            CharacterId::new(1),
            Some(CharacterId::new(2)),
            "Bill is nearby",
            DialogueTopicHint::Greeting,
            DialogueContext::default(),
        );
        app.world_mut().write_message(DialogueResponseEvent {
            response: DialogueResponse::new(
                DialogueRequestId::new(1),
                DialogueProviderKind::Local,
                &request,
                "Morning, Bill!",
            ),
        });
        app.update();

        assert_eq!(texts(&app, bob), vec!["I told Bill: \"Morning, Bill!\""]);
        assert_eq!(texts(&app, bill), vec!["Bob said: \"Morning, Bill!\""]);
    }

    #[test]
    fn player_lines_and_meals_are_recorded() {
        let mut app = app();
        let player = app
            .world_mut()
            .spawn((Identity::new(CharacterId::player(), "Player", ""), Memory::default()))
            .id();
        let bob = app
            .world_mut()
            .spawn((Identity::new(CharacterId::new(1), "Bob", "farmer"), Memory::default()))
            .id();

        app.world_mut().write_message(PlayerSpoke {
            player,
            text: "Hi im the player".to_string(),
            addressed: Some(bob),
        });
        app.world_mut().write_message(MealEaten {
            actor: bob,
            character: CharacterId::new(1),
            item: Some(ItemKind::Carrot),
        });
        app.update();

        assert_eq!(texts(&app, player), vec!["I told Bob: \"Hi im the player\""]);
        assert_eq!(
            texts(&app, bob),
            vec![
                "Player said: \"Hi im the player\"".to_string(),
                "I ate some carrot".to_string()
            ]
        );
    }
}
