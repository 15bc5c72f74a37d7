//! Villagers striking up conversations with each other.
use std::collections::HashSet;

use bevy::prelude::*;

use crate::{
    dialogue::{
        context::{build_context, SpeakerState},
        events::DialogueResponseEvent,
        queue::DialogueRequestQueue,
        types::{DialogueRequest, DialogueTopicHint},
    },
    inventory::Inventory,
    memory::{config::MemoryConfig, Memory, MemoryKind},
    needs::{config::NeedsConfig, Hunger},
    world::{components::GridPosition, tiles::TilePos, time::WorldClock},
};

use super::{
    behaviour::NpcIntent,
    components::{CharacterId, Identity, InConversation, Npc, NpcBrain},
    config::CharacterRoster,
};

fn has_met(memory: &Memory, name: &str) -> bool {
    memory.recent(usize::MAX).any(|entry| match &entry.kind {
        MemoryKind::Heard { from: other } | MemoryKind::Said { to: other } => other == name,
        MemoryKind::Observed => false,
    }) || memory
        .long_term()
        .any(|summary| summary.summary.contains(name))
}

/// Pairs up free NPCs standing close together and asks the first to open a chat.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn start_npc_chatter(
    mut commands: Commands,
    roster: Res<CharacterRoster>,
    clock: Res<WorldClock>,
    needs: Res<NeedsConfig>,
    memory_config: Res<MemoryConfig>,
    mut queue: ResMut<DialogueRequestQueue>,
    mut npcs: Query<
        (
            Entity,
            &Identity,
            &GridPosition,
            &Hunger,
            &Inventory,
            &Memory,
            &mut NpcBrain,
        ),
        (With<Npc>, Without<InConversation>),
    >,
) {
    for (.., mut brain) in &mut npcs {
        brain.chatter_cooldown = brain.chatter_cooldown.saturating_sub(1);
    }

    let free: Vec<(Entity, CharacterId, TilePos)> = npcs
        .iter()
        .filter(|(_, identity, _, _, _, _, brain)| {
            brain.chatter_cooldown == 0
                && !brain.intent.is_busy()
                && !queue.has_pending_for(identity.id)
        })
        .map(|(entity, identity, position, ..)| (entity, identity.id, position.0))
        .collect();

    let mut engaged = HashSet::new();
    for (index, &(speaker, speaker_id, speaker_pos)) in free.iter().enumerate() {
        if engaged.contains(&speaker) {
            continue;
        }
        let Some(&(listener, listener_id, _)) = free[index + 1..].iter().find(|(entity, _, pos)| {
            !engaged.contains(entity) && pos.chebyshev(speaker_pos) <= roster.chatter_range
        }) else {
            continue;
        };
        engaged.insert(speaker);
        engaged.insert(listener);

        let request = {
            let Ok((_, listener_identity, ..)) = npcs.get(listener) else {
                continue;
            };
            let listener_name = listener_identity.display_name.clone();
            let Ok((_, identity, _, hunger, inventory, memory, brain)) = npcs.get(speaker) else {
                continue;
            };

            let state = SpeakerState {
                identity,
                hunger: hunger.level(&needs),
                inventory,
                activity: brain.intent.label(),
                memory,
            };
            let context = build_context(&state, Some(&listener_name), &clock, &memory_config);
            let (topic, situation) = if has_met(memory, &listener_name) {
                (
                    DialogueTopicHint::Chatter,
                    format!("You bump into {} again near your field.", listener_name),
                )
            } else {
                (
                    DialogueTopicHint::Greeting,
                    format!("You meet {} for the first time today.", listener_name),
                )
            };
            info!(
                target: "dialogue",
                "{} starts a {} with {}",
                identity.display_name,
                topic.label(),
                listener_name
            );
            DialogueRequest::new(speaker_id, Some(listener_id), situation, topic, context)
        };
        queue.enqueue(request);

        for (entity, partner) in [(speaker, listener_id), (listener, speaker_id)] {
            commands.entity(entity).insert(InConversation {
                partner,
                remaining_ticks: roster.conversation_hold_ticks,
            });
            if let Ok((.., mut brain)) = npcs.get_mut(entity) {
                brain.chatter_cooldown = roster.chatter_cooldown_ticks;
                brain.set_intent(NpcIntent::Converse);
            }
        }
    }
}

/// The NPC addressed by a greeting or small talk answers once.
pub fn reply_to_npc_openers(
    mut responses: MessageReader<DialogueResponseEvent>,
    clock: Res<WorldClock>,
    needs: Res<NeedsConfig>,
    memory_config: Res<MemoryConfig>,
    mut queue: ResMut<DialogueRequestQueue>,
    npcs: Query<(&Identity, &Hunger, &Inventory, &Memory, &NpcBrain), With<Npc>>,
) {
    for event in responses.read() {
        let response = &event.response;
        if response.topic_hint == DialogueTopicHint::Reply {
            continue;
        }
        let Some(target) = response.target.filter(|target| !target.is_player()) else {
            continue;
        };
        let Some((identity, hunger, inventory, memory, brain)) =
            npcs.iter().find(|(identity, ..)| identity.id == target)
        else {
            continue;
        };
        let speaker_name = npcs
            .iter()
            .find(|(identity, ..)| identity.id == response.speaker)
            .map(|(identity, ..)| identity.display_name.clone())
            .unwrap_or_else(|| response.speaker.to_string());

        let state = SpeakerState {
            identity,
            hunger: hunger.level(&needs),
            inventory,
            activity: brain.intent.label(),
            memory,
        };
        let context = build_context(&state, Some(&speaker_name), &clock, &memory_config);
        let id = queue.enqueue(DialogueRequest::new(
            identity.id,
            Some(response.speaker),
            response.content.clone(),
            DialogueTopicHint::Reply,
            context,
        ));
        debug!(
            target: "dialogue",
            "{} will answer {} ({})",
            identity.display_name, speaker_name, id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dialogue::{
            broker::DialogueProviderKind,
            types::{DialogueContext, DialogueRequestId, DialogueResponse},
        },
        memory::MemoryEntry,
    };

    fn chatter_app() -> App {
        let mut roster = CharacterRoster::default();
        roster.chatter_range = 2;
        roster.conversation_hold_ticks = 50;
        roster.chatter_cooldown_ticks = 100;

        let mut app = App::new();
        app.insert_resource(roster)
            .insert_resource(WorldClock::default())
            .insert_resource(NeedsConfig::default())
            .insert_resource(MemoryConfig::default())
            .init_resource::<DialogueRequestQueue>()
            .add_systems(Update, start_npc_chatter);
        app
    }

    fn villager(app: &mut App, id: u64, name: &str, pos: TilePos) -> Entity {
        app.world_mut()
            .spawn((
                Npc,
                Identity::new(CharacterId::new(id), name, "a villager"),
                GridPosition(pos),
                Hunger::new(0.0),
                Inventory::default(),
                Memory::default(),
                NpcBrain::default(),
            ))
            .id()
    }

    #[test]
    fn nearby_idle_npcs_start_one_conversation() {
        let mut app = chatter_app();
        let bob = villager(&mut app, 1, "Bob", TilePos::new(2, 2));
        let bill = villager(&mut app, 2, "Bill", TilePos::new(3, 3));
        let far = villager(&mut app, 3, "Cora", TilePos::new(20, 20));

        app.update();

        let queue = app.world().resource::<DialogueRequestQueue>();
        assert_eq!(queue.queue_depth(), 1);
        assert_eq!(queue.metrics().enqueued, 1);

        for npc in [bob, bill] {
            let conversation = app.world().get::<InConversation>(npc).unwrap();
            assert_eq!(conversation.remaining_ticks, 50);
            let brain = app.world().get::<NpcBrain>(npc).unwrap();
            assert_eq!(brain.intent, NpcIntent::Converse);
            assert_eq!(brain.chatter_cooldown, 100);
        }
        assert!(app.world().get::<InConversation>(far).is_none());
    }

    #[test]
    fn cooling_down_or_busy_npcs_stay_quiet() {
        let mut app = chatter_app();
        let bob = villager(&mut app, 1, "Bob", TilePos::new(2, 2));
        villager(&mut app, 2, "Bill", TilePos::new(2, 3));
        app.world_mut().get_mut::<NpcBrain>(bob).unwrap().chatter_cooldown = 10;

        app.update();
        assert_eq!(app.world().resource::<DialogueRequestQueue>().queue_depth(), 0);

        let mut brain = app.world_mut().get_mut::<NpcBrain>(bob).unwrap();
        brain.chatter_cooldown = 0;
        brain.set_intent(NpcIntent::Eat);
        app.update();
        assert_eq!(app.world().resource::<DialogueRequestQueue>().queue_depth(), 0);
    }

    #[test]
    fn acquaintances_get_small_talk() {
        let mut memory = Memory::default();
        assert!(!has_met(&memory, "Bill"));
        memory.remember(
            MemoryEntry::new(
                1,
                "08:00",
                MemoryKind::Heard {
                    from: "Bill".to_string(),
                },
                "Morning!",
            ),
            &MemoryConfig::default(),
        );
        assert!(has_met(&memory, "Bill"));
    }

    #[test]
    fn greetings_get_a_single_reply() {
        let mut app = App::new();
        app.insert_resource(WorldClock::default())
            .insert_resource(NeedsConfig::default())
            .insert_resource(MemoryConfig::default())
            .init_resource::<DialogueRequestQueue>()
            .add_message::<DialogueResponseEvent>()
            .add_systems(Update, reply_to_npc_openers);
        villager(&mut app, 1, "Bob", TilePos::new(0, 0));
        villager(&mut app, 2, "Bill", TilePos::new(1, 0));

        let greeting = DialogueRequest::new(
            CharacterId::new(1),
            Some(CharacterId::new(2)),
            "You meet Bill",
            DialogueTopicHint::Greeting,
            DialogueContext::default(),
        );
        let mut reply = greeting.clone();
        reply.topic_hint = DialogueTopicHint::Reply;
        for request in [greeting, reply] {
            app.world_mut().write_message(DialogueResponseEvent {
                response: DialogueResponse::new(
                    DialogueRequestId::new(1),
                    DialogueProviderKind::Local,
                    &request,
                    "Hello there, Bill!",
                ),
            });
        }

        app.update();

        let queue = app.world().resource::<DialogueRequestQueue>();
        assert_eq!(queue.queue_depth(), 1);
        assert!(queue.has_pending_for(CharacterId::new(2)));
    }
}
