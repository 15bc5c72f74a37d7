//! Player spawning, movement, farm work, eating and chat routing.
use bevy::{input::keyboard::KeyboardInput, prelude::*};

use crate::{
    core::TextInputActive,
    dialogue::{
        context::{build_context, SpeakerState},
        queue::DialogueRequestQueue,
        types::{DialogueRequest, DialogueTopicHint},
    },
    farming::{
        actions::auto_action,
        events::{FarmActionEvent, FarmActionRequest},
    },
    inventory::Inventory,
    memory::{config::MemoryConfig, Memory},
    needs::{
        config::NeedsConfig,
        events::{EatRequest, MealEaten},
        Hunger,
    },
    npc::{
        behaviour::NpcIntent,
        components::{CharacterId, Identity, InConversation, Npc, NpcBrain},
        config::CharacterRoster,
    },
    ui::speech_bubble::components::Speech,
    world::{
        components::GridPosition, config::WorldSettings, systems::character_translation,
        tiles::TileGrid, time::WorldClock,
    },
};

use super::{
    components::{ChatBox, Player, PlayerNotice},
    events::{ChatSubmitted, PlayerSpoke},
};

const PLAYER_COLOR: Color = Color::srgb(0.95, 0.95, 0.92);
const PLAYER_SCALE: f32 = 0.75;
const MOVE_INTERVAL_TICKS: u32 = 2;

pub fn spawn_player(
    mut commands: Commands,
    settings: Res<WorldSettings>,
    roster: Res<CharacterRoster>,
    needs: Res<NeedsConfig>,
) {
    let profile = &roster.player;
    let position = GridPosition(profile.start);

    let mut entity = commands.spawn((
        Player::default(),
        Identity::new(
            CharacterId::player(),
            profile.name.clone(),
            profile.persona.clone(),
        ),
        position,
        Transform::from_translation(character_translation(position, settings.tile_size)),
        Sprite::from_color(PLAYER_COLOR, Vec2::splat(settings.tile_size * PLAYER_SCALE)),
        Hunger::from_config(&needs),
        Inventory::with_items(profile.items.iter().copied()),
        Memory::default(),
        Speech::saying(profile.greeting.clone()),
        Name::new(format!("{} (player)", profile.name)),
    ));
    if let Some(plot) = profile.plot {
        entity.insert(plot);
    }

    info!("Spawned player {} at {}", profile.name, profile.start);
}

/// Arrow keys or WASD to a unit step; `None` when no direction is held.
pub fn movement_direction(keyboard: &ButtonInput<KeyCode>) -> Option<IVec2> {
    let mut direction = IVec2::ZERO;
    if keyboard.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]) {
        direction.x -= 1;
    }
    if keyboard.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]) {
        direction.x += 1;
    }
    if keyboard.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]) {
        direction.y += 1;
    }
    if keyboard.any_pressed([KeyCode::ArrowDown, KeyCode::KeyS]) {
        direction.y -= 1;
    }

    // One axis per step keeps movement on the 4-neighbour grid.
    if direction.x != 0 {
        direction.y = 0;
    }
    (direction != IVec2::ZERO).then_some(direction)
}

/// Moves the player one tile per interval while a direction key is held.
pub fn move_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    chat: Res<ChatBox>,
    grid: Res<TileGrid>,
    needs: Res<NeedsConfig>,
    mut player: Query<(&mut Player, &mut GridPosition, &Hunger)>,
) {
    let Ok((mut player, mut position, hunger)) = player.single_mut() else {
        return;
    };
    player.move_cooldown = player.move_cooldown.saturating_sub(1);
    if player.move_cooldown > 0 || chat.is_open() {
        return;
    }
    let Some(step) = movement_direction(&keyboard) else {
        return;
    };

    let next = position.offset(step.x, step.y);
    if !grid.is_walkable(next) {
        return;
    }
    position.0 = next;
    player.move_cooldown = MOVE_INTERVAL_TICKS * hunger.move_multiplier(&needs);
}

/// `F` works the tile underfoot, `Q` eats.
pub fn handle_work_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    grid: Res<TileGrid>,
    player: Query<(Entity, &GridPosition, &Inventory), With<Player>>,
    mut farm_requests: MessageWriter<FarmActionRequest>,
    mut eat_requests: MessageWriter<EatRequest>,
    mut notice: ResMut<PlayerNotice>,
) {
    let Ok((actor, position, inventory)) = player.single() else {
        return;
    };

    if keyboard.just_pressed(KeyCode::KeyF) {
        let action = grid
            .get(position.0)
            .and_then(|tile| auto_action(tile, inventory));
        match action {
            Some(action) => {
                farm_requests.write(FarmActionRequest {
                    actor,
                    action,
                    pos: position.0,
                });
            }
            None => notice.show("There is no work to do here"),
        }
    }

    if keyboard.just_pressed(KeyCode::KeyQ) {
        eat_requests.write(EatRequest { actor });
    }
}

/// Feeds key presses into the chat box and publishes submitted lines.
pub fn type_in_chat_box(
    mut keys: MessageReader<KeyboardInput>,
    mut chat: ResMut<ChatBox>,
    mut focus: ResMut<TextInputActive>,
    mut submitted: MessageWriter<ChatSubmitted>,
) {
    for key in keys.read() {
        if !key.state.is_pressed() {
            continue;
        }
        if let Some(text) = chat.handle_key(&key.logical_key) {
            submitted.write(ChatSubmitted { text });
        }
    }

    if focus.0 != chat.is_open() {
        focus.0 = chat.is_open();
    }
}

/// Says the submitted line aloud and hands it to the nearest villager in range.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn deliver_chat_lines(
    mut commands: Commands,
    mut lines: MessageReader<ChatSubmitted>,
    roster: Res<CharacterRoster>,
    clock: Res<WorldClock>,
    needs: Res<NeedsConfig>,
    memory_config: Res<MemoryConfig>,
    mut queue: ResMut<DialogueRequestQueue>,
    mut notice: ResMut<PlayerNotice>,
    mut player: Query<(Entity, &Identity, &GridPosition, &mut Speech), With<Player>>,
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
        (With<Npc>, Without<Player>),
    >,
    mut spoken: MessageWriter<PlayerSpoke>,
) {
    for line in lines.read() {
        let Ok((player_entity, player_identity, player_position, mut speech)) = player.single_mut()
        else {
            return;
        };
        speech.say(line.text.clone());

        let listener = npcs
            .iter()
            .map(|(entity, identity, position, ..)| {
                (entity, identity.id, position.chebyshev(player_position.0))
            })
            .filter(|(_, _, distance)| *distance <= roster.chat_range)
            .min_by_key(|(_, id, distance)| (*distance, *id))
            .map(|(entity, ..)| entity);

        if let Some(listener) = listener {
            let request = {
                let Ok((_, identity, _, hunger, inventory, memory, brain)) = npcs.get(listener)
                else {
                    continue;
                };
                let state = SpeakerState {
                    identity,
                    hunger: hunger.level(&needs),
                    inventory,
                    activity: brain.intent.label(),
                    memory,
                };
                let context = build_context(
                    &state,
                    Some(&player_identity.display_name),
                    &clock,
                    &memory_config,
                );
                info!(
                    target: "dialogue",
                    "{} says to {}: \"{}\"",
                    player_identity.display_name,
                    identity.display_name,
                    line.text
                );
                DialogueRequest::new(
                    identity.id,
                    Some(CharacterId::player()),
                    line.text.clone(),
                    DialogueTopicHint::Reply,
                    context,
                )
            };
            queue.enqueue(request);

            commands.entity(listener).insert(InConversation {
                partner: CharacterId::player(),
                remaining_ticks: roster.conversation_hold_ticks,
            });
            if let Ok((.., mut brain)) = npcs.get_mut(listener) {
                brain.set_intent(NpcIntent::Converse);
            }
        } else {
            notice.show("Nobody is close enough to hear you");
        }

        spoken.write(PlayerSpoke {
            player: player_entity,
            text: line.text.clone(),
            addressed: listener,
        });
    }
}

/// Turns the player's farm and meal results into HUD notices.
pub fn show_action_notices(
    mut farm_results: MessageReader<FarmActionEvent>,
    mut meals: MessageReader<MealEaten>,
    mut notice: ResMut<PlayerNotice>,
) {
    for event in farm_results.read() {
        if !event.character.is_player() {
            continue;
        }
        match &event.result {
            Ok(outcome) => notice.show(format!("You {}", outcome)),
            Err(err) => notice.show(capitalize(&err.to_string())),
        }
    }

    for meal in meals.read() {
        if !meal.character.is_player() {
            continue;
        }
        match meal.item {
            Some(item) => notice.show(format!("You ate some {}", item.label())),
            None => notice.show("You have nothing to eat"),
        }
    }
}

pub fn tick_player_notice(time: Res<Time>, mut notice: ResMut<PlayerNotice>) {
    notice.tick(time.delta_secs());
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        farming::actions::{FarmAction, FarmOutcome},
        inventory::ItemKind,
        world::tiles::{Tile, TilePos},
    };

    fn spawn_test_player(app: &mut App, pos: TilePos) -> Entity {
        app.world_mut()
            .spawn((
                Player::default(),
                Identity::new(CharacterId::player(), "Ada", "a newcomer"),
                GridPosition(pos),
                Hunger::new(0.0),
                Inventory::with_items([(ItemKind::WheatSeeds, 1)]),
                Memory::default(),
                Speech::default(),
            ))
            .id()
    }

    fn spawn_test_npc(app: &mut App, id: u64, pos: TilePos) -> Entity {
        app.world_mut()
            .spawn((
                Npc,
                Identity::new(CharacterId::new(id), format!("Npc{}", id), "a villager"),
                GridPosition(pos),
                Hunger::new(0.0),
                Inventory::default(),
                Memory::default(),
                NpcBrain::default(),
            ))
            .id()
    }

    #[test]
    fn direction_prefers_horizontal_axis() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        assert_eq!(movement_direction(&keyboard), None);

        keyboard.press(KeyCode::KeyW);
        assert_eq!(movement_direction(&keyboard), Some(IVec2::new(0, 1)));

        keyboard.press(KeyCode::ArrowLeft);
        assert_eq!(movement_direction(&keyboard), Some(IVec2::new(-1, 0)));
    }

    #[test]
    fn player_steps_onto_walkable_tiles_only() {
        let mut grid = TileGrid::new(3, 3, Tile::Grass);
        grid.set(TilePos::new(2, 1), Tile::Water).unwrap();

        let mut app = App::new();
        app.insert_resource(grid)
            .insert_resource(NeedsConfig::default())
            .init_resource::<ChatBox>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(Update, move_player);
        let player = spawn_test_player(&mut app, TilePos::new(0, 1));
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyD);

        for _ in 0..(MOVE_INTERVAL_TICKS * 3) {
            app.update();
        }

        assert_eq!(
            app.world().get::<GridPosition>(player).unwrap().0,
            TilePos::new(1, 1)
        );
    }

    #[test]
    fn work_key_requests_the_tile_action() {
        let mut app = App::new();
        app.insert_resource(TileGrid::new(3, 3, Tile::Tilled))
            .init_resource::<PlayerNotice>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_message::<FarmActionRequest>()
            .add_message::<EatRequest>()
            .add_systems(Update, handle_work_keys);
        let player = spawn_test_player(&mut app, TilePos::new(1, 1));
        {
            let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keyboard.press(KeyCode::KeyF);
            keyboard.press(KeyCode::KeyQ);
        }

        app.update();

        let requests = app.world().resource::<Messages<FarmActionRequest>>();
        let mut cursor = requests.get_cursor();
        let sent: Vec<_> = cursor.read(requests).copied().collect();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].actor, player);
        assert!(matches!(sent[0].action, FarmAction::Plant(_)));

        let meals = app.world().resource::<Messages<EatRequest>>();
        assert_eq!(meals.len(), 1);
    }

    fn chat_app() -> App {
        let mut app = App::new();
        app.insert_resource(CharacterRoster::default())
            .insert_resource(WorldClock::default())
            .insert_resource(NeedsConfig::default())
            .insert_resource(MemoryConfig::default())
            .init_resource::<DialogueRequestQueue>()
            .init_resource::<PlayerNotice>()
            .add_message::<ChatSubmitted>()
            .add_message::<PlayerSpoke>()
            .add_systems(Update, deliver_chat_lines);
        app
    }

    #[test]
    fn chat_line_goes_to_nearest_npc_in_range() {
        let mut app = chat_app();
        let player = spawn_test_player(&mut app, TilePos::new(5, 5));
        let near = spawn_test_npc(&mut app, 1, TilePos::new(6, 5));
        let further = spawn_test_npc(&mut app, 2, TilePos::new(7, 7));

        app.world_mut().write_message(ChatSubmitted {
            text: "Nice weather".to_string(),
        });
        app.update();

        assert_eq!(
            app.world().get::<Speech>(player).unwrap().text(),
            Some("Nice weather")
        );
        assert!(app
            .world()
            .resource::<DialogueRequestQueue>()
            .has_pending_for(CharacterId::new(1)));
        assert_eq!(
            app.world().get::<InConversation>(near).unwrap().partner,
            CharacterId::player()
        );
        assert!(app.world().get::<InConversation>(further).is_none());

        let spoken = app.world().resource::<Messages<PlayerSpoke>>();
        let mut cursor = spoken.get_cursor();
        let events: Vec<_> = cursor.read(spoken).cloned().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].addressed, Some(near));
    }

    #[test]
    fn chat_with_nobody_around_shows_notice() {
        let mut app = chat_app();
        spawn_test_player(&mut app, TilePos::new(0, 0));
        spawn_test_npc(&mut app, 1, TilePos::new(20, 20));

        app.world_mut().write_message(ChatSubmitted {
            text: "Hello?".to_string(),
        });
        app.update();

        assert_eq!(app.world().resource::<DialogueRequestQueue>().queue_depth(), 0);
        assert_eq!(
            app.world().resource::<PlayerNotice>().text(),
            Some("Nobody is close enough to hear you")
        );
    }

    #[test]
    fn notices_only_follow_player_actions() {
        let mut app = App::new();
        app.init_resource::<PlayerNotice>()
            .add_message::<FarmActionEvent>()
            .add_message::<MealEaten>()
            .add_systems(Update, show_action_notices);
        let actor = app.world_mut().spawn_empty().id();

        app.world_mut().write_message(FarmActionEvent {
            actor,
            character: CharacterId::new(3),
            action: FarmAction::Till,
            pos: TilePos::new(0, 0),
            result: Ok(FarmOutcome::Tilled),
        });
        app.update();
        assert_eq!(app.world().resource::<PlayerNotice>().text(), None);

        app.world_mut().write_message(FarmActionEvent {
            actor,
            character: CharacterId::player(),
            action: FarmAction::Till,
            pos: TilePos::new(0, 0),
            result: Ok(FarmOutcome::Tilled),
        });
        app.update();
        assert_eq!(
            app.world().resource::<PlayerNotice>().text(),
            Some("You tilled the soil")
        );
    }
}
