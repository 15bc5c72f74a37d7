//! Systems that spawn villagers and drive their daily routine on the fixed step.
use bevy::prelude::*;

use crate::{
    farming::{actions::FarmAction, components::FarmPlot, events::FarmActionRequest},
    inventory::Inventory,
    memory::Memory,
    needs::{config::NeedsConfig, events::EatRequest, Hunger},
    ui::speech_bubble::components::Speech,
    world::{
        components::GridPosition, config::WorldSettings, path::find_path,
        systems::character_translation, tiles::TileGrid,
    },
};

use super::{
    behaviour::{choose_intent, IntentInputs, NpcIntent},
    components::{
        CharacterIdGenerator, Home, Identity, InConversation, Npc, NpcBrain, NpcRng,
    },
    config::CharacterRoster,
};

const NPC_COLORS: [Color; 4] = [
    Color::srgb(0.85, 0.35, 0.30),
    Color::srgb(0.30, 0.50, 0.85),
    Color::srgb(0.75, 0.45, 0.80),
    Color::srgb(0.95, 0.80, 0.30),
];
const CHARACTER_SCALE: f32 = 0.7;

/// Spawns every villager from the roster at their front door.
pub fn spawn_npcs(
    mut commands: Commands,
    settings: Res<WorldSettings>,
    roster: Res<CharacterRoster>,
    needs: Res<NeedsConfig>,
    mut id_generator: ResMut<CharacterIdGenerator>,
) {
    let size = Vec2::splat(settings.tile_size * CHARACTER_SCALE);
    let count = roster.npcs.len().max(1) as u32;

    for (index, profile) in roster.npcs.iter().enumerate() {
        let id = id_generator.next_id();
        let position = GridPosition(profile.home);
        // First chats are staggered across the roster.
        let chatter_cooldown = roster.chatter_cooldown_ticks * (index as u32 + 1) / count;

        let mut entity = commands.spawn((
            Npc,
            Identity::new(id, profile.name.clone(), profile.persona.clone()),
            Home(profile.home),
            position,
            Transform::from_translation(character_translation(position, settings.tile_size)),
            Sprite::from_color(NPC_COLORS[index % NPC_COLORS.len()], size),
            Hunger::from_config(&needs),
            Inventory::with_items(profile.items.iter().copied()),
            Memory::default(),
            NpcBrain::with_chatter_cooldown(chatter_cooldown),
            Speech::saying(profile.greeting.clone()),
            Name::new(format!("{} ({})", profile.name, id)),
        ));
        if let Some(plot) = profile.plot {
            entity.insert(plot);
        }

        info!("Spawned {} ({}) at {}", profile.name, id, profile.home);
    }
}

/// Ends conversations whose hold time has run out.
pub fn count_down_conversations(
    mut commands: Commands,
    mut talkers: Query<(Entity, &Identity, &mut InConversation)>,
) {
    for (entity, identity, mut conversation) in &mut talkers {
        conversation.remaining_ticks = conversation.remaining_ticks.saturating_sub(1);
        if conversation.remaining_ticks == 0 {
            debug!(
                "{} finished talking with {}",
                identity.display_name, conversation.partner
            );
            commands.entity(entity).remove::<InConversation>();
        }
    }
}

/// Re-evaluates each NPC's intent once its decision cooldown runs out.
#[allow(clippy::type_complexity)]
pub fn decide_intents(
    grid: Res<TileGrid>,
    roster: Res<CharacterRoster>,
    needs: Res<NeedsConfig>,
    mut rng: ResMut<NpcRng>,
    mut npcs: Query<
        (
            &Identity,
            &GridPosition,
            &Home,
            Option<&FarmPlot>,
            &Hunger,
            &Inventory,
            Has<InConversation>,
            &mut NpcBrain,
        ),
        With<Npc>,
    >,
) {
    for (identity, position, home, plot, hunger, inventory, in_conversation, mut brain) in
        &mut npcs
    {
        let conversation_changed = in_conversation != (brain.intent == NpcIntent::Converse);
        brain.decide_cooldown = brain.decide_cooldown.saturating_sub(1);
        if brain.decide_cooldown > 0 && !conversation_changed {
            continue;
        }
        brain.decide_cooldown = roster.decide_interval_ticks;

        // Stay the course while walking toward a target.
        if !conversation_changed && brain.intent.target().is_some() && !brain.path.is_empty() {
            continue;
        }

        let inputs = IntentInputs {
            grid: &grid,
            position: position.0,
            home: home.0,
            plot: plot.copied(),
            hunger: hunger.level(&needs),
            has_food: inventory.has_food(),
            seed: inventory.first_seed(),
            in_conversation,
            wander_radius: roster.wander_radius,
        };
        let intent = choose_intent(&inputs, &mut rng.0);

        if intent != brain.intent {
            debug!("{} is now {}", identity.display_name, intent.label());
            brain.set_intent(intent);
        }
    }
}

/// Steps NPCs one tile along their path, re-planning around new obstacles.
pub fn move_npcs(
    grid: Res<TileGrid>,
    roster: Res<CharacterRoster>,
    needs: Res<NeedsConfig>,
    mut npcs: Query<
        (&Identity, &mut GridPosition, &Hunger, &mut NpcBrain),
        (With<Npc>, Without<InConversation>),
    >,
) {
    for (identity, mut position, hunger, mut brain) in &mut npcs {
        brain.move_cooldown = brain.move_cooldown.saturating_sub(1);
        if brain.move_cooldown > 0 {
            continue;
        }
        let Some(target) = brain.intent.target() else {
            continue;
        };
        if position.0 == target {
            continue;
        }

        let next_is_clear = brain
            .path
            .front()
            .is_some_and(|next| grid.is_walkable(*next) && next.manhattan(position.0) == 1);
        if !next_is_clear {
            match find_path(&grid, position.0, target) {
                Some(steps) => brain.path = steps.into(),
                None => {
                    debug!(
                        "{} cannot reach {}, giving up on {}",
                        identity.display_name,
                        target,
                        brain.intent.label()
                    );
                    finish_intent(&mut brain);
                    continue;
                }
            }
        }

        if let Some(next) = brain.path.pop_front() {
            position.0 = next;
            brain.move_cooldown = roster.move_interval_ticks * hunger.move_multiplier(&needs);
        }
    }
}

/// Carries out the current intent once the NPC stands where it needs to.
pub fn act_on_arrival(
    roster: Res<CharacterRoster>,
    mut npcs: Query<
        (Entity, &Identity, &GridPosition, &mut NpcBrain),
        (With<Npc>, Without<InConversation>),
    >,
    mut farm_requests: MessageWriter<FarmActionRequest>,
    mut eat_requests: MessageWriter<EatRequest>,
) {
    for (actor, identity, position, mut brain) in &mut npcs {
        if brain.move_cooldown > 0 {
            continue;
        }
        if brain.intent.target().is_some_and(|target| target != position.0) {
            continue;
        }

        let action = match brain.intent {
            NpcIntent::Eat => {
                eat_requests.write(EatRequest { actor });
                None
            }
            NpcIntent::Harvest(_) => Some(FarmAction::Harvest),
            NpcIntent::Plant(_, crop) => Some(FarmAction::Plant(crop)),
            NpcIntent::Till(_) => Some(FarmAction::Till),
            NpcIntent::Wander(_) => None,
            NpcIntent::Idle | NpcIntent::Converse => continue,
        };

        if let Some(action) = action {
            farm_requests.write(FarmActionRequest {
                actor,
                action,
                pos: position.0,
            });
        }

        debug!("{} done {}", identity.display_name, brain.intent.label());
        finish_intent(&mut brain);
        brain.move_cooldown = roster.move_interval_ticks;
    }
}

fn finish_intent(brain: &mut NpcBrain) {
    brain.set_intent(NpcIntent::Idle);
    brain.decide_cooldown = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        farming::crops::CropKind,
        npc::components::CharacterId,
        world::tiles::{Tile, TilePos},
    };

    fn roster() -> CharacterRoster {
        let mut roster = CharacterRoster::default();
        roster.move_interval_ticks = 1;
        roster.decide_interval_ticks = 1;
        roster
    }

    fn npc_at(app: &mut App, pos: TilePos, intent: NpcIntent) -> Entity {
        let mut brain = NpcBrain::default();
        brain.set_intent(intent);
        app.world_mut()
            .spawn((
                Npc,
                Identity::new(CharacterId::new(1), "Bob", "a farmer"),
                Home(pos),
                GridPosition(pos),
                Hunger::new(0.0),
                Inventory::default(),
                brain,
            ))
            .id()
    }

    fn movement_app(grid: TileGrid) -> App {
        let mut app = App::new();
        app.insert_resource(grid)
            .insert_resource(roster())
            .insert_resource(NeedsConfig::default())
            .add_message::<FarmActionRequest>()
            .add_message::<EatRequest>()
            .add_systems(Update, (move_npcs, act_on_arrival).chain());
        app
    }

    #[test]
    fn spawns_roster_with_unique_ids() {
        let mut app = App::new();
        app.insert_resource(WorldSettings::default())
            .insert_resource(CharacterRoster::default())
            .insert_resource(NeedsConfig::default())
            .init_resource::<CharacterIdGenerator>()
            .add_systems(Update, spawn_npcs);
        app.update();

        let mut query = app
            .world_mut()
            .query_filtered::<(&Identity, &GridPosition, Option<&FarmPlot>), With<Npc>>();
        let mut spawned: Vec<_> = query
            .iter(app.world())
            .map(|(identity, position, plot)| {
                (identity.id.value(), identity.display_name.clone(), position.0, plot.is_some())
            })
            .collect();
        spawned.sort_by_key(|entry| entry.0);

        assert_eq!(
            spawned,
            vec![
                (1, "Bob".to_string(), TilePos::new(10, 20), true),
                (2, "Bill".to_string(), TilePos::new(30, 20), true),
            ]
        );
    }

    #[test]
    fn walks_one_tile_per_interval_and_replans_around_water() {
        let mut app = movement_app(TileGrid::new(4, 3, Tile::Grass));
        let npc = npc_at(&mut app, TilePos::new(0, 1), NpcIntent::Wander(TilePos::new(3, 1)));

        app.update();
        assert_eq!(
            app.world().get::<GridPosition>(npc).unwrap().0,
            TilePos::new(1, 1)
        );

        app.world_mut()
            .resource_mut::<TileGrid>()
            .set(TilePos::new(2, 1), Tile::Water)
            .unwrap();
        for _ in 0..5 {
            app.update();
        }

        let position = app.world().get::<GridPosition>(npc).unwrap().0;
        assert_eq!(position, TilePos::new(3, 1));
        assert_eq!(
            app.world().get::<NpcBrain>(npc).unwrap().intent,
            NpcIntent::Idle
        );
    }

    #[test]
    fn unreachable_targets_are_dropped() {
        let mut grid = TileGrid::new(3, 1, Tile::Grass);
        grid.set(TilePos::new(1, 0), Tile::Water).unwrap();
        let mut app = movement_app(grid);
        let npc = npc_at(&mut app, TilePos::new(0, 0), NpcIntent::Till(TilePos::new(2, 0)));

        app.update();

        assert_eq!(
            app.world().get::<GridPosition>(npc).unwrap().0,
            TilePos::new(0, 0)
        );
        assert_eq!(
            app.world().get::<NpcBrain>(npc).unwrap().intent,
            NpcIntent::Idle
        );
    }

    #[test]
    fn arrival_sends_farm_request() {
        let mut app = movement_app(TileGrid::new(3, 3, Tile::Grass));
        let pos = TilePos::new(1, 1);
        let npc = npc_at(&mut app, pos, NpcIntent::Plant(pos, CropKind::Carrot));

        app.update();

        let requests = app.world().resource::<Messages<FarmActionRequest>>();
        let mut cursor = requests.get_cursor();
        let sent: Vec<_> = cursor.read(requests).copied().collect();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].actor, npc);
        assert_eq!(sent[0].action, FarmAction::Plant(CropKind::Carrot));
        assert_eq!(sent[0].pos, pos);
    }

    #[test]
    fn conversations_expire() {
        let mut app = App::new();
        app.add_systems(Update, count_down_conversations);
        let npc = app
            .world_mut()
            .spawn((
                Identity::new(CharacterId::new(1), "Bob", "a farmer"),
                InConversation {
                    partner: CharacterId::player(),
                    remaining_ticks: 2,
                },
            ))
            .id();

        app.update();
        assert!(app.world().get::<InConversation>(npc).is_some());
        app.update();
        assert!(app.world().get::<InConversation>(npc).is_none());
    }

    #[test]
    fn conversation_overrides_current_intent() {
        let mut app = App::new();
        app.insert_resource(TileGrid::new(5, 5, Tile::Grass))
            .insert_resource(roster())
            .insert_resource(NeedsConfig::default())
            .insert_resource(NpcRng::seeded(3))
            .add_systems(Update, decide_intents);
        let npc = npc_at(&mut app, TilePos::new(2, 2), NpcIntent::Wander(TilePos::new(4, 4)));
        app.world_mut().entity_mut(npc).insert(InConversation {
            partner: CharacterId::player(),
            remaining_ticks: 10,
        });

        app.update();

        assert_eq!(
            app.world().get::<NpcBrain>(npc).unwrap().intent,
            NpcIntent::Converse
        );
    }
}
