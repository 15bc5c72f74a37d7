//! Quick save and quick load of the whole village, bound to F5 and F9.
use std::path::PathBuf;

use bevy::prelude::*;

use crate::{
    inventory::Inventory,
    memory::Memory,
    needs::{config::NeedsConfig, Hunger},
    npc::{
        behaviour::NpcIntent,
        components::{Identity, InConversation, NpcBrain},
    },
    player::components::PlayerNotice,
    world::{
        components::GridPosition,
        config::WorldSettings,
        systems::character_translation,
        tiles::{TileGrid, TilePos},
        time::{WorldClock, WorldTimeSettings},
    },
};

use super::snapshot::{CharacterSnapshot, SnapshotError, WorldSnapshot};

pub const DEFAULT_SAVE_PATH: &str = "saves/world.json";
pub const SAVE_KEY: KeyCode = KeyCode::F5;
pub const LOAD_KEY: KeyCode = KeyCode::F9;

/// Where quick save and quick load read and write.
#[derive(Resource, Debug, Clone)]
pub struct SnapshotSettings {
    pub path: PathBuf,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SAVE_PATH),
        }
    }
}

pub fn save_snapshot_on_key(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<SnapshotSettings>,
    clock: Res<WorldClock>,
    grid: Res<TileGrid>,
    mut notice: ResMut<PlayerNotice>,
    characters: Query<(&Identity, &GridPosition, &Hunger, &Inventory, &Memory)>,
) {
    if !keys.just_pressed(SAVE_KEY) {
        return;
    }

    let snapshot = WorldSnapshot::capture(
        &clock,
        &grid,
        characters
            .iter()
            .map(|(identity, position, hunger, inventory, memory)| {
                CharacterSnapshot::capture(
                    identity.id,
                    &identity.display_name,
                    position.0,
                    hunger.value(),
                    inventory,
                    memory,
                )
            }),
    );

    match snapshot.save(&settings.path) {
        Ok(()) => {
            info!(
                target: "state",
                "Saved day {} with {} characters to {}",
                snapshot.day,
                snapshot.characters.len(),
                settings.path.display()
            );
            notice.show("Game saved");
        }
        Err(err) => {
            warn!(target: "state", "{}", err);
            notice.show("Saving failed");
        }
    }
}

#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn load_snapshot_on_key(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<SnapshotSettings>,
    time_settings: Res<WorldTimeSettings>,
    world_settings: Res<WorldSettings>,
    needs: Res<NeedsConfig>,
    mut clock: ResMut<WorldClock>,
    mut grid: ResMut<TileGrid>,
    mut notice: ResMut<PlayerNotice>,
    mut characters: Query<(
        Entity,
        &Identity,
        &mut GridPosition,
        &mut Transform,
        &mut Hunger,
        &mut Inventory,
        &mut Memory,
        Option<&mut NpcBrain>,
    )>,
) {
    if !keys.just_pressed(LOAD_KEY) {
        return;
    }

    let snapshot = match WorldSnapshot::load(&settings.path) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(target: "state", "{}", err);
            notice.show(match err {
                SnapshotError::Io { .. } => "No saved game found",
                _ => "The saved game could not be read",
            });
            return;
        }
    };

    let grid_snapshot = snapshot.grid.clone();
    if let Err(err) =
        grid.replace_tiles(grid_snapshot.width, grid_snapshot.height, grid_snapshot.tiles)
    {
        warn!(target: "state", "Snapshot map does not fit this world: {}", err);
        notice.show("The saved game is for a different map");
        return;
    }
    *clock = WorldClock::restore(
        snapshot.day,
        snapshot.ticks_into_day,
        time_settings.ticks_per_day,
    );

    let mut restored = 0;
    for saved in &snapshot.characters {
        let Some((entity, _, mut position, mut transform, mut hunger, mut inventory, mut memory, brain)) =
            characters
                .iter_mut()
                .find(|(_, identity, ..)| identity.id == saved.id)
        else {
            warn!(
                target: "state",
                "Skipping saved character {} ({}): nobody with that id is present",
                saved.name,
                saved.id
            );
            continue;
        };

        match walkable_near(&grid, saved.position) {
            Some(pos) if pos == saved.position => position.0 = pos,
            Some(pos) => {
                warn!(
                    target: "state",
                    "Saved position {} of {} cannot be stood on, moving to {}",
                    saved.position,
                    saved.name,
                    pos
                );
                position.0 = pos;
            }
            None => warn!(
                target: "state",
                "No walkable tile for {}, keeping them at {}",
                saved.name,
                position.0
            ),
        }
        transform.translation = character_translation(*position, world_settings.tile_size);
        hunger.set(saved.hunger, needs.max_hunger);
        *inventory = saved.inventory();
        *memory = saved.memory.clone();
        if let Some(mut brain) = brain {
            brain.set_intent(NpcIntent::Idle);
            brain.move_cooldown = 0;
            brain.decide_cooldown = 0;
        }
        commands.entity(entity).remove::<InConversation>();
        restored += 1;
    }

    info!(
        target: "state",
        "Loaded day {} from {} ({} characters restored)",
        snapshot.day,
        settings.path.display(),
        restored
    );
    notice.show("Game loaded");
}

/// `pos` itself when a character may stand there, otherwise the closest tile that is.
fn walkable_near(grid: &TileGrid, pos: TilePos) -> Option<TilePos> {
    if grid.is_walkable(pos) {
        return Some(pos);
    }
    grid.find_nearest(pos, |_, tile| tile.is_walkable())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        inventory::ItemKind,
        npc::components::CharacterId,
        world::tiles::Tile,
    };
    use std::{env, fs, time::SystemTime};

    fn temp_settings(tag: &str) -> SnapshotSettings {
        let suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        SnapshotSettings {
            path: env::temp_dir()
                .join(format!("townsfolk_state_{}_{}", tag, suffix))
                .join("world.json"),
        }
    }

    fn state_app(settings: SnapshotSettings) -> App {
        let time_settings = WorldTimeSettings::default();
        let mut app = App::new();
        app.insert_resource(settings)
            .insert_resource(WorldClock::new(&time_settings))
            .insert_resource(time_settings)
            .insert_resource(WorldSettings::default())
            .insert_resource(NeedsConfig::default())
            .insert_resource(TileGrid::new(4, 4, Tile::Grass))
            .init_resource::<PlayerNotice>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(Update, (save_snapshot_on_key, load_snapshot_on_key).chain());
        app
    }

    fn press(app: &mut App, key: KeyCode) {
        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.reset_all();
            keys.press(key);
        }
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .reset_all();
    }

    fn villager(app: &mut App, id: u64, name: &str, pos: TilePos) -> Entity {
        app.world_mut()
            .spawn((
                Identity::new(CharacterId::new(id), name, "a villager"),
                GridPosition(pos),
                Transform::default(),
                Hunger::new(10.0),
                Inventory::with_items([(ItemKind::Carrot, 2)]),
                Memory::default(),
                NpcBrain::default(),
            ))
            .id()
    }

    #[test]
    fn quick_load_restores_the_saved_village() {
        let settings = temp_settings("apply");
        let path = settings.path.clone();
        let mut app = state_app(settings);
        let bob = villager(&mut app, 1, "Bob", TilePos::new(1, 1));

        press(&mut app, SAVE_KEY);
        assert!(path.exists());
        assert_eq!(
            app.world().resource::<PlayerNotice>().text(),
            Some("Game saved")
        );

        {
            let world = app.world_mut();
            world
                .resource_mut::<TileGrid>()
                .set(TilePos::new(0, 0), Tile::Water)
                .unwrap();
            *world.resource_mut::<WorldClock>() = WorldClock::restore(9, 0, 100);
            let mut entity = world.entity_mut(bob);
            entity.get_mut::<GridPosition>().unwrap().0 = TilePos::new(3, 3);
            entity.get_mut::<Hunger>().unwrap().set(90.0, 100.0);
            *entity.get_mut::<Inventory>().unwrap() = Inventory::default();
            entity.get_mut::<NpcBrain>().unwrap().set_intent(NpcIntent::Eat);
            entity.insert(InConversation {
                partner: CharacterId::player(),
                remaining_ticks: 20,
            });
        }

        press(&mut app, LOAD_KEY);

        let world = app.world();
        assert_eq!(world.resource::<TileGrid>().get(TilePos::new(0, 0)), Some(&Tile::Grass));
        assert_eq!(world.resource::<WorldClock>().day_count(), 1);
        assert_eq!(world.get::<GridPosition>(bob).unwrap().0, TilePos::new(1, 1));
        let expected = character_translation(
            GridPosition(TilePos::new(1, 1)),
            world.resource::<WorldSettings>().tile_size,
        );
        assert_eq!(world.get::<Transform>(bob).unwrap().translation, expected);
        assert_eq!(world.get::<Hunger>(bob).unwrap().value(), 10.0);
        assert_eq!(
            world.get::<Inventory>(bob).unwrap().quantity_of(ItemKind::Carrot),
            2
        );
        assert_eq!(world.get::<NpcBrain>(bob).unwrap().intent, NpcIntent::Idle);
        assert!(world.get::<InConversation>(bob).is_none());
        assert_eq!(world.resource::<PlayerNotice>().text(), Some("Game loaded"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn unknown_characters_are_skipped() {
        let settings = temp_settings("unknown");
        let path = settings.path.clone();
        let mut app = state_app(settings);
        let bob = villager(&mut app, 1, "Bob", TilePos::new(1, 1));
        villager(&mut app, 2, "Bill", TilePos::new(2, 2));
        press(&mut app, SAVE_KEY);

        let mut identities = app.world_mut().query::<(Entity, &Identity)>();
        let bill = identities
            .iter(app.world())
            .find(|(_, identity)| identity.id == CharacterId::new(2))
            .map(|(entity, _)| entity)
            .unwrap();
        app.world_mut().despawn(bill);
        app.world_mut().get_mut::<GridPosition>(bob).unwrap().0 = TilePos::new(0, 3);

        press(&mut app, LOAD_KEY);
        assert_eq!(
            app.world().get::<GridPosition>(bob).unwrap().0,
            TilePos::new(1, 1)
        );

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn loaded_positions_are_moved_onto_walkable_ground() {
        let settings = temp_settings("walkable");
        let path = settings.path.clone();
        let mut app = state_app(settings);
        let bob = villager(&mut app, 1, "Bob", TilePos::new(1, 1));
        let bill = villager(&mut app, 2, "Bill", TilePos::new(2, 2));
        app.world_mut()
            .resource_mut::<TileGrid>()
            .set(TilePos::new(3, 3), Tile::Water)
            .unwrap();
        press(&mut app, SAVE_KEY);

        let mut snapshot = WorldSnapshot::load(&path).unwrap();
        for character in &mut snapshot.characters {
            character.position = if character.id == CharacterId::new(1) {
                TilePos::new(99, -5)
            } else {
                TilePos::new(3, 3)
            };
        }
        snapshot.save(&path).unwrap();

        press(&mut app, LOAD_KEY);

        let world = app.world();
        let grid = world.resource::<TileGrid>();
        let bob_pos = world.get::<GridPosition>(bob).unwrap().0;
        let bill_pos = world.get::<GridPosition>(bill).unwrap().0;
        assert_eq!(bob_pos, TilePos::new(3, 0));
        assert!(grid.is_walkable(bill_pos));
        assert_eq!(bill_pos.manhattan(TilePos::new(3, 3)), 1);
        assert_eq!(world.resource::<PlayerNotice>().text(), Some("Game loaded"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn loading_without_a_save_leaves_the_world_alone() {
        let mut app = state_app(temp_settings("missing"));
        let bob = villager(&mut app, 1, "Bob", TilePos::new(1, 1));
        app.world_mut().get_mut::<GridPosition>(bob).unwrap().0 = TilePos::new(2, 1);

        press(&mut app, LOAD_KEY);

        assert_eq!(
            app.world().get::<GridPosition>(bob).unwrap().0,
            TilePos::new(2, 1)
        );
        assert_eq!(
            app.world().resource::<PlayerNotice>().text(),
            Some("No saved game found")
        );
    }
}
