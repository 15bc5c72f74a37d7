//! Serializable copy of the village: clock, tiles and every character.
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    inventory::{Inventory, ItemKind},
    memory::Memory,
    npc::components::CharacterId,
    world::{
        tiles::{Tile, TileGrid, TilePos},
        time::WorldClock,
    },
};

/// Bumped whenever the on-disk layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum SnapshotError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    UnsupportedVersion { found: u32, expected: u32 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "snapshot io error at {}: {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "invalid snapshot json in {}: {}", path.display(), source)
            }
            Self::UnsupportedVersion { found, expected } => write!(
                f,
                "snapshot version {} is not supported (expected {})",
                found, expected
            ),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStackSnapshot {
    pub item: ItemKind,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<Tile>,
}

impl GridSnapshot {
    pub fn capture(grid: &TileGrid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            tiles: grid.tiles().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub id: CharacterId,
    pub name: String,
    pub position: TilePos,
    pub hunger: f32,
    pub inventory: Vec<ItemStackSnapshot>,
    pub memory: Memory,
}

impl CharacterSnapshot {
    pub fn capture(
        id: CharacterId,
        name: &str,
        position: TilePos,
        hunger: f32,
        inventory: &Inventory,
        memory: &Memory,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            position,
            hunger,
            inventory: inventory
                .items()
                .map(|(item, quantity)| ItemStackSnapshot { item, quantity })
                .collect(),
            memory: memory.clone(),
        }
    }

    pub fn inventory(&self) -> Inventory {
        Inventory::with_items(
            self.inventory
                .iter()
                .map(|stack| (stack.item, stack.quantity)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub version: u32,
    pub day: u64,
    pub ticks_into_day: u32,
    /// Informational; restoring uses `ticks_into_day`.
    pub time_of_day: f32,
    pub grid: GridSnapshot,
    pub characters: Vec<CharacterSnapshot>,
}

impl WorldSnapshot {
    pub fn capture(
        clock: &WorldClock,
        grid: &TileGrid,
        characters: impl IntoIterator<Item = CharacterSnapshot>,
    ) -> Self {
        let mut characters: Vec<_> = characters.into_iter().collect();
        characters.sort_by_key(|character| character.id);
        Self {
            version: SNAPSHOT_VERSION,
            day: clock.day_count(),
            ticks_into_day: clock.ticks_into_day(),
            time_of_day: clock.time_of_day(),
            grid: GridSnapshot::capture(grid),
            characters,
        }
    }

    pub fn character(&self, id: CharacterId) -> Option<&CharacterSnapshot> {
        self.characters.iter().find(|character| character.id == id)
    }

    /// Writes pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let io_error = |source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_error)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: Self = serde_json::from_str(&data).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        farming::crops::{CropKind, CropState},
        memory::{config::MemoryConfig, MemoryEntry, MemoryKind},
    };
    use std::{env, time::SystemTime};

    fn temp_path(tag: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        env::temp_dir()
            .join(format!("townsfolk_snapshot_{}_{}", tag, suffix))
            .join("world.json")
    }

    fn sample() -> WorldSnapshot {
        let mut grid = TileGrid::new(3, 2, Tile::Grass);
        grid.set(TilePos::new(1, 1), Tile::Crop(CropState::planted(CropKind::Carrot)))
            .unwrap();

        let mut memory = Memory::default();
        memory.remember(
            MemoryEntry::new(
                2,
                "09:15",
                MemoryKind::Heard {
                    from: "Bill".to_string(),
                },
                "Carrots are coming up nicely.",
            ),
            &MemoryConfig::default(),
        );

        let characters = [
            CharacterSnapshot::capture(
                CharacterId::new(1),
                "Bob",
                TilePos::new(2, 0),
                42.0,
                &Inventory::with_items([(ItemKind::Wheat, 3)]),
                &memory,
            ),
            CharacterSnapshot::capture(
                CharacterId::player(),
                "Player",
                TilePos::new(0, 0),
                5.0,
                &Inventory::default(),
                &Memory::default(),
            ),
        ];
        WorldSnapshot::capture(&WorldClock::restore(2, 40, 100), &grid, characters)
    }

    #[test]
    fn saved_snapshot_loads_back_identically() {
        let snapshot = sample();
        assert_eq!(snapshot.characters[0].id, CharacterId::player());
        assert_eq!(snapshot.day, 2);
        assert!((snapshot.time_of_day - 0.4).abs() < 1e-6);

        let path = temp_path("roundtrip");
        snapshot.save(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["version"], SNAPSHOT_VERSION);
        assert_eq!(json["characters"][1]["name"], "Bob");

        let loaded = WorldSnapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(
            loaded
                .character(CharacterId::new(1))
                .map(|bob| bob.inventory().quantity_of(ItemKind::Wheat)),
            Some(3)
        );

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn rejects_other_versions_and_bad_files() {
        let path = temp_path("version");
        let mut snapshot = sample();
        snapshot.version = SNAPSHOT_VERSION + 1;
        snapshot.save(&path).unwrap();
        assert!(matches!(
            WorldSnapshot::load(&path),
            Err(SnapshotError::UnsupportedVersion { found, .. }) if found == SNAPSHOT_VERSION + 1
        ));

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            WorldSnapshot::load(&path),
            Err(SnapshotError::Parse { .. })
        ));

        let missing = temp_path("missing");
        let err = WorldSnapshot::load(&missing).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
        assert!(err.to_string().contains("snapshot io error"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
