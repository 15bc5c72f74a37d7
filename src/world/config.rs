//! Map dimensions and generation seed from `config/world.toml`.
use bevy::prelude::*;
use serde::Deserialize;

use crate::core::config::load_toml_or_default;

const CONFIG_PATH: &str = "config/world.toml";
const MIN_DIMENSION: i32 = 12;
const MAX_DIMENSION: i32 = 256;

#[derive(Debug, Clone, Deserialize, Default)]
struct RawWorldConfig {
    #[serde(default)]
    map: RawMapSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawMapSection {
    width: i32,
    height: i32,
    tile_size: f32,
    seed: u64,
}

impl Default for RawMapSection {
    fn default() -> Self {
        Self {
            width: 40,
            height: 28,
            tile_size: 24.0,
            seed: 7,
        }
    }
}

/// Validated map settings.
#[derive(Resource, Debug, Clone, Copy)]
pub struct WorldSettings {
    pub width: i32,
    pub height: i32,
    pub tile_size: f32,
    pub seed: u64,
}

impl WorldSettings {
    pub fn load_or_default() -> Self {
        load_toml_or_default::<RawWorldConfig>(CONFIG_PATH).into()
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        RawWorldConfig::default().into()
    }
}

impl From<RawWorldConfig> for WorldSettings {
    fn from(value: RawWorldConfig) -> Self {
        let map = value.map;
        Self {
            width: map.width.clamp(MIN_DIMENSION, MAX_DIMENSION),
            height: map.height.clamp(MIN_DIMENSION, MAX_DIMENSION),
            tile_size: if map.tile_size.is_finite() {
                map.tile_size.clamp(4.0, 128.0)
            } else {
                24.0
            },
            seed: map.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_dimensions() {
        let settings = WorldSettings::from(RawWorldConfig {
            map: RawMapSection {
                width: 2,
                height: 10_000,
                tile_size: f32::NAN,
                seed: 3,
            },
        });
        assert_eq!(settings.width, MIN_DIMENSION);
        assert_eq!(settings.height, MAX_DIMENSION);
        assert_eq!(settings.tile_size, 24.0);
        assert_eq!(settings.seed, 3);
    }
}
