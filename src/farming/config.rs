//! Crop growth and yield tuning loaded from `config/farming.toml`.
use bevy::prelude::*;
use serde::Deserialize;

use crate::core::config::load_toml_or_default;

use super::crops::CropKind;

const CONFIG_PATH: &str = "config/farming.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawFarmingConfig {
    #[serde(default)]
    crops: RawCrops,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawCrops {
    wheat: RawCrop,
    carrot: RawCrop,
}

impl Default for RawCrops {
    fn default() -> Self {
        Self {
            wheat: RawCrop {
                ticks_per_stage: 600,
                yield_amount: 3,
                seed_return: 2,
            },
            carrot: RawCrop {
                ticks_per_stage: 800,
                yield_amount: 2,
                seed_return: 1,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawCrop {
    ticks_per_stage: u32,
    yield_amount: u32,
    seed_return: u32,
}

/// Growth speed and harvest size for one crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSettings {
    pub ticks_per_stage: u32,
    pub yield_amount: u32,
    pub seed_return: u32,
}

impl From<RawCrop> for CropSettings {
    fn from(value: RawCrop) -> Self {
        Self {
            ticks_per_stage: value.ticks_per_stage.max(1),
            yield_amount: value.yield_amount.max(1),
            seed_return: value.seed_return,
        }
    }
}

/// Runtime farming configuration.
#[derive(Resource, Debug, Clone)]
pub struct FarmingConfig {
    wheat: CropSettings,
    carrot: CropSettings,
}

impl FarmingConfig {
    pub fn load_or_default() -> Self {
        load_toml_or_default::<RawFarmingConfig>(CONFIG_PATH).into()
    }

    pub fn crop(&self, kind: CropKind) -> &CropSettings {
        match kind {
            CropKind::Wheat => &self.wheat,
            CropKind::Carrot => &self.carrot,
        }
    }
}

impl Default for FarmingConfig {
    fn default() -> Self {
        RawFarmingConfig::default().into()
    }
}

impl From<RawFarmingConfig> for FarmingConfig {
    fn from(value: RawFarmingConfig) -> Self {
        Self {
            wheat: value.crops.wheat.into(),
            carrot: value.crops.carrot.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_other_crop_defaults() {
        let raw: RawFarmingConfig = toml::from_str(
            "[crops.wheat]\nticks_per_stage = 0\nyield_amount = 5\nseed_return = 0\n",
        )
        .unwrap();
        let config = FarmingConfig::from(raw);

        assert_eq!(config.crop(CropKind::Wheat).ticks_per_stage, 1);
        assert_eq!(config.crop(CropKind::Wheat).yield_amount, 5);
        assert_eq!(config.crop(CropKind::Carrot).ticks_per_stage, 800);
    }
}
