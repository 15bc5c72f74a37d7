//! Hunger tuning loaded from `config/needs.toml`.
use bevy::prelude::*;
use serde::Deserialize;

use crate::core::config::load_toml_or_default;

const CONFIG_PATH: &str = "config/needs.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawNeedsConfig {
    #[serde(default)]
    hunger: RawHunger,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawHunger {
    per_tick: f32,
    max: f32,
    start: f32,
    peckish: f32,
    hungry: f32,
    starving: f32,
    starving_move_multiplier: u32,
}

impl Default for RawHunger {
    fn default() -> Self {
        Self {
            per_tick: 0.02,
            max: 100.0,
            start: 10.0,
            peckish: 30.0,
            hungry: 60.0,
            starving: 90.0,
            starving_move_multiplier: 2,
        }
    }
}

/// Hunger level boundaries; each is the lowest value at which the level applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HungerThresholds {
    pub peckish: f32,
    pub hungry: f32,
    pub starving: f32,
}

/// Runtime configuration derived from `config/needs.toml`.
#[derive(Resource, Debug, Clone)]
pub struct NeedsConfig {
    pub hunger_per_tick: f32,
    pub max_hunger: f32,
    pub start_hunger: f32,
    pub thresholds: HungerThresholds,
    pub starving_move_multiplier: u32,
}

impl NeedsConfig {
    pub fn load_or_default() -> Self {
        load_toml_or_default::<RawNeedsConfig>(CONFIG_PATH).into()
    }
}

impl Default for NeedsConfig {
    fn default() -> Self {
        RawNeedsConfig::default().into()
    }
}

impl From<RawNeedsConfig> for NeedsConfig {
    fn from(value: RawNeedsConfig) -> Self {
        let raw = value.hunger;
        let max_hunger = raw.max.max(1.0);
        let peckish = raw.peckish.clamp(0.0, max_hunger);
        let hungry = raw.hungry.clamp(peckish, max_hunger);
        let starving = raw.starving.clamp(hungry, max_hunger);

        Self {
            hunger_per_tick: raw.per_tick.max(0.0),
            max_hunger,
            start_hunger: raw.start.clamp(0.0, max_hunger),
            thresholds: HungerThresholds {
                peckish,
                hungry,
                starving,
            },
            starving_move_multiplier: raw.starving_move_multiplier.max(1),
        }
    }
}
