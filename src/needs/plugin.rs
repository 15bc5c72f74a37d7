//! Needs plugin: hunger rises every tick and meals lower it.
use bevy::prelude::*;

use crate::core::SimulationSet;

use super::{
    config::NeedsConfig,
    events::{EatRequest, HungerLevelChanged, MealEaten},
    systems::{apply_eat_requests, increase_hunger},
};

pub struct NeedsPlugin;

impl Plugin for NeedsPlugin {
    fn build(&self, app: &mut App) {
        let config = NeedsConfig::load_or_default();
        info!(
            "Needs configured: hunger +{}/tick, starving at {}",
            config.hunger_per_tick, config.thresholds.starving
        );

        app.insert_resource(config)
            .add_message::<HungerLevelChanged>()
            .add_message::<EatRequest>()
            .add_message::<MealEaten>()
            .add_systems(
                FixedUpdate,
                (
                    increase_hunger.in_set(SimulationSet::Needs),
                    apply_eat_requests.in_set(SimulationSet::Actions),
                ),
            );
    }
}
