//! Farming plugin wiring crop growth and action handling into the fixed step.
use bevy::prelude::*;

use crate::core::SimulationSet;

use super::{
    config::FarmingConfig,
    events::{FarmActionEvent, FarmActionRequest},
    systems::{apply_farm_actions, grow_crops},
};

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        let config = FarmingConfig::load_or_default();
        info!(
            "Farming configured: wheat ripens every {} ticks/stage, carrot every {}",
            config.crop(super::crops::CropKind::Wheat).ticks_per_stage,
            config.crop(super::crops::CropKind::Carrot).ticks_per_stage
        );

        app.insert_resource(config)
            .add_message::<FarmActionRequest>()
            .add_message::<FarmActionEvent>()
            .add_systems(
                FixedUpdate,
                (
                    grow_crops.in_set(SimulationSet::Time),
                    apply_farm_actions.in_set(SimulationSet::Actions),
                ),
            );
    }
}
