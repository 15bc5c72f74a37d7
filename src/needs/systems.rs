//! Hunger growth and eating.
use bevy::prelude::*;

use crate::{inventory::Inventory, npc::components::Identity};

use super::{
    components::Hunger,
    config::NeedsConfig,
    events::{EatRequest, HungerLevelChanged, MealEaten},
};

pub fn increase_hunger(
    config: Res<NeedsConfig>,
    mut characters: Query<(Entity, &Identity, &mut Hunger)>,
    mut changes: MessageWriter<HungerLevelChanged>,
) {
    for (entity, identity, mut hunger) in &mut characters {
        let before = hunger.level(&config);
        hunger.rise(config.hunger_per_tick, config.max_hunger);
        let after = hunger.level(&config);

        if before != after {
            debug!(
                "{} is now {} ({:.1})",
                identity.display_name,
                after.label(),
                hunger.value()
            );
            changes.write(HungerLevelChanged {
                actor: entity,
                character: identity.id,
                from: before,
                to: after,
            });
        }
    }
}

/// Eats the most nourishing food in the actor's inventory.
pub fn apply_eat_requests(
    mut requests: MessageReader<EatRequest>,
    mut characters: Query<(&Identity, &mut Hunger, &mut Inventory)>,
    mut meals: MessageWriter<MealEaten>,
) {
    for request in requests.read() {
        let Ok((identity, mut hunger, mut inventory)) = characters.get_mut(request.actor) else {
            warn!("Eat request from unknown actor {:?}", request.actor);
            continue;
        };

        let eaten = match inventory.best_food() {
            Some(food) if inventory.remove(food, 1) => Some(food),
            _ => None,
        };

        if let Some(food) = eaten {
            hunger.eat(food.nourishment().unwrap_or_default());
            debug!("{} ate {}", identity.display_name, food.label());
        } else {
            debug!("{} wanted to eat but had no food", identity.display_name);
        }

        meals.write(MealEaten {
            actor: request.actor,
            character: identity.id,
            item: eaten,
        });
    }
}
