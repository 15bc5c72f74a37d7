//! Intent selection for villagers.
use rand::Rng;

use crate::{
    farming::{components::FarmPlot, crops::CropKind},
    needs::HungerLevel,
    world::tiles::{Tile, TileGrid, TilePos},
};

const WANDER_ATTEMPTS: usize = 12;
const WANDER_CHANCE: f64 = 0.6;

/// What an NPC is currently trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NpcIntent {
    #[default]
    Idle,
    Converse,
    Eat,
    Harvest(TilePos),
    Plant(TilePos, CropKind),
    Till(TilePos),
    Wander(TilePos),
}

impl NpcIntent {
    /// Tile the NPC must stand on before the intent can be carried out.
    pub fn target(&self) -> Option<TilePos> {
        match *self {
            Self::Harvest(pos) | Self::Plant(pos, _) | Self::Till(pos) | Self::Wander(pos) => {
                Some(pos)
            }
            Self::Idle | Self::Converse | Self::Eat => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Idle => "idling".to_string(),
            Self::Converse => "talking".to_string(),
            Self::Eat => "eating".to_string(),
            Self::Harvest(_) => "harvesting".to_string(),
            Self::Plant(_, crop) => format!("planting {}", crop.label()),
            Self::Till(_) => "tilling the field".to_string(),
            Self::Wander(_) => "taking a stroll".to_string(),
        }
    }

    /// Idle and strolling NPCs are free to start a chat.
    pub fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle | Self::Wander(_))
    }
}

/// Snapshot of everything an NPC considers when picking an intent.
pub struct IntentInputs<'a> {
    pub grid: &'a TileGrid,
    pub position: TilePos,
    pub home: TilePos,
    pub plot: Option<FarmPlot>,
    pub hunger: HungerLevel,
    pub has_food: bool,
    pub seed: Option<CropKind>,
    pub in_conversation: bool,
    pub wander_radius: i32,
}

fn nearest_in_plot(
    plot: &FarmPlot,
    grid: &TileGrid,
    from: TilePos,
    predicate: impl Fn(&Tile) -> bool,
) -> Option<TilePos> {
    plot.tiles()
        .filter(|pos| grid.get(*pos).is_some_and(&predicate))
        .min_by_key(|pos| (pos.manhattan(from), pos.y, pos.x))
}

/// Picks the next intent by priority: conversation, food, own harvest,
/// foraging when hungry, planting, tilling, then a stroll near home.
pub fn choose_intent(inputs: &IntentInputs<'_>, rng: &mut impl Rng) -> NpcIntent {
    if inputs.in_conversation {
        return NpcIntent::Converse;
    }

    if inputs.hunger >= HungerLevel::Peckish && inputs.has_food {
        return NpcIntent::Eat;
    }

    if let Some(plot) = &inputs.plot {
        if let Some(pos) = nearest_in_plot(plot, inputs.grid, inputs.position, Tile::is_ripe_crop) {
            return NpcIntent::Harvest(pos);
        }
    }

    if inputs.hunger >= HungerLevel::Hungry {
        if let Some(pos) = inputs
            .grid
            .find_nearest(inputs.position, |_, tile| tile.is_ripe_crop())
        {
            return NpcIntent::Harvest(pos);
        }
    }

    if let Some(plot) = &inputs.plot {
        if let Some(crop) = inputs.seed {
            if let Some(pos) =
                nearest_in_plot(plot, inputs.grid, inputs.position, |tile| *tile == Tile::Tilled)
            {
                return NpcIntent::Plant(pos, crop);
            }
        }
        if let Some(pos) =
            nearest_in_plot(plot, inputs.grid, inputs.position, |tile| *tile == Tile::Grass)
        {
            return NpcIntent::Till(pos);
        }
    }

    if rng.gen_bool(WANDER_CHANCE) {
        if let Some(pos) = wander_target(inputs, rng) {
            return NpcIntent::Wander(pos);
        }
    }

    NpcIntent::Idle
}

fn wander_target(inputs: &IntentInputs<'_>, rng: &mut impl Rng) -> Option<TilePos> {
    let radius = inputs.wander_radius.max(1);
    (0..WANDER_ATTEMPTS)
        .map(|_| {
            inputs.home.offset(
                rng.gen_range(-radius..=radius),
                rng.gen_range(-radius..=radius),
            )
        })
        .find(|pos| *pos != inputs.position && inputs.grid.is_walkable(*pos))
}
