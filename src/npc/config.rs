//! Character roster and interaction tuning loaded from `config/characters.toml`.
use bevy::prelude::*;
use serde::Deserialize;

use crate::{
    core::config::load_toml_or_default,
    farming::components::FarmPlot,
    inventory::ItemKind,
    world::tiles::TilePos,
};

const CONFIG_PATH: &str = "config/characters.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawRoster {
    player: RawPlayer,
    npcs: Vec<RawNpc>,
    interaction: RawInteraction,
    movement: RawMovement,
}

impl Default for RawRoster {
    fn default() -> Self {
        Self {
            player: RawPlayer::default(),
            npcs: vec![
                RawNpc {
                    name: "Bob".to_string(),
                    persona: "A cheerful wheat farmer who loves a good chat and worries about the harvest.".to_string(),
                    greeting: "Hi im bob".to_string(),
                    home: TilePos::new(10, 20),
                    plot: Some(FarmPlot::new(TilePos::new(6, 16), 5, 3)),
                    items: vec![
                        RawItemStack::new(ItemKind::WheatSeeds, 4),
                        RawItemStack::new(ItemKind::Wheat, 1),
                    ],
                },
                RawNpc {
                    name: "Bill".to_string(),
                    persona: "A gruff carrot grower, short with words but fair and honest.".to_string(),
                    greeting: "Hi im bill".to_string(),
                    home: TilePos::new(30, 20),
                    plot: Some(FarmPlot::new(TilePos::new(26, 16), 5, 3)),
                    items: vec![
                        RawItemStack::new(ItemKind::CarrotSeeds, 4),
                        RawItemStack::new(ItemKind::Carrot, 1),
                    ],
                },
            ],
            interaction: RawInteraction::default(),
            movement: RawMovement::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPlayer {
    name: String,
    persona: String,
    greeting: String,
    start: TilePos,
    home: TilePos,
    plot: Option<FarmPlot>,
    items: Vec<RawItemStack>,
}

impl Default for RawPlayer {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            persona: "A newcomer to the village.".to_string(),
            greeting: "Hi im the player".to_string(),
            start: TilePos::new(20, 14),
            home: TilePos::new(17, 9),
            plot: Some(FarmPlot::new(TilePos::new(22, 9), 4, 3)),
            items: vec![
                RawItemStack::new(ItemKind::WheatSeeds, 3),
                RawItemStack::new(ItemKind::CarrotSeeds, 3),
                RawItemStack::new(ItemKind::Carrot, 2),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawNpc {
    name: String,
    #[serde(default)]
    persona: String,
    #[serde(default)]
    greeting: String,
    home: TilePos,
    #[serde(default)]
    plot: Option<FarmPlot>,
    #[serde(default)]
    items: Vec<RawItemStack>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawItemStack {
    item: ItemKind,
    quantity: u32,
}

impl RawItemStack {
    fn new(item: ItemKind, quantity: u32) -> Self {
        Self { item, quantity }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawInteraction {
    chat_range: i32,
    chatter_range: i32,
    chatter_cooldown_ticks: u32,
    conversation_hold_ticks: u32,
}

impl Default for RawInteraction {
    fn default() -> Self {
        Self {
            chat_range: 3,
            chatter_range: 2,
            chatter_cooldown_ticks: 900,
            conversation_hold_ticks: 180,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawMovement {
    move_interval_ticks: u32,
    decide_interval_ticks: u32,
    wander_radius: i32,
    seed: u64,
}

impl Default for RawMovement {
    fn default() -> Self {
        Self {
            move_interval_ticks: 12,
            decide_interval_ticks: 30,
            wander_radius: 6,
            seed: 42,
        }
    }
}

/// Starting setup for the player character.
#[derive(Debug, Clone)]
pub struct PlayerProfile {
    pub name: String,
    pub persona: String,
    pub greeting: String,
    pub start: TilePos,
    pub home: TilePos,
    pub plot: Option<FarmPlot>,
    pub items: Vec<(ItemKind, u32)>,
}

/// Starting setup for one villager.
#[derive(Debug, Clone)]
pub struct NpcProfile {
    pub name: String,
    pub persona: String,
    pub greeting: String,
    pub home: TilePos,
    pub plot: Option<FarmPlot>,
    pub items: Vec<(ItemKind, u32)>,
}

/// Everyone who lives in the village plus how they interact.
#[derive(Resource, Debug, Clone)]
pub struct CharacterRoster {
    pub player: PlayerProfile,
    pub npcs: Vec<NpcProfile>,
    /// Max Chebyshev distance at which the player can address an NPC.
    pub chat_range: i32,
    pub chatter_range: i32,
    pub chatter_cooldown_ticks: u32,
    pub conversation_hold_ticks: u32,
    pub move_interval_ticks: u32,
    pub decide_interval_ticks: u32,
    pub wander_radius: i32,
    pub seed: u64,
}

impl CharacterRoster {
    pub fn load_or_default() -> Self {
        load_toml_or_default::<RawRoster>(CONFIG_PATH).into()
    }

    /// Pulls every start and home tile onto a `width` x `height` map.
    /// Returns how many positions had to move.
    pub fn clamp_to_map(&mut self, width: i32, height: i32) -> usize {
        let mut moved = 0;
        let mut fit = |who: &str, what: &str, pos: &mut TilePos| {
            let clamped = TilePos::new(
                pos.x.clamp(0, (width - 1).max(0)),
                pos.y.clamp(0, (height - 1).max(0)),
            );
            if clamped != *pos {
                warn!(
                    "{} {} ({}, {}) is outside the {}x{} map, using ({}, {})",
                    who, what, pos.x, pos.y, width, height, clamped.x, clamped.y
                );
                *pos = clamped;
                moved += 1;
            }
        };

        fit(&self.player.name, "start", &mut self.player.start);
        fit(&self.player.name, "home", &mut self.player.home);
        for npc in &mut self.npcs {
            fit(&npc.name, "home", &mut npc.home);
        }
        moved
    }
}

impl Default for CharacterRoster {
    fn default() -> Self {
        RawRoster::default().into()
    }
}

fn stacks(items: Vec<RawItemStack>) -> Vec<(ItemKind, u32)> {
    items
        .into_iter()
        .filter(|stack| stack.quantity > 0)
        .map(|stack| (stack.item, stack.quantity))
        .collect()
}

impl From<RawRoster> for CharacterRoster {
    fn from(value: RawRoster) -> Self {
        let player = PlayerProfile {
            name: if value.player.name.trim().is_empty() {
                "Player".to_string()
            } else {
                value.player.name
            },
            persona: value.player.persona,
            greeting: value.player.greeting,
            start: value.player.start,
            home: value.player.home,
            plot: value.player.plot,
            items: stacks(value.player.items),
        };

        let npcs = value
            .npcs
            .into_iter()
            .filter(|npc| !npc.name.trim().is_empty())
            .map(|npc| NpcProfile {
                name: npc.name,
                persona: npc.persona,
                greeting: npc.greeting,
                home: npc.home,
                plot: npc.plot,
                items: stacks(npc.items),
            })
            .collect();

        Self {
            player,
            npcs,
            chat_range: value.interaction.chat_range.max(1),
            chatter_range: value.interaction.chatter_range.max(1),
            chatter_cooldown_ticks: value.interaction.chatter_cooldown_ticks,
            conversation_hold_ticks: value.interaction.conversation_hold_ticks.max(1),
            move_interval_ticks: value.movement.move_interval_ticks.max(1),
            decide_interval_ticks: value.movement.decide_interval_ticks.max(1),
            wander_radius: value.movement.wander_radius.max(1),
            seed: value.movement.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roster_has_bob_and_bill() {
        let roster = CharacterRoster::default();
        let names: Vec<_> = roster.npcs.iter().map(|npc| npc.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Bill"]);
        assert!(roster.npcs.iter().all(|npc| npc.plot.is_some()));
    }

    #[test]
    fn parses_custom_roster_and_skips_unnamed() {
        let raw: RawRoster = toml::from_str(
            r#"
            [player]
            name = "Ada"
            start = { x = 3, y = 4 }

            [[npcs]]
            name = "Cora"
            persona = "baker"
            home = { x = 5, y = 5 }
            plot = { origin = { x = 1, y = 1 }, width = 2, height = 2 }
            items = [{ item = "wheat", quantity = 2 }, { item = "carrot", quantity = 0 }]

            [[npcs]]
            name = "  "
            home = { x = 0, y = 0 }

            [interaction]
            chat_range = 0
            "#,
        )
        .unwrap();
        let roster = CharacterRoster::from(raw);

        assert_eq!(roster.player.name, "Ada");
        assert_eq!(roster.player.start, TilePos::new(3, 4));
        assert_eq!(roster.npcs.len(), 1);
        assert_eq!(roster.npcs[0].items, vec![(ItemKind::Wheat, 2)]);
        assert_eq!(roster.chat_range, 1);
        assert_eq!(roster.move_interval_ticks, 12);
    }

    #[test]
    fn homes_outside_the_map_are_pulled_onto_it() {
        let mut roster = CharacterRoster::default();
        roster.player.start = TilePos::new(-4, 3);
        roster.npcs[0].home = TilePos::new(99, 120);
        let bill_home = roster.npcs[1].home;

        assert_eq!(roster.clamp_to_map(40, 30), 2);
        assert_eq!(roster.player.start, TilePos::new(0, 3));
        assert_eq!(roster.npcs[0].home, TilePos::new(39, 29));
        assert_eq!(roster.npcs[1].home, bill_home);
        assert_eq!(roster.clamp_to_map(40, 30), 0);
    }
}
