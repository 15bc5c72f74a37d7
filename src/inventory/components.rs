//! Item kinds and the inventory component shared by the player and NPCs.
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::farming::crops::CropKind;

/// Everything a character can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    WheatSeeds,
    CarrotSeeds,
    Wheat,
    Carrot,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::WheatSeeds => "wheat seeds",
            Self::CarrotSeeds => "carrot seeds",
            Self::Wheat => "wheat",
            Self::Carrot => "carrot",
        }
    }

    /// How much hunger eating one unit removes, if the item is food.
    pub fn nourishment(self) -> Option<f32> {
        match self {
            Self::Wheat => Some(25.0),
            Self::Carrot => Some(35.0),
            Self::WheatSeeds | Self::CarrotSeeds => None,
        }
    }

    pub fn is_food(self) -> bool {
        self.nourishment().is_some()
    }

    /// The crop this item grows into, if it is a seed.
    pub fn planted_crop(self) -> Option<CropKind> {
        match self {
            Self::WheatSeeds => Some(CropKind::Wheat),
            Self::CarrotSeeds => Some(CropKind::Carrot),
            Self::Wheat | Self::Carrot => None,
        }
    }
}

/// Inventory storing simple stacks of items.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn with_items(items: impl IntoIterator<Item = (ItemKind, u32)>) -> Self {
        let mut inventory = Self::default();
        for (item, quantity) in items {
            inventory.add(item, quantity);
        }
        inventory
    }

    pub fn add(&mut self, item: ItemKind, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(entry) = self.items.iter_mut().find(|entry| entry.item == item) {
            entry.quantity = entry.quantity.saturating_add(quantity);
        } else {
            self.items.push(InventoryItem { item, quantity });
            self.items.sort_by_key(|entry| entry.item);
        }
    }

    /// Removes `quantity` units. Nothing is removed when fewer are held.
    pub fn remove(&mut self, item: ItemKind, quantity: u32) -> bool {
        if quantity == 0 {
            return true;
        }
        if let Some(position) = self
            .items
            .iter()
            .position(|entry| entry.item == item && entry.quantity >= quantity)
        {
            let entry = &mut self.items[position];
            entry.quantity -= quantity;
            if entry.quantity == 0 {
                self.items.remove(position);
            }
            true
        } else {
            false
        }
    }

    pub fn quantity_of(&self, item: ItemKind) -> u32 {
        self.items
            .iter()
            .find(|entry| entry.item == item)
            .map(|entry| entry.quantity)
            .unwrap_or(0)
    }

    pub fn items(&self) -> impl Iterator<Item = (ItemKind, u32)> + '_ {
        self.items.iter().map(|entry| (entry.item, entry.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_food(&self) -> bool {
        self.items.iter().any(|entry| entry.item.is_food())
    }

    /// Most nourishing food held, if any.
    pub fn best_food(&self) -> Option<ItemKind> {
        self.items
            .iter()
            .filter_map(|entry| entry.item.nourishment().map(|value| (entry.item, value)))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(item, _)| item)
    }

    /// First seed held, as the crop it grows.
    pub fn first_seed(&self) -> Option<CropKind> {
        self.items
            .iter()
            .find_map(|entry| entry.item.planted_crop())
    }

    /// Human-readable listing such as "3 wheat, 1 carrot seeds".
    pub fn summary(&self) -> String {
        if self.items.is_empty() {
            return "nothing".to_string();
        }
        self.items
            .iter()
            .map(|entry| format!("{} {}", entry.quantity, entry.item.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq)]
struct InventoryItem {
    item: ItemKind,
    quantity: u32,
}
