//! Villagers: identity, roster, intent selection, movement and chatter.
pub mod behaviour;
pub mod components;
pub mod config;
pub mod plugin;
pub mod social;
pub mod systems;

pub use plugin::NpcPlugin;
