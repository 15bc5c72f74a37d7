//! Character needs. Only hunger for now.
pub mod components;
pub mod config;
pub mod events;
pub mod plugin;
pub mod systems;

pub use components::{Hunger, HungerLevel};
pub use plugin::NeedsPlugin;
