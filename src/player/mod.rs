//! The player's character: keyboard movement, farm work, eating and chat.
pub mod components;
pub mod events;
pub mod plugin;
pub mod systems;

pub use plugin::PlayerPlugin;
