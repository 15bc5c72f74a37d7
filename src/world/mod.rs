//! World module: the tile grid, map generation, the day clock and rendering.
pub mod components;
pub mod config;
pub mod errors;
pub mod layout;
pub mod path;
pub mod plugin;
pub mod systems;
pub mod tiles;
pub mod time;

pub use plugin::WorldPlugin;
