//! Farming: crops, plots and the till / plant / harvest cycle.
pub mod actions;
pub mod components;
pub mod config;
pub mod crops;
pub mod errors;
pub mod events;
pub mod plugin;
pub mod systems;

pub use plugin::FarmingPlugin;
