//! Core simulation plumbing: fixed-step clock, schedule sets and config loading.
pub mod config;
pub mod plugin;

pub use plugin::{hotkeys_enabled, CorePlugin, SimulationSet, TextInputActive};
