//! World snapshots written to and read from JSON.
pub mod plugin;
pub mod snapshot;
pub mod systems;

pub use plugin::StatePlugin;
