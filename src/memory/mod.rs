//! Character memory: recent experiences plus consolidated long-term summaries.
pub mod components;
pub mod config;
pub mod plugin;
pub mod systems;

pub use components::{Memory, MemoryEntry, MemoryKind};
pub use plugin::MemoryPlugin;
