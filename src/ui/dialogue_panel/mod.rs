// src/ui/dialogue_panel/mod.rs
//
// Dialogue panel module providing a bottom-right UI panel for the latest exchange.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::DialoguePanelPlugin;
