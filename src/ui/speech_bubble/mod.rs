// src/ui/speech_bubble/mod.rs
//
// Speech bubbles: the line each character is saying, drawn above its sprite.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::SpeechBubblePlugin;
