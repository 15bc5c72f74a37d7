//! Dialogue: brokers that voice characters, the request queue and telemetry.
pub mod broker;
pub mod context;
pub mod errors;
pub mod events;
pub mod plugin;
pub mod prompt;
pub mod queue;
pub mod status;
pub mod systems;
pub mod telemetry;
pub mod types;

pub use plugin::{DialoguePlugin, DialogueSet};
