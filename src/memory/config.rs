//! Memory capacities loaded from `config/memory.toml`.
use bevy::prelude::*;
use serde::Deserialize;

use crate::core::config::load_toml_or_default;

const CONFIG_PATH: &str = "config/memory.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawMemoryConfig {
    #[serde(default)]
    memory: RawMemorySection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawMemorySection {
    short_term_capacity: usize,
    consolidation_batch: usize,
    long_term_capacity: usize,
    prompt_recent: usize,
    prompt_long_term: usize,
}

impl Default for RawMemorySection {
    fn default() -> Self {
        Self {
            short_term_capacity: 12,
            consolidation_batch: 6,
            long_term_capacity: 10,
            prompt_recent: 6,
            prompt_long_term: 4,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct MemoryConfig {
    pub short_term_capacity: usize,
    /// Oldest short-term entries folded into one long-term summary at a time.
    pub consolidation_batch: usize,
    pub long_term_capacity: usize,
    /// Recent entries included in dialogue prompts.
    pub prompt_recent: usize,
    pub prompt_long_term: usize,
}

impl MemoryConfig {
    pub fn load_or_default() -> Self {
        load_toml_or_default::<RawMemoryConfig>(CONFIG_PATH).into()
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        RawMemoryConfig::default().into()
    }
}

impl From<RawMemoryConfig> for MemoryConfig {
    fn from(value: RawMemoryConfig) -> Self {
        let raw = value.memory;
        let short_term_capacity = raw.short_term_capacity.max(1);
        Self {
            short_term_capacity,
            consolidation_batch: raw.consolidation_batch.clamp(1, short_term_capacity),
            long_term_capacity: raw.long_term_capacity.max(1),
            prompt_recent: raw.prompt_recent,
            prompt_long_term: raw.prompt_long_term,
        }
    }
}
