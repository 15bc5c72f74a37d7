//! Which voice the villagers are using, shown in the HUD and written to telemetry.
use std::fmt;

use bevy::prelude::Resource;
use serde::Serialize;

use super::broker::DialogueProviderKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueConnectionState {
    Live,
    Fallback,
}

impl DialogueConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Fallback => "fallback",
        }
    }
}

/// Chosen once at start-up by `select_broker`.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DialogueBrokerStatus {
    provider: DialogueProviderKind,
    connection_state: DialogueConnectionState,
    /// Model name when live, the reason for falling back otherwise.
    detail: String,
}

impl DialogueBrokerStatus {
    pub fn live(provider: DialogueProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider,
            connection_state: DialogueConnectionState::Live,
            detail: model.into(),
        }
    }

    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            provider: DialogueProviderKind::Local,
            connection_state: DialogueConnectionState::Fallback,
            detail: reason.into(),
        }
    }

    pub fn provider(&self) -> DialogueProviderKind {
        self.provider
    }

    pub fn connection_state(&self) -> DialogueConnectionState {
        self.connection_state
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn is_live(&self) -> bool {
        self.connection_state == DialogueConnectionState::Live
    }
}

impl fmt::Display for DialogueBrokerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.connection_state {
            DialogueConnectionState::Live => write!(f, "{} {} (live)", self.provider, self.detail),
            DialogueConnectionState::Fallback => write!(f, "{} (fallback)", self.provider),
        }
    }
}
