//! Shared request/response types exposed by the dialogue module.
use std::fmt;

use crate::{needs::HungerLevel, npc::components::CharacterId};

use super::broker::DialogueProviderKind;

/// Identifier assigned to queued dialogue requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogueRequestId(u64);

impl DialogueRequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DialogueRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why the speaker is talking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DialogueTopicHint {
    /// Opening line towards someone nearby.
    Greeting,
    /// Answer to a line the speaker just heard.
    #[default]
    Reply,
    /// Idle small talk between villagers.
    Chatter,
}

impl DialogueTopicHint {
    pub fn label(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Reply => "reply",
            Self::Chatter => "chatter",
        }
    }
}

/// Who is speaking, to whom, the line being answered and what the speaker knows.
#[derive(Debug, Clone)]
pub struct DialogueRequest {
    pub speaker: CharacterId,
    pub target: Option<CharacterId>,
    /// Line the speaker is responding to, or a short description of the situation.
    pub prompt: String,
    pub topic_hint: DialogueTopicHint,
    pub context: DialogueContext,
}

impl DialogueRequest {
    pub fn new(
        speaker: CharacterId,
        target: Option<CharacterId>,
        prompt: impl Into<String>,
        topic_hint: DialogueTopicHint,
        context: DialogueContext,
    ) -> Self {
        Self {
            speaker,
            target,
            prompt: prompt.into(),
            topic_hint,
            context,
        }
    }
}

/// Result returned by dialogue providers.
#[derive(Debug, Clone)]
pub struct DialogueResponse {
    pub request_id: DialogueRequestId,
    pub provider: DialogueProviderKind,
    pub speaker: CharacterId,
    pub target: Option<CharacterId>,
    pub topic_hint: DialogueTopicHint,
    pub content: String,
}

impl DialogueResponse {
    pub fn new(
        request_id: DialogueRequestId,
        provider: DialogueProviderKind,
        request: &DialogueRequest,
        content: impl Into<String>,
    ) -> Self {
        Self {
            request_id,
            provider,
            speaker: request.speaker,
            target: request.target,
            topic_hint: request.topic_hint,
            content: content.into(),
        }
    }
}

/// Everything a provider may draw on when voicing the speaker.
#[derive(Debug, Clone, Default)]
pub struct DialogueContext {
    pub speaker_name: String,
    pub target_name: Option<String>,
    pub persona: String,
    pub hunger: HungerLevel,
    /// One or two sentences on time, hunger, belongings and current activity.
    pub state_summary: String,
    pub long_term: Vec<String>,
    pub recent: Vec<String>,
}
