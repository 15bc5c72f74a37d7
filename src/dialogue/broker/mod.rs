//! Dialogue broker trait, provider selection and the shared request checks.

pub mod config;
pub mod local;
pub mod openai;

pub use local::LocalDialogueBroker;
pub use openai::OpenAiDialogueBroker;

use std::fmt;

use bevy::log::{info, warn};

use super::{
    errors::{DialogueContextSource, DialogueError, DialogueErrorKind},
    status::DialogueBrokerStatus,
    types::{DialogueRequest, DialogueRequestId, DialogueResponse},
};
use config::{OpenAiConfig, OpenAiConfigError};

const EMPTY_PROMPT_ERROR: &str = "prompt cannot be empty";

/// Dialogue provider flavours we can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogueProviderKind {
    OpenAi,
    Local,
}

impl fmt::Display for DialogueProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::OpenAi => "openai",
            Self::Local => "local",
        };
        write!(f, "{}", label)
    }
}

/// Contract every dialogue backend must satisfy.
pub trait DialogueBroker: Send + Sync {
    fn provider_kind(&self) -> DialogueProviderKind;

    fn process(
        &self,
        request_id: DialogueRequestId,
        request: &DialogueRequest,
    ) -> Result<DialogueResponse, DialogueError>;
}

/// Rejects requests no provider could voice.
pub fn validate_request(request: &DialogueRequest) -> Result<(), DialogueErrorKind> {
    if request.prompt.trim().is_empty() {
        return Err(DialogueErrorKind::provider_failure(EMPTY_PROMPT_ERROR));
    }
    if request.context.speaker_name.trim().is_empty() {
        return Err(DialogueErrorKind::context_missing(
            DialogueContextSource::SpeakerName,
        ));
    }
    if request.context.persona.trim().is_empty() {
        return Err(DialogueErrorKind::context_missing(
            DialogueContextSource::Persona,
        ));
    }
    Ok(())
}

/// Picks the OpenAI broker when it is configured, the local one otherwise.
pub fn select_broker() -> (Box<dyn DialogueBroker>, DialogueBrokerStatus) {
    select_broker_with(OpenAiConfig::from_env())
}

fn select_broker_with(
    config: Result<OpenAiConfig, OpenAiConfigError>,
) -> (Box<dyn DialogueBroker>, DialogueBrokerStatus) {
    let config = match config {
        Ok(config) => config,
        Err(err) => return local_fallback(&err),
    };

    let model = config.model.clone();
    match OpenAiDialogueBroker::new(config) {
        Ok(broker) => {
            info!("Dialogue using OpenAI model {}", model);
            (
                Box::new(broker),
                DialogueBrokerStatus::live(DialogueProviderKind::OpenAi, model),
            )
        }
        Err(err) => local_fallback(&err),
    }
}

fn local_fallback(reason: &dyn fmt::Display) -> (Box<dyn DialogueBroker>, DialogueBrokerStatus) {
    warn!("Dialogue falling back to local responses ({}).", reason);
    (
        Box::new(LocalDialogueBroker::new()),
        DialogueBrokerStatus::fallback(reason.to_string()),
    )
}
