use reqwest::{
    blocking::Client,
    header::{HeaderMap, RETRY_AFTER},
    StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::dialogue::{
    errors::{DialogueError, DialogueErrorKind, MAX_RETRY_AFTER_SECS},
    prompt::{build_user_message, sanitize_reply, SYSTEM_PROMPT},
    types::{DialogueRequest, DialogueRequestId, DialogueResponse},
};

use super::{
    config::{OpenAiConfig, OpenAiConfigError},
    validate_request, DialogueBroker, DialogueProviderKind,
};

const DEFAULT_RATE_LIMIT_BACKOFF: f32 = 10.0;

/// Dialogue broker backed by the OpenAI chat completions endpoint.
///
/// `process` blocks on the HTTP call and must run off the main thread.
pub struct OpenAiDialogueBroker {
    http: Client,
    config: OpenAiConfig,
}

impl OpenAiDialogueBroker {
    pub fn new(config: OpenAiConfig) -> Result<Self, OpenAiConfigError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| OpenAiConfigError::ClientBuild(err.to_string()))?;

        Ok(Self { http, config })
    }

    fn send(
        &self,
        request_id: DialogueRequestId,
        request: &DialogueRequest,
    ) -> Result<DialogueResponse, DialogueErrorKind> {
        let payload = ChatCompletionRequest {
            model: self.config.model.as_str(),
            messages: build_messages(request),
            max_tokens: Some(self.config.max_output_tokens.into()),
            temperature: self.config.temperature,
        };

        let response = self
            .http
            .post(self.config.chat_url())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .map_err(|err| DialogueErrorKind::provider_failure(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after =
                parse_retry_after(response.headers()).unwrap_or(DEFAULT_RATE_LIMIT_BACKOFF);
            return Err(DialogueErrorKind::rate_limited(retry_after));
        }

        if !status.is_success() {
            return Err(match response.json::<OpenAiErrorResponse>() {
                Ok(body) => DialogueErrorKind::provider_failure(format!(
                    "{} (type: {}, code: {:?})",
                    body.error.message, body.error.error_type, body.error.code
                )),
                Err(_) => DialogueErrorKind::provider_failure(format!(
                    "HTTP {} from OpenAI",
                    status
                )),
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .map_err(|err| DialogueErrorKind::provider_failure(err.to_string()))?;

        let content = first_completion(completion, &request.context.speaker_name).ok_or_else(|| {
            DialogueErrorKind::provider_failure(
                "OpenAI returned an empty completion for dialogue request",
            )
        })?;

        Ok(DialogueResponse::new(
            request_id,
            DialogueProviderKind::OpenAi,
            request,
            content,
        ))
    }
}

impl DialogueBroker for OpenAiDialogueBroker {
    fn provider_kind(&self) -> DialogueProviderKind {
        DialogueProviderKind::OpenAi
    }

    fn process(
        &self,
        request_id: DialogueRequestId,
        request: &DialogueRequest,
    ) -> Result<DialogueResponse, DialogueError> {
        validate_request(request)
            .and_then(|()| self.send(request_id, request))
            .map_err(|kind| DialogueError::new(request_id, self.provider_kind(), kind))
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<f32> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|text| text.trim().parse::<f32>().ok())
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
        .map(|seconds| seconds.min(MAX_RETRY_AFTER_SECS))
}

fn build_messages(request: &DialogueRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system",
            content: SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
            role: "user",
            content: build_user_message(request),
        },
    ]
}

fn first_completion(completion: ChatCompletionResponse, speaker_name: &str) -> Option<String> {
    completion
        .choices
        .into_iter()
        .filter_map(|choice| choice.message.content)
        .find_map(|text| sanitize_reply(&text, speaker_name))
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(rename = "max_tokens")]
    max_tokens: Option<u32>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type", default)]
    error_type: String,
    code: Option<String>,
}
