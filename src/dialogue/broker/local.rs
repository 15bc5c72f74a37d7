//! Offline broker composing lines from the speaker's state and memories.
use crate::{
    dialogue::{
        errors::DialogueError,
        prompt::sanitize_reply,
        types::{DialogueRequest, DialogueRequestId, DialogueResponse, DialogueTopicHint},
    },
    needs::HungerLevel,
};

use super::{validate_request, DialogueBroker, DialogueProviderKind};

const GREETINGS: [&str; 3] = ["Hello", "Morning", "Good to see you"];
const ACKNOWLEDGEMENTS: [&str; 3] = ["Is that so?", "Hm, I hear you.", "Well now."];
const FALLBACK_LINE: &str = "...";

/// Deterministic broker used when no language model is configured.
#[derive(Debug, Default)]
pub struct LocalDialogueBroker;

impl LocalDialogueBroker {
    pub fn new() -> Self {
        Self
    }

    fn compose(&self, request: &DialogueRequest) -> String {
        let context = &request.context;
        let target = context.target_name.as_deref().unwrap_or("friend");
        let seed = stable_seed(&request.prompt) + stable_seed(&context.speaker_name);

        let opener = match request.topic_hint {
            DialogueTopicHint::Greeting | DialogueTopicHint::Chatter => {
                format!("{}, {}!", pick(&GREETINGS, seed), target)
            }
            DialogueTopicHint::Reply => {
                let heard = request.prompt.trim().trim_end_matches(['?', '!', '.']);
                if request.prompt.trim_end().ends_with('?') {
                    format!("You ask about \"{}\"? Let me think.", shorten(heard, 40))
                } else {
                    pick(&ACKNOWLEDGEMENTS, seed).to_string()
                }
            }
        };

        let mut parts = vec![opener];
        parts.push(hunger_remark(context.hunger).to_string());
        if let Some(memory) = context.recent.last() {
            parts.push(format!("Last thing on my mind: {}.", memory.trim_end_matches('.')));
        } else if let Some(persona) = first_sentence(&context.persona) {
            parts.push(format!("You know me: {}", lowercase_first(persona)));
        }

        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl DialogueBroker for LocalDialogueBroker {
    fn provider_kind(&self) -> DialogueProviderKind {
        DialogueProviderKind::Local
    }

    fn process(
        &self,
        request_id: DialogueRequestId,
        request: &DialogueRequest,
    ) -> Result<DialogueResponse, DialogueError> {
        validate_request(request)
            .map_err(|kind| DialogueError::new(request_id, self.provider_kind(), kind))?;

        let line = sanitize_reply(&self.compose(request), &request.context.speaker_name)
            .unwrap_or_else(|| FALLBACK_LINE.to_string());
        Ok(DialogueResponse::new(
            request_id,
            self.provider_kind(),
            request,
            line,
        ))
    }
}

fn hunger_remark(level: HungerLevel) -> &'static str {
    match level {
        HungerLevel::Sated => "",
        HungerLevel::Peckish => "I could do with a bite soon.",
        HungerLevel::Hungry => "My stomach is growling.",
        HungerLevel::Starving => "I'm starving, I need food badly.",
    }
}

fn stable_seed(text: &str) -> usize {
    text.bytes().map(usize::from).sum()
}

fn pick<'a>(options: &[&'a str], seed: usize) -> &'a str {
    options.get(seed % options.len().max(1)).copied().unwrap_or_default()
}

fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head.trim_end())
    }
}

fn first_sentence(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.find(['.', '!', '?']) {
        Some(end) => Some(&trimmed[..=end]),
        None => Some(trimmed),
    }
}

fn lowercase_first(text: &str) -> String {
    let text = text.trim();
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dialogue::{errors::DialogueErrorKind, types::DialogueContext},
        npc::components::CharacterId,
    };

    fn request(prompt: &str, topic: DialogueTopicHint, hunger: HungerLevel) -> DialogueRequest {
        DialogueRequest::new(
            CharacterId::new(1),
            Some(CharacterId::player()),
            prompt,
            topic,
            DialogueContext {
                speaker_name: "Bob".to_string(),
                target_name: Some("Player".to_string()),
                persona: "A cheerful wheat farmer. Loves a chat.".to_string(),
                hunger,
                recent: vec!["I harvested 3 wheat".to_string()],
                ..Default::default()
            },
        )
    }

    #[test]
    fn replies_are_deterministic_and_reflect_state() {
        let broker = LocalDialogueBroker::new();
        let request = request("How are the crops?", DialogueTopicHint::Reply, HungerLevel::Hungry);

        let first = broker.process(DialogueRequestId::new(1), &request).unwrap();
        let second = broker.process(DialogueRequestId::new(2), &request).unwrap();

        assert_eq!(first.content, second.content);
        assert_eq!(first.provider, DialogueProviderKind::Local);
        assert!(first.content.contains("How are the crops"));
        assert!(first.content.contains("growling"));
        assert!(first.content.contains("on my mind: I harvested 3 wheat."));
        assert_eq!(first.topic_hint, DialogueTopicHint::Reply);
    }

    #[test]
    fn greeting_names_the_target_and_uses_persona_without_memories() {
        let broker = LocalDialogueBroker::new();
        let mut greeting = request("Bill is nearby", DialogueTopicHint::Greeting, HungerLevel::Sated);
        greeting.context.recent.clear();

        let response = broker.process(DialogueRequestId::new(1), &greeting).unwrap();
        assert!(response.content.contains("Player!"));
        assert!(response.content.contains("a cheerful wheat farmer."));
    }

    #[test]
    fn rejects_requests_without_persona() {
        let broker = LocalDialogueBroker::new();
        let mut invalid = request("hi", DialogueTopicHint::Reply, HungerLevel::Sated);
        invalid.context.persona = " ".to_string();

        let error = broker.process(DialogueRequestId::new(9), &invalid).unwrap_err();
        assert!(matches!(error.kind, DialogueErrorKind::ContextMissing { .. }));
    }
}
