//! Prompt assembly and reply clean-up shared by the dialogue brokers.
use super::types::{DialogueRequest, DialogueTopicHint};

pub const SYSTEM_PROMPT: &str = "You are a villager in a small farming village in a top-down life simulation. \
Speak only as your character, in one or two short sentences of plain spoken dialogue. \
Draw only on the persona, state and memories you are given; if you do not know something, say so. \
Do not narrate actions, use emojis, or prefix the line with your name.";

/// Longest line a character will say, in characters.
pub const MAX_REPLY_CHARS: usize = 180;

const FALLBACK_TARGET_LABEL: &str = "nobody in particular";
const NO_MEMORIES: &str = "- (nothing yet)";

/// Builds the user turn describing the speaker, their memories and what to answer.
pub fn build_user_message(request: &DialogueRequest) -> String {
    let context = &request.context;
    let target = context
        .target_name
        .as_deref()
        .unwrap_or(FALLBACK_TARGET_LABEL);

    let mut sections = vec![
        format!("You are {}.", context.speaker_name.trim()),
        format!("Persona: {}", context.persona.trim()),
        format!("Talking to: {}", target),
    ];

    if !context.state_summary.trim().is_empty() {
        sections.push(format!("Current state: {}", context.state_summary.trim()));
    }

    sections.push(format!(
        "Long-term memories:\n{}",
        bullet_list(&context.long_term)
    ));
    sections.push(format!("Recent memories:\n{}", bullet_list(&context.recent)));

    let prompt = request.prompt.trim();
    let instruction = match request.topic_hint {
        DialogueTopicHint::Reply => {
            sections.push(format!("{} just said to you: \"{}\"", target, prompt));
            format!("Reply to {} in character.", target)
        }
        DialogueTopicHint::Greeting => {
            sections.push(format!("Situation: {}", prompt));
            format!("Greet {} and mention something on your mind.", target)
        }
        DialogueTopicHint::Chatter => {
            sections.push(format!("Situation: {}", prompt));
            format!("Make small talk with {} about village life.", target)
        }
    };
    sections.push(instruction);

    sections.join("\n")
}

fn bullet_list(entries: &[String]) -> String {
    if entries.is_empty() {
        return NO_MEMORIES.to_string();
    }
    entries
        .iter()
        .map(|entry| format!("- {}", entry.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalises a provider reply into a single speakable line.
///
/// Strips surrounding quotes and a leading `Name:` tag, collapses whitespace
/// and caps the length. Returns `None` when nothing speakable remains.
pub fn sanitize_reply(raw: &str, speaker_name: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut text = collapsed.as_str();

    let name = speaker_name.trim();
    if !name.is_empty() {
        if let Some(rest) = strip_prefix_ignore_case(text, name) {
            if let Some(after_colon) = rest.trim_start().strip_prefix(':') {
                text = after_colon.trim_start();
            }
        }
    }

    text = strip_wrapping_quotes(text.trim());
    if text.is_empty() {
        return None;
    }

    if text.chars().count() <= MAX_REPLY_CHARS {
        return Some(text.to_string());
    }

    let mut truncated: String = text.chars().take(MAX_REPLY_CHARS - 3).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push_str("...");
    Some(truncated)
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}

fn strip_wrapping_quotes(text: &str) -> &str {
    const PAIRS: [(char, char); 3] = [('"', '"'), ('\'', '\''), ('\u{201c}', '\u{201d}')];
    for (open, close) in PAIRS {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dialogue::types::DialogueContext,
        npc::components::CharacterId,
    };

    fn request(topic: DialogueTopicHint) -> DialogueRequest {
        DialogueRequest::new(
            CharacterId::new(1),
            Some(CharacterId::player()),
            "Nice weather today",
            topic,
            DialogueContext {
                speaker_name: "Bob".to_string(),
                target_name: Some("Player".to_string()),
                persona: "A cheerful wheat farmer.".to_string(),
                state_summary: "It is day 2, 08:00. You feel peckish.".to_string(),
                long_term: vec!["Day 1: harvested wheat".to_string()],
                recent: Vec::new(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn user_message_lists_persona_state_and_memories() {
        let message = build_user_message(&request(DialogueTopicHint::Reply));
        assert!(message.starts_with("You are Bob."));
        assert!(message.contains("Persona: A cheerful wheat farmer."));
        assert!(message.contains("Current state: It is day 2"));
        assert!(message.contains("- Day 1: harvested wheat"));
        assert!(message.contains("Recent memories:\n- (nothing yet)"));
        assert!(message.contains("Player just said to you: \"Nice weather today\""));
        assert!(message.ends_with("Reply to Player in character."));
    }

    #[test]
    fn greeting_uses_situation_instead_of_quote() {
        let message = build_user_message(&request(DialogueTopicHint::Greeting));
        assert!(message.contains("Situation: Nice weather today"));
        assert!(message.contains("Greet Player"));
    }

    #[test]
    fn sanitize_strips_name_tag_quotes_and_whitespace() {
        assert_eq!(
            sanitize_reply("  bob:  \"Morning,\n  friend!\" ", "Bob").as_deref(),
            Some("Morning, friend!")
        );
        assert_eq!(
            sanitize_reply("\u{201c}Hello there\u{201d}", "Bill").as_deref(),
            Some("Hello there")
        );
        assert_eq!(sanitize_reply("Bob: \"\"", "Bob"), None);
        assert_eq!(sanitize_reply("   ", "Bob"), None);
    }

    #[test]
    fn sanitize_caps_length() {
        let long = "word ".repeat(100);
        let reply = sanitize_reply(&long, "Bob").unwrap();
        assert!(reply.chars().count() <= MAX_REPLY_CHARS);
        assert!(reply.ends_with("..."));
    }
}
