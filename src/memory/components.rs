//! Short- and long-term memory carried by every character.
use std::collections::VecDeque;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::MemoryConfig;

const MAX_SUMMARY_CHARS: usize = 240;
const MAX_OBSERVATION_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemoryKind {
    Heard { from: String },
    Said { to: String },
    Observed,
}

/// One thing a character experienced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub day: u64,
    /// Time of day as "HH:MM".
    pub clock: String,
    #[serde(flatten)]
    pub kind: MemoryKind,
    pub text: String,
}

impl MemoryEntry {
    pub fn new(day: u64, clock: impl Into<String>, kind: MemoryKind, text: impl Into<String>) -> Self {
        Self {
            day,
            clock: clock.into(),
            kind,
            text: text.into(),
        }
    }

    pub fn describe(&self) -> String {
        match &self.kind {
            MemoryKind::Heard { from } => format!("{} said: \"{}\"", from, self.text),
            MemoryKind::Said { to } => format!("I told {}: \"{}\"", to, self.text),
            MemoryKind::Observed => self.text.clone(),
        }
    }

    pub fn prompt_line(&self) -> String {
        format!("Day {}, {}: {}", self.day, self.clock, self.describe())
    }
}

/// Summary of several consolidated short-term entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongTermMemory {
    pub day: u64,
    pub summary: String,
}

#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    short_term: VecDeque<MemoryEntry>,
    long_term: VecDeque<LongTermMemory>,
}

impl Memory {
    /// Appends an entry, folding the oldest entries into long-term memory when full.
    pub fn remember(&mut self, entry: MemoryEntry, config: &MemoryConfig) {
        self.short_term.push_back(entry);

        while self.short_term.len() > config.short_term_capacity {
            let batch_len = config.consolidation_batch.clamp(1, self.short_term.len());
            let batch: Vec<MemoryEntry> = self.short_term.drain(..batch_len).collect();
            if let Some(summary) = consolidate(&batch) {
                self.long_term.push_back(summary);
            }
        }

        while self.long_term.len() > config.long_term_capacity {
            self.long_term.pop_front();
        }
    }

    /// Up to `count` most recent entries, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &MemoryEntry> {
        let skip = self.short_term.len().saturating_sub(count);
        self.short_term.iter().skip(skip)
    }

    pub fn long_term(&self) -> impl Iterator<Item = &LongTermMemory> {
        self.long_term.iter()
    }

    pub fn short_term_len(&self) -> usize {
        self.short_term.len()
    }

    pub fn long_term_len(&self) -> usize {
        self.long_term.len()
    }
}

/// Folds entries into a one-line summary: who was talked to, then what happened.
pub fn consolidate(entries: &[MemoryEntry]) -> Option<LongTermMemory> {
    let first = entries.first()?;
    let last_day = entries.last().map(|entry| entry.day).unwrap_or(first.day);

    let mut partners: Vec<&str> = Vec::new();
    let mut observations: Vec<String> = Vec::new();
    for entry in entries {
        match &entry.kind {
            MemoryKind::Heard { from: name } | MemoryKind::Said { to: name } => {
                if !partners.contains(&name.as_str()) {
                    partners.push(name.as_str());
                }
            }
            MemoryKind::Observed => {
                let text = truncate(entry.text.trim(), MAX_OBSERVATION_CHARS);
                if observations.last() != Some(&text) {
                    observations.push(text);
                }
            }
        }
    }

    let mut parts = Vec::new();
    if !partners.is_empty() {
        parts.push(format!("talked with {}", join_names(&partners)));
    }
    parts.extend(observations);

    let days = if last_day > first.day {
        format!("Days {}-{}", first.day, last_day)
    } else {
        format!("Day {}", first.day)
    };
    let summary = truncate(&format!("{}: {}", days, parts.join("; ")), MAX_SUMMARY_CHARS);

    Some(LongTermMemory {
        day: first.day,
        summary,
    })
}

fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", head.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MemoryConfig {
        MemoryConfig {
            short_term_capacity: 4,
            consolidation_batch: 3,
            long_term_capacity: 2,
            prompt_recent: 2,
            prompt_long_term: 2,
        }
    }

    fn heard(day: u64, from: &str, text: &str) -> MemoryEntry {
        MemoryEntry::new(day, "08:00", MemoryKind::Heard { from: from.to_string() }, text)
    }

    fn observed(day: u64, text: &str) -> MemoryEntry {
        MemoryEntry::new(day, "09:00", MemoryKind::Observed, text)
    }

    #[test]
    fn overflow_folds_oldest_batch_into_long_term() {
        let config = config();
        let mut memory = Memory::default();
        memory.remember(heard(1, "Bob", "Morning!"), &config);
        memory.remember(
            MemoryEntry::new(1, "08:01", MemoryKind::Said { to: "Bill".into() }, "Hi"),
            &config,
        );
        memory.remember(observed(1, "I harvested 3 wheat"), &config);
        memory.remember(observed(2, "I ate a carrot"), &config);
        assert_eq!(memory.long_term_len(), 0);

        memory.remember(observed(2, "I tilled the soil"), &config);

        assert_eq!(memory.short_term_len(), 2);
        let summaries: Vec<_> = memory.long_term().map(|m| m.summary.as_str()).collect();
        assert_eq!(
            summaries,
            vec!["Day 1: talked with Bob and Bill; I harvested 3 wheat"]
        );
        let recent: Vec<_> = memory.recent(5).map(|entry| entry.text.as_str()).collect();
        assert_eq!(recent, vec!["I ate a carrot", "I tilled the soil"]);
    }

    #[test]
    fn long_term_is_capped_oldest_first() {
        let config = config();
        let mut memory = Memory::default();
        for day in 1..=20 {
            memory.remember(observed(day, &format!("event {}", day)), &config);
        }
        assert_eq!(memory.long_term_len(), config.long_term_capacity);
        assert!(memory.short_term_len() <= config.short_term_capacity);
        let first = memory.long_term().next().unwrap();
        assert!(first.day > 1);
    }

    #[test]
    fn consolidation_spans_days_and_dedupes() {
        let summary = consolidate(&[
            observed(3, "I ate a carrot"),
            observed(3, "I ate a carrot"),
            heard(4, "Player", "hello"),
        ])
        .unwrap();
        assert_eq!(summary.summary, "Days 3-4: talked with Player; I ate a carrot");
        assert_eq!(consolidate(&[]), None);
    }

    #[test]
    fn entries_describe_themselves_for_prompts() {
        let entry = heard(2, "Bob", "Lovely day");
        assert_eq!(entry.prompt_line(), "Day 2, 08:00: Bob said: \"Lovely day\"");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["kind"], "heard");
        assert_eq!(value["from"], "Bob");
    }
}
