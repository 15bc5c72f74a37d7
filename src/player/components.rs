//! Components and resources for the player character.
use bevy::{input::keyboard::Key, prelude::*};

/// Longest line the chat box accepts.
pub const MAX_CHAT_LENGTH: usize = 120;

/// Marker for the player's character plus its movement pacing.
#[derive(Component, Debug, Default)]
pub struct Player {
    pub move_cooldown: u32,
}

/// Single-line text entry for talking to villagers.
#[derive(Resource, Debug, Default)]
pub struct ChatBox {
    open: bool,
    text: String,
}

impl ChatBox {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn open(&mut self) {
        self.open = true;
        self.text.clear();
    }

    pub fn close(&mut self) {
        self.open = false;
        self.text.clear();
    }

    /// Appends typed text, stopping at `MAX_CHAT_LENGTH` characters.
    pub fn push_str(&mut self, typed: &str) {
        let room = MAX_CHAT_LENGTH.saturating_sub(self.text.chars().count());
        self.text.extend(typed.chars().filter(|c| !c.is_control()).take(room));
    }

    /// Applies one key press. Returns the submitted line when Enter sends it.
    pub fn handle_key(&mut self, key: &Key) -> Option<String> {
        if !self.open {
            if matches!(key, Key::Enter) {
                self.open();
            }
            return None;
        }

        match key {
            Key::Enter => {
                let line = self.text.trim().to_string();
                self.close();
                (!line.is_empty()).then_some(line)
            }
            Key::Escape => {
                self.close();
                None
            }
            Key::Backspace => {
                self.text.pop();
                None
            }
            Key::Space => {
                self.push_str(" ");
                None
            }
            Key::Character(typed) => {
                self.push_str(typed);
                None
            }
            _ => None,
        }
    }
}

/// Short feedback line shown in the HUD after the player acts.
#[derive(Resource, Debug, Default)]
pub struct PlayerNotice {
    text: Option<String>,
    remaining_secs: f32,
}

impl PlayerNotice {
    pub const DURATION_SECS: f32 = 4.0;

    pub fn show(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
        self.remaining_secs = Self::DURATION_SECS;
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn tick(&mut self, delta_secs: f32) {
        if self.text.is_none() {
            return;
        }
        self.remaining_secs -= delta_secs;
        if self.remaining_secs <= 0.0 {
            self.text = None;
        }
    }
}
