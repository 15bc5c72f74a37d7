// src/ui/speech_bubble/components.rs
//
// Speech carried by characters and the world-space label that shows it.

use bevy::prelude::*;

/// What a character is currently saying out loud.
///
/// Lines age while displayed and disappear once they outlive
/// `SpeechBubbleSettings::lifetime_seconds`.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Speech {
    text: Option<String>,
    age_secs: f32,
}

impl Speech {
    pub fn saying(text: impl Into<String>) -> Self {
        let mut speech = Self::default();
        speech.say(text);
        speech
    }

    /// Replaces the current line and restarts its lifetime. Blank text clears it.
    pub fn say(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.text = (!text.trim().is_empty()).then_some(text);
        self.age_secs = 0.0;
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Ages the current line, dropping it once `lifetime` has passed.
    pub fn advance(&mut self, delta_secs: f32, lifetime: f32) {
        if self.text.is_none() {
            return;
        }
        self.age_secs += delta_secs;
        if self.age_secs >= lifetime {
            self.text = None;
            self.age_secs = 0.0;
        }
    }

    /// 1.0 while fresh, ramping to 0.0 during the final `fade` seconds.
    pub fn fade_alpha(&self, lifetime: f32, fade: f32) -> f32 {
        let remaining = lifetime - self.age_secs;
        if fade > 0.0 && remaining < fade {
            (remaining / fade).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Marker for the `Text2d` child drawn above a speaking character.
#[derive(Component, Debug)]
pub struct SpeechLabel;

/// Resource containing settings for speech bubble behavior.
#[derive(Resource, Debug)]
pub struct SpeechBubbleSettings {
    /// How long a line stays visible (seconds).
    pub lifetime_seconds: f32,

    /// Duration of fade-out animation (seconds).
    pub fade_seconds: f32,

    /// Height of the label above the character, in tiles.
    pub vertical_offset_tiles: f32,

    pub font_size: f32,

    /// Wrap width of the label (world units).
    pub max_width: f32,
}

impl Default for SpeechBubbleSettings {
    fn default() -> Self {
        Self {
            lifetime_seconds: 10.0,
            fade_seconds: 2.0,
            vertical_offset_tiles: 0.9,
            font_size: 13.0,
            max_width: 180.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_fade_then_expire() {
        let mut speech = Speech::saying("Hi im bob");
        assert_eq!(speech.text(), Some("Hi im bob"));
        assert_eq!(speech.fade_alpha(10.0, 2.0), 1.0);

        speech.advance(9.0, 10.0);
        assert!((speech.fade_alpha(10.0, 2.0) - 0.5).abs() < 1e-5);

        speech.advance(1.0, 10.0);
        assert_eq!(speech.text(), None);
    }

    #[test]
    fn saying_again_restarts_the_line() {
        let mut speech = Speech::saying("first");
        speech.advance(5.0, 10.0);
        speech.say("second");
        speech.advance(5.0, 10.0);
        assert_eq!(speech.text(), Some("second"));

        speech.say("   ");
        assert_eq!(speech.text(), None);
    }
}
