// src/ui/dialogue_panel/components.rs
//
// Components and resources for the dialogue panel.

use bevy::prelude::*;

use crate::dialogue::types::DialogueRequestId;

/// Root node of the bottom-right dialogue panel.
#[derive(Component, Debug)]
pub struct DialoguePanel;

/// Text node showing "Speaker → Target".
#[derive(Component, Debug)]
pub struct DialoguePanelHeader;

/// Text node showing the spoken line.
#[derive(Component, Debug)]
pub struct DialoguePanelBody;

/// Which line the panel shows and how long it has been up.
#[derive(Resource, Debug, Default)]
pub struct DialoguePanelState {
    pub shown: Option<DialogueRequestId>,
    pub age_secs: f32,
}

impl DialoguePanelState {
    /// Calculate the alpha fade value (1.0 = fully visible, 0.0 = transparent).
    ///
    /// Fades out during the final `fade_seconds` of `lifetime_seconds`.
    pub fn fade_alpha(&self, settings: &DialoguePanelSettings) -> f32 {
        let remaining = settings.lifetime_seconds - self.age_secs;
        if remaining <= 0.0 {
            0.0
        } else if remaining < settings.fade_seconds {
            remaining / settings.fade_seconds
        } else {
            1.0
        }
    }
}

/// Resource containing settings for dialogue panel behavior.
#[derive(Resource, Debug)]
pub struct DialoguePanelSettings {
    /// How long a line remains visible (seconds).
    pub lifetime_seconds: f32,

    /// Duration of fade-out animation (seconds).
    pub fade_seconds: f32,

    /// Panel width (pixels).
    pub panel_width: f32,

    /// Padding inside panel (pixels).
    pub padding: f32,

    /// Border width (pixels).
    pub border_width: f32,

    /// Offset from bottom edge of screen (pixels).
    pub bottom_offset: f32,

    /// Offset from right edge of screen (pixels).
    pub right_offset: f32,

    /// Font size for the speaker line (points).
    pub name_font_size: f32,

    /// Font size for dialogue text (points).
    pub text_font_size: f32,
}

impl Default for DialoguePanelSettings {
    fn default() -> Self {
        Self {
            lifetime_seconds: 12.0,
            fade_seconds: 2.0,
            panel_width: 350.0,
            padding: 12.0,
            border_width: 2.0,
            bottom_offset: 20.0,
            right_offset: 20.0,
            name_font_size: 18.0,
            text_font_size: 16.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_fades_at_end_of_lifetime() {
        let settings = DialoguePanelSettings::default();
        let mut state = DialoguePanelState::default();
        assert_eq!(state.fade_alpha(&settings), 1.0);

        state.age_secs = settings.lifetime_seconds - settings.fade_seconds / 2.0;
        assert!((state.fade_alpha(&settings) - 0.5).abs() < 1e-5);

        state.age_secs = settings.lifetime_seconds + 1.0;
        assert_eq!(state.fade_alpha(&settings), 0.0);
    }
}
