// src/ui/chat_box.rs
//
// Bottom-left chat box showing what the player is typing.

use bevy::prelude::*;

use crate::player::components::ChatBox;

const HINT: &str = "Press Enter to talk to someone nearby";
const CARET: char = '|';
const CARET_BLINK_HZ: f32 = 2.0;
const OPEN_BACKGROUND: Color = Color::srgba(0.08, 0.08, 0.1, 0.95);
const CLOSED_BACKGROUND: Color = Color::srgba(0.08, 0.08, 0.1, 0.5);
const OPEN_TEXT: Color = Color::WHITE;
const HINT_TEXT: Color = Color::srgb(0.7, 0.7, 0.7);

#[derive(Component, Debug)]
pub struct ChatBoxPanel;

#[derive(Component, Debug)]
pub struct ChatBoxText;

/// Line shown in the chat box, with a caret while typing.
pub fn chat_box_line(chat: &ChatBox, caret_visible: bool) -> String {
    if !chat.is_open() {
        return HINT.to_string();
    }
    let caret = if caret_visible { CARET } else { ' ' };
    format!("Say: {}{}", chat.text(), caret)
}

pub fn spawn_chat_box(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(20.0),
                left: Val::Px(20.0),
                width: Val::Px(420.0),
                padding: UiRect::all(Val::Px(10.0)),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(CLOSED_BACKGROUND),
            BorderColor::from(Color::srgb(0.3, 0.3, 0.32)),
            ChatBoxPanel,
            Name::new("Chat Box"),
        ))
        .with_child((
            Text::new(HINT),
            TextFont {
                font_size: 16.0,
                ..default()
            },
            TextColor(HINT_TEXT),
            ChatBoxText,
        ));
}

pub fn update_chat_box(
    time: Res<Time<Real>>,
    chat: Res<ChatBox>,
    mut panels: Query<&mut BackgroundColor, With<ChatBoxPanel>>,
    mut texts: Query<(&mut Text, &mut TextColor), With<ChatBoxText>>,
) {
    let caret_visible = (time.elapsed_secs() * CARET_BLINK_HZ) as u32 % 2 == 0;
    let line = chat_box_line(&chat, caret_visible);

    for (mut text, mut color) in &mut texts {
        if text.0 != line {
            text.0 = line.clone();
        }
        color.0 = if chat.is_open() { OPEN_TEXT } else { HINT_TEXT };
    }
    for mut background in &mut panels {
        background.0 = if chat.is_open() {
            OPEN_BACKGROUND
        } else {
            CLOSED_BACKGROUND
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_hint_until_opened() {
        let mut chat = ChatBox::default();
        assert_eq!(chat_box_line(&chat, true), HINT);

        chat.open();
        chat.push_str("hello");
        assert_eq!(chat_box_line(&chat, true), "Say: hello|");
        assert_eq!(chat_box_line(&chat, false), "Say: hello ");
    }
}
