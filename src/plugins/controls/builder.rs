//! Builder pattern utilities for controls UI
//!
//! [`ControlsCommandsExt`] spawns a styled button for any [`ButtonWithLabel`]
//! marker, so the panel only lists which buttons it wants.

use crate::plugins::controls::constants::*;
use crate::prelude::*;
use bevy::ecs::hierarchy::ChildSpawnerCommands;

pub trait ControlsCommandsExt {
    fn spawn_control_button<T: ButtonWithLabel>(&mut self, font_size: f32) -> Entity;
}

impl ControlsCommandsExt for ChildSpawnerCommands<'_> {
    fn spawn_control_button<T: ButtonWithLabel>(&mut self, font_size: f32) -> Entity {
        self.spawn((
            Button,
            Node {
                width: Val::Px(BUTTON_WIDTH_PX),
                height: Val::Auto,
                padding: UiRect::all(Val::Px(BUTTON_PADDING_PX)),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::FlexStart,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BorderRadius::all(Val::Px(BUTTON_BORDER_RADIUS_PX)),
            BackgroundColor(BUTTON_COLOR_NORMAL),
            T::marker(),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(T::label()),
                TextColor(Color::WHITE),
                TextFont {
                    font_size,
                    ..default()
                },
            ));
        })
        .id()
    }
}

pub trait ButtonWithLabel: Component + 'static {
    /// The command this button triggers
    fn command() -> SimulationCommand;

    /// The marker component instance
    fn marker() -> Self;

    /// The base text for the button (without shortcut)
    fn base_text() -> &'static str;

    /// The keyboard shortcut for this button, if it has one
    fn shortcut() -> Option<&'static str> {
        None
    }

    /// The base text with shortcut appended
    fn label() -> String {
        with_shortcut(Self::base_text(), Self::shortcut())
    }
}

pub fn with_shortcut(text: &str, shortcut: Option<&str>) -> String {
    match shortcut {
        Some(shortcut) => format!("{text} ({shortcut})"),
        None => text.to_string(),
    }
}

/// Rewrites the first text child of every button carrying `T`.
pub fn set_button_text<T: Component>(
    buttons: &Query<&Children, With<T>>,
    texts: &mut Query<&mut Text>,
    label: &str,
) {
    for children in buttons.iter() {
        for child in children {
            if let Ok(mut text) = texts.get_mut(*child) {
                text.0 = label.to_string();
                break;
            }
        }
    }
}
