//! Controls plugin - Self-contained plugin pattern
//!
//! Keyboard shortcuts, held camera keys and panel buttons all end up as
//! [`SimulationCommand`] events written during [`SimulationSet::Input`].
//! Quitting is the one command handled here rather than by the controller.

use crate::config::CameraConfig;
use crate::plugins::simulation::SimulationSet;
use crate::prelude::*;
use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::window::SystemCursorIcon;
use bevy::winit::cursor::CursorIcon;

pub mod builder;
pub mod buttons;
pub mod constants;

pub use builder::{ButtonWithLabel, ControlsCommandsExt};
use buttons::*;
use constants::*;

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                keyboard_input_handler,
                camera_input_handler,
                button_interaction_handler::<PauseButton>,
                button_interaction_handler::<TrailsToggleButton>,
                button_interaction_handler::<RestartButton>,
                button_interaction_handler::<ClearTrailsButton>,
                button_interaction_handler::<SlowerButton>,
                button_interaction_handler::<FasterButton>,
                button_interaction_handler::<DayTimestepButton>,
                button_interaction_handler::<ZoomInButton>,
                button_interaction_handler::<ZoomOutButton>,
                button_interaction_handler::<ResetZoomButton>,
                button_interaction_handler::<QuitButton>,
                button_interaction_handler::<DeleteSunButton>,
                button_interaction_handler::<DeleteRandomButton>,
                button_interaction_handler::<PlutoMassButton>,
                button_interaction_handler::<SolarMassesButton>,
                button_interaction_handler::<ZeroVelocitiesButton>,
            )
                .in_set(SimulationSet::Input),
        );

        app.add_systems(Update, quit_on_command.in_set(SimulationSet::Commands));

        app.add_systems(
            Update,
            (
                pause::sync_pause_button_text,
                trails::sync_trails_button_text,
            )
                .in_set(SimulationSet::UI),
        );
    }
}

/// Maps a pressed logical key to the command it triggers.
pub fn command_for_key(key: &Key) -> Option<SimulationCommand> {
    match key {
        Key::Space => Some(SimulationCommand::TogglePause),
        Key::Escape => Some(SimulationCommand::Quit),
        Key::Character(c) => match c.to_lowercase().as_str() {
            "c" => Some(SimulationCommand::TogglePanel),
            "n" => Some(SimulationCommand::Restart),
            "t" => Some(SimulationCommand::ToggleTrails),
            "x" => Some(SimulationCommand::ClearTrails),
            "[" => Some(SimulationCommand::ScaleTimestep(0.5)),
            "]" => Some(SimulationCommand::ScaleTimestep(2.0)),
            "q" => Some(SimulationCommand::Quit),
            _ => None,
        },
        _ => None,
    }
}

fn keyboard_input_handler(
    mut keyboard_events: EventReader<KeyboardInput>,
    mut commands: EventWriter<SimulationCommand>,
) {
    for event in keyboard_events.read() {
        if event.state != ButtonState::Pressed || event.repeat {
            continue;
        }

        if let Some(command) = command_for_key(&event.logical_key) {
            commands.write(command);
        }
    }
}

/// Camera pan (pixels) and zoom change for the held keys over `dt` seconds.
///
/// Moving the view right shifts the world left, so D pans negative x.
pub fn camera_motion(keys: &ButtonInput<KeyCode>, dt: f32, config: &CameraConfig) -> (Vec2, f32) {
    let mut direction = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyD) {
        direction.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        direction.x += 1.0;
    }
    if keys.pressed(KeyCode::KeyW) {
        direction.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        direction.y += 1.0;
    }

    let mut zoom = 0.0;
    if keys.pressed(KeyCode::Minus) {
        zoom += 1.0;
    }
    if keys.pressed(KeyCode::Equal) {
        zoom -= 1.0;
    }

    let multiplier = if keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
        config.fast_multiplier
    } else {
        1.0
    };

    (
        direction * config.pan_speed * multiplier * dt,
        zoom * config.zoom_speed * multiplier * dt,
    )
}

fn camera_input_handler(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    controller: Res<SimulationController>,
    mut commands: EventWriter<SimulationCommand>,
) {
    let (pan, zoom) = camera_motion(&keys, time.delta_secs(), controller.camera_config());
    if pan != Vec2::ZERO {
        commands.write(SimulationCommand::Pan(pan));
    }
    if zoom != 0.0 {
        commands.write(SimulationCommand::Zoom(zoom));
    }
}

#[allow(clippy::type_complexity)]
fn button_interaction_handler<T: ButtonWithLabel>(
    mut commands: Commands,
    windows: Query<Entity, With<Window>>,
    mut interaction_query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<T>),
    >,
    mut command_writer: EventWriter<SimulationCommand>,
) {
    for (interaction, mut color) in &mut interaction_query {
        let cursor = match *interaction {
            Interaction::Pressed => {
                *color = BackgroundColor(BUTTON_COLOR_PRESSED);
                command_writer.write(T::command());
                SystemCursorIcon::Pointer
            }
            Interaction::Hovered => {
                *color = BackgroundColor(BUTTON_COLOR_HOVERED);
                SystemCursorIcon::Pointer
            }
            Interaction::None => {
                *color = BackgroundColor(BUTTON_COLOR_NORMAL);
                SystemCursorIcon::Default
            }
        };

        for window in &windows {
            commands
                .entity(window)
                .insert(CursorIcon::System(cursor));
        }
    }
}

fn quit_on_command(
    mut commands: EventReader<SimulationCommand>,
    mut exit: EventWriter<AppExit>,
) {
    if commands
        .read()
        .any(|command| *command == SimulationCommand::Quit)
    {
        info!("Quit requested");
        exit.write_default();
    }
}
