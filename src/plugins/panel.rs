//! Settings panel
//!
//! A column of text and buttons on the left edge of the window. It starts
//! hidden unless `ui.panel_visible` is set and `C` toggles it. The text blocks
//! are rebuilt every frame from [`SimulationController`] state; the buttons
//! only emit [`SimulationCommand`]s.

use crate::components::Body;
use crate::config::UiConfig;
use crate::physics::math::Scalar;
use crate::plugins::controls::ControlsCommandsExt;
use crate::plugins::controls::buttons::*;
use crate::plugins::controls::constants::BUTTON_GAP_PX;
use crate::plugins::simulation::SimulationSet;
use crate::prelude::*;
use std::fmt::Write;

const SECONDS_PER_DAY: Scalar = 86400.0;

const INSTRUCTIONS: &str = "\
- Use (WASD) to move the camera around
- Press (-) and (=) to zoom out and in
- Hold down Shift to increase speed and zoom
- Press (C) to show or hide this panel
- Planet sizes are not proportional to real life";

#[derive(Component)]
pub struct PanelRoot;

#[derive(Component)]
struct BodyTableText;

#[derive(Component)]
struct OptionsText;

#[derive(Component)]
struct ClockText;

pub struct PanelPlugin;

impl Plugin for PanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_panel);
        app.add_systems(
            Update,
            (toggle_panel_visibility, update_panel_text)
                .chain()
                .in_set(SimulationSet::UI),
        );
    }
}

/// One row per body: name, mass, distance from the reference and velocity.
///
/// Distances are printed as last stored, so they go stale while paused.
pub fn format_body_table(bodies: &[Body], astronomical_unit: Scalar) -> String {
    let mut table = format!(
        "{:<10} {:>11} {:>14} {}\n",
        "Body", "Mass (kg)", "Distance (AU)", "Velocity (m/s)"
    );
    for body in bodies {
        let _ = writeln!(
            table,
            "{:<10} {:>11.3e} {:>14.3} x:{:.2}, y:{:.2}",
            body.name,
            body.mass,
            body.distance_from_reference / astronomical_unit,
            body.velocity.x,
            body.velocity.y
        );
    }
    if bodies.is_empty() {
        table.push_str("(no bodies)\n");
    }
    table
}

/// Zoom, timestep, trails and run state.
pub fn format_options(controller: &SimulationController) -> String {
    let settings = controller.settings();
    format!(
        "Options\nzoom: {:.2}\ntime step: {:.0} s\ntrails: {}\nstate: {:?}\nintegrator: {}",
        settings.zoom(),
        settings.timestep,
        if settings.trails_enabled { "on" } else { "off" },
        controller.state(),
        controller.integrator_name(),
    )
}

pub fn format_clock(controller: &SimulationController) -> String {
    format!(
        "Elapsed: {:.1} s\nSimulated: {:.1} days\nBuilt {}",
        controller.elapsed_seconds(),
        controller.simulated_seconds() / SECONDS_PER_DAY,
        env!("BUILD_DATE"),
    )
}

fn setup_panel(mut commands: Commands, config: Res<SimulationConfig>) {
    let UiConfig {
        panel_visible,
        panel_width,
        panel_margin,
        font_size,
    } = config.ui;
    let text_font = TextFont {
        font_size,
        ..default()
    };
    let title_font = TextFont {
        font_size: font_size * 1.5,
        ..default()
    };

    commands
        .spawn((
            PanelRoot,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(panel_margin),
                left: Val::Px(panel_margin),
                width: Val::Px(panel_width),
                padding: UiRect::all(Val::Px(panel_margin)),
                display: if panel_visible {
                    Display::Flex
                } else {
                    Display::None
                },
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::FlexStart,
                row_gap: Val::Px(BUTTON_GAP_PX),
                ..default()
            },
            BorderRadius::all(Val::Px(5.0)),
            BackgroundColor(Color::srgba(0.2, 0.2, 0.2, 0.7)),
        ))
        .with_children(|parent| {
            parent.spawn((Text::new("Solar System Simulation"), title_font));
            parent.spawn((Text::new(INSTRUCTIONS), text_font.clone()));
            parent.spawn((BodyTableText, Text::new("-"), text_font.clone()));
            parent.spawn((OptionsText, Text::new("-"), text_font.clone()));

            parent.spawn_control_button::<TrailsToggleButton>(font_size);
            parent.spawn_control_button::<ClearTrailsButton>(font_size);
            parent.spawn_control_button::<PauseButton>(font_size);
            parent.spawn_control_button::<RestartButton>(font_size);
            parent.spawn_control_button::<SlowerButton>(font_size);
            parent.spawn_control_button::<FasterButton>(font_size);
            parent.spawn_control_button::<DayTimestepButton>(font_size);
            parent.spawn_control_button::<ZoomInButton>(font_size);
            parent.spawn_control_button::<ZoomOutButton>(font_size);
            parent.spawn_control_button::<ResetZoomButton>(font_size);

            parent.spawn((Text::new("Fun Stuff"), text_font.clone()));
            parent.spawn_control_button::<DeleteSunButton>(font_size);
            parent.spawn_control_button::<DeleteRandomButton>(font_size);
            parent.spawn_control_button::<PlutoMassButton>(font_size);
            parent.spawn_control_button::<SolarMassesButton>(font_size);
            parent.spawn_control_button::<ZeroVelocitiesButton>(font_size);
            parent.spawn_control_button::<QuitButton>(font_size);

            parent.spawn((ClockText, Text::new("-"), text_font));
        });
}

fn toggle_panel_visibility(
    mut commands: EventReader<SimulationCommand>,
    mut panels: Query<&mut Node, With<PanelRoot>>,
) {
    let toggles = commands
        .read()
        .filter(|command| **command == SimulationCommand::TogglePanel)
        .count();
    if toggles % 2 == 0 {
        return;
    }

    for mut node in &mut panels {
        node.display = match node.display {
            Display::None => Display::Flex,
            _ => Display::None,
        };
    }
}

#[allow(clippy::type_complexity)]
fn update_panel_text(
    controller: Res<SimulationController>,
    panels: Query<&Node, With<PanelRoot>>,
    mut texts: ParamSet<(
        Query<&mut Text, With<BodyTableText>>,
        Query<&mut Text, With<OptionsText>>,
        Query<&mut Text, With<ClockText>>,
    )>,
) {
    if panels.iter().all(|node| node.display == Display::None) {
        return;
    }

    let au = controller.physics_config().astronomical_unit;
    for mut text in &mut texts.p0() {
        text.0 = format_body_table(controller.bodies(), au);
    }
    for mut text in &mut texts.p1() {
        text.0 = format_options(&controller);
    }
    for mut text in &mut texts.p2() {
        text.0 = format_clock(&controller);
    }
}
