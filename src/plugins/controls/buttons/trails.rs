//! Trails toggle button component

use crate::plugins::controls::ButtonWithLabel;
use crate::plugins::controls::builder::{set_button_text, with_shortcut};
use crate::prelude::*;

#[derive(Component, Default)]
pub struct TrailsToggleButton;

impl ButtonWithLabel for TrailsToggleButton {
    fn command() -> SimulationCommand {
        SimulationCommand::ToggleTrails
    }

    fn marker() -> Self {
        Self
    }

    fn base_text() -> &'static str {
        "Show Trails"
    }

    fn shortcut() -> Option<&'static str> {
        Some("T")
    }
}

pub fn sync_trails_button_text(
    controller: Res<SimulationController>,
    mut last: Local<Option<bool>>,
    buttons: Query<&Children, With<TrailsToggleButton>>,
    mut texts: Query<&mut Text>,
) {
    let enabled = controller.settings().trails_enabled;
    if *last == Some(enabled) {
        return;
    }
    *last = Some(enabled);

    let text = if enabled { "Hide Trails" } else { "Show Trails" };
    let label = with_shortcut(text, TrailsToggleButton::shortcut());
    set_button_text(&buttons, &mut texts, &label);
}
