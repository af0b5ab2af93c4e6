//! Pause/resume button component

use crate::plugins::controls::ButtonWithLabel;
use crate::plugins::controls::builder::{set_button_text, with_shortcut};
use crate::prelude::*;

#[derive(Component, Default)]
pub struct PauseButton;

impl ButtonWithLabel for PauseButton {
    fn command() -> SimulationCommand {
        SimulationCommand::TogglePause
    }

    fn marker() -> Self {
        Self
    }

    fn base_text() -> &'static str {
        "Pause"
    }

    fn shortcut() -> Option<&'static str> {
        Some("Space")
    }
}

pub fn sync_pause_button_text(
    controller: Res<SimulationController>,
    mut last: Local<Option<RunState>>,
    buttons: Query<&Children, With<PauseButton>>,
    mut texts: Query<&mut Text>,
) {
    let state = controller.state();
    if *last == Some(state) {
        return;
    }
    *last = Some(state);

    let label = with_shortcut(state.toggle_label(), PauseButton::shortcut());
    set_button_text(&buttons, &mut texts, &label);
}
