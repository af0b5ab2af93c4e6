//! Button markers and the commands they emit

pub mod pause;
pub mod trails;

pub use pause::PauseButton;
pub use trails::TrailsToggleButton;

use crate::plugins::controls::ButtonWithLabel;
use crate::prelude::*;
use crate::simulation::scenario::SOLAR_MASS;

/// Position of Pluto in the default scenario.
pub const PLUTO_INDEX: usize = 9;

/// Zoom change per click of the zoom buttons.
pub const ZOOM_STEP: f32 = 0.25;

const SECONDS_PER_DAY: Scalar = 86400.0;

/// Declares a button marker with a fixed command and label.
macro_rules! command_button {
    ($(#[$meta:meta])* $name:ident, $command:expr, $text:literal $(, $shortcut:literal)?) => {
        $(#[$meta])*
        #[derive(Component, Default)]
        pub struct $name;

        impl ButtonWithLabel for $name {
            fn command() -> SimulationCommand {
                $command
            }

            fn marker() -> Self {
                Self
            }

            fn base_text() -> &'static str {
                $text
            }

            $(
            fn shortcut() -> Option<&'static str> {
                Some($shortcut)
            }
            )?
        }
    };
}

command_button!(RestartButton, SimulationCommand::Restart, "Restart", "N");
command_button!(ClearTrailsButton, SimulationCommand::ClearTrails, "Clear Trails", "X");
command_button!(
    SlowerButton,
    SimulationCommand::ScaleTimestep(0.5),
    "Halve Timestep",
    "["
);
command_button!(
    FasterButton,
    SimulationCommand::ScaleTimestep(2.0),
    "Double Timestep",
    "]"
);
command_button!(QuitButton, SimulationCommand::Quit, "Quit", "Esc");
command_button!(
    DayTimestepButton,
    SimulationCommand::SetTimestep(SECONDS_PER_DAY),
    "One Day per Step"
);
command_button!(ZoomInButton, SimulationCommand::Zoom(-ZOOM_STEP), "Zoom In", "=");
command_button!(ZoomOutButton, SimulationCommand::Zoom(ZOOM_STEP), "Zoom Out", "-");
command_button!(ResetZoomButton, SimulationCommand::SetZoom(1.0), "Zoom 1.0");

command_button!(
    DeleteSunButton,
    SimulationCommand::DeleteReferenceBody,
    "Delete the Sun"
);
command_button!(
    DeleteRandomButton,
    SimulationCommand::DeleteRandomBody,
    "Delete a Random Planet"
);
command_button!(
    PlutoMassButton,
    SimulationCommand::OverrideMass {
        index: PLUTO_INDEX,
        mass: SOLAR_MASS,
    },
    "Give Pluto the Sun's Mass"
);
command_button!(
    SolarMassesButton,
    SimulationCommand::OverrideAllMasses(SOLAR_MASS),
    "Give Everything the Sun's Mass"
);
command_button!(
    ZeroVelocitiesButton,
    SimulationCommand::ZeroVelocities,
    "Stop All Planets"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_labels() {
        assert_eq!(RestartButton::label(), "Restart (N)");
        assert_eq!(PauseButton::label(), "Pause (Space)");
        assert_eq!(DeleteSunButton::label(), "Delete the Sun");
    }

    #[test]
    fn test_button_commands() {
        assert_eq!(SlowerButton::command(), SimulationCommand::ScaleTimestep(0.5));
        assert_eq!(
            DayTimestepButton::command(),
            SimulationCommand::SetTimestep(86400.0)
        );
        assert_eq!(ResetZoomButton::command(), SimulationCommand::SetZoom(1.0));
        assert_eq!(
            PlutoMassButton::command(),
            SimulationCommand::OverrideMass {
                index: 9,
                mass: 1.9891e30
            }
        );
    }
}
