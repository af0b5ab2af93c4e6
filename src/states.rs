/// Whether the simulation advances each frame.
///
/// Changes only through explicit pause, resume or toggle actions; restarting
/// keeps the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    #[default]
    Running,
    Paused,
}

impl RunState {
    pub fn toggled(self) -> Self {
        match self {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
        }
    }

    pub fn is_paused(self) -> bool {
        self == RunState::Paused
    }

    /// Label for the control that flips this state.
    pub fn toggle_label(self) -> &'static str {
        match self {
            RunState::Running => "Pause",
            RunState::Paused => "Play",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let state = RunState::default();
        assert_eq!(state, RunState::Running);
        assert!(state.toggled().is_paused());
        assert_eq!(state.toggled().toggled(), RunState::Running);
        assert_eq!(RunState::Paused.toggle_label(), "Play");
    }
}
