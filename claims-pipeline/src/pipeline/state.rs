//! Forward-only pipeline state machine.
//!
//! The run is an enumerated tagged state with no branching: understanding,
//! then extraction, then summary, then done. Transitions never move
//! backwards and never skip a stage.

use serde::{Deserialize, Serialize};

use crate::stages::PipelineStage;

/// The state of one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    /// Running the understanding stage.
    Understanding,
    /// Running the extraction stage.
    Extraction,
    /// Running the summary stage.
    Summary,
    /// All stages completed; the result may be assembled.
    Done,
    /// A stage failed; the invocation is aborted.
    Failed,
}

impl PipelineState {
    /// The state a fresh invocation starts in.
    #[must_use]
    pub fn initial() -> Self {
        Self::Understanding
    }

    /// Returns the stage to execute in this state, or `None` once terminal.
    #[must_use]
    pub fn stage(self) -> Option<PipelineStage> {
        match self {
            Self::Understanding => Some(PipelineStage::Understanding),
            Self::Extraction => Some(PipelineStage::Extraction),
            Self::Summary => Some(PipelineStage::Summary),
            Self::Done | Self::Failed => None,
        }
    }

    /// Advances to the next state after the current stage succeeds.
    /// Terminal states stay where they are.
    #[must_use]
    pub fn advance(self) -> Self {
        match self {
            Self::Understanding => Self::Extraction,
            Self::Extraction => Self::Summary,
            Self::Summary | Self::Done => Self::Done,
            Self::Failed => Self::Failed,
        }
    }

    /// Moves to the failed state. A completed run cannot fail afterwards.
    #[must_use]
    pub fn fail(self) -> Self {
        match self {
            Self::Done => Self::Done,
            _ => Self::Failed,
        }
    }

    /// Returns true for `Done` and `Failed`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn advances_in_strict_program_order() {
        let mut state = PipelineState::initial();
        let mut visited = Vec::new();
        while let Some(stage) = state.stage() {
            visited.push(stage);
            state = state.advance();
        }
        assert_eq!(visited, PipelineStage::ALL.to_vec());
        assert_eq!(state, PipelineState::Done);
    }

    #[test]
    fn terminal_states_do_not_move() {
        assert_eq!(PipelineState::Done.advance(), PipelineState::Done);
        assert_eq!(PipelineState::Failed.advance(), PipelineState::Failed);
        assert!(PipelineState::Done.is_terminal());
        assert!(PipelineState::Failed.is_terminal());
    }

    #[test]
    fn any_running_state_can_fail() {
        for state in [
            PipelineState::Understanding,
            PipelineState::Extraction,
            PipelineState::Summary,
        ] {
            assert_eq!(state.fail(), PipelineState::Failed);
        }
        assert_eq!(PipelineState::Done.fail(), PipelineState::Done);
    }

    #[test]
    fn no_stage_runs_after_failure() {
        assert_eq!(PipelineState::Failed.stage(), None);
    }
}
