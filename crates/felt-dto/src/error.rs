use crate::ExpectedState;
use serde::Serialize;

/// A structured diagnostic pointing at the step of a [`HandSpec`](crate::HandSpec)
/// that failed to replay. `step_index` is `-1` for failures discovered before
/// any action is applied (normalization, deck construction).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayError {
    pub step_index: i64,
    pub reason: ReplayErrorReason,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<ExpectedState>,
}

impl ReplayError {
    pub fn pre_execution(reason: ReplayErrorReason, message: impl Into<String>) -> Self {
        Self {
            step_index: -1,
            reason,
            message: message.into(),
            expected: None,
        }
    }
    pub fn at_step(
        step_index: usize,
        reason: ReplayErrorReason,
        message: impl Into<String>,
        expected: Option<ExpectedState>,
    ) -> Self {
        Self {
            step_index: step_index as i64,
            reason,
            message: message.into(),
            expected,
        }
    }
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} at step {}: {}", self.reason, self.step_index, self.message)
    }
}
impl std::error::Error for ReplayError {}

/// The full taxonomy a caller can match on, split into the normalization
/// phase (no step index) and the per-action execution phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayErrorReason {
    InvalidVariant,
    InvalidTable,
    InvalidBlinds,
    InvalidDealer,
    InvalidSeats,
    DuplicateChair,
    InvalidStack,
    InvalidHero,
    NotEnoughPlayers,
    InvalidHoleCards,
    InvalidBoard,
    DuplicateCards,
    InvalidDeck,
    DeckConstraintMismatch,
    DuplicateConstraints,
    InvalidPhase,
    InvalidAction,
    InvalidActionChair,
    EngineInitFailed,
    SeatInitFailed,
    StartHandFailed,
    PromptBuildFailed,
    NoActionExpected,
    PhaseMismatch,
    OutOfTurn,
    IllegalAction,
    ActionApplyFailed,
}

impl std::fmt::Display for ReplayErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_serializes_snake_case() {
        let json = serde_json::to_string(&ReplayErrorReason::OutOfTurn).unwrap();
        assert_eq!(json, "\"out_of_turn\"");
    }

    #[test]
    fn pre_execution_carries_no_step() {
        let err = ReplayError::pre_execution(ReplayErrorReason::InvalidDealer, "dealer OOB");
        assert_eq!(err.step_index, -1);
        assert!(err.expected.is_none());
    }
}
