use crate::action::ActionTransition;
use crate::action::{
    AssignNumbersAction, ClaimAction, JoinAction, ResetAction, SetLockedAction, UnclaimAction,
};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

/// Errors surfaced while executing an action through the game engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecuteError {
    Join(TransitionPhaseError<<JoinAction as ActionTransition>::Error>),
    Claim(TransitionPhaseError<<ClaimAction as ActionTransition>::Error>),
    Unclaim(TransitionPhaseError<<UnclaimAction as ActionTransition>::Error>),
    Reset(TransitionPhaseError<<ResetAction as ActionTransition>::Error>),
    AssignNumbers(TransitionPhaseError<<AssignNumbersAction as ActionTransition>::Error>),
    SetLocked(TransitionPhaseError<<SetLockedAction as ActionTransition>::Error>),
}
