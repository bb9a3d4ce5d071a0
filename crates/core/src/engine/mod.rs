mod errors;

use crate::action::{Action, ActionKind, ActionTransition};
use crate::state::GameState;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

type TransitionResult<E> = Result<(), TransitionPhaseError<E>>;

macro_rules! dispatch_transition {
    ($action:expr, $state:expr, { $($variant:ident => $err:ident),+ $(,)? }) => {{
        match &$action.kind {
            $(
                ActionKind::$variant(transition) => {
                    drive_transition(transition, $state).map_err(ExecuteError::$err)
                }
            )+
        }
    }};
}

/// Outcome of a successfully executed action.
///
/// `stale_revision` is purely informational: it tells the caller that the
/// revision they echoed no longer matches, so their view of the board is
/// behind. The mutation has still been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionReceipt {
    pub revision: u64,
    pub stale_revision: bool,
}

/// Game engine that routes actions through their transition pipeline and
/// keeps the revision counter honest: exactly one bump per applied action.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    /// Executes an action, bumping the revision on success.
    pub fn execute(&mut self, action: &Action) -> Result<ActionReceipt, ExecuteError> {
        let stale_revision = action
            .expected_revision()
            .is_some_and(|expected| expected != self.state.revision_id);

        dispatch_transition!(action, self.state, {
            Join => Join,
            Claim => Claim,
            Unclaim => Unclaim,
            Reset => Reset,
            AssignNumbers => AssignNumbers,
            SetLocked => SetLocked,
        })?;

        self.state.bump_revision();
        Ok(ActionReceipt {
            revision: self.state.revision_id,
            stale_revision,
        })
    }
}

#[inline]
fn drive_transition<T>(transition: &T, state: &mut GameState) -> TransitionResult<T::Error>
where
    T: ActionTransition,
{
    transition
        .pre_validate(&*state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    transition
        .apply(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(&*state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))
}
