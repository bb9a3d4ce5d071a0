pub mod kinds;
pub mod transition;

pub use kinds::{
    AssignNumbersAction, AssignNumbersError, ClaimAction, ClaimError, JoinAction, JoinError,
    ResetAction, ResetError, SetLockedAction, SetLockedError, UnclaimAction, UnclaimError,
};
pub use transition::ActionTransition;

/// Describes a single mutation request against one game's state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self { kind }
    }

    /// The client-echoed revision, for the advisory staleness check. Only
    /// claim and unclaim carry one.
    pub fn expected_revision(&self) -> Option<u64> {
        match &self.kind {
            ActionKind::Claim(action) => action.expected_revision,
            ActionKind::Unclaim(action) => action.expected_revision,
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Join(JoinAction),
    Claim(ClaimAction),
    Unclaim(UnclaimAction),
    Reset(ResetAction),
    AssignNumbers(AssignNumbersAction),
    SetLocked(SetLockedAction),
}

impl From<JoinAction> for ActionKind {
    fn from(action: JoinAction) -> Self {
        Self::Join(action)
    }
}

impl From<ClaimAction> for ActionKind {
    fn from(action: ClaimAction) -> Self {
        Self::Claim(action)
    }
}

impl From<UnclaimAction> for ActionKind {
    fn from(action: UnclaimAction) -> Self {
        Self::Unclaim(action)
    }
}

impl From<ResetAction> for ActionKind {
    fn from(action: ResetAction) -> Self {
        Self::Reset(action)
    }
}

impl From<AssignNumbersAction> for ActionKind {
    fn from(action: AssignNumbersAction) -> Self {
        Self::AssignNumbers(action)
    }
}

impl From<SetLockedAction> for ActionKind {
    fn from(action: SetLockedAction) -> Self {
        Self::SetLocked(action)
    }
}
