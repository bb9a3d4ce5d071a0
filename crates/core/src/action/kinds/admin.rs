use crate::action::ActionTransition;
use crate::state::{AxisNumbers, GameState, is_permutation};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetError {
    Locked,
}

/// Wipes the board back to its post-creation state: no numbers, no claims,
/// no roster. The game id, admin token, and lock flag survive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResetAction;

impl ActionTransition for ResetAction {
    type Error = ResetError;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        if state.locked {
            return Err(ResetError::Locked);
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<(), Self::Error> {
        state.row_numbers = None;
        state.col_numbers = None;
        state.squares.clear();
        state.users.clear();
        state.user_colors.clear();
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignNumbersError {
    Locked,
    NotPermutation,
}

/// Overwrites both axis headers at once.
///
/// The two permutations arrive as inputs so the state machine stays
/// deterministic; drawing them is the coordinator's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssignNumbersAction {
    pub rows: AxisNumbers,
    pub cols: AxisNumbers,
}

impl AssignNumbersAction {
    pub fn new(rows: AxisNumbers, cols: AxisNumbers) -> Self {
        Self { rows, cols }
    }
}

impl ActionTransition for AssignNumbersAction {
    type Error = AssignNumbersError;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        if state.locked {
            return Err(AssignNumbersError::Locked);
        }
        if !is_permutation(&self.rows) || !is_permutation(&self.cols) {
            return Err(AssignNumbersError::NotPermutation);
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<(), Self::Error> {
        state.row_numbers = Some(self.rows);
        state.col_numbers = Some(self.cols);
        Ok(())
    }
}

/// Uninhabited: toggling the lock has no failure mode of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetLockedError {}

/// Sets the lock flag. Locking does not require the board to be unlocked
/// first; the flag gates the other mutations, not itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetLockedAction {
    pub locked: bool,
}

impl SetLockedAction {
    pub fn new(locked: bool) -> Self {
        Self { locked }
    }
}

impl ActionTransition for SetLockedAction {
    type Error = SetLockedError;

    fn apply(&self, state: &mut GameState) -> Result<(), Self::Error> {
        state.locked = self.locked;
        Ok(())
    }
}
