use crate::action::ActionTransition;
use crate::state::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinError {
    EmptyName,
}

/// Registers a participant on the board and hands them a palette color.
///
/// Joining is deliberately exempt from the `locked` gate: a locked board
/// freezes claims, not spectatorship.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinAction {
    pub name: String,
    pub seen_at_ms: i64,
}

impl JoinAction {
    pub fn new(name: &str, seen_at_ms: i64) -> Self {
        Self {
            name: name.trim().to_owned(),
            seen_at_ms,
        }
    }
}

impl ActionTransition for JoinAction {
    type Error = JoinError;

    fn pre_validate(&self, _state: &GameState) -> Result<(), Self::Error> {
        if self.name.is_empty() {
            return Err(JoinError::EmptyName);
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<(), Self::Error> {
        state.touch_user(&self.name, self.seen_at_ms);
        state.assign_color(&self.name);
        Ok(())
    }
}
