use crate::action::ActionTransition;
use crate::state::{GameState, Square};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimError {
    Locked,
    EmptyName,
    AlreadyTaken { square: Square },
    MissingClaim { square: Square },
}

/// Claims a free cell for a participant.
///
/// `expected_revision` is advisory: a mismatch never blocks the claim as long
/// as the cell itself is still free. The engine reports the mismatch back so
/// clients know their board view is stale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimAction {
    pub name: String,
    pub square: Square,
    pub seen_at_ms: i64,
    pub expected_revision: Option<u64>,
}

impl ClaimAction {
    pub fn new(
        name: &str,
        square: Square,
        seen_at_ms: i64,
        expected_revision: Option<u64>,
    ) -> Self {
        Self {
            name: name.trim().to_owned(),
            square,
            seen_at_ms,
            expected_revision,
        }
    }
}

impl ActionTransition for ClaimAction {
    type Error = ClaimError;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        if state.locked {
            return Err(ClaimError::Locked);
        }
        if self.name.is_empty() {
            return Err(ClaimError::EmptyName);
        }
        if state.squares.contains_key(&self.square) {
            return Err(ClaimError::AlreadyTaken {
                square: self.square,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<(), Self::Error> {
        state.assign_color(&self.name);
        state.touch_user(&self.name, self.seen_at_ms);
        state.squares.insert(self.square, self.name.clone());
        Ok(())
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        if state.squares.get(&self.square) == Some(&self.name) {
            Ok(())
        } else {
            Err(ClaimError::MissingClaim {
                square: self.square,
            })
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnclaimError {
    Locked,
    NotOwner { square: Square },
    StillClaimed { square: Square },
}

/// Releases a cell currently held by the same participant.
///
/// Only the claimant may vacate a cell; the advisory revision check follows
/// the same policy as [`ClaimAction`], keyed on ownership instead of
/// emptiness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnclaimAction {
    pub name: String,
    pub square: Square,
    pub expected_revision: Option<u64>,
}

impl UnclaimAction {
    pub fn new(name: &str, square: Square, expected_revision: Option<u64>) -> Self {
        Self {
            name: name.trim().to_owned(),
            square,
            expected_revision,
        }
    }
}

impl ActionTransition for UnclaimAction {
    type Error = UnclaimError;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        if state.locked {
            return Err(UnclaimError::Locked);
        }
        let holder = state.squares.get(&self.square);
        if holder.map(|name| name.trim()) != Some(self.name.as_str()) {
            return Err(UnclaimError::NotOwner {
                square: self.square,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<(), Self::Error> {
        state.squares.remove(&self.square);
        Ok(())
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        if state.squares.contains_key(&self.square) {
            Err(UnclaimError::StillClaimed {
                square: self.square,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(row: u8, col: u8) -> Square {
        Square::new(row, col).expect("in bounds")
    }

    fn run<T: ActionTransition>(action: &T, state: &mut GameState) -> Result<(), T::Error> {
        action.pre_validate(state)?;
        action.apply(state)?;
        action.post_validate(state)
    }

    #[test]
    fn claim_records_owner_presence_and_color() {
        let mut state = GameState::new("g1", "admin");
        let action = ClaimAction::new("  Alice ", square(2, 3), 1_000, None);

        run(&action, &mut state).expect("claim should succeed");

        assert_eq!(state.squares[&square(2, 3)], "Alice");
        assert_eq!(state.users["Alice"].last_seen, Some(1_000));
        assert!(state.user_colors.contains_key("Alice"));
    }

    #[test]
    fn claim_rejects_taken_square() {
        let mut state = GameState::new("g1", "admin");
        run(&ClaimAction::new("Alice", square(0, 0), 1, None), &mut state)
            .expect("first claim should succeed");

        let err = ClaimAction::new("Bob", square(0, 0), 2, None)
            .pre_validate(&state)
            .expect_err("square should be taken");
        assert_eq!(
            err,
            ClaimError::AlreadyTaken {
                square: square(0, 0)
            }
        );
    }

    #[test]
    fn claim_rejects_blank_name_and_locked_board() {
        let mut state = GameState::new("g1", "admin");
        assert_eq!(
            ClaimAction::new("   ", square(0, 0), 1, None).pre_validate(&state),
            Err(ClaimError::EmptyName)
        );

        state.locked = true;
        assert_eq!(
            ClaimAction::new("Alice", square(0, 0), 1, None).pre_validate(&state),
            Err(ClaimError::Locked)
        );
    }

    #[test]
    fn unclaim_restores_the_square() {
        let mut state = GameState::new("g1", "admin");
        run(&ClaimAction::new("Alice", square(5, 5), 1, None), &mut state)
            .expect("claim should succeed");

        run(&UnclaimAction::new("Alice", square(5, 5), None), &mut state)
            .expect("owner should be able to unclaim");
        assert!(!state.squares.contains_key(&square(5, 5)));
    }

    #[test]
    fn unclaim_rejects_other_claimants_and_empty_squares() {
        let mut state = GameState::new("g1", "admin");
        run(&ClaimAction::new("Alice", square(5, 5), 1, None), &mut state)
            .expect("claim should succeed");

        assert_eq!(
            UnclaimAction::new("Bob", square(5, 5), None).pre_validate(&state),
            Err(UnclaimError::NotOwner {
                square: square(5, 5)
            })
        );
        assert_eq!(
            UnclaimAction::new("Alice", square(6, 6), None).pre_validate(&state),
            Err(UnclaimError::NotOwner {
                square: square(6, 6)
            })
        );
    }
}
