//! Public projection of game state for consumers outside this process.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use squares_core::{AxisNumbers, GameState, Square, UserPresence};

/// What the dispatcher hands to clients: everything except the admin token,
/// plus a computed `is_admin` for the requesting viewer. Carries the revision
/// so clients can echo it back as `expected_revision`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicGameState {
    pub game_id: String,
    pub revision_id: u64,
    pub locked: bool,
    pub row_numbers: Option<AxisNumbers>,
    pub col_numbers: Option<AxisNumbers>,
    pub squares: BTreeMap<Square, String>,
    pub users: BTreeMap<String, UserPresence>,
    pub user_colors: BTreeMap<String, String>,
    pub is_admin: bool,
}

impl PublicGameState {
    /// Projects a snapshot for `viewer`; `None` means an anonymous caller,
    /// who is never the admin.
    pub fn project(state: &GameState, viewer: Option<&str>) -> Self {
        Self {
            game_id: state.game_id.clone(),
            revision_id: state.revision_id,
            locked: state.locked,
            row_numbers: state.row_numbers,
            col_numbers: state.col_numbers,
            squares: state.squares.clone(),
            users: state.users.clone(),
            user_colors: state.user_colors.clone(),
            is_admin: viewer.is_some_and(|identity| state.is_admin(identity)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_drops_the_admin_token() {
        let state = GameState::new("g1", "secret-admin-token");
        let view = PublicGameState::project(&state, Some("secret-admin-token"));

        assert!(view.is_admin);
        let json = serde_json::to_string(&view).expect("serializes");
        assert!(!json.contains("secret-admin-token"));
        assert!(json.contains("\"isAdmin\":true"));
    }

    #[test]
    fn anonymous_viewers_are_never_admin() {
        let state = GameState::new("g1", "secret-admin-token");
        assert!(!PublicGameState::project(&state, None).is_admin);
        assert!(!PublicGameState::project(&state, Some("other")).is_admin);
    }
}
