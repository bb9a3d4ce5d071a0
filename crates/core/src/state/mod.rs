pub mod board;
pub mod roster;

use std::collections::BTreeMap;

pub use board::{
    AxisNumbers, BOARD_COLS, BOARD_ROWS, InvalidSquare, ParseSquareError, Square, is_permutation,
};
pub use roster::{USER_COLOR_PALETTE, UserPresence, next_palette_color};

/// Revision assigned to a freshly created game.
pub const INITIAL_REVISION: u64 = 1;

#[cfg(feature = "serde")]
fn initial_revision() -> u64 {
    INITIAL_REVISION
}

/// Canonical state of one shared board, keyed by its game id.
///
/// This is the unit of persistence and of merge reconciliation: every serving
/// instance caches one copy per game id, and the durable store holds the last
/// copy any instance persisted. Field names serialize in camelCase so blobs
/// stay interchangeable across instances regardless of which one wrote them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct GameState {
    pub game_id: String,
    /// Opaque identity token of the creator; compared only for equality.
    pub admin_id: String,
    /// Bumped by every mutation and by conflict-producing merges; blobs
    /// written before revision tracking load as revision 1.
    #[cfg_attr(feature = "serde", serde(default = "initial_revision"))]
    pub revision_id: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub locked: bool,
    /// Both axes are `None` or both are permutations of 0-9, always assigned
    /// and cleared together.
    #[cfg_attr(feature = "serde", serde(default))]
    pub row_numbers: Option<AxisNumbers>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub col_numbers: Option<AxisNumbers>,
    /// Sparse claims; absence means the cell is free.
    #[cfg_attr(feature = "serde", serde(default))]
    pub squares: BTreeMap<Square, String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub users: BTreeMap<String, UserPresence>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub user_colors: BTreeMap<String, String>,
}

impl GameState {
    /// Creates an empty, unlocked board owned by `admin_id`.
    pub fn new(game_id: impl Into<String>, admin_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            admin_id: admin_id.into(),
            revision_id: INITIAL_REVISION,
            locked: false,
            row_numbers: None,
            col_numbers: None,
            squares: BTreeMap::new(),
            users: BTreeMap::new(),
            user_colors: BTreeMap::new(),
        }
    }

    pub fn bump_revision(&mut self) {
        self.revision_id += 1;
    }

    /// The admin check is a plain equality test against the stored token;
    /// minting and validating tokens is the dispatcher's business.
    pub fn is_admin(&self, identity: &str) -> bool {
        self.admin_id == identity
    }

    /// Records (or refreshes) a participant's presence.
    pub fn touch_user(&mut self, name: &str, seen_at_ms: i64) {
        self.users
            .insert(name.to_owned(), UserPresence::new(name, seen_at_ms));
    }

    /// Gives `name` a palette color if it has none. Idempotent; returns
    /// whether a color was assigned. Does not touch the revision counter.
    pub fn assign_color(&mut self, name: &str) -> bool {
        if self.user_colors.contains_key(name) {
            return false;
        }
        let color = next_palette_color(&self.user_colors);
        self.user_colors.insert(name.to_owned(), color.to_owned());
        true
    }
}
