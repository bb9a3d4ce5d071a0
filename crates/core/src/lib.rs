//! Deterministic domain core for the shared-squares board game.
//!
//! Everything in this crate is a pure state machine: [`GameState`] plus the
//! mutation operations expressed as action transitions, executed through
//! [`GameEngine`] which owns the revision-counter discipline. Clocks,
//! randomness, identity tokens, and persistence all live with the caller and
//! enter as plain data, which keeps every operation replayable and testable
//! without mocks.
//!
//! Modules:
//! - [`state`] holds the board model, the coordinate type, and the roster
//!   with its fixed color palette
//! - [`action`] defines one transition type per mutation, each with its own
//!   error enum
//! - [`engine`] routes actions through the pre/apply/post pipeline and bumps
//!   the revision exactly once per applied action

pub mod action;
pub mod engine;
pub mod state;

pub use action::{
    Action, ActionKind, ActionTransition, AssignNumbersAction, AssignNumbersError, ClaimAction,
    ClaimError, JoinAction, JoinError, ResetAction, ResetError, SetLockedAction, SetLockedError,
    UnclaimAction, UnclaimError,
};
pub use engine::{ActionReceipt, ExecuteError, GameEngine, TransitionPhase, TransitionPhaseError};
pub use state::{
    AxisNumbers, BOARD_COLS, BOARD_ROWS, GameState, INITIAL_REVISION, InvalidSquare,
    ParseSquareError, Square, USER_COLOR_PALETTE, UserPresence, is_permutation, next_palette_color,
};
