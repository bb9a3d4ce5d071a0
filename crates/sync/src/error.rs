//! Unified error types surfaced by the synchronization service.
//!
//! Validation failures from the domain engine come back as typed values, and
//! persistence failures never appear here at all: they are logged and
//! swallowed inside the coordinator so the in-memory result stays usable.

use thiserror::Error;

use squares_core::{ExecuteError, InvalidSquare};

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("game {game_id} not found")]
    NotFound { game_id: String },

    #[error(transparent)]
    InvalidSquare(#[from] InvalidSquare),

    #[error("action rejected: {0:?}")]
    Rejected(ExecuteError),
}
