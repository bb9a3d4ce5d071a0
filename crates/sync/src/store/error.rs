//! Error types raised by durable store implementations.

use thiserror::Error;

/// Errors surfaced by durable store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("game id {0:?} is not usable as a storage key")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
