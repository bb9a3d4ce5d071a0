//! Durable key-value contract for persisting game snapshots.
//!
//! The store is the only convergence point between serving instances: each
//! process keeps its own cache and reconciles against whatever the last
//! writer persisted here. Implementations hold full [`GameState`] blobs in
//! their camelCase JSON form, keyed by game id.

mod error;
mod file;
mod memory;

use async_trait::async_trait;

use squares_core::GameState;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::InMemoryStore;

/// Durable persistence for game snapshots.
///
/// Both methods may suspend; callers are expected to bound them with a
/// timeout and treat a timeout like any other store failure. A `load` of an
/// unknown key is `Ok(None)`, never an error.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Load the last persisted snapshot for a game, if any.
    async fn load(&self, game_id: &str) -> Result<Option<GameState>>;

    /// Persist a snapshot, replacing whatever was stored before.
    async fn save(&self, game_id: &str, state: &GameState) -> Result<()>;
}
