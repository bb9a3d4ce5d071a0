//! In-memory DurableStore implementation for tests and single-instance runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use squares_core::GameState;

use super::error::{Result, StoreError};
use super::DurableStore;

/// In-memory implementation of [`DurableStore`].
///
/// Shared behind an `Arc`, one instance can also stand in for the durable
/// backend between several services in convergence tests.
#[derive(Default)]
pub struct InMemoryStore {
    games: RwLock<HashMap<String, GameState>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DurableStore for InMemoryStore {
    async fn load(&self, game_id: &str) -> Result<Option<GameState>> {
        let games = self.games.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(games.get(game_id).cloned())
    }

    async fn save(&self, game_id: &str, state: &GameState) -> Result<()> {
        let mut games = self.games.write().map_err(|_| StoreError::LockPoisoned)?;
        games.insert(game_id.to_owned(), state.clone());
        Ok(())
    }
}
