//! Synchronization coordinator for shared game boards.
//!
//! [`GameService`] owns the per-process cache and orchestrates every access
//! as one critical section per game id: reload the durable copy, merge it
//! into the cache, apply the requested mutation, persist the result. Two
//! requests for the same game inside one process serialize on the per-game
//! lock; instances in different processes converge only through the durable
//! store and the merge engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use rand::seq::SliceRandom;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

use squares_core::{
    Action, ActionKind, ActionReceipt, AssignNumbersAction, AxisNumbers, ClaimAction, GameEngine,
    GameState, JoinAction, ResetAction, SetLockedAction, Square, UnclaimAction,
};

use crate::error::{Result, SyncError};
use crate::merge::{MergeOutcome, merge_states};
use crate::store::DurableStore;
use crate::view::PublicGameState;

/// Coordinator configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Bound on every durable store call; a timeout is treated exactly like
    /// a store failure (keep serving the in-memory copy).
    pub store_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
        }
    }
}

/// Snapshot plus engine receipt for a mutation that carried an advisory
/// revision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    pub state: GameState,
    pub receipt: ActionReceipt,
}

/// Result of a join, which may have created the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinOutcome {
    pub state: GameState,
    /// True when this join created the game; the joiner's identity token is
    /// now the stored admin token.
    pub created: bool,
}

#[derive(Default)]
struct CacheEntry {
    state: Option<GameState>,
}

type Slot = Arc<Mutex<CacheEntry>>;

/// Per-process authority over game state.
///
/// The durable store is optional: without one the service degrades to
/// memory-only, single-instance operation. With one, the cache entry for a
/// game is reconciled against the durable copy before every operation.
pub struct GameService {
    config: SyncConfig,
    store: Option<Arc<dyn DurableStore>>,
    games: StdMutex<HashMap<String, Slot>>,
}

impl GameService {
    pub fn builder() -> GameServiceBuilder {
        GameServiceBuilder::new()
    }

    /// Per-game slot lookup; the map lock is held only for the lookup, the
    /// returned slot's own lock is the per-game critical section.
    fn slot(&self, game_id: &str) -> Slot {
        let mut games = self
            .games
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        games.entry(game_id.to_owned()).or_default().clone()
    }

    async fn load_from_store(&self, game_id: &str) -> Option<GameState> {
        let store = self.store.as_ref()?;
        match timeout(self.config.store_timeout, store.load(game_id)).await {
            Ok(Ok(state)) => state,
            Ok(Err(error)) => {
                warn!(%game_id, %error, "durable load failed; serving cached state");
                None
            }
            Err(_) => {
                warn!(%game_id, "durable load timed out; serving cached state");
                None
            }
        }
    }

    /// Folds the durable copy (if any) into the cache entry. Returns whether
    /// any copy now exists in cache.
    async fn reload_into(
        &self,
        entry: &mut CacheEntry,
        game_id: &str,
        persist_merged: bool,
    ) -> bool {
        if let Some(durable) = self.load_from_store(game_id).await {
            match entry.state.take() {
                Some(cached) => {
                    let MergeOutcome { state, .. } = merge_states(&cached, &durable);
                    entry.state = Some(state);
                    if persist_merged {
                        self.persist_entry(entry, game_id).await;
                    }
                }
                None => entry.state = Some(durable),
            }
        }
        entry.state.is_some()
    }

    /// Persists the cache entry. Failures and timeouts are logged and
    /// swallowed: the in-memory copy remains authoritative for this process
    /// and is still returned to callers.
    async fn persist_entry(&self, entry: &CacheEntry, game_id: &str) {
        let (Some(store), Some(state)) = (self.store.as_ref(), entry.state.as_ref()) else {
            return;
        };
        match timeout(self.config.store_timeout, store.save(game_id, state)).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                warn!(%game_id, %error, "persist failed; in-memory state remains authoritative");
            }
            Err(_) => {
                warn!(%game_id, "persist timed out; in-memory state remains authoritative");
            }
        }
    }

    /// Loads the game into cache if a durable copy exists, reconciling the
    /// two copies when both are present. Returns whether the game is now
    /// cached.
    pub async fn ensure_loaded(&self, game_id: &str) -> bool {
        let slot = self.slot(game_id);
        let mut entry = slot.lock().await;
        self.reload_into(&mut entry, game_id, true).await
    }

    /// Same merge as [`ensure_loaded`](Self::ensure_loaded) but without the
    /// unconditional persist; every mutating operation runs this before
    /// applying, and the mutation that follows persists the result.
    pub async fn reload_and_merge(&self, game_id: &str) -> bool {
        let slot = self.slot(game_id);
        let mut entry = slot.lock().await;
        self.reload_into(&mut entry, game_id, false).await
    }

    /// Serializes the cached entry to the durable store (if one is
    /// configured); failures are logged, never returned.
    pub async fn persist(&self, game_id: &str) {
        let slot = self.slot(game_id);
        let entry = slot.lock().await;
        self.persist_entry(&entry, game_id).await;
    }

    /// Read path: merge once, return a clone. `None` when the game exists
    /// nowhere.
    pub async fn snapshot(&self, game_id: &str) -> Option<GameState> {
        let slot = self.slot(game_id);
        let mut entry = slot.lock().await;
        self.reload_into(&mut entry, game_id, true).await;
        entry.state.clone()
    }

    /// Snapshot projected for an external viewer.
    pub async fn public_view(
        &self,
        game_id: &str,
        viewer: Option<&str>,
    ) -> Option<PublicGameState> {
        let state = self.snapshot(game_id).await?;
        Some(PublicGameState::project(&state, viewer))
    }

    /// True iff `identity` equals the stored admin token for an existing
    /// game.
    pub async fn is_admin(&self, game_id: &str, identity: &str) -> bool {
        self.snapshot(game_id)
            .await
            .is_some_and(|state| state.is_admin(identity))
    }

    /// Returns the existing game or creates it with `admin_id` as the owner.
    /// New games start at revision 1 and are persisted immediately.
    pub async fn get_or_create(&self, game_id: &str, admin_id: &str) -> GameState {
        let slot = self.slot(game_id);
        let mut entry = slot.lock().await;
        self.reload_into(&mut entry, game_id, true).await;

        if let Some(state) = &entry.state {
            return state.clone();
        }

        debug!(%game_id, "creating game");
        let state = GameState::new(game_id, admin_id);
        entry.state = Some(state.clone());
        self.persist_entry(&entry, game_id).await;
        state
    }

    /// Joins a participant, creating the game on first contact (the joiner's
    /// identity token becomes the admin token). Joining never requires the
    /// board to be unlocked.
    pub async fn join(&self, game_id: &str, name: &str, identity: &str) -> Result<JoinOutcome> {
        let slot = self.slot(game_id);
        let mut entry = slot.lock().await;
        self.reload_into(&mut entry, game_id, false).await;

        let created = entry.state.is_none();
        if created {
            debug!(%game_id, "creating game on first join");
        }
        let state = entry
            .state
            .get_or_insert_with(|| GameState::new(game_id, identity));

        let action = Action::new(JoinAction::new(name, now_ms()).into());
        let executed = GameEngine::new(state).execute(&action);
        let snapshot = state.clone();

        match executed {
            Ok(_) => {
                self.persist_entry(&entry, game_id).await;
                Ok(JoinOutcome {
                    state: snapshot,
                    created,
                })
            }
            Err(error) => {
                // A rejected join must not leave behind a game it created.
                if created {
                    entry.state = None;
                }
                Err(SyncError::Rejected(error))
            }
        }
    }

    /// Claims a free square for `name`. `expected_revision` is advisory: a
    /// mismatch is reported on the receipt, never used to reject a claim on
    /// a square that is still free.
    pub async fn claim_square(
        &self,
        game_id: &str,
        name: &str,
        row: u8,
        col: u8,
        expected_revision: Option<u64>,
    ) -> Result<Applied> {
        let square = Square::new(row, col)?;
        let action = ClaimAction::new(name, square, now_ms(), expected_revision);
        self.mutate(game_id, action.into()).await
    }

    /// Releases a square currently held by `name`, under the same advisory
    /// revision policy as [`claim_square`](Self::claim_square).
    pub async fn unclaim_square(
        &self,
        game_id: &str,
        name: &str,
        row: u8,
        col: u8,
        expected_revision: Option<u64>,
    ) -> Result<Applied> {
        let square = Square::new(row, col)?;
        let action = UnclaimAction::new(name, square, expected_revision);
        self.mutate(game_id, action.into()).await
    }

    /// Clears numbers, claims, and the roster. Admin gating happens at the
    /// dispatcher via [`is_admin`](Self::is_admin).
    pub async fn reset_game(&self, game_id: &str) -> Result<GameState> {
        let applied = self.mutate(game_id, ResetAction.into()).await?;
        Ok(applied.state)
    }

    /// Draws two independent unbiased permutations of 0-9 and assigns them
    /// to the row and column headers.
    pub async fn populate_numbers(&self, game_id: &str) -> Result<GameState> {
        let action = AssignNumbersAction::new(shuffled_axis(), shuffled_axis());
        let applied = self.mutate(game_id, action.into()).await?;
        Ok(applied.state)
    }

    /// Locks or unlocks the board. Unlocking is always allowed; the lock
    /// gates the other mutations, not itself.
    pub async fn set_locked(&self, game_id: &str, locked: bool) -> Result<GameState> {
        let applied = self.mutate(game_id, SetLockedAction::new(locked).into()).await?;
        Ok(applied.state)
    }

    /// Hands `name` a palette color if it has none. Silent no-op when the
    /// game is absent; never bumps the revision.
    pub async fn assign_user_color(&self, game_id: &str, name: &str) {
        let slot = self.slot(game_id);
        let mut entry = slot.lock().await;
        self.reload_into(&mut entry, game_id, false).await;

        let Some(state) = entry.state.as_mut() else {
            return;
        };
        if state.assign_color(name) {
            self.persist_entry(&entry, game_id).await;
        }
    }

    /// The shared mutation cycle: reload and merge the durable copy, apply
    /// the action under the per-game lock, persist, and return the result.
    async fn mutate(&self, game_id: &str, kind: ActionKind) -> Result<Applied> {
        let slot = self.slot(game_id);
        let mut entry = slot.lock().await;
        self.reload_into(&mut entry, game_id, false).await;

        let Some(state) = entry.state.as_mut() else {
            return Err(SyncError::NotFound {
                game_id: game_id.to_owned(),
            });
        };

        let action = Action::new(kind);
        let receipt = GameEngine::new(state)
            .execute(&action)
            .map_err(SyncError::Rejected)?;
        let snapshot = state.clone();

        self.persist_entry(&entry, game_id).await;
        Ok(Applied {
            state: snapshot,
            receipt,
        })
    }
}

impl Default for GameService {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`GameService`] with flexible configuration.
pub struct GameServiceBuilder {
    config: SyncConfig,
    store: Option<Arc<dyn DurableStore>>,
}

impl GameServiceBuilder {
    fn new() -> Self {
        Self {
            config: SyncConfig::default(),
            store: None,
        }
    }

    /// Override coordinator configuration.
    pub fn config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject the durable backend. Without one the service runs memory-only.
    pub fn store(mut self, store: Arc<dyn DurableStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> GameService {
        GameService {
            config: self.config,
            store: self.store,
            games: StdMutex::new(HashMap::new()),
        }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn shuffled_axis() -> AxisNumbers {
    let mut axis: AxisNumbers = core::array::from_fn(|digit| digit as u8);
    axis.shuffle(&mut rand::thread_rng());
    axis
}
