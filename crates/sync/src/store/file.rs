//! File-based DurableStore implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use squares_core::GameState;

use super::error::{Result, StoreError};
use super::DurableStore;

/// File-based implementation of [`DurableStore`].
///
/// Stores one `{game_id}.json` per game under the base directory. Writes go
/// through a temp file followed by an atomic rename so a crash mid-write
/// never leaves a truncated blob for the next reader.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `base_dir`, creating the directory if
    /// needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir).map_err(StoreError::Io)?;
        Ok(Self { base_dir })
    }

    /// Game ids double as file names, so only path-safe ids are accepted.
    fn game_path(&self, game_id: &str) -> Result<PathBuf> {
        let path_safe = !game_id.is_empty()
            && game_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !path_safe {
            return Err(StoreError::InvalidKey(game_id.to_owned()));
        }
        Ok(self.base_dir.join(format!("{game_id}.json")))
    }
}

#[async_trait]
impl DurableStore for FileStore {
    async fn load(&self, game_id: &str) -> Result<Option<GameState>> {
        let path = self.game_path(game_id)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(StoreError::Io(error)),
        };

        let state: GameState = serde_json::from_slice(&bytes)?;
        tracing::debug!(%game_id, path = %path.display(), "loaded game snapshot");
        Ok(Some(state))
    }

    async fn save(&self, game_id: &str, state: &GameState) -> Result<()> {
        let path = self.game_path(game_id)?;
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec(state)?;
        tokio::fs::write(&temp_path, bytes)
            .await
            .map_err(StoreError::Io)?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(StoreError::Io)?;

        tracing::debug!(%game_id, path = %path.display(), "saved game snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_through_real_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path()).expect("store creates its directory");

        let mut state = GameState::new("g1", "admin");
        state.touch_user("Alice", 42);
        state.assign_color("Alice");

        store.save("g1", &state).await.expect("save works");
        let loaded = store.load("g1").await.expect("load works");
        assert_eq!(loaded, Some(state));
    }

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path()).expect("store creates its directory");
        assert!(store.load("never-saved").await.expect("load works").is_none());
    }

    #[tokio::test]
    async fn path_hostile_ids_are_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path()).expect("store creates its directory");

        let err = store
            .load("../escape")
            .await
            .expect_err("id with path separators must be rejected");
        assert!(matches!(err, StoreError::InvalidKey(_)));

        let err = store
            .save("", &GameState::new("", "admin"))
            .await
            .expect_err("empty id must be rejected");
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }
}
