//! Persistent tracked state
//!
//! Manages the `.floatlink/state.json` file which records every association
//! floatlink created or imported.

use crate::error::{CloudError, Result};
use crate::resource::AssociationState;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const STATE_VERSION: u32 = 1;
const STATE_DIR: &str = ".floatlink";
const STATE_FILE: &str = "state.json";
const STATE_STAGING: &str = "state.json.tmp";
const STATE_BACKUP: &str = "state.json.backup";
const LOCK_FILE: &str = "lock.json";

/// Age after which a lock left by a crashed run is replaced
pub const LOCK_STALE_AFTER: TimeDelta = TimeDelta::hours(1);

/// Contents of the state file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// State file version
    pub version: u32,

    /// Last modified timestamp
    pub updated_at: DateTime<Utc>,

    /// Associations indexed by configured name
    #[serde(default)]
    pub associations: BTreeMap<String, AssociationState>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            associations: BTreeMap::new(),
        }
    }
}

impl StateFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update an association
    pub fn set(&mut self, name: impl Into<String>, state: AssociationState) {
        self.associations.insert(name.into(), state);
        self.updated_at = Utc::now();
    }

    pub fn remove(&mut self, name: &str) -> Option<AssociationState> {
        let result = self.associations.remove(name);
        if result.is_some() {
            self.updated_at = Utc::now();
        }
        result
    }

    pub fn get(&self, name: &str) -> Option<&AssociationState> {
        self.associations.get(name)
    }

    /// Find the name tracking a floating IP id
    pub fn name_for_id(&self, id: &str) -> Option<&str> {
        self.associations
            .iter()
            .find(|(_, s)| s.id.as_deref() == Some(id))
            .map(|(name, _)| name.as_str())
    }
}

/// Reads and writes `.floatlink/` under the project root
pub struct StateManager {
    project_root: PathBuf,
}

impl StateManager {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    fn state_dir(&self) -> PathBuf {
        self.project_root.join(STATE_DIR)
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_dir().join(STATE_FILE)
    }

    fn staging_path(&self) -> PathBuf {
        self.state_dir().join(STATE_STAGING)
    }

    fn backup_path(&self) -> PathBuf {
        self.state_dir().join(STATE_BACKUP)
    }

    fn lock_path(&self) -> PathBuf {
        self.state_dir().join(LOCK_FILE)
    }

    async fn ensure_state_dir(&self) -> Result<()> {
        let dir = self.state_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            tracing::debug!(path = %dir.display(), "Created state directory");
        }
        Ok(())
    }

    /// Load the current state, empty when nothing was saved yet
    pub async fn load(&self) -> Result<StateFile> {
        let path = self.state_path();
        if !path.exists() {
            tracing::debug!("State file not found, returning empty state");
            return Ok(StateFile::new());
        }

        let content = fs::read_to_string(&path).await?;
        let state: StateFile = serde_json::from_str(&content)?;

        if state.version > STATE_VERSION {
            return Err(CloudError::StateError(format!(
                "State file version {} is newer than supported version {}",
                state.version, STATE_VERSION
            )));
        }

        tracing::debug!(associations = state.associations.len(), "Loaded state");
        Ok(state)
    }

    /// Save the state
    ///
    /// The new content is synced to a staging file and renamed over
    /// `state.json`, so a crash mid-save leaves the previous state readable.
    /// The previous state is copied to `state.json.backup` first.
    pub async fn save(&self, state: &StateFile) -> Result<()> {
        self.ensure_state_dir().await?;

        let path = self.state_path();
        let staging = self.staging_path();

        let content = serde_json::to_vec_pretty(state)?;
        let mut file = fs::File::create(&staging).await?;
        file.write_all(&content).await?;
        file.sync_all().await?;
        drop(file);

        if path.exists() {
            fs::copy(&path, self.backup_path()).await?;
        }
        fs::rename(&staging, &path).await?;

        tracing::debug!(associations = state.associations.len(), "Saved state");
        Ok(())
    }

    /// Take the lock file for exclusive access
    ///
    /// The file is created with `create_new`, so two processes racing for
    /// the lock cannot both win. A lock older than [`LOCK_STALE_AFTER`] or
    /// one that cannot be parsed is replaced.
    pub async fn acquire_lock(&self) -> Result<StateLock> {
        self.ensure_state_dir().await?;
        let lock_path = self.lock_path();

        match Self::create_lock(&lock_path).await {
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                self.clear_stale_lock(&lock_path).await?;
                Self::create_lock(&lock_path).await.map_err(|e| {
                    if e.kind() == std::io::ErrorKind::AlreadyExists {
                        CloudError::LockError("State lock was taken concurrently".to_string())
                    } else {
                        e.into()
                    }
                })?;
            }
            other => other?,
        }

        tracing::debug!(path = %lock_path.display(), "Acquired state lock");
        Ok(StateLock {
            lock_path: Some(lock_path),
        })
    }

    async fn create_lock(lock_path: &Path) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(lock_path)
            .await?;

        let info = LockInfo {
            holder: std::env::var("HOSTNAME")
                .or_else(|_| std::env::var("HOST"))
                .unwrap_or_else(|_| "unknown".to_string()),
            pid: std::process::id(),
            acquired_at: Utc::now(),
        };
        let content = serde_json::to_vec_pretty(&info).map_err(std::io::Error::other)?;
        file.write_all(&content).await?;
        file.sync_all().await
    }

    /// Remove an existing lock if it is stale, otherwise report the holder
    async fn clear_stale_lock(&self, lock_path: &Path) -> Result<()> {
        let content = fs::read_to_string(lock_path).await?;

        match serde_json::from_str::<LockInfo>(&content) {
            Ok(info) => {
                let age = Utc::now().signed_duration_since(info.acquired_at);
                if age < LOCK_STALE_AFTER {
                    return Err(CloudError::LockError(format!(
                        "State is locked by {} (pid {}) since {}",
                        info.holder, info.pid, info.acquired_at
                    )));
                }
                tracing::warn!(holder = %info.holder, pid = info.pid, "Removing stale state lock");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Removing unreadable state lock");
            }
        }

        fs::remove_file(lock_path).await?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    holder: String,
    #[serde(default)]
    pid: u32,
    acquired_at: DateTime<Utc>,
}

/// Held state lock, removed on release or drop
pub struct StateLock {
    lock_path: Option<PathBuf>,
}

impl StateLock {
    pub async fn release(mut self) -> Result<()> {
        if let Some(path) = self.lock_path.take() {
            fs::remove_file(&path).await?;
            tracing::debug!("Released state lock");
        }
        Ok(())
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if let Some(path) = self.lock_path.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
