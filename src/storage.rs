// Persistent workspace selection. In the browser this was a single
// localStorage key; here the same contract sits behind a trait so tests can
// swap in an in-memory store. Last writer wins, no locking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::AppResult;

/// The single persisted key, kept byte-for-byte from the web client.
pub const SELECTION_KEY: &str = "currentWorkspaceId";

pub trait SelectionStore: Send + Sync {
    fn get(&self) -> AppResult<Option<String>>;
    fn set(&self, workspace_id: &str) -> AppResult<()>;
    fn clear(&self) -> AppResult<()>;
}

/// File-backed store: a small JSON object at a configured path.
pub struct FileSelectionStore {
    path: PathBuf,
}

impl FileSelectionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileSelectionStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_map(&self) -> AppResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_map(&self, map: &HashMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(map)?)?;
        Ok(())
    }
}

impl SelectionStore for FileSelectionStore {
    fn get(&self) -> AppResult<Option<String>> {
        Ok(self.read_map()?.get(SELECTION_KEY).cloned())
    }

    fn set(&self, workspace_id: &str) -> AppResult<()> {
        let mut map = self.read_map()?;
        map.insert(SELECTION_KEY.to_string(), workspace_id.to_string());
        self.write_map(&map)
    }

    fn clear(&self) -> AppResult<()> {
        let mut map = self.read_map()?;
        if map.remove(SELECTION_KEY).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySelectionStore {
    inner: Mutex<Option<String>>,
}

impl MemorySelectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStore for MemorySelectionStore {
    fn get(&self) -> AppResult<Option<String>> {
        Ok(self.inner.lock().unwrap().clone())
    }

    fn set(&self, workspace_id: &str) -> AppResult<()> {
        *self.inner.lock().unwrap() = Some(workspace_id.to_string());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        *self.inner.lock().unwrap() = None;
        Ok(())
    }
}
