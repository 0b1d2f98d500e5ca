//! Persisted game records and where they are kept

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::game::Outcome;
use crate::moves::MoveRequest;
use crate::pieces::Color;

/// Everything needed to rebuild a game: the ply list is replayed, the rest
/// is restored verbatim
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: String,
    pub finished: bool,
    pub winner: Option<Color>,
    #[serde(default)]
    pub outcome: Outcome,
    pub moves: Vec<MoveRequest>,
    pub white_token: Option<String>,
    pub black_token: Option<String>,
}

/// Keyed storage for game records
pub trait GameStore: Send + Sync {
    fn save(&self, record: &GameRecord) -> Result<(), StoreError>;

    /// `Ok(None)` when no record exists for `id`
    fn load(&self, id: &str) -> Result<Option<GameRecord>, StoreError>;
}

// ============================================================================
// JSON FILES
// ============================================================================

/// One pretty-printed `<id>.json` per game in a directory
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        let valid = !id.is_empty()
            && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

impl GameStore for JsonFileStore {
    fn save(&self, record: &GameRecord) -> Result<(), StoreError> {
        let path = self.path_for(&record.id)?;
        std::fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(record)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<GameRecord>, StoreError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

// ============================================================================
// IN MEMORY
// ============================================================================

/// Records kept for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<FxHashMap<String, GameRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GameStore for MemoryStore {
    fn save(&self, record: &GameRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<GameRecord>, StoreError> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(id).cloned())
    }
}
