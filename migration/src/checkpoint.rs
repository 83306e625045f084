use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use ethers::{types::Address, utils::to_checksum};
use serde_json::Value;

use crate::error::{MigrationError, Result};

/// Migration state, a JSON object of step-owned keys to recorded results
///
/// A present key means the artifact behind it already exists on-chain and must not be
/// produced again. Keys are only ever added during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Checkpoint(BTreeMap<String, Value>);

impl Checkpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn address(&self, key: &str) -> Result<Option<Address>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::String(value)) => value.parse().map(Some).map_err(|_| {
                MigrationError::CorruptCheckpoint(format!("`{key}` is not an address: {value}"))
            }),
            Some(other) => Err(MigrationError::CorruptCheckpoint(format!(
                "`{key}` is not an address: {other}"
            ))),
        }
    }

    /// Same as [`Checkpoint::address`], but an absent key means an upstream step never ran
    pub fn require_address(&self, key: &str) -> Result<Address> {
        self.address(key)?
            .ok_or_else(|| MigrationError::MissingDependency(key.to_string()))
    }

    pub fn record_address(&mut self, key: &str, address: Address) -> Result<()> {
        self.record(key, Value::String(to_checksum(&address, None)))
    }

    /// Writing the value a key already holds is a no-op, any other overwrite is refused
    pub fn record(&mut self, key: &str, value: Value) -> Result<()> {
        match self.0.get(key) {
            Some(existing) if existing == &value => Ok(()),
            Some(existing) => Err(MigrationError::CheckpointConflict {
                key: key.to_string(),
                existing: existing.to_string(),
            }),
            None => {
                self.0.insert(key.to_string(), value);
                Ok(())
            }
        }
    }
}

impl FromIterator<(String, Value)> for Checkpoint {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Durable home of the migration state, owned by a single migrator for the whole run
pub trait CheckpointStore: Send + Sync {
    fn load(&self) -> Result<Checkpoint>;
    fn save(&self, state: &Checkpoint) -> Result<()>;
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn persist_error(&self, source: std::io::Error) -> MigrationError {
        MigrationError::Persist {
            path: self.path.clone(),
            source,
        }
    }
}

impl CheckpointStore for JsonFileStore {
    fn load(&self) -> Result<Checkpoint> {
        if !self.path.exists() {
            return Ok(Checkpoint::new());
        }
        let content = fs::read(&self.path).map_err(|e| {
            MigrationError::CorruptCheckpoint(format!("{}: {e}", self.path.display()))
        })?;
        serde_json::from_slice(&content).map_err(|e| {
            MigrationError::CorruptCheckpoint(format!("{}: {e}", self.path.display()))
        })
    }

    // A crash between write and rename leaves the previous state file untouched
    fn save(&self, state: &Checkpoint) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.persist_error(e))?;
            }
        }
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| self.persist_error(std::io::Error::other(e)))?;
        let temp = self.temp_path();
        fs::write(&temp, content).map_err(|e| self.persist_error(e))?;
        fs::rename(&temp, &self.path).map_err(|e| self.persist_error(e))
    }
}

/// In-process store, keeps the last saved state and how many saves happened
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    state: Option<Checkpoint>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: Checkpoint) -> Self {
        Self {
            inner: Mutex::new(MemoryStoreInner {
                state: Some(state),
                saves: 0,
            }),
        }
    }

    pub fn saved(&self) -> Option<Checkpoint> {
        self.lock().state.clone()
    }

    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CheckpointStore for MemoryStore {
    fn load(&self) -> Result<Checkpoint> {
        Ok(self.lock().state.clone().unwrap_or_default())
    }

    fn save(&self, state: &Checkpoint) -> Result<()> {
        let mut inner = self.lock();
        inner.state = Some(state.clone());
        inner.saves += 1;
        Ok(())
    }
}
