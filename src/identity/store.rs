//! Persisted client storage behind the session authority.
//!
//! The authority only ever touches two keys, `token` and `user`. Stores are
//! internally synchronized so one instance can be shared across the navigation
//! model, the request wrapper and the CLI through an `Arc`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Token,
    User,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Token => "token",
            StorageKey::User => "user",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistent storage is not available in this context")]
    Unavailable,
    #[error("session file {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("session file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait SessionStore: Send + Sync {
    fn read(&self, key: StorageKey) -> StoreResult<Option<String>>;
    fn write(&self, key: StorageKey, value: &str) -> StoreResult<()>;
    fn remove(&self, key: StorageKey) -> StoreResult<()>;
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<&'static str, String>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    /// Seed raw values, bypassing any encoding. Handy for stale or broken records.
    pub fn with_entries<I, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (StorageKey, V)>,
        V: Into<String>,
    {
        let store = Self::new();
        {
            let mut m = store.entries.write();
            for (k, v) in entries { m.insert(k.as_str(), v.into()); }
        }
        store
    }

    pub fn is_empty(&self) -> bool { self.entries.read().is_empty() }
}

impl SessionStore for MemoryStore {
    fn read(&self, key: StorageKey) -> StoreResult<Option<String>> {
        Ok(self.entries.read().get(key.as_str()).cloned())
    }

    fn write(&self, key: StorageKey, value: &str) -> StoreResult<()> {
        self.entries.write().insert(key.as_str(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> StoreResult<()> {
        self.entries.write().remove(key.as_str());
        Ok(())
    }
}

/// Store for contexts without persistent client storage (headless renders,
/// worker threads). Every call reports `Unavailable`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedStore;

impl SessionStore for DetachedStore {
    fn read(&self, _key: StorageKey) -> StoreResult<Option<String>> { Err(StoreError::Unavailable) }
    fn write(&self, _key: StorageKey, _value: &str) -> StoreResult<()> { Err(StoreError::Unavailable) }
    fn remove(&self, _key: StorageKey) -> StoreResult<()> { Err(StoreError::Unavailable) }
}

/// JSON key/value file, re-read on every access so that separate processes
/// (e.g. successive CLI invocations) observe each other's writes.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path { &self.path }

    fn load(&self) -> StoreResult<BTreeMap<String, String>> {
        if !self.path.exists() { return Ok(BTreeMap::new()); }
        let text = std::fs::read_to_string(&self.path)
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        if text.trim().is_empty() { return Ok(BTreeMap::new()); }
        serde_json::from_str(&text)
            .map_err(|e| StoreError::Corrupt { path: self.path.clone(), reason: e.to_string() })
    }

    fn save(&self, map: &BTreeMap<String, String>) -> StoreResult<()> {
        let io_err = |source| StoreError::Io { path: self.path.clone(), source };
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() { std::fs::create_dir_all(dir).map_err(io_err)?; }
        }
        let body = serde_json::to_string_pretty(map)
            .map_err(|e| StoreError::Corrupt { path: self.path.clone(), reason: e.to_string() })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(io_err)?;
        restrict_permissions(&tmp);
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }

    // A corrupt file is replaced wholesale on the next write.
    fn load_for_update(&self) -> StoreResult<BTreeMap<String, String>> {
        match self.load() {
            Err(StoreError::Corrupt { reason, .. }) => {
                debug!(target: "stockdash::session", path = %self.path.display(), %reason, "discarding corrupt session file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

impl SessionStore for FileStore {
    fn read(&self, key: StorageKey) -> StoreResult<Option<String>> {
        Ok(self.load()?.remove(key.as_str()))
    }

    fn write(&self, key: StorageKey, value: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock();
        let mut map = self.load_for_update()?;
        map.insert(key.as_str().to_string(), value.to_string());
        self.save(&map)
    }

    fn remove(&self, key: StorageKey) -> StoreResult<()> {
        let _guard = self.write_lock.lock();
        if !self.path.exists() { return Ok(()); }
        let mut map = self.load_for_update()?;
        map.remove(key.as_str());
        self.save(&map)
    }
}
