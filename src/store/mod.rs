pub mod migrate;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::UserRecord;

/// Storage key used by the original app for its single per-user blob.
pub const DEFAULT_KEY: &str = "arthamUserData";

/// Key-value persistence for user records. Every save replaces the whole
/// blob; the engine never sees this interface.
pub trait ProfileStore {
    fn load(&self, key: &str) -> Result<Option<UserRecord>>;
    fn save(&self, key: &str, record: &UserRecord) -> Result<()>;
}

/// File-backed store keeping one JSON document per key under a data
/// directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<UserRecord>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut blob: serde_json::Value = serde_json::from_str(&raw)
            .with_context(|| format!("malformed record in {}", path.display()))?;
        migrate::upgrade(&mut blob);
        let record = serde_json::from_value(blob)
            .with_context(|| format!("unreadable record in {}", path.display()))?;
        Ok(Some(record))
    }

    fn save(&self, key: &str, record: &UserRecord) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_for(key);
        let raw = serde_json::to_string_pretty(record).context("failed to encode record")?;
        fs::write(&path, raw).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}
