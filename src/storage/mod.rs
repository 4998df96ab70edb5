//! Durable client-side key/value storage
//!
//! Stores data in:
//! - Linux: ~/.local/share/catalogue-browser/
//! - macOS: ~/Library/Application Support/catalogue-browser/
//! - Windows: %APPDATA%/catalogue-browser/

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const STORE_FILE: &str = "client_store.json";

/// String key/value store that outlives the process.
pub trait ClientStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: ClientStore + ?Sized> ClientStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// In-memory store for callers that keep state elsewhere (e.g. the browser).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl ClientStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Local storage manager backed by a JSON file in the data directory
pub struct LocalStorage {
    data_dir: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStorage {
    /// Initialize local storage, creating directories if needed
    pub fn new() -> Result<Self> {
        let primary = ProjectDirs::from("com", "forgemypc", "catalogue-browser")
            .context("Could not determine project directories")?;
        Self::open(primary.data_dir().to_path_buf())
    }

    /// Open (or create) the store under `data_dir`.
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let entries = load_entries(&data_dir.join(STORE_FILE))?;
        Ok(Self { data_dir, entries })
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }

    fn persist(&self) -> Result<()> {
        let path = self.store_path();
        let file = StoreFile {
            updated_at: Some(Utc::now()),
            entries: self.entries.clone(),
        };
        let json =
            serde_json::to_string_pretty(&file).context("Failed to serialize client store")?;

        let mut handle = open_private_file_overwrite(&path)
            .with_context(|| format!("Failed to create client store at {}", path.display()))?;
        handle
            .write_all(json.as_bytes())
            .with_context(|| format!("Failed to write client store to {}", path.display()))?;

        Ok(())
    }
}

impl ClientStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

/// Initialize storage and return instance
pub fn init_storage() -> Result<LocalStorage> {
    LocalStorage::new()
}

fn load_entries(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "client store unreadable");
            let _ = quarantine_corrupt_store(path);
            return Ok(BTreeMap::new());
        }
    };

    match serde_json::from_str::<StoreFile>(&content) {
        Ok(file) => Ok(file.entries),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "client store corrupt, starting empty");
            let _ = quarantine_corrupt_store(path);
            Ok(BTreeMap::new())
        }
    }
}

fn quarantine_corrupt_store(path: &Path) -> std::io::Result<()> {
    let invalid_path = path.with_extension("invalid");

    // Keep the file for troubleshooting; remove it if the rename fails so the
    // next write is not blocked.
    fs::rename(path, &invalid_path).or_else(|_| fs::remove_file(path))
}

fn open_private_file_overwrite(path: &Path) -> std::io::Result<std::fs::File> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    // Best-effort: restrict permissions at creation time on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)
}
