//! Snapshot persistence port and its implementations.
//!
//! Caches receive a [`SnapshotSink`] at construction and call it after every
//! `update`. The core never touches the file system itself.
//!
//! # Public API
//! - [`SnapshotSink`]: the "save now" hook a cache writes through
//! - [`JsonFileStore`]: one pretty-printed JSON file per cache domain
//! - [`MemorySink`]: in-memory sink that records what was saved
//! - [`NullSink`]: discards every snapshot
//!
//! # Layout
//! `JsonFileStore::for_repository` keys the directory on an md5 of the repository
//! path, so each repository gets its own set of six files.

use crate::core::{
    cache_type::CacheType,
    error::{RepoMirrorError, Result},
    managed_cache::CacheSnapshot,
};
use serde::{de::DeserializeOwned, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub trait SnapshotSink<P> {
    fn save(&self, cache_type: CacheType, snapshot: &CacheSnapshot<P>) -> Result<()>;
}

/// Sink that drops every snapshot
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl<P> SnapshotSink<P> for NullSink {
    fn save(&self, _cache_type: CacheType, _snapshot: &CacheSnapshot<P>) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at `<cache_home>/<md5 of repo_path>`
    pub fn for_repository(cache_home: &Path, repo_path: &Path) -> Self {
        let repo_hash = format!("{:x}", md5::compute(repo_path.to_string_lossy().as_bytes()));

        log::debug!("for_repository: repo_path = {repo_path:?}");
        log::debug!("for_repository: repo_hash = {repo_hash:?}");

        Self::new(cache_home.join(repo_hash))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn snapshot_path(&self, cache_type: CacheType) -> PathBuf {
        self.dir.join(cache_type.file_name())
    }

    /// Read the snapshot for `cache_type`; `Ok(None)` if it was never written
    pub fn load<P: DeserializeOwned>(&self, cache_type: CacheType) -> Result<Option<CacheSnapshot<P>>> {
        let path = self.snapshot_path(cache_type);

        if !path.exists() {
            log::debug!("Snapshot file does not exist: {}", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            log::error!("Failed to read snapshot file '{}': {}", path.display(), e);
            RepoMirrorError::cache_read_failed(&path, e)
        })?;

        let snapshot = serde_json::from_str(&content).map_err(|e| {
            log::error!("Failed to parse snapshot file '{}': {}", path.display(), e);
            RepoMirrorError::cache_parse_failed(&path, e)
        })?;

        log::debug!("Loaded {cache_type} snapshot from {}", path.display());
        Ok(Some(snapshot))
    }
}

impl<P: Serialize> SnapshotSink<P> for JsonFileStore {
    fn save(&self, cache_type: CacheType, snapshot: &CacheSnapshot<P>) -> Result<()> {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            log::error!(
                "Failed to create cache directory '{}': {}",
                self.dir.display(),
                e
            );
            return Err(RepoMirrorError::cache_directory_creation_failed(&self.dir, e));
        }

        let path = self.snapshot_path(cache_type);
        let json = serde_json::to_string_pretty(snapshot).map_err(|e| {
            log::error!("Failed to serialize {cache_type} snapshot: {e}");
            RepoMirrorError::cache_serialization_failed(e)
        })?;

        if let Err(e) = fs::write(&path, json) {
            log::error!("Failed to write snapshot file '{}': {}", path.display(), e);
            return Err(RepoMirrorError::cache_write_failed(&path, e));
        }

        log::debug!("Saved {cache_type} snapshot to {}", path.display());
        Ok(())
    }
}

/// Keeps the last saved snapshot of each domain as JSON, and counts saves
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: RefCell<HashMap<CacheType, (usize, serde_json::Value)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self, cache_type: CacheType) -> usize {
        self.saved
            .borrow()
            .get(&cache_type)
            .map(|(count, _)| *count)
            .unwrap_or(0)
    }

    pub fn last<P: DeserializeOwned>(&self, cache_type: CacheType) -> Result<Option<CacheSnapshot<P>>> {
        match self.saved.borrow().get(&cache_type) {
            Some((_, value)) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }
}

impl<P: Serialize> SnapshotSink<P> for MemorySink {
    fn save(&self, cache_type: CacheType, snapshot: &CacheSnapshot<P>) -> Result<()> {
        let value = serde_json::to_value(snapshot).map_err(RepoMirrorError::cache_serialization_failed)?;
        let mut saved = self.saved.borrow_mut();
        let entry = saved.entry(cache_type).or_insert((0, serde_json::Value::Null));
        entry.0 += 1;
        entry.1 = value;
        Ok(())
    }
}
