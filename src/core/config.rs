use crate::core::clock::SystemClock;
use crate::core::dirs::{get_cache_directory, get_config_directory};
use crate::core::error::Result;
use crate::core::managed_cache::{CacheEnvironment, DEFAULT_TTL_MS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const DEFAULT_LOG_LIMIT: usize = 100;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MirrorConfig {
    /// Staleness window shared by every cache, in milliseconds
    pub ttl_ms: u64,
    /// Number of commits mirrored into the log cache
    pub log_limit: usize,
    /// Overrides the platform cache directory when set
    pub cache_dir: Option<PathBuf>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_TTL_MS,
            log_limit: DEFAULT_LOG_LIMIT,
            cache_dir: None,
        }
    }
}

impl MirrorConfig {
    pub fn config_file() -> Result<PathBuf> {
        Ok(get_config_directory()?.join("config.json"))
    }

    pub fn load_or_create() -> Result<Self> {
        let config_file = Self::config_file()?;

        if config_file.exists() {
            Self::load_from(&config_file)
        } else {
            let config = Self::default();
            config.save_to(&config_file)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Directory holding the per-repository snapshot directories
    pub fn cache_home(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_cache_directory(),
        }
    }

    pub fn environment(&self) -> CacheEnvironment {
        CacheEnvironment::with_ttl_ms(Rc::new(SystemClock), self.ttl_ms)
    }
}
