//! Centralized initialization for CLI commands.
//!
//! Every command needs the same pipeline: find the repository, load the config,
//! restore the caches from disk, and bind a git-backed manager to a [`Repository`]
//! façade. [`MirrorCommandInit`] does that once and hands back a
//! [`MirrorCommandContext`].
//!
//! # Initialization Steps
//! 1. **Git repository validation**: ensure the directory is inside a working tree
//! 2. **Configuration**: load (or create) the config file
//! 3. **Cache restore**: rebuild the six caches from their snapshot files
//! 4. **Wiring**: bind a [`GitRepositoryManager`] to the repository façade

use crate::core::{
    bootstrap::load_container,
    config::MirrorConfig,
    container::CacheContainer,
    error::{RepoMirrorError, Result},
    git::GitRepo,
    manager::GitRepositoryManager,
    persistence::JsonFileStore,
    repository::Repository,
};
use std::env;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Everything a command needs to read or refresh the mirrored state
pub struct MirrorCommandContext {
    pub repository: Repository,
    pub container: Rc<CacheContainer>,
    pub store: Rc<JsonFileStore>,
    pub config: MirrorConfig,
}

pub struct MirrorCommandInit;

impl MirrorCommandInit {
    /// Initialize from the current directory and the user's config file
    pub fn initialize() -> Result<MirrorCommandContext> {
        let current_dir = env::current_dir()?;
        let config = MirrorConfig::load_or_create()?;
        Self::initialize_at(&current_dir, config)
    }

    /// Initialize for the repository containing `path` with an explicit config
    pub fn initialize_at(path: &Path, config: MirrorConfig) -> Result<MirrorCommandContext> {
        let git_repo = GitRepo::open(path).map_err(|_| RepoMirrorError::NotInGitRepo)?;
        let workdir: PathBuf = git_repo.workdir()?.to_path_buf();

        let store = Rc::new(JsonFileStore::for_repository(&config.cache_home()?, &workdir));
        log::debug!("Using snapshot directory: {}", store.dir().display());

        let env = config.environment();
        let container = Rc::new(load_container(store.clone(), &env));
        let manager = Rc::new(GitRepositoryManager::new(
            git_repo,
            container.clone(),
            config.log_limit,
        ));

        let repository = Repository::new(workdir);
        repository.initialize(manager);

        Ok(MirrorCommandContext {
            repository,
            container,
            store,
            config,
        })
    }
}
