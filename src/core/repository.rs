//! Repository façade.
//!
//! [`Repository`] is the handle UI code holds. Properties read through to the cache
//! container of the bound [`RepositoryManager`], validating on every read; commands
//! are forwarded to the manager as [`GitTask`]s. A repository is identified by its
//! local path alone.

use crate::core::{
    container::CacheContainer,
    error::{RepoMirrorError, Result},
    manager::{GitTask, RepositoryManager},
    state::{GitBranch, GitLock, GitLogEntry, GitRemote, GitStatus, User},
};
use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub struct Repository {
    local_path: PathBuf,
    manager: OnceCell<Rc<dyn RepositoryManager>>,
}

impl Repository {
    pub fn new(local_path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: local_path.into(),
            manager: OnceCell::new(),
        }
    }

    /// Bind the manager. Only the first call has an effect; returns whether it did.
    pub fn initialize(&self, manager: Rc<dyn RepositoryManager>) -> bool {
        let bound = self.manager.set(manager).is_ok();
        if !bound {
            log::debug!(
                "Repository {} is already initialized",
                self.local_path.display()
            );
        }
        bound
    }

    pub fn is_initialized(&self) -> bool {
        self.manager.get().is_some()
    }

    fn manager(&self) -> Result<&Rc<dyn RepositoryManager>> {
        self.manager
            .get()
            .ok_or(RepoMirrorError::RepositoryNotInitialized)
    }

    fn container(&self) -> Result<Rc<CacheContainer>> {
        Ok(self.manager()?.cache_container())
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn name(&self) -> Result<String> {
        Ok(self.container()?.repository_info_cache()?.repository_name())
    }

    pub fn current_remote(&self) -> Result<Option<GitRemote>> {
        Ok(self.container()?.repository_info_cache()?.current_remote())
    }

    pub fn current_branch(&self) -> Result<Option<GitBranch>> {
        Ok(self.container()?.repository_info_cache()?.current_branch())
    }

    /// URL of the current remote
    pub fn clone_url(&self) -> Result<Option<String>> {
        Ok(self.current_remote()?.map(|remote| remote.url))
    }

    pub fn is_github(&self) -> Result<bool> {
        Ok(self
            .clone_url()?
            .is_some_and(|url| url.to_lowercase().contains("github.com")))
    }

    pub fn local_branches(&self) -> Result<Vec<GitBranch>> {
        Ok(self.container()?.branch_cache()?.local_branches())
    }

    pub fn remote_branches(&self) -> Result<Vec<GitBranch>> {
        Ok(self.container()?.branch_cache()?.remote_branches())
    }

    pub fn current_status(&self) -> Result<GitStatus> {
        Ok(self.container()?.git_status_cache()?.status())
    }

    pub fn current_locks(&self) -> Result<Vec<GitLock>> {
        Ok(self.container()?.git_locks_cache()?.locks())
    }

    pub fn log(&self) -> Result<Vec<GitLogEntry>> {
        Ok(self.container()?.git_log_cache()?.log())
    }

    pub fn user(&self) -> Result<Option<User>> {
        Ok(self.container()?.git_user_cache()?.user())
    }

    /// Ask the manager to re-read the repository. Does nothing before `initialize`.
    pub fn refresh(&self) -> Result<()> {
        match self.manager.get() {
            Some(manager) => manager.refresh(),
            None => Ok(()),
        }
    }

    pub fn commit_all_files(&self, message: &str, body: Option<&str>) -> Result<GitTask> {
        require("message", message)?;
        Ok(self.manager()?.commit_all_files(message, body))
    }

    pub fn commit_files(&self, files: &[PathBuf], message: &str, body: Option<&str>) -> Result<GitTask> {
        require("message", message)?;
        if files.is_empty() {
            return Err(RepoMirrorError::invalid_argument("files"));
        }
        Ok(self.manager()?.commit_files(files, message, body))
    }

    /// Add `remote` when no remote is configured yet, otherwise point it at `url`
    pub fn setup_remote(&self, remote: &str, url: &str) -> Result<GitTask> {
        require("remote", remote)?;
        require("url", url)?;

        let manager = self.manager()?;
        let has_remote = self
            .current_remote()?
            .is_some_and(|current| !current.name.trim().is_empty());

        if has_remote {
            Ok(manager.remote_change(remote, url))
        } else {
            Ok(manager.remote_add(remote, url))
        }
    }

    pub fn pull(&self) -> Result<GitTask> {
        let (remote, branch) = self.remote_and_branch()?;
        Ok(self.manager()?.pull(&remote, branch.as_deref()))
    }

    pub fn push(&self) -> Result<GitTask> {
        let (remote, branch) = self.remote_and_branch()?;
        Ok(self.manager()?.push(&remote, branch.as_deref()))
    }

    pub fn fetch(&self) -> Result<GitTask> {
        let (remote, _) = self.remote_and_branch()?;
        Ok(self.manager()?.fetch(&remote))
    }

    pub fn revert(&self, commit_id: &str) -> Result<GitTask> {
        require("commit_id", commit_id)?;
        Ok(self.manager()?.revert(commit_id))
    }

    pub fn request_lock(&self, path: &Path) -> Result<GitTask> {
        require("path", &path.to_string_lossy())?;
        Ok(self.manager()?.lock_file(path))
    }

    pub fn release_lock(&self, path: &Path, force: bool) -> Result<GitTask> {
        require("path", &path.to_string_lossy())?;
        Ok(self.manager()?.unlock_file(path, force))
    }

    fn remote_and_branch(&self) -> Result<(String, Option<String>)> {
        let remote = self
            .current_remote()?
            .ok_or(RepoMirrorError::NoRemoteConfigured)?;
        let branch = self.current_branch()?.map(|branch| branch.name);
        Ok((remote.name, branch))
    }
}

fn require(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RepoMirrorError::invalid_argument(name));
    }
    Ok(())
}

impl PartialEq for Repository {
    fn eq(&self, other: &Self) -> bool {
        self.local_path == other.local_path
    }
}

impl Eq for Repository {}

impl Hash for Repository {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.local_path.hash(state);
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name().unwrap_or_default();
        let url = self.clone_url().ok().flatten().unwrap_or_default();
        let branch = self
            .current_branch()
            .ok()
            .flatten()
            .map(|branch| branch.name)
            .unwrap_or_default();
        let remote = self
            .current_remote()
            .ok()
            .flatten()
            .map(|remote| remote.name)
            .unwrap_or_default();

        write!(
            f,
            "{name}\t{url}\t{}\t{branch}\t{remote}",
            self.local_path.display()
        )
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("local_path", &self.local_path)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
