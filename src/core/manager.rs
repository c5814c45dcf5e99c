//! Repository manager: the component that feeds the caches.
//!
//! The [`RepositoryManager`] trait is what the [`Repository`](crate::core::Repository)
//! façade talks to. Reads go through its cache container; every mutating command is
//! returned as a [`GitTask`] that the caller runs when it chooses to.
//!
//! [`GitRepositoryManager`] is the git-backed implementation. `refresh` reads the
//! whole repository state with `git2` and pushes it into the six caches. Each task
//! spawns `git` and refreshes afterwards, so the caches follow whatever the command
//! changed.

use crate::core::{
    container::CacheContainer,
    error::Result,
    git::GitRepo,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A named, deferred unit of repository work
pub struct GitTask {
    name: String,
    work: Box<dyn FnOnce() -> Result<()>>,
}

impl GitTask {
    pub fn new<F>(name: impl Into<String>, work: F) -> Self
    where
        F: FnOnce() -> Result<()> + 'static,
    {
        Self {
            name: name.into(),
            work: Box::new(work),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(self) -> Result<()> {
        log::info!("Running task: {}", self.name);
        let result = (self.work)();
        if let Err(e) = &result {
            log::error!("Task '{}' failed: {e}", self.name);
        }
        result
    }
}

impl fmt::Debug for GitTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitTask").field("name", &self.name).finish()
    }
}

pub trait RepositoryManager {
    fn cache_container(&self) -> Rc<CacheContainer>;

    /// Re-read repository state and push it into the caches
    fn refresh(&self) -> Result<()>;

    fn commit_all_files(&self, message: &str, body: Option<&str>) -> GitTask;
    fn commit_files(&self, files: &[PathBuf], message: &str, body: Option<&str>) -> GitTask;
    fn remote_add(&self, remote: &str, url: &str) -> GitTask;
    fn remote_change(&self, remote: &str, url: &str) -> GitTask;
    fn pull(&self, remote: &str, branch: Option<&str>) -> GitTask;
    fn push(&self, remote: &str, branch: Option<&str>) -> GitTask;
    fn fetch(&self, remote: &str) -> GitTask;
    fn revert(&self, commit_id: &str) -> GitTask;
    fn lock_file(&self, path: &Path) -> GitTask;
    fn unlock_file(&self, path: &Path, force: bool) -> GitTask;
}

struct ManagerInner {
    git: GitRepo,
    container: Rc<CacheContainer>,
    log_limit: usize,
}

impl ManagerInner {
    fn refresh(&self) -> Result<()> {
        // Stale caches reset first, so unchanged data below counts as a fresh change
        self.container.validate_all()?;

        let locks = match self.git.locks() {
            Ok(locks) => locks,
            Err(e) => {
                log::debug!("Lock listing unavailable: {e}");
                Vec::new()
            }
        };
        let local_branches = self.git.local_branches()?;
        let remote_branches = self.git.remote_branches()?;
        let log = self.git.log(self.log_limit)?;
        let status = self.git.get_status()?;
        let user = self.git.user()?;
        let name = self.git.repository_name()?;
        let current_remote = self.git.current_remote()?;
        let current_branch = self.git.current_branch()?;

        self.container
            .branch_cache()?
            .update(local_branches, remote_branches);
        self.container.git_log_cache()?.update(log);
        self.container
            .repository_info_cache()?
            .update(name, current_remote, current_branch);
        self.container.git_status_cache()?.update(status);
        self.container.git_locks_cache()?.update(locks);
        self.container.git_user_cache()?.update(user);

        Ok(())
    }

    fn run_git(&self, args: &[String]) -> Result<()> {
        let output = self.git.execute_git_command(args)?;
        if !output.trim().is_empty() {
            log::debug!("{}", output.trim_end());
        }
        Ok(())
    }
}

/// [`RepositoryManager`] over a local git working tree
#[derive(Clone)]
pub struct GitRepositoryManager {
    inner: Rc<ManagerInner>,
}

impl GitRepositoryManager {
    pub fn new(git: GitRepo, container: Rc<CacheContainer>, log_limit: usize) -> Self {
        Self {
            inner: Rc::new(ManagerInner {
                git,
                container,
                log_limit,
            }),
        }
    }

    pub fn git(&self) -> &GitRepo {
        &self.inner.git
    }

    /// Task running `git <args>` and then refreshing the caches
    fn task(&self, name: &str, args: Vec<String>) -> GitTask {
        self.task_sequence(name, vec![args])
    }

    fn task_sequence(&self, name: &str, commands: Vec<Vec<String>>) -> GitTask {
        let inner = Rc::clone(&self.inner);
        GitTask::new(name, move || {
            for args in &commands {
                inner.run_git(args)?;
            }
            inner.refresh()
        })
    }
}

fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

fn commit_args(message: &str, body: Option<&str>) -> Vec<String> {
    let mut commit = args(["commit", "-m", message]);
    if let Some(body) = body.filter(|body| !body.trim().is_empty()) {
        commit.extend(args(["-m", body]));
    }
    commit
}

impl RepositoryManager for GitRepositoryManager {
    fn cache_container(&self) -> Rc<CacheContainer> {
        Rc::clone(&self.inner.container)
    }

    fn refresh(&self) -> Result<()> {
        log::debug!("Refreshing caches from {:?}", self.inner.git.workdir().ok());
        self.inner.refresh()
    }

    fn commit_all_files(&self, message: &str, body: Option<&str>) -> GitTask {
        self.task_sequence(
            "commit all files",
            vec![args(["add", "-A"]), commit_args(message, body)],
        )
    }

    fn commit_files(&self, files: &[PathBuf], message: &str, body: Option<&str>) -> GitTask {
        let mut add = args(["add", "--"]);
        add.extend(files.iter().map(|file| file.to_string_lossy().into_owned()));
        self.task_sequence("commit files", vec![add, commit_args(message, body)])
    }

    fn remote_add(&self, remote: &str, url: &str) -> GitTask {
        self.task("add remote", args(["remote", "add", remote, url]))
    }

    fn remote_change(&self, remote: &str, url: &str) -> GitTask {
        self.task("change remote", args(["remote", "set-url", remote, url]))
    }

    fn pull(&self, remote: &str, branch: Option<&str>) -> GitTask {
        let mut pull = args(["pull", remote]);
        pull.extend(branch.map(str::to_string));
        self.task("pull", pull)
    }

    fn push(&self, remote: &str, branch: Option<&str>) -> GitTask {
        let mut push = args(["push", remote]);
        push.extend(branch.map(str::to_string));
        self.task("push", push)
    }

    fn fetch(&self, remote: &str) -> GitTask {
        self.task("fetch", args(["fetch", remote]))
    }

    fn revert(&self, commit_id: &str) -> GitTask {
        self.task("revert", args(["revert", "--no-edit", commit_id]))
    }

    fn lock_file(&self, path: &Path) -> GitTask {
        let path = path.to_string_lossy();
        self.task("lock file", args(["lfs", "lock", &*path]))
    }

    fn unlock_file(&self, path: &Path, force: bool) -> GitTask {
        let path = path.to_string_lossy();
        let mut unlock = args(["lfs", "unlock", &*path]);
        if force {
            unlock.push("--force".to_string());
        }
        self.task("unlock file", unlock)
    }
}

impl fmt::Debug for GitRepositoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitRepositoryManager")
            .field("workdir", &self.inner.git.workdir().ok())
            .field("log_limit", &self.inner.log_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bootstrap::new_container;
    use crate::core::cache_type::CacheType;
    use crate::core::managed_cache::CacheEnvironment;
    use crate::core::persistence::NullSink;
    use std::cell::RefCell;
    use std::process::Command;
    use tempfile::TempDir;

    fn git(repo_path: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_path)
            .output()
            .expect("failed to spawn git");
        assert!(output.status.success(), "git {args:?} failed");
    }

    fn setup_manager() -> Result<(TempDir, GitRepositoryManager)> {
        let temp_dir = TempDir::new()?;
        let repo_path = temp_dir.path();
        git(repo_path, &["init", "-b", "main"]);
        git(repo_path, &["config", "user.name", "Test User"]);
        git(repo_path, &["config", "user.email", "test@example.com"]);
        std::fs::write(repo_path.join("README.md"), "# test")?;
        git(repo_path, &["add", "README.md"]);
        git(repo_path, &["commit", "-m", "Initial commit"]);

        // Long TTL keeps the caches fresh for the whole test
        let env = CacheEnvironment::with_ttl_ms(Rc::new(crate::core::clock::SystemClock), 60_000);
        let container = Rc::new(new_container(Rc::new(NullSink), &env));
        let manager = GitRepositoryManager::new(GitRepo::open(repo_path)?, container, 10);
        Ok((temp_dir, manager))
    }

    #[test]
    fn test_task_is_deferred_until_run() -> Result<()> {
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);
        let task = GitTask::new("mark", move || {
            *flag.borrow_mut() = true;
            Ok(())
        });

        assert_eq!(task.name(), "mark");
        assert!(!*ran.borrow());
        task.run()?;
        assert!(*ran.borrow());
        Ok(())
    }

    #[test]
    fn test_commit_args() {
        assert_eq!(commit_args("msg", None), vec!["commit", "-m", "msg"]);
        assert_eq!(commit_args("msg", Some("  ")), vec!["commit", "-m", "msg"]);
        assert_eq!(
            commit_args("msg", Some("body")),
            vec!["commit", "-m", "msg", "-m", "body"]
        );
    }

    #[test]
    fn test_refresh_fills_every_cache() -> Result<()> {
        let (_temp_dir, manager) = setup_manager()?;
        let container = manager.cache_container();
        let updated = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&updated);
        container.on_cache_updated(move |cache_type, _| seen.borrow_mut().push(cache_type));

        manager.refresh()?;

        let local = container.branch_cache()?.local_branches();
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].name, "main");
        assert!(local[0].is_active);

        let log = container.git_log_cache()?.log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].summary, "Initial commit");

        let info = container.repository_info_cache()?.info();
        assert_eq!(info.current_branch.map(|b| b.name), Some("main".to_string()));
        assert!(info.current_remote.is_none());
        assert!(!info.name.is_empty());

        let user = container.git_user_cache()?.user();
        assert_eq!(user.map(|u| u.name), Some("Test User".to_string()));

        assert!(updated.borrow().contains(&CacheType::BranchCache));
        assert!(updated.borrow().contains(&CacheType::GitLogCache));
        assert!(updated.borrow().contains(&CacheType::GitUserCache));
        Ok(())
    }

    #[test]
    fn test_second_refresh_without_changes_is_quiet() -> Result<()> {
        let (_temp_dir, manager) = setup_manager()?;
        let container = manager.cache_container();
        manager.refresh()?;

        let updated = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&updated);
        container.on_cache_updated(move |cache_type, _| seen.borrow_mut().push(cache_type));

        manager.refresh()?;
        assert!(updated.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn test_commit_task_updates_log() -> Result<()> {
        let (temp_dir, manager) = setup_manager()?;
        manager.refresh()?;
        std::fs::write(temp_dir.path().join("notes.txt"), "notes")?;

        let task = manager.commit_all_files("Add notes", Some("Longer description"));
        assert_eq!(task.name(), "commit all files");
        task.run()?;

        let log = manager.cache_container().git_log_cache()?.log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].summary, "Add notes");
        assert_eq!(log[0].description, "Longer description");
        assert!(manager.cache_container().git_status_cache()?.status().entries.is_empty());
        Ok(())
    }

    #[test]
    fn test_commit_files_only_commits_listed_paths() -> Result<()> {
        let (temp_dir, manager) = setup_manager()?;
        std::fs::write(temp_dir.path().join("a.txt"), "a")?;
        std::fs::write(temp_dir.path().join("b.txt"), "b")?;

        manager
            .commit_files(&[PathBuf::from("a.txt")], "Add a", None)
            .run()?;

        let status = manager.cache_container().git_status_cache()?.status();
        assert_eq!(status.entries.len(), 1);
        assert_eq!(status.entries[0].path, PathBuf::from("b.txt"));
        Ok(())
    }

    #[test]
    fn test_remote_add_and_change() -> Result<()> {
        let (_temp_dir, manager) = setup_manager()?;
        manager
            .remote_add("origin", "https://example.com/first.git")
            .run()?;

        let container = manager.cache_container();
        let info = container.repository_info_cache()?;
        assert_eq!(
            info.current_remote().map(|r| r.url),
            Some("https://example.com/first.git".to_string())
        );

        manager
            .remote_change("origin", "https://example.com/second.git")
            .run()?;
        assert_eq!(
            info.current_remote().map(|r| r.url),
            Some("https://example.com/second.git".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_failed_command_propagates() -> Result<()> {
        let (_temp_dir, manager) = setup_manager()?;
        let result = manager.fetch("no-such-remote").run();
        assert!(result.is_err());
        Ok(())
    }
}
