//! Git repository reads and commands.
//!
//! [`GitRepo`] wraps `git2` to read everything the caches mirror, and spawns the
//! `git` binary for mutating commands so hooks, credentials and LFS behave exactly as
//! they do on the command line.
//!
//! # Public API
//! - [`GitRepo`]: open/discover a repository, read state, run git commands
//!
//! # Reads
//! - **Branches**: local and remote branch lists with upstream and HEAD flags
//! - **Log**: newest-first commit history, capped at a caller-given length
//! - **Status**: per-file changes ordered like `git status`, plus ahead/behind
//! - **Identity**: repository name, current branch, current remote, configured user
//! - **Locks**: `git lfs locks --json`, when LFS is available

use crate::core::{
    error::{RepoMirrorError, Result},
    git_status::GitFileStatus,
    state::{GitBranch, GitLock, GitLogEntry, GitRemote, GitStatus, GitStatusEntry, User},
};
use chrono::{DateTime, Utc};
use git2::{BranchType, Repository, Sort, StatusOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct GitRepo {
    repo: Repository,
}

#[derive(Debug, Deserialize)]
struct LfsLockOwner {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LfsLock {
    id: String,
    path: PathBuf,
    owner: Option<LfsLockOwner>,
    locked_at: Option<DateTime<Utc>>,
}

impl GitRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(GitRepo { repo })
    }

    pub fn get_repository(&self) -> &Repository {
        &self.repo
    }

    /// Working directory of the repository
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| RepoMirrorError::git_command_failed("Repository has no working directory"))
    }

    /// Execute `git <args>` in the working directory and return its stdout
    pub fn execute_git_command<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(self.workdir()?);

        log::debug!("Running {cmd:?}");
        let output = cmd.output()?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            return Err(RepoMirrorError::git_command_failed(error_msg.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Directory name of the working tree
    pub fn repository_name(&self) -> Result<String> {
        let workdir = self.workdir()?;
        let name = workdir
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or(RepoMirrorError::InvalidUtf8Path)?;
        Ok(name.to_string())
    }

    pub fn local_branches(&self) -> Result<Vec<GitBranch>> {
        let mut branches = Vec::new();

        for entry in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            let name = match branch.name()? {
                Some(name) => name.to_string(),
                None => continue,
            };
            let tracking = branch
                .upstream()
                .ok()
                .and_then(|upstream| upstream.name().ok().flatten().map(str::to_string));

            branches.push(GitBranch {
                name,
                tracking,
                is_active: branch.is_head(),
            });
        }

        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    pub fn remote_branches(&self) -> Result<Vec<GitBranch>> {
        let mut branches = Vec::new();

        for entry in self.repo.branches(Some(BranchType::Remote))? {
            let (branch, _) = entry?;
            let name = match branch.name()? {
                Some(name) if !name.ends_with("/HEAD") => name.to_string(),
                _ => continue,
            };

            branches.push(GitBranch {
                name,
                tracking: None,
                is_active: false,
            });
        }

        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    /// Checked out branch; `None` for a detached HEAD or an unborn repository
    pub fn current_branch(&self) -> Result<Option<GitBranch>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(_) => return Ok(None),
        };

        if !head.is_branch() {
            return Ok(None);
        }

        let Some(name) = head.shorthand() else {
            return Ok(None);
        };

        let branch = self.repo.find_branch(name, BranchType::Local)?;
        let tracking = branch
            .upstream()
            .ok()
            .and_then(|upstream| upstream.name().ok().flatten().map(str::to_string));

        Ok(Some(GitBranch {
            name: name.to_string(),
            tracking,
            is_active: true,
        }))
    }

    /// Remote of the current branch's upstream, else `origin`, else the first remote
    pub fn current_remote(&self) -> Result<Option<GitRemote>> {
        let remotes = self.repo.remotes()?;
        let remote_names: Vec<&str> = remotes.iter().flatten().collect();
        if remote_names.is_empty() {
            return Ok(None);
        }

        let upstream_remote = self
            .repo
            .head()
            .ok()
            .filter(|head| head.is_branch())
            .and_then(|head| head.name().map(str::to_string))
            .and_then(|refname| self.repo.branch_upstream_remote(&refname).ok())
            .and_then(|buf| buf.as_str().map(str::to_string));

        let name = upstream_remote
            .or_else(|| remote_names.iter().find(|n| **n == "origin").map(|n| n.to_string()))
            .unwrap_or_else(|| remote_names[0].to_string());

        let remote = self.repo.find_remote(&name)?;
        Ok(Some(GitRemote {
            name,
            url: remote.url().unwrap_or_default().to_string(),
        }))
    }

    /// Newest-first history from HEAD, at most `limit` entries
    pub fn log(&self, limit: usize) -> Result<Vec<GitLogEntry>> {
        let mut revwalk = self.repo.revwalk()?;
        if revwalk.push_head().is_err() {
            // No commits yet
            return Ok(Vec::new());
        }
        revwalk.set_sorting(Sort::TIME)?;

        let mut entries = Vec::new();
        for oid in revwalk.take(limit) {
            let commit = self.repo.find_commit(oid?)?;
            let author = commit.author();
            entries.push(GitLogEntry {
                commit_id: commit.id().to_string(),
                author_name: author.name().unwrap_or_default().to_string(),
                author_email: author.email().unwrap_or_default().to_string(),
                summary: commit.summary().unwrap_or_default().to_string(),
                description: commit.body().unwrap_or_default().trim().to_string(),
                time: DateTime::from_timestamp(commit.time().seconds(), 0).unwrap_or_default(),
            });
        }

        Ok(entries)
    }

    pub fn user(&self) -> Result<Option<User>> {
        let config = self.repo.config()?;
        let name = config.get_string("user.name").ok();
        let email = config.get_string("user.email").ok();

        if name.is_none() && email.is_none() {
            return Ok(None);
        }

        Ok(Some(User {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
        }))
    }

    pub fn get_status(&self) -> Result<GitStatus> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true);
        opts.include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut entries = Vec::new();

        for entry in statuses.iter() {
            let path = entry.path().ok_or(RepoMirrorError::InvalidUtf8Path)?;
            let flags = entry.status();
            let path_buf = PathBuf::from(path);

            if let Some(status) = GitFileStatus::from_git2_staged(flags) {
                entries.push(GitStatusEntry {
                    path: path_buf.clone(),
                    status,
                    staged: true,
                });
            }

            // A file can be both staged and modified again in the working tree
            if let Some(status) = GitFileStatus::from_git2_unstaged(flags) {
                entries.push(GitStatusEntry {
                    path: path_buf,
                    status,
                    staged: false,
                });
            }
        }

        entries.sort_by(|a, b| {
            a.status
                .sort_priority(a.staged)
                .cmp(&b.status.sort_priority(b.staged))
                .then_with(|| a.path.cmp(&b.path))
        });

        let current = self.current_branch()?;
        let (ahead, behind) = self.get_ahead_behind()?.unwrap_or((0, 0));

        Ok(GitStatus {
            local_branch: current.as_ref().map(|branch| branch.name.clone()),
            remote_branch: current.and_then(|branch| branch.tracking),
            ahead,
            behind,
            entries,
        })
    }

    /// Ahead/behind counts against the upstream, or `None` without an upstream
    pub fn get_ahead_behind(&self) -> Result<Option<(usize, usize)>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(_) => return Ok(None),
        };

        let local_oid = match head.target() {
            Some(oid) => oid,
            None => return Ok(None),
        };

        let branch_name = match head.shorthand() {
            Some(name) => name,
            None => return Ok(None),
        };

        let local_branch = match self.repo.find_branch(branch_name, BranchType::Local) {
            Ok(branch) => branch,
            Err(_) => return Ok(None),
        };

        let upstream_branch = match local_branch.upstream() {
            Ok(upstream) => upstream,
            Err(_) => return Ok(None),
        };

        let upstream_oid = match upstream_branch.get().target() {
            Some(oid) => oid,
            None => return Ok(None),
        };

        match self.repo.graph_ahead_behind(local_oid, upstream_oid) {
            Ok((ahead, behind)) => Ok(Some((ahead, behind))),
            Err(_) => Ok(None),
        }
    }

    /// Locks reported by `git lfs locks --json`
    pub fn locks(&self) -> Result<Vec<GitLock>> {
        let output = self.execute_git_command(["lfs", "locks", "--json"])?;
        parse_lfs_locks(&output)
    }
}

fn parse_lfs_locks(json: &str) -> Result<Vec<GitLock>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let locks: Vec<LfsLock> = serde_json::from_str(json)?;
    Ok(locks
        .into_iter()
        .map(|lock| GitLock {
            id: lock.id,
            path: lock.path,
            owner: lock.owner.map(|owner| owner.name).unwrap_or_default(),
            locked_at: lock.locked_at,
        })
        .collect())
}
