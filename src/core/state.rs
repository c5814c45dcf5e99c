//! Payload types held by the domain caches.
//!
//! Every type here is a plain value: `Clone`, structurally comparable with
//! `PartialEq`, serializable for snapshot files, and has a `Default` that stands for
//! "no data". Change detection in the caches is nothing more than `PartialEq` on
//! these types, so field order and list order are significant.
//!
//! # Public API
//! - [`GitBranch`], [`GitRemote`]: branch and remote identity
//! - [`GitLogEntry`]: one commit of the history
//! - [`GitStatus`], [`GitStatusEntry`]: working tree summary
//! - [`GitLock`]: a file lock held on the remote
//! - [`User`]: configured author identity
//! - [`BranchPayload`], [`RepositoryInfo`]: composite payloads

use crate::core::git_status::GitFileStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitBranch {
    pub name: String,
    /// Upstream branch, e.g. `origin/main`
    pub tracking: Option<String>,
    pub is_active: bool,
}

impl GitBranch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracking: None,
            is_active: false,
        }
    }
}

impl fmt::Display for GitBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tracking {
            Some(tracking) => write!(f, "{} -> {}", self.name, tracking),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRemote {
    pub name: String,
    pub url: String,
}

impl fmt::Display for GitRemote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLogEntry {
    pub commit_id: String,
    pub author_name: String,
    pub author_email: String,
    pub summary: String,
    pub description: String,
    pub time: DateTime<Utc>,
}

impl GitLogEntry {
    pub fn short_id(&self) -> &str {
        self.commit_id.get(..7).unwrap_or(&self.commit_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitStatusEntry {
    pub path: PathBuf,
    pub status: GitFileStatus,
    pub staged: bool,
}

/// Working tree summary for the checked out branch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitStatus {
    pub local_branch: Option<String>,
    pub remote_branch: Option<String>,
    pub ahead: usize,
    pub behind: usize,
    pub entries: Vec<GitStatusEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLock {
    pub id: String,
    pub path: PathBuf,
    pub owner: String,
    pub locked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name: {} Email: {}", self.name, self.email)
    }
}

/// Local and remote branch lists, compared list by list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchPayload {
    pub local: Vec<GitBranch>,
    pub remote: Vec<GitBranch>,
}

/// Name, current remote and current branch of the repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub current_remote: Option<GitRemote>,
    pub current_branch: Option<GitBranch>,
}
