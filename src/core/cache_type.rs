//! Closed set of cache domains.
//!
//! [`CacheType`] is only a dispatch key and an event tag; it never influences what a
//! cache stores. [`CacheType::ALL`] fixes the order used by the container's bulk
//! operations so persistence writes happen in the same sequence on every run.

use crate::core::error::RepoMirrorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheType {
    BranchCache,
    GitLogCache,
    RepositoryInfoCache,
    GitStatusCache,
    GitLocksCache,
    GitUserCache,
}

impl CacheType {
    /// Every domain, in bulk-operation order
    pub const ALL: [CacheType; 6] = [
        CacheType::BranchCache,
        CacheType::GitLogCache,
        CacheType::RepositoryInfoCache,
        CacheType::GitStatusCache,
        CacheType::GitLocksCache,
        CacheType::GitUserCache,
    ];

    /// Position in [`CacheType::ALL`], used as the container's table index
    pub fn index(self) -> usize {
        match self {
            CacheType::BranchCache => 0,
            CacheType::GitLogCache => 1,
            CacheType::RepositoryInfoCache => 2,
            CacheType::GitStatusCache => 3,
            CacheType::GitLocksCache => 4,
            CacheType::GitUserCache => 5,
        }
    }

    /// Short name used on the command line and in messages
    pub fn as_str(self) -> &'static str {
        match self {
            CacheType::BranchCache => "branches",
            CacheType::GitLogCache => "log",
            CacheType::RepositoryInfoCache => "repository-info",
            CacheType::GitStatusCache => "status",
            CacheType::GitLocksCache => "locks",
            CacheType::GitUserCache => "user",
        }
    }

    /// File name of the persisted snapshot, relative to the repository cache directory
    pub fn file_name(self) -> &'static str {
        match self {
            CacheType::BranchCache => "branches.json",
            CacheType::GitLogCache => "gitlog.json",
            CacheType::RepositoryInfoCache => "repoinfo.json",
            CacheType::GitStatusCache => "status.json",
            CacheType::GitLocksCache => "locks.json",
            CacheType::GitUserCache => "user.json",
        }
    }

    /// `log` target each cache instance writes under
    pub fn log_target(self) -> &'static str {
        match self {
            CacheType::BranchCache => "repo_mirror::cache::branches",
            CacheType::GitLogCache => "repo_mirror::cache::log",
            CacheType::RepositoryInfoCache => "repo_mirror::cache::repository_info",
            CacheType::GitStatusCache => "repo_mirror::cache::status",
            CacheType::GitLocksCache => "repo_mirror::cache::locks",
            CacheType::GitUserCache => "repo_mirror::cache::user",
        }
    }
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CacheType {
    type Err = RepoMirrorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheType::ALL
            .into_iter()
            .find(|cache_type| cache_type.as_str() == s)
            .ok_or_else(|| RepoMirrorError::unknown_cache_type(s))
    }
}
