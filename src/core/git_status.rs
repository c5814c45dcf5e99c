//! Type-safe per-file git status.
//!
//! [`GitFileStatus`] classifies one working-tree or index change. It converts from
//! `git2::Status` flags and carries its own short code, human description and display
//! priority so the status snapshot can be ordered the same way `git status` groups
//! changes.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GitFileStatus {
    /// Modified file (M)
    Modified,
    /// Added/new file in index (A)
    Added,
    /// Deleted file (D)
    Deleted,
    /// Renamed file (R)
    Renamed,
    /// Type changed (T)
    TypeChanged,
    /// Untracked file (??)
    Untracked,
    /// Unmerged/conflicted file (UU)
    Unmerged,
}

impl GitFileStatus {
    /// Staged classification from git2 flags, if the index differs from HEAD
    pub fn from_git2_staged(flags: git2::Status) -> Option<GitFileStatus> {
        if flags.contains(git2::Status::INDEX_NEW) {
            return Some(GitFileStatus::Added);
        }
        if flags.contains(git2::Status::INDEX_MODIFIED) {
            return Some(GitFileStatus::Modified);
        }
        if flags.contains(git2::Status::INDEX_DELETED) {
            return Some(GitFileStatus::Deleted);
        }
        if flags.contains(git2::Status::INDEX_RENAMED) {
            return Some(GitFileStatus::Renamed);
        }
        if flags.contains(git2::Status::INDEX_TYPECHANGE) {
            return Some(GitFileStatus::TypeChanged);
        }

        None
    }

    /// Unstaged classification from git2 flags, if the working tree differs from the index
    pub fn from_git2_unstaged(flags: git2::Status) -> Option<GitFileStatus> {
        // Conflicts win over everything else in the working tree
        if flags.contains(git2::Status::CONFLICTED) {
            return Some(GitFileStatus::Unmerged);
        }
        if flags.contains(git2::Status::WT_NEW) {
            return Some(GitFileStatus::Untracked);
        }
        if flags.contains(git2::Status::WT_MODIFIED) {
            return Some(GitFileStatus::Modified);
        }
        if flags.contains(git2::Status::WT_DELETED) {
            return Some(GitFileStatus::Deleted);
        }
        if flags.contains(git2::Status::WT_RENAMED) {
            return Some(GitFileStatus::Renamed);
        }
        if flags.contains(git2::Status::WT_TYPECHANGE) {
            return Some(GitFileStatus::TypeChanged);
        }

        None
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GitFileStatus::Modified => "M",
            GitFileStatus::Added => "A",
            GitFileStatus::Deleted => "D",
            GitFileStatus::Renamed => "R",
            GitFileStatus::TypeChanged => "T",
            GitFileStatus::Untracked => "??",
            GitFileStatus::Unmerged => "UU",
        }
    }

    /// Sort priority: conflicts, then staged, then unstaged, then untracked
    pub fn sort_priority(&self, staged: bool) -> u8 {
        match (self, staged) {
            (GitFileStatus::Unmerged, _) => 0,
            (GitFileStatus::Added, true) => 1,
            (GitFileStatus::Modified, true) => 2,
            (GitFileStatus::Deleted, true) => 3,
            (GitFileStatus::Renamed, true) => 4,
            (GitFileStatus::TypeChanged, true) => 5,
            (GitFileStatus::Modified, false) => 6,
            (GitFileStatus::Deleted, false) => 7,
            (GitFileStatus::Renamed, false) => 8,
            (GitFileStatus::TypeChanged, false) => 9,
            (GitFileStatus::Untracked, _) => 10,
            _ => 11,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GitFileStatus::Modified => "modified",
            GitFileStatus::Added => "new",
            GitFileStatus::Deleted => "deleted",
            GitFileStatus::Renamed => "renamed",
            GitFileStatus::TypeChanged => "type changed",
            GitFileStatus::Untracked => "untracked",
            GitFileStatus::Unmerged => "both modified",
        }
    }
}

impl fmt::Display for GitFileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GitFileStatus::Modified.as_str(), "M");
        assert_eq!(GitFileStatus::Untracked.as_str(), "??");
        assert_eq!(GitFileStatus::Unmerged.as_str(), "UU");
        assert_eq!(format!("{}", GitFileStatus::Added), "A");
    }

    #[test]
    fn test_sort_priority() {
        assert_eq!(GitFileStatus::Unmerged.sort_priority(false), 0);
        assert!(
            GitFileStatus::Added.sort_priority(true) < GitFileStatus::Modified.sort_priority(false)
        );
        assert!(
            GitFileStatus::Untracked.sort_priority(false)
                > GitFileStatus::Modified.sort_priority(false)
        );
    }

    #[test]
    fn test_from_git2_flags() {
        assert_eq!(
            GitFileStatus::from_git2_staged(git2::Status::INDEX_NEW),
            Some(GitFileStatus::Added)
        );
        assert_eq!(
            GitFileStatus::from_git2_staged(git2::Status::WT_MODIFIED),
            None
        );
        assert_eq!(
            GitFileStatus::from_git2_unstaged(git2::Status::WT_NEW),
            Some(GitFileStatus::Untracked)
        );
        assert_eq!(
            GitFileStatus::from_git2_unstaged(git2::Status::CONFLICTED | git2::Status::WT_MODIFIED),
            Some(GitFileStatus::Unmerged)
        );
    }
}
