//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`RepoMirrorError`] which covers every failure mode of the
//! cache core, the persistence store and the git-backed repository manager. It uses
//! `thiserror` for ergonomic error definitions and includes constructors for the
//! variants that carry context.
//!
//! # Public API
//! - [`RepoMirrorError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, RepoMirrorError>`
//!
//! # Error Categories
//! - **Cache contract**: Unknown cache names, unbound container slots
//! - **Repository façade**: Missing manager, missing remote, blank arguments
//! - **Git operations**: Repository not found, git2 library errors, failed commands
//! - **Snapshot store**: Serialization, file system, parse errors

use crate::core::cache_type::CacheType;
use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for repo-mirror
#[derive(Error, Debug)]
pub enum RepoMirrorError {
    // Cache contract errors
    #[error("Unknown cache type: '{name}'. Expected one of: branches, log, repository-info, status, locks, user")]
    UnknownCacheType { name: String },

    #[error("No {cache_type} cache is bound to the container")]
    CacheNotBound { cache_type: CacheType },

    // Repository façade errors
    #[error("Repository has not been initialized with a repository manager")]
    RepositoryNotInitialized,

    #[error("Repository has no remote configured")]
    NoRemoteConfigured,

    #[error("Argument '{name}' must not be empty")]
    InvalidArgument { name: String },

    // Git repository errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Git repository error: {0}")]
    GitRepo(#[from] git2::Error),

    #[error("Invalid UTF-8 path in repository")]
    InvalidUtf8Path,

    #[error("git command failed: {message}")]
    GitCommandFailed { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Snapshot store errors
    #[error("Could not find cache directory")]
    CacheDirectoryNotFound,

    #[error("Failed to create cache directory '{path}': {source}")]
    CacheDirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize cache data: {source}")]
    CacheSerializationFailed { source: serde_json::Error },

    #[error("Failed to write cache file '{path}': {source}")]
    CacheWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read cache file '{path}': {source}")]
    CacheReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse cache file '{path}': {source}")]
    CacheParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    // JSON serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using RepoMirrorError
pub type Result<T> = std::result::Result<T, RepoMirrorError>;

impl RepoMirrorError {
    /// Create an unknown cache type error
    pub fn unknown_cache_type(name: impl Into<String>) -> Self {
        Self::UnknownCacheType { name: name.into() }
    }

    /// Create a cache not bound error
    pub fn cache_not_bound(cache_type: CacheType) -> Self {
        Self::CacheNotBound { cache_type }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(name: impl Into<String>) -> Self {
        Self::InvalidArgument { name: name.into() }
    }

    /// Create a git command failed error
    pub fn git_command_failed(message: impl Into<String>) -> Self {
        Self::GitCommandFailed {
            message: message.into(),
        }
    }

    /// Create a cache directory creation failed error
    pub fn cache_directory_creation_failed(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::CacheDirectoryCreationFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a cache serialization failed error
    pub fn cache_serialization_failed(source: serde_json::Error) -> Self {
        Self::CacheSerializationFailed { source }
    }

    /// Create a cache write failed error
    pub fn cache_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheWriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a cache read failed error
    pub fn cache_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a cache parse failed error
    pub fn cache_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::CacheParseFailed {
            path: path.into(),
            source,
        }
    }
}
