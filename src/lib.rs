//! Repo Mirror - TTL-validated, change-detecting snapshots of git repository state.
//!
//! Six caches mirror a repository's branches, log, status, locks, user identity and
//! remote/branch identity. Reads are synchronous and validate lazily against a TTL;
//! updates only notify subscribers when the data actually changed.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - The managed cache and the six domain caches
//! - The cache container and its tagged event bus
//! - The repository façade and the git-backed repository manager
//! - Snapshot persistence, configuration, and error types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    // Cache layer
    BranchCache,
    Cache,
    CacheContainer,
    CacheEnvironment,
    CacheSnapshot,
    CacheType,
    Clock,
    GitLocksCache,
    GitLogCache,
    GitStatusCache,
    GitUserCache,
    ManagedCache,
    ManualClock,
    RepositoryInfoCache,
    SubscriptionId,
    SystemClock,

    // Persistence
    JsonFileStore,
    NullSink,
    SnapshotSink,

    // Repository
    GitRepo,
    GitRepositoryManager,
    GitTask,
    Repository,
    RepositoryManager,

    // Error handling
    RepoMirrorError,
    Result,
};
