//! Core functionality for repo-mirror.
//!
//! This module holds the cache layer (managed caches, the six domain caches and
//! their container), the repository façade, and the git-backed manager that feeds
//! them, plus the config, persistence and output helpers the CLI is built on.

pub mod bootstrap;
pub mod cache_type;
pub mod caches;
pub mod clock;
pub mod colors;
pub mod command_init;
pub mod config;
pub mod container;
pub mod dirs;
pub mod error;
pub mod events;
pub mod git;
pub mod git_status;
pub mod managed_cache;
pub mod manager;
pub mod output;
pub mod persistence;
pub mod repository;
pub mod state;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{RepoMirrorError, Result};

// === Cache layer ===
// Generic TTL cache, the domain caches built on it, and the container over them
pub use cache_type::CacheType;
pub use caches::{BranchCache, GitLocksCache, GitLogCache, GitStatusCache, GitUserCache, RepositoryInfoCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use container::{CacheContainer, DomainCache};
pub use events::{EventRegistry, SubscriptionId};
pub use managed_cache::{Cache, CacheEnvironment, CachePayload, CacheSnapshot, ManagedCache, DEFAULT_TTL_MS};

// === Persistence ===
// Snapshot port and its implementations, plus startup wiring
pub use bootstrap::{load_container, new_container, DomainSink};
pub use persistence::{JsonFileStore, MemorySink, NullSink, SnapshotSink};

// === Repository ===
// Façade, manager trait, and the git-backed manager
pub use git::GitRepo;
pub use manager::{GitRepositoryManager, GitTask, RepositoryManager};
pub use repository::Repository;

// === Payload types ===
pub use git_status::GitFileStatus;
pub use state::{BranchPayload, GitBranch, GitLock, GitLogEntry, GitRemote, GitStatus, GitStatusEntry, RepositoryInfo, User};

// === Command initialization ===
pub use command_init::{MirrorCommandContext, MirrorCommandInit};
pub use config::MirrorConfig;

// === Output formatting ===
// Unified output formatting for consistent CLI presentation
pub use colors::{format_cache_age, format_status_entry, get_aligned_status, get_status_color_style};
pub use output::{print_error, print_field, print_info, print_muted, print_section_header, print_success};
