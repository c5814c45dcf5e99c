//! Startup wiring for the six caches.
//!
//! [`new_container`] builds empty caches around one sink. [`load_container`] does the
//! same but first restores each cache from its persisted snapshot. A snapshot that
//! cannot be read is logged and replaced by an empty cache, so a corrupt file never
//! blocks startup.

use crate::core::{
    cache_type::CacheType,
    caches::{BranchCache, GitLocksCache, GitLogCache, GitStatusCache, GitUserCache, RepositoryInfoCache},
    container::CacheContainer,
    managed_cache::{CacheEnvironment, CacheSnapshot},
    persistence::{JsonFileStore, SnapshotSink},
    state::{BranchPayload, GitLock, GitLogEntry, GitStatus, RepositoryInfo, User},
};
use serde::de::DeserializeOwned;
use std::rc::Rc;

/// A sink able to persist every domain payload
pub trait DomainSink:
    SnapshotSink<BranchPayload>
    + SnapshotSink<Vec<GitLogEntry>>
    + SnapshotSink<RepositoryInfo>
    + SnapshotSink<GitStatus>
    + SnapshotSink<Vec<GitLock>>
    + SnapshotSink<Option<User>>
{
}

impl<T> DomainSink for T where
    T: SnapshotSink<BranchPayload>
        + SnapshotSink<Vec<GitLogEntry>>
        + SnapshotSink<RepositoryInfo>
        + SnapshotSink<GitStatus>
        + SnapshotSink<Vec<GitLock>>
        + SnapshotSink<Option<User>>
{
}

/// Container with six empty caches all writing through `sink`
pub fn new_container<S: DomainSink + 'static>(sink: Rc<S>, env: &CacheEnvironment) -> CacheContainer {
    let container = CacheContainer::new();

    container.bind_branch_cache(Rc::new(BranchCache::new(env, sink.clone())));
    container.bind_git_log_cache(Rc::new(GitLogCache::new(env, sink.clone())));
    container.bind_repository_info_cache(Rc::new(RepositoryInfoCache::new(env, sink.clone())));
    container.bind_git_status_cache(Rc::new(GitStatusCache::new(env, sink.clone())));
    container.bind_git_locks_cache(Rc::new(GitLocksCache::new(env, sink.clone())));
    container.bind_git_user_cache(Rc::new(GitUserCache::new(env, sink)));

    container
}

/// Container whose caches start from the snapshots found in `store`
pub fn load_container(store: Rc<JsonFileStore>, env: &CacheEnvironment) -> CacheContainer {
    let container = CacheContainer::new();

    container.bind_branch_cache(Rc::new(BranchCache::restore(
        env,
        store.clone(),
        restored(&store, CacheType::BranchCache),
    )));
    container.bind_git_log_cache(Rc::new(GitLogCache::restore(
        env,
        store.clone(),
        restored(&store, CacheType::GitLogCache),
    )));
    container.bind_repository_info_cache(Rc::new(RepositoryInfoCache::restore(
        env,
        store.clone(),
        restored(&store, CacheType::RepositoryInfoCache),
    )));
    container.bind_git_status_cache(Rc::new(GitStatusCache::restore(
        env,
        store.clone(),
        restored(&store, CacheType::GitStatusCache),
    )));
    container.bind_git_locks_cache(Rc::new(GitLocksCache::restore(
        env,
        store.clone(),
        restored(&store, CacheType::GitLocksCache),
    )));
    container.bind_git_user_cache(Rc::new(GitUserCache::restore(
        env,
        store.clone(),
        restored(&store, CacheType::GitUserCache),
    )));

    container
}

fn restored<P>(store: &JsonFileStore, cache_type: CacheType) -> CacheSnapshot<P>
where
    P: DeserializeOwned + Default,
{
    match store.load(cache_type) {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => CacheSnapshot::default(),
        Err(e) => {
            log::warn!(
                target: cache_type.log_target(),
                "Ignoring unreadable snapshot, starting empty: {e}"
            );
            CacheSnapshot::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::{Clock, ManualClock};
    use crate::core::error::Result;
    use crate::core::managed_cache::Cache;
    use crate::core::persistence::{MemorySink, NullSink};
    use crate::core::state::GitBranch;
    use chrono::{DateTime, TimeDelta, Utc};
    use tempfile::TempDir;

    fn env() -> (Rc<ManualClock>, CacheEnvironment) {
        let clock = Rc::new(ManualClock::default());
        let env = CacheEnvironment::with_ttl_ms(clock.clone(), 500);
        (clock, env)
    }

    #[test]
    fn test_new_container_binds_every_slot() {
        let (_clock, env) = env();
        let container = new_container(Rc::new(NullSink), &env);

        for cache_type in CacheType::ALL {
            assert!(container.is_bound(cache_type));
            assert_eq!(
                container.cache(cache_type).map(|cache| cache.cache_type()).ok(),
                Some(cache_type)
            );
        }
    }

    #[test]
    fn test_shared_sink_receives_every_domain() -> Result<()> {
        let (_clock, env) = env();
        let sink = Rc::new(MemorySink::new());
        let container = new_container(sink.clone(), &env);

        container.branch_cache()?.update(vec![GitBranch::new("main")], Vec::new());
        container.git_user_cache()?.update(None);

        assert_eq!(sink.save_count(CacheType::BranchCache), 1);
        assert_eq!(sink.save_count(CacheType::GitUserCache), 1);
        assert_eq!(sink.save_count(CacheType::GitLogCache), 0);
        Ok(())
    }

    #[test]
    fn test_load_container_restores_snapshots() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (clock, env) = env();
        let store = Rc::new(JsonFileStore::new(temp_dir.path()));

        {
            let container = new_container(store.clone(), &env);
            container.branch_cache()?.update(vec![GitBranch::new("main")], Vec::new());
        }

        let saved_at: DateTime<Utc> = clock.now();
        clock.advance(TimeDelta::milliseconds(100));

        let container = load_container(store, &env);
        let branch_cache = container.branch_cache()?;
        assert_eq!(branch_cache.last_updated_at(), saved_at);
        assert_eq!(branch_cache.local_branches(), vec![GitBranch::new("main")]);
        assert_eq!(container.git_log_cache()?.last_updated_at(), DateTime::<Utc>::UNIX_EPOCH);
        Ok(())
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (_clock, env) = env();
        let store = Rc::new(JsonFileStore::new(temp_dir.path()));
        std::fs::write(store.snapshot_path(CacheType::GitUserCache), "{ not json")?;

        let container = load_container(store, &env);
        let user_cache = container.git_user_cache()?;
        assert_eq!(user_cache.managed().snapshot(), CacheSnapshot::default());
        Ok(())
    }
}
