//! The six domain caches.
//!
//! Each type wraps a [`ManagedCache`] over its own payload and adds the update
//! signature and named getters that make sense for the domain. Getters validate
//! before reading, exactly like [`ManagedCache::payload`].
//!
//! | Cache | Payload | "No data" |
//! |---|---|---|
//! | [`BranchCache`] | [`BranchPayload`] | both lists empty |
//! | [`GitLogCache`] | `Vec<GitLogEntry>` | empty list |
//! | [`RepositoryInfoCache`] | [`RepositoryInfo`] | empty name, no remote, no branch |
//! | [`GitStatusCache`] | [`GitStatus`] | default record |
//! | [`GitLocksCache`] | `Vec<GitLock>` | empty list |
//! | [`GitUserCache`] | `Option<User>` | `None` |
//!
//! "Not fetched yet" and "fetched, nothing there" are the same value in every domain.

use crate::core::{
    cache_type::CacheType,
    events::SubscriptionId,
    managed_cache::{Cache, CacheEnvironment, CacheSnapshot, ManagedCache},
    persistence::SnapshotSink,
    state::{BranchPayload, GitBranch, GitLock, GitLogEntry, GitRemote, GitStatus, RepositoryInfo, User},
};
use chrono::{DateTime, Utc};
use std::rc::Rc;

/// Forwards [`Cache`] to the wrapped `inner` managed cache
macro_rules! delegate_cache {
    ($cache:ty) => {
        impl Cache for $cache {
            fn cache_type(&self) -> CacheType {
                self.inner.cache_type()
            }

            fn validate(&self) {
                self.inner.validate();
            }

            fn invalidate(&self) {
                self.inner.invalidate();
            }

            fn last_updated_at(&self) -> DateTime<Utc> {
                self.inner.last_updated_at()
            }

            fn last_verified_at(&self) -> DateTime<Utc> {
                self.inner.last_verified_at()
            }

            fn subscribe_invalidated(&self, handler: Box<dyn Fn()>) -> SubscriptionId {
                self.inner.on_invalidated(handler)
            }

            fn subscribe_updated(&self, handler: Box<dyn Fn(DateTime<Utc>)>) -> SubscriptionId {
                self.inner.on_updated(handler)
            }

            fn unsubscribe(&self, id: SubscriptionId) -> bool {
                self.inner.unsubscribe(id)
            }
        }
    };
}

#[derive(Debug)]
pub struct BranchCache {
    inner: ManagedCache<BranchPayload>,
}

impl BranchCache {
    pub fn new(env: &CacheEnvironment, sink: Rc<dyn SnapshotSink<BranchPayload>>) -> Self {
        Self::restore(env, sink, CacheSnapshot::default())
    }

    pub fn restore(
        env: &CacheEnvironment,
        sink: Rc<dyn SnapshotSink<BranchPayload>>,
        snapshot: CacheSnapshot<BranchPayload>,
    ) -> Self {
        Self {
            inner: ManagedCache::restore(CacheType::BranchCache, env, sink, snapshot),
        }
    }

    /// Replace both lists; one `updated` event if either list differs
    pub fn update(&self, local: Vec<GitBranch>, remote: Vec<GitBranch>) -> bool {
        self.inner.update(BranchPayload { local, remote })
    }

    pub fn local_branches(&self) -> Vec<GitBranch> {
        self.inner.read(|payload| payload.local.clone())
    }

    pub fn remote_branches(&self) -> Vec<GitBranch> {
        self.inner.read(|payload| payload.remote.clone())
    }

    pub fn managed(&self) -> &ManagedCache<BranchPayload> {
        &self.inner
    }
}

delegate_cache!(BranchCache);

#[derive(Debug)]
pub struct GitLogCache {
    inner: ManagedCache<Vec<GitLogEntry>>,
}

impl GitLogCache {
    pub fn new(env: &CacheEnvironment, sink: Rc<dyn SnapshotSink<Vec<GitLogEntry>>>) -> Self {
        Self::restore(env, sink, CacheSnapshot::default())
    }

    pub fn restore(
        env: &CacheEnvironment,
        sink: Rc<dyn SnapshotSink<Vec<GitLogEntry>>>,
        snapshot: CacheSnapshot<Vec<GitLogEntry>>,
    ) -> Self {
        Self {
            inner: ManagedCache::restore(CacheType::GitLogCache, env, sink, snapshot),
        }
    }

    pub fn update(&self, log: Vec<GitLogEntry>) -> bool {
        self.inner.update(log)
    }

    pub fn log(&self) -> Vec<GitLogEntry> {
        self.inner.payload()
    }

    pub fn managed(&self) -> &ManagedCache<Vec<GitLogEntry>> {
        &self.inner
    }
}

delegate_cache!(GitLogCache);

#[derive(Debug)]
pub struct RepositoryInfoCache {
    inner: ManagedCache<RepositoryInfo>,
}

impl RepositoryInfoCache {
    pub fn new(env: &CacheEnvironment, sink: Rc<dyn SnapshotSink<RepositoryInfo>>) -> Self {
        Self::restore(env, sink, CacheSnapshot::default())
    }

    pub fn restore(
        env: &CacheEnvironment,
        sink: Rc<dyn SnapshotSink<RepositoryInfo>>,
        snapshot: CacheSnapshot<RepositoryInfo>,
    ) -> Self {
        Self {
            inner: ManagedCache::restore(CacheType::RepositoryInfoCache, env, sink, snapshot),
        }
    }

    /// Replace all three fields; one `updated` event if any of them differs
    pub fn update(
        &self,
        name: impl Into<String>,
        current_remote: Option<GitRemote>,
        current_branch: Option<GitBranch>,
    ) -> bool {
        self.inner.update(RepositoryInfo {
            name: name.into(),
            current_remote,
            current_branch,
        })
    }

    pub fn repository_name(&self) -> String {
        self.inner.read(|info| info.name.clone())
    }

    pub fn current_remote(&self) -> Option<GitRemote> {
        self.inner.read(|info| info.current_remote.clone())
    }

    pub fn current_branch(&self) -> Option<GitBranch> {
        self.inner.read(|info| info.current_branch.clone())
    }

    pub fn info(&self) -> RepositoryInfo {
        self.inner.payload()
    }

    pub fn managed(&self) -> &ManagedCache<RepositoryInfo> {
        &self.inner
    }
}

delegate_cache!(RepositoryInfoCache);

#[derive(Debug)]
pub struct GitStatusCache {
    inner: ManagedCache<GitStatus>,
}

impl GitStatusCache {
    pub fn new(env: &CacheEnvironment, sink: Rc<dyn SnapshotSink<GitStatus>>) -> Self {
        Self::restore(env, sink, CacheSnapshot::default())
    }

    pub fn restore(
        env: &CacheEnvironment,
        sink: Rc<dyn SnapshotSink<GitStatus>>,
        snapshot: CacheSnapshot<GitStatus>,
    ) -> Self {
        Self {
            inner: ManagedCache::restore(CacheType::GitStatusCache, env, sink, snapshot),
        }
    }

    pub fn update(&self, status: GitStatus) -> bool {
        self.inner.update(status)
    }

    pub fn status(&self) -> GitStatus {
        self.inner.payload()
    }

    pub fn managed(&self) -> &ManagedCache<GitStatus> {
        &self.inner
    }
}

delegate_cache!(GitStatusCache);

#[derive(Debug)]
pub struct GitLocksCache {
    inner: ManagedCache<Vec<GitLock>>,
}

impl GitLocksCache {
    pub fn new(env: &CacheEnvironment, sink: Rc<dyn SnapshotSink<Vec<GitLock>>>) -> Self {
        Self::restore(env, sink, CacheSnapshot::default())
    }

    pub fn restore(
        env: &CacheEnvironment,
        sink: Rc<dyn SnapshotSink<Vec<GitLock>>>,
        snapshot: CacheSnapshot<Vec<GitLock>>,
    ) -> Self {
        Self {
            inner: ManagedCache::restore(CacheType::GitLocksCache, env, sink, snapshot),
        }
    }

    pub fn update(&self, locks: Vec<GitLock>) -> bool {
        self.inner.update(locks)
    }

    pub fn locks(&self) -> Vec<GitLock> {
        self.inner.payload()
    }

    pub fn managed(&self) -> &ManagedCache<Vec<GitLock>> {
        &self.inner
    }
}

delegate_cache!(GitLocksCache);

#[derive(Debug)]
pub struct GitUserCache {
    inner: ManagedCache<Option<User>>,
}

impl GitUserCache {
    pub fn new(env: &CacheEnvironment, sink: Rc<dyn SnapshotSink<Option<User>>>) -> Self {
        Self::restore(env, sink, CacheSnapshot::default())
    }

    pub fn restore(
        env: &CacheEnvironment,
        sink: Rc<dyn SnapshotSink<Option<User>>>,
        snapshot: CacheSnapshot<Option<User>>,
    ) -> Self {
        Self {
            inner: ManagedCache::restore(CacheType::GitUserCache, env, sink, snapshot),
        }
    }

    pub fn update(&self, user: Option<User>) -> bool {
        self.inner.update(user)
    }

    pub fn user(&self) -> Option<User> {
        self.inner.payload()
    }

    pub fn managed(&self) -> &ManagedCache<Option<User>> {
        &self.inner
    }
}

delegate_cache!(GitUserCache);
