//! One handle over the six domain caches.
//!
//! The [`CacheContainer`] owns no payload. It holds one write-once slot per
//! [`CacheType`], a dispatch table from cache type to the bound cache's
//! [`Cache`] behaviour, and a tagged event bus:
//!
//! - `cache_invalidated(cache_type)`
//! - `cache_updated(cache_type, at)`
//!
//! Binding a cache subscribes two relays that re-fire the cache's untagged events
//! on the bus. A slot accepts exactly one cache; later binds are ignored, which keeps
//! the relays stable for the cache's lifetime and tolerates wiring code that runs
//! twice.

use crate::core::{
    cache_type::CacheType,
    caches::{BranchCache, GitLocksCache, GitLogCache, GitStatusCache, GitUserCache, RepositoryInfoCache},
    error::{RepoMirrorError, Result},
    events::{EventRegistry, SubscriptionId},
    managed_cache::Cache,
};
use chrono::{DateTime, Utc};
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

/// A domain cache tagged with its type, for [`CacheContainer::bind`]
#[derive(Debug, Clone)]
pub enum DomainCache {
    Branch(Rc<BranchCache>),
    GitLog(Rc<GitLogCache>),
    RepositoryInfo(Rc<RepositoryInfoCache>),
    GitStatus(Rc<GitStatusCache>),
    GitLocks(Rc<GitLocksCache>),
    GitUser(Rc<GitUserCache>),
}

impl DomainCache {
    pub fn cache_type(&self) -> CacheType {
        match self {
            DomainCache::Branch(_) => CacheType::BranchCache,
            DomainCache::GitLog(_) => CacheType::GitLogCache,
            DomainCache::RepositoryInfo(_) => CacheType::RepositoryInfoCache,
            DomainCache::GitStatus(_) => CacheType::GitStatusCache,
            DomainCache::GitLocks(_) => CacheType::GitLocksCache,
            DomainCache::GitUser(_) => CacheType::GitUserCache,
        }
    }
}

pub struct CacheContainer {
    branch_cache: OnceCell<Rc<BranchCache>>,
    git_log_cache: OnceCell<Rc<GitLogCache>>,
    repository_info_cache: OnceCell<Rc<RepositoryInfoCache>>,
    git_status_cache: OnceCell<Rc<GitStatusCache>>,
    git_locks_cache: OnceCell<Rc<GitLocksCache>>,
    git_user_cache: OnceCell<Rc<GitUserCache>>,
    table: [OnceCell<Rc<dyn Cache>>; 6],
    invalidated: Rc<EventRegistry<CacheType>>,
    updated: Rc<EventRegistry<(CacheType, DateTime<Utc>)>>,
}

impl CacheContainer {
    pub fn new() -> Self {
        Self {
            branch_cache: OnceCell::new(),
            git_log_cache: OnceCell::new(),
            repository_info_cache: OnceCell::new(),
            git_status_cache: OnceCell::new(),
            git_locks_cache: OnceCell::new(),
            git_user_cache: OnceCell::new(),
            table: Default::default(),
            invalidated: Rc::new(EventRegistry::new()),
            updated: Rc::new(EventRegistry::new()),
        }
    }

    /// Bind `cache` to its slot. Returns `false` if the slot was already bound.
    pub fn bind(&self, cache: DomainCache) -> bool {
        match cache {
            DomainCache::Branch(cache) => self.bind_branch_cache(cache),
            DomainCache::GitLog(cache) => self.bind_git_log_cache(cache),
            DomainCache::RepositoryInfo(cache) => self.bind_repository_info_cache(cache),
            DomainCache::GitStatus(cache) => self.bind_git_status_cache(cache),
            DomainCache::GitLocks(cache) => self.bind_git_locks_cache(cache),
            DomainCache::GitUser(cache) => self.bind_git_user_cache(cache),
        }
    }

    pub fn bind_branch_cache(&self, cache: Rc<BranchCache>) -> bool {
        self.bind_slot(&self.branch_cache, cache)
    }

    pub fn bind_git_log_cache(&self, cache: Rc<GitLogCache>) -> bool {
        self.bind_slot(&self.git_log_cache, cache)
    }

    pub fn bind_repository_info_cache(&self, cache: Rc<RepositoryInfoCache>) -> bool {
        self.bind_slot(&self.repository_info_cache, cache)
    }

    pub fn bind_git_status_cache(&self, cache: Rc<GitStatusCache>) -> bool {
        self.bind_slot(&self.git_status_cache, cache)
    }

    pub fn bind_git_locks_cache(&self, cache: Rc<GitLocksCache>) -> bool {
        self.bind_slot(&self.git_locks_cache, cache)
    }

    pub fn bind_git_user_cache(&self, cache: Rc<GitUserCache>) -> bool {
        self.bind_slot(&self.git_user_cache, cache)
    }

    fn bind_slot<T: Cache + 'static>(&self, slot: &OnceCell<Rc<T>>, cache: Rc<T>) -> bool {
        let cache_type = cache.cache_type();

        if slot.set(Rc::clone(&cache)).is_err() {
            log::debug!("{cache_type} cache already bound; ignoring second bind");
            return false;
        }

        let invalidated = Rc::clone(&self.invalidated);
        cache.subscribe_invalidated(Box::new(move || invalidated.emit(&cache_type)));

        let updated = Rc::clone(&self.updated);
        cache.subscribe_updated(Box::new(move |at| updated.emit(&(cache_type, at))));

        // The typed slot was empty, so the table slot is too
        let handle: Rc<dyn Cache> = cache;
        let _ = self.table[cache_type.index()].set(handle);

        log::debug!("Bound {cache_type} cache");
        true
    }

    pub fn is_bound(&self, cache_type: CacheType) -> bool {
        self.table[cache_type.index()].get().is_some()
    }

    /// Type-erased access to a bound cache
    pub fn cache(&self, cache_type: CacheType) -> Result<&Rc<dyn Cache>> {
        self.table[cache_type.index()]
            .get()
            .ok_or_else(|| RepoMirrorError::cache_not_bound(cache_type))
    }

    pub fn branch_cache(&self) -> Result<&Rc<BranchCache>> {
        Self::bound(&self.branch_cache, CacheType::BranchCache)
    }

    pub fn git_log_cache(&self) -> Result<&Rc<GitLogCache>> {
        Self::bound(&self.git_log_cache, CacheType::GitLogCache)
    }

    pub fn repository_info_cache(&self) -> Result<&Rc<RepositoryInfoCache>> {
        Self::bound(&self.repository_info_cache, CacheType::RepositoryInfoCache)
    }

    pub fn git_status_cache(&self) -> Result<&Rc<GitStatusCache>> {
        Self::bound(&self.git_status_cache, CacheType::GitStatusCache)
    }

    pub fn git_locks_cache(&self) -> Result<&Rc<GitLocksCache>> {
        Self::bound(&self.git_locks_cache, CacheType::GitLocksCache)
    }

    pub fn git_user_cache(&self) -> Result<&Rc<GitUserCache>> {
        Self::bound(&self.git_user_cache, CacheType::GitUserCache)
    }

    fn bound<T>(slot: &OnceCell<Rc<T>>, cache_type: CacheType) -> Result<&Rc<T>> {
        slot.get()
            .ok_or_else(|| RepoMirrorError::cache_not_bound(cache_type))
    }

    pub fn validate(&self, cache_type: CacheType) -> Result<()> {
        self.cache(cache_type)?.validate();
        Ok(())
    }

    pub fn invalidate(&self, cache_type: CacheType) -> Result<()> {
        self.cache(cache_type)?.invalidate();
        Ok(())
    }

    /// Validate every domain in [`CacheType::ALL`] order
    pub fn validate_all(&self) -> Result<()> {
        for cache_type in CacheType::ALL {
            self.validate(cache_type)?;
        }
        Ok(())
    }

    /// Invalidate every domain in [`CacheType::ALL`] order
    pub fn invalidate_all(&self) -> Result<()> {
        for cache_type in CacheType::ALL {
            self.invalidate(cache_type)?;
        }
        Ok(())
    }

    pub fn on_cache_invalidated<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(CacheType) + 'static,
    {
        self.invalidated.subscribe(move |cache_type| handler(*cache_type))
    }

    pub fn on_cache_updated<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(CacheType, DateTime<Utc>) + 'static,
    {
        self.updated
            .subscribe(move |(cache_type, at)| handler(*cache_type, *at))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.invalidated.unsubscribe(id) || self.updated.unsubscribe(id)
    }
}

impl Default for CacheContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CacheContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound: Vec<CacheType> = CacheType::ALL
            .into_iter()
            .filter(|cache_type| self.is_bound(*cache_type))
            .collect();
        f.debug_struct("CacheContainer")
            .field("bound", &bound)
            .field("invalidated", &self.invalidated)
            .field("updated", &self.updated)
            .finish()
    }
}
