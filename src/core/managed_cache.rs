//! TTL-validated, change-detecting value holder.
//!
//! A [`ManagedCache`] owns one payload plus two timestamps and raises two events:
//!
//! - `updated(at)` fires if and only if an `update` call replaced the payload with a
//!   value that compares unequal to the stored one.
//! - `invalidated()` fires on every `invalidate` call, before the cache is reset to
//!   the payload's `Default`.
//!
//! Staleness is pull-based. Every payload read runs [`ManagedCache::validate`], and a
//! payload whose last *change* is older than the TTL is invalidated on the spot.
//! There is no timer.
//!
//! # Ordering
//! `update` writes the new state and releases every internal borrow, then persists,
//! then notifies. A subscriber that calls back into the same cache observes the new
//! state and cannot trip a `RefCell` conflict.
//!
//! While an invalidation is in flight, `validate` and nested `invalidate` calls are
//! no-ops. An `invalidated` subscriber that reads the payload sees the value that is
//! about to be reset.

use crate::core::{
    cache_type::CacheType,
    clock::{Clock, SystemClock},
    events::{EventRegistry, SubscriptionId},
    persistence::SnapshotSink,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Staleness window used when nothing else is configured
pub const DEFAULT_TTL_MS: u64 = 500;

/// Anything a cache can hold. `Default` is the "no data" value.
pub trait CachePayload: Clone + PartialEq + Default + fmt::Debug + 'static {}

impl<T> CachePayload for T where T: Clone + PartialEq + Default + fmt::Debug + 'static {}

/// Persisted form of a cache: payload plus both timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot<P> {
    pub payload: P,
    pub last_updated_at: DateTime<Utc>,
    pub last_verified_at: DateTime<Utc>,
}

impl<P: Default> Default for CacheSnapshot<P> {
    /// Empty payload stamped at the Unix epoch, so the first read revalidates
    fn default() -> Self {
        Self {
            payload: P::default(),
            last_updated_at: DateTime::<Utc>::default(),
            last_verified_at: DateTime::<Utc>::default(),
        }
    }
}

/// Clock and TTL shared by every cache of a session
#[derive(Clone)]
pub struct CacheEnvironment {
    pub clock: Rc<dyn Clock>,
    pub ttl: TimeDelta,
}

impl CacheEnvironment {
    pub fn new(clock: Rc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self { clock, ttl }
    }

    pub fn with_ttl_ms(clock: Rc<dyn Clock>, ttl_ms: u64) -> Self {
        let ttl = i64::try_from(ttl_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX);
        Self::new(clock, ttl)
    }
}

impl Default for CacheEnvironment {
    fn default() -> Self {
        Self::with_ttl_ms(Rc::new(SystemClock), DEFAULT_TTL_MS)
    }
}

impl fmt::Debug for CacheEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEnvironment")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Behaviour every domain cache exposes, independent of its payload type.
///
/// Object safe; the container dispatches through `Rc<dyn Cache>`.
pub trait Cache {
    fn cache_type(&self) -> CacheType;
    fn validate(&self);
    fn invalidate(&self);
    fn last_updated_at(&self) -> DateTime<Utc>;
    fn last_verified_at(&self) -> DateTime<Utc>;
    fn subscribe_invalidated(&self, handler: Box<dyn Fn()>) -> SubscriptionId;
    fn subscribe_updated(&self, handler: Box<dyn Fn(DateTime<Utc>)>) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

pub struct ManagedCache<P> {
    cache_type: CacheType,
    state: RefCell<CacheSnapshot<P>>,
    invalidating: Cell<bool>,
    env: CacheEnvironment,
    sink: Rc<dyn SnapshotSink<P>>,
    invalidated: EventRegistry<()>,
    updated: EventRegistry<DateTime<Utc>>,
}

impl<P: CachePayload> ManagedCache<P> {
    pub fn new(cache_type: CacheType, env: &CacheEnvironment, sink: Rc<dyn SnapshotSink<P>>) -> Self {
        Self::restore(cache_type, env, sink, CacheSnapshot::default())
    }

    /// Rebuild a cache from a previously persisted snapshot
    pub fn restore(
        cache_type: CacheType,
        env: &CacheEnvironment,
        sink: Rc<dyn SnapshotSink<P>>,
        snapshot: CacheSnapshot<P>,
    ) -> Self {
        Self {
            cache_type,
            state: RefCell::new(snapshot),
            invalidating: Cell::new(false),
            env: env.clone(),
            sink,
            invalidated: EventRegistry::new(),
            updated: EventRegistry::new(),
        }
    }

    pub fn cache_type(&self) -> CacheType {
        self.cache_type
    }

    pub fn ttl(&self) -> TimeDelta {
        self.env.ttl
    }

    /// Store `payload`, returning whether it differed from the current one.
    ///
    /// `last_verified_at` always advances and the snapshot is always persisted;
    /// `last_updated_at` and the `updated` event only follow a real change.
    pub fn update(&self, payload: P) -> bool {
        let target = self.cache_type.log_target();
        let now = self.env.clock.now();

        let changed = {
            let mut state = self.state.borrow_mut();
            let changed = state.payload != payload;
            if changed {
                state.payload = payload;
                state.last_updated_at = now;
            }
            state.last_verified_at = now;
            changed
        };

        self.persist();

        if changed {
            log::debug!(target: target, "payload changed at {now}");
            self.updated.emit(&now);
        } else {
            log::trace!(target: target, "payload verified unchanged at {now}");
        }

        changed
    }

    /// Invalidate if the payload has not changed for longer than the TTL
    pub fn validate(&self) {
        if !self.invalidating.get() && self.is_stale() {
            self.invalidate();
        }
    }

    /// Announce invalidation, then reset to the empty payload
    pub fn invalidate(&self) {
        let target = self.cache_type.log_target();
        if self.invalidating.replace(true) {
            log::trace!(target: target, "already invalidating");
            return;
        }

        log::debug!(target: target, "invalidating");
        self.invalidated.emit(&());
        self.update(P::default());
        self.invalidating.set(false);
    }

    pub fn is_stale(&self) -> bool {
        let now = self.env.clock.now();
        now.signed_duration_since(self.last_updated_at()) > self.env.ttl
    }

    /// Validated copy of the payload
    pub fn payload(&self) -> P {
        self.read(P::clone)
    }

    /// Validate, then project the payload. `f` must not call back into this cache.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        self.validate();
        f(&self.state.borrow().payload)
    }

    pub fn last_updated_at(&self) -> DateTime<Utc> {
        self.state.borrow().last_updated_at
    }

    pub fn last_verified_at(&self) -> DateTime<Utc> {
        self.state.borrow().last_verified_at
    }

    /// Current state as stored, without validating
    pub fn snapshot(&self) -> CacheSnapshot<P> {
        self.state.borrow().clone()
    }

    pub fn on_invalidated<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn() + 'static,
    {
        self.invalidated.subscribe(move |_| handler())
    }

    pub fn on_updated<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(DateTime<Utc>) + 'static,
    {
        self.updated.subscribe(move |at| handler(*at))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.invalidated.unsubscribe(id) || self.updated.unsubscribe(id)
    }

    fn persist(&self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.sink.save(self.cache_type, &snapshot) {
            log::warn!(
                target: self.cache_type.log_target(),
                "Snapshot save failed (cache stays in memory): {e}"
            );
        }
    }
}

impl<P: CachePayload> Cache for ManagedCache<P> {
    fn cache_type(&self) -> CacheType {
        self.cache_type
    }

    fn validate(&self) {
        ManagedCache::validate(self);
    }

    fn invalidate(&self) {
        ManagedCache::invalidate(self);
    }

    fn last_updated_at(&self) -> DateTime<Utc> {
        ManagedCache::last_updated_at(self)
    }

    fn last_verified_at(&self) -> DateTime<Utc> {
        ManagedCache::last_verified_at(self)
    }

    fn subscribe_invalidated(&self, handler: Box<dyn Fn()>) -> SubscriptionId {
        self.on_invalidated(handler)
    }

    fn subscribe_updated(&self, handler: Box<dyn Fn(DateTime<Utc>)>) -> SubscriptionId {
        self.on_updated(handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        ManagedCache::unsubscribe(self, id)
    }
}

impl<P: fmt::Debug> fmt::Debug for ManagedCache<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedCache")
            .field("cache_type", &self.cache_type)
            .field("state", &self.state)
            .field("ttl", &self.env.ttl)
            .field("invalidated", &self.invalidated)
            .field("updated", &self.updated)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::error::{RepoMirrorError, Result};
    use crate::core::persistence::{MemorySink, NullSink};
    use std::cell::{Cell, RefCell};
    use std::rc::Weak;

    struct Harness {
        clock: Rc<ManualClock>,
        sink: Rc<MemorySink>,
        cache: Rc<ManagedCache<Vec<String>>>,
        invalidations: Rc<Cell<usize>>,
        updates: Rc<RefCell<Vec<DateTime<Utc>>>>,
    }

    fn harness() -> Harness {
        let clock = Rc::new(ManualClock::default());
        let sink = Rc::new(MemorySink::new());
        let env = CacheEnvironment::with_ttl_ms(clock.clone(), DEFAULT_TTL_MS);
        let cache = Rc::new(ManagedCache::new(CacheType::GitLogCache, &env, sink.clone()));

        let invalidations = Rc::new(Cell::new(0));
        let counter = Rc::clone(&invalidations);
        cache.on_invalidated(move || counter.set(counter.get() + 1));

        let updates = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&updates);
        cache.on_updated(move |at| recorder.borrow_mut().push(at));

        Harness {
            clock,
            sink,
            cache,
            invalidations,
            updates,
        }
    }

    fn items(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_fresh_cache_is_empty_and_epoch_stamped() {
        let h = harness();
        let snapshot = h.cache.snapshot();
        assert!(snapshot.payload.is_empty());
        assert_eq!(snapshot.last_updated_at, DateTime::<Utc>::default());
        assert_eq!(snapshot.last_verified_at, DateTime::<Utc>::default());
    }

    #[test]
    fn test_update_with_same_payload_is_noop_verification() {
        let h = harness();
        let payload = items(&["A", "B"]);

        assert!(h.cache.update(payload.clone()));
        let first_updated = h.cache.last_updated_at();

        h.clock.advance(TimeDelta::milliseconds(100));
        assert!(!h.cache.update(payload));

        assert_eq!(h.cache.last_updated_at(), first_updated);
        assert_eq!(h.cache.last_verified_at(), h.clock.now());
        assert_eq!(h.updates.borrow().len(), 1);
        assert_eq!(h.sink.save_count(CacheType::GitLogCache), 2);
    }

    #[test]
    fn test_update_with_different_payload_fires_once() {
        let h = harness();
        h.cache.update(items(&["A", "B"]));
        let before = h.cache.last_updated_at();

        h.clock.advance(TimeDelta::milliseconds(10));
        h.cache.update(items(&["A", "C"]));

        assert_eq!(h.updates.borrow().len(), 2);
        assert!(h.cache.last_updated_at() > before);
        assert_eq!(h.updates.borrow()[1], h.cache.last_updated_at());
    }

    #[test]
    fn test_empty_update_on_fresh_cache_fires_nothing() {
        let h = harness();
        assert!(!h.cache.update(Vec::new()));
        assert!(h.updates.borrow().is_empty());
        assert_eq!(h.invalidations.get(), 0);
        assert_eq!(h.sink.save_count(CacheType::GitLogCache), 1);
    }

    #[test]
    fn test_verified_never_precedes_updated() {
        let h = harness();
        for step in 0..5 {
            h.clock.advance(TimeDelta::milliseconds(50));
            let value = format!("v{}", step / 2);
            h.cache.update(vec![value]);
            assert!(h.cache.last_verified_at() >= h.cache.last_updated_at());
        }
    }

    #[test]
    fn test_validate_within_ttl_is_noop() {
        let h = harness();
        h.cache.update(items(&["A"]));
        let verified = h.cache.last_verified_at();
        let saves = h.sink.save_count(CacheType::GitLogCache);

        h.clock.advance(TimeDelta::milliseconds(499));
        h.cache.validate();

        assert_eq!(h.invalidations.get(), 0);
        assert_eq!(h.updates.borrow().len(), 1);
        assert_eq!(h.cache.last_verified_at(), verified);
        assert_eq!(h.sink.save_count(CacheType::GitLogCache), saves);
        assert_eq!(h.cache.payload(), items(&["A"]));
    }

    #[test]
    fn test_validate_at_exact_ttl_is_noop() {
        let h = harness();
        h.cache.update(items(&["A"]));
        h.clock.advance(TimeDelta::milliseconds(500));
        h.cache.validate();
        assert_eq!(h.invalidations.get(), 0);
    }

    #[test]
    fn test_validate_past_ttl_invalidates() {
        let h = harness();
        h.cache.update(items(&["A"]));

        h.clock.advance(TimeDelta::milliseconds(501));
        h.cache.validate();

        assert_eq!(h.invalidations.get(), 1);
        assert_eq!(h.updates.borrow().len(), 2);
        assert!(h.cache.snapshot().payload.is_empty());
        assert_eq!(h.cache.last_updated_at(), h.clock.now());
    }

    #[test]
    fn test_invalidated_fires_before_updated() {
        let clock = Rc::new(ManualClock::default());
        let env = CacheEnvironment::with_ttl_ms(clock.clone(), DEFAULT_TTL_MS);
        let cache = ManagedCache::new(CacheType::GitLocksCache, &env, Rc::new(NullSink));
        cache.update(items(&["lock"]));

        let order = Rc::new(RefCell::new(Vec::new()));
        let on_invalidated = Rc::clone(&order);
        cache.on_invalidated(move || on_invalidated.borrow_mut().push("invalidated"));
        let on_updated = Rc::clone(&order);
        cache.on_updated(move |_| on_updated.borrow_mut().push("updated"));

        cache.invalidate();

        assert_eq!(*order.borrow(), vec!["invalidated", "updated"]);
    }

    #[test]
    fn test_invalidate_when_already_empty_only_announces() {
        let h = harness();
        h.cache.invalidate();
        assert_eq!(h.invalidations.get(), 1);
        assert!(h.updates.borrow().is_empty());
    }

    #[test]
    fn test_reentrant_update_from_handler() {
        let clock = Rc::new(ManualClock::default());
        let env = CacheEnvironment::with_ttl_ms(clock.clone(), DEFAULT_TTL_MS);
        let cache: Rc<ManagedCache<Vec<String>>> =
            Rc::new(ManagedCache::new(CacheType::BranchCache, &env, Rc::new(NullSink)));

        let seen_inside = Rc::new(RefCell::new(Vec::new()));
        let inner_cache = Rc::clone(&cache);
        let inner_seen = Rc::clone(&seen_inside);
        cache.on_updated(move |_| {
            let current = inner_cache.payload();
            inner_seen.borrow_mut().push(current.clone());
            if current == items(&["first"]) {
                inner_cache.update(items(&["second"]));
            }
        });

        cache.update(items(&["first"]));

        assert_eq!(cache.payload(), items(&["second"]));
        assert_eq!(
            *seen_inside.borrow(),
            vec![items(&["first"]), items(&["second"])]
        );
    }

    #[test]
    fn test_read_from_invalidated_handler_sees_old_payload() {
        let h = harness();
        h.cache.update(items(&["A"]));
        h.clock.advance(TimeDelta::milliseconds(600));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let inner_cache = Rc::clone(&h.cache);
        let inner_seen = Rc::clone(&seen);
        h.cache.on_invalidated(move || {
            inner_seen.borrow_mut().push(inner_cache.payload());
            inner_cache.invalidate();
        });

        assert!(h.cache.payload().is_empty());
        assert_eq!(*seen.borrow(), vec![items(&["A"])]);
        assert_eq!(h.invalidations.get(), 1);
        assert_eq!(h.updates.borrow().len(), 2);

        // The guard is released once the reset is done
        h.cache.update(items(&["B"]));
        h.clock.advance(TimeDelta::milliseconds(600));
        h.cache.validate();
        assert_eq!(h.invalidations.get(), 2);
        assert_eq!(*seen.borrow(), vec![items(&["A"]), items(&["B"])]);
    }

    #[test]
    fn test_restore_keeps_timestamps() {
        let clock = Rc::new(ManualClock::default());
        let env = CacheEnvironment::with_ttl_ms(clock.clone(), DEFAULT_TTL_MS);
        let snapshot = CacheSnapshot {
            payload: items(&["kept"]),
            last_updated_at: clock.now(),
            last_verified_at: clock.now(),
        };

        let cache = ManagedCache::restore(CacheType::GitLogCache, &env, Rc::new(NullSink), snapshot.clone());

        assert_eq!(cache.snapshot(), snapshot);
        assert_eq!(cache.payload(), items(&["kept"]));
    }

    #[test]
    fn test_unsubscribe_removes_handler() {
        let h = harness();
        let extra = Rc::new(Cell::new(0));
        let counter = Rc::clone(&extra);
        let id = h.cache.on_updated(move |_| counter.set(counter.get() + 1));

        h.cache.update(items(&["A"]));
        assert!(h.cache.unsubscribe(id));
        h.cache.update(items(&["B"]));

        assert_eq!(extra.get(), 1);
        assert_eq!(h.updates.borrow().len(), 2);
    }

    struct FailingSink;

    impl SnapshotSink<Vec<String>> for FailingSink {
        fn save(&self, _cache_type: CacheType, _snapshot: &CacheSnapshot<Vec<String>>) -> Result<()> {
            Err(RepoMirrorError::CacheDirectoryNotFound)
        }
    }

    #[derive(Default)]
    struct EchoSink {
        cache: RefCell<Weak<ManagedCache<Vec<String>>>>,
        echoed: Cell<bool>,
    }

    impl SnapshotSink<Vec<String>> for EchoSink {
        fn save(&self, _cache_type: CacheType, _snapshot: &CacheSnapshot<Vec<String>>) -> Result<()> {
            if !self.echoed.replace(true) {
                let cache = self.cache.borrow().upgrade();
                if let Some(cache) = cache {
                    cache.update(vec!["from sink".to_string()]);
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_sink_may_update_the_cache_it_saves() {
        let clock = Rc::new(ManualClock::default());
        let env = CacheEnvironment::with_ttl_ms(clock.clone(), DEFAULT_TTL_MS);
        let sink = Rc::new(EchoSink::default());
        let cache = Rc::new(ManagedCache::new(CacheType::GitLogCache, &env, sink.clone()));
        *sink.cache.borrow_mut() = Rc::downgrade(&cache);

        assert!(cache.update(items(&["A"])));
        assert_eq!(cache.payload(), items(&["from sink"]));
    }

    #[test]
    fn test_persist_failure_does_not_block_update() {
        let clock = Rc::new(ManualClock::default());
        let env = CacheEnvironment::with_ttl_ms(clock.clone(), DEFAULT_TTL_MS);
        let cache = ManagedCache::new(CacheType::GitLogCache, &env, Rc::new(FailingSink));

        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        cache.on_updated(move |_| flag.set(true));

        assert!(cache.update(items(&["A"])));
        assert!(fired.get());
        assert_eq!(cache.payload(), items(&["A"]));
    }
}
