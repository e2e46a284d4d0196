// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use futures_util::future::join3;
use tracing::{debug, trace, warn};
use warrant_core::{
    AttributeSet, GroupName, ResolvedView, ScopeId, SubjectId, display_scope, hydrate_explicit,
    hydrate_groups, resolve,
};
use warrant_store::PermissionStore;

use crate::blocking::BlockingContext;
use crate::config::CacheConfig;
use crate::error::{CacheError, StorageInput};
use crate::guard::{TargetGuard, Ticket};

type ScopedViews<ID> = HashMap<Option<ScopeId>, Arc<ResolvedView<ID>>>;

/// Concurrent memoization of resolved views per subject and scope.
///
/// Every subject is either absent from the cache or populated with one view per scope it was
/// resolved for. Invalidating a subject drops all of its scopes at once. Group membership is not
/// tracked, so invalidating a group drops the whole cache. Views are never updated in place, a
/// refresh replaces them wholesale.
///
/// The cache is eventually consistent: a view stays as it is until it gets invalidated, usually
/// through an [`InvalidationEvent`](crate::InvalidationEvent).
///
/// A resolution which was overtaken by an invalidation while it was reading from storage is
/// handed to its caller but leaves no trace in the cache, neither as view nor as fallback or
/// attributes. Invalidating a subject only affects resolutions of that subject.
/// [`invalidate_all`](Self::invalidate_all) and [`remove_subject`](Self::remove_subject) discard
/// every resolution in flight, whichever subject it is for.
///
/// Cloning the cache is cheap, all clones share the same state.
#[derive(Debug)]
pub struct PermissionCache<ID, S>
where
    ID: SubjectId,
{
    inner: Arc<CacheInner<ID, S>>,
}

#[derive(Debug)]
struct CacheInner<ID, S>
where
    ID: SubjectId,
{
    store: S,
    config: CacheConfig,

    /// Current views, keyed by subject and then by scope.
    views: DashMap<ID, ScopedViews<ID>>,

    /// Last successfully resolved views, kept across invalidations to serve as fallback.
    last_good: DashMap<ID, ScopedViews<ID>>,

    /// Last known attributes per subject, for synchronous reads.
    attributes: DashMap<ID, AttributeSet>,

    /// Scope every subject is currently heading to.
    targets: TargetGuard<ID>,

    /// Source of stamps ordering resolutions against invalidations.
    clock: AtomicU64,

    /// Stamp of the latest invalidation per subject.
    invalidated: DashMap<ID, u64>,

    /// Stamp of the latest invalidation affecting every subject.
    cleared: AtomicU64,
}

impl<ID, S> Clone for PermissionCache<ID, S>
where
    ID: SubjectId,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<ID, S> PermissionCache<ID, S>
where
    ID: SubjectId,
    S: PermissionStore<ID>,
{
    pub fn new(store: S, config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                store,
                config,
                views: DashMap::new(),
                last_good: DashMap::new(),
                attributes: DashMap::new(),
                targets: TargetGuard::new(),
                clock: AtomicU64::new(0),
                invalidated: DashMap::new(),
                cleared: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Returns the view of the subject in the given scope, resolving it on a miss.
    ///
    /// Concurrent misses for the same key may each resolve, which is harmless as resolution has
    /// no side effects and always yields the same view for the same storage state. Failed
    /// resolutions are never cached.
    pub async fn get(
        &self,
        subject: &ID,
        scope: Option<&ScopeId>,
    ) -> Result<Arc<ResolvedView<ID>>, CacheError<S::Error>> {
        if let Some(view) = self.cached(subject, scope) {
            trace!(subject = %subject, scope = %display_scope(scope), "permission cache hit");
            return Ok(view);
        }

        trace!(subject = %subject, scope = %display_scope(scope), "permission cache miss");

        let started = self.inner.clock.load(Ordering::SeqCst);
        let view = Arc::new(self.fetch_and_resolve(subject, scope).await?);
        self.memoize(started, view.clone());

        Ok(view)
    }

    /// Same as [`get`](Self::get), but falls back instead of failing.
    ///
    /// When storage fails the last successfully resolved view for this subject and scope is
    /// returned if the configuration allows it, otherwise an empty view which grants nothing.
    pub async fn get_or_fallback(
        &self,
        subject: &ID,
        scope: Option<&ScopeId>,
    ) -> Arc<ResolvedView<ID>> {
        match self.get(subject, scope).await {
            Ok(view) => view,
            Err(err) => {
                warn!("{}", err);

                if self.inner.config.fallback_on_error {
                    if let Some(view) = self.last_good(subject, scope) {
                        debug!(
                            subject = %subject,
                            scope = %display_scope(scope),
                            "serving last known good permissions"
                        );
                        return view;
                    }
                }

                Arc::new(ResolvedView::empty(subject.clone(), scope.cloned()))
            }
        }
    }

    /// Returns the last known attributes of the subject without waiting for any resolution.
    ///
    /// Subjects which were never resolved yield the empty set.
    pub fn get_attributes_sync(&self, subject: &ID) -> AttributeSet {
        self.inner
            .attributes
            .get(subject)
            .map(|attributes| attributes.clone())
            .unwrap_or_default()
    }

    /// Resolve the subject's default scope ahead of time, so the first real check does not stall
    /// on storage.
    pub async fn prefetch(
        &self,
        subject: &ID,
    ) -> Result<Arc<ResolvedView<ID>>, CacheError<S::Error>> {
        let scope = self.inner.config.default_scope.as_ref();
        debug!(subject = %subject, scope = %display_scope(scope), "prefetch permissions");
        self.get(subject, scope).await
    }

    /// Blocking variant of [`prefetch`](Self::prefetch) for call sites which are allowed to block.
    pub fn prefetch_blocking(
        &self,
        context: &BlockingContext,
        subject: &ID,
    ) -> Result<Arc<ResolvedView<ID>>, CacheError<S::Error>> {
        context.block_on(self.prefetch(subject))
    }

    /// Move the subject to another scope and resolve its view there.
    ///
    /// Returns `None` when another scope change for the same subject was issued while this one
    /// was resolving. The outdated result is then discarded and not applied to the subject's
    /// attributes.
    pub async fn change_scope(
        &self,
        subject: &ID,
        scope: Option<ScopeId>,
    ) -> Result<Option<Arc<ResolvedView<ID>>>, CacheError<S::Error>> {
        let ticket = self.inner.targets.set(subject.clone(), scope);
        let view = self.get(subject, ticket.scope()).await?;
        Ok(self.apply(&ticket, view))
    }

    /// Scope the subject is currently heading to, `None` if it never changed scope.
    pub fn target_scope(&self, subject: &ID) -> Option<Option<ScopeId>> {
        self.inner.targets.current(subject)
    }

    /// Drop all views of the subject.
    pub fn invalidate_subject(&self, subject: &ID) {
        let stamp = self.next_stamp();
        self.inner.invalidated.insert(subject.clone(), stamp);
        if self.inner.views.remove(subject).is_some() {
            debug!(subject = %subject, "invalidated permissions of subject");
        }
    }

    /// Drop all views after a change to the given group.
    ///
    /// Which subjects are members of the group is not tracked, so every view is dropped.
    pub fn invalidate_group(&self, group: &GroupName) {
        debug!(group = %group, "group changed");
        self.invalidate_all();
    }

    pub fn invalidate_all(&self) {
        let stamp = self.clear_in_flight();
        self.inner
            .invalidated
            .retain(|_, invalidated| *invalidated > stamp);
        self.inner.views.clear();
        debug!("invalidated all permissions");
    }

    /// Forget everything known about the subject, including fallback views and attributes.
    pub fn remove_subject(&self, subject: &ID) {
        self.clear_in_flight();
        self.inner.invalidated.remove(subject);
        self.inner.views.remove(subject);
        self.inner.last_good.remove(subject);
        self.inner.attributes.remove(subject);
        self.inner.targets.forget(subject);
        debug!(subject = %subject, "removed subject from permission cache");
    }

    /// Returns `true` if a view for this subject and scope is memoized.
    pub fn contains(&self, subject: &ID, scope: Option<&ScopeId>) -> bool {
        self.cached(subject, scope).is_some()
    }

    /// Number of memoized views over all subjects and scopes.
    pub fn len(&self) -> usize {
        self.inner
            .views
            .iter()
            .map(|entry| entry.value().len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn apply(
        &self,
        ticket: &Ticket<ID>,
        view: Arc<ResolvedView<ID>>,
    ) -> Option<Arc<ResolvedView<ID>>> {
        if !self.inner.targets.is_current(ticket) {
            debug!(
                subject = %ticket.subject(),
                scope = %display_scope(ticket.scope()),
                "discarding outdated scope change"
            );
            return None;
        }

        Some(view)
    }

    fn cached(&self, subject: &ID, scope: Option<&ScopeId>) -> Option<Arc<ResolvedView<ID>>> {
        lookup(&self.inner.views, subject, scope)
    }

    fn last_good(&self, subject: &ID, scope: Option<&ScopeId>) -> Option<Arc<ResolvedView<ID>>> {
        lookup(&self.inner.last_good, subject, scope)
    }

    fn next_stamp(&self) -> u64 {
        self.inner.clock.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Mark every resolution started so far as outdated.
    fn clear_in_flight(&self) -> u64 {
        let stamp = self.next_stamp();
        self.inner.cleared.fetch_max(stamp, Ordering::SeqCst);
        stamp
    }

    /// Returns `true` if nothing invalidated the subject since `started`.
    fn is_fresh(&self, subject: &ID, started: u64) -> bool {
        self.inner.cleared.load(Ordering::SeqCst) <= started
            && self
                .inner
                .invalidated
                .get(subject)
                .is_none_or(|invalidated| *invalidated <= started)
    }

    /// Gather all inputs from storage concurrently and resolve them.
    async fn fetch_and_resolve(
        &self,
        subject: &ID,
        scope: Option<&ScopeId>,
    ) -> Result<ResolvedView<ID>, CacheError<S::Error>> {
        let store = &self.inner.store;

        let (attributes, grants, groups) = join3(
            store.explicit_attributes(subject),
            store.explicit_grants(subject),
            store.member_groups(subject),
        )
        .await;

        let attributes = attributes.map_err(|err| {
            CacheError::resolution_failed(subject, StorageInput::Attributes, err)
        })?;
        let grants = grants
            .map_err(|err| CacheError::resolution_failed(subject, StorageInput::Grants, err))?;
        let groups = groups
            .map_err(|err| CacheError::resolution_failed(subject, StorageInput::Groups, err))?;

        let explicit_grants = hydrate_explicit(&grants);
        let groups = hydrate_groups(&groups);

        Ok(resolve(
            subject.clone(),
            scope,
            &attributes,
            &explicit_grants,
            &groups,
        ))
    }

    /// Store a freshly resolved view, unless an invalidation happened while it was resolving.
    fn memoize(&self, started: u64, view: Arc<ResolvedView<ID>>) {
        let subject = view.subject().clone();
        let scope = view.scope().cloned();

        // Holding the subject's entry orders this against any concurrent invalidation of it.
        let entry = self.inner.views.entry(subject.clone());
        if !self.is_fresh(&subject, started) {
            trace!(subject = %subject, "invalidated while resolving, not memoizing");
            return;
        }

        let mut views = entry.or_default();
        views.insert(scope.clone(), view.clone());

        if self.inner.targets.allows(&subject, scope.as_ref()) {
            self.inner
                .attributes
                .insert(subject.clone(), view.attributes().clone());
        }

        self.inner
            .last_good
            .entry(subject)
            .or_default()
            .insert(scope, view);
    }
}

fn lookup<ID>(
    map: &DashMap<ID, ScopedViews<ID>>,
    subject: &ID,
    scope: Option<&ScopeId>,
) -> Option<Arc<ResolvedView<ID>>>
where
    ID: SubjectId,
{
    map.get(subject)
        .and_then(|views| views.get(&scope.cloned()).cloned())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures_util::future::join_all;
    use warrant_core::{AttributeSet, GrantRecord, GroupName, GroupRecord, ScopeId};

    use crate::config::CacheConfig;
    use crate::error::{CacheError, StorageInput};
    use crate::test_utils::{CountingStore, setup_logging};

    use super::PermissionCache;

    type TestCache = PermissionCache<char, CountingStore<char>>;

    async fn cache() -> TestCache {
        setup_logging();

        let store = CountingStore::new();
        store
            .memory()
            .insert_group(
                GroupRecord::new("default", 0)
                    .with_default(true)
                    .with_attributes(AttributeSet::empty().with_chat_prefix("[Default]"))
                    .with_grant(GrantRecord::new(1, "chest.*", true)),
            )
            .await
            .unwrap();
        PermissionCache::new(store, CacheConfig::default())
    }

    #[tokio::test]
    async fn memoizes_views() {
        let cache = cache().await;

        let first = cache.get(&'a', None).await.unwrap();
        let second = cache.get(&'a', None).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.store().fetches(), 1);
        assert!(cache.contains(&'a', None));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn scopes_are_memoized_separately() {
        let cache = cache().await;
        let world_a = ScopeId::new("worldA");

        cache.get(&'a', None).await.unwrap();
        cache.get(&'a', Some(&world_a)).await.unwrap();
        cache.get(&'a', Some(&world_a)).await.unwrap();

        assert_eq!(cache.store().fetches(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn invalidating_subject_refetches() {
        let cache = cache().await;
        let world_a = ScopeId::new("worldA");

        cache.get(&'a', None).await.unwrap();
        cache.get(&'a', Some(&world_a)).await.unwrap();
        cache.get(&'b', None).await.unwrap();
        assert_eq!(cache.store().fetches(), 3);

        cache.invalidate_subject(&'a');
        assert!(!cache.contains(&'a', None));
        assert!(!cache.contains(&'a', Some(&world_a)));
        assert!(cache.contains(&'b', None));

        cache.get(&'a', None).await.unwrap();
        assert_eq!(cache.store().fetches(), 4);

        // Other subjects are untouched.
        cache.get(&'b', None).await.unwrap();
        assert_eq!(cache.store().fetches(), 4);
    }

    #[tokio::test]
    async fn invalidating_group_clears_everything() {
        let cache = cache().await;

        cache.get(&'a', None).await.unwrap();
        cache.get(&'b', None).await.unwrap();

        cache.invalidate_group(&GroupName::new("unrelated").unwrap());
        assert!(cache.is_empty());

        cache.get(&'b', None).await.unwrap();
        assert_eq!(cache.store().fetches(), 3);
    }

    #[tokio::test]
    async fn picks_up_storage_changes_after_invalidation() {
        let cache = cache().await;

        assert!(cache.get(&'a', None).await.unwrap().check("chest.gold"));

        cache
            .store()
            .memory()
            .insert_grant('a', GrantRecord::new(2, "chest.gold", false))
            .await;

        // Still stale until invalidated.
        assert!(cache.get(&'a', None).await.unwrap().check("chest.gold"));

        cache.invalidate_subject(&'a');
        assert!(!cache.get(&'a', None).await.unwrap().check("chest.gold"));
    }

    #[tokio::test]
    async fn concurrent_gets_converge() {
        let cache = cache().await;

        let views = join_all((0..8).map(|_| cache.get(&'a', None))).await;
        let views: Vec<_> = views.into_iter().map(Result::unwrap).collect();

        assert!(views.windows(2).all(|pair| pair[0] == pair[1]));
        assert!(cache.store().fetches() >= 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn failed_resolution_is_not_cached() {
        let cache = cache().await;

        cache.store().set_failing(true);
        let result = cache.get(&'a', None).await;
        assert!(matches!(
            result,
            Err(CacheError::ResolutionFailed {
                input: StorageInput::Groups,
                ..
            })
        ));
        assert!(cache.is_empty());

        cache.store().set_failing(false);
        assert!(cache.get(&'a', None).await.unwrap().check("chest.iron"));
    }

    #[tokio::test]
    async fn falls_back_to_last_known_good() {
        let cache = cache().await;

        // First-ever lookup fails closed.
        cache.store().set_failing(true);
        let view = cache.get_or_fallback(&'a', None).await;
        assert!(view.is_empty());
        assert!(!view.check("chest.iron"));

        cache.store().set_failing(false);
        let good = cache.get_or_fallback(&'a', None).await;
        assert!(good.check("chest.iron"));

        cache.invalidate_subject(&'a');
        cache.store().set_failing(true);
        let fallback = cache.get_or_fallback(&'a', None).await;
        assert!(Arc::ptr_eq(&good, &fallback));
    }

    #[tokio::test]
    async fn fallback_can_be_disabled() {
        let store = CountingStore::new();
        let config = CacheConfig {
            fallback_on_error: false,
            ..Default::default()
        };
        let cache = PermissionCache::new(store, config);
        cache
            .store()
            .memory()
            .insert_grant('a', GrantRecord::new(1, "fly", true))
            .await;

        assert!(cache.get_or_fallback(&'a', None).await.check("fly"));

        cache.invalidate_subject(&'a');
        cache.store().set_failing(true);
        assert!(!cache.get_or_fallback(&'a', None).await.check("fly"));
    }

    #[tokio::test]
    async fn attributes_are_readable_synchronously() {
        let cache = cache().await;
        assert!(cache.get_attributes_sync(&'a').is_empty());

        cache.get(&'a', None).await.unwrap();
        assert_eq!(cache.get_attributes_sync(&'a').chat_prefix(), Some("[Default]"));

        // Last known attributes survive invalidation, but not removal.
        cache.invalidate_all();
        assert_eq!(cache.get_attributes_sync(&'a').chat_prefix(), Some("[Default]"));

        cache.remove_subject(&'a');
        assert!(cache.get_attributes_sync(&'a').is_empty());
    }

    #[tokio::test]
    async fn prefetch_resolves_default_scope() {
        let store = CountingStore::new();
        let lobby = ScopeId::new("lobby");
        let config = CacheConfig {
            default_scope: Some(lobby.clone()),
            ..Default::default()
        };
        let cache = PermissionCache::new(store, config);

        let view = cache.prefetch(&'a').await.unwrap();
        assert_eq!(view.scope(), Some(&lobby));
        assert!(cache.contains(&'a', Some(&lobby)));
        assert!(!cache.contains(&'a', None));
    }

    #[tokio::test]
    async fn change_scope_applies_current_target() {
        let cache = cache().await;
        let world_a = ScopeId::new("worldA");

        let view = cache
            .change_scope(&'a', Some(world_a.clone()))
            .await
            .unwrap()
            .expect("target is still current");
        assert_eq!(view.scope(), Some(&world_a));
        assert_eq!(cache.target_scope(&'a'), Some(Some(world_a)));
        assert_eq!(cache.get_attributes_sync(&'a').chat_prefix(), Some("[Default]"));
    }

    #[tokio::test]
    async fn outdated_scope_change_is_discarded() {
        let cache = cache().await;
        let world_a = ScopeId::new("worldA");
        let world_b = ScopeId::new("worldB");

        let ticket = cache.inner.targets.set('a', Some(world_a.clone()));
        let view = cache.get(&'a', Some(&world_a)).await.unwrap();

        // Subject moved on before the first resolution got applied.
        cache.inner.targets.set('a', Some(world_b));
        assert!(cache.apply(&ticket, view).is_none());
    }

    async fn cache_with_prefix(prefix: &str) -> TestCache {
        let cache = cache().await;
        cache
            .store()
            .memory()
            .set_attributes('a', AttributeSet::empty().with_chat_prefix(prefix))
            .await;
        cache
    }

    #[tokio::test]
    async fn resolution_overtaken_by_subject_invalidation_leaves_no_trace() {
        let cache = cache_with_prefix("[Old]").await;
        let store = cache.store();

        store.hold_next();
        let (stale, fresh) = tokio::join!(cache.get(&'a', None), async {
            store.wait_held().await;
            store
                .memory()
                .set_attributes('a', AttributeSet::empty().with_chat_prefix("[New]"))
                .await;
            cache.invalidate_subject(&'a');
            let fresh = cache.get(&'a', None).await.unwrap();
            store.release();
            fresh
        });

        // The caller still gets its answer, it just does not end up in the cache.
        assert_eq!(stale.unwrap().attributes().chat_prefix(), Some("[Old]"));
        assert_eq!(fresh.attributes().chat_prefix(), Some("[New]"));

        assert!(cache.contains(&'a', None));
        assert_eq!(cache.get_attributes_sync(&'a').chat_prefix(), Some("[New]"));

        cache.invalidate_subject(&'a');
        store.set_failing(true);
        let fallback = cache.get_or_fallback(&'a', None).await;
        assert!(Arc::ptr_eq(&fallback, &fresh));
    }

    #[tokio::test]
    async fn resolution_overtaken_by_full_invalidation_leaves_no_trace() {
        let cache = cache_with_prefix("[Old]").await;
        let store = cache.store();

        store.hold_next();
        let (stale, _) = tokio::join!(cache.get(&'a', None), async {
            store.wait_held().await;
            cache.invalidate_all();
            store.release();
        });

        assert!(stale.is_ok());
        assert!(!cache.contains(&'a', None));
        assert!(cache.is_empty());
        assert!(cache.get_attributes_sync(&'a').is_empty());

        store.set_failing(true);
        assert!(cache.get_or_fallback(&'a', None).await.is_empty());
    }

    #[tokio::test]
    async fn removed_subject_is_not_brought_back() {
        let cache = cache_with_prefix("[Old]").await;
        let store = cache.store();

        cache.get(&'a', None).await.unwrap();
        cache.invalidate_subject(&'a');

        store.hold_next();
        let (stale, _) = tokio::join!(cache.get(&'a', None), async {
            store.wait_held().await;
            cache.remove_subject(&'a');
            store.release();
        });

        assert!(stale.is_ok());
        assert!(!cache.contains(&'a', None));
        assert!(cache.get_attributes_sync(&'a').is_empty());
        assert!(cache.inner.views.is_empty());
        assert!(cache.inner.last_good.is_empty());
        assert!(cache.inner.attributes.is_empty());

        store.set_failing(true);
        assert!(cache.get_or_fallback(&'a', None).await.is_empty());
    }

    #[tokio::test]
    async fn invalidating_other_subject_keeps_resolution_in_flight() {
        let cache = cache_with_prefix("[Old]").await;
        let store = cache.store();

        store.hold_next();
        let (view, _) = tokio::join!(cache.get(&'a', None), async {
            store.wait_held().await;
            cache.invalidate_subject(&'b');
            store.release();
        });

        assert!(view.is_ok());
        assert!(cache.contains(&'a', None));
        assert_eq!(cache.get_attributes_sync(&'a').chat_prefix(), Some("[Old]"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_gets_and_invalidations_settle_on_latest_state() {
        let cache = cache().await;
        let subjects = ['a', 'b', 'c'];

        let mut tasks = Vec::new();
        for subject in subjects {
            let writer = cache.clone();
            tasks.push(tokio::spawn(async move {
                for round in 0..50 {
                    writer
                        .store()
                        .memory()
                        .set_attributes(
                            subject,
                            AttributeSet::empty().with_chat_prefix(format!("[{round}]")),
                        )
                        .await;
                    writer.invalidate_subject(&subject);
                    if round % 10 == 0 {
                        writer.invalidate_all();
                    }
                    tokio::task::yield_now().await;
                }
            }));

            for _ in 0..2 {
                let reader = cache.clone();
                tasks.push(tokio::spawn(async move {
                    for _ in 0..50 {
                        reader.get(&subject, None).await.unwrap();
                        tokio::task::yield_now().await;
                    }
                }));
            }
        }

        for task in join_all(tasks).await {
            task.unwrap();
        }

        for subject in subjects {
            let view = cache.get(&subject, None).await.unwrap();
            assert_eq!(view.attributes().chat_prefix(), Some("[49]"));
            assert_eq!(
                cache.get_attributes_sync(&subject).chat_prefix(),
                Some("[49]")
            );
        }
    }
}
