use crate::api::{ApiError, ApiResult, Transport};
use crate::cache::QueryDescriptor;
use crate::models::{EntityKind, Folder, Id, List, Problem};
use chrono::{DateTime, Utc};
use futures::task::{LocalSpawn, LocalSpawnExt};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
pub(crate) enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Decoded payload of one resolved query.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Records {
    Folders(Vec<Folder>),
    Folder(Folder),
    Lists(Vec<List>),
    Problems(Vec<Problem>),
}

impl Records {
    pub fn len(&self) -> usize {
        match self {
            Records::Folders(v) => v.len(),
            Records::Folder(_) => 1,
            Records::Lists(v) => v.len(),
            Records::Problems(v) => v.len(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct QueryState {
    pub status: QueryStatus,
    /// Last successful payload; kept while a refetch is loading.
    pub data: Option<Records>,
    pub error: Option<String>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl QueryState {
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    /// Nothing to show yet: never resolved, or first fetch still pending.
    pub fn is_pending(&self) -> bool {
        self.data.is_none() && matches!(self.status, QueryStatus::Idle | QueryStatus::Loading)
    }

    pub fn folders(&self) -> &[Folder] {
        match &self.data {
            Some(Records::Folders(v)) => v,
            _ => &[],
        }
    }

    pub fn folder(&self) -> Option<&Folder> {
        match &self.data {
            Some(Records::Folder(f)) => Some(f),
            _ => None,
        }
    }

    pub fn lists(&self) -> &[List] {
        match &self.data {
            Some(Records::Lists(v)) => v,
            _ => &[],
        }
    }

    pub fn problems(&self) -> &[Problem] {
        match &self.data {
            Some(Records::Problems(v)) => v,
            _ => &[],
        }
    }
}

/// Resolved entries kept around after their last reader leaves.
pub(crate) const IDLE_ENTRY_LIMIT: usize = 16;

type Listener = Rc<dyn Fn(&QueryState)>;

struct CacheEntry {
    state: QueryState,
    stale: bool,
    in_flight: usize,
    readers: BTreeMap<u64, Listener>,
}

impl CacheEntry {
    fn new() -> Self {
        Self {
            state: QueryState::default(),
            stale: false,
            in_flight: 0,
            readers: BTreeMap::new(),
        }
    }
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<QueryDescriptor, CacheEntry>,
    /// Entries without readers, oldest detach first.
    idle: VecDeque<QueryDescriptor>,
    next_reader_id: u64,
}

impl CacheInner {
    fn detach(&mut self, descriptor: &QueryDescriptor, reader_id: u64) {
        let Some(entry) = self.entries.get_mut(descriptor) else {
            return;
        };
        entry.readers.remove(&reader_id);
        if !entry.readers.is_empty() {
            return;
        }

        // Gated sort queries hold no data worth keeping.
        if entry.state.status == QueryStatus::Idle {
            self.entries.remove(descriptor);
            return;
        }
        // In-flight entries are dropped by `complete` once the result lands.
        if entry.in_flight == 0 {
            self.idle.push_back(descriptor.clone());
            self.evict_idle();
        }
    }

    fn reattach(&mut self, descriptor: &QueryDescriptor) {
        self.idle.retain(|d| d != descriptor);
    }

    fn evict_idle(&mut self) {
        while self.idle.len() > IDLE_ENTRY_LIMIT {
            let Some(oldest) = self.idle.pop_front() else {
                break;
            };
            let unused = self
                .entries
                .get(&oldest)
                .is_some_and(|e| e.readers.is_empty() && e.in_flight == 0);
            if unused {
                tracing::debug!(query = %oldest, "evicting idle entry");
                self.entries.remove(&oldest);
            }
        }
    }
}

/// Process-wide keyed store of query results.
///
/// One entry per distinct [`QueryDescriptor`]; at most one fetch is started per
/// descriptor no matter how many readers attach while it is in flight. Cloning
/// yields another handle to the same store.
///
/// Completions for a descriptor are applied in the order they arrive. If an
/// invalidation starts a second request while an older one is still running,
/// whichever finishes last wins, even when that is the older one.
///
/// A resolved entry outlives its last reader so that coming back to a view is
/// served from cache. At most [`IDLE_ENTRY_LIMIT`] such entries are kept; past
/// that the one detached longest ago is evicted and refetched on next use.
#[derive(Clone)]
pub(crate) struct QueryCache {
    inner: Rc<RefCell<CacheInner>>,
    transport: Rc<dyn Transport>,
    spawner: Rc<dyn LocalSpawn>,
}

impl QueryCache {
    pub fn new(transport: Rc<dyn Transport>, spawner: Rc<dyn LocalSpawn>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CacheInner::default())),
            transport,
            spawner,
        }
    }

    /// Attach a reader to `descriptor`, resolving it if nothing usable is cached.
    ///
    /// `listener` fires on every later change of the entry; read the current value
    /// with [`Subscription::state`]. Dropping the subscription detaches the reader.
    pub fn subscribe(
        &self,
        descriptor: QueryDescriptor,
        listener: impl Fn(&QueryState) + 'static,
    ) -> Subscription {
        let (reader_id, should_fetch) = {
            let mut inner = self.inner.borrow_mut();
            let reader_id = inner.next_reader_id;
            inner.next_reader_id += 1;
            inner.reattach(&descriptor);

            let entry = inner
                .entries
                .entry(descriptor.clone())
                .or_insert_with(CacheEntry::new);

            let first_reader = entry.readers.is_empty();
            entry.readers.insert(reader_id, Rc::new(listener));

            let needs_data = entry.stale
                || entry.state.status == QueryStatus::Idle
                || (first_reader && entry.state.status == QueryStatus::Error);
            let should_fetch = descriptor.is_enabled() && entry.in_flight == 0 && needs_data;

            (reader_id, should_fetch)
        };

        tracing::debug!(query = %descriptor, reader_id, should_fetch, "attach reader");
        if should_fetch {
            self.start_fetch(&descriptor);
        }

        Subscription {
            inner: Rc::downgrade(&self.inner),
            descriptor,
            reader_id,
        }
    }

    /// Mark every entry of `kind` (optionally limited to one parent `scope`) stale.
    ///
    /// Entries with attached readers refetch immediately; the rest refetch when a
    /// reader next attaches.
    pub fn invalidate(&self, kind: EntityKind, scope: Option<Id>) {
        let refetch: Vec<QueryDescriptor> = {
            let mut inner = self.inner.borrow_mut();
            let mut refetch = Vec::new();
            for (descriptor, entry) in inner.entries.iter_mut() {
                if !descriptor.matches(kind, scope) || !descriptor.is_enabled() {
                    continue;
                }
                entry.stale = true;
                if !entry.readers.is_empty() {
                    refetch.push(descriptor.clone());
                }
            }
            refetch
        };

        tracing::info!(%kind, ?scope, refetching = refetch.len(), "invalidate");
        for descriptor in refetch {
            self.start_fetch(&descriptor);
        }
    }

    fn start_fetch(&self, descriptor: &QueryDescriptor) {
        {
            let mut inner = self.inner.borrow_mut();
            let Some(entry) = inner.entries.get_mut(descriptor) else {
                return;
            };
            entry.in_flight += 1;
            entry.stale = false;
            entry.state.status = QueryStatus::Loading;
        }
        self.notify(descriptor);

        let cache = self.clone();
        let transport = self.transport.clone();
        let d = descriptor.clone();
        let fetch = async move {
            let result = d.fetch(&*transport).await;
            cache.complete(&d, result);
        };

        if let Err(e) = self.spawner.spawn_local(fetch) {
            tracing::error!(query = %descriptor, error = %e, "failed to spawn fetch");
            self.complete(descriptor, Err(ApiError::invalid(e.to_string())));
        }
    }

    fn complete(&self, descriptor: &QueryDescriptor, result: ApiResult<Records>) {
        let applied = {
            let mut inner = self.inner.borrow_mut();
            let Some(entry) = inner.entries.get_mut(descriptor) else {
                return;
            };
            entry.in_flight = entry.in_flight.saturating_sub(1);

            if entry.readers.is_empty() {
                false
            } else {
                match result {
                    Ok(records) => {
                        tracing::debug!(query = %descriptor, records = records.len(), "resolved");
                        entry.state.status = QueryStatus::Success;
                        entry.state.data = Some(records);
                        entry.state.error = None;
                        entry.state.last_fetched_at = Some(Utc::now());
                    }
                    Err(e) => {
                        tracing::warn!(query = %descriptor, error = %e, "query failed");
                        entry.state.status = QueryStatus::Error;
                        entry.state.error = Some(e.message);
                    }
                }
                true
            }
        };

        if applied {
            self.notify(descriptor);
        } else {
            // Nobody is left to read it; the next reader starts from scratch.
            tracing::debug!(query = %descriptor, "discarding result without readers");
            let mut inner = self.inner.borrow_mut();
            let idle = inner
                .entries
                .get(descriptor)
                .is_some_and(|e| e.readers.is_empty() && e.in_flight == 0);
            if idle {
                inner.entries.remove(descriptor);
            }
        }
    }

    fn notify(&self, descriptor: &QueryDescriptor) {
        let (state, listeners): (QueryState, Vec<Listener>) = {
            let inner = self.inner.borrow();
            let Some(entry) = inner.entries.get(descriptor) else {
                return;
            };
            (entry.state.clone(), entry.readers.values().cloned().collect())
        };
        for listener in listeners {
            listener(&state);
        }
    }
}

/// A reader attached to one cache entry. Detaches on drop.
pub(crate) struct Subscription {
    inner: Weak<RefCell<CacheInner>>,
    descriptor: QueryDescriptor,
    reader_id: u64,
}

impl Subscription {
    pub fn state(&self) -> QueryState {
        self.inner
            .upgrade()
            .and_then(|inner| {
                inner
                    .borrow()
                    .entries
                    .get(&self.descriptor)
                    .map(|e| e.state.clone())
            })
            .unwrap_or_default()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().detach(&self.descriptor, self.reader_id);
        }
    }
}

#[cfg(test)]
impl QueryCache {
    pub fn reader_count(&self, descriptor: &QueryDescriptor) -> usize {
        self.inner
            .borrow()
            .entries
            .get(descriptor)
            .map_or(0, |e| e.readers.len())
    }

    pub fn contains(&self, descriptor: &QueryDescriptor) -> bool {
        self.inner.borrow().entries.contains_key(descriptor)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::models::SortOrder;
    use crate::testing::FakeBackend;
    use futures::executor::LocalPool;
    use std::cell::Cell;

    fn setup(backend: &FakeBackend) -> (LocalPool, QueryCache) {
        let pool = LocalPool::new();
        let cache = QueryCache::new(Rc::new(backend.clone()), Rc::new(pool.spawner()));
        (pool, cache)
    }

    #[test]
    fn test_first_reference_fetches_and_notifies() {
        let backend = FakeBackend::with_folders(&["Algorithms", "Graphs"]);
        let (mut pool, cache) = setup(&backend);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen2 = seen.clone();
        let sub = cache.subscribe(QueryDescriptor::folders_search(""), move |s| {
            seen2.borrow_mut().push(s.status)
        });
        assert!(sub.state().is_loading());

        pool.run_until_stalled();

        let state = sub.state();
        assert_eq!(state.status, QueryStatus::Success);
        assert_eq!(state.folders().len(), 2);
        assert!(state.last_fetched_at.is_some());
        assert_eq!(
            *seen.borrow(),
            vec![QueryStatus::Loading, QueryStatus::Success]
        );
    }

    #[test]
    fn test_concurrent_references_share_one_request() {
        let backend = FakeBackend::with_folders(&["Algorithms"]);
        backend.hold_responses(true);
        let (mut pool, cache) = setup(&backend);

        let d = QueryDescriptor::folders_search("Al");
        let first = cache.subscribe(d.clone(), |_| {});
        let second = cache.subscribe(d.clone(), |_| {});
        pool.run_until_stalled();
        assert_eq!(backend.count(Method::Get, "/folders/search?prefix=Al"), 1);
        assert_eq!(cache.reader_count(&d), 2);

        backend.release_all();
        pool.run_until_stalled();
        assert_eq!(first.state().folders().len(), 1);
        assert_eq!(second.state(), first.state());
        assert_eq!(backend.requests().len(), 1);
    }

    #[test]
    fn test_cached_entry_is_reused_by_later_reader() {
        let backend = FakeBackend::with_folders(&["Algorithms"]);
        let (mut pool, cache) = setup(&backend);
        let d = QueryDescriptor::folders_search("");

        let first = cache.subscribe(d.clone(), |_| {});
        pool.run_until_stalled();
        drop(first);

        let again = cache.subscribe(d.clone(), |_| {});
        pool.run_until_stalled();
        assert_eq!(again.state().folders().len(), 1);
        assert_eq!(backend.requests().len(), 1);
    }

    #[test]
    fn test_sort_without_order_stays_idle() {
        let backend = FakeBackend::new();
        let (mut pool, cache) = setup(&backend);

        let d = QueryDescriptor::folders_sorted(None);
        let sub = cache.subscribe(d.clone(), |_| {});
        pool.run_until_stalled();
        assert_eq!(sub.state().status, QueryStatus::Idle);
        assert!(backend.requests().is_empty());

        cache.invalidate(EntityKind::Folder, None);
        pool.run_until_stalled();
        assert!(backend.requests().is_empty());

        drop(sub);
        assert!(!cache.contains(&d));
    }

    #[test]
    fn test_failure_sets_error_without_retry() {
        let backend = FakeBackend::new();
        backend.fail_next(500);
        let (mut pool, cache) = setup(&backend);

        let sub = cache.subscribe(QueryDescriptor::folders_sorted(Some(SortOrder::Asc)), |_| {});
        pool.run_until_stalled();

        let state = sub.state();
        assert_eq!(state.status, QueryStatus::Error);
        assert_eq!(
            state.error.as_deref(),
            Some("Network response was not ok (500)")
        );
        pool.run_until_stalled();
        assert_eq!(backend.requests().len(), 1);
    }

    #[test]
    fn test_failed_list_query_names_the_query() {
        let backend = FakeBackend::new();
        let folder = backend.seed_folder("Algorithms");
        backend.fail_next(503);
        let (mut pool, cache) = setup(&backend);

        let sub = cache.subscribe(QueryDescriptor::lists_sorted(folder, Some(SortOrder::Desc)), |_| {});
        pool.run_until_stalled();
        assert_eq!(
            sub.state().error.as_deref(),
            Some("Failed to fetch sorted lists (503)")
        );
    }

    #[test]
    fn test_invalidate_refetches_attached_readers() {
        let backend = FakeBackend::with_folders(&["Algorithms"]);
        let (mut pool, cache) = setup(&backend);

        let notified = Rc::new(Cell::new(0));
        let n = notified.clone();
        let sub = cache.subscribe(QueryDescriptor::folders_search(""), move |_| {
            n.set(n.get() + 1)
        });
        pool.run_until_stalled();

        backend.seed_folder("Graphs");
        cache.invalidate(EntityKind::Folder, None);
        assert!(sub.state().is_loading());
        // Previous data stays visible while the refetch runs.
        assert_eq!(sub.state().folders().len(), 1);

        pool.run_until_stalled();
        assert_eq!(sub.state().folders().len(), 2);
        assert_eq!(backend.requests().len(), 2);
        assert_eq!(notified.get(), 4);
    }

    #[test]
    fn test_invalidate_without_readers_fetches_once_on_next_attach() {
        let backend = FakeBackend::with_folders(&["Algorithms"]);
        let (mut pool, cache) = setup(&backend);
        let d = QueryDescriptor::folders_search("");

        drop(cache.subscribe(d.clone(), |_| {}));
        pool.run_until_stalled();
        // The reader left before the response arrived, so nothing was cached.
        assert!(!cache.contains(&d));

        let sub = cache.subscribe(d.clone(), |_| {});
        pool.run_until_stalled();
        drop(sub);
        assert_eq!(backend.requests().len(), 2);

        cache.invalidate(EntityKind::Folder, None);
        pool.run_until_stalled();
        assert_eq!(backend.requests().len(), 2);

        let sub = cache.subscribe(d.clone(), |_| {});
        pool.run_until_stalled();
        assert_eq!(backend.requests().len(), 3);
        assert_eq!(sub.state().status, QueryStatus::Success);
    }

    #[test]
    fn test_invalidate_respects_scope() {
        let backend = FakeBackend::new();
        let f1 = backend.seed_folder("Algorithms");
        let f2 = backend.seed_folder("Systems");
        backend.seed_list(f1, "Graphs");
        backend.seed_list(f2, "Caching");
        let (mut pool, cache) = setup(&backend);

        let _a = cache.subscribe(QueryDescriptor::lists_search(f1, ""), |_| {});
        let _b = cache.subscribe(QueryDescriptor::lists_search(f2, ""), |_| {});
        pool.run_until_stalled();
        assert_eq!(backend.requests().len(), 2);

        cache.invalidate(EntityKind::List, Some(f1));
        pool.run_until_stalled();
        assert_eq!(backend.requests().len(), 3);
        assert_eq!(
            backend.count(Method::Get, &format!("/lists/folder/{f1}/search?prefix=")),
            2
        );
    }

    #[test]
    fn test_result_discarded_when_reader_leaves_mid_flight() {
        let backend = FakeBackend::with_folders(&["Algorithms"]);
        backend.hold_responses(true);
        let (mut pool, cache) = setup(&backend);
        let d = QueryDescriptor::folders_search("");

        let sub = cache.subscribe(d.clone(), |_| {});
        pool.run_until_stalled();
        drop(sub);

        backend.release_all();
        pool.run_until_stalled();
        assert_eq!(backend.requests().len(), 1);
        assert!(!cache.contains(&d));
    }

    #[test]
    fn test_out_of_order_completion_last_write_wins() {
        let backend = FakeBackend::with_folders(&["Algorithms"]);
        backend.hold_responses(true);
        let (mut pool, cache) = setup(&backend);

        let sub = cache.subscribe(QueryDescriptor::folders_search(""), |_| {});
        pool.run_until_stalled();

        backend.seed_folder("Graphs");
        cache.invalidate(EntityKind::Folder, None);
        pool.run_until_stalled();
        assert_eq!(backend.requests().len(), 2);

        // Newer request answers first, then the older one lands on top.
        assert!(backend.release_last());
        pool.run_until_stalled();
        assert_eq!(sub.state().folders().len(), 2);

        backend.remove_folder_named("Graphs");
        assert!(backend.release_last());
        pool.run_until_stalled();
        assert_eq!(sub.state().folders().len(), 1);
    }

    #[test]
    fn test_idle_entries_are_evicted_oldest_first() {
        let backend = FakeBackend::with_folders(&["Algorithms and data structures"]);
        let (mut pool, cache) = setup(&backend);

        // One descriptor per keystroke, each dropped as the next one is typed.
        let text = "Algorithms and data structures";
        let mut typed = String::new();
        for c in text.chars() {
            typed.push(c);
            let sub = cache.subscribe(QueryDescriptor::folders_search(&typed), |_| {});
            pool.run_until_stalled();
            assert_eq!(sub.state().folders().len(), 1);
        }
        assert_eq!(backend.requests().len(), text.len());
        assert_eq!(cache.len(), IDLE_ENTRY_LIMIT);
        assert!(!cache.contains(&QueryDescriptor::folders_search("A")));

        // Recent prefixes are still served from cache.
        let recent = cache.subscribe(QueryDescriptor::folders_search(text), |_| {});
        pool.run_until_stalled();
        assert_eq!(recent.state().status, QueryStatus::Success);
        assert_eq!(backend.requests().len(), text.len());

        // Evicted ones start over.
        let evicted = cache.subscribe(QueryDescriptor::folders_search("A"), |_| {});
        assert!(evicted.state().is_loading());
        pool.run_until_stalled();
        assert_eq!(backend.requests().len(), text.len() + 1);
    }

    #[test]
    fn test_entries_with_readers_are_never_evicted() {
        let backend = FakeBackend::with_folders(&["Algorithms"]);
        let (mut pool, cache) = setup(&backend);

        let pinned = QueryDescriptor::folders_search("");
        let _keep = cache.subscribe(pinned.clone(), |_| {});
        pool.run_until_stalled();

        for i in 0..IDLE_ENTRY_LIMIT + 5 {
            let sub = cache.subscribe(QueryDescriptor::folders_search(&format!("q{i}")), |_| {});
            pool.run_until_stalled();
            drop(sub);
        }

        assert_eq!(cache.len(), IDLE_ENTRY_LIMIT + 1);
        assert!(cache.contains(&pinned));
        assert_eq!(cache.reader_count(&pinned), 1);
    }
}
