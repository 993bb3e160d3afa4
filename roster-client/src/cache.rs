//! Tag-indexed query cache with single-flight de-duplication and
//! supersession tracking.
//!
//! One `QueryCache` instance backs one logical query slot (the user
//! list, user details). Entries are keyed by (endpoint, serialized
//! arguments). Results register the tags they were provided under;
//! mutations invalidate tags, which marks every intersecting entry
//! stale. Stale entries stay readable through [`QueryCache::get_any`] so
//! a failing refetch leaves prior data visible, but they are never
//! served as fresh again until recommitted.
//!
//! Supersession: callers take a ticket before fetching. Starting a newer
//! fetch on the same slot invalidates older tickets, so a completing
//! fetch whose arguments were superseded is silently dropped rather than
//! overwriting the newer result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use roster_model::Tag;
use tokio::sync::Mutex;

/// Cache key: endpoint plus serialized request arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    endpoint: &'static str,
    args: String,
}

impl QueryKey {
    pub fn new(endpoint: &'static str, args: impl Into<String>) -> Self {
        Self {
            endpoint,
            args: args.into(),
        }
    }
}

/// Whether a cached result may be served without a refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    tags: Vec<Tag>,
    freshness: Freshness,
}

/// Ticket identifying one fetch attempt on a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Cached query results for one logical query slot.
pub struct QueryCache<V> {
    entries: DashMap<QueryKey, CacheEntry<V>>,
    flights: DashMap<QueryKey, Arc<Mutex<()>>>,
    generation: AtomicU64,
}

impl<V> std::fmt::Debug for QueryCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.len())
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            flights: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Per-key lock used for single-flight de-duplication.
    ///
    /// Callers acquire the lock, re-check [`get_fresh`], and only then
    /// take a ticket and fetch; concurrent identical requests therefore
    /// share one in-flight call and its committed result.
    ///
    /// [`get_fresh`]: QueryCache::get_fresh
    pub fn flight(&self, key: &QueryKey) -> Arc<Mutex<()>> {
        self.flights
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Take a ticket for a fetch that is about to start.
    ///
    /// Supersedes every ticket taken earlier on this slot.
    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Commit a fetched value under the given tags.
    ///
    /// Returns false, without storing, when the ticket was superseded by
    /// a newer fetch on this slot; the caller still owns the value and
    /// may hand it to the requester that asked for it.
    pub fn commit(
        &self,
        key: QueryKey,
        value: V,
        tags: Vec<Tag>,
        ticket: FetchTicket,
    ) -> bool {
        if ticket.0 != self.generation.load(Ordering::SeqCst) {
            log::debug!(
                "[QueryCache] Dropping superseded result for {}?{}",
                key.endpoint,
                key.args
            );
            return false;
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                tags,
                freshness: Freshness::Fresh,
            },
        );
        true
    }

    /// A fresh cached value, if one exists.
    pub fn get_fresh(&self, key: &QueryKey) -> Option<V> {
        self.entries.get(key).and_then(|entry| {
            (entry.freshness == Freshness::Fresh).then(|| entry.value.clone())
        })
    }

    /// Any cached value, fresh or stale. Stale data backs the "prior
    /// data stays visible on error" behavior.
    pub fn get_any(&self, key: &QueryKey) -> Option<(V, Freshness)> {
        self.entries
            .get(key)
            .map(|entry| (entry.value.clone(), entry.freshness))
    }

    /// Mark every entry whose tags intersect the given set as stale.
    pub fn invalidate(&self, tags: &[Tag]) {
        if tags.is_empty() {
            return;
        }
        for mut entry in self.entries.iter_mut() {
            if entry.tags.iter().any(|tag| tags.contains(tag)) {
                entry.freshness = Freshness::Stale;
            }
        }
    }

    /// Drop everything, including stale fallbacks.
    pub fn clear(&self) {
        self.entries.clear();
        self.flights.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
