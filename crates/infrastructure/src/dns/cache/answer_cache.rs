use super::key::CacheKey;
use super::metrics::CacheMetrics;
use ferrous_stub_domain::{AddressAnswer, AddressFamily};
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub answers: Vec<AddressAnswer>,
    /// Only set when the cache honours record TTLs.
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    #[inline]
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Fixed-capacity LRU of resolved answers keyed by `(hostname, family)`.
///
/// Reads promote the entry to most-recently-used; inserting past capacity
/// evicts the least-recently-used entry. Entries never expire unless the
/// cache was built with `honor_ttl`.
pub struct AnswerCache {
    entries: Mutex<LruCache<CacheKey, CacheEntry, FxBuildHasher>>,
    honor_ttl: bool,
    metrics: CacheMetrics,
}

impl AnswerCache {
    pub fn new(capacity: usize) -> Self {
        Self::with_ttl(capacity, false)
    }

    /// A capacity of zero is raised to one.
    pub fn with_ttl(capacity: usize, honor_ttl: bool) -> Self {
        Self {
            entries: Mutex::new(LruCache::with_hasher(
                clamp_capacity(capacity),
                FxBuildHasher,
            )),
            honor_ttl,
            metrics: CacheMetrics::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, CacheEntry, FxBuildHasher>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, hostname: &str, family: AddressFamily) -> Option<Vec<AddressAnswer>> {
        let key = CacheKey::new(hostname, family);
        let now = Instant::now();
        let mut entries = self.lock();

        let lookup = entries
            .get(&key)
            .map(|entry| (entry.is_expired(now), entry.answers.clone()));

        match lookup {
            Some((false, answers)) => {
                CacheMetrics::bump(&self.metrics.hits);
                Some(answers)
            }
            Some((true, _)) => {
                entries.pop(&key);
                CacheMetrics::bump(&self.metrics.expirations);
                CacheMetrics::bump(&self.metrics.misses);
                debug!(hostname = %key.hostname, family = %family, "Cache entry expired");
                None
            }
            None => {
                CacheMetrics::bump(&self.metrics.misses);
                None
            }
        }
    }

    /// Inserts or overwrites the entry; `ttl` is ignored unless TTLs are honoured.
    pub fn insert(
        &self,
        hostname: &str,
        family: AddressFamily,
        answers: Vec<AddressAnswer>,
        ttl: Option<u32>,
    ) {
        let key = CacheKey::new(hostname, family);
        let expires_at = if self.honor_ttl {
            ttl.map(|secs| Instant::now() + Duration::from_secs(u64::from(secs)))
        } else {
            None
        };

        let evicted = self.lock().push(
            key.clone(),
            CacheEntry {
                answers,
                expires_at,
            },
        );

        CacheMetrics::bump(&self.metrics.insertions);
        if let Some((old_key, _)) = evicted {
            if old_key != key {
                CacheMetrics::bump(&self.metrics.evictions);
                debug!(hostname = %old_key.hostname, family = %old_key.family, "Evicted LRU entry");
            }
        }
    }

    /// Membership test that leaves the recency order untouched.
    pub fn contains(&self, hostname: &str, family: AddressFamily) -> bool {
        self.lock().contains(&CacheKey::new(hostname, family))
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// Shrinking drops least-recently-used entries first.
    pub fn resize(&self, capacity: usize) {
        self.lock().resize(clamp_capacity(capacity));
    }

    pub fn honors_ttl(&self) -> bool {
        self.honor_ttl
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}

fn clamp_capacity(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}
