use crate::dns::cache::CacheKey;
use dashmap::DashMap;
use ferrous_stub_domain::AddressAnswer;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tokio::sync::watch;

type InflightResult = Option<Arc<Vec<AddressAnswer>>>;
type InflightSender = Arc<watch::Sender<InflightResult>>;
type InflightTable = Arc<DashMap<CacheKey, InflightSender, FxBuildHasher>>;

/// One network exchange per key; later callers wait for the first one.
#[derive(Default)]
pub struct InflightMap {
    table: InflightTable,
}

pub enum InflightRole {
    Leader(InflightLeaderGuard),
    Follower(watch::Receiver<InflightResult>),
}

impl InflightMap {
    pub fn new() -> Self {
        Self {
            table: Arc::new(DashMap::with_hasher(FxBuildHasher)),
        }
    }

    pub fn register_or_join(&self, key: CacheKey) -> InflightRole {
        match self.table.entry(key.clone()) {
            dashmap::Entry::Occupied(e) => {
                let rx = e.get().subscribe();
                drop(e);
                InflightRole::Follower(rx)
            }
            dashmap::Entry::Vacant(e) => {
                let (tx, _rx) = watch::channel(None::<Arc<Vec<AddressAnswer>>>);
                e.insert(Arc::new(tx));
                InflightRole::Leader(InflightLeaderGuard {
                    table: Arc::clone(&self.table),
                    key,
                    finished: false,
                })
            }
        }
    }

    /// Waits for the leader. `None` means the leader failed or went away.
    pub async fn wait(mut rx: watch::Receiver<InflightResult>) -> InflightResult {
        if rx.changed().await.is_ok() {
            return rx.borrow().clone();
        }
        rx.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Releases the key when the leader finishes, fails, or is dropped mid-flight.
pub struct InflightLeaderGuard {
    table: InflightTable,
    key: CacheKey,
    finished: bool,
}

impl InflightLeaderGuard {
    pub fn finish(mut self, result: InflightResult) {
        self.finished = true;
        if let Some((_, tx)) = self.table.remove(&self.key) {
            let _ = tx.send(result);
        }
    }
}

impl Drop for InflightLeaderGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some((_, tx)) = self.table.remove(&self.key) {
            let _ = tx.send(None);
        }
    }
}
