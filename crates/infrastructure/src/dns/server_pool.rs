use super::transport::resolver::resolve_upstream;
use ferrous_stub_domain::{ResolverConfig, UpstreamAddr};
use std::net::SocketAddr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on looking up a server given by hostname.
const SERVER_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
struct PoolState {
    servers: Vec<String>,
    timeout: Duration,
    cache_capacity: usize,
}

/// The mutable set of resolvers every `resolve` call fans out to.
#[derive(Debug)]
pub struct ServerPool {
    state: RwLock<PoolState>,
}

impl ServerPool {
    pub fn new(
        servers: impl IntoIterator<Item = impl Into<String>>,
        timeout: Duration,
        cache_capacity: usize,
    ) -> Self {
        Self {
            state: RwLock::new(PoolState {
                servers: dedup(servers),
                timeout,
                cache_capacity,
            }),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(
            config.servers.iter().cloned(),
            config.timeout(),
            config.cache_capacity,
        )
    }

    fn read(&self) -> RwLockReadGuard<'_, PoolState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PoolState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the configured servers; duplicates collapse to their first occurrence.
    pub fn set_servers(&self, servers: impl IntoIterator<Item = impl Into<String>>) {
        let servers = dedup(servers);
        debug!(count = servers.len(), "Server set replaced");
        self.write().servers = servers;
    }

    /// Puts `server` at the front of the list unless it is already configured.
    pub fn add_server(&self, server: impl Into<String>) -> bool {
        let server = server.into();
        let mut state = self.write();
        if state.servers.contains(&server) {
            return false;
        }
        debug!(server = %server, "Server added");
        state.servers.insert(0, server);
        true
    }

    pub fn set_timeout(&self, timeout: Duration) {
        self.write().timeout = timeout;
    }

    pub fn set_cache_capacity(&self, capacity: usize) {
        self.write().cache_capacity = capacity;
    }

    pub fn servers(&self) -> Vec<String> {
        self.read().servers.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.read().timeout
    }

    pub fn cache_capacity(&self) -> usize {
        self.read().cache_capacity
    }

    /// Socket addresses of every configured server that can be resolved right now.
    ///
    /// A server that fails to parse or resolve is skipped, never fatal.
    pub async fn resolve_targets(&self) -> Vec<SocketAddr> {
        let (servers, timeout) = {
            let state = self.read();
            (state.servers.clone(), state.timeout.min(SERVER_LOOKUP_TIMEOUT))
        };

        let mut targets = Vec::with_capacity(servers.len());
        for server in &servers {
            let upstream = match UpstreamAddr::parse(server) {
                Ok(upstream) => upstream,
                Err(e) => {
                    warn!(server = %server, error = %e, "Skipping unparsable server");
                    continue;
                }
            };

            match resolve_upstream(&upstream, timeout).await {
                Ok(addrs) => {
                    if let Some(addr) = addrs.into_iter().next() {
                        if !targets.contains(&addr) {
                            targets.push(addr);
                        }
                    }
                }
                Err(e) => {
                    warn!(server = %server, error = %e, "Skipping unresolvable server");
                }
            }
        }

        targets
    }
}

impl Default for ServerPool {
    fn default() -> Self {
        Self::from_config(&ResolverConfig::default())
    }
}

fn dedup(servers: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for server in servers {
        let server = server.into();
        if !unique.contains(&server) {
            unique.push(server);
        }
    }
    unique
}
