use super::config::QueryTiming;
use super::inflight::{InflightMap, InflightRole};
use super::pending::PendingQuery;
use crate::dns::cache::{AnswerCache, CacheKey};
use crate::dns::forwarding::{MessageBuilder, ResponseParser};
use crate::dns::server_pool::ServerPool;
use crate::dns::transport::{DatagramSocket, DatagramSocketFactory};
use crate::system::{NumericHostResolver, SystemDnsConfig};
use ferrous_stub_domain::{
    is_multicast_scope, is_numeric_literal, AddrInfo, AddrInfoHints, AddressAnswer,
    AddressFamily, DomainError, SocketType,
};
use ferrous_stub_domain::dns_protocol::DEFAULT_DNS_PORT;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// IPv4 mDNS group (RFC 6762).
pub const MDNS_GROUP: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(224, 0, 0, 251)), 5353);

/// Fans queries out to every configured resolver over UDP and folds the
/// replies into one answer set.
pub struct StubResolver {
    pub(super) pool: Arc<ServerPool>,
    pub(super) cache: Arc<AnswerCache>,
    pub(super) transport: Arc<dyn DatagramSocketFactory>,
    pub(super) numeric: Arc<dyn NumericHostResolver>,
    pub(super) system_dns: Option<Arc<dyn SystemDnsConfig>>,
    pub(super) timing: QueryTiming,
    pub(super) inflight: Option<InflightMap>,
}

impl StubResolver {
    /// `getaddrinfo`-shaped entry point.
    ///
    /// Numeric literals never touch the network or the cache. Everything else
    /// is answered from cache or by querying all selected servers at once.
    pub async fn resolve(
        &self,
        hostname: &str,
        port: u16,
        hints: AddrInfoHints,
    ) -> Result<Vec<AddrInfo>, DomainError> {
        let hostname = hostname.to_ascii_lowercase();

        if is_numeric_literal(&hostname) {
            debug!(hostname = %hostname, "Numeric literal, skipping network");
            return self.numeric.resolve_numeric(
                &hostname,
                port,
                hints.family,
                hints.socktype,
                hints.protocol,
            );
        }

        let answers = self.lookup(&hostname, hints.family).await?;
        self.to_addr_info(&answers, port, hints.socktype, hints.protocol)
    }

    pub async fn getaddrinfo(
        &self,
        hostname: &str,
        port: u16,
        family: AddressFamily,
    ) -> Result<Vec<AddrInfo>, DomainError> {
        self.resolve(hostname, port, AddrInfoHints::new(family)).await
    }

    pub fn set_servers(&self, servers: impl IntoIterator<Item = impl Into<String>>) {
        self.pool.set_servers(servers);
    }

    pub fn add_server(&self, server: impl Into<String>) -> bool {
        self.pool.add_server(server)
    }

    pub fn set_timeout(&self, timeout: Duration) {
        self.pool.set_timeout(timeout);
    }

    pub fn set_cache_capacity(&self, capacity: usize) {
        self.pool.set_cache_capacity(capacity);
        self.cache.resize(capacity);
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn server_pool(&self) -> &Arc<ServerPool> {
        &self.pool
    }

    pub fn cache(&self) -> &Arc<AnswerCache> {
        &self.cache
    }

    async fn lookup(
        &self,
        hostname: &str,
        family: AddressFamily,
    ) -> Result<Vec<AddressAnswer>, DomainError> {
        if let Some(answers) = self.cache.get(hostname, family) {
            debug!(hostname = %hostname, family = %family, "Cache HIT");
            return Ok(answers);
        }
        debug!(hostname = %hostname, family = %family, "Cache MISS");

        let Some(inflight) = &self.inflight else {
            return self.resolve_uncached(hostname, family).await;
        };

        match inflight.register_or_join(CacheKey::new(hostname, family)) {
            InflightRole::Follower(rx) => {
                debug!(hostname = %hostname, "Joining in-flight resolution");
                InflightMap::wait(rx)
                    .await
                    .map(|answers| (*answers).clone())
                    .ok_or_else(|| DomainError::ResolutionFailed(hostname.to_string()))
            }
            InflightRole::Leader(guard) => {
                let result = self.resolve_uncached(hostname, family).await;
                guard.finish(result.as_ref().ok().map(|a| Arc::new(a.clone())));
                result
            }
        }
    }

    async fn resolve_uncached(
        &self,
        hostname: &str,
        family: AddressFamily,
    ) -> Result<Vec<AddressAnswer>, DomainError> {
        let pending = self.query_network(hostname, family).await?;
        self.cache
            .insert(hostname, family, pending.answers.clone(), pending.min_ttl);
        Ok(pending.answers)
    }

    async fn query_network(
        &self,
        hostname: &str,
        family: AddressFamily,
    ) -> Result<PendingQuery, DomainError> {
        let multicast = is_multicast_scope(hostname);

        // Encoding errors surface before any socket is opened.
        let mut queries = Vec::with_capacity(family.record_types().len());
        let mut ids = Vec::with_capacity(queries.capacity());
        for record_type in family.record_types() {
            let (id, bytes) = MessageBuilder::build_query_with_id(hostname, record_type)?;
            ids.push(id);
            queries.push(bytes);
        }

        let targets = self.select_targets(multicast).await;
        let mut pending = PendingQuery::new(hostname, targets, multicast);
        pending.ids.extend(ids);

        let timeout = self.pool.timeout();
        let started = Instant::now();

        let socket = self.transport.open(&pending.targets).await?;
        self.dispatch(socket.as_ref(), &queries, &mut pending).await;
        self.collect(socket.as_ref(), &mut pending, started + timeout)
            .await;
        drop(socket);

        debug!(
            hostname = %hostname,
            dispatched = pending.dispatched,
            received = pending.received,
            answers = pending.answers.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Collection finished"
        );

        if pending.answers.is_empty() {
            return Err(DomainError::ResolutionFailed(hostname.to_string()));
        }
        Ok(pending)
    }

    async fn select_targets(&self, multicast: bool) -> Vec<SocketAddr> {
        if multicast {
            return vec![MDNS_GROUP];
        }

        let mut targets = self.pool.resolve_targets().await;
        if let Some(ip) = self
            .system_dns
            .as_ref()
            .and_then(|system| system.default_resolver())
            .filter(|ip| !ip.is_unspecified())
        {
            let addr = SocketAddr::new(ip, DEFAULT_DNS_PORT);
            if !targets.contains(&addr) {
                targets.push(addr);
            }
        }
        targets
    }

    /// Sends every query to every target before any reply is read.
    async fn dispatch(
        &self,
        socket: &dyn DatagramSocket,
        queries: &[Vec<u8>],
        pending: &mut PendingQuery,
    ) {
        for query in queries {
            for target in &pending.targets {
                if self.send_with_retry(socket, query, *target).await {
                    pending.dispatched += 1;
                }
                sleep(self.timing.inter_server_delay).await;
            }
        }
    }

    async fn send_with_retry(
        &self,
        socket: &dyn DatagramSocket,
        query: &[u8],
        target: SocketAddr,
    ) -> bool {
        let attempts = self.timing.send_attempts;
        for attempt in 1..=attempts {
            match socket.send_to(query, target).await {
                Ok(sent) if sent == query.len() => return true,
                Ok(sent) => {
                    debug!(server = %target, sent, expected = query.len(), attempt, "Partial send");
                }
                Err(e) => {
                    debug!(server = %target, error = %e, attempt, "Send failed");
                }
            }
            if attempt < attempts {
                sleep(self.timing.send_retry_delay).await;
            }
        }

        warn!(
            error = %DomainError::TransportError {
                server: target.to_string(),
                reason: format!("gave up after {} attempts", attempts),
            },
            "Skipping server"
        );
        false
    }

    /// Reads replies until `hard_deadline`, or until every dispatched query
    /// was answered. Each new answer pulls the deadline in to `now + grace`.
    async fn collect(
        &self,
        socket: &dyn DatagramSocket,
        pending: &mut PendingQuery,
        hard_deadline: Instant,
    ) {
        let mut deadline = hard_deadline;
        let mut buf = vec![0u8; self.timing.max_response_size];

        while !pending.is_complete() && Instant::now() < deadline {
            let (len, source) = match socket.try_recv_from(&mut buf) {
                Ok(received) => received,
                Err(e) => {
                    if e.kind() != io::ErrorKind::WouldBlock {
                        debug!(hostname = %pending.hostname, error = %e, "Receive failed");
                    }
                    sleep(self.timing.recv_poll_interval).await;
                    continue;
                }
            };

            let datagram = &buf[..len];
            if !pending.accepts(datagram, source) {
                continue;
            }
            pending.received += 1;

            let response = match ResponseParser::parse(datagram) {
                Ok(response) => response,
                Err(e) => {
                    debug!(
                        hostname = %pending.hostname,
                        source = %source,
                        error = %e,
                        "Discarding undecodable reply"
                    );
                    continue;
                }
            };

            let added = pending.absorb(response.answers, response.min_ttl);
            debug!(
                hostname = %pending.hostname,
                source = %source,
                added,
                total = pending.answers.len(),
                "Reply accepted"
            );
            if added > 0 {
                deadline = (Instant::now() + self.timing.grace_period).min(hard_deadline);
            }
        }
    }

    fn to_addr_info(
        &self,
        answers: &[AddressAnswer],
        port: u16,
        socktype: SocketType,
        protocol: i32,
    ) -> Result<Vec<AddrInfo>, DomainError> {
        let mut infos = Vec::with_capacity(answers.len());
        for answer in answers {
            infos.extend(self.numeric.resolve_numeric(
                &answer.address,
                port,
                answer.family,
                socktype,
                protocol,
            )?);
        }
        Ok(infos)
    }
}
