use super::config::QueryTiming;
use super::core::StubResolver;
use super::inflight::InflightMap;
use crate::dns::cache::AnswerCache;
use crate::dns::server_pool::ServerPool;
use crate::dns::transport::{DatagramSocketFactory, UdpTransport};
use crate::system::{NumericAddrInfo, NumericHostResolver, ResolvConf, SystemDnsConfig};
use ferrous_stub_domain::ResolverConfig;
use std::sync::Arc;
use tracing::info;

pub struct ResolverBuilder {
    config: ResolverConfig,
    timing: Option<QueryTiming>,
    pool: Option<Arc<ServerPool>>,
    cache: Option<Arc<AnswerCache>>,
    transport: Option<Arc<dyn DatagramSocketFactory>>,
    numeric: Option<Arc<dyn NumericHostResolver>>,
    system_dns: Option<Arc<dyn SystemDnsConfig>>,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
            timing: None,
            pool: None,
            cache: None,
            transport: None,
            numeric: None,
            system_dns: None,
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_timing(mut self, timing: QueryTiming) -> Self {
        self.timing = Some(timing);
        self
    }

    pub fn with_server_pool(mut self, pool: Arc<ServerPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_cache(mut self, cache: Arc<AnswerCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn DatagramSocketFactory>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_numeric_resolver(mut self, numeric: Arc<dyn NumericHostResolver>) -> Self {
        self.numeric = Some(numeric);
        self
    }

    pub fn with_system_dns(mut self, system_dns: Arc<dyn SystemDnsConfig>) -> Self {
        self.config.use_system_resolver = true;
        self.system_dns = Some(system_dns);
        self
    }

    pub fn without_system_dns(mut self) -> Self {
        self.config.use_system_resolver = false;
        self.system_dns = None;
        self
    }

    pub fn build(self) -> Arc<StubResolver> {
        let pool = self
            .pool
            .unwrap_or_else(|| Arc::new(ServerPool::from_config(&self.config)));
        let cache = self.cache.unwrap_or_else(|| {
            Arc::new(AnswerCache::with_ttl(
                self.config.cache_capacity,
                self.config.honor_ttl,
            ))
        });

        let system_dns: Option<Arc<dyn SystemDnsConfig>> = if self.config.use_system_resolver {
            Some(
                self.system_dns
                    .unwrap_or_else(|| Arc::new(ResolvConf::default())),
            )
        } else {
            None
        };

        info!(
            servers = pool.servers().len(),
            timeout_ms = pool.timeout().as_millis() as u64,
            cache_capacity = cache.capacity(),
            honor_ttl = cache.honors_ttl(),
            system_resolver = self.config.use_system_resolver,
            coalesce_inflight = self.config.coalesce_inflight,
            "Building stub resolver"
        );

        Arc::new(StubResolver {
            pool,
            cache,
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(UdpTransport::new())),
            numeric: self
                .numeric
                .unwrap_or_else(|| Arc::new(NumericAddrInfo)),
            system_dns,
            timing: self
                .timing
                .unwrap_or_else(|| QueryTiming::from(&self.config)),
            inflight: self.config.coalesce_inflight.then(InflightMap::new),
        })
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
