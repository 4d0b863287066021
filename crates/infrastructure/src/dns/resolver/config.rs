use ferrous_stub_domain::ResolverConfig;
use std::time::Duration;

/// Per-call pacing knobs, snapshotted from [`ResolverConfig`] at build time.
#[derive(Debug, Clone)]
pub struct QueryTiming {
    pub grace_period: Duration,

    pub send_attempts: u32,

    pub send_retry_delay: Duration,

    pub inter_server_delay: Duration,

    pub recv_poll_interval: Duration,

    pub max_response_size: usize,
}

impl From<&ResolverConfig> for QueryTiming {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            grace_period: config.grace_period(),
            send_attempts: config.send_attempts.max(1),
            send_retry_delay: config.send_retry_delay(),
            inter_server_delay: config.inter_server_delay(),
            recv_poll_interval: config.recv_poll_interval(),
            max_response_size: config.max_response_size.max(512),
        }
    }
}

impl Default for QueryTiming {
    fn default() -> Self {
        Self::from(&ResolverConfig::default())
    }
}

impl QueryTiming {
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn with_send_attempts(mut self, attempts: u32) -> Self {
        self.send_attempts = attempts.max(1);
        self
    }

    pub fn with_recv_poll_interval(mut self, interval: Duration) -> Self {
        self.recv_poll_interval = interval;
        self
    }
}
