use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Recursive resolvers queried in parallel; literals or hostnames, optional port.
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    /// Overall collection deadline per `resolve` call.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Deadline extension granted after each newly accepted answer.
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,

    #[serde(default = "default_send_attempts")]
    pub send_attempts: u32,

    #[serde(default = "default_send_retry_delay_ms")]
    pub send_retry_delay_ms: u64,

    #[serde(default = "default_inter_server_delay_ms")]
    pub inter_server_delay_ms: u64,

    #[serde(default = "default_recv_poll_interval_ms")]
    pub recv_poll_interval_ms: u64,

    #[serde(default = "default_max_response_size")]
    pub max_response_size: usize,

    /// Also query the host's configured resolver (resolv.conf).
    #[serde(default = "default_true")]
    pub use_system_resolver: bool,

    /// Expire cache entries after the smallest TTL seen in the answers.
    #[serde(default = "default_false")]
    pub honor_ttl: bool,

    /// Let concurrent lookups of the same key share one network exchange.
    #[serde(default = "default_false")]
    pub coalesce_inflight: bool,
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn send_retry_delay(&self) -> Duration {
        Duration::from_millis(self.send_retry_delay_ms)
    }

    pub fn inter_server_delay(&self) -> Duration {
        Duration::from_millis(self.inter_server_delay_ms)
    }

    pub fn recv_poll_interval(&self) -> Duration {
        Duration::from_millis(self.recv_poll_interval_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            timeout_ms: default_timeout_ms(),
            cache_capacity: default_cache_capacity(),
            grace_period_ms: default_grace_period_ms(),
            send_attempts: default_send_attempts(),
            send_retry_delay_ms: default_send_retry_delay_ms(),
            inter_server_delay_ms: default_inter_server_delay_ms(),
            recv_poll_interval_ms: default_recv_poll_interval_ms(),
            max_response_size: default_max_response_size(),
            use_system_resolver: true,
            honor_ttl: false,
            coalesce_inflight: false,
        }
    }
}

fn default_servers() -> Vec<String> {
    vec![
        "8.8.8.8".to_string(),
        "1.1.1.1".to_string(),
        "9.9.9.9".to_string(),
    ]
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_cache_capacity() -> usize {
    32
}

fn default_grace_period_ms() -> u64 {
    50
}

fn default_send_attempts() -> u32 {
    10
}

fn default_send_retry_delay_ms() -> u64 {
    10
}

fn default_inter_server_delay_ms() -> u64 {
    1
}

fn default_recv_poll_interval_ms() -> u64 {
    5
}

fn default_max_response_size() -> usize {
    512
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}
