use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_RESOLV_CONF: &str = "/etc/resolv.conf";

/// The host's own resolver, if it has one configured.
pub trait SystemDnsConfig: Send + Sync {
    /// `None` when nothing usable is configured. An unspecified address
    /// (`0.0.0.0` / `::`) counts as nothing configured.
    fn default_resolver(&self) -> Option<IpAddr>;
}

/// Reads the first `nameserver` entry of a resolv.conf file on every call.
#[derive(Debug, Clone)]
pub struct ResolvConf {
    path: PathBuf,
}

impl ResolvConf {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn parse(content: &str) -> Option<IpAddr> {
        content
            .lines()
            .map(|line| line.split(['#', ';']).next().unwrap_or("").trim())
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                match fields.next() {
                    Some("nameserver") => fields.next(),
                    _ => None,
                }
            })
            // Drop any zone suffix such as `fe80::1%eth0`.
            .filter_map(|value| value.split('%').next()?.parse::<IpAddr>().ok())
            .find(|ip| !ip.is_unspecified())
    }
}

impl Default for ResolvConf {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLV_CONF)
    }
}

impl SystemDnsConfig for ResolvConf {
    fn default_resolver(&self) -> Option<IpAddr> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No system resolver config");
                None
            }
        }
    }
}

/// A fixed answer, for hosts that learn their resolver some other way (DHCP, PPP).
#[derive(Debug, Clone, Copy)]
pub struct StaticSystemDns(pub Option<IpAddr>);

impl SystemDnsConfig for StaticSystemDns {
    fn default_resolver(&self) -> Option<IpAddr> {
        self.0.filter(|ip| !ip.is_unspecified())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoSystemDns;

impl SystemDnsConfig for NoSystemDns {
    fn default_resolver(&self) -> Option<IpAddr> {
        None
    }
}
