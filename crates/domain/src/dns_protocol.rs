use super::errors::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// A configured resolver address that may or may not be resolved to an IP yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl UpstreamAddr {
    /// Parses `1.2.3.4`, `1.2.3.4:53`, `2001:db8::1`, `[2001:db8::1]:53`,
    /// `dns.example` or `dns.example:53`. Port defaults to 53.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DomainError::ConfigError("Empty server address".into()));
        }

        if let Ok(addr) = SocketAddr::from_str(input) {
            return Ok(UpstreamAddr::Resolved(addr));
        }
        if let Ok(ip) = IpAddr::from_str(input) {
            return Ok(UpstreamAddr::Resolved(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
        }
        if input.starts_with('[') {
            let inner = input.trim_start_matches('[').trim_end_matches(']');
            return IpAddr::from_str(inner)
                .map(|ip| UpstreamAddr::Resolved(SocketAddr::new(ip, DEFAULT_DNS_PORT)))
                .map_err(|_| {
                    DomainError::ConfigError(format!("Invalid server address '{}'", input))
                });
        }

        let (host, port) = match input.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    DomainError::ConfigError(format!("Invalid port in server address '{}'", input))
                })?;
                (host, port)
            }
            None => (input, DEFAULT_DNS_PORT),
        };

        if host.is_empty() || host.contains(':') {
            return Err(DomainError::ConfigError(format!(
                "Invalid server address '{}'",
                input
            )));
        }

        Ok(UpstreamAddr::Unresolved {
            hostname: Arc::from(host),
            port,
        })
    }

    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            UpstreamAddr::Resolved(addr) => Some(*addr),
            UpstreamAddr::Unresolved { .. } => None,
        }
    }

    /// Returns (hostname, port) if this address is unresolved.
    pub fn unresolved_parts(&self) -> Option<(&str, u16)> {
        match self {
            UpstreamAddr::Unresolved { hostname, port } => Some((hostname, *port)),
            UpstreamAddr::Resolved(_) => None,
        }
    }
}

impl FromStr for UpstreamAddr {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}
