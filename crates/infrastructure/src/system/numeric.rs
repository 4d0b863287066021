use ferrous_stub_domain::{AddrInfo, AddressFamily, DomainError, SocketType};
use std::net::{IpAddr, SocketAddr};

/// Builds `getaddrinfo` tuples for hosts that are already numeric addresses.
///
/// Used both for literal input and to shape final results from resolved
/// answers. Implementations must not touch the network.
pub trait NumericHostResolver: Send + Sync {
    fn resolve_numeric(
        &self,
        host: &str,
        port: u16,
        family: AddressFamily,
        socktype: SocketType,
        protocol: i32,
    ) -> Result<Vec<AddrInfo>, DomainError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NumericAddrInfo;

impl NumericHostResolver for NumericAddrInfo {
    fn resolve_numeric(
        &self,
        host: &str,
        port: u16,
        family: AddressFamily,
        socktype: SocketType,
        protocol: i32,
    ) -> Result<Vec<AddrInfo>, DomainError> {
        let literal = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        let ip: IpAddr = literal
            .parse()
            .map_err(|_| DomainError::InvalidIpAddress(host.to_string()))?;

        let actual = match ip {
            IpAddr::V4(_) => AddressFamily::Inet,
            IpAddr::V6(_) => AddressFamily::Inet6,
        };
        if !family.accepts(actual) {
            return Err(DomainError::InvalidIpAddress(format!(
                "{} is not an {} address",
                host, family
            )));
        }

        Ok(vec![AddrInfo {
            family: actual,
            socktype,
            protocol,
            canonical_name: String::new(),
            socket_addr: SocketAddr::new(ip, port),
        }])
    }
}
