use ferrous_stub_domain::{DomainError, UpstreamAddr};
use std::net::SocketAddr;
use std::time::Duration;

/// Turns a configured server into socket addresses, asking the OS resolver
/// only for servers given by hostname.
pub async fn resolve_upstream(
    upstream: &UpstreamAddr,
    timeout: Duration,
) -> Result<Vec<SocketAddr>, DomainError> {
    match upstream.unresolved_parts() {
        Some((hostname, port)) => resolve_all(hostname, port, timeout).await,
        None => Ok(upstream.socket_addr().into_iter().collect()),
    }
}

/// Resolves a hostname to all its IP addresses (IPv4 + IPv6).
pub async fn resolve_all(
    hostname: &str,
    port: u16,
    timeout: Duration,
) -> Result<Vec<SocketAddr>, DomainError> {
    let target = format!("{}:{}", hostname, port);

    let addrs_iter = tokio::time::timeout(timeout, tokio::net::lookup_host(&target))
        .await
        .map_err(|_| DomainError::TransportError {
            server: target.clone(),
            reason: "server address lookup timed out".to_string(),
        })?
        .map_err(|e| DomainError::TransportError {
            server: target.clone(),
            reason: e.to_string(),
        })?;

    let addrs: Vec<SocketAddr> = addrs_iter.collect();

    if addrs.is_empty() {
        return Err(DomainError::TransportError {
            server: target,
            reason: "no addresses found".to_string(),
        });
    }

    Ok(addrs)
}
