//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is, without framing. One ephemeral socket is bound per
//! address family the targets need, so a single call can fan out to IPv4 and
//! IPv6 resolvers at once.

use super::{DatagramSocket, DatagramSocketFactory};
use async_trait::async_trait;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::debug;

/// mDNS responders discard queries with a lower hop limit.
const MULTICAST_TTL: u32 = 255;

/// Opens sockets for [`StubResolver`](crate::dns::resolver::StubResolver) calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpTransport;

impl UdpTransport {
    pub fn new() -> Self {
        Self
    }

    fn create_socket(bind_addr: SocketAddr) -> io::Result<UdpSocket> {
        use socket2::{Domain, Protocol, Socket, Type};

        let domain = if bind_addr.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };

        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
        if bind_addr.is_ipv4() {
            socket.set_multicast_ttl_v4(MULTICAST_TTL)?;
        } else {
            socket.set_only_v6(true)?;
            socket.set_multicast_hops_v6(MULTICAST_TTL)?;
        }

        socket.bind(&bind_addr.into())?;
        socket.set_nonblocking(true)?;

        let std_socket: std::net::UdpSocket = socket.into();
        UdpSocket::from_std(std_socket)
    }
}

#[async_trait]
impl DatagramSocketFactory for UdpTransport {
    async fn open(&self, targets: &[SocketAddr]) -> io::Result<Box<dyn DatagramSocket>> {
        let needs_v6 = targets.iter().any(SocketAddr::is_ipv6);
        let needs_v4 = !needs_v6 || targets.iter().any(SocketAddr::is_ipv4);

        let v4 = if needs_v4 {
            Some(Self::create_socket(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)))?)
        } else {
            None
        };
        let v6 = if needs_v6 {
            Some(Self::create_socket(SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)))?)
        } else {
            None
        };

        debug!(ipv4 = v4.is_some(), ipv6 = v6.is_some(), "UDP sockets opened");

        Ok(Box::new(UdpDatagramSocket { v4, v6 }))
    }
}

pub struct UdpDatagramSocket {
    v4: Option<UdpSocket>,
    v6: Option<UdpSocket>,
}

impl UdpDatagramSocket {
    fn for_target(&self, target: &SocketAddr) -> io::Result<&UdpSocket> {
        let socket = if target.is_ipv4() {
            self.v4.as_ref()
        } else {
            self.v6.as_ref()
        };
        socket.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::Unsupported,
                format!("No socket bound for the address family of {}", target),
            )
        })
    }

    pub fn local_addrs(&self) -> Vec<SocketAddr> {
        [self.v4.as_ref(), self.v6.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(|s| s.local_addr().ok())
            .collect()
    }
}

#[async_trait]
impl DatagramSocket for UdpDatagramSocket {
    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        self.for_target(&target)?.send_to(buf, target).await
    }

    fn try_recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        let mut last = io::Error::from(io::ErrorKind::WouldBlock);
        for socket in [self.v4.as_ref(), self.v6.as_ref()].into_iter().flatten() {
            match socket.try_recv_from(buf) {
                Ok(received) => return Ok(received),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
                Err(e) => last = e,
            }
        }
        Err(last)
    }
}
