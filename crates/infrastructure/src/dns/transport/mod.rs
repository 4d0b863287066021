pub mod resolver;
pub mod udp;

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;

pub use udp::{UdpDatagramSocket, UdpTransport};

/// Non-blocking datagram endpoint owned by one resolution call.
///
/// Dropping the socket closes it.
#[async_trait]
pub trait DatagramSocket: Send + Sync {
    /// Sends one datagram. A short count is reported as-is; the caller decides
    /// whether to retry.
    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize>;

    /// Returns `ErrorKind::WouldBlock` when no datagram is waiting.
    fn try_recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;
}

#[async_trait]
pub trait DatagramSocketFactory: Send + Sync {
    /// Opens a socket able to reach every address in `targets`.
    async fn open(&self, targets: &[SocketAddr]) -> io::Result<Box<dyn DatagramSocket>>;

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
