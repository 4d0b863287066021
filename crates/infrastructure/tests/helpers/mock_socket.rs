#![allow(dead_code)]
use async_trait::async_trait;
use ferrous_stub_infrastructure::dns::transport::{DatagramSocket, DatagramSocketFactory};
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// A datagram the scripted network delivers after `delay`.
#[derive(Debug, Clone)]
pub struct Reply {
    pub bytes: Vec<u8>,
    pub source: SocketAddr,
    pub delay: Duration,
}

impl Reply {
    pub fn new(source: SocketAddr, bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            source,
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Responder = dyn Fn(&[u8], SocketAddr) -> Vec<Reply> + Send + Sync;

#[derive(Default)]
struct NetworkState {
    opened: AtomicUsize,
    dropped: AtomicUsize,
    fail_sends: AtomicUsize,
    short_sends: AtomicUsize,
    open_targets: Mutex<Vec<Vec<SocketAddr>>>,
    sent: Mutex<Vec<(Vec<u8>, SocketAddr)>>,
    unreachable: Mutex<Vec<SocketAddr>>,
}

/// In-memory stand-in for the UDP transport.
///
/// Every query sent is handed to the responder, whose replies become readable
/// once their delay has elapsed on the tokio clock.
#[derive(Clone)]
pub struct ScriptedTransport {
    responder: Arc<Responder>,
    state: Arc<NetworkState>,
}

impl ScriptedTransport {
    pub fn new(responder: impl Fn(&[u8], SocketAddr) -> Vec<Reply> + Send + Sync + 'static) -> Self {
        Self {
            responder: Arc::new(responder),
            state: Arc::new(NetworkState::default()),
        }
    }

    /// A network where nobody ever answers.
    pub fn silent() -> Self {
        Self::new(|_, _| Vec::new())
    }

    pub fn factory(&self) -> Arc<dyn DatagramSocketFactory> {
        Arc::new(self.clone())
    }

    pub fn opened(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    pub fn dropped(&self) -> usize {
        self.state.dropped.load(Ordering::SeqCst)
    }

    /// Targets passed to each `open` call, in order.
    pub fn open_targets(&self) -> Vec<Vec<SocketAddr>> {
        self.state.open_targets.lock().unwrap().clone()
    }

    /// Every datagram that was accepted for sending.
    pub fn sent(&self) -> Vec<(Vec<u8>, SocketAddr)> {
        self.state.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, target: SocketAddr) -> usize {
        self.sent().iter().filter(|(_, to)| *to == target).count()
    }

    /// The next `n` send attempts fail with an I/O error.
    pub fn fail_next_sends(&self, n: usize) {
        self.state.fail_sends.store(n, Ordering::SeqCst);
    }

    /// The next `n` send attempts report a short write.
    pub fn short_next_sends(&self, n: usize) {
        self.state.short_sends.store(n, Ordering::SeqCst);
    }

    /// Every send to `target` fails.
    pub fn make_unreachable(&self, target: SocketAddr) {
        self.state.unreachable.lock().unwrap().push(target);
    }
}

fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl DatagramSocketFactory for ScriptedTransport {
    async fn open(&self, targets: &[SocketAddr]) -> io::Result<Box<dyn DatagramSocket>> {
        self.state.opened.fetch_add(1, Ordering::SeqCst);
        self.state
            .open_targets
            .lock()
            .unwrap()
            .push(targets.to_vec());
        Ok(Box::new(ScriptedSocket {
            responder: Arc::clone(&self.responder),
            state: Arc::clone(&self.state),
            inbox: Mutex::new(Vec::new()),
        }))
    }

    fn protocol_name(&self) -> &'static str {
        "scripted"
    }
}

struct ScriptedSocket {
    responder: Arc<Responder>,
    state: Arc<NetworkState>,
    inbox: Mutex<Vec<(Instant, Vec<u8>, SocketAddr)>>,
}

#[async_trait]
impl DatagramSocket for ScriptedSocket {
    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        if self.state.unreachable.lock().unwrap().contains(&target) {
            return Err(io::Error::from(io::ErrorKind::ConnectionRefused));
        }
        if take_one(&self.state.fail_sends) {
            return Err(io::Error::other("scripted send failure"));
        }
        if take_one(&self.state.short_sends) {
            return Ok(buf.len() - 1);
        }

        self.state
            .sent
            .lock()
            .unwrap()
            .push((buf.to_vec(), target));

        let now = Instant::now();
        let mut inbox = self.inbox.lock().unwrap();
        for reply in (self.responder)(buf, target) {
            inbox.push((now + reply.delay, reply.bytes, reply.source));
        }
        Ok(buf.len())
    }

    fn try_recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        let now = Instant::now();
        let mut inbox = self.inbox.lock().unwrap();

        let next = inbox
            .iter()
            .enumerate()
            .filter(|(_, (ready_at, _, _))| *ready_at <= now)
            .min_by_key(|(_, (ready_at, _, _))| *ready_at)
            .map(|(index, _)| index);

        match next {
            Some(index) => {
                let (_, bytes, source) = inbox.remove(index);
                let len = bytes.len().min(buf.len());
                buf[..len].copy_from_slice(&bytes[..len]);
                Ok((len, source))
            }
            None => Err(io::Error::from(io::ErrorKind::WouldBlock)),
        }
    }
}

impl Drop for ScriptedSocket {
    fn drop(&mut self) {
        self.state.dropped.fetch_add(1, Ordering::SeqCst);
    }
}
