use crate::dns::forwarding::{header_id, HEADER_LEN};
use ferrous_stub_domain::AddressAnswer;
use smallvec::SmallVec;
use std::net::SocketAddr;
use tracing::debug;

/// In-flight state of one `resolve` call. Never shared between calls.
#[derive(Debug)]
pub struct PendingQuery {
    pub hostname: String,
    /// One transaction ID per record type asked for.
    pub ids: SmallVec<[u16; 2]>,
    pub targets: Vec<SocketAddr>,
    pub multicast: bool,
    pub dispatched: usize,
    pub received: usize,
    pub answers: Vec<AddressAnswer>,
    pub min_ttl: Option<u32>,
}

impl PendingQuery {
    pub fn new(hostname: &str, targets: Vec<SocketAddr>, multicast: bool) -> Self {
        Self {
            hostname: hostname.to_string(),
            ids: SmallVec::new(),
            targets,
            multicast,
            dispatched: 0,
            received: 0,
            answers: Vec::new(),
            min_ttl: None,
        }
    }

    /// True once every dispatched query has been answered.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.received >= self.dispatched
    }

    /// Checks that a datagram belongs to this call: a full header, one of our
    /// transaction IDs, and, for unicast, one of the servers we asked.
    pub fn accepts(&self, datagram: &[u8], source: SocketAddr) -> bool {
        let Some(id) = header_id(datagram) else {
            debug!(
                hostname = %self.hostname,
                source = %source,
                len = datagram.len(),
                min = HEADER_LEN,
                "Discarding runt datagram"
            );
            return false;
        };

        if !self.ids.contains(&id) {
            debug!(hostname = %self.hostname, source = %source, id, "Discarding reply with foreign ID");
            return false;
        }

        // mDNS responders answer from their own address, not the group's.
        if !self.multicast && !self.targets.iter().any(|t| same_endpoint(t, &source)) {
            debug!(hostname = %self.hostname, source = %source, "Discarding reply from unexpected source");
            return false;
        }

        true
    }

    /// Folds decoded answers in, keeping first-seen order. Returns how many were new.
    pub fn absorb(&mut self, answers: Vec<AddressAnswer>, ttl: Option<u32>) -> usize {
        let mut added = 0;
        for answer in answers {
            if !self.answers.contains(&answer) {
                self.answers.push(answer);
                added += 1;
            }
        }
        if added > 0 {
            if let Some(ttl) = ttl {
                self.min_ttl = Some(self.min_ttl.map_or(ttl, |current| current.min(ttl)));
            }
        }
        added
    }
}

fn same_endpoint(expected: &SocketAddr, actual: &SocketAddr) -> bool {
    expected.port() == actual.port() && expected.ip().to_canonical() == actual.ip().to_canonical()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrous_stub_domain::AddressFamily;

    fn reply(id: u16) -> Vec<u8> {
        let mut buf = id.to_be_bytes().to_vec();
        buf.extend_from_slice(&[0x81, 0x80, 0, 1, 0, 1, 0, 0, 0, 0]);
        buf
    }

    fn pending(multicast: bool) -> PendingQuery {
        let mut pending = PendingQuery::new(
            "example.com",
            vec!["8.8.8.8:53".parse().unwrap()],
            multicast,
        );
        pending.ids.push(0x1111);
        pending
    }

    #[test]
    fn test_accepts_matching_reply() {
        let pending = pending(false);
        assert!(pending.accepts(&reply(0x1111), "8.8.8.8:53".parse().unwrap()));
    }

    #[test]
    fn test_rejects_foreign_id_short_and_wrong_source() {
        let pending = pending(false);
        assert!(!pending.accepts(&reply(0x2222), "8.8.8.8:53".parse().unwrap()));
        assert!(!pending.accepts(&reply(0x1111)[..11], "8.8.8.8:53".parse().unwrap()));
        assert!(!pending.accepts(&reply(0x1111), "6.6.6.6:53".parse().unwrap()));
        assert!(!pending.accepts(&reply(0x1111), "8.8.8.8:5353".parse().unwrap()));
    }

    #[test]
    fn test_mapped_source_matches() {
        let pending = pending(false);
        assert!(pending.accepts(&reply(0x1111), "[::ffff:8.8.8.8]:53".parse().unwrap()));
    }

    #[test]
    fn test_multicast_skips_source_check() {
        let pending = pending(true);
        assert!(pending.accepts(&reply(0x1111), "192.168.1.50:5353".parse().unwrap()));
    }

    #[test]
    fn test_absorb_deduplicates() {
        let mut pending = pending(false);
        let a = AddressAnswer::new(AddressFamily::Inet, "1.2.3.4");
        let b = AddressAnswer::new(AddressFamily::Inet, "5.6.7.8");

        assert_eq!(pending.absorb(vec![a.clone()], Some(300)), 1);
        assert_eq!(pending.absorb(vec![a.clone(), b.clone()], Some(60)), 1);
        assert_eq!(pending.absorb(vec![b.clone()], Some(5)), 0);
        assert_eq!(pending.answers, vec![a, b]);
        assert_eq!(pending.min_ttl, Some(60));
    }
}
