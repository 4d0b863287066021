#![allow(dead_code)]
use std::net::IpAddr;

/// Builds replies the way a recursive resolver would: the query's ID and
/// question echoed back, then answers that point at the question name.
pub struct ResponseBuilder {
    id: [u8; 2],
    question: Vec<u8>,
    records: Vec<Vec<u8>>,
}

impl ResponseBuilder {
    pub fn for_query(query: &[u8]) -> Self {
        Self {
            id: [query[0], query[1]],
            question: query[12..].to_vec(),
            records: Vec::new(),
        }
    }

    pub fn with_id(id: u16) -> Self {
        Self {
            id: id.to_be_bytes(),
            question: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn address(mut self, ip: IpAddr, ttl: u32) -> Self {
        let (rtype, rdata) = match ip {
            IpAddr::V4(v4) => (1u16, v4.octets().to_vec()),
            IpAddr::V6(v6) => (28u16, v6.octets().to_vec()),
        };
        self.records.push(record(rtype, ttl, &rdata));
        self
    }

    pub fn a(self, ip: &str, ttl: u32) -> Self {
        self.address(ip.parse().unwrap(), ttl)
    }

    pub fn cname(mut self, ttl: u32) -> Self {
        self.records.push(record(5, ttl, &[0xc0, 0x0c]));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(512);
        buf.extend_from_slice(&self.id);
        buf.extend_from_slice(&[0x81, 0x80]);
        let qdcount: u16 = if self.question.is_empty() { 0 } else { 1 };
        buf.extend_from_slice(&qdcount.to_be_bytes());
        buf.extend_from_slice(&(self.records.len() as u16).to_be_bytes());
        buf.extend_from_slice(&[0, 0, 0, 0]);
        buf.extend_from_slice(&self.question);
        for record in self.records {
            buf.extend_from_slice(&record);
        }
        buf
    }
}

fn record(rtype: u16, ttl: u32, rdata: &[u8]) -> Vec<u8> {
    let mut rr = vec![0xc0, 0x0c];
    rr.extend_from_slice(&rtype.to_be_bytes());
    rr.extend_from_slice(&1u16.to_be_bytes());
    rr.extend_from_slice(&ttl.to_be_bytes());
    rr.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    rr.extend_from_slice(rdata);
    rr
}

/// QTYPE of the single question in `query`.
pub fn question_type(query: &[u8]) -> u16 {
    let mut pos = 12;
    while query[pos] != 0 {
        pos += query[pos] as usize + 1;
    }
    u16::from_be_bytes([query[pos + 1], query[pos + 2]])
}

/// Transaction ID of `query`.
pub fn query_id(query: &[u8]) -> u16 {
    u16::from_be_bytes([query[0], query[1]])
}
