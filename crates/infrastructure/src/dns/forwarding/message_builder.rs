//! DNS Message Builder
//!
//! Writes standard recursive queries in RFC 1035 §4.1 wire format by hand.
//! Only the header and a single question are ever emitted.

use ferrous_stub_domain::{DomainError, RecordType};
use ring::rand::{SecureRandom, SystemRandom};

pub const HEADER_LEN: usize = 12;

/// Standard query, recursion desired.
const FLAGS_RD: [u8; 2] = [0x01, 0x00];
const CLASS_IN: u16 = 1;
const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 255;

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a DNS query message and serialize to wire format bytes
    pub fn build_query(domain: &str, record_type: &RecordType) -> Result<Vec<u8>, DomainError> {
        Self::build_query_with_id(domain, record_type).map(|(_, bytes)| bytes)
    }

    /// Build a query and return the transaction ID alongside the bytes.
    pub fn build_query_with_id(
        domain: &str,
        record_type: &RecordType,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        let qname = encode_name(domain)?;
        let id = transaction_id()?;

        let mut buf = Vec::with_capacity(HEADER_LEN + qname.len() + 4);
        buf.extend_from_slice(&id.to_be_bytes());
        buf.extend_from_slice(&FLAGS_RD);
        buf.extend_from_slice(&1u16.to_be_bytes()); // QDCOUNT
        buf.extend_from_slice(&[0; 6]); // ANCOUNT, NSCOUNT, ARCOUNT
        buf.extend_from_slice(&qname);
        buf.extend_from_slice(&record_type.code().to_be_bytes());
        buf.extend_from_slice(&CLASS_IN.to_be_bytes());

        Ok((id, buf))
    }
}

/// Fresh 16-bit ID from the OS CSPRNG.
fn transaction_id() -> Result<u16, DomainError> {
    let mut bytes = [0u8; 2];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| DomainError::IoError("System RNG unavailable".to_string()))?;
    Ok(u16::from_be_bytes(bytes))
}

/// Encodes `hostname` for the question of a `record_type` query.
pub fn encode_query(hostname: &str, record_type: RecordType) -> Result<Vec<u8>, DomainError> {
    MessageBuilder::build_query(hostname, &record_type)
}

/// Length-prefixed labels plus the root terminator.
///
/// Rejects rather than truncates: empty names, empty labels, non-ASCII bytes,
/// labels over 63 bytes and names over 255 bytes on the wire.
fn encode_name(domain: &str) -> Result<Vec<u8>, DomainError> {
    let name = domain.strip_suffix('.').unwrap_or(domain);
    if name.is_empty() {
        return Err(DomainError::InvalidDomainName(
            "Empty domain name".to_string(),
        ));
    }
    if !name.is_ascii() {
        return Err(DomainError::InvalidDomainName(format!(
            "Non-ASCII domain '{}'",
            domain
        )));
    }

    let mut out = Vec::with_capacity(name.len() + 2);
    for label in name.split('.') {
        if label.is_empty() {
            return Err(DomainError::InvalidDomainName(format!(
                "Empty label in '{}'",
                domain
            )));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "Label '{}' exceeds {} bytes",
                label, MAX_LABEL_LEN
            )));
        }
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);

    if out.len() > MAX_NAME_LEN {
        return Err(DomainError::InvalidDomainName(format!(
            "Domain '{}' exceeds {} bytes on the wire",
            domain, MAX_NAME_LEN
        )));
    }

    Ok(out)
}
