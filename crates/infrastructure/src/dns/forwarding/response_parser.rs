use super::message_builder::HEADER_LEN;
use ferrous_stub_domain::{AddressAnswer, DomainError, RecordType};
use tracing::debug;

/// First byte of a name compression pointer.
const POINTER_MARKER: u8 = 0xC0;
/// mDNS reuses the top bit of CLASS as the cache-flush flag.
const CLASS_MASK: u16 = 0x7FFF;
const CLASS_IN: u16 = 1;
/// Pointer (2) + TYPE (2) + CLASS (2) + TTL (4) + RDLENGTH (2).
const FIXED_RR_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsResponse {
    pub id: u16,

    pub answers: Vec<AddressAnswer>,

    /// Smallest TTL among the decoded address records.
    pub min_ttl: Option<u32>,
}

pub struct ResponseParser;

impl ResponseParser {
    /// Decodes the answer section of a reply.
    ///
    /// Each answer is located by scanning for the `0xC0` pointer marker, so the
    /// owner name must be a compression pointer. Replies that spell the owner
    /// name out in full are not supported and are reported as invalid or
    /// misread; every conforming recursive resolver compresses it.
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        if response_bytes.len() < HEADER_LEN {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response too short: {} bytes",
                response_bytes.len()
            )));
        }

        let id = read_u16(response_bytes, 0);
        let answer_count = read_u16(response_bytes, 6);
        if answer_count == 0 {
            return Err(DomainError::InvalidDnsResponse(
                "Response carries no answers".to_string(),
            ));
        }

        let mut answers = Vec::with_capacity(answer_count as usize);
        let mut min_ttl: Option<u32> = None;
        let mut pos = HEADER_LEN;

        for _ in 0..answer_count {
            pos = response_bytes[pos.min(response_bytes.len())..]
                .iter()
                .position(|&b| b == POINTER_MARKER)
                .map(|offset| pos + offset)
                .ok_or_else(|| {
                    DomainError::InvalidDnsResponse("Answer record not found".to_string())
                })?;

            if pos + FIXED_RR_LEN > response_bytes.len() {
                return Err(DomainError::InvalidDnsResponse(
                    "Truncated answer record".to_string(),
                ));
            }

            let answer_type = read_u16(response_bytes, pos + 2);
            let class = read_u16(response_bytes, pos + 4) & CLASS_MASK;
            if class != CLASS_IN {
                return Err(DomainError::InvalidDnsResponse(format!(
                    "Unexpected record class {}",
                    class
                )));
            }
            let ttl = read_u32(response_bytes, pos + 6);
            let data_length = read_u16(response_bytes, pos + 10) as usize;

            pos += FIXED_RR_LEN;
            let rdata = response_bytes.get(pos..pos + data_length).ok_or_else(|| {
                DomainError::InvalidDnsResponse("Truncated record data".to_string())
            })?;

            let answer = match RecordType::from_code(answer_type) {
                Some(RecordType::A) if data_length == RecordType::A.rdata_len() => {
                    let mut octets = [0u8; 4];
                    octets.copy_from_slice(rdata);
                    Some(AddressAnswer::ipv4(octets))
                }
                Some(RecordType::AAAA) if data_length == RecordType::AAAA.rdata_len() => {
                    let mut octets = [0u8; 16];
                    octets.copy_from_slice(rdata);
                    Some(AddressAnswer::ipv6(octets))
                }
                _ => {
                    debug!(
                        record_type = answer_type,
                        length = data_length,
                        "Skipping unsupported answer record"
                    );
                    None
                }
            };

            if let Some(answer) = answer {
                min_ttl = Some(min_ttl.map_or(ttl, |current| current.min(ttl)));
                answers.push(answer);
            }

            pos += data_length;
        }

        Ok(DnsResponse {
            id,
            answers,
            min_ttl,
        })
    }
}

/// Decodes only the address answers of a reply.
pub fn decode_response(bytes: &[u8]) -> Result<Vec<AddressAnswer>, DomainError> {
    ResponseParser::parse(bytes).map(|response| response.answers)
}

/// Transaction ID of a datagram, if it is long enough to carry a header.
pub fn header_id(bytes: &[u8]) -> Option<u16> {
    (bytes.len() >= HEADER_LEN).then(|| read_u16(bytes, 0))
}

#[inline]
fn read_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([buf[at], buf[at + 1]])
}

#[inline]
fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}
