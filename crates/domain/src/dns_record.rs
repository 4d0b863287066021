use serde::{Deserialize, Serialize};
use std::fmt;

/// Question types the resolver knows how to ask for and decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    AAAA,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
        }
    }

    /// Wire value of the QTYPE/TYPE field.
    pub fn code(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::AAAA => 28,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(RecordType::A),
            28 => Some(RecordType::AAAA),
            _ => None,
        }
    }

    /// Expected RDLENGTH of an address record of this type.
    pub fn rdata_len(&self) -> usize {
        match self {
            RecordType::A => 4,
            RecordType::AAAA => 16,
        }
    }

    pub fn family(&self) -> AddressFamily {
        match self {
            RecordType::A => AddressFamily::Inet,
            RecordType::AAAA => AddressFamily::Inet6,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    #[default]
    Inet,
    Inet6,
    Unspecified,
}

impl AddressFamily {
    /// Record types queried for this family, in dispatch order.
    pub fn record_types(&self) -> &'static [RecordType] {
        match self {
            AddressFamily::Inet => &[RecordType::A],
            AddressFamily::Inet6 => &[RecordType::AAAA],
            AddressFamily::Unspecified => &[RecordType::A, RecordType::AAAA],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressFamily::Inet => "AF_INET",
            AddressFamily::Inet6 => "AF_INET6",
            AddressFamily::Unspecified => "AF_UNSPEC",
        }
    }

    /// Whether an answer of family `other` satisfies a request for `self`.
    pub fn accepts(&self, other: AddressFamily) -> bool {
        matches!(self, AddressFamily::Unspecified) || *self == other
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded address record. Equality is structural and drives deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressAnswer {
    pub family: AddressFamily,
    pub address: String,
}

impl AddressAnswer {
    pub fn new(family: AddressFamily, address: impl Into<String>) -> Self {
        Self {
            family,
            address: address.into(),
        }
    }

    pub fn ipv4(octets: [u8; 4]) -> Self {
        Self::new(
            AddressFamily::Inet,
            format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3]),
        )
    }

    /// Eight lowercase hex groups, no zero compression.
    pub fn ipv6(octets: [u8; 16]) -> Self {
        let groups: Vec<String> = octets
            .chunks_exact(2)
            .map(|pair| format!("{:x}", u16::from_be_bytes([pair[0], pair[1]])))
            .collect();
        Self::new(AddressFamily::Inet6, groups.join(":"))
    }
}

impl fmt::Display for AddressAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.address)
    }
}
