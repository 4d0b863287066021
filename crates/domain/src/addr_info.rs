use super::dns_record::AddressFamily;
use std::fmt;
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SocketType {
    #[default]
    Stream,
    Datagram,
    Raw,
}

impl SocketType {
    /// Conventional `SOCK_*` value. Zero (unset) maps to `Stream`.
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 | 1 => Some(SocketType::Stream),
            2 => Some(SocketType::Datagram),
            3 => Some(SocketType::Raw),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> i32 {
        match self {
            SocketType::Stream => 1,
            SocketType::Datagram => 2,
            SocketType::Raw => 3,
        }
    }
}

/// Call-site hints, shaped after the `getaddrinfo` arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddrInfoHints {
    pub family: AddressFamily,
    pub socktype: SocketType,
    pub protocol: i32,
    /// Accepted for call-site compatibility; no flag changes resolution.
    pub flags: i32,
}

impl AddrInfoHints {
    pub fn new(family: AddressFamily) -> Self {
        Self {
            family,
            ..Self::default()
        }
    }

    pub fn with_socktype(mut self, socktype: SocketType) -> Self {
        self.socktype = socktype;
        self
    }

    pub fn with_protocol(mut self, protocol: i32) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_flags(mut self, flags: i32) -> Self {
        self.flags = flags;
        self
    }
}

/// One `(family, socktype, proto, canonname, sockaddr)` tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddrInfo {
    pub family: AddressFamily,
    pub socktype: SocketType,
    pub protocol: i32,
    pub canonical_name: String,
    pub socket_addr: SocketAddr,
}

impl fmt::Display for AddrInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, '{}', {})",
            self.family,
            self.socktype.as_raw(),
            self.protocol,
            self.canonical_name,
            self.socket_addr
        )
    }
}
