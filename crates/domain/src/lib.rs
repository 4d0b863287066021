//! Ferrous Stub Domain Layer
pub mod addr_info;
pub mod address;
pub mod config;
pub mod dns_protocol;
pub mod dns_record;
pub mod errors;

pub use addr_info::{AddrInfo, AddrInfoHints, SocketType};
pub use address::{is_ipv4_literal, is_ipv6_literal, is_multicast_scope, is_numeric_literal};
pub use config::{CliOverrides, Config, ConfigError, LoggingConfig, ResolverConfig};
pub use dns_protocol::UpstreamAddr;
pub use dns_record::{AddressAnswer, AddressFamily, RecordType};
pub use errors::DomainError;
