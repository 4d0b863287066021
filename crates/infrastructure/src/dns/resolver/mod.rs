pub mod builder;
pub mod config;
pub mod core;
pub mod inflight;
pub mod pending;

pub use builder::ResolverBuilder;
pub use config::QueryTiming;
pub use core::{StubResolver, MDNS_GROUP};
pub use inflight::{InflightLeaderGuard, InflightMap, InflightRole};
pub use pending::PendingQuery;
