pub mod cache;
pub mod forwarding;
pub mod resolver;
pub mod server_pool;
pub mod transport;

pub use cache::{AnswerCache, CacheEntry, CacheKey, CacheMetrics};
pub use forwarding::{decode_response, encode_query, DnsResponse, MessageBuilder, ResponseParser};
pub use resolver::{QueryTiming, ResolverBuilder, StubResolver};
pub use server_pool::ServerPool;
pub use transport::{DatagramSocket, DatagramSocketFactory, UdpTransport};
