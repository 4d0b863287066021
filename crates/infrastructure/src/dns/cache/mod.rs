pub mod answer_cache;
pub mod key;
pub mod metrics;

pub use answer_cache::{AnswerCache, CacheEntry};
pub use key::CacheKey;
pub use metrics::CacheMetrics;
