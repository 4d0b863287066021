use compact_str::CompactString;
use ferrous_stub_domain::AddressFamily;

/// `(hostname, family)`; the hostname is stored lowercased, without the
/// single trailing dot the encoder also drops.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub hostname: CompactString,
    pub family: AddressFamily,
}

impl CacheKey {
    #[inline]
    pub fn new(hostname: &str, family: AddressFamily) -> Self {
        let name = hostname.strip_suffix('.').unwrap_or(hostname);
        Self {
            hostname: CompactString::from(name.to_ascii_lowercase()),
            family,
        }
    }
}
