//! Cheap syntactic checks that decide whether a hostname needs the network at all.

const MULTICAST_SUFFIX: &str = ".local";

/// Exactly four dot-separated decimal octets, each in `0..=255`.
pub fn is_ipv4_literal(s: &str) -> bool {
    let mut count = 0;
    for part in s.split('.') {
        count += 1;
        if count > 4 || part.is_empty() || part.len() > 3 {
            return false;
        }
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match part.parse::<u16>() {
            Ok(n) if n <= 255 => {}
            _ => return false,
        }
    }
    count == 4
}

/// Three to eight colon-separated hex groups, each at most `0xFFFF`, empty groups allowed.
///
/// Permissive on purpose: anything passing here is handed to the numeric resolver,
/// which does the real parsing.
pub fn is_ipv6_literal(s: &str) -> bool {
    let groups: Vec<&str> = s.split(':').collect();
    if groups.len() < 3 || groups.len() > 8 {
        return false;
    }
    groups.iter().all(|group| {
        group.is_empty()
            || (group.bytes().all(|b| b.is_ascii_hexdigit())
                && u32::from_str_radix(group, 16).is_ok_and(|v| v <= 0xFFFF))
    })
}

pub fn is_numeric_literal(s: &str) -> bool {
    is_ipv4_literal(s) || is_ipv6_literal(s)
}

/// Names under `.local` go to the mDNS group instead of the unicast resolvers.
pub fn is_multicast_scope(hostname: &str) -> bool {
    let name = hostname.strip_suffix('.').unwrap_or(hostname);
    name.len() > MULTICAST_SUFFIX.len()
        && name
            .get(name.len() - MULTICAST_SUFFIX.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(MULTICAST_SUFFIX))
}
