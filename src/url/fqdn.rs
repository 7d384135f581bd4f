/// Longest accepted hostname, trailing dot included
const MAX_HOSTNAME_LEN: usize = 252;

/// Longest accepted DNS label
const MAX_LABEL_LEN: usize = 63;

/// Checks whether a hostname is a syntactically valid fully-qualified domain name
///
/// # Rules
///
/// 1. The supplied string is 2 to 252 characters long (measured before the
///    trailing dot is removed)
/// 2. A single trailing dot is removed
/// 3. Every dot-separated label:
///    - is 1 to 63 characters long
///    - contains only ASCII letters, digits and hyphens
///    - starts and ends with a letter or digit
///
/// Letters are matched case-insensitively.
///
/// # Examples
///
/// ```
/// use sitemap_sweep::url::is_fqdn;
///
/// assert!(is_fqdn("staging.example.com"));
/// assert!(is_fqdn("example.com."));
/// assert!(!is_fqdn("bad..host"));
/// assert!(!is_fqdn("-example.com"));
/// ```
pub fn is_fqdn(hostname: &str) -> bool {
    if hostname.len() < 2 || hostname.len() > MAX_HOSTNAME_LEN {
        return false;
    }

    let hostname = hostname.strip_suffix('.').unwrap_or(hostname);

    hostname.split('.').all(is_valid_label)
}

/// Checks a single DNS label
fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return false;
    }

    let bytes = label.as_bytes();
    let edge_ok = |b: u8| b.is_ascii_alphanumeric();

    edge_ok(bytes[0])
        && edge_ok(bytes[bytes.len() - 1])
        && bytes.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'-')
}
