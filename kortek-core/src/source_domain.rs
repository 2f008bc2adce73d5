//! Resolution of provider-relative asset paths against a source domain.

/// Strips an `http://` or `https://` prefix.
pub fn strip_scheme(domain: &str) -> &str {
    domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain)
}

/// Turns a provider-relative asset path into an absolute URL on `domain`.
///
/// Absolute `http(s)` URLs are returned unchanged and an empty path stays empty.
pub fn resolve_asset_url(path: &str, domain: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    let domain = strip_scheme(domain).trim_end_matches('/');
    format!("https://{}/{}", domain, path.trim_start_matches('/'))
}

/// Host-name syntax check: dot separated labels of 1-63 alphanumerics or
/// hyphens, never starting or ending with a hyphen.
pub fn is_valid_domain(domain: &str) -> bool {
    let domain = strip_scheme(domain);
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
