use url::Url;

/// Trailing `/api/v1`-style suffixes removed before appending the liveness path.
const VERSIONED_SUFFIXES: [&str; 2] = ["/api/v", "/v"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointUrlError {
    #[error("endpoint url is empty")]
    Empty,

    #[error("endpoint url '{url}' is not valid: {reason}")]
    Invalid { url: String, reason: String },

    #[error("endpoint url '{url}' must use http or https")]
    UnsupportedScheme { url: String },
}

/// Trims whitespace and trailing slashes, and checks the URL is an absolute http(s) URL.
pub fn normalize_base_url(raw: &str) -> Result<String, EndpointUrlError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(EndpointUrlError::Empty);
    }

    let parsed = Url::parse(trimmed).map_err(|e| EndpointUrlError::Invalid {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        _ => {
            return Err(EndpointUrlError::UnsupportedScheme {
                url: raw.to_string(),
            });
        }
    }

    if parsed.host_str().is_none() {
        return Err(EndpointUrlError::Invalid {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(trimmed.to_string())
}

/// `{base}/{path}` with exactly one slash between the two.
pub fn join_path(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Removes a trailing versioned API segment (`/api/v1`, `/v2`, ...) from a base URL.
///
/// Only the path is searched; a host such as `v1` is left alone.
pub fn strip_versioned_suffix(base: &str) -> &str {
    let base = base.trim_end_matches('/');
    let path_start = path_offset(base);
    let path = &base[path_start..];

    for prefix in VERSIONED_SUFFIXES {
        if let Some(idx) = path.rfind(prefix) {
            let version = &path[idx + prefix.len()..];
            if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) {
                return &base[..path_start + idx];
            }
        }
    }

    base
}

/// Byte offset where the path begins, after `scheme://authority`.
fn path_offset(base: &str) -> usize {
    let authority_start = base.find("://").map_or(0, |i| i + 3);
    base[authority_start..]
        .find(['/', '?', '#'])
        .map_or(base.len(), |i| authority_start + i)
}

/// Liveness URL for an endpoint base URL.
pub fn health_url(base: &str, health_path: &str) -> String {
    join_path(strip_versioned_suffix(base), health_path)
}
