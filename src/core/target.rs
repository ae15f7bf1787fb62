// src/core/target.rs

use crate::core::error::ScanError;
use tracing::debug;
use url::Url;

/// Normalizes raw user input into the absolute URL fetched by header scans.
///
/// A missing scheme becomes `https://`; port, query and fragment are dropped
/// and the path defaults to `/`.
pub fn normalize_url(raw: &str) -> Result<Url, ScanError> {
    let mut url = parse_with_scheme(raw)?;
    // Only fails for cannot-be-a-base URLs, which have no host and were rejected above.
    let _ = url.set_port(None);
    url.set_query(None);
    url.set_fragment(None);
    debug!(input = raw, normalized = %url, "Normalized URL target.");
    Ok(url)
}

/// Extracts the bare host name used by DNS scans.
pub fn normalize_domain(raw: &str) -> Result<String, ScanError> {
    let url = parse_with_scheme(raw)?;
    let host = url
        .host_str()
        .map(|h| h.trim_end_matches('.').to_ascii_lowercase())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ScanError::invalid_target(raw, "no host component"))?;
    debug!(input = raw, domain = %host, "Normalized domain target.");
    Ok(host)
}

fn parse_with_scheme(raw: &str) -> Result<Url, ScanError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScanError::invalid_target(raw, "empty input"));
    }

    let with_scheme = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&with_scheme).map_err(|e| ScanError::invalid_target(raw, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScanError::invalid_target(
            raw,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ScanError::invalid_target(raw, "no host component")),
    }
}

/// True when `input` opens with `scheme://`. A `://` later in the string,
/// such as a redirect URL in the query, does not count.
fn has_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
