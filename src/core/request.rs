// src/core/request.rs

//! The JSON request boundary: `{"url": ..., "domain": ..., "checks": [...]}`.

use crate::core::error::ScanError;
use serde::Deserialize;
use strum::{Display, EnumString};
use tracing::debug;

/// Which evaluator a request is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, clap::ValueEnum)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ScanKind {
    Headers,
    Dns,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ScanRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub checks: Option<Vec<String>>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ScanRequest {
    /// Parses a request body. An empty body is an empty request.
    pub fn from_json(payload: &str) -> Result<Self, ScanError> {
        let payload = if payload.trim().is_empty() { "{}" } else { payload };
        let request: ScanRequest = serde_json::from_str(payload)?;
        debug!(?request, "Parsed scan request.");
        Ok(request)
    }

    /// Header scans read `url` only.
    pub fn header_target(&self) -> Result<&str, ScanError> {
        non_blank(&self.url).ok_or(ScanError::MissingTarget("URL"))
    }

    /// DNS scans take `url` first and fall back to `domain`.
    pub fn dns_target(&self) -> Result<&str, ScanError> {
        non_blank(&self.url)
            .or_else(|| non_blank(&self.domain))
            .ok_or(ScanError::MissingTarget("domain or URL"))
    }

    pub fn target_for(&self, kind: ScanKind) -> Result<&str, ScanError> {
        match kind {
            ScanKind::Headers => self.header_target(),
            ScanKind::Dns => self.dns_target(),
        }
    }

    /// Requested check names; empty means the default list.
    pub fn checks(&self) -> &[String] {
        self.checks.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_takes_precedence_over_domain_for_dns() {
        let request =
            ScanRequest::from_json(r#"{"url": "https://a.example/x", "domain": "b.example"}"#).unwrap();
        assert_eq!(request.dns_target().unwrap(), "https://a.example/x");

        let request = ScanRequest::from_json(r#"{"url": "  ", "domain": "b.example"}"#).unwrap();
        assert_eq!(request.dns_target().unwrap(), "b.example");
    }

    #[test]
    fn header_scans_ignore_domain() {
        let request = ScanRequest::from_json(r#"{"domain": "b.example"}"#).unwrap();
        assert!(matches!(
            request.header_target(),
            Err(ScanError::MissingTarget(_))
        ));
    }

    #[test]
    fn malformed_payload_is_rejected() {
        assert!(matches!(
            ScanRequest::from_json("{not json"),
            Err(ScanError::MalformedRequest(_))
        ));
        assert!(matches!(
            ScanRequest::from_json(r#"{"url": "a.example", "checks": "SPF"}"#),
            Err(ScanError::MalformedRequest(_))
        ));
    }

    #[test]
    fn empty_body_and_missing_checks() {
        let request = ScanRequest::from_json("").unwrap();
        assert_eq!(request, ScanRequest::default());
        assert!(request.checks().is_empty());

        let request = ScanRequest::from_json(r#"{"url": "a.example", "checks": ["SPF"]}"#).unwrap();
        assert_eq!(request.checks(), ["SPF".to_string()]);
    }

    #[test]
    fn scan_kind_parses_case_insensitively() {
        assert_eq!("DNS".parse::<ScanKind>().unwrap(), ScanKind::Dns);
        assert_eq!(ScanKind::Headers.to_string(), "headers");
    }
}
