// src/core/transport.rs

//! The outbound capabilities the evaluators depend on.
//!
//! Evaluators only see the `Fetcher` and `Resolver` traits; the reqwest and
//! hickory implementations below are what the binary wires in. Neither
//! implementation retries a failed call.

use crate::core::error::{FetchError, ResolveError};
use crate::core::models::{HeaderSet, HttpSnapshot};
use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::RecordType;
use reqwest::redirect::Policy;
use std::time::Duration;
use strum::Display;
use tracing::{debug, info, warn};

/// DNS record types the DNS evaluator queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RecordKind {
    Txt,
    Ds,
}

impl From<RecordKind> for RecordType {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Txt => RecordType::TXT,
            RecordKind::Ds => RecordType::DS,
        }
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
        follow_redirects: bool,
    ) -> Result<HttpSnapshot, FetchError>;
}

#[async_trait]
pub trait Resolver: Send + Sync {
    /// Returns the records of `kind` at `name` as display strings.
    async fn resolve(&self, name: &str, kind: RecordKind) -> Result<Vec<String>, ResolveError>;
}

// --- HTTP ---

/// `Fetcher` backed by two reqwest clients, one per redirect policy.
pub struct ReqwestFetcher {
    following: reqwest::Client,
    direct: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let build = |policy: Policy| {
            reqwest::Client::builder()
                .user_agent(user_agent)
                .redirect(policy)
                .build()
                .map_err(|e| FetchError(format!("Failed to build HTTP client: {e}")))
        };
        Ok(Self {
            following: build(Policy::limited(10))?,
            direct: build(Policy::none())?,
        })
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
        follow_redirects: bool,
    ) -> Result<HttpSnapshot, FetchError> {
        let client = if follow_redirects { &self.following } else { &self.direct };
        debug!(url, ?timeout, follow_redirects, "Sending HTTP request.");

        let response = client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                warn!(url, error = %e, "HTTP request failed.");
                FetchError(e.to_string())
            })?;

        let status_code = response.status().as_u16();
        info!(url, status = status_code, "Received HTTP response.");

        let mut headers = HeaderSet::new();
        for (name, value) in response.headers() {
            match value.to_str() {
                Ok(v) => headers.insert(name.as_str(), v),
                Err(_) => {
                    warn!(header_name = %name, "Header contained invalid UTF-8.");
                    headers.insert(name.as_str(), &String::from_utf8_lossy(value.as_bytes()));
                }
            }
        }

        let body = response.text().await.unwrap_or_else(|e| {
            warn!(url, error = %e, "Could not read response body.");
            String::new()
        });

        Ok(HttpSnapshot {
            status_code,
            headers,
            body,
        })
    }
}

// --- DNS ---

/// `Resolver` backed by the hickory tokio resolver.
pub struct HickoryResolver {
    inner: TokioAsyncResolver,
}

impl HickoryResolver {
    /// System-independent resolver with a single attempt per query.
    pub fn new(timeout: Duration) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 1;
        Self {
            inner: TokioAsyncResolver::tokio(ResolverConfig::default(), opts),
        }
    }
}

#[async_trait]
impl Resolver for HickoryResolver {
    async fn resolve(&self, name: &str, kind: RecordKind) -> Result<Vec<String>, ResolveError> {
        debug!(name, %kind, "Resolving DNS records.");
        match self.inner.lookup(name, kind.into()).await {
            Ok(lookup) => {
                let records: Vec<String> = lookup.iter().map(|rdata| rdata.to_string()).collect();
                debug!(name, %kind, count = records.len(), "DNS lookup answered.");
                if records.is_empty() {
                    Err(ResolveError::NoAnswer)
                } else {
                    Ok(records)
                }
            }
            Err(e) => {
                let mapped = match e.kind() {
                    ResolveErrorKind::NoRecordsFound { response_code, .. }
                        if *response_code == ResponseCode::NXDomain =>
                    {
                        ResolveError::NxDomain
                    }
                    ResolveErrorKind::NoRecordsFound { .. } => ResolveError::NoAnswer,
                    ResolveErrorKind::Timeout => ResolveError::Timeout,
                    _ => ResolveError::Failed(e.to_string()),
                };
                if mapped.is_absent_record() {
                    debug!(name, %kind, "No records of this type.");
                } else {
                    warn!(name, %kind, error = %e, "DNS lookup failed.");
                }
                Err(mapped)
            }
        }
    }
}
