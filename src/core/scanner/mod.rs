// src/core/scanner/mod.rs

pub mod cookie_policy;
pub mod csp_policy;
pub mod dns_scanner;
pub mod fingerprint_scanner;
pub mod header_rules;
pub mod headers_scanner;

use self::dns_scanner::run_dns_scan;
use self::headers_scanner::run_headers_scan;
use crate::config::ScanConfig;
use crate::core::checks::{DnsCheck, HeaderCheck, resolve_requested};
use crate::core::error::ScanError;
use crate::core::models::{FullScanReport, ScanReport};
use crate::core::request::{ScanKind, ScanRequest};
use crate::core::target::{normalize_domain, normalize_url};
use crate::core::transport::{Fetcher, HickoryResolver, ReqwestFetcher, Resolver};
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{info, instrument};

/// Entry point for both evaluators.
///
/// Holds only configuration and the two outbound capabilities, so one
/// instance can serve any number of concurrent scans.
#[derive(Clone)]
pub struct PostureScanner {
    config: ScanConfig,
    fetcher: Arc<dyn Fetcher>,
    resolver: Arc<dyn Resolver>,
}

impl PostureScanner {
    /// Builds a scanner wired to the reqwest and hickory capabilities.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        let fetcher = ReqwestFetcher::new(&config.user_agent).map_err(|e| ScanError::Setup {
            component: "HTTP client",
            message: e.to_string(),
        })?;
        let resolver = HickoryResolver::new(config.timeout);
        Ok(Self::with_capabilities(
            config,
            Arc::new(fetcher),
            Arc::new(resolver),
        ))
    }

    pub fn with_capabilities(
        config: ScanConfig,
        fetcher: Arc<dyn Fetcher>,
        resolver: Arc<dyn Resolver>,
    ) -> Self {
        Self {
            config,
            fetcher,
            resolver,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Fetches `target` once and evaluates the requested header checks.
    ///
    /// An empty `requested` list selects the default header checks.
    #[instrument(skip(self, requested))]
    pub async fn evaluate_headers(
        &self,
        target: &str,
        requested: &[String],
    ) -> Result<ScanReport, ScanError> {
        let url = normalize_url(target)?;
        let checks = resolve_requested(requested, HeaderCheck::defaults());
        Ok(run_headers_scan(self.fetcher.as_ref(), &url, &checks, &self.config).await)
    }

    /// Queries the records of `target` and evaluates the requested DNS checks.
    #[instrument(skip(self, requested))]
    pub async fn evaluate_dns(
        &self,
        target: &str,
        requested: &[String],
    ) -> Result<ScanReport, ScanError> {
        let domain = normalize_domain(target)?;
        let checks = resolve_requested(requested, DnsCheck::defaults());
        Ok(run_dns_scan(Arc::clone(&self.resolver), &domain, &checks, &self.config).await)
    }

    /// Every header check, the technology fingerprint included, plus every
    /// DNS check, run concurrently against the same target.
    pub async fn run_full_scan(&self, target: &str) -> Result<FullScanReport, ScanError> {
        info!(target, "Starting full scan.");
        let header_checks: Vec<String> = HeaderCheck::iter().map(|c| c.to_string()).collect();

        let (headers, dns) = tokio::join!(
            self.evaluate_headers(target, &header_checks),
            self.evaluate_dns(target, &[])
        );

        Ok(FullScanReport {
            headers: headers?,
            dns: dns?,
        })
    }

    /// Handles one JSON request body for the given evaluator.
    pub async fn handle_request(
        &self,
        kind: ScanKind,
        payload: &str,
    ) -> Result<ScanReport, ScanError> {
        let request = ScanRequest::from_json(payload)?;
        let target = request.target_for(kind)?;
        match kind {
            ScanKind::Headers => self.evaluate_headers(target, request.checks()).await,
            ScanKind::Dns => self.evaluate_dns(target, request.checks()).await,
        }
    }
}
