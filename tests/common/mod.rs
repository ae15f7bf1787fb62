// tests/common/mod.rs

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vanguard_posture::config::ScanConfig;
use vanguard_posture::core::error::{FetchError, ResolveError};
use vanguard_posture::core::models::HttpSnapshot;
use vanguard_posture::core::transport::{Fetcher, RecordKind, Resolver};
use vanguard_posture::PostureScanner;

/// Replays one canned response and remembers every request.
pub struct FakeFetcher {
    response: Result<HttpSnapshot, FetchError>,
    stalled: bool,
    pub calls: Mutex<Vec<(String, bool)>>,
}

impl FakeFetcher {
    pub fn responding(status_code: u16, headers: &[(&str, &str)], body: &str) -> Self {
        Self {
            response: Ok(HttpSnapshot {
                status_code,
                headers: headers.iter().copied().collect(),
                body: body.to_string(),
            }),
            stalled: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(FetchError(message.to_string())),
            stalled: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Never answers, whatever timeout it is handed.
    pub fn stalling() -> Self {
        Self {
            stalled: true,
            ..Self::failing("unused")
        }
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(
        &self,
        url: &str,
        _timeout: Duration,
        follow_redirects: bool,
    ) -> Result<HttpSnapshot, FetchError> {
        self.calls.lock().unwrap().push((url.to_string(), follow_redirects));
        if self.stalled {
            std::future::pending::<()>().await;
        }
        self.response.clone()
    }
}

/// Answers from a fixed zone; names not in it have no records.
#[derive(Default)]
pub struct FakeResolver {
    zone: HashMap<(String, RecordKind), Result<Vec<String>, ResolveError>>,
    stalled: Vec<String>,
    pub queries: Mutex<Vec<(String, RecordKind)>>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_txt(mut self, name: &str, records: &[&str]) -> Self {
        self.zone.insert(
            (name.to_string(), RecordKind::Txt),
            Ok(records.iter().map(|r| r.to_string()).collect()),
        );
        self
    }

    pub fn with_ds(mut self, name: &str, records: &[&str]) -> Self {
        self.zone.insert(
            (name.to_string(), RecordKind::Ds),
            Ok(records.iter().map(|r| r.to_string()).collect()),
        );
        self
    }

    pub fn with_error(mut self, name: &str, kind: RecordKind, error: ResolveError) -> Self {
        self.zone.insert((name.to_string(), kind), Err(error));
        self
    }

    /// Queries for `name` never answer.
    pub fn stalling(mut self, name: &str) -> Self {
        self.stalled.push(name.to_string());
        self
    }

    pub fn queried_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.queries.lock().unwrap().iter().map(|(n, _)| n.clone()).collect();
        names.sort();
        names
    }
}

#[async_trait]
impl Resolver for FakeResolver {
    async fn resolve(&self, name: &str, kind: RecordKind) -> Result<Vec<String>, ResolveError> {
        self.queries.lock().unwrap().push((name.to_string(), kind));
        if self.stalled.iter().any(|s| s == name) {
            std::future::pending::<()>().await;
        }
        self.zone
            .get(&(name.to_string(), kind))
            .cloned()
            .unwrap_or(Err(ResolveError::NoAnswer))
    }
}

pub fn test_config() -> ScanConfig {
    ScanConfig::default().with_timeout_secs(1).unwrap()
}

pub fn scanner(fetcher: Arc<FakeFetcher>, resolver: Arc<FakeResolver>) -> PostureScanner {
    PostureScanner::with_capabilities(test_config(), fetcher, resolver)
}

pub fn scanner_with(
    config: ScanConfig,
    fetcher: Arc<FakeFetcher>,
    resolver: Arc<FakeResolver>,
) -> PostureScanner {
    PostureScanner::with_capabilities(config, fetcher, resolver)
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
