// src/core/models.rs

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString};

// --- Core Data Models ---

/// Verdict level of a single finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Status {
    Passed,
    Warning,
    Failed,
    Info,
    Error,
}

impl Status {
    /// Classifies an HTTP response code: 2xx/3xx pass, 4xx warn, the rest fail.
    /// A missing code means the target could not be reached.
    pub fn from_status_code(code: Option<u16>) -> Self {
        match code {
            Some(200..=399) => Status::Passed,
            Some(400..=499) => Status::Warning,
            _ => Status::Failed,
        }
    }
}

/// The outcome of one rule before it is attached to a check name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: Status,
    pub value: Option<String>,
    pub notes: String,
    pub details: BTreeMap<String, String>,
}

impl Verdict {
    pub fn new(status: Status, value: Option<&str>, notes: impl Into<String>) -> Self {
        Self {
            status,
            value: value.map(str::to_string),
            notes: notes.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn passed(value: Option<&str>, notes: impl Into<String>) -> Self {
        Self::new(Status::Passed, value, notes)
    }

    pub fn warning(value: Option<&str>, notes: impl Into<String>) -> Self {
        Self::new(Status::Warning, value, notes)
    }

    pub fn failed(value: Option<&str>, notes: impl Into<String>) -> Self {
        Self::new(Status::Failed, value, notes)
    }

    pub fn info(value: Option<&str>, notes: impl Into<String>) -> Self {
        Self::new(Status::Info, value, notes)
    }

    pub fn error(notes: impl Into<String>) -> Self {
        Self::new(Status::Error, None, notes)
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<String>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// A single evaluated check.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Finding {
    pub check_name: String,
    pub status: Status,
    pub value: Option<String>,
    pub notes: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

impl Finding {
    pub fn from_verdict(check_name: &str, verdict: Verdict) -> Self {
        Self {
            check_name: check_name.to_string(),
            status: verdict.status,
            value: verdict.value,
            notes: verdict.notes,
            details: verdict.details,
        }
    }

    pub fn error(check_name: &str, notes: impl Into<String>) -> Self {
        Self::from_verdict(check_name, Verdict::error(notes))
    }
}

// --- HTTP Models ---

/// Response headers in arrival order, looked up case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.entries.push((name.to_string(), value.to_string()));
    }

    /// All values of `name`, in arrival order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// The value of `name`, repeated occurrences joined with `, `.
    pub fn get(&self, name: &str) -> Option<String> {
        let values = self.get_all(name);
        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct header names in first-seen order.
    fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (name, _) in &self.entries {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                names.push(name);
            }
        }
        names
    }
}

impl<N: AsRef<str>, V: AsRef<str>> FromIterator<(N, V)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = HeaderSet::new();
        for (name, value) in iter {
            headers.insert(name.as_ref(), value.as_ref());
        }
        headers
    }
}

impl Serialize for HeaderSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names = self.names();
        let mut map = serializer.serialize_map(Some(names.len()))?;
        for name in names {
            map.serialize_entry(name, &self.get(name))?;
        }
        map.end()
    }
}

/// What the fetch capability hands back for one URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpSnapshot {
    pub status_code: u16,
    pub headers: HeaderSet,
    pub body: String,
}

// --- Reports ---

/// Scan-kind specific data carried next to the findings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanDetails {
    Headers {
        status_code: Option<u16>,
        http_status: Status,
        full_headers: HeaderSet,
    },
    Dns {
        domain: String,
        records: BTreeMap<String, Vec<String>>,
    },
}

/// Findings for one target, keyed by check name in request order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScanReport {
    pub target: String,
    #[serde(rename = "security_findings", serialize_with = "findings_as_map")]
    pub findings: Vec<Finding>,
    #[serde(flatten)]
    pub details: ScanDetails,
}

impl ScanReport {
    /// Looks up a finding by check name, ignoring ASCII case.
    pub fn finding(&self, check_name: &str) -> Option<&Finding> {
        self.findings
            .iter()
            .find(|f| f.check_name.eq_ignore_ascii_case(check_name))
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.findings.iter().map(|f| f.check_name.as_str()).collect()
    }

    pub fn count(&self, status: Status) -> usize {
        self.findings.iter().filter(|f| f.status == status).count()
    }
}

fn findings_as_map<S: Serializer>(findings: &[Finding], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(findings.iter().map(|f| (f.check_name.as_str(), f)))
}

/// Header and DNS reports for the same target, as shown by the terminal UI.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FullScanReport {
    pub headers: ScanReport,
    pub dns: ScanReport,
}

impl FullScanReport {
    pub fn all_findings(&self) -> impl Iterator<Item = &Finding> {
        self.headers.findings.iter().chain(self.dns.findings.iter())
    }
}
