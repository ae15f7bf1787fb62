// src/core/error.rs

use thiserror::Error;

/// Errors that stop a scan before any check is evaluated.
///
/// Per-check lookup failures never show up here: they become `ERROR`
/// findings inside the report.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid target '{input}': {reason}")]
    InvalidTarget { input: String, reason: String },

    #[error("malformed request payload: {0}")]
    MalformedRequest(#[from] serde_json::Error),

    #[error("missing {0} in request body")]
    MissingTarget(&'static str),

    #[error("failed to initialize {component}: {message}")]
    Setup {
        component: &'static str,
        message: String,
    },
}

impl ScanError {
    pub(crate) fn invalid_target(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure of the outbound HTTP fetch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct FetchError(pub String);

/// Outcome of a DNS query that returned no usable data.
///
/// `NoAnswer` and `NxDomain` are absent-record outcomes; `Timeout` and
/// `Failed` mean the lookup mechanism itself broke.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("the DNS response does not contain an answer to the question")]
    NoAnswer,

    #[error("the DNS query name does not exist")]
    NxDomain,

    #[error("the DNS query timed out")]
    Timeout,

    #[error("{0}")]
    Failed(String),
}

impl ResolveError {
    /// True when the query succeeded but no record of that type exists.
    pub fn is_absent_record(&self) -> bool {
        matches!(self, Self::NoAnswer | Self::NxDomain)
    }
}
