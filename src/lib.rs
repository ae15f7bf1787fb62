// src/lib.rs

//! HTTP security-header and e-mail DNS posture checks.
//!
//! `PostureScanner` is the entry point: it normalizes a target, performs the
//! outbound lookups through the `Fetcher` and `Resolver` capabilities and
//! evaluates only the requested checks.

pub mod config;
pub mod core;

pub use crate::config::ScanConfig;
pub use crate::core::error::ScanError;
pub use crate::core::models::{Finding, FullScanReport, ScanReport, Status};
pub use crate::core::request::{ScanKind, ScanRequest};
pub use crate::core::scanner::PostureScanner;
