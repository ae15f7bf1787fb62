// src/core/mod.rs

/// Findings, reports and the header set handed to the rules.
pub mod models;

/// The two evaluators and the `PostureScanner` that drives them.
pub mod scanner;

/// Titles, descriptions and remediation text for every check.
pub mod knowledge_base;

pub mod checks;
pub mod error;
pub mod request;
pub mod target;

/// Outbound HTTP and DNS capabilities.
pub mod transport;
