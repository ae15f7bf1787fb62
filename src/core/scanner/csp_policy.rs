// src/core/scanner/csp_policy.rs

use crate::core::models::Verdict;
use crate::core::scanner::header_rules::present;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// A directive that must restrict itself to one of the listed sources.
struct RequiredDirective {
    name: &'static str,
    pattern: &'static Lazy<Regex>,
    safe_sources: &'static [&'static str],
}

static RE_OBJECT_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|;)\s*object-src\b([^;]*)").unwrap());
static RE_BASE_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|;)\s*base-uri\b([^;]*)").unwrap());

static REQUIRED_DIRECTIVES: &[RequiredDirective] = &[
    RequiredDirective {
        name: "object-src",
        pattern: &RE_OBJECT_SRC,
        safe_sources: &["'none'"],
    },
    RequiredDirective {
        name: "base-uri",
        pattern: &RE_BASE_URI,
        safe_sources: &["'self'", "'none'"],
    },
];

const UNSAFE_TOKENS: &[(&str, &str)] = &[
    ("'unsafe-inline'", "'unsafe-inline' allows inline scripts and styles"),
    ("'unsafe-eval'", "'unsafe-eval' allows string evaluation such as eval()"),
];

/// Extracts the value of `directive`, up to the next `;`.
fn directive_value<'a>(policy: &'a str, pattern: &Regex) -> Option<&'a str> {
    pattern
        .captures(policy)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// Lists every weakness found in a policy, unsafe tokens first.
pub fn weaknesses(policy: &str) -> Vec<String> {
    let lower = policy.to_ascii_lowercase();
    let mut found: Vec<String> = UNSAFE_TOKENS
        .iter()
        .filter(|(token, _)| lower.contains(token))
        .map(|(_, description)| description.to_string())
        .collect();

    for directive in REQUIRED_DIRECTIVES {
        match directive_value(policy, directive.pattern) {
            None => found.push(format!("{} directive is missing", directive.name)),
            Some(value) => {
                let value = value.to_ascii_lowercase();
                if !directive.safe_sources.iter().any(|s| value.contains(s)) {
                    found.push(format!(
                        "{} is not restricted to {}",
                        directive.name,
                        directive.safe_sources.join(" or ")
                    ));
                }
            }
        }
    }
    found
}

pub fn content_security_policy(value: Option<&str>) -> Verdict {
    let Some(policy) = present(value) else {
        return Verdict::failed(None, "Content-Security-Policy header is missing.");
    };

    let found = weaknesses(policy);
    debug!(weaknesses = found.len(), "Evaluated Content-Security-Policy.");
    let verdict = match found.len() {
        0 => Verdict::passed(
            Some(policy),
            "CSP restricts object-src and base-uri and allows no unsafe sources.",
        ),
        1 => Verdict::warning(Some(policy), format!("CSP has 1 weakness: {}.", found[0])),
        n => Verdict::failed(
            Some(policy),
            format!("CSP has {n} weaknesses: {}.", found.join("; ")),
        ),
    };
    verdict.with_detail("weakness_count", found.len().to_string())
}
