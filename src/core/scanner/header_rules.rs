// src/core/scanner/header_rules.rs

//! Single-header policy rules. Each rule maps the header value (or its
//! absence) to a `Verdict` and does nothing else.

use crate::core::models::Verdict;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// One year, the minimum HSTS lifetime accepted as strong.
pub const HSTS_MIN_MAX_AGE: u64 = 31_536_000;

const STRONG_REFERRER_POLICIES: &[&str] = &[
    "no-referrer",
    "same-origin",
    "strict-origin",
    "strict-origin-when-cross-origin",
];

static RE_MAX_AGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)max-age\s*=\s*"?(\d+)"?"#).unwrap());

/// A blank header counts as an absent one.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn strict_transport_security(value: Option<&str>) -> Verdict {
    let Some(v) = present(value) else {
        return Verdict::failed(None, "Strict-Transport-Security (HSTS) header is missing.");
    };

    let mut issues = Vec::new();
    let max_age = RE_MAX_AGE
        .captures(v)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok());
    match max_age {
        None => issues.push("max-age directive is missing or invalid".to_string()),
        Some(age) if age < HSTS_MIN_MAX_AGE => {
            issues.push(format!("max-age={age} is below {HSTS_MIN_MAX_AGE} (one year)"))
        }
        Some(_) => {}
    }
    if !v.to_ascii_lowercase().contains("includesubdomains") {
        issues.push("includeSubDomains is missing".to_string());
    }

    debug!(value = v, issues = issues.len(), "Evaluated HSTS.");
    if issues.is_empty() {
        Verdict::passed(
            Some(v),
            "HSTS header is present with a max-age of at least one year and includeSubDomains.",
        )
    } else {
        Verdict::warning(
            Some(v),
            format!("HSTS header is present but weak: {}.", issues.join("; ")),
        )
    }
}

pub fn x_frame_options(value: Option<&str>) -> Verdict {
    match present(value) {
        None => Verdict::failed(None, "X-Frame-Options (XFO) header is missing."),
        Some(v) => {
            let upper = v.to_ascii_uppercase();
            if upper == "DENY" || upper == "SAMEORIGIN" {
                Verdict::passed(Some(v), format!("X-Frame-Options is set to {upper}."))
            } else {
                Verdict::warning(
                    Some(v),
                    format!("X-Frame-Options is present but set to an unusual value: {v}."),
                )
            }
        }
    }
}

pub fn x_content_type_options(value: Option<&str>) -> Verdict {
    match present(value) {
        None => Verdict::failed(None, "X-Content-Type-Options header is missing."),
        Some(v) if v.eq_ignore_ascii_case("nosniff") => {
            Verdict::passed(Some(v), "Prevents MIME-type sniffing.")
        }
        Some(v) => Verdict::warning(
            Some(v),
            format!("X-Content-Type-Options should be 'nosniff', found '{v}'."),
        ),
    }
}

pub fn referrer_policy(value: Option<&str>) -> Verdict {
    match present(value) {
        None => Verdict::failed(None, "Referrer-Policy header is missing."),
        Some(v) => {
            let lower = v.to_ascii_lowercase();
            if STRONG_REFERRER_POLICIES.contains(&lower.as_str()) {
                Verdict::passed(Some(v), format!("Referrer-Policy '{lower}' limits referrer leakage."))
            } else {
                Verdict::failed(
                    Some(v),
                    format!(
                        "Weak Referrer-Policy '{v}'; use one of: {}.",
                        STRONG_REFERRER_POLICIES.join(", ")
                    ),
                )
            }
        }
    }
}

pub fn permissions_policy(value: Option<&str>) -> Verdict {
    match present(value) {
        Some(v) => Verdict::passed(Some(v), "Permissions-Policy header present."),
        None => Verdict::failed(None, "Permissions-Policy header is missing."),
    }
}

/// Shared rule for the three Cross-Origin-* policy headers.
pub fn cross_origin(header: &str, expected: &str, value: Option<&str>) -> Verdict {
    match present(value) {
        None => Verdict::failed(None, format!("{header} header is missing.")),
        Some(v) if v.eq_ignore_ascii_case(expected) => {
            Verdict::passed(Some(v), format!("{header} correctly set to {expected}."))
        }
        Some(v) => Verdict::warning(
            Some(v),
            format!("{header} is set to '{v}' instead of '{expected}'."),
        ),
    }
}

/// Informational rule for headers that reveal server software.
pub fn disclosure(header: &str, value: Option<&str>) -> Verdict {
    match present(value) {
        Some(v) => Verdict::info(
            Some(v),
            format!("{header} discloses server software details: {v}."),
        ),
        None => Verdict::info(None, format!("{header} header is suppressed.")),
    }
}

/// Presence check for requested headers that have no dedicated rule.
pub fn presence(header: &str, value: Option<&str>) -> Verdict {
    match present(value) {
        Some(v) => Verdict::passed(Some(v), format!("{header} is present.")),
        None => Verdict::failed(None, format!("{header} is missing.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Status;

    #[test]
    fn hsts_verdicts() {
        assert_eq!(
            strict_transport_security(Some("max-age=31536000; includeSubDomains")).status,
            Status::Passed
        );
        assert_eq!(
            strict_transport_security(Some("max-age=63072000; INCLUDESUBDOMAINS; preload")).status,
            Status::Passed
        );
        assert_eq!(strict_transport_security(Some("max-age=3600")).status, Status::Warning);
        assert_eq!(
            strict_transport_security(Some("max-age=31536000")).status,
            Status::Warning
        );
        assert_eq!(strict_transport_security(None).status, Status::Failed);
        assert_eq!(strict_transport_security(Some("  ")).status, Status::Failed);
    }

    #[test]
    fn hsts_warning_names_every_issue() {
        let verdict = strict_transport_security(Some("max-age=3600"));
        assert!(verdict.notes.contains("max-age=3600 is below 31536000"));
        assert!(verdict.notes.contains("includeSubDomains is missing"));
        assert_eq!(verdict.value.as_deref(), Some("max-age=3600"));

        let no_age = strict_transport_security(Some("includeSubDomains"));
        assert_eq!(no_age.status, Status::Warning);
        assert!(no_age.notes.contains("max-age directive is missing"));
    }

    #[test]
    fn x_frame_options_is_case_insensitive() {
        assert_eq!(x_frame_options(Some("deny")).status, Status::Passed);
        assert_eq!(x_frame_options(Some("SameOrigin")).status, Status::Passed);
        assert_eq!(
            x_frame_options(Some("ALLOW-FROM https://a.example")).status,
            Status::Warning
        );
        assert_eq!(x_frame_options(None).status, Status::Failed);
    }

    #[test]
    fn x_content_type_options_requires_nosniff() {
        assert_eq!(x_content_type_options(Some("NoSniff")).status, Status::Passed);
        assert_eq!(x_content_type_options(Some("sniff")).status, Status::Warning);
        assert_eq!(x_content_type_options(None).status, Status::Failed);
    }

    #[test]
    fn referrer_policy_has_no_warning_tier() {
        assert_eq!(referrer_policy(Some("no-referrer")).status, Status::Passed);
        assert_eq!(
            referrer_policy(Some("strict-origin-when-cross-origin")).status,
            Status::Passed
        );
        assert_eq!(referrer_policy(Some("unsafe-url")).status, Status::Failed);
        assert_eq!(referrer_policy(None).status, Status::Failed);
    }

    #[test]
    fn cross_origin_policies() {
        assert_eq!(
            cross_origin("Cross-Origin-Embedder-Policy", "require-corp", Some("require-corp")).status,
            Status::Passed
        );
        assert_eq!(
            cross_origin("Cross-Origin-Opener-Policy", "same-origin", Some("unsafe-none")).status,
            Status::Warning
        );
        assert_eq!(
            cross_origin("Cross-Origin-Resource-Policy", "same-origin", None).status,
            Status::Failed
        );
    }

    #[test]
    fn disclosure_is_always_informational() {
        let shown = disclosure("Server", Some("nginx/1.25.3"));
        assert_eq!(shown.status, Status::Info);
        assert_eq!(shown.value.as_deref(), Some("nginx/1.25.3"));

        let hidden = disclosure("X-Powered-By", None);
        assert_eq!(hidden.status, Status::Info);
        assert!(hidden.value.is_none());
    }

    #[test]
    fn permissions_and_presence() {
        assert_eq!(permissions_policy(Some("camera=()")).status, Status::Passed);
        assert_eq!(permissions_policy(Some("")).status, Status::Failed);
        assert_eq!(presence("X-Custom", Some("1")).status, Status::Passed);
        assert_eq!(presence("X-Custom", None).notes, "X-Custom is missing.");
    }
}
