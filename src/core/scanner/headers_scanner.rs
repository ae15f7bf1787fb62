// src/core/scanner/headers_scanner.rs

use crate::config::ScanConfig;
use crate::core::checks::{HeaderCheck, Requested};
use crate::core::error::FetchError;
use crate::core::models::{Finding, HeaderSet, HttpSnapshot, ScanDetails, ScanReport, Status, Verdict};
use crate::core::scanner::{cookie_policy, csp_policy, fingerprint_scanner, header_rules};
use crate::core::transport::Fetcher;
use tracing::{debug, info, warn};
use url::Url;

/// How a rule reads the response.
enum Probe {
    /// The header named like the check, through a single-value rule.
    Header(fn(Option<&str>) -> Verdict),
    /// A Cross-Origin-* header and the value it must carry.
    CrossOrigin(&'static str),
    /// A header that only ever produces an informational finding.
    Disclosure,
    /// Every `Set-Cookie` occurrence.
    Cookies,
    /// The response body.
    Body(fn(&str) -> Verdict),
}

struct HeaderRule {
    check: HeaderCheck,
    probe: Probe,
}

/// The rule table, one entry per `HeaderCheck`.
static RULES: &[HeaderRule] = &[
    HeaderRule { check: HeaderCheck::StrictTransportSecurity, probe: Probe::Header(header_rules::strict_transport_security) },
    HeaderRule { check: HeaderCheck::XFrameOptions, probe: Probe::Header(header_rules::x_frame_options) },
    HeaderRule { check: HeaderCheck::XContentTypeOptions, probe: Probe::Header(header_rules::x_content_type_options) },
    HeaderRule { check: HeaderCheck::ContentSecurityPolicy, probe: Probe::Header(csp_policy::content_security_policy) },
    HeaderRule { check: HeaderCheck::ReferrerPolicy, probe: Probe::Header(header_rules::referrer_policy) },
    HeaderRule { check: HeaderCheck::PermissionsPolicy, probe: Probe::Header(header_rules::permissions_policy) },
    HeaderRule { check: HeaderCheck::CrossOriginOpenerPolicy, probe: Probe::CrossOrigin("same-origin") },
    HeaderRule { check: HeaderCheck::CrossOriginResourcePolicy, probe: Probe::CrossOrigin("same-origin") },
    HeaderRule { check: HeaderCheck::CrossOriginEmbedderPolicy, probe: Probe::CrossOrigin("require-corp") },
    HeaderRule { check: HeaderCheck::SetCookie, probe: Probe::Cookies },
    HeaderRule { check: HeaderCheck::Server, probe: Probe::Disclosure },
    HeaderRule { check: HeaderCheck::XPoweredBy, probe: Probe::Disclosure },
    HeaderRule { check: HeaderCheck::XAspNetVersion, probe: Probe::Disclosure },
    HeaderRule { check: HeaderCheck::TechnologyStack, probe: Probe::Body(fingerprint_scanner::technology_stack) },
];

fn apply_rule(snapshot: &HttpSnapshot, check: HeaderCheck) -> Verdict {
    let name = check.as_ref();
    let Some(rule) = RULES.iter().find(|r| r.check == check) else {
        return Verdict::error(format!("No rule registered for {name}."));
    };

    match &rule.probe {
        Probe::Header(rule_fn) => rule_fn(snapshot.headers.get(name).as_deref()),
        Probe::CrossOrigin(expected) => {
            header_rules::cross_origin(name, expected, snapshot.headers.get(name).as_deref())
        }
        Probe::Disclosure => header_rules::disclosure(name, snapshot.headers.get(name).as_deref()),
        Probe::Cookies => cookie_policy::cookie_security(&snapshot.headers.get_all(name)),
        Probe::Body(rule_fn) => rule_fn(&snapshot.body),
    }
}

/// Evaluates the requested checks against one response. Pure.
///
/// Only requested checks appear in the result, in request order. Names
/// without a dedicated rule get a presence check on that header.
pub fn evaluate(snapshot: &HttpSnapshot, requested: &[Requested<HeaderCheck>]) -> Vec<Finding> {
    requested
        .iter()
        .map(|entry| {
            let verdict = match entry {
                Requested::Known(check) => apply_rule(snapshot, *check),
                Requested::Unknown(name) => {
                    header_rules::presence(name, snapshot.headers.get(name).as_deref())
                }
            };
            debug!(check = entry.name(), status = %verdict.status, "Header check evaluated.");
            Finding::from_verdict(entry.name(), verdict)
        })
        .collect()
}

/// `evaluate` for callers that only hold a header set.
pub fn evaluate_header_set(headers: &HeaderSet, requested: &[Requested<HeaderCheck>]) -> Vec<Finding> {
    let snapshot = HttpSnapshot {
        status_code: 0,
        headers: headers.clone(),
        body: String::new(),
    };
    evaluate(&snapshot, requested)
}

/// Fetches `url` once and evaluates the requested checks on the response.
///
/// A failed or timed-out fetch turns every requested check into an `ERROR`
/// finding.
pub async fn run_headers_scan(
    fetcher: &dyn Fetcher,
    url: &Url,
    requested: &[Requested<HeaderCheck>],
    config: &ScanConfig,
) -> ScanReport {
    info!(url = %url, checks = requested.len(), "Starting headers scan.");

    let fetched = tokio::time::timeout(
        config.timeout,
        fetcher.fetch(url.as_str(), config.timeout, config.follow_redirects),
    )
    .await
    .unwrap_or_else(|_| {
        Err(FetchError(format!(
            "request timed out after {}s",
            config.timeout.as_secs()
        )))
    });

    match fetched {
        Ok(snapshot) => {
            let findings = evaluate(&snapshot, requested);
            let http_status = Status::from_status_code(Some(snapshot.status_code));
            info!(
                status = snapshot.status_code,
                findings = findings.len(),
                "Headers scan finished."
            );
            ScanReport {
                target: url.to_string(),
                findings,
                details: ScanDetails::Headers {
                    status_code: Some(snapshot.status_code),
                    http_status,
                    full_headers: snapshot.headers,
                },
            }
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Headers scan could not fetch the target.");
            let notes = format!("Failed to fetch URL: {e}");
            ScanReport {
                target: url.to_string(),
                findings: requested
                    .iter()
                    .map(|entry| Finding::error(entry.name(), notes.clone()))
                    .collect(),
                details: ScanDetails::Headers {
                    status_code: None,
                    http_status: Status::from_status_code(None),
                    full_headers: HeaderSet::new(),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn snapshot(headers: &[(&str, &str)]) -> HttpSnapshot {
        HttpSnapshot {
            status_code: 200,
            headers: headers.iter().copied().collect(),
            body: String::new(),
        }
    }

    fn known(checks: &[HeaderCheck]) -> Vec<Requested<HeaderCheck>> {
        checks.iter().copied().map(Requested::Known).collect()
    }

    #[test]
    fn every_check_has_exactly_one_rule() {
        for check in HeaderCheck::iter() {
            assert_eq!(RULES.iter().filter(|r| r.check == check).count(), 1, "{check}");
        }
    }

    #[test]
    fn only_requested_checks_are_reported() {
        let snap = snapshot(&[("X-Frame-Options", "DENY"), ("Server", "nginx")]);
        let findings = evaluate(&snap, &known(&[HeaderCheck::XFrameOptions]));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].check_name, "X-Frame-Options");
        assert_eq!(findings[0].status, Status::Passed);
    }

    #[test]
    fn header_names_are_matched_case_insensitively() {
        let snap = snapshot(&[("strict-transport-security", "max-age=31536000; includeSubDomains")]);
        let findings = evaluate(&snap, &known(&[HeaderCheck::StrictTransportSecurity]));
        assert_eq!(findings[0].status, Status::Passed);
    }

    #[test]
    fn multiple_set_cookie_headers_are_inspected_individually() {
        let snap = snapshot(&[
            ("Set-Cookie", "a=1; Secure; HttpOnly; SameSite=Lax"),
            ("set-cookie", "b=2; Expires=Wed, 21 Oct 2026 07:28:00 GMT"),
        ]);
        let findings = evaluate(&snap, &known(&[HeaderCheck::SetCookie]));
        assert_eq!(findings[0].status, Status::Failed);
        assert!(findings[0].notes.contains("b: missing Secure"));
        assert!(!findings[0].notes.contains("a: "));
    }

    #[test]
    fn unknown_names_fall_back_to_presence() {
        let snap = snapshot(&[("X-Request-Id", "abc")]);
        let requested = vec![
            Requested::Unknown("X-Request-Id".to_string()),
            Requested::Unknown("X-Missing".to_string()),
        ];
        let findings = evaluate(&snap, &requested);
        assert_eq!(findings[0].status, Status::Passed);
        assert_eq!(findings[1].status, Status::Failed);
    }

    #[test]
    fn header_set_evaluation_matches_snapshot_evaluation() {
        let snap = snapshot(&[("Referrer-Policy", "no-referrer")]);
        let requested = known(&HeaderCheck::defaults());
        assert_eq!(evaluate_header_set(&snap.headers, &requested), evaluate(&snap, &requested));
    }
}
