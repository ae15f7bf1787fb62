// tests/request_handling.rs

mod common;

use common::{FakeFetcher, FakeResolver, scanner};
use std::sync::Arc;
use vanguard_posture::core::checks::{DnsCheck, HeaderCheck};
use vanguard_posture::{ScanError, ScanKind, Status};

fn resolver() -> FakeResolver {
    FakeResolver::new()
        .with_txt("example.com", &["v=spf1 ~all"])
        .with_txt("other.example", &["v=spf1 -all"])
}

#[tokio::test]
async fn header_request_uses_url_and_requested_checks() {
    let fetcher = Arc::new(FakeFetcher::responding(200, &[("X-Frame-Options", "DENY")], ""));
    let scanner = scanner(fetcher.clone(), Arc::new(resolver()));

    let report = scanner
        .handle_request(
            ScanKind::Headers,
            r#"{"url": "example.com/app", "checks": ["X-Frame-Options"]}"#,
        )
        .await
        .unwrap();

    assert_eq!(report.check_names(), vec!["X-Frame-Options"]);
    assert_eq!(report.findings[0].status, Status::Passed);
    assert_eq!(fetcher.requested_urls(), vec!["https://example.com/app".to_string()]);
}

#[tokio::test]
async fn empty_checks_select_the_defaults() {
    let fetcher = Arc::new(FakeFetcher::responding(200, &[], ""));
    let scanner = scanner(fetcher, Arc::new(resolver()));

    let report = scanner
        .handle_request(ScanKind::Headers, r#"{"url": "example.com", "checks": []}"#)
        .await
        .unwrap();
    assert_eq!(report.findings.len(), HeaderCheck::defaults().len());

    let report = scanner
        .handle_request(ScanKind::Dns, r#"{"domain": "example.com"}"#)
        .await
        .unwrap();
    assert_eq!(report.findings.len(), DnsCheck::defaults().len());
}

#[tokio::test]
async fn dns_request_prefers_url_over_domain() {
    let scanner = scanner(Arc::new(FakeFetcher::failing("unused")), Arc::new(resolver()));

    let report = scanner
        .handle_request(
            ScanKind::Dns,
            r#"{"url": "https://other.example/x", "domain": "example.com", "checks": ["SPF"]}"#,
        )
        .await
        .unwrap();

    assert_eq!(report.target, "other.example");
    assert_eq!(report.findings[0].value.as_deref(), Some("v=spf1 -all"));
}

#[tokio::test]
async fn header_request_without_url_is_rejected() {
    let fetcher = Arc::new(FakeFetcher::responding(200, &[], ""));
    let scanner = scanner(fetcher.clone(), Arc::new(resolver()));

    let result = scanner
        .handle_request(ScanKind::Headers, r#"{"domain": "example.com"}"#)
        .await;

    assert!(matches!(result, Err(ScanError::MissingTarget(_))));
    assert!(fetcher.requested_urls().is_empty());
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let scanner = scanner(Arc::new(FakeFetcher::failing("unused")), Arc::new(resolver()));

    let result = scanner.handle_request(ScanKind::Dns, "{\"url\": ").await;
    assert!(matches!(result, Err(ScanError::MalformedRequest(_))));

    let result = scanner.handle_request(ScanKind::Dns, "").await;
    assert!(matches!(result, Err(ScanError::MissingTarget(_))));
}

#[tokio::test]
async fn full_scan_runs_both_evaluators() {
    let fetcher = Arc::new(FakeFetcher::responding(
        200,
        &[("Server", "Apache")],
        "<script src=\"/_next/static/chunks/app.js\"></script>",
    ));
    let scanner = scanner(fetcher, Arc::new(resolver()));

    let report = scanner.run_full_scan("example.com").await.unwrap();

    assert_eq!(report.headers.findings.len(), 14);
    assert_eq!(report.dns.findings.len(), 4);
    assert_eq!(
        report.headers.finding("Technology-Stack").unwrap().value.as_deref(),
        Some("next.js")
    );
    assert_eq!(report.dns.finding("SPF").unwrap().status, Status::Passed);
    assert_eq!(report.all_findings().count(), 18);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["headers"]["kind"], "headers");
    assert_eq!(json["dns"]["kind"], "dns");
    assert_eq!(json["dns"]["records"]["SPF"][0], "v=spf1 ~all");
}

#[tokio::test]
async fn full_scan_rejects_bad_targets() {
    let scanner = scanner(Arc::new(FakeFetcher::failing("unused")), Arc::new(resolver()));
    assert!(matches!(
        scanner.run_full_scan("   ").await,
        Err(ScanError::InvalidTarget { .. })
    ));
}
