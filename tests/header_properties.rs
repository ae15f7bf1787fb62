// tests/header_properties.rs

//! Property tests for header evaluation: the report always covers exactly
//! the requested checks, and evaluating twice gives the same findings.

use proptest::prelude::*;
use std::collections::BTreeSet;
use strum::IntoEnumIterator;
use vanguard_posture::core::checks::{HeaderCheck, resolve_requested};
use vanguard_posture::core::models::{HeaderSet, HttpSnapshot};
use vanguard_posture::core::scanner::headers_scanner;

/// A known check name in lower, upper or canonical case.
fn known_name() -> impl Strategy<Value = String> {
    let names: Vec<String> = HeaderCheck::iter().map(|c| c.to_string()).collect();
    (proptest::sample::select(names), 0..3u8).prop_map(|(name, case)| match case {
        0 => name.to_ascii_lowercase(),
        1 => name.to_ascii_uppercase(),
        _ => name,
    })
}

fn header_name() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => known_name(),
        2 => proptest::string::string_regex("X-[A-Za-z]{1,10}").unwrap(),
    ]
}

/// Requested names, including blank entries and padded duplicates.
fn requested_name() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => header_name(),
        1 => header_name().prop_map(|n| format!("  {n} ")),
        1 => proptest::string::string_regex("[ \t]{0,3}").unwrap(),
    ]
}

fn snapshot() -> impl Strategy<Value = HttpSnapshot> {
    let value = proptest::string::string_regex("[ -~]{0,40}").unwrap();
    (
        proptest::collection::vec((header_name(), value), 0..12),
        proptest::string::string_regex("[ -~]{0,80}").unwrap(),
    )
        .prop_map(|(headers, body)| HttpSnapshot {
            status_code: 200,
            headers: headers.into_iter().collect::<HeaderSet>(),
            body,
        })
}

fn folded(names: impl IntoIterator<Item = String>) -> BTreeSet<String> {
    names.into_iter().map(|n| n.to_ascii_lowercase()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn report_names_match_the_requested_set(
        snap in snapshot(),
        raw in proptest::collection::vec(requested_name(), 0..10),
    ) {
        let requested = resolve_requested(&raw, HeaderCheck::defaults());
        let findings = headers_scanner::evaluate(&snap, &requested);
        let reported: Vec<String> = findings.iter().map(|f| f.check_name.clone()).collect();

        let asked = folded(raw.iter().map(|r| r.trim().to_string()).filter(|r| !r.is_empty()));
        let expected = if asked.is_empty() {
            folded(HeaderCheck::defaults().iter().map(|c| c.to_string()))
        } else {
            asked
        };

        prop_assert_eq!(reported.len(), expected.len(), "duplicates in {:?}", reported);
        prop_assert_eq!(folded(reported), expected);
    }

    #[test]
    fn evaluation_is_deterministic(
        snap in snapshot(),
        raw in proptest::collection::vec(requested_name(), 0..10),
    ) {
        let requested = resolve_requested(&raw, HeaderCheck::defaults());
        let first = headers_scanner::evaluate(&snap, &requested);
        let second = headers_scanner::evaluate(&snap, &requested);
        prop_assert_eq!(first, second);
    }
}
