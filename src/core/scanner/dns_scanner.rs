// src/core/scanner/dns_scanner.rs

use crate::config::ScanConfig;
use crate::core::checks::{DnsCheck, Requested};
use crate::core::error::ResolveError;
use crate::core::models::{Finding, ScanDetails, ScanReport, Verdict};
use crate::core::transport::{RecordKind, Resolver};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// The only DKIM selector probed. Other selectors are never queried.
pub const DKIM_SELECTOR: &str = "default";

/// What one DNS query produced.
pub type Answer = Result<Vec<String>, ResolveError>;

/// The name and record type queried for a check.
pub fn query_for(check: DnsCheck, domain: &str) -> (String, RecordKind) {
    match check {
        DnsCheck::Spf => (domain.to_string(), RecordKind::Txt),
        DnsCheck::Dmarc => (format!("_dmarc.{domain}"), RecordKind::Txt),
        DnsCheck::Dkim => (format!("{DKIM_SELECTOR}._domainkey.{domain}"), RecordKind::Txt),
        DnsCheck::Dnssec => (domain.to_string(), RecordKind::Ds),
    }
}

/// Records of a successful or absent-record answer; any other failure is
/// already the verdict.
fn answered(answer: &Answer) -> Result<&[String], Verdict> {
    match answer {
        Ok(records) => Ok(records),
        Err(e) if e.is_absent_record() => Ok(&[]),
        Err(e) => Err(Verdict::error(format!("DNS Error: {e}"))),
    }
}

fn unquote(record: &str) -> &str {
    record.trim().trim_matches('"').trim()
}

fn starts_with_ignore_case(record: &str, prefix: &str) -> bool {
    record
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Value of `tag` in a `k=v; k=v` record.
fn tag_value<'a>(record: &'a str, tag: &str) -> Option<&'a str> {
    record
        .split(';')
        .filter_map(|part| part.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(tag))
        .map(|(_, value)| value.trim())
}

pub fn spf(answer: &Answer) -> Verdict {
    let records = match answered(answer) {
        Ok(records) => records,
        Err(verdict) => return verdict,
    };
    let matching: Vec<&str> = records
        .iter()
        .map(|r| unquote(r))
        .filter(|r| starts_with_ignore_case(r, "v=spf1"))
        .collect();
    debug!(count = matching.len(), "Evaluated SPF records.");

    let verdict = match matching.as_slice() {
        [] => Verdict::failed(None, "No SPF TXT record found."),
        [record] => {
            if record.contains("-all") {
                Verdict::passed(Some(record), "SPF record ends with a hard fail mechanism (-all).")
            } else if record.contains("~all") {
                Verdict::passed(Some(record), "SPF record ends with a soft fail mechanism (~all).")
            } else {
                Verdict::warning(Some(record), "Missing or improper SPF fail mechanism (-all or ~all).")
            }
        }
        many => Verdict::warning(
            Some(&many.join(" | ")),
            "Multiple SPF records found (RFC violation).",
        ),
    };
    verdict.with_detail("record_count", matching.len().to_string())
}

/// Relative strength of a DMARC `p=` policy.
pub fn policy_strength(record: &str) -> &'static str {
    match tag_value(record, "p").map(str::to_ascii_lowercase).as_deref() {
        Some("reject") => "reject",
        Some("quarantine") => "quarantine",
        Some("none") => "none",
        _ => "unknown",
    }
}

pub fn dmarc(answer: &Answer) -> Verdict {
    let records = match answered(answer) {
        Ok(records) => records,
        Err(verdict) => return verdict,
    };
    let matching: Vec<&str> = records
        .iter()
        .map(|r| unquote(r))
        .filter(|r| starts_with_ignore_case(r, "v=DMARC1"))
        .collect();

    let Some(record) = matching.first() else {
        return Verdict::failed(None, "No DMARC record found.");
    };
    let strength = policy_strength(record);
    debug!(policy = strength, "Evaluated DMARC record.");
    let mut notes = match strength {
        "reject" => "DMARC policy is reject (strongest).".to_string(),
        "quarantine" => "DMARC policy is quarantine (medium).".to_string(),
        "none" => "DMARC policy is none (monitoring only).".to_string(),
        _ => "DMARC record found but its policy tag is missing or unrecognized.".to_string(),
    };
    if matching.len() > 1 {
        notes.push_str(" Multiple DMARC records are published; receivers may ignore them all.");
    }
    Verdict::passed(Some(&matching.join(" | ")), notes).with_detail("policy_strength", strength)
}

/// Key length estimate for a DKIM record: eight bits per character of the
/// `p=` payload. Approximate by construction.
pub fn estimated_key_length(record: &str) -> Option<usize> {
    tag_value(record, "p").map(|payload| {
        payload
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '"')
            .count()
            * 8
    })
}

pub fn dkim(answer: &Answer) -> Verdict {
    let records = match answered(answer) {
        Ok(records) => records,
        Err(verdict) => return verdict,
    };
    let Some(record) = records.first().map(|r| unquote(r)) else {
        return Verdict::failed(
            None,
            format!("Common DKIM selector '{DKIM_SELECTOR}' not found."),
        );
    };

    match estimated_key_length(record) {
        Some(0) => Verdict::passed(
            Some(record),
            "Common selector found, but its public key is empty (revoked).",
        )
        .with_detail("estimated_key_length", "0"),
        Some(bits) => Verdict::passed(
            Some(record),
            format!("Common selector found; estimated key length {bits} bits (approx.)."),
        )
        .with_detail("estimated_key_length", bits.to_string()),
        None => Verdict::passed(
            Some(record),
            "Common selector found, but it carries no p= public key tag.",
        ),
    }
}

pub fn dnssec(answer: &Answer) -> Verdict {
    match answered(answer) {
        Err(verdict) => verdict,
        Ok([]) => Verdict::failed(None, "No DS record found (DNSSEC likely disabled)."),
        Ok(records) => Verdict::passed(
            Some(&records.join(" | ")),
            "DS record found (DNSSEC likely enabled).",
        ),
    }
}

/// Turns one answer into the verdict for its check. Pure.
pub fn evaluate_answer(check: DnsCheck, answer: &Answer) -> Verdict {
    match check {
        DnsCheck::Spf => spf(answer),
        DnsCheck::Dmarc => dmarc(answer),
        DnsCheck::Dkim => dkim(answer),
        DnsCheck::Dnssec => dnssec(answer),
    }
}

/// Runs the requested DNS checks concurrently and merges them in request order.
///
/// Every query is its own task bounded by the configured timeout; all tasks
/// are joined before the report is built, and none is retried.
pub async fn run_dns_scan(
    resolver: Arc<dyn Resolver>,
    domain: &str,
    requested: &[Requested<DnsCheck>],
    config: &ScanConfig,
) -> ScanReport {
    info!(domain, checks = requested.len(), "Starting DNS scan.");

    let mut tasks = JoinSet::new();
    for (index, entry) in requested.iter().enumerate() {
        let Requested::Known(check) = entry else {
            continue;
        };
        let check = *check;
        let (name, kind) = query_for(check, domain);
        let resolver = Arc::clone(&resolver);
        let timeout = config.timeout;
        tasks.spawn(async move {
            debug!(check = %check, name = %name, %kind, "Querying DNS.");
            let answer = match tokio::time::timeout(timeout, resolver.resolve(&name, kind)).await {
                Ok(answer) => answer,
                Err(_) => Err(ResolveError::Timeout),
            };
            (index, check, answer)
        });
    }

    let mut slots: Vec<Option<Finding>> = vec![None; requested.len()];
    let mut records: BTreeMap<String, Vec<String>> = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, check, answer)) => {
                match &answer {
                    Ok(found) => {
                        records.insert(check.to_string(), found.clone());
                    }
                    Err(e) if e.is_absent_record() => {
                        records.insert(check.to_string(), Vec::new());
                    }
                    Err(e) => warn!(check = %check, error = %e, "DNS query failed."),
                }
                let verdict = evaluate_answer(check, &answer);
                slots[index] = Some(Finding::from_verdict(check.as_ref(), verdict));
            }
            Err(e) => warn!(error = %e, "DNS check task did not complete."),
        }
    }

    let findings: Vec<Finding> = slots
        .into_iter()
        .zip(requested)
        .map(|(slot, entry)| match (slot, entry) {
            (Some(finding), _) => finding,
            (None, Requested::Unknown(name)) => {
                Finding::error(name, format!("Unsupported DNS check '{name}'."))
            }
            (None, Requested::Known(check)) => {
                Finding::error(check.as_ref(), "DNS check did not complete.")
            }
        })
        .collect();

    info!(domain, findings = findings.len(), "DNS scan finished.");
    ScanReport {
        target: domain.to_string(),
        findings,
        details: ScanDetails::Dns {
            domain: domain.to_string(),
            records,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Status;

    fn txt(records: &[&str]) -> Answer {
        Ok(records.iter().map(|r| r.to_string()).collect())
    }

    #[test]
    fn spf_verdicts() {
        let single = spf(&txt(&["v=spf1 -all"]));
        assert_eq!(single.status, Status::Passed);
        assert_eq!(single.details["record_count"], "1");

        let many = spf(&txt(&["v=spf1 include:a.example -all", "v=spf1 ~all", "google-site-verification=x"]));
        assert_eq!(many.status, Status::Warning);
        assert!(many.notes.contains("Multiple SPF records"));
        assert_eq!(many.details["record_count"], "2");

        assert_eq!(spf(&txt(&["v=spf1 include:a.example ?all"])).status, Status::Warning);
        assert_eq!(spf(&txt(&["\"v=spf1 mx ~all\""])).status, Status::Passed);
        assert_eq!(spf(&txt(&["unrelated"])).status, Status::Failed);
        assert_eq!(spf(&Err(ResolveError::NoAnswer)).status, Status::Failed);
    }

    #[test]
    fn resolver_failures_become_errors_but_absent_records_do_not() {
        let failed = spf(&Err(ResolveError::Failed("SERVFAIL".to_string())));
        assert_eq!(failed.status, Status::Error);
        assert!(failed.notes.contains("SERVFAIL"));

        assert_eq!(dmarc(&Err(ResolveError::Timeout)).status, Status::Error);
        assert_eq!(dmarc(&Err(ResolveError::NxDomain)).status, Status::Failed);
    }

    #[test]
    fn dmarc_policy_strength() {
        let reject = dmarc(&txt(&["v=DMARC1; p=reject; rua=mailto:d@example.com"]));
        assert_eq!(reject.status, Status::Passed);
        assert_eq!(reject.details["policy_strength"], "reject");

        let none = dmarc(&txt(&["v=DMARC1; p=none"]));
        assert_eq!(none.details["policy_strength"], "none");

        assert_eq!(policy_strength("v=DMARC1; p=quarantine; sp=reject"), "quarantine");
        assert_eq!(policy_strength("v=DMARC1; sp=reject"), "unknown");
        assert_eq!(dmarc(&txt(&["v=spf1 -all"])).status, Status::Failed);
    }

    #[test]
    fn dkim_key_length_is_eight_bits_per_payload_char() {
        let verdict = dkim(&txt(&["v=DKIM1; k=rsa; p=ABCDEFGH"]));
        assert_eq!(verdict.status, Status::Passed);
        assert_eq!(verdict.details["estimated_key_length"], "64");

        assert_eq!(estimated_key_length("v=DKIM1; p="), Some(0));
        assert_eq!(estimated_key_length("v=DKIM1; k=rsa"), None);
        assert_eq!(dkim(&Err(ResolveError::NxDomain)).status, Status::Failed);
    }

    #[test]
    fn dnssec_needs_a_ds_record() {
        assert_eq!(dnssec(&txt(&["2371 13 2 ABCD"])).status, Status::Passed);
        assert_eq!(dnssec(&Err(ResolveError::NoAnswer)).status, Status::Failed);
        assert_eq!(dnssec(&txt(&[])).status, Status::Failed);
    }

    #[test]
    fn query_names() {
        assert_eq!(query_for(DnsCheck::Dmarc, "example.com").0, "_dmarc.example.com");
        assert_eq!(
            query_for(DnsCheck::Dkim, "example.com").0,
            "default._domainkey.example.com"
        );
        assert_eq!(query_for(DnsCheck::Dnssec, "example.com").1, RecordKind::Ds);
    }
}
