// src/core/checks.rs

//! Check catalogues and the requested-check gate.
//!
//! Which checks run is decided here, by set membership only. The rules
//! themselves live in the scanner modules and never see the request.

use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Every named check the header evaluator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum HeaderCheck {
    #[strum(serialize = "Strict-Transport-Security")]
    StrictTransportSecurity,
    #[strum(serialize = "X-Frame-Options")]
    XFrameOptions,
    #[strum(serialize = "X-Content-Type-Options")]
    XContentTypeOptions,
    #[strum(serialize = "Content-Security-Policy")]
    ContentSecurityPolicy,
    #[strum(serialize = "Referrer-Policy")]
    ReferrerPolicy,
    #[strum(serialize = "Permissions-Policy")]
    PermissionsPolicy,
    #[strum(serialize = "Cross-Origin-Opener-Policy")]
    CrossOriginOpenerPolicy,
    #[strum(serialize = "Cross-Origin-Resource-Policy")]
    CrossOriginResourcePolicy,
    #[strum(serialize = "Cross-Origin-Embedder-Policy")]
    CrossOriginEmbedderPolicy,
    #[strum(serialize = "Set-Cookie")]
    SetCookie,
    #[strum(serialize = "Server")]
    Server,
    #[strum(serialize = "X-Powered-By")]
    XPoweredBy,
    #[strum(serialize = "X-AspNet-Version")]
    XAspNetVersion,
    #[strum(serialize = "Technology-Stack")]
    TechnologyStack,
}

impl HeaderCheck {
    /// The fixed list used when a caller requests nothing in particular.
    pub fn defaults() -> Vec<HeaderCheck> {
        HeaderCheck::iter()
            .filter(|c| *c != HeaderCheck::TechnologyStack)
            .collect()
    }
}

/// Every named check the DNS evaluator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum DnsCheck {
    Spf,
    Dmarc,
    Dkim,
    Dnssec,
}

impl DnsCheck {
    pub fn defaults() -> Vec<DnsCheck> {
        DnsCheck::iter().collect()
    }
}

/// A requested check name, either recognized or passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requested<C> {
    Known(C),
    Unknown(String),
}

impl<C: AsRef<str>> Requested<C> {
    /// The name the finding is reported under.
    pub fn name(&self) -> &str {
        match self {
            Requested::Known(check) => check.as_ref(),
            Requested::Unknown(name) => name,
        }
    }
}

/// Turns raw requested names into an ordered, de-duplicated list.
///
/// Known names are canonicalized regardless of case. An empty request, or
/// one holding only blank names, selects `defaults`.
pub fn resolve_requested<C>(requested: &[String], defaults: Vec<C>) -> Vec<Requested<C>>
where
    C: FromStr + AsRef<str> + PartialEq,
{
    let mut resolved: Vec<Requested<C>> = Vec::new();
    for raw in requested.iter().map(|r| r.trim()).filter(|r| !r.is_empty()) {
        let entry = match C::from_str(raw) {
            Ok(check) => Requested::Known(check),
            Err(_) => Requested::Unknown(raw.to_string()),
        };
        if !resolved
            .iter()
            .any(|r| r.name().eq_ignore_ascii_case(entry.name()))
        {
            resolved.push(entry);
        }
    }

    if resolved.is_empty() {
        defaults.into_iter().map(Requested::Known).collect()
    } else {
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn header_defaults_cover_the_fixed_list() {
        let defaults = HeaderCheck::defaults();
        assert_eq!(defaults.len(), 13);
        assert_eq!(defaults[0], HeaderCheck::StrictTransportSecurity);
        assert!(!defaults.contains(&HeaderCheck::TechnologyStack));
    }

    #[test]
    fn check_names_round_trip_through_strum() {
        assert_eq!(HeaderCheck::SetCookie.to_string(), "Set-Cookie");
        assert_eq!(
            "strict-transport-security".parse::<HeaderCheck>().unwrap(),
            HeaderCheck::StrictTransportSecurity
        );
        assert_eq!(DnsCheck::Dnssec.to_string(), "DNSSEC");
        assert_eq!("dmarc".parse::<DnsCheck>().unwrap(), DnsCheck::Dmarc);
    }

    #[test]
    fn empty_request_selects_defaults() {
        let resolved = resolve_requested::<DnsCheck>(&[], DnsCheck::defaults());
        let resolved: Vec<&str> = resolved.iter().map(|r| r.name()).collect();
        assert_eq!(resolved, vec!["SPF", "DMARC", "DKIM", "DNSSEC"]);

        let blank = resolve_requested::<DnsCheck>(&names(&["  "]), DnsCheck::defaults());
        assert_eq!(blank.len(), 4);
    }

    #[test]
    fn requested_names_are_canonicalized_and_deduplicated() {
        let resolved = resolve_requested(
            &names(&["x-frame-options", "X-Custom", "X-FRAME-OPTIONS", "x-custom"]),
            HeaderCheck::defaults(),
        );
        assert_eq!(
            resolved,
            vec![
                Requested::Known(HeaderCheck::XFrameOptions),
                Requested::Unknown("X-Custom".to_string()),
            ]
        );
        assert_eq!(resolved[0].name(), "X-Frame-Options");
    }
}
