// src/core/scanner/cookie_policy.rs

use crate::core::models::Verdict;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::debug;

static RE_SAMESITE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^samesite\s*=\s*(strict|lax|none)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieDefect {
    MissingSecure,
    MissingHttpOnly,
    MissingSameSite,
    /// Browsers drop `SameSite=None` cookies that are not `Secure`.
    SameSiteNoneWithoutSecure,
}

impl CookieDefect {
    pub fn is_elevated(self) -> bool {
        matches!(self, CookieDefect::SameSiteNoneWithoutSecure)
    }
}

impl fmt::Display for CookieDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookieDefect::MissingSecure => write!(f, "missing Secure"),
            CookieDefect::MissingHttpOnly => write!(f, "missing HttpOnly"),
            CookieDefect::MissingSameSite => write!(f, "missing SameSite"),
            CookieDefect::SameSiteNoneWithoutSecure => {
                write!(f, "HIGH: SameSite=None without Secure")
            }
        }
    }
}

/// A cookie that failed at least one attribute test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedCookie {
    pub name: String,
    pub defects: Vec<CookieDefect>,
}

/// Tests one `Set-Cookie` string. Returns `None` when the cookie is clean.
pub fn inspect_cookie(raw: &str) -> Option<FlaggedCookie> {
    let mut parts = raw.split(';');
    let pair = parts.next().unwrap_or_default();
    let name = pair.split('=').next().unwrap_or_default().trim().to_string();

    let mut secure = false;
    let mut http_only = false;
    let mut same_site: Option<String> = None;
    for attribute in parts.map(str::trim) {
        let key = attribute.split('=').next().unwrap_or_default().trim();
        if key.eq_ignore_ascii_case("secure") {
            secure = true;
        } else if key.eq_ignore_ascii_case("httponly") {
            http_only = true;
        } else if let Some(caps) = RE_SAMESITE.captures(attribute) {
            same_site = Some(caps[1].to_ascii_lowercase());
        }
    }

    let mut defects = Vec::new();
    if !secure {
        defects.push(CookieDefect::MissingSecure);
    }
    if !http_only {
        defects.push(CookieDefect::MissingHttpOnly);
    }
    match same_site.as_deref() {
        None => defects.push(CookieDefect::MissingSameSite),
        Some("none") if !secure => defects.push(CookieDefect::SameSiteNoneWithoutSecure),
        Some(_) => {}
    }

    debug!(cookie = %name, defects = defects.len(), "Inspected cookie.");
    if defects.is_empty() {
        None
    } else {
        Some(FlaggedCookie { name, defects })
    }
}

/// Evaluates every `Set-Cookie` occurrence of a response as one finding.
pub fn cookie_security(cookies: &[&str]) -> Verdict {
    let cookies: Vec<&str> = cookies
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if cookies.is_empty() {
        return Verdict::info(None, "No Set-Cookie header present.");
    }

    let value = cookies.join(" | ");
    let flagged: Vec<FlaggedCookie> = cookies.iter().filter_map(|c| inspect_cookie(c)).collect();
    if flagged.is_empty() {
        return Verdict::passed(
            Some(&value),
            format!(
                "All {} cookie(s) set Secure, HttpOnly and SameSite.",
                cookies.len()
            ),
        )
        .with_detail("cookie_count", cookies.len().to_string());
    }

    let elevated = flagged
        .iter()
        .filter(|c| c.defects.iter().any(|d| d.is_elevated()))
        .count();
    let notes = flagged
        .iter()
        .map(|c| {
            let defects: Vec<String> = c.defects.iter().map(|d| d.to_string()).collect();
            format!("{}: {}", c.name, defects.join(", "))
        })
        .collect::<Vec<_>>()
        .join("; ");

    Verdict::failed(Some(&value), format!("Insecure cookies found. {notes}."))
        .with_detail("cookie_count", cookies.len().to_string())
        .with_detail("flagged_cookies", flagged.len().to_string())
        .with_detail("elevated_issues", elevated.to_string())
}
