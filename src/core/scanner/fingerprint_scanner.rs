// src/core/scanner/fingerprint_scanner.rs

use crate::core::models::Verdict;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

/// Where in the response body a marker is looked for.
enum Check<'a> {
    /// Anywhere in the raw HTML body.
    Body(&'a Lazy<Regex>),
    /// The `content` of a named `<meta>` tag.
    MetaTag(&'a str, &'a Lazy<Regex>),
    /// The `src` attribute of `<script>` tags.
    ScriptSrc(&'a Lazy<Regex>),
}

/// A body marker that reveals a framework or third-party script.
struct FingerprintRule<'a> {
    marker: &'a str,
    check: Check<'a>,
}

static RE_WP_CONTENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)wp-content").unwrap());
static RE_JOOMLA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)joomla").unwrap());
static RE_DRUPAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)drupal").unwrap());
static RE_NEXTJS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)next\.js").unwrap());
static RE_NEXTJS_SCRIPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/_next/static/").unwrap());
static RE_REACT_DOM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)react-dom").unwrap());
static RE_ANALYTICS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)analytics\.js").unwrap());

static RULES: &[FingerprintRule] = &[
    FingerprintRule { marker: "wp-content", check: Check::Body(&RE_WP_CONTENT) },
    FingerprintRule { marker: "joomla", check: Check::Body(&RE_JOOMLA) },
    FingerprintRule { marker: "joomla", check: Check::MetaTag("generator", &RE_JOOMLA) },
    FingerprintRule { marker: "drupal", check: Check::Body(&RE_DRUPAL) },
    FingerprintRule { marker: "drupal", check: Check::MetaTag("generator", &RE_DRUPAL) },
    FingerprintRule { marker: "next.js", check: Check::Body(&RE_NEXTJS) },
    FingerprintRule { marker: "next.js", check: Check::ScriptSrc(&RE_NEXTJS_SCRIPT) },
    FingerprintRule { marker: "react-dom", check: Check::Body(&RE_REACT_DOM) },
    FingerprintRule { marker: "analytics.js", check: Check::Body(&RE_ANALYTICS) },
    FingerprintRule { marker: "analytics.js", check: Check::ScriptSrc(&RE_ANALYTICS) },
];

static META_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta[name][content]").unwrap());
static SCRIPT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("script[src]").unwrap());

/// Lists the markers found in `body`, in rule order, without duplicates.
pub fn detect_markers(body: &str) -> Vec<&'static str> {
    if body.trim().is_empty() {
        return Vec::new();
    }
    let document = Html::parse_document(body);

    let mut found: Vec<&'static str> = Vec::new();
    for rule in RULES {
        if found.contains(&rule.marker) {
            continue;
        }
        let matched = match &rule.check {
            Check::Body(re) => re.is_match(body),
            Check::MetaTag(name, re) => meta_content(&document, name).is_some_and(|c| re.is_match(&c)),
            Check::ScriptSrc(re) => document
                .select(&SCRIPT_SELECTOR)
                .filter_map(|el| el.value().attr("src"))
                .any(|src| re.is_match(src)),
        };
        if matched {
            debug!(marker = rule.marker, "Fingerprint rule matched.");
            found.push(rule.marker);
        }
    }
    found
}

/// The `generator` meta tag, if the page declares one.
pub fn generator(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    meta_content(&Html::parse_document(body), "generator")
}

fn meta_content(document: &Html, name: &str) -> Option<String> {
    document
        .select(&META_SELECTOR)
        .find(|el| {
            el.value()
                .attr("name")
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Rule for the `Technology-Stack` check.
pub fn technology_stack(body: &str) -> Verdict {
    let markers = detect_markers(body);
    let generator = generator(body);

    let verdict = if markers.is_empty() {
        Verdict::passed(Some("None detected"), "No major framework fingerprints in the response body.")
    } else {
        Verdict::warning(
            Some(&markers.join(" | ")),
            "Framework fingerprints detected in the response body.",
        )
    };
    match generator {
        Some(g) => verdict.with_detail("generator", g),
        None => verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Status;

    #[test]
    fn detects_body_markers_once_each() {
        let body = r#"<html><head>
            <link rel="stylesheet" href="/wp-content/themes/x/style.css">
            <script src="/wp-content/plugins/a.js"></script>
            <script src="https://www.google-analytics.com/analytics.js"></script>
        </head><body></body></html>"#;
        assert_eq!(detect_markers(body), vec!["wp-content", "analytics.js"]);
    }

    #[test]
    fn detects_generator_meta_and_next_scripts() {
        let body = r#"<html><head>
            <meta name="Generator" content="Drupal 10 (https://www.drupal.org)">
            <script src="/_next/static/chunks/main.js"></script>
        </head></html>"#;
        let markers = detect_markers(body);
        assert!(markers.contains(&"drupal"));
        assert!(markers.contains(&"next.js"));
        assert_eq!(generator(body).as_deref(), Some("Drupal 10 (https://www.drupal.org)"));
    }

    #[test]
    fn technology_stack_verdicts() {
        let clean = technology_stack("<html><body>hello</body></html>");
        assert_eq!(clean.status, Status::Passed);
        assert_eq!(clean.value.as_deref(), Some("None detected"));

        let noisy = technology_stack("<div id=root></div><script>/* react-dom */</script>");
        assert_eq!(noisy.status, Status::Warning);
        assert_eq!(noisy.value.as_deref(), Some("react-dom"));

        assert_eq!(technology_stack("").status, Status::Passed);
    }
}
