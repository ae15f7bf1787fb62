//! Static, read-only explanations for every named check.
//!
//! The evaluators never read this module; it only feeds the terminal UI,
//! which looks entries up by the finding's check name.

use std::fmt;

/// Groups checks in the user interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FindingCategory {
    /// E-mail authentication and DNS integrity records.
    Dns,
    /// HTTP response headers and body fingerprints.
    Http,
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingCategory::Dns => write!(f, "DNS Configuration"),
            FindingCategory::Http => write!(f, "HTTP Security Headers"),
        }
    }
}

/// Human-readable context for one check.
#[derive(Debug)]
pub struct FindingDetail {
    /// The check name the entry belongs to (e.g. "SPF", "X-Frame-Options").
    pub code: &'static str,
    pub title: &'static str,
    pub category: FindingCategory,
    /// What the check looks at and why it matters.
    pub description: &'static str,
    /// What to change when the check does not pass.
    pub remediation: &'static str,
}

static FINDINGS: &[FindingDetail] = &[
    // --- DNS: Email Security & Domain Integrity ---
    FindingDetail {
        code: "SPF",
        title: "SPF Record",
        category: FindingCategory::Dns,
        description: "Sender Policy Framework (SPF) is a DNS record that lists all the servers authorized to send email on behalf of your domain. Without it, or with more than one, attackers can more easily spoof emails from your domain.",
        remediation: "Publish exactly one TXT record starting with 'v=spf1' that ends in '-all' (fail) or '~all' (softfail). A simple example for Google Workspace is 'v=spf1 include:_spf.google.com ~all'.",
    },
    FindingDetail {
        code: "DMARC",
        title: "DMARC Policy",
        category: FindingCategory::Dns,
        description: "DMARC is an email authentication policy that tells receiving mail servers how to handle emails that fail SPF and DKIM checks. A policy of 'none' only monitors and offers no active protection against spoofing.",
        remediation: "Add a TXT record at '_dmarc.<domain>'. Start with 'v=DMARC1; p=none;' and move to 'p=quarantine' or 'p=reject' after analyzing the aggregate reports.",
    },
    FindingDetail {
        code: "DKIM",
        title: "DKIM Selector",
        category: FindingCategory::Dns,
        description: "DKIM adds a digital signature to outgoing email that receivers verify against a public key published in DNS. Only the common 'default' selector is probed, so a missing record may just mean your provider uses another selector name.",
        remediation: "Enable DKIM signing in your email provider's control panel and publish the public key as a TXT record at '<selector>._domainkey.<domain>'. Prefer keys of at least 2048 bits.",
    },
    FindingDetail {
        code: "DNSSEC",
        title: "DNSSEC Delegation",
        category: FindingCategory::Dns,
        description: "DNSSEC signs DNS answers so resolvers can detect forged responses. A DS record at the parent zone shows the delegation is secured; its absence means DNSSEC is likely disabled.",
        remediation: "Enable DNSSEC signing at your DNS host, then publish the resulting DS record through your registrar.",
    },

    // --- HTTP Headers: Hardening the Application Layer ---
    FindingDetail {
        code: "Strict-Transport-Security",
        title: "HSTS",
        category: FindingCategory::Http,
        description: "The HTTP Strict-Transport-Security (HSTS) header instructs browsers to only communicate with your site over HTTPS. It protects against protocol downgrade attacks and cookie hijacking.",
        remediation: "Send 'Strict-Transport-Security: max-age=31536000; includeSubDomains; preload'. The max-age must be at least one year and includeSubDomains must be present.",
    },
    FindingDetail {
        code: "X-Frame-Options",
        title: "Clickjacking Protection",
        category: FindingCategory::Http,
        description: "This header protects your visitors against 'clickjacking' attacks, where an attacker loads your site in an invisible iframe to trick users into clicking on malicious content.",
        remediation: "Add the 'X-Frame-Options' header and set it to 'DENY' (no framing allowed) or 'SAMEORIGIN' (only you can frame your site).",
    },
    FindingDetail {
        code: "X-Content-Type-Options",
        title: "MIME Sniffing Protection",
        category: FindingCategory::Http,
        description: "This header prevents browsers from trying to guess the content type of a file (MIME sniffing). This mitigates attacks where a file disguised as an image could be executed as a script.",
        remediation: "Add the 'X-Content-Type-Options' header and set its value to 'nosniff'.",
    },
    FindingDetail {
        code: "Content-Security-Policy",
        title: "Content Security Policy",
        category: FindingCategory::Http,
        description: "Content-Security-Policy (CSP) helps prevent Cross-Site Scripting (XSS) and data injection by defining which resources a browser is allowed to load. 'unsafe-inline' and 'unsafe-eval' undo most of that protection.",
        remediation: "Define trusted sources for scripts and styles, include \"object-src 'none'\" and \"base-uri 'self'\", and replace inline scripts with nonces or hashes instead of 'unsafe-inline'.",
    },
    FindingDetail {
        code: "Referrer-Policy",
        title: "Referrer Policy",
        category: FindingCategory::Http,
        description: "Referrer-Policy controls how much of the current URL is sent to other sites in the Referer header. Loose policies can leak paths, tokens or search terms to third parties.",
        remediation: "Set 'Referrer-Policy' to 'strict-origin-when-cross-origin', 'strict-origin', 'same-origin' or 'no-referrer'.",
    },
    FindingDetail {
        code: "Permissions-Policy",
        title: "Permissions Policy",
        category: FindingCategory::Http,
        description: "Permissions-Policy restricts which browser features (camera, geolocation, microphone and more) the page and its embedded frames may use.",
        remediation: "Send a 'Permissions-Policy' header that disables what you do not use, for example 'camera=(), microphone=(), geolocation=()'.",
    },
    FindingDetail {
        code: "Cross-Origin-Opener-Policy",
        title: "Cross-Origin Opener Policy",
        category: FindingCategory::Http,
        description: "COOP isolates your browsing context from cross-origin windows, which blocks a class of cross-window attacks and is required for cross-origin isolation.",
        remediation: "Set 'Cross-Origin-Opener-Policy: same-origin'.",
    },
    FindingDetail {
        code: "Cross-Origin-Resource-Policy",
        title: "Cross-Origin Resource Policy",
        category: FindingCategory::Http,
        description: "CORP tells browsers which origins may load this resource, protecting it from being embedded by other sites and from speculative side-channel leaks.",
        remediation: "Set 'Cross-Origin-Resource-Policy: same-origin' on responses that are not meant to be embedded elsewhere.",
    },
    FindingDetail {
        code: "Cross-Origin-Embedder-Policy",
        title: "Cross-Origin Embedder Policy",
        category: FindingCategory::Http,
        description: "COEP prevents the page from loading cross-origin resources that have not explicitly opted in, completing cross-origin isolation together with COOP.",
        remediation: "Set 'Cross-Origin-Embedder-Policy: require-corp' once every embedded resource sends CORP or CORS headers.",
    },
    FindingDetail {
        code: "Set-Cookie",
        title: "Cookie Security Flags",
        category: FindingCategory::Http,
        description: "Cookies without Secure can leak over plain HTTP, cookies without HttpOnly are readable by injected scripts, and cookies without SameSite are sent on cross-site requests. SameSite=None without Secure is rejected by modern browsers.",
        remediation: "Set every cookie with 'Secure; HttpOnly; SameSite=Lax' (or 'Strict'). Use 'SameSite=None' only together with 'Secure'.",
    },
    FindingDetail {
        code: "Server",
        title: "Server Banner",
        category: FindingCategory::Http,
        description: "The Server header can reveal the web server software and version, which helps attackers pick known exploits.",
        remediation: "Remove the header or reduce it to a generic value without a version number.",
    },
    FindingDetail {
        code: "X-Powered-By",
        title: "Framework Disclosure",
        category: FindingCategory::Http,
        description: "X-Powered-By advertises the application framework or language runtime behind the site.",
        remediation: "Disable the header in your framework or strip it at the reverse proxy.",
    },
    FindingDetail {
        code: "X-AspNet-Version",
        title: "ASP.NET Version Disclosure",
        category: FindingCategory::Http,
        description: "X-AspNet-Version exposes the exact ASP.NET runtime version in use.",
        remediation: "Set enableVersionHeader=\"false\" on the httpRuntime element in web.config.",
    },
    FindingDetail {
        code: "Technology-Stack",
        title: "Technology Fingerprint",
        category: FindingCategory::Http,
        description: "Markers in the page body, such as CMS asset paths, framework bundles or a generator meta tag, reveal the software the site runs on.",
        remediation: "Remove generator meta tags and version strings from public pages, and keep the detected software patched.",
    },
];

/// Looks up the entry for a check name, ignoring ASCII case.
pub fn get_finding_detail(code: &str) -> Option<&'static FindingDetail> {
    FINDINGS.iter().find(|f| f.code.eq_ignore_ascii_case(code))
}
