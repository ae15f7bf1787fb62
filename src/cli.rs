// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vanguard_posture::ScanKind;
use vanguard_posture::config::{ConfigError, ScanConfig};

#[derive(Parser, Debug)]
#[command(name = "vanguard-posture", version, about = "HTTP header and e-mail DNS posture checks")]
pub struct Cli {
    #[arg(long, global = true, help = "Per-lookup timeout in seconds (1-60)")]
    pub timeout: Option<u64>,
    #[arg(long, global = true, help = "Do not follow HTTP redirects")]
    pub no_redirects: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Interactive terminal UI (default).
    Tui,
    /// Evaluate the HTTP security headers of a URL.
    Headers {
        target: String,
        #[arg(long = "check", help = "Check to run; repeat for more. Defaults to all header checks")]
        checks: Vec<String>,
    },
    /// Evaluate the e-mail authentication records of a domain.
    Dns {
        target: String,
        #[arg(long = "check", help = "SPF, DMARC, DKIM or DNSSEC; repeat for more")]
        checks: Vec<String>,
    },
    /// Handle a JSON request body: {"url", "domain", "checks"}.
    Request {
        #[arg(long, value_enum)]
        kind: ScanKind,
        #[arg(help = "File holding the request body; stdin when omitted")]
        file: Option<PathBuf>,
    },
}

impl Cli {
    /// Environment settings with the command-line flags applied on top.
    pub fn scan_config(&self) -> Result<ScanConfig, ConfigError> {
        let mut config = ScanConfig::from_env()?;
        if let Some(secs) = self.timeout {
            config = config.with_timeout_secs(secs)?;
        }
        if self.no_redirects {
            config.follow_redirects = false;
        }
        Ok(config)
    }
}
