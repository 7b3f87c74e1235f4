//! Command-line arguments
//!
//! Hosts are positional; destinations can come from flags or environment.

use clap::Parser;
use labwatch_client::DEFAULT_API_URL;

#[derive(Debug, Parser)]
#[command(name = "labwatch")]
#[command(about = "Run SSL Labs analyses for a list of hosts and report the grades", long_about = None)]
pub struct Cli {
    /// Hosts to analyze (bare names or URLs such as https://example.com)
    pub hosts: Vec<String>,

    /// Incoming-webhook URL receiving one message per host
    #[arg(long, env = "SLACK_WEBHOOK")]
    pub webhook_url: Option<String>,

    /// Scan API base URL
    #[arg(long, env = "LABWATCH_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
}

impl Cli {
    /// Hosts reduced to bare host names, blanks dropped
    pub fn normalized_hosts(&self) -> Vec<String> {
        self.hosts
            .iter()
            .map(|host| normalize_host(host))
            .filter(|host| !host.is_empty())
            .collect()
    }
}

/// Strips scheme, path and surrounding whitespace from a host argument
///
/// `https://Example.com/login` becomes `example.com`.
pub fn normalize_host(input: &str) -> String {
    let trimmed = input.trim();
    let without_scheme = trimmed
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);

    without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}
