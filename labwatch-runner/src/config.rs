//! Runner configuration
//!
//! Defines every tunable of a run: scan API and report locations, the
//! notification destination, and the timing budgets of the job lifecycle.
//! The struct is built once in `main` and handed to each component; nothing
//! mutates it afterwards.

use std::time::Duration;

use labwatch_client::DEFAULT_API_URL;

/// Default base URL of the human-readable report pages
pub const DEFAULT_REPORT_URL: &str = "https://www.ssllabs.com/ssltest/analyze.html";

/// Runner configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Scan API base URL (e.g., "https://api.ssllabs.com/api/v3")
    pub api_url: String,

    /// Report page URL used for links in notifications
    pub report_url: String,

    /// Notification webhook; `None` disables delivery
    pub webhook_url: Option<String>,

    /// How long a job may poll before it is marked expired
    pub fetch_timeout: Duration,

    /// Wait between two status requests
    pub poll_interval: Duration,

    /// Offset between the launches of consecutive hosts
    pub start_delay: Duration,

    /// Wait between two failed launch attempts
    pub launch_backoff: Duration,

    /// Launch retries after the first attempt fails
    pub launch_retries: u32,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl Config {
    /// Creates a configuration with the default timings
    pub fn new(api_url: String, webhook_url: Option<String>) -> Self {
        Self {
            api_url,
            report_url: DEFAULT_REPORT_URL.to_string(),
            webhook_url: webhook_url.filter(|url| !url.is_empty()),
            fetch_timeout: Duration::from_secs(20 * 60),
            poll_interval: Duration::from_secs(10),
            start_delay: Duration::from_secs(10),
            launch_backoff: Duration::from_secs(30),
            launch_retries: 5,
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Every variable is optional and falls back to the default:
    /// - LABWATCH_REPORT_URL
    /// - LABWATCH_FETCH_TIMEOUT (seconds, default: 1200)
    /// - LABWATCH_POLL_INTERVAL (seconds, default: 10)
    /// - LABWATCH_START_DELAY (seconds, default: 10)
    /// - LABWATCH_LAUNCH_BACKOFF (seconds, default: 30)
    /// - LABWATCH_LAUNCH_RETRIES (default: 5)
    /// - LABWATCH_REQUEST_TIMEOUT (seconds, default: 60)
    ///
    /// The API and webhook URLs come from the command line (which itself
    /// reads `LABWATCH_API_URL` and `SLACK_WEBHOOK`).
    pub fn from_env(api_url: String, webhook_url: Option<String>) -> Self {
        let defaults = Self::new(api_url, webhook_url);

        let report_url = std::env::var("LABWATCH_REPORT_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.report_url.clone());

        let launch_retries = std::env::var("LABWATCH_LAUNCH_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.launch_retries);

        Self {
            report_url,
            fetch_timeout: env_secs("LABWATCH_FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
            poll_interval: env_secs("LABWATCH_POLL_INTERVAL").unwrap_or(defaults.poll_interval),
            start_delay: env_secs("LABWATCH_START_DELAY").unwrap_or(defaults.start_delay),
            launch_backoff: env_secs("LABWATCH_LAUNCH_BACKOFF").unwrap_or(defaults.launch_backoff),
            launch_retries,
            request_timeout: env_secs("LABWATCH_REQUEST_TIMEOUT")
                .unwrap_or(defaults.request_timeout),
            ..defaults
        }
    }

    /// Whether notifications are actually delivered
    pub fn delivery_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !is_http_url(&self.api_url) {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if !is_http_url(&self.report_url) {
            anyhow::bail!("report_url must start with http:// or https://");
        }

        if let Some(webhook_url) = &self.webhook_url {
            if !is_http_url(webhook_url) {
                anyhow::bail!("webhook_url must start with http:// or https://");
            }
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.fetch_timeout.is_zero() {
            anyhow::bail!("fetch_timeout must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL.to_string(), None)
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
