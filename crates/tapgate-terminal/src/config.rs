//! Runtime configuration for the terminal.

use std::net::SocketAddr;
use std::time::Duration;
use tapgate_core::{
    Error, Result,
    constants::{BUZZER_PULSE_MS, INDICATOR_HOLD_MS, POLL_INTERVAL_MS, TOKEN_BLOCK},
};

/// Configuration of the terminal process.
///
/// # Example
///
/// ```
/// use tapgate_terminal::TerminalConfig;
///
/// let config = TerminalConfig::default();
/// assert_eq!(config.poll_interval.as_millis(), 300);
/// ```
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Authorization endpoint receiving each reading as a JSON POST.
    pub authorize_url: String,

    /// Bind address of the viewer page server.
    pub page_addr: SocketAddr,

    /// Bind address of the notification channel (distinct port).
    pub notify_addr: SocketAddr,

    /// Delay between presence polls when no card is in the field.
    pub poll_interval: Duration,

    /// How long a decision indicator stays lit.
    pub indicator_hold: Duration,

    /// Duration of the buzzer pulse on detection.
    pub buzzer_pulse: Duration,

    /// Card data block holding the programmed token.
    pub token_block: u8,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            authorize_url: "http://127.0.0.1:6000/api/aa/insert".to_string(),
            page_addr: "0.0.0.0:8080".parse().unwrap(),
            notify_addr: "0.0.0.0:8081".parse().unwrap(),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            indicator_hold: Duration::from_millis(INDICATOR_HOLD_MS),
            buzzer_pulse: Duration::from_millis(BUZZER_PULSE_MS),
            token_block: TOKEN_BLOCK,
        }
    }
}

impl TerminalConfig {
    /// Load the configuration from `TAPGATE_*` environment variables,
    /// falling back to the defaults for anything unset.
    ///
    /// Recognized variables: `TAPGATE_AUTHORIZE_URL`, `TAPGATE_PAGE_ADDR`,
    /// `TAPGATE_NOTIFY_ADDR`, `TAPGATE_POLL_INTERVAL_MS`,
    /// `TAPGATE_INDICATOR_HOLD_MS`, `TAPGATE_BUZZER_PULSE_MS`,
    /// `TAPGATE_TOKEN_BLOCK`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when a set variable does not parse.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = read_env("TAPGATE_AUTHORIZE_URL") {
            config.authorize_url = url;
        }
        if let Some(addr) = read_env("TAPGATE_PAGE_ADDR") {
            config.page_addr = parse_addr("TAPGATE_PAGE_ADDR", &addr)?;
        }
        if let Some(addr) = read_env("TAPGATE_NOTIFY_ADDR") {
            config.notify_addr = parse_addr("TAPGATE_NOTIFY_ADDR", &addr)?;
        }
        if let Some(ms) = read_env("TAPGATE_POLL_INTERVAL_MS") {
            config.poll_interval = Duration::from_millis(parse_u64("TAPGATE_POLL_INTERVAL_MS", &ms)?);
        }
        if let Some(ms) = read_env("TAPGATE_INDICATOR_HOLD_MS") {
            config.indicator_hold =
                Duration::from_millis(parse_u64("TAPGATE_INDICATOR_HOLD_MS", &ms)?);
        }
        if let Some(ms) = read_env("TAPGATE_BUZZER_PULSE_MS") {
            config.buzzer_pulse = Duration::from_millis(parse_u64("TAPGATE_BUZZER_PULSE_MS", &ms)?);
        }
        if let Some(block) = read_env("TAPGATE_TOKEN_BLOCK") {
            config.token_block = block
                .parse()
                .map_err(|_| Error::Config(format!("TAPGATE_TOKEN_BLOCK: invalid block {block}")))?;
        }

        Ok(config)
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn parse_addr(name: &str, value: &str) -> Result<SocketAddr> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("{name}: invalid socket address {value}")))
}

fn parse_u64(name: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("{name}: invalid duration {value}")))
}
