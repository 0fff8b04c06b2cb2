//! Configuration module
//!
//! Handles CLI configuration: backend URL and poll settings.

use anyhow::Context;
use dockgen_client::GenerationClient;
use dockgen_poller::PollConfig;
use tracing::warn;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the generation backend
    pub api_url: String,
    /// Poll session settings
    pub poll: PollConfig,
}

impl Config {
    /// Builds the configuration from the parsed CLI URL and the environment
    ///
    /// Poll settings come from `DOCKGEN_POLL_*` variables; if they cannot be
    /// read the defaults are used.
    pub fn load(api_url: String) -> anyhow::Result<Self> {
        let poll = poll_or_default(PollConfig::from_env());
        poll.validate()?;

        let config = Self { api_url, poll };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        Ok(())
    }

    /// Builds a backend client whose requests give up after the poll
    /// request timeout
    pub fn client(&self) -> anyhow::Result<GenerationClient> {
        let http_client = reqwest::Client::builder()
            .timeout(self.poll.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(GenerationClient::with_client(&self.api_url, http_client))
    }
}

fn poll_or_default(loaded: anyhow::Result<PollConfig>) -> PollConfig {
    match loaded {
        Ok(poll) => poll,
        Err(e) => {
            warn!("Failed to load poll config from environment ({}), using defaults", e);
            PollConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::EnvFilter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config {
            api_url: "http://localhost:8080".to_string(),
            poll: PollConfig::default(),
        };
        assert!(config.validate().is_ok());

        config.api_url = "localhost:8080".to_string();
        assert!(config.validate().is_err());

        config.api_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_poll_env_is_reported_at_default_level() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("warn"))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let poll = tracing::subscriber::with_default(subscriber, || {
            poll_or_default(Err(anyhow::anyhow!(
                "DOCKGEN_POLL_INTERVAL_MS has an invalid value: 'soon'"
            )))
        });

        assert_eq!(poll, PollConfig::default());
        let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("WARN"), "nothing logged: {logged:?}");
        assert!(logged.contains("DOCKGEN_POLL_INTERVAL_MS"));
    }

    #[test]
    fn test_client_uses_configured_url() {
        let config = Config {
            api_url: "http://localhost:8080/".to_string(),
            poll: PollConfig::default(),
        };

        let client = config.client().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
