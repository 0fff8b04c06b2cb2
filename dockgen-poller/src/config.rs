//! Poller configuration
//!
//! Delays and budgets that bound a poll session. Defaults match the hosted
//! backend; all values can be overridden from the environment for slow
//! networks or tests.

use std::time::Duration;

/// Poll session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay before the first status query
    pub initial_delay: Duration,

    /// Delay between consecutive status queries
    pub interval: Duration,

    /// Maximum number of status queries per session
    pub max_attempts: u32,

    /// Elapsed time after which a session stops regardless of status
    pub force_stop_after: Duration,

    /// Outer elapsed-time ceiling for continuing or retrying
    pub max_elapsed: Duration,

    /// Longest a single status query may take before it counts as a
    /// transient failure
    pub request_timeout: Duration,
}

impl PollConfig {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - DOCKGEN_POLL_INITIAL_DELAY_MS (default: 1000)
    /// - DOCKGEN_POLL_INTERVAL_MS (default: 2000)
    /// - DOCKGEN_POLL_MAX_ATTEMPTS (default: 150)
    /// - DOCKGEN_POLL_FORCE_STOP_SECS (default: 120)
    /// - DOCKGEN_POLL_MAX_ELAPSED_SECS (default: 300)
    /// - DOCKGEN_POLL_REQUEST_TIMEOUT_SECS (default: 10)
    ///
    /// A variable that is set but cannot be parsed is an error.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            initial_delay: env_millis("DOCKGEN_POLL_INITIAL_DELAY_MS")?
                .unwrap_or(defaults.initial_delay),
            interval: env_millis("DOCKGEN_POLL_INTERVAL_MS")?.unwrap_or(defaults.interval),
            max_attempts: env_parse::<u32>("DOCKGEN_POLL_MAX_ATTEMPTS")?
                .unwrap_or(defaults.max_attempts),
            force_stop_after: env_parse::<u64>("DOCKGEN_POLL_FORCE_STOP_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.force_stop_after),
            max_elapsed: env_parse::<u64>("DOCKGEN_POLL_MAX_ELAPSED_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.max_elapsed),
            request_timeout: env_parse::<u64>("DOCKGEN_POLL_REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.interval.is_zero() {
            anyhow::bail!("interval must be greater than 0");
        }

        if self.max_attempts == 0 {
            anyhow::bail!("max_attempts must be greater than 0");
        }

        if self.force_stop_after.is_zero() || self.max_elapsed.is_zero() {
            anyhow::bail!("time ceilings must be greater than 0");
        }

        if self.force_stop_after > self.max_elapsed {
            anyhow::bail!(
                "force_stop_after ({:?}) must not exceed max_elapsed ({:?})",
                self.force_stop_after,
                self.max_elapsed
            );
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.request_timeout > self.force_stop_after {
            anyhow::bail!(
                "request_timeout ({:?}) must not exceed force_stop_after ({:?})",
                self.request_timeout,
                self.force_stop_after
            );
        }

        Ok(())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            interval: Duration::from_secs(2),
            max_attempts: 150,
            force_stop_after: Duration::from_secs(120),
            max_elapsed: Duration::from_secs(300),
            request_timeout: Duration::from_secs(10),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> anyhow::Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: '{}'", name, raw)),
        Err(_) => Ok(None),
    }
}

fn env_millis(name: &str) -> anyhow::Result<Option<Duration>> {
    Ok(env_parse::<u64>(name)?.map(Duration::from_millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PollConfig::default();
        assert_eq!(config.initial_delay, Duration::from_secs(1));
        assert_eq!(config.interval, Duration::from_secs(2));
        assert_eq!(config.max_attempts, 150);
        assert_eq!(config.force_stop_after, Duration::from_secs(120));
        assert_eq!(config.max_elapsed, Duration::from_secs(300));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PollConfig::default();

        config.interval = Duration::ZERO;
        assert!(config.validate().is_err());
        config.interval = Duration::from_secs(2);

        config.max_attempts = 0;
        assert!(config.validate().is_err());
        config.max_attempts = 150;

        config.force_stop_after = Duration::from_secs(400);
        assert!(config.validate().is_err());
        config.force_stop_after = Duration::from_secs(120);

        config.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
        config.request_timeout = Duration::from_secs(121);
        assert!(config.validate().is_err());
        config.request_timeout = Duration::from_secs(10);

        assert!(config.validate().is_ok());
    }
}
