use crate::config::PingConfig;
use crate::error::{Error, Result};
use crate::types::{ProbeCount, TimeToLive};
use std::net::IpAddr;
use std::time::Duration;

/// A builder for creating a validated [`PingConfig`].
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use ping_engine::Builder;
/// use std::net::IpAddr;
/// use std::str::FromStr;
/// use std::time::Duration;
///
/// let config = Builder::new(IpAddr::from_str("1.1.1.1")?)
///     .count(3)
///     .interval(Duration::from_millis(500))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Builder {
    config: PingConfig,
}

impl Builder {
    /// Initializes a new `Builder` for a given destination address.
    #[must_use]
    pub fn new(target_addr: IpAddr) -> Self {
        Self {
            config: PingConfig {
                target_addr,
                ..PingConfig::default()
            },
        }
    }

    /// Sets the total number of probes to issue.
    ///
    /// A count of zero is permitted and produces an instance which
    /// terminates immediately without probing.
    #[must_use]
    pub fn count(mut self, count: usize) -> Self {
        self.config.count = ProbeCount(count);
        self
    }

    /// Sets the base spacing between probes.
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    /// Sets the time-to-live stamped into outgoing probes.
    #[must_use]
    pub fn max_ttl(mut self, max_ttl: u8) -> Self {
        self.config.max_ttl = TimeToLive(max_ttl);
        self
    }

    /// Sets whether discovered addresses are resolved when reported.
    #[must_use]
    pub fn do_resolv(mut self, do_resolv: bool) -> Self {
        self.config.do_resolv = do_resolv;
        self
    }

    /// Sets whether reported replies are prefixed with a timestamp.
    #[must_use]
    pub fn show_timestamp(mut self, show_timestamp: bool) -> Self {
        self.config.show_timestamp = show_timestamp;
        self
    }

    /// Sets whether per-probe reporting is suppressed.
    #[must_use]
    pub fn is_quiet(mut self, is_quiet: bool) -> Self {
        self.config.is_quiet = is_quiet;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadConfig`] for a zero interval or a zero
    /// time-to-live.
    pub fn build(self) -> Result<PingConfig> {
        if self.config.interval.is_zero() {
            return Err(Error::BadConfig("interval must be non-zero".to_string()));
        }
        if self.config.max_ttl == TimeToLive(0) {
            return Err(Error::BadConfig("max-ttl must be non-zero".to_string()));
        }
        Ok(self.config)
    }
}
