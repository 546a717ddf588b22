use crate::types::{ProbeCount, TimeToLive};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Default values for configuration.
pub mod defaults {
    use std::time::Duration;

    /// The default value for `count`.
    pub const DEFAULT_COUNT: usize = 5;

    /// The default value for `interval`.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    /// The default value for `max-ttl`.
    pub const DEFAULT_MAX_TTL: u8 = 64;

    /// The default value for `do-resolv`.
    pub const DEFAULT_DO_RESOLV: bool = true;

    /// The default value for `show-timestamp`.
    pub const DEFAULT_SHOW_TIMESTAMP: bool = false;

    /// The default value for `is-quiet`.
    pub const DEFAULT_IS_QUIET: bool = false;
}

/// Ping configuration.
///
/// An immutable per-instance configuration, constructed by the caller
/// (typically from parsed command line options) and handed to the engine
/// when the instance starts.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PingConfig {
    /// The resolved destination address.
    pub target_addr: IpAddr,
    /// The total number of probes to issue (`-c`).
    pub count: ProbeCount,
    /// The base spacing between probes.
    pub interval: Duration,
    /// The time-to-live stamped into outgoing probes.
    pub max_ttl: TimeToLive,
    /// Whether discovered addresses are resolved to hostnames when reported
    /// (`-n` disables).
    pub do_resolv: bool,
    /// Whether reported replies are prefixed with a timestamp (`-D`).
    pub show_timestamp: bool,
    /// Whether per-probe reporting is suppressed (`-q`).
    pub is_quiet: bool,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            target_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            count: ProbeCount(defaults::DEFAULT_COUNT),
            interval: defaults::DEFAULT_INTERVAL,
            max_ttl: TimeToLive(defaults::DEFAULT_MAX_TTL),
            do_resolv: defaults::DEFAULT_DO_RESOLV,
            show_timestamp: defaults::DEFAULT_SHOW_TIMESTAMP,
            is_quiet: defaults::DEFAULT_IS_QUIET,
        }
    }
}
