//! An event-driven ping measurement engine.
//!
//! This crate provides the core reachability-measurement algorithm of a
//! ping tool: it dispatches probe packets toward a destination, correlates
//! asynchronous replies (including ICMP and `ICMPv6` error indications) to
//! the probes which elicited them, and reports per-probe outcomes plus
//! aggregate round-trip-time statistics.
//!
//! The engine runs atop an ambient probing framework which supplies packet
//! crafting, raw socket I/O and the event loop.  It is driven entirely by
//! [`Event`]s delivered from outside, publishes one semantic [`PingEvent`]
//! outcome per consumed reply or timeout, and signals termination and
//! failure through the value returned by [`Strategy::handle`].  The only
//! outbound dependency is the narrow [`Network`] contract used to transmit
//! probes.
//!
//! The algorithm is registered with the host under the name
//! [`ALGORITHM_NAME`] and consumes the configuration produced by the host's
//! option parser:
//!
//! | Option | Effect |
//! |--------|--------|
//! | `-c N` | set [`PingConfig::count`] |
//! | `-D`   | enable [`PingConfig::show_timestamp`] |
//! | `-n`   | disable [`PingConfig::do_resolv`] |
//! | `-q`   | enable [`PingConfig::is_quiet`] |
//! | `-v`   | help |
//!
//! # Example
//!
//! The following example builds a configuration, starts an instance over a
//! trivial network and feeds it the init event:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use ping_engine::{Builder, Event, Network, Probe, Result, Strategy, TimeToLive};
//! use std::net::IpAddr;
//! use std::str::FromStr;
//! use std::time::{Duration, SystemTime};
//!
//! struct Loopback;
//!
//! impl Network for Loopback {
//!     fn send_probe(&mut self, _probe: Probe) -> Result<()> {
//!         Ok(())
//!     }
//!     fn timeout(&self) -> Duration {
//!         Duration::from_secs(3)
//!     }
//! }
//!
//! let config = Builder::new(IpAddr::from_str("1.1.1.1")?).count(3).build()?;
//! let skeleton = Probe::new(TimeToLive(64), None, SystemTime::now());
//! let strategy = Strategy::new(&config, skeleton, |event| println!("{event:?}"));
//! let mut network = Loopback;
//! let mut state = None;
//! strategy.handle(&mut network, &mut state, Event::Init)?;
//! # Ok(())
//! # }
//! ```
//!
//! # See Also
//!
//! - [`Builder`] - Build a [`PingConfig`].
//! - [`Strategy::handle`] - Drive the instance with framework events.
//! - [`PingState::summary`] - The end-of-run statistics report.
#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::use_self,
    clippy::option_if_let_else,
    clippy::missing_const_for_fn,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
#![deny(unsafe_code)]

mod builder;
mod classifier;
mod config;
mod error;
mod net;
mod probe;
mod stats;
mod strategy;
mod types;

pub use builder::Builder;
pub use classifier::{classify, is_destination, ReplyClass};
pub use config::{defaults, PingConfig};
pub use error::{Error, Result};
pub use net::Network;
pub use probe::{icmpv4, icmpv6, IcmpCode, IcmpPacket, Probe, ProbeReply, Reply};
pub use stats::{RttStats, RttSummary, Summary};
pub use strategy::{Event, Flow, PingEvent, PingState, Strategy};
pub use types::{ProbeCount, TimeToLive};

/// The name under which the algorithm registers with the host.
pub const ALGORITHM_NAME: &str = "ping";
