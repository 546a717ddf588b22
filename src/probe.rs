use crate::types::TimeToLive;
use std::net::IpAddr;
use std::time::{Duration, SystemTime};

/// Represents an outbound ping probe.
///
/// A `Probe` is crafted once by the caller as an immutable skeleton and deep
/// copied for every transmission.  The network layer borrows each copy for
/// the duration of the send; the engine retains ownership of the copy until
/// the instance is torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// The time-to-live stamped into the probe.
    pub ttl: TimeToLive,
    /// The scheduled send delay, or `None` to send best effort.
    pub delay: Option<Duration>,
    /// Timestamp when the probe was handed to the network layer.
    ///
    /// The network layer may restamp this at the actual wire time.
    pub sent: SystemTime,
}

impl Probe {
    #[must_use]
    pub const fn new(ttl: TimeToLive, delay: Option<Duration>, sent: SystemTime) -> Self {
        Self { ttl, delay, sent }
    }
}

/// An inbound reply packet as parsed by the network layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// The source address of the reply.
    pub addr: IpAddr,
    /// The time-to-live observed on the reply.
    pub ttl: TimeToLive,
    /// The size of the reply packet in bytes.
    pub size: usize,
    /// Timestamp when the reply was received.
    pub received: SystemTime,
    /// The ICMP header of the reply, if one could be extracted.
    pub icmp: Option<IcmpPacket>,
}

impl Reply {
    #[must_use]
    pub const fn new(
        addr: IpAddr,
        ttl: TimeToLive,
        size: usize,
        received: SystemTime,
        icmp: Option<IcmpPacket>,
    ) -> Self {
        Self {
            addr,
            ttl,
            size,
            received,
            icmp,
        }
    }
}

/// A reply paired with the probe which elicited it.
///
/// Pairing is performed by the network layer and is trusted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReply {
    /// The probe as transmitted.
    pub probe: Probe,
    /// The paired reply.
    pub reply: Reply,
}

impl ProbeReply {
    #[must_use]
    pub const fn new(probe: Probe, reply: Reply) -> Self {
        Self { probe, reply }
    }

    /// The measured round trip, zero if the clocks were inconsistent.
    #[must_use]
    pub fn rtt(&self) -> Duration {
        self.reply
            .received
            .duration_since(self.probe.sent)
            .unwrap_or_default()
    }
}

/// The ICMP header of a reply, tagged by IP version.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IcmpPacket {
    /// An `ICMP` header from an IPv4 reply.
    V4(icmpv4::IcmpType, IcmpCode),
    /// An `ICMPv6` header from an IPv6 reply.
    V6(icmpv6::IcmpType, IcmpCode),
}

/// The ICMP code.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq)]
pub struct IcmpCode(pub u8);

impl From<u8> for IcmpCode {
    fn from(val: u8) -> Self {
        Self(val)
    }
}

/// `ICMP` header types observed on IPv4 replies.
pub mod icmpv4 {
    /// The type of `ICMP` packet.
    #[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
    pub enum IcmpType {
        EchoReply,
        DestinationUnreachable,
        Redirect,
        TimeExceeded,
        ParameterProblem,
        Other(u8),
    }

    impl IcmpType {
        #[must_use]
        pub const fn id(&self) -> u8 {
            match self {
                Self::EchoReply => 0,
                Self::DestinationUnreachable => 3,
                Self::Redirect => 5,
                Self::TimeExceeded => 11,
                Self::ParameterProblem => 12,
                Self::Other(id) => *id,
            }
        }
    }

    impl From<u8> for IcmpType {
        fn from(val: u8) -> Self {
            match val {
                0 => Self::EchoReply,
                3 => Self::DestinationUnreachable,
                5 => Self::Redirect,
                11 => Self::TimeExceeded,
                12 => Self::ParameterProblem,
                id => Self::Other(id),
            }
        }
    }
}

/// `ICMPv6` header types observed on IPv6 replies.
pub mod icmpv6 {
    /// The type of `ICMPv6` packet.
    #[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
    pub enum IcmpType {
        EchoReply,
        DestinationUnreachable,
        TimeExceeded,
        ParameterProblem,
        /// Neighbor discovery redirect.
        Redirect,
        Other(u8),
    }

    impl IcmpType {
        #[must_use]
        pub const fn id(&self) -> u8 {
            match self {
                Self::EchoReply => 129,
                Self::DestinationUnreachable => 1,
                Self::TimeExceeded => 3,
                Self::ParameterProblem => 4,
                Self::Redirect => 137,
                Self::Other(id) => *id,
            }
        }
    }

    impl From<u8> for IcmpType {
        fn from(val: u8) -> Self {
            match val {
                129 => Self::EchoReply,
                1 => Self::DestinationUnreachable,
                3 => Self::TimeExceeded,
                4 => Self::ParameterProblem,
                137 => Self::Redirect,
                id => Self::Other(id),
            }
        }
    }
}
