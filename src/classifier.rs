use crate::probe::{icmpv4, icmpv6, IcmpCode, IcmpPacket, Reply};
use std::net::IpAddr;

/// The semantic class of a reply, decided from its ICMP header.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ReplyClass {
    /// The destination network is unreachable.
    DstNetUnreachable,
    /// The destination host is unreachable.
    DstHostUnreachable,
    /// The destination protocol is unreachable.
    DstProtUnreachable,
    /// The destination port is unreachable.
    DstPortUnreachable,
    /// The probe's time-to-live expired in transit.
    TtlExceededTransit,
    /// Fragment reassembly time was exceeded.
    TimeExceededReassembly,
    /// The probe was redirected.
    Redirect,
    /// The probe carried a problematic header.
    ParameterProblem,
    /// The reply matched no known classification.
    GenError,
}

/// Classify a reply by its `(version, type, code)` triple.
///
/// A reply without an extractable ICMP header classifies as
/// [`ReplyClass::GenError`], as does any unrecognized `(type, code)` pair.
#[must_use]
pub const fn classify(reply: &Reply) -> ReplyClass {
    match reply.icmp {
        Some(IcmpPacket::V4(icmp_type, code)) => classify_v4(icmp_type, code),
        Some(IcmpPacket::V6(icmp_type, code)) => classify_v6(icmp_type, code),
        None => ReplyClass::GenError,
    }
}

const fn classify_v4(icmp_type: icmpv4::IcmpType, code: IcmpCode) -> ReplyClass {
    use icmpv4::IcmpType;
    match (icmp_type, code) {
        // unreachable codes 0 and 1 are reported host/net swapped relative
        // to rfc792, matching classic ping output
        (IcmpType::DestinationUnreachable, IcmpCode(1)) => ReplyClass::DstNetUnreachable,
        (IcmpType::DestinationUnreachable, IcmpCode(0)) => ReplyClass::DstHostUnreachable,
        (IcmpType::DestinationUnreachable, IcmpCode(2)) => ReplyClass::DstProtUnreachable,
        (IcmpType::DestinationUnreachable, IcmpCode(3)) => ReplyClass::DstPortUnreachable,
        (IcmpType::TimeExceeded, IcmpCode(0)) => ReplyClass::TtlExceededTransit,
        (IcmpType::TimeExceeded, IcmpCode(1)) => ReplyClass::TimeExceededReassembly,
        (IcmpType::Redirect, IcmpCode(0)) => ReplyClass::Redirect,
        (IcmpType::ParameterProblem, _) => ReplyClass::ParameterProblem,
        _ => ReplyClass::GenError,
    }
}

const fn classify_v6(icmp_type: icmpv6::IcmpType, code: IcmpCode) -> ReplyClass {
    use icmpv6::IcmpType;
    match (icmp_type, code) {
        (IcmpType::DestinationUnreachable, IcmpCode(3)) => ReplyClass::DstNetUnreachable,
        (IcmpType::DestinationUnreachable, IcmpCode(0)) => ReplyClass::DstHostUnreachable,
        (IcmpType::DestinationUnreachable, IcmpCode(4)) => ReplyClass::DstPortUnreachable,
        // an unrecognized next header is a protocol problem, not a header
        // problem, and so must be split out from the parameter problem codes
        (IcmpType::ParameterProblem, IcmpCode(1)) => ReplyClass::DstProtUnreachable,
        (IcmpType::ParameterProblem, IcmpCode(0 | 2)) => ReplyClass::ParameterProblem,
        (IcmpType::TimeExceeded, IcmpCode(0)) => ReplyClass::TtlExceededTransit,
        (IcmpType::TimeExceeded, IcmpCode(1)) => ReplyClass::TimeExceededReassembly,
        (IcmpType::Redirect, _) => ReplyClass::Redirect,
        _ => ReplyClass::GenError,
    }
}

/// Returns true if the reply's source address equals the destination.
///
/// Addresses of different families never compare equal.  A reply from the
/// destination is always reported as reached, whatever its ICMP header says.
#[must_use]
pub fn is_destination(target: IpAddr, reply: &Reply) -> bool {
    reply.addr == target
}
