use derive_more::{Add, AddAssign};

/// `TimeToLive` (ttl) newtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd)]
pub struct TimeToLive(pub u8);

/// `ProbeCount` newtype.
///
/// Counts whole probes: the target number to issue, outcomes accounted and
/// probes awaiting an outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Add, AddAssign)]
pub struct ProbeCount(pub usize);

impl From<ProbeCount> for usize {
    fn from(count: ProbeCount) -> Self {
        count.0
    }
}
