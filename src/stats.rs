use itertools::{Itertools, MinMaxResult};
use std::time::Duration;

/// Round-trip-time samples for successful replies.
///
/// Samples are append-only and retained for the lifetime of the instance so
/// that the end-of-run summary can be computed by linear scans.  Timeouts
/// contribute to the loss count, never to the samples.
#[derive(Debug, Clone, Default)]
pub struct RttStats {
    samples: Vec<Duration>,
}

impl RttStats {
    /// Record a measured round trip.
    pub fn record(&mut self, rtt: Duration) {
        self.samples.push(rtt);
    }

    /// The retained samples, in measurement order.
    #[must_use]
    pub fn samples(&self) -> &[Duration] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Aggregate the retained samples, `None` when nothing was measured.
    #[must_use]
    pub fn summarize(&self) -> Option<RttSummary> {
        let (min, max) = match self.samples.iter().minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(sample) => (*sample, *sample),
            MinMaxResult::MinMax(min, max) => (*min, *max),
        };
        let n = self.samples.len() as f64;
        let mean = self.samples.iter().map(Duration::as_secs_f64).sum::<f64>() / n;
        let mdev = self
            .samples
            .iter()
            .map(|sample| (sample.as_secs_f64() - mean).abs())
            .sum::<f64>()
            / n;
        Some(RttSummary {
            min,
            max,
            mean: Duration::from_secs_f64(mean),
            mdev: Duration::from_secs_f64(mdev),
        })
    }
}

/// Aggregate round-trip-time statistics.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RttSummary {
    /// The smallest measured round trip.
    pub min: Duration,
    /// The largest measured round trip.
    pub max: Duration,
    /// The arithmetic mean of the samples.
    pub mean: Duration,
    /// The mean absolute deviation of the samples.
    pub mdev: Duration,
}

/// The end-of-run report for a ping instance.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Summary {
    /// Outcomes accounted for, replies and timeouts alike.
    pub transmitted: usize,
    /// Replies received from any host.
    pub received: usize,
    /// Packet loss as a truncated percentage of accounted outcomes.
    pub loss_pct: u32,
    /// Aggregate round-trip-time statistics, absent when every probe was
    /// lost or none was answered by the destination.
    pub rtt: Option<RttSummary>,
}
