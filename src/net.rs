use crate::error::Result;
use crate::probe::Probe;
use std::time::Duration;

/// An abstraction over the ambient probing framework.
///
/// The framework transmits crafted probes on behalf of the engine and owns
/// the overall deadline for the run.  Replies and timeouts flow back to the
/// engine as [`Event`](crate::Event)s delivered by the host event loop.
#[cfg_attr(test, mockall::automock)]
pub trait Network {
    /// Send a `Probe`.
    ///
    /// Transmission is best effort.  The engine keeps its own copy of every
    /// probe it hands over, so the probe outlives the send whatever the
    /// outcome.
    fn send_probe(&mut self, probe: Probe) -> Result<()>;

    /// The ambient overall deadline for the run.
    fn timeout(&self) -> Duration;
}
