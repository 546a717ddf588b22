pub use self::state::PingState;
use crate::classifier::{classify, is_destination, ReplyClass};
use crate::config::PingConfig;
use crate::error::{Error, Result};
use crate::net::Network;
use crate::probe::{Probe, ProbeReply};
use std::time::SystemTime;
use tracing::instrument;

/// An event delivered to the engine by the host event loop.
///
/// Events concerning a given instance are delivered strictly serially; the
/// engine never blocks and all suspension happens between deliveries.
#[derive(Debug, Clone)]
pub enum Event {
    /// The instance is starting.
    Init,
    /// A reply was paired with a probe sent by this instance.
    Reply(ProbeReply),
    /// A probe was not answered within the framework deadline.
    Timeout(Probe),
    /// The framework cancelled the instance.
    Terminated,
    /// The framework failed the instance.
    Error,
}

/// The semantic outcome of a consumed event, published to the caller.
///
/// Exactly one outcome is published for every reply or timeout consumed.
#[derive(Debug, Clone)]
pub enum PingEvent {
    /// The destination answered; the round trip was measured.
    ProbeReply(ProbeReply),
    /// The destination network is unreachable.
    DstNetUnreachable(ProbeReply),
    /// The destination host is unreachable.
    DstHostUnreachable(ProbeReply),
    /// The destination protocol is unreachable.
    DstProtUnreachable(ProbeReply),
    /// The destination port is unreachable.
    DstPortUnreachable(ProbeReply),
    /// The probe's time-to-live expired in transit.
    TtlExceededTransit(ProbeReply),
    /// Fragment reassembly time was exceeded.
    TimeExceededReassembly(ProbeReply),
    /// The probe was redirected.
    Redirect(ProbeReply),
    /// The probe carried a problematic header.
    ParameterProblem(ProbeReply),
    /// The reply matched no known classification.
    GenError(ProbeReply),
    /// No reply within the framework deadline.
    Timeout(Probe),
    /// The final probe's outcome has been recorded.
    AllProbesSent,
    /// Probing is complete but replies are still pending.
    Wait,
}

/// Flow control returned by the event handler.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Flow {
    /// The instance expects further events.
    Continue,
    /// The instance has terminated and no further events are expected.
    Terminated,
}

/// Ping a destination and classify the replies.
///
/// The strategy runs entirely inside the host's event dispatch: every call
/// to [`Strategy::handle`] consumes one framework event, publishes the
/// semantic outcomes through the `publish` callback and decides whether to
/// issue more probes, wait for pending replies or terminate.
#[derive(Debug, Clone)]
pub struct Strategy<F> {
    config: PingConfig,
    skeleton: Probe,
    publish: F,
}

impl<F: Fn(&PingEvent)> Strategy<F> {
    #[instrument(skip_all, level = "trace")]
    pub fn new(config: &PingConfig, skeleton: Probe, publish: F) -> Self {
        tracing::debug!(?config);
        Self {
            config: *config,
            skeleton,
            publish,
        }
    }

    /// Handle a single framework event.
    ///
    /// The state lives in the caller's `Option` for the lifetime of the
    /// instance: `Event::Init` fills it and `Event::Terminated` drops it, so
    /// teardown is idempotent and events which race past teardown are
    /// ignored.  Termination is signalled through the returned [`Flow`]; a
    /// framework failure surfaces as `Err`.
    #[instrument(skip(self, network, state), level = "trace")]
    pub fn handle<N: Network>(
        &self,
        network: &mut N,
        state: &mut Option<PingState>,
        event: Event,
    ) -> Result<Flow> {
        match event {
            Event::Init => self.on_init(network, state),
            Event::Reply(probe_reply) => match state.as_mut() {
                Some(st) => self.on_reply(network, st, probe_reply),
                None => Ok(Flow::Terminated),
            },
            Event::Timeout(probe) => match state.as_mut() {
                Some(st) => self.on_timeout(network, st, probe),
                None => Ok(Flow::Terminated),
            },
            Event::Terminated => {
                state.take();
                Ok(Flow::Terminated)
            }
            Event::Error => {
                state.take();
                Err(Error::AlgorithmFailure)
            }
        }
    }

    /// Allocate fresh state and issue the initial burst.
    ///
    /// The burst is capped to the number of intervals which fit within the
    /// framework's overall deadline:
    ///
    /// `initial_k = min(floor(timeout / interval), count)`
    fn on_init<N: Network>(
        &self,
        network: &mut N,
        state: &mut Option<PingState>,
    ) -> Result<Flow> {
        if state.is_some() {
            return Err(Error::BadConfig("instance already initialized".to_string()));
        }
        let st = state.insert(PingState::new());
        let intervals =
            (network.timeout().as_secs_f64() / self.config.interval.as_secs_f64()) as usize;
        let initial_burst = intervals.min(self.config.count.into());
        self.after_event(network, st, initial_burst)
    }

    /// Account a paired reply and publish its outcome.
    ///
    /// A reply whose source is the destination is always reported as
    /// reached, whatever its ICMP header says; only then is the round trip
    /// measured.  Any other reply is classified by its `(version, type,
    /// code)` triple.
    fn on_reply<N: Network>(
        &self,
        network: &mut N,
        st: &mut PingState,
        probe_reply: ProbeReply,
    ) -> Result<Flow> {
        st.complete_reply();
        let outcome = if is_destination(self.config.target_addr, &probe_reply.reply) {
            st.record_rtt(probe_reply.rtt());
            PingEvent::ProbeReply(probe_reply)
        } else {
            match classify(&probe_reply.reply) {
                ReplyClass::DstNetUnreachable => PingEvent::DstNetUnreachable(probe_reply),
                ReplyClass::DstHostUnreachable => PingEvent::DstHostUnreachable(probe_reply),
                ReplyClass::DstProtUnreachable => PingEvent::DstProtUnreachable(probe_reply),
                ReplyClass::DstPortUnreachable => PingEvent::DstPortUnreachable(probe_reply),
                ReplyClass::TtlExceededTransit => PingEvent::TtlExceededTransit(probe_reply),
                ReplyClass::TimeExceededReassembly => {
                    PingEvent::TimeExceededReassembly(probe_reply)
                }
                ReplyClass::Redirect => PingEvent::Redirect(probe_reply),
                ReplyClass::ParameterProblem => PingEvent::ParameterProblem(probe_reply),
                ReplyClass::GenError => PingEvent::GenError(probe_reply),
            }
        };
        (self.publish)(&outcome);
        self.after_event(network, st, self.need_more(st))
    }

    /// Account a timed out probe and publish the loss.
    fn on_timeout<N: Network>(
        &self,
        network: &mut N,
        st: &mut PingState,
        probe: Probe,
    ) -> Result<Flow> {
        st.complete_timeout();
        (self.publish)(&PingEvent::Timeout(probe));
        self.after_event(network, st, self.need_more(st))
    }

    /// At most one replacement probe is issued per accounted outcome.
    fn need_more(&self, st: &PingState) -> usize {
        usize::from(st.num_replies() < self.config.count)
    }

    /// Decide whether to issue more probes, wait or terminate.
    ///
    /// Probes are dispatched while outcomes and in-flight probes together
    /// fall short of the target count.  Otherwise the instance terminates
    /// once nothing is left in flight, publishing `AllProbesSent` first, or
    /// publishes `Wait` while replies are still pending.
    fn after_event<N: Network>(
        &self,
        network: &mut N,
        st: &mut PingState,
        to_send: usize,
    ) -> Result<Flow> {
        if to_send > 0 && st.accounted() < self.config.count {
            let dispatched = self.dispatch_probes(network, st, to_send);
            st.add_in_flight(dispatched);
            Ok(Flow::Continue)
        } else if st.num_probes_in_flight().0 == 0 {
            (self.publish)(&PingEvent::AllProbesSent);
            Ok(Flow::Terminated)
        } else {
            (self.publish)(&PingEvent::Wait);
            Ok(Flow::Continue)
        }
    }

    /// Clone and transmit `num_probes` copies of the skeleton.
    ///
    /// Departures are staggered: copy `i` of the batch is scheduled at
    /// `i x base` when the skeleton carries a base delay.  Every copy is
    /// recorded before it is handed over so a failed send never orphans a
    /// probe.  The batch aborts on the first failure and the number of
    /// probes actually handed over is returned.
    #[instrument(skip(self, network, st), level = "trace")]
    fn dispatch_probes<N: Network>(
        &self,
        network: &mut N,
        st: &mut PingState,
        num_probes: usize,
    ) -> usize {
        for i in 1..=num_probes {
            let mut probe = self.skeleton.clone();
            probe.sent = SystemTime::now();
            if let Some(base) = self.skeleton.delay {
                probe.delay = Some(base * i as u32);
            }
            st.record_probe(probe.clone());
            if let Err(err) = network.send_probe(probe) {
                tracing::error!(%err, "probe dispatch failed");
                return i - 1;
            }
        }
        num_probes
    }
}

/// Mutable state needed for the ping algorithm.
///
/// This is contained within a submodule to ensure that mutations are only
/// performed via methods on the `PingState` struct.
mod state {
    use crate::probe::Probe;
    use crate::stats::{RttStats, Summary};
    use crate::types::ProbeCount;
    use std::time::Duration;

    /// Mutable state for a single ping instance.
    ///
    /// The state owns every probe clone it has transmitted and every
    /// round-trip-time sample it has measured; both are released together
    /// when the instance is dropped at teardown.
    #[derive(Debug, Default)]
    pub struct PingState {
        /// Reply and timeout outcomes accounted so far.
        num_replies: ProbeCount,
        /// Timeouts accounted so far.
        num_losses: ProbeCount,
        /// Probes sent but neither replied to nor timed out.
        num_probes_in_flight: ProbeCount,
        /// Every probe transmitted, owned until teardown.
        probes: Vec<Probe>,
        /// Round-trip times of successful replies.
        rtt: RttStats,
    }

    impl PingState {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub const fn num_replies(&self) -> ProbeCount {
            self.num_replies
        }

        #[must_use]
        pub const fn num_losses(&self) -> ProbeCount {
            self.num_losses
        }

        #[must_use]
        pub const fn num_probes_in_flight(&self) -> ProbeCount {
            self.num_probes_in_flight
        }

        /// Every probe transmitted so far, in dispatch order.
        #[must_use]
        pub fn probes(&self) -> &[Probe] {
            &self.probes
        }

        /// The round-trip times measured so far.
        #[must_use]
        pub const fn rtt(&self) -> &RttStats {
            &self.rtt
        }

        /// Outcomes accounted plus probes awaiting an outcome.
        ///
        /// Never exceeds the target count: the dispatcher refuses to issue
        /// probes beyond it.
        #[must_use]
        pub fn accounted(&self) -> ProbeCount {
            self.num_replies + self.num_probes_in_flight
        }

        /// Account a reply for an in-flight probe.
        pub fn complete_reply(&mut self) {
            debug_assert!(self.num_probes_in_flight.0 > 0);
            self.num_replies += ProbeCount(1);
            self.num_probes_in_flight = ProbeCount(self.num_probes_in_flight.0.saturating_sub(1));
        }

        /// Account a timeout for an in-flight probe.
        pub fn complete_timeout(&mut self) {
            debug_assert!(self.num_probes_in_flight.0 > 0);
            self.num_replies += ProbeCount(1);
            self.num_losses += ProbeCount(1);
            self.num_probes_in_flight = ProbeCount(self.num_probes_in_flight.0.saturating_sub(1));
        }

        /// Record a measured round trip.
        pub fn record_rtt(&mut self, rtt: Duration) {
            self.rtt.record(rtt);
        }

        /// Retain a transmitted probe for the lifetime of the instance.
        pub fn record_probe(&mut self, probe: Probe) {
            self.probes.push(probe);
        }

        /// Account `n` freshly dispatched probes.
        pub fn add_in_flight(&mut self, n: usize) {
            self.num_probes_in_flight += ProbeCount(n);
        }

        /// The end-of-run report.
        #[must_use]
        pub fn summary(&self) -> Summary {
            let loss_pct = if self.num_replies.0 == 0 {
                0
            } else {
                ((self.num_losses.0 as f64 / self.num_replies.0 as f64) * 100.0) as u32
            };
            Summary {
                transmitted: self.num_replies.0,
                received: self.num_replies.0 - self.num_losses.0,
                loss_pct,
                rtt: self.rtt.summarize(),
            }
        }
    }

}
