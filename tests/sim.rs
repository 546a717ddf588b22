use ping_engine::{
    icmpv4, Builder, Event, Flow, IcmpCode, IcmpPacket, Network, PingConfig, PingEvent, Probe,
    ProbeReply, Reply, Strategy, Summary, TimeToLive,
};
use std::cell::RefCell;
use std::net::IpAddr;
use std::time::{Duration, SystemTime};

const DEST: [u8; 4] = [10, 0, 0, 1];
const ROUTER: [u8; 4] = [198, 51, 100, 9];

/// A network which accepts every probe and records it.
struct SimNetwork {
    sent: Vec<Probe>,
    timeout: Duration,
}

impl SimNetwork {
    const fn new(timeout: Duration) -> Self {
        Self {
            sent: Vec::new(),
            timeout,
        }
    }
}

impl Network for SimNetwork {
    fn send_probe(&mut self, probe: Probe) -> ping_engine::Result<()> {
        self.sent.push(probe);
        Ok(())
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// The scripted fate of one probe, applied in dispatch order.
enum Step {
    Reply {
        addr: IpAddr,
        rtt: Duration,
        icmp: Option<IcmpPacket>,
    },
    Timeout,
}

fn echo_reply(addr: [u8; 4], rtt_millis: u64) -> Step {
    Step::Reply {
        addr: IpAddr::from(addr),
        rtt: Duration::from_millis(rtt_millis),
        icmp: Some(IcmpPacket::V4(icmpv4::IcmpType::EchoReply, IcmpCode(0))),
    }
}

fn icmp_error(addr: [u8; 4], icmp_type: u8, code: u8) -> Step {
    Step::Reply {
        addr: IpAddr::from(addr),
        rtt: Duration::from_millis(5),
        icmp: Some(IcmpPacket::V4(
            icmpv4::IcmpType::from(icmp_type),
            IcmpCode(code),
        )),
    }
}

fn label(event: &PingEvent) -> &'static str {
    match event {
        PingEvent::ProbeReply(_) => "reply",
        PingEvent::DstNetUnreachable(_) => "net-unreachable",
        PingEvent::DstHostUnreachable(_) => "host-unreachable",
        PingEvent::DstProtUnreachable(_) => "prot-unreachable",
        PingEvent::DstPortUnreachable(_) => "port-unreachable",
        PingEvent::TtlExceededTransit(_) => "ttl-exceeded",
        PingEvent::TimeExceededReassembly(_) => "reassembly-exceeded",
        PingEvent::Redirect(_) => "redirect",
        PingEvent::ParameterProblem(_) => "parameter-problem",
        PingEvent::GenError(_) => "gen-error",
        PingEvent::Timeout(_) => "timeout",
        PingEvent::AllProbesSent => "all-probes-sent",
        PingEvent::Wait => "wait",
    }
}

/// Drive one instance from init to termination, applying the scripted fate
/// to each dispatched probe in order.
fn run(config: &PingConfig, script: &[Step]) -> anyhow::Result<(Vec<&'static str>, Summary)> {
    let events = RefCell::new(Vec::new());
    let skeleton = Probe::new(TimeToLive(64), None, SystemTime::now());
    let strategy = Strategy::new(config, skeleton, |event: &PingEvent| {
        events.borrow_mut().push(label(event));
    });
    let mut network = SimNetwork::new(Duration::from_secs(60));
    let mut state = None;

    let mut flow = strategy.handle(&mut network, &mut state, Event::Init)?;
    let mut next = 0;
    while flow == Flow::Continue {
        anyhow::ensure!(next < script.len(), "script exhausted with probes in flight");
        let probe = network.sent[next].clone();
        let event = match &script[next] {
            Step::Reply { addr, rtt, icmp } => {
                let received = probe.sent + *rtt;
                Event::Reply(ProbeReply::new(
                    probe,
                    Reply::new(*addr, TimeToLive(57), 64, received, *icmp),
                ))
            }
            Step::Timeout => Event::Timeout(probe),
        };
        next += 1;
        flow = strategy.handle(&mut network, &mut state, event)?;
    }

    let summary = state
        .as_ref()
        .map(ping_engine::PingState::summary)
        .ok_or_else(|| anyhow::anyhow!("state dropped before termination"))?;
    Ok((events.into_inner(), summary))
}

#[test]
fn test_all_replies() -> anyhow::Result<()> {
    let config = Builder::new(IpAddr::from(DEST)).count(4).build()?;
    let script = [
        echo_reply(DEST, 10),
        echo_reply(DEST, 20),
        echo_reply(DEST, 30),
        echo_reply(DEST, 40),
    ];
    let (events, summary) = run(&config, &script)?;

    assert_eq!(
        vec!["reply", "wait", "reply", "wait", "reply", "wait", "reply", "all-probes-sent"],
        events
    );
    assert_eq!(4, summary.transmitted);
    assert_eq!(4, summary.received);
    assert_eq!(0, summary.loss_pct);
    let rtt = summary.rtt.unwrap();
    assert_eq!(Duration::from_millis(10), rtt.min);
    assert_eq!(Duration::from_millis(40), rtt.max);
    assert!((rtt.mean.as_secs_f64() - 0.025).abs() < 1e-9);
    assert!((rtt.mdev.as_secs_f64() - 0.010).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_lossy_run() -> anyhow::Result<()> {
    let config = Builder::new(IpAddr::from(DEST))
        .count(3)
        .interval(Duration::from_secs(1))
        .build()?;
    let script = [echo_reply(DEST, 10), Step::Timeout, echo_reply(DEST, 30)];
    let (events, summary) = run(&config, &script)?;

    assert_eq!(
        vec!["reply", "wait", "timeout", "wait", "reply", "all-probes-sent"],
        events
    );
    assert_eq!(3, summary.transmitted);
    assert_eq!(2, summary.received);
    assert_eq!(33, summary.loss_pct);
    let rtt = summary.rtt.unwrap();
    assert_eq!(Duration::from_millis(10), rtt.min);
    assert_eq!(Duration::from_millis(30), rtt.max);
    Ok(())
}

#[test]
fn test_unreachable_path() -> anyhow::Result<()> {
    let config = Builder::new(IpAddr::from(DEST)).count(2).build()?;
    // type 3 code 0 is reported as host unreachable
    let script = [icmp_error(ROUTER, 3, 0), icmp_error(ROUTER, 3, 0)];
    let (events, summary) = run(&config, &script)?;

    assert_eq!(
        vec!["host-unreachable", "wait", "host-unreachable", "all-probes-sent"],
        events
    );
    assert_eq!(2, summary.transmitted);
    assert_eq!(2, summary.received);
    assert_eq!(0, summary.loss_pct);
    assert_eq!(None, summary.rtt);
    Ok(())
}

#[test]
fn test_every_probe_lost() -> anyhow::Result<()> {
    let config = Builder::new(IpAddr::from(DEST)).count(5).build()?;
    let script = [
        Step::Timeout,
        Step::Timeout,
        Step::Timeout,
        Step::Timeout,
        Step::Timeout,
    ];
    let (events, summary) = run(&config, &script)?;

    assert_eq!(5, events.iter().filter(|l| **l == "timeout").count());
    assert_eq!(Some(&"all-probes-sent"), events.last());
    assert_eq!(5, summary.transmitted);
    assert_eq!(0, summary.received);
    assert_eq!(100, summary.loss_pct);
    assert_eq!(None, summary.rtt);
    Ok(())
}

#[test]
fn test_zero_count() -> anyhow::Result<()> {
    let config = Builder::new(IpAddr::from(DEST)).count(0).build()?;
    let (events, summary) = run(&config, &[])?;

    assert_eq!(vec!["all-probes-sent"], events);
    assert_eq!(0, summary.transmitted);
    assert_eq!(0, summary.loss_pct);
    assert_eq!(None, summary.rtt);
    Ok(())
}

#[test]
fn test_mixed_error_classes() -> anyhow::Result<()> {
    let config = Builder::new(IpAddr::from(DEST)).count(3).build()?;
    let script = [
        icmp_error(ROUTER, 11, 0),
        icmp_error(ROUTER, 3, 3),
        echo_reply(DEST, 12),
    ];
    let (events, summary) = run(&config, &script)?;

    assert_eq!(
        vec![
            "ttl-exceeded",
            "wait",
            "port-unreachable",
            "wait",
            "reply",
            "all-probes-sent"
        ],
        events
    );
    assert_eq!(3, summary.transmitted);
    assert_eq!(3, summary.received);
    assert_eq!(0, summary.loss_pct);
    assert_eq!(Duration::from_millis(12), summary.rtt.unwrap().min);
    Ok(())
}
