//! Mock adapters for integration tests.
//!
//! Records every gate and display call, scripts presence readings and
//! verifier traffic per cycle, and runs a simulated millisecond clock, so
//! tests can assert on full command histories without touching real
//! GPIO/PWM/UART registers.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use gatekeeper::app::events::AppEvent;
use gatekeeper::app::ports::{Clock, DisplayPort, EventSink, GatePort, PresencePort, VerifierPort};
use gatekeeper::app::service::GateService;
use gatekeeper::config::GateConfig;
use gatekeeper::fsm::GateState;
use gatekeeper::fsm::context::GatePosition;
use gatekeeper::link::protocol::InboundMessage;
use gatekeeper::sensors::PresenceReading;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Gate(GatePosition),
    Show(Vec<String>),
}

// ── MockHardware ──────────────────────────────────────────────

/// Presence readings come from a script; once it runs dry the last
/// reading is held.
pub struct MockHardware {
    script: VecDeque<bool>,
    held: bool,
    pub calls: Vec<HwCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            held: false,
            calls: Vec::new(),
        }
    }

    pub fn queue_readings(&mut self, readings: &[bool]) {
        self.script.extend(readings);
    }

    pub fn gate_calls(&self) -> Vec<GatePosition> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Gate(p) => Some(*p),
                HwCall::Show(_) => None,
            })
            .collect()
    }

    pub fn screens(&self) -> Vec<Vec<String>> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Show(lines) => Some(lines.clone()),
                HwCall::Gate(_) => None,
            })
            .collect()
    }

    pub fn last_screen(&self) -> Option<Vec<String>> {
        self.screens().pop()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl PresencePort for MockHardware {
    fn sample(&mut self) -> PresenceReading {
        if let Some(next) = self.script.pop_front() {
            self.held = next;
        }
        PresenceReading::from_level(self.held)
    }
}

impl GatePort for MockHardware {
    fn set_gate(&mut self, position: GatePosition) {
        self.calls.push(HwCall::Gate(position));
    }
}

impl DisplayPort for MockHardware {
    fn show(&mut self, lines: &[&str]) {
        self.calls
            .push(HwCall::Show(lines.iter().map(|l| l.to_string()).collect()));
    }
}

// ── ScriptedVerifier ──────────────────────────────────────────

/// Verifier double: one inbox slot per receive call, and a queue of
/// per-attempt send outcomes (default: success).
pub struct ScriptedVerifier {
    inbox: VecDeque<Option<Vec<u8>>>,
    send_outcomes: VecDeque<bool>,
    pub sent: Vec<Vec<u8>>,
    pub send_attempts: usize,
    pub receive_timeouts: Vec<u32>,
}

#[allow(dead_code)]
impl ScriptedVerifier {
    pub fn new() -> Self {
        Self {
            inbox: VecDeque::new(),
            send_outcomes: VecDeque::new(),
            sent: Vec::new(),
            send_attempts: 0,
            receive_timeouts: Vec::new(),
        }
    }

    /// The next receive call returns `message`.
    pub fn reply_next(&mut self, message: &[u8]) {
        self.inbox.push_back(Some(message.to_vec()));
    }

    /// The next receive call returns nothing.
    pub fn silent_next(&mut self) {
        self.inbox.push_back(None);
    }

    pub fn fail_sends(&mut self, count: usize) {
        self.send_outcomes.extend(std::iter::repeat_n(false, count));
    }
}

impl Default for ScriptedVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl VerifierPort for ScriptedVerifier {
    fn send(&mut self, message: &[u8]) -> bool {
        self.send_attempts += 1;
        let ok = self.send_outcomes.pop_front().unwrap_or(true);
        if ok {
            self.sent.push(message.to_vec());
        }
        ok
    }

    fn try_receive(&mut self, timeout_ms: u32) -> Option<InboundMessage> {
        self.receive_timeouts.push(timeout_ms);
        self.inbox
            .pop_front()
            .flatten()
            .and_then(|m| InboundMessage::from_slice(&m).ok())
    }
}

// ── SimTimer ──────────────────────────────────────────────────

/// Simulated clock; every delay advances it.
pub struct SimTimer {
    pub now: u32,
    pub delays: Vec<u32>,
}

#[allow(dead_code)]
impl SimTimer {
    pub fn starting_at(now: u32) -> Self {
        Self {
            now,
            delays: Vec::new(),
        }
    }

    pub fn advance(&mut self, ms: u32) {
        self.now = self.now.wrapping_add(ms);
    }
}

impl Clock for SimTimer {
    fn now_ms(&self) -> u32 {
        self.now
    }
}

impl DelayNs for SimTimer {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        self.advance(ms);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// A started service wired to all mocks.  [`Rig::cycle`] mimics one
/// iteration of the firmware loop: tick, then sleep the cycle quantum.
pub struct Rig {
    pub service: GateService,
    pub hw: MockHardware,
    pub verifier: ScriptedVerifier,
    pub timer: SimTimer,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(GateConfig::default(), 0)
    }

    pub fn with_config(config: GateConfig, start_ms: u32) -> Self {
        let mut rig = Self {
            service: GateService::new(config),
            hw: MockHardware::new(),
            verifier: ScriptedVerifier::new(),
            timer: SimTimer::starting_at(start_ms),
            sink: RecordingSink::new(),
        };
        rig.service.start(&mut rig.hw, &mut rig.sink);
        rig
    }

    /// Run one control cycle and return the state afterwards.
    pub fn cycle(&mut self) -> GateState {
        self.service
            .tick(&mut self.hw, &mut self.verifier, &mut self.timer, &mut self.sink);
        let interval = self.service.config().control_loop_interval_ms;
        self.timer.advance(interval);
        self.service.state()
    }

    /// Queue one reading and run a cycle.
    pub fn cycle_with(&mut self, present: bool) -> GateState {
        self.hw.queue_readings(&[present]);
        self.cycle()
    }

    pub fn state_changes(&self) -> Vec<(GateState, GateState)> {
        self.sink
            .events
            .iter()
            .filter_map(|e| match e {
                AppEvent::StateChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}
