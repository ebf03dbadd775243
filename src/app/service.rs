//! Application service: the hexagonal core.
//!
//! [`GateService`] owns the FSM, the edge detector and the shared context.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  PresencePort ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!  VerifierPort ◀─▶ │       GateService        │
//!  GatePort     ◀── │  Edge · FSM · Handshake  │
//!  DisplayPort  ◀── └─────────────────────────┘
//! ```
//!
//! One call to [`GateService::tick`] is one control cycle:
//! sample → detect → poll → step → apply.  The caller sleeps between cycles.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use log::{debug, info, warn};

use crate::config::GateConfig;
use crate::fsm::context::{CycleInputs, GateContext, GatePosition, MAX_LINES, RequestContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, GateState};
use crate::link::channel::{RetryPolicy, send_with_retry};
use crate::link::protocol::{
    CAR_DETECTED, VerificationOutcome, VerifierReply, parse_reply, printable,
};
use crate::sensors::edge::EdgeDetector;

use super::events::AppEvent;
use super::ports::{Clock, DisplayPort, EventSink, GatePort, PresencePort, VerifierPort};

// ───────────────────────────────────────────────────────────────
// GateService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct GateService {
    fsm: Fsm,
    ctx: GateContext,
    detector: EdgeDetector,
}

impl GateService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware. Call [`start`](Self::start) next.
    pub fn new(config: GateConfig) -> Self {
        let ctx = GateContext::new(config);
        let fsm = Fsm::new(build_state_table(), GateState::Idle);

        Self {
            fsm,
            ctx,
            detector: EdgeDetector::new(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the gate closed, show the ready screen and start the FSM in
    /// Idle.
    pub fn start(&mut self, hw: &mut (impl GatePort + DisplayPort), sink: &mut impl EventSink) {
        hw.set_gate(GatePosition::Closed);
        hw.show(&["Car Park System", "Ready"]);
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("GateService started in {:?}", self.fsm.current_state());
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full control cycle.
    ///
    /// `hw` satisfies the presence, gate and display ports at once, which
    /// avoids a double mutable borrow of the board adapter.  `timer`
    /// provides both the cycle timestamp and the blocking delays used by
    /// the send retries and the closing pause.
    pub fn tick(
        &mut self,
        hw: &mut (impl PresencePort + GatePort + DisplayPort),
        channel: &mut impl VerifierPort,
        timer: &mut (impl Clock + DelayNs),
        sink: &mut impl EventSink,
    ) {
        let prev_state = self.fsm.current_state();

        // 1. Sample and derive the edge
        let reading = hw.sample();
        let edge = self.detector.update(reading);
        let now_ms = timer.now_ms();

        // 2. Poll the verifier (bounded wait; buffer starts empty)
        let message = channel.try_receive(self.ctx.config.receive_timeout_ms);
        let (reply, reply_text) = match message.as_deref() {
            Some(bytes) if prev_state == GateState::AwaitingVerification => {
                (Some(parse_reply(bytes)), Some(printable(bytes)))
            }
            Some(bytes) => {
                debug!(
                    "Discarding verifier message in {:?}: {:?}",
                    prev_state,
                    printable(bytes).as_str()
                );
                (None, None)
            }
            None => (None, None),
        };

        // 3. FSM step (pure state logic)
        self.ctx.begin_cycle(CycleInputs {
            reading,
            edge,
            reply,
            reply_text,
            now_ms,
        });
        let elapsed_ms = self.ctx.ms_since_request().unwrap_or(0);
        self.fsm.tick(&mut self.ctx);

        // 4. Apply commands in order: display, request, pause, gate
        self.apply_commands(hw, channel, timer, sink);

        // 5. Report
        if reply == Some(VerifierReply::Unrecognised) {
            sink.emit(&AppEvent::ReplyIgnored);
        }
        if self.ctx.outcome == Some(VerificationOutcome::TimedOut) {
            sink.emit(&AppEvent::VerificationTimedOut { elapsed_ms });
        }

        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> GateState {
        self.fsm.current_state()
    }

    /// The outstanding request, present only while awaiting verification.
    pub fn request(&self) -> Option<RequestContext> {
        self.ctx.request
    }

    pub fn config(&self) -> &GateConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate FSM commands into port calls.
    fn apply_commands(
        &self,
        hw: &mut (impl GatePort + DisplayPort),
        channel: &mut impl VerifierPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        let cmds = &self.ctx.commands;

        // ── Display ──────────────────────────────────────────
        if let Some(frame) = cmds.display.as_ref() {
            let lines: Vec<&str, MAX_LINES> = frame.lines().collect();
            hw.show(&lines);
        }

        // ── Access request ───────────────────────────────────
        if cmds.send_request {
            let policy = RetryPolicy {
                attempts: self.ctx.config.send_attempts,
                backoff_ms: self.ctx.config.send_backoff_ms,
            };
            let report = send_with_retry(channel, delay, CAR_DETECTED, policy);
            if report.delivered {
                sink.emit(&AppEvent::RequestSent {
                    attempts: report.attempts,
                });
            } else {
                warn!(
                    "Access request not delivered after {} attempts; waiting for deadline",
                    report.attempts
                );
                sink.emit(&AppEvent::RequestFailed {
                    attempts: report.attempts,
                });
            }
        }

        // ── Closing pause ────────────────────────────────────
        if cmds.closing_delay_ms > 0 {
            delay.delay_ms(cmds.closing_delay_ms);
        }

        // ── Gate ─────────────────────────────────────────────
        if let Some(position) = cmds.gate {
            hw.set_gate(position);
        }
    }
}
