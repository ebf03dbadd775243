//! Shared mutable context threaded through every FSM handler.
//!
//! `GateContext` is the single struct that state handlers read from and
//! write to.  It contains this cycle's inputs (presence edge, verifier
//! reply, timestamp), the command outputs the service applies afterwards,
//! the outstanding request, and configuration.  Think of it as the
//! "blackboard" in a blackboard architecture.

use heapless::{String, Vec};

use crate::config::GateConfig;
use crate::link::protocol::{RX_BUFFER_LEN, VerificationOutcome, VerifierReply};
use crate::sensors::PresenceReading;
use crate::sensors::edge::PresenceEdge;

/// Characters that fit on one panel row (128 px / 6 px font).
pub const LINE_CHARS: usize = 21;
/// Rows of text used by any status screen.
pub const MAX_LINES: usize = 3;

// ---------------------------------------------------------------------------
// Cycle inputs (read-only to state handlers; written by the service)
// ---------------------------------------------------------------------------

/// Everything a handler may look at for one control cycle.
#[derive(Debug, Clone)]
pub struct CycleInputs {
    /// Raw presence level this cycle.
    pub reading: PresenceReading,
    /// Edge relative to the previous cycle.
    pub edge: PresenceEdge,
    /// Decoded tag of the message received this cycle, if any.
    pub reply: Option<VerifierReply>,
    /// Display-safe text of the message received this cycle, if any.
    pub reply_text: Option<String<RX_BUFFER_LEN>>,
    /// Clock reading taken at the start of the cycle.
    pub now_ms: u32,
}

impl Default for CycleInputs {
    fn default() -> Self {
        Self {
            reading: PresenceReading::Absent,
            edge: PresenceEdge::NoChange,
            reply: None,
            reply_text: None,
            now_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Commands (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Named barrier positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePosition {
    Closed,
    Open,
}

/// One full status screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayFrame {
    lines: Vec<String<LINE_CHARS>, MAX_LINES>,
}

impl DisplayFrame {
    /// Build a frame; rows past [`MAX_LINES`] are dropped and each row is
    /// cut to [`LINE_CHARS`].
    pub fn new(lines: &[&str]) -> Self {
        let mut frame = Self::default();
        for line in lines {
            frame.push(line);
        }
        frame
    }

    /// Append a row if there is room.
    pub fn push(&mut self, line: &str) {
        let mut row = String::new();
        for ch in line.chars() {
            if row.push(ch).is_err() {
                break;
            }
        }
        let _ = self.lines.push(row);
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Commands that state handlers write to request side effects.  The
/// service applies them in field order: display, request, closing delay,
/// gate.  Reset at the start of every cycle, so each cycle issues at most
/// one display update and one gate command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateCommands {
    /// New screen contents.
    pub display: Option<DisplayFrame>,
    /// Transmit the access request (with retries).
    pub send_request: bool,
    /// Blocking pause before the gate command (ms, 0 = none).
    pub closing_delay_ms: u32,
    /// Barrier position to drive.
    pub gate: Option<GatePosition>,
}

// ---------------------------------------------------------------------------
// Outstanding request
// ---------------------------------------------------------------------------

/// Exists only while the machine is awaiting verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// Cycle timestamp at which the request was issued.
    pub issued_at_ms: u32,
}

// ---------------------------------------------------------------------------
// GateContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct GateContext {
    // -- Inputs --
    pub inputs: CycleInputs,

    // -- Outputs --
    pub commands: GateCommands,

    // -- Handshake --
    /// Set on entering `AwaitingVerification`, cleared on leaving it.
    pub request: Option<RequestContext>,
    /// Outcome computed on the last `AwaitingVerification` update.
    pub outcome: Option<VerificationOutcome>,

    // -- Configuration --
    pub config: GateConfig,
}

impl GateContext {
    /// Create a new context with the given configuration.
    pub fn new(config: GateConfig) -> Self {
        Self {
            inputs: CycleInputs::default(),
            commands: GateCommands::default(),
            request: None,
            outcome: None,
            config,
        }
    }

    /// Install this cycle's inputs and clear last cycle's outputs.
    pub fn begin_cycle(&mut self, inputs: CycleInputs) {
        self.inputs = inputs;
        self.commands = GateCommands::default();
        self.outcome = None;
    }

    /// Milliseconds since the outstanding request was issued.
    pub fn ms_since_request(&self) -> Option<u32> {
        self.request
            .map(|r| self.inputs.now_ms.wrapping_sub(r.issued_at_ms))
    }
}
