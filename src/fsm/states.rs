//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers.  Handlers only read
//! `ctx.inputs` and write `ctx.commands`; the service performs the I/O.
//!
//! ```text
//!  IDLE ──[rising edge / send request]──▶ AWAITING_VERIFICATION
//!    ▲  ▲                                   │        │
//!    │  └──────[NO… reply | deadline]───────┘        │
//!    │                                          [OK… reply]
//!    │                                               ▼
//!    └──[next cycle]── GATE_CLOSING ◀──[falling]── GATE_OPEN
//! ```

use super::context::{DisplayFrame, GateContext, GatePosition, RequestContext};
use super::{GateState, StateDescriptor};
use crate::link::protocol::{VerificationOutcome, evaluate};
use crate::sensors::edge::PresenceEdge;
use log::{debug, info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; GateState::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: GateState::Idle,
            name: "Idle",
            on_enter: None,
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: AwaitingVerification
        StateDescriptor {
            id: GateState::AwaitingVerification,
            name: "AwaitingVerification",
            on_enter: Some(awaiting_enter),
            on_exit: Some(awaiting_exit),
            on_update: awaiting_update,
        },
        // Index 2: GateOpen
        StateDescriptor {
            id: GateState::GateOpen,
            name: "GateOpen",
            on_enter: None,
            on_exit: None,
            on_update: gate_open_update,
        },
        // Index 3: GateClosing
        StateDescriptor {
            id: GateState::GateClosing,
            name: "GateClosing",
            on_enter: None,
            on_exit: None,
            on_update: gate_closing_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_update(ctx: &mut GateContext) -> Option<GateState> {
    if ctx.inputs.edge != PresenceEdge::RisingEdge {
        return None;
    }

    info!("Idle: vehicle arrived, requesting verification");
    ctx.commands.display = Some(DisplayFrame::new(&["Car Detected", "Checking..."]));
    ctx.commands.send_request = true;
    Some(GateState::AwaitingVerification)
}

// ═══════════════════════════════════════════════════════════════════════════
//  AWAITING_VERIFICATION state
// ═══════════════════════════════════════════════════════════════════════════

fn awaiting_enter(ctx: &mut GateContext) {
    ctx.request = Some(RequestContext {
        issued_at_ms: ctx.inputs.now_ms,
    });
}

fn awaiting_exit(ctx: &mut GateContext) {
    ctx.request = None;
}

fn awaiting_update(ctx: &mut GateContext) -> Option<GateState> {
    let Some(request) = ctx.request else {
        // on_enter always sets it; recover by starting over.
        warn!("AwaitingVerification: no outstanding request");
        return Some(GateState::Idle);
    };

    let outcome = evaluate(
        ctx.inputs.reply,
        request.issued_at_ms,
        ctx.inputs.now_ms,
        ctx.config.verify_timeout_ms,
    );
    ctx.outcome = Some(outcome);

    match outcome {
        VerificationOutcome::Granted => {
            info!("AwaitingVerification: access granted");
            ctx.commands.display = Some(DisplayFrame::new(&["Access", "Granted"]));
            ctx.commands.gate = Some(GatePosition::Open);
            Some(GateState::GateOpen)
        }
        VerificationOutcome::Denied => {
            info!("AwaitingVerification: access denied");
            ctx.commands.display = Some(DisplayFrame::new(&["Access", "Denied"]));
            Some(GateState::Idle)
        }
        VerificationOutcome::TimedOut => {
            warn!(
                "AwaitingVerification: no reply after {} ms",
                ctx.ms_since_request().unwrap_or(0)
            );
            ctx.commands.display = Some(DisplayFrame::new(&["Timeout"]));
            Some(GateState::Idle)
        }
        VerificationOutcome::Pending => {
            if let Some(text) = ctx.inputs.reply_text.as_ref() {
                debug!("AwaitingVerification: unrecognised reply {:?}", text.as_str());
                ctx.commands.display = Some(DisplayFrame::new(&[
                    "Car Detected",
                    "Checking...",
                    text.as_str(),
                ]));
            }
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  GATE_OPEN state
// ═══════════════════════════════════════════════════════════════════════════

fn gate_open_update(ctx: &mut GateContext) -> Option<GateState> {
    if ctx.inputs.edge != PresenceEdge::FallingEdge {
        return None;
    }

    info!("GateOpen: vehicle cleared, closing");
    ctx.commands.display = Some(DisplayFrame::new(&["Closing"]));
    ctx.commands.closing_delay_ms = ctx.config.close_delay_ms;
    ctx.commands.gate = Some(GatePosition::Closed);
    Some(GateState::GateClosing)
}

// ═══════════════════════════════════════════════════════════════════════════
//  GATE_CLOSING state
// ═══════════════════════════════════════════════════════════════════════════

fn gate_closing_update(ctx: &mut GateContext) -> Option<GateState> {
    ctx.commands.display = Some(DisplayFrame::new(&["Ready"]));
    Some(GateState::Idle)
}
