//! Outbound application events.
//!
//! The [`GateService`](super::service::GateService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  On target they end up on
//! the serial console via the log adapter.

use crate::fsm::GateState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(GateState),

    /// The state machine moved between states.
    StateChanged { from: GateState, to: GateState },

    /// The access request left the device.
    RequestSent { attempts: u8 },

    /// Every transmit attempt failed; the handshake continues regardless.
    RequestFailed { attempts: u8 },

    /// A message arrived while awaiting verification but carried no
    /// recognised tag.
    ReplyIgnored,

    /// The verifier did not answer before the deadline.
    VerificationTimedOut { elapsed_ms: u32 },
}
