//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GateService (domain)
//! ```
//!
//! Driven adapters (presence sampler, gate servo, status display, verifier
//! link, clock, event sinks) implement these traits.  The
//! [`GateService`](super::service::GateService) consumes them via generics,
//! so the domain core never touches hardware directly.
//!
//! Delays are not a port of their own: the service takes any
//! [`embedded_hal::delay::DelayNs`].

use crate::fsm::context::GatePosition;
use crate::link::protocol::InboundMessage;
use crate::sensors::PresenceReading;

// ───────────────────────────────────────────────────────────────
// Presence port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one raw presence sample per control cycle.
pub trait PresencePort {
    fn sample(&mut self) -> PresenceReading;
}

// ───────────────────────────────────────────────────────────────
// Gate and display ports (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Drives the barrier servo to one of its two named positions.
pub trait GatePort {
    fn set_gate(&mut self, position: GatePosition);
}

/// Short text lines on the status panel.  Each call replaces the whole
/// screen.
pub trait DisplayPort {
    fn show(&mut self, lines: &[&str]);
}

// ───────────────────────────────────────────────────────────────
// Verifier port (driven adapter: domain ↔ serial link)
// ───────────────────────────────────────────────────────────────

/// Message-oriented channel to the external verifier.
pub trait VerifierPort {
    /// One bounded transmit attempt.  Returns `true` if the whole message
    /// left the device.
    fn send(&mut self, message: &[u8]) -> bool;

    /// Wait at most `timeout_ms` for an inbound message.  Any previously
    /// received bytes are discarded; each call starts from an empty buffer.
    fn try_receive(&mut self, timeout_ms: u32) -> Option<InboundMessage>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond counter.  Wraps at `u32::MAX`; consumers must use
/// wrapping subtraction.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
