//! Verifier wire protocol.
//!
//! Plain ASCII, newline terminated:
//!
//! ```text
//!  gate ──── "CAR_DETECTED\n" ────▶ verifier
//!  gate ◀─── "OK…\n" | "NO…\n" ──── verifier
//! ```
//!
//! Only the first two bytes of a reply carry meaning; the rest is ignored
//! by the controller (but may be shown on the display).

use heapless::{String, Vec};

/// Request sent once per vehicle arrival.
pub const CAR_DETECTED: &[u8] = b"CAR_DETECTED\n";

/// Receive buffer size.  Cleared before every receive attempt.
pub const RX_BUFFER_LEN: usize = 20;

/// Bytes received from the verifier in one receive attempt.
pub type InboundMessage = Vec<u8, RX_BUFFER_LEN>;

/// Reply tag, decoded from the first two bytes of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifierReply {
    /// `"OK"` prefix.
    Grant,
    /// `"NO"` prefix.
    Deny,
    /// Anything else, including partial or garbled data.
    Unrecognised,
}

/// Result of the verification handshake as seen on one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Granted,
    Denied,
    /// No usable reply yet, deadline not passed.
    Pending,
    TimedOut,
}

/// Decode the reply tag.  Case-sensitive; total over all inputs.
pub fn parse_reply(bytes: &[u8]) -> VerifierReply {
    match bytes {
        [b'O', b'K', ..] => VerifierReply::Grant,
        [b'N', b'O', ..] => VerifierReply::Deny,
        _ => VerifierReply::Unrecognised,
    }
}

/// Combine this cycle's reply (if any) with the deadline.
///
/// A valid reply wins even on the cycle the deadline passes.  Elapsed time
/// uses wrapping arithmetic so a millisecond counter wrap does not stall
/// the handshake.
pub fn evaluate(
    reply: Option<VerifierReply>,
    issued_at_ms: u32,
    now_ms: u32,
    timeout_ms: u32,
) -> VerificationOutcome {
    match reply {
        Some(VerifierReply::Grant) => VerificationOutcome::Granted,
        Some(VerifierReply::Deny) => VerificationOutcome::Denied,
        Some(VerifierReply::Unrecognised) | None => {
            if now_ms.wrapping_sub(issued_at_ms) >= timeout_ms {
                VerificationOutcome::TimedOut
            } else {
                VerificationOutcome::Pending
            }
        }
    }
}

/// Render raw reply bytes as a display-safe line: line terminators are
/// dropped and any other non-printable byte becomes `?`.
pub fn printable(bytes: &[u8]) -> String<RX_BUFFER_LEN> {
    let mut out = String::new();
    for &b in bytes {
        if b == b'\r' || b == b'\n' {
            continue;
        }
        let ch = if b.is_ascii_graphic() || b == b' ' {
            b as char
        } else {
            '?'
        };
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
