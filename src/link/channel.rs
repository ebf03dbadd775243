//! Message-oriented verifier channel over a [`SerialLink`], plus the
//! bounded retry policy used when issuing a request.

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::app::ports::VerifierPort;

use super::protocol::{InboundMessage, RX_BUFFER_LEN};
use super::transport::SerialLink;

/// Inter-byte gap after which a partial message is considered complete.
/// One byte at 115200 baud takes under 0.1 ms.
const INTER_BYTE_TIMEOUT_MS: u32 = 2;

/// Adapts a byte link into the [`VerifierPort`] the service talks to.
pub struct SerialVerifierChannel<L: SerialLink> {
    link: L,
    attempt_timeout_ms: u32,
}

impl<L: SerialLink> SerialVerifierChannel<L> {
    pub fn new(link: L, attempt_timeout_ms: u32) -> Self {
        Self {
            link,
            attempt_timeout_ms,
        }
    }

    /// Access the underlying link (tests inject and inspect traffic here).
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }
}

impl<L: SerialLink> VerifierPort for SerialVerifierChannel<L> {
    fn send(&mut self, message: &[u8]) -> bool {
        match self.link.write(message, self.attempt_timeout_ms) {
            Ok(n) if n == message.len() => true,
            Ok(n) => {
                debug!("verifier send: short write {}/{}", n, message.len());
                false
            }
            Err(e) => {
                debug!("verifier send failed: {}", e);
                false
            }
        }
    }

    fn try_receive(&mut self, timeout_ms: u32) -> Option<InboundMessage> {
        let mut buf = [0u8; RX_BUFFER_LEN];
        let mut budget = ReceiveBudget::new(timeout_ms);

        // Wait for the first byte, then drain the rest of the line with a
        // short inter-byte bound.  Every bound is charged to one budget.
        let mut len = match self.link.read(&mut buf[..1], budget.first_byte()) {
            Ok(0) => return None,
            Ok(n) => n,
            Err(e) => {
                warn!("verifier receive failed: {}", e);
                return None;
            }
        };

        while len < RX_BUFFER_LEN && buf[len - 1] != b'\n' {
            let Some(wait_ms) = budget.next_byte() else {
                debug!("verifier receive: budget spent after {} bytes", len);
                break;
            };
            match self.link.read(&mut buf[len..=len], wait_ms) {
                Ok(0) => break,
                Ok(n) => len += n,
                Err(e) => {
                    warn!("verifier receive aborted mid-message: {}", e);
                    break;
                }
            }
        }

        InboundMessage::from_slice(&buf[..len]).ok()
    }
}

/// Splits one receive bound between the first-byte wait and the
/// inter-byte waits so their sum never exceeds it.
#[derive(Debug, Clone, Copy)]
struct ReceiveBudget {
    remaining_ms: u32,
    tail_ms: u32,
}

impl ReceiveBudget {
    fn new(timeout_ms: u32) -> Self {
        let full_tail = INTER_BYTE_TIMEOUT_MS * (RX_BUFFER_LEN as u32 - 1);
        Self {
            remaining_ms: timeout_ms,
            tail_ms: full_tail.min(timeout_ms / 2),
        }
    }

    /// Bound for the first byte; the tail reserve stays behind.
    fn first_byte(&mut self) -> u32 {
        let wait = self.remaining_ms - self.tail_ms;
        self.remaining_ms = self.tail_ms;
        wait
    }

    /// Bound for the next byte, or `None` once the budget is spent.
    fn next_byte(&mut self) -> Option<u32> {
        if self.remaining_ms == 0 {
            return None;
        }
        let wait = INTER_BYTE_TIMEOUT_MS.min(self.remaining_ms);
        self.remaining_ms -= wait;
        Some(wait)
    }
}

// ───────────────────────────────────────────────────────────────
// Request retry policy
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total transmit attempts, including the first.
    pub attempts: u8,
    /// Pause after each failed attempt except the last.
    pub backoff_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendReport {
    /// Attempts actually made.
    pub attempts: u8,
    /// Whether any attempt succeeded.
    pub delivered: bool,
}

/// Transmit `message`, retrying failed attempts up to the policy budget.
/// The first successful attempt stops retrying.
pub fn send_with_retry(
    channel: &mut impl VerifierPort,
    delay: &mut impl DelayNs,
    message: &[u8],
    policy: RetryPolicy,
) -> SendReport {
    for attempt in 1..=policy.attempts {
        if channel.send(message) {
            return SendReport {
                attempts: attempt,
                delivered: true,
            };
        }
        if attempt < policy.attempts {
            delay.delay_ms(policy.backoff_ms);
        }
    }

    SendReport {
        attempts: policy.attempts,
        delivered: false,
    }
}
