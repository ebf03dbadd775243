//! Byte-level serial transport to the verifier.
//!
//! Concrete implementations:
//! - ESP-IDF UART driver ([`Uart`](crate::drivers::uart::Uart))
//! - Test doubles in the integration suite
//!
//! The verifier channel is generic over `SerialLink`, so the message
//! framing and retry logic never touch UART registers.

use crate::error::LinkError;

/// Bounded, blocking byte transport.
pub trait SerialLink {
    /// Queue `data` and wait up to `timeout_ms` for it to leave the wire.
    /// Returns the number of bytes actually transmitted.
    fn write(&mut self, data: &[u8], timeout_ms: u32) -> Result<usize, LinkError>;

    /// Read up to `buf.len()` bytes, waiting at most `timeout_ms` for them.
    /// Returns 0 if nothing arrived in time.
    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, LinkError>;
}

/// A link with nothing on the other end: writes are accepted and dropped,
/// reads never return data.
pub struct NullLink;

impl SerialLink for NullLink {
    fn write(&mut self, data: &[u8], _timeout_ms: u32) -> Result<usize, LinkError> {
        Ok(data.len())
    }

    fn read(&mut self, _buf: &mut [u8], _timeout_ms: u32) -> Result<usize, LinkError> {
        Ok(0)
    }
}
