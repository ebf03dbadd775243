//! Unified error types for the gate firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! boot path's error handling uniform.  All variants are `Copy` so they can
//! be passed around without allocation.

use core::fmt;

use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Serial link errors
// ---------------------------------------------------------------------------

/// Failures of a single bounded serial operation.  The verifier channel
/// absorbs these; they never escape a control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The UART driver rejected the write.
    WriteFailed,
    /// Bytes were queued but not drained within the attempt bound.
    TxTimeout,
    /// The UART driver reported a read error.
    ReadFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "UART write failed"),
            Self::TxTimeout => write!(f, "UART transmit timed out"),
            Self::ReadFailed => write!(f, "UART read failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
