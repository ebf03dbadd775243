//! Verifier link: byte transport, wire protocol, and the message channel
//! built on top of them.
//!
//! ```text
//!  SerialLink (bytes) ──▶ SerialVerifierChannel ──▶ VerifierPort ──▶ GateService
//!                              │
//!                         protocol::parse_reply
//! ```

pub mod channel;
pub mod protocol;
pub mod transport;
