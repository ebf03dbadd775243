//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the gate controller:
//! per-cycle orchestration of presence sensing, the verifier handshake and
//! the state machine.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
