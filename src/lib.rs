//! Car-park gate controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod link;
pub mod pins;

// Driver and adapter modules carry both the ESP-IDF implementation and the
// host simulation; the cfg guards live inside.
pub mod adapters;
pub mod drivers;
pub mod sensors;
