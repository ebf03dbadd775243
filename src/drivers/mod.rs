//! Actuator and link drivers, hardware initialisation, and peripheral helpers.

pub mod display;
pub mod hw_init;
pub mod servo;
pub mod uart;
