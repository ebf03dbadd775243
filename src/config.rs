//! Gate controller configuration parameters
//!
//! Every timing and actuation constant used by the control loop lives here.
//! The firmware boots with [`GateConfig::default()`]; there is no runtime
//! override surface.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core gate configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    // --- Verification handshake ---
    /// Time allowed for the verifier to answer, measured from request issue (ms)
    pub verify_timeout_ms: u32,
    /// Maximum number of attempts to transmit the request
    pub send_attempts: u8,
    /// Bound on a single transmit attempt (ms)
    pub send_attempt_timeout_ms: u32,
    /// Pause after a failed transmit attempt (ms)
    pub send_backoff_ms: u32,
    /// Bounded wait for an inbound reply each cycle (ms)
    pub receive_timeout_ms: u32,

    // --- Gate ---
    /// Pause between showing "Closing" and driving the gate closed (ms)
    pub close_delay_ms: u32,
    /// Servo PWM period (microseconds)
    pub servo_period_us: u32,
    /// Servo pulse width for the closed position (microseconds)
    pub servo_closed_pulse_us: u32,
    /// Servo pulse width for the open position (microseconds)
    pub servo_open_pulse_us: u32,

    // --- Timing ---
    /// Sleep quantum at the end of every control cycle (ms)
    pub control_loop_interval_ms: u32,

    // --- Serial link ---
    /// Verifier UART baud rate (8-N-1)
    pub uart_baud_rate: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            // Verification handshake
            verify_timeout_ms: 5000,
            send_attempts: 5,
            send_attempt_timeout_ms: 100,
            send_backoff_ms: 20,
            receive_timeout_ms: 100,

            // Gate
            close_delay_ms: 1000,
            servo_period_us: 10_000, // 100 Hz
            servo_closed_pulse_us: 250,
            servo_open_pulse_us: 750,

            // Timing
            control_loop_interval_ms: 100, // 10 Hz

            // Serial link
            uart_baud_rate: 115_200,
        }
    }
}

impl GateConfig {
    /// Reject values the control loop cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.verify_timeout_ms == 0 {
            return Err(Error::Config("verify_timeout_ms must be non-zero"));
        }
        if self.send_attempts == 0 {
            return Err(Error::Config("send_attempts must be at least 1"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(Error::Config("control_loop_interval_ms must be non-zero"));
        }
        if self.servo_period_us == 0 {
            return Err(Error::Config("servo_period_us must be non-zero"));
        }
        if self.servo_closed_pulse_us >= self.servo_period_us
            || self.servo_open_pulse_us >= self.servo_period_us
        {
            return Err(Error::Config("servo pulse must be shorter than its period"));
        }
        if self.servo_closed_pulse_us == self.servo_open_pulse_us {
            return Err(Error::Config("open and closed servo pulses must differ"));
        }
        if self.uart_baud_rate == 0 {
            return Err(Error::Config("uart_baud_rate must be non-zero"));
        }
        Ok(())
    }
}
