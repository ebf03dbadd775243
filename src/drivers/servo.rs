//! Gate barrier servo driver.
//!
//! Two named positions mapped to fixed pulse widths on LEDC channel 0.
//! The pulse is converted to a duty value against the servo period at the
//! timer's 14-bit resolution.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LEDC duty register via hw_init helpers.
//! On host/test: tracks the duty in-memory only.

use crate::config::GateConfig;
use crate::drivers::hw_init;
use crate::fsm::context::GatePosition;

pub struct GateServo {
    period_us: u32,
    closed_pulse_us: u32,
    open_pulse_us: u32,
    position: Option<GatePosition>,
    hw_duty: u32,
}

impl GateServo {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            period_us: config.servo_period_us,
            closed_pulse_us: config.servo_closed_pulse_us,
            open_pulse_us: config.servo_open_pulse_us,
            position: None,
            hw_duty: 0,
        }
    }

    pub fn set(&mut self, position: GatePosition) {
        let pulse_us = match position {
            GatePosition::Closed => self.closed_pulse_us,
            GatePosition::Open => self.open_pulse_us,
        };
        let duty = pulse_to_duty(pulse_us, self.period_us);
        hw_init::ledc_set_duty(hw_init::LEDC_CH_SERVO, duty);

        self.hw_duty = duty;
        self.position = Some(position);
    }

    /// Last commanded position; `None` until the first command.
    pub fn position(&self) -> Option<GatePosition> {
        self.position
    }

    pub fn current_duty(&self) -> u32 {
        self.hw_duty
    }
}

/// Map a pulse width to a duty value at [`hw_init::SERVO_DUTY_BITS`].
/// Pulses longer than the period saturate at full scale.
pub fn pulse_to_duty(pulse_us: u32, period_us: u32) -> u32 {
    if period_us == 0 {
        return 0;
    }
    let duty = u64::from(pulse_us.min(period_us)) * u64::from(hw_init::SERVO_DUTY_MAX)
        / u64::from(period_us);
    duty as u32
}
