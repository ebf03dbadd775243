//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the presence sensor, the gate servo and the status panel, exposing
//! them through [`PresencePort`], [`GatePort`] and [`DisplayPort`].  On
//! non-espidf targets the underlying drivers use cfg-gated simulation
//! stubs.

use embedded_hal::digital::InputPin;
use log::info;

use crate::app::ports::{DisplayPort, GatePort, PresencePort};
use crate::drivers::display::StatusDisplay;
use crate::drivers::servo::GateServo;
use crate::fsm::context::GatePosition;
use crate::sensors::PresenceReading;
use crate::sensors::presence::PresenceSensor;

/// Concrete adapter that combines all board hardware behind port traits.
pub struct HardwareAdapter<P: InputPin> {
    presence: PresenceSensor<P>,
    servo: GateServo,
    display: StatusDisplay,
}

impl<P: InputPin> HardwareAdapter<P> {
    pub fn new(presence: PresenceSensor<P>, servo: GateServo, display: StatusDisplay) -> Self {
        Self {
            presence,
            servo,
            display,
        }
    }

    pub fn servo(&self) -> &GateServo {
        &self.servo
    }

    pub fn display(&self) -> &StatusDisplay {
        &self.display
    }
}

// ── PresencePort implementation ───────────────────────────────

impl<P: InputPin> PresencePort for HardwareAdapter<P> {
    fn sample(&mut self) -> PresenceReading {
        self.presence.read()
    }
}

// ── GatePort / DisplayPort implementation ─────────────────────

impl<P: InputPin> GatePort for HardwareAdapter<P> {
    fn set_gate(&mut self, position: GatePosition) {
        info!("gate -> {:?}", position);
        self.servo.set(position);
    }
}

impl<P: InputPin> DisplayPort for HardwareAdapter<P> {
    fn show(&mut self, lines: &[&str]) {
        self.display.show(lines);
    }
}
