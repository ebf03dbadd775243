//! Vehicle presence sensor (digital input).
//!
//! An inductive loop / IR break-beam module drives a single GPIO HIGH while
//! a vehicle occupies the bay.  The driver samples the line once per
//! control cycle and reports only the current level.
//!
//! Generic over [`InputPin`] so the same sampler runs against the
//! ESP-IDF GPIO wrapper on target and a plain test double on the host.

use embedded_hal::digital::{Error as _, InputPin};
use log::warn;

use super::PresenceReading;

pub struct PresenceSensor<P: InputPin> {
    pin: P,
}

impl<P: InputPin> PresenceSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Sample the line.  A failed pin read is reported as `Absent`, so a
    /// broken sensor can never open the gate on its own.
    pub fn read(&mut self) -> PresenceReading {
        match self.pin.is_high() {
            Ok(high) => PresenceReading::from_level(high),
            Err(e) => {
                warn!("presence pin read failed: {:?}", e.kind());
                PresenceReading::Absent
            }
        }
    }
}
