//! Single-sample edge detection on the presence signal.
//!
//! Compares the current reading against the one taken on the previous
//! control cycle.  There is no time-window filtering: a one-cycle glitch
//! produces a rising edge followed by a falling edge.

use super::PresenceReading;

/// Edge derived from two consecutive presence readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEdge {
    /// Absent → present (a vehicle arrived).
    RisingEdge,
    /// Present → absent (a vehicle left).
    FallingEdge,
    /// The reading did not change.
    NoChange,
}

/// Classify the transition between two consecutive readings.
pub const fn detect(previous: PresenceReading, current: PresenceReading) -> PresenceEdge {
    match (previous, current) {
        (PresenceReading::Absent, PresenceReading::Present) => PresenceEdge::RisingEdge,
        (PresenceReading::Present, PresenceReading::Absent) => PresenceEdge::FallingEdge,
        _ => PresenceEdge::NoChange,
    }
}

/// Carries the previous reading forward exactly one cycle.
#[derive(Debug, Clone, Copy)]
pub struct EdgeDetector {
    previous: PresenceReading,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeDetector {
    /// Starts as if the bay had been empty on the cycle before boot.
    pub const fn new() -> Self {
        Self {
            previous: PresenceReading::Absent,
        }
    }

    /// Feed this cycle's reading; returns the edge relative to the last one.
    pub fn update(&mut self, current: PresenceReading) -> PresenceEdge {
        let edge = detect(self.previous, current);
        self.previous = current;
        edge
    }

    /// The reading fed on the most recent cycle.
    pub fn previous(&self) -> PresenceReading {
        self.previous
    }
}
