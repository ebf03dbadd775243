//! Presence sensing: the per-cycle sampler and the edge detector fed by it.

pub mod edge;
pub mod presence;

/// Level of the presence line on one control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceReading {
    /// Line asserted: a vehicle occupies the bay.
    Present,
    /// Line deasserted.
    Absent,
}

impl PresenceReading {
    /// Map a logic level (asserted = HIGH) to a reading.
    pub const fn from_level(high: bool) -> Self {
        if high { Self::Present } else { Self::Absent }
    }

    pub const fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}
