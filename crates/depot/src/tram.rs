//! Tram domain model
//!
//! A tram is identified by its position in the depot roster and carries a
//! single mission flag. Missions themselves are opaque.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a tram within the depot roster
pub type TramIndex = u32;

/// A vehicle tracked by the depot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tram {
    /// Position in the roster, starting at 0
    pub index: TramIndex,

    /// Whether a mission has been assigned
    pub has_mission: bool,
}

impl Tram {
    /// Create a tram with the given index and mission flag
    pub fn new(index: TramIndex, has_mission: bool) -> Self {
        Self { index, has_mission }
    }

    /// Check if the tram can still receive a mission
    pub fn is_idle(&self) -> bool {
        !self.has_mission
    }
}

/// Result of a successful mission assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionAssignment {
    /// Tram that received the mission
    pub tram_index: TramIndex,
}

impl fmt::Display for MissionAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mission assigned to tram #{}.", self.tram_index)
    }
}
