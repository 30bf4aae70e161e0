//! Seams between the planning/simulation core and its collaborators.
//!
//! The core never talks to a network or a UI directly. Hosts implement these
//! for their own transports and state containers.

use serde::{Deserialize, Serialize};

use crate::model::Point;
use crate::polyline::{LonLat, Polyline};

/// Travel mode requested from a road router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelProfile {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl TravelProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelProfile::Driving => "driving",
            TravelProfile::Walking => "walking",
            TravelProfile::Cycling => "cycling",
        }
    }
}

impl std::fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TravelProfile {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "driving" => Ok(TravelProfile::Driving),
            "walking" => Ok(TravelProfile::Walking),
            "cycling" => Ok(TravelProfile::Cycling),
            other => Err(format!("unknown travel profile: {other}")),
        }
    }
}

/// Road-following geometry with authoritative distance and duration.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadRoute {
    pub polyline: Polyline,
    pub distance_km: f64,
    pub duration_min: f64,
}

/// Provides road geometry for an ordered list of waypoints.
///
/// Implementations should reject fewer than two waypoints. Callers treat any
/// error as "keep the straight-line plan".
pub trait RoadRouter {
    type Error: std::error::Error;

    fn route(&self, waypoints: &[LonLat], profile: TravelProfile) -> Result<RoadRoute, Self::Error>;
}

/// Mutable bin and picker state touched by a simulation run.
///
/// The engine is the only writer while a run is active; ambient updates are
/// suspended for the lifetime of the run.
pub trait FleetStore {
    fn fill_level(&self, bin_id: &str) -> Option<f64>;

    fn set_fill_level(&mut self, bin_id: &str, fill_level: f64);

    fn picker_speed_kmph(&self, picker_id: &str) -> Option<f64>;

    fn set_picker_position(&mut self, picker_id: &str, position: Point);

    /// Suspends (or resumes) ambient fill updates such as jitter.
    fn set_ambient_updates_suspended(&mut self, suspended: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_round_trip_through_str() {
        for profile in [TravelProfile::Driving, TravelProfile::Walking, TravelProfile::Cycling] {
            assert_eq!(profile.as_str().parse::<TravelProfile>(), Ok(profile));
        }
        assert_eq!(" Cycling ".parse::<TravelProfile>(), Ok(TravelProfile::Cycling));
        assert!("flying".parse::<TravelProfile>().is_err());
    }
}
