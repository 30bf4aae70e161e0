//! Real Bengaluru locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap, rounded to 4 decimals.

#![allow(dead_code)]

use waste_route_planner::model::Point;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn point(&self) -> Point {
        Point::new(self.lat, self.lng)
    }
}

// ============================================================================
// Depots (good for picker start locations)
// ============================================================================

pub const DEPOTS: &[Location] = &[
    Location::new("BBMP Head Office", 12.9669, 77.5871),
    Location::new("Shanthinagar Bus Depot", 12.9569, 77.5985),
];

// ============================================================================
// Central Bengaluru bin sites
// ============================================================================

pub const CENTRAL_SITES: &[Location] = &[
    Location::new("MG Road Metro", 12.9755, 77.6068),
    Location::new("Cubbon Park", 12.9763, 77.5929),
    Location::new("Vidhana Soudha", 12.9797, 77.5907),
    Location::new("Lalbagh Botanical Garden", 12.9507, 77.5848),
    Location::new("Bangalore Palace", 12.9987, 77.5920),
    Location::new("KR Market", 12.9642, 77.5776),
    Location::new("KSR Bengaluru Station", 12.9779, 77.5697),
    Location::new("Brigade Road", 12.9719, 77.6072),
    Location::new("Commercial Street", 12.9822, 77.6083),
    Location::new("Chinnaswamy Stadium", 12.9788, 77.5996),
];

// ============================================================================
// Outlying sites (several km from the centre)
// ============================================================================

pub const OUTLYING_SITES: &[Location] = &[
    Location::new("Indiranagar 100 Feet Road", 12.9719, 77.6412),
    Location::new("Forum Mall Koramangala", 12.9346, 77.6113),
];
