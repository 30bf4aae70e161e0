//! Great-circle distance between WGS84 points.
//!
//! Straight-line distances feed the planner scores and drive the simulation
//! cursor. They ignore roads, which is fine at city scale.

use crate::model::Point;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
///
/// Symmetric, and exactly zero for identical points.
pub fn haversine_km(from: Point, to: Point) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points.
    let c = 2.0 * a.min(1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Haversine distance in meters.
pub fn haversine_m(from: Point, to: Point) -> f64 {
    haversine_km(from, to) * 1000.0
}
