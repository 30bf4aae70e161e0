//! Domain data for bins, pickers and planned routes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::polyline::{LonLat, Polyline};

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Builds a point from a GeoJSON-ordered `[lon, lat]` pair.
    pub fn from_lon_lat(coordinate: LonLat) -> Self {
        Self {
            latitude: coordinate[1],
            longitude: coordinate[0],
        }
    }

    /// GeoJSON-ordered `[lon, lat]` pair.
    pub fn to_lon_lat(self) -> LonLat {
        [self.longitude, self.latitude]
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A waste bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bin {
    pub id: String,
    pub name: String,
    pub position: Point,
    /// 0.0 (empty) to 1.0 (full).
    pub fill_level: f64,
    /// 0.0 to 1.0, relative importance of the surrounding area.
    pub area_importance: f64,
    pub capacity_liters: f64,
    pub last_updated: DateTime<Utc>,
}

impl Bin {
    /// Liters the bin is expected to add to a picker's load.
    pub fn estimated_load_liters(&self) -> f64 {
        self.capacity_liters * self.fill_level
    }
}

/// A collection vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Picker {
    pub id: String,
    pub name: String,
    pub position: Point,
    pub capacity_liters: f64,
    pub current_load_liters: f64,
    pub speed_kmph: f64,
}

/// Relative contribution of each scoring term. Need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightSettings {
    pub weight_fill: f64,
    pub weight_importance: f64,
    pub weight_distance: f64,
}

impl Default for WeightSettings {
    fn default() -> Self {
        Self {
            weight_fill: 0.6,
            weight_importance: 0.3,
            weight_distance: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlanSettings {
    /// Upper bound on the number of stops.
    pub max_bins: usize,
    /// Upper bound on cumulative straight-line distance.
    pub max_distance_km: Option<f64>,
    pub weights: WeightSettings,
}

impl Default for RoutePlanSettings {
    fn default() -> Self {
        Self {
            max_bins: 6,
            max_distance_km: Some(20.0),
            weights: WeightSettings::default(),
        }
    }
}

/// One stop of a planned route, in visit order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRouteSegment {
    pub bin_id: String,
    /// `[lon, lat]` of the bin.
    pub coordinate: LonLat,
    pub distance_from_prev_km: f64,
}

impl PlannedRouteSegment {
    pub fn point(&self) -> Point {
        Point::from_lon_lat(self.coordinate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRouteResult {
    pub picker_id: String,
    pub order: Vec<PlannedRouteSegment>,
    pub total_distance_km: f64,
    pub estimated_time_min: f64,
    /// Starts at the picker's position. Straight-line until refined with road geometry.
    pub route: Polyline,
}

impl PlannedRouteResult {
    /// Waypoints handed to a road router: the picker's position followed by every stop.
    pub fn waypoints(&self) -> Vec<LonLat> {
        let start = self.route.points().first().copied();
        start
            .into_iter()
            .chain(self.order.iter().map(|segment| segment.coordinate))
            .collect()
    }

    pub fn bin_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|segment| segment.bin_id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
