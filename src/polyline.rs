//! Polyline representation for route geometries.
//!
//! Points are stored in GeoJSON order (`[longitude, latitude]`), the shape
//! returned by directions services and consumed by map layers. Distances
//! along the line are haversine lengths of each segment; positions inside a
//! segment are a plain linear blend of lon/lat, which is accurate enough at
//! city scale.

use serde::{Deserialize, Serialize};

use crate::haversine::haversine_km;
use crate::model::Point;

/// A `[longitude, latitude]` pair in degrees.
pub type LonLat = [f64; 2];

/// A route geometry as decoded coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<LonLat>,
}

impl Polyline {
    /// Creates a new Polyline from `[lon, lat]` points.
    pub fn new(points: Vec<LonLat>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[LonLat] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<LonLat> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<LonLat> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<LonLat> {
        self.points.last().copied()
    }

    /// Total path length in kilometers.
    pub fn length_km(&self) -> f64 {
        self.segments().map(|(_, _, km)| km).sum()
    }

    /// Total path length in meters.
    pub fn length_m(&self) -> f64 {
        self.length_km() * 1000.0
    }

    /// Position `distance_m` meters along the line.
    ///
    /// Distances past the end clamp to the last vertex; negative distances
    /// clamp to the first. Returns `None` when the line has fewer than two
    /// points, meaning there is nothing to place this frame.
    pub fn interpolate(&self, distance_m: f64) -> Option<LonLat> {
        if self.points.len() < 2 {
            return None;
        }
        if distance_m >= self.length_m() {
            return self.last();
        }

        let last_segment = self.points.len() - 2;
        let mut remaining_km = distance_m.max(0.0) / 1000.0;
        for (index, (a, b, segment_km)) in self.segments().enumerate() {
            if remaining_km <= segment_km || index == last_segment {
                return Some(lerp(a, b, fraction(remaining_km, segment_km)));
            }
            remaining_km -= segment_km;
        }

        self.last()
    }

    /// The part of the line still ahead after `distance_m` meters: the cut
    /// point followed by every later vertex.
    ///
    /// Empty once `distance_m` reaches the total length.
    pub fn trim_from(&self, distance_m: f64) -> Polyline {
        if self.points.len() < 2 || distance_m >= self.length_m() {
            return Polyline::default();
        }

        let last_segment = self.points.len() - 2;
        let mut remaining_km = distance_m.max(0.0) / 1000.0;
        for (index, (a, b, segment_km)) in self.segments().enumerate() {
            // Rounding in the running sum must not walk off the last segment.
            if remaining_km > segment_km && index < last_segment {
                remaining_km -= segment_km;
                continue;
            }
            let mut points = Vec::with_capacity(self.points.len() - index);
            points.push(lerp(a, b, fraction(remaining_km, segment_km)));
            points.extend_from_slice(&self.points[index + 1..]);
            return Polyline::new(points);
        }

        Polyline::new(self.last().into_iter().collect())
    }

    /// The part of the line already covered after `distance_m` meters: every
    /// passed vertex followed by the cut point.
    pub fn covered_until(&self, distance_m: f64) -> Polyline {
        if self.points.len() < 2 || distance_m <= 0.0 {
            return Polyline::default();
        }
        if distance_m >= self.length_m() {
            return self.clone();
        }

        let last_segment = self.points.len() - 2;
        let mut remaining_km = distance_m / 1000.0;
        for (index, (a, b, segment_km)) in self.segments().enumerate() {
            if remaining_km > segment_km && index < last_segment {
                remaining_km -= segment_km;
                continue;
            }
            let mut points = self.points[..=index].to_vec();
            points.push(lerp(a, b, fraction(remaining_km, segment_km)));
            return Polyline::new(points);
        }

        self.clone()
    }

    fn segments(&self) -> impl Iterator<Item = (LonLat, LonLat, f64)> + '_ {
        self.points.windows(2).map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            (a, b, haversine_km(Point::from_lon_lat(a), Point::from_lon_lat(b)))
        })
    }
}

impl From<Vec<LonLat>> for Polyline {
    fn from(points: Vec<LonLat>) -> Self {
        Self::new(points)
    }
}

fn fraction(remaining_km: f64, segment_km: f64) -> f64 {
    if segment_km == 0.0 {
        0.0
    } else {
        (remaining_km / segment_km).min(1.0)
    }
}

fn lerp(a: LonLat, b: LonLat, t: f64) -> LonLat {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
}
