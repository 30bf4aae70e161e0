//! Builders for bins and pickers with sensible defaults.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use waste_route_planner::model::{Bin, Picker, Point};

use super::bengaluru_locations::Location;

#[derive(Clone, Debug)]
pub struct TestBin(Bin);

impl TestBin {
    pub fn new(id: &str) -> Self {
        Self(Bin {
            id: id.to_string(),
            name: id.to_string(),
            position: Point::new(0.0, 0.0),
            fill_level: 0.5,
            area_importance: 0.5,
            capacity_liters: 120.0,
            last_updated: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        })
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.0.position = Point::new(lat, lng);
        self
    }

    pub fn located(self, location: &Location) -> Self {
        let mut bin = self.at(location.lat, location.lng);
        bin.0.name = location.name.to_string();
        bin
    }

    pub fn fill(mut self, fill_level: f64) -> Self {
        self.0.fill_level = fill_level;
        self
    }

    pub fn importance(mut self, area_importance: f64) -> Self {
        self.0.area_importance = area_importance;
        self
    }

    pub fn capacity(mut self, liters: f64) -> Self {
        self.0.capacity_liters = liters;
        self
    }

    pub fn build(self) -> Bin {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct TestPicker(Picker);

impl TestPicker {
    pub fn new(id: &str) -> Self {
        Self(Picker {
            id: id.to_string(),
            name: id.to_string(),
            position: Point::new(0.0, 0.0),
            capacity_liters: 1200.0,
            current_load_liters: 0.0,
            speed_kmph: 20.0,
        })
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.0.position = Point::new(lat, lng);
        self
    }

    pub fn located(self, location: &Location) -> Self {
        self.at(location.lat, location.lng)
    }

    pub fn capacity(mut self, liters: f64) -> Self {
        self.0.capacity_liters = liters;
        self
    }

    pub fn load(mut self, liters: f64) -> Self {
        self.0.current_load_liters = liters;
        self
    }

    pub fn speed(mut self, kmph: f64) -> Self {
        self.0.speed_kmph = kmph;
        self
    }

    pub fn build(self) -> Picker {
        self.0
    }
}

/// One bin per location, ids `bin-1..`.
pub fn bins_at(locations: &[Location]) -> Vec<Bin> {
    locations
        .iter()
        .enumerate()
        .map(|(index, location)| {
            TestBin::new(&format!("bin-{}", index + 1))
                .located(location)
                .build()
        })
        .collect()
}
