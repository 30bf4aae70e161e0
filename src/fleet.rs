//! Process-wide bin and picker state.
//!
//! Owns the ambient fill simulation (small random drift every jitter tick)
//! and the live-sensor override for one designated bin. Ambient updates are
//! suspended while a simulation run is active so the run is the only writer.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::debug;

use crate::model::{Bin, Picker, Point};
use crate::sensor::percent_to_fill_level;
use crate::traits::FleetStore;

/// Bengaluru city centre.
pub const DEFAULT_CENTER: Point = Point::new(12.9716, 77.5946);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Maximum fill change per jitter tick.
    pub jitter_amount: f64,
    /// Bin whose level follows the live sensor.
    pub sensor_bin_id: String,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            jitter_amount: 0.05,
            sensor_bin_id: "bin-1".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Fleet {
    config: FleetConfig,
    bins: Vec<Bin>,
    pickers: Vec<Picker>,
    rng: StdRng,
    ambient_suspended: bool,
    sensor_override: Option<f64>,
}

impl Fleet {
    pub fn new(bins: Vec<Bin>, pickers: Vec<Picker>, config: FleetConfig) -> Self {
        Self::with_rng(bins, pickers, config, StdRng::from_entropy())
    }

    /// Deterministic jitter, for tests and replays.
    pub fn with_seed(bins: Vec<Bin>, pickers: Vec<Picker>, config: FleetConfig, seed: u64) -> Self {
        Self::with_rng(bins, pickers, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bins: Vec<Bin>, pickers: Vec<Picker>, config: FleetConfig, rng: StdRng) -> Self {
        Self {
            config,
            bins,
            pickers,
            rng,
            ambient_suspended: false,
            sensor_override: None,
        }
    }

    /// Ten bins and two pickers scattered around `center`.
    pub fn demo(center: Point, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let bins = seed_bins(center, &mut rng);
        Self::with_rng(bins, seed_pickers(center), FleetConfig::default(), rng)
    }

    /// Reseeds bins and pickers around `center`, as [`demo`](Self::demo)
    /// does, and drops any sensor override.
    pub fn reset(&mut self, center: Point, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.bins = seed_bins(center, &mut self.rng);
        self.pickers = seed_pickers(center);
        self.sensor_override = None;
        debug!(seed, bins = self.bins.len(), "fleet reset");
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn pickers(&self) -> &[Picker] {
        &self.pickers
    }

    pub fn bin(&self, bin_id: &str) -> Option<&Bin> {
        self.bins.iter().find(|bin| bin.id == bin_id)
    }

    pub fn picker(&self, picker_id: &str) -> Option<&Picker> {
        self.pickers.iter().find(|picker| picker.id == picker_id)
    }

    pub fn replace_bins(&mut self, bins: Vec<Bin>) {
        self.bins = bins;
    }

    pub fn replace_pickers(&mut self, pickers: Vec<Picker>) {
        self.pickers = pickers;
    }

    pub fn is_ambient_suspended(&self) -> bool {
        self.ambient_suspended
    }

    pub fn sensor_override(&self) -> Option<f64> {
        self.sensor_override
    }

    /// Applies a live sensor reading (percent) to the designated bin.
    ///
    /// The reading is clamped and stays in force across jitter ticks until
    /// cleared.
    pub fn apply_sensor_reading(&mut self, percent: f64) -> f64 {
        let level = percent_to_fill_level(percent);
        self.sensor_override = Some(level);
        let sensor_bin_id = self.config.sensor_bin_id.clone();
        self.set_fill_level(&sensor_bin_id, level);
        level
    }

    pub fn clear_sensor_override(&mut self) {
        self.sensor_override = None;
    }

    /// One ambient update: drifts every bin's fill level by up to
    /// `jitter_amount` and refreshes timestamps.
    ///
    /// Does nothing while suspended. Returns the number of bins touched.
    pub fn jitter_tick(&mut self) -> usize {
        if self.ambient_suspended {
            return 0;
        }

        let amount = self.config.jitter_amount;
        let now = Utc::now();
        for bin in &mut self.bins {
            bin.fill_level = match self.sensor_override {
                Some(level) if bin.id == self.config.sensor_bin_id => level,
                _ => jitter(&mut self.rng, bin.fill_level, amount),
            };
            bin.last_updated = now;
        }

        debug!(bins = self.bins.len(), "ambient fill jitter");
        self.bins.len()
    }

    /// Replaces every fill level with a fresh uniform sample.
    pub fn randomize_fill_levels(&mut self) {
        let now = Utc::now();
        for bin in &mut self.bins {
            bin.fill_level = self.rng.gen_range(0.0..1.0);
            bin.last_updated = now;
        }
    }
}

impl FleetStore for Fleet {
    fn fill_level(&self, bin_id: &str) -> Option<f64> {
        self.bin(bin_id).map(|bin| bin.fill_level)
    }

    fn set_fill_level(&mut self, bin_id: &str, fill_level: f64) {
        if let Some(bin) = self.bins.iter_mut().find(|bin| bin.id == bin_id) {
            bin.fill_level = fill_level;
            bin.last_updated = Utc::now();
        }
    }

    fn picker_speed_kmph(&self, picker_id: &str) -> Option<f64> {
        self.picker(picker_id).map(|picker| picker.speed_kmph)
    }

    fn set_picker_position(&mut self, picker_id: &str, position: Point) {
        if let Some(picker) = self.pickers.iter_mut().find(|picker| picker.id == picker_id) {
            picker.position = position;
        }
    }

    fn set_ambient_updates_suspended(&mut self, suspended: bool) {
        self.ambient_suspended = suspended;
    }
}

fn jitter<R: Rng>(rng: &mut R, value: f64, amount: f64) -> f64 {
    (value + rng.gen_range(-1.0..=1.0) * amount).clamp(0.0, 1.0)
}

/// Ten bins at fixed offsets from `center` with random fill, importance and
/// capacity.
pub fn seed_bins<R: Rng>(center: Point, rng: &mut R) -> Vec<Bin> {
    const OFFSETS: [(f64, f64); 10] = [
        (0.010, 0.010),
        (-0.008, 0.016),
        (0.005, -0.011),
        (-0.015, -0.006),
        (0.014, 0.004),
        (-0.006, 0.010),
        (0.013, -0.014),
        (-0.011, -0.012),
        (0.002, 0.018),
        (-0.004, -0.016),
    ];

    let now = Utc::now();
    OFFSETS
        .iter()
        .enumerate()
        .map(|(index, (d_lat, d_lon))| Bin {
            id: format!("bin-{}", index + 1),
            name: format!("Bin {}", index + 1),
            position: Point::new(center.latitude + d_lat, center.longitude + d_lon),
            fill_level: rng.gen_range(0.1..0.9),
            area_importance: rng.gen_range(0.3..1.0),
            capacity_liters: rng.gen_range(60.0_f64..240.0).round(),
            last_updated: now,
        })
        .collect()
}

pub fn seed_pickers(center: Point) -> Vec<Picker> {
    vec![
        Picker {
            id: "picker-1".to_string(),
            name: "Picker Alpha".to_string(),
            position: Point::new(center.latitude + 0.002, center.longitude - 0.004),
            capacity_liters: 1200.0,
            current_load_liters: 200.0,
            speed_kmph: 20.0,
        },
        Picker {
            id: "picker-2".to_string(),
            name: "Picker Bravo".to_string(),
            position: Point::new(center.latitude - 0.006, center.longitude + 0.008),
            capacity_liters: 1000.0,
            current_load_liters: 350.0,
            speed_kmph: 18.0,
        },
    ]
}
