//! Time-based playback of a picker along a planned route.
//!
//! The engine owns a distance cursor along the route polyline. Each frame
//! advances the cursor by `speed * elapsed`, moves the picker to the
//! interpolated position, and empties any planned bin within the pickup
//! radius. Bin levels are restored through the [`PickupLedger`] when the
//! run ends, whether it completed or was reset.
//!
//! State machine:
//!
//! ```text
//! Idle --start--> Starting --first tick--> Running --end of route--> Completed
//!                    ^                       |
//!                    +------- resume --- Paused <-- pause
//! any --reset--> Idle
//! ```
//!
//! `Starting` carries no clock reference; the first tick only fixes the
//! baseline, so no time spent before start (or while paused) is ever
//! counted as travel.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::haversine::haversine_m;
use crate::ledger::PickupLedger;
use crate::model::{PlannedRouteResult, Point};
use crate::polyline::{LonLat, Polyline};
use crate::traits::FleetStore;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// A planned bin is picked up once the picker is this close to it.
    pub pickup_radius_meters: f64,
    /// Floor applied to the picker speed before the multiplier.
    pub min_speed_mps: f64,
    /// Playback speed-up factor.
    pub speed_multiplier: f64,
    /// Used when the store does not know the picker's speed.
    pub default_speed_kmph: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pickup_radius_meters: 30.0,
            min_speed_mps: 1.0,
            speed_multiplier: 1.0,
            default_speed_kmph: 15.0,
        }
    }
}

/// Identifies one run, so ticks scheduled for a superseded run can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    /// Running, waiting for the first frame to fix the clock baseline.
    Starting,
    Running { last_frame: Duration },
    Paused,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    BaselineEstablished,
    Moved {
        position: LonLat,
        distance_traveled_m: f64,
    },
    PickedUp {
        bin_id: String,
        original_fill_level: Option<f64>,
    },
    Completed {
        distance_traveled_m: f64,
        bins_restored: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("route needs at least 2 vertices, got {vertices}")]
    DegenerateRoute { vertices: usize },
}

#[derive(Debug, Clone)]
struct ActiveRun {
    id: RunId,
    plan: PlannedRouteResult,
    total_m: f64,
    speed_kmph: f64,
    distance_traveled_m: f64,
}

#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: SimulationConfig,
    state: RunState,
    run: Option<ActiveRun>,
    ledger: PickupLedger,
    position: Option<LonLat>,
    next_run: u64,
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            state: RunState::Idle,
            run: None,
            ledger: PickupLedger::new(),
            position: None,
            next_run: 0,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// True while frames move the picker (including the baseline frame).
    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Starting | RunState::Running { .. })
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.run.as_ref().map(|run| run.id)
    }

    pub fn plan(&self) -> Option<&PlannedRouteResult> {
        self.run.as_ref().map(|run| &run.plan)
    }

    pub fn ledger(&self) -> &PickupLedger {
        &self.ledger
    }

    /// Simulated picker marker; `None` outside a run.
    pub fn position(&self) -> Option<LonLat> {
        self.position
    }

    pub fn distance_traveled_m(&self) -> f64 {
        self.run.as_ref().map_or(0.0, |run| run.distance_traveled_m)
    }

    pub fn total_distance_m(&self) -> f64 {
        self.run.as_ref().map_or(0.0, |run| run.total_m)
    }

    /// Fraction of the route covered, in [0, 1].
    pub fn progress(&self) -> f64 {
        match &self.run {
            Some(run) if run.total_m > 0.0 => (run.distance_traveled_m / run.total_m).clamp(0.0, 1.0),
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    /// Not-yet-traveled part of the route, for rendering.
    pub fn remaining_route(&self) -> Option<Polyline> {
        let run = self.run.as_ref()?;
        Some(run.plan.route.trim_from(run.distance_traveled_m))
    }

    /// Already-traveled part of the route, for rendering.
    pub fn covered_route(&self) -> Option<Polyline> {
        let run = self.run.as_ref()?;
        Some(run.plan.route.covered_until(run.distance_traveled_m))
    }

    /// Changes playback speed. Ignores non-positive and non-finite values.
    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        if multiplier.is_finite() && multiplier > 0.0 {
            self.config.speed_multiplier = multiplier;
        }
    }

    /// Starts a run along `plan`, superseding any active run.
    ///
    /// Snapshots every planned bin's fill level, suspends ambient updates and
    /// places the picker at the first vertex.
    pub fn start<S: FleetStore + ?Sized>(
        &mut self,
        plan: PlannedRouteResult,
        store: &mut S,
    ) -> Result<RunId, SimulationError> {
        let Some(start) = plan.route.first().filter(|_| plan.route.len() >= 2) else {
            return Err(SimulationError::DegenerateRoute {
                vertices: plan.route.len(),
            });
        };

        if self.run.is_some() {
            self.finish(store);
        }

        self.ledger.clear();
        for segment in &plan.order {
            if let Some(fill_level) = store.fill_level(&segment.bin_id) {
                self.ledger.record_original(&segment.bin_id, fill_level);
            }
        }
        store.set_ambient_updates_suspended(true);
        store.set_picker_position(&plan.picker_id, Point::from_lon_lat(start));

        let speed_kmph = store
            .picker_speed_kmph(&plan.picker_id)
            .unwrap_or(self.config.default_speed_kmph);
        let id = RunId(self.next_run);
        self.next_run += 1;

        info!(
            run = id.0,
            picker_id = %plan.picker_id,
            stops = plan.order.len(),
            vertices = plan.route.len(),
            "simulation started"
        );

        self.run = Some(ActiveRun {
            id,
            total_m: plan.route.length_m(),
            plan,
            speed_kmph,
            distance_traveled_m: 0.0,
        });
        self.position = Some(start);
        self.state = RunState::Starting;
        Ok(id)
    }

    /// Pauses a running simulation. Returns `false` if nothing was running.
    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = RunState::Paused;
        true
    }

    /// Resumes a paused simulation; the next tick re-establishes the baseline.
    pub fn resume(&mut self) -> bool {
        if self.state != RunState::Paused {
            return false;
        }
        self.state = RunState::Starting;
        true
    }

    /// Stops the run and restores picked-up bins. Returns the number restored.
    ///
    /// After a natural completion there is nothing left to restore.
    pub fn reset<S: FleetStore + ?Sized>(&mut self, store: &mut S) -> usize {
        let restored = self.finish(store);
        if self.state != RunState::Idle {
            info!(bins_restored = restored, "simulation reset");
        }
        self.state = RunState::Idle;
        restored
    }

    /// Advances the current run to frame timestamp `now`.
    ///
    /// Returns no events unless a run is actively running.
    pub fn tick<S: FleetStore + ?Sized>(&mut self, now: Duration, store: &mut S) -> Vec<SimulationEvent> {
        match self.state {
            RunState::Starting => {
                self.state = RunState::Running { last_frame: now };
                debug!(now_ms = now.as_millis() as u64, "simulation baseline");
                vec![SimulationEvent::BaselineEstablished]
            }
            RunState::Running { last_frame } => {
                self.state = RunState::Running { last_frame: now };
                self.advance(now.saturating_sub(last_frame), store)
            }
            RunState::Idle | RunState::Paused | RunState::Completed => Vec::new(),
        }
    }

    /// Like [`tick`](Self::tick), but drops ticks scheduled for a superseded run.
    pub fn tick_run<S: FleetStore + ?Sized>(
        &mut self,
        run: RunId,
        now: Duration,
        store: &mut S,
    ) -> Vec<SimulationEvent> {
        if self.current_run() != Some(run) {
            return Vec::new();
        }
        self.tick(now, store)
    }

    /// Moves the cursor by `elapsed` of travel time.
    pub fn advance<S: FleetStore + ?Sized>(&mut self, elapsed: Duration, store: &mut S) -> Vec<SimulationEvent> {
        if !matches!(self.state, RunState::Running { .. }) {
            return Vec::new();
        }
        let Some(run) = self.run.as_mut() else {
            return Vec::new();
        };

        let speed_mps =
            (run.speed_kmph * 1000.0 / 3600.0).max(self.config.min_speed_mps) * self.config.speed_multiplier;
        run.distance_traveled_m = (run.distance_traveled_m + speed_mps * elapsed.as_secs_f64()).min(run.total_m);

        let mut events = Vec::new();
        if let Some(position) = run.plan.route.interpolate(run.distance_traveled_m) {
            self.position = Some(position);
            store.set_picker_position(&run.plan.picker_id, Point::from_lon_lat(position));
            events.push(SimulationEvent::Moved {
                position,
                distance_traveled_m: run.distance_traveled_m,
            });

            for segment in &run.plan.order {
                if self.ledger.is_picked_up(&segment.bin_id) {
                    continue;
                }
                let distance_m = haversine_m(Point::from_lon_lat(position), segment.point());
                if distance_m > self.config.pickup_radius_meters {
                    continue;
                }

                if let Some(fill_level) = store.fill_level(&segment.bin_id) {
                    self.ledger.record_original(&segment.bin_id, fill_level);
                }
                store.set_fill_level(&segment.bin_id, 0.0);
                self.ledger.mark_picked_up(&segment.bin_id);

                info!(bin_id = %segment.bin_id, distance_m, "bin picked up");
                events.push(SimulationEvent::PickedUp {
                    bin_id: segment.bin_id.clone(),
                    original_fill_level: self.ledger.original(&segment.bin_id),
                });
            }
        }

        if run.distance_traveled_m >= run.total_m {
            let distance_traveled_m = run.distance_traveled_m;
            self.state = RunState::Completed;
            let bins_restored = self.finish(store);
            info!(distance_traveled_m, bins_restored, "simulation completed");
            events.push(SimulationEvent::Completed {
                distance_traveled_m,
                bins_restored,
            });
        }

        events
    }

    /// Ends the active run exactly once: restores bins, resumes ambient
    /// updates and discards the route. The picker keeps its last position.
    fn finish<S: FleetStore + ?Sized>(&mut self, store: &mut S) -> usize {
        if self.run.take().is_none() {
            return 0;
        }
        let restored = self.ledger.finalize(store);
        store.set_ambient_updates_suspended(false);
        self.position = None;
        restored
    }
}
