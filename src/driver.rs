//! Fixed-cadence scheduler for headless runs.
//!
//! Stands in for an animation-frame loop: advances a synthetic clock by a
//! constant frame interval and ticks the engine until the run completes,
//! stops running, or the frame budget is spent.

use std::time::Duration;

use crate::simulation::{RunId, SimulationEngine, SimulationEvent};
use crate::traits::FleetStore;

const DEFAULT_MAX_FRAMES: usize = 1_000_000;

#[derive(Debug, Clone)]
pub struct FixedStepDriver {
    frame: Duration,
    max_frames: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriveSummary {
    pub run: RunId,
    pub frames: usize,
    pub picked_up: Vec<String>,
    pub completed: bool,
    pub bins_restored: usize,
    pub distance_traveled_m: f64,
}

impl FixedStepDriver {
    /// A driver ticking every `frame`, e.g. 16 ms for 60 fps.
    pub fn new(frame: Duration) -> Self {
        Self {
            frame,
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }

    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Drives the engine's current run. Returns `None` when nothing is running.
    pub fn drive<S: FleetStore + ?Sized>(&self, engine: &mut SimulationEngine, store: &mut S) -> Option<DriveSummary> {
        self.drive_with(engine, store, |_| {})
    }

    /// Like [`drive`](Self::drive), handing every event to `on_event` as it happens.
    pub fn drive_with<S, F>(
        &self,
        engine: &mut SimulationEngine,
        store: &mut S,
        mut on_event: F,
    ) -> Option<DriveSummary>
    where
        S: FleetStore + ?Sized,
        F: FnMut(&SimulationEvent),
    {
        if !engine.is_running() {
            return None;
        }
        let run = engine.current_run()?;

        let mut summary = DriveSummary {
            run,
            frames: 0,
            picked_up: Vec::new(),
            completed: false,
            bins_restored: 0,
            distance_traveled_m: 0.0,
        };
        let mut now = Duration::ZERO;

        while summary.frames < self.max_frames {
            let events = engine.tick_run(run, now, store);
            summary.frames += 1;
            if events.is_empty() {
                break;
            }

            for event in &events {
                on_event(event);
                match event {
                    SimulationEvent::Moved {
                        distance_traveled_m, ..
                    } => summary.distance_traveled_m = *distance_traveled_m,
                    SimulationEvent::PickedUp { bin_id, .. } => summary.picked_up.push(bin_id.clone()),
                    SimulationEvent::Completed {
                        distance_traveled_m,
                        bins_restored,
                    } => {
                        summary.completed = true;
                        summary.bins_restored = *bins_restored;
                        summary.distance_traveled_m = *distance_traveled_m;
                    }
                    SimulationEvent::BaselineEstablished => {}
                }
            }

            if summary.completed {
                break;
            }
            now += self.frame;
        }

        Some(summary)
    }
}

impl Default for FixedStepDriver {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}
