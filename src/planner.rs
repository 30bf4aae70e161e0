//! Greedy bin-selection planner.
//!
//! Starting from the picker, repeatedly pick the admissible bin with the
//! highest weighted score, until the stop cap, the distance cap or the
//! capacity heuristic stops the walk. Deterministic, not optimal.

use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::haversine::haversine_km;
use crate::model::{Bin, Picker, PlannedRouteResult, PlannedRouteSegment, Point, RoutePlanSettings};
use crate::polyline::Polyline;
use crate::traits::{RoadRouter, TravelProfile};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    /// Liters a bin's estimated load may exceed the remaining capacity by
    /// and still be admitted.
    pub capacity_slack_liters: f64,
    /// Floor applied to the picker speed when estimating travel time.
    pub min_speed_kmph: f64,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            capacity_slack_liters: 100.0,
            min_speed_kmph: 5.0,
        }
    }
}

/// Plans a route with default options.
pub fn plan_route(picker: &Picker, bins: &[Bin], settings: &RoutePlanSettings) -> PlannedRouteResult {
    plan_route_with(picker, bins, settings, &PlannerOptions::default())
}

pub fn plan_route_with(
    picker: &Picker,
    bins: &[Bin],
    settings: &RoutePlanSettings,
    options: &PlannerOptions,
) -> PlannedRouteResult {
    let weights = settings.weights;

    let mut pool: Vec<&Bin> = bins.iter().collect();
    let mut current = picker.position;
    let mut order: Vec<PlannedRouteSegment> = Vec::new();
    let mut planned_load = 0.0;
    let mut total_distance_km = 0.0;

    while !pool.is_empty() && order.len() < settings.max_bins {
        let remaining_capacity =
            (picker.capacity_liters - picker.current_load_liters - planned_load).max(0.0);
        let admission_limit = remaining_capacity + options.capacity_slack_liters;

        let mut best: Option<(usize, f64, f64)> = None;
        for (index, bin) in pool.iter().enumerate() {
            if bin.estimated_load_liters() > admission_limit {
                continue;
            }
            let distance_km = haversine_km(current, bin.position);
            let score = weights.weight_fill * bin.fill_level
                + weights.weight_importance * bin.area_importance
                + weights.weight_distance * (1.0 / (1.0 + distance_km));

            // Strictly greater: the first bin encountered wins a tie.
            if best.is_none_or(|(_, best_score, _)| score > best_score) {
                best = Some((index, score, distance_km));
            }
        }

        // Nothing fits the remaining capacity.
        let Some((index, _, distance_km)) = best else {
            break;
        };

        if let Some(max_distance_km) = settings.max_distance_km {
            if total_distance_km + distance_km > max_distance_km {
                break;
            }
        }

        let bin = pool.remove(index);
        total_distance_km += distance_km;
        planned_load += bin.estimated_load_liters();
        current = bin.position;
        order.push(PlannedRouteSegment {
            bin_id: bin.id.clone(),
            coordinate: bin.position.to_lon_lat(),
            distance_from_prev_km: distance_km,
        });
    }

    let estimated_time_min = estimate_minutes(total_distance_km, picker.speed_kmph, options);
    let route = straight_line(picker.position, &order);

    debug!(
        picker_id = %picker.id,
        stops = order.len(),
        total_distance_km,
        estimated_time_min,
        "planned route"
    );

    PlannedRouteResult {
        picker_id: picker.id.clone(),
        order,
        total_distance_km,
        estimated_time_min,
        route,
    }
}

/// Plans an independent route for every picker against the same bin pool.
///
/// Results are in picker order.
pub fn plan_routes(
    pickers: &[Picker],
    bins: &[Bin],
    settings: &RoutePlanSettings,
    options: &PlannerOptions,
) -> Vec<PlannedRouteResult> {
    pickers
        .par_iter()
        .map(|picker| plan_route_with(picker, bins, settings, options))
        .collect()
}

/// Swaps the straight-line geometry, distance and time for road-accurate ones.
///
/// Best effort: plans with fewer than two waypoints, router failures and
/// degenerate road geometry all leave the straight-line plan in place.
pub fn refine_with_road_route<R: RoadRouter>(
    plan: PlannedRouteResult,
    router: &R,
    profile: TravelProfile,
) -> PlannedRouteResult {
    let waypoints = plan.waypoints();
    if waypoints.len() < 2 {
        return plan;
    }

    match router.route(&waypoints, profile) {
        Ok(road) if road.polyline.len() >= 2 => PlannedRouteResult {
            route: road.polyline,
            total_distance_km: road.distance_km,
            estimated_time_min: road.duration_min,
            ..plan
        },
        Ok(road) => {
            warn!(
                picker_id = %plan.picker_id,
                vertices = road.polyline.len(),
                "road route has no usable geometry, keeping straight-line plan"
            );
            plan
        }
        Err(err) => {
            warn!(
                picker_id = %plan.picker_id,
                error = %err,
                "road route refinement failed, keeping straight-line plan"
            );
            plan
        }
    }
}

fn estimate_minutes(distance_km: f64, speed_kmph: f64, options: &PlannerOptions) -> f64 {
    // NaN speeds fall through to the floor as well.
    let speed = if speed_kmph > options.min_speed_kmph {
        speed_kmph
    } else {
        options.min_speed_kmph
    };
    distance_km / speed * 60.0
}

fn straight_line(start: Point, order: &[PlannedRouteSegment]) -> Polyline {
    let mut points = Vec::with_capacity(order.len() + 1);
    points.push(start.to_lon_lat());
    points.extend(order.iter().map(|segment| segment.coordinate));
    Polyline::new(points)
}
