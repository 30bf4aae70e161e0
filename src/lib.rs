//! waste-route-planner core
//!
//! Greedy pickup-route planning for waste-collection vehicles, plus the
//! geometry and frame-driven playback needed to animate a vehicle along the
//! planned route.

pub mod traits;
pub mod model;
pub mod haversine;
pub mod polyline;
pub mod planner;
pub mod osrm;
pub mod ledger;
pub mod simulation;
pub mod driver;
pub mod fleet;
pub mod sensor;
pub mod live_feed;
