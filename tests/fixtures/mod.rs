//! Test fixtures for waste-route-planner.
//!
//! Provides realistic test data including:
//! - Real Bengaluru locations (from OpenStreetMap)
//! - Builders for bins and pickers

pub mod bengaluru_locations;
pub mod builders;

#[allow(unused_imports)]
pub use bengaluru_locations::*;
#[allow(unused_imports)]
pub use builders::*;
