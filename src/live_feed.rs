//! Read-only live location feed.
//!
//! Records arrive from an external document store; only the ones carrying a
//! numeric position are displayable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Point;

/// One raw feed document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_known_location: Option<LocationFix>,
    #[serde(default)]
    pub safety_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationFix {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntity {
    pub id: String,
    pub name: String,
    pub position: Point,
    pub timestamp: Option<DateTime<Utc>>,
    pub safety_score: Option<f64>,
}

impl FeedRecord {
    /// The displayable entity, if the record has a valid position.
    pub fn to_tracked(&self) -> Option<TrackedEntity> {
        let fix = self.last_known_location.as_ref()?;
        let position = Point::new(fix.latitude?, fix.longitude?);
        if !position.is_valid() {
            return None;
        }

        Some(TrackedEntity {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_else(|| self.id.clone()),
            position,
            timestamp: fix.timestamp,
            safety_score: self.safety_score,
        })
    }
}

/// Every displayable entity in a feed snapshot, in feed order.
pub fn tracked_entities(records: &[FeedRecord]) -> Vec<TrackedEntity> {
    records.iter().filter_map(FeedRecord::to_tracked).collect()
}
