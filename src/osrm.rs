//! OSRM HTTP adapter for road-following routes.
//!
//! Speaks the `route` service of OSRM. Mapbox Directions uses the same
//! request and response shape under a different path, so pointing
//! `service_path` at `directions/v5/mapbox` and setting an access token is
//! enough to use it instead.

use reqwest::Url;
use serde::Deserialize;

use crate::polyline::{LonLat, Polyline};
use crate::traits::{RoadRoute, RoadRouter, TravelProfile};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub service_path: String,
    pub timeout_secs: u64,
    /// Sent as `access_token` when set (Mapbox). OSRM ignores it.
    pub access_token: Option<String>,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            service_path: "route/v1".to_string(),
            timeout_secs: 10,
            access_token: None,
        }
    }
}

impl OsrmConfig {
    pub fn mapbox(access_token: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.mapbox.com".to_string(),
            service_path: "directions/v5/mapbox".to_string(),
            access_token: Some(access_token.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RoadRouteError {
    #[error("at least 2 waypoints required, got {0}")]
    TooFewWaypoints(usize),
    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid directions url: {0}")]
    InvalidUrl(String),
    #[error("directions service returned {code}: {message}")]
    Api { code: String, message: String },
    #[error("no route geometry returned")]
    NoRoute,
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    fn route_url(&self, waypoints: &[LonLat], profile: TravelProfile) -> Result<Url, RoadRouteError> {
        let coords = waypoints
            .iter()
            .map(|[lng, lat]| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        let base = format!(
            "{}/{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.service_path.trim_matches('/'),
            profile,
            coords
        );
        let mut url = Url::parse(&base).map_err(|err| RoadRouteError::InvalidUrl(err.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("geometries", "geojson")
                .append_pair("overview", "full")
                .append_pair("steps", "false");
            if let Some(token) = &self.config.access_token {
                query.append_pair("access_token", token);
            }
        }
        Ok(url)
    }
}

impl RoadRouter for OsrmClient {
    type Error = RoadRouteError;

    fn route(&self, waypoints: &[LonLat], profile: TravelProfile) -> Result<RoadRoute, Self::Error> {
        if waypoints.len() < 2 {
            return Err(RoadRouteError::TooFewWaypoints(waypoints.len()));
        }

        let url = self.route_url(waypoints, profile)?;
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(RoadRouteError::Api {
                code: status.as_str().to_string(),
                message: if message.is_empty() {
                    status.canonical_reason().unwrap_or_default().to_string()
                } else {
                    message
                },
            });
        }

        let body: OsrmRouteResponse = response.json()?;
        parse_route_response(body)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: Option<OsrmGeometry>,
    distance: Option<f64>,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<LonLat>,
}

fn parse_route_response(body: OsrmRouteResponse) -> Result<RoadRoute, RoadRouteError> {
    if let Some(code) = body.code.as_deref() {
        if !code.eq_ignore_ascii_case("ok") {
            return Err(RoadRouteError::Api {
                code: code.to_string(),
                message: body.message.unwrap_or_default(),
            });
        }
    }

    let route = body.routes.into_iter().next().ok_or(RoadRouteError::NoRoute)?;
    let geometry = route.geometry.ok_or(RoadRouteError::NoRoute)?;

    Ok(RoadRoute {
        polyline: Polyline::new(geometry.coordinates),
        distance_km: route.distance.unwrap_or(0.0) / 1000.0,
        duration_min: route.duration.unwrap_or(0.0) / 60.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<RoadRoute, RoadRouteError> {
        parse_route_response(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_parses_first_route() {
        let route = parse(
            r#"{
                "code": "Ok",
                "routes": [
                    {"geometry": {"type": "LineString", "coordinates": [[77.59, 12.97], [77.60, 12.98]]},
                     "distance": 2500.0, "duration": 300.0},
                    {"geometry": {"type": "LineString", "coordinates": []}, "distance": 1.0, "duration": 1.0}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(route.polyline.points(), &[[77.59, 12.97], [77.60, 12.98]]);
        assert_eq!(route.distance_km, 2.5);
        assert_eq!(route.duration_min, 5.0);
    }

    #[test]
    fn test_missing_distance_defaults_to_zero() {
        let route = parse(r#"{"routes": [{"geometry": {"coordinates": [[0.0, 0.0], [1.0, 1.0]]}}]}"#).unwrap();
        assert_eq!(route.distance_km, 0.0);
        assert_eq!(route.duration_min, 0.0);
    }

    #[test]
    fn test_error_code_is_reported() {
        let err = parse(r#"{"code": "NoRoute", "message": "Impossible route between points", "routes": []}"#)
            .unwrap_err();
        match err {
            RoadRouteError::Api { code, message } => {
                assert_eq!(code, "NoRoute");
                assert!(message.contains("Impossible"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_routes_is_no_route() {
        assert!(matches!(parse(r#"{"code": "Ok", "routes": []}"#), Err(RoadRouteError::NoRoute)));
        assert!(matches!(parse(r#"{"code": "Ok", "routes": [{}]}"#), Err(RoadRouteError::NoRoute)));
    }

    #[test]
    fn test_route_url_layout() {
        let client = OsrmClient::new(OsrmConfig::default()).unwrap();
        let url = client
            .route_url(&[[77.5946, 12.9716], [77.6046, 12.9816]], TravelProfile::Driving)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/route/v1/driving/77.594600,12.971600;77.604600,12.981600\
             ?geometries=geojson&overview=full&steps=false"
        );
    }

    #[test]
    fn test_mapbox_url_carries_token() {
        let client = OsrmClient::new(OsrmConfig::mapbox("pk.test")).unwrap();
        let url = client
            .route_url(&[[0.0, 0.0], [1.0, 1.0]], TravelProfile::Cycling)
            .unwrap();
        assert!(url.as_str().starts_with("https://api.mapbox.com/directions/v5/mapbox/cycling/"));
        assert!(url.as_str().ends_with("access_token=pk.test"));
    }

    #[test]
    fn test_rejects_single_waypoint_without_network() {
        let client = OsrmClient::new(OsrmConfig::default()).unwrap();
        let err = client.route(&[[0.0, 0.0]], TravelProfile::Driving).unwrap_err();
        assert!(matches!(err, RoadRouteError::TooFewWaypoints(1)));
    }
}
