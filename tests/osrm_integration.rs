//! Road routing against a live OSRM container.
//!
//! Needs docker and an MLD-prepared OSRM dataset covering Bengaluru, e.g. the
//! Geofabrik `asia/india/southern-zone` extract run through
//! `osrm-extract`/`osrm-partition`/`osrm-customize`. Point `OSRM_DATA_DIR`
//! at the directory holding it and `OSRM_DATASET` at the `.osrm` file name.

mod fixtures;

use std::env;
use std::path::PathBuf;

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, ReuseDirective, TestcontainersError};

use waste_route_planner::model::RoutePlanSettings;
use waste_route_planner::osrm::{OsrmClient, OsrmConfig, RoadRouteError};
use waste_route_planner::planner::{plan_route, refine_with_road_route};
use waste_route_planner::traits::{RoadRouter, TravelProfile};

use fixtures::{bins_at, TestPicker, CENTRAL_SITES, DEPOTS};

fn osrm_container() -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let data_dir = PathBuf::from(env::var("OSRM_DATA_DIR").unwrap_or_else(|_| "osrm-data".to_string()));
    let dataset = env::var("OSRM_DATASET").unwrap_or_else(|_| "southern-zone-latest.osrm".to_string());
    if !data_dir.join(&dataset).exists() {
        return Err(TestcontainersError::other(format!(
            "OSRM dataset {} not found in {}",
            dataset,
            data_dir.display()
        )));
    }

    let data_dir = data_dir
        .canonicalize()
        .map_err(|err| TestcontainersError::other(format!("bad OSRM data dir: {}", err)))?;

    let image = GenericImage::new("osrm/osrm-backend", "latest")
        .with_exposed_port(5000.tcp())
        .with_mount(Mount::bind_mount(
            data_dir.to_string_lossy().to_string(),
            "/data",
        ))
        .with_cmd(vec![
            "osrm-routed".to_string(),
            "--algorithm".to_string(),
            "mld".to_string(),
            format!("/data/{}", dataset),
        ])
        .with_container_name("osrm-bengaluru-mld")
        .with_startup_timeout(std::time::Duration::from_secs(60))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(5000.tcp())?;
    let base_url = format!("http://127.0.0.1:{}", port);

    Ok((container, base_url))
}

fn route_with_retry(client: &OsrmClient) -> Result<(), RoadRouteError> {
    let waypoints = [DEPOTS[0].point().to_lon_lat(), CENTRAL_SITES[0].point().to_lon_lat()];
    let start = std::time::Instant::now();
    loop {
        match client.route(&waypoints, TravelProfile::Driving) {
            Ok(_) => return Ok(()),
            Err(err) if start.elapsed() > std::time::Duration::from_secs(15) => return Err(err),
            Err(_) => std::thread::sleep(std::time::Duration::from_millis(500)),
        }
    }
}

#[test]
#[ignore = "requires docker and a prepared OSRM dataset"]
fn osrm_refines_planned_route() {
    let (container, base_url) = osrm_container().expect("start OSRM container");

    let client = OsrmClient::new(OsrmConfig {
        base_url,
        ..OsrmConfig::default()
    })
    .expect("build OSRM client");
    route_with_retry(&client).expect("OSRM did not become ready");

    let picker = TestPicker::new("picker-1").located(&DEPOTS[0]).build();
    let bins = bins_at(CENTRAL_SITES);
    let plan = plan_route(&picker, &bins, &RoutePlanSettings::default());
    assert!(!plan.is_empty());

    let refined = refine_with_road_route(plan.clone(), &client, TravelProfile::Driving);

    assert_ne!(refined.route, plan.route, "expected road geometry");
    assert!(refined.route.len() > plan.route.len());
    // Roads are never shorter than the straight line through the same stops.
    assert!(refined.total_distance_km >= plan.total_distance_km * 0.99);
    assert!(refined.estimated_time_min > 0.0);
    assert_eq!(refined.order, plan.order);

    drop(container);
}

#[test]
#[ignore = "requires docker and a prepared OSRM dataset"]
fn osrm_rejects_single_waypoint() {
    let (container, base_url) = osrm_container().expect("start OSRM container");
    let client = OsrmClient::new(OsrmConfig {
        base_url,
        ..OsrmConfig::default()
    })
    .expect("build OSRM client");

    let err = client
        .route(&[DEPOTS[0].point().to_lon_lat()], TravelProfile::Driving)
        .unwrap_err();
    assert!(matches!(err, RoadRouteError::TooFewWaypoints(1)));

    drop(container);
}
