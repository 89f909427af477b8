//! Test utilities for depot integration tests

use smartdepot_api::{create_router, AppState, Config};
use smartdepot_depot::{CoordinatorConfig, DepotError, HoldPolicy, MissionCoordinator, TramIndex};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Once};
use tokio::time::Duration;

static TRACING: Once = Once::new();

/// Install a test subscriber once per process; honours `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Coordinator settings with delays short enough for real-clock tests
pub fn fast_config(hold: HoldPolicy) -> CoordinatorConfig {
    CoordinatorConfig {
        hold,
        planning_delay: Duration::from_millis(20),
        lockout_delay: Duration::from_millis(40),
        ..CoordinatorConfig::default()
    }
}

/// Shared coordinator for direct (non-HTTP) tests
pub fn shared_coordinator(config: CoordinatorConfig) -> Arc<MissionCoordinator> {
    Arc::new(MissionCoordinator::new(config))
}

/// Outcome of one caller that keeps retrying until the depot runs dry
#[derive(Debug, Default)]
pub struct CallerReport {
    pub assigned: Vec<TramIndex>,
    pub conflicts: usize,
}

/// Assign missions until the pool is exhausted, backing off on contention.
pub async fn assign_until_exhausted(
    coordinator: Arc<MissionCoordinator>,
    backoff: Duration,
) -> CallerReport {
    let mut report = CallerReport::default();
    loop {
        match coordinator.assign_mission().await {
            Ok(assignment) => report.assigned.push(assignment.tram_index),
            Err(DepotError::PlanningInProgress) => {
                report.conflicts += 1;
                tokio::time::sleep(backoff).await;
            }
            Err(DepotError::NoAvailableTram) => return report,
            Err(other) => panic!("unexpected depot error: {other}"),
        }
    }
}

/// Start a depot API server on an ephemeral port and return its base URL.
pub async fn start_depot_server(coordinator: CoordinatorConfig) -> String {
    let addr: std::net::SocketAddr = "127.0.0.1:0".parse().unwrap();
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let local_addr = listener.local_addr().unwrap();
    let server_url = format!("http://{}", local_addr);

    let state = Arc::new(AppState::new(Config {
        bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: local_addr.port(),
        coordinator,
    }));
    let app = create_router(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    server_url
}
