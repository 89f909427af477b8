//! SmartDepot HTTP API
//!
//! Thin axum layer over [`smartdepot_depot::MissionCoordinator`]. Validation
//! failures answer 400, contention and exhaustion answer 409.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub mod config;
pub mod handlers;
pub mod state;

pub use config::{Config, ConfigError};
pub use state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/trams", get(handlers::list_trams))
        .route("/trams/initialize", post(handlers::initialize_trams))
        .route("/trams/assign-mission", post(handlers::assign_mission));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api)
        .with_state(state)
}
