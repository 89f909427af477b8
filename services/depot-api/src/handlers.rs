use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use smartdepot_depot::{DepotError, ErrorKind, Tram, INITIALIZED_MESSAGE};
use std::sync::Arc;
use tracing::{error, info};

use crate::state::AppState;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InitializeRequest {
    #[serde(alias = "N")]
    pub n: i64,
    #[serde(alias = "C")]
    pub c: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// Depot failure rendered as `{"msg": ...}` with a status matching its kind.
pub struct ApiError(DepotError);

impl From<DepotError> for ApiError {
    fn from(err: DepotError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict | ErrorKind::Exhaustion => StatusCode::CONFLICT,
            ErrorKind::Internal => {
                error!("Internal depot failure: {}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(MessageResponse::new(self.0.to_string()))).into_response()
    }
}

pub async fn initialize_trams(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InitializeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.coordinator.initialize(request.n, request.c).await?;
    Ok(Json(MessageResponse::new(INITIALIZED_MESSAGE)))
}

pub async fn list_trams(State(state): State<Arc<AppState>>) -> Json<Vec<Tram>> {
    Json(state.coordinator.list_trams())
}

pub async fn assign_mission(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let assignment = state.coordinator.assign_mission().await?;
    info!("Responding with assignment of tram #{}", assignment.tram_index);
    Ok(Json(MessageResponse::new(assignment.to_string())))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "depot-api",
        "timestamp": Utc::now().to_rfc3339(),
        "hold_policy": state.coordinator.config().hold,
        "depot": state.coordinator.status(),
    }))
}
