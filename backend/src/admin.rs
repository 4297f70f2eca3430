use std::collections::HashMap;

use axum::{
    debug_handler,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use shared::api::{AddAttemptRequest, AddAttemptResponse, AdminQuery};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::store::UserRecord;
use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/add_attempt", post(add_attempt))
        .route("/user_data", get(user_data))
}

fn require_admin(state: &AppState, admin_id: Option<i64>) -> Result<(), ApiError> {
    match (state.config.admin_id, admin_id) {
        (Some(expected), Some(given)) if expected == given => Ok(()),
        _ => {
            warn!("rejected admin request from {:?}", admin_id);
            Err(ApiError::Forbidden)
        }
    }
}

#[debug_handler]
async fn add_attempt(
    State(state): State<AppState>,
    payload: Result<Json<AddAttemptRequest>, JsonRejection>,
) -> Result<Json<AddAttemptResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::InvalidData)?;
    require_admin(&state, Some(request.admin_id))?;
    if request.user_id <= 0 {
        return Err(ApiError::MissingUser);
    }

    let attempts = state
        .store
        .add_attempt(request.user_id, state.config.max_attempts)
        .await?;
    info!("admin granted user {} an attempt ({} left)", request.user_id, attempts);

    Ok(Json(AddAttemptResponse {
        success: true,
        attempts,
    }))
}

#[debug_handler]
async fn user_data(
    State(state): State<AppState>,
    query: Result<Query<AdminQuery>, QueryRejection>,
) -> Result<Json<HashMap<String, UserRecord>>, ApiError> {
    let Query(query) = query.map_err(|_| ApiError::InvalidData)?;
    require_admin(&state, query.admin_id)?;
    Ok(Json(state.store.snapshot().await))
}
