use axum::{
    debug_handler,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use rand::Rng;
use shared::api::{AnnounceResponse, SpinResponse, UserRequest, UserStatusQuery, UserStatusResponse};
use shared::Prize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/user", post(announce_user))
        .route("/get_user_status", get(get_user_status))
        .route("/spin", post(spin))
        .route("/prizes", get(list_prizes))
}

fn valid_user(user_id: Option<i64>) -> Result<i64, ApiError> {
    match user_id {
        Some(id) if id > 0 => Ok(id),
        _ => Err(ApiError::MissingUser),
    }
}

#[debug_handler]
async fn announce_user(
    State(state): State<AppState>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<AnnounceResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::InvalidData)?;
    let user_id = valid_user(Some(request.user_id))?;
    state.store.announce(user_id).await?;

    Ok(Json(AnnounceResponse {
        status: "ok".to_string(),
        message: format!("User {} acknowledged.", user_id),
    }))
}

#[debug_handler]
async fn get_user_status(
    State(state): State<AppState>,
    query: Result<Query<UserStatusQuery>, QueryRejection>,
) -> Result<Json<UserStatusResponse>, ApiError> {
    let Query(query) = query.map_err(|_| ApiError::InvalidData)?;
    let user_id = valid_user(query.user_id)?;
    let record = state.store.record(user_id).await;

    Ok(Json(UserStatusResponse {
        attempts_left: record.attempts_left(state.config.max_attempts),
        gifts: record.gifts,
    }))
}

#[debug_handler]
async fn spin(
    State(state): State<AppState>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<SpinResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::InvalidData)?;
    let user_id = valid_user(Some(request.user_id))?;

    let catalog = state.catalog.clone();
    let mut drawn_index = 0;
    let (won_prize, attempts_left) = state
        .store
        .spin(user_id, state.config.max_attempts, || {
            drawn_index = rand::thread_rng().gen_range(0..catalog.len());
            catalog
                .get(drawn_index)
                .cloned()
                .unwrap_or_else(|| Prize::new("Empty", None, 0))
        })
        .await?;

    if won_prize.is_win() {
        info!(
            "🎰 user {} won {} ({}⭐), {} attempts left",
            user_id, won_prize.name, won_prize.value, attempts_left
        );
    } else {
        debug!("user {} landed on an empty slot", user_id);
    }

    Ok(Json(SpinResponse {
        won_prize,
        attempts_left,
        prize_index: Some(drawn_index),
    }))
}

async fn list_prizes(State(state): State<AppState>) -> Json<Vec<Prize>> {
    Json(state.catalog.as_slice().to_vec())
}
