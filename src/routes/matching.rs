use crate::error::{ServerError, ServerResult};
use crate::mbti::Mbti;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Match request body
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    /// Requesting user
    pub user_id: String,

    /// MBTI code, case-insensitive
    pub mbti: String,

    /// Expansion level: 1 best, 2 good, 3 average, 4 everyone
    #[serde(default = "default_level")]
    pub level: u8,
}

/// Cancel request body
#[derive(Debug, Deserialize)]
pub struct MatchCancelRequest {
    pub user_id: String,
    pub mbti: String,
}

fn default_level() -> u8 {
    1
}

fn parse_mbti(raw: &str) -> ServerResult<Mbti> {
    Ok(raw.parse::<Mbti>()?)
}

/// Register a user in the match queue, or pair them right away
pub async fn request_match(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MatchRequest>,
) -> ServerResult<impl IntoResponse> {
    let mbti = parse_mbti(&request.mbti)?;

    if request.user_id.is_empty() {
        return Err(ServerError::BadRequest("user_id must not be empty".into()));
    }
    if !(1..=4).contains(&request.level) {
        return Err(ServerError::BadRequest(format!(
            "level must be between 1 and 4, got {}",
            request.level
        )));
    }

    let result = state
        .coordinator
        .request_match(&request.user_id, mbti, request.level)
        .await?;

    Ok(Json(result))
}

/// Remove a user from the match queue
pub async fn cancel_match(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MatchCancelRequest>,
) -> ServerResult<impl IntoResponse> {
    let mbti = parse_mbti(&request.mbti)?;

    let result = state
        .coordinator
        .cancel_match(&request.user_id, mbti)
        .await?;

    Ok(Json(result))
}

/// Current waiting count for one MBTI queue (diagnostic)
pub async fn queue_status(
    State(state): State<Arc<AppState>>,
    Path(mbti): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let mbti = parse_mbti(&mbti)?;

    let waiting_count = state.coordinator.waiting_count(mbti).await?;

    Ok(Json(json!({
        "mbti": mbti,
        "waiting_count": waiting_count,
    })))
}
