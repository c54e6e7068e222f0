//! Admin API handlers
//!
//! Operator endpoints for inspecting and gating arbitrary users. Every
//! handler requires the `admin` claim; the sub-router already sits behind
//! the auth middleware, so a missing flag means 403, not 401.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::auth::Claims;
use super::handlers::{
    error_response, ApiError, AppState, StatusUpdateRequest, StatusUpdateResponse,
};
use crate::limiter::SendStats;

/// Aggregate overview response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub tracked_users: i64,
    pub paused_users: i64,
    pub sends_in_window: i64,
    pub window_hours: i64,
    pub send_limit: u32,
}

fn require_admin(claims: &Claims) -> Result<(), (StatusCode, Json<ApiError>)> {
    if claims.admin {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(ApiError::new("Admin access required")),
        ))
    }
}

/// GET /api/admin/users/:user_id/send-stats - Any user's quota standing
pub async fn user_send_stats(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(user_id): Path<String>,
) -> Result<Json<SendStats>, (StatusCode, Json<ApiError>)> {
    require_admin(&claims)?;

    let stats = state
        .limiter
        .get_send_stats(&user_id)
        .await
        .map_err(error_response)?;

    Ok(Json(stats))
}

/// PATCH /api/admin/users/:user_id/status - Pause or resume any user
pub async fn set_user_status(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(user_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<StatusUpdateResponse>, (StatusCode, Json<ApiError>)> {
    require_admin(&claims)?;

    info!(
        "Admin {}: setting status of {} to {}",
        claims.sub, user_id, request.account_status
    );

    let settings = state
        .settings
        .set_account_status(&user_id, &request.account_status)
        .await
        .map_err(error_response)?;

    state.metrics.inc_status_changes();

    Ok(Json(StatusUpdateResponse {
        success: true,
        account_status: settings.account_status.as_str().to_string(),
    }))
}

/// GET /api/admin/overview - Aggregate gate statistics
pub async fn overview(
    State(state): State<Arc<AppState>>,
    claims: Claims,
) -> Result<Json<OverviewResponse>, (StatusCode, Json<ApiError>)> {
    require_admin(&claims)?;

    let tracked_users = state
        .settings
        .count_settings()
        .await
        .map_err(error_response)?;
    let paused_users = state.settings.count_paused().await.map_err(error_response)?;
    let sends_in_window = state
        .limiter
        .total_sends_in_window()
        .await
        .map_err(error_response)?;

    Ok(Json(OverviewResponse {
        tracked_users,
        paused_users,
        sends_in_window,
        window_hours: state.limiter.window().duration().num_hours(),
        send_limit: state.limiter.send_limit(),
    }))
}
