//! API request handlers

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use crate::api::auth::{bearer_token, Claims, JwtConfig};
use crate::api::Metrics;
use crate::error::GateError;
use crate::limiter::{SendLimiter, SendRecord, SendStats};
use crate::settings::{AccountStatus, ApplicationMode, SettingsManager};

/// Shared application state
pub struct AppState {
    pub limiter: SendLimiter,
    pub settings: SettingsManager,
    pub jwt_config: JwtConfig,
    pub metrics: Metrics,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

/// Map a gate error onto an HTTP response.
///
/// Branches on the error kind, never on message text. Database, config
/// and parse failures are logged server-side and surface as a generic
/// 500 so internals stay out of responses.
pub fn error_response(err: GateError) -> (StatusCode, Json<ApiError>) {
    let status = match &err {
        GateError::Unauthenticated => StatusCode::UNAUTHORIZED,
        GateError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        GateError::NotFound(_) => StatusCode::NOT_FOUND,
        GateError::Database(_) | GateError::Config(_) | GateError::Parse(_) => {
            error!("Request failed: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("Internal server error")),
            );
        }
    };

    (status, Json(ApiError::new(&err.to_string())))
}

/// Status update request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub account_status: String,
}

/// Status update response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub account_status: String,
}

/// Mode update request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeUpdateRequest {
    pub application_mode: String,
}

/// Mode update response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeUpdateResponse {
    pub success: bool,
    pub application_mode: String,
}

/// Mode poll response
#[derive(Debug, Serialize)]
pub struct ModeResponse {
    pub mode: String,
    pub status: String,
}

/// GET /api/applications/send-stats - Caller's quota standing
pub async fn send_stats(
    State(state): State<Arc<AppState>>,
    claims: Claims,
) -> Result<Json<SendStats>, (StatusCode, Json<ApiError>)> {
    state.metrics.inc_stats_requests();

    let stats = state
        .limiter
        .get_send_stats(&claims.sub)
        .await
        .map_err(error_response)?;

    if !stats.allowed {
        state.metrics.inc_sends_denied();
    }

    Ok(Json(stats))
}

/// POST /api/applications/sends - Record a completed send
pub async fn record_send(
    State(state): State<Arc<AppState>>,
    claims: Claims,
) -> Result<(StatusCode, Json<SendRecord>), (StatusCode, Json<ApiError>)> {
    let record = state
        .limiter
        .record_send(&claims.sub)
        .await
        .map_err(error_response)?;

    state.metrics.inc_sends_recorded();

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/settings/mode - Application mode and account status.
///
/// Never fails: a missing token, a bad token or a read error all resolve
/// to the defaults so polling clients keep working. This route sits
/// outside the auth middleware for that reason.
pub async fn get_mode(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<ModeResponse> {
    if let Some(token) = bearer_token(&headers) {
        if let Ok(claims) = state.jwt_config.validate_token(token) {
            match state.settings.resolve_or_default(&claims.sub).await {
                Ok(settings) => {
                    return Json(ModeResponse {
                        mode: settings.application_mode.as_str().to_string(),
                        status: settings.account_status.as_str().to_string(),
                    })
                }
                Err(e) => warn!("Mode lookup failed for {}: {}", claims.sub, e),
            }
        }
    }

    Json(ModeResponse {
        mode: ApplicationMode::default().as_str().to_string(),
        status: AccountStatus::default().as_str().to_string(),
    })
}

/// PATCH /api/settings/status - Pause or resume the caller's account
pub async fn set_account_status(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<StatusUpdateResponse>, (StatusCode, Json<ApiError>)> {
    let settings = state
        .settings
        .set_account_status(&claims.sub, &request.account_status)
        .await
        .map_err(error_response)?;

    state.metrics.inc_status_changes();

    Ok(Json(StatusUpdateResponse {
        success: true,
        account_status: settings.account_status.as_str().to_string(),
    }))
}

/// PATCH /api/settings/application-mode - Switch between MANUAL and AUTO
pub async fn set_application_mode(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Json(request): Json<ModeUpdateRequest>,
) -> Result<Json<ModeUpdateResponse>, (StatusCode, Json<ApiError>)> {
    let settings = state
        .settings
        .set_application_mode(&claims.sub, &request.application_mode)
        .await
        .map_err(error_response)?;

    Ok(Json(ModeUpdateResponse {
        success: true,
        application_mode: settings.application_mode.as_str().to_string(),
    }))
}

/// Health check endpoint with detailed status
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    use std::time::SystemTime;

    // Check database connectivity
    let db_healthy = state.limiter.health_check().await.is_ok();

    let status = if db_healthy { "healthy" } else { "unhealthy" };
    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": status,
            "service": "sendgate-rs",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap()
                .as_secs(),
            "checks": {
                "database": if db_healthy { "ok" } else { "failed" }
            }
        })),
    )
}

/// GET /metrics - Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        state.metrics.to_prometheus(),
    )
}
