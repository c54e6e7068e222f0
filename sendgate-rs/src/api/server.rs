//! API Server - HTTP server for REST API

use axum::{
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::admin;
use crate::api::auth::{Claims, JwtConfig};
use crate::api::handlers::{self, ApiError, AppState};
use crate::api::Metrics;
use crate::config::Config;
use crate::limiter::SendLimiter;
use crate::settings::SettingsManager;

/// API Server configuration
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        let state = Arc::new(AppState {
            limiter: SendLimiter::new(db.clone(), &config.quota),
            settings: SettingsManager::new(db),
            jwt_config: JwtConfig::new(
                config.auth.jwt_secret.clone(),
                config.auth.token_expiry_hours,
            ),
            metrics: Metrics::new(),
        });

        Self {
            state,
            addr: config.server.listen_addr.clone(),
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        // CORS configuration
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        // Mode polling must stay reachable without a valid token
        let public_routes = Router::new().route("/settings/mode", get(handlers::get_mode));

        // Protected routes (auth required)
        let protected_routes = Router::new()
            .route("/applications/send-stats", get(handlers::send_stats))
            .route("/applications/sends", post(handlers::record_send))
            .route("/settings/status", patch(handlers::set_account_status))
            .route(
                "/settings/application-mode",
                patch(handlers::set_application_mode),
            )
            .route_layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth_middleware,
            ));

        // Admin routes (auth required, admin claim checked per handler)
        let admin_routes = Router::new()
            .route("/users/:user_id/send-stats", get(admin::user_send_stats))
            .route("/users/:user_id/status", patch(admin::set_user_status))
            .route("/overview", get(admin::overview))
            .route_layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth_middleware,
            ));

        // Combine all routes
        Router::new()
            .route("/health", get(handlers::health))
            .route("/metrics", get(handlers::metrics))
            .nest("/api", public_routes.merge(protected_routes))
            .nest("/api/admin", admin_routes)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

/// Authentication middleware - validates JWT token
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    // Extract Authorization header
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        _ => {
            state.metrics.inc_auth_failures();
            warn!("Missing or invalid Authorization header");
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiError::new("Missing or invalid Authorization header")),
            )
                .into_response();
        }
    };

    // Validate token
    match state.jwt_config.validate_token(token) {
        Ok(claims) => {
            // Store claims in request extensions for handlers
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(_) => {
            state.metrics.inc_auth_failures();
            warn!("Invalid JWT token");
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiError::new("Invalid or expired token")),
            )
                .into_response()
        }
    }
}

/// Extract Claims from request (for handlers)
#[axum::async_trait]
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiError>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Claims>().cloned().ok_or((
            StatusCode::UNAUTHORIZED,
            Json(ApiError::new("Not authenticated")),
        ))
    }
}
