//! # Aurathent HTTP API Module
//!
//! This module implements the JSON HTTP API server using axum.
//!
//! ## Endpoints
//!
//! - `POST /api/breath/log` - Breath-weighted transmutation (recorded)
//! - `POST /api/transmute` - Mana, aura and lapis reading
//! - `POST /api/logic/process` - Logic router (paradox + hope chain)
//! - `POST /api/emotion/log` - Emotion pulse on the timeline
//! - `POST /api/memory/log` - Memory event anchored on the timeline
//! - `POST /api/memory/store` - Free-form memory record
//! - `POST /api/humor/analyze` - Humor paradox reading
//! - `POST /api/humor/signal` - Humor authenticity signal
//! - `POST /api/virtue/update` - Virtue increment, aura and scroll path
//! - `GET /api/...` - Read views over logs, profiles, memories and history
//! - `GET /` and `GET /health` - Health check
//!
//! ## Security Configuration
//!
//! Allowed CORS origins come from `Config::cors_origins` (see [`CorsPolicy`]).
//! The remaining knobs are environment variables:
//!
//! - `AURATHENT_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `AURATHENT_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::get_api_key_from_env;
pub use handlers::ApiError;
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
pub use types::*;

use crate::scroll::ScrollTree;
use aurathent_core::{AurathentError, Engine};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the engine and the scroll tree.
#[derive(Clone)]
pub struct AppState {
    /// The engine; the write lock serializes all mutations.
    pub engine: Arc<RwLock<Engine>>,
    /// Virtue evolution stages, read-only after startup.
    pub scrolls: Arc<ScrollTree>,
    /// Browser origins allowed by the CORS layer.
    pub cors: CorsPolicy,
}

impl AppState {
    /// Create new app state with an empty scroll tree.
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self::with_scrolls(engine, ScrollTree::default())
    }

    #[must_use]
    pub fn with_scrolls(engine: Engine, scrolls: ScrollTree) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            scrolls: Arc::new(scrolls),
            cors: CorsPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_cors(mut self, cors: CorsPolicy) -> Self {
        self.cors = cors;
        self
    }
}

// =============================================================================
// CORS POLICY
// =============================================================================

/// Origins of the local UI and of this service on its default port.
const LOCALHOST_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5001",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5001",
];

/// Which browser origins may call the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Local development origins only.
    #[default]
    Localhost,
    /// Any origin (`*`).
    Any,
    /// An explicit allow-list.
    Origins(Vec<String>),
}

impl CorsPolicy {
    /// Policy for the configured origin list. `*` anywhere allows all;
    /// an empty list means localhost only.
    pub fn from_origins(origins: &[String]) -> Self {
        if origins.iter().any(|o| o == "*") {
            Self::Any
        } else if origins.is_empty() {
            Self::Localhost
        } else {
            Self::Origins(origins.to_vec())
        }
    }

    fn layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = match self {
            Self::Any => {
                tracing::warn!("CORS: allowing ALL origins; do not use this in production");
                return CorsLayer::permissive();
            }
            Self::Localhost => LOCALHOST_ORIGINS
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect(),
            Self::Origins(list) => {
                let parsed: Vec<HeaderValue> = list
                    .iter()
                    .filter_map(|origin| match origin.parse::<HeaderValue>() {
                        Ok(value) => Some(value),
                        Err(e) => {
                            tracing::warn!(origin = %origin, error = %e, "CORS: ignoring invalid origin");
                            None
                        }
                    })
                    .collect();
                if parsed.is_empty() {
                    tracing::warn!("CORS: no valid origins configured, using localhost only");
                    return Self::Localhost.layer();
                }
                parsed
            }
        };

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    }
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
/// 5. Authentication (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = state.cors.layer();
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set AURATHENT_API_KEY to enable authentication."
        );
    }

    let mut router = Router::new()
        .route("/", get(handlers::health_handler))
        .route("/health", get(handlers::health_handler))
        .route("/api/breath/log", post(handlers::breath_log_handler))
        .route("/api/transmute", post(handlers::transmute_handler))
        .route(
            "/api/transmute/history/{user_id}",
            get(handlers::history_handler),
        )
        .route("/api/logic/process", post(handlers::logic_process_handler))
        .route("/api/emotion/log", post(handlers::emotion_log_handler))
        .route(
            "/api/emotion/interval/{user_id}",
            get(handlers::interval_handler),
        )
        .route("/api/humor/analyze", post(handlers::humor_analyze_handler))
        .route("/api/humor/signal", post(handlers::humor_signal_handler))
        .route("/api/memory/log", post(handlers::memory_log_handler))
        .route("/api/memory/store", post(handlers::memory_store_handler))
        .route(
            "/api/memory/{user_id}",
            get(handlers::filter_memories_handler),
        )
        .route(
            "/api/memory/{user_id}/recent",
            get(handlers::recent_memories_handler),
        )
        .route("/api/virtue/update", post(handlers::virtue_update_handler))
        .route("/api/virtue/{user_id}", get(handlers::profile_handler))
        .route("/api/logs/{user_id}", get(handlers::logs_handler))
        .route(
            "/api/logs/{user_id}/export",
            get(handlers::export_logs_handler),
        );

    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(axum::extract::DefaultBodyLimit::max(BODY_LIMIT_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Bind and serve until the process stops.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), AurathentError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AurathentError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Aurathent HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| AurathentError::IoError(format!("Server error: {}", e)))
}
