use std::sync::Arc;

use axum::{http::HeaderValue, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::config;
use crate::export::RecordSource;
use crate::handlers::{health, jobseekers};
use crate::middleware::jwt_auth_middleware;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RecordSource>,
    /// Cancelled when the server starts shutting down; exports watch a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            shutdown: CancellationToken::new(),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health::health))
        // Protected API
        .merge(jobseeker_routes())
        .layer(cors_layer());

    if config().api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn jobseeker_routes() -> Router<AppState> {
    Router::new()
        .route("/api/jobseekers", get(jobseekers::jobseekers_list))
        .route("/api/jobseekers/export", get(jobseekers::jobseekers_export))
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let security = &config().security;
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new().allow_origin(AllowOrigin::list(origins))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Jobseeker API",
            "version": version,
            "description": "Jobseeker registry with filtered listing and CSV export",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "list": "/api/jobseekers?page=&page_size=&order=&<filters> (protected)",
                "export": "/api/jobseekers/export?<filters> (protected, admin)",
            }
        }
    }))
}
