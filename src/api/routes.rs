//! API Route Configuration

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};
use super::middleware::{logging_middleware, rate_limit_middleware};

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - the quiz front-end lives on another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health & Status
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        // Quiz flow
        .route("/quiz/start", post(handlers::start_quiz))
        .route("/quiz/:id", get(handlers::get_session))
        .route("/quiz/:id/answer", post(handlers::select_answer))
        .route("/quiz/:id/advance", post(handlers::advance))
        .route("/quiz/:id/retreat", post(handlers::retreat))
        // Classification preview
        .route("/classify", post(handlers::classify_preview))
        // Funnel
        .route("/waitlist/signup", post(handlers::waitlist_signup))
        .route("/survey", post(handlers::submit_survey));

    // Build full router
    Router::new()
        .nest("/v1", api_v1)
        // Also expose at root for convenience
        .route("/health", get(handlers::health_check))
        .with_state(state)
        // Middleware (order matters - bottom runs first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(rate_limit_middleware))
}
