use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the webhook router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/_/health", get(handlers::health_check))
        // Provider webhooks
        .route("/answer", get(handlers::answer))
        .route("/event", get(handlers::event).post(handlers::event))
        .route("/rtc", post(handlers::rtc))
        // Manual outbound trigger
        .route("/call", get(handlers::call))
        // Streaming endpoint callbacks
        .route("/results", post(handlers::results))
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
