use crate::{handlers, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        // Transforms
        .route("/analyze", post(handlers::analyze))
        .route("/explain", post(handlers::explain))
        // Discovery
        .route("/health", get(handlers::health))
        .route("/modes", get(handlers::modes))
        .route("/languages", get(handlers::languages))
        .with_state(state)
        // Submitted code is passed through whole; axum's 2 MB default is too small
        .layer(DefaultBodyLimit::max(body_limit))
        // The browser UI is served from another origin
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(TraceLayer::new_for_http())
}
