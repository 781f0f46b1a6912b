pub mod protocol;
pub mod quiz_task;
pub mod rest;
pub mod state;
pub mod ws_handler;

// Re-export the handlers to make them easily accessible
// to the binary that builds the web server router.
pub use rest::{
    clear_high_scores_handler, get_settings_handler, list_high_scores_handler,
    put_settings_handler,
};
pub use ws_handler::ws_handler;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

/// Builds the API router: REST endpoints plus the quiz WebSocket.
pub fn router(app_state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route(
            "/settings",
            get(get_settings_handler).put(put_settings_handler),
        )
        .route(
            "/high-scores",
            get(list_high_scores_handler).delete(clear_high_scores_handler),
        )
        .route("/ws", get(ws_handler));

    let router = match app_state.config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::PUT, Method::DELETE, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE, ACCEPT]),
        ),
        Err(_) => {
            warn!(
                "CORS_ORIGIN '{}' is not a valid header value; CORS disabled.",
                app_state.config.cors_origin
            );
            router
        }
    };

    router.with_state(app_state)
}
