// Router - Route table and HTTP layers
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_config, get_display, health_check, post_display_command, post_display_key, proxy_dashboard,
    save_config, test_connection, uptimekuma_data,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/test-connection", get(test_connection))
        .route("/api/config", get(get_config).post(save_config))
        .route("/api/display", get(get_display))
        .route("/api/display/command", post(post_display_command))
        .route("/api/display/key", post(post_display_key))
        .route("/api/uptimekuma-data", get(uptimekuma_data))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/healthz", get(health_check))
        .route("/proxy/*target", get(proxy_dashboard))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
