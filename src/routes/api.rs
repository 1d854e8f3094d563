use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::api;
use crate::state::AppState;
use std::sync::Arc;

/// Create the HTTP API router
///
/// # Endpoints
///
/// - `GET /` - main application page
/// - `GET /api/scenes` - scene/role catalog
/// - `GET /api/config` - client audio settings and supported languages
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api::index))
        .route("/api/scenes", get(api::get_scenes))
        .route("/api/config", get(api::get_config))
        .layer(TraceLayer::new_for_http())
}
