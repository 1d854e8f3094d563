//! HTTP API handlers: index page, scene catalog, client configuration

use std::sync::Arc;

use axum::{Json, extract::State, response::Html};
use serde_json::{Value, json};

use crate::scenes::SceneCatalog;
use crate::state::AppState;

/// Placeholder application page. The real front-end is served separately;
/// this keeps `GET /` responding for health probes and manual checks.
const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Lingo Gateway</title>
</head>
<body>
  <h1>Lingo Gateway</h1>
  <p>English conversation practice gateway is running.</p>
</body>
</html>
"#;

/// `GET /` - serve the main application page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /api/scenes` - the full scene/role catalog
pub async fn get_scenes(State(state): State<Arc<AppState>>) -> Json<SceneCatalog> {
    Json(state.catalog.clone())
}

/// `GET /api/config` - client audio settings and supported languages
pub async fn get_config() -> Json<Value> {
    Json(json!({
        "audio_settings": {
            "sampleRate": 16000,
            "channelCount": 1,
            "echoCancellation": true,
            "noiseSuppression": true,
        },
        "supported_languages": ["ja", "en"],
    }))
}
