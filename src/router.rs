use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::post,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{controller::upload::upload_media, state::AppState};

/// Builds the HTTP router for the upload relay.
///
/// Cross-origin callers are restricted to the configured allow-list and to
/// `POST`, matching what the uploader page needs and nothing more.
pub fn router(state: AppState) -> Router {
    let mut origins: Vec<HeaderValue> = Vec::new();
    for origin in &state.config.allowed_origins {
        match origin.parse() {
            Ok(value) => origins.push(value),
            Err(_) => tracing::warn!("Ignoring unparseable allowed origin '{}'", origin),
        }
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::POST])
        .allow_origin(AllowOrigin::list(origins));

    // Room for a batch of capped files plus multipart framing.
    let body_limit = DefaultBodyLimit::max(state.config.max_file_size.saturating_mul(10) as usize);

    Router::new()
        .route("/upload-media", post(upload_media))
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}
