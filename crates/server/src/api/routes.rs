use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::{handlers, videos};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config().server.cors_origins);
    let static_dir = state.config().server.static_dir.clone();

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Library
        .route("/videos", get(videos::list_videos))
        .route(
            "/videos/{filename}",
            get(videos::stream_video).head(videos::stream_video),
        )
        .route("/video-info/{filename}", get(videos::video_info))
        .route("/movies/{id}/video", get(videos::movie_video));

    let app = Router::new()
        .nest("/api", api_routes)
        // Player-facing stream URL
        .route(
            "/videos/{filename}",
            get(videos::stream_video).head(videos::stream_video),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Serve the front-end with SPA fallback
    match static_dir {
        Some(dir) if dir.exists() => {
            info!("Serving static files from {}", dir.display());
            let index_path = dir.join("index.html");
            app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            )
        }
        Some(dir) => {
            warn!("Static directory {} does not exist, not serving it", dir.display());
            app
        }
        None => app,
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::RANGE])
        .expose_headers([
            header::CONTENT_RANGE,
            header::CONTENT_LENGTH,
            header::ACCEPT_RANGES,
        ]);

    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    base.allow_origin(allowed)
}
