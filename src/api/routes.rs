use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::category::Category;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size as usize;

    let mut router = Router::new()
        // Text-only categories, matched by slug (English or legacy Portuguese)
        .route("/api/:category", post(handlers::create_record))
        .route("/api/:category", get(handlers::list_records))
        // Attachment download
        .route("/uploads/:filename", get(handlers::serve_attachment))
        // Internal
        .route("/_internal/health", get(handlers::health));

    // Geometry takes a multipart body (file upload), so it gets dedicated
    // routes under both of its slugs. Static segments win over the
    // ":category" routes above.
    let geometry = Category::Geometry;
    for slug in [geometry.slug(), geometry.legacy_slug()] {
        let path = format!("/api/{slug}");
        router = router
            .route(
                &path,
                post(handlers::create_geometry_record).layer(DefaultBodyLimit::max(upload_limit)),
            )
            .route(&path, get(handlers::list_geometry_records));
    }

    // Test-only routes
    if state.config.test_mode {
        tracing::warn!("Test mode enabled — purge route is available.");
        router = router.route("/admin/purge", delete(handlers::admin_purge));
    }

    // The legacy API was served to browser frontends from arbitrary origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
