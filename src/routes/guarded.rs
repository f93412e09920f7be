use crate::{AppState, guard::route_guard};
use axum::{Router, middleware};
use tower_http::services::ServeDir;

/// Guarded Router Module
///
/// The sign-in pages and the whole admin tree. Every request under these
/// prefixes goes through [`route_guard`] before a page is served; the guard
/// alone decides which of the two trees a session may see.
pub fn guarded_routes(state: &AppState) -> Router<AppState> {
    // Mounted on full paths (no nesting) so directory redirects keep their prefix.
    // The route patterns pin each request under `SITE_DIR/auth` or `SITE_DIR/admin`;
    // `ServeDir` refuses `..` segments, so it cannot climb out of them.
    let pages = ServeDir::new(&state.config.site_dir);

    Router::new()
        // /auth/**
        // Sign-in and sign-up pages. Reachable only without a valid session.
        .route_service("/auth", pages.clone())
        .route_service("/auth/", pages.clone())
        .route_service("/auth/{*page}", pages.clone())
        // /admin and /admin/**
        // Access-request page for members, dashboard tree for admins.
        .route_service("/admin", pages.clone())
        .route_service("/admin/", pages.clone())
        .route_service("/admin/{*page}", pages)
        .route_layer(middleware::from_fn_with_state(state.clone(), route_guard))
}
