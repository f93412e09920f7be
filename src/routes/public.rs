use crate::{AppState, session, theme};
use axum::{
    Router,
    routing::get,
};
use tower_http::services::ServeDir;

/// Public Router Module
///
/// Endpoints with no guard in front of them. The blog and portfolio pages are
/// served from `SITE_DIR/public` as the fallback, so any path not claimed by
/// another router (including odd spellings of `/auth` or `/admin`) lands in a
/// tree that does not contain the guarded pages.
pub fn public_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // POST /logout
        // Clears both session cookies and returns to sign-in. Mounted outside the
        // guard so it works whatever the session state.
        .route("/logout", get(session::logout).post(session::logout))
        // GET/PUT /preferences/theme
        // Reads or persists the dark-mode preference cookie.
        .route(
            "/preferences/theme",
            get(theme::get_theme).put(theme::set_theme),
        )
        .fallback_service(ServeDir::new(state.config.public_dir()))
}
