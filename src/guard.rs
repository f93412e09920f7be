use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    AppState, session,
    verify::SessionVerifier,
    zones::{Zone, ZoneTable},
};

/// Decision
///
/// Outcome of one guard evaluation. Redirect targets are landing paths from the zone table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    RedirectTo(&'static str),
    RedirectAndClearSession(&'static str),
}

/// RouteGuard
///
/// Stateless access policy over the zone table. The verifier is the only
/// collaborator and is consulted at most once per evaluation.
#[derive(Clone, Default)]
pub struct RouteGuard {
    zones: ZoneTable,
}

impl RouteGuard {
    pub fn new(zones: ZoneTable) -> Self {
        Self { zones }
    }

    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    /// evaluate
    ///
    /// Decides whether a navigation to `path` may proceed.
    ///
    /// * No token: only the public auth zone is reachable.
    /// * Verification failure of any kind: logged out, session cleared.
    /// * Admin: only the dashboard. Non-admin: only the access-request page.
    /// * Anything unclassified is denied.
    pub async fn evaluate(
        &self,
        path: &str,
        token: Option<&str>,
        verifier: &dyn SessionVerifier,
    ) -> Decision {
        let zone = self.zones.classify(path);
        let auth = self.landing(Zone::PublicAuth);

        let Some(token) = token.filter(|token| !token.is_empty()) else {
            return match zone {
                Zone::PublicAuth => Decision::Proceed,
                _ => Decision::RedirectTo(auth),
            };
        };

        let verification = match verifier.verify(token).await {
            Ok(verification) => verification,
            Err(e) => {
                tracing::warn!(%path, error = %e, "session verification failed");
                return Decision::RedirectAndClearSession(auth);
            }
        };

        let home = if verification.is_admin {
            Zone::AdminDashboard
        } else {
            Zone::AdminRequest
        };

        match zone {
            Zone::Other => Decision::RedirectTo(auth),
            z if z == home => Decision::Proceed,
            _ => Decision::RedirectTo(self.landing(home)),
        }
    }

    fn landing(&self, zone: Zone) -> &'static str {
        self.zones
            .landing(zone)
            .unwrap_or(crate::zones::AUTH_PATH)
    }
}

impl Decision {
    /// Turns a redirect decision into a response. `Proceed` has no response of its own.
    fn into_redirect(self, jar: CookieJar) -> Option<Response> {
        match self {
            Decision::Proceed => None,
            Decision::RedirectTo(target) => Some(Redirect::to(target).into_response()),
            Decision::RedirectAndClearSession(target) => {
                Some((session::clear(jar), Redirect::to(target)).into_response())
            }
        }
    }
}

/// route_guard
///
/// Middleware wrapping the `/auth` and `/admin` page trees. Runs the guard before
/// the page is served and answers with a redirect when the guard says so.
pub async fn route_guard(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    // Nesting strips the prefix from `uri()`; classify on the path the browser asked for.
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let token = session::access_token(&jar);

    let decision = state
        .guard
        .evaluate(&path, token, state.verifier.as_ref())
        .await;

    tracing::debug!(
        %path,
        zone = ?state.guard.zones().classify(&path),
        has_token = token.is_some(),
        ?decision,
        "route guard decision"
    );

    match decision.into_redirect(jar) {
        Some(response) => response,
        None => next.run(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::MockSessionVerifier;

    #[tokio::test]
    async fn empty_token_counts_as_missing() {
        let guard = RouteGuard::default();
        let verifier = MockSessionVerifier::admin();
        assert_eq!(
            guard.evaluate("/admin", Some(""), &verifier).await,
            Decision::RedirectTo("/auth")
        );
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn verified_session_on_unknown_path_is_denied() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard
                .evaluate("/admin/settings", Some("abc"), &MockSessionVerifier::admin())
                .await,
            Decision::RedirectTo("/auth")
        );
        assert_eq!(
            guard
                .evaluate("/admin/settings", Some("abc"), &MockSessionVerifier::member())
                .await,
            Decision::RedirectTo("/auth")
        );
    }

    #[tokio::test]
    async fn admin_is_sent_away_from_access_request() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard
                .evaluate("/admin", Some("abc"), &MockSessionVerifier::admin())
                .await,
            Decision::RedirectTo("/admin/dashboard")
        );
    }
}
