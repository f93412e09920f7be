//! Session cookies: names, token lookup, and removal.
//!
//! The cookies are issued by the backend at sign-in. This gateway only reads the
//! access token and deletes both cookies when the session is found to be invalid.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::zones::AUTH_PATH;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Access token carried by the request. An empty cookie counts as no token.
pub fn access_token(jar: &CookieJar) -> Option<&str> {
    jar.get(ACCESS_TOKEN_COOKIE)
        .map(Cookie::value)
        .filter(|token| !token.is_empty())
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .build()
}

/// Adds removal cookies for both session tokens to the jar.
pub fn clear(jar: CookieJar) -> CookieJar {
    jar.add(removal(ACCESS_TOKEN_COOKIE))
        .add(removal(REFRESH_TOKEN_COOKIE))
}

/// `POST /logout` (also `GET`): drop the session cookies and return to sign-in.
pub async fn logout(jar: CookieJar) -> Response {
    tracing::info!("session cleared by logout");
    (clear(jar), Redirect::to(AUTH_PATH)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};

    fn jar_with(cookie: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn reads_access_token() {
        let jar = jar_with("access_token=abc; refresh_token=def");
        assert_eq!(access_token(&jar), Some("abc"));
    }

    #[test]
    fn empty_access_token_is_none() {
        assert_eq!(access_token(&jar_with("access_token=")), None);
        assert_eq!(access_token(&jar_with("refresh_token=def")), None);
    }

    #[test]
    fn clear_expires_both_cookies() {
        let jar = clear(CookieJar::new());
        for name in [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE] {
            let cookie = jar.get(name).unwrap();
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(Duration::ZERO));
            assert_eq!(cookie.path(), Some("/"));
        }
    }
}
