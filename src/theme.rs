//! Visitor theme preference.
//!
//! Read from the `theme` cookie on every request and handed to handlers as an
//! extractor value, so pages receive it explicitly instead of from global state.

use std::convert::Infallible;

use axum::{Json, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

pub const THEME_COOKIE: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn from_cookie(value: &str) -> Self {
        match value {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

impl<S> FromRequestParts<S> for Theme
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(jar
            .get(THEME_COOKIE)
            .map(|cookie| Theme::from_cookie(cookie.value()))
            .unwrap_or_default())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemePreference {
    pub theme: Theme,
}

/// `GET /preferences/theme`
pub async fn get_theme(theme: Theme) -> Json<ThemePreference> {
    Json(ThemePreference { theme })
}

/// `PUT /preferences/theme`: persist the choice for a year.
pub async fn set_theme(
    jar: CookieJar,
    Json(preference): Json<ThemePreference>,
) -> (CookieJar, Json<ThemePreference>) {
    let cookie = Cookie::build((THEME_COOKIE, preference.theme.as_str()))
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(Duration::days(365));
    (jar.add(cookie), Json(preference))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_cookie_value_falls_back_to_light() {
        assert_eq!(Theme::from_cookie("dark"), Theme::Dark);
        assert_eq!(Theme::from_cookie("solarized"), Theme::Light);
        assert_eq!(Theme::from_cookie(""), Theme::Light);
    }
}
