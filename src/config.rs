use std::{env, path::PathBuf, time::Duration};

/// AppConfig
///
/// Holds the gateway's configuration. Immutable once loaded and carried in
/// `AppState`, where the routers read the site layout from it.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Base URL of the backend REST API, without a trailing slash.
    pub backend_api_url: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Root of the exported site. `public/` is served openly, `auth/` and
    // `admin/` only through the guarded routes.
    pub site_dir: PathBuf,
    // Upper bound for the session verification call.
    pub verify_timeout: Duration,
    // Runtime environment marker. Selects log format and fail-fast rules.
    pub env: Env,
}

/// Env
///
/// Runtime context. Production refuses to start without an explicit backend URL.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const LOCAL_BACKEND_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SITE_DIR: &str = "site";
const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 5;

impl Default for AppConfig {
    /// Non-panicking values for test state setup.
    fn default() -> Self {
        Self {
            backend_api_url: LOCAL_BACKEND_API_URL.to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            site_dir: PathBuf::from(DEFAULT_SITE_DIR),
            verify_timeout: Duration::from_secs(DEFAULT_VERIFY_TIMEOUT_SECS),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// Directory of the unguarded page tree. Never contains the guarded trees.
    pub fn public_dir(&self) -> PathBuf {
        self.site_dir.join("public")
    }

    /// load
    ///
    /// Reads the configuration from environment variables at startup.
    ///
    /// # Panics
    /// Panics in `Env::Production` when `BACKEND_API_URL` is not set. Every guarded
    /// request depends on it, so the gateway must not come up without one.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let backend_api_url = match env {
            Env::Production => env::var("BACKEND_API_URL")
                .expect("FATAL: BACKEND_API_URL must be set in production."),
            Env::Local => {
                env::var("BACKEND_API_URL").unwrap_or_else(|_| LOCAL_BACKEND_API_URL.to_string())
            }
        };

        let verify_timeout = env::var("VERIFY_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_VERIFY_TIMEOUT_SECS);

        Self {
            backend_api_url: backend_api_url.trim_end_matches('/').to_string(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            site_dir: env::var("SITE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SITE_DIR)),
            verify_timeout: Duration::from_secs(verify_timeout),
            env,
        }
    }
}
