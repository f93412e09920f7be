use async_trait::async_trait;
use reqwest::{StatusCode, header};
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Verification
///
/// What the backend confirms about a session token. Only the role flag is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    pub is_admin: bool,
}

/// VerifyError
///
/// Every way a verification call can fail. The guard treats all of them the same,
/// the variants only exist so the logs can tell them apart.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("verification request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("verification endpoint answered {0}")]
    Status(StatusCode),
    #[error("verification response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("session rejected by backend")]
    Rejected,
}

// 1. SessionVerifier Contract
/// SessionVerifier
///
/// Confirms a session token remotely and returns the caller's role. Swappable so
/// the guard can run against the real backend or an in-memory double.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Verification, VerifyError>;
}

/// Shared handle stored in the application state.
pub type VerifierState = Arc<dyn SessionVerifier>;

/// Wire shape of `GET /auth/verify-access`.
#[derive(Debug, Deserialize)]
struct VerifyAccessResponse {
    success: bool,
    data: Option<VerifyAccessData>,
}

#[derive(Debug, Deserialize)]
struct VerifyAccessData {
    #[serde(rename = "isAdmin")]
    is_admin: bool,
}

// 2. The Real Implementation
/// HttpSessionVerifier
///
/// Calls the backend's verify-access endpoint with the token as a bearer credential.
#[derive(Clone)]
pub struct HttpSessionVerifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSessionVerifier {
    pub fn new(backend_api_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/auth/verify-access", backend_api_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SessionVerifier for HttpSessionVerifier {
    async fn verify(&self, token: &str) -> Result<Verification, VerifyError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(VerifyError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::Status(status));
        }

        let body: VerifyAccessResponse = response.json().await.map_err(VerifyError::Decode)?;
        match body {
            VerifyAccessResponse {
                success: true,
                data: Some(data),
            } => Ok(Verification {
                is_admin: data.is_admin,
            }),
            _ => Err(VerifyError::Rejected),
        }
    }
}

// 3. The Mock Implementation
/// MockSessionVerifier
///
/// Test double returning a fixed outcome for every token, and counting calls so
/// tests can assert when the backend would (not) have been contacted.
#[derive(Default)]
pub struct MockSessionVerifier {
    /// `None` simulates a rejected or unreachable verification.
    outcome: Option<Verification>,
    calls: AtomicUsize,
}

impl MockSessionVerifier {
    pub fn admin() -> Self {
        Self::with_outcome(Some(Verification { is_admin: true }))
    }

    pub fn member() -> Self {
        Self::with_outcome(Some(Verification { is_admin: false }))
    }

    pub fn failing() -> Self {
        Self::with_outcome(None)
    }

    fn with_outcome(outcome: Option<Verification>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionVerifier for MockSessionVerifier {
    async fn verify(&self, _token: &str) -> Result<Verification, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.ok_or(VerifyError::Rejected)
    }
}
