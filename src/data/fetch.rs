//! Single-attempt HTTP GET shared by every upstream client

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Default bound on a whole request, connect through body
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(4000);

/// Errors that can occur when fetching a response body
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed
    #[error("HTTP client init failed: {0}")]
    ClientInit(#[source] reqwest::Error),

    /// Connect, TLS, timeout or body read failure
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The server answered with no body at all
    #[error("Empty response body")]
    EmptyBody,
}

/// Performs one GET per call and returns the whole body
///
/// The bearer credential is injected at construction and only attached when
/// a call asks for authentication. Status codes are logged but never used to
/// reject a response: a non-2xx body is still handed to the caller.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    token: Option<String>,
}

impl Fetcher {
    /// Creates a fetcher with its own client bounded by `timeout`
    pub fn new(timeout: Duration, token: Option<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientInit)?;

        Ok(Self::with_client(client, token))
    }

    /// Creates a fetcher around an existing HTTP client
    pub fn with_client(client: Client, token: Option<String>) -> Self {
        Self { client, token }
    }

    /// Fetches `url`, attaching `Authorization: Bearer <token>` if `authenticate` is set
    ///
    /// # Returns
    /// * `Ok(String)` - The non-empty response body, whatever the status code
    /// * `Err(FetchError)` - Transport failure or an empty body
    pub async fn fetch(&self, url: &str, authenticate: bool) -> Result<String, FetchError> {
        debug!(url, "GET");

        let mut request = self.client.get(url);
        if authenticate {
            match &self.token {
                Some(token) => request = request.bearer_auth(token),
                None => warn!(url, "authenticated request without a configured token"),
            }
        }

        let response = request.send().await.map_err(|e| {
            error!(url, error = %e, "request failed");
            FetchError::RequestFailed(e)
        })?;

        debug!(status = response.status().as_u16(), "status code");

        let body = response.text().await.map_err(|e| {
            error!(url, error = %e, "reading body failed");
            FetchError::RequestFailed(e)
        })?;

        debug!(size = body.len(), "payload size");

        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        Ok(body)
    }
}
