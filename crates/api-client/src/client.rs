//! The HTTP call path shared by every endpoint.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use session::SessionStore;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;

/// Every request gets this long to produce a response.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the platino backend.
///
/// Wraps every call with the 15-second timeout, bearer-token injection and
/// error normalization, and applies the one cross-cutting auth policy: an
/// authenticated call answered with 401 clears the session store before the
/// error reaches the caller — once per failing call, never retried.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(Self {
            http,
            config,
            session,
        })
    }

    /// Client against `PLATINO_API_URL` (or the local dev default).
    pub fn from_env(session: Arc<SessionStore>) -> Result<Self, ApiError> {
        Self::new(ApiConfig::from_env(), session)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub(crate) async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&[(&str, String)]>,
    ) -> Result<R, ApiError> {
        self.request(Method::GET, path, query, None::<&()>, true)
            .await
    }

    pub(crate) async fn get_noauth<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(Method::GET, path, None, None::<&()>, false)
            .await
    }

    pub(crate) async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::POST, path, None, Some(body), true)
            .await
    }

    pub(crate) async fn post_noauth<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::POST, path, None, Some(body), false)
            .await
    }

    pub(crate) async fn patch<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::PATCH, path, None, Some(body), true)
            .await
    }

    pub(crate) async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(Method::DELETE, path, None, None::<&()>, true)
            .await
    }

    /// GET returning the raw body, used by the CSV exports.
    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<u8>, ApiError> {
        let response = self
            .execute(Method::GET, path, Some(query), None::<&()>, true)
            .await?;
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(classify_transport_error)
    }

    /// One JSON round trip.
    async fn request<B, R>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&B>,
        requires_auth: bool,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .execute(method, path, query, body, requires_auth)
            .await?;
        let text = response.text().await.map_err(classify_transport_error)?;
        // Empty 2xx bodies read as JSON null, like an absent payload.
        let text = if text.trim().is_empty() {
            "null".to_string()
        } else {
            text
        };
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send the request and normalize every failure, including the 401
    /// session-clearing side effect.
    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&B>,
        requires_auth: bool,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.url(path);
        debug!("{method} {url}");

        let mut request = self.http.request(method, url.as_str());
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if requires_auth {
            let token = self.session.snapshot().token.clone();
            if !token.is_empty() {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && requires_auth {
            // The token is dead; clear the session so the whole UI reacts.
            warn!("authenticated call to {path} returned 401, clearing session");
            self.session.logout();
        }

        let text = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), &text))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

/// Split "no response" failures into the two cases callers distinguish.
fn classify_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Unreachable(e)
    }
}
