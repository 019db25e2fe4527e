//! Shared HTTP plumbing for the hosted backend.

use std::fmt;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use nexo_core::config::BackendConfig;
use nexo_core::error::{AppError, ErrorKind};
use nexo_core::result::AppResult;

/// HTTP client bound to one hosted project.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client from configuration.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let base_url = Url::parse(config.url.trim()).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid backend url '{}': {e}", config.url),
                e,
            )
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "Backend url '{}' cannot be used as a base",
                config.url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            http,
            base_url,
            anon_key: config.anon_key.clone(),
        })
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment.
    pub fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::configuration("Backend url cannot be used as a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request carrying the project key and the bearer token
    /// (the anonymous key when no user token is given).
    pub fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        let bearer = token.unwrap_or(&self.anon_key);
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// Plain GET without project headers (public object URLs).
    pub fn get_public(&self, url: Url) -> RequestBuilder {
        self.http.get(url)
    }

    /// Send and map transport failures and non-2xx statuses to `AppError`.
    pub async fn send(&self, builder: RequestBuilder) -> AppResult<Response> {
        let response = builder.send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Backend,
                format!("Request to backend failed: {e}"),
                e,
            )
        })?;

        let status = response.status();
        debug!(status = %status, url = %response.url(), "Backend response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
        warn!(status = %status, message = %message, "Backend rejected request");

        Err(AppError::new(kind_for_status(status), message))
    }

    /// Send and decode a JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        let response = self.send(builder).await?;
        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Unexpected backend response: {e}"),
                e,
            )
        })
    }
}

/// Pull the human-readable message out of a backend error body.
///
/// The auth, record and storage services each use a different field name.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => ["msg", "message", "error_description", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .or_else(|| Some(trimmed.to_string())),
        _ => Some(trimmed.to_string()),
    }
}

fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
        StatusCode::FORBIDDEN => ErrorKind::Authorization,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        _ => ErrorKind::Backend,
    }
}
