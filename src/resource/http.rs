//! resource::http
//!
//! HTTP resource implementation using a JSON REST endpoint.
//!
//! # Endpoints
//!
//! Relative to the configured base URL:
//! - `GET  {base}/list?pageNumber=..&pageSize=..&sort=field,asc&<filters>`
//! - `GET  {base}/detail?id=..`
//! - `POST {base}/save` with the save payload as JSON body
//!
//! # Dates
//!
//! Save payloads pass through a [`DateNormalizer`] before they are sent, so
//! every RFC 3339 timestamp reaches the server in the configured canonical
//! format.
//!
//! # Example
//!
//! ```ignore
//! use pagestore::resource::http::HttpResource;
//! use pagestore::core::record::Record;
//!
//! let resource: HttpResource<Record> =
//!     HttpResource::new("http://localhost:8080/api/v1/example")?;
//! let page = resource.list(&ListQuery::default()).await?;
//! ```

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::traits::{
    DetailRequest, DetailResponse, ListResponse, Resource, ResourceError, SaveRequest,
    SaveResponse,
};
use crate::core::types::{Entity, ListQuery};
use crate::page::reconcile::DateNormalizer;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "pagestore-cli";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body returned by the endpoint on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP-backed resource.
pub struct HttpResource<T: Entity> {
    client: Client,
    base_url: String,
    dates: DateNormalizer,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> std::fmt::Debug for HttpResource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResource")
            .field("base_url", &self.base_url)
            .field("dates", &self.dates)
            .finish()
    }
}

impl<T: Entity> HttpResource<T> {
    /// Create a resource rooted at `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::NetworkError` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ResourceError> {
        Self::with_options(base_url, DEFAULT_TIMEOUT, DateNormalizer::default())
    }

    /// Create a resource with an explicit timeout and date format.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::NetworkError` if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        timeout: Duration,
        dates: DateNormalizer,
    ) -> Result<Self, ResourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(Self::headers())
            .build()
            .map_err(|e| ResourceError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            dates,
            _entity: PhantomData,
        })
    }

    /// The base URL requests are made against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Flatten a list query into URL parameters.
    fn query_params(query: &ListQuery) -> Vec<(String, String)> {
        let mut params = vec![
            ("pageNumber".to_string(), query.page_number.to_string()),
            ("pageSize".to_string(), query.page_size.to_string()),
        ];
        for sort in &query.sort {
            params.push((
                "sort".to_string(),
                format!("{},{}", sort.field, sort.direction),
            ));
        }
        for (key, value) in &query.filters {
            let rendered = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            params.push((key.clone(), rendered));
        }
        params
    }

    /// Handle a response, mapping errors appropriately.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<R, ResourceError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ResourceError::InvalidPayload(format!("failed to parse response: {}", e)))
        } else {
            Err(Self::error_for_status(response, status).await)
        }
    }

    async fn error_for_status(response: Response, status: StatusCode) -> ResourceError {
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body
                .message
                .or(body.error)
                .unwrap_or_else(|| "Unknown error".to_string()),
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::NOT_FOUND => ResourceError::NotFound(message),
            _ if status.is_server_error() => ResourceError::ApiError {
                status: status.as_u16(),
                message: format!("server error: {}", message),
            },
            _ => ResourceError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl<T: Entity> Resource<T> for HttpResource<T> {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn list(&self, query: &ListQuery) -> Result<ListResponse<T>, ResourceError> {
        let response = self
            .client
            .get(self.url("list"))
            .query(&Self::query_params(query))
            .send()
            .await
            .map_err(|e| ResourceError::NetworkError(e.to_string()))?;

        self.handle_response(response).await
    }

    async fn detail(&self, request: &DetailRequest) -> Result<DetailResponse<T>, ResourceError> {
        let response = self
            .client
            .get(self.url("detail"))
            .query(&[("id", request.id.as_str())])
            .send()
            .await
            .map_err(|e| ResourceError::NetworkError(e.to_string()))?;

        self.handle_response(response).await
    }

    async fn save(&self, request: &SaveRequest<T>) -> Result<SaveResponse, ResourceError> {
        let mut body = serde_json::to_value(request)
            .map_err(|e| ResourceError::InvalidPayload(e.to_string()))?;
        self.dates.normalize(&mut body);

        let response = self
            .client
            .post(self.url("save"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ResourceError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_for_status(response, status).await);
        }

        // Empty bodies are a valid save acknowledgement.
        let text = response
            .text()
            .await
            .map_err(|e| ResourceError::NetworkError(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ResourceError::InvalidPayload(format!("failed to parse response: {}", e)))
    }
}
