use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{
    HISTORY_REQUESTS, PING_REQUESTS, QUERY_DURATION, QUERY_ERRORS, QUERY_REQUESTS,
    STATS_DURATION, STATS_ERRORS, STATS_REQUESTS,
};
use crate::types::{ApiInfo, HistoryPage, HistoryParams, QueryRequest, QueryResponse, UsageStats};

/// Base URL used when the caller does not provide one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Every endpoint lives under this prefix.
const API_PREFIX: &str = "api/";

/// The calls the chat session makes against the health backend.
///
/// [`HealthClient`] is the HTTP implementation; tests substitute their own.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Ask a question and wait for the answer.
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse>;

    /// Fetch the current usage counters.
    async fn stats(&self) -> Result<UsageStats>;

    /// Fetch stored exchanges for `user_id`, newest first.
    async fn history(&self, user_id: &str, params: HistoryParams) -> Result<HistoryPage>;

    /// Fetch the service banner.
    async fn ping(&self) -> Result<ApiInfo>;
}

/// HTTP client for the health backend.
#[derive(Debug, Clone)]
pub struct HealthClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Option<Duration>,
}

impl HealthClient {
    /// Create a new client.
    ///
    /// `None` selects [`DEFAULT_BASE_URL`].  Environment and config file
    /// lookups belong to [`ChatConfig`](crate::chat::ChatConfig).
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with an optional request timeout.
    ///
    /// Without a timeout a request runs until the backend answers or the
    /// connection fails.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url =
            normalize_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The normalized base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` below the `/api` prefix.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(API_PREFIX)?.join(path)?)
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                self.timeout.map(|t| t.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        // FastAPI reports `{"detail": "..."}`, or a list of problems on 422.
        let detail = serde_json::from_str::<serde_json::Value>(&error_body)
            .ok()
            .and_then(|value| value.get("detail").cloned())
            .map(|detail| match detail {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });

        Error::api(status_code, detail.unwrap_or(error_body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }
        response.json::<T>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .headers(self.default_headers())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        Self::decode(response).await
    }
}

#[async_trait::async_trait]
impl Backend for HealthClient {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        QUERY_REQUESTS.click();
        let start = Instant::now();
        let url = self.endpoint("health/query")?;
        tracing::debug!(%url, user_id = %request.user_id, "POST question");

        let result = async {
            let response = self
                .client
                .post(url)
                .headers(self.default_headers())
                .json(request)
                .send()
                .await
                .map_err(|e| self.map_send_error(e))?;
            Self::decode::<QueryResponse>(response).await
        }
        .await;

        QUERY_DURATION.add(start.elapsed().as_secs_f64());
        if result.is_err() {
            QUERY_ERRORS.click();
        }
        result
    }

    async fn stats(&self) -> Result<UsageStats> {
        STATS_REQUESTS.click();
        let start = Instant::now();
        let result = match self.endpoint("health/stats") {
            Ok(url) => self.get::<UsageStats>(url).await,
            Err(err) => Err(err),
        };
        STATS_DURATION.add(start.elapsed().as_secs_f64());
        if result.is_err() {
            STATS_ERRORS.click();
        }
        result
    }

    async fn history(&self, user_id: &str, params: HistoryParams) -> Result<HistoryPage> {
        HISTORY_REQUESTS.click();
        let mut url = self.endpoint("health/history/")?;
        url.path_segments_mut()
            .map_err(|_| Error::url("base URL cannot carry a path", None))?
            .pop_if_empty()
            .push(user_id);
        url.query_pairs_mut()
            .append_pair("limit", &params.limit.to_string())
            .append_pair("skip", &params.skip.to_string());
        self.get(url).await
    }

    async fn ping(&self) -> Result<ApiInfo> {
        PING_REQUESTS.click();
        let url = self.endpoint("")?;
        self.get(url).await
    }
}

/// Parse `base_url`, ensuring it ends in a slash so that joins append.
fn normalize_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(
            "backend base URL is empty",
            Some("base_url".to_string()),
        ));
    }
    let mut url = Url::parse(trimmed)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::validation(
            format!("unsupported URL scheme: {}", url.scheme()),
            Some("base_url".to_string()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
