use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::env;
use tracing::{debug, instrument};

use crate::table::{PageSource, PaginationData, RequestError, RequestParams, RequestResult};

pub const API_URL_ENV: &str = "SEARCH_TABLE_API_URL";
const DEFAULT_API_URL: &str = "http://localhost:3737";

/// HTTP client for the remote list API
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// Priority for base URL:
    /// 1. Explicit `api_url` parameter
    /// 2. SEARCH_TABLE_API_URL environment variable
    /// 3. Default: http://localhost:3737
    pub fn new(api_url: Option<String>) -> Self {
        let _ = rustls::crypto::ring::default_provider().install_default();

        let base_url = api_url
            .or_else(|| env::var(API_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Get the base URL being used
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List request for the collection at `path`
    pub fn page_source(&self, path: &str) -> HttpPageSource {
        let path = path.trim_start_matches('/');
        HttpPageSource {
            client: self.client.clone(),
            url: format!("{}/{}", self.base_url, path),
            envelope: None,
        }
    }
}

/// List request issued as `GET <url>?<params>`.
#[derive(Clone)]
pub struct HttpPageSource {
    client: Client,
    url: String,
    envelope: Option<String>,
}

impl HttpPageSource {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Read the pagination object from `body[key]` instead of the body itself.
    pub fn with_envelope(mut self, key: Option<String>) -> Self {
        self.envelope = key;
        self
    }

    #[instrument(skip(self, params), fields(url = %self.url))]
    async fn get<R: DeserializeOwned>(
        &self,
        params: RequestParams,
    ) -> RequestResult<PaginationData<R>> {
        let query = query_pairs(&params);
        debug!(?query, "requesting page");

        let response = self
            .client
            .get(&self.url)
            .query(&query)
            .send()
            .await
            .map_err(|e| RequestError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RequestError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RequestError::decode(e.to_string()))?;
        let page = match &self.envelope {
            Some(key) => body
                .get(key)
                .cloned()
                .ok_or_else(|| RequestError::decode(format!("response has no `{}` field", key)))?,
            None => body,
        };

        Ok(serde_json::from_value(page)?)
    }
}

impl<R> PageSource<RequestParams, R> for HttpPageSource
where
    R: DeserializeOwned + 'static,
{
    fn fetch_page(
        &self,
        params: RequestParams,
    ) -> LocalBoxFuture<'static, RequestResult<PaginationData<R>>> {
        let source = self.clone();
        async move { source.get(params).await }.boxed_local()
    }
}

/// Flatten request params into query pairs.
///
/// Strings are sent unquoted, nulls are skipped and arrays repeat the key.
pub fn query_pairs(params: &RequestParams) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = query_value(item) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = query_value(other) {
                    pairs.push((key.clone(), text));
                }
            }
        }
    }
    pairs
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
