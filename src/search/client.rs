use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::AppConfig;
use crate::error::{SearchError, GENERIC_SEARCH_FAILURE};
use crate::search::normalize::{payload_error, RawSearchResponse};
use crate::search::query::SearchQuery;
use crate::search::traits::SearchBackend;

pub const SEARCH_PATH: &str = "proprietes/search";

/// Search backend talking to the marketplace REST API
pub struct HttpSearchBackend {
    client: Client,
    endpoint: Url,
}

impl HttpSearchBackend {
    /// Build a backend from application settings
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = config.http_client()?;
        Self::with_client(client, &config.api_base_url)
    }

    /// Build a backend around an existing HTTP client
    pub fn with_client(client: Client, api_base_url: &str) -> Result<Self> {
        let endpoint = Url::parse(&format!(
            "{}/{}",
            api_base_url.trim_end_matches('/'),
            SEARCH_PATH
        ))
        .with_context(|| format!("Invalid API base URL: {api_base_url}"))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, query: &SearchQuery) -> Result<RawSearchResponse, SearchError> {
        let url = query.apply_to(&self.endpoint);
        debug!("Fetching URL: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Received {} bytes with status {}", body.len(), status);

        let payload: Option<Value> = serde_json::from_str(&body).ok();
        let remote_message = payload.as_ref().and_then(payload_error);

        if !status.is_success() {
            warn!("Search endpoint returned status: {}", status);
            return Err(SearchError::Remote {
                status: Some(status.as_u16()),
                message: remote_message.unwrap_or_else(|| GENERIC_SEARCH_FAILURE.to_string()),
            });
        }

        if let Some(message) = remote_message {
            warn!("Search endpoint reported an error: {}", message);
            return Err(SearchError::Remote {
                status: Some(status.as_u16()),
                message,
            });
        }

        let payload = payload.ok_or_else(|| SearchError::Decode("body is not JSON".to_string()))?;
        let raw: RawSearchResponse = serde_json::from_value(payload)?;

        info!(
            "Search returned {} properties",
            raw.data.as_ref().map_or(0, Vec::len)
        );
        Ok(raw)
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
