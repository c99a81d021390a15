use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::config::AppConfig;
use crate::error::FavoriteError;
use crate::models::UserSession;

pub const FAVORITES_PATH: &str = "favoris";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleRequest<'a> {
    user_id: &'a str,
    propriete_id: &'a str,
}

/// Body of the toggle endpoint's reply
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ToggleResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// Set by servers that report the resulting state
    #[serde(default)]
    pub favorited: Option<bool>,
}

/// Adds or removes a property from the signed-in buyer's favorites
pub struct FavoritesClient {
    client: Client,
    endpoint: Url,
}

impl FavoritesClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::with_client(config.http_client()?, &config.api_base_url)
    }

    pub fn with_client(client: Client, api_base_url: &str) -> Result<Self> {
        let endpoint = Url::parse(&format!(
            "{}/{}",
            api_base_url.trim_end_matches('/'),
            FAVORITES_PATH
        ))
        .with_context(|| format!("Invalid API base URL: {api_base_url}"))?;
        Ok(Self { client, endpoint })
    }

    /// Flip the favorite state of `propriete_id` for the session's user.
    pub async fn toggle(
        &self,
        session: &UserSession,
        propriete_id: &str,
    ) -> Result<ToggleResponse, FavoriteError> {
        if session.user_id.trim().is_empty() {
            return Err(FavoriteError::Validation("userId"));
        }
        if propriete_id.trim().is_empty() {
            return Err(FavoriteError::Validation("proprieteId"));
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&ToggleRequest {
                user_id: &session.user_id,
                propriete_id,
            })
            .send()
            .await?;

        let status = response.status();
        let body: ToggleResponse = match response.json().await {
            Ok(body) => body,
            Err(err) if status.is_success() => return Err(FavoriteError::Decode(err.to_string())),
            Err(_) => ToggleResponse::default(),
        };

        if !status.is_success() || !body.success {
            let message = body
                .error
                .unwrap_or_else(|| format!("status {}", status.as_u16()));
            warn!("Favorite toggle for {} failed: {}", propriete_id, message);
            return Err(FavoriteError::Remote(message));
        }

        info!("Toggled favorite {} for user {}", propriete_id, session.user_id);
        Ok(body)
    }
}
