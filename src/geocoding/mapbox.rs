use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::GeocodeError;
use crate::geocoding::traits::{GeoCandidate, GeocodingProvider};
use crate::models::GeoPoint;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    /// `[longitude, latitude]`
    center: [f64; 2],
    #[serde(default)]
    place_name: Option<String>,
}

/// Mapbox forward geocoding (`mapbox.places`)
pub struct MapboxProvider {
    client: Client,
    base_url: Url,
    token: String,
}

impl MapboxProvider {
    pub fn new(client: Client, base_url: &str, token: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid Mapbox URL: {base_url}"))?;
        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    fn request_url(&self, address: &str) -> Result<Url, GeocodeError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GeocodeError::Provider("Mapbox URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["geocoding", "v5", "mapbox.places"])
            .push(&format!("{address}.json"));
        url.query_pairs_mut()
            .append_pair("access_token", &self.token)
            .append_pair("limit", "1");
        Ok(url)
    }
}

#[async_trait]
impl GeocodingProvider for MapboxProvider {
    async fn lookup(&self, address: &str) -> Result<Vec<GeoCandidate>, GeocodeError> {
        let url = self.request_url(address)?;
        debug!("Geocoding {:?} with Mapbox", address);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            warn!("Mapbox returned status: {}", response.status());
            return Err(GeocodeError::Provider(format!(
                "Mapbox returned status {}",
                response.status()
            )));
        }

        let body: FeatureCollection = response.json().await?;
        Ok(body
            .features
            .into_iter()
            .map(|feature| GeoCandidate {
                point: GeoPoint::new(feature.center[1], feature.center[0]),
                label: feature.place_name,
            })
            .collect())
    }

    fn provider_name(&self) -> &'static str {
        "mapbox"
    }
}
