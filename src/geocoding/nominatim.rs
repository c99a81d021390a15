use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::GeocodeError;
use crate::geocoding::traits::{GeoCandidate, GeocodingProvider};
use crate::models::GeoPoint;

/// Nominatim sends coordinates as strings, latitude first
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// OpenStreetMap Nominatim search
pub struct NominatimProvider {
    client: Client,
    base_url: Url,
}

impl NominatimProvider {
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid Nominatim URL: {base_url}"))?;
        Ok(Self { client, base_url })
    }

    fn request_url(&self, address: &str) -> Result<Url, GeocodeError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GeocodeError::Provider("Nominatim URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("search");
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        Ok(url)
    }
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    async fn lookup(&self, address: &str) -> Result<Vec<GeoCandidate>, GeocodeError> {
        let url = self.request_url(address)?;
        debug!("Geocoding {:?} with Nominatim", address);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            warn!("Nominatim returned status: {}", response.status());
            return Err(GeocodeError::Provider(format!(
                "Nominatim returned status {}",
                response.status()
            )));
        }

        let places: Vec<Place> = response.json().await?;
        let mut candidates = Vec::with_capacity(places.len());
        for place in places {
            let (Ok(latitude), Ok(longitude)) = (place.lat.parse::<f64>(), place.lon.parse::<f64>()) else {
                warn!("Skipping Nominatim result with unparseable coordinates");
                continue;
            };
            candidates.push(GeoCandidate {
                point: GeoPoint::new(latitude, longitude),
                label: place.display_name,
            });
        }
        Ok(candidates)
    }

    fn provider_name(&self) -> &'static str {
        "nominatim"
    }
}
