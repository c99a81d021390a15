//! Address to coordinates.
//!
//! Three attempts in order, stopping at the first success: a literal
//! `lat, lon` pair, coordinates embedded in a map share link, then one lookup
//! against the configured third-party provider.

pub mod mapbox;
pub mod nominatim;
pub mod parse;
pub mod traits;

use anyhow::Result;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, GeocoderKind};
use crate::models::GeoPoint;

pub use crate::error::GeocodeError;
pub use mapbox::MapboxProvider;
pub use nominatim::NominatimProvider;
pub use traits::{GeoCandidate, GeocodingProvider, OfflineProvider};

/// Which attempt produced the coordinates
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum GeocodeSource {
    Coordinates,
    MapLink,
    Provider,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeocodeResult {
    pub point: GeoPoint,
    pub source: GeocodeSource,
    pub label: Option<String>,
}

pub struct Geocoder {
    provider: Box<dyn GeocodingProvider>,
}

impl Geocoder {
    pub fn new(provider: impl GeocodingProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
        }
    }

    /// Geocoder that only understands coordinates and map links
    pub fn offline() -> Self {
        Self::new(OfflineProvider)
    }

    /// Provider chosen by `geocoder.provider`; Mapbox without a token falls back to offline.
    pub fn from_config(config: &AppConfig, client: Client) -> Result<Self> {
        let settings = &config.geocoder;
        let geocoder = match settings.provider {
            GeocoderKind::Nominatim => {
                Self::new(NominatimProvider::new(client, &settings.nominatim_url)?)
            }
            GeocoderKind::Mapbox => match settings.mapbox_token.as_deref() {
                Some(token) if !token.is_empty() => {
                    Self::new(MapboxProvider::new(client, &settings.mapbox_url, token)?)
                }
                _ => {
                    warn!("Mapbox selected without a token, remote geocoding disabled");
                    Self::offline()
                }
            },
        };
        Ok(geocoder)
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    pub async fn resolve(&self, input: &str) -> Result<GeocodeResult, GeocodeError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        if let Some(point) = parse::parse_coordinates(input) {
            debug!("Input parsed as coordinates");
            return local_result(point, GeocodeSource::Coordinates);
        }

        if let Some(point) = parse::parse_map_link(input) {
            debug!("Coordinates extracted from map link");
            return local_result(point, GeocodeSource::MapLink);
        }

        info!("Looking up {:?} with {}", input, self.provider.provider_name());
        let candidates = self.provider.lookup(input).await?;
        let first = candidates
            .first()
            .map(|candidate| candidate.point)
            .ok_or_else(|| GeocodeError::NotFound(input.to_string()))?;

        // Providers occasionally return NaN or out-of-range values; skip those.
        let Some(candidate) = candidates.into_iter().find(|c| c.point.is_valid()) else {
            warn!("{} returned no usable coordinates for {:?}", self.provider.provider_name(), input);
            return Err(GeocodeError::OutOfRange {
                latitude: first.latitude,
                longitude: first.longitude,
            });
        };

        Ok(GeocodeResult {
            point: candidate.point,
            source: GeocodeSource::Provider,
            label: candidate.label,
        })
    }
}

fn local_result(point: GeoPoint, source: GeocodeSource) -> Result<GeocodeResult, GeocodeError> {
    if !point.is_valid() {
        return Err(GeocodeError::OutOfRange {
            latitude: point.latitude,
            longitude: point.longitude,
        });
    }
    Ok(GeocodeResult {
        point,
        source,
        label: None,
    })
}
