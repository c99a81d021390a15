use async_trait::async_trait;
use serde::Serialize;

use crate::error::GeocodeError;
use crate::models::GeoPoint;

/// One candidate returned by a provider, already in (latitude, longitude) order
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeoCandidate {
    pub point: GeoPoint,
    pub label: Option<String>,
}

/// Third-party free-text address lookup
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Issue one lookup; candidates best-first
    async fn lookup(&self, address: &str) -> Result<Vec<GeoCandidate>, GeocodeError>;

    fn provider_name(&self) -> &'static str;
}

/// Provider that never finds anything, for setups without a geocoding service
pub struct OfflineProvider;

#[async_trait]
impl GeocodingProvider for OfflineProvider {
    async fn lookup(&self, _address: &str) -> Result<Vec<GeoCandidate>, GeocodeError> {
        Ok(Vec::new())
    }

    fn provider_name(&self) -> &'static str {
        "offline"
    }
}
