use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod session;

pub use session::{UserRole, UserSession};

/// Property category as used by the marketplace API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Villa,
    Appartement,
    Maison,
    Studio,
    Terrain,
    Bureau,
    Commerce,
    Immeuble,
    #[serde(other)]
    Autre,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Villa,
        Category::Appartement,
        Category::Maison,
        Category::Studio,
        Category::Terrain,
        Category::Bureau,
        Category::Commerce,
        Category::Immeuble,
        Category::Autre,
    ];

    /// Wire value, e.g. `VILLA`
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Villa => "VILLA",
            Category::Appartement => "APPARTEMENT",
            Category::Maison => "MAISON",
            Category::Studio => "STUDIO",
            Category::Terrain => "TERRAIN",
            Category::Bureau => "BUREAU",
            Category::Commerce => "COMMERCE",
            Category::Immeuble => "IMMEUBLE",
            Category::Autre => "AUTRE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Availability of a listed property
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    Disponible,
    Reserve,
    Vendu,
    Loue,
    #[serde(other)]
    Autre,
}

impl PropertyStatus {
    pub const ALL: [PropertyStatus; 5] = [
        PropertyStatus::Disponible,
        PropertyStatus::Reserve,
        PropertyStatus::Vendu,
        PropertyStatus::Loue,
        PropertyStatus::Autre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Disponible => "DISPONIBLE",
            PropertyStatus::Reserve => "RESERVE",
            PropertyStatus::Vendu => "VENDU",
            PropertyStatus::Loue => "LOUE",
            PropertyStatus::Autre => "AUTRE",
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        PropertyStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == wanted)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Returned when a string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownVariant(pub String);

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance in metres (haversine)
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }
}

/// One search result as returned by the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    pub id: String,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "categorie")]
    pub category: Category,
    #[serde(rename = "statut")]
    pub status: PropertyStatus,
    #[serde(rename = "prix")]
    pub price: f64,
    #[serde(default)]
    pub surface: Option<f64>,
    #[serde(rename = "nombrePieces", default)]
    pub rooms: Option<u32>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(rename = "imagePrincipale", default)]
    pub cover_image: Option<String>,
    #[serde(rename = "noteMoyenne", default)]
    pub rating: Option<f32>,
    #[serde(rename = "nombreAvis", default)]
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
}

impl PropertySummary {
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }
}

/// Pagination metadata attached to every search response
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// A buyer's bookmarked property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    #[serde(rename = "propriete")]
    pub property: PropertySummary,
    pub created_at: DateTime<Utc>,
}
