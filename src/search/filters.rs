use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_RADIUS_M;
use crate::models::{Category, GeoPoint, PropertyStatus, UnknownVariant};

/// Field the search endpoint orders results by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortField {
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "prix")]
    Price,
    #[serde(rename = "surface")]
    Surface,
    #[serde(rename = "note")]
    Rating,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::Price => "prix",
            SortField::Surface => "surface",
            SortField::Rating => "note",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(SortField::CreatedAt),
            "prix" => Ok(SortField::Price),
            "surface" => Ok(SortField::Surface),
            "note" => Ok(SortField::Rating),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search criteria held by a page view.
///
/// `None` (or an empty keyword) means "no constraint" and is left out of the
/// query. Min/max pairs are not cross-checked; see [`SearchFilters::inverted_ranges`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilters {
    pub keyword: String,
    pub category: Option<Category>,
    pub status: Option<PropertyStatus>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_surface: Option<u32>,
    pub max_surface: Option<u32>,
    pub min_rooms: Option<u32>,
    pub max_rooms: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Search radius in metres around (latitude, longitude)
    pub radius_m: Option<u32>,
    pub min_rating: Option<f32>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Default for SearchFilters {
    /// The value a freshly mounted search page starts with.
    fn default() -> Self {
        Self {
            radius_m: Some(DEFAULT_RADIUS_M),
            sort_by: Some(SortField::CreatedAt),
            sort_order: Some(SortOrder::Desc),
            page: Some(1),
            ..Self::empty()
        }
    }
}

impl SearchFilters {
    /// Every field at its empty sentinel.
    pub fn empty() -> Self {
        Self {
            keyword: String::new(),
            category: None,
            status: None,
            min_price: None,
            max_price: None,
            min_surface: None,
            max_surface: None,
            min_rooms: None,
            max_rooms: None,
            latitude: None,
            longitude: None,
            radius_m: None,
            min_rating: None,
            sort_by: None,
            sort_order: None,
            page: None,
            limit: None,
        }
    }

    pub fn reset(&self) -> Self {
        Self::default()
    }

    pub fn with_keyword(self, keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..self
        }
    }

    pub fn with_category(self, category: Option<Category>) -> Self {
        Self { category, ..self }
    }

    pub fn with_status(self, status: Option<PropertyStatus>) -> Self {
        Self { status, ..self }
    }

    pub fn with_price_range(self, min_price: Option<u64>, max_price: Option<u64>) -> Self {
        Self {
            min_price,
            max_price,
            ..self
        }
    }

    pub fn with_surface_range(self, min_surface: Option<u32>, max_surface: Option<u32>) -> Self {
        Self {
            min_surface,
            max_surface,
            ..self
        }
    }

    pub fn with_room_range(self, min_rooms: Option<u32>, max_rooms: Option<u32>) -> Self {
        Self {
            min_rooms,
            max_rooms,
            ..self
        }
    }

    pub fn with_location(self, point: Option<GeoPoint>) -> Self {
        Self {
            latitude: point.map(|p| p.latitude),
            longitude: point.map(|p| p.longitude),
            ..self
        }
    }

    pub fn with_radius(self, radius_m: Option<u32>) -> Self {
        Self { radius_m, ..self }
    }

    pub fn with_min_rating(self, min_rating: Option<f32>) -> Self {
        Self { min_rating, ..self }
    }

    pub fn with_sort(self, sort_by: Option<SortField>, sort_order: Option<SortOrder>) -> Self {
        Self {
            sort_by,
            sort_order,
            ..self
        }
    }

    pub fn with_page(self, page: Option<u32>) -> Self {
        Self { page, ..self }
    }

    pub fn with_limit(self, limit: Option<u32>) -> Self {
        Self { limit, ..self }
    }

    /// Both coordinates, when set
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }

    /// Names of the paired ranges whose minimum exceeds their maximum.
    pub fn inverted_ranges(&self) -> Vec<&'static str> {
        let mut inverted = Vec::new();
        if matches!((self.min_price, self.max_price), (Some(min), Some(max)) if min > max) {
            inverted.push("prix");
        }
        if matches!((self.min_surface, self.max_surface), (Some(min), Some(max)) if min > max) {
            inverted.push("surface");
        }
        if matches!((self.min_rooms, self.max_rooms), (Some(min), Some(max)) if min > max) {
            inverted.push("pieces");
        }
        inverted
    }
}
