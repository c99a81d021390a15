use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tracing::{debug, info};

use crate::config::DEFAULT_RADIUS_M;
use crate::error::SearchError;
use crate::models::{Category, GeoPoint, PageMeta, PropertyStatus, PropertySummary};
use crate::search::filters::{SortField, SortOrder};
use crate::search::normalize::RawSearchResponse;
use crate::search::query::SearchQuery;
use crate::search::traits::SearchBackend;

const DEFAULT_LIMIT: u32 = 10;

/// Search backend answering from a fixed catalogue, with the same parameter
/// semantics as the REST endpoint.
pub struct InMemorySearchBackend {
    properties: Vec<PropertySummary>,
    calls: AtomicUsize,
}

impl InMemorySearchBackend {
    pub fn new(properties: Vec<PropertySummary>) -> Self {
        Self {
            properties,
            calls: AtomicUsize::new(0),
        }
    }

    /// Backend preloaded with [`demo_catalogue`]
    pub fn demo() -> Self {
        Self::new(demo_catalogue())
    }

    /// Number of searches answered so far
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    fn run(&self, criteria: &Criteria) -> RawSearchResponse {
        let mut matches: Vec<PropertySummary> = self
            .properties
            .iter()
            .filter(|p| criteria.matches(p))
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ordering = compare_by(criteria.sort_by, a, b);
            match criteria.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matches.len() as u64;
        let limit = criteria.limit.max(1);
        let page = criteria.page.max(1);
        let total_pages = total.div_ceil(limit as u64) as u32;
        let skip = ((page - 1) as usize).saturating_mul(limit as usize);

        let data: Vec<PropertySummary> = matches.into_iter().skip(skip).take(limit as usize).collect();

        RawSearchResponse {
            data: Some(data),
            meta: Some(PageMeta {
                total,
                page,
                limit,
                total_pages,
            }),
        }
    }
}

#[async_trait]
impl SearchBackend for InMemorySearchBackend {
    async fn search(&self, query: &SearchQuery) -> Result<RawSearchResponse, SearchError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        debug!("In-memory search with {} parameters", query.len());

        let criteria = Criteria::parse(query)?;
        let response = self.run(&criteria);

        info!(
            "In-memory search matched {} properties",
            response.meta.map_or(0, |m| m.total)
        );
        Ok(response)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Query parameters decoded back into typed criteria
struct Criteria {
    keyword: Option<String>,
    category: Option<Category>,
    status: Option<PropertyStatus>,
    price: (Option<f64>, Option<f64>),
    surface: (Option<f64>, Option<f64>),
    rooms: (Option<u32>, Option<u32>),
    center: Option<GeoPoint>,
    radius_m: f64,
    min_rating: Option<f32>,
    sort_by: SortField,
    sort_order: SortOrder,
    page: u32,
    limit: u32,
}

impl Criteria {
    fn parse(query: &SearchQuery) -> Result<Self, SearchError> {
        let latitude: Option<f64> = param(query, "latitude")?;
        let longitude: Option<f64> = param(query, "longitude")?;
        let sort_order = match query.get("sortOrder") {
            None | Some("desc") => SortOrder::Desc,
            Some("asc") => SortOrder::Asc,
            Some(other) => return Err(bad_request("sortOrder", other)),
        };

        Ok(Self {
            keyword: query.get("search").map(|k| k.trim().to_lowercase()),
            category: param(query, "categorie")?,
            status: param(query, "statut")?,
            price: (param(query, "minPrix")?, param(query, "maxPrix")?),
            surface: (param(query, "minSurface")?, param(query, "maxSurface")?),
            rooms: (param(query, "minPieces")?, param(query, "maxPieces")?),
            center: latitude.zip(longitude).map(|(lat, lon)| GeoPoint::new(lat, lon)),
            radius_m: param::<f64>(query, "rayon")?.unwrap_or(DEFAULT_RADIUS_M as f64),
            min_rating: param(query, "minNote")?,
            sort_by: param(query, "sortBy")?.unwrap_or(SortField::CreatedAt),
            sort_order,
            page: param(query, "page")?.unwrap_or(1),
            limit: param(query, "limit")?.unwrap_or(DEFAULT_LIMIT),
        })
    }

    fn matches(&self, property: &PropertySummary) -> bool {
        if let Some(keyword) = &self.keyword {
            if !property.name.to_lowercase().contains(keyword) {
                return false;
            }
        }
        if self.category.is_some_and(|c| c != property.category) {
            return false;
        }
        if self.status.is_some_and(|s| s != property.status) {
            return false;
        }
        if !in_range(Some(property.price), self.price) {
            return false;
        }
        if !in_range(property.surface, self.surface) {
            return false;
        }
        if !in_range(property.rooms, self.rooms) {
            return false;
        }
        if let Some(min) = self.min_rating {
            if property.rating.map_or(true, |r| r < min) {
                return false;
            }
        }
        if let Some(center) = &self.center {
            match property.location() {
                Some(point) if center.distance_m(&point) <= self.radius_m => {}
                _ => return false,
            }
        }
        true
    }
}

fn param<T: FromStr>(query: &SearchQuery, name: &str) -> Result<Option<T>, SearchError> {
    query
        .get(name)
        .map(|raw| raw.parse::<T>().map_err(|_| bad_request(name, raw)))
        .transpose()
}

fn bad_request(name: &str, raw: &str) -> SearchError {
    SearchError::Remote {
        status: Some(400),
        message: format!("Paramètre invalide {name}: {raw}"),
    }
}

/// Inclusive bounds; a missing value fails any bound that is set.
fn in_range<T: PartialOrd + Copy>(value: Option<T>, (min, max): (Option<T>, Option<T>)) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
}

fn compare_by(field: SortField, a: &PropertySummary, b: &PropertySummary) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Price => a.price.total_cmp(&b.price),
        SortField::Surface => a.surface.unwrap_or(0.0).total_cmp(&b.surface.unwrap_or(0.0)),
        SortField::Rating => a.rating.unwrap_or(0.0).total_cmp(&b.rating.unwrap_or(0.0)),
    }
}

/// Sample listings around Lomé used by the demo binary and tests
pub fn demo_catalogue() -> Vec<PropertySummary> {
    let listing = |id: &str,
                   name: &str,
                   category: Category,
                   price: f64,
                   surface: f64,
                   rooms: u32,
                   point: (f64, f64),
                   rating: Option<f32>,
                   day: u32| PropertySummary {
        id: id.to_string(),
        name: name.to_string(),
        category,
        status: PropertyStatus::Disponible,
        price,
        surface: Some(surface),
        rooms: Some(rooms),
        latitude: Some(point.0),
        longitude: Some(point.1),
        cover_image: Some(format!("/images/proprietes/{id}.jpg")),
        rating,
        review_count: rating.map_or(0, |_| 4),
        created_at: Utc
            .with_ymd_and_hms(2024, 3, day, 9, 0, 0)
            .single()
            .unwrap_or_default(),
    };

    vec![
        listing(
            "prop-001",
            "Villa Bè Kpota avec piscine",
            Category::Villa,
            185_000_000.0,
            420.0,
            6,
            (6.1375, 1.2420),
            Some(4.7),
            2,
        ),
        listing(
            "prop-002",
            "Appartement meublé Tokoin",
            Category::Appartement,
            45_000_000.0,
            95.0,
            3,
            (6.1456, 1.2155),
            Some(4.1),
            5,
        ),
        listing(
            "prop-003",
            "Terrain titré Agoè",
            Category::Terrain,
            12_500_000.0,
            600.0,
            0,
            (6.2310, 1.2010),
            None,
            8,
        ),
        listing(
            "prop-004",
            "Villa duplex Adidogomé",
            Category::Villa,
            98_000_000.0,
            310.0,
            5,
            (6.1680, 1.1720),
            Some(3.9),
            11,
        ),
        listing(
            "prop-005",
            "Bureau plateau Boulevard du 13 Janvier",
            Category::Bureau,
            60_000_000.0,
            140.0,
            4,
            (6.1319, 1.2228),
            Some(4.3),
            14,
        ),
        listing(
            "prop-006",
            "Maison familiale Kara centre",
            Category::Maison,
            38_000_000.0,
            210.0,
            4,
            (9.5511, 1.1861),
            Some(4.0),
            17,
        ),
    ]
}
