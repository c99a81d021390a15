//! Property search client for the marketplace: search criteria, query
//! building, remote search, in-memory listing filters, geocoding and favorites.

pub mod config;
pub mod error;
pub mod favorites;
pub mod geocoding;
pub mod listing;
pub mod models;
pub mod notify;
pub mod search;

pub use config::AppConfig;
pub use error::{FavoriteError, GeocodeError, SearchError};
pub use models::{Category, GeoPoint, PageMeta, PropertyStatus, PropertySummary};
pub use search::{SearchFilters, SearchSession};
