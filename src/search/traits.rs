use async_trait::async_trait;

use crate::error::SearchError;
use crate::search::normalize::RawSearchResponse;
use crate::search::query::SearchQuery;

/// Anything that can answer a property search.
/// Implemented by the HTTP client and by the in-memory catalogue used in tests and demos.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run exactly one search round trip
    async fn search(&self, query: &SearchQuery) -> Result<RawSearchResponse, SearchError>;

    /// Name used in logs
    fn backend_name(&self) -> &'static str;
}
