pub mod client;
pub mod filters;
pub mod memory;
pub mod normalize;
pub mod query;
pub mod session;
pub mod traits;

pub use client::HttpSearchBackend;
pub use filters::{SearchFilters, SortField, SortOrder};
pub use memory::InMemorySearchBackend;
pub use normalize::{normalize, RawSearchResponse, SearchPage};
pub use query::SearchQuery;
pub use session::{LoadingFlag, SearchSession};
pub use traits::SearchBackend;
