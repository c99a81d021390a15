use url::{form_urlencoded, Url};

use crate::search::filters::SearchFilters;

/// Query parameters for the search endpoint, empty criteria already removed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pairs: Vec<(&'static str, String)>,
}

impl SearchQuery {
    pub fn from_filters(filters: &SearchFilters) -> Self {
        let mut query = Self::default();

        if !filters.keyword.trim().is_empty() {
            query.push("search", &filters.keyword);
        }
        query.push_opt("categorie", filters.category);
        query.push_opt("statut", filters.status);
        query.push_opt("minPrix", filters.min_price);
        query.push_opt("maxPrix", filters.max_price);
        query.push_opt("minSurface", filters.min_surface);
        query.push_opt("maxSurface", filters.max_surface);
        query.push_opt("minPieces", filters.min_rooms);
        query.push_opt("maxPieces", filters.max_rooms);
        query.push_opt("latitude", filters.latitude);
        query.push_opt("longitude", filters.longitude);
        query.push_opt("rayon", filters.radius_m);
        query.push_opt("minNote", filters.min_rating);
        query.push_opt("sortBy", filters.sort_by);
        query.push_opt("sortOrder", filters.sort_order);
        query.push_opt("page", filters.page);
        query.push_opt("limit", filters.limit);

        query
    }

    fn push(&mut self, name: &'static str, value: impl ToString) {
        self.pairs.push((name, value.to_string()));
    }

    fn push_opt<T: ToString>(&mut self, name: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// `application/x-www-form-urlencoded` rendering, without a leading `?`
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }

    /// Endpoint URL with these parameters appended
    pub fn apply_to(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        if !self.pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }
}

impl From<&SearchFilters> for SearchQuery {
    fn from(filters: &SearchFilters) -> Self {
        Self::from_filters(filters)
    }
}
