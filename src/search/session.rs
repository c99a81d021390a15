use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::SearchError;
use crate::geocoding::{GeocodeError, GeocodeResult, Geocoder};
use crate::notify::Notification;
use crate::search::filters::SearchFilters;
use crate::search::normalize::{normalize, SearchPage};
use crate::search::query::SearchQuery;
use crate::search::traits::SearchBackend;

/// Loading indicator that can be watched from outside the session
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn set(&self, value: bool) {
        self.0.store(value, Ordering::SeqCst);
    }
}

/// Holds the flag up until dropped, including when the request future is dropped early.
struct LoadingGuard(LoadingFlag);

impl LoadingGuard {
    fn engage(flag: &LoadingFlag) -> Self {
        flag.set(true);
        Self(flag.clone())
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// State of one search page view: criteria, last results, loading flag and
/// pending notifications.
///
/// Search methods take `&mut self`, so a session never has two requests in flight.
pub struct SearchSession<B> {
    backend: B,
    filters: SearchFilters,
    page: SearchPage,
    loading: LoadingFlag,
    notifications: Vec<Notification>,
}

impl<B: SearchBackend> SearchSession<B> {
    pub fn new(backend: B) -> Self {
        Self::with_filters(backend, SearchFilters::default())
    }

    pub fn with_filters(backend: B, filters: SearchFilters) -> Self {
        Self {
            backend,
            filters,
            page: SearchPage::default(),
            loading: LoadingFlag::default(),
            notifications: Vec::new(),
        }
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn results(&self) -> &SearchPage {
        &self.page
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    /// Replace the held filters with `update(current)`
    pub fn update_filters<F>(&mut self, update: F)
    where
        F: FnOnce(SearchFilters) -> SearchFilters,
    {
        let current = std::mem::replace(&mut self.filters, SearchFilters::empty());
        self.filters = update(current);
    }

    pub fn reset_filters(&mut self) {
        self.filters = SearchFilters::default();
    }

    /// Take every queued notification
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Run one search with the current filters.
    ///
    /// On success the held page is replaced; on failure it is kept as is and an
    /// error notification is queued. The loading flag is cleared on every path.
    pub async fn run_search(&mut self) -> Result<&SearchPage, SearchError> {
        let inverted = self.filters.inverted_ranges();
        if !inverted.is_empty() {
            debug!("Searching with inverted ranges: {:?}", inverted);
        }

        let query = SearchQuery::from_filters(&self.filters);
        debug!(
            "Dispatching search to {} backend: {}",
            self.backend.backend_name(),
            query.to_query_string()
        );

        let outcome = {
            let _loading = LoadingGuard::engage(&self.loading);
            self.backend.search(&query).await
        };

        match outcome {
            Ok(raw) => {
                self.page = normalize(raw);
                info!(
                    "Displaying {} properties (page {} of {})",
                    self.page.len(),
                    self.page.meta.page,
                    self.page.meta.total_pages
                );
                Ok(&self.page)
            }
            Err(err) => {
                warn!("Search failed: {}", err);
                self.notifications.push(Notification::error(err.user_message()));
                Err(err)
            }
        }
    }

    /// Move to `page` and fetch it, replacing the current results.
    pub async fn go_to_page(&mut self, page: u32) -> Result<&SearchPage, SearchError> {
        if page == 0 {
            let err = SearchError::Validation("Numéro de page invalide".to_string());
            self.notifications.push(Notification::error(err.user_message()));
            return Err(err);
        }
        self.update_filters(|f| f.with_page(Some(page)));
        self.run_search().await
    }

    /// Resolve `address` and store the coordinates in the filters.
    ///
    /// Previously resolved coordinates are left untouched on failure.
    pub async fn apply_geocode(
        &mut self,
        geocoder: &Geocoder,
        address: &str,
    ) -> Result<GeocodeResult, GeocodeError> {
        match geocoder.resolve(address).await {
            Ok(result) => {
                self.update_filters(|f| f.with_location(Some(result.point)));
                self.notifications.push(Notification::success(format!(
                    "Position trouvée: {:.4}, {:.4}",
                    result.point.latitude, result.point.longitude
                )));
                Ok(result)
            }
            Err(err) => {
                warn!("Geocoding failed for {:?}: {}", address, err);
                self.notifications.push(Notification::error(err.user_message()));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, GeoPoint, PageMeta};
    use crate::notify::NotificationLevel;
    use crate::search::memory::InMemorySearchBackend;
    use crate::search::normalize::RawSearchResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with queued outcomes and records whether loading was set during the call.
    struct ScriptedBackend {
        outcomes: Mutex<Vec<Result<RawSearchResponse, SearchError>>>,
        flag: Mutex<Option<LoadingFlag>>,
        seen_loading: Mutex<Vec<bool>>,
    }

    impl ScriptedBackend {
        fn new(outcomes: Vec<Result<RawSearchResponse, SearchError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                flag: Mutex::new(None),
                seen_loading: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchBackend for ScriptedBackend {
        async fn search(&self, _query: &SearchQuery) -> Result<RawSearchResponse, SearchError> {
            if let Some(flag) = self.flag.lock().unwrap().as_ref() {
                self.seen_loading.lock().unwrap().push(flag.is_loading());
            }
            self.outcomes.lock().unwrap().remove(0)
        }

        fn backend_name(&self) -> &'static str {
            "scripted"
        }
    }

    fn page_of(total: u64) -> RawSearchResponse {
        let mut data = crate::search::memory::demo_catalogue();
        data.truncate(total as usize);
        RawSearchResponse {
            data: Some(data),
            meta: Some(PageMeta {
                total,
                page: 1,
                limit: 10,
                total_pages: 1,
            }),
        }
    }

    #[tokio::test]
    async fn loading_is_set_during_call_and_cleared_after() {
        let backend = ScriptedBackend::new(vec![
            Ok(page_of(2)),
            Err(SearchError::Transport("connection reset".into())),
        ]);
        let mut session = SearchSession::new(backend);
        *session.backend().flag.lock().unwrap() = Some(session.loading_flag());

        session.run_search().await.unwrap();
        assert!(!session.is_loading());

        session.run_search().await.unwrap_err();
        assert!(!session.is_loading());

        assert_eq!(*session.backend().seen_loading.lock().unwrap(), vec![true, true]);
    }

    #[tokio::test]
    async fn failure_keeps_previous_results() {
        let backend = ScriptedBackend::new(vec![
            Ok(page_of(3)),
            Err(SearchError::Remote {
                status: Some(500),
                message: "Base de données indisponible".into(),
            }),
        ]);
        let mut session = SearchSession::new(backend);

        session.run_search().await.unwrap();
        let before = session.results().clone();

        let err = session.run_search().await.unwrap_err();
        assert!(matches!(err, SearchError::Remote { .. }));
        assert_eq!(session.results(), &before);
        assert_eq!(session.results().len(), 3);

        let notifications = session.drain_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, NotificationLevel::Error);
        assert_eq!(notifications[0].message, "Base de données indisponible");
        assert!(session.notifications().is_empty());
    }

    #[tokio::test]
    async fn success_replaces_results_wholesale() {
        let backend = ScriptedBackend::new(vec![Ok(page_of(4)), Ok(RawSearchResponse::default())]);
        let mut session = SearchSession::new(backend);

        session.run_search().await.unwrap();
        assert_eq!(session.results().len(), 4);

        session.run_search().await.unwrap();
        assert!(session.results().is_empty());
        assert_eq!(session.results().meta, PageMeta::default());
    }

    #[tokio::test]
    async fn go_to_page_refetches_instead_of_appending() {
        let mut session = SearchSession::with_filters(
            InMemorySearchBackend::demo(),
            SearchFilters::default().with_limit(Some(4)),
        );

        session.run_search().await.unwrap();
        assert_eq!(session.results().len(), 4);

        session.go_to_page(2).await.unwrap();
        assert_eq!(session.filters().page, Some(2));
        assert_eq!(session.results().len(), 2);
        assert_eq!(session.results().meta.page, 2);
        assert_eq!(session.backend().calls(), 2);
    }

    #[tokio::test]
    async fn page_zero_is_rejected_without_a_request() {
        let mut session = SearchSession::new(InMemorySearchBackend::demo());
        assert!(session.go_to_page(0).await.is_err());
        assert_eq!(session.backend().calls(), 0);
        assert_eq!(session.notifications().len(), 1);
    }

    #[tokio::test]
    async fn geocoded_coordinates_land_in_filters() {
        let geocoder = Geocoder::offline();
        let mut session = SearchSession::new(InMemorySearchBackend::demo());

        session.apply_geocode(&geocoder, "6.1319, 1.2228").await.unwrap();
        assert_eq!(session.filters().location(), Some(GeoPoint::new(6.1319, 1.2228)));

        assert!(session.apply_geocode(&geocoder, "rue inconnue").await.is_err());
        assert_eq!(session.filters().location(), Some(GeoPoint::new(6.1319, 1.2228)));

        let levels: Vec<_> = session
            .drain_notifications()
            .into_iter()
            .map(|n| n.level)
            .collect();
        assert_eq!(levels, vec![NotificationLevel::Success, NotificationLevel::Error]);
    }

    #[tokio::test]
    async fn blank_address_leaves_filters_alone() {
        use crate::geocoding::{GeoCandidate, GeocodingProvider};
        use std::sync::atomic::AtomicUsize;

        struct CountingProvider(Arc<AtomicUsize>);

        #[async_trait]
        impl GeocodingProvider for CountingProvider {
            async fn lookup(&self, _address: &str) -> Result<Vec<GeoCandidate>, GeocodeError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(vec![GeoCandidate {
                    point: GeoPoint::new(6.2, 1.3),
                    label: None,
                }])
            }

            fn provider_name(&self) -> &'static str {
                "counting"
            }
        }

        let lookups = Arc::new(AtomicUsize::new(0));
        let geocoder = Geocoder::new(CountingProvider(Arc::clone(&lookups)));
        let filters = SearchFilters::default().with_location(Some(GeoPoint::new(9.5511, 1.1861)));
        let mut session = SearchSession::with_filters(InMemorySearchBackend::demo(), filters.clone());

        let err = session.apply_geocode(&geocoder, "  ").await.unwrap_err();

        assert!(matches!(err, GeocodeError::EmptyAddress));
        assert_eq!(lookups.load(Ordering::SeqCst), 0);
        assert_eq!(session.filters(), &filters);

        let notifications = session.drain_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, NotificationLevel::Error);
        assert_eq!(notifications[0].message, "Veuillez saisir une adresse");
    }

    #[tokio::test]
    async fn filter_updates_drive_the_next_search() {
        let mut session = SearchSession::new(InMemorySearchBackend::demo());
        session.update_filters(|f| f.with_category(Some(Category::Villa)));

        let page = session.run_search().await.unwrap();
        assert_eq!(page.len(), 2);
        assert!(page.items.iter().all(|p| p.category == Category::Villa));

        session.reset_filters();
        assert_eq!(session.filters(), &SearchFilters::default());
    }
}
