use tracing::debug;

use crate::listing::{apply, CategorySelector, Listing, SortKey};

/// A fetched list plus its filtered/sorted view.
///
/// The view is rebuilt only when the list, the selector or the sort key changes.
#[derive(Debug, Clone)]
pub struct ListingView<T> {
    items: Vec<T>,
    selector: CategorySelector,
    sort: SortKey,
    view: Vec<T>,
    rebuilds: usize,
}

impl<T: Listing + Clone> ListingView<T> {
    pub fn new(items: Vec<T>) -> Self {
        let mut listing = Self {
            items,
            selector: CategorySelector::All,
            sort: SortKey::Recent,
            view: Vec::new(),
            rebuilds: 0,
        };
        listing.rebuild();
        listing
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn visible(&self) -> &[T] {
        &self.view
    }

    pub fn selector(&self) -> CategorySelector {
        self.selector
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    /// How many times the view has been computed
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.rebuild();
    }

    pub fn set_selector(&mut self, selector: CategorySelector) {
        if self.selector != selector {
            self.selector = selector;
            self.rebuild();
        }
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if self.sort != sort {
            self.sort = sort;
            self.rebuild();
        }
    }

    /// Drop items matching `predicate`, e.g. after removing a favorite
    pub fn remove_where<F>(&mut self, predicate: F)
    where
        F: Fn(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|item| !predicate(item));
        if self.items.len() != before {
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        self.view = apply(&self.items, self.selector, self.sort);
        self.rebuilds += 1;
        debug!(
            "Listing view rebuilt: {} of {} items ({:?}, {})",
            self.view.len(),
            self.items.len(),
            self.selector,
            self.sort
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::search::memory::demo_catalogue;

    #[test]
    fn unchanged_inputs_do_not_rebuild() {
        let mut listing = ListingView::new(demo_catalogue());
        assert_eq!(listing.rebuilds(), 1);

        listing.set_selector(CategorySelector::All);
        listing.set_sort(SortKey::Recent);
        assert_eq!(listing.rebuilds(), 1);

        listing.set_sort(SortKey::PriceLow);
        assert_eq!(listing.rebuilds(), 2);
        assert_eq!(listing.visible()[0].id, "prop-003");
    }

    #[test]
    fn selector_change_updates_visible_items() {
        let mut listing = ListingView::new(demo_catalogue());
        listing.set_selector(CategorySelector::Only(Category::Villa));

        assert_eq!(listing.visible().len(), 2);
        assert_eq!(listing.items().len(), 6);
    }

    #[test]
    fn favorites_sort_by_bookmark_date() {
        use crate::models::Favorite;
        use chrono::{Duration, TimeZone, Utc};

        let added = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let favorites: Vec<Favorite> = demo_catalogue()
            .into_iter()
            .enumerate()
            .map(|(i, property)| Favorite {
                id: format!("fav-{i}"),
                property,
                created_at: added - Duration::days(i as i64),
            })
            .collect();

        let mut listing = ListingView::new(favorites);
        assert_eq!(listing.visible()[0].id, "fav-0");

        listing.set_selector(CategorySelector::Only(Category::Villa));
        listing.set_sort(SortKey::PriceHigh);
        let ids: Vec<&str> = listing.visible().iter().map(|f| f.property.id.as_str()).collect();
        assert_eq!(ids, vec!["prop-001", "prop-004"]);
    }

    #[test]
    fn removing_an_item_refreshes_the_view() {
        let mut listing = ListingView::new(demo_catalogue());
        listing.remove_where(|p| p.id == "prop-006");
        assert_eq!(listing.visible().len(), 5);
        assert_eq!(listing.visible()[0].id, "prop-005");

        let rebuilds = listing.rebuilds();
        listing.remove_where(|p| p.id == "missing");
        assert_eq!(listing.rebuilds(), rebuilds);
    }
}
