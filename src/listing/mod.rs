//! In-memory category filtering and sorting for lists that are already fetched,
//! such as a buyer's favorites.

pub mod view;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Category, Favorite, PropertySummary, UnknownVariant};

pub use view::ListingView;

/// What the post-filter and sorter need to know about an item
pub trait Listing {
    fn category(&self) -> Category;
    fn price(&self) -> f64;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Listing for PropertySummary {
    fn category(&self) -> Category {
        self.category
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Favorites sort by when they were bookmarked, not when the property was listed.
impl Listing for Favorite {
    fn category(&self) -> Category {
        self.property.category
    }

    fn price(&self) -> f64 {
        self.property.price
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Category tab selected on a listing page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategorySelector {
    #[default]
    All,
    Only(Category),
}

impl CategorySelector {
    pub fn accepts(&self, category: Category) -> bool {
        match self {
            CategorySelector::All => true,
            CategorySelector::Only(wanted) => *wanted == category,
        }
    }
}

impl FromStr for CategorySelector {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategorySelector::All);
        }
        s.parse().map(CategorySelector::Only)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Recent,
    PriceHigh,
    PriceLow,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Recent => "recent",
            SortKey::PriceHigh => "price-high",
            SortKey::PriceLow => "price-low",
        }
    }

    fn compare<T: Listing>(&self, a: &T, b: &T) -> Ordering {
        match self {
            SortKey::Recent => b.created_at().cmp(&a.created_at()),
            SortKey::PriceHigh => b.price().total_cmp(&a.price()),
            SortKey::PriceLow => a.price().total_cmp(&b.price()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(SortKey::Recent),
            "price-high" => Ok(SortKey::PriceHigh),
            "price-low" => Ok(SortKey::PriceLow),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Items whose category passes `selector`, in their original order
pub fn filter_by_category<T: Listing + Clone>(items: &[T], selector: CategorySelector) -> Vec<T> {
    items
        .iter()
        .filter(|item| selector.accepts(item.category()))
        .cloned()
        .collect()
}

/// Sorted copy of `items`; ties keep their relative order
pub fn sort_listings<T: Listing + Clone>(items: &[T], key: SortKey) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted
}

/// Filter then sort
pub fn apply<T: Listing + Clone>(items: &[T], selector: CategorySelector, key: SortKey) -> Vec<T> {
    let mut view = filter_by_category(items, selector);
    view.sort_by(|a, b| key.compare(a, b));
    view
}
