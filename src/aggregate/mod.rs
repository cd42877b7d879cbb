//! Ranked group-by queries and scalar metrics over the cleaned table.
//!
//! Every aggregation is a pure function of its input table. Shared
//! conventions:
//!
//! - display-bound numeric results are rounded to 2 decimal places
//! - sort is descending on the aggregated value, except "worst/lowest"
//!   queries which sort ascending
//! - ties break on the group key ascending (or `restaurant_id` ascending
//!   where rows are individual restaurants), so output ordering is
//!   byte-identical across runs
//! - top-N queries truncate after sorting; N is always caller-supplied
//! - an empty input yields an empty result table, and `None` for
//!   single-row "best of" queries
//!
//! # Modules
//!
//! - [`overview`]: whole-table scalar metrics
//! - [`countries`]: per-country rankings
//! - [`cities`]: per-city top-N rankings
//! - [`restaurants`]: restaurant and cuisine rankings

pub mod cities;
pub mod countries;
pub mod overview;
pub mod restaurants;

pub use cities::{
    cuisines_per_city, high_rating_restaurants_per_city, low_rating_restaurants_per_city,
    max_cost_usd_per_city, restaurants_per_city,
};
pub use countries::{
    cities_per_country, cuisines_per_country, mean_cost_usd_per_country,
    mean_rating_per_country, restaurants_per_country, votes_per_country,
};
pub use overview::{overview_metrics, OverviewMetrics};
pub use restaurants::{
    best_cuisines, best_restaurant_for_cuisine, top_restaurants, worst_cuisines,
    RestaurantHighlight,
};

use std::cmp::Ordering;

use crate::normalize::columns;
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Sort direction for the aggregated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortOrder {
    Ascending,
    Descending,
}

/// Round to 2 decimal places for display.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Sort `(key, value)` entries by value in `order`, breaking ties on the key
/// ascending.
pub(crate) fn sort_ranked<K: Ord, V: PartialOrd>(entries: &mut [(K, V)], order: SortOrder) {
    entries.sort_by(|a, b| {
        let by_value = match order {
            SortOrder::Descending => b.1.partial_cmp(&a.1),
            SortOrder::Ascending => a.1.partial_cmp(&b.1),
        }
        .unwrap_or(Ordering::Equal);
        by_value.then_with(|| a.0.cmp(&b.0))
    });
}

pub(crate) fn str_cell<'a>(row: &'a [Value], idx: usize) -> Option<&'a str> {
    row.get(idx).and_then(Value::as_str)
}

/// Result table `[key, metric]` from already-sorted entries.
pub(crate) fn single_key_table(
    key_name: &str,
    metric_name: &str,
    metric_type: DataType,
    entries: Vec<(String, Value)>,
) -> DataSet {
    let schema = Schema::new(vec![
        Field::new(key_name, DataType::Utf8),
        Field::new(metric_name, metric_type),
    ]);
    let rows = entries
        .into_iter()
        .map(|(key, value)| vec![Value::Utf8(key), value])
        .collect();
    DataSet::new(schema, rows)
}

/// Result table `[city, country_name, metric]` from already-sorted entries.
pub(crate) fn city_country_table(
    metric_name: &str,
    metric_type: DataType,
    entries: Vec<((String, String), Value)>,
) -> DataSet {
    let schema = Schema::new(vec![
        Field::new(columns::CITY, DataType::Utf8),
        Field::new(columns::COUNTRY_NAME, DataType::Utf8),
        Field::new(metric_name, metric_type),
    ]);
    let rows = entries
        .into_iter()
        .map(|((city, country), value)| {
            vec![Value::Utf8(city), Value::Utf8(country), value]
        })
        .collect();
    DataSet::new(schema, rows)
}
