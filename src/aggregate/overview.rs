//! Whole-table scalar metrics for the overview display.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::PipelineResult;
use crate::normalize::columns;
use crate::types::{DataSet, Value};

/// Headline counts over a (possibly filtered) cleaned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewMetrics {
    /// Distinct restaurant ids.
    pub restaurants: usize,
    /// Distinct country codes.
    pub countries: usize,
    /// Distinct city names.
    pub cities: usize,
    /// Sum of all votes.
    pub total_votes: i64,
    /// Distinct cuisine tags.
    pub cuisines: usize,
}

/// Compute the overview metrics in one pass.
pub fn overview_metrics(ds: &DataSet) -> PipelineResult<OverviewMetrics> {
    let id_idx = ds.require_column(columns::RESTAURANT_ID)?;
    let country_idx = ds.require_column(columns::COUNTRY_CODE)?;
    let city_idx = ds.require_column(columns::CITY)?;
    let votes_idx = ds.require_column(columns::VOTES)?;
    let cuisines_idx = ds.require_column(columns::CUISINES)?;

    let mut restaurants: HashSet<i64> = HashSet::new();
    let mut countries: HashSet<i64> = HashSet::new();
    let mut cities: HashSet<&str> = HashSet::new();
    let mut cuisines: HashSet<&str> = HashSet::new();
    let mut total_votes: i64 = 0;

    for row in &ds.rows {
        if let Some(id) = row.get(id_idx).and_then(Value::as_i64) {
            restaurants.insert(id);
        }
        if let Some(code) = row.get(country_idx).and_then(Value::as_i64) {
            countries.insert(code);
        }
        if let Some(city) = row.get(city_idx).and_then(Value::as_str) {
            cities.insert(city);
        }
        if let Some(cuisine) = row.get(cuisines_idx).and_then(Value::as_str) {
            cuisines.insert(cuisine);
        }
        total_votes += row.get(votes_idx).and_then(Value::as_i64).unwrap_or(0);
    }

    Ok(OverviewMetrics {
        restaurants: restaurants.len(),
        countries: countries.len(),
        cities: cities.len(),
        total_votes,
        cuisines: cuisines.len(),
    })
}
