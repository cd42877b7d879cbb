//! Per-city top-N rankings, grouped on `(city, country_name)`.
//!
//! Cities are grouped together with their country so that city-name
//! collisions across countries stay distinct rows. Result tables carry
//! `[city, country_name, metric]`, sorted descending on the metric with ties
//! broken by `(city, country_name)` ascending, truncated to the
//! caller-supplied N.

use std::collections::{HashMap, HashSet};

use super::{city_country_table, round2, sort_ranked, str_cell, SortOrder};
use crate::error::PipelineResult;
use crate::normalize::columns;
use crate::types::{DataSet, DataType, Value};

type CityKey = (String, String);

/// Top-N cities by restaurant count: `[city, country_name, restaurant_count]`.
pub fn restaurants_per_city(ds: &DataSet, n: usize) -> PipelineResult<DataSet> {
    count_per_city(ds, n, None)
}

/// Top-N cities by count of restaurants rated above 4.0.
///
/// The rating threshold filters rows before grouping.
pub fn high_rating_restaurants_per_city(ds: &DataSet, n: usize) -> PipelineResult<DataSet> {
    count_per_city(ds, n, Some(RatingThreshold::Above(4.0)))
}

/// Top-N cities by count of restaurants rated below 2.5.
///
/// The rating threshold filters rows before grouping.
pub fn low_rating_restaurants_per_city(ds: &DataSet, n: usize) -> PipelineResult<DataSet> {
    count_per_city(ds, n, Some(RatingThreshold::Below(2.5)))
}

/// Top-N cities by distinct cuisine tags: `[city, country_name, cuisine_count]`.
pub fn cuisines_per_city(ds: &DataSet, n: usize) -> PipelineResult<DataSet> {
    let city_idx = ds.require_column(columns::CITY)?;
    let country_idx = ds.require_column(columns::COUNTRY_NAME)?;
    let cuisines_idx = ds.require_column(columns::CUISINES)?;

    let mut distinct: HashMap<CityKey, HashSet<String>> = HashMap::new();
    for row in &ds.rows {
        if let (Some(city), Some(country), Some(cuisine)) = (
            str_cell(row, city_idx),
            str_cell(row, country_idx),
            str_cell(row, cuisines_idx),
        ) {
            distinct
                .entry((city.to_string(), country.to_string()))
                .or_default()
                .insert(cuisine.to_string());
        }
    }

    let mut entries: Vec<(CityKey, i64)> = distinct
        .into_iter()
        .map(|(key, cuisines)| (key, cuisines.len() as i64))
        .collect();
    sort_ranked(&mut entries, SortOrder::Descending);
    entries.truncate(n);
    let entries = entries
        .into_iter()
        .map(|(key, count)| (key, Value::Int64(count)))
        .collect();
    Ok(city_country_table("cuisine_count", DataType::Int64, entries))
}

/// Top-N cities by the highest USD cost for two, rounded to 2 decimals:
/// `[city, country_name, average_cost_for_two_USD]`.
pub fn max_cost_usd_per_city(ds: &DataSet, n: usize) -> PipelineResult<DataSet> {
    let city_idx = ds.require_column(columns::CITY)?;
    let country_idx = ds.require_column(columns::COUNTRY_NAME)?;
    let cost_idx = ds.require_column(columns::AVERAGE_COST_FOR_TWO_USD)?;

    let mut max_cost: HashMap<CityKey, f64> = HashMap::new();
    for row in &ds.rows {
        if let (Some(city), Some(country), Some(cost)) = (
            str_cell(row, city_idx),
            str_cell(row, country_idx),
            row.get(cost_idx).and_then(Value::as_f64),
        ) {
            max_cost
                .entry((city.to_string(), country.to_string()))
                .and_modify(|current| *current = current.max(cost))
                .or_insert(cost);
        }
    }

    let mut entries: Vec<(CityKey, f64)> = max_cost
        .into_iter()
        .map(|(key, cost)| (key, round2(cost)))
        .collect();
    sort_ranked(&mut entries, SortOrder::Descending);
    entries.truncate(n);
    let entries = entries
        .into_iter()
        .map(|(key, cost)| (key, Value::Float64(cost)))
        .collect();
    Ok(city_country_table(
        columns::AVERAGE_COST_FOR_TWO_USD,
        DataType::Float64,
        entries,
    ))
}

enum RatingThreshold {
    Above(f64),
    Below(f64),
}

impl RatingThreshold {
    fn keeps(&self, rating: f64) -> bool {
        match self {
            RatingThreshold::Above(limit) => rating > *limit,
            RatingThreshold::Below(limit) => rating < *limit,
        }
    }
}

fn count_per_city(
    ds: &DataSet,
    n: usize,
    threshold: Option<RatingThreshold>,
) -> PipelineResult<DataSet> {
    let city_idx = ds.require_column(columns::CITY)?;
    let country_idx = ds.require_column(columns::COUNTRY_NAME)?;
    let rating_idx = ds.require_column(columns::AGGREGATE_RATING)?;

    let mut counts: HashMap<CityKey, i64> = HashMap::new();
    for row in &ds.rows {
        if let Some(threshold) = &threshold {
            let keep = row
                .get(rating_idx)
                .and_then(Value::as_f64)
                .is_some_and(|rating| threshold.keeps(rating));
            if !keep {
                continue;
            }
        }
        if let (Some(city), Some(country)) = (str_cell(row, city_idx), str_cell(row, country_idx)) {
            *counts
                .entry((city.to_string(), country.to_string()))
                .or_default() += 1;
        }
    }

    let mut entries: Vec<(CityKey, i64)> = counts.into_iter().collect();
    sort_ranked(&mut entries, SortOrder::Descending);
    entries.truncate(n);
    let entries = entries
        .into_iter()
        .map(|(key, count)| (key, Value::Int64(count)))
        .collect();
    Ok(city_country_table("restaurant_count", DataType::Int64, entries))
}
